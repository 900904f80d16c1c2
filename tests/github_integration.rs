//! Integration tests for the GitHub forge.
//!
//! The REST API is stood in for by a wiremock server; the forge is pointed
//! at it through its configurable API base.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use realease::core::remote::RemoteDescriptor;
use realease::forge::github::GitHubForge;
use realease::forge::{CreateTagRefRequest, Forge, ForgeError, ForgeFactory, GitHubFactory};

const SHA: &str = "aa218f56b14c9653891f9e74264a383fa43fefbd";

fn forge(server: &MockServer) -> GitHubForge {
    GitHubForge::with_api_base("ghp_test", "acme", "widget", server.uri())
}

async fn respond_with(status: u16, body: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repos/acme/widget/git/refs"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(&server)
        .await;
    server
}

mod create_tag_ref {
    use super::*;

    #[tokio::test]
    async fn posts_ref_and_sha() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/repos/acme/widget/git/refs"))
            .and(header("authorization", "Bearer ghp_test"))
            .and(header("accept", "application/vnd.github+json"))
            .and(body_json(json!({
                "ref": "refs/tags/v2.0.0",
                "sha": SHA,
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "ref": "refs/tags/v2.0.0",
                "node_id": "MDM6UmVmcmVmcy90YWdzL3YyLjAuMA==",
                "url": "https://api.github.com/repos/acme/widget/git/refs/tags/v2.0.0",
                "object": { "type": "commit", "sha": SHA }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let created = forge(&server)
            .create_tag_ref(CreateTagRefRequest::new("v2.0.0", SHA))
            .await
            .unwrap();

        assert_eq!(created.ref_name, "refs/tags/v2.0.0");
        assert_eq!(created.sha, SHA);
    }

    #[tokio::test]
    async fn api_base_with_trailing_slash() {
        let server = respond_with(
            201,
            json!({ "ref": "refs/tags/v1.0.0", "object": { "sha": SHA } }),
        )
        .await;
        let forge = GitHubForge::with_api_base(
            "ghp_test",
            "acme",
            "widget",
            format!("{}/", server.uri()),
        );

        assert!(forge
            .create_tag_ref(CreateTagRefRequest::new("v1.0.0", SHA))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn factory_addresses_parsed_remote() {
        let server = respond_with(
            201,
            json!({ "ref": "refs/tags/v1.0.0", "object": { "sha": SHA } }),
        )
        .await;
        let remote = RemoteDescriptor::parse("git@github.com:acme/widget.git").unwrap();
        let forge = GitHubFactory::new("ghp_test", server.uri())
            .create(&remote)
            .unwrap();

        let created = forge
            .create_tag_ref(CreateTagRefRequest::new("v1.0.0", SHA))
            .await
            .unwrap();
        assert_eq!(created.sha, SHA);
    }
}

mod errors {
    use super::*;

    #[tokio::test]
    async fn existing_reference_is_422() {
        let server = respond_with(422, json!({ "message": "Reference already exists" })).await;

        let err = forge(&server)
            .create_tag_ref(CreateTagRefRequest::new("v1.0.0", SHA))
            .await
            .unwrap_err();
        match err {
            ForgeError::ApiError { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "Reference already exists");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn bad_token_is_auth_failed() {
        let server = respond_with(401, json!({ "message": "Bad credentials" })).await;

        let err = forge(&server)
            .create_tag_ref(CreateTagRefRequest::new("v1.0.0", SHA))
            .await
            .unwrap_err();
        assert!(matches!(err, ForgeError::AuthFailed(_)));
    }

    #[tokio::test]
    async fn missing_repository_is_not_found() {
        let server = respond_with(404, json!({ "message": "Not Found" })).await;

        let err = forge(&server)
            .create_tag_ref(CreateTagRefRequest::new("v1.0.0", SHA))
            .await
            .unwrap_err();
        assert!(matches!(err, ForgeError::NotFound(_)));
    }

    #[tokio::test]
    async fn rate_limited() {
        let server = respond_with(429, json!({ "message": "API rate limit exceeded" })).await;

        let err = forge(&server)
            .create_tag_ref(CreateTagRefRequest::new("v1.0.0", SHA))
            .await
            .unwrap_err();
        assert!(matches!(err, ForgeError::RateLimited));
    }

    #[tokio::test]
    async fn server_error() {
        let server = respond_with(502, json!({ "message": "Bad Gateway" })).await;

        let err = forge(&server)
            .create_tag_ref(CreateTagRefRequest::new("v1.0.0", SHA))
            .await
            .unwrap_err();
        assert!(matches!(err, ForgeError::ApiError { status: 502, .. }));
    }

    #[tokio::test]
    async fn empty_token_never_sends() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let forge = GitHubForge::with_api_base("", "acme", "widget", server.uri());
        let err = forge
            .create_tag_ref(CreateTagRefRequest::new("v1.0.0", SHA))
            .await
            .unwrap_err();
        assert!(matches!(err, ForgeError::AuthRequired));
    }
}
