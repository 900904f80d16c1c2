//! End-to-end tests for the release workflows against real repositories.
//!
//! Each test builds a repository with the git CLI, runs a workflow through
//! the production [`Git`] gateway, and inspects the result with the git CLI.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

use realease::core::attribution::AttributionError;
use realease::core::manifest::Bump;
use realease::core::template::Templates;
use realease::core::types::BranchName;
use realease::engine::{
    branch_release, tag, BranchReleaseRequest, Context, ReleaseError, ReleaseOptions, TagOutcome,
};
use realease::forge::mock::{MockForge, MockOperation};
use realease::forge::ForgeFactory;
use realease::git::{Git, SshAgentCredentials};

const MANIFEST_V1: &str = "{\n  \"name\": \"widget\",\n  \"version\": \"1.0.0\",\n  \"private\": true\n}\n";
const MANIFEST_V2: &str = "{\n  \"name\": \"widget\",\n  \"version\": \"2.0.0\",\n  \"private\": true\n}\n";

const QUIET: Context = Context {
    debug: false,
    quiet: true,
};

/// A repository on `master` with `package.json` at 1.0.0 (commit C) and a
/// bare `origin`.
struct TestRepo {
    dir: TempDir,
    remote: TempDir,
}

impl TestRepo {
    fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let remote = TempDir::new().expect("failed to create temp dir");

        run_git(remote.path(), &["init", "--bare"]);
        run_git(dir.path(), &["init"]);
        run_git(dir.path(), &["symbolic-ref", "HEAD", "refs/heads/master"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        run_git(dir.path(), &["config", "user.name", "Test User"]);
        run_git(dir.path(), &["config", "commit.gpgsign", "false"]);
        run_git(
            dir.path(),
            &["remote", "add", "origin", remote.path().to_str().unwrap()],
        );

        let repo = Self { dir, remote };
        repo.commit_file("package.json", MANIFEST_V1, "C");
        repo
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn git(&self) -> Git {
        Git::open(self.path()).expect("failed to open test repo")
    }

    fn commit_file(&self, path: &str, content: &str, message: &str) -> String {
        std::fs::write(self.path().join(path), content).unwrap();
        run_git(self.path(), &["add", path]);
        run_git(self.path(), &["commit", "-m", message]);
        self.rev_parse("HEAD")
    }

    fn rev_parse(&self, rev: &str) -> String {
        git_output(self.path(), &["rev-parse", rev])
    }

    fn remote_rev_parse(&self, rev: &str) -> String {
        git_output(self.remote.path(), &["rev-parse", rev])
    }

    fn options(&self) -> ReleaseOptions {
        ReleaseOptions {
            trunk: BranchName::new("master").unwrap(),
            force: false,
            remote: "origin".to_string(),
            push: true,
            manifest: self.path().join("package.json"),
            templates: Templates::default(),
        }
    }
}

fn run_git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");

    if !output.status.success() {
        panic!(
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

fn git_output(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

fn patch() -> BranchReleaseRequest {
    BranchReleaseRequest {
        bump: Bump::Patch,
        extra_files: vec![],
    }
}

fn run_tag(repo: &TestRepo, options: &ReleaseOptions) -> Result<TagOutcome, ReleaseError> {
    let git = repo.git();
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(tag::run(&git, &git, &SshAgentCredentials, None, &QUIET, options))
}

// =============================================================================
// Branch release
// =============================================================================

mod branch_release_flow {
    use super::*;

    #[test]
    fn patch_release_from_master() {
        let repo = TestRepo::new();
        let c = repo.rev_parse("HEAD");

        let outcome = branch_release::run(
            &repo.git(),
            &SshAgentCredentials,
            &QUIET,
            &repo.options(),
            &patch(),
        )
        .unwrap();

        assert_eq!(outcome.version.to_string(), "1.0.1");
        assert_eq!(outcome.branch.as_str(), "release/1.0.1");

        // exactly one commit atop C
        assert_eq!(repo.rev_parse("release/1.0.1^"), c);
        assert_eq!(repo.rev_parse("release/1.0.1"), outcome.commit.as_str());
        assert_eq!(
            git_output(
                repo.path(),
                &["diff-tree", "--no-commit-id", "--name-only", "-r", "release/1.0.1"]
            ),
            "package.json"
        );
        assert_eq!(
            git_output(repo.path(), &["log", "-1", "--format=%s", "release/1.0.1"]),
            "Release version 1.0.1"
        );
        assert_eq!(
            git_output(repo.path(), &["show", "release/1.0.1:package.json"]),
            "{\n  \"name\": \"widget\",\n  \"version\": \"1.0.1\",\n  \"private\": true\n}"
        );

        // pushed, original branch restored, trunk untouched
        assert_eq!(repo.remote_rev_parse("refs/heads/release/1.0.1"), outcome.commit.as_str());
        assert_eq!(
            git_output(repo.path(), &["symbolic-ref", "--short", "HEAD"]),
            "master"
        );
        assert_eq!(repo.rev_parse("master"), c);
        assert_eq!(
            std::fs::read_to_string(repo.path().join("package.json")).unwrap(),
            MANIFEST_V1
        );
    }

    #[test]
    fn extra_files_and_no_push() {
        let repo = TestRepo::new();
        std::fs::write(repo.path().join("CHANGELOG.md"), "# 2.0.0\n").unwrap();
        let mut options = repo.options();
        options.push = false;
        let request = BranchReleaseRequest {
            bump: Bump::Major,
            extra_files: vec![repo.path().join("CHANGELOG.md")],
        };

        let outcome = branch_release::run(
            &repo.git(),
            &SshAgentCredentials,
            &QUIET,
            &options,
            &request,
        )
        .unwrap();

        assert!(!outcome.pushed);
        assert_eq!(
            git_output(
                repo.path(),
                &["diff-tree", "--no-commit-id", "--name-only", "-r", "release/2.0.0"]
            ),
            "CHANGELOG.md\npackage.json"
        );
        assert_eq!(
            git_output(repo.remote.path(), &["for-each-ref", "--format=%(refname)"]),
            ""
        );
    }

    #[test]
    fn refused_on_feature_branch() {
        let repo = TestRepo::new();
        run_git(repo.path(), &["checkout", "-b", "feature"]);

        let err = branch_release::run(
            &repo.git(),
            &SshAgentCredentials,
            &QUIET,
            &repo.options(),
            &patch(),
        )
        .unwrap_err();

        assert!(matches!(err, ReleaseError::PolicyViolation(_)));
        assert_eq!(
            std::fs::read_to_string(repo.path().join("package.json")).unwrap(),
            MANIFEST_V1
        );
    }

    #[test]
    fn push_failure_restores_master() {
        let repo = TestRepo::new();
        run_git(repo.path(), &["remote", "set-url", "origin", "/nonexistent/remote.git"]);

        let err = branch_release::run(
            &repo.git(),
            &SshAgentCredentials,
            &QUIET,
            &repo.options(),
            &patch(),
        )
        .unwrap_err();

        assert!(err.to_string().starts_with("pushing release branch: "));
        assert_eq!(
            git_output(repo.path(), &["symbolic-ref", "--short", "HEAD"]),
            "master"
        );
        // nothing is rolled back
        assert!(!repo.rev_parse("release/1.0.1").is_empty());
    }
}

// =============================================================================
// Tag
// =============================================================================

mod tag_flow {
    use super::*;

    /// C (1.0.0) -> D (2.0.0) -> E (unrelated). Returns (D, E).
    fn bumped(repo: &TestRepo) -> (String, String) {
        let d = repo.commit_file("package.json", MANIFEST_V2, "D");
        let e = repo.commit_file("README.md", "# widget\n", "E");
        (d, e)
    }

    #[test]
    fn tags_bump_commit_not_head() {
        let repo = TestRepo::new();
        let (d, e) = bumped(&repo);

        let outcome = run_tag(&repo, &repo.options()).unwrap();

        assert!(matches!(
            outcome,
            TagOutcome::CreatedLocally { pushed: true, .. }
        ));
        assert_eq!(git_output(repo.path(), &["cat-file", "-t", "v2.0.0"]), "tag");
        assert_eq!(repo.rev_parse("v2.0.0^{commit}"), d);
        assert_ne!(repo.rev_parse("v2.0.0^{commit}"), e);
        assert_eq!(
            git_output(repo.path(), &["tag", "-l", "--format=%(contents:subject)", "v2.0.0"]),
            "Release version 2.0.0"
        );
        assert_eq!(repo.remote_rev_parse("v2.0.0^{commit}"), d);
    }

    #[test]
    fn second_run_is_a_no_op() {
        let repo = TestRepo::new();
        bumped(&repo);
        let mut options = repo.options();
        options.push = false;

        run_tag(&repo, &options).unwrap();
        let tag_object = repo.rev_parse("v2.0.0");

        let again = run_tag(&repo, &options).unwrap();
        assert!(matches!(again, TagOutcome::AlreadyExists { .. }));
        assert_eq!(repo.rev_parse("v2.0.0"), tag_object);
    }

    #[test]
    fn uncommitted_version_change() {
        let repo = TestRepo::new();
        std::fs::write(repo.path().join("package.json"), MANIFEST_V2).unwrap();

        let err = run_tag(&repo, &repo.options()).unwrap_err();
        assert!(matches!(
            err,
            ReleaseError::Attribution {
                source: AttributionError::Uncommitted { line: 3 },
                ..
            }
        ));
        assert_eq!(git_output(repo.path(), &["tag", "-l"]), "");
    }

    #[test]
    fn tags_bump_commit_through_autocrlf_checkout() {
        let repo = TestRepo::new();
        let (d, _) = bumped(&repo);
        run_git(repo.path(), &["config", "core.autocrlf", "true"]);
        std::fs::remove_file(repo.path().join("package.json")).unwrap();
        run_git(repo.path(), &["checkout", "--", "package.json"]);
        assert!(std::fs::read_to_string(repo.path().join("package.json"))
            .unwrap()
            .contains("\r\n"));
        let mut options = repo.options();
        options.push = false;

        let outcome = run_tag(&repo, &options).unwrap();

        assert!(matches!(outcome, TagOutcome::CreatedLocally { .. }));
        assert_eq!(repo.rev_parse("v2.0.0^{commit}"), d);
    }

    #[test]
    fn forced_from_detached_head() {
        let repo = TestRepo::new();
        let (d, _) = bumped(&repo);
        run_git(repo.path(), &["checkout", "--detach"]);
        let mut options = repo.options();
        options.push = false;

        assert!(matches!(
            run_tag(&repo, &options),
            Err(ReleaseError::PolicyViolation(_))
        ));

        options.force = true;
        run_tag(&repo, &options).unwrap();
        assert_eq!(repo.rev_parse("v2.0.0^{commit}"), d);
    }

    #[test]
    fn api_path_creates_no_local_tag() {
        let repo = TestRepo::new();
        let (d, _) = bumped(&repo);
        run_git(
            repo.path(),
            &["remote", "set-url", "origin", "git@github.com:acme/widget.git"],
        );

        let forge = MockForge::new();
        let factory: &dyn ForgeFactory = &forge;
        let git = repo.git();
        let rt = tokio::runtime::Runtime::new().unwrap();
        let outcome = rt
            .block_on(tag::run(
                &git,
                &git,
                &SshAgentCredentials,
                Some(factory),
                &QUIET,
                &repo.options(),
            ))
            .unwrap();

        assert!(matches!(outcome, TagOutcome::CreatedViaApi { .. }));
        assert_eq!(
            forge.operations(),
            vec![MockOperation::CreateTagRef {
                ref_name: "refs/tags/v2.0.0".to_string(),
                sha: d,
            }]
        );
        assert_eq!(git_output(repo.path(), &["tag", "-l"]), "");
    }
}
