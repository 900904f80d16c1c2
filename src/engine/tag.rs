//! engine::tag
//!
//! Tag the commit that last changed the manifest's version line.
//!
//! # Target selection
//!
//! The tag never points at HEAD. The manifest is read once; the version line
//! is located in that snapshot and the same snapshot is handed to the
//! [`HistoryAttributor`], whose answer becomes the tag target. Commits made
//! after the version bump therefore don't move the tag.
//!
//! # Publishing
//!
//! - With a forge factory (an API token was given): create `refs/tags/<tag>`
//!   through the hosted API. No local tag, no push, no signing.
//! - Otherwise: create an annotated tag locally and push it unless push is
//!   disabled.
//!
//! If the tag already exists locally the workflow stops before any mutation
//! and reports [`TagOutcome::AlreadyExists`].

use super::error::{Describe, ReleaseError};
use super::gateway::Gateway;
use super::{check_branch_policy, Context, ReleaseOptions};
use crate::core::attribution::HistoryAttributor;
use crate::core::manifest::ManifestSnapshot;
use crate::core::remote::RemoteDescriptor;
use crate::core::types::{Oid, RefName, TagName};
use crate::forge::{CreateTagRefRequest, ForgeFactory};
use crate::git::CredentialSource;
use crate::ui::output;

/// How a tag run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOutcome {
    /// The tag was already present; nothing was changed.
    AlreadyExists { tag: TagName },
    /// An annotated tag was created in the local repository.
    CreatedLocally {
        tag: TagName,
        commit: Oid,
        pushed: bool,
    },
    /// The tag reference was created through the hosted API.
    CreatedViaApi { tag: TagName, commit: Oid },
}

/// Run the tag workflow.
///
/// `api` selects the hosted-API path; `None` tags locally.
pub async fn run<G: Gateway + ?Sized>(
    gateway: &G,
    attributor: &dyn HistoryAttributor,
    credentials: &dyn CredentialSource,
    api: Option<&dyn ForgeFactory>,
    ctx: &Context,
    options: &ReleaseOptions,
) -> Result<TagOutcome, ReleaseError> {
    let verbosity = ctx.verbosity();

    if check_branch_policy(gateway, options, true)?.is_none() {
        output::debug("Tagging from a detached HEAD", verbosity);
    }

    let snapshot = ManifestSnapshot::read(&options.manifest).describe("reading manifest")?;
    let version = snapshot.version().describe("reading manifest version")?;
    let target = options
        .templates
        .expand(&version.to_string())
        .map_err(|e| ReleaseError::Usage(e.to_string()))?;
    let tag = target.tag_name;
    let tag_ref = RefName::for_tag(&tag);

    let refs = gateway
        .reference_names()
        .describe("listing references")?;
    if refs.iter().any(|r| r == tag_ref.as_str()) {
        output::print(format!("Tag {} exists already", tag), verbosity);
        return Ok(TagOutcome::AlreadyExists { tag });
    }

    let line = snapshot
        .version_line()
        .describe("locating version line")?;
    let manifest = gateway
        .relative_path(snapshot.path())
        .describe("resolving manifest path")?;
    let commit = attributor
        .attribute_line(&manifest, snapshot.content(), line.line_number)
        .describe(format!(
            "finding the commit that changed line {} of {}",
            line.line_number,
            manifest.display()
        ))?;
    output::debug(
        format!(
            "{}:{} `{}` last changed in {}",
            manifest.display(),
            line.line_number,
            line.raw_text.trim(),
            commit.short(7)
        ),
        verbosity,
    );

    if let Some(factory) = api {
        let url = gateway
            .remote_url(&options.remote)
            .describe("reading remote URL")?;
        let remote = RemoteDescriptor::parse(&url).describe("parsing remote URL")?;
        let forge = factory
            .create(&remote)
            .describe("connecting to hosted API")?;

        output::print(
            format!(
                "Creating tag {} at {} in {} via {}",
                tag,
                commit.short(7),
                remote,
                forge.name()
            ),
            verbosity,
        );
        forge
            .create_tag_ref(CreateTagRefRequest::new(tag.as_str(), commit.as_str()))
            .await
            .describe("creating tag via API")?;
        output::success(format!("Created tag {}", tag), verbosity);
        return Ok(TagOutcome::CreatedViaApi { tag, commit });
    }

    output::print(
        format!("Creating tag {} at {}", tag, commit.short(7)),
        verbosity,
    );
    gateway
        .create_annotated_tag(&tag, &commit, &target.message)
        .describe("creating tag")?;

    if options.push {
        output::print(
            format!("Pushing {} to {}", tag, options.remote),
            verbosity,
        );
        gateway
            .push(&options.remote, &tag_ref, credentials)
            .describe("pushing tag")?;
    }
    output::success(format!("Created tag {}", tag), verbosity);

    Ok(TagOutcome::CreatedLocally {
        tag,
        commit,
        pushed: options.push,
    })
}
