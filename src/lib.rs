//! Realease - cut release branches and tag the commit that bumped the version
//!
//! Realease automates two release operations on a Git repository whose
//! version lives in a JSON manifest (`package.json` by default):
//!
//! - `major` / `minor` / `patch`: bump the version, commit it on a fresh
//!   release branch, push it, and print a pull request URL.
//! - `tag`: find the commit that last changed the manifest's version line and
//!   tag *that* commit, locally or through the GitHub API.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, merges config, delegates to engine)
//! - [`engine`] - The two release workflows and their error taxonomy
//! - [`core`] - Domain types, manifest handling, version-line location, config
//! - [`git`] - Single interface for all Git operations
//! - [`forge`] - Hosted repository API (GitHub)
//! - [`ui`] - Console output
//!
//! # Invariants
//!
//! 1. The manifest is read once per run; locating the version line and
//!    attributing it observe the same content
//! 2. The tag target is the commit that last wrote the version line, never HEAD
//! 3. After a branch release starts, the original branch is restored on every exit path
//! 4. An existing tag is reported, never overwritten

pub mod cli;
pub mod core;
pub mod engine;
pub mod forge;
pub mod git;
pub mod ui;
