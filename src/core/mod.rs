//! core
//!
//! Core domain types and pure release logic.
//!
//! # Modules
//!
//! - [`types`] - Strong types: BranchName, TagName, Oid, RefName
//! - [`locator`] - Finding the version line in manifest text
//! - [`manifest`] - Manifest snapshots, version bumps, and rewriting
//! - [`template`] - `{version}` substitution and release targets
//! - [`remote`] - org/repo parsing from remote URLs
//! - [`attribution`] - Line-level history attribution contract
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid ref names from reaching Git
//! - Nothing here touches the repository directly
//! - Schemas are strict and self-describing

pub mod attribution;
pub mod config;
pub mod locator;
pub mod manifest;
pub mod remote;
pub mod template;
pub mod types;
