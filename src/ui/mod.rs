//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Verbosity-aware printing of progress, warnings, and errors
//!
//! # Design
//!
//! Every line the tool prints goes through this module so `--quiet` and
//! `--debug` are honoured in one place.

pub mod output;
