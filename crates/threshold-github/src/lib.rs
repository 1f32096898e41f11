//! Source-control host integration.
//!
//! Provides the [`SourceControl`](client::SourceControl) capability trait,
//! its GitHub implementation on top of octocrab, a recording mock, and the
//! commit-status reporter.

pub mod client;
pub mod github;
pub mod mock;
pub mod status;
