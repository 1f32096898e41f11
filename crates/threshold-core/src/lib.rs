//! Core types, configuration, evaluation, and error handling for threshold.
//!
//! This crate provides the shared foundation used by the other threshold crates:
//! - [`ThresholdError`]: unified error type using `thiserror`
//! - [`Config`]: configuration loaded from `.threshold.toml`
//! - [`evaluate`]: the pure threshold check
//! - Shared types: [`PullRequestSnapshot`], [`Violation`], [`CommitState`]

mod config;
mod error;
mod evaluate;
mod types;

pub use config::{Config, GitHubConfig, ServerConfig, ThresholdConfig, DEFAULT_CONFIG_TEMPLATE};
pub use error::ThresholdError;
pub use evaluate::evaluate;
pub use types::{CommitState, PullRequestSnapshot, Violation};
