use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ThresholdError;

/// A pull request as it looked when the webhook was delivered.
///
/// Built from the inbound payload and never persisted or mutated.
///
/// # Examples
///
/// ```
/// use threshold_core::PullRequestSnapshot;
///
/// let pr = PullRequestSnapshot {
///     owner: "octocat".into(),
///     repo: "hello-world".into(),
///     number: 42,
///     head_sha: "6dcb09b5b57875f334f61aebed695e2e4193db5e".into(),
///     base_owner: "octocat".into(),
///     base_repo: "hello-world".into(),
///     state: "open".into(),
///     url: "https://github.com/octocat/hello-world/pull/42".into(),
///     changed_files: 3,
/// };
/// assert_eq!(pr.to_string(), "octocat/hello-world#42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestSnapshot {
    /// Login of the owner of the repository that delivered the event.
    pub owner: String,
    /// Name of the repository that delivered the event.
    pub repo: String,
    /// Pull request number.
    pub number: u64,
    /// SHA of the head commit.
    pub head_sha: String,
    /// Login of the base repository's owner.
    pub base_owner: String,
    /// Name of the base repository.
    pub base_repo: String,
    /// Remote state at delivery time (`open` / `closed`).
    pub state: String,
    /// Web URL of the pull request.
    pub url: String,
    /// Number of files changed by the pull request.
    pub changed_files: u64,
}

impl fmt::Display for PullRequestSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

/// A reason a pull request failed one threshold.
///
/// # Examples
///
/// ```
/// use threshold_core::Violation;
///
/// let v = Violation::new("50 files were changed, but the threshold is 10");
/// assert_eq!(v.to_string(), "50 files were changed, but the threshold is 10");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Violation(String);

impl Violation {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// State of the `ci/threshold` commit status.
///
/// Only `success` and `failure` are ever posted; parsing any other value
/// yields [`ThresholdError::InvalidState`].
///
/// # Examples
///
/// ```
/// use threshold_core::CommitState;
///
/// let state: CommitState = "failure".parse().unwrap();
/// assert_eq!(state, CommitState::Failure);
/// assert!("pending".parse::<CommitState>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitState {
    /// All thresholds passed.
    Success,
    /// At least one threshold was exceeded.
    Failure,
}

impl CommitState {
    pub fn as_str(self) -> &'static str {
        match self {
            CommitState::Success => "success",
            CommitState::Failure => "failure",
        }
    }
}

impl fmt::Display for CommitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommitState {
    type Err = ThresholdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(CommitState::Success),
            "failure" => Ok(CommitState::Failure),
            other => Err(ThresholdError::InvalidState(other.to_string())),
        }
    }
}
