//! The narrow slice of the source-control host API that threshold needs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use threshold_core::{CommitState, ThresholdError};

/// Operations the reactor performs against the source-control host.
///
/// [`GitHubClient`](crate::github::GitHubClient) talks to the GitHub REST API;
/// [`MockSourceControl`](crate::mock::MockSourceControl) records calls for tests.
/// Implementations must be safe to share across concurrent webhook deliveries.
#[async_trait]
pub trait SourceControl: Send + Sync {
    /// Post an issue comment on pull request `number`.
    async fn create_comment(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> Result<CreatedComment, ThresholdError>;

    /// Attach a commit status to `sha`.
    async fn create_status(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
        status: &NewStatus,
    ) -> Result<CreatedStatus, ThresholdError>;

    /// Submit an edit to pull request `number`.
    async fn edit_pull_request(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        edit: &PullRequestEdit,
    ) -> Result<EditedPullRequest, ThresholdError>;
}

/// Request body for creating a commit status.
///
/// # Examples
///
/// ```
/// use threshold_core::CommitState;
/// use threshold_github::client::NewStatus;
///
/// let status = NewStatus {
///     state: CommitState::Success,
///     description: "Complexity thresholds".into(),
///     context: "ci/threshold".into(),
/// };
/// let json = serde_json::to_value(&status).unwrap();
/// assert_eq!(json["state"], "success");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewStatus {
    pub state: CommitState,
    pub description: String,
    pub context: String,
}

/// Request body for editing a pull request. Only the state is ever changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestEdit {
    pub state: String,
}

impl PullRequestEdit {
    pub fn close() -> Self {
        Self {
            state: "closed".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedComment {
    pub html_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedStatus {
    /// API URL of the created status.
    pub url: String,
    pub state: CommitState,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EditedPullRequest {
    pub number: u64,
    pub state: String,
    /// Web URL of the pull request; absent from some Enterprise responses.
    #[serde(default)]
    pub html_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_edit_serializes_state_only() {
        let json = serde_json::to_string(&PullRequestEdit::close()).unwrap();
        assert_eq!(json, r#"{"state":"closed"}"#);
    }

    #[test]
    fn created_status_reads_github_response() {
        let body = r#"{
            "url": "https://api.github.com/repos/octocat/Hello-World/statuses/6dcb09b5",
            "id": 1,
            "state": "failure",
            "description": "Complexity thresholds",
            "context": "ci/threshold"
        }"#;
        let status: CreatedStatus = serde_json::from_str(body).unwrap();
        assert_eq!(status.state, CommitState::Failure);
        assert!(status.url.ends_with("/statuses/6dcb09b5"));
    }

    #[test]
    fn edited_pull_request_tolerates_missing_url() {
        let pr: EditedPullRequest =
            serde_json::from_str(r#"{"number": 3, "state": "closed"}"#).unwrap();
        assert_eq!(pr.state, "closed");
        assert!(pr.html_url.is_none());
    }
}
