//! In-memory [`SourceControl`] that records every call.

use std::sync::Mutex;

use async_trait::async_trait;
use threshold_core::ThresholdError;

use crate::client::{
    CreatedComment, CreatedStatus, EditedPullRequest, NewStatus, PullRequestEdit, SourceControl,
};

/// One recorded outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Comment {
        owner: String,
        repo: String,
        number: u64,
        body: String,
    },
    Status {
        owner: String,
        repo: String,
        sha: String,
        status: NewStatus,
    },
    EditPullRequest {
        owner: String,
        repo: String,
        number: u64,
        edit: PullRequestEdit,
    },
}

/// Recording fake for tests. Each operation can be made to fail.
///
/// Failed calls are still recorded.
///
/// # Examples
///
/// ```
/// use threshold_github::client::SourceControl;
/// use threshold_github::mock::{Call, MockSourceControl};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mock = MockSourceControl::new();
/// mock.create_comment("o", "r", 1, "hi").await.unwrap();
/// assert!(matches!(mock.calls()[0], Call::Comment { number: 1, .. }));
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MockSourceControl {
    calls: Mutex<Vec<Call>>,
    fail_comment: bool,
    fail_status: bool,
    fail_edit: bool,
}

impl MockSourceControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_comment(mut self) -> Self {
        self.fail_comment = true;
        self
    }

    pub fn failing_status(mut self) -> Self {
        self.fail_status = true;
        self
    }

    pub fn failing_edit(mut self) -> Self {
        self.fail_edit = true;
        self
    }

    /// Snapshot of the calls made so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: Call) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

#[async_trait]
impl SourceControl for MockSourceControl {
    async fn create_comment(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> Result<CreatedComment, ThresholdError> {
        self.record(Call::Comment {
            owner: owner.into(),
            repo: repo.into(),
            number,
            body: body.into(),
        });
        if self.fail_comment {
            return Err(ThresholdError::Upstream(
                "failed to post comment: 403 Forbidden".into(),
            ));
        }
        Ok(CreatedComment {
            html_url: format!("https://github.com/{owner}/{repo}/pull/{number}#issuecomment-1"),
        })
    }

    async fn create_status(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
        status: &NewStatus,
    ) -> Result<CreatedStatus, ThresholdError> {
        self.record(Call::Status {
            owner: owner.into(),
            repo: repo.into(),
            sha: sha.into(),
            status: status.clone(),
        });
        if self.fail_status {
            return Err(ThresholdError::Upstream(
                "failed to create status: 422 Unprocessable Entity".into(),
            ));
        }
        Ok(CreatedStatus {
            url: format!("https://api.github.com/repos/{owner}/{repo}/statuses/{sha}"),
            state: status.state,
        })
    }

    async fn edit_pull_request(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        edit: &PullRequestEdit,
    ) -> Result<EditedPullRequest, ThresholdError> {
        self.record(Call::EditPullRequest {
            owner: owner.into(),
            repo: repo.into(),
            number,
            edit: edit.clone(),
        });
        if self.fail_edit {
            return Err(ThresholdError::Upstream(
                "failed to edit pull request: 404 Not Found".into(),
            ));
        }
        Ok(EditedPullRequest {
            number,
            state: edit.state.clone(),
            html_url: Some(format!("https://github.com/{owner}/{repo}/pull/{number}")),
        })
    }
}
