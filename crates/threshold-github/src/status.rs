//! Posting the `ci/threshold` commit status.

use threshold_core::{CommitState, PullRequestSnapshot, ThresholdError};

use crate::client::{CreatedStatus, NewStatus, SourceControl};

/// Description attached to every status threshold posts.
pub const STATUS_DESCRIPTION: &str = "Complexity thresholds";

/// Context identifier attached to every status threshold posts.
pub const STATUS_CONTEXT: &str = "ci/threshold";

/// Build the status body for `state`.
///
/// # Examples
///
/// ```
/// use threshold_core::CommitState;
/// use threshold_github::status::new_status;
///
/// let status = new_status(CommitState::Failure);
/// assert_eq!(status.description, "Complexity thresholds");
/// assert_eq!(status.context, "ci/threshold");
/// ```
pub fn new_status(state: CommitState) -> NewStatus {
    NewStatus {
        state,
        description: STATUS_DESCRIPTION.to_string(),
        context: STATUS_CONTEXT.to_string(),
    }
}

/// Post a status named by a string, as received from a caller.
///
/// The state must be `"success"` or `"failure"`; anything else is rejected
/// before any outbound call is made.
///
/// # Errors
///
/// Returns [`ThresholdError::InvalidState`] for an unknown state, or
/// [`ThresholdError::Upstream`] if the host rejects the status.
pub async fn create_status(
    client: &dyn SourceControl,
    pr: &PullRequestSnapshot,
    state: &str,
) -> Result<CreatedStatus, ThresholdError> {
    let state: CommitState = state.parse()?;
    report_status(client, pr, state).await
}

/// Post the `ci/threshold` status on the head commit of `pr`.
///
/// The status is created on the base repository.
///
/// # Errors
///
/// Returns [`ThresholdError::Upstream`] if the host rejects the status.
pub async fn report_status(
    client: &dyn SourceControl,
    pr: &PullRequestSnapshot,
    state: CommitState,
) -> Result<CreatedStatus, ThresholdError> {
    let status = new_status(state);
    tracing::debug!(pr = %pr, sha = %pr.head_sha, %state, "posting commit status");

    client
        .create_status(&pr.base_owner, &pr.base_repo, &pr.head_sha, &status)
        .await
}
