//! Turning an evaluation into side effects on the source-control host.

use threshold_core::{
    evaluate, CommitState, PullRequestSnapshot, ThresholdConfig, ThresholdError, Violation,
};
use threshold_github::client::{
    CreatedComment, CreatedStatus, EditedPullRequest, PullRequestEdit, SourceControl,
};
use threshold_github::status::report_status;

const COMMENT_HEADER: &str =
    "This PR has been judged to be too complex for the following reasons:";
const COMMENT_TRAILER: &str = "Please consider breaking these changes up into smaller pieces.";

/// The side effect performed for one pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reaction {
    /// No threshold was exceeded; a success status was posted.
    Passed {
        pr: String,
        status: CreatedStatus,
    },
    /// Thresholds were exceeded; a comment and a failure status were posted.
    Failed {
        pr: String,
        violations: Vec<Violation>,
        comment: CreatedComment,
        status: CreatedStatus,
    },
    /// Thresholds were exceeded in strict mode; a comment was posted and the
    /// pull request closed.
    Closed {
        pr: String,
        violations: Vec<Violation>,
        comment: CreatedComment,
        pull_request: EditedPullRequest,
    },
}

impl Reaction {
    /// Human-readable summary, used for both the log line and the HTTP body.
    pub fn message(&self) -> String {
        match self {
            Reaction::Passed { pr, status } => {
                format!("{pr} is within thresholds, success status posted: {}", status.url)
            }
            Reaction::Failed {
                pr,
                violations,
                status,
                ..
            } => format!(
                "{pr} exceeded {} threshold(s), failure status posted: {}",
                violations.len(),
                status.url
            ),
            Reaction::Closed {
                pr,
                violations,
                pull_request,
                ..
            } => match &pull_request.html_url {
                Some(url) => format!(
                    "{pr} exceeded {} threshold(s) and was closed: {url}",
                    violations.len()
                ),
                None => format!(
                    "{pr} exceeded {} threshold(s) and was closed",
                    violations.len()
                ),
            },
        }
    }
}

/// Render the explanatory comment for a set of violations.
///
/// # Examples
///
/// ```
/// use threshold_core::Violation;
/// use threshold_server::reactor::comment_body;
///
/// let body = comment_body(&[Violation::new("50 files were changed, but the threshold is 10")]);
/// assert_eq!(
///     body,
///     "This PR has been judged to be too complex for the following reasons:\n\n\
///      50 files were changed, but the threshold is 10\n\
///      Please consider breaking these changes up into smaller pieces."
/// );
/// ```
pub fn comment_body(violations: &[Violation]) -> String {
    let mut body = format!("{COMMENT_HEADER}\n\n");
    for violation in violations {
        body.push_str(violation.message());
        body.push('\n');
    }
    body.push_str(COMMENT_TRAILER);
    body
}

/// Evaluate `pr` and perform exactly one reaction.
///
/// Side effects already performed are not undone when a later call fails: a
/// posted comment stays even if closing or the status call fails.
///
/// # Errors
///
/// Returns [`ThresholdError::Upstream`] from the first host call that fails.
/// Nothing is attempted after a failed comment.
pub async fn react(
    client: &dyn SourceControl,
    thresholds: &ThresholdConfig,
    pr: PullRequestSnapshot,
) -> Result<Reaction, ThresholdError> {
    let violations = evaluate(&pr, thresholds);
    let label = pr.to_string();

    if violations.is_empty() {
        let status = report_status(client, &pr, CommitState::Success).await?;
        return Ok(Reaction::Passed { pr: label, status });
    }

    tracing::info!(pr = %label, violations = violations.len(), "thresholds exceeded");

    // TODO: skip the comment when one was already posted for this head SHA
    let body = comment_body(&violations);
    let comment = client
        .create_comment(&pr.owner, &pr.repo, pr.number, &body)
        .await?;
    tracing::debug!(pr = %label, url = %comment.html_url, "comment posted");

    if thresholds.strict {
        let pull_request = client
            .edit_pull_request(&pr.owner, &pr.repo, pr.number, &PullRequestEdit::close())
            .await?;
        Ok(Reaction::Closed {
            pr: label,
            violations,
            comment,
            pull_request,
        })
    } else {
        let status = report_status(client, &pr, CommitState::Failure).await?;
        Ok(Reaction::Failed {
            pr: label,
            violations,
            comment,
            status,
        })
    }
}
