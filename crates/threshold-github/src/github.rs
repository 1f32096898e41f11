use async_trait::async_trait;
use threshold_core::{GitHubConfig, ThresholdError};

use crate::client::{
    CreatedComment, CreatedStatus, EditedPullRequest, NewStatus, PullRequestEdit, SourceControl,
};

/// GitHub REST client used to comment on, report status for, and close pull requests.
///
/// Built once at startup and shared by every webhook delivery. Requests are
/// unauthenticated when no token is configured.
pub struct GitHubClient {
    octocrab: octocrab::Octocrab,
}

impl GitHubClient {
    /// Create a client from the `[github]` configuration section.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ThresholdError::Config`] if the host is not a valid URL or
    /// the client cannot be built.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use threshold_core::GitHubConfig;
    /// use threshold_github::github::GitHubClient;
    ///
    /// # async fn example() -> Result<(), threshold_core::ThresholdError> {
    /// let config = GitHubConfig {
    ///     host: Some("https://github.example.com/api/v3/".into()),
    ///     token: Some("ghp_xxxx".into()),
    /// };
    /// let client = GitHubClient::new(&config)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: &GitHubConfig) -> Result<Self, ThresholdError> {
        let mut builder = octocrab::Octocrab::builder();

        if let Some(token) = config.token.as_deref().filter(|t| !t.is_empty()) {
            builder = builder.personal_token(token.to_string());
        }

        if let Some(host) = config.host.as_deref().filter(|h| !h.is_empty()) {
            builder = builder
                .base_uri(host)
                .map_err(|e| ThresholdError::Config(format!("invalid GitHub host '{host}': {e}")))?;
        }

        let octocrab = builder
            .build()
            .map_err(|e| ThresholdError::Config(format!("failed to create GitHub client: {e}")))?;

        Ok(Self { octocrab })
    }
}

#[async_trait]
impl SourceControl for GitHubClient {
    async fn create_comment(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> Result<CreatedComment, ThresholdError> {
        let route = format!("/repos/{owner}/{repo}/issues/{number}/comments");
        let body = serde_json::json!({ "body": body });

        self.octocrab
            .post(route, Some(&body))
            .await
            .map_err(|e| ThresholdError::Upstream(format!("failed to post comment: {e}")))
    }

    async fn create_status(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
        status: &NewStatus,
    ) -> Result<CreatedStatus, ThresholdError> {
        let route = format!("/repos/{owner}/{repo}/statuses/{sha}");

        self.octocrab
            .post(route, Some(status))
            .await
            .map_err(|e| ThresholdError::Upstream(format!("failed to create status: {e}")))
    }

    async fn edit_pull_request(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        edit: &PullRequestEdit,
    ) -> Result<EditedPullRequest, ThresholdError> {
        let route = format!("/repos/{owner}/{repo}/pulls/{number}");

        self.octocrab
            .patch(route, Some(edit))
            .await
            .map_err(|e| ThresholdError::Upstream(format!("failed to edit pull request: {e}")))
    }
}
