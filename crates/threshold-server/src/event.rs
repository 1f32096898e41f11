//! The subset of a `pull_request` webhook payload that threshold reads.

use serde::Deserialize;
use threshold_core::{PullRequestSnapshot, ThresholdError};

/// A `pull_request` webhook delivery.
///
/// Every field is optional so that unrelated, empty or closed deliveries can
/// be recognised and ignored whatever else they carry. The fields needed to
/// build a [`PullRequestSnapshot`] are only required once a delivery is going
/// to be evaluated.
#[derive(Debug, Default, Deserialize)]
pub struct PullRequestEvent {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub number: Option<u64>,
    #[serde(default)]
    pub pull_request: Option<PullRequestPayload>,
    #[serde(default)]
    pub repository: Option<RepositoryPayload>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PullRequestPayload {
    #[serde(default)]
    pub number: Option<u64>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub changed_files: Option<u64>,
    #[serde(default)]
    pub head: Option<HeadPayload>,
    #[serde(default)]
    pub base: Option<BasePayload>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HeadPayload {
    #[serde(default)]
    pub sha: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BasePayload {
    #[serde(default)]
    pub repo: Option<RepositoryPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepositoryPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub owner: Option<OwnerPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OwnerPayload {
    #[serde(default)]
    pub login: Option<String>,
}

impl RepositoryPayload {
    /// `(owner, name)`, or `None` if either is missing.
    fn coordinates(self) -> Option<(String, String)> {
        Some((self.owner?.login?, self.name?))
    }
}

/// What a delivery asks threshold to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Nothing to evaluate; carries the reason.
    Ignored(String),
    /// An open pull request to evaluate.
    Evaluate(PullRequestSnapshot),
}

fn require<T>(value: Option<T>, field: &str) -> Result<T, ThresholdError> {
    value.ok_or_else(|| ThresholdError::MalformedInput(format!("missing field `{field}`")))
}

impl PullRequestEvent {
    /// Decode a raw webhook body.
    ///
    /// A JSON `null` decodes to an empty event.
    ///
    /// # Errors
    ///
    /// Returns [`ThresholdError::MalformedInput`] with the decoder's message.
    ///
    /// # Examples
    ///
    /// ```
    /// use threshold_server::event::PullRequestEvent;
    ///
    /// let event = PullRequestEvent::parse(br#"{"action": "closed"}"#).unwrap();
    /// assert_eq!(event.action.as_deref(), Some("closed"));
    /// assert!(PullRequestEvent::parse(b"null").unwrap().action.is_none());
    /// assert!(PullRequestEvent::parse(b"{not json").is_err());
    /// ```
    pub fn parse(body: &[u8]) -> Result<Self, ThresholdError> {
        serde_json::from_slice::<Option<Self>>(body)
            .map(Option::unwrap_or_default)
            .map_err(|e| ThresholdError::MalformedInput(e.to_string()))
    }

    /// Decide whether this delivery should be evaluated.
    ///
    /// Payloads without a pull request, without an action, or with the
    /// `closed` action are ignored before any pull request field is looked at.
    ///
    /// # Errors
    ///
    /// Returns [`ThresholdError::MalformedInput`] naming the first missing
    /// field of a delivery that would otherwise be evaluated.
    pub fn into_delivery(self) -> Result<Delivery, ThresholdError> {
        let Some(pr) = self.pull_request else {
            return Ok(Delivery::Ignored("payload carries no pull request".into()));
        };

        match self.action.as_deref() {
            None => return Ok(Delivery::Ignored("payload carries no action".into())),
            Some("closed") => {
                let reason = match self.number.or(pr.number) {
                    Some(number) => format!("pull request #{number} was closed"),
                    None => "pull request was closed".to_string(),
                };
                return Ok(Delivery::Ignored(reason));
            }
            Some(_) => {}
        }

        let number = require(self.number.or(pr.number), "pull_request.number")?;
        let state = require(pr.state, "pull_request.state")?;
        let changed_files = require(pr.changed_files, "pull_request.changed_files")?;
        let head_sha = require(pr.head.and_then(|h| h.sha), "pull_request.head.sha")?;
        let (base_owner, base_repo) = require(
            pr.base.and_then(|b| b.repo).and_then(RepositoryPayload::coordinates),
            "pull_request.base.repo",
        )?;
        let (owner, repo) = self
            .repository
            .and_then(RepositoryPayload::coordinates)
            .unwrap_or_else(|| (base_owner.clone(), base_repo.clone()));

        Ok(Delivery::Evaluate(PullRequestSnapshot {
            owner,
            repo,
            number,
            head_sha,
            base_owner,
            base_repo,
            state,
            url: pr.html_url.unwrap_or_default(),
            changed_files,
        }))
    }
}
