//! Threshold evaluation.

use crate::config::ThresholdConfig;
use crate::types::{PullRequestSnapshot, Violation};

/// Check a pull request against the configured thresholds.
///
/// Returns one [`Violation`] per exceeded threshold, in a fixed order. An
/// empty result means the pull request passes. Only the changed-file count
/// is checked.
///
/// # Examples
///
/// ```
/// use threshold_core::{evaluate, PullRequestSnapshot, ThresholdConfig};
///
/// let pr = PullRequestSnapshot {
///     owner: "o".into(),
///     repo: "r".into(),
///     number: 1,
///     head_sha: "abc".into(),
///     base_owner: "o".into(),
///     base_repo: "r".into(),
///     state: "open".into(),
///     url: String::new(),
///     changed_files: 50,
/// };
/// let cfg = ThresholdConfig { max_files: 10, ..ThresholdConfig::default() };
///
/// let violations = evaluate(&pr, &cfg);
/// assert_eq!(violations.len(), 1);
/// assert_eq!(
///     violations[0].message(),
///     "50 files were changed, but the threshold is 10"
/// );
/// ```
pub fn evaluate(pr: &PullRequestSnapshot, cfg: &ThresholdConfig) -> Vec<Violation> {
    let mut violations = Vec::new();

    if cfg.max_files != 0 && pr.changed_files > cfg.max_files {
        violations.push(Violation::new(format!(
            "{} files were changed, but the threshold is {}",
            pr.changed_files, cfg.max_files
        )));
    }

    violations
}
