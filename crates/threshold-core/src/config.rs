use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ThresholdError;

/// Top-level configuration loaded from `.threshold.toml`.
///
/// Supports layered resolution: CLI flags > env vars > local config > defaults.
/// Built once before the listener starts and never mutated afterwards.
///
/// # Examples
///
/// ```
/// use threshold_core::Config;
///
/// let config = Config::default();
/// assert_eq!(config.thresholds.max_files, 0);
/// assert!(!config.thresholds.strict);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Source-control host settings.
    #[serde(default)]
    pub github: GitHubConfig,
    /// Complexity thresholds and reaction policy.
    #[serde(default)]
    pub thresholds: ThresholdConfig,
}

impl Config {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ThresholdError::FileNotFound`] if the file does not exist,
    /// [`ThresholdError::Io`] if it cannot be read, or
    /// [`ThresholdError::Toml`] if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use threshold_core::Config;
    /// use std::path::Path;
    ///
    /// let config = Config::from_file(Path::new(".threshold.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, ThresholdError> {
        if !path.exists() {
            return Err(ThresholdError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ThresholdError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use threshold_core::Config;
    ///
    /// let toml = r#"
    /// [thresholds]
    /// max_files = 25
    /// strict = true
    /// "#;
    /// let config = Config::from_toml(toml).unwrap();
    /// assert_eq!(config.thresholds.max_files, 25);
    /// assert!(config.thresholds.strict);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, ThresholdError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Overlay values from the process environment.
    ///
    /// Reads `THRESHOLD_HOST`, then `GITHUB_TOKEN` falling back to `GH_TOKEN`.
    /// Empty variables are ignored.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Overlay values from an arbitrary variable lookup.
    ///
    /// # Examples
    ///
    /// ```
    /// use threshold_core::Config;
    ///
    /// let mut config = Config::default();
    /// config.apply_env_from(|key| match key {
    ///     "GH_TOKEN" => Some("ghp_test".to_string()),
    ///     _ => None,
    /// });
    /// assert_eq!(config.github.token.as_deref(), Some("ghp_test"));
    /// ```
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(host) = non_empty("THRESHOLD_HOST") {
            self.github.host = Some(host);
        }
        if let Some(token) = non_empty("GITHUB_TOKEN").or_else(|| non_empty("GH_TOKEN")) {
            self.github.token = Some(token);
        }
    }
}

/// HTTP listener configuration.
///
/// # Examples
///
/// ```
/// use threshold_core::ServerConfig;
///
/// assert_eq!(ServerConfig::default().bind, "127.0.0.1:8080");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on (default: `127.0.0.1:8080`).
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:8080".into()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Source-control host configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// Custom API base URL for self-hosted instances.
    pub host: Option<String>,
    /// Bearer token. Requests are unauthenticated when absent.
    pub token: Option<String>,
}

/// Complexity thresholds and the reaction policy.
///
/// A value of `0` disables a threshold. Only `max_files` is evaluated;
/// `max_commits`, `max_comments` and `max_lines` are accepted but inert.
///
/// # Examples
///
/// ```
/// use threshold_core::ThresholdConfig;
///
/// let config = ThresholdConfig { max_lines: 500, ..ThresholdConfig::default() };
/// assert_eq!(config.inert_thresholds(), vec![("max_lines", 500)]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Maximum number of changed files (0 disables the check).
    #[serde(default)]
    pub max_files: u64,
    /// Reserved, not evaluated.
    #[serde(default)]
    pub max_commits: u64,
    /// Reserved, not evaluated.
    #[serde(default)]
    pub max_comments: u64,
    /// Reserved, not evaluated.
    #[serde(default)]
    pub max_lines: u64,
    /// Close violating pull requests instead of posting a failing status.
    #[serde(default)]
    pub strict: bool,
}

impl ThresholdConfig {
    /// Thresholds that are set to a nonzero value but have no evaluation.
    pub fn inert_thresholds(&self) -> Vec<(&'static str, u64)> {
        [
            ("max_commits", self.max_commits),
            ("max_comments", self.max_comments),
            ("max_lines", self.max_lines),
        ]
        .into_iter()
        .filter(|(_, value)| *value != 0)
        .collect()
    }
}

/// Commented template written by `threshold init`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# threshold configuration

[server]
# bind = "127.0.0.1:8080"

[github]
# API base URL for GitHub Enterprise, e.g. "https://github.example.com/api/v3/"
# host = ""
# Prefer the GITHUB_TOKEN environment variable over storing a token here.
# token = ""

[thresholds]
# Maximum number of changed files per pull request (0 disables the check)
max_files = 0
# Reserved: accepted but not evaluated yet
# max_commits = 0
# max_comments = 0
# max_lines = 0
# Close violating pull requests instead of posting a failing status
strict = false
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert!(config.github.host.is_none());
        assert!(config.github.token.is_none());
        assert_eq!(config.thresholds, ThresholdConfig::default());
    }

    #[test]
    fn parse_full_toml() {
        let toml = r#"
[server]
bind = "0.0.0.0:9000"

[github]
host = "https://github.example.com/api/v3/"
token = "ghp_file"

[thresholds]
max_files = 10
max_lines = 400
strict = true
"#;
        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(
            config.github.host.as_deref(),
            Some("https://github.example.com/api/v3/")
        );
        assert_eq!(config.github.token.as_deref(), Some("ghp_file"));
        assert_eq!(config.thresholds.max_files, 10);
        assert_eq!(config.thresholds.max_lines, 400);
        assert_eq!(config.thresholds.max_commits, 0);
        assert!(config.thresholds.strict);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.thresholds.max_files, 0);
    }

    #[test]
    fn invalid_toml_returns_error() {
        let result = Config::from_toml("{{invalid}}");
        assert!(matches!(result, Err(ThresholdError::Toml(_))));
    }

    #[test]
    fn template_parses_to_defaults() {
        let config = Config::from_toml(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.thresholds, ThresholdConfig::default());
        assert_eq!(config.server.bind, "127.0.0.1:8080");
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".threshold.toml");
        std::fs::write(&path, "[thresholds]\nmax_files = 3\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.thresholds.max_files, 3);
    }

    #[test]
    fn from_file_missing_is_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::from_file(&dir.path().join("nope.toml"));
        assert!(matches!(result, Err(ThresholdError::FileNotFound(_))));
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config =
            Config::from_toml("[github]\nhost = \"https://a/\"\ntoken = \"file\"\n").unwrap();
        config.apply_env_from(|key| match key {
            "THRESHOLD_HOST" => Some("https://b/".into()),
            "GITHUB_TOKEN" => Some("env".into()),
            "GH_TOKEN" => Some("ignored".into()),
            _ => None,
        });
        assert_eq!(config.github.host.as_deref(), Some("https://b/"));
        assert_eq!(config.github.token.as_deref(), Some("env"));
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut config = Config::from_toml("[github]\ntoken = \"file\"\n").unwrap();
        config.apply_env_from(|key| match key {
            "GITHUB_TOKEN" => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.github.token.as_deref(), Some("file"));
    }

    #[test]
    fn inert_thresholds_only_lists_nonzero() {
        let config = ThresholdConfig {
            max_files: 10,
            max_commits: 5,
            max_comments: 0,
            max_lines: 0,
            strict: false,
        };
        assert_eq!(config.inert_thresholds(), vec![("max_commits", 5)]);
        assert!(ThresholdConfig::default().inert_thresholds().is_empty());
    }
}
