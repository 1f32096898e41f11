use std::path::PathBuf;

/// Errors that can occur across the threshold crates.
///
/// Library crates return this type directly; the binary converts it to a
/// `miette` diagnostic at the boundary, and the webhook handler maps it to an
/// HTTP status code.
///
/// # Examples
///
/// ```
/// use threshold_core::ThresholdError;
///
/// let err = ThresholdError::InvalidState("pending".into());
/// assert!(err.to_string().contains("pending"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ThresholdError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// The webhook payload could not be decoded.
    #[error("problem decoding webhook payload: {0}")]
    MalformedInput(String),

    /// A commit state outside `success` / `failure` was requested.
    #[error("invalid commit state '{0}', expected 'success' or 'failure'")]
    InvalidState(String),

    /// A call to the source-control host failed.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A required file was not found.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ThresholdError = io_err.into();
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn invalid_state_names_the_value() {
        let err = ThresholdError::InvalidState("pending".into());
        assert_eq!(
            err.to_string(),
            "invalid commit state 'pending', expected 'success' or 'failure'"
        );
    }

    #[test]
    fn malformed_input_keeps_decoder_text() {
        let err = ThresholdError::MalformedInput("expected value at line 1 column 1".into());
        assert!(err.to_string().starts_with("problem decoding webhook payload"));
        assert!(err.to_string().contains("line 1 column 1"));
    }

    #[test]
    fn file_not_found_shows_path() {
        let err = ThresholdError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert!(err.to_string().contains("/tmp/missing.toml"));
    }
}
