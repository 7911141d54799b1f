//! Error types for release asset publishing.
//!
//! This module defines all error types with actionable error messages and recovery suggestions.
//! Every error is fatal for the run: nothing is retried and the binary maps each
//! variant to a distinct non-zero exit status.

use std::path::PathBuf;
use thiserror::Error;

/// Exit status for configuration and argument errors
pub const CONFIG_EXIT_CODE: i32 = 6;

/// Result type alias for publisher operations
pub type Result<T> = std::result::Result<T, PublishError>;

/// Main error type for all publisher operations
#[derive(Error, Debug)]
pub enum PublishError {
    /// No release matched the tag, or the lookup request was rejected
    #[error("Release lookup failed for tag '{tag}'{}: {reason}", status_suffix(.status))]
    Lookup {
        /// Tag that was looked up
        tag: String,
        /// HTTP status returned by the API, if a response was received
        status: Option<u16>,
        /// Reason for the error
        reason: String,
    },

    /// The releases API answered with an unexpected payload shape
    #[error("Unexpected releases API response: {reason}")]
    Schema {
        /// Reason for the error
        reason: String,
    },

    /// The asset upload (or the delete preceding a replace) did not succeed
    #[error("Upload of '{asset}' failed{}: {reason}", status_suffix(.status))]
    Upload {
        /// Asset name
        asset: String,
        /// HTTP status returned by the upload endpoint, if any
        status: Option<u16>,
        /// Reason for the error
        reason: String,
    },

    /// Local artifact errors
    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP {code})"),
        None => String::new(),
    }
}

/// Errors about the prebuilt archive on disk
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// Archive not present at the expected location
    #[error("Artifact not found at {path}")]
    NotFound {
        /// Expected archive path
        path: PathBuf,
    },

    /// Path exists but is not a regular file
    #[error("Artifact path {path} is not a regular file")]
    NotAFile {
        /// Offending path
        path: PathBuf,
    },

    /// Archive could not be read
    #[error("Failed to read artifact {path}: {source}")]
    ReadFailed {
        /// Archive path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

/// Configuration errors raised before any network call
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No API token could be found
    #[error("GitHub token not provided. Set GITHUB_TOKEN or GH_TOKEN, or pass --token")]
    MissingToken,

    /// A required value is absent
    #[error("Missing required value: {name}")]
    MissingValue {
        /// Name of the value (flag or environment variable)
        name: String,
    },

    /// Reference string cannot yield a tag
    #[error("Invalid reference '{reference}': {reason}")]
    InvalidReference {
        /// Reference as supplied
        reference: String,
        /// Reason for the error
        reason: String,
    },

    /// Repository slug is not `owner/repo`
    #[error("Invalid repository '{repo}'. Expected: owner/repo")]
    InvalidRepository {
        /// Repository as supplied
        repo: String,
    },

    /// URL could not be parsed
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// URL as supplied
        url: String,
        /// Reason for the error
        reason: String,
    },

    /// HTTP client construction failed
    #[error("Failed to build HTTP client: {reason}")]
    HttpClient {
        /// Reason for the error
        reason: String,
    },
}

impl PublishError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            PublishError::Lookup {
                status: Some(404),
                tag,
                ..
            } => vec![
                format!("Check that a release exists for tag '{}'", tag),
                "Draft releases are not visible through the tag endpoint; publish the release first"
                    .to_string(),
            ],
            PublishError::Lookup {
                status: Some(401 | 403),
                ..
            } => vec![
                "Verify the token is valid and has 'contents: write' permission".to_string(),
                "Check that the token can access the target repository".to_string(),
            ],
            PublishError::Schema { .. } => vec![
                "Verify --api-url points at a GitHub-compatible releases API".to_string(),
            ],
            PublishError::Upload {
                status: Some(422),
                ..
            } => vec![
                "An asset with this name is probably already attached to the release".to_string(),
                "Re-run with --on-existing skip or --on-existing replace".to_string(),
            ],
            PublishError::Artifact(ArtifactError::NotFound { .. }) => vec![
                "Run the package build step before publishing".to_string(),
                "Check --dist-dir and --package match the build output".to_string(),
            ],
            PublishError::Config(ConfigError::MissingToken) => vec![
                "Export GITHUB_TOKEN in the workflow step environment".to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }

    /// Check if this error is recoverable by simply running again
    ///
    /// Informational only: the publisher never retries on its own.
    pub fn is_recoverable(&self) -> bool {
        match self {
            PublishError::Lookup { status, .. } | PublishError::Upload { status, .. } => {
                matches!(status, None | Some(500..=599))
            }
            _ => false,
        }
    }

    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            PublishError::Lookup { .. } => 2,
            PublishError::Schema { .. } => 3,
            PublishError::Upload { .. } => 4,
            PublishError::Artifact(_) => 5,
            PublishError::Config(_) => CONFIG_EXIT_CODE,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_message_includes_status() {
        let err = PublishError::Lookup {
            tag: "v1.0.0".to_string(),
            status: Some(404),
            reason: "Not Found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Release lookup failed for tag 'v1.0.0' (HTTP 404): Not Found"
        );
        assert_eq!(err.exit_code(), 2);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn transport_failures_are_recoverable() {
        let err = PublishError::Upload {
            asset: "pkg-1.0.0.tar.gz".to_string(),
            status: None,
            reason: "connection reset".to_string(),
        };
        assert!(err.is_recoverable());
        assert_eq!(err.to_string(), "Upload of 'pkg-1.0.0.tar.gz' failed: connection reset");
    }

    #[test]
    fn duplicate_upload_suggests_policy() {
        let err = PublishError::Upload {
            asset: "pkg-1.0.0.tar.gz".to_string(),
            status: Some(422),
            reason: "already_exists".to_string(),
        };
        assert!(err
            .recovery_suggestions()
            .iter()
            .any(|s| s.contains("--on-existing")));
    }
}
