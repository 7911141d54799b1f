//! Run configuration assembled from arguments and the process environment.

use crate::error::{ConfigError, Result};
use crate::publish::ExistingAssetPolicy;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Default releases API base
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Snapshot of the process environment
///
/// Captured once at startup so lookups stay consistent for the whole run and
/// tests can supply their own variables.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    vars: HashMap<String, String>,
}

impl EnvConfig {
    /// Capture the current process environment
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Build from explicit pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Get a non-empty variable
    pub fn get(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .filter(|v| !v.trim().is_empty())
            .cloned()
    }

    /// Resolve the API token: explicit value, then `GITHUB_TOKEN`, then `GH_TOKEN`
    pub fn resolve_token(&self, explicit: Option<&str>) -> Result<String> {
        explicit
            .filter(|t| !t.trim().is_empty())
            .map(str::to_string)
            .or_else(|| self.get("GITHUB_TOKEN"))
            .or_else(|| self.get("GH_TOKEN"))
            .ok_or_else(|| ConfigError::MissingToken.into())
    }
}

/// Repository identified as `owner/repo`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
}

impl RepoSlug {
    /// Parse `owner/repo`
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        match input.split_once('/') {
            Some((owner, repo))
                if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') =>
            {
                Ok(Self {
                    owner: owner.to_string(),
                    repo: repo.trim_end_matches(".git").to_string(),
                })
            }
            _ => Err(ConfigError::InvalidRepository {
                repo: input.to_string(),
            }
            .into()),
        }
    }
}

impl std::fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Validated configuration for one publishing run
#[derive(Debug, Clone)]
pub struct PublishConfig {
    /// Releases API base URL
    pub api_url: String,
    /// Target repository
    pub repo: RepoSlug,
    /// API token
    pub token: String,
    /// Triggering reference, e.g. `refs/tags/v1.2.3`
    pub reference: String,
    /// Package name used in the artifact file name; only needed for uploads
    pub package: Option<String>,
    /// Directory holding the built archive
    pub dist_dir: PathBuf,
    /// Content type override for the upload
    pub content_type: Option<String>,
    /// Optional asset label shown on the release page
    pub label: Option<String>,
    /// What to do when the release already carries the asset
    pub on_existing: ExistingAssetPolicy,
    /// Perform lookups only, never upload or delete
    pub dry_run: bool,
    /// Per-request timeout; the HTTP client default applies when unset
    pub timeout: Option<Duration>,
    /// File receiving the step outputs; stdout when unset
    pub output_file: Option<PathBuf>,
}

impl PublishConfig {
    /// Create a configuration with defaults for the optional settings
    pub fn new(repo: RepoSlug, token: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            repo,
            token: token.into(),
            reference: reference.into(),
            package: None,
            dist_dir: PathBuf::from("dist"),
            content_type: None,
            label: None,
            on_existing: ExistingAssetPolicy::default(),
            dry_run: false,
            timeout: None,
            output_file: None,
        }
    }

    /// Package name, required before anything is uploaded
    pub fn require_package(&self) -> Result<&str> {
        self.package
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                ConfigError::MissingValue {
                    name: "--package (RELEASE_PACKAGE)".to_string(),
                }
                .into()
            })
    }

    /// Check values that would otherwise fail late
    pub fn validate(&self) -> Result<()> {
        if self.reference.trim().is_empty() {
            return Err(ConfigError::MissingValue {
                name: "--ref (GITHUB_REF)".to_string(),
            }
            .into());
        }
        url::Url::parse(&self.api_url).map_err(|e| ConfigError::InvalidUrl {
            url: self.api_url.clone(),
            reason: e.to_string(),
        })?;
        Ok(())
    }
}
