//! Command line argument parsing and validation.
//!
//! Every flag the pipeline normally supplies through the environment also
//! accepts the runner's variable (`GITHUB_REF`, `GITHUB_REPOSITORY`, ...), so
//! the binary can run in a workflow step without arguments beyond the package.

use crate::config::{DEFAULT_API_URL, EnvConfig, PublishConfig, RepoSlug};
use crate::error::{ConfigError, Result};
use crate::publish::ExistingAssetPolicy;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Attach a prebuilt archive to a published GitHub release
#[derive(Parser, Debug)]
#[command(
    name = "release_asset_publisher",
    version,
    about = "Attach a prebuilt archive to a published GitHub release",
    long_about = "Resolve the GitHub release for the triggering tag and upload the
package's source archive to it.

Usage:
  release_asset_publisher publish --package manim
  release_asset_publisher publish --package manim --ref refs/tags/v0.19.0 --repo ManimCommunity/manim
  release_asset_publisher resolve --ref refs/tags/v0.19.0 --repo ManimCommunity/manim"
)]
pub struct Args {
    /// Command to run
    #[command(subcommand)]
    pub command: Command,

    /// Show detailed progress
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Look up the release and upload the archive to it
    Publish {
        /// Release lookup settings
        #[command(flatten)]
        target: TargetArgs,
        /// Upload settings
        #[command(flatten)]
        upload: UploadArgs,
    },
    /// Look up the release and emit its outputs without uploading
    Resolve {
        /// Release lookup settings
        #[command(flatten)]
        target: TargetArgs,
    },
}

impl Command {
    /// Command name for messages
    pub fn name(&self) -> &'static str {
        match self {
            Command::Publish { .. } => "publish",
            Command::Resolve { .. } => "resolve",
        }
    }
}

/// Settings shared by every command
#[derive(clap::Args, Debug, Clone)]
pub struct TargetArgs {
    /// Triggering reference, e.g. refs/tags/v1.2.3
    #[arg(long = "ref", value_name = "REF", env = "GITHUB_REF")]
    pub reference: Option<String>,

    /// Repository as owner/repo
    #[arg(long, value_name = "OWNER/REPO", env = "GITHUB_REPOSITORY")]
    pub repo: Option<String>,

    /// Releases API base URL
    #[arg(long, value_name = "URL", env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// API token (defaults to GITHUB_TOKEN, then GH_TOKEN)
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// File receiving step outputs (stdout when unset)
    #[arg(long, value_name = "PATH", env = "GITHUB_OUTPUT")]
    pub github_output: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

/// Settings for the upload step
#[derive(clap::Args, Debug, Clone)]
pub struct UploadArgs {
    /// Package name; the archive is <package>-<version>.tar.gz
    #[arg(long, env = "RELEASE_PACKAGE")]
    pub package: String,

    /// Directory holding the built archive
    #[arg(long, value_name = "DIR", default_value = "dist")]
    pub dist_dir: PathBuf,

    /// Content type declared for the upload (detected from the extension by default)
    #[arg(long, value_name = "MIME")]
    pub content_type: Option<String>,

    /// Label shown for the asset on the release page
    #[arg(long)]
    pub label: Option<String>,

    /// Behavior when the release already carries an asset with the same name
    #[arg(long, value_enum, default_value_t = ExistingAssetPolicy::Fail)]
    pub on_existing: ExistingAssetPolicy,

    /// Resolve and check everything, but do not upload or delete
    #[arg(long)]
    pub dry_run: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Command::Publish { upload, .. } = &self.command {
            if upload.package.trim().is_empty() {
                return Err("--package must not be empty".to_string());
            }
            if upload.content_type.as_deref().is_some_and(|c| !c.contains('/')) {
                return Err("--content-type must look like type/subtype".to_string());
            }
        }
        if self.target().timeout == Some(0) {
            return Err("--timeout must be greater than zero".to_string());
        }
        Ok(())
    }

    /// Lookup settings of whichever command was given
    pub fn target(&self) -> &TargetArgs {
        match &self.command {
            Command::Publish { target, .. } | Command::Resolve { target } => target,
        }
    }

    /// Build the run configuration, filling gaps from the environment
    pub fn to_publish_config(&self, env: &EnvConfig) -> Result<PublishConfig> {
        let target = self.target();

        let repo = target.repo.as_deref().ok_or_else(|| ConfigError::MissingValue {
            name: "--repo (GITHUB_REPOSITORY)".to_string(),
        })?;
        let reference = target
            .reference
            .as_deref()
            .ok_or_else(|| ConfigError::MissingValue {
                name: "--ref (GITHUB_REF)".to_string(),
            })?;
        let token = env.resolve_token(target.token.as_deref())?;

        let mut config = PublishConfig::new(RepoSlug::parse(repo)?, token, reference);
        config.api_url = target.api_url.clone();
        config.timeout = target.timeout.map(Duration::from_secs);
        config.output_file = target.github_output.clone();

        if let Command::Publish { upload, .. } = &self.command {
            config.package = Some(upload.package.clone());
            config.dist_dir = upload.dist_dir.clone();
            config.content_type = upload.content_type.clone();
            config.label = upload.label.clone();
            config.on_existing = upload.on_existing;
            config.dry_run = upload.dry_run;
        }

        Ok(config)
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.verbose, args.quiet),
        }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print informational message
    pub fn info_println(&self, message: &str) {
        self.output.info(message);
    }

    /// Print verbose message
    pub fn verbose_println(&self, message: &str) {
        self.output.verbose(message);
    }

    /// Print error message (always shown)
    pub fn error_println(&self, message: &str) {
        self.output.error(message);
    }

    /// Print warning message
    pub fn warning_println(&self, message: &str) {
        self.output.warn(message);
    }

    /// Print success message
    pub fn success_println(&self, message: &str) {
        self.output.success(message);
    }

    /// Print indented text
    pub fn indent(&self, message: &str) {
        self.output.indent(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PublishError;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn publish_flags_map_to_config() {
        let args = parse(&[
            "release_asset_publisher",
            "publish",
            "--ref",
            "refs/tags/v0.19.0",
            "--repo",
            "ManimCommunity/manim",
            "--token",
            "secret",
            "--package",
            "manim",
            "--on-existing",
            "skip",
            "--dry-run",
            "--timeout",
            "30",
        ]);
        assert!(args.validate().is_ok());

        let config = args.to_publish_config(&EnvConfig::default()).unwrap();
        assert_eq!(config.repo.owner, "ManimCommunity");
        assert_eq!(config.reference, "refs/tags/v0.19.0");
        assert_eq!(config.package.as_deref(), Some("manim"));
        assert_eq!(config.dist_dir, PathBuf::from("dist"));
        assert_eq!(config.on_existing, ExistingAssetPolicy::Skip);
        assert!(config.dry_run);
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn resolve_needs_no_package() {
        let args = parse(&[
            "release_asset_publisher",
            "resolve",
            "--ref",
            "refs/tags/v1.0.0",
            "--repo",
            "o/r",
        ]);
        let env = EnvConfig::from_pairs([("GH_TOKEN", "from-env")]);
        let config = args.to_publish_config(&env).unwrap();
        assert_eq!(config.token, "from-env");
        assert!(config.package.is_none());
    }

    #[test]
    fn missing_token_is_config_error() {
        let args = parse(&[
            "release_asset_publisher",
            "resolve",
            "--ref",
            "refs/tags/v1.0.0",
            "--repo",
            "o/r",
        ]);
        assert!(matches!(
            args.to_publish_config(&EnvConfig::default()),
            Err(PublishError::Config(ConfigError::MissingToken))
        ));
    }

    #[test]
    fn rejects_zero_timeout() {
        let args = parse(&[
            "release_asset_publisher",
            "resolve",
            "--ref",
            "refs/tags/v1.0.0",
            "--timeout",
            "0",
        ]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        assert!(
            Args::try_parse_from(["release_asset_publisher", "-v", "-q", "resolve"]).is_err()
        );
    }
}
