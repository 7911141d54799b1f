//! # Release Asset Publisher
//!
//! Attach a prebuilt source archive to a published GitHub release.
//!
//! When a release is published, the pipeline builds `<package>-<version>.tar.gz`
//! and runs this tool. It derives the tag and version from the triggering
//! reference, looks the release up through the releases API, uploads the
//! archive to the release's upload endpoint and hands `upload_url` and
//! `tag_name` to the next step.
//!
//! ## Usage
//!
//! ```bash
//! release_asset_publisher publish --package manim
//! release_asset_publisher publish --package manim --on-existing skip
//! release_asset_publisher resolve --ref refs/tags/v0.19.0 --repo ManimCommunity/manim
//! ```
//!
//! Each step runs exactly once and any failure aborts the run with a
//! non-zero exit status.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod artifact;
pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod handoff;
pub mod publish;
pub mod version;

// Re-export main types for public API
pub use artifact::Artifact;
pub use cli::Args;
pub use config::{EnvConfig, PublishConfig, RepoSlug};
pub use error::{ArtifactError, ConfigError, PublishError, Result};
pub use github::{ReleaseTarget, ReleasesClient};
pub use handoff::{HandoffTarget, StepOutputs};
pub use publish::{ExistingAssetPolicy, PublishOutcome, PublishReport, Publisher, Resolution};
pub use version::ReleaseTag;
