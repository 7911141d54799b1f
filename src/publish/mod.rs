//! Release asset publishing.
//!
//! Resolves the upload target for the release named by the triggering
//! reference and attaches the prebuilt archive to it. Every step runs once,
//! in order; the first failure ends the run.

mod publisher;

pub use publisher::{PublishOutcome, PublishReport, Publisher, Resolution};

/// What to do when the release already carries an asset with the same name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ExistingAssetPolicy {
    /// Upload anyway and let the provider reject the duplicate
    #[default]
    Fail,
    /// Leave the existing asset in place and succeed without uploading
    Skip,
    /// Delete the existing asset, then upload
    Replace,
}

impl std::fmt::Display for ExistingAssetPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Fail => "fail",
            Self::Skip => "skip",
            Self::Replace => "replace",
        };
        f.write_str(name)
    }
}
