//! Sequential lookup-then-upload orchestration.

use super::ExistingAssetPolicy;
use crate::artifact::Artifact;
use crate::config::PublishConfig;
use crate::error::Result;
use crate::github::{ReleaseTarget, ReleasesClient, UploadedAsset};
use crate::handoff::StepOutputs;
use crate::version::ReleaseTag;

/// Release resolved for the triggering reference
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Derived tag and version
    pub tag: ReleaseTag,
    /// Upload target returned by the API
    pub target: ReleaseTarget,
    /// Outputs for the next step
    pub outputs: StepOutputs,
}

/// How the upload step ended
#[derive(Debug, Clone)]
pub enum PublishOutcome {
    /// Asset was uploaded
    Uploaded {
        /// Asset as reported by the upload endpoint, if its reply was readable
        asset: Option<UploadedAsset>,
        /// Whether an existing asset was deleted first
        replaced: bool,
    },
    /// Asset already present and the skip policy applied
    SkippedExisting {
        /// ID of the asset left in place
        asset_id: u64,
    },
    /// Dry run: nothing was uploaded or deleted
    DryRun {
        /// Whether the release already carries the asset
        asset_exists: bool,
    },
}

/// Result of a publishing run
#[derive(Debug, Clone)]
pub struct PublishReport {
    /// Derived tag and version
    pub tag: ReleaseTag,
    /// Upload target
    pub target: ReleaseTarget,
    /// Archive that was (or would have been) uploaded
    pub artifact: Artifact,
    /// Outputs for the next step
    pub outputs: StepOutputs,
    /// Upload result
    pub outcome: PublishOutcome,
}

/// Release asset publisher
pub struct Publisher {
    config: PublishConfig,
    client: ReleasesClient,
}

impl Publisher {
    /// Create a publisher, validating the configuration first
    pub fn new(config: PublishConfig) -> Result<Self> {
        config.validate()?;
        let client = ReleasesClient::new(&config)?;
        Ok(Self { config, client })
    }

    /// Derive the tag and look up its release
    pub async fn resolve(&self) -> Result<Resolution> {
        let tag = ReleaseTag::from_ref(&self.config.reference)?;
        log::debug!(
            "Reference {} -> tag {}, version {}",
            self.config.reference,
            tag.ref_tag,
            tag.version
        );
        if !tag.is_semver() {
            log::warn!(
                "Version '{}' derived from tag '{}' is not a semantic version",
                tag.version,
                tag.ref_tag
            );
        }

        let target = self.client.get_release_by_tag(&tag.ref_tag).await?;
        let outputs = StepOutputs {
            upload_url: target.upload_url.clone(),
            tag_name: tag.version.clone(),
        };

        Ok(Resolution {
            tag,
            target,
            outputs,
        })
    }

    /// Resolve the release and upload the archive to it
    pub async fn publish(&self) -> Result<PublishReport> {
        let package = self.config.require_package()?;
        let Resolution {
            tag,
            target,
            outputs,
        } = self.resolve().await?;

        let artifact = Artifact::locate(
            &self.config.dist_dir,
            package,
            &tag.version,
            self.config.content_type.as_deref(),
        )?;

        let existing = target.find_asset(&artifact.asset_name).cloned();
        if let Some(asset) = &existing {
            log::info!(
                "Release {} already has {} (id {}), policy: {}",
                target.tag_name,
                asset.name,
                asset.id,
                self.config.on_existing
            );
        }

        let outcome = if self.config.dry_run {
            log::info!("Dry run: skipping upload of {}", artifact.asset_name);
            PublishOutcome::DryRun {
                asset_exists: existing.is_some(),
            }
        } else {
            match (self.config.on_existing, existing) {
                (ExistingAssetPolicy::Skip, Some(asset)) => {
                    PublishOutcome::SkippedExisting { asset_id: asset.id }
                }
                (ExistingAssetPolicy::Replace, Some(asset)) => {
                    self.client.delete_asset(asset.id, &asset.name).await?;
                    let uploaded = self.upload(&target, &artifact).await?;
                    PublishOutcome::Uploaded {
                        asset: uploaded,
                        replaced: true,
                    }
                }
                _ => {
                    let uploaded = self.upload(&target, &artifact).await?;
                    PublishOutcome::Uploaded {
                        asset: uploaded,
                        replaced: false,
                    }
                }
            }
        };

        Ok(PublishReport {
            tag,
            target,
            artifact,
            outputs,
            outcome,
        })
    }

    async fn upload(&self, target: &ReleaseTarget, artifact: &Artifact) -> Result<Option<UploadedAsset>> {
        let content = artifact.read().await?;
        self.client
            .upload_asset(target, artifact, content, self.config.label.as_deref())
            .await
    }
}
