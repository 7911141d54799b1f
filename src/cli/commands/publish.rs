//! Publish command implementation.
//!
//! Resolves the release for the triggering tag and uploads the archive.

use crate::cli::{Args, RuntimeConfig};
use crate::config::EnvConfig;
use crate::error::Result;
use crate::handoff::HandoffTarget;
use crate::publish::{PublishOutcome, Publisher};

/// Execute publish command
pub(super) async fn execute_publish(
    args: &Args,
    env: &EnvConfig,
    config: &RuntimeConfig,
) -> Result<()> {
    let publish_config = args.to_publish_config(env)?;
    let handoff = HandoffTarget::from_path(publish_config.output_file.clone());

    config.output().section("Publish release asset");
    config.verbose_println(&format!(
        "Repository {} via {}",
        publish_config.repo, publish_config.api_url
    ));
    config.verbose_println(&format!("Reference {}", publish_config.reference));

    let publisher = Publisher::new(publish_config)?;
    let report = publisher.publish().await?;

    config.info_println(&format!(
        "Release {} (version {})",
        report.tag.ref_tag, report.tag.version
    ));
    if let Some(html_url) = &report.target.html_url {
        config.indent(html_url);
    }
    config.indent(&format!(
        "Artifact: {} ({} bytes, {})",
        report.artifact.path.display(),
        report.artifact.size,
        report.artifact.content_type
    ));

    match &report.outcome {
        PublishOutcome::Uploaded { asset, replaced } => {
            let verb = if *replaced { "Replaced" } else { "Uploaded" };
            config.success_println(&format!("{} {}", verb, report.artifact.asset_name));
            if let Some(url) = asset.as_ref().and_then(|a| a.browser_download_url.as_ref()) {
                config.indent(url);
            }
        }
        PublishOutcome::SkippedExisting { asset_id } => {
            config.warning_println(&format!(
                "{} is already attached (asset {}); skipped upload",
                report.artifact.asset_name, asset_id
            ));
        }
        PublishOutcome::DryRun { asset_exists } => {
            config.warning_println(&format!(
                "Dry run: {} was not uploaded",
                report.artifact.asset_name
            ));
            if *asset_exists {
                config.indent("The release already carries an asset with this name");
            }
        }
    }

    report.outputs.write(&handoff)?;
    Ok(())
}
