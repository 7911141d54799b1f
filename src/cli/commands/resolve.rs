//! Resolve command implementation.
//!
//! Looks up the release and emits `upload_url` and `tag_name` for a later
//! step, without touching any asset.

use crate::cli::{Args, RuntimeConfig};
use crate::config::EnvConfig;
use crate::error::Result;
use crate::handoff::HandoffTarget;
use crate::publish::Publisher;

/// Execute resolve command
pub(super) async fn execute_resolve(
    args: &Args,
    env: &EnvConfig,
    config: &RuntimeConfig,
) -> Result<()> {
    let publish_config = args.to_publish_config(env)?;
    let handoff = HandoffTarget::from_path(publish_config.output_file.clone());

    let publisher = Publisher::new(publish_config)?;
    let resolution = publisher.resolve().await?;

    config.info_println(&format!(
        "Release {} resolved, {} asset(s) attached",
        resolution.tag.ref_tag,
        resolution.target.assets.len()
    ));
    config.verbose_println(&format!("upload_url: {}", resolution.outputs.upload_url));

    resolution.outputs.write(&handoff)?;
    Ok(())
}
