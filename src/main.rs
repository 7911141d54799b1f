//! Release Asset Publisher - attach a built archive to a published GitHub release.
//!
//! Intended to run as a pipeline step after the package build. The exit status
//! tells the pipeline whether the asset was published.

use release_asset_publisher::cli;
use release_asset_publisher::cli::OutputManager;
use std::process;

#[tokio::main]
async fn main() {
    env_logger::init();

    match cli::run().await {
        Ok(exit_code) => {
            process::exit(exit_code);
        }
        Err(e) => {
            // Never quiet for fatal errors
            let output = OutputManager::new(false, false);
            output.error(&format!("Fatal error: {e}"));

            for suggestion in e.recovery_suggestions() {
                output.error_indent(&format!("• {suggestion}"));
            }

            process::exit(e.exit_code());
        }
    }
}
