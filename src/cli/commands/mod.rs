//! Command execution functions.
//!
//! Each command returns `Result<()>`; this module turns the result into a
//! process exit status and prints failures with recovery suggestions.

mod publish;
mod resolve;

use crate::cli::{Args, Command, RuntimeConfig};
use crate::config::EnvConfig;
use crate::error::{CONFIG_EXIT_CODE, Result};

use publish::execute_publish;
use resolve::execute_resolve;

/// Execute the command given on the command line
pub async fn execute_command(args: Args) -> Result<i32> {
    if let Err(validation_error) = args.validate() {
        // Never quiet for validation errors
        let output = super::OutputManager::new(false, false);
        output.error(&format!("Invalid arguments: {}", validation_error));
        return Ok(CONFIG_EXIT_CODE);
    }

    let config = RuntimeConfig::from(&args);
    let env = EnvConfig::from_process();

    let result = match &args.command {
        Command::Publish { .. } => execute_publish(&args, &env, &config).await,
        Command::Resolve { .. } => execute_resolve(&args, &env, &config).await,
    };

    match result {
        Ok(()) => Ok(0),
        Err(e) => {
            log::debug!("Command '{}' failed: {:?}", args.command.name(), e);
            config.error_println(&format!("Command '{}' failed: {}", args.command.name(), e));

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                config.output().error_indent("Recovery suggestions:");
                for suggestion in suggestions {
                    config.output().error_indent(&format!("  • {}", suggestion));
                }
            }

            Ok(e.exit_code())
        }
    }
}
