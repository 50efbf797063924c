//! Offline operator CLI.
//!
//! Every command runs locally: pricing, id derivation and agent key
//! provisioning need no chain access.

pub mod agent;
pub mod command;
pub mod config;
pub mod output;
pub mod price;
pub mod question;

use self::command::{AgentCommand, Commands, ConfigCommand};
use crate::error::Result;

/// Dispatch a parsed subcommand.
///
/// # Errors
///
/// Returns the handler's error; the caller reports it and exits non-zero.
pub fn execute(command: &Commands) -> Result<()> {
    match command {
        Commands::Price(args) => price::execute(args),
        Commands::QuestionId(args) => {
            question::execute(args);
            Ok(())
        }
        Commands::Agent(AgentCommand::New(args)) => agent::execute_new(args),
        Commands::Config(ConfigCommand::Validate(args)) => config::execute_validate(&args.config),
    }
}
