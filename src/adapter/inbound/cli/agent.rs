//! Handler for the `agent` command group.

use std::sync::Arc;

use crate::adapter::inbound::cli::command::AgentNewArgs;
use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::secret::EnvSecretStore;
use crate::application::agent::AgentService;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Execute `agent new`.
///
/// The master secret is read from the environment under the id named by
/// `[signing] master_secret`.
pub fn execute_new(args: &AgentNewArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    config.init_logging();

    let agents = AgentService::new(&config, Arc::new(EnvSecretStore));
    let agent = agents.provision(args.seed.as_deref().map(str::as_bytes))?;

    if output::is_json() {
        output::result(serde_json::to_value(&agent)?);
        return Ok(());
    }

    output::section("Agent Created");
    output::field("Address", output::highlight(&agent.address));
    output::field("Encrypted key", &agent.encrypted_key);
    output::field("Custody", agent.custody_version);
    output::note("Store the encrypted key; the plaintext key is not retained.");
    Ok(())
}
