//! Handler for the `config` command group.

use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Execute `config validate`.
pub fn execute_validate(path: &Path) -> Result<()> {
    let config = Config::load(path)?;

    if output::is_json() {
        output::result(json!({
            "valid": true,
            "path": path.display().to_string(),
            "chainId": config.chain.chain_id,
            "market": config.chain.market,
            "vault": config.chain.vault,
        }));
        return Ok(());
    }

    output::success("Configuration is valid");
    output::field("Path", path.display());
    output::field("Chain ID", config.chain.chain_id);
    output::field("Market", config.chain.market);
    output::field("Vault", config.chain.vault);
    output::field("Gas limit", config.chain.gas_limit);
    output::field(
        "Domain",
        format!("{} v{}", config.signing.domain_name, config.signing.domain_version),
    );
    Ok(())
}
