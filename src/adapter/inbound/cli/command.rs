//! Command-line interface definitions.
//!
//! Defines the CLI structure for the `lmsr-settlement` binary using `clap`.

use std::path::PathBuf;

use alloy_primitives::Address;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

/// LMSR pricing, question ids and agent custody for prediction markets
#[derive(Parser, Debug)]
#[command(name = "lmsr-settlement")]
#[command(version)]
pub struct Cli {
    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Price a trade against outcome supplies
    Price(PriceArgs),

    /// Derive the question id of a market
    QuestionId(QuestionIdArgs),

    /// Manage trading agents
    #[command(subcommand)]
    Agent(AgentCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Subcommands for `lmsr-settlement agent`.
#[derive(Subcommand, Debug)]
pub enum AgentCommand {
    /// Generate an agent key and print its address and encrypted key.
    New(AgentNewArgs),
}

/// Subcommands for `lmsr-settlement config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Validate a configuration file for correctness.
    Validate(ConfigPathArg),
}

/// Shared argument struct for commands that require only a configuration path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}

/// Arguments for the `price` subcommand.
///
/// Amounts are whole outcome tokens (fractions allowed) and are converted to
/// base units with `--outcome-decimals` before pricing.
#[derive(Parser, Debug)]
pub struct PriceArgs {
    /// Outstanding supply of each outcome, comma separated.
    #[arg(long, value_delimiter = ',', required = true)]
    pub supplies: Vec<Decimal>,

    /// Liquidity parameter `b`.
    #[arg(short, long)]
    pub liquidity: Decimal,

    /// Outcome to trade.
    #[arg(short, long, default_value_t = 0)]
    pub outcome: u32,

    /// Tokens to buy or sell.
    #[arg(long)]
    pub quantity: Decimal,

    /// Price a sell instead of a buy.
    #[arg(long)]
    pub sell: bool,

    /// Outcome token decimals.
    #[arg(long, default_value_t = 18)]
    pub outcome_decimals: u32,

    /// Settlement token decimals.
    #[arg(long, default_value_t = 6)]
    pub usdc_decimals: u32,
}

/// Arguments for the `question-id` subcommand.
#[derive(Parser, Debug)]
pub struct QuestionIdArgs {
    /// Question text, exactly as submitted on market creation.
    #[arg(long)]
    pub question: String,

    /// Creator address.
    #[arg(long)]
    pub creator: Address,

    /// Oracle address.
    #[arg(long)]
    pub oracle: Address,
}

/// Arguments for the `agent new` subcommand.
#[derive(Parser, Debug)]
pub struct AgentNewArgs {
    /// Extra entropy mixed into key generation.
    #[arg(long)]
    pub seed: Option<String>,

    /// Configuration file naming the master secret; defaults apply without it.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
