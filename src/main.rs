use clap::Parser;
use lmsr_settlement::adapter::inbound::cli::{self, command::Cli, output};

fn main() {
    let _ = dotenvy::dotenv();

    let args = Cli::parse();
    output::configure(output::OutputConfig::new(args.json, args.quiet));

    if let Err(e) = cli::execute(&args.command) {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
