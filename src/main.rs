mod assign;
mod bridge;
mod cli;
mod client;
mod commands;
mod config;
mod error;
mod format;
mod logging;
mod server;
mod types;
mod validate;

use std::io;

use clap::{CommandFactory, Parser};
use clap_complete::generate;

use cli::{Cli, Commands};
use config::Config;
use error::Result;
use std::error::Error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");

        if verbose {
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("Caused by: {cause}");
                source = std::error::Error::source(cause);
            }
        }

        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "issue-bridge", &mut io::stdout());
        }
        Commands::Init { config } => {
            commands::init::run(config).await?;
        }
        Commands::Serve(args) => {
            let config = Config::load(args.config.as_deref())?;
            let settings = config.settings(args.port)?;

            logging::init(settings.log_format);
            server::serve(&settings).await?;
        }
    }

    Ok(())
}
