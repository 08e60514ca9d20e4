use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "issue-bridge")]
#[command(about = "Turn chat support requests into tracker issues", version)]
#[command(after_help = "EXAMPLES:
    issue-bridge init                   Write a config file interactively
    issue-bridge serve                  Start the webhook server
    issue-bridge serve --port 8080      Start on a specific port")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Print the full error chain on failure
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the webhook server
    #[command(after_help = "EXAMPLES:
    issue-bridge serve
    issue-bridge serve --port 8080
    issue-bridge serve --config ./bridge.toml
    GITHUB_TOKEN=... GITHUB_REPO_OWNER=acme GITHUB_REPO_NAME=support issue-bridge serve")]
    Serve(ServeArgs),
    /// Initialize configuration file interactively
    #[command(after_help = "EXAMPLES:
    issue-bridge init
    issue-bridge init --config ./bridge.toml")]
    Init {
        /// Write to this path instead of the default config location
        #[arg(long, short)]
        config: Option<PathBuf>,
    },
    /// Generate shell completions
    #[command(after_help = "EXAMPLES:
    issue-bridge completions bash > ~/.bash_completion.d/issue-bridge
    issue-bridge completions zsh > ~/.zfunc/_issue-bridge
    issue-bridge completions fish > ~/.config/fish/completions/issue-bridge.fish")]
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on (overrides PORT and the config file)
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Path to config file (default: platform config dir)
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}
