//! CLI module - command definitions and handlers

mod config_cmd;
mod filter;
mod state_cmd;

use clap::{Parser, Subcommand};

use crate::config::{Config, StateConfig};
use crate::state::{FileStorage, LocalStateCache};

pub use config_cmd::ConfigArgs;
pub use filter::FilterArgs;
pub use state_cmd::StateArgs;

/// entsearch - free-text filtering over JSON entity lists
#[derive(Parser)]
#[command(name = "entsearch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Filter entities from a file or REST endpoint
    Filter(FilterArgs),

    /// Inspect or edit the local state cache
    State(StateArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load();
        match self.command {
            Commands::Filter(args) => filter::run(args, config).await,
            Commands::State(args) => state_cmd::run(args, config).await,
            Commands::Config(args) => config_cmd::run(args, config).await,
        }
    }
}

/// Open the file-backed state cache for a user and organization
fn open_state(config: &StateConfig, user: &str, org: Option<&str>) -> anyhow::Result<LocalStateCache> {
    let storage = FileStorage::open(config.state_path())?;
    Ok(LocalStateCache::new(Box::new(storage), user, org))
}
