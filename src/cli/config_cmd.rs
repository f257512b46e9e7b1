//! Config command - manage entsearch configuration

use clap::{Args, Subcommand};

use crate::config::Config;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Initialize config file with defaults
    Init {
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Show config file path
    Path,
}

pub async fn run(args: ConfigArgs, config: Config) -> anyhow::Result<()> {
    match args.command {
        ConfigCommands::Show => {
            let path = Config::config_path();

            if path.exists() {
                println!("Config file: {}", path.display());
            } else {
                println!("Config file: {} (not found, using defaults)", path.display());
            }
            println!();
            println!("[search]");
            println!("format = \"{}\"", config.search.format);
            if let Some(limit) = config.search.limit {
                println!("limit = {}", limit);
            }
            println!();
            println!("[state]");
            println!("user = \"{}\"", config.state.user);
            if let Some(org) = &config.state.organization {
                println!("organization = \"{}\"", org);
            }
            println!("path = \"{}\"", config.state.state_path().display());
            println!();
            println!("[http]");
            println!("timeout_secs = {}", config.http.timeout_secs);
        }

        ConfigCommands::Init { force } => {
            let path = Config::config_path();

            if !Config::write_example(force)? {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            println!("Created config file at {}", path.display());
        }

        ConfigCommands::Path => {
            println!("{}", Config::config_path().display());
        }
    }

    Ok(())
}
