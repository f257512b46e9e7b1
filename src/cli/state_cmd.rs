//! State command - inspect and edit the local state cache

use clap::{Args, Subcommand};
use serde_json::Value;

use super::open_state;
use crate::config::Config;

#[derive(Args)]
pub struct StateArgs {
    /// User the state is scoped to
    #[arg(long, global = true, env = "ENTSEARCH_USER")]
    pub user: Option<String>,

    /// Organization the state is scoped to
    #[arg(long, global = true, env = "ENTSEARCH_ORG")]
    pub org: Option<String>,

    #[command(subcommand)]
    pub command: StateCommands,
}

#[derive(Subcommand)]
pub enum StateCommands {
    /// Print a stored value
    Get {
        key: String,
    },

    /// Store a value (parsed as JSON, otherwise stored as a string)
    Set {
        key: String,
        value: String,
    },

    /// Remove a stored value
    Remove {
        key: String,
    },

    /// List stored keys
    List,

    /// Remove every value in this scope
    Clear,
}

pub async fn run(args: StateArgs, config: Config) -> anyhow::Result<()> {
    let user = args.user.as_deref().unwrap_or(&config.state.user);
    let org = args.org.as_deref().or(config.state.organization.as_deref());
    let mut state = open_state(&config.state, user, org)?;

    match args.command {
        StateCommands::Get { key } => match state.get::<Value>(&key) {
            Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
            None => anyhow::bail!("No value stored for '{}'", key),
        },

        StateCommands::Set { key, value } => {
            state.set(&key, &parse_value(&value))?;
            println!("Stored '{}'", key);
        }

        StateCommands::Remove { key } => {
            state.remove(&key)?;
            println!("Removed '{}'", key);
        }

        StateCommands::List => {
            let keys = state.keys()?;
            if keys.is_empty() {
                println!("No stored state for {}", scope_label(user, org));
            }
            for key in keys {
                println!("{}", key);
            }
        }

        StateCommands::Clear => {
            let removed = state.clear()?;
            println!("Removed {} value(s) for {}", removed, scope_label(user, org));
        }
    }

    Ok(())
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn scope_label(user: &str, org: Option<&str>) -> String {
    match org {
        Some(org) => format!("{} @ {}", user, org),
        None => user.to_string(),
    }
}
