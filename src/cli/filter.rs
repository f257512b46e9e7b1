//! Filter command - load entities and print the ones matching a query

use std::io::{self, BufRead, Write};
use std::time::Duration;

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::open_state;
use crate::config::Config;
use crate::operation::{Operation, OperationError};
use crate::search::{Entity, Query, SearchIndex};
use crate::source::{self, split_document, EntitySource};
use crate::state::LocalStateCache;

/// State key holding the last interactive query
const LAST_QUERY_KEY: &str = "filter.last_query";

/// Longest single-line preview in text output, in characters
const PREVIEW_CHARS: usize = 160;

#[derive(Args)]
pub struct FilterArgs {
    /// Entity source: JSON file path, `-` for stdin, or an http(s) URL
    pub source: String,

    /// Query: comma-separated terms, prefix a term with `-` to exclude it
    pub query: Option<String>,

    /// Read queries line by line from stdin (`:reload` refetches, `:quit` exits)
    #[arg(short, long)]
    pub interactive: bool,

    /// Output format (text, json)
    #[arg(long, value_parser = ["text", "json"])]
    pub format: Option<String>,

    /// Maximum number of matches to print
    #[arg(long)]
    pub limit: Option<usize>,

    /// User the remembered query is scoped to
    #[arg(long, env = "ENTSEARCH_USER")]
    pub user: Option<String>,

    /// Organization the remembered query is scoped to
    #[arg(long, env = "ENTSEARCH_ORG")]
    pub org: Option<String>,
}

/// A loaded entity with its search index
struct Row {
    document: Value,
    index: SearchIndex,
}

impl Row {
    fn new(document: Value) -> Self {
        let index = SearchIndex::new(Entity::from(&document));
        Self { document, index }
    }
}

pub async fn run(args: FilterArgs, config: Config) -> anyhow::Result<()> {
    let format = args.format.clone().unwrap_or_else(|| config.search.format.clone());
    let limit = args.limit.or(config.search.limit);

    if args.interactive && args.source == "-" {
        anyhow::bail!("Interactive mode reads queries from stdin; load entities from a file or URL instead.");
    }

    let source = source::open(&args.source, &config.http)?;
    let loader = Operation::new("load");
    let mut rows = load_rows(&loader, source.as_ref()).await?;

    if !args.interactive {
        let query = Query::parse(args.query.as_deref().unwrap_or(""));
        let matches = filter_rows(&mut rows, &query);
        return print_matches(&matches, &format, limit);
    }

    let user = args.user.as_deref().unwrap_or(&config.state.user);
    let org = args.org.as_deref().or(config.state.organization.as_deref());
    let mut state = open_state(&config.state, user, org)?;

    let initial = args.query.clone().or_else(|| state.get::<String>(LAST_QUERY_KEY));
    if let Some(query) = &initial {
        println!("> {}", query);
        let matches = filter_rows(&mut rows, &Query::parse(query));
        print_matches(&matches, &format, limit)?;
    }

    println!("\nInteractive mode. Type ':reload' to refetch, ':quit' to leave.\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();

        match input {
            ":quit" | ":q" | "exit" => break,
            ":reload" => {
                match load_rows(&loader, source.as_ref()).await {
                    Ok(fresh) => {
                        println!("Reloaded {} entities", fresh.len());
                        rows = fresh;
                    }
                    Err(e) => warn!("Reload failed, keeping previous entities: {}", e),
                }
                continue;
            }
            _ => {}
        }

        let matches = filter_rows(&mut rows, &Query::parse(input));
        print_matches(&matches, &format, limit)?;

        remember_query(&mut state, input);
    }

    Ok(())
}

/// Store the query for the next session; blank input keeps the previous one
fn remember_query(state: &mut LocalStateCache, input: &str) {
    if input.is_empty() {
        return;
    }
    if let Err(e) = state.set(LAST_QUERY_KEY, input) {
        warn!("Failed to remember query: {}", e);
    }
}

/// Load the source through the single-flight loader, showing a spinner
async fn load_rows(loader: &Operation<Value>, source: &dyn EntitySource) -> anyhow::Result<Vec<Row>> {
    let progress = ProgressBar::new_spinner();
    progress.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    progress.set_message(format!("Loading {}...", source.describe()));
    progress.enable_steady_tick(Duration::from_millis(100));

    let result = loader.run(source.load()).await;
    progress.finish_and_clear();

    let doc = match result {
        Ok(doc) => doc,
        Err(OperationError::Failed(e)) => return Err(e),
        Err(OperationError::Aborted) => anyhow::bail!("Loading {} was aborted", source.describe()),
    };

    let rows: Vec<Row> = split_document(doc).into_iter().map(Row::new).collect();
    info!("Loaded {} entities from {}", rows.len(), source.describe());
    Ok(rows)
}

fn filter_rows<'a>(rows: &'a mut [Row], query: &Query) -> Vec<&'a Value> {
    let total = rows.len();
    let matches: Vec<&Value> = rows
        .iter_mut()
        .filter_map(|Row { document, index }| index.matches(query, true).then_some(&*document))
        .collect();
    debug!("{} of {} entities match", matches.len(), total);
    matches
}

fn print_matches(matches: &[&Value], format: &str, limit: Option<usize>) -> anyhow::Result<()> {
    let shown = &matches[..limit.unwrap_or(matches.len()).min(matches.len())];

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(shown)?);
        return Ok(());
    }

    println!("{} match(es)", matches.len());
    for (i, document) in shown.iter().enumerate() {
        println!("{}. {}", i + 1, preview(document)?);
    }
    if shown.len() < matches.len() {
        println!("... {} more", matches.len() - shown.len());
    }
    Ok(())
}

/// Compact one-line rendering, truncated on a character boundary
fn preview(document: &Value) -> anyhow::Result<String> {
    let line = serde_json::to_string(document)?;
    if line.chars().count() > PREVIEW_CHARS {
        let truncated: String = line.chars().take(PREVIEW_CHARS).collect();
        Ok(format!("{}...", truncated))
    } else {
        Ok(line)
    }
}
