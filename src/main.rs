use std::io::{self, BufRead};
use std::time::Duration;

use anyhow::{Context, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

mod catalog;
mod config;
mod discovery;
mod extractor;
mod llm_provider;
mod logger;
mod preferences;
mod providers;
mod render;
#[cfg(test)]
mod test_support;

use catalog::CatalogSearch;
use config::Config;
use discovery::Discovery;
use extractor::PreferenceExtractor;
use providers::ChatCompletionsProvider;
use render::{OutputFormat, Renderer};

#[derive(Parser)]
#[command(
    name = "universal_pages",
    about = "Find books and the reading preferences behind your query"
)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<String>,
    /// Number of books to fetch from the catalog
    #[arg(short = 'n', long)]
    max_results: Option<usize>,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
    /// Disable colored output
    #[arg(long)]
    no_color: bool,
    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// Free-text description of the books you want (read from stdin if omitted)
    query: Vec<String>,
}

fn read_query(args: &Args) -> anyhow::Result<String> {
    if !args.query.is_empty() {
        return Ok(args.query.join(" "));
    }
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read query from stdin")?;
    Ok(line)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init(args.verbose);

    dotenv::from_filename("api.env").ok();
    dotenv::dotenv().ok();

    let mut config = Config::load(&args.config)?;
    config.merge_with_args(args.max_results, args.json, args.no_color);
    let format = OutputFormat::parse(&config.ui.output_format)?;

    // Credentials are checked before any query is accepted.
    let provider = ChatCompletionsProvider::from_config(&config.completion)
        .context("Completion service is not configured")?;
    let extractor = PreferenceExtractor::new(Box::new(provider));
    let catalog = CatalogSearch::new(&config.catalog)?;
    let discovery = Discovery::new(extractor, catalog, config.catalog.max_results);

    let raw_query = read_query(&args)?;
    let query = raw_query.trim();
    if query.is_empty() {
        bail!("Nothing to search for: the query is empty");
    }

    let spinner = if config.ui.spinner {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .context("Invalid spinner template")?,
        );
        spinner.set_message("Scanning the literary cosmos...");
        spinner.enable_steady_tick(Duration::from_millis(100));
        Some(spinner)
    } else {
        None
    };

    let report = discovery.run(query).await;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let renderer = Renderer::new(format, config.ui.colorful);
    println!("{}", renderer.render(&report)?);
    Ok(())
}
