use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use repotale::catalog::FileCatalog;
use repotale::config::TaleConfig;
use repotale::effort::{EffortMap, GitEffort};
use repotale::provider::CommandProvider;
use repotale::selection::{ApproxCostModel, BudgetSelector};
use repotale::tale::{TaleBuilder, TaleReport};

/// Generate a budget-aware, hierarchical tale of a source repository.
#[derive(Debug, Parser)]
#[command(name = "repotale", version, about)]
struct Cli {
    /// Repository root to document.
    #[arg(default_value = ".")]
    directory: PathBuf,

    /// Ignore patterns, in addition to the defaults. Repeatable.
    #[arg(short = 'e', long = "exclude")]
    exclude: Vec<String>,

    /// Total token budget for the run.
    #[arg(long)]
    max_tokens: Option<usize>,

    /// Token budget for any single file.
    #[arg(long)]
    max_tokens_per_file: Option<usize>,

    /// Write the rendered tale to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Model identifier passed through to the summarization backend.
    #[arg(short, long)]
    model: Option<String>,

    /// Only include files with these extensions. Repeatable.
    #[arg(short = 'f', long = "filter-extension")]
    filter_extension: Vec<String>,

    /// Restrict processing to these top-level folders. Repeatable.
    #[arg(long = "filter-folder")]
    filter_folder: Vec<String>,

    /// Build the tree and measure costs without calling the model.
    #[arg(long)]
    dry_run: bool,

    /// Emit a JSON report instead of the indented text form.
    #[arg(long)]
    json: bool,

    /// Maximum concurrent summarization calls.
    #[arg(long, default_value_t = repotale::config::DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Skip files shorter than this many bytes.
    #[arg(long, default_value_t = repotale::config::DEFAULT_MIN_CONTENT_LENGTH)]
    min_content_length: usize,

    /// Verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("repotale=debug")
        } else {
            EnvFilter::new("repotale=info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = TaleConfig::new(&cli.directory)?
        .with_extensions(cli.filter_extension)
        .exclude(cli.exclude)
        .with_filter_folders(cli.filter_folder)
        .with_budgets(cli.max_tokens, cli.max_tokens_per_file)
        .with_dry_run(cli.dry_run)
        .with_min_content_length(cli.min_content_length)
        .with_concurrency(cli.concurrency)
        .with_model(cli.model);

    let catalog = FileCatalog::new(
        config.root(),
        &config.allowed_extensions,
        &config.ignore_patterns,
    )?;

    let effort = match GitEffort::new(config.root()).effort().await {
        Ok(effort) => effort,
        Err(err) => {
            warn!(error = %err, "no git effort available, using enumeration order");
            EffortMap::new()
        }
    };

    let selector = BudgetSelector::new(ApproxCostModel);
    let selection = selector.select(&catalog, &effort, &config.budget());
    info!(
        files = selection.files.len(),
        considered = selection.candidates_considered,
        cost = selection.cost_used,
        "selection complete"
    );

    let provider = CommandProvider::new(config.model.clone());
    let builder = TaleBuilder::new(&config, &catalog, &provider);
    let outcome = builder.build(&selection.files).await;

    let rendered = if cli.json {
        let report = TaleReport::new(&outcome, &selection);
        let mut body = serde_json::to_string_pretty(&report)?;
        body.push('\n');
        body
    } else {
        let mut body = outcome.root.to_text();
        body.push('\n');
        body
    };

    match &cli.output {
        Some(path) => std::fs::write(path, &rendered)?,
        None => print!("{rendered}"),
    }

    info!(cost = selection.cost_used, "token cost for this run");
    if !outcome.failures.is_empty() {
        // Still a successful run; the tree simply has gaps.
        warn!(
            failed = outcome.failures.len(),
            "completed with failed nodes, see log above"
        );
    }

    Ok(())
}
