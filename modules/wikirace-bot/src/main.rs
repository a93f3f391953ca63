use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

use wikirace_bot::{
    AppConfig, NavObserver, NavigationEngine, Node, Observers, OntologySource, Outcome, Role,
    SimilarityScorer, TracingObserver, TurnReport,
};
use wikirace_pages::{LinkFilter, WikiClient, WikipediaPages};

/// Play the Wikipedia game: get from one article to another by clicking links.
#[derive(Parser, Debug)]
#[command(name = "wikirace-bot", version)]
struct Cli {
    /// Article to start from, e.g. Iranian_Revolution
    start: String,

    /// Article to reach
    target: String,

    /// Maximum number of moves
    #[arg(long)]
    turns: Option<u32>,

    /// Fraction of each score that may be randomly added or removed
    #[arg(long)]
    variance: Option<f64>,

    /// Allow revisiting articles freely
    #[arg(long)]
    no_memory: bool,

    /// Seed for a replayable run
    #[arg(long)]
    seed: Option<u64>,

    /// Word-sense taxonomy: builtin, none, or a path to a JSON file
    #[arg(long)]
    taxonomy: Option<String>,

    /// TOML config file (also WIKIRACE_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(turns) = self.turns {
            config.nav.turn_budget = turns;
        }
        if let Some(variance) = self.variance {
            config.nav.variance_fraction = variance;
        }
        if self.no_memory {
            config.nav.memory_enabled = false;
        }
        if self.seed.is_some() {
            config.nav.seed = self.seed;
        }
        if let Some(ref taxonomy) = self.taxonomy {
            config.taxonomy = OntologySource::from_setting(taxonomy);
        }
    }
}

/// Human-readable progress on stdout.
struct ConsoleObserver;

impl NavObserver for ConsoleObserver {
    fn on_validated(&self, role: Role, node: &Node, exists: bool) {
        let verdict = if exists {
            style("VALID").green()
        } else {
            style("FAIL").red()
        };
        println!("{role}: {node}... {verdict}");
    }

    fn on_move(&self, turn: &TurnReport<'_>) {
        println!("moving to... {}", turn.selection.node());
    }
}

const DEFAULT_LOG_FILTER: &str = "wikirace_bot=warn";

/// `RUST_LOG` when it parses, otherwise the quiet default.
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli
        .config
        .clone()
        .or_else(|| std::env::var_os("WIKIRACE_CONFIG").map(PathBuf::from));
    let mut config = AppConfig::load(config_path.as_deref())?;
    cli.apply(&mut config);
    config.validate()?;
    config.log_effective();

    let start = Node::new(&cli.start).context("Invalid start article")?;
    let target = Node::new(&cli.target).context("Invalid target article")?;

    let ontology = config
        .taxonomy
        .load()
        .with_context(|| format!("Failed to load taxonomy: {}", config.taxonomy))?;
    let scorer = SimilarityScorer::new(ontology);

    let client = WikiClient::new(
        &config.wiki_base_url,
        &config.user_agent,
        config.request_timeout(),
    )?;
    let pages = WikipediaPages::new(
        client,
        LinkFilter {
            max_link_length: config.max_link_length,
        },
    );

    println!("validating articles...");
    let mut engine = NavigationEngine::new(&pages, scorer, &config.nav)
        .with_observer(Observers::new().with(ConsoleObserver).with(TracingObserver));
    let outcome = engine.run(&start, &target, config.nav.turn_budget).await;

    Ok(report(&outcome))
}

fn report(outcome: &Outcome) -> ExitCode {
    match outcome {
        Outcome::Won { moves, elapsed, .. } => {
            println!("\n{}", style("Bot wins!").green());
            print_totals(*moves, elapsed.as_secs_f64());
            ExitCode::SUCCESS
        }
        Outcome::LostTurnsExhausted {
            moves,
            elapsed,
            stranded_at,
            ..
        } => {
            let message = match stranded_at {
                Some(node) => format!("Bot fails: stranded at {node} (no links to follow)..."),
                None => "Bot fails: No turns remain...".to_string(),
            };
            println!("\n{}", style(message).red());
            print_totals(*moves, elapsed.as_secs_f64());
            ExitCode::SUCCESS
        }
        Outcome::ValidationFailed { which, reason, .. } => {
            eprintln!("{}", style(format!("Invalid {which} article: {reason}")).red());
            ExitCode::FAILURE
        }
        Outcome::FetchFailed { node, reason } => {
            eprintln!("{}", style(format!("Failed to read '{node}': {reason}")).red());
            ExitCode::FAILURE
        }
    }
}

fn print_totals(moves: u32, seconds: f64) {
    println!("Time:  {seconds:.4} seconds");
    println!("Steps: {moves} clicks");
}
