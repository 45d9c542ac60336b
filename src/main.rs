use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use league_recap::analysis::filter::{FilterCriteria, QueueGroup, DEFAULT_MIN_DURATION_SECS};
use league_recap::api::client::RiotApiClient;
use league_recap::api::transport::{Transport, UreqTransport};
use league_recap::config::Config;
use league_recap::display::output::{
    display_error, display_info, display_match_history, display_player, display_success, display_summary,
};
use league_recap::pipeline::{Pipeline, PipelineObserver, PipelineState, Progress, Session};
use league_recap::reference::{ReferenceData, ReferenceLookup, StaticNames};
use league_recap::service::{MatchService, Operation};
use serde_json::{json, Value};
use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "league_recap")]
#[command(about = "Summarize a League of Legends player's recent games", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look up a Riot ID and summarize its match history
    Search(SearchArgs),

    /// Run one service operation on a JSON body read from stdin
    Call {
        #[arg(value_enum)]
        operation: Operation,
    },
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Riot Game Name
    game_name: String,

    /// Riot Tag (tag line)
    tag_line: String,

    /// Server code, e.g. EUW, NA, KR (default: RIOT_SERVER or EUW)
    #[arg(short, long)]
    server: Option<String>,

    /// Queue groups to include (repeatable, default: all)
    #[arg(short, long, value_enum)]
    queue: Vec<QueueGroup>,

    /// Ignore games shorter than this many seconds
    #[arg(long, default_value_t = DEFAULT_MIN_DURATION_SECS)]
    min_duration: i64,

    /// Number of recent matches to list
    #[arg(short, long, default_value = "10")]
    recent: usize,

    /// Print the summary as JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Match requests in flight at once
    #[arg(long)]
    concurrency: Option<usize>,

    /// Seconds to wait between backfill batches
    #[arg(long)]
    batch_delay: Option<u64>,

    /// Stop after the preview window
    #[arg(long)]
    no_backfill: bool,

    /// Skip Data Dragon and use the built-in names
    #[arg(long)]
    offline_names: bool,
}

impl SearchArgs {
    fn filter(&self) -> FilterCriteria {
        if self.queue.is_empty() {
            FilterCriteria {
                min_duration_seconds: self.min_duration,
                ..FilterCriteria::default()
            }
        } else {
            FilterCriteria::new(self.queue.iter().copied(), self.min_duration)
        }
    }
}

/// Drives the terminal progress bar from pipeline notifications.
struct ProgressObserver {
    bar: ProgressBar,
}

impl ProgressObserver {
    fn new(hidden: bool) -> Self {
        let bar = if hidden {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(0)
        };
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg:<24} [{bar:30.cyan/blue}] {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.enable_steady_tick(Duration::from_millis(120));
        ProgressObserver { bar }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl PipelineObserver for ProgressObserver {
    fn on_state(&self, state: PipelineState) {
        let message = match state {
            PipelineState::Idle => "Idle",
            PipelineState::Resolving => "Resolving player",
            PipelineState::PreviewFetching => "Fetching latest games",
            PipelineState::PreviewReady => "Preview ready",
            PipelineState::Backfilling => "Backfilling history",
            PipelineState::Complete => "Done",
            PipelineState::Error => "Failed",
        };
        self.bar.set_message(message);
    }

    fn on_progress(&self, progress: Progress) {
        self.bar.set_length(progress.total as u64);
        self.bar.set_position(progress.done as u64);
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    // loads .env first so RUST_LOG from it applies
    let config = Config::from_env()?;
    init_tracing();

    let transport: Arc<dyn Transport> = Arc::new(UreqTransport::new());
    match cli.command {
        Command::Search(args) => search(&config, transport, &args),
        Command::Call { operation } => call(&config, transport, operation),
    }
}

fn call(config: &Config, transport: Arc<dyn Transport>, operation: Operation) -> anyhow::Result<()> {
    let input = io::read_to_string(io::stdin()).context("failed to read request body from stdin")?;
    let body: Value = if input.trim().is_empty() {
        json!({})
    } else {
        serde_json::from_str(&input).context("request body is not valid JSON")?
    };

    let policy = &config.policy;
    let client = RiotApiClient::new(transport, config.api_key.clone(), policy.requests_per_second);
    let service = MatchService::new(client, policy.concurrency, config.server.clone());

    let response = service.handle(operation, &body);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn search(config: &Config, transport: Arc<dyn Transport>, args: &SearchArgs) -> anyhow::Result<()> {
    let mut policy = config.policy.clone();
    if let Some(concurrency) = args.concurrency {
        policy.concurrency = concurrency.max(1);
    }
    if let Some(delay) = args.batch_delay {
        policy.batch_delay = Duration::from_secs(delay);
    }
    let server = args.server.clone().unwrap_or_else(|| config.server.clone());

    let client = RiotApiClient::new(transport.clone(), config.api_key.clone(), policy.requests_per_second);
    let service = Arc::new(MatchService::new(client, policy.concurrency, server.clone()));
    let pipeline = Pipeline::new(service, policy).with_backfill(!args.no_backfill);
    let reference = ReferenceData::new(transport, &config.ddragon_locale);
    let session = Session::new();
    let observer = ProgressObserver::new(args.json);

    // names load alongside the search
    let (outcome, catalog) = thread::scope(|scope| {
        let names = (!args.offline_names).then(|| scope.spawn(|| reference.initialize()));
        let outcome = pipeline.run_search(&session, &args.game_name, &args.tag_line, &server, &observer);
        let catalog = names
            .and_then(|handle| handle.join().ok())
            .and_then(|loaded| match loaded {
                Ok(catalog) => Some(catalog),
                Err(e) => {
                    warn!(error = %e, "Data Dragon unavailable, using built-in names");
                    None
                }
            });
        (outcome, catalog)
    });
    observer.finish();
    outcome?;

    let lookup: &dyn ReferenceLookup = match &catalog {
        Some(catalog) => catalog.as_ref(),
        None => &StaticNames,
    };
    let snapshot = session.snapshot();
    let player = snapshot.player.as_ref().context("search finished without a player")?;
    let filter = args.filter();
    let summary = session
        .summary(&filter, Some(lookup))
        .context("search finished without a player")?;

    if args.json {
        let out = json!({
            "player": player,
            "progress": snapshot.progress,
            "filter": filter,
            "summary": summary,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let icon = catalog
        .as_ref()
        .zip(player.summoner.as_ref())
        .map(|(catalog, summoner)| catalog.profile_icon_url(summoner.profile_icon_id));
    display_player(player, icon);
    display_info(&format!(
        "{} matches loaded, {} unavailable, {} after filters",
        snapshot.matches.len(),
        snapshot.progress.failed,
        summary.kpis.games
    ));
    display_summary(&summary, lookup);
    display_match_history(&filter.apply(&snapshot.matches), player.puuid(), args.recent, lookup);
    display_success("Search complete");
    Ok(())
}
