use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, info_span, warn};

use ballpark_core::analysis::series::{series_probability, SeriesGameProbability};
use ballpark_core::config::SimConfig;
use ballpark_core::logging;
use ballpark_core::model::constants::PROBABILITY_TOLERANCE;
use ballpark_core::simulation::batch::{simulate_in_batches, SimulationContext};
use ballpark_core::simulation::matchup::MatchupInput;
use ballpark_core::transitions::{BaserunningEngine, TransitionTable};

/// Monte Carlo baseball game simulator.
#[derive(Parser)]
#[command(name = "ballpark", version, about = "Monte Carlo baseball game simulator")]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Simulate a matchup and print aggregate results as JSON.
    Simulate(SimulateArgs),
    /// Combine three per-game home win probabilities into a series price.
    Series(SeriesArgs),
    /// Load a transition table and report probability sums.
    ValidateTable(ValidateTableArgs),
}

#[derive(clap::Args)]
struct SimulateArgs {
    /// Matchup JSON (lineups, league averages, optional starting state).
    #[arg(short, long)]
    matchup: PathBuf,

    /// Transition table JSON; overrides the config.
    #[arg(short, long)]
    table: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the number of games.
    #[arg(short = 'n', long)]
    num_games: Option<usize>,

    /// Override the RNG seed.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print per-line cover probabilities and fair odds instead of raw counts.
    #[arg(long)]
    summary: bool,
}

#[derive(clap::Args)]
struct SeriesArgs {
    /// Home win probability in games 1, 2 and 3.
    #[arg(num_args = 1..)]
    probabilities: Vec<f64>,
}

#[derive(clap::Args)]
struct ValidateTableArgs {
    /// Transition table JSON.
    table: PathBuf,

    /// Allowed deviation of each probability sum from one.
    #[arg(long, default_value_t = PROBABILITY_TOLERANCE)]
    tolerance: f64,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Simulate(args) => simulate(args),
        Command::Series(args) => series(args),
        Command::ValidateTable(args) => validate_table(args),
    }
}

fn load_table(path: &Path) -> Result<TransitionTable> {
    TransitionTable::from_path(path)
        .with_context(|| format!("failed to load transition table: {}", path.display()))
}

fn simulate(args: SimulateArgs) -> Result<()> {
    let _cmd = info_span!("simulate").entered();

    let mut config = match &args.config {
        Some(path) => SimConfig::from_path(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?,
        None => SimConfig::default(),
    };
    if let Some(num_games) = args.num_games {
        config.num_games = num_games;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.validate().context("invalid configuration")?;

    let table_path = args
        .table
        .as_ref()
        .or(config.transition_table.as_ref())
        .ok_or_else(|| {
            anyhow::anyhow!("no transition table: pass --table or set transition_table in config")
        })?;
    let table = load_table(table_path)?;

    let matchup_json = std::fs::read_to_string(&args.matchup)
        .with_context(|| format!("failed to read matchup: {}", args.matchup.display()))?;
    let input = MatchupInput::from_json(&matchup_json).context("failed to parse matchup JSON")?;
    info!(
        away = %input.lineups.away.team_name,
        home = %input.lineups.home.team_name,
        "matchup loaded"
    );

    let ctx = SimulationContext::from_input(
        BaserunningEngine::new(Arc::new(table)),
        input,
        Arc::new(config.markets.clone()),
    )
    .context("failed to build matchup probabilities")?;

    let seed = config.resolve_seed();
    let results = simulate_in_batches(
        &ctx,
        config.num_games,
        config.batch_size,
        seed,
        |progress| {
            info!(
                completed = progress.completed,
                total = progress.total,
                "progress"
            );
            ControlFlow::Continue(())
        },
    )?;
    let Some(results) = results else {
        bail!("simulation was cancelled");
    };

    let output = if args.summary {
        serde_json::to_string_pretty(&results.line_summaries())?
    } else {
        serde_json::to_string_pretty(&results)?
    };
    println!("{output}");
    Ok(())
}

fn series(args: SeriesArgs) -> Result<()> {
    let games = args
        .probabilities
        .iter()
        .map(|&p| SeriesGameProbability::new(p))
        .collect::<Result<Vec<_>, _>>()?;
    match series_probability(&games) {
        Some(outcome) => println!("{}", serde_json::to_string_pretty(&outcome)?),
        None => bail!(
            "series probability needs exactly 3 games, got {}",
            games.len()
        ),
    }
    Ok(())
}

fn validate_table(args: ValidateTableArgs) -> Result<()> {
    let table = load_table(&args.table)?;
    let deviations = table.validate_probabilities(args.tolerance);
    for deviation in &deviations {
        warn!(
            event = %deviation.event,
            key = %deviation.key,
            total = deviation.total,
            "probabilities do not sum to one"
        );
    }
    println!(
        "{} entries, {} outside tolerance {}",
        table.len(),
        deviations.len(),
        args.tolerance
    );
    if !deviations.is_empty() {
        bail!("{} entries failed validation", deviations.len());
    }
    Ok(())
}
