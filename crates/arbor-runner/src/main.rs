use std::io;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{Args, Parser, Subcommand};
use tracing::Level;

use arbor_bot::{BotParams, policy_by_name};
use arbor_runner::config::{ResolvedOutputs, RunnerConfig, parse_level};
use arbor_runner::logging::{log_beside, log_to_stderr};
use arbor_runner::protocol::ProtocolSession;
use arbor_runner::selfplay::MatchRunner;

/// Move engine for two-player Arboretum.
#[derive(Debug, Parser)]
#[command(name = "arbor", author, version, about = "Arboretum move engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Answer JSON requests from stdin, one reply per line on stdout.
    Serve(ServeArgs),
    /// Play seeded games between two configured agents.
    Match(MatchArgs),
}

#[derive(Debug, Args)]
struct ServeArgs {
    /// Policy answering requests (heuristic, search, random).
    #[arg(long, default_value = "search")]
    policy: String,

    /// Time budget per decision; overrides ARB_SEARCH_TIME_MS.
    #[arg(long, value_name = "MS")]
    time_ms: Option<u64>,

    /// Seed for the policy's random source.
    #[arg(long, value_name = "SEED", default_value_t = 0)]
    seed: u64,

    /// Log level for the JSON logs written to stderr.
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Debug, Args)]
struct MatchArgs {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config/match.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of deals to play.
    #[arg(long, value_name = "GAMES")]
    games: Option<usize>,

    /// Override the RNG seed for deal generation.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration (no games are played).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    match Cli::parse().command {
        Command::Serve(args) => serve(args),
        Command::Match(args) => run_match(args),
    }
}

fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let level = parse_level(&args.log_level)
        .ok_or_else(|| anyhow!("unknown log level '{}'", args.log_level))?;
    let _logging_guard = log_to_stderr(level);

    let policy = policy_by_name(&args.policy, args.seed)
        .ok_or_else(|| anyhow!("unknown policy '{}'", args.policy))?;
    let mut params = BotParams::from_env();
    if let Some(ms) = args.time_ms.filter(|ms| *ms > 0) {
        params.search.time_limit = std::time::Duration::from_millis(ms);
    }

    tracing::event!(
        target: "arbor_runner::serve",
        Level::INFO,
        policy = policy.name(),
        time_limit_ms = params.search.time_limit.as_millis() as u64,
        "serving"
    );

    let mut session = ProtocolSession::new(policy, params);
    let stats = session.run(io::stdin().lock(), io::stdout().lock())?;

    tracing::event!(
        target: "arbor_runner::serve",
        Level::INFO,
        replies = stats.replies,
        random_replies = stats.random_replies,
        skipped_lines = stats.skipped_lines,
        "input closed"
    );
    Ok(())
}

fn run_match(args: MatchArgs) -> anyhow::Result<()> {
    let mut config = RunnerConfig::from_path(&args.config)?;

    if let Some(run_id) = args.run_id {
        config.run_id = run_id;
    }

    if let Some(games) = args.games {
        config.games.count = games;
    }

    if let Some(seed) = args.seed {
        config.games.seed = Some(seed);
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    println!(
        "Loaded configuration '{run_id}': {} vs {} over {} games ({} seating{})",
        config.agents[0].name,
        config.agents[1].name,
        config.games.count,
        config.games.seatings(),
        if config.games.seatings() == 1 { "" } else { "s" }
    );

    let telemetry = if config.logging.enable_structured {
        Some(log_beside(&outputs.summary_md, config.logging.level())?)
    } else {
        None
    };
    let runner = MatchRunner::new(config, outputs)?;

    if args.validate_only {
        println!("Validation-only mode: no games played.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Match complete for '{run_id}': {} games × {} seatings → {} rows at {}",
        summary.games_played,
        summary.seatings,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    for standing in &summary.standings {
        println!(
            "  {}: {}-{}-{} (win rate {:.3}, 95% CI [{:.3}, {:.3}], avg score {:.2})",
            standing.name,
            standing.wins,
            standing.draws,
            standing.losses,
            standing.win_rate,
            standing.win_rate_ci.0,
            standing.win_rate_ci.1,
            standing.avg_score
        );
    }
    println!("Summary table: {}", summary.summary_path.display());
    if let Some((_, path)) = &telemetry {
        println!("Telemetry log: {}", path.display());
    }

    Ok(())
}
