mod standings;

pub use standings::{AgentStanding, GameResult, StandingsCollector, write_markdown};

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use arbor_bot::{BotParams, DecisionError, Policy, PolicyContext, policy_by_name};
use arbor_core::game::{GameRound, TurnError};
use arbor_core::model::seat::Seat;
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{AgentConfig, ResolvedOutputs, RunnerConfig};

/// Plays seeded games between the two configured agents.
pub struct MatchRunner {
    config: RunnerConfig,
    outputs: ResolvedOutputs,
    params: BotParams,
    logging_enabled: bool,
}

/// Summary details returned after a run.
pub struct MatchSummary {
    pub games_played: usize,
    pub seatings: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub standings: Vec<AgentStanding>,
}

impl MatchRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: RunnerConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        if config.agents.len() != 2 {
            return Err(RunnerError::SeatCount {
                found: config.agents.len(),
            });
        }

        let params = BotParams {
            search: config.search.to_search_config(),
            ..BotParams::from_env()
        };

        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
            params,
        })
    }

    /// Play every game, streaming JSONL rows to disk, then write the summary.
    pub fn run(&self) -> Result<MatchSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.games.seed.unwrap_or(0));
        let mut collector =
            StandingsCollector::new(self.config.agents.iter().map(|a| a.name.clone()).collect());
        let seatings = self.config.games.seatings();
        let mut rows_written = 0usize;

        for game_index in 0..self.config.games.count {
            let deal_seed = rng.next_u64();

            for seating_index in 0..seatings {
                let seating = if seating_index == 0 { [0, 1] } else { [1, 0] };
                let outcome = self.play_game(deal_seed, seating)?;

                for result in &outcome.seat_results {
                    collector.record(
                        result.agent_index,
                        result.score,
                        result.result,
                        result.decisions,
                        result.total_ms,
                    );
                }
                rows_written += write_game_rows(
                    &mut writer,
                    &self.config.run_id,
                    game_index,
                    seating_index,
                    deal_seed,
                    &outcome,
                )?;

                if self.logging_enabled && tracing::enabled!(Level::INFO) {
                    event!(
                        target: "arbor_runner::match",
                        Level::INFO,
                        run_id = %self.config.run_id,
                        game_index = game_index as u32,
                        seating_index = seating_index as u32,
                        first = %outcome.seat_results[0].agent_name,
                        first_score = outcome.seat_results[0].score,
                        second = %outcome.seat_results[1].agent_name,
                        second_score = outcome.seat_results[1].score,
                        turns = outcome.turns,
                        "game finished"
                    );
                }
            }
        }

        writer.flush()?;

        let standings = collector.finalize();
        write_markdown(&self.outputs.summary_md, &self.config.run_id, &standings)?;

        Ok(MatchSummary {
            games_played: self.config.games.count,
            seatings,
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            standings,
        })
    }

    fn play_game(&self, deal_seed: u64, seating: [usize; 2]) -> Result<GameOutcome, RunnerError> {
        let mut round = GameRound::with_seed(deal_seed, Seat::First);
        let mut seats = Vec::with_capacity(2);
        for (seat, agent_index) in Seat::LOOP.into_iter().zip(seating) {
            let agent = &self.config.agents[agent_index];
            let policy_seed = deal_seed ^ (seat.index() as u64 + 1).wrapping_mul(0x9E37_79B9);
            seats.push(SeatState {
                seat,
                agent_index,
                agent_name: agent.name.clone(),
                policy: spawn_policy(agent, policy_seed)?,
                metrics: DecisionMetrics::default(),
            });
        }

        while !round.is_finished() {
            let seat = round.to_move();
            let seat_state = &mut seats[seat.index()];

            for _ in 0..2 {
                if round.draw_sources(seat).is_empty() {
                    round.skip_draw(seat).map_err(RunnerError::turn)?;
                    continue;
                }
                let view = round.view_for(seat);
                let ctx = PolicyContext::new(&view, &self.params);
                let start = Instant::now();
                let source = seat_state.policy.choose_draw(&ctx);
                seat_state.metrics.record(start.elapsed());
                round.draw(seat, source).map_err(RunnerError::turn)?;
            }

            let view = round.view_for(seat);
            let ctx = PolicyContext::new(&view, &self.params);
            let start = Instant::now();
            let (card, coord) = seat_state.policy.choose_placement(&ctx)?;
            seat_state.metrics.record(start.elapsed());
            round.place(seat, card, coord).map_err(RunnerError::turn)?;

            let view = round.view_for(seat);
            let ctx = PolicyContext::new(&view, &self.params);
            let start = Instant::now();
            let discard = seat_state.policy.choose_discard(&ctx)?;
            let elapsed_ms = seat_state.metrics.record(start.elapsed());
            round.discard(seat, discard).map_err(RunnerError::turn)?;

            if self.logging_enabled && tracing::enabled!(Level::DEBUG) {
                event!(
                    target: "arbor_runner::turn",
                    Level::DEBUG,
                    run_id = %self.config.run_id,
                    seat = seat_label(seat),
                    agent = %seat_state.agent_name,
                    card = %card,
                    coord = %coord,
                    discard = %discard,
                    elapsed_ms
                );
            }
        }

        let scores = round.final_scores();
        let mut seat_results = Vec::with_capacity(2);
        for mut seat_state in seats {
            let ours = scores[seat_state.seat.index()];
            let theirs = scores[seat_state.seat.other().index()];
            seat_state.policy.observe_game_end([ours, theirs]);
            let (decisions, total_ms) = seat_state.metrics.finalize();
            seat_results.push(SeatResult {
                seat: seat_state.seat,
                agent_index: seat_state.agent_index,
                agent_name: seat_state.agent_name,
                score: ours,
                opponent_score: theirs,
                result: GameResult::from_scores(ours, theirs),
                decisions,
                total_ms,
            });
        }

        Ok(GameOutcome {
            turns: round.turn(),
            seat_results,
        })
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn write_game_rows(
    writer: &mut BufWriter<File>,
    run_id: &str,
    game_index: usize,
    seating_index: usize,
    deal_seed: u64,
    outcome: &GameOutcome,
) -> Result<usize, RunnerError> {
    let game_id = format!("G{game_index:05}_S{seating_index}");
    let mut rows_written = 0usize;
    for (index, result) in outcome.seat_results.iter().enumerate() {
        let opponent = &outcome.seat_results[1 - index];
        let row = GameLogRow {
            run_id,
            game_id: &game_id,
            game_index,
            seating_index,
            deal_seed,
            seat: seat_label(result.seat),
            agent: &result.agent_name,
            opponent: &opponent.agent_name,
            score: result.score,
            opponent_score: result.opponent_score,
            result: result.result,
            turns: outcome.turns,
            decisions: result.decisions,
            speed_ms_decision: if result.decisions == 0 {
                0.0
            } else {
                result.total_ms / f64::from(result.decisions)
            },
        };
        serde_json::to_writer(&mut *writer, &row)?;
        writer.write_all(b"\n")?;
        rows_written += 1;
    }
    Ok(rows_written)
}

fn seat_label(seat: Seat) -> &'static str {
    match seat {
        Seat::First => "first",
        Seat::Second => "second",
    }
}

struct SeatState {
    seat: Seat,
    agent_index: usize,
    agent_name: String,
    policy: Box<dyn Policy>,
    metrics: DecisionMetrics,
}

struct GameOutcome {
    turns: u32,
    seat_results: Vec<SeatResult>,
}

struct SeatResult {
    seat: Seat,
    agent_index: usize,
    agent_name: String,
    score: u32,
    opponent_score: u32,
    result: GameResult,
    decisions: u32,
    total_ms: f64,
}

#[derive(Default)]
struct DecisionMetrics {
    total: Duration,
    decisions: u32,
}

impl DecisionMetrics {
    fn record(&mut self, duration: Duration) -> f64 {
        self.total += duration;
        self.decisions += 1;
        duration.as_secs_f64() * 1000.0
    }

    fn finalize(self) -> (u32, f64) {
        (self.decisions, self.total.as_secs_f64() * 1000.0)
    }
}

#[derive(Serialize)]
struct GameLogRow<'a> {
    run_id: &'a str,
    game_id: &'a str,
    game_index: usize,
    seating_index: usize,
    deal_seed: u64,
    seat: &'static str,
    agent: &'a str,
    opponent: &'a str,
    score: u32,
    opponent_score: u32,
    result: GameResult,
    turns: u32,
    decisions: u32,
    speed_ms_decision: f64,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("{0}")]
    Agent(#[from] AgentError),
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("policy gave no decision: {0}")]
    Decision(#[from] DecisionError),
    #[error("game execution failed: {message}")]
    Game { message: String },
    #[error("a match needs exactly 2 agents but found {found}")]
    SeatCount { found: usize },
}

impl RunnerError {
    fn turn(err: TurnError) -> Self {
        RunnerError::Game {
            message: format!("illegal action: {err:?}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("no policy named '{policy}' for agent '{name}'")]
    UnknownPolicy { name: String, policy: String },
}

/// A fixed agent seed wins over the per-game seed.
fn spawn_policy(agent: &AgentConfig, game_seed: u64) -> Result<Box<dyn Policy>, AgentError> {
    let policy = agent.kind.policy_name();
    policy_by_name(policy, agent.seed.unwrap_or(game_seed)).ok_or_else(|| {
        AgentError::UnknownPolicy {
            name: agent.name.clone(),
            policy: policy.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AgentKind;

    fn agent(kind: AgentKind, seed: Option<u64>) -> AgentConfig {
        AgentConfig {
            name: "a".to_string(),
            kind,
            seed,
        }
    }

    #[test]
    fn every_kind_spawns_its_policy() {
        for (kind, expected) in [
            (AgentKind::Heuristic, "heuristic"),
            (AgentKind::Search, "search"),
            (AgentKind::Random, "random"),
        ] {
            let policy = spawn_policy(&agent(kind, Some(17)), 3).unwrap();
            assert_eq!(policy.name(), expected);
        }
    }

    #[test]
    fn fixed_seed_ignores_the_game_seed() {
        let round = GameRound::with_seed(5, Seat::First);
        let view = round.view_for(round.to_move());
        let params = BotParams::default();
        let ctx = PolicyContext::new(&view, &params);

        let picks = |game_seed: u64| {
            let mut policy = spawn_policy(&agent(AgentKind::Random, Some(17)), game_seed).unwrap();
            (0..8)
                .map(|_| policy.choose_discard(&ctx).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(picks(1), picks(2));
    }

    #[test]
    fn match_needs_two_agents() {
        let yaml = r#"
run_id: "solo"
games: { count: 1 }
agents:
  - { name: "greedy", kind: "heuristic" }
outputs: { jsonl: "games.jsonl", summary_md: "summary.md" }
"#;
        let config: RunnerConfig = serde_yaml::from_str(yaml).unwrap();
        let outputs = config.resolved_outputs();
        assert!(matches!(
            MatchRunner::new(config, outputs),
            Err(RunnerError::SeatCount { found: 1 })
        ));
    }
}
