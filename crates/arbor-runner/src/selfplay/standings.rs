use std::fs;
use std::path::Path;

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};

/// Two-sided 95% normal quantile, used if the distribution cannot be built.
const Z_95: f64 = 1.959_963_984_540_054;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    Win,
    Draw,
    Loss,
}

impl GameResult {
    pub fn from_scores(ours: u32, theirs: u32) -> Self {
        match ours.cmp(&theirs) {
            std::cmp::Ordering::Greater => GameResult::Win,
            std::cmp::Ordering::Equal => GameResult::Draw,
            std::cmp::Ordering::Less => GameResult::Loss,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentStanding {
    pub name: String,
    pub games: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub avg_score: f64,
    /// Draws count as half a win.
    pub win_rate: f64,
    pub win_rate_ci: (f64, f64),
    pub avg_ms_per_decision: f64,
}

#[derive(Debug, Default, Clone)]
struct Tally {
    games: usize,
    wins: usize,
    draws: usize,
    losses: usize,
    total_score: u64,
    decisions: u64,
    decision_ms: f64,
}

/// Accumulates per-agent results across every game of a match.
pub struct StandingsCollector {
    names: Vec<String>,
    tallies: Vec<Tally>,
}

impl StandingsCollector {
    pub fn new(names: Vec<String>) -> Self {
        let tallies = vec![Tally::default(); names.len()];
        Self { names, tallies }
    }

    pub fn record(
        &mut self,
        agent: usize,
        score: u32,
        result: GameResult,
        decisions: u32,
        total_ms: f64,
    ) {
        let Some(tally) = self.tallies.get_mut(agent) else {
            return;
        };
        tally.games += 1;
        match result {
            GameResult::Win => tally.wins += 1,
            GameResult::Draw => tally.draws += 1,
            GameResult::Loss => tally.losses += 1,
        }
        tally.total_score += u64::from(score);
        tally.decisions += u64::from(decisions);
        tally.decision_ms += total_ms;
    }

    pub fn finalize(&self) -> Vec<AgentStanding> {
        let z = Normal::new(0.0, 1.0)
            .map(|normal| normal.inverse_cdf(0.975))
            .unwrap_or(Z_95);
        self.names
            .iter()
            .zip(&self.tallies)
            .map(|(name, tally)| {
                let games = tally.games as f64;
                let (avg_score, win_rate, half_width) = if tally.games == 0 {
                    (0.0, 0.0, 0.0)
                } else {
                    let p = (tally.wins as f64 + 0.5 * tally.draws as f64) / games;
                    (
                        tally.total_score as f64 / games,
                        p,
                        z * (p * (1.0 - p) / games).sqrt(),
                    )
                };
                AgentStanding {
                    name: name.clone(),
                    games: tally.games,
                    wins: tally.wins,
                    draws: tally.draws,
                    losses: tally.losses,
                    avg_score,
                    win_rate,
                    win_rate_ci: (
                        (win_rate - half_width).max(0.0),
                        (win_rate + half_width).min(1.0),
                    ),
                    avg_ms_per_decision: if tally.decisions == 0 {
                        0.0
                    } else {
                        tally.decision_ms / tally.decisions as f64
                    },
                }
            })
            .collect()
    }
}

pub fn write_markdown(
    path: impl AsRef<Path>,
    run_id: &str,
    standings: &[AgentStanding],
) -> std::io::Result<()> {
    let mut out = String::new();
    out.push_str(&format!("# Match Summary: {run_id}\n\n"));
    out.push_str("| Agent | Games | W | D | L | Avg score | Win rate | 95% CI | ms/decision |\n");
    out.push_str("|---|---:|---:|---:|---:|---:|---:|---|---:|\n");
    for standing in standings {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {:.2} | {:.3} | [{:.3}, {:.3}] | {:.2} |\n",
            standing.name,
            standing.games,
            standing.wins,
            standing.draws,
            standing.losses,
            standing.avg_score,
            standing.win_rate,
            standing.win_rate_ci.0,
            standing.win_rate_ci.1,
            standing.avg_ms_per_decision,
        ));
    }
    fs::write(path, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_follow_the_scores() {
        assert_eq!(GameResult::from_scores(9, 4), GameResult::Win);
        assert_eq!(GameResult::from_scores(4, 4), GameResult::Draw);
        assert_eq!(GameResult::from_scores(0, 1), GameResult::Loss);
    }

    #[test]
    fn win_rate_interval_brackets_the_rate() {
        let mut collector = StandingsCollector::new(vec!["a".into(), "b".into()]);
        for (a, b) in [(10, 2), (3, 7), (5, 5), (12, 0)] {
            collector.record(0, a, GameResult::from_scores(a, b), 20, 40.0);
            collector.record(1, b, GameResult::from_scores(b, a), 20, 10.0);
        }
        let standings = collector.finalize();

        let a = &standings[0];
        assert_eq!((a.wins, a.draws, a.losses), (2, 1, 1));
        assert!((a.win_rate - 0.625).abs() < 1e-12);
        assert!((a.avg_score - 7.5).abs() < 1e-12);
        assert!((a.avg_ms_per_decision - 2.0).abs() < 1e-12);
        let half = 1.959_964 * (0.625f64 * 0.375 / 4.0).sqrt();
        assert!((a.win_rate_ci.0 - (0.625 - half)).abs() < 1e-4);
        assert!((a.win_rate_ci.1 - (0.625 + half).min(1.0)).abs() < 1e-4);

        let b = &standings[1];
        assert!((a.win_rate + b.win_rate - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_tallies_report_zeroes() {
        let standings = StandingsCollector::new(vec!["idle".into()]).finalize();
        assert_eq!(standings[0].games, 0);
        assert_eq!(standings[0].win_rate_ci, (0.0, 0.0));
    }

    #[test]
    fn markdown_lists_every_agent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.md");
        let mut collector = StandingsCollector::new(vec!["greedy".into(), "mcts".into()]);
        collector.record(0, 8, GameResult::Win, 10, 5.0);
        collector.record(1, 3, GameResult::Loss, 10, 50.0);
        write_markdown(&path, "unit", &collector.finalize()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# Match Summary: unit"));
        assert!(text.contains("| greedy | 1 | 1 | 0 | 0 |"));
        assert!(text.contains("| mcts | 1 | 0 | 0 | 1 |"));
    }
}
