use crate::search::SearchConfig;
use arbor_core::belief::InferenceConfig;
use std::time::Duration;

/// Tunables shared by the planners and the search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BotParams {
    /// How many of the weakest cards the discard planner tests against the
    /// opponent's tableau.
    pub discard_candidates: usize,
    /// Upper bound on placement trials spent valuing the deck when drawing.
    pub draw_sample_budget: usize,
    pub draw_seed: u64,
    pub inference: InferenceConfig,
    pub search: SearchConfig,
}

impl BotParams {
    pub const DEFAULT_DISCARD_CANDIDATES: usize = 4;
    pub const DEFAULT_DRAW_SAMPLE_BUDGET: usize = 120;

    pub fn from_env() -> Self {
        Self::from_reader(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_reader<F>(mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let time_limit = read("ARB_SEARCH_TIME_MS")
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(defaults.search.time_limit);

        let exploration = read("ARB_SEARCH_EXPLORATION")
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|value| value.is_finite() && *value >= 0.0)
            .unwrap_or(defaults.search.exploration);

        let discard_candidates = read("ARB_DISCARD_CANDIDATES")
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|count| *count > 0)
            .unwrap_or(defaults.discard_candidates);

        let max_enumerated = read("ARB_INFER_MAX_ENUMERATED")
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(defaults.inference.max_enumerated);

        Self {
            discard_candidates,
            inference: InferenceConfig {
                max_enumerated,
                ..defaults.inference
            },
            search: SearchConfig {
                time_limit,
                exploration,
                ..defaults.search
            },
            ..defaults
        }
    }
}

impl Default for BotParams {
    fn default() -> Self {
        Self {
            discard_candidates: Self::DEFAULT_DISCARD_CANDIDATES,
            draw_sample_budget: Self::DEFAULT_DRAW_SAMPLE_BUDGET,
            draw_seed: 0xD2A3,
            inference: InferenceConfig::default(),
            search: SearchConfig::default(),
        }
    }
}
