pub mod bot;
pub mod policy;
pub mod search;

pub use bot::{
    BotParams, CardRanking, DecisionError, DiscardDecision, DiscardPlanner, DrawDecision,
    DrawPlanner, PlacementDecision, PlacementPlanner, StateValuator, best_play, choose_discard,
    weighted_value,
};
pub use policy::{HeuristicPolicy, Policy, PolicyContext, RandomPolicy, SearchPolicy, policy_by_name};
pub use search::{MctsSearch, SearchConfig, SearchOutcome, SearchStats, run_search};
