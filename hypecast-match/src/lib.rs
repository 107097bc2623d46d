pub mod matcher;
pub mod models;
pub mod planner;
pub mod ranker;

pub use matcher::{MatchOutcome, MatchStats, Matcher};
pub use models::MatchedCreator;
pub use planner::OverbookingPlanner;
pub use ranker::rank_by_target_rate;
