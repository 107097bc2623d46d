pub mod engine;
pub mod stats;

pub use engine::{CampaignEngine, LaunchReport};

use hypecast_core::StoreError;
use hypecast_match::MatchStats;
use hypecast_shared::{CampaignStatus, CampaignValidationError};

/// Engine-level failure taxonomy.
///
/// `NotFound` and `InvalidState` are caller mistakes and never retried.
/// `NoInventory` carries the per-stage filter breakdown so the advertiser
/// can see which criterion to relax. `Store` is a persistence failure
/// surfaced outside the per-candidate isolation of the dispatch loop.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("cannot {action} while campaign is {status}")]
    InvalidState {
        action: &'static str,
        status: CampaignStatus,
    },

    #[error(
        "no eligible creators: {0}. Try widening the budget or audience range, \
         adding content formats or platforms, or removing country/interest filters"
    )]
    NoInventory(MatchStats),

    #[error("invalid campaign: {0}")]
    Validation(#[from] CampaignValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
