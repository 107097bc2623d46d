pub mod repository;

pub use repository::{CampaignRepository, InvitationRepository, ListingRepository};

/// Failure surfaced by a backing store. The engine treats these as
/// transient: per-candidate failures are isolated in the dispatch loop and
/// counter-update failures after a successful status transition are logged
/// rather than propagated.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
