pub mod campaign;
pub mod invitation;
pub mod listing;

pub use campaign::{Campaign, CampaignStatus, CampaignValidationError};
pub use invitation::{Invitation, InvitationStatus};
pub use listing::CreatorListing;

/// A stored status string that no variant recognizes.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unrecognized status: {0}")]
pub struct ParseStatusError(pub String);
