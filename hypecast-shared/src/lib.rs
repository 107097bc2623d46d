pub mod models;
pub mod normalize;
pub mod platform;

pub use models::{
    Campaign, CampaignStatus, CampaignValidationError, CreatorListing, Invitation,
    InvitationStatus, ParseStatusError,
};
pub use normalize::LabelField;
pub use platform::Platform;
