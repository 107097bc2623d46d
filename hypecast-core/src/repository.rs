use crate::StoreResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hypecast_shared::{Campaign, CampaignStatus, CreatorListing, Invitation, InvitationStatus, Platform};
use uuid::Uuid;

/// Repository trait for campaign data access.
#[async_trait]
pub trait CampaignRepository: Send + Sync {
    async fn get_campaign(&self, id: Uuid) -> StoreResult<Option<Campaign>>;

    async fn save_campaign(&self, campaign: &Campaign) -> StoreResult<()>;

    async fn update_campaign_status(&self, id: Uuid, status: CampaignStatus) -> StoreResult<()>;

    /// Overwrites the sent counter wholesale (never increments), so a
    /// repeated write converges instead of double counting.
    async fn set_sent_offers_count(&self, id: Uuid, sent: i32) -> StoreResult<()>;

    async fn set_outcome_counters(&self, id: Uuid, accepted: i32, completed: i32)
        -> StoreResult<()>;

    async fn mark_deleted(&self, id: Uuid) -> StoreResult<()>;
}

/// Read access to creator inventory.
#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Active, non-deleted listings on any of the given platforms.
    async fn list_active_by_platforms(
        &self,
        platforms: &[Platform],
    ) -> StoreResult<Vec<CreatorListing>>;
}

/// Invitation (offer) persistence and the queries dispatch depends on.
#[async_trait]
pub trait InvitationRepository: Send + Sync {
    async fn create_invitation(&self, invitation: &Invitation) -> StoreResult<()>;

    async fn list_by_campaign(&self, campaign_id: Uuid) -> StoreResult<Vec<Invitation>>;

    async fn update_invitation_status(
        &self,
        id: Uuid,
        status: InvitationStatus,
    ) -> StoreResult<()>;

    /// Pending/accepted invitations from `advertiser_id` to `creator_id`
    /// created at or after `since`. Backs the per-pair rate limit.
    async fn count_recent_open(
        &self,
        advertiser_id: Uuid,
        creator_id: Uuid,
        since: DateTime<Utc>,
    ) -> StoreResult<u64>;

    /// Transition every pending invitation of the campaign to expired.
    /// Returns how many were expired.
    async fn expire_pending_for_campaign(&self, campaign_id: Uuid) -> StoreResult<u64>;
}
