use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hypecast_core::{
    CampaignRepository, InvitationRepository, ListingRepository, StoreError, StoreResult,
};
use hypecast_shared::{Campaign, CampaignStatus, CreatorListing, Invitation, InvitationStatus, Platform};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// In-process implementation of every repository trait. Backs the test
/// suites and doubles as a dev backend; the failure-injection switches let
/// tests exercise the engine's degraded paths without a real database.
#[derive(Default)]
pub struct MemoryStore {
    campaigns: Mutex<HashMap<Uuid, Campaign>>,
    listings: Mutex<Vec<CreatorListing>>,
    invitations: Mutex<Vec<Invitation>>,
    fail_creates_for: Mutex<HashSet<Uuid>>,
    fail_recent_open: AtomicBool,
}

fn guard<T>(mutex: &Mutex<T>) -> StoreResult<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_campaign(&self, campaign: Campaign) {
        if let Ok(mut campaigns) = self.campaigns.lock() {
            campaigns.insert(campaign.id, campaign);
        }
    }

    pub fn seed_listing(&self, listing: CreatorListing) {
        if let Ok(mut listings) = self.listings.lock() {
            listings.push(listing);
        }
    }

    pub fn seed_invitation(&self, invitation: Invitation) {
        if let Ok(mut invitations) = self.invitations.lock() {
            invitations.push(invitation);
        }
    }

    pub fn campaign_snapshot(&self, id: Uuid) -> Option<Campaign> {
        self.campaigns.lock().ok()?.get(&id).cloned()
    }

    pub fn invitations_snapshot(&self) -> Vec<Invitation> {
        self.invitations
            .lock()
            .map(|invitations| invitations.clone())
            .unwrap_or_default()
    }

    /// Make `create_invitation` fail for this creator (simulated per-row
    /// persistence failure).
    pub fn fail_invitation_creates_for(&self, creator_id: Uuid) {
        if let Ok(mut failing) = self.fail_creates_for.lock() {
            failing.insert(creator_id);
        }
    }

    /// Make `count_recent_open` fail (rate limiter fail-open path).
    pub fn fail_recent_open_counts(&self, fail: bool) {
        self.fail_recent_open.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl CampaignRepository for MemoryStore {
    async fn get_campaign(&self, id: Uuid) -> StoreResult<Option<Campaign>> {
        Ok(guard(&self.campaigns)?.get(&id).cloned())
    }

    async fn save_campaign(&self, campaign: &Campaign) -> StoreResult<()> {
        guard(&self.campaigns)?.insert(campaign.id, campaign.clone());
        Ok(())
    }

    async fn update_campaign_status(&self, id: Uuid, status: CampaignStatus) -> StoreResult<()> {
        let mut campaigns = guard(&self.campaigns)?;
        let campaign = campaigns
            .get_mut(&id)
            .ok_or_else(|| StoreError::Backend(format!("campaign {id} not stored")))?;
        campaign.update_status(status);
        Ok(())
    }

    async fn set_sent_offers_count(&self, id: Uuid, sent: i32) -> StoreResult<()> {
        let mut campaigns = guard(&self.campaigns)?;
        let campaign = campaigns
            .get_mut(&id)
            .ok_or_else(|| StoreError::Backend(format!("campaign {id} not stored")))?;
        campaign.sent_offers_count = sent;
        campaign.updated_at = Utc::now();
        Ok(())
    }

    async fn set_outcome_counters(
        &self,
        id: Uuid,
        accepted: i32,
        completed: i32,
    ) -> StoreResult<()> {
        let mut campaigns = guard(&self.campaigns)?;
        let campaign = campaigns
            .get_mut(&id)
            .ok_or_else(|| StoreError::Backend(format!("campaign {id} not stored")))?;
        campaign.accepted_offers_count = accepted;
        campaign.completed_offers_count = completed;
        campaign.updated_at = Utc::now();
        Ok(())
    }

    async fn mark_deleted(&self, id: Uuid) -> StoreResult<()> {
        let mut campaigns = guard(&self.campaigns)?;
        let campaign = campaigns
            .get_mut(&id)
            .ok_or_else(|| StoreError::Backend(format!("campaign {id} not stored")))?;
        campaign.is_deleted = true;
        campaign.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl ListingRepository for MemoryStore {
    async fn list_active_by_platforms(
        &self,
        platforms: &[Platform],
    ) -> StoreResult<Vec<CreatorListing>> {
        Ok(guard(&self.listings)?
            .iter()
            .filter(|l| l.is_listable() && platforms.contains(&l.platform))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl InvitationRepository for MemoryStore {
    async fn create_invitation(&self, invitation: &Invitation) -> StoreResult<()> {
        if guard(&self.fail_creates_for)?.contains(&invitation.creator_id) {
            return Err(StoreError::Backend("simulated write failure".to_string()));
        }
        guard(&self.invitations)?.push(invitation.clone());
        Ok(())
    }

    async fn list_by_campaign(&self, campaign_id: Uuid) -> StoreResult<Vec<Invitation>> {
        Ok(guard(&self.invitations)?
            .iter()
            .filter(|i| i.campaign_id == Some(campaign_id))
            .cloned()
            .collect())
    }

    async fn update_invitation_status(
        &self,
        id: Uuid,
        status: InvitationStatus,
    ) -> StoreResult<()> {
        let mut invitations = guard(&self.invitations)?;
        let invitation = invitations
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| StoreError::Backend(format!("invitation {id} not stored")))?;
        invitation.update_status(status);
        Ok(())
    }

    async fn count_recent_open(
        &self,
        advertiser_id: Uuid,
        creator_id: Uuid,
        since: DateTime<Utc>,
    ) -> StoreResult<u64> {
        if self.fail_recent_open.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("simulated read failure".to_string()));
        }
        Ok(guard(&self.invitations)?
            .iter()
            .filter(|i| {
                i.advertiser_id == advertiser_id
                    && i.creator_id == creator_id
                    && i.status.is_open()
                    && i.created_at >= since
            })
            .count() as u64)
    }

    async fn expire_pending_for_campaign(&self, campaign_id: Uuid) -> StoreResult<u64> {
        let mut invitations = guard(&self.invitations)?;
        let mut expired = 0;
        for invitation in invitations.iter_mut() {
            if invitation.campaign_id == Some(campaign_id)
                && invitation.status == InvitationStatus::Pending
            {
                invitation.update_status(InvitationStatus::Expired);
                expired += 1;
            }
        }
        Ok(expired)
    }
}
