use crate::stats;
use crate::EngineError;
use chrono::Duration;
use hypecast_core::{CampaignRepository, InvitationRepository, ListingRepository};
use hypecast_dispatch::{Dispatcher, RateLimiter};
use hypecast_match::{rank_by_target_rate, Matcher, OverbookingPlanner};
use hypecast_shared::{Campaign, CampaignStatus, Platform};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Counts returned to the caller of a successful launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LaunchReport {
    /// Distinct creators that survived every filter.
    pub matched: u32,
    /// How many of them the overbooking plan selected for invitation.
    pub invited: u32,
    pub sent: u32,
    pub skipped_rate_limit: u32,
    pub failed: u32,
}

/// The engine facade: matching, ranking, overbooking, rate-limited
/// dispatch, and the campaign lifecycle, over injected repositories.
///
/// One launch is a single logical, sequential operation. The status moves
/// to active before the dispatch loop runs: a campaign that attempted to
/// launch is launched, however many invitations ultimately land. Counter
/// writes after that point refine the record and are non-fatal.
pub struct CampaignEngine {
    campaigns: Arc<dyn CampaignRepository>,
    listings: Arc<dyn ListingRepository>,
    invitations: Arc<dyn InvitationRepository>,
    dispatcher: Dispatcher,
    planner: OverbookingPlanner,
}

impl CampaignEngine {
    /// Default tuning: 25% overbooking, one-hour contact window.
    pub fn new(
        campaigns: Arc<dyn CampaignRepository>,
        listings: Arc<dyn ListingRepository>,
        invitations: Arc<dyn InvitationRepository>,
    ) -> Self {
        Self::with_tuning(
            campaigns,
            listings,
            invitations,
            OverbookingPlanner::default(),
            Duration::hours(1),
        )
    }

    pub fn with_tuning(
        campaigns: Arc<dyn CampaignRepository>,
        listings: Arc<dyn ListingRepository>,
        invitations: Arc<dyn InvitationRepository>,
        planner: OverbookingPlanner,
        rate_limit_window: Duration,
    ) -> Self {
        let limiter = RateLimiter::new(invitations.clone(), rate_limit_window);
        let dispatcher = Dispatcher::new(invitations.clone(), limiter);
        Self {
            campaigns,
            listings,
            invitations,
            dispatcher,
            planner,
        }
    }

    /// Match, rank, overbook and dispatch a draft campaign.
    pub async fn launch(
        &self,
        campaign_id: Uuid,
        advertiser_id: Uuid,
    ) -> Result<LaunchReport, EngineError> {
        let campaign = self.load(campaign_id).await?;
        if campaign.advertiser_id != advertiser_id {
            return Err(EngineError::NotFound(format!(
                "campaign {campaign_id} for advertiser {advertiser_id}"
            )));
        }
        if campaign.status != CampaignStatus::Draft {
            return Err(EngineError::InvalidState {
                action: "launch",
                status: campaign.status,
            });
        }
        campaign.validate()?;

        let platforms: Vec<Platform> = campaign.platforms.iter().cloned().collect();
        let inventory = self.listings.list_active_by_platforms(&platforms).await?;

        let outcome = Matcher::new(&campaign).run(&inventory);
        info!(campaign_id = %campaign.id, stats = %outcome.stats, "matching complete");
        if outcome.matches.is_empty() {
            return Err(EngineError::NoInventory(outcome.stats));
        }

        let mut ranked = outcome.matches;
        rank_by_target_rate(&mut ranked);
        let invite_count = self
            .planner
            .invites_for(campaign.target_influencer_count, ranked.len());

        // Active before dispatch: launching is the status change, dispatch
        // outcomes only refine the counters.
        self.campaigns
            .update_campaign_status(campaign.id, CampaignStatus::Active)
            .await?;

        let report = self.dispatcher.dispatch(&campaign, &ranked, invite_count).await;

        if let Err(err) = self
            .campaigns
            .set_sent_offers_count(campaign.id, report.sent as i32)
            .await
        {
            // Stale counter self-corrects on the next stats pass.
            warn!(campaign_id = %campaign.id, error = %err, "sent counter update failed");
        }

        info!(
            campaign_id = %campaign.id,
            matched = outcome.stats.matched,
            invited = invite_count,
            sent = report.sent,
            skipped_rate_limit = report.skipped_rate_limit,
            failed = report.failed,
            "campaign launched"
        );

        Ok(LaunchReport {
            matched: outcome.stats.matched,
            invited: invite_count as u32,
            sent: report.sent,
            skipped_rate_limit: report.skipped_rate_limit,
            failed: report.failed,
        })
    }

    /// Re-derive the campaign's counters from its invitations and apply any
    /// lifecycle auto-advance. Idempotent; safe to call on every
    /// invitation-status-change event, including retried ones.
    pub async fn update_stats(&self, campaign_id: Uuid) -> Result<(), EngineError> {
        let campaign = self.load(campaign_id).await?;
        let invitations = self.invitations.list_by_campaign(campaign_id).await?;
        let counters = stats::reconcile(&invitations);

        self.campaigns
            .set_sent_offers_count(campaign_id, invitations.len() as i32)
            .await?;
        self.campaigns
            .set_outcome_counters(campaign_id, counters.accepted, counters.completed)
            .await?;

        // Paused campaigns keep their counters fresh but do not advance.
        if !campaign.status.is_running() {
            return Ok(());
        }

        let mut status = campaign.status;
        if status == CampaignStatus::Active
            && counters.accepted >= campaign.target_influencer_count
        {
            status = CampaignStatus::InProgress;
            self.campaigns
                .update_campaign_status(campaign_id, status)
                .await?;
            info!(campaign_id = %campaign_id, accepted = counters.accepted, "campaign in progress");
        }

        if status == CampaignStatus::InProgress && stats::all_settled(&invitations) {
            self.finish(campaign_id, CampaignStatus::Completed).await?;
            info!(campaign_id = %campaign_id, completed = counters.completed, "campaign completed");
        }

        Ok(())
    }

    /// Manual pause; already-sent invitations stay valid.
    pub async fn pause(&self, campaign_id: Uuid) -> Result<(), EngineError> {
        let campaign = self.load(campaign_id).await?;
        if !campaign.status.is_running() {
            return Err(EngineError::InvalidState {
                action: "pause",
                status: campaign.status,
            });
        }
        self.campaigns
            .update_campaign_status(campaign_id, CampaignStatus::Paused)
            .await?;
        info!(campaign_id = %campaign_id, "campaign paused");
        Ok(())
    }

    /// Manual resume. The running state is re-derived from the invitations
    /// rather than remembered, so acceptances that arrived while paused are
    /// honored immediately.
    pub async fn resume(&self, campaign_id: Uuid) -> Result<(), EngineError> {
        let campaign = self.load(campaign_id).await?;
        if campaign.status != CampaignStatus::Paused {
            return Err(EngineError::InvalidState {
                action: "resume",
                status: campaign.status,
            });
        }

        let invitations = self.invitations.list_by_campaign(campaign_id).await?;
        let counters = stats::reconcile(&invitations);
        self.campaigns
            .set_outcome_counters(campaign_id, counters.accepted, counters.completed)
            .await?;

        let status = if counters.accepted >= campaign.target_influencer_count {
            CampaignStatus::InProgress
        } else {
            CampaignStatus::Active
        };
        self.campaigns
            .update_campaign_status(campaign_id, status)
            .await?;
        info!(campaign_id = %campaign_id, status = %status, "campaign resumed");
        Ok(())
    }

    /// Cancel from any non-terminal state; pending invitations expire so no
    /// creator can accept into a dead campaign.
    pub async fn cancel(&self, campaign_id: Uuid) -> Result<(), EngineError> {
        let campaign = self.load(campaign_id).await?;
        if campaign.status.is_terminal() {
            return Err(EngineError::InvalidState {
                action: "cancel",
                status: campaign.status,
            });
        }
        self.finish(campaign_id, CampaignStatus::Cancelled).await?;
        info!(campaign_id = %campaign_id, "campaign cancelled");
        Ok(())
    }

    /// Advertiser ends an in-flight campaign early.
    pub async fn close(&self, campaign_id: Uuid) -> Result<(), EngineError> {
        let campaign = self.load(campaign_id).await?;
        if !(campaign.status.is_running() || campaign.status == CampaignStatus::Paused) {
            return Err(EngineError::InvalidState {
                action: "close",
                status: campaign.status,
            });
        }
        self.finish(campaign_id, CampaignStatus::Closed).await?;
        info!(campaign_id = %campaign_id, "campaign closed");
        Ok(())
    }

    /// Soft delete: cancel semantics for anything still open, then flag the
    /// row. Physical destruction stays an external administrative action.
    pub async fn delete(&self, campaign_id: Uuid) -> Result<(), EngineError> {
        let campaign = self.load(campaign_id).await?;
        if !campaign.status.is_terminal() {
            self.finish(campaign_id, CampaignStatus::Cancelled).await?;
        }
        self.campaigns.mark_deleted(campaign_id).await?;
        info!(campaign_id = %campaign_id, "campaign deleted");
        Ok(())
    }

    /// Enter a terminal state and expire the campaign's pending invitations.
    async fn finish(&self, campaign_id: Uuid, status: CampaignStatus) -> Result<(), EngineError> {
        self.campaigns
            .update_campaign_status(campaign_id, status)
            .await?;
        let expired = self
            .invitations
            .expire_pending_for_campaign(campaign_id)
            .await?;
        if expired > 0 {
            info!(campaign_id = %campaign_id, expired, "pending invitations expired");
        }
        Ok(())
    }

    async fn load(&self, campaign_id: Uuid) -> Result<Campaign, EngineError> {
        self.campaigns
            .get_campaign(campaign_id)
            .await?
            .filter(|c| !c.is_deleted)
            .ok_or_else(|| EngineError::NotFound(format!("campaign {campaign_id}")))
    }
}
