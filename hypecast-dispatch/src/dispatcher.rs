use crate::limiter::RateLimiter;
use hypecast_core::InvitationRepository;
use hypecast_match::MatchedCreator;
use hypecast_shared::{Campaign, Invitation};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Tally of one dispatch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub sent: u32,
    pub skipped_rate_limit: u32,
    pub failed: u32,
}

/// Creates pending invitations for ranked candidates, one at a time.
///
/// Sequential on purpose: each rate-limit check must observe invitations
/// created earlier in the same run, and a single bad record must not take
/// down the rest of the batch. Persistence failures are counted and the
/// loop moves on.
pub struct Dispatcher {
    invitations: Arc<dyn InvitationRepository>,
    limiter: RateLimiter,
}

impl Dispatcher {
    pub fn new(invitations: Arc<dyn InvitationRepository>, limiter: RateLimiter) -> Self {
        Self { invitations, limiter }
    }

    pub async fn dispatch(
        &self,
        campaign: &Campaign,
        ranked: &[MatchedCreator],
        invite_count: usize,
    ) -> DispatchReport {
        let mut report = DispatchReport::default();

        for candidate in ranked.iter().take(invite_count) {
            if !self
                .limiter
                .can_send(campaign.advertiser_id, candidate.creator_id)
                .await
            {
                report.skipped_rate_limit += 1;
                debug!(
                    campaign_id = %campaign.id,
                    creator_id = %candidate.creator_id,
                    "invitation skipped: contact rate limit"
                );
                continue;
            }

            let invitation = Invitation::new(
                candidate.creator_id,
                campaign.advertiser_id,
                Some(campaign.id),
                candidate.content_format.clone(),
                candidate.price_cents,
                campaign.currency.clone(),
            );

            match self.invitations.create_invitation(&invitation).await {
                Ok(()) => report.sent += 1,
                Err(err) => {
                    report.failed += 1;
                    warn!(
                        campaign_id = %campaign.id,
                        creator_id = %candidate.creator_id,
                        error = %err,
                        "invitation create failed, continuing batch"
                    );
                }
            }
        }

        report
    }
}
