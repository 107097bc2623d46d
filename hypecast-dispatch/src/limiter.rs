use chrono::{Duration, Utc};
use hypecast_core::InvitationRepository;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// Per advertiser–creator contact guard: at most one pending or accepted
/// invitation outstanding for the ordered pair within a rolling window.
///
/// Fails open on a store error. A rare duplicate invitation is cheap;
/// blocking a whole dispatch run on a transient read failure is not.
pub struct RateLimiter {
    invitations: Arc<dyn InvitationRepository>,
    window: Duration,
}

impl RateLimiter {
    pub fn new(invitations: Arc<dyn InvitationRepository>, window: Duration) -> Self {
        Self { invitations, window }
    }

    /// Default one-hour rolling window.
    pub fn hourly(invitations: Arc<dyn InvitationRepository>) -> Self {
        Self::new(invitations, Duration::hours(1))
    }

    pub async fn can_send(&self, advertiser_id: Uuid, creator_id: Uuid) -> bool {
        let since = Utc::now() - self.window;
        match self
            .invitations
            .count_recent_open(advertiser_id, creator_id, since)
            .await
        {
            Ok(open) => open == 0,
            Err(err) => {
                warn!(
                    %advertiser_id,
                    %creator_id,
                    error = %err,
                    "rate-limit lookup failed, failing open"
                );
                true
            }
        }
    }
}
