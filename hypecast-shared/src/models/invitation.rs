use crate::models::ParseStatusError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Invitation (offer) lifecycle status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Declined,
    Expired,
    InProgress,
    Completed,
    Cancelled,
}

impl InvitationStatus {
    /// No further transitions possible.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            InvitationStatus::Completed
                | InvitationStatus::Cancelled
                | InvitationStatus::Declined
                | InvitationStatus::Expired
        )
    }

    /// Pending or accepted: the statuses the per-pair rate limit counts.
    pub fn is_open(&self) -> bool {
        matches!(self, InvitationStatus::Pending | InvitationStatus::Accepted)
    }

    /// The creator said yes at some point, even if work has since moved on.
    /// Keeps the accepted counter from regressing as invitations progress.
    pub fn counts_as_accepted(&self) -> bool {
        matches!(
            self,
            InvitationStatus::Accepted | InvitationStatus::InProgress | InvitationStatus::Completed
        )
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InvitationStatus::Pending => "PENDING",
            InvitationStatus::Accepted => "ACCEPTED",
            InvitationStatus::Declined => "DECLINED",
            InvitationStatus::Expired => "EXPIRED",
            InvitationStatus::InProgress => "IN_PROGRESS",
            InvitationStatus::Completed => "COMPLETED",
            InvitationStatus::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

impl FromStr for InvitationStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(InvitationStatus::Pending),
            "ACCEPTED" => Ok(InvitationStatus::Accepted),
            "DECLINED" => Ok(InvitationStatus::Declined),
            "EXPIRED" => Ok(InvitationStatus::Expired),
            "IN_PROGRESS" => Ok(InvitationStatus::InProgress),
            "COMPLETED" => Ok(InvitationStatus::Completed),
            "CANCELLED" => Ok(InvitationStatus::Cancelled),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// An invitation from an advertiser to a creator at a fixed price for one
/// content format. Independently meaningful record: referenced by the
/// originating campaign (when there is one) and by both parties, owned by
/// neither.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invitation {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub advertiser_id: Uuid,
    /// Nullable: invitations can also originate outside campaign dispatch.
    pub campaign_id: Option<Uuid>,
    pub content_format: String,
    pub price_cents: i64,
    pub currency: String,
    pub status: InvitationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invitation {
    pub fn new(
        creator_id: Uuid,
        advertiser_id: Uuid,
        campaign_id: Option<Uuid>,
        content_format: impl Into<String>,
        price_cents: i64,
        currency: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            creator_id,
            advertiser_id,
            campaign_id,
            content_format: content_format.into(),
            price_cents,
            currency: currency.into(),
            status: InvitationStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn update_status(&mut self, new_status: InvitationStatus) {
        self.status = new_status;
        self.updated_at = Utc::now();
    }
}
