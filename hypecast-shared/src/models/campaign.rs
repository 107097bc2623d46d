use crate::models::ParseStatusError;
use crate::platform::Platform;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Campaign lifecycle status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignStatus {
    Draft,
    Active,
    InProgress,
    Paused,
    Closed,
    Completed,
    Cancelled,
}

impl CampaignStatus {
    /// Terminal states admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CampaignStatus::Closed | CampaignStatus::Completed | CampaignStatus::Cancelled
        )
    }

    /// Running states accept invitation outcomes and auto-advance.
    pub fn is_running(&self) -> bool {
        matches!(self, CampaignStatus::Active | CampaignStatus::InProgress)
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CampaignStatus::Draft => "DRAFT",
            CampaignStatus::Active => "ACTIVE",
            CampaignStatus::InProgress => "IN_PROGRESS",
            CampaignStatus::Paused => "PAUSED",
            CampaignStatus::Closed => "CLOSED",
            CampaignStatus::Completed => "COMPLETED",
            CampaignStatus::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

impl FromStr for CampaignStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(CampaignStatus::Draft),
            "ACTIVE" => Ok(CampaignStatus::Active),
            "IN_PROGRESS" => Ok(CampaignStatus::InProgress),
            "PAUSED" => Ok(CampaignStatus::Paused),
            "CLOSED" => Ok(CampaignStatus::Closed),
            "COMPLETED" => Ok(CampaignStatus::Completed),
            "CANCELLED" => Ok(CampaignStatus::Cancelled),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum CampaignValidationError {
    #[error("budget_min exceeds budget_max")]
    BudgetRange,

    #[error("audience_min exceeds audience_max")]
    AudienceRange,

    #[error("target influencer count must be positive")]
    TargetCount,

    #[error("campaign requires at least one platform")]
    NoPlatforms,

    #[error("campaign requires at least one content format")]
    NoFormats,
}

/// An advertiser's campaign: targeting criteria, lifecycle status, and the
/// aggregate invitation counters derived from dispatch outcomes.
///
/// All money is in minor units (cents) of `currency`, per single
/// integration. Empty `target_countries`/`target_interests` mean the
/// corresponding filter is not applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Uuid,
    pub advertiser_id: Uuid,
    pub title: String,
    pub status: CampaignStatus,
    pub budget_min_cents: i64,
    pub budget_max_cents: i64,
    pub audience_min: i64,
    pub audience_max: i64,
    pub target_influencer_count: i32,
    pub content_formats: BTreeSet<String>,
    pub platforms: BTreeSet<Platform>,
    pub target_countries: BTreeSet<String>,
    pub target_interests: BTreeSet<String>,
    pub product_categories: BTreeSet<String>,
    pub currency: String,
    /// Cents per follower the advertiser is implicitly willing to pay:
    /// avg(budget) / avg(audience). Recomputed whenever budget or audience
    /// range changes.
    pub target_rate_per_follower: f64,
    pub sent_offers_count: i32,
    pub accepted_offers_count: i32,
    pub completed_offers_count: i32,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Campaign {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        advertiser_id: Uuid,
        title: impl Into<String>,
        budget_min_cents: i64,
        budget_max_cents: i64,
        audience_min: i64,
        audience_max: i64,
        target_influencer_count: i32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            advertiser_id,
            title: title.into(),
            status: CampaignStatus::Draft,
            budget_min_cents,
            budget_max_cents,
            audience_min,
            audience_max,
            target_influencer_count,
            content_formats: BTreeSet::new(),
            platforms: BTreeSet::new(),
            target_countries: BTreeSet::new(),
            target_interests: BTreeSet::new(),
            product_categories: BTreeSet::new(),
            currency: "USD".to_string(),
            target_rate_per_follower: derived_rate(
                budget_min_cents,
                budget_max_cents,
                audience_min,
                audience_max,
            ),
            sent_offers_count: 0,
            accepted_offers_count: 0,
            completed_offers_count: 0,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), CampaignValidationError> {
        if self.budget_min_cents > self.budget_max_cents {
            return Err(CampaignValidationError::BudgetRange);
        }
        if self.audience_min > self.audience_max {
            return Err(CampaignValidationError::AudienceRange);
        }
        if self.target_influencer_count <= 0 {
            return Err(CampaignValidationError::TargetCount);
        }
        if self.platforms.is_empty() {
            return Err(CampaignValidationError::NoPlatforms);
        }
        if self.content_formats.is_empty() {
            return Err(CampaignValidationError::NoFormats);
        }
        Ok(())
    }

    pub fn update_status(&mut self, new_status: CampaignStatus) {
        self.status = new_status;
        self.updated_at = Utc::now();
    }

    pub fn set_budget(&mut self, min_cents: i64, max_cents: i64) {
        self.budget_min_cents = min_cents;
        self.budget_max_cents = max_cents;
        self.refresh_target_rate();
    }

    pub fn set_audience_range(&mut self, min: i64, max: i64) {
        self.audience_min = min;
        self.audience_max = max;
        self.refresh_target_rate();
    }

    pub fn refresh_target_rate(&mut self) {
        self.target_rate_per_follower = derived_rate(
            self.budget_min_cents,
            self.budget_max_cents,
            self.audience_min,
            self.audience_max,
        );
        self.updated_at = Utc::now();
    }
}

fn derived_rate(budget_min: i64, budget_max: i64, audience_min: i64, audience_max: i64) -> f64 {
    let avg_budget = (budget_min + budget_max) as f64 / 2.0;
    let avg_audience = (audience_min + audience_max) as f64 / 2.0;
    if avg_audience <= 0.0 {
        0.0
    } else {
        avg_budget / avg_audience
    }
}
