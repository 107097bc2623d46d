use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hypecast_core::{
    CampaignRepository, InvitationRepository, ListingRepository, StoreError, StoreResult,
};
use hypecast_shared::{Campaign, CampaignStatus, CreatorListing, Invitation, InvitationStatus, Platform};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Postgres-backed implementation of the repository traits. Statuses are
/// stored as text, label sets and rate cards as jsonb.
pub struct PostgresStore {
    pub pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

fn to_json<T: Serialize>(value: &T) -> StoreResult<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn from_json<T: DeserializeOwned>(value: serde_json::Value) -> StoreResult<T> {
    serde_json::from_value(value).map_err(|e| StoreError::Corrupt(e.to_string()))
}

fn campaign_from_row(row: &PgRow) -> StoreResult<Campaign> {
    let status: String = row.try_get("status").map_err(backend)?;
    Ok(Campaign {
        id: row.try_get("id").map_err(backend)?,
        advertiser_id: row.try_get("advertiser_id").map_err(backend)?,
        title: row.try_get("title").map_err(backend)?,
        status: status.parse().map_err(|e| StoreError::Corrupt(format!("{e}")))?,
        budget_min_cents: row.try_get("budget_min_cents").map_err(backend)?,
        budget_max_cents: row.try_get("budget_max_cents").map_err(backend)?,
        audience_min: row.try_get("audience_min").map_err(backend)?,
        audience_max: row.try_get("audience_max").map_err(backend)?,
        target_influencer_count: row.try_get("target_influencer_count").map_err(backend)?,
        content_formats: from_json(row.try_get("content_formats").map_err(backend)?)?,
        platforms: from_json(row.try_get("platforms").map_err(backend)?)?,
        target_countries: from_json(row.try_get("target_countries").map_err(backend)?)?,
        target_interests: from_json(row.try_get("target_interests").map_err(backend)?)?,
        product_categories: from_json(row.try_get("product_categories").map_err(backend)?)?,
        currency: row.try_get("currency").map_err(backend)?,
        target_rate_per_follower: row.try_get("target_rate_per_follower").map_err(backend)?,
        sent_offers_count: row.try_get("sent_offers_count").map_err(backend)?,
        accepted_offers_count: row.try_get("accepted_offers_count").map_err(backend)?,
        completed_offers_count: row.try_get("completed_offers_count").map_err(backend)?,
        is_deleted: row.try_get("is_deleted").map_err(backend)?,
        created_at: row.try_get("created_at").map_err(backend)?,
        updated_at: row.try_get("updated_at").map_err(backend)?,
    })
}

fn listing_from_row(row: &PgRow) -> StoreResult<CreatorListing> {
    let platform: String = row.try_get("platform").map_err(backend)?;
    Ok(CreatorListing {
        id: row.try_get("id").map_err(backend)?,
        creator_id: row.try_get("creator_id").map_err(backend)?,
        platform: Platform::parse(&platform),
        audience_size: row.try_get("audience_size").map_err(backend)?,
        rate_card: from_json(row.try_get("rate_card").map_err(backend)?)?,
        countries: from_json(row.try_get("countries").map_err(backend)?)?,
        interests: from_json(row.try_get("interests").map_err(backend)?)?,
        blacklisted_categories: from_json(
            row.try_get("blacklisted_categories").map_err(backend)?,
        )?,
        currency: row.try_get("currency").map_err(backend)?,
        is_active: row.try_get("is_active").map_err(backend)?,
        is_deleted: row.try_get("is_deleted").map_err(backend)?,
        created_at: row.try_get("created_at").map_err(backend)?,
        updated_at: row.try_get("updated_at").map_err(backend)?,
    })
}

fn invitation_from_row(row: &PgRow) -> StoreResult<Invitation> {
    let status: String = row.try_get("status").map_err(backend)?;
    Ok(Invitation {
        id: row.try_get("id").map_err(backend)?,
        creator_id: row.try_get("creator_id").map_err(backend)?,
        advertiser_id: row.try_get("advertiser_id").map_err(backend)?,
        campaign_id: row.try_get("campaign_id").map_err(backend)?,
        content_format: row.try_get("content_format").map_err(backend)?,
        price_cents: row.try_get("price_cents").map_err(backend)?,
        currency: row.try_get("currency").map_err(backend)?,
        status: status.parse().map_err(|e| StoreError::Corrupt(format!("{e}")))?,
        created_at: row.try_get("created_at").map_err(backend)?,
        updated_at: row.try_get("updated_at").map_err(backend)?,
    })
}

#[async_trait]
impl CampaignRepository for PostgresStore {
    async fn get_campaign(&self, id: Uuid) -> StoreResult<Option<Campaign>> {
        let row = sqlx::query("SELECT * FROM campaigns WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;

        row.as_ref().map(campaign_from_row).transpose()
    }

    async fn save_campaign(&self, campaign: &Campaign) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO campaigns (
                id, advertiser_id, title, status,
                budget_min_cents, budget_max_cents, audience_min, audience_max,
                target_influencer_count, content_formats, platforms,
                target_countries, target_interests, product_categories,
                currency, target_rate_per_follower,
                sent_offers_count, accepted_offers_count, completed_offers_count,
                is_deleted, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                    $12, $13, $14, $15, $16, $17, $18, $19, $20, $21, $22)
            ON CONFLICT (id) DO UPDATE SET
                title = EXCLUDED.title,
                status = EXCLUDED.status,
                budget_min_cents = EXCLUDED.budget_min_cents,
                budget_max_cents = EXCLUDED.budget_max_cents,
                audience_min = EXCLUDED.audience_min,
                audience_max = EXCLUDED.audience_max,
                target_influencer_count = EXCLUDED.target_influencer_count,
                content_formats = EXCLUDED.content_formats,
                platforms = EXCLUDED.platforms,
                target_countries = EXCLUDED.target_countries,
                target_interests = EXCLUDED.target_interests,
                product_categories = EXCLUDED.product_categories,
                currency = EXCLUDED.currency,
                target_rate_per_follower = EXCLUDED.target_rate_per_follower,
                sent_offers_count = EXCLUDED.sent_offers_count,
                accepted_offers_count = EXCLUDED.accepted_offers_count,
                completed_offers_count = EXCLUDED.completed_offers_count,
                is_deleted = EXCLUDED.is_deleted,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(campaign.id)
        .bind(campaign.advertiser_id)
        .bind(&campaign.title)
        .bind(campaign.status.to_string())
        .bind(campaign.budget_min_cents)
        .bind(campaign.budget_max_cents)
        .bind(campaign.audience_min)
        .bind(campaign.audience_max)
        .bind(campaign.target_influencer_count)
        .bind(to_json(&campaign.content_formats)?)
        .bind(to_json(&campaign.platforms)?)
        .bind(to_json(&campaign.target_countries)?)
        .bind(to_json(&campaign.target_interests)?)
        .bind(to_json(&campaign.product_categories)?)
        .bind(&campaign.currency)
        .bind(campaign.target_rate_per_follower)
        .bind(campaign.sent_offers_count)
        .bind(campaign.accepted_offers_count)
        .bind(campaign.completed_offers_count)
        .bind(campaign.is_deleted)
        .bind(campaign.created_at)
        .bind(campaign.updated_at)
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        Ok(())
    }

    async fn update_campaign_status(&self, id: Uuid, status: CampaignStatus) -> StoreResult<()> {
        sqlx::query("UPDATE campaigns SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status.to_string())
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(())
    }

    async fn set_sent_offers_count(&self, id: Uuid, sent: i32) -> StoreResult<()> {
        sqlx::query(
            "UPDATE campaigns SET sent_offers_count = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(sent)
        .execute(&self.pool)
        .await
        .map_err(backend)?;
        Ok(())
    }

    async fn set_outcome_counters(
        &self,
        id: Uuid,
        accepted: i32,
        completed: i32,
    ) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE campaigns
            SET accepted_offers_count = $2,
                completed_offers_count = $3,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(accepted)
        .bind(completed)
        .execute(&self.pool)
        .await
        .map_err(backend)?;
        Ok(())
    }

    async fn mark_deleted(&self, id: Uuid) -> StoreResult<()> {
        sqlx::query("UPDATE campaigns SET is_deleted = TRUE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(())
    }
}

#[async_trait]
impl ListingRepository for PostgresStore {
    async fn list_active_by_platforms(
        &self,
        platforms: &[Platform],
    ) -> StoreResult<Vec<CreatorListing>> {
        let names: Vec<String> = platforms.iter().map(|p| p.as_str().to_string()).collect();

        let rows = sqlx::query(
            r#"
            SELECT * FROM creator_listings
            WHERE is_active = TRUE AND is_deleted = FALSE AND platform = ANY($1)
            "#,
        )
        .bind(&names)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        rows.iter().map(listing_from_row).collect()
    }
}

#[async_trait]
impl InvitationRepository for PostgresStore {
    async fn create_invitation(&self, invitation: &Invitation) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO invitations (
                id, creator_id, advertiser_id, campaign_id,
                content_format, price_cents, currency, status,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(invitation.id)
        .bind(invitation.creator_id)
        .bind(invitation.advertiser_id)
        .bind(invitation.campaign_id)
        .bind(&invitation.content_format)
        .bind(invitation.price_cents)
        .bind(&invitation.currency)
        .bind(invitation.status.to_string())
        .bind(invitation.created_at)
        .bind(invitation.updated_at)
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        Ok(())
    }

    async fn list_by_campaign(&self, campaign_id: Uuid) -> StoreResult<Vec<Invitation>> {
        let rows = sqlx::query(
            "SELECT * FROM invitations WHERE campaign_id = $1 ORDER BY created_at",
        )
        .bind(campaign_id)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        rows.iter().map(invitation_from_row).collect()
    }

    async fn update_invitation_status(
        &self,
        id: Uuid,
        status: InvitationStatus,
    ) -> StoreResult<()> {
        sqlx::query("UPDATE invitations SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status.to_string())
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(())
    }

    async fn count_recent_open(
        &self,
        advertiser_id: Uuid,
        creator_id: Uuid,
        since: DateTime<Utc>,
    ) -> StoreResult<u64> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS open_count FROM invitations
            WHERE advertiser_id = $1
              AND creator_id = $2
              AND status IN ('PENDING', 'ACCEPTED')
              AND created_at >= $3
            "#,
        )
        .bind(advertiser_id)
        .bind(creator_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(backend)?;

        let count: i64 = row.try_get("open_count").map_err(backend)?;
        Ok(count.max(0) as u64)
    }

    async fn expire_pending_for_campaign(&self, campaign_id: Uuid) -> StoreResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE invitations
            SET status = 'EXPIRED', updated_at = NOW()
            WHERE campaign_id = $1 AND status = 'PENDING'
            "#,
        )
        .bind(campaign_id)
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        Ok(result.rows_affected())
    }
}
