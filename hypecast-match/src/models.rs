use hypecast_shared::Platform;
use serde::Serialize;
use uuid::Uuid;

/// A creator that survived every filter, reduced to the single cheapest
/// compliant (listing, format) option. Engine-internal and transient:
/// produced by the matcher, consumed by ranking and dispatch, never
/// persisted.
#[derive(Debug, Clone, Serialize)]
pub struct MatchedCreator {
    pub creator_id: Uuid,
    pub listing_id: Uuid,
    pub platform: Platform,
    pub content_format: String,
    pub price_cents: i64,
    pub currency: String,
    pub audience_size: i64,
    /// Cents per follower for the selected format.
    pub rate_per_follower: f64,
    /// Absolute distance from the campaign's target rate per follower.
    pub distance: f64,
}

impl MatchedCreator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        creator_id: Uuid,
        listing_id: Uuid,
        platform: Platform,
        content_format: String,
        price_cents: i64,
        currency: String,
        audience_size: i64,
        target_rate_per_follower: f64,
    ) -> Self {
        let rate_per_follower = if audience_size > 0 {
            price_cents as f64 / audience_size as f64
        } else {
            0.0
        };
        Self {
            creator_id,
            listing_id,
            platform,
            content_format,
            price_cents,
            currency,
            audience_size,
            rate_per_follower,
            distance: (rate_per_follower - target_rate_per_follower).abs(),
        }
    }
}
