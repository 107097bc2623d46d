use crate::normalize::{self, LabelField};
use crate::platform::Platform;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// One creator's offering on one platform: a rate card of content formats
/// with fixed prices, plus the audience metadata the matcher filters on.
///
/// A creator may hold several listings (different platforms or price
/// sheets); the engine selects at most one listing+format per creator per
/// campaign. Demographic labels are stored pre-normalized, so filters never
/// re-branch on the raw input shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatorListing {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub platform: Platform,
    pub audience_size: i64,
    /// Normalized content format label -> price in cents.
    pub rate_card: BTreeMap<String, i64>,
    pub countries: BTreeSet<String>,
    pub interests: BTreeSet<String>,
    pub blacklisted_categories: BTreeSet<String>,
    pub currency: String,
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CreatorListing {
    pub fn new(creator_id: Uuid, platform: Platform, audience_size: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            creator_id,
            platform,
            audience_size,
            rate_card: BTreeMap::new(),
            countries: BTreeSet::new(),
            interests: BTreeSet::new(),
            blacklisted_categories: BTreeSet::new(),
            currency: "USD".to_string(),
            is_active: true,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder-style price entry; the format label is normalized on the way in.
    pub fn with_format_price(mut self, format: &str, price_cents: i64) -> Self {
        self.set_format_price(format, price_cents);
        self
    }

    pub fn set_format_price(&mut self, format: &str, price_cents: i64) {
        self.rate_card.insert(normalize::label(format), price_cents);
        self.updated_at = Utc::now();
    }

    pub fn formats(&self) -> BTreeSet<String> {
        self.rate_card.keys().cloned().collect()
    }

    /// Eligible for matching at all.
    pub fn is_listable(&self) -> bool {
        self.is_active && !self.is_deleted
    }

    /// Accepts either demographic shape (flat list or weighted map).
    pub fn set_countries(&mut self, field: LabelField) {
        self.countries = field.into_labels();
        self.updated_at = Utc::now();
    }

    pub fn set_interests(&mut self, field: LabelField) {
        self.interests = field.into_labels();
        self.updated_at = Utc::now();
    }

    pub fn set_blacklisted_categories(&mut self, field: LabelField) {
        self.blacklisted_categories = field.into_labels();
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_card_normalizes_format_labels() {
        let listing = CreatorListing::new(Uuid::new_v4(), Platform::Instagram, 5_000)
            .with_format_price(" Post ", 15_000)
            .with_format_price("STORY", 8_000);

        assert_eq!(listing.rate_card.get("post"), Some(&15_000));
        assert_eq!(listing.rate_card.get("story"), Some(&8_000));
    }

    #[test]
    fn test_weighted_countries_normalize_to_labels() {
        let mut listing = CreatorListing::new(Uuid::new_v4(), Platform::Youtube, 100_000);
        let field: LabelField = serde_json::from_str(r#"{"Germany": 55.0, "Austria": 45.0}"#).unwrap();
        listing.set_countries(field);

        assert!(listing.countries.contains("germany"));
        assert!(listing.countries.contains("austria"));
    }

    #[test]
    fn test_listable_requires_active_and_not_deleted() {
        let mut listing = CreatorListing::new(Uuid::new_v4(), Platform::Tiktok, 1_000);
        assert!(listing.is_listable());

        listing.is_active = false;
        assert!(!listing.is_listable());

        listing.is_active = true;
        listing.is_deleted = true;
        assert!(!listing.is_listable());
    }
}
