use crate::models::MatchedCreator;
use hypecast_shared::normalize;
use hypecast_shared::{Campaign, CreatorListing, Platform};
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use tracing::debug;

/// Which filter stage rejected a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectStage {
    Audience,
    Format,
    Country,
    Interest,
    Category,
    Budget,
}

/// Per-stage rejection tally for one matching run. `considered` counts
/// eligible listings fed through the pipeline; `matched` counts distinct
/// creators that produced a match. Surfaced both in structured logs and in
/// the no-inventory error so advertisers can see which criterion to relax.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchStats {
    pub considered: u32,
    pub rejected_audience: u32,
    pub rejected_format: u32,
    pub rejected_country: u32,
    pub rejected_interest: u32,
    pub rejected_category: u32,
    pub rejected_budget: u32,
    pub matched: u32,
}

impl MatchStats {
    fn bump(&mut self, stage: RejectStage) {
        match stage {
            RejectStage::Audience => self.rejected_audience += 1,
            RejectStage::Format => self.rejected_format += 1,
            RejectStage::Country => self.rejected_country += 1,
            RejectStage::Interest => self.rejected_interest += 1,
            RejectStage::Category => self.rejected_category += 1,
            RejectStage::Budget => self.rejected_budget += 1,
        }
    }
}

impl fmt::Display for MatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} creators matched from {} listings ({} outside audience range, {} without a requested \
             content format, {} outside target countries, {} without target interests, \
             {} blacklisting the product category, {} priced outside budget)",
            self.matched,
            self.considered,
            self.rejected_audience,
            self.rejected_format,
            self.rejected_country,
            self.rejected_interest,
            self.rejected_category,
            self.rejected_budget,
        )
    }
}

/// Everything one matching run produced.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub matches: Vec<MatchedCreator>,
    pub stats: MatchStats,
}

/// Filters creator inventory against one campaign's criteria.
///
/// Criteria sets are normalized once at construction; every comparison
/// afterwards is against canonical labels. Each filter is a hard reject in
/// the order: audience range, format overlap, country overlap (if
/// constrained), interest overlap (if constrained), product-category
/// blacklist, price-in-budget. Among surviving formats the cheapest wins,
/// and across a creator's listings only the single cheapest match is kept.
pub struct Matcher<'a> {
    campaign: &'a Campaign,
    formats: BTreeSet<String>,
    countries: BTreeSet<String>,
    interests: BTreeSet<String>,
    categories: BTreeSet<String>,
}

impl<'a> Matcher<'a> {
    pub fn new(campaign: &'a Campaign) -> Self {
        Self {
            campaign,
            formats: normalize::label_set(&campaign.content_formats),
            countries: normalize::label_set(&campaign.target_countries),
            interests: normalize::label_set(&campaign.target_interests),
            categories: normalize::label_set(&campaign.product_categories),
        }
    }

    pub fn run(&self, listings: &[CreatorListing]) -> MatchOutcome {
        let mut stats = MatchStats::default();
        let mut best: HashMap<uuid::Uuid, MatchedCreator> = HashMap::new();

        for listing in listings {
            if !self.is_eligible(listing) {
                continue;
            }
            stats.considered += 1;

            match self.evaluate(listing) {
                Ok((format, price_cents)) => {
                    let candidate = MatchedCreator::new(
                        listing.creator_id,
                        listing.id,
                        listing.platform.clone(),
                        format,
                        price_cents,
                        listing.currency.clone(),
                        listing.audience_size,
                        self.campaign.target_rate_per_follower,
                    );
                    match best.entry(listing.creator_id) {
                        Entry::Occupied(mut slot) => {
                            if candidate.price_cents < slot.get().price_cents {
                                slot.insert(candidate);
                            }
                        }
                        Entry::Vacant(slot) => {
                            slot.insert(candidate);
                        }
                    }
                }
                Err(stage) => {
                    stats.bump(stage);
                    debug!(
                        campaign_id = %self.campaign.id,
                        listing_id = %listing.id,
                        creator_id = %listing.creator_id,
                        stage = ?stage,
                        "listing rejected"
                    );
                }
            }
        }

        stats.matched = best.len() as u32;
        MatchOutcome {
            matches: best.into_values().collect(),
            stats,
        }
    }

    /// Pre-pipeline exclusions: inactive/deleted inventory, off-platform
    /// listings, and the advertiser's own creator account.
    fn is_eligible(&self, listing: &CreatorListing) -> bool {
        listing.is_listable()
            && listing.creator_id != self.campaign.advertiser_id
            && self.platform_requested(&listing.platform)
    }

    fn platform_requested(&self, platform: &Platform) -> bool {
        self.campaign.platforms.contains(platform)
    }

    fn evaluate(&self, listing: &CreatorListing) -> Result<(String, i64), RejectStage> {
        let campaign = self.campaign;

        if listing.audience_size < campaign.audience_min
            || listing.audience_size > campaign.audience_max
        {
            return Err(RejectStage::Audience);
        }

        // Rate card keys are normalized on insert; intersect with the
        // normalized requested formats.
        let overlapping: Vec<&String> = listing
            .rate_card
            .keys()
            .filter(|format| self.formats.contains(*format))
            .collect();
        if overlapping.is_empty() {
            return Err(RejectStage::Format);
        }

        if !self.countries.is_empty() && !normalize::overlaps(&self.countries, &listing.countries)
        {
            return Err(RejectStage::Country);
        }

        if !self.interests.is_empty() && !normalize::overlaps(&self.interests, &listing.interests)
        {
            return Err(RejectStage::Interest);
        }

        if normalize::overlaps(&self.categories, &listing.blacklisted_categories) {
            return Err(RejectStage::Category);
        }

        // Cheapest in-budget format. BTreeMap iteration order makes the
        // price tie-break deterministic (first format label wins).
        overlapping
            .into_iter()
            .filter_map(|format| {
                let price = listing.rate_card[format];
                (campaign.budget_min_cents..=campaign.budget_max_cents)
                    .contains(&price)
                    .then(|| (format.clone(), price))
            })
            .min_by_key(|(_, price)| *price)
            .ok_or(RejectStage::Budget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn campaign() -> Campaign {
        let mut c = Campaign::new(Uuid::new_v4(), "Launch", 10_000, 50_000, 1_000, 10_000, 4);
        c.platforms.insert(Platform::Instagram);
        c.content_formats.insert("Post".to_string());
        c
    }

    fn listing(audience: i64, post_price: i64) -> CreatorListing {
        CreatorListing::new(Uuid::new_v4(), Platform::Instagram, audience)
            .with_format_price("post", post_price)
    }

    #[test]
    fn test_budget_filter_keeps_only_in_range_prices() {
        let campaign = campaign();
        let listings: Vec<CreatorListing> = [8_000, 10_000, 25_000, 50_000, 60_000]
            .iter()
            .map(|&price| listing(5_000, price))
            .collect();

        let outcome = Matcher::new(&campaign).run(&listings);
        assert_eq!(outcome.matches.len(), 3);
        assert_eq!(outcome.stats.rejected_budget, 2);
        for m in &outcome.matches {
            assert!(m.price_cents >= 10_000 && m.price_cents <= 50_000);
        }
    }

    #[test]
    fn test_audience_range_is_inclusive() {
        let campaign = campaign();
        let listings = vec![listing(1_000, 20_000), listing(10_000, 20_000), listing(999, 20_000)];

        let outcome = Matcher::new(&campaign).run(&listings);
        assert_eq!(outcome.matches.len(), 2);
        assert_eq!(outcome.stats.rejected_audience, 1);
    }

    #[test]
    fn test_format_match_is_case_insensitive() {
        let campaign = campaign(); // requests "Post"
        let listings = vec![
            CreatorListing::new(Uuid::new_v4(), Platform::Instagram, 5_000)
                .with_format_price("POST", 20_000),
            CreatorListing::new(Uuid::new_v4(), Platform::Instagram, 5_000)
                .with_format_price("reel", 20_000),
        ];

        let outcome = Matcher::new(&campaign).run(&listings);
        assert_eq!(outcome.matches.len(), 1);
        assert_eq!(outcome.stats.rejected_format, 1);
    }

    #[test]
    fn test_country_filter_only_applies_when_targeted() {
        let mut constrained = campaign();
        constrained.target_countries.insert("Russia".to_string());

        let mut ru = listing(5_000, 20_000);
        ru.countries.insert("russia".to_string());
        let mut us = listing(5_000, 20_000);
        us.countries.insert("usa".to_string());

        let outcome = Matcher::new(&constrained).run(&[ru.clone(), us.clone()]);
        assert_eq!(outcome.matches.len(), 1);
        assert_eq!(outcome.stats.rejected_country, 1);

        // No target countries: same inventory all passes.
        let open = campaign();
        let outcome = Matcher::new(&open).run(&[ru, us]);
        assert_eq!(outcome.matches.len(), 2);
    }

    #[test]
    fn test_blacklisted_product_category_rejects() {
        let mut c = campaign();
        c.product_categories.insert("Gambling".to_string());

        let mut refuses = listing(5_000, 20_000);
        refuses.blacklisted_categories.insert("gambling".to_string());
        let accepts = listing(5_000, 20_000);

        let outcome = Matcher::new(&c).run(&[refuses, accepts]);
        assert_eq!(outcome.matches.len(), 1);
        assert_eq!(outcome.stats.rejected_category, 1);
    }

    #[test]
    fn test_cheapest_in_budget_format_is_selected() {
        let mut c = campaign();
        c.content_formats.insert("story".to_string());

        let l = CreatorListing::new(Uuid::new_v4(), Platform::Instagram, 5_000)
            .with_format_price("post", 30_000)
            .with_format_price("story", 12_000);

        let outcome = Matcher::new(&c).run(&[l]);
        assert_eq!(outcome.matches.len(), 1);
        assert_eq!(outcome.matches[0].content_format, "story");
        assert_eq!(outcome.matches[0].price_cents, 12_000);
    }

    #[test]
    fn test_below_budget_format_does_not_win() {
        let mut c = campaign();
        c.content_formats.insert("story".to_string());

        // Story is cheaper but under budget_min; the in-budget post wins.
        let l = CreatorListing::new(Uuid::new_v4(), Platform::Instagram, 5_000)
            .with_format_price("post", 30_000)
            .with_format_price("story", 5_000);

        let outcome = Matcher::new(&c).run(&[l]);
        assert_eq!(outcome.matches[0].content_format, "post");
        assert_eq!(outcome.matches[0].price_cents, 30_000);
    }

    #[test]
    fn test_single_cheapest_match_per_creator_across_listings() {
        let c = campaign();
        let creator = Uuid::new_v4();

        let pricey = CreatorListing::new(creator, Platform::Instagram, 5_000)
            .with_format_price("post", 40_000);
        let cheap = CreatorListing::new(creator, Platform::Instagram, 6_000)
            .with_format_price("post", 15_000);

        let outcome = Matcher::new(&c).run(&[pricey, cheap.clone()]);
        assert_eq!(outcome.matches.len(), 1);
        assert_eq!(outcome.matches[0].listing_id, cheap.id);
        assert_eq!(outcome.matches[0].price_cents, 15_000);
        assert_eq!(outcome.stats.matched, 1);
    }

    #[test]
    fn test_stats_display_reports_creators_against_listings() {
        let c = campaign();
        let creator = Uuid::new_v4();

        // One creator with two qualifying listings: two considered, one match.
        let listings = vec![
            CreatorListing::new(creator, Platform::Instagram, 5_000)
                .with_format_price("post", 20_000),
            CreatorListing::new(creator, Platform::Instagram, 6_000)
                .with_format_price("post", 25_000),
        ];

        let outcome = Matcher::new(&c).run(&listings);
        assert_eq!(outcome.stats.matched, 1);
        assert_eq!(outcome.stats.considered, 2);
        assert!(outcome
            .stats
            .to_string()
            .starts_with("1 creators matched from 2 listings"));
    }

    #[test]
    fn test_advertisers_own_listing_is_excluded() {
        let c = campaign();
        let own = CreatorListing::new(c.advertiser_id, Platform::Instagram, 5_000)
            .with_format_price("post", 20_000);

        let outcome = Matcher::new(&c).run(&[own]);
        assert!(outcome.matches.is_empty());
        assert_eq!(outcome.stats.considered, 0);
    }

    #[test]
    fn test_inactive_and_deleted_listings_are_excluded() {
        let c = campaign();
        let mut inactive = listing(5_000, 20_000);
        inactive.is_active = false;
        let mut deleted = listing(5_000, 20_000);
        deleted.is_deleted = true;

        let outcome = Matcher::new(&c).run(&[inactive, deleted]);
        assert_eq!(outcome.stats.considered, 0);
        assert!(outcome.matches.is_empty());
    }
}
