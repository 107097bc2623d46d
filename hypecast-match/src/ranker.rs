use crate::models::MatchedCreator;
use std::cmp::Ordering;

/// Order matches by proximity to the campaign's target rate per follower,
/// ascending. Creators whose economics sit closest to the advertiser's
/// implied rate get invited first. Equal distances fall back to creator id
/// so the ordering is stable across runs and stores.
pub fn rank_by_target_rate(matches: &mut [MatchedCreator]) {
    matches.sort_by(|a, b| {
        a.distance
            .partial_cmp(&b.distance)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.creator_id.cmp(&b.creator_id))
    });
}
