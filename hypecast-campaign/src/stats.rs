use hypecast_shared::Invitation;

/// Recomputed aggregate counters for one campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutcomeCounters {
    pub accepted: i32,
    pub completed: i32,
}

/// Re-derive the outcome counters from a full rescan of the campaign's
/// invitations. Counting instead of incrementing makes reconciliation
/// idempotent: a retried webhook or a duplicate stats pass converges to the
/// same values instead of drifting.
pub fn reconcile(invitations: &[Invitation]) -> OutcomeCounters {
    let accepted = invitations
        .iter()
        .filter(|i| i.status.counts_as_accepted())
        .count() as i32;
    let completed = invitations
        .iter()
        .filter(|i| i.status == hypecast_shared::InvitationStatus::Completed)
        .count() as i32;

    OutcomeCounters { accepted, completed }
}

/// Every invitation has reached a terminal status. Empty campaigns are not
/// settled; completion requires at least one invitation to have run its
/// course.
pub fn all_settled(invitations: &[Invitation]) -> bool {
    !invitations.is_empty() && invitations.iter().all(|i| i.status.is_terminal())
}
