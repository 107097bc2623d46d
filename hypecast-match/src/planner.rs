/// Computes how many ranked matches to invite for a target headcount.
///
/// Inviting `ceil(target × (1 + fraction))` compensates for the expected
/// 20–25% decline/non-response rate. Best effort only: a scarce pool is
/// invited in full rather than blocked on the unmet margin.
#[derive(Debug, Clone)]
pub struct OverbookingPlanner {
    fraction: f64,
}

impl OverbookingPlanner {
    pub fn new(fraction: f64) -> Self {
        Self {
            fraction: fraction.max(0.0),
        }
    }

    pub fn invites_for(&self, target: i32, available: usize) -> usize {
        if target <= 0 {
            return 0;
        }
        let overbooked = (target as f64 * (1.0 + self.fraction)).ceil() as usize;
        overbooked.min(available)
    }
}

impl Default for OverbookingPlanner {
    fn default() -> Self {
        Self::new(0.25)
    }
}
