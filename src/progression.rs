//! Experience-to-level ledger.
//!
//! Levels 1..=5 follow a fixed threshold table. Past the table, each level's
//! requirement grows by an additional `extra_requirement_step` over the
//! previous increase (level 6 costs +1000, level 7 +1500, ...), so the
//! mapping is total and strictly increasing for arbitrarily large experience.

use crate::config::ProgressionParams;
use crate::types::LearnerProfile;

/// Cumulative experience required to hold `level`. Exact in `i128` so the
/// lookup never overflows or panics.
fn requirement_for_level(level: i64, params: &ProgressionParams) -> i128 {
    let table = &params.level_thresholds;
    if level <= 1 {
        return 0;
    }
    if (level as usize) <= table.len() {
        return table[(level - 1) as usize] as i128;
    }

    let base = table.last().copied().unwrap_or(0) as i128;
    // A non-positive step would stall the level search.
    let step = params.extra_requirement_step.max(1) as i128;
    let extrapolated = level as i128 - table.len() as i128;
    // Increments past the table: 2*step, 3*step, ..., (k+1)*step.
    let sum = step * ((extrapolated + 1) * (extrapolated + 2) / 2 - 1);
    base + sum
}

/// Largest level whose requirement is at or below `experience`. Total and
/// monotonic non-decreasing; negative input is treated as zero.
pub fn level_for(experience: i64, params: &ProgressionParams) -> i64 {
    let exp = experience.max(0) as i128;

    let mut lo = 1i64;
    let mut hi = 2i64;
    while requirement_for_level(hi, params) <= exp {
        lo = hi;
        hi = hi.saturating_mul(2);
    }
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if requirement_for_level(mid, params) <= exp {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    lo
}

/// Adds earned experience, re-derives the level and pays the level-up coin
/// bonus when at least one threshold was crossed.
pub fn add_experience(
    profile: &mut LearnerProfile,
    xp: i64,
    params: &ProgressionParams,
) -> (i64, bool) {
    let old_level = level_for(profile.experience, params);
    profile.experience = profile.experience.saturating_add(xp.max(0));
    let new_level = level_for(profile.experience, params);
    profile.level = new_level;

    let leveled_up = new_level > old_level;
    if leveled_up {
        profile.currency = profile.currency.saturating_add(params.level_up_coins);
    }
    (new_level, leveled_up)
}
