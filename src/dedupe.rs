//! Pattern deduplication via sibling filtering.
//!
//! Two patterns are **siblings** when their normalized Hamming distance is
//! within `cutoff` of identity or of complementarity. Complementary patterns
//! count because a Hopfield network stores a pattern and its complement as
//! the same attractor, so keeping both adds nothing and over-weights it.
//!
//! Deduplication builds the sibling set of every pattern, then greedily
//! discards the pattern with the largest surviving sibling set until no
//! two retained patterns are siblings. Removing the most over-represented
//! pattern first shrinks overlapping clusters fastest while losing as few
//! patterns as possible.

use crate::error::{Result, ReverieError};
use crate::pattern::Pattern;
use log::debug;
use std::collections::BTreeSet;

/// Upper bound (exclusive) for the sibling cutoff.
///
/// At 0.5 every pair of patterns would be siblings of each other and the
/// corpus would degenerate to a single pattern.
pub const MAX_CUTOFF: f64 = 0.5;

/// Indices of all patterns within `cutoff` of identity or complementarity
/// of `patterns[idx]`. Always contains `idx` itself.
fn sibling_set(patterns: &[Pattern], idx: usize, cutoff: f64) -> BTreeSet<usize> {
    let mut siblings = BTreeSet::new();
    for (i, pattern) in patterns.iter().enumerate() {
        let dist = pattern.distance(&patterns[idx]);
        if dist <= cutoff || dist >= 1.0 - cutoff {
            siblings.insert(i);
        }
    }
    siblings
}

/// Reduce a corpus so that no two retained patterns are siblings.
///
/// Patterns with no siblings other than themselves are kept unconditionally.
/// Among the contested rest, the pattern with the largest current sibling
/// set is discarded (ties broken by lowest original index) and removed from
/// its siblings' sets, until every surviving set has shrunk to just its
/// owner.
///
/// The order of the returned corpus is not a contract; callers comparing
/// results should compare as sets.
///
/// # Errors
///
/// - `cutoff` outside `[0, 0.5)`
/// - patterns of differing lengths
pub fn dedupe_patterns(patterns: &[Pattern], cutoff: f64) -> Result<Vec<Pattern>> {
    if !(0.0..MAX_CUTOFF).contains(&cutoff) {
        return Err(ReverieError::Config {
            argument: "cutoff",
            value: cutoff,
            constraint: "0 <= cutoff < 0.5",
        });
    }

    if patterns.is_empty() {
        return Ok(Vec::new());
    }

    let len = patterns[0].len();
    for pattern in patterns {
        if pattern.len() != len {
            return Err(ReverieError::ShapeMismatch {
                expected: len,
                got: pattern.len(),
            });
        }
    }

    let mut sets: Vec<BTreeSet<usize>> = (0..patterns.len())
        .map(|i| sibling_set(patterns, i, cutoff))
        .collect();

    let mut contested: Vec<usize> = Vec::new();
    let mut unique: Vec<usize> = Vec::new();
    for (i, set) in sets.iter().enumerate() {
        if set.len() > 1 {
            contested.push(i);
        } else {
            unique.push(i);
        }
    }

    loop {
        // Largest surviving sibling set; lowest index wins ties.
        let target = contested
            .iter()
            .copied()
            .max_by(|&a, &b| sets[a].len().cmp(&sets[b].len()).then(b.cmp(&a)));

        let Some(target) = target else { break };
        if sets[target].len() <= 1 {
            break;
        }

        contested.retain(|&i| i != target);
        let siblings = std::mem::take(&mut sets[target]);
        for sibling in siblings {
            if sibling != target {
                sets[sibling].remove(&target);
            }
        }
    }

    let mut survivors: Vec<usize> = contested;
    survivors.extend(unique);
    survivors.sort_unstable();

    debug!(
        "deduplicated {} patterns to {} at cutoff {}",
        patterns.len(),
        survivors.len(),
        cutoff
    );

    Ok(survivors.into_iter().map(|i| patterns[i].clone()).collect())
}
