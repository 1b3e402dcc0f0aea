//! Detect overlapping events in a snapshot.
//!
//! Sorts a private list of references by start time, then sweeps forward from each
//! event until the first later event that starts at or after its end. Adjacent
//! events (where one ends exactly when another starts) are NOT overlaps.
//!
//! The sweep stops early because the list is sorted: once `sorted[j].start` is at
//! or past `sorted[i].end`, every later event starts no earlier than `sorted[j]`.
//! Cost is O(n log n + k) for k reported pairs, which is Θ(n²) only when nearly
//! every pair overlaps.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::event::Event;

/// Two overlapping events, reported by title.
///
/// `event1` starts no later than `event2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OverlapPair {
    pub event1: String,
    pub event2: String,
}

/// A detected overlap between two events, with its duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlap<'a> {
    /// The event that starts first (ties keep input order).
    pub first: &'a Event,
    pub second: &'a Event,
    pub overlap_minutes: i64,
}

impl Overlap<'_> {
    pub fn to_pair(&self) -> OverlapPair {
        OverlapPair {
            event1: self.first.title().to_string(),
            event2: self.second.title().to_string(),
        }
    }
}

/// Whether two events share at least one instant.
///
/// Two intervals overlap iff `a.start < b.end && b.start < a.end`, which
/// excludes the adjacent case where `a.end == b.start`.
pub fn intervals_overlap(a: &Event, b: &Event) -> bool {
    a.start_time() < b.end_time() && b.start_time() < a.end_time()
}

/// Find every pair of overlapping events, with the overlap duration.
///
/// The caller's slice is not reordered. Pairs come out grouped by the earlier
/// event in start-time order.
pub fn find_overlaps(events: &[Event]) -> Vec<Overlap<'_>> {
    let mut sorted: Vec<&Event> = events.iter().collect();
    sorted.sort_by_key(|e| e.start_time());

    let mut overlaps = Vec::new();

    for (i, &first) in sorted.iter().enumerate() {
        for &second in &sorted[i + 1..] {
            // Sorted by start, so `second.start >= first.start` and the general
            // predicate reduces to this single comparison.
            if first.end_time() <= second.start_time() {
                break;
            }

            let overlap_start = first.start_time().max(second.start_time());
            let overlap_end = first.end_time().min(second.end_time());

            overlaps.push(Overlap {
                first,
                second,
                overlap_minutes: (overlap_end - overlap_start).num_minutes(),
            });
        }
    }

    debug!(
        events = events.len(),
        overlaps = overlaps.len(),
        "overlap_sweep_complete"
    );

    overlaps
}

/// Report every pair of overlapping events by title.
///
/// Each unordered pair appears exactly once and never pairs an event with
/// itself. Events that share a title are still reported as separate pairs.
pub fn detect_overlaps(events: &[Event]) -> Vec<OverlapPair> {
    find_overlaps(events).iter().map(Overlap::to_pair).collect()
}
