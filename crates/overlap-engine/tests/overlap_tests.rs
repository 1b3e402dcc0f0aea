//! Tests for overlap detection over event snapshots.

use std::collections::BTreeSet;

use chrono::{TimeZone, Utc};
use overlap_engine::{detect_overlaps, find_overlaps, intervals_overlap, Event, OverlapPair};

/// Helper to create an Event from hour/minute ranges on 2026-01-01.
fn event(title: &str, start_hour: u32, start_min: u32, end_hour: u32, end_min: u32) -> Event {
    Event::new(
        title,
        Utc.with_ymd_and_hms(2026, 1, 1, start_hour, start_min, 0)
            .unwrap(),
        Utc.with_ymd_and_hms(2026, 1, 1, end_hour, end_min, 0)
            .unwrap(),
    )
    .unwrap()
}

fn pair(event1: &str, event2: &str) -> OverlapPair {
    OverlapPair {
        event1: event1.to_string(),
        event2: event2.to_string(),
    }
}

fn pair_set(pairs: Vec<OverlapPair>) -> BTreeSet<OverlapPair> {
    pairs.into_iter().collect()
}

#[test]
fn two_overlapping_events_detected() {
    // A: 09:00-10:00, B: 09:30-11:00
    let events = vec![event("A", 9, 0, 10, 0), event("B", 9, 30, 11, 0)];

    let overlaps = detect_overlaps(&events);

    assert_eq!(overlaps, vec![pair("A", "B")]);
}

#[test]
fn non_overlapping_events_no_overlap() {
    // A: 09:00-10:00, B: 11:00-12:00
    let events = vec![event("A", 9, 0, 10, 0), event("B", 11, 0, 12, 0)];

    assert!(detect_overlaps(&events).is_empty());
}

#[test]
fn adjacent_events_not_an_overlap() {
    // A: 09:00-10:00, B: 10:00-11:00 → end == start, NOT overlapping
    let events = vec![event("A", 9, 0, 10, 0), event("B", 10, 0, 11, 0)];

    assert!(
        detect_overlaps(&events).is_empty(),
        "adjacent events (end == start) should not overlap"
    );
}

#[test]
fn one_second_of_shared_time_is_an_overlap() {
    let a = Event::new(
        "A",
        Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 1, 1, 10, 0, 1).unwrap(),
    )
    .unwrap();
    let b = event("B", 10, 0, 11, 0);

    let events = [a, b];
    let overlaps = find_overlaps(&events);

    assert_eq!(overlaps.len(), 1);
    assert_eq!(overlaps[0].overlap_minutes, 0);
}

#[test]
fn triple_mutual_overlap_reports_every_pair() {
    // A: 09:00-11:00, B: 09:30-10:30, C: 10:00-12:00
    let events = vec![
        event("A", 9, 0, 11, 0),
        event("B", 9, 30, 10, 30),
        event("C", 10, 0, 12, 0),
    ];

    let overlaps = detect_overlaps(&events);

    assert_eq!(
        overlaps,
        vec![pair("A", "B"), pair("A", "C"), pair("B", "C")]
    );
}

#[test]
fn empty_input_no_overlaps() {
    assert!(detect_overlaps(&[]).is_empty());
}

#[test]
fn single_event_no_overlaps() {
    assert!(detect_overlaps(&[event("A", 9, 0, 10, 0)]).is_empty());
}

#[test]
fn unsorted_input_is_sorted_before_reporting() {
    // B is listed first but A starts first.
    let events = vec![event("B", 9, 30, 11, 0), event("A", 9, 0, 10, 0)];

    assert_eq!(detect_overlaps(&events), vec![pair("A", "B")]);
}

#[test]
fn reverse_chronological_input_yields_same_pair_set() {
    let chronological = vec![
        event("A", 8, 0, 9, 30),
        event("B", 9, 0, 10, 0),
        event("C", 9, 45, 12, 0),
        event("D", 12, 0, 13, 0),
        event("E", 12, 30, 12, 45),
    ];
    let mut reversed = chronological.clone();
    reversed.reverse();

    assert_eq!(
        pair_set(detect_overlaps(&chronological)),
        pair_set(detect_overlaps(&reversed))
    );
    assert_eq!(
        pair_set(detect_overlaps(&chronological)),
        BTreeSet::from([pair("A", "B"), pair("B", "C"), pair("D", "E")])
    );
}

#[test]
fn caller_slice_is_not_reordered() {
    let events = vec![
        event("C", 11, 0, 12, 0),
        event("A", 9, 0, 10, 0),
        event("B", 9, 30, 11, 30),
    ];
    let before: Vec<String> = events.iter().map(|e| e.title().to_string()).collect();

    let _ = detect_overlaps(&events);

    let after: Vec<String> = events.iter().map(|e| e.title().to_string()).collect();
    assert_eq!(before, after);
}

#[test]
fn fully_contained_event_correct_overlap() {
    // A: 09:00-12:00, B: 10:00-11:00 (fully inside A)
    let events = vec![event("A", 9, 0, 12, 0), event("B", 10, 0, 11, 0)];

    let overlaps = find_overlaps(&events);

    assert_eq!(overlaps.len(), 1, "fully contained event should overlap");
    assert_eq!(
        overlaps[0].overlap_minutes, 60,
        "overlap should be the duration of the smaller event (60 min)"
    );
}

#[test]
fn long_event_overlaps_past_a_short_gap() {
    // A spans the whole morning; B and C are disjoint from each other but both
    // inside A. The sweep from A must not stop at the B/C gap.
    let events = vec![
        event("A", 8, 0, 12, 0),
        event("B", 9, 0, 9, 30),
        event("C", 10, 0, 10, 30),
    ];

    assert_eq!(
        detect_overlaps(&events),
        vec![pair("A", "B"), pair("A", "C")]
    );
}

#[test]
fn duplicate_titles_reported_as_separate_pairs() {
    let events = vec![
        event("Standup", 9, 0, 9, 30),
        event("Standup", 9, 15, 9, 45),
    ];

    assert_eq!(detect_overlaps(&events), vec![pair("Standup", "Standup")]);
}

#[test]
fn identical_intervals_overlap_once() {
    let events = vec![event("A", 9, 0, 10, 0), event("B", 9, 0, 10, 0)];

    let overlaps = find_overlaps(&events);

    assert_eq!(overlaps.len(), 1);
    assert_eq!(overlaps[0].overlap_minutes, 60);
    // Ties keep input order.
    assert_eq!(overlaps[0].first.title(), "A");
    assert_eq!(overlaps[0].second.title(), "B");
}

#[test]
fn overlap_minutes_for_partial_overlap() {
    // A: 09:00-10:00, B: 09:30-10:30 → 30-min overlap
    let events = vec![event("A", 9, 0, 10, 0), event("B", 9, 30, 10, 30)];

    let overlaps = find_overlaps(&events);

    assert_eq!(overlaps.len(), 1);
    assert_eq!(overlaps[0].overlap_minutes, 30);
    assert_eq!(overlaps[0].to_pair(), pair("A", "B"));
}

#[test]
fn intervals_overlap_is_symmetric_and_strict() {
    let a = event("A", 9, 0, 10, 0);
    let b = event("B", 9, 30, 11, 0);
    let c = event("C", 10, 0, 11, 0);

    assert!(intervals_overlap(&a, &b));
    assert!(intervals_overlap(&b, &a));
    assert!(!intervals_overlap(&a, &c));
    assert!(!intervals_overlap(&c, &a));
}

#[test]
fn no_self_pairs() {
    let events = vec![
        event("A", 9, 0, 10, 0),
        event("B", 9, 30, 10, 30),
        event("C", 10, 15, 11, 0),
    ];

    for overlap in find_overlaps(&events) {
        assert_ne!(overlap.first.id(), overlap.second.id());
    }
}

#[test]
fn events_across_days_compare_by_instant() {
    let overnight = Event::new(
        "Overnight",
        Utc.with_ymd_and_hms(2026, 1, 1, 22, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 1, 2, 6, 0, 0).unwrap(),
    )
    .unwrap();
    let early = Event::new(
        "Early",
        Utc.with_ymd_and_hms(2026, 1, 2, 5, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 1, 2, 7, 0, 0).unwrap(),
    )
    .unwrap();

    assert_eq!(
        detect_overlaps(&[early, overnight]),
        vec![pair("Overnight", "Early")]
    );
}
