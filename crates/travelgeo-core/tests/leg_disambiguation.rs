// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz
//
// Pruning airport candidates of one flight endpoint using the other endpoint
// and the scheduled duration.

use travelgeo_core::leg::LegBounds;
use travelgeo_core::{resolve, Database, IataCode};

fn codes(list: &[&str]) -> Vec<IataCode> {
    list.iter().map(|c| IataCode::new(c)).collect()
}

fn prune(duration_secs: i64, anchors: &[&str], candidates: &[&str]) -> Vec<IataCode> {
    let mut set = codes(candidates);
    Database::global().prune_leg(&LegBounds::default(), duration_secs, &codes(anchors), &mut set);
    set
}

#[test]
fn test_one_hour_drops_intercontinental_candidate() {
    // CGN is about 50 km from DUS, SFO about 9000 km
    assert_eq!(prune(3600, &["DUS"], &["CGN", "SFO"]), codes(&["CGN"]));
}

#[test]
fn test_resolved_candidates_are_pruned() {
    let mut arrival = resolve("Francisco");
    assert_eq!(arrival, codes(&["OPO", "SFO"]));
    Database::global().prune_leg(&LegBounds::default(), 3600, &codes(&["LIS"]), &mut arrival);
    assert_eq!(arrival, codes(&["OPO"]));
}

#[test]
fn test_short_hop_lower_bound() {
    // 30 minutes: FRA itself is too close, Hahn is plausible
    assert_eq!(prune(1800, &["FRA"], &["FRA", "HHN"]), codes(&["HHN"]));
}

#[test]
fn test_all_plausible_candidates_survive() {
    let london = ["LCY", "LGW", "LHR", "LTN", "STN"];
    assert_eq!(prune(7 * 3600, &["JFK"], &london), codes(&london));
}

#[test]
fn test_insufficient_evidence() {
    assert_eq!(prune(3600, &[], &["CGN", "SFO"]), codes(&["CGN", "SFO"]));
    assert_eq!(prune(0, &["DUS"], &["CGN", "SFO"]), codes(&["CGN", "SFO"]));
    assert_eq!(prune(3600, &["DUS", "QQQ"], &["CGN", "SFO"]), codes(&["CGN", "SFO"]));
    assert_eq!(prune(3600, &["DUS"], &["SFO"]), codes(&["SFO"]));
}

#[test]
fn test_pruning_only_removes_and_is_idempotent() {
    let db = Database::global();
    let bounds = LegBounds::default();
    for (duration, anchors, candidates) in [
        (3600, vec!["DUS"], resolve("Paris")),
        (5400, vec!["MUC"], resolve("London")),
        (900, vec!["BER", "TXL"], resolve("Flughafen Berlin")),
        (40_000, vec!["SYD"], resolve("Milan")),
    ] {
        let anchors = codes(&anchors);
        let mut once = candidates.clone();
        db.prune_leg(&bounds, duration, &anchors, &mut once);
        assert!(once.iter().all(|c| candidates.contains(c)));
        let mut twice = once.clone();
        db.prune_leg(&bounds, duration, &anchors, &mut twice);
        assert_eq!(once, twice);
    }
}
