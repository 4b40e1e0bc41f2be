// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Plausibility pruning of airport candidates for one flight leg.

use crate::airport::AirportTable;
use crate::codes::IataCode;
use log::debug;
use serde::{Deserialize, Serialize};

/// Speed limits bounding how far a flight of a given duration can go.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegBounds {
    /// Slowest plausible average ground speed (turboprop, with taxi time).
    pub min_speed_kmh: f64,
    /// Fastest plausible average ground speed.
    pub max_speed_kmh: f64,
    /// Below this duration the lower distance bound is halved.
    pub short_hop_secs: i64,
}

impl Default for LegBounds {
    fn default() -> Self {
        Self {
            min_speed_kmh: 40.0,
            max_speed_kmh: 2200.0,
            short_hop_secs: 3600,
        }
    }
}

impl LegBounds {
    /// Inclusive `(lower, upper)` great-circle distance in meters.
    pub fn distance_range_m(&self, duration_secs: i64) -> (f64, f64) {
        let hours = duration_secs as f64 / 3600.0;
        let mut lower = hours * self.min_speed_kmh * 1000.0;
        let upper = hours * self.max_speed_kmh * 1000.0;
        if duration_secs < self.short_hop_secs {
            lower /= 2.0;
        }
        (lower, upper)
    }
}

/// Removes from `candidates` every airport that is out of range of all
/// `anchors` for a flight of `duration_secs`.
///
/// Does nothing without a positive duration, without anchors, with at most
/// one candidate, or when any anchor lacks a known coordinate. Candidates
/// without a coordinate are kept.
pub fn prune_candidates(
    airports: &AirportTable,
    bounds: &LegBounds,
    duration_secs: i64,
    anchors: &[IataCode],
    candidates: &mut Vec<IataCode>,
) {
    if duration_secs <= 0 || anchors.is_empty() || candidates.len() <= 1 {
        return;
    }
    let Some(anchor_coords) = anchors
        .iter()
        .map(|code| {
            airports
                .get(*code)
                .map(|a| a.coordinate)
                .filter(|c| c.is_valid())
        })
        .collect::<Option<Vec<_>>>()
    else {
        return;
    };

    let (lower, upper) = bounds.distance_range_m(duration_secs);
    candidates.retain(|code| {
        let Some(coord) = airports.get(*code).map(|a| a.coordinate).filter(|c| c.is_valid())
        else {
            return true;
        };
        let keep = anchor_coords.iter().any(|anchor| {
            let d = anchor.distance_m(&coord);
            (lower..=upper).contains(&d)
        });
        if !keep {
            debug!(
                "leg: dropped candidate={} duration_secs={} range_m={:.0}..{:.0}",
                code, duration_secs, lower, upper
            );
        }
        keep
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    const AIRPORTS: &str = "iata,icao,country,latitude,longitude,name\n\
        CGN,EDDK,DE,50.8659,7.1427,Köln Bonn\n\
        DUS,EDDL,DE,51.2895,6.7668,Düsseldorf\n\
        SFO,KSFO,US,37.6190,-122.3749,San Francisco\n\
        XXX,ZZZZ,DE,,,Unknown Field\n";

    fn codes(list: &[&str]) -> Vec<IataCode> {
        list.iter().map(|c| IataCode::new(c)).collect()
    }

    #[test]
    fn test_distance_range() {
        let bounds = LegBounds::default();
        let (lower, upper) = bounds.distance_range_m(7200);
        assert_eq!(lower, 80_000.0);
        assert_eq!(upper, 4_400_000.0);
        // short hop halves the lower bound
        assert_eq!(bounds.distance_range_m(1800).0, 10_000.0);
    }

    #[test]
    fn test_prunes_far_candidate() {
        let airports = AirportTable::from_csv(AIRPORTS).unwrap();
        let mut candidates = codes(&["CGN", "SFO"]);
        prune_candidates(&airports, &LegBounds::default(), 3600, &codes(&["DUS"]), &mut candidates);
        assert_eq!(candidates, codes(&["CGN"]));
    }

    #[test]
    fn test_no_evidence_no_change() {
        let airports = AirportTable::from_csv(AIRPORTS).unwrap();
        let bounds = LegBounds::default();
        let original = codes(&["CGN", "SFO"]);

        for (duration, anchors) in [
            (0, codes(&["DUS"])),
            (-5, codes(&["DUS"])),
            (3600, Vec::new()),
            (3600, codes(&["XXX"])),
            (3600, codes(&["DUS", "MUC"])),
        ] {
            let mut candidates = original.clone();
            prune_candidates(&airports, &bounds, duration, &anchors, &mut candidates);
            assert_eq!(candidates, original);
        }

        let mut single = codes(&["SFO"]);
        prune_candidates(&airports, &bounds, 3600, &codes(&["DUS"]), &mut single);
        assert_eq!(single, codes(&["SFO"]));
    }

    #[test]
    fn test_any_anchor_in_range_keeps() {
        let airports = AirportTable::from_csv(AIRPORTS).unwrap();
        let mut candidates = codes(&["CGN", "SFO", "XXX"]);
        prune_candidates(
            &airports,
            &LegBounds::default(),
            3600,
            &codes(&["DUS", "SFO"]),
            &mut candidates,
        );
        // CGN is near DUS; SFO is zero km from the SFO anchor, below the lower bound
        assert_eq!(candidates, codes(&["CGN", "XXX"]));
    }

    #[test]
    fn test_idempotent() {
        let airports = AirportTable::from_csv(AIRPORTS).unwrap();
        let bounds = LegBounds::default();
        let mut once = codes(&["CGN", "SFO"]);
        prune_candidates(&airports, &bounds, 3600, &codes(&["DUS"]), &mut once);
        let mut twice = once.clone();
        prune_candidates(&airports, &bounds, 3600, &codes(&["DUS"]), &mut twice);
        assert_eq!(once, twice);
    }
}
