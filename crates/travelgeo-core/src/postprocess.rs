// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Completing partially extracted flight legs from the reference tables.

use crate::codes::{CountryId, IataCode};
use crate::coord::Coordinate;
use crate::data::Database;
use crate::leg::LegBounds;
use chrono::Duration;
use chrono_tz::Tz;

/// One end of a flight as extracted from a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AirportRef {
    pub iata: Option<IataCode>,
    pub name: String,
    /// `Coordinate::INVALID` when unknown.
    pub coordinate: Coordinate,
    pub country: Option<CountryId>,
    pub timezone: Option<Tz>,
}

impl AirportRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_code(code: IataCode) -> Self {
        Self {
            iata: Some(code),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightLeg {
    pub departure: AirportRef,
    pub arrival: AirportRef,
    pub duration: Option<Duration>,
}

/// Fills missing fields of `leg` from the airport tables. Present fields are
/// never overwritten.
pub fn complete_leg(db: &Database, bounds: &LegBounds, leg: &mut FlightLeg) {
    let mut departure = candidates(db, &leg.departure);
    let mut arrival = candidates(db, &leg.arrival);

    if let Some(secs) = leg.duration.map(|d| d.num_seconds()).filter(|s| *s > 0) {
        db.prune_leg(bounds, secs, &departure, &mut arrival);
        db.prune_leg(bounds, secs, &arrival, &mut departure);
    }

    fill(db, &mut leg.departure, &departure);
    fill(db, &mut leg.arrival, &arrival);
}

fn candidates(db: &Database, airport: &AirportRef) -> Vec<IataCode> {
    match airport.iata.filter(|c| db.airport_for(*c).is_some()) {
        Some(code) => vec![code],
        None => db.resolve(&airport.name),
    }
}

/// The common value of `f` over all candidates, `None` if they disagree.
fn agreed<T: PartialEq>(codes: &[IataCode], f: impl Fn(IataCode) -> Option<T>) -> Option<T> {
    let mut values = codes.iter().map(|c| f(*c));
    let first = values.next()??;
    values
        .all(|v| v.as_ref() == Some(&first))
        .then_some(first)
}

fn fill(db: &Database, airport: &mut AirportRef, codes: &[IataCode]) {
    if let [single] = codes {
        if airport.iata.is_none() {
            airport.iata = Some(*single);
        }
        if !airport.coordinate.is_valid() {
            if let Some(coord) = db.coordinate_for_airport(*single) {
                airport.coordinate = coord;
            }
        }
    }
    if airport.country.is_none() {
        airport.country = agreed(codes, |c| db.country_for_airport(c));
    }
    if airport.timezone.is_none() {
        airport.timezone = agreed(codes, |c| db.timezone_for_airport(c));
    }
}
