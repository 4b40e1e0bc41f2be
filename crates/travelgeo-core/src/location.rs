// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Deciding whether two places denote the same location.

use crate::coord::Coordinate;
use travelgeo_text::strip_diacritics;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaceKind {
    #[default]
    Generic,
    Airport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accuracy {
    /// Under 100 m.
    Exact,
    /// Under 1 km, or 2 km when an airport is involved.
    WalkingDistance,
    /// Under 50 km.
    CityLevel,
}

/// A location as described by a travel document. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Place {
    pub name: String,
    pub coordinate: Coordinate,
    pub locality: Option<String>,
    pub street: Option<String>,
    pub kind: PlaceKind,
}

impl Place {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn at(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            ..Self::default()
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Replaces umlauts by their two letter spelling, then strips diacritics.
fn expand_umlauts(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            'ä' => out.push_str("ae"),
            'Ä' => out.push_str("Ae"),
            'ö' | 'ø' => out.push_str("oe"),
            'Ö' | 'Ø' => out.push_str("Oe"),
            'ü' => out.push_str("ue"),
            'Ü' => out.push_str("Ue"),
            _ => out.push(c),
        }
    }
    strip_diacritics(&out)
}

fn is_same_name(lhs: &str, rhs: &str) -> bool {
    if lhs.is_empty() || rhs.is_empty() {
        return false;
    }
    let fold = |s: &str| s.to_lowercase();
    if fold(lhs) == fold(rhs) {
        return true;
    }
    let lhs_variants = [fold(&strip_diacritics(lhs)), fold(&expand_umlauts(lhs))];
    let rhs_variants = [fold(&strip_diacritics(rhs)), fold(&expand_umlauts(rhs))];
    lhs_variants
        .iter()
        .any(|l| rhs_variants.iter().any(|r| l == r))
}

/// Compares by distance when both coordinates are known, else by address
/// when the left side has one, else by name.
pub fn is_same_location(lhs: &Place, rhs: &Place, accuracy: Accuracy) -> bool {
    if lhs.coordinate.is_valid() && rhs.coordinate.is_valid() {
        let d = lhs.coordinate.distance_m(&rhs.coordinate);
        let limit = match accuracy {
            Accuracy::Exact => 100.0,
            Accuracy::WalkingDistance
                if lhs.kind == PlaceKind::Airport || rhs.kind == PlaceKind::Airport =>
            {
                2000.0
            }
            Accuracy::WalkingDistance => 1000.0,
            Accuracy::CityLevel => 50_000.0,
        };
        return d < limit;
    }

    match accuracy {
        Accuracy::Exact | Accuracy::WalkingDistance => {
            if let (Some(street), Some(locality)) = (non_empty(&lhs.street), non_empty(&lhs.locality)) {
                return Some(street) == non_empty(&rhs.street)
                    && Some(locality) == non_empty(&rhs.locality);
            }
        }
        Accuracy::CityLevel => {
            if let Some(locality) = non_empty(&lhs.locality) {
                return Some(locality) == non_empty(&rhs.locality);
            }
        }
    }

    is_same_name(&lhs.name, &rhs.name)
}

/// True when travelling from `from` to `to` actually moves somewhere.
pub fn is_location_change(from: &Place, to: &Place) -> bool {
    !is_same_location(from, to, Accuracy::Exact)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txl() -> Place {
        Place {
            kind: PlaceKind::Airport,
            ..Place::at(Coordinate::new(52.5597, 13.2877))
        }
    }

    fn sxf() -> Place {
        Place {
            kind: PlaceKind::Airport,
            ..Place::at(Coordinate::new(52.3800, 13.5225))
        }
    }

    #[test]
    fn test_by_coordinate() {
        assert!(is_same_location(&txl(), &sxf(), Accuracy::CityLevel));
        assert!(!is_same_location(&txl(), &sxf(), Accuracy::Exact));
        assert!(is_same_location(&txl(), &txl(), Accuracy::Exact));
        assert!(!is_same_location(&txl(), &Place::default(), Accuracy::CityLevel));
        assert!(!is_same_location(&Place::default(), &sxf(), Accuracy::Exact));
    }

    #[test]
    fn test_walking_distance_airport_allowance() {
        let a = Place::at(Coordinate::new(52.0, 13.0));
        // about 1.5 km north
        let b = Place::at(Coordinate::new(52.0135, 13.0));
        assert!(!is_same_location(&a, &b, Accuracy::WalkingDistance));
        let airport = Place {
            kind: PlaceKind::Airport,
            ..b.clone()
        };
        assert!(is_same_location(&a, &airport, Accuracy::WalkingDistance));
    }

    #[test]
    fn test_by_address() {
        let berlin = |street: Option<&str>| Place {
            locality: Some("Berlin".into()),
            street: street.map(Into::into),
            ..Place::default()
        };
        let a = berlin(Some("Alexanderplatz 1"));
        let b = berlin(Some("Unter den Linden 5"));
        assert!(is_same_location(&a, &b, Accuracy::CityLevel));
        assert!(!is_same_location(&a, &b, Accuracy::Exact));
        assert!(is_same_location(&a, &a, Accuracy::Exact));
        assert!(!is_same_location(&a, &Place::default(), Accuracy::CityLevel));
        assert!(!is_same_location(&Place::default(), &a, Accuracy::CityLevel));
    }

    #[test]
    fn test_by_name() {
        let name = Place::named("Berlin Tegel Airport");
        assert!(is_same_location(&name, &name, Accuracy::Exact));
        assert!(!is_same_location(&Place::default(), &name, Accuracy::CityLevel));
        assert!(is_same_location(
            &Place::named("ZÜRICH HB"),
            &Place::named("Zürich HB"),
            Accuracy::Exact
        ));
        assert!(is_same_location(
            &Place::named("Zuerich HB"),
            &Place::named("Zürich HB"),
            Accuracy::Exact
        ));
        assert!(is_same_location(
            &Place::named("Zurich HB"),
            &Place::named("Zürich HB"),
            Accuracy::Exact
        ));
        assert!(!is_same_location(
            &Place::named("Zürich HB"),
            &Place::named("Zürich Flughafen"),
            Accuracy::Exact
        ));
    }

    #[test]
    fn test_location_change() {
        assert!(is_location_change(&txl(), &sxf()));
        assert!(!is_location_change(&txl(), &txl()));
        assert!(!is_location_change(&Place::named("Köln Hbf"), &Place::named("Koeln Hbf")));
    }
}
