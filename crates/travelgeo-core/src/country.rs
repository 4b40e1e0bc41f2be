// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::codes::CountryId;
use crate::timezone::parse_tz;
use crate::DataError;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrivingSide {
    #[default]
    Unknown,
    Left,
    Right,
}

impl fmt::Display for DrivingSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DrivingSide::Unknown => "unknown",
            DrivingSide::Left => "left",
            DrivingSide::Right => "right",
        })
    }
}

/// Set of IEC power plug/socket types A to N.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PowerPlugTypes(u16);

impl PowerPlugTypes {
    pub const NONE: Self = Self(0);
    pub const A: Self = Self(1 << 0);
    pub const B: Self = Self(1 << 1);
    pub const C: Self = Self(1 << 2);
    pub const D: Self = Self(1 << 3);
    pub const E: Self = Self(1 << 4);
    pub const F: Self = Self(1 << 5);
    pub const G: Self = Self(1 << 6);
    pub const H: Self = Self(1 << 7);
    pub const I: Self = Self(1 << 8);
    pub const J: Self = Self(1 << 9);
    pub const K: Self = Self(1 << 10);
    pub const L: Self = Self(1 << 11);
    pub const M: Self = Self(1 << 12);
    pub const N: Self = Self(1 << 13);

    const COUNT: u8 = 14;

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'A'..='N' => Some(Self(1 << (letter as u8 - b'A'))),
            _ => None,
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Single-type sets in A..N order.
    pub fn iter(&self) -> impl Iterator<Item = Self> + '_ {
        (0..Self::COUNT)
            .map(|i| Self(1 << i))
            .filter(move |t| self.contains(*t))
    }

    fn letter(self) -> char {
        char::from(b'A' + self.0.trailing_zeros() as u8)
    }

    /// Sockets a plug of this single type fits into.
    fn compatible_sockets(self) -> Self {
        match self {
            Self::A => Self::A | Self::B,
            Self::C => {
                Self::C | Self::E | Self::F | Self::H | Self::J | Self::K | Self::L | Self::N
            }
            Self::E | Self::F => Self::E | Self::F | Self::K,
            other => other,
        }
    }
}

impl BitOr for PowerPlugTypes {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for PowerPlugTypes {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for PowerPlugTypes {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Not for PowerPlugTypes {
    type Output = Self;
    fn not(self) -> Self {
        Self(!self.0 & ((1 << Self::COUNT) - 1))
    }
}

impl fmt::Display for PowerPlugTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letters: Vec<String> = self.iter().map(|t| t.letter().to_string()).collect();
        f.write_str(&letters.join("|"))
    }
}

impl fmt::Debug for PowerPlugTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PowerPlugTypes({})", self)
    }
}

/// Plugs a traveller carries (`plugs`) that fit none of the local `sockets`.
pub fn incompatible_power_plugs(plugs: PowerPlugTypes, sockets: PowerPlugTypes) -> PowerPlugTypes {
    plugs
        .iter()
        .filter(|plug| (plug.compatible_sockets() & sockets).is_empty())
        .fold(PowerPlugTypes::NONE, |acc, plug| acc | plug)
}

/// Local socket types that some of the traveller's `plugs` cannot use,
/// excluding types the traveller already owns a plug for.
pub fn incompatible_power_sockets(
    plugs: PowerPlugTypes,
    sockets: PowerPlugTypes,
) -> PowerPlugTypes {
    let mut fail = PowerPlugTypes::NONE;
    for plug in plugs.iter() {
        let compatible = plug.compatible_sockets();
        if !(compatible & !sockets).is_empty() {
            fail |= sockets & !compatible;
        }
    }
    fail & !plugs
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountryRecord {
    pub id: CountryId,
    /// Declared timezone, `None` for countries spanning several zones.
    pub timezone: Option<Tz>,
    pub driving_side: DrivingSide,
    pub power_plugs: PowerPlugTypes,
}

#[derive(Deserialize)]
struct CountriesFile {
    countries: Vec<CountryEntry>,
    uic_codes: Vec<UicEntry>,
}

#[derive(Deserialize)]
struct CountryEntry {
    id: String,
    #[serde(default)]
    driving_side: DrivingSide,
    #[serde(default)]
    power_plugs: Vec<String>,
    timezone: Option<String>,
}

#[derive(Deserialize)]
struct UicEntry {
    code: u16,
    country: String,
}

/// Countries sorted by id, plus the railway UIC country code mapping.
#[derive(Debug, Default)]
pub struct CountryTable {
    countries: Vec<CountryRecord>,
    uic_codes: Vec<(u16, CountryId)>,
}

impl CountryTable {
    const NAME: &'static str = "countries";

    pub(crate) fn from_json(text: &str) -> Result<Self, DataError> {
        let file: CountriesFile = serde_json::from_str(text)?;

        let mut countries = Vec::with_capacity(file.countries.len());
        for (i, entry) in file.countries.into_iter().enumerate() {
            let line = i as u64 + 1;
            let id = CountryId::parse(&entry.id)
                .ok_or_else(|| DataError::invalid(Self::NAME, line, format!("bad id {:?}", entry.id)))?;
            let mut power_plugs = PowerPlugTypes::NONE;
            for plug in &entry.power_plugs {
                let mut chars = plug.chars();
                match (chars.next().and_then(PowerPlugTypes::from_letter), chars.next()) {
                    (Some(t), None) => power_plugs |= t,
                    _ => {
                        return Err(DataError::invalid(
                            Self::NAME,
                            line,
                            format!("bad power plug {plug:?}"),
                        ))
                    }
                }
            }
            let timezone = entry.timezone.as_deref().map(parse_tz).transpose()?;
            countries.push(CountryRecord {
                id,
                timezone,
                driving_side: entry.driving_side,
                power_plugs,
            });
        }
        if let Some(w) = countries.windows(2).find(|w| w[0].id >= w[1].id) {
            return Err(DataError::Unsorted {
                table: Self::NAME,
                key: w[1].id.to_string(),
            });
        }

        let mut uic_codes = Vec::with_capacity(file.uic_codes.len());
        for (i, entry) in file.uic_codes.into_iter().enumerate() {
            let country = CountryId::parse(&entry.country).ok_or_else(|| {
                DataError::invalid("uic_codes", i as u64 + 1, format!("bad country {:?}", entry.country))
            })?;
            uic_codes.push((entry.code, country));
        }
        if let Some(w) = uic_codes.windows(2).find(|w| w[0].0 >= w[1].0) {
            return Err(DataError::Unsorted {
                table: "uic_codes",
                key: w[1].0.to_string(),
            });
        }

        Ok(Self {
            countries,
            uic_codes,
        })
    }

    pub fn get(&self, id: CountryId) -> Option<&CountryRecord> {
        self.countries
            .binary_search_by_key(&id, |c| c.id)
            .ok()
            .map(|i| &self.countries[i])
    }

    pub fn for_uic_code(&self, code: u16) -> Option<CountryId> {
        self.uic_codes
            .binary_search_by_key(&code, |(c, _)| *c)
            .ok()
            .map(|i| self.uic_codes[i].1)
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CountryRecord> {
        self.countries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PowerPlugTypes as P;

    #[test]
    fn test_plug_set_ops() {
        let set = P::C | P::F;
        assert!(set.contains(P::F));
        assert!(!set.contains(P::G));
        assert_eq!(set.to_string(), "C|F");
        assert_eq!((set & P::F), P::F);
        assert_eq!(P::from_letter('N'), Some(P::N));
        assert_eq!(P::from_letter('O'), None);
        assert!((!set & set).is_empty());
    }

    #[test]
    fn test_incompatible_plugs_and_sockets() {
        let de = P::C | P::F;
        let ch = P::C | P::J;
        assert_eq!(incompatible_power_plugs(de, ch), P::F);
        assert_eq!(incompatible_power_sockets(de, ch), P::J);
        assert_eq!(incompatible_power_plugs(ch, de), P::J);
        assert_eq!(incompatible_power_sockets(ch, de), P::F);

        let gb = P::G;
        assert_eq!(incompatible_power_plugs(de, gb), P::C | P::F);
        assert_eq!(incompatible_power_sockets(de, gb), P::G);

        assert_eq!(incompatible_power_plugs(P::NONE, gb), P::NONE);
    }

    #[test]
    fn test_table_from_json() {
        let json = r#"{
            "countries": [
                {"id": "AT", "driving_side": "right", "power_plugs": ["C", "F"], "timezone": "Europe/Vienna"},
                {"id": "GB", "driving_side": "left", "power_plugs": ["G"], "timezone": "Europe/London"},
                {"id": "US", "driving_side": "right", "power_plugs": ["A", "B"], "timezone": null}
            ],
            "uic_codes": [{"code": 70, "country": "GB"}, {"code": 81, "country": "AT"}]
        }"#;
        let table = CountryTable::from_json(json).unwrap();
        assert_eq!(table.len(), 3);
        let gb = table.get(CountryId::new("GB")).unwrap();
        assert_eq!(gb.driving_side, DrivingSide::Left);
        assert_eq!(gb.timezone, Some(chrono_tz::Europe::London));
        assert_eq!(table.get(CountryId::new("US")).unwrap().timezone, None);
        assert!(table.get(CountryId::new("DE")).is_none());
        assert!(table.get(CountryId::default()).is_none());
        assert_eq!(table.for_uic_code(81), Some(CountryId::new("AT")));
        assert_eq!(table.for_uic_code(80), None);
    }

    #[test]
    fn test_table_rejects_bad_input() {
        let unsorted = r#"{"countries": [{"id": "GB"}, {"id": "AT"}], "uic_codes": []}"#;
        assert!(matches!(
            CountryTable::from_json(unsorted),
            Err(DataError::Unsorted { .. })
        ));
        let bad_plug = r#"{"countries": [{"id": "AT", "power_plugs": ["Z"]}], "uic_codes": []}"#;
        assert!(matches!(
            CountryTable::from_json(bad_plug),
            Err(DataError::InvalidRecord { .. })
        ));
        let bad_tz = r#"{"countries": [{"id": "AT", "timezone": "Mars/Olympus"}], "uic_codes": []}"#;
        assert!(matches!(
            CountryTable::from_json(bad_tz),
            Err(DataError::UnknownTimezone(_))
        ));
    }
}
