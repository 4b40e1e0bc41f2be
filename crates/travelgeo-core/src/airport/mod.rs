// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Airport registry and free-text airport name resolution.

mod name_index;
mod resolver;

pub use name_index::NameIndex;
pub use resolver::Resolver;

use crate::codes::{CountryId, IataCode};
use crate::coord::Coordinate;
use crate::DataError;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq)]
pub struct AirportRecord {
    pub iata: IataCode,
    pub icao: String,
    pub country: CountryId,
    pub coordinate: Coordinate,
    /// Primary name, for display.
    pub name: String,
}

#[derive(Deserialize)]
struct AirportRow {
    iata: String,
    icao: String,
    country: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    name: String,
}

/// Airports sorted by IATA code. Positions in this table are the airport
/// indices used by [`NameIndex`].
#[derive(Debug, Default)]
pub struct AirportTable {
    airports: Vec<AirportRecord>,
}

impl AirportTable {
    const NAME: &'static str = "airports";

    pub(crate) fn from_csv(text: &str) -> Result<Self, DataError> {
        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let mut airports: Vec<AirportRecord> = Vec::new();
        for (i, row) in reader.deserialize::<AirportRow>().enumerate() {
            let row = row?;
            let line = i as u64 + 2;
            let iata = IataCode::parse(&row.iata).ok_or_else(|| {
                DataError::invalid(Self::NAME, line, format!("bad IATA code {:?}", row.iata))
            })?;
            let country = CountryId::parse(&row.country).ok_or_else(|| {
                DataError::invalid(Self::NAME, line, format!("bad country {:?}", row.country))
            })?;
            let coordinate = match (row.latitude, row.longitude) {
                (Some(lat), Some(lon)) => Coordinate::new(lat, lon),
                _ => Coordinate::INVALID,
            };
            if airports.last().is_some_and(|prev| prev.iata >= iata) {
                return Err(DataError::Unsorted {
                    table: Self::NAME,
                    key: row.iata,
                });
            }
            airports.push(AirportRecord {
                iata,
                icao: row.icao,
                country,
                coordinate,
                name: row.name,
            });
        }
        if airports.len() > usize::from(u16::MAX) {
            return Err(DataError::invalid(Self::NAME, 0, "too many airports for 16 bit indices"));
        }
        Ok(Self { airports })
    }

    pub fn index_of(&self, code: IataCode) -> Option<u16> {
        self.airports
            .binary_search_by_key(&code, |a| a.iata)
            .ok()
            .map(|i| i as u16)
    }

    pub fn get(&self, code: IataCode) -> Option<&AirportRecord> {
        self.index_of(code).map(|i| &self.airports[usize::from(i)])
    }

    pub(crate) fn by_index(&self, index: u16) -> &AirportRecord {
        &self.airports[usize::from(index)]
    }

    pub fn len(&self) -> usize {
        self.airports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AirportRecord> {
        self.airports.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AIRPORTS: &str = "iata,icao,country,latitude,longitude,name\n\
        BER,EDDB,DE,52.3667,13.5033,Berlin Brandenburg Airport\n\
        SXF,EDDB,DE,,,Berlin Schönefeld Airport\n\
        TXL,EDDT,DE,52.5597,13.2877,Berlin Tegel Airport\n";

    #[test]
    fn test_lookup() {
        let table = AirportTable::from_csv(AIRPORTS).unwrap();
        assert_eq!(table.len(), 3);
        let txl = table.get(IataCode::new("TXL")).unwrap();
        assert_eq!(txl.icao, "EDDT");
        assert_eq!(txl.country, CountryId::new("DE"));
        assert!(txl.coordinate.is_valid());
        assert!(!table.get(IataCode::new("SXF")).unwrap().coordinate.is_valid());
        assert_eq!(table.index_of(IataCode::new("SXF")), Some(1));
        assert!(table.get(IataCode::new("MUC")).is_none());
        assert!(table.get(IataCode::default()).is_none());
    }

    #[test]
    fn test_rejects_unsorted_and_malformed() {
        let unsorted = "iata,icao,country,latitude,longitude,name\n\
            TXL,EDDT,DE,52.5,13.2,Tegel\n\
            BER,EDDB,DE,52.3,13.5,Brandenburg\n";
        assert!(matches!(
            AirportTable::from_csv(unsorted),
            Err(DataError::Unsorted { .. })
        ));
        let bad_code = "iata,icao,country,latitude,longitude,name\nTx1,EDDT,DE,52.5,13.2,Tegel\n";
        assert!(matches!(
            AirportTable::from_csv(bad_code),
            Err(DataError::InvalidRecord { line: 2, .. })
        ));
    }
}
