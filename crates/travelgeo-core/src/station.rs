// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::codes::{CountryId, IbnrStationId, SncfStationId, UicStationId};
use crate::coord::Coordinate;
use crate::country::CountryTable;
use crate::data::Database;
use crate::DataError;
use chrono_tz::Tz;
use serde::Deserialize;

/// Any of the station identifier schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StationCode {
    Ibnr(IbnrStationId),
    Uic(UicStationId),
    Sncf(SncfStationId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StationRecord {
    pub name: String,
    pub country: CountryId,
    pub coordinate: Coordinate,
    pub ibnr: Option<IbnrStationId>,
    pub uic: Option<UicStationId>,
    pub sncf: Option<SncfStationId>,
}

impl StationRecord {
    /// Timezone of the station, reconciled against its country.
    pub fn timezone(&self) -> Option<Tz> {
        Database::global().resolve_timezone(
            self.coordinate.latitude,
            self.coordinate.longitude,
            self.country,
        )
    }
}

#[derive(Deserialize)]
struct StationRow {
    name: String,
    ibnr: Option<String>,
    uic: Option<String>,
    sncf: Option<String>,
    country: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

/// Station records plus one sorted `(id, position)` table per id scheme.
#[derive(Debug, Default)]
pub struct StationTable {
    stations: Vec<StationRecord>,
    by_ibnr: Vec<(IbnrStationId, usize)>,
    by_uic: Vec<(UicStationId, usize)>,
    by_sncf: Vec<(SncfStationId, usize)>,
}

fn parse_id<T>(
    value: Option<&str>,
    parse: fn(&str) -> Option<T>,
    line: u64,
    what: &str,
) -> Result<Option<T>, DataError> {
    match value {
        None | Some("") => Ok(None),
        Some(text) => parse(text)
            .map(Some)
            .ok_or_else(|| DataError::invalid(StationTable::NAME, line, format!("bad {what} {text:?}"))),
    }
}

fn sorted_keys<K: Ord + Copy + ToString>(
    mut keys: Vec<(K, usize)>,
    table: &'static str,
) -> Result<Vec<(K, usize)>, DataError> {
    keys.sort_by_key(|(k, _)| *k);
    if let Some(w) = keys.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(DataError::Unsorted {
            table,
            key: w[1].0.to_string(),
        });
    }
    Ok(keys)
}

impl StationTable {
    const NAME: &'static str = "stations";

    /// Stations without an explicit country get the one of their UIC prefix.
    pub(crate) fn from_csv(text: &str, countries: &CountryTable) -> Result<Self, DataError> {
        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let mut stations = Vec::new();
        for (i, row) in reader.deserialize::<StationRow>().enumerate() {
            let row = row?;
            let line = i as u64 + 2;
            let ibnr = parse_id(row.ibnr.as_deref(), IbnrStationId::parse, line, "IBNR")?;
            let uic = parse_id(row.uic.as_deref(), UicStationId::parse, line, "UIC")?;
            let sncf = parse_id(row.sncf.as_deref(), SncfStationId::parse, line, "SNCF id")?;
            let country = match parse_id(row.country.as_deref(), CountryId::parse, line, "country")? {
                Some(country) => country,
                None => uic
                    .and_then(|u| u.country_code())
                    .and_then(|code| countries.for_uic_code(code))
                    .ok_or_else(|| DataError::invalid(Self::NAME, line, "no country"))?,
            };
            let coordinate = match (row.latitude, row.longitude) {
                (Some(lat), Some(lon)) => Coordinate::new(lat, lon),
                _ => Coordinate::INVALID,
            };
            stations.push(StationRecord {
                name: row.name,
                country,
                coordinate,
                ibnr,
                uic,
                sncf,
            });
        }

        let by_ibnr = stations
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.ibnr.map(|id| (id, i)))
            .collect();
        let by_uic = stations
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.uic.map(|id| (id, i)))
            .collect();
        let by_sncf = stations
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.sncf.map(|id| (id, i)))
            .collect();

        Ok(Self {
            by_ibnr: sorted_keys(by_ibnr, "stations_ibnr")?,
            by_uic: sorted_keys(by_uic, "stations_uic")?,
            by_sncf: sorted_keys(by_sncf, "stations_sncf")?,
            stations,
        })
    }

    fn find<K: Ord + Copy>(&self, keys: &[(K, usize)], key: K) -> Option<&StationRecord> {
        keys.binary_search_by_key(&key, |(k, _)| *k)
            .ok()
            .map(|i| &self.stations[keys[i].1])
    }

    pub fn get(&self, code: StationCode) -> Option<&StationRecord> {
        match code {
            StationCode::Ibnr(id) => self.find(&self.by_ibnr, id),
            StationCode::Uic(id) => self.find(&self.by_uic, id),
            StationCode::Sncf(id) => self.find(&self.by_sncf, id),
        }
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn countries() -> CountryTable {
        CountryTable::from_json(
            r#"{"countries": [{"id": "FI"}, {"id": "FR"}], "uic_codes": [{"code": 10, "country": "FI"}]}"#,
        )
        .unwrap()
    }

    const STATIONS: &str = "name,ibnr,uic,sncf,country,latitude,longitude\n\
        Paris Nord,8727100,8727100,FRPNO,FR,48.8809,2.3553\n\
        Helsinki,,1000001,,,60.1719,24.9414\n\
        Paris Gare de Lyon,87686006,8768600,FRPLY,FR,48.8443,2.3744\n";

    #[test]
    fn test_lookup_by_each_scheme() {
        let table = StationTable::from_csv(STATIONS, &countries()).unwrap();
        assert_eq!(table.len(), 3);
        let nord = table
            .get(StationCode::Sncf(SncfStationId::new("FRPNO")))
            .unwrap();
        assert_eq!(nord.name, "Paris Nord");
        let lyon = table
            .get(StationCode::Ibnr(IbnrStationId::new("8768600")))
            .unwrap();
        assert_eq!(lyon.sncf, Some(SncfStationId::new("FRPLY")));
        let hel = table
            .get(StationCode::Uic(UicStationId::new("1000001")))
            .unwrap();
        assert_eq!(hel.country, CountryId::new("FI"));
        assert_eq!(hel.ibnr, None);
        assert!(table
            .get(StationCode::Ibnr(IbnrStationId::new("1000001")))
            .is_none());
        assert!(table.get(StationCode::Uic(UicStationId::default())).is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let csv = "name,ibnr,uic,sncf,country,latitude,longitude\n\
            A,8000001,,,FR,48.0,2.0\n\
            B,8000001,,,FR,48.1,2.1\n";
        assert!(matches!(
            StationTable::from_csv(csv, &countries()),
            Err(DataError::Unsorted { .. })
        ));
    }
}
