// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! The compiled-in reference tables and every lookup over them.

use crate::airport::{AirportRecord, AirportTable, NameIndex, Resolver};
use crate::codes::{CountryId, IataCode, IbnrStationId, SncfStationId, UicStationId};
use crate::coord::Coordinate;
use crate::country::{CountryRecord, CountryTable};
use crate::leg::{prune_candidates, LegBounds};
use crate::station::{StationCode, StationRecord, StationTable};
use crate::timezone::{reconcile_timezone, SpatialIndex, TimezoneLookup, ZoneTable};
use crate::DataError;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rayon::prelude::*;
use std::sync::OnceLock;

const AIRPORTS_CSV: &str = include_str!("../data/airports.csv");
const UNIQUE_FRAGMENTS_CSV: &str = include_str!("../data/name_fragments_unique.csv");
const SHARED_FRAGMENTS_CSV: &str = include_str!("../data/name_fragments_shared.csv");
const COUNTRIES_JSON: &str = include_str!("../data/countries.json");
const TIMEZONES_CSV: &str = include_str!("../data/timezones.csv");
const TIMEZONE_INDEX_CSV: &str = include_str!("../data/timezone_index.csv");
const STATIONS_CSV: &str = include_str!("../data/stations.csv");

static DATABASE: OnceLock<Database> = OnceLock::new();

/// All reference tables. Immutable once loaded.
#[derive(Debug)]
pub struct Database {
    pub airports: AirportTable,
    pub airport_names: NameIndex,
    pub countries: CountryTable,
    pub zones: ZoneTable,
    pub spatial: SpatialIndex,
    pub stations: StationTable,
}

impl Database {
    /// Parses and validates the compiled-in tables.
    pub fn load() -> Result<Self, DataError> {
        let airports = AirportTable::from_csv(AIRPORTS_CSV)?;
        let airport_names =
            NameIndex::from_csv(UNIQUE_FRAGMENTS_CSV, SHARED_FRAGMENTS_CSV, &airports)?;
        let countries = CountryTable::from_json(COUNTRIES_JSON)?;
        let zones = ZoneTable::from_csv(TIMEZONES_CSV)?;
        let spatial = SpatialIndex::from_csv(TIMEZONE_INDEX_CSV)?;
        let stations = StationTable::from_csv(STATIONS_CSV, &countries)?;

        for airport in airports.iter() {
            if countries.get(airport.country).is_none() {
                log::warn!(
                    "data: airport country not in country table iata={} country={}",
                    airport.iata,
                    airport.country
                );
            }
        }
        log::info!(
            "data: loaded airports={} unique_fragments={} shared_fragments={} countries={} zones={} cells={} stations={}",
            airports.len(),
            airport_names.unique_len(),
            airport_names.shared_len(),
            countries.len(),
            zones.len(),
            spatial.len(),
            stations.len()
        );

        Ok(Self {
            airports,
            airport_names,
            countries,
            zones,
            spatial,
            stations,
        })
    }

    /// Process-wide instance, loaded on first use.
    pub fn global() -> &'static Database {
        DATABASE.get_or_init(|| Database::load().expect("Failed to parse compiled-in reference tables"))
    }

    pub fn airport_for(&self, code: IataCode) -> Option<&AirportRecord> {
        self.airports.get(code)
    }

    pub fn country_for(&self, id: CountryId) -> Option<&CountryRecord> {
        self.countries.get(id)
    }

    pub fn station_for(&self, code: StationCode) -> Option<&StationRecord> {
        self.stations.get(code)
    }

    pub fn station_for_ibnr(&self, id: IbnrStationId) -> Option<&StationRecord> {
        self.station_for(StationCode::Ibnr(id))
    }

    pub fn station_for_uic(&self, id: UicStationId) -> Option<&StationRecord> {
        self.station_for(StationCode::Uic(id))
    }

    pub fn station_for_sncf(&self, id: SncfStationId) -> Option<&StationRecord> {
        self.station_for(StationCode::Sncf(id))
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.airports, &self.airport_names)
    }

    pub fn resolve(&self, name: &str) -> Vec<IataCode> {
        self.resolver().resolve(name)
    }

    pub fn resolve_all<S: AsRef<str> + Sync>(&self, names: &[S]) -> Vec<Vec<IataCode>> {
        let resolver = self.resolver();
        names
            .par_iter()
            .map(|name| resolver.resolve(name.as_ref()))
            .collect()
    }

    pub fn timezone_for(&self, latitude: f64, longitude: f64) -> TimezoneLookup {
        self.spatial.lookup(latitude, longitude)
    }

    /// Country at a coordinate; `None` for ambiguous cells and shared zones.
    pub fn country_for_coordinate(&self, latitude: f64, longitude: f64) -> Option<CountryId> {
        let lookup = self.spatial.lookup(latitude, longitude);
        if lookup.ambiguous {
            return None;
        }
        lookup.timezone.and_then(|tz| self.zones.country_for(tz))
    }

    pub fn resolve_timezone(&self, latitude: f64, longitude: f64, country: CountryId) -> Option<Tz> {
        self.resolve_timezone_at(latitude, longitude, country, Utc::now())
    }

    /// [`Database::resolve_timezone`] with equivalence judged from `now`.
    pub fn resolve_timezone_at(
        &self,
        latitude: f64,
        longitude: f64,
        country: CountryId,
        now: DateTime<Utc>,
    ) -> Option<Tz> {
        reconcile_timezone(
            &self.spatial,
            &self.zones,
            &self.countries,
            latitude,
            longitude,
            country,
            now,
        )
    }

    pub fn country_for_uic_code(&self, code: u16) -> Option<CountryId> {
        self.countries.for_uic_code(code)
    }

    pub fn timezones_for_country(&self, country: CountryId) -> Vec<Tz> {
        self.zones.timezones_for(country)
    }

    pub fn country_for_timezone(&self, tz: Tz) -> Option<CountryId> {
        self.zones.country_for(tz)
    }

    pub fn coordinate_for_airport(&self, code: IataCode) -> Option<Coordinate> {
        self.airport_for(code)
            .map(|a| a.coordinate)
            .filter(Coordinate::is_valid)
    }

    pub fn country_for_airport(&self, code: IataCode) -> Option<CountryId> {
        self.airport_for(code).map(|a| a.country)
    }

    pub fn timezone_for_airport(&self, code: IataCode) -> Option<Tz> {
        let airport = self.airport_for(code)?;
        self.resolve_timezone(
            airport.coordinate.latitude,
            airport.coordinate.longitude,
            airport.country,
        )
    }

    /// Prunes `candidates` against `anchors`, see [`prune_candidates`].
    pub fn prune_leg(
        &self,
        bounds: &LegBounds,
        duration_secs: i64,
        anchors: &[IataCode],
        candidates: &mut Vec<IataCode>,
    ) {
        prune_candidates(&self.airports, bounds, duration_secs, anchors, candidates);
    }
}
