// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Travel location knowledge: airports, countries, stations and timezones.
//!
//! All reference tables are compiled into the binary and loaded once into an
//! immutable [`Database`]. Lookups never fail with an error; unknown or
//! malformed input yields `None`, an empty set or an ambiguity flag.

pub mod airport;
pub mod codes;
pub mod config;
pub mod coord;
pub mod country;
pub mod data;
pub mod duration;
pub mod leg;
pub mod location;
pub mod postprocess;
pub mod station;
pub mod timezone;

use thiserror::Error;

pub use airport::{AirportRecord, AirportTable, NameIndex};
pub use codes::{AlphaId, CountryId, IataCode, IbnrStationId, SncfStationId, UicStationId};
pub use coord::Coordinate;
pub use country::{CountryRecord, CountryTable, DrivingSide, PowerPlugTypes};
pub use data::Database;
pub use station::{StationCode, StationRecord, StationTable};
pub use timezone::{SpatialIndex, TimezoneLookup, ZoneTable};

/// Failure to load one of the reference tables.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),
    #[error("Invalid record in {table} at line {line}: {reason}")]
    InvalidRecord {
        table: &'static str,
        line: u64,
        reason: String,
    },
    #[error("Table {table} is not sorted at key {key}")]
    Unsorted { table: &'static str, key: String },
}

impl DataError {
    pub(crate) fn invalid(table: &'static str, line: u64, reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            table,
            line,
            reason: reason.into(),
        }
    }
}

/// Record lookup in the process-wide database.
pub fn airport_for(code: IataCode) -> Option<&'static AirportRecord> {
    Database::global().airport_for(code)
}

pub fn country_for(id: CountryId) -> Option<&'static CountryRecord> {
    Database::global().country_for(id)
}

pub fn station_for(code: StationCode) -> Option<&'static StationRecord> {
    Database::global().station_for(code)
}

/// Candidate airports for a free-text name, sorted by code.
pub fn resolve(name: &str) -> Vec<IataCode> {
    Database::global().resolve(name)
}

/// Resolves many names in parallel, preserving input order.
pub fn resolve_all<S: AsRef<str> + Sync>(names: &[S]) -> Vec<Vec<IataCode>> {
    Database::global().resolve_all(names)
}

pub fn timezone_for(latitude: f64, longitude: f64) -> TimezoneLookup {
    Database::global().timezone_for(latitude, longitude)
}

pub fn country_for_coordinate(latitude: f64, longitude: f64) -> Option<CountryId> {
    Database::global().country_for_coordinate(latitude, longitude)
}

pub fn resolve_timezone(
    latitude: f64,
    longitude: f64,
    country: CountryId,
) -> Option<chrono_tz::Tz> {
    Database::global().resolve_timezone(latitude, longitude, country)
}
