// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Coordinate to timezone lookup and timezone/country reasoning.

mod reconcile;
mod spatial;
mod zones;

pub use reconcile::{is_equivalent_timezone, is_equivalent_timezone_at};
pub(crate) use reconcile::reconcile_timezone;
pub use spatial::{interleave, morton_code, quantize, SpatialIndex, TimezoneCell, Z_DEPTH};
pub use zones::{ZoneRecord, ZoneTable};

use crate::DataError;
use chrono_tz::Tz;

/// Result of a spatial timezone lookup.
///
/// An `ambiguous` cell straddles a border; its timezone is only a best guess.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimezoneLookup {
    pub timezone: Option<Tz>,
    pub ambiguous: bool,
}

pub(crate) fn parse_tz(name: &str) -> Result<Tz, DataError> {
    name.parse::<Tz>()
        .map_err(|_| DataError::UnknownTimezone(name.to_string()))
}
