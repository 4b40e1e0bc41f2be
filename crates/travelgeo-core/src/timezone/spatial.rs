// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use super::{parse_tz, TimezoneLookup};
use crate::DataError;
use chrono_tz::Tz;
use serde::Deserialize;

/// Bits per axis of the quantization grid.
pub const Z_DEPTH: u32 = 11;

const GRID: f64 = (1u32 << Z_DEPTH) as f64;
const MAX_CELL: u32 = (1 << Z_DEPTH) - 1;

// Indexed bounding box. Latitudes outside [LAT_MIN, LAT_MIN + LAT_RANGE) are
// not covered by the source raster.
const LON_MIN: f64 = -180.0;
const LON_RANGE: f64 = 360.0;
const LAT_MIN: f64 = -65.0;
const LAT_RANGE: f64 = 145.0;

/// Maps a coordinate to its `(x, y)` grid cell, `None` outside the indexed band.
pub fn quantize(latitude: f64, longitude: f64) -> Option<(u32, u32)> {
    if !(LAT_MIN..LAT_MIN + LAT_RANGE).contains(&latitude)
        || !(LON_MIN..=LON_MIN + LON_RANGE).contains(&longitude)
    {
        return None;
    }
    let x = (((longitude - LON_MIN) / LON_RANGE) * GRID).floor() as u32;
    let y = (((latitude - LAT_MIN) / LAT_RANGE) * GRID).floor() as u32;
    Some((x.min(MAX_CELL), y.min(MAX_CELL)))
}

/// Morton code: bit `i` of `x` goes to bit `2i`, bit `i` of `y` to bit `2i + 1`.
pub fn interleave(x: u32, y: u32) -> u32 {
    (0..Z_DEPTH).fold(0, |z, i| {
        z | ((x >> i) & 1) << (2 * i) | ((y >> i) & 1) << (2 * i + 1)
    })
}

pub fn morton_code(latitude: f64, longitude: f64) -> Option<u32> {
    quantize(latitude, longitude).map(|(x, y)| interleave(x, y))
}

/// One breakpoint of the index: every Morton code from `z` up to the next
/// breakpoint maps to `timezone`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimezoneCell {
    pub z: u32,
    pub timezone: Option<Tz>,
    pub ambiguous: bool,
}

#[derive(Deserialize)]
struct CellRow {
    z: u32,
    timezone: Option<String>,
    ambiguous: u8,
}

/// Morton-ordered breakpoint table, strictly increasing and starting at zero.
#[derive(Debug, Default)]
pub struct SpatialIndex {
    cells: Vec<TimezoneCell>,
}

impl SpatialIndex {
    const NAME: &'static str = "timezone_index";

    pub(crate) fn from_csv(text: &str) -> Result<Self, DataError> {
        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let mut cells: Vec<TimezoneCell> = Vec::new();
        for (i, row) in reader.deserialize::<CellRow>().enumerate() {
            let row = row?;
            let line = i as u64 + 2;
            let timezone = match row.timezone.as_deref() {
                None | Some("") => None,
                Some(name) => Some(parse_tz(name)?),
            };
            if row.ambiguous > 1 {
                return Err(DataError::invalid(Self::NAME, line, "ambiguous flag must be 0 or 1"));
            }
            if let Some(prev) = cells.last() {
                if prev.z >= row.z {
                    return Err(DataError::Unsorted {
                        table: Self::NAME,
                        key: row.z.to_string(),
                    });
                }
            } else if row.z != 0 {
                return Err(DataError::invalid(Self::NAME, line, "first breakpoint must be 0"));
            }
            cells.push(TimezoneCell {
                z: row.z,
                timezone,
                ambiguous: row.ambiguous == 1,
            });
        }
        Ok(Self { cells })
    }

    pub fn lookup(&self, latitude: f64, longitude: f64) -> TimezoneLookup {
        let Some(z) = morton_code(latitude, longitude) else {
            return TimezoneLookup::default();
        };
        let idx = self.cells.partition_point(|c| c.z <= z);
        match idx.checked_sub(1).map(|i| &self.cells[i]) {
            Some(cell) => TimezoneLookup {
                timezone: cell.timezone,
                ambiguous: cell.ambiguous,
            },
            None => TimezoneLookup::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
