// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use super::parse_tz;
use crate::codes::CountryId;
use crate::DataError;
use chrono_tz::Tz;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneRecord {
    pub timezone: Tz,
    /// Owning country, `None` for zones used by several countries.
    pub country: Option<CountryId>,
}

#[derive(Deserialize)]
struct ZoneRow {
    timezone: String,
    country: Option<String>,
}

/// IANA zones sorted by name, with the country each one belongs to.
#[derive(Debug, Default)]
pub struct ZoneTable {
    zones: Vec<ZoneRecord>,
}

impl ZoneTable {
    const NAME: &'static str = "timezones";

    pub(crate) fn from_csv(text: &str) -> Result<Self, DataError> {
        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let mut zones: Vec<ZoneRecord> = Vec::new();
        for (i, row) in reader.deserialize::<ZoneRow>().enumerate() {
            let row = row?;
            let timezone = parse_tz(&row.timezone)?;
            let country = match row.country.as_deref() {
                None | Some("") => None,
                Some(cc) => Some(CountryId::parse(cc).ok_or_else(|| {
                    DataError::invalid(Self::NAME, i as u64 + 2, format!("bad country {cc:?}"))
                })?),
            };
            if zones
                .last()
                .is_some_and(|prev| prev.timezone.name() >= timezone.name())
            {
                return Err(DataError::Unsorted {
                    table: Self::NAME,
                    key: row.timezone,
                });
            }
            zones.push(ZoneRecord { timezone, country });
        }
        Ok(Self { zones })
    }

    fn get(&self, tz: Tz) -> Option<&ZoneRecord> {
        self.zones
            .binary_search_by(|z| z.timezone.name().cmp(tz.name()))
            .ok()
            .map(|i| &self.zones[i])
    }

    /// Country owning `tz`; `None` when the zone is shared or unregistered.
    pub fn country_for(&self, tz: Tz) -> Option<CountryId> {
        self.get(tz).and_then(|z| z.country)
    }

    /// All zones registered to `country`, in name order.
    pub fn timezones_for(&self, country: CountryId) -> Vec<Tz> {
        if !country.is_valid() {
            return Vec::new();
        }
        self.zones
            .iter()
            .filter(|z| z.country == Some(country))
            .map(|z| z.timezone)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
