// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use super::AirportTable;
use crate::codes::IataCode;
use crate::DataError;
use serde::Deserialize;

#[derive(Deserialize)]
struct FragmentRow {
    fragment: String,
    iata: String,
}

/// Two-tier fragment index over normalized airport name fragments.
///
/// Unique fragments name exactly one airport, shared fragments carry the
/// ascending airport indices of every airport using them. Both tiers are
/// sorted by fragment bytes.
#[derive(Debug, Default)]
pub struct NameIndex {
    unique: Vec<(String, u16)>,
    shared: Vec<(String, Vec<u16>)>,
}

fn airport_index(
    airports: &AirportTable,
    table: &'static str,
    line: u64,
    code: &str,
) -> Result<u16, DataError> {
    IataCode::parse(code)
        .and_then(|c| airports.index_of(c))
        .ok_or_else(|| DataError::invalid(table, line, format!("unknown airport {code:?}")))
}

fn check_sorted<T>(entries: &[(String, T)], table: &'static str) -> Result<(), DataError> {
    match entries.windows(2).find(|w| w[0].0 >= w[1].0) {
        Some(w) => Err(DataError::Unsorted {
            table,
            key: w[1].0.clone(),
        }),
        None => Ok(()),
    }
}

impl NameIndex {
    pub(crate) fn from_csv(
        unique_csv: &str,
        shared_csv: &str,
        airports: &AirportTable,
    ) -> Result<Self, DataError> {
        const UNIQUE: &str = "name_fragments_unique";
        const SHARED: &str = "name_fragments_shared";

        let mut unique = Vec::new();
        let mut reader = csv::Reader::from_reader(unique_csv.as_bytes());
        for (i, row) in reader.deserialize::<FragmentRow>().enumerate() {
            let row = row?;
            let idx = airport_index(airports, UNIQUE, i as u64 + 2, &row.iata)?;
            unique.push((row.fragment, idx));
        }

        let mut shared = Vec::new();
        let mut reader = csv::Reader::from_reader(shared_csv.as_bytes());
        for (i, row) in reader.deserialize::<FragmentRow>().enumerate() {
            let row = row?;
            let line = i as u64 + 2;
            let mut indices = row
                .iata
                .split_whitespace()
                .map(|code| airport_index(airports, SHARED, line, code))
                .collect::<Result<Vec<_>, _>>()?;
            indices.sort_unstable();
            indices.dedup();
            if indices.len() < 2 {
                return Err(DataError::invalid(SHARED, line, "shared fragment needs two airports"));
            }
            shared.push((row.fragment, indices));
        }

        // the generator's collation may differ from byte order
        unique.sort_by(|a, b| a.0.cmp(&b.0));
        shared.sort_by(|a, b| a.0.cmp(&b.0));
        check_sorted(&unique, UNIQUE)?;
        check_sorted(&shared, SHARED)?;

        Ok(Self { unique, shared })
    }

    /// Airport index for a fragment naming exactly one airport.
    pub fn unique(&self, fragment: &str) -> Option<u16> {
        self.unique
            .binary_search_by(|(f, _)| f.as_str().cmp(fragment))
            .ok()
            .map(|i| self.unique[i].1)
    }

    /// Ascending airport indices for a fragment shared by several airports.
    pub fn shared(&self, fragment: &str) -> Option<&[u16]> {
        self.shared
            .binary_search_by(|(f, _)| f.as_str().cmp(fragment))
            .ok()
            .map(|i| self.shared[i].1.as_slice())
    }

    pub fn unique_len(&self) -> usize {
        self.unique.len()
    }

    pub fn shared_len(&self) -> usize {
        self.shared.len()
    }
}
