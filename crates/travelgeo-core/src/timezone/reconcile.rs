// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use super::{SpatialIndex, ZoneTable};
use crate::codes::CountryId;
use crate::country::CountryTable;
use chrono::{DateTime, Offset, TimeZone, Utc};
use chrono_tz::{OffsetComponents, OffsetName, Tz};
use log::{debug, trace};

const DAY_SECS: i64 = 86_400;
/// How far ahead transitions are searched.
const HORIZON_DAYS: i64 = 2 * 366;
/// Number of upcoming transitions that must coincide.
const TRANSITIONS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
struct ZoneState {
    utc_offset: i32,
    std_offset: i64,
    dst_offset: i64,
    abbreviation: Option<String>,
}

fn state_at(tz: Tz, timestamp: i64) -> Option<ZoneState> {
    let utc = DateTime::from_timestamp(timestamp, 0)?;
    let local = tz.from_utc_datetime(&utc.naive_utc());
    let offset = local.offset();
    Some(ZoneState {
        utc_offset: offset.fix().local_minus_utc(),
        std_offset: offset.base_utc_offset().num_seconds(),
        dst_offset: offset.dst_offset().num_seconds(),
        abbreviation: offset.abbreviation().map(str::to_string),
    })
}

/// Upcoming transitions of `tz` after `start`, each with the state it switches to.
fn transitions(tz: Tz, start: i64) -> Option<Vec<(i64, ZoneState)>> {
    let mut found = Vec::with_capacity(TRANSITIONS);
    let mut lo = start;
    let mut lo_state = state_at(tz, lo)?;
    for _ in 0..HORIZON_DAYS {
        let hi = lo.checked_add(DAY_SECS)?;
        let hi_state = state_at(tz, hi)?;
        if hi_state != lo_state {
            // bisect to the first second in the new state
            let (mut a, mut b) = (lo, hi);
            while b - a > 1 {
                let mid = a + (b - a) / 2;
                if state_at(tz, mid)? == lo_state {
                    a = mid;
                } else {
                    b = mid;
                }
            }
            found.push((b, state_at(tz, b)?));
            if found.len() == TRANSITIONS {
                break;
            }
        }
        lo = hi;
        lo_state = hi_state;
    }
    Some(found)
}

/// Whether `a` and `b` keep the same offsets and abbreviations from `now`
/// through their next two transitions.
pub fn is_equivalent_timezone_at(a: Tz, b: Tz, now: DateTime<Utc>) -> bool {
    if a == b {
        return true;
    }
    let t = now.timestamp();
    match (state_at(a, t), state_at(b, t)) {
        (Some(sa), Some(sb)) if sa == sb => {}
        _ => return false,
    }
    match (transitions(a, t), transitions(b, t)) {
        (Some(ta), Some(tb)) => ta == tb,
        _ => false,
    }
}

pub fn is_equivalent_timezone(a: Tz, b: Tz) -> bool {
    is_equivalent_timezone_at(a, b, Utc::now())
}

/// Picks the timezone for a coordinate located in `country`.
///
/// Coordinate evidence consistent with the country wins; otherwise a single
/// equivalent zone of the country, then the country's declared zone, then
/// the raw coordinate zone.
pub(crate) fn reconcile_timezone(
    spatial: &SpatialIndex,
    zones: &ZoneTable,
    countries: &CountryTable,
    latitude: f64,
    longitude: f64,
    country: CountryId,
    now: DateTime<Utc>,
) -> Option<Tz> {
    let lookup = spatial.lookup(latitude, longitude);
    let coord_tz = lookup.timezone;
    let country_tz = countries.get(country).and_then(|c| c.timezone);
    let coord_country = coord_tz.and_then(|tz| zones.country_for(tz));
    trace!(
        "reconcile: coord_tz={:?} ambiguous={} country={} country_tz={:?}",
        coord_tz,
        lookup.ambiguous,
        country,
        country_tz
    );

    if let Some(tz) = coord_tz {
        if country.is_valid() && coord_country != Some(country) {
            let equivalent: Vec<Tz> = zones
                .timezones_for(country)
                .into_iter()
                .filter(|candidate| is_equivalent_timezone_at(tz, *candidate, now))
                .collect();
            if let [single] = equivalent.as_slice() {
                debug!("reconcile: step=equivalent coord_tz={} result={}", tz, single);
                return Some(*single);
            }
        }
    }

    let Some(tz) = coord_tz else {
        return country_tz;
    };
    if Some(tz) == country_tz {
        return country_tz;
    }
    let Some(declared) = country_tz else {
        return Some(tz);
    };
    if coord_country == Some(country) || !lookup.ambiguous {
        debug!("reconcile: step=coordinate result={}", tz);
        return Some(tz);
    }
    if is_equivalent_timezone_at(tz, declared, now) {
        debug!("reconcile: step=declared result={}", declared);
        Some(declared)
    } else {
        debug!("reconcile: step=ambiguous-coordinate result={}", tz);
        Some(tz)
    }
}
