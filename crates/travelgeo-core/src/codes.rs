// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Fixed-width identifier codecs.
//!
//! Every code is a `Copy` integer newtype. The all-zero value is the invalid
//! sentinel and letters are stored as contiguous ordinals, so integer order
//! equals lexicographic order of the decoded text.

use std::fmt;

/// Three letter IATA airport code packed into 16 bits.
///
/// Layout: `l0 << 11 | l1 << 6 | l2 << 1 | valid`, with `l = c - 'A'`.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IataCode(u16);

impl IataCode {
    /// Encodes `text`, returning the invalid code unless it is exactly three
    /// uppercase ASCII letters.
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_uppercase) {
            return Self::default();
        }
        let [a, b, c] = [bytes[0], bytes[1], bytes[2]].map(|ch| u16::from(ch - b'A'));
        Self(a << 11 | b << 6 | c << 1 | 1)
    }

    /// Like [`IataCode::new`] but `None` for malformed text.
    pub fn parse(text: &str) -> Option<Self> {
        Some(Self::new(text)).filter(Self::is_valid)
    }

    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    pub const fn to_raw(self) -> u16 {
        self.0
    }

    pub const fn is_valid(&self) -> bool {
        self.0 & 1 == 1
    }

    /// Decoded text, empty for the invalid code.
    pub fn as_string(&self) -> String {
        if !self.is_valid() {
            return String::new();
        }
        [self.0 >> 11, (self.0 >> 6) & 0x1f, (self.0 >> 1) & 0x1f]
            .iter()
            .map(|&l| char::from(b'A' + l as u8))
            .collect()
    }
}

impl fmt::Display for IataCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

impl fmt::Debug for IataCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IataCode({})", self.as_string())
    }
}

/// `N` uppercase letters packed into a `u32`, five bits per letter with
/// `'A'` as 1. Zero is invalid.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AlphaId<const N: usize>(u32);

/// ISO 3166-1 alpha-2 country code.
pub type CountryId = AlphaId<2>;

/// Five letter SNCF station code, e.g. `FRPNO`.
pub type SncfStationId = AlphaId<5>;

impl<const N: usize> AlphaId<N> {
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        if bytes.len() != N || !bytes.iter().all(u8::is_ascii_uppercase) {
            return Self::default();
        }
        let raw = bytes
            .iter()
            .fold(0u32, |acc, &ch| acc << 5 | u32::from(ch - b'@'));
        Self(raw)
    }

    pub fn parse(text: &str) -> Option<Self> {
        Some(Self::new(text)).filter(Self::is_valid)
    }

    pub const fn to_raw(self) -> u32 {
        self.0
    }

    pub const fn is_valid(&self) -> bool {
        self.0 != 0
    }

    pub fn as_string(&self) -> String {
        if !self.is_valid() {
            return String::new();
        }
        (0..N)
            .rev()
            .map(|i| char::from(b'@' + ((self.0 >> (5 * i)) & 0x1f) as u8))
            .collect()
    }
}

impl<const N: usize> fmt::Display for AlphaId<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

impl<const N: usize> fmt::Debug for AlphaId<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AlphaId<{}>({})", N, self.as_string())
    }
}

const STATION_MIN: u32 = 1_000_000;
const STATION_MAX: u32 = 9_999_999;

macro_rules! numeric_station_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u32);

        impl $name {
            /// Accepts seven digits, or eight with a trailing check digit which
            /// is dropped.
            pub fn from_number(number: u32) -> Self {
                let number = if number > STATION_MAX && number <= STATION_MAX * 10 + 9 {
                    number / 10
                } else {
                    number
                };
                if (STATION_MIN..=STATION_MAX).contains(&number) {
                    Self(number)
                } else {
                    Self::default()
                }
            }

            pub fn new(text: &str) -> Self {
                if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
                    return Self::default();
                }
                text.parse::<u32>().map(Self::from_number).unwrap_or_default()
            }

            pub fn parse(text: &str) -> Option<Self> {
                Some(Self::new(text)).filter(Self::is_valid)
            }

            pub const fn value(self) -> u32 {
                self.0
            }

            pub const fn is_valid(&self) -> bool {
                self.0 != 0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}", self.0)
                } else {
                    Ok(())
                }
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self)
            }
        }
    };
}

numeric_station_id!(
    /// Deutsche Bahn station number (IBNR).
    IbnrStationId
);
numeric_station_id!(
    /// UIC station number, two digit country prefix followed by five digits.
    UicStationId
);

impl UicStationId {
    /// The railway country code held in the leading two digits.
    pub fn country_code(&self) -> Option<u16> {
        self.is_valid().then(|| (self.0 / 100_000) as u16)
    }
}
