// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::normalize::combining_marks;
use regex::{Matches, Regex};
use std::sync::OnceLock;

/// Fragments with fewer base letters than this are dropped.
pub const MIN_FRAGMENT_LEN: usize = 3;

/// Runs of letters, including any combining marks attached to them.
/// Whitespace, digits, punctuation, symbols and control characters all separate.
fn fragment_re() -> &'static Regex {
    static FRAGMENT_RE: OnceLock<Regex> = OnceLock::new();
    FRAGMENT_RE.get_or_init(|| Regex::new(r"[\p{L}\p{M}]+").expect("valid fragment pattern"))
}

/// Lazy iterator over the fragments of a name, see [`tokenize`].
pub struct Fragments<'a> {
    matches: Matches<'static, 'a>,
}

impl<'a> Iterator for Fragments<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.matches
            .by_ref()
            .map(|m| m.as_str())
            .find(|s| letter_count(s) >= MIN_FRAGMENT_LEN)
    }
}

/// Characters of `fragment` that are not combining marks.
fn letter_count(fragment: &str) -> usize {
    let marks: usize = combining_marks()
        .find_iter(fragment)
        .map(|m| m.as_str().chars().count())
        .sum();
    fragment.chars().count() - marks
}

/// Splits a location name into fragments.
///
/// The fragments borrow from `name` and keep their original spelling.
/// Calling this twice on the same input yields the same sequence.
pub fn tokenize(name: &str) -> Fragments<'_> {
    Fragments {
        matches: fragment_re().find_iter(name),
    }
}

/// True for a fragment that looks like an explicit three letter code,
/// e.g. `TXL` in "Berlin TXL". Only uppercase ASCII qualifies.
pub fn is_code_token(fragment: &str) -> bool {
    fragment.len() == 3 && fragment.bytes().all(|b| b.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(name: &str) -> Vec<&str> {
        tokenize(name).collect()
    }

    #[test]
    fn test_splits_on_separators() {
        assert_eq!(collect("Flughafen Berlin-Tegel"), vec!["Flughafen", "Berlin", "Tegel"]);
        assert_eq!(
            collect("AMSTERDAM, NL (SCHIPHOL AIRPORT)"),
            vec!["AMSTERDAM", "SCHIPHOL", "AIRPORT"]
        );
        assert_eq!(collect("Terminal 2E/F"), vec!["Terminal"]);
    }

    #[test]
    fn test_digits_split_fragments() {
        assert_eq!(collect("Gate12Alpha"), vec!["Gate", "Alpha"]);
    }

    #[test]
    fn test_short_fragments_dropped() {
        assert!(collect("ab 12 c").is_empty());
        assert!(collect("").is_empty());
        assert_eq!(collect("St. Pancras"), vec!["Pancras"]);
    }

    #[test]
    fn test_keeps_non_ascii_letters() {
        assert_eq!(collect("Zürich–Kloten „Nord“"), vec!["Zürich", "Kloten", "Nord"]);
        // decomposed umlaut stays within one fragment
        assert_eq!(collect("Zu\u{0308}rich"), vec!["Zu\u{0308}rich"]);
    }

    #[test]
    fn test_combining_marks_do_not_count_towards_length() {
        assert!(collect("e\u{0301}e").is_empty());
        assert_eq!(collect("e\u{0301}te"), vec!["e\u{0301}te"]);
        assert_eq!(letter_count("Zu\u{0308}rich"), 6);
    }

    #[test]
    fn test_restartable() {
        let name = "London City Airport";
        let first: Vec<_> = tokenize(name).collect();
        let second: Vec<_> = tokenize(name).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_code_token() {
        assert!(is_code_token("TXL"));
        assert!(!is_code_token("Txl"));
        assert!(!is_code_token("TXLA"));
        assert!(!is_code_token("ÄBC"));
    }
}
