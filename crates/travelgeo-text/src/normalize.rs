// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use icu_normalizer::DecomposingNormalizerBorrowed;
use regex::Regex;
use std::sync::OnceLock;

/// Abbreviations commonly found in airline and booking data.
const ABBREVIATIONS: &[(&str, &str)] = &[("intl", "international")];

/// Spelling substitutions for names that lost their diacritics on the way,
/// e.g. "Muenchen" for "München". Applied in order.
const TRANSLITERATIONS: &[(&str, &str)] = &[("ae", "a"), ("oe", "o"), ("ue", "u")];

pub(crate) fn combining_marks() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\p{M}+").expect("valid combining mark pattern"))
}

/// Compatibility-decomposes `text` and drops all combining marks.
pub fn strip_diacritics(text: &str) -> String {
    let decomposed = DecomposingNormalizerBorrowed::new_nfkd().normalize(text);
    combining_marks().replace_all(&decomposed, "").into_owned()
}

/// Lower-cases a fragment, strips diacritics and expands known abbreviations.
pub fn normalize(fragment: &str) -> String {
    let folded = strip_diacritics(&fragment.to_lowercase());
    match ABBREVIATIONS.iter().find(|(abbr, _)| *abbr == folded) {
        Some((_, full)) => (*full).to_string(),
        None => folded,
    }
}

/// Applies [`TRANSLITERATIONS`] to an already normalized fragment.
pub fn transliterate(fragment: &str) -> String {
    TRANSLITERATIONS
        .iter()
        .fold(fragment.to_string(), |acc, (from, to)| acc.replace(from, to))
}
