// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use super::{AirportTable, NameIndex};
use crate::codes::IataCode;
use log::debug;
use travelgeo_text::{is_code_token, normalize, tokenize, transliterate};

/// Used too loosely in airline data to be allowed to empty a candidate set.
const INTERNATIONAL: &str = "international";
/// Everything from this fragment on usually names a terminal, not the airport.
const TERMINAL: &str = "terminal";

/// Intersection of two ascending index lists by linear merge.
fn intersect(lhs: &[u16], rhs: &[u16]) -> Vec<u16> {
    let mut out = Vec::with_capacity(lhs.len().min(rhs.len()));
    let (mut i, mut j) = (0, 0);
    while i < lhs.len() && j < rhs.len() {
        match lhs[i].cmp(&rhs[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(lhs[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}

/// Fuzzy airport name matcher over an [`AirportTable`] and its [`NameIndex`].
pub struct Resolver<'a> {
    airports: &'a AirportTable,
    names: &'a NameIndex,
}

impl<'a> Resolver<'a> {
    pub fn new(airports: &'a AirportTable, names: &'a NameIndex) -> Self {
        Self { airports, names }
    }

    /// Candidate airports for `name`, sorted by code. Empty when nothing
    /// matches or the name contradicts itself.
    pub fn resolve(&self, name: &str) -> Vec<IataCode> {
        self.resolve_indices(name)
            .into_iter()
            .map(|i| self.airports.by_index(i).iata)
            .collect()
    }

    pub(crate) fn resolve_indices(&self, name: &str) -> Vec<u16> {
        let raw: Vec<&str> = tokenize(name).collect();
        if raw.is_empty() {
            return Vec::new();
        }
        let fragments: Vec<String> = raw.iter().map(|f| normalize(f)).collect();

        let mut candidates = self.match_fragments(&fragments);

        let transliterated: Vec<String> = fragments.iter().map(|f| transliterate(f)).collect();
        if transliterated != fragments {
            let alternative = self.match_fragments(&transliterated);
            if !alternative.is_empty()
                && (candidates.is_empty() || alternative.len() < candidates.len())
            {
                debug!(
                    "resolve: transliteration preferred name={:?} before={} after={}",
                    name,
                    candidates.len(),
                    alternative.len()
                );
                candidates = alternative;
            }
        }

        if let Some(code) = self.embedded_code(&raw) {
            if candidates.binary_search(&code).is_ok() {
                debug!(
                    "resolve: embedded code name={:?} code={}",
                    name,
                    self.airports.by_index(code).iata
                );
                return vec![code];
            }
        }

        if candidates.is_empty() {
            if let Some(pos) = fragments.iter().position(|f| f == TERMINAL) {
                debug!("resolve: terminal fallback name={:?} kept={}", name, pos);
                candidates = self.match_fragments(&fragments[..pos]);
            }
        }

        candidates
    }

    /// Unique pass, then the shared pass if the unique pass found nothing.
    fn match_fragments(&self, fragments: &[String]) -> Vec<u16> {
        match self.unique_pass(fragments) {
            Some(index) => vec![index],
            None => self.shared_pass(fragments),
        }
    }

    /// The single airport named by the unique fragments, `None` when there
    /// are no hits or two fragments name different airports.
    fn unique_pass(&self, fragments: &[String]) -> Option<u16> {
        let mut found: Option<u16> = None;
        for fragment in fragments {
            let Some(index) = self.names.unique(fragment) else {
                continue;
            };
            match found {
                Some(prev) if prev != index => {
                    debug!("resolve: unique fragments conflict fragment={:?}", fragment);
                    return None;
                }
                _ => found = Some(index),
            }
        }
        found
    }

    /// Intersects the shared fragment hits. "international" is applied last
    /// and only when it leaves something over.
    fn shared_pass(&self, fragments: &[String]) -> Vec<u16> {
        let mut candidates: Option<Vec<u16>> = None;
        let mut international: Option<&[u16]> = None;
        for fragment in fragments {
            let Some(hit) = self.names.shared(fragment) else {
                continue;
            };
            if fragment == INTERNATIONAL {
                international = Some(hit);
                continue;
            }
            let narrowed = match candidates.as_ref() {
                Some(current) => intersect(current, hit),
                None => hit.to_vec(),
            };
            if narrowed.is_empty() {
                return narrowed;
            }
            candidates = Some(narrowed);
        }
        match (candidates, international) {
            (Some(current), Some(hit)) => {
                let narrowed = intersect(&current, hit);
                if narrowed.is_empty() {
                    debug!("resolve: international ignored candidates={}", current.len());
                    current
                } else {
                    narrowed
                }
            }
            (Some(current), None) => current,
            (None, hit) => hit.map(<[u16]>::to_vec).unwrap_or_default(),
        }
    }

    /// An explicit airport code written in the name, e.g. "Berlin TXL".
    ///
    /// `None` if there is none, if two different codes appear, or if a code
    /// token is also a unique name fragment of another airport.
    fn embedded_code(&self, raw: &[&str]) -> Option<u16> {
        let mut found: Option<u16> = None;
        for token in raw.iter().filter(|t| is_code_token(t)) {
            let Some(index) = self.airports.index_of(IataCode::new(token)) else {
                continue;
            };
            if self
                .names
                .unique(&normalize(token))
                .is_some_and(|other| other != index)
            {
                return None;
            }
            match found {
                Some(prev) if prev != index => return None,
                _ => found = Some(index),
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AIRPORTS: &str = "iata,icao,country,latitude,longitude,name\n\
        BER,EDDB,DE,52.36,13.50,Berlin Brandenburg Airport\n\
        CDG,LFPG,FR,49.00,2.55,Paris Charles de Gaulle Airport\n\
        MUC,EDDM,DE,48.35,11.79,München Airport\n\
        ORY,LFPO,FR,48.72,2.38,Paris Orly Airport\n\
        SXF,EDDB,DE,52.38,13.52,Berlin Schönefeld Airport\n\
        TXL,EDDT,DE,52.55,13.28,Berlin Tegel International Airport\n";
    const UNIQUE: &str = "fragment,iata\n\
        brandenburg,BER\ncharles,CDG\ngaulle,CDG\nmunchen,MUC\norly,ORY\nschonefeld,SXF\ntegel,TXL\n\
        sxf,BER\n";
    const SHARED: &str = "fragment,iata\n\
        berlin,BER SXF TXL\nparis,CDG ORY\ninternational,TXL CDG\nairport,BER MUC\n";

    fn resolve(name: &str) -> Vec<String> {
        let airports = AirportTable::from_csv(AIRPORTS).unwrap();
        let names = NameIndex::from_csv(UNIQUE, SHARED, &airports).unwrap();
        Resolver::new(&airports, &names)
            .resolve(name)
            .iter()
            .map(|c| c.to_string())
            .collect()
    }

    #[test]
    fn test_intersect() {
        assert_eq!(intersect(&[1, 3, 5, 7], &[2, 3, 7, 9]), vec![3, 7]);
        assert!(intersect(&[1, 2], &[3, 4]).is_empty());
        assert!(intersect(&[], &[1]).is_empty());
    }

    #[test]
    fn test_unique_and_shared() {
        assert_eq!(resolve("Flughafen Berlin-Tegel"), vec!["TXL"]);
        assert_eq!(resolve("Flughafen Berlin"), vec!["BER", "SXF", "TXL"]);
        assert_eq!(resolve("PARIS"), vec!["CDG", "ORY"]);
    }

    #[test]
    fn test_unique_conflict_is_abandoned() {
        assert!(resolve("Charles de Gaulle Orly").is_empty());
    }

    #[test]
    fn test_international_never_empties() {
        assert_eq!(resolve("Paris Intl"), vec!["CDG"]);
        assert_eq!(resolve("Berlin International"), vec!["TXL"]);
        // other fragments may still empty the set
        assert_eq!(resolve("Berlin Paris International"), Vec::<String>::new());
    }

    #[test]
    fn test_international_position_does_not_matter() {
        assert_eq!(resolve("International Airport"), vec!["BER", "MUC"]);
        assert_eq!(resolve("Airport International"), vec!["BER", "MUC"]);
        assert_eq!(resolve("International Berlin"), vec!["TXL"]);
        assert_eq!(resolve("International"), vec!["CDG", "TXL"]);
    }

    #[test]
    fn test_transliteration() {
        assert_eq!(resolve("Muenchen"), vec!["MUC"]);
        assert_eq!(resolve("SCHOENEFELD"), vec!["SXF"]);
    }

    #[test]
    fn test_transliteration_only_wins_when_smaller() {
        // "berlin" alone gives three airports, the transliterated "schonefeld" one
        assert_eq!(resolve("Berlin Schoenefeld"), vec!["SXF"]);
        // orly gives ORY, transliterated "munchen" conflicts and the shared
        // pass gives CDG: same size, first result kept
        assert_eq!(resolve("Paris Orly Muenchen International"), vec!["ORY"]);
    }

    #[test]
    fn test_embedded_code() {
        assert_eq!(resolve("Berlin BER"), vec!["BER"]);
        assert_eq!(resolve("Paris ORY"), vec!["ORY"]);
        // two explicit codes: keep the fuzzy result
        assert_eq!(resolve("Berlin TXL BER"), vec!["BER", "SXF", "TXL"]);
        // code not among the candidates is ignored
        assert_eq!(resolve("Paris TXL"), vec!["CDG", "ORY"]);
    }

    #[test]
    fn test_embedded_code_naming_another_airport_declines() {
        // tegel and sxf name different airports, so the shared pass decides;
        // SXF is a candidate but "sxf" is also BER's unique fragment
        assert_eq!(resolve("Berlin Tegel SXF"), vec!["BER", "SXF", "TXL"]);
    }

    #[test]
    fn test_terminal_fallback() {
        assert_eq!(resolve("Tegel Terminal Orly"), vec!["TXL"]);
        assert_eq!(resolve("Paris Terminal Berlin"), vec!["CDG", "ORY"]);
    }

    #[test]
    fn test_no_match() {
        assert!(resolve("").is_empty());
        assert!(resolve("ab 12").is_empty());
        assert!(resolve("Nowhere Field").is_empty());
    }
}
