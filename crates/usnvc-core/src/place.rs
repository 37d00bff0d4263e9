//! Place code enrichment
//!
//! Distribution data lists nations as a comma-separated string of ISO
//! alpha-2 codes, where a trailing `?` marks an uncertain occurrence. Each
//! code is expanded into a [`PlaceCode`] record. Enrichment is advisory: a
//! code missing from the table resolves to the name `"Unknown"`.

mod countries;

use serde::{Deserialize, Serialize};
use tracing::debug;

use countries::COUNTRIES;

/// Name given to codes that are not in the country table
pub const UNKNOWN_PLACE: &str = "Unknown";

/// Enriched nation entry of the Distribution section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceCode {
    #[serde(rename = "Abbreviation")]
    pub abbreviation: String,
    #[serde(rename = "Uncertainty")]
    pub uncertainty: bool,
    #[serde(rename = "Name")]
    pub name: String,
}

/// Look up the country name for an alpha-2 code
pub fn country_name(abbreviation: &str) -> Option<&'static str> {
    let code = abbreviation.trim().to_ascii_uppercase();
    COUNTRIES
        .binary_search_by(|(candidate, _)| (*candidate).cmp(code.as_str()))
        .ok()
        .map(|index| COUNTRIES[index].1)
}

/// Resolve an alpha-2 code into a display record
pub fn resolve_place_code(abbreviation: &str, uncertain: bool) -> PlaceCode {
    let name = match country_name(abbreviation) {
        Some(name) => name.to_string(),
        None => {
            debug!(abbreviation, "Unresolved place code");
            UNKNOWN_PLACE.to_string()
        }
    };

    PlaceCode {
        abbreviation: abbreviation.to_string(),
        uncertainty: uncertain,
        name,
    }
}

/// Parse a raw nations string such as `"US, CA?"` into enriched entries
///
/// Uncertainty is read from the trailing `?` before it is stripped. Empty
/// tokens (doubled or trailing commas) are skipped.
pub fn parse_nations(raw: &str) -> Vec<PlaceCode> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| {
            let uncertain = token.ends_with('?');
            let abbreviation = token.replace('?', "");
            let abbreviation = abbreviation.trim();
            if abbreviation.is_empty() {
                return None;
            }
            Some(resolve_place_code(abbreviation, uncertain))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_table_is_sorted() {
        assert!(COUNTRIES.windows(2).all(|pair| pair[0].0 < pair[1].0));
        assert!(COUNTRIES.iter().all(|(code, _)| code.len() == 2));
    }

    #[test]
    fn test_resolves_known_codes() {
        let us = resolve_place_code("US", false);
        assert_eq!(us.name, "United States");
        assert!(!us.uncertainty);

        assert_eq!(country_name("mx"), Some("Mexico"));
    }

    #[test]
    fn test_unknown_code_degrades_to_sentinel() {
        let entry = resolve_place_code("ZZ", true);
        assert_eq!(entry.abbreviation, "ZZ");
        assert_eq!(entry.name, UNKNOWN_PLACE);
        assert!(entry.uncertainty);
    }

    #[test]
    fn test_parse_nations_with_uncertainty() {
        let nations = parse_nations("US, CA?");
        assert_eq!(nations.len(), 2);
        assert_eq!(nations[0].abbreviation, "US");
        assert!(!nations[0].uncertainty);
        assert_eq!(nations[1].abbreviation, "CA");
        assert!(nations[1].uncertainty);
        assert_eq!(nations[1].name, "Canada");
    }

    #[test]
    fn test_parse_nations_skips_empty_tokens() {
        let nations = parse_nations("MX,, ?,US,");
        let codes: Vec<_> = nations.iter().map(|n| n.abbreviation.as_str()).collect();
        assert_eq!(codes, vec!["MX", "US"]);
    }

    #[test]
    fn test_serialized_labels() {
        let json = serde_json::to_value(resolve_place_code("CA", true)).unwrap();
        assert_eq!(json["Abbreviation"], "CA");
        assert_eq!(json["Uncertainty"], true);
        assert_eq!(json["Name"], "Canada");
    }
}
