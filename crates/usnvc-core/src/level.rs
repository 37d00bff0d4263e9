//! Hierarchy levels and display titles

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Taxonomic rank of a unit, ordered from the top of the classification down
///
/// Ranks the classification does not name explicitly are kept verbatim in
/// [`HierarchyLevel::Other`] so no source value is lost.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HierarchyLevel {
    Class,
    Subclass,
    Formation,
    Division,
    Macrogroup,
    Group,
    Alliance,
    Association,
    Other(String),
}

/// How a unit's display title is composed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleStyle {
    /// `{classificationCode} {colloquialName} {hierarchyLevel}`
    Colloquial,
    /// `{classificationCode} {translatedName}`
    ClassifiedTranslated,
    /// `{databaseCode} {translatedName}`
    DatabaseTranslated,
}

impl HierarchyLevel {
    /// The rank name as stored in the source data
    pub fn as_str(&self) -> &str {
        match self {
            HierarchyLevel::Class => "Class",
            HierarchyLevel::Subclass => "Subclass",
            HierarchyLevel::Formation => "Formation",
            HierarchyLevel::Division => "Division",
            HierarchyLevel::Macrogroup => "Macrogroup",
            HierarchyLevel::Group => "Group",
            HierarchyLevel::Alliance => "Alliance",
            HierarchyLevel::Association => "Association",
            HierarchyLevel::Other(name) => name,
        }
    }

    /// Title style for this rank
    pub fn title_style(&self) -> TitleStyle {
        match self {
            HierarchyLevel::Class
            | HierarchyLevel::Subclass
            | HierarchyLevel::Formation
            | HierarchyLevel::Division => TitleStyle::Colloquial,
            HierarchyLevel::Macrogroup | HierarchyLevel::Group => {
                TitleStyle::ClassifiedTranslated
            }
            _ => TitleStyle::DatabaseTranslated,
        }
    }
}

impl FromStr for HierarchyLevel {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Class" => HierarchyLevel::Class,
            "Subclass" => HierarchyLevel::Subclass,
            "Formation" => HierarchyLevel::Formation,
            "Division" => HierarchyLevel::Division,
            "Macrogroup" => HierarchyLevel::Macrogroup,
            "Group" => HierarchyLevel::Group,
            "Alliance" => HierarchyLevel::Alliance,
            "Association" => HierarchyLevel::Association,
            other => HierarchyLevel::Other(other.to_string()),
        })
    }
}

impl From<&str> for HierarchyLevel {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(level) => level,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for HierarchyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for HierarchyLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for HierarchyLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(HierarchyLevel::from(raw.as_str()))
    }
}

/// Naming fields that feed a display title
#[derive(Debug, Clone, Copy, Default)]
pub struct TitleParts<'a> {
    pub classification_code: Option<&'a str>,
    pub database_code: Option<&'a str>,
    pub translated_name: Option<&'a str>,
    pub colloquial_name: Option<&'a str>,
}

/// Compose the display title of a unit
///
/// The same function titles a unit's own document and every node of its
/// cached hierarchy. Absent naming fields are skipped rather than rendered.
pub fn display_title(level: Option<&HierarchyLevel>, parts: &TitleParts<'_>) -> String {
    let style = level
        .map(HierarchyLevel::title_style)
        .unwrap_or(TitleStyle::DatabaseTranslated);

    let pieces: [Option<&str>; 3] = match style {
        TitleStyle::Colloquial => [
            parts.classification_code,
            parts.colloquial_name,
            level.map(HierarchyLevel::as_str),
        ],
        TitleStyle::ClassifiedTranslated => {
            [parts.classification_code, parts.translated_name, None]
        }
        TitleStyle::DatabaseTranslated => [parts.database_code, parts.translated_name, None],
    };

    pieces
        .iter()
        .flatten()
        .map(|piece| piece.trim())
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts() -> TitleParts<'static> {
        TitleParts {
            classification_code: Some("1"),
            database_code: Some("CEGL005222"),
            translated_name: Some("Pinus ponderosa Woodland"),
            colloquial_name: Some("Forest & Woodland"),
        }
    }

    #[test]
    fn test_upper_levels_use_colloquial_title() {
        let title = display_title(Some(&HierarchyLevel::Class), &parts());
        assert_eq!(title, "1 Forest & Woodland Class");

        let title = display_title(Some(&HierarchyLevel::Division), &parts());
        assert_eq!(title, "1 Forest & Woodland Division");
    }

    #[test]
    fn test_middle_levels_use_classification_code() {
        let title = display_title(Some(&HierarchyLevel::Group), &parts());
        assert_eq!(title, "1 Pinus ponderosa Woodland");

        let title = display_title(Some(&HierarchyLevel::Macrogroup), &parts());
        assert_eq!(title, "1 Pinus ponderosa Woodland");
    }

    #[test]
    fn test_fine_levels_use_database_code() {
        let title = display_title(Some(&HierarchyLevel::Association), &parts());
        assert_eq!(title, "CEGL005222 Pinus ponderosa Woodland");

        let title = display_title(Some(&HierarchyLevel::from("Subassociation")), &parts());
        assert_eq!(title, "CEGL005222 Pinus ponderosa Woodland");
    }

    #[test]
    fn test_missing_fields_are_skipped() {
        let sparse = TitleParts {
            classification_code: Some("2.B"),
            ..Default::default()
        };
        assert_eq!(
            display_title(Some(&HierarchyLevel::Subclass), &sparse),
            "2.B Subclass"
        );
        assert_eq!(display_title(None, &TitleParts::default()), "");
    }

    #[test]
    fn test_unknown_level_round_trips_verbatim() {
        let level = HierarchyLevel::from("Subassociation");
        assert_eq!(level, HierarchyLevel::Other("Subassociation".to_string()));
        let json = serde_json::to_string(&level).unwrap();
        assert_eq!(json, "\"Subassociation\"");
    }
}
