//! Source schema versions
//!
//! The source snapshot exists in exactly two schema versions. Each version
//! maps to a distinct upstream source item and to the set of optional
//! document sections its tables can populate. Adding a version means adding
//! a variant and a row to [`PROFILES`].

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::VersionError;

/// Supported source schema versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SchemaVersion {
    /// NVC 2.02, the older schema with the 1994 USFS ecoregion tables
    V2_02,
    /// NVC 2.03, the newer schema with the state crosswalk table
    V2_03,
}

/// Static description of what a schema version provides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionProfile {
    pub version: SchemaVersion,
    /// Version label as published upstream
    pub label: &'static str,
    /// Identifier of the upstream source item holding this snapshot
    pub source_item_id: &'static str,
    /// Title of the source data file attached to the upstream item
    pub source_file_title: &'static str,
    /// Query `UnitXEcoregionUsfs1994` (legacy ecoregion scheme)
    pub usfs_ecoregions_1994: bool,
    /// Query `UnitXEcoregionUsfs2007`
    pub usfs_ecoregions_2007: bool,
    /// Query `UnitXStateCrosswalk` and emit the State Crosswalk section
    pub state_crosswalk: bool,
}

/// Profiles for every supported version, oldest first
pub const PROFILES: [VersionProfile; 2] = [
    VersionProfile {
        version: SchemaVersion::V2_02,
        label: "2.02",
        source_item_id: "5aa827a2e4b0b1c392ef337a",
        source_file_title: "Source Data",
        usfs_ecoregions_1994: true,
        usfs_ecoregions_2007: true,
        state_crosswalk: false,
    },
    VersionProfile {
        version: SchemaVersion::V2_03,
        label: "2.03",
        source_item_id: "5cb74a8ae4b0c3b0065d7b2d",
        source_file_title: "Source Data",
        usfs_ecoregions_1994: false,
        usfs_ecoregions_2007: true,
        state_crosswalk: true,
    },
];

impl SchemaVersion {
    /// All supported versions, oldest first
    pub const ALL: [SchemaVersion; 2] = [SchemaVersion::V2_02, SchemaVersion::V2_03];

    /// The newest supported version
    pub const fn latest() -> Self {
        SchemaVersion::V2_03
    }

    /// Profile row for this version
    pub fn profile(self) -> &'static VersionProfile {
        match self {
            SchemaVersion::V2_02 => &PROFILES[0],
            SchemaVersion::V2_03 => &PROFILES[1],
        }
    }

    /// Version label, e.g. `"2.03"`
    pub fn label(self) -> &'static str {
        self.profile().label
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::latest()
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SchemaVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        PROFILES
            .iter()
            .find(|profile| profile.label == trimmed)
            .map(|profile| profile.version)
            .ok_or_else(|| VersionError::Malformed(s.to_string()))
    }
}

impl TryFrom<f64> for SchemaVersion {
    type Error = VersionError;

    /// Versions are published as decimal numbers (`2.03`); configuration
    /// files may carry them unquoted.
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        format!("{value:.2}")
            .parse()
            .map_err(|_| VersionError::Malformed(value.to_string()))
    }
}

impl Serialize for SchemaVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for SchemaVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct VersionVisitor;

        impl Visitor<'_> for VersionVisitor {
            type Value = SchemaVersion;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a schema version such as \"2.03\"")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                SchemaVersion::try_from(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(VersionVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_supported_versions() {
        assert_eq!("2.02".parse::<SchemaVersion>().unwrap(), SchemaVersion::V2_02);
        assert_eq!(" 2.03 ".parse::<SchemaVersion>().unwrap(), SchemaVersion::V2_03);
    }

    #[test]
    fn test_parse_rejects_unknown_version() {
        let err = "2.04".parse::<SchemaVersion>().unwrap_err();
        assert_eq!(err, VersionError::Malformed("2.04".to_string()));
        assert!("".parse::<SchemaVersion>().is_err());
    }

    #[test]
    fn test_from_float() {
        assert_eq!(SchemaVersion::try_from(2.02).unwrap(), SchemaVersion::V2_02);
        assert_eq!(SchemaVersion::try_from(2.03).unwrap(), SchemaVersion::V2_03);
        assert!(SchemaVersion::try_from(1.0).is_err());
    }

    #[test]
    fn test_profiles_are_exclusive_on_gated_sections() {
        let old = SchemaVersion::V2_02.profile();
        let new = SchemaVersion::V2_03.profile();
        assert!(old.usfs_ecoregions_1994 && !old.state_crosswalk);
        assert!(!new.usfs_ecoregions_1994 && new.state_crosswalk);
        assert!(old.usfs_ecoregions_2007 && new.usfs_ecoregions_2007);
    }

    #[test]
    fn test_profile_table_matches_variants() {
        for version in SchemaVersion::ALL {
            assert_eq!(version.profile().version, version);
        }
        assert_eq!(SchemaVersion::default(), SchemaVersion::V2_03);
    }

    #[test]
    fn test_deserialize_string_and_number() {
        let v: SchemaVersion = serde_json::from_str("\"2.02\"").unwrap();
        assert_eq!(v, SchemaVersion::V2_02);
        let v: SchemaVersion = serde_json::from_str("2.03").unwrap();
        assert_eq!(v, SchemaVersion::V2_03);
        assert!(serde_json::from_str::<SchemaVersion>("\"9.99\"").is_err());
    }
}
