//! Unit identity

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a classification unit (`element_global_id`)
///
/// Identifiers are unique and never reused. The value `0` is reserved for
/// the virtual root, which has no row in the source data.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UnitId(pub i64);

impl UnitId {
    /// Sentinel identifier of the virtual root document
    pub const ROOT: UnitId = UnitId(0);

    /// Create a new unit id
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw integer value
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Whether this is the virtual root sentinel
    pub const fn is_root(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UnitId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<UnitId> for i64 {
    fn from(id: UnitId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_sentinel() {
        assert!(UnitId::ROOT.is_root());
        assert!(!UnitId::new(683123).is_root());
    }

    #[test]
    fn test_serializes_as_plain_integer() {
        let json = serde_json::to_string(&UnitId::new(860000)).unwrap();
        assert_eq!(json, "860000");
        let back: UnitId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, UnitId::new(860000));
    }
}
