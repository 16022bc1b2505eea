//! Opaque ID newtypes for floorplan entities.
//!
//! Each ID is a thin `u32` wrapper that is `Copy`, `Hash`, and `Serialize`/`Deserialize`.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }

            /// Returns the index as a `usize`, for arena lookups.
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl From<usize> for $name {
            fn from(index: usize) -> Self {
                Self(index as u32)
            }
        }
    };
}

define_id!(
    /// Index of a placement row, bottom to top.
    RowId
);

define_id!(
    /// Identifier of a fence region. Region zero is the default region.
    RegionId
);

impl RegionId {
    /// The default region that every unconstrained cell belongs to.
    pub const DEFAULT: RegionId = RegionId(0);

    /// Returns true for the default region.
    pub fn is_default(self) -> bool {
        self.0 == 0
    }
}

/// Power rail kind on a row edge or a cell edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PowerRail {
    /// Not specified; compatible with anything.
    #[default]
    Unknown,
    /// Supply rail.
    Vdd,
    /// Ground rail.
    Vss,
}

impl PowerRail {
    /// Returns true if the two rails may abut.
    pub fn matches(self, other: PowerRail) -> bool {
        self == PowerRail::Unknown || other == PowerRail::Unknown || self == other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn id_roundtrip() {
        let id = RowId::from_raw(42);
        assert_eq!(id.as_raw(), 42);
        assert_eq!(id.index(), 42);
        assert_eq!(RowId::from(7usize), RowId::from_raw(7));
    }

    #[test]
    fn id_hash_in_set() {
        let mut set = HashSet::new();
        set.insert(RegionId::from_raw(1));
        set.insert(RegionId::from_raw(2));
        set.insert(RegionId::from_raw(1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn default_region() {
        assert!(RegionId::DEFAULT.is_default());
        assert!(RegionId::default().is_default());
        assert!(!RegionId::from_raw(3).is_default());
    }

    #[test]
    fn id_serde_roundtrip() {
        let id = RegionId::from_raw(99);
        let json = serde_json::to_string(&id).unwrap();
        let restored: RegionId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, restored);
    }

    #[test]
    fn rail_matching() {
        assert!(PowerRail::Vdd.matches(PowerRail::Vdd));
        assert!(!PowerRail::Vdd.matches(PowerRail::Vss));
        assert!(PowerRail::Unknown.matches(PowerRail::Vss));
        assert!(PowerRail::Vss.matches(PowerRail::Unknown));
    }
}
