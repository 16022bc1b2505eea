//! Opaque ID newtypes for legalization entities.
//!
//! [`NodeId`], [`PinId`], and [`SegmentId`] are thin `u32` wrappers used as
//! arena indices into the [`Network`](crate::data::Network) and the segment
//! table of a [`LegalizationContext`](crate::LegalizationContext).

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
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

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Opaque, copyable ID for a node (cell or terminal) in the network.
    NodeId
);

define_id!(
    /// Opaque, copyable ID for a pin in the network.
    PinId
);

define_id!(
    /// Opaque, copyable ID for a row segment.
    SegmentId
);
