//! The pending transaction built while a move or swap is validated.

use crate::ids::{NodeId, SegmentId};
use serde::{Deserialize, Serialize};

/// The segment or segments a staged cell occupies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentRef {
    /// A single-height cell's one segment.
    Single(SegmentId),
    /// A multi-height cell's segments, bottom row first.
    Multi(Vec<SegmentId>),
}

impl SegmentRef {
    /// The referenced segments as a slice.
    pub fn as_slice(&self) -> &[SegmentId] {
        match self {
            SegmentRef::Single(seg) => std::slice::from_ref(seg),
            SegmentRef::Multi(segs) => segs,
        }
    }
}

/// One staged relocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveEntry {
    /// The cell being moved.
    pub node: NodeId,
    /// Left edge before the move.
    pub old_left: i32,
    /// Bottom edge before the move.
    pub old_bottom: i32,
    /// Segments held before the move.
    pub old_segments: SegmentRef,
    /// Left edge after the move.
    pub new_left: i32,
    /// Bottom edge after the move.
    pub new_bottom: i32,
    /// Segments held after the move.
    pub new_segments: SegmentRef,
}

/// Bounded list of staged relocations.
///
/// Entries are only recorded here during validation; nothing touches the
/// network or the segments until the context commits the list.
#[derive(Debug, Clone, Default)]
pub struct MoveList {
    entries: Vec<MoveEntry>,
    limit: usize,
}

impl MoveList {
    /// Creates an empty list that accepts at most `limit` entries.
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::with_capacity(limit),
            limit,
        }
    }

    /// Maximum number of entries.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Returns true if no further entry can be staged.
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.limit
    }

    /// Appends `entry` unless the list is full.
    pub fn push(&mut self, entry: MoveEntry) -> bool {
        if self.is_full() {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Staged entries in staging order.
    pub fn entries(&self) -> &[MoveEntry] {
        &self.entries
    }

    /// Number of staged entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every staged entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn take(&mut self) -> Vec<MoveEntry> {
        std::mem::take(&mut self.entries)
    }
}
