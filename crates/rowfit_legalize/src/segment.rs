//! Row segments: maximal free, region-homogeneous spans of a row.

use crate::ids::SegmentId;
use rowfit_arch::{RegionId, RowId};
use rowfit_common::Interval;
use serde::{Deserialize, Serialize};

/// A free horizontal span `[min_x, max_x]` of one row.
///
/// Segments are recreated whenever segmentation is rebuilt. The cells placed
/// in a segment are tracked by the owning context, which also keeps
/// `utilization` equal to the sum of their widths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Index in the context's segment table.
    pub id: SegmentId,
    /// Row the segment lies in.
    pub row: RowId,
    /// Fence region of the segment.
    pub region: RegionId,
    /// Left end, on a site boundary.
    pub min_x: i32,
    /// Right end, on a site boundary.
    pub max_x: i32,
    /// Sum of the widths of the cells in the segment.
    pub utilization: i64,
}

impl Segment {
    /// Creates an empty segment in the default region.
    pub fn new(id: SegmentId, row: RowId, min_x: i32, max_x: i32) -> Self {
        Self {
            id,
            row,
            region: RegionId::DEFAULT,
            min_x,
            max_x,
            utilization: 0,
        }
    }

    /// Free width of the segment.
    pub fn width(&self) -> i32 {
        self.max_x - self.min_x
    }

    /// The segment as an interval.
    pub fn span(&self) -> Interval {
        Interval::new(self.min_x, self.max_x)
    }

    /// Returns true if `x` lies in `[min_x, max_x]`.
    pub fn contains_x(&self, x: i32) -> bool {
        self.span().contains(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_and_contains() {
        let seg = Segment::new(SegmentId::from_raw(0), RowId::from_raw(1), 10, 40);
        assert_eq!(seg.width(), 30);
        assert!(seg.contains_x(10));
        assert!(seg.contains_x(40));
        assert!(!seg.contains_x(41));
        assert!(seg.region.is_default());
    }
}
