//! Segment occupancy: the ordered per-segment cell lists, utilization and
//! the reverse cell-to-segment map.
//!
//! Every mutation keeps three things in step: the cell's slot in the segment
//! list (sorted by center), the segment's utilization and the cell's entry in
//! the reverse map. A mismatch between them is a fatal error.

use crate::context::LegalizationContext;
use crate::ids::{NodeId, SegmentId};
use rowfit_common::LegalResult;

/// Free space around one cell of a segment, split by side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpaceAround {
    /// Gap to the left neighbor or the segment start.
    pub left: i32,
    /// Gap to the right neighbor or the segment end.
    pub right: i32,
    /// Sum of the gaps over up to `limit` cells to the left.
    pub large_left: i32,
    /// Sum of the gaps over up to `limit` cells to the right.
    pub large_right: i32,
}

impl LegalizationContext<'_> {
    /// Index of the first cell of `seg` whose doubled center is not less than
    /// `x2`.
    pub(crate) fn lower_bound(&self, seg: SegmentId, x2: i64) -> usize {
        self.cells_in_seg[seg.index()].partition_point(|&c| self.node(c).center2() < x2)
    }

    /// Inserts `node` into `seg` at its center-ordered slot.
    ///
    /// Fails fatally if the reverse map already lists `seg` for the cell or
    /// already holds as many segments as the cell spans rows.
    pub fn add_cell_to_segment(&mut self, node: NodeId, seg: SegmentId) -> LegalResult<()> {
        let spanned = self.arch.height_in_rows(self.geom(node));
        let held = &self.reverse[node.index()];
        if held.contains(&seg) {
            return Err(self.fatal(format!("segment {seg} already present in cell to segment map of cell {node}")));
        }
        if held.len() >= spanned {
            return Err(self.fatal(format!("cell to segment map of cell {node} incorrectly sized")));
        }

        let nd = self.node(node);
        let (x2, width) = (nd.center2(), nd.width);
        let slot = self.lower_bound(seg, x2);
        self.cells_in_seg[seg.index()].insert(slot, node);
        self.segments[seg.index()].utilization += i64::from(width);
        self.reverse[node.index()].push(seg);
        Ok(())
    }

    /// Removes `node` from `seg`.
    ///
    /// Fails fatally if the cell is missing from the segment's list or the
    /// segment is missing from the cell's reverse map.
    pub fn remove_cell_from_segment(&mut self, node: NodeId, seg: SegmentId) -> LegalResult<()> {
        let Some(slot) = self.cells_in_seg[seg.index()].iter().position(|&c| c == node) else {
            return Err(self.fatal(format!("cell {node} not found in expected segment {seg}")));
        };
        let Some(back) = self.reverse[node.index()].iter().position(|&s| s == seg) else {
            return Err(self.fatal(format!("cannot find segment {seg} for cell {node}")));
        };
        let width = self.node(node).width;
        self.reverse[node.index()].remove(back);
        self.cells_in_seg[seg.index()].remove(slot);
        self.segments[seg.index()].utilization -= i64::from(width);
        Ok(())
    }

    /// Empties every segment and the reverse map, leaving the segmentation
    /// itself intact.
    pub fn remove_all_cells_from_segments(&mut self) {
        for cells in &mut self.cells_in_seg {
            cells.clear();
        }
        for seg in &mut self.segments {
            seg.utilization = 0;
        }
        for segs in &mut self.reverse {
            segs.clear();
        }
    }

    /// Restores center order in every segment after positions changed
    /// behind the lists' back, and recomputes utilization.
    pub fn resort_segments(&mut self) {
        let network = &*self.network;
        for (cells, seg) in self.cells_in_seg.iter_mut().zip(self.segments.iter_mut()) {
            cells.sort_by_key(|&c| network.node(c).center2());
            seg.utilization = cells.iter().map(|&c| i64::from(network.node(c).width)).sum();
        }
    }

    /// Number of segments whose utilization exceeds the configured target
    /// fraction of their width.
    pub fn segments_over_target(&self) -> usize {
        let target = self.config.target_utilization;
        self.segments
            .iter()
            .filter(|seg| seg.utilization as f64 > target * f64::from(seg.width()))
            .count()
    }

    /// Free space around the `ix`-th cell of `seg`.
    ///
    /// Returns the immediate gap on both sides combined, and the gap sum over
    /// the window of `limit` cells on either side (including the leading gap
    /// of the segment when the window reaches the first cell). `None` when
    /// `seg` has no `ix`-th cell.
    pub fn space_around_cell(&self, seg: SegmentId, ix: usize, limit: usize) -> Option<(i32, i32)> {
        let split = self.space_around_cell_split(seg, ix, limit)?;
        let n = self.cells_in_seg[seg.index()].len();
        let mut larger = if ix < limit { self.gap_before(seg, 0) } else { 0 };
        for j in ix.saturating_sub(limit)..=(ix + limit).min(n - 1) {
            larger += self.gap_after(seg, j);
        }
        Some((split.left + split.right, larger))
    }

    /// Free space around the `ix`-th cell of `seg`, split into left and
    /// right sides. `None` when `seg` has no `ix`-th cell.
    pub fn space_around_cell_split(&self, seg: SegmentId, ix: usize, limit: usize) -> Option<SpaceAround> {
        let n = self.cells_in_seg.get(seg.index())?.len();
        if ix >= n {
            return None;
        }
        let mut space = SpaceAround {
            left: self.gap_before(seg, ix),
            right: self.gap_after(seg, ix),
            ..SpaceAround::default()
        };
        if ix < limit {
            space.large_left = self.gap_before(seg, 0);
        }
        for j in ix.saturating_sub(limit)..ix {
            space.large_left += self.gap_after(seg, j);
        }
        for j in ix..=(ix + limit).min(n - 1) {
            space.large_right += self.gap_after(seg, j);
        }
        Some(space)
    }

    fn gap_before(&self, seg: SegmentId, ix: usize) -> i32 {
        let cells = &self.cells_in_seg[seg.index()];
        let left = self.node(cells[ix]).left;
        match ix.checked_sub(1) {
            Some(prev) => left - self.node(cells[prev]).right(),
            None => left - self.segment(seg).min_x,
        }
    }

    fn gap_after(&self, seg: SegmentId, ix: usize) -> i32 {
        let cells = &self.cells_in_seg[seg.index()];
        let right = self.node(cells[ix]).right();
        match cells.get(ix + 1) {
            Some(&next) => self.node(next).left - right,
            None => self.segment(seg).max_x - right,
        }
    }
}
