//! Multi-height move into gaps that line up across every spanned row.

use crate::context::LegalizationContext;
use crate::ids::{NodeId, SegmentId};

impl LegalizationContext<'_> {
    /// Moves multi-height `cell` so its bottom lands in the row of `sj`.
    ///
    /// The rows are pulled down when the cell would run past the top of the
    /// image. In every spanned row the cell needs a segment of its region
    /// containing `xj` with a free gap at least its width; the gaps are
    /// intersected and the cell is aligned inside the result. Neighbors
    /// never move.
    #[allow(clippy::too_many_arguments)]
    pub fn try_move_multi_height(
        &mut self,
        cell: NodeId,
        _xi: i32,
        _yi: i32,
        _si: SegmentId,
        xj: i32,
        _yj: i32,
        sj: SegmentId,
    ) -> bool {
        self.moves.clear();
        let span = self.arch.height_in_rows(self.geom(cell));
        if span <= 1 || self.segments_of(cell).len() != span || sj.index() >= self.segments.len() {
            return false;
        }
        let num_rows = self.arch.num_rows();
        if span > num_rows {
            return false;
        }
        let rb = self.segment(sj).row.index().min(num_rows - span);
        if self.arch.power_compatible(self.geom(cell), rb).is_none() {
            return false;
        }
        let Some(yj) = self.arch.rows().get(rb).map(|row| row.bottom) else {
            return false;
        };

        let region = self.node(cell).region;
        let mut segs = Vec::with_capacity(span);
        for r in rb..rb + span {
            match self.segment_at(r, xj, region) {
                Some(seg) => segs.push(seg),
                None => return false,
            }
        }

        let w = self.node(cell).width;
        let (mut xmin, mut xmax) = (i32::MIN, i32::MAX);
        for &seg in &segs {
            let Some((lx, rx)) = self.gap_excluding(seg, cell, xj) else {
                return false;
            };
            if w > rx - lx {
                return false;
            }
            xmin = xmin.max(lx);
            xmax = xmax.min(rx);
        }
        if w > xmax.saturating_sub(xmin) {
            return false;
        }
        let Some(x) = self.align_pos(cell, xj, xmin, xmax) else {
            return false;
        };
        let old = self.segments_of(cell).to_vec();
        self.stage_multi(cell, old, x, yj, segs)
    }

    /// Free span for `cell` around `xj` in `seg`, skipping `cell` itself as
    /// the left neighbor. `None` when the cell is its own right neighbor.
    fn gap_excluding(&self, seg: SegmentId, cell: NodeId, xj: i32) -> Option<(i32, i32)> {
        let cells = &self.cells_in_seg[seg.index()];
        let ix = self.lower_bound(seg, 2 * i64::from(xj));
        let right = cells.get(ix).copied();
        let mut left_ix = ix.checked_sub(1);
        if left_ix.is_some_and(|l| cells[l] == cell) {
            left_ix = left_ix.and_then(|l| l.checked_sub(1));
        }
        let left = left_ix.map(|l| cells[l]);
        if right == Some(cell) || left == Some(cell) {
            return None;
        }
        let s = self.segment(seg);
        let lx = match left {
            Some(l) => self.node(l).right() + self.cell_spacing(Some(l), Some(cell)),
            None => s.min_x,
        };
        let rx = match right {
            Some(r) => self.node(r).left - self.cell_spacing(Some(cell), Some(r)),
            None => s.max_x,
        };
        Some((lx, rx))
    }
}
