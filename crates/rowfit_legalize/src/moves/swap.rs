//! Pairwise swap of two single-height cells.

use crate::context::LegalizationContext;
use crate::ids::{NodeId, SegmentId};

impl LegalizationContext<'_> {
    /// Swaps `cell` with the cell of `sj` nearest `xj`.
    ///
    /// Cells that are not neighbors must each fit into the gap the other
    /// leaves behind. Neighbors in one segment are placed together with the
    /// shift solver inside the span they jointly occupy.
    #[allow(clippy::too_many_arguments)]
    pub fn try_swap_pair(
        &mut self,
        cell: NodeId,
        xi: i32,
        _yi: i32,
        si: SegmentId,
        xj: i32,
        _yj: i32,
        sj: SegmentId,
    ) -> bool {
        self.moves.clear();
        if si.index() >= self.segments.len() || sj.index() >= self.segments.len() {
            return false;
        }
        let cells_j = &self.cells_in_seg[sj.index()];
        let ix = self.lower_bound(sj, 2 * i64::from(xj));
        let Some(other) = cells_j.get(ix).or(cells_j.last()).copied() else {
            return false;
        };
        if other == cell
            || self.arch.height_in_rows(self.geom(cell)) != 1
            || self.arch.height_in_rows(self.geom(other)) != 1
        {
            return false;
        }
        let (Some(ix_i), Some(ix_j)) = (self.index_in_segment(si, cell), self.index_in_segment(sj, other)) else {
            return false;
        };

        let (xi, xj) = if si == sj && ix_i + 1 == ix_j {
            let Some(pos) = self.swap_neighbors(si, ix_i, cell, other, xi, xj) else {
                return false;
            };
            (pos[0], pos[1])
        } else if si == sj && ix_j + 1 == ix_i {
            let Some(pos) = self.swap_neighbors(si, ix_j, other, cell, xj, xi) else {
                return false;
            };
            (pos[1], pos[0])
        } else {
            let Some(new_other) = self.fit_into_vacated(si, ix_i, other, xi) else {
                return false;
            };
            let Some(new_cell) = self.fit_into_vacated(sj, ix_j, cell, xj) else {
                return false;
            };
            (new_other, new_cell)
        };

        let (yi, yj) = (self.node(cell).bottom, self.node(other).bottom);
        let staged = self.stage_single(cell, si, xj, yj, sj) && self.stage_single(other, sj, xi, yi, si);
        self.settle(staged)
    }

    /// Aligned position for `incoming` in the gap left by the `ix`-th cell of
    /// `seg`, nearest `target`.
    fn fit_into_vacated(&self, seg: SegmentId, ix: usize, incoming: NodeId, target: i32) -> Option<i32> {
        let cells = &self.cells_in_seg[seg.index()];
        let prev = ix.checked_sub(1).map(|p| cells[p]);
        let next = cells.get(ix + 1).copied();
        let s = self.segment(seg);
        let rx = next.map_or(s.max_x, |n| self.node(n).left) - self.cell_spacing(Some(incoming), next);
        let lx = prev.map_or(s.min_x, |p| self.node(p).right()) + self.cell_spacing(prev, Some(incoming));
        if self.node(incoming).width > rx - lx {
            return None;
        }
        self.align_pos(incoming, target, lx, rx)
    }

    /// Exchanges neighbors `left` (at `ix`) and `right` of `seg`.
    ///
    /// Returns the new left edges of `[right, left]`: `right` aims at
    /// `left_x` and `left` at `right_x`.
    fn swap_neighbors(
        &self,
        seg: SegmentId,
        ix: usize,
        left: NodeId,
        right: NodeId,
        left_x: i32,
        right_x: i32,
    ) -> Option<Vec<i32>> {
        let cells = &self.cells_in_seg[seg.index()];
        let prev = ix.checked_sub(1).map(|p| cells[p]);
        let next = cells.get(ix + 2).copied();
        let s = self.segment(seg);
        let rx = next.map_or(s.max_x, |n| self.node(n).left) - self.cell_spacing(Some(left), next);
        let lx = prev.map_or(s.min_x, |p| self.node(p).right()) + self.cell_spacing(prev, Some(right));
        let need = self.node(left).width + self.node(right).width + self.cell_spacing(Some(right), Some(left));
        if need > rx - lx {
            return None;
        }
        self.shift(&[right, left], &[left_x, right_x], lx, rx, s.row.index())
    }
}
