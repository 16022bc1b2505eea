//! Single-height move to a gap of the cell's own segment.

use crate::context::LegalizationContext;
use crate::ids::{NodeId, SegmentId};

impl LegalizationContext<'_> {
    /// Moves single-height `cell` within `si` to a gap next to the cell
    /// nearest `xj`.
    ///
    /// The gap left of that cell is tried first, then the one right of it.
    /// Nothing else moves.
    #[allow(clippy::too_many_arguments)]
    pub fn try_move_within_segment(
        &mut self,
        cell: NodeId,
        _xi: i32,
        _yi: i32,
        si: SegmentId,
        xj: i32,
        _yj: i32,
        sj: SegmentId,
    ) -> bool {
        self.moves.clear();
        if si != sj
            || sj.index() >= self.segments.len()
            || self.node(cell).region != self.segment(sj).region
            || self.arch.height_in_rows(self.geom(cell)) != 1
        {
            return false;
        }
        let yj = self.segment_bottom(sj);
        let (seg_min, seg_max) = (self.segment(sj).min_x, self.segment(sj).max_x);
        let w = self.node(cell).width;

        let others: Vec<NodeId> = self.cells_in_seg[sj.index()]
            .iter()
            .copied()
            .filter(|&c| c != cell)
            .collect();
        let x2 = 2 * i64::from(xj);
        let ix = others
            .partition_point(|&c| self.node(c).center2() < x2)
            .min(others.len().saturating_sub(1));

        let mut gaps = Vec::with_capacity(2);
        match others.get(ix) {
            None => gaps.push((
                seg_min + self.cell_spacing(None, Some(cell)),
                seg_max - self.cell_spacing(Some(cell), None),
            )),
            Some(&ndj) => {
                let prev = ix.checked_sub(1).map(|p| others[p]);
                let next = others.get(ix + 1).copied();
                let lx = match prev {
                    Some(p) => self.node(p).right() + self.cell_spacing(Some(p), Some(cell)),
                    None => seg_min + self.cell_spacing(None, Some(cell)),
                };
                gaps.push((lx, self.node(ndj).left - self.cell_spacing(Some(cell), Some(ndj))));
                let rx = match next {
                    Some(n) => self.node(n).left - self.cell_spacing(Some(cell), Some(n)),
                    None => seg_max - self.cell_spacing(Some(cell), None),
                };
                gaps.push((self.node(ndj).right() + self.cell_spacing(Some(ndj), Some(cell)), rx));
            }
        }

        for (lx, rx) in gaps {
            if w <= rx - lx {
                return match self.align_pos(cell, xj, lx, rx) {
                    Some(x) => self.stage_single(cell, si, x, yj, sj),
                    None => false,
                };
            }
        }
        false
    }
}
