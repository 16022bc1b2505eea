//! Single-height move into a different segment, pushing neighbors aside.

use crate::context::LegalizationContext;
use crate::ids::{NodeId, SegmentId};
use rowfit_common::SiteGrid;

impl LegalizationContext<'_> {
    /// Moves single-height `cell` from `si` into `sj` near `xj`.
    ///
    /// The cell goes between the two cells of `sj` that bracket `xj`; those
    /// neighbors and any cells beyond them are pushed outward by whole sites
    /// when spacing demands it.
    #[allow(clippy::too_many_arguments)]
    pub fn try_move_cross_segment(
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
        if si == sj
            || sj.index() >= self.segments.len()
            || self.node(cell).region != self.segment(sj).region
            || self.arch.height_in_rows(self.geom(cell)) != 1
        {
            return false;
        }
        let yj = self.segment_bottom(sj);

        let (ndl, ndr) = self.neighbors_at(sj, xj);
        let seg = self.segment(sj);
        let (seg_min, seg_max, seg_width, util) = (seg.min_x, seg.max_x, seg.width(), seg.utilization);
        let w = self.node(cell).width;

        let sp_li = self.cell_spacing(ndl, Some(cell));
        let sp_ir = self.cell_spacing(Some(cell), ndr);
        let sp_lr = match (ndl, ndr) {
            (Some(_), Some(_)) => self.cell_spacing(ndl, ndr),
            _ => 0,
        };
        let required = i64::from(w + sp_li + sp_ir - sp_lr);
        if required + util > i64::from(seg_width) {
            return false;
        }

        let lx = ndl.map_or(seg_min, |l| self.node(l).right()) + sp_li;
        let rx = ndr.map_or(seg_max, |r| self.node(r).left) - sp_ir;
        let Some(xj) = self.align_pos(cell, xj, lx, rx) else {
            return false;
        };

        let staged = self.stage_single(cell, si, xj, yj, sj)
            && ndr.map_or(true, |r| self.shift_right_from(cell, xj, sj, r))
            && ndl.map_or(true, |l| self.shift_left_from(cell, xj, sj, l));
        self.settle(staged)
    }

    /// Cells of `seg` immediately left and right of `x`.
    ///
    /// With no cell centered at or beyond `x`, the last cell is the left
    /// neighbor.
    pub(crate) fn neighbors_at(&self, seg: SegmentId, x: i32) -> (Option<NodeId>, Option<NodeId>) {
        let cells = &self.cells_in_seg[seg.index()];
        let ix = self.lower_bound(seg, 2 * i64::from(x));
        match cells.get(ix) {
            Some(&r) => (ix.checked_sub(1).map(|p| cells[p]), Some(r)),
            None => (cells.last().copied(), None),
        }
    }

    fn row_grid_of(&self, seg: SegmentId) -> Option<SiteGrid> {
        self.arch.row(self.segment(seg).row).map(|row| row.grid())
    }

    /// Pushes `ndr` and the cells after it right of `ndi` placed at `xj`.
    fn shift_right_from(&mut self, mut ndi: NodeId, mut xj: i32, sj: SegmentId, mut ndr: NodeId) -> bool {
        let Some(mut ix) = self.index_in_segment(sj, ndr) else {
            return false;
        };
        let Some(grid) = self.row_grid_of(sj) else {
            return false;
        };
        let last = self.cells_in_seg[sj.index()].len() - 1;
        let seg_max = self.segment(sj).max_x;
        loop {
            let w = self.node(ndi).width;
            let sp = self.cell_spacing(Some(ndi), Some(ndr));
            if self.node(ndr).left >= xj + w + sp {
                break;
            }
            if self.arch.height_in_rows(self.geom(ndr)) != 1 {
                return false;
            }
            xj = grid.snap_up(xj + w + sp);
            let bottom = self.node(ndr).bottom;
            if !self.stage_single(ndr, sj, xj, bottom, sj) {
                return false;
            }
            if xj + self.node(ndr).width + self.cell_spacing(Some(ndr), None) > seg_max {
                return false;
            }
            if ix == last {
                break;
            }
            ix += 1;
            ndi = ndr;
            ndr = self.cells_in_seg[sj.index()][ix];
        }
        true
    }

    /// Pushes `ndl` and the cells before it left of `ndi` placed at `xj`.
    fn shift_left_from(&mut self, mut ndi: NodeId, mut xj: i32, sj: SegmentId, mut ndl: NodeId) -> bool {
        let Some(mut ix) = self.index_in_segment(sj, ndl) else {
            return false;
        };
        let Some(grid) = self.row_grid_of(sj) else {
            return false;
        };
        let seg_min = self.segment(sj).min_x;
        loop {
            let sp = self.cell_spacing(Some(ndl), Some(ndi));
            if self.node(ndl).right() + sp <= xj {
                break;
            }
            if self.arch.height_in_rows(self.geom(ndl)) != 1 {
                return false;
            }
            xj = grid.snap_down(xj - sp - self.node(ndl).width);
            let bottom = self.node(ndl).bottom;
            if !self.stage_single(ndl, sj, xj, bottom, sj) {
                return false;
            }
            if xj - self.cell_spacing(None, Some(ndl)) < seg_min {
                return false;
            }
            if ix == 0 {
                break;
            }
            ix -= 1;
            ndi = ndl;
            ndl = self.cells_in_seg[sj.index()][ix];
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixture::placed;
    use crate::data::{Network, Node};
    use crate::moves::SegmentRef;
    use rowfit_arch::{RegionId, RowArchitecture};

    fn two_rows(cells: &[(i32, i32, i32)]) -> (RowArchitecture, Network) {
        let arch = RowArchitecture::uniform(2, 10, 0, 1, 100).unwrap();
        let mut nw = Network::new();
        for (k, &(x, y, w)) in cells.iter().enumerate() {
            nw.add_node(Node::new(format!("c{k}"), x, y, w, 10));
        }
        (arch, nw)
    }

    #[test]
    fn into_empty_segment() {
        let (arch, mut nw) = two_rows(&[(20, 0, 10)]);
        let a = nw.find("c0").unwrap();
        placed(&arch, &mut nw, |ctx| {
            let si = ctx.segments_of(a)[0];
            let sj = ctx.segments_in_row(1)[0];
            assert!(ctx.try_move_cross_segment(a, 20, 0, si, 35, 10, sj));
            let e = &ctx.staged_moves()[0];
            assert_eq!((e.new_left, e.new_bottom), (35, 10));
            assert_eq!(e.new_segments, SegmentRef::Single(sj));
        });
    }

    #[test]
    fn between_two_cells() {
        let (arch, mut nw) = two_rows(&[(0, 0, 10), (10, 10, 10), (50, 10, 10)]);
        let a = nw.find("c0").unwrap();
        placed(&arch, &mut nw, |ctx| {
            let si = ctx.segments_of(a)[0];
            let sj = ctx.segments_in_row(1)[0];
            // Target overlaps the left neighbor, so it is clamped to [20, 50].
            assert!(ctx.try_move_cross_segment(a, 0, 0, si, 17, 10, sj));
            assert_eq!(ctx.staged_moves().len(), 1);
            assert_eq!(ctx.staged_moves()[0].new_left, 20);
        });
    }

    #[test]
    fn no_room_between_cells() {
        let (arch, mut nw) = two_rows(&[(0, 0, 10), (10, 10, 10), (25, 10, 10)]);
        let a = nw.find("c0").unwrap();
        placed(&arch, &mut nw, |ctx| {
            let si = ctx.segments_of(a)[0];
            let sj = ctx.segments_in_row(1)[0];
            assert!(!ctx.try_move_cross_segment(a, 0, 0, si, 21, 10, sj));
        });
    }

    #[test]
    fn full_segment_rejected() {
        let (arch, mut nw) = two_rows(&[(0, 0, 10), (0, 10, 50), (50, 10, 45)]);
        let a = nw.find("c0").unwrap();
        placed(&arch, &mut nw, |ctx| {
            let si = ctx.segments_of(a)[0];
            let sj = ctx.segments_in_row(1)[0];
            assert!(!ctx.try_move_cross_segment(a, 0, 0, si, 95, 10, sj));
        });
    }

    #[test]
    fn same_segment_or_wrong_region_rejected() {
        let (arch, mut nw) = two_rows(&[(0, 0, 10)]);
        let a = nw.find("c0").unwrap();
        placed(&arch, &mut nw, |ctx| {
            let si = ctx.segments_of(a)[0];
            assert!(!ctx.try_move_cross_segment(a, 0, 0, si, 40, 0, si));
        });
        nw.node_mut(a).region = RegionId::from_raw(1);
        let mut arch = arch;
        arch.add_region(vec![rowfit_arch::Rect::new(0, 0, 50, 10)]);
        placed(&arch, &mut nw, |ctx| {
            let Some(&si) = ctx.segments_of(a).first() else {
                return;
            };
            let sj = ctx.segments_in_row(1)[0];
            assert!(!ctx.try_move_cross_segment(a, 0, 0, si, 40, 10, sj));
        });
    }

    #[test]
    fn keeps_edge_spacing_to_neighbors() {
        let arch = RowArchitecture::uniform(2, 10, 0, 1, 100)
            .unwrap()
            .with_spacing_table(vec![vec![0, 0], vec![0, 4]]);
        let mut nw = Network::new();
        let a = nw.add_node(Node::new("a", 0, 0, 10, 10).with_edge_types(1, 1));
        let l = nw.add_node(Node::new("l", 20, 10, 10, 10).with_edge_types(1, 1));
        let r = nw.add_node(Node::new("r", 50, 10, 10, 10).with_edge_types(1, 1));
        placed(&arch, &mut nw, |ctx| {
            let si = ctx.segments_of(a)[0];
            let sj = ctx.segments_in_row(1)[0];
            assert!(ctx.try_move_cross_segment(a, 0, 0, si, 31, 10, sj));
            let staged: Vec<_> = ctx.staged_moves().iter().map(|e| (e.node, e.new_left)).collect();
            assert_eq!(staged, vec![(a, 34)]);
            assert!(!staged.iter().any(|&(n, _)| n == l || n == r));
        });
    }
}
