//! The move/swap engine: propose, validate and stage, then commit or reject.
//!
//! Every `try_*` routine starts from an empty move list and only records
//! entries; shared state changes solely in [`accept_move`]. A routine that
//! returns `false` leaves the list empty, so a move is staged whole or not
//! at all. [`reject_move`] discards a staged move that is not wanted.
//!
//! [`accept_move`]: LegalizationContext::accept_move
//! [`reject_move`]: LegalizationContext::reject_move

mod cross_segment;
mod move_list;
mod multi_height;
pub mod shift;
mod swap;
mod within_segment;

pub use move_list::{MoveEntry, MoveList, SegmentRef};
pub use shift::solve_shift;

use crate::context::LegalizationContext;
use crate::ids::{NodeId, SegmentId};
use rowfit_common::LegalResult;

impl LegalizationContext<'_> {
    /// Proposes moving `cell` so that its lower-left corner lands near
    /// `(x, y)`.
    ///
    /// The target segment is `segment_hint` when given, otherwise the
    /// segment of the cell's region containing `x` in the row nearest `y`.
    /// Returns `true` with the move staged, or `false` with nothing changed.
    pub fn propose_move(&mut self, cell: NodeId, x: i32, y: i32, segment_hint: Option<SegmentId>) -> bool {
        self.moves.clear();
        let Some(&si) = self.segments_of(cell).first() else {
            return false;
        };
        let sj = match segment_hint {
            Some(seg) if seg.index() < self.segments.len() => seg,
            Some(_) => return false,
            None => {
                let row = self.arch.find_closest_row(y);
                match self.segment_at(row, x, self.node(cell).region) {
                    Some(seg) => seg,
                    None => return false,
                }
            }
        };
        let nd = self.node(cell);
        let (xi, yi) = (nd.left, nd.bottom);
        self.try_move(cell, xi, yi, si, x, y, sj)
    }

    /// Proposes exchanging the places of `a` and `b`.
    ///
    /// Both cells must be assigned single-height cells. Returns `true` with
    /// both relocations staged, or `false` with nothing changed.
    pub fn propose_swap(&mut self, a: NodeId, b: NodeId) -> bool {
        self.moves.clear();
        let (Some(&si), Some(&sj)) = (self.segments_of(a).first(), self.segments_of(b).first()) else {
            return false;
        };
        let (na, nb) = (self.node(a), self.node(b));
        let (xi, yi, xj, yj) = (na.left, na.bottom, nb.left, nb.bottom);
        self.try_swap(a, xi, yi, si, xj, yj, sj)
    }

    /// Dispatches a move by cell height and by whether the target segment
    /// differs from the current one.
    #[allow(clippy::too_many_arguments)]
    pub fn try_move(&mut self, cell: NodeId, xi: i32, yi: i32, si: SegmentId, xj: i32, yj: i32, sj: SegmentId) -> bool {
        let staged = if self.arch.height_in_rows(self.geom(cell)) == 1 {
            if si != sj {
                self.try_move_cross_segment(cell, xi, yi, si, xj, yj, sj)
            } else {
                self.try_move_within_segment(cell, xi, yi, si, xj, yj, sj)
            }
        } else {
            self.try_move_multi_height(cell, xi, yi, si, xj, yj, sj)
        };
        self.settle(staged)
    }

    /// Dispatches a swap.
    #[allow(clippy::too_many_arguments)]
    pub fn try_swap(&mut self, cell: NodeId, xi: i32, yi: i32, si: SegmentId, xj: i32, yj: i32, sj: SegmentId) -> bool {
        let staged = self.try_swap_pair(cell, xi, yi, si, xj, yj, sj);
        self.settle(staged)
    }

    /// Entries staged by the last successful proposal.
    pub fn staged_moves(&self) -> &[MoveEntry] {
        self.moves.entries()
    }

    /// Commits the staged relocations and clears the list.
    ///
    /// Each cell leaves its old segments before its position changes and
    /// joins its new segments afterwards. Touched segments are re-sorted so
    /// that their order matches the final positions.
    pub fn accept_move(&mut self) -> LegalResult<()> {
        let entries = self.moves.take();
        let mut touched: Vec<SegmentId> = Vec::new();
        for entry in &entries {
            for &seg in entry.old_segments.as_slice() {
                self.remove_cell_from_segment(entry.node, seg)?;
            }
            let nd = self.network.node_mut(entry.node);
            nd.left = entry.new_left;
            nd.bottom = entry.new_bottom;
            for &seg in entry.new_segments.as_slice() {
                self.add_cell_to_segment(entry.node, seg)?;
                touched.push(seg);
            }
        }
        touched.sort();
        touched.dedup();
        let network = &*self.network;
        for seg in touched {
            self.cells_in_seg[seg.index()].sort_by_key(|&c| network.node(c).center2());
        }
        Ok(())
    }

    /// Discards the staged relocations.
    pub fn reject_move(&mut self) {
        self.moves.clear();
    }

    /// Site-aligned left edge for `cell` nearest `target` such that the cell
    /// lies within `[lo, hi]`, or `None` if no site works.
    pub fn align_pos(&self, cell: NodeId, target: i32, lo: i32, hi: i32) -> Option<i32> {
        let grid = self.arch.rows().first()?.grid();
        let xr = hi - self.node(cell).width;
        let mut xp = grid.snap_down(target.min(xr).max(lo));
        if xp < lo {
            xp += grid.pitch;
        } else if xp > xr {
            xp -= grid.pitch;
        }
        (lo..=xr).contains(&xp).then_some(xp)
    }

    /// Stages a single-height relocation.
    ///
    /// Fails when the list is full or the new position would be farther
    /// than the displacement limit from the cell's original position.
    pub(crate) fn stage_single(
        &mut self,
        node: NodeId,
        old_seg: SegmentId,
        new_left: i32,
        new_bottom: i32,
        new_seg: SegmentId,
    ) -> bool {
        if self.moves.is_full() {
            return false;
        }
        let (ox, oy) = self.original_position(node);
        if (new_left - ox).abs() > self.max_disp_x || (new_bottom - oy).abs() > self.max_disp_y {
            return false;
        }
        let nd = self.node(node);
        let entry = MoveEntry {
            node,
            old_left: nd.left,
            old_bottom: nd.bottom,
            old_segments: SegmentRef::Single(old_seg),
            new_left,
            new_bottom,
            new_segments: SegmentRef::Single(new_seg),
        };
        self.moves.push(entry)
    }

    /// Stages a multi-height relocation. Only the list capacity is checked.
    pub(crate) fn stage_multi(
        &mut self,
        node: NodeId,
        old_segs: Vec<SegmentId>,
        new_left: i32,
        new_bottom: i32,
        new_segs: Vec<SegmentId>,
    ) -> bool {
        let nd = self.node(node);
        let entry = MoveEntry {
            node,
            old_left: nd.left,
            old_bottom: nd.bottom,
            old_segments: SegmentRef::Multi(old_segs),
            new_left,
            new_bottom,
            new_segments: SegmentRef::Multi(new_segs),
        };
        self.moves.push(entry)
    }

    /// Empties the move list unless the proposal was fully staged.
    pub(crate) fn settle(&mut self, staged: bool) -> bool {
        if !staged {
            self.moves.clear();
        }
        staged
    }

    /// Bottom of the row holding `seg`.
    pub(crate) fn segment_bottom(&self, seg: SegmentId) -> i32 {
        self.arch
            .row(self.segment(seg).row)
            .map_or(0, |row| row.bottom)
    }

    /// Position of `node` in `seg`'s cell list.
    pub(crate) fn index_in_segment(&self, seg: SegmentId, node: NodeId) -> Option<usize> {
        self.cells_in_seg[seg.index()].iter().position(|&c| c == node)
    }
}


#[cfg(test)]
mod tests {
    use super::fixture::placed;
    use super::*;
    use crate::data::{Network, Node};
    use rowfit_arch::RowArchitecture;

    #[test]
    fn align_pos_rounds_down_then_corrects() {
        let arch = RowArchitecture::uniform(1, 10, 0, 4, 25).unwrap();
        let mut nw = Network::new();
        let a = nw.add_node(Node::new("a", 0, 0, 8, 10));
        placed(&arch, &mut nw, |ctx| {
            assert_eq!(ctx.align_pos(a, 13, 0, 100), Some(12));
            // Rounds below `lo`, so one site to the right.
            assert_eq!(ctx.align_pos(a, 13, 13, 100), Some(16));
            // Clamped to the right end, already aligned.
            assert_eq!(ctx.align_pos(a, 99, 0, 100), Some(92));
            // No aligned left edge in [13, 15].
            assert_eq!(ctx.align_pos(a, 13, 13, 23), None);
        });
    }

    #[test]
    fn unassigned_cell_cannot_move() {
        let arch = RowArchitecture::uniform(1, 10, 0, 1, 100).unwrap();
        let mut nw = Network::new();
        let a = nw.add_node(Node::new("a", 0, 0, 10, 10));
        placed(&arch, &mut nw, |ctx| {
            ctx.remove_all_cells_from_segments();
            assert!(!ctx.propose_move(a, 50, 0, None));
            assert!(ctx.staged_moves().is_empty());
        });
    }

    #[test]
    fn propose_accept_updates_everything() {
        let arch = RowArchitecture::uniform(2, 10, 0, 1, 100).unwrap();
        let mut nw = Network::new();
        let a = nw.add_node(Node::new("a", 0, 0, 10, 10));
        placed(&arch, &mut nw, |ctx| {
            let from = ctx.segments_of(a)[0];
            assert!(ctx.propose_move(a, 40, 10, None));
            assert_eq!(ctx.staged_moves().len(), 1);
            let to = match &ctx.staged_moves()[0].new_segments {
                SegmentRef::Single(s) => *s,
                SegmentRef::Multi(_) => unreachable!(),
            };
            // Nothing changes before commit.
            assert_eq!(ctx.node(a).left, 0);
            assert_eq!(ctx.segments_of(a), &[from]);

            ctx.accept_move().unwrap();
            assert_eq!((ctx.node(a).left, ctx.node(a).bottom), (40, 10));
            assert_eq!(ctx.segments_of(a), &[to]);
            assert!(ctx.cells_in_segment(from).is_empty());
            assert_eq!(ctx.segment(to).utilization, 10);
            assert!(ctx.staged_moves().is_empty());
        });
    }

    #[test]
    fn reject_leaves_state_untouched() {
        let arch = RowArchitecture::uniform(2, 10, 0, 1, 100).unwrap();
        let mut nw = Network::new();
        let a = nw.add_node(Node::new("a", 0, 0, 10, 10));
        placed(&arch, &mut nw, |ctx| {
            let before = (ctx.segments().to_vec(), ctx.segments_of(a).to_vec());
            assert!(ctx.propose_move(a, 40, 10, None));
            ctx.reject_move();
            assert!(ctx.staged_moves().is_empty());
            assert_eq!((ctx.segments().to_vec(), ctx.segments_of(a).to_vec()), before);
            assert_eq!(ctx.node(a).left, 0);
        });
    }

    #[test]
    fn bad_hint_is_rejected() {
        let arch = RowArchitecture::uniform(1, 10, 0, 1, 100).unwrap();
        let mut nw = Network::new();
        let a = nw.add_node(Node::new("a", 0, 0, 10, 10));
        placed(&arch, &mut nw, |ctx| {
            assert!(!ctx.propose_move(a, 40, 0, Some(SegmentId::from_raw(99))));
        });
    }
}
