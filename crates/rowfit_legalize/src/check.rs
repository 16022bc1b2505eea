//! Read-only audits of a placement against its segmentation.
//!
//! Each audit counts defects and logs one summary note. None of them change
//! state; they serve as oracles for tests and for callers that want to
//! confirm a run left the placement legal.

use crate::codes;
use crate::context::LegalizationContext;
use crate::ids::NodeId;
use rowfit_common::LegalResult;
use rowfit_diagnostics::Diagnostic;
use serde::{Deserialize, Serialize};

/// Defect counts from [`LegalizationContext::run_consistency_checks`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    /// Overlapping neighbors plus cells outside their segment.
    pub overlaps: usize,
    /// Edge-spacing and padding violations between neighbors.
    pub spacing_violations: usize,
    /// Cells held by a segment of another region.
    pub region_violations: usize,
    /// Left edges off the site grid of a spanned row.
    pub site_alignment_errors: usize,
    /// Bottom or top edges off the row grid.
    pub row_alignment_errors: usize,
}

impl ConsistencyReport {
    /// Sum of all defect counts.
    pub fn total(&self) -> usize {
        self.overlaps
            + self.spacing_violations
            + self.region_violations
            + self.site_alignment_errors
            + self.row_alignment_errors
    }

    /// Returns true if no audit found a defect.
    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }
}

impl LegalizationContext<'_> {
    /// Runs all five audits.
    pub fn run_consistency_checks(&self) -> LegalResult<ConsistencyReport> {
        Ok(ConsistencyReport {
            overlaps: self.check_overlap_in_segments(),
            spacing_violations: self.check_edge_spacing_in_segments(),
            region_violations: self.check_region_assignment(),
            site_alignment_errors: self.check_site_alignment()?,
            row_alignment_errors: self.check_row_alignment(),
        })
    }

    /// Cells of `seg`'s list re-sorted by left edge.
    fn sorted_by_left(&self, seg: usize) -> Vec<NodeId> {
        let mut cells = self.cells_in_seg[seg].clone();
        cells.sort_by_key(|&c| self.node(c).left);
        cells
    }

    /// Counts neighbors that overlap and cells that stick out of their
    /// segment. Spacing is ignored.
    pub fn check_overlap_in_segments(&self) -> usize {
        let mut err_n = 0;
        for (s, seg) in self.segments.iter().enumerate() {
            let cells = self.sorted_by_left(s);
            err_n += cells
                .windows(2)
                .filter(|w| self.node(w[0]).right() > self.node(w[1]).left)
                .count();
            err_n += cells
                .iter()
                .filter(|&&c| {
                    let nd = self.node(c);
                    nd.left < seg.min_x || nd.right() > seg.max_x
                })
                .count();
        }
        self.sink.emit(Diagnostic::note(
            codes::CHECK_OVERLAP,
            format!("found {err_n} overlaps between adjacent cells"),
        ));
        err_n
    }

    /// Counts gaps narrower than the edge-type rule or the combined padding.
    pub fn check_edge_spacing_in_segments(&self) -> usize {
        let (mut err_n, mut err_p) = (0, 0);
        for s in 0..self.segments.len() {
            for pair in self.sorted_by_left(s).windows(2) {
                let (l, r) = (self.node(pair[0]), self.node(pair[1]));
                let gap = r.left - l.right();
                if gap < self.arch.edge_spacing(l.right_edge_type, r.left_edge_type) {
                    err_n += 1;
                }
                let padding = if self.arch.uses_padding() {
                    l.right_padding + r.left_padding
                } else {
                    0
                };
                if gap < padding {
                    err_p += 1;
                }
            }
        }
        self.sink.emit(Diagnostic::note(
            codes::CHECK_SPACING,
            format!("found {err_n} edge spacing violations and {err_p} padding violations"),
        ));
        err_n + err_p
    }

    /// Counts cells listed in a segment of a different region.
    pub fn check_region_assignment(&self) -> usize {
        let err_n = self
            .segments
            .iter()
            .zip(&self.cells_in_seg)
            .map(|(seg, cells)| cells.iter().filter(|&&c| self.node(c).region != seg.region).count())
            .sum();
        self.sink.emit(Diagnostic::note(
            codes::CHECK_REGION,
            format!("found {err_n} cells in wrong regions"),
        ));
        err_n
    }

    /// Counts spanned rows whose site grid a movable cell's left edge misses.
    ///
    /// Cells outside every segment are skipped. A cell held by a different
    /// number of segments than it spans rows is a fatal error. Running off
    /// the top or bottom row counts as one more defect.
    pub fn check_site_alignment(&self) -> LegalResult<usize> {
        let row_height = self.arch.row_height();
        let num_rows = self.arch.num_rows() as i64;
        let mut err_n = 0;
        for id in self.network.node_ids() {
            let nd = self.node(id);
            if nd.terminal || nd.terminal_ni || nd.fixed {
                continue;
            }
            let spanned = self.arch.height_in_rows(self.geom(id));
            match self.segments_of(id).len() {
                0 => continue,
                n if n != spanned => {
                    return Err(self.fatal(format!("reverse cell map incorrectly sized for cell {id}")));
                }
                _ => {}
            }
            let rb = if row_height > 0 {
                i64::from((nd.bottom - self.arch.min_y()) / row_height)
            } else {
                0
            };
            let rt = rb + spanned as i64 - 1;
            if rb < 0 || rt >= num_rows {
                err_n += 1;
            }
            for r in rb.max(0)..=rt.min(num_rows - 1) {
                let row = &self.arch.rows()[r as usize];
                if !row.grid().is_aligned(nd.left) {
                    err_n += 1;
                }
            }
        }
        self.sink.emit(Diagnostic::note(
            codes::CHECK_SITE,
            format!("found {err_n} site alignment problems"),
        ));
        Ok(err_n)
    }

    /// Counts movable cells whose bottom and top do not sit on the row
    /// boundaries of the rows they span.
    pub fn check_row_alignment(&self) -> usize {
        let rows = self.arch.rows();
        let mut err_n = 0;
        for id in self.network.node_ids() {
            let nd = self.node(id);
            if nd.terminal || nd.terminal_ni || nd.fixed {
                continue;
            }
            let rb = self.arch.find_closest_row(nd.bottom);
            let rt = rb + self.arch.height_in_rows(self.geom(id)) - 1;
            match (rows.get(rb), rows.get(rt)) {
                (Some(lo), Some(hi)) if nd.bottom == lo.bottom && nd.top() == hi.top() => {}
                _ => err_n += 1,
            }
        }
        self.sink.emit(Diagnostic::note(
            codes::CHECK_ROW,
            format!("found {err_n} row alignment problems"),
        ));
        err_n
    }
}
