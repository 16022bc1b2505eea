//! Initial assignment of movable cells to segments.
//!
//! Single-height cells go to the segment that minimizes the L1 distance of
//! the left edge; the search radiates row by row from the cell's nearest row
//! and stops once the vertical distance alone cannot beat the best so far.
//! Multi-height cells go to the closest chain of vertically stacked segments
//! whose x spans overlap, measured from the cell center.

use crate::codes;
use crate::context::LegalizationContext;
use crate::ids::{NodeId, SegmentId};
use rowfit_common::{Interval, LegalResult};
use rowfit_diagnostics::{Diagnostic, Subject};

/// Running pair of candidates: the closest overall and the closest that is
/// wide enough for the cell.
struct Best<T> {
    closest: Option<(i64, T)>,
    fitting: Option<(i64, T)>,
}

impl<T> Best<T> {
    fn new() -> Self {
        Self {
            closest: None,
            fitting: None,
        }
    }

    fn dist_closest(&self) -> i64 {
        self.closest.as_ref().map_or(i64::MAX, |(d, _)| *d)
    }

    fn dist_fitting(&self) -> i64 {
        self.fitting.as_ref().map_or(i64::MAX, |(d, _)| *d)
    }

    fn offer(&mut self, dist: i64, fits: bool, candidate: T)
    where
        T: Clone,
    {
        if self.closest.is_none() || dist < self.dist_closest() {
            self.closest = Some((dist, candidate.clone()));
        }
        if fits && (self.fitting.is_none() || dist < self.dist_fitting()) {
            self.fitting = Some((dist, candidate));
        }
    }

    fn pick(self) -> Option<T> {
        self.fitting.or(self.closest).map(|(_, c)| c)
    }
}

impl LegalizationContext<'_> {
    /// Closest segment of the cell's region for a single-height cell.
    ///
    /// A segment wide enough for the cell is preferred over a closer one
    /// that is too narrow. Returns `None` when no segment of the cell's
    /// region exists.
    pub fn find_closest_segment(&self, node: NodeId) -> Option<SegmentId> {
        let nd = self.node(node);
        let num_rows = self.arch.num_rows();
        if num_rows == 0 {
            return None;
        }
        let row = self.arch.find_closest_row(nd.bottom);
        let row_height = i64::from(self.arch.row_height());
        let mut best = Best::new();

        let scan = |best: &mut Best<SegmentId>, r: usize, vert: i64| {
            for &s in &self.segs_in_row[r] {
                let seg = self.segment(s);
                if seg.region != nd.region {
                    continue;
                }
                let xx = seg.span().clamp_left(nd.left, nd.width);
                let hori = i64::from((xx - nd.left).abs());
                best.offer(hori + vert, nd.width <= seg.width(), s);
            }
        };

        scan(&mut best, row, 0);
        for offset in 1..=num_rows {
            let vert = offset as i64 * row_height;
            if let Some(below) = row.checked_sub(offset) {
                if vert <= best.dist_closest() || vert <= best.dist_fitting() {
                    scan(&mut best, below, vert);
                }
            }
            let above = row + offset;
            if above < num_rows && (vert <= best.dist_closest() || vert <= best.dist_fitting()) {
                scan(&mut best, above, vert);
            }
        }
        best.pick()
    }

    /// Closest chain of stacked segments for a multi-height cell, bottom row
    /// first.
    ///
    /// Only starting rows where the cell is power compatible are tried, and
    /// every segment of a chain must belong to the cell's region. Returns
    /// `Ok(None)` for single-height cells or when no chain exists.
    pub fn find_closest_span_of_segments(&self, node: NodeId) -> LegalResult<Option<Vec<SegmentId>>> {
        let nd = self.node(node);
        let spanned = self.arch.height_in_rows(self.geom(node));
        if spanned <= 1 {
            return Ok(None);
        }
        let xc2 = 2 * i64::from(nd.left) + i64::from(nd.width);
        let mut best = Best::new();
        let mut stack = Vec::with_capacity(spanned);
        let mut chains = Vec::new();

        for r in 0..self.arch.num_rows() {
            if self.arch.power_compatible(self.geom(node), r).is_none() {
                continue;
            }
            let top = r + spanned - 1;
            for &s in &self.segs_in_row[r] {
                chains.clear();
                stack.clear();
                self.span_dfs(s, self.segment(s).span(), r, top, &mut stack, &mut chains)?;

                for (chain, iv) in &chains {
                    if chain.iter().any(|&c| self.segment(c).region != nd.region) {
                        continue;
                    }
                    let bottom = self.rows_bottom(chain[0]);
                    let dy2 = 2 * i64::from((nd.bottom - bottom).abs());
                    let ww = i64::from(nd.width.min(iv.len()));
                    let lx2 = 2 * i64::from(iv.lo) + ww;
                    let rx2 = 2 * i64::from(iv.hi) - ww;
                    let dx2 = (xc2 - xc2.min(rx2).max(lx2)).abs();
                    best.offer(dx2 + dy2, nd.width <= iv.len(), chain.clone());
                }
            }
        }
        Ok(best.pick())
    }

    fn span_dfs(
        &self,
        seg: SegmentId,
        iv: Interval,
        bottom: usize,
        top: usize,
        stack: &mut Vec<SegmentId>,
        out: &mut Vec<(Vec<SegmentId>, Interval)>,
    ) -> LegalResult<()> {
        stack.push(seg);
        let row = self.segment(seg).row.index();
        if row < top {
            for &next in &self.segs_in_row[row + 1] {
                if let Some(shared) = iv.intersect(&self.segment(next).span()) {
                    self.span_dfs(next, shared, bottom, top, stack, out)?;
                }
            }
        } else {
            if stack.len() != top - bottom + 1 {
                return Err(self.fatal(format!(
                    "multi-height cell spans {} segments instead of {}",
                    stack.len(),
                    top - bottom + 1
                )));
            }
            out.push((stack.clone(), iv));
        }
        stack.pop();
        Ok(())
    }

    fn rows_bottom(&self, seg: SegmentId) -> i32 {
        self.arch
            .row(self.segment(seg).row)
            .map_or(0, |row| row.bottom)
    }

    /// Assigns each of `nodes` to its closest segment or chain of segments,
    /// snapping it inside. Returns the number of cells assigned.
    ///
    /// A cell with no segment in its region is left where it is and reported
    /// with a warning.
    pub fn assign_cells_to_segments(&mut self, nodes: &[NodeId]) -> LegalResult<usize> {
        let mut assigned = 0;
        let mut movement_x: i64 = 0;
        let mut movement_y: i64 = 0;

        for &node in nodes {
            let spanned = self.arch.height_in_rows(self.geom(node));
            let chain = if spanned == 1 {
                self.find_closest_segment(node).map(|s| vec![s])
            } else {
                self.find_closest_span_of_segments(node)?
            };
            let Some(chain) = chain else {
                self.sink.emit(
                    Diagnostic::warning(
                        codes::UNASSIGNED,
                        format!("unable to assign cell '{}' to any segment", self.node(node).name),
                    )
                    .with_subject(Subject::Cell(node.as_raw())),
                );
                continue;
            };
            if chain.len() != spanned {
                return Err(self.fatal(format!(
                    "cell {node} spans {spanned} rows but was matched to {} segments",
                    chain.len()
                )));
            }

            let mut span = self.segment(chain[0]).span();
            for &s in &chain[1..] {
                let iv = self.segment(s).span();
                span = Interval::new(span.lo.max(iv.lo), span.hi.min(iv.hi));
            }
            let nd = self.node(node);
            let xx = span.clamp_left(nd.left, nd.width);
            let yy = self.rows_bottom(chain[0]);
            movement_x += i64::from((nd.left - xx).abs());
            movement_y += i64::from((nd.bottom - yy).abs());

            let nd = self.network.node_mut(node);
            nd.left = xx;
            nd.bottom = yy;
            for &s in &chain {
                self.add_cell_to_segment(node, s)?;
            }
            assigned += 1;
        }

        self.sink.emit(Diagnostic::note(
            codes::ASSIGNED,
            format!(
                "assigned {assigned} cells into segments, movement in x is {movement_x}, movement in y is {movement_y}"
            ),
        ));
        Ok(assigned)
    }

    /// Assigns every classified movable cell.
    pub fn assign_all_cells(&mut self) -> LegalResult<usize> {
        let cells = self.movable_cells();
        self.assign_cells_to_segments(&cells)
    }
}
