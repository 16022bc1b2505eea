//! Row segmentation: blockages, free segments and fence-region splits.

use crate::codes;
use crate::context::LegalizationContext;
use crate::ids::SegmentId;
use crate::segment::Segment;
use rowfit_arch::{Rect, RegionId, RowId};
use rowfit_common::{complement, merge_intervals, Interval, LegalResult};
use rowfit_diagnostics::Diagnostic;

/// Routing layers whose obstructions can block placement sites.
const BLOCKING_LAYERS: usize = 2;

impl LegalizationContext<'_> {
    /// Rebuilds the per-row blockages and the segment partition.
    ///
    /// Every previous segment is discarded along with all cell-to-segment
    /// bookkeeping, so cells must be assigned again afterwards. Running the
    /// build twice over unchanged inputs produces identical segments.
    pub fn build_blockages_and_segments(&mut self, include_route_blockages: bool) -> LegalResult<()> {
        self.find_blockages(include_route_blockages);
        self.find_segments()?;
        self.sink.emit(Diagnostic::note(
            codes::IMAGE,
            format!(
                "image ({}, {}) - ({}, {}), {} segments",
                self.arch.min_x(),
                self.arch.min_y(),
                self.arch.max_x(),
                self.arch.max_y(),
                self.segments.len()
            ),
        ));
        Ok(())
    }

    fn find_blockages(&mut self, include_route_blockages: bool) {
        let rows = self.arch.rows();
        let mut raw: Vec<Vec<Interval>> = vec![Vec::new(); rows.len()];

        for id in self.network.node_ids() {
            let nd = self.node(id);
            if !nd.fixed || nd.terminal_ni || nd.defined_by_shapes {
                continue;
            }
            let mut xmin = self.arch.min_x().max(nd.left);
            let mut xmax = self.arch.max_x().min(nd.right());
            let ymin = self.arch.min_y().max(nd.bottom);
            let ymax = self.arch.max_y().min(nd.top());
            // Widen by the spacing the cell needs against an empty neighbor.
            xmin -= self.cell_spacing(None, Some(id));
            xmax += self.cell_spacing(Some(id), None);
            for (r, row) in rows.iter().enumerate() {
                if !(ymin >= row.top() || ymax <= row.bottom) {
                    raw[r].push(Interval::new(xmin, xmax));
                }
            }
        }

        if include_route_blockages {
            if let Some(rt) = self.routing {
                for layer in 0..rt.num_layers().min(BLOCKING_LAYERS) {
                    for rect in rt.blockages(layer) {
                        for (r, row) in rows.iter().enumerate() {
                            if let Some(iv) = covered_sites(rect, row) {
                                raw[r].push(iv);
                            }
                        }
                    }
                }
            }
        }

        self.blockages = raw.into_iter().map(merge_intervals).collect();
    }

    fn find_segments(&mut self) -> LegalResult<()> {
        let rows = self.arch.rows();
        let image = Interval::new(self.arch.min_x(), self.arch.max_x());
        let mut segments: Vec<Segment> = Vec::new();
        let mut segs_in_row: Vec<Vec<SegmentId>> = vec![Vec::new(); rows.len()];

        for (r, row) in rows.iter().enumerate() {
            let bounds = Interval::new(image.lo.max(row.left()), image.hi.min(row.right()));
            for free in complement(&self.blockages[r], bounds) {
                let id = SegmentId::from_raw(segments.len() as u32);
                segments.push(Segment::new(id, RowId::from_raw(r as u32), free.lo, free.hi));
                segs_in_row[r].push(id);
            }
        }

        for reg in 1..self.arch.regions().len() {
            let intervals = self.region_intervals(reg)?;
            let region = RegionId::from_raw(reg as u32);
            for (r, row_intervals) in intervals.iter().enumerate() {
                for iv in row_intervals {
                    // Splits append to the row, and later intervals must see them.
                    let mut s = 0;
                    while s < segs_in_row[r].len() {
                        let seg_id = segs_in_row[r][s];
                        s += 1;
                        let (sl, sr) = {
                            let seg = &segments[seg_id.index()];
                            (seg.min_x, seg.max_x)
                        };
                        let (il, ir) = (iv.lo, iv.hi);
                        if ir <= sl || il >= sr {
                            continue;
                        }
                        let original = segments[seg_id.index()].region;
                        let mut spawn = |lo: i32, hi: i32, reg: RegionId| {
                            let id = SegmentId::from_raw(segments.len() as u32);
                            let mut seg = Segment::new(id, RowId::from_raw(r as u32), lo, hi);
                            seg.region = reg;
                            segments.push(seg);
                            segs_in_row[r].push(id);
                        };
                        if il <= sl && ir >= sr {
                            segments[seg_id.index()].region = region;
                        } else if il > sl && ir >= sr {
                            spawn(il, sr, region);
                            segments[seg_id.index()].max_x = il;
                        } else if il <= sl && ir < sr {
                            spawn(sl, ir, region);
                            segments[seg_id.index()].min_x = ir;
                        } else if il > sl && ir < sr {
                            spawn(il, ir, region);
                            spawn(ir, sr, original);
                            segments[seg_id.index()].max_x = il;
                        } else {
                            return Err(self.fatal("unexpected problem while constructing segments"));
                        }
                    }
                }
            }
        }

        for seg in &mut segments {
            let grid = rows[seg.row.index()].grid();
            let snapped = grid.snap_inward(seg.span());
            seg.min_x = snapped.lo;
            seg.max_x = snapped.hi;
            seg.utilization = 0;
        }
        for row in &mut segs_in_row {
            row.sort_by_key(|s| (segments[s.index()].min_x, s.index()));
        }

        self.cells_in_seg = vec![Vec::new(); segments.len()];
        self.reverse = vec![Vec::new(); self.network.node_count()];
        self.segments = segments;
        self.segs_in_row = segs_in_row;
        Ok(())
    }

    /// Merged per-row x intervals fully covered by region `reg`.
    ///
    /// Only rectangles spanning a row's whole height count, and they are
    /// grown outward to site boundaries. The default region is rejected.
    pub fn region_intervals(&self, reg: usize) -> LegalResult<Vec<Vec<Interval>>> {
        let region = match self.arch.regions().get(reg) {
            Some(region) if reg >= 1 && region.id.index() == reg => region,
            _ => return Err(self.fatal(format!("improper region id {reg}"))),
        };
        let rows = self.arch.rows();
        let mut intervals: Vec<Vec<Interval>> = vec![Vec::new(); rows.len()];
        for rect in &region.rects {
            for (r, row) in rows.iter().enumerate() {
                if let Some(iv) = covered_sites(rect, row) {
                    intervals[r].push(iv);
                }
            }
        }
        Ok(intervals.into_iter().map(merge_intervals).collect())
    }

    /// Collects, for every row and routing layer, the obstruction rectangles
    /// that intersect the row. Does nothing without routing parameters.
    pub fn setup_obstacles(&mut self) {
        let Some(rt) = self.routing else {
            self.obstacles.clear();
            return;
        };
        self.obstacles = self
            .arch
            .rows()
            .iter()
            .map(|row| {
                (0..rt.num_layers())
                    .map(|layer| {
                        rt.blockages(layer)
                            .iter()
                            .filter(|b| {
                                b.xmax > row.left()
                                    && b.xmin < row.right()
                                    && b.overlaps_y(row.bottom, row.top())
                            })
                            .copied()
                            .collect()
                    })
                    .collect()
            })
            .collect();
    }

    /// Obstructions on `layer` that intersect `row`, as collected by
    /// [`setup_obstacles`](Self::setup_obstacles).
    pub fn obstacles(&self, row: usize, layer: usize) -> &[Rect] {
        self.obstacles
            .get(row)
            .and_then(|layers| layers.get(layer))
            .map_or(&[], Vec::as_slice)
    }
}

/// The site-aligned x interval of `row` that `rect` blocks, if the rectangle
/// covers the row's full height and at least one site.
fn covered_sites(rect: &Rect, row: &rowfit_arch::Row) -> Option<Interval> {
    if !rect.spans_y(row.bottom, row.top()) {
        return None;
    }
    let iv = row.grid().snap_outward(rect.x_span());
    (iv.hi > iv.lo).then_some(iv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Network, Node};
    use rowfit_arch::{LayerRules, RoutingParams, RowArchitecture};
    use rowfit_config::LegalizerConfig;
    use rowfit_diagnostics::DiagnosticSink;

    fn spans(ctx: &LegalizationContext<'_>, row: usize) -> Vec<(i32, i32, u32)> {
        ctx.segments_in_row(row)
            .iter()
            .map(|&s| {
                let seg = ctx.segment(s);
                (seg.min_x, seg.max_x, seg.region.as_raw())
            })
            .collect()
    }

    #[test]
    fn empty_row_is_one_segment() {
        let arch = RowArchitecture::uniform(2, 10, 0, 1, 100).unwrap();
        let mut nw = Network::new();
        let sink = DiagnosticSink::new();
        let mut ctx = LegalizationContext::new(&arch, None, &mut nw, &sink, &LegalizerConfig::default());
        ctx.build_blockages_and_segments(true).unwrap();
        assert_eq!(spans(&ctx, 0), vec![(0, 100, 0)]);
        assert_eq!(spans(&ctx, 1), vec![(0, 100, 0)]);
        assert_eq!(sink.count_with_code(codes::IMAGE), 1);
    }

    #[test]
    fn fixed_cell_splits_row() {
        let arch = RowArchitecture::uniform(1, 10, 0, 1, 100).unwrap();
        let mut nw = Network::new();
        nw.add_node(Node::new("blk", 40, 0, 20, 10).fixed());
        let sink = DiagnosticSink::new();
        let mut ctx = LegalizationContext::new(&arch, None, &mut nw, &sink, &LegalizerConfig::default());
        ctx.build_blockages_and_segments(false).unwrap();
        assert_eq!(spans(&ctx, 0), vec![(0, 40, 0), (60, 100, 0)]);
        assert_eq!(ctx.blockages(0), &[Interval::new(40, 60)]);
    }

    #[test]
    fn fixed_cell_widened_by_padding() {
        let arch = RowArchitecture::uniform(1, 10, 0, 1, 100).unwrap();
        let mut nw = Network::new();
        nw.add_node(Node::new("blk", 40, 0, 20, 10).fixed().with_padding(2, 3));
        let sink = DiagnosticSink::new();
        let mut ctx = LegalizationContext::new(&arch, None, &mut nw, &sink, &LegalizerConfig::default());
        ctx.build_blockages_and_segments(false).unwrap();
        assert_eq!(spans(&ctx, 0), vec![(0, 38, 0), (63, 100, 0)]);
    }

    #[test]
    fn tall_fixed_cell_blocks_every_row_it_touches() {
        let arch = RowArchitecture::uniform(3, 10, 0, 1, 100).unwrap();
        let mut nw = Network::new();
        nw.add_node(Node::new("macro", 10, 5, 20, 10).fixed());
        nw.add_node(Node::new("pad", 60, 0, 10, 30).fixed());
        nw.nodes[1].terminal_ni = true;
        let sink = DiagnosticSink::new();
        let mut ctx = LegalizationContext::new(&arch, None, &mut nw, &sink, &LegalizerConfig::default());
        ctx.build_blockages_and_segments(false).unwrap();
        assert_eq!(spans(&ctx, 0), vec![(0, 10, 0), (30, 100, 0)]);
        assert_eq!(spans(&ctx, 1), vec![(0, 10, 0), (30, 100, 0)]);
        assert_eq!(spans(&ctx, 2), vec![(0, 100, 0)]);
    }

    #[test]
    fn route_blockages_snap_outward_and_need_full_height() {
        let arch = RowArchitecture::uniform(2, 10, 0, 4, 25).unwrap();
        let mut rt = RoutingParams::with_layers(3);
        rt.layers[0] = LayerRules {
            blockages: vec![Rect::new(10, 0, 13, 10)],
            ..LayerRules::default()
        };
        // Only half of row 1's height: ignored.
        rt.layers[1].blockages = vec![Rect::new(50, 10, 70, 15)];
        // Layer 2 never blocks placement.
        rt.layers[2].blockages = vec![Rect::new(80, 0, 90, 20)];
        let mut nw = Network::new();
        let sink = DiagnosticSink::new();
        let mut ctx = LegalizationContext::new(&arch, Some(&rt), &mut nw, &sink, &LegalizerConfig::default());
        ctx.build_blockages_and_segments(true).unwrap();
        assert_eq!(spans(&ctx, 0), vec![(0, 8, 0), (16, 100, 0)]);
        assert_eq!(spans(&ctx, 1), vec![(0, 100, 0)]);

        ctx.build_blockages_and_segments(false).unwrap();
        assert_eq!(spans(&ctx, 0), vec![(0, 100, 0)]);
    }

    #[test]
    fn segments_snap_inward_to_sites() {
        let arch = RowArchitecture::uniform(1, 10, 0, 4, 25).unwrap();
        let mut nw = Network::new();
        nw.add_node(Node::new("blk", 41, 0, 10, 10).fixed());
        let sink = DiagnosticSink::new();
        let mut ctx = LegalizationContext::new(&arch, None, &mut nw, &sink, &LegalizerConfig::default());
        ctx.build_blockages_and_segments(false).unwrap();
        assert_eq!(spans(&ctx, 0), vec![(0, 40, 0), (52, 100, 0)]);
    }

    #[test]
    fn region_split_cases() {
        let mut arch = RowArchitecture::uniform(4, 10, 0, 1, 100).unwrap();
        // Row 0: whole row. Row 1: right part. Row 2: left part. Row 3: interior.
        let reg = arch.add_region(vec![
            Rect::new(0, 0, 100, 10),
            Rect::new(60, 10, 120, 20),
            Rect::new(-5, 20, 30, 30),
            Rect::new(20, 30, 50, 40),
        ]);
        assert_eq!(reg.as_raw(), 1);
        let mut nw = Network::new();
        let sink = DiagnosticSink::new();
        let mut ctx = LegalizationContext::new(&arch, None, &mut nw, &sink, &LegalizerConfig::default());
        ctx.build_blockages_and_segments(false).unwrap();
        assert_eq!(spans(&ctx, 0), vec![(0, 100, 1)]);
        assert_eq!(spans(&ctx, 1), vec![(0, 60, 0), (60, 100, 1)]);
        assert_eq!(spans(&ctx, 2), vec![(0, 30, 1), (30, 100, 0)]);
        assert_eq!(spans(&ctx, 3), vec![(0, 20, 0), (20, 50, 1), (50, 100, 0)]);
    }

    #[test]
    fn rebuild_is_idempotent() {
        let mut arch = RowArchitecture::uniform(3, 10, 0, 2, 50).unwrap();
        arch.add_region(vec![Rect::new(10, 0, 40, 20)]);
        let mut nw = Network::new();
        nw.add_node(Node::new("blk", 60, 0, 10, 30).fixed());
        let sink = DiagnosticSink::new();
        let mut ctx = LegalizationContext::new(&arch, None, &mut nw, &sink, &LegalizerConfig::default());
        ctx.build_blockages_and_segments(true).unwrap();
        let first = ctx.segments().to_vec();
        let rows: Vec<_> = (0..3).map(|r| ctx.segments_in_row(r).to_vec()).collect();
        ctx.build_blockages_and_segments(true).unwrap();
        assert_eq!(ctx.segments(), first.as_slice());
        for (r, ids) in rows.iter().enumerate() {
            assert_eq!(ctx.segments_in_row(r), ids.as_slice());
        }
    }

    #[test]
    fn obstacles_per_row_and_layer() {
        let arch = RowArchitecture::uniform(2, 10, 0, 1, 100).unwrap();
        let mut rt = RoutingParams::with_layers(2);
        rt.layers[1].blockages = vec![Rect::new(0, 5, 10, 8), Rect::new(0, 12, 10, 14)];
        let mut nw = Network::new();
        let sink = DiagnosticSink::new();
        let mut ctx = LegalizationContext::new(&arch, Some(&rt), &mut nw, &sink, &LegalizerConfig::default());
        ctx.setup_obstacles();
        assert!(ctx.obstacles(0, 0).is_empty());
        assert_eq!(ctx.obstacles(0, 1), &[Rect::new(0, 5, 10, 8)]);
        assert_eq!(ctx.obstacles(1, 1), &[Rect::new(0, 12, 10, 14)]);
        assert!(ctx.obstacles(7, 0).is_empty());
    }
}
