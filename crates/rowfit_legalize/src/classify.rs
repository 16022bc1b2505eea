//! Cell classification, original-position snapshots and the wide-cell
//! workaround.

use crate::codes;
use crate::context::LegalizationContext;
use crate::ids::NodeId;
use rowfit_common::LegalResult;
use rowfit_diagnostics::Diagnostic;
use serde::{Deserialize, Serialize};

/// Displacement of the movable cells from their original positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplacementReport {
    /// Largest `|dx| + |dy|` over all movable cells.
    pub max_l1: i64,
    /// Largest `|dx|`.
    pub max_x: i32,
    /// Largest `|dy|`.
    pub max_y: i32,
    /// Cells whose `|dx|` exceeds the x limit.
    pub violated_x: usize,
    /// Cells whose `|dy|` exceeds the y limit.
    pub violated_y: usize,
}

impl LegalizationContext<'_> {
    /// Partitions the network into single-height movable cells, multi-height
    /// movable cells bucketed by row span, and fixed blockers.
    ///
    /// Terminals are never movable. Fixed cells that can be placed over, or
    /// whose outline is given by separate shapes, are not blockers.
    pub fn classify_cells(&mut self) {
        self.single_height.clear();
        self.multi_height = vec![Vec::new(); 2];
        self.fixed.clear();

        for id in self.network.node_ids() {
            let nd = self.network.node(id);
            let (blocker, movable) = (nd.fixed && !nd.terminal_ni && !nd.defined_by_shapes, nd.is_movable());
            if blocker {
                self.fixed.push(id);
            }
            if !movable {
                continue;
            }
            let span = self.arch.height_in_rows(self.geom(id));
            if span == 1 {
                self.single_height.push(id);
            } else {
                if span >= self.multi_height.len() {
                    self.multi_height.resize(span + 1, Vec::new());
                }
                self.multi_height[span].push(id);
            }
        }

        self.sink.emit(Diagnostic::note(
            codes::SINGLE_HEIGHT,
            format!("collected {} single height cells", self.single_height.len()),
        ));
        for (span, cells) in self.multi_height.iter().enumerate() {
            if !cells.is_empty() {
                self.sink.emit(Diagnostic::note(
                    codes::MULTI_HEIGHT,
                    format!("collected {} multi-height cells spanning {span} rows", cells.len()),
                ));
            }
        }
        self.sink.emit(Diagnostic::note(
            codes::FIXED,
            format!("collected {} fixed cells", self.fixed.len()),
        ));
    }

    /// Movable single-height cells from the last classification.
    pub fn single_height_cells(&self) -> &[NodeId] {
        &self.single_height
    }

    /// Movable cells spanning exactly `span` rows (`span >= 2`).
    pub fn multi_height_cells(&self, span: usize) -> &[NodeId] {
        if span < 2 {
            return &[];
        }
        self.multi_height.get(span).map_or(&[], Vec::as_slice)
    }

    /// Fixed blockers from the last classification.
    pub fn fixed_cells(&self) -> &[NodeId] {
        &self.fixed
    }

    /// Every classified movable cell, single-height cells first and then
    /// multi-height cells by increasing span.
    pub fn movable_cells(&self) -> Vec<NodeId> {
        let mut cells = self.single_height.clone();
        for bucket in &self.multi_height {
            cells.extend_from_slice(bucket);
        }
        cells
    }

    /// Snapshots every node's position as its original position.
    pub fn record_original_positions(&mut self) {
        self.original = self
            .network
            .nodes
            .iter()
            .map(|nd| (nd.left, nd.bottom))
            .collect();
    }

    /// Moves every node back to its snapshot position.
    ///
    /// Segment membership is not touched; callers normally follow this with
    /// [`remove_all_cells_from_segments`](Self::remove_all_cells_from_segments)
    /// or a fresh assignment.
    pub fn restore_original_positions(&mut self) {
        for (nd, &(left, bottom)) in self.network.nodes.iter_mut().zip(&self.original) {
            nd.left = left;
            nd.bottom = bottom;
        }
    }

    /// Snapshot position `(left, bottom)` of `node`.
    pub fn original_position(&self, node: NodeId) -> (i32, i32) {
        self.original.get(node.index()).copied().unwrap_or_else(|| {
            let nd = self.node(node);
            (nd.left, nd.bottom)
        })
    }

    /// Measures how far movable cells have drifted from their snapshot.
    pub fn measure_maximum_displacement(&self) -> DisplacementReport {
        let mut report = DisplacementReport::default();
        for nd in self.network.nodes.iter().filter(|nd| nd.is_movable()) {
            let (ox, oy) = self.original_position(nd.id);
            let dx = (nd.left - ox).abs();
            let dy = (nd.bottom - oy).abs();
            report.max_l1 = report.max_l1.max(dx as i64 + dy as i64);
            report.max_x = report.max_x.max(dx);
            report.max_y = report.max_y.max(dy);
            if dx > self.max_disp_x {
                report.violated_x += 1;
            }
            if dy > self.max_disp_y {
                report.violated_y += 1;
            }
        }
        report
    }

    /// Finds assigned cells wider than the segment holding them.
    pub fn collect_wide_cells(&mut self) -> &[NodeId] {
        let mut wide = Vec::new();
        for (seg, cells) in self.segments.iter().zip(&self.cells_in_seg) {
            for &id in cells {
                if self.network.node(id).width > seg.width() {
                    wide.push(id);
                }
            }
        }
        wide.sort();
        wide.dedup();
        self.sink.emit(Diagnostic::note(
            codes::WIDE,
            format!("collected {} wide cells", wide.len()),
        ));
        self.wide = wide;
        &self.wide
    }

    /// Fixes the collected wide cells so that the next build treats them as
    /// blockages.
    pub fn fix_wide_cells(&mut self) {
        for &id in &self.wide {
            self.network.node_mut(id).fixed = true;
        }
    }

    /// Releases the wide cells fixed by [`fix_wide_cells`](Self::fix_wide_cells).
    pub fn cleanup(&mut self) {
        for &id in &self.wide {
            self.network.node_mut(id).fixed = false;
        }
    }

    /// Runs the wide-cell workaround after an initial assignment.
    ///
    /// If any assigned cell is wider than its segment, those cells are fixed
    /// where they stand, and classification, segmentation and assignment are
    /// redone with them acting as blockages. Returns the number of wide cells.
    pub fn resolve_wide_cells(&mut self, include_route_blockages: bool) -> LegalResult<usize> {
        let count = self.collect_wide_cells().len();
        if count == 0 {
            return Ok(0);
        }
        self.fix_wide_cells();
        self.classify_cells();
        self.build_blockages_and_segments(include_route_blockages)?;
        self.assign_all_cells()?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Network, Node};
    use rowfit_arch::RowArchitecture;
    use rowfit_config::LegalizerConfig;
    use rowfit_diagnostics::DiagnosticSink;

    fn network() -> Network {
        let mut nw = Network::new();
        nw.add_node(Node::new("s0", 0, 0, 10, 10));
        nw.add_node(Node::new("m2", 20, 0, 10, 20));
        nw.add_node(Node::new("blk", 40, 0, 10, 10).fixed());
        nw.add_node(Node::new("s1", 60, 10, 10, 10));
        nw.add_node(Node::new("m3", 70, 0, 10, 30));
        let mut t = Node::new("term", 90, 0, 5, 10);
        t.terminal = true;
        nw.add_node(t);
        let mut ni = Node::new("ni", 90, 0, 5, 10).fixed();
        ni.terminal_ni = true;
        nw.add_node(ni);
        nw
    }

    #[test]
    fn classification_buckets() {
        let arch = RowArchitecture::uniform(4, 10, 0, 1, 100).unwrap();
        let mut nw = network();
        let sink = DiagnosticSink::new();
        let mut ctx = LegalizationContext::new(&arch, None, &mut nw, &sink, &LegalizerConfig::default());
        ctx.classify_cells();
        assert_eq!(ctx.single_height_cells(), &[NodeId::from_raw(0), NodeId::from_raw(3)]);
        assert_eq!(ctx.multi_height_cells(2), &[NodeId::from_raw(1)]);
        assert_eq!(ctx.multi_height_cells(3), &[NodeId::from_raw(4)]);
        assert!(ctx.multi_height_cells(1).is_empty());
        assert_eq!(ctx.fixed_cells(), &[NodeId::from_raw(2)]);
        assert_eq!(ctx.movable_cells().len(), 4);
        assert_eq!(sink.count_with_code(codes::SINGLE_HEIGHT), 1);
        assert_eq!(sink.count_with_code(codes::MULTI_HEIGHT), 2);
        assert_eq!(sink.count_with_code(codes::FIXED), 1);
    }

    #[test]
    fn restore_and_measure() {
        let arch = RowArchitecture::uniform(4, 10, 0, 1, 100).unwrap();
        let mut nw = network();
        let sink = DiagnosticSink::new();
        let mut ctx = LegalizationContext::new(&arch, None, &mut nw, &sink, &LegalizerConfig::default());
        ctx.set_max_displacement(1, 1);
        ctx.network.node_mut(NodeId::from_raw(0)).left = 15;
        ctx.network.node_mut(NodeId::from_raw(3)).bottom = 30;
        ctx.network.node_mut(NodeId::from_raw(3)).left = 57;
        // Fixed cells are not measured.
        ctx.network.node_mut(NodeId::from_raw(2)).left = 0;

        let report = ctx.measure_maximum_displacement();
        assert_eq!(report.max_l1, 23);
        assert_eq!(report.max_x, 15);
        assert_eq!(report.max_y, 20);
        assert_eq!(report.violated_x, 1);
        assert_eq!(report.violated_y, 1);

        ctx.restore_original_positions();
        assert_eq!(ctx.measure_maximum_displacement(), DisplacementReport::default());
        assert_eq!(ctx.node(NodeId::from_raw(2)).left, 40);
    }

    #[test]
    fn wide_cell_protocol() {
        let arch = RowArchitecture::uniform(1, 10, 0, 1, 100).unwrap();
        let mut nw = Network::new();
        nw.add_node(Node::new("blk", 30, 0, 10, 10).fixed());
        let wide = nw.add_node(Node::new("wide", 0, 0, 70, 10));
        nw.add_node(Node::new("small", 80, 0, 5, 10));
        let sink = DiagnosticSink::new();
        let mut ctx = LegalizationContext::new(&arch, None, &mut nw, &sink, &LegalizerConfig::default());
        ctx.classify_cells();
        ctx.build_blockages_and_segments(false).unwrap();
        ctx.assign_all_cells().unwrap();

        assert_eq!(ctx.collect_wide_cells(), &[wide]);
        assert_eq!(sink.count_with_code(codes::WIDE), 1);

        ctx.fix_wide_cells();
        assert!(ctx.node(wide).fixed);
        ctx.cleanup();
        assert!(!ctx.node(wide).fixed);
    }

    #[test]
    fn resolve_wide_cells_rebuilds_around_them() {
        let arch = RowArchitecture::uniform(1, 10, 0, 1, 100).unwrap();
        let mut nw = Network::new();
        nw.add_node(Node::new("blk", 30, 0, 10, 10).fixed());
        let wide = nw.add_node(Node::new("wide", 0, 0, 70, 10));
        let small = nw.add_node(Node::new("small", 5, 0, 5, 10));
        let sink = DiagnosticSink::new();
        let mut ctx = LegalizationContext::new(&arch, None, &mut nw, &sink, &LegalizerConfig::default());
        ctx.classify_cells();
        ctx.build_blockages_and_segments(false).unwrap();
        ctx.assign_all_cells().unwrap();

        assert_eq!(ctx.resolve_wide_cells(false).unwrap(), 1);
        assert!(ctx.node(wide).fixed);
        assert!(ctx.segments_of(wide).is_empty());
        // The wide cell now blocks the row up to x = 70.
        assert_eq!(ctx.segments_of(small).len(), 1);
        assert_eq!((ctx.node(small).left, ctx.node(small).bottom), (70, 0));
    }
}
