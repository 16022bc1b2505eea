//! The legalization context: per-run state shared by every engine.
//!
//! A [`LegalizationContext`] borrows the floorplan, the routing rules, the
//! network and a diagnostic sink for the duration of one legalization run. It
//! owns the segment table, the per-segment cell lists, the reverse
//! cell-to-segment map, the original-position snapshot, the pending move list
//! and the random generator. All cross references are indices.

use crate::codes;
use crate::data::{Network, Node, Pin};
use crate::ids::{NodeId, SegmentId};
use crate::moves::MoveList;
use crate::segment::Segment;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rowfit_arch::{Architecture, CellGeometry, Rect, RegionId, RoutingParams};
use rowfit_common::{InternalError, Interval};
use rowfit_config::LegalizerConfig;
use rowfit_diagnostics::{Diagnostic, DiagnosticSink};

/// State of one legalization run.
///
/// Construction snapshots every node's position as its original position
/// and sets the displacement limit to twice the larger image dimension.
/// [`build_blockages_and_segments`](Self::build_blockages_and_segments) must
/// run before any assignment or move.
pub struct LegalizationContext<'a> {
    pub(crate) arch: &'a dyn Architecture,
    pub(crate) routing: Option<&'a RoutingParams>,
    pub(crate) network: &'a mut Network,
    pub(crate) sink: &'a DiagnosticSink,
    pub(crate) config: LegalizerConfig,

    pub(crate) blockages: Vec<Vec<Interval>>,
    pub(crate) segments: Vec<Segment>,
    pub(crate) segs_in_row: Vec<Vec<SegmentId>>,
    pub(crate) cells_in_seg: Vec<Vec<NodeId>>,
    pub(crate) reverse: Vec<Vec<SegmentId>>,
    pub(crate) obstacles: Vec<Vec<Vec<Rect>>>,

    pub(crate) original: Vec<(i32, i32)>,
    pub(crate) single_height: Vec<NodeId>,
    pub(crate) multi_height: Vec<Vec<NodeId>>,
    pub(crate) fixed: Vec<NodeId>,
    pub(crate) wide: Vec<NodeId>,

    pub(crate) moves: MoveList,
    pub(crate) max_disp_x: i32,
    pub(crate) max_disp_y: i32,
    rng: StdRng,
}

impl<'a> LegalizationContext<'a> {
    /// Creates a context for one run over `network`.
    ///
    /// `routing` supplies layer obstructions and spacing tables; without it
    /// no routing blockages are built and pin spacing is zero.
    pub fn new(
        arch: &'a dyn Architecture,
        routing: Option<&'a RoutingParams>,
        network: &'a mut Network,
        sink: &'a DiagnosticSink,
        config: &LegalizerConfig,
    ) -> Self {
        let limit = displacement_limit(arch);
        let num_nodes = network.node_count();
        let mut ctx = Self {
            arch,
            routing,
            network,
            sink,
            config: config.clone(),
            blockages: Vec::new(),
            segments: Vec::new(),
            segs_in_row: Vec::new(),
            cells_in_seg: Vec::new(),
            reverse: vec![Vec::new(); num_nodes],
            obstacles: Vec::new(),
            original: Vec::new(),
            single_height: Vec::new(),
            multi_height: Vec::new(),
            fixed: Vec::new(),
            wide: Vec::new(),
            moves: MoveList::new(config.move_limit),
            max_disp_x: limit,
            max_disp_y: limit,
            rng: StdRng::seed_from_u64(config.seed),
        };
        ctx.record_original_positions();
        let [dx, dy] = config.max_displacement;
        if dx != 0 || dy != 0 {
            ctx.set_max_displacement(dx, dy);
        }
        ctx
    }

    /// The floorplan being legalized against.
    pub fn arch(&self) -> &dyn Architecture {
        self.arch
    }

    /// The network being legalized.
    pub fn network(&self) -> &Network {
        self.network
    }

    /// The settings this run was created with.
    pub fn config(&self) -> &LegalizerConfig {
        &self.config
    }

    /// Shorthand for a node lookup.
    pub fn node(&self, id: NodeId) -> &Node {
        self.network.node(id)
    }

    pub(crate) fn geom(&self, id: NodeId) -> &dyn CellGeometry {
        self.network.node(id)
    }

    /// All segments, indexed by [`SegmentId`].
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Looks up a segment.
    pub fn segment(&self, id: SegmentId) -> &Segment {
        &self.segments[id.index()]
    }

    /// Segments of `row` ordered by left end. Empty for an unknown row.
    pub fn segments_in_row(&self, row: usize) -> &[SegmentId] {
        self.segs_in_row.get(row).map_or(&[], Vec::as_slice)
    }

    /// Cells in `seg` in left-to-right order.
    pub fn cells_in_segment(&self, seg: SegmentId) -> &[NodeId] {
        &self.cells_in_seg[seg.index()]
    }

    /// Segments `node` currently occupies, bottom row first.
    pub fn segments_of(&self, node: NodeId) -> &[SegmentId] {
        self.reverse.get(node.index()).map_or(&[], Vec::as_slice)
    }

    /// Merged blockage intervals of `row`.
    pub fn blockages(&self, row: usize) -> &[Interval] {
        self.blockages.get(row).map_or(&[], Vec::as_slice)
    }

    /// First segment of `row` in `region` whose span contains `x`.
    pub fn segment_at(&self, row: usize, x: i32, region: RegionId) -> Option<SegmentId> {
        self.segments_in_row(row).iter().copied().find(|&s| {
            let seg = self.segment(s);
            seg.region == region && seg.contains_x(x)
        })
    }

    /// Current displacement limits `(x, y)` in database units.
    pub fn max_displacement(&self) -> (i32, i32) {
        (self.max_disp_x, self.max_disp_y)
    }

    /// Sets the displacement limits in rows.
    ///
    /// A zero keeps the current limit for that axis. Both limits are capped
    /// at twice the larger image dimension.
    pub fn set_max_displacement(&mut self, dx_rows: i32, dy_rows: i32) {
        let limit = displacement_limit(self.arch);
        let row_height = self.arch.row_height();
        if dx_rows != 0 {
            self.max_disp_x = dx_rows.saturating_mul(row_height);
        }
        self.max_disp_x = self.max_disp_x.min(limit);
        if dy_rows != 0 {
            self.max_disp_y = dy_rows.saturating_mul(row_height);
        }
        self.max_disp_y = self.max_disp_y.min(limit);
        self.sink.emit(Diagnostic::note(
            codes::MAX_DISPLACEMENT,
            format!(
                "maximum displacement {dx_rows} {dy_rows} rows set to {} {} units",
                self.max_disp_x, self.max_disp_y
            ),
        ));
    }

    /// Reseeds the random generator.
    pub fn set_random_seed(&mut self, seed: u64) {
        self.sink.emit(Diagnostic::note(
            codes::SEED,
            format!("random seed set to {seed}"),
        ));
        self.config.seed = seed;
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// The run's random generator, for an outer optimizer.
    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Draws a classified movable cell uniformly at random.
    pub fn random_movable_cell(&mut self) -> Option<NodeId> {
        let multi: usize = self.multi_height.iter().map(Vec::len).sum();
        let total = self.single_height.len() + multi;
        if total == 0 {
            return None;
        }
        let mut pick = self.rng.gen_range(0..total);
        if pick < self.single_height.len() {
            return Some(self.single_height[pick]);
        }
        pick -= self.single_height.len();
        for bucket in &self.multi_height {
            if pick < bucket.len() {
                return Some(bucket[pick]);
            }
            pick -= bucket.len();
        }
        None
    }

    /// Draws a segment of `row` uniformly at random.
    pub fn random_segment_in_row(&mut self, row: usize) -> Option<SegmentId> {
        let n = self.segments_in_row(row).len();
        if n == 0 {
            return None;
        }
        let pick = self.rng.gen_range(0..n);
        Some(self.segs_in_row[row][pick])
    }

    /// Minimum gap between two cells abutting in a row.
    ///
    /// `None` stands for a segment boundary. When pin spacing is enabled the
    /// pin-proximity term between two real cells is folded in.
    pub fn cell_spacing(&self, left: Option<NodeId>, right: Option<NodeId>) -> i32 {
        let by_rule = self
            .arch
            .cell_spacing(left.map(|id| self.geom(id)), right.map(|id| self.geom(id)));
        match (left, right) {
            (Some(l), Some(r)) if self.config.check_pin_spacing => by_rule.max(self.pin_spacing(l, r)),
            _ => by_rule,
        }
    }

    /// Gap required between `left` and `right` so that the left cell's
    /// right-most pin and the right cell's left-most pin respect the routing
    /// spacing of their shared layer. Zero when the pins are on different
    /// layers, a cell has no pins, or no routing rules are present.
    pub fn pin_spacing(&self, left: NodeId, right: NodeId) -> i32 {
        let Some(rt) = self.routing else {
            return 0;
        };
        let pinl = self
            .network
            .pins_of(left)
            .fold(None, |best: Option<&Pin>, p| match best {
                Some(b) if p.offset_x <= b.offset_x => Some(b),
                _ => Some(p),
            });
        let pinr = self
            .network
            .pins_of(right)
            .fold(None, |best: Option<&Pin>, p| match best {
                Some(b) if p.offset_x >= b.offset_x => Some(b),
                _ => Some(p),
            });
        let (Some(pl), Some(pr)) = (pinl, pinr) else {
            return 0;
        };
        if pl.layer != pr.layer {
            return 0;
        }
        let [xmin1, ymin1, xmax1, ymax1] = pl.bounds();
        let [xmin2, ymin2, xmax2, ymax2] = pr.bounds();
        let ww = (ymax1 - ymin1)
            .min(xmax1 - xmin1)
            .max((ymax2 - ymin2).min(xmax2 - xmin2));
        let py = (ymax1.min(ymax2) - ymin1.max(ymin2)).max(0.0);
        let required = rt.spacing(pl.layer, ww, py);
        let gapl = 0.5 * self.node(left).width as f64 - xmax1;
        let gapr = xmin2 + 0.5 * self.node(right).width as f64;
        (required - gapl - gapr).max(0.0).ceil() as i32
    }

    /// Reports a fatal invariant violation and returns the error to propagate.
    pub(crate) fn fatal(&self, message: impl Into<String>) -> InternalError {
        let err = InternalError::new(message);
        self.sink
            .emit(Diagnostic::error(codes::INTERNAL, err.to_string()));
        err
    }
}

fn displacement_limit(arch: &dyn Architecture) -> i32 {
    let width = arch.max_x() - arch.min_x();
    let height = arch.max_y() - arch.min_y();
    width.max(height).saturating_mul(2)
}
