//! Detailed-placement legalization over row-based floorplans.
//!
//! A [`LegalizationContext`] partitions every row into free segments around
//! fixed blockers, region fences and routing obstructions, assigns movable
//! cells to their closest segments, and then offers an incremental
//! move/swap engine to an outer optimizer. Every proposal is validated and
//! staged without touching shared state; only
//! [`accept_move`](LegalizationContext::accept_move) commits it.
//!
//! # Usage
//!
//! ```
//! use rowfit_arch::RowArchitecture;
//! use rowfit_config::LegalizerConfig;
//! use rowfit_diagnostics::DiagnosticSink;
//! use rowfit_legalize::{legalize, Network, Node};
//!
//! let arch = RowArchitecture::uniform(2, 10, 0, 1, 100).unwrap();
//! let mut network = Network::new();
//! network.add_node(Node::new("u1", 3, 4, 10, 10));
//! let sink = DiagnosticSink::new();
//! let summary = legalize(&arch, None, &mut network, &LegalizerConfig::default(), &sink).unwrap();
//! assert_eq!(summary.assigned, 1);
//! assert!(summary.consistency.is_clean());
//! ```

#![warn(missing_docs)]

pub mod assign;
pub mod builder;
pub mod check;
pub mod classify;
pub mod codes;
pub mod context;
pub mod data;
pub mod ids;
pub mod moves;
pub mod occupancy;
pub mod segment;

pub use check::ConsistencyReport;
pub use classify::DisplacementReport;
pub use context::LegalizationContext;
pub use data::{Network, Node, Pin};
pub use ids::{NodeId, PinId, SegmentId};
pub use moves::{solve_shift, MoveEntry, MoveList, SegmentRef};
pub use occupancy::SpaceAround;
pub use segment::Segment;

use rowfit_arch::{Architecture, RoutingParams};
use rowfit_common::LegalResult;
use rowfit_config::LegalizerConfig;
use rowfit_diagnostics::DiagnosticSink;
use serde::Serialize;

/// Outcome of a [`legalize`] run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Cells placed into segments by the final assignment.
    pub assigned: usize,
    /// Cells fixed in place by the wide-cell workaround.
    pub wide: usize,
    /// Segments filled beyond the configured utilization target.
    pub over_target: usize,
    /// Drift of the movable cells from their input positions.
    pub displacement: DisplacementReport,
    /// Audit results on the final placement.
    pub consistency: ConsistencyReport,
}

/// Legalizes the initial placement of `network` in one pass.
///
/// Classifies the cells, builds the segmentation, assigns every movable
/// cell, works around cells wider than their segment, and audits the
/// result. Infeasible cells are reported to `sink` and left in place; only
/// internal invariant violations return `Err`.
pub fn legalize(
    arch: &dyn Architecture,
    routing: Option<&RoutingParams>,
    network: &mut Network,
    config: &LegalizerConfig,
    sink: &DiagnosticSink,
) -> LegalResult<RunSummary> {
    let mut ctx = LegalizationContext::new(arch, routing, network, sink, config);
    ctx.classify_cells();
    ctx.build_blockages_and_segments(config.route_blockages)?;
    ctx.assign_all_cells()?;
    let wide = ctx.resolve_wide_cells(config.route_blockages)?;
    let assigned = ctx.reverse.iter().filter(|segs| !segs.is_empty()).count();
    let summary = RunSummary {
        assigned,
        wide,
        over_target: ctx.segments_over_target(),
        displacement: ctx.measure_maximum_displacement(),
        consistency: ctx.run_consistency_checks()?,
    };
    ctx.cleanup();
    Ok(summary)
}
