//! Diagnostic codes emitted by the legalizer.

use rowfit_diagnostics::{Category, DiagnosticCode};

/// Assignment summary.
pub const ASSIGNED: DiagnosticCode = DiagnosticCode::new(Category::Placement, 310);
/// Single-height cell count.
pub const SINGLE_HEIGHT: DiagnosticCode = DiagnosticCode::new(Category::Placement, 318);
/// Multi-height cell count for one span.
pub const MULTI_HEIGHT: DiagnosticCode = DiagnosticCode::new(Category::Placement, 319);
/// Fixed cell count.
pub const FIXED: DiagnosticCode = DiagnosticCode::new(Category::Placement, 320);
/// Wide cell count.
pub const WIDE: DiagnosticCode = DiagnosticCode::new(Category::Placement, 321);
/// Placement image and segment count.
pub const IMAGE: DiagnosticCode = DiagnosticCode::new(Category::Placement, 322);
/// Random seed change.
pub const SEED: DiagnosticCode = DiagnosticCode::new(Category::Placement, 401);
/// Maximum displacement change.
pub const MAX_DISPLACEMENT: DiagnosticCode = DiagnosticCode::new(Category::Placement, 402);
/// A movable cell could not be assigned to any segment.
pub const UNASSIGNED: DiagnosticCode = DiagnosticCode::new(Category::Warning, 330);
/// Overlap audit.
pub const CHECK_OVERLAP: DiagnosticCode = DiagnosticCode::new(Category::Check, 311);
/// Edge spacing and padding audit.
pub const CHECK_SPACING: DiagnosticCode = DiagnosticCode::new(Category::Check, 312);
/// Region audit.
pub const CHECK_REGION: DiagnosticCode = DiagnosticCode::new(Category::Check, 313);
/// Site alignment audit.
pub const CHECK_SITE: DiagnosticCode = DiagnosticCode::new(Category::Check, 314);
/// Row alignment audit.
pub const CHECK_ROW: DiagnosticCode = DiagnosticCode::new(Category::Check, 315);
/// Fatal invariant violation.
pub const INTERNAL: DiagnosticCode = DiagnosticCode::new(Category::Error, 400);
