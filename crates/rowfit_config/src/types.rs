//! Configuration types deserialized from `rowfit.toml`.

use serde::Deserialize;

/// Default seed for the legalizer's random generator.
pub const DEFAULT_SEED: u64 = 1;

/// Default cap on the number of cells a single proposal may stage.
pub const DEFAULT_MOVE_LIMIT: usize = 10;

/// The top-level configuration parsed from `rowfit.toml`.
///
/// Every section is optional; a missing file section falls back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RowfitConfig {
    /// Settings for the legalization engine.
    pub legalizer: LegalizerConfig,
}

/// Knobs consumed by the legalization engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LegalizerConfig {
    /// Seed for the context-owned random generator.
    pub seed: u64,
    /// Maximum displacement `[x, y]` in rows. Zero leaves the default
    /// (twice the die extent) in place.
    pub max_displacement: [i32; 2],
    /// Cap on the number of cells a single proposal may stage.
    pub move_limit: usize,
    /// Whether obstructions on the first two routing layers become blockages.
    pub route_blockages: bool,
    /// Whether pin-to-pin proximity is folded into cell spacing.
    pub check_pin_spacing: bool,
    /// Fill fraction above which a segment counts as over target, in `(0, 1]`.
    pub target_utilization: f64,
}

impl Default for LegalizerConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            max_displacement: [0, 0],
            move_limit: DEFAULT_MOVE_LIMIT,
            route_blockages: true,
            check_pin_spacing: false,
            target_utilization: 1.0,
        }
    }
}
