//! Routing-layer rules consumed by the legalizer.
//!
//! Only the first two layers contribute blockages; the spacing tables feed the
//! optional pin-proximity spacing between abutting cells.

use crate::types::Rect;
use serde::{Deserialize, Serialize};

/// Obstructions and spacing rules of one routing layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerRules {
    /// Obstruction rectangles on this layer.
    pub blockages: Vec<Rect>,
    /// Width thresholds of the spacing table, ascending.
    pub widths: Vec<f64>,
    /// Parallel run-length thresholds of the spacing table, ascending.
    pub lengths: Vec<f64>,
    /// Spacing table indexed `[width][length]`.
    pub table: Vec<Vec<f64>>,
    /// Minimum wire spacing, used when no table is present.
    pub wire_spacing: f64,
}

/// Per-layer routing parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutingParams {
    /// Rules for each layer, bottom layer first.
    pub layers: Vec<LayerRules>,
}

impl RoutingParams {
    /// Creates parameters for `num_layers` empty layers.
    pub fn with_layers(num_layers: usize) -> Self {
        Self {
            layers: vec![LayerRules::default(); num_layers],
        }
    }

    /// Number of routing layers.
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    /// Obstructions on `layer`, empty for an unknown layer.
    pub fn blockages(&self, layer: usize) -> &[Rect] {
        self.layers.get(layer).map_or(&[], |l| l.blockages.as_slice())
    }

    /// Required spacing on `layer` between shapes of the given width and
    /// parallel run length.
    ///
    /// The table lookup picks the largest width row whose threshold is below
    /// `width` (and likewise for length), falling back to the first entry.
    pub fn spacing(&self, layer: usize, width: f64, parallel: f64) -> f64 {
        let Some(rules) = self.layers.get(layer) else {
            return 0.0;
        };
        if rules.widths.is_empty() || rules.lengths.is_empty() {
            return rules.wire_spacing;
        }
        let mut i = rules.widths.len() - 1;
        while i > 0 && width <= rules.widths[i] {
            i -= 1;
        }
        let mut j = rules.lengths.len() - 1;
        while j > 0 && parallel <= rules.lengths[j] {
            j -= 1;
        }
        table_entry(rules, i, j)
    }

    /// Required spacing on `layer` between two rectangles, using the wider
    /// shape's narrow dimension and the larger parallel run length.
    pub fn spacing_between(&self, layer: usize, a: [f64; 4], b: [f64; 4]) -> f64 {
        let [xmin1, ymin1, xmax1, ymax1] = a;
        let [xmin2, ymin2, xmax2, ymax2] = b;
        let ww = (ymax1 - ymin1)
            .min(xmax1 - xmin1)
            .max((ymax2 - ymin2).min(xmax2 - xmin2));
        let py = (ymax1.min(ymax2) - ymin1.max(ymin2)).max(0.0);
        let px = (xmax1.min(xmax2) - xmin1.max(xmin2)).max(0.0);
        self.spacing(layer, ww, px.max(py))
    }

    /// Largest spacing that `layer` can require.
    pub fn maximum_spacing(&self, layer: usize) -> f64 {
        let Some(rules) = self.layers.get(layer) else {
            return 0.0;
        };
        if rules.widths.is_empty() || rules.lengths.is_empty() {
            return rules.wire_spacing;
        }
        table_entry(rules, rules.widths.len() - 1, rules.lengths.len() - 1)
    }
}

fn table_entry(rules: &LayerRules, i: usize, j: usize) -> f64 {
    rules
        .table
        .get(i)
        .and_then(|row| row.get(j))
        .copied()
        .unwrap_or(rules.wire_spacing)
}
