//! A concrete, table-driven row architecture.

use crate::ids::{RegionId, RowId};
use crate::types::{Rect, Region, Row};
use crate::Architecture;
use rowfit_common::{InternalError, LegalResult};

/// A floorplan described directly by its row table, regions and edge-type
/// spacing table.
#[derive(Debug, Clone)]
pub struct RowArchitecture {
    rows: Vec<Row>,
    regions: Vec<Region>,
    spacing_table: Vec<Vec<i32>>,
    use_padding: bool,
}

impl RowArchitecture {
    /// Creates an architecture from its rows.
    ///
    /// Rows must be non-empty, indexed by position, share one height and be
    /// stacked bottom to top without gaps. The default region (id zero)
    /// covering the whole image is created automatically.
    pub fn new(rows: Vec<Row>) -> LegalResult<Self> {
        let first = rows
            .first()
            .ok_or_else(|| InternalError::new("architecture has no rows"))?;
        let height = first.height;
        if height <= 0 {
            return Err(InternalError::new("row height must be positive"));
        }
        for (i, row) in rows.iter().enumerate() {
            if row.id.index() != i {
                return Err(format!("row at position {i} has id {}", row.id.as_raw()).into());
            }
            if row.height != height {
                return Err(format!("row {i} height {} differs from {height}", row.height).into());
            }
            if row.site_spacing <= 0 || row.num_sites < 0 {
                return Err(format!("row {i} has an invalid site grid").into());
            }
            if i > 0 && row.bottom != rows[i - 1].top() {
                return Err(format!("row {i} is not stacked on row {}", i - 1).into());
            }
        }
        let mut arch = Self {
            rows,
            regions: Vec::new(),
            spacing_table: Vec::new(),
            use_padding: true,
        };
        let image = Rect::new(arch.min_x(), arch.min_y(), arch.max_x(), arch.max_y());
        arch.regions.push(Region::new(RegionId::DEFAULT, vec![image]));
        Ok(arch)
    }

    /// Creates `num_rows` identical rows of `num_sites` sites starting at `y = 0`.
    pub fn uniform(num_rows: usize, row_height: i32, origin: i32, site_spacing: i32, num_sites: i32) -> LegalResult<Self> {
        let rows = (0..num_rows)
            .map(|i| {
                Row::new(
                    RowId::from(i),
                    i as i32 * row_height,
                    row_height,
                    origin,
                    site_spacing,
                    num_sites,
                )
            })
            .collect();
        Self::new(rows)
    }

    /// Adds a fence region made of `rects` and returns its id.
    pub fn add_region(&mut self, rects: Vec<Rect>) -> RegionId {
        let id = RegionId::from(self.regions.len());
        self.regions.push(Region::new(id, rects));
        id
    }

    /// Sets the edge-type spacing table, indexed `[left cell's right edge][right cell's left edge]`.
    pub fn with_spacing_table(mut self, table: Vec<Vec<i32>>) -> Self {
        self.spacing_table = table;
        self
    }

    /// Enables or disables padding in cell spacing.
    pub fn with_padding(mut self, enabled: bool) -> Self {
        self.use_padding = enabled;
        self
    }
}

impl Architecture for RowArchitecture {
    fn rows(&self) -> &[Row] {
        &self.rows
    }

    fn regions(&self) -> &[Region] {
        &self.regions
    }

    fn edge_spacing(&self, left_type: usize, right_type: usize) -> i32 {
        self.spacing_table
            .get(left_type)
            .and_then(|row| row.get(right_type))
            .copied()
            .unwrap_or(0)
    }

    fn uses_padding(&self) -> bool {
        self.use_padding
    }
}
