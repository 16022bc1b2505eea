//! Row-based floorplan model for the rowfit legalizer.
//!
//! This crate provides the [`Architecture`] trait that the legalizer queries
//! for rows, fence regions, cell-to-cell spacing and power compatibility, a
//! concrete [`RowArchitecture`], and the [`RoutingParams`] that describe
//! per-layer obstructions and spacing tables.
//!
//! Cells are seen through the [`CellGeometry`] trait so that this crate does
//! not depend on any particular netlist model.
//!
//! ```
//! use rowfit_arch::{Architecture, RowArchitecture};
//!
//! let arch = RowArchitecture::uniform(4, 10, 0, 1, 100).unwrap();
//! assert_eq!(arch.num_rows(), 4);
//! assert_eq!(arch.find_closest_row(14), 1);
//! ```

#![warn(missing_docs)]

pub mod ids;
pub mod routing;
pub mod row_arch;
pub mod types;

pub use ids::{PowerRail, RegionId, RowId};
pub use routing::{LayerRules, RoutingParams};
pub use row_arch::RowArchitecture;
pub use types::{Rect, Region, Row};

/// The per-cell attributes the floorplan rules depend on.
pub trait CellGeometry {
    /// Cell height in database units.
    fn height(&self) -> i32;

    /// Edge type on the left side, zero for the default type.
    fn left_edge_type(&self) -> usize {
        0
    }

    /// Edge type on the right side, zero for the default type.
    fn right_edge_type(&self) -> usize {
        0
    }

    /// Keep-out padding required on the left side.
    fn left_padding(&self) -> i32 {
        0
    }

    /// Keep-out padding required on the right side.
    fn right_padding(&self) -> i32 {
        0
    }

    /// Rail along the cell's bottom edge in its unflipped orientation.
    fn bottom_power(&self) -> PowerRail {
        PowerRail::Unknown
    }

    /// Rail along the cell's top edge in its unflipped orientation.
    fn top_power(&self) -> PowerRail {
        PowerRail::Unknown
    }
}

/// Read-only geometry and rule queries over a row-based floorplan.
///
/// Implementors supply the row table, the region table and the edge-type
/// spacing rule; everything else has a default implementation in terms of
/// those. Rows are ordered bottom to top and stacked without gaps.
pub trait Architecture: std::fmt::Debug {
    /// The placement rows, bottom to top.
    fn rows(&self) -> &[Row];

    /// The fence regions. Index zero is the default region.
    fn regions(&self) -> &[Region];

    /// Spacing required between a right edge of type `left_type` and a left
    /// edge of type `right_type`. Zero when no rule applies.
    fn edge_spacing(&self, _left_type: usize, _right_type: usize) -> i32 {
        0
    }

    /// Whether per-cell padding participates in spacing.
    fn uses_padding(&self) -> bool {
        true
    }

    /// Number of rows.
    fn num_rows(&self) -> usize {
        self.rows().len()
    }

    /// Looks up a row by id.
    fn row(&self, id: RowId) -> Option<&Row> {
        self.rows().get(id.index())
    }

    /// Looks up a region by id.
    fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions().iter().find(|r| r.id == id)
    }

    /// Height shared by every row, zero for an empty floorplan.
    fn row_height(&self) -> i32 {
        self.rows().first().map_or(0, |r| r.height)
    }

    /// Left edge of the placement image.
    fn min_x(&self) -> i32 {
        self.rows().iter().map(Row::left).min().unwrap_or(0)
    }

    /// Right edge of the placement image.
    fn max_x(&self) -> i32 {
        self.rows().iter().map(Row::right).max().unwrap_or(0)
    }

    /// Bottom edge of the placement image.
    fn min_y(&self) -> i32 {
        self.rows().first().map_or(0, |r| r.bottom)
    }

    /// Top edge of the placement image.
    fn max_y(&self) -> i32 {
        self.rows().last().map_or(0, Row::top)
    }

    /// Number of rows `cell` spans, rounded to the nearest row and at least one.
    fn height_in_rows(&self, cell: &dyn CellGeometry) -> usize {
        let rh = self.row_height();
        if rh <= 0 {
            return 1;
        }
        let h = cell.height().max(0);
        (((h + rh / 2) / rh).max(1)) as usize
    }

    /// Index of the row whose bottom is nearest to `y`; ties go to the lower row.
    fn find_closest_row(&self, y: i32) -> usize {
        let rows = self.rows();
        if rows.is_empty() {
            return 0;
        }
        let above = rows.partition_point(|r| r.bottom <= y);
        let r = above.saturating_sub(1);
        if r + 1 < rows.len() && (y - rows[r + 1].bottom).abs() < (y - rows[r].bottom).abs() {
            r + 1
        } else {
            r
        }
    }

    /// Minimum gap between `left` and `right` when they abut in a row.
    ///
    /// The larger of the edge-type rule and the combined padding. A missing
    /// neighbor (segment boundary) has edge type zero and no padding.
    fn cell_spacing(&self, left: Option<&dyn CellGeometry>, right: Option<&dyn CellGeometry>) -> i32 {
        let left_type = left.map_or(0, |c| c.right_edge_type());
        let right_type = right.map_or(0, |c| c.left_edge_type());
        let by_edge = self.edge_spacing(left_type, right_type);
        let by_padding = if self.uses_padding() {
            left.map_or(0, |c| c.right_padding()) + right.map_or(0, |c| c.left_padding())
        } else {
            0
        };
        by_edge.max(by_padding)
    }

    /// Checks whether `cell` may sit with its bottom on row `row`.
    ///
    /// Returns `None` when incompatible (or when the cell would run past the
    /// top row), otherwise `Some(flip)`. Cells spanning an even number of rows
    /// cannot be flipped, so their rails must match the spanned rows' outer
    /// rails directly; odd spans may also match upside down. Unknown rails
    /// match anything.
    fn power_compatible(&self, cell: &dyn CellGeometry, row: usize) -> Option<bool> {
        let span = self.height_in_rows(cell);
        let rows = self.rows();
        let lo = rows.get(row)?;
        let hi = rows.get(row + span - 1)?;
        let (row_bot, row_top) = (lo.bottom_power, hi.top_power);
        let (cell_bot, cell_top) = (cell.bottom_power(), cell.top_power());
        if cell_bot.matches(row_bot) && cell_top.matches(row_top) {
            return Some(false);
        }
        if span % 2 == 1 && cell_bot.matches(row_top) && cell_top.matches(row_bot) {
            return Some(true);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Cell {
        h: i32,
        lt: usize,
        rt: usize,
        lp: i32,
        rp: i32,
        bot: PowerRail,
        top: PowerRail,
    }

    impl Cell {
        fn plain(h: i32) -> Self {
            Self {
                h,
                lt: 0,
                rt: 0,
                lp: 0,
                rp: 0,
                bot: PowerRail::Unknown,
                top: PowerRail::Unknown,
            }
        }
    }

    impl CellGeometry for Cell {
        fn height(&self) -> i32 {
            self.h
        }
        fn left_edge_type(&self) -> usize {
            self.lt
        }
        fn right_edge_type(&self) -> usize {
            self.rt
        }
        fn left_padding(&self) -> i32 {
            self.lp
        }
        fn right_padding(&self) -> i32 {
            self.rp
        }
        fn bottom_power(&self) -> PowerRail {
            self.bot
        }
        fn top_power(&self) -> PowerRail {
            self.top
        }
    }

    fn powered_arch() -> RowArchitecture {
        let rows = (0..4)
            .map(|i| {
                let (b, t) = if i % 2 == 0 {
                    (PowerRail::Vss, PowerRail::Vdd)
                } else {
                    (PowerRail::Vdd, PowerRail::Vss)
                };
                Row::new(RowId::from(i), i as i32 * 10, 10, 0, 1, 100).with_power(b, t)
            })
            .collect();
        RowArchitecture::new(rows).unwrap()
    }

    #[test]
    fn image_extents() {
        let arch = RowArchitecture::uniform(3, 10, 5, 2, 20).unwrap();
        assert_eq!(arch.min_x(), 5);
        assert_eq!(arch.max_x(), 45);
        assert_eq!(arch.min_y(), 0);
        assert_eq!(arch.max_y(), 30);
        assert_eq!(arch.row_height(), 10);
    }

    #[test]
    fn closest_row() {
        let arch = RowArchitecture::uniform(4, 10, 0, 1, 100).unwrap();
        assert_eq!(arch.find_closest_row(-20), 0);
        assert_eq!(arch.find_closest_row(4), 0);
        assert_eq!(arch.find_closest_row(5), 0);
        assert_eq!(arch.find_closest_row(6), 1);
        assert_eq!(arch.find_closest_row(30), 3);
        assert_eq!(arch.find_closest_row(500), 3);
    }

    #[test]
    fn rows_spanned() {
        let arch = RowArchitecture::uniform(4, 10, 0, 1, 100).unwrap();
        assert_eq!(arch.height_in_rows(&Cell::plain(10)), 1);
        assert_eq!(arch.height_in_rows(&Cell::plain(20)), 2);
        assert_eq!(arch.height_in_rows(&Cell::plain(0)), 1);
    }

    #[test]
    fn spacing_edge_table_and_padding() {
        let arch = RowArchitecture::uniform(1, 10, 0, 1, 100)
            .unwrap()
            .with_spacing_table(vec![vec![0, 0], vec![0, 3]]);
        let mut a = Cell::plain(10);
        a.rt = 1;
        a.rp = 1;
        let mut b = Cell::plain(10);
        b.lt = 1;
        b.lp = 1;
        assert_eq!(arch.cell_spacing(Some(&a), Some(&b)), 3);
        b.lp = 4;
        assert_eq!(arch.cell_spacing(Some(&a), Some(&b)), 5);
        assert_eq!(arch.cell_spacing(None, Some(&b)), 4);
        assert_eq!(arch.cell_spacing(Some(&a), None), 1);
        assert_eq!(arch.cell_spacing(None, None), 0);
    }

    #[test]
    fn padding_can_be_disabled() {
        let arch = RowArchitecture::uniform(1, 10, 0, 1, 100)
            .unwrap()
            .with_padding(false);
        let mut a = Cell::plain(10);
        a.rp = 2;
        assert_eq!(arch.cell_spacing(Some(&a), None), 0);
    }

    #[test]
    fn power_single_height_flips() {
        let arch = powered_arch();
        let mut c = Cell::plain(10);
        c.bot = PowerRail::Vss;
        c.top = PowerRail::Vdd;
        assert_eq!(arch.power_compatible(&c, 0), Some(false));
        assert_eq!(arch.power_compatible(&c, 1), Some(true));
    }

    #[test]
    fn power_double_height_requires_match() {
        let arch = powered_arch();
        let mut c = Cell::plain(20);
        c.bot = PowerRail::Vss;
        c.top = PowerRail::Vss;
        assert_eq!(arch.power_compatible(&c, 0), Some(false));
        assert_eq!(arch.power_compatible(&c, 1), None);
        assert_eq!(arch.power_compatible(&c, 2), Some(false));
        // Rows 3..4 do not exist.
        assert_eq!(arch.power_compatible(&c, 3), None);
    }

    #[test]
    fn unknown_power_is_wildcard() {
        let arch = powered_arch();
        let c = Cell::plain(20);
        assert_eq!(arch.power_compatible(&c, 1), Some(false));
    }
}
