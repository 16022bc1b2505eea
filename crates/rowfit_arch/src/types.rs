//! Floorplan data types: rectangles, placement rows and fence regions.

use crate::ids::{PowerRail, RegionId, RowId};
use rowfit_common::{Interval, SiteGrid};
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in database units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub xmin: i32,
    /// Bottom edge.
    pub ymin: i32,
    /// Right edge.
    pub xmax: i32,
    /// Top edge.
    pub ymax: i32,
}

impl Rect {
    /// Creates a rectangle from its corners.
    pub fn new(xmin: i32, ymin: i32, xmax: i32, ymax: i32) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Horizontal extent.
    pub fn x_span(&self) -> Interval {
        Interval::new(self.xmin, self.xmax)
    }

    /// Returns true if the rectangle's y-range overlaps `[lo, hi]` with
    /// positive length.
    pub fn overlaps_y(&self, lo: i32, hi: i32) -> bool {
        !(self.ymin >= hi || self.ymax <= lo)
    }

    /// Returns true if the rectangle covers all of `[lo, hi]` vertically.
    pub fn spans_y(&self, lo: i32, hi: i32) -> bool {
        self.ymax >= hi && self.ymin <= lo
    }
}

/// A horizontal placement row of equally spaced sites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Position of the row in the bottom-to-top row table.
    pub id: RowId,
    /// Bottom y coordinate.
    pub bottom: i32,
    /// Row height.
    pub height: i32,
    /// X coordinate of the first site.
    pub origin: i32,
    /// Distance between site origins.
    pub site_spacing: i32,
    /// Width of one site.
    pub site_width: i32,
    /// Number of sites in the row.
    pub num_sites: i32,
    /// Rail along the bottom edge.
    pub bottom_power: PowerRail,
    /// Rail along the top edge.
    pub top_power: PowerRail,
}

impl Row {
    /// Creates a row with unknown power rails and `site_width == site_spacing`.
    pub fn new(id: RowId, bottom: i32, height: i32, origin: i32, site_spacing: i32, num_sites: i32) -> Self {
        Self {
            id,
            bottom,
            height,
            origin,
            site_spacing,
            site_width: site_spacing,
            num_sites,
            bottom_power: PowerRail::Unknown,
            top_power: PowerRail::Unknown,
        }
    }

    /// Sets the power rails along the bottom and top edges.
    pub fn with_power(mut self, bottom: PowerRail, top: PowerRail) -> Self {
        self.bottom_power = bottom;
        self.top_power = top;
        self
    }

    /// Top y coordinate.
    pub fn top(&self) -> i32 {
        self.bottom + self.height
    }

    /// Left x extent (the first site's origin).
    pub fn left(&self) -> i32 {
        self.origin
    }

    /// Right x extent.
    pub fn right(&self) -> i32 {
        self.origin + self.num_sites * self.site_spacing
    }

    /// Horizontal extent of the row.
    pub fn x_span(&self) -> Interval {
        Interval::new(self.left(), self.right())
    }

    /// The row's site grid.
    pub fn grid(&self) -> SiteGrid {
        SiteGrid::new(self.origin, self.site_spacing)
    }
}

/// A fence region: a set of rectangles that confine the cells tagged with its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Region id; zero is the default region.
    pub id: RegionId,
    /// Rectangles making up the region.
    pub rects: Vec<Rect>,
}

impl Region {
    /// Creates a region from its rectangles.
    pub fn new(id: RegionId, rects: Vec<Rect>) -> Self {
        Self { id, rects }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_extents() {
        let row = Row::new(RowId::from_raw(2), 20, 10, 5, 2, 50);
        assert_eq!(row.top(), 30);
        assert_eq!(row.left(), 5);
        assert_eq!(row.right(), 105);
        assert_eq!(row.x_span(), Interval::new(5, 105));
        assert_eq!(row.grid().snap_up(6), 7);
    }

    #[test]
    fn rect_vertical_tests() {
        let r = Rect::new(0, 10, 50, 30);
        assert!(r.overlaps_y(20, 40));
        assert!(!r.overlaps_y(30, 40));
        assert!(r.spans_y(10, 20));
        assert!(!r.spans_y(0, 20));
    }

    #[test]
    fn row_serde_roundtrip() {
        let row = Row::new(RowId::from_raw(0), 0, 10, 0, 1, 100)
            .with_power(PowerRail::Vss, PowerRail::Vdd);
        let json = serde_json::to_string(&row).unwrap();
        let back: Row = serde_json::from_str(&json).unwrap();
        assert_eq!(back, row);
    }
}
