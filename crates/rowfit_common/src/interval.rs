//! Closed-open integer intervals along a row and site-grid arithmetic.
//!
//! Blockages are collected per row as raw intervals, then sorted and merged;
//! free segments are the complement of the merged list within the row's
//! usable span. All coordinates are database units.

use serde::{Deserialize, Serialize};

/// A horizontal span `[lo, hi]` in database units.
///
/// Intervals with `hi <= lo` are empty; merging treats touching intervals
/// (`a.hi == b.lo`) as overlapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Interval {
    /// Left end.
    pub lo: i32,
    /// Right end.
    pub hi: i32,
}

impl Interval {
    /// Creates an interval from its two ends.
    pub fn new(lo: i32, hi: i32) -> Self {
        Self { lo, hi }
    }

    /// Length of the span, zero when empty.
    pub fn len(&self) -> i32 {
        (self.hi - self.lo).max(0)
    }

    /// Returns true if the span has no positive length.
    pub fn is_empty(&self) -> bool {
        self.hi <= self.lo
    }

    /// Returns true if `x` lies in `[lo, hi]`.
    pub fn contains(&self, x: i32) -> bool {
        self.lo <= x && x <= self.hi
    }

    /// Length of the shared portion with `other`, zero when disjoint.
    pub fn overlap(&self, other: &Interval) -> i32 {
        (self.hi.min(other.hi) - self.lo.max(other.lo)).max(0)
    }

    /// Intersection with `other`, if it has positive length.
    pub fn intersect(&self, other: &Interval) -> Option<Interval> {
        let iv = Interval::new(self.lo.max(other.lo), self.hi.min(other.hi));
        (!iv.is_empty()).then_some(iv)
    }

    /// Clamps `x` so that `[x, x + width]` stays inside the interval where
    /// possible. If `width` exceeds the interval, the result is `lo`.
    pub fn clamp_left(&self, x: i32, width: i32) -> i32 {
        x.min(self.hi - width).max(self.lo)
    }

    /// Center, rounded toward negative infinity.
    pub fn center(&self) -> i32 {
        self.lo + (self.hi - self.lo).div_euclid(2)
    }
}

/// Sorts `intervals` and merges any that overlap or touch.
///
/// The merge walks the sorted list keeping a running top: a new interval
/// starts only when the top's right end is strictly left of the next left
/// end. Empty intervals are dropped first.
pub fn merge_intervals(mut intervals: Vec<Interval>) -> Vec<Interval> {
    intervals.retain(|iv| !iv.is_empty());
    intervals.sort();
    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for iv in intervals {
        match merged.last_mut() {
            Some(top) if top.hi >= iv.lo => top.hi = top.hi.max(iv.hi),
            _ => merged.push(iv),
        }
    }
    merged
}

/// Free spans of `bounds` not covered by `blocked`.
///
/// `blocked` must be sorted and merged (see [`merge_intervals`]). Only
/// pieces of positive length are returned, in left-to-right order.
pub fn complement(blocked: &[Interval], bounds: Interval) -> Vec<Interval> {
    let mut free = Vec::new();
    let mut cursor = bounds.lo;
    for b in blocked {
        if b.hi <= cursor {
            continue;
        }
        if b.lo >= bounds.hi {
            break;
        }
        if b.lo > cursor {
            free.push(Interval::new(cursor, b.lo.min(bounds.hi)));
        }
        cursor = cursor.max(b.hi);
    }
    if cursor < bounds.hi {
        free.push(Interval::new(cursor, bounds.hi));
    }
    free
}

/// A regular grid of placement sites: `origin + k * pitch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteGrid {
    /// X coordinate of site zero.
    pub origin: i32,
    /// Distance between consecutive sites, at least one.
    pub pitch: i32,
}

impl SiteGrid {
    /// Creates a grid. A non-positive pitch is treated as one.
    pub fn new(origin: i32, pitch: i32) -> Self {
        Self {
            origin,
            pitch: pitch.max(1),
        }
    }

    /// Index of the last site at or left of `x`.
    pub fn floor_index(&self, x: i32) -> i32 {
        (x - self.origin).div_euclid(self.pitch)
    }

    /// Index of the first site at or right of `x`.
    pub fn ceil_index(&self, x: i32) -> i32 {
        let ix = self.floor_index(x);
        if self.position(ix) < x {
            ix + 1
        } else {
            ix
        }
    }

    /// Index of the site nearest to `x`, ties rounding up.
    pub fn nearest_index(&self, x: i32) -> i32 {
        (2 * (x - self.origin) + self.pitch).div_euclid(2 * self.pitch)
    }

    /// X coordinate of site `index`.
    pub fn position(&self, index: i32) -> i32 {
        self.origin + index * self.pitch
    }

    /// Largest site coordinate `<= x`.
    pub fn snap_down(&self, x: i32) -> i32 {
        self.position(self.floor_index(x))
    }

    /// Smallest site coordinate `>= x`.
    pub fn snap_up(&self, x: i32) -> i32 {
        self.position(self.ceil_index(x))
    }

    /// Returns true if `x` sits exactly on a site.
    pub fn is_aligned(&self, x: i32) -> bool {
        (x - self.origin).rem_euclid(self.pitch) == 0
    }

    /// Shrinks `iv` inward to site boundaries.
    pub fn snap_inward(&self, iv: Interval) -> Interval {
        Interval::new(self.snap_up(iv.lo), self.snap_down(iv.hi))
    }

    /// Grows `iv` outward to site boundaries.
    pub fn snap_outward(&self, iv: Interval) -> Interval {
        Interval::new(self.snap_down(iv.lo), self.snap_up(iv.hi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(lo: i32, hi: i32) -> Interval {
        Interval::new(lo, hi)
    }

    #[test]
    fn merge_overlapping_and_touching() {
        let merged = merge_intervals(vec![iv(50, 60), iv(0, 10), iv(10, 20), iv(15, 30)]);
        assert_eq!(merged, vec![iv(0, 30), iv(50, 60)]);
    }

    #[test]
    fn merge_drops_empty() {
        let merged = merge_intervals(vec![iv(5, 5), iv(8, 3), iv(1, 2)]);
        assert_eq!(merged, vec![iv(1, 2)]);
    }

    #[test]
    fn merge_nested() {
        let merged = merge_intervals(vec![iv(0, 100), iv(10, 20), iv(30, 40)]);
        assert_eq!(merged, vec![iv(0, 100)]);
    }

    #[test]
    fn complement_middle_blockage() {
        let free = complement(&[iv(40, 60)], iv(0, 100));
        assert_eq!(free, vec![iv(0, 40), iv(60, 100)]);
    }

    #[test]
    fn complement_blockage_past_bounds() {
        let free = complement(&[iv(-10, 5), iv(90, 200)], iv(0, 100));
        assert_eq!(free, vec![iv(5, 90)]);
    }

    #[test]
    fn complement_fully_blocked() {
        assert!(complement(&[iv(0, 100)], iv(0, 100)).is_empty());
    }

    #[test]
    fn complement_no_blockages() {
        assert_eq!(complement(&[], iv(3, 9)), vec![iv(3, 9)]);
    }

    #[test]
    fn overlap_and_intersect() {
        assert_eq!(iv(0, 10).overlap(&iv(5, 20)), 5);
        assert_eq!(iv(0, 10).overlap(&iv(10, 20)), 0);
        assert_eq!(iv(0, 10).intersect(&iv(5, 20)), Some(iv(5, 10)));
        assert_eq!(iv(0, 10).intersect(&iv(10, 20)), None);
    }

    #[test]
    fn clamp_left_keeps_cell_inside() {
        let seg = iv(0, 100);
        assert_eq!(seg.clamp_left(95, 10), 90);
        assert_eq!(seg.clamp_left(-5, 10), 0);
        assert_eq!(seg.clamp_left(30, 10), 30);
        assert_eq!(seg.clamp_left(30, 200), 0);
    }

    #[test]
    fn grid_snapping() {
        let grid = SiteGrid::new(3, 10);
        assert_eq!(grid.snap_down(27), 23);
        assert_eq!(grid.snap_up(27), 33);
        assert_eq!(grid.snap_up(23), 23);
        assert_eq!(grid.snap_down(-1), -7);
        assert!(grid.is_aligned(13));
        assert!(!grid.is_aligned(14));
    }

    #[test]
    fn grid_nearest() {
        let grid = SiteGrid::new(0, 10);
        assert_eq!(grid.nearest_index(14), 1);
        assert_eq!(grid.nearest_index(15), 2);
        assert_eq!(grid.nearest_index(-4), 0);
    }

    #[test]
    fn snap_inward_and_outward() {
        let grid = SiteGrid::new(0, 10);
        assert_eq!(grid.snap_inward(iv(5, 47)), iv(10, 40));
        assert_eq!(grid.snap_outward(iv(5, 47)), iv(0, 50));
        assert_eq!(grid.snap_outward(iv(10, 40)), iv(10, 40));
    }

    #[test]
    fn zero_pitch_is_guarded() {
        let grid = SiteGrid::new(0, 0);
        assert_eq!(grid.pitch, 1);
        assert_eq!(grid.snap_up(7), 7);
    }

    #[test]
    fn interval_serde() {
        let json = serde_json::to_string(&iv(1, 2)).unwrap();
        let back: Interval = serde_json::from_str(&json).unwrap();
        assert_eq!(back, iv(1, 2));
    }
}
