//! Site-exact shifting of an ordered run of single-height cells.
//!
//! The solver is a shortest path over (site, cell) states. `tcost[i][j]` is
//! the cheapest total displacement that places the first `j` cells using
//! sites up to `i`; a state either skips site `i` or places cell `j` with its
//! left edge on site `i`, right after the previous cell's footprint.

use crate::context::LegalizationContext;
use crate::ids::NodeId;
use rowfit_common::SiteGrid;

const UNREACHED: i64 = i64::MAX;

/// Places cells in order on `grid` inside `[left_limit, right_limit]`,
/// minimizing the summed `|left - target|`.
///
/// `widths[k]` is cell `k`'s footprint including the spacing it needs before
/// the next cell; it is rounded up to whole sites. `site_width` is the width
/// of one site, used to decide whether the last site still fits before
/// `right_limit`. Returns the site-aligned left edges, or `None` when the
/// cells cannot fit.
pub fn solve_shift(
    grid: SiteGrid,
    site_width: i32,
    left_limit: i32,
    right_limit: i32,
    widths: &[i32],
    targets: &[i32],
) -> Option<Vec<i32>> {
    let ncells = widths.len();
    if ncells != targets.len() {
        return None;
    }
    if ncells == 0 {
        return Some(Vec::new());
    }

    let i0 = grid.ceil_index(left_limit);
    let mut i1 = grid.floor_index(right_limit);
    if grid.position(i1) + site_width >= right_limit {
        i1 -= 1;
    }
    let nsites = i1 - i0 + 1;
    if nsites <= 0 {
        return None;
    }

    let swid: Vec<i32> = widths
        .iter()
        .map(|&w| (w.max(0) + grid.pitch - 1).div_euclid(grid.pitch))
        .collect();
    if swid.iter().sum::<i32>() > nsites {
        return None;
    }

    // Leftmost and rightmost feasible first site of each cell.
    let mut site_l = Vec::with_capacity(ncells);
    let mut k = i0;
    for &w in &swid {
        site_l.push(k);
        k += w;
    }
    let mut site_r = vec![0; ncells];
    let mut k = i1 + 1;
    for j in (0..ncells).rev() {
        site_r[j] = k - swid[j];
        k = site_r[j];
        if site_r[j] < site_l[j] {
            return None;
        }
    }

    let n = nsites as usize;
    let mut tcost = vec![vec![UNREACHED; ncells + 1]; n + 1];
    let mut prev: Vec<Vec<Option<(usize, usize)>>> = vec![vec![None; ncells + 1]; n + 1];
    for i in 0..=n {
        tcost[i][0] = 0;
        if i > 0 {
            prev[i][0] = Some((i - 1, 0));
        }
    }

    for j in 1..=ncells {
        let prev_wid = if j == 1 { 1 } else { swid[j - 2] as usize };
        let curr_wid = swid[j - 1];
        for i in 1..=n {
            let site = i0 + i as i32 - 1;

            let skip = tcost[i - 1][j];
            if skip < tcost[i][j] {
                tcost[i][j] = skip;
                prev[i][j] = Some((i - 1, j));
            }

            if i < prev_wid || site + curr_wid - 1 > i1 {
                continue;
            }
            if site < site_l[j - 1] || site > site_r[j - 1] {
                continue;
            }
            let ii = i - prev_wid;
            if tcost[ii][j - 1] == UNREACHED {
                continue;
            }
            let cost = i64::from((grid.position(site) - targets[j - 1]).abs());
            let placed = tcost[ii][j - 1] + cost;
            if placed < tcost[i][j] {
                tcost[i][j] = placed;
                prev[i][j] = Some((ii, j - 1));
            }
        }
    }

    if tcost[n][ncells] == UNREACHED {
        return None;
    }
    let mut lefts = vec![0; ncells];
    let mut curr = (n, ncells);
    while curr != (0, 0) {
        let back = prev[curr.0][curr.1]?;
        if back.1 != curr.1 {
            lefts[curr.1 - 1] = grid.position(i0 + curr.0 as i32 - 1);
        }
        curr = back;
    }
    Some(lefts)
}

impl LegalizationContext<'_> {
    /// Shifts `cells` (ordered, single-height, all in `row`) to site-aligned
    /// positions inside `[left_limit, right_limit]` closest to `targets`,
    /// keeping the required spacing between consecutive cells.
    ///
    /// Spacing at the two ends is not included; callers fold it into the
    /// limits.
    pub fn shift(
        &self,
        cells: &[NodeId],
        targets: &[i32],
        left_limit: i32,
        right_limit: i32,
        row: usize,
    ) -> Option<Vec<i32>> {
        let row = self.arch.rows().get(row)?;
        let widths: Vec<i32> = cells
            .iter()
            .enumerate()
            .map(|(k, &c)| {
                let gap = cells
                    .get(k + 1)
                    .map_or(0, |&next| self.cell_spacing(Some(c), Some(next)));
                self.node(c).width + gap
            })
            .collect();
        solve_shift(row.grid(), row.site_width, left_limit, right_limit, &widths, targets)
    }
}
