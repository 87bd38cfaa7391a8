//! Conservative 1-D semi-Lagrangian remap along a velocity axis.
//!
//! The acceleration step is operator-split into three shear/translation
//! passes. Each pass remaps every velocity column of a cell along one
//! axis: destination cell `k` of column `(i, j)` collects the integral
//! of the source reconstruction over its departure interval
//! `[base + i·di + j·dj + k·dk, … + dk]`, expressed in source index
//! coordinates. Consecutive departure intervals tile the axis, so
//! column mass is conserved to rounding as long as no mass leaves the
//! grid; the piecewise-linear reconstruction uses the monotonized
//! central slope, so no new extrema appear.

use aurora_core::{SpatialCell, VelocityBlock, VelocityGrid, BLOCK_WIDTH};
use indexmap::IndexSet;

use crate::limiter::mc_slope;

/// Departure-interval geometry of one remap pass.
///
/// All four coefficients are in source index coordinates (units of one
/// velocity cell along the remap axis). The identity pass has
/// `base = 0`, `di = dj = 0`, `dk = 1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RemapGeometry {
    /// Departure lower edge of cell 0 of column (0, 0).
    pub base: f64,
    /// Shear per perpendicular index `i`.
    pub di: f64,
    /// Shear per perpendicular index `j`.
    pub dj: f64,
    /// Departure interval width (and spacing between consecutive `k`).
    pub dk: f64,
}

impl RemapGeometry {
    /// The geometry that maps every cell onto itself.
    pub fn identity() -> Self {
        Self {
            base: 0.0,
            di: 0.0,
            dj: 0.0,
            dk: 1.0,
        }
    }

    /// A pure translation by `shift` source cells (no shear).
    pub fn translation(shift: f64) -> Self {
        Self {
            base: -shift,
            di: 0.0,
            dj: 0.0,
            dk: 1.0,
        }
    }

    /// Lower edge of the departure interval of cell `k` in column `(i, j)`.
    #[inline]
    pub fn departure_lower(&self, i: f64, j: f64, k: f64) -> f64 {
        self.base + i * self.di + j * self.dj + k * self.dk
    }

    /// Largest displacement (in source cells) any destination cell in
    /// the grid experiences under this geometry.
    pub fn max_displacement(&self, grid: &VelocityGrid, dim: usize) -> f64 {
        let (p, q) = perpendicular(dim);
        let ni = (grid.cells(p) - 1) as f64;
        let nj = (grid.cells(q) - 1) as f64;
        let nk = (grid.cells(dim) - 1) as f64;
        let mut max = 0.0f64;
        for i in [0.0, ni] {
            for j in [0.0, nj] {
                for k in [0.0, nk] {
                    let shift = self.departure_lower(i, j, k) - k;
                    max = max.max(shift.abs());
                }
            }
        }
        max
    }
}

/// Outcome counters of one remap pass over one cell.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RemapStats {
    /// Velocity sub-columns processed.
    pub columns: usize,
    /// Mass dropped because the sparse block budget was exhausted.
    pub clipped_mass: f64,
}

/// The two axes perpendicular to `dim`, in increasing order.
#[inline]
fn perpendicular(dim: usize) -> (usize, usize) {
    match dim {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    }
}

/// Flat in-block index from per-axis offsets.
#[inline]
fn flat(offsets: [usize; 3]) -> usize {
    VelocityBlock::index(offsets[0], offsets[1], offsets[2])
}

/// Remap all of `cell`'s columns along `dim` under `geometry`.
///
/// Columns whose departure footprint reaches unallocated blocks grow
/// the block set, up to `max_blocks` blocks per cell; beyond that the
/// overflow mass is dropped and reported in the stats (and, from there,
/// by the caller's conservation check).
pub fn map_1d(
    cell: &mut SpatialCell,
    grid: &VelocityGrid,
    geometry: &RemapGeometry,
    dim: usize,
    max_blocks: usize,
) -> RemapStats {
    debug_assert!(geometry.dk > 0.0);
    let mut stats = RemapStats::default();
    if cell.blocks.is_empty() {
        return stats;
    }

    let (p, q) = perpendicular(dim);
    let n = grid.cells(dim) as usize;
    let nb = grid.blocks()[dim];

    // Perpendicular block columns with any allocated block. The remap
    // only moves content along `dim`, so this set cannot grow mid-pass.
    let mut block_columns: IndexSet<(u32, u32)> = IndexSet::new();
    for &id in cell.blocks.keys() {
        let c = grid.block_coords(id);
        block_columns.insert((c[p], c[q]));
    }

    let mut src = vec![0.0f64; n];
    let mut dst = vec![0.0f64; n];
    let mut slope = vec![0.0f64; n];

    for &(bp, bq) in &block_columns {
        for op in 0..BLOCK_WIDTH {
            for oq in 0..BLOCK_WIDTH {
                let gp = bp as usize * BLOCK_WIDTH + op;
                let gq = bq as usize * BLOCK_WIDTH + oq;

                // Gather the source column; absent blocks read zero.
                let mut any = false;
                for bk in 0..nb {
                    let mut bc = [0u32; 3];
                    bc[dim] = bk;
                    bc[p] = bp;
                    bc[q] = bq;
                    // In-range by construction.
                    let id = match grid.block_id(bc) {
                        Some(id) => id,
                        None => continue,
                    };
                    let block = cell.blocks.get(&id);
                    for ok in 0..BLOCK_WIDTH {
                        let g = bk as usize * BLOCK_WIDTH + ok;
                        let mut off = [0usize; 3];
                        off[dim] = ok;
                        off[p] = op;
                        off[q] = oq;
                        src[g] = match block {
                            Some(b) => b.values[flat(off)],
                            None => 0.0,
                        };
                        any |= src[g] != 0.0;
                    }
                }
                if !any {
                    continue;
                }
                stats.columns += 1;

                for s in 0..n {
                    let left = if s > 0 { src[s - 1] } else { 0.0 };
                    let right = if s + 1 < n { src[s + 1] } else { 0.0 };
                    slope[s] = mc_slope(left, src[s], right);
                }

                for (k, d) in dst.iter_mut().enumerate() {
                    let lo = geometry.departure_lower(gp as f64, gq as f64, k as f64);
                    let hi = lo + geometry.dk;
                    *d = integrate(&src, &slope, lo, hi);
                }

                // Scatter back; allocate blocks the footprint reached.
                for bk in 0..nb {
                    let mut bc = [0u32; 3];
                    bc[dim] = bk;
                    bc[p] = bp;
                    bc[q] = bq;
                    let id = match grid.block_id(bc) {
                        Some(id) => id,
                        None => continue,
                    };
                    for ok in 0..BLOCK_WIDTH {
                        let g = bk as usize * BLOCK_WIDTH + ok;
                        let mut off = [0usize; 3];
                        off[dim] = ok;
                        off[p] = op;
                        off[q] = oq;
                        let value = dst[g];
                        match cell.blocks.get_mut(&id) {
                            Some(block) => block.values[flat(off)] = value,
                            None if value != 0.0 => {
                                if cell.blocks.len() < max_blocks {
                                    let mut block = VelocityBlock::new();
                                    block.values[flat(off)] = value;
                                    cell.blocks.insert(id, block);
                                } else {
                                    stats.clipped_mass += value;
                                }
                            }
                            None => {}
                        }
                    }
                }
            }
        }
    }
    stats
}

/// Integral of the piecewise-linear reconstruction over `[lo, hi]`.
///
/// The reconstruction of source cell `s` is
/// `src[s] + slope[s] · (x − (s + ½))` on `[s, s + 1)` and zero outside
/// the grid.
fn integrate(src: &[f64], slope: &[f64], lo: f64, hi: f64) -> f64 {
    let n = src.len() as i64;
    let first = lo.floor() as i64;
    let last = hi.ceil() as i64;
    let mut mass = 0.0;
    for s in first..last {
        if s < 0 || s >= n {
            continue;
        }
        let a = lo.max(s as f64);
        let b = hi.min((s + 1) as f64);
        if b <= a {
            continue;
        }
        let su = s as usize;
        let mid = 0.5 * (a + b) - (s as f64 + 0.5);
        mass += (b - a) * (src[su] + slope[su] * mid);
    }
    mass
}
