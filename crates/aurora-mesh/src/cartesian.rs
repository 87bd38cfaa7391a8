//! Uniform Cartesian mesh with x-slab rank partitioning.

use aurora_core::{CellId, Rank};

use crate::error::TopologyError;
use crate::offset::Offset;
use crate::topology::MeshTopology;

/// A uniform rectangular mesh of `dims[0] × dims[1] × dims[2]` cells.
///
/// Cell IDs are linear, x-fastest. The rank partition cuts the mesh
/// into contiguous slabs along x, so inter-rank traffic only crosses
/// slab faces. Each axis is independently periodic or bounded.
#[derive(Clone, Debug, PartialEq)]
pub struct CartesianMesh {
    dims: [u32; 3],
    spacing: [f64; 3],
    origin: [f64; 3],
    periodic: [bool; 3],
    ranks: u32,
}

impl CartesianMesh {
    /// Create a mesh partitioned over `ranks` x-slabs.
    pub fn new(
        dims: [u32; 3],
        spacing: [f64; 3],
        periodic: [bool; 3],
        ranks: u32,
    ) -> Result<Self, TopologyError> {
        for axis in 0..3 {
            if dims[axis] == 0 {
                return Err(TopologyError::ZeroExtent { axis });
            }
        }
        if ranks == 0 {
            return Err(TopologyError::NoRanks);
        }
        if ranks > dims[0] {
            return Err(TopologyError::TooManyRanks {
                ranks,
                cells: dims[0],
            });
        }
        Ok(Self {
            dims,
            spacing,
            origin: [0.0; 3],
            periodic,
            ranks,
        })
    }

    /// Move the mesh origin (lower corner of cell 0).
    pub fn with_origin(mut self, origin: [f64; 3]) -> Self {
        self.origin = origin;
        self
    }

    /// Mesh dimensions in cells.
    pub fn dims(&self) -> [u32; 3] {
        self.dims
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> u64 {
        self.dims[0] as u64 * self.dims[1] as u64 * self.dims[2] as u64
    }

    /// Linear cell ID for mesh coordinates, or `None` outside the mesh.
    pub fn cell_id(&self, coords: [u32; 3]) -> Option<CellId> {
        if coords[0] >= self.dims[0] || coords[1] >= self.dims[1] || coords[2] >= self.dims[2] {
            return None;
        }
        Some(CellId(
            coords[0] as u64
                + self.dims[0] as u64 * (coords[1] as u64 + self.dims[1] as u64 * coords[2] as u64),
        ))
    }

    /// Mesh coordinates of a cell ID.
    pub fn coords(&self, cell: CellId) -> Result<[u32; 3], TopologyError> {
        if cell.0 >= self.cell_count() {
            return Err(TopologyError::MissingCell { cell });
        }
        let x = (cell.0 % self.dims[0] as u64) as u32;
        let rest = cell.0 / self.dims[0] as u64;
        let y = (rest % self.dims[1] as u64) as u32;
        let z = (rest / self.dims[1] as u64) as u32;
        Ok([x, y, z])
    }

    /// First x-plane owned by a rank.
    fn slab_start(&self, rank: u32) -> u32 {
        ((rank as u64 * self.dims[0] as u64) / self.ranks as u64) as u32
    }

    fn wrap(&self, axis: usize, c: i64) -> Option<u32> {
        let n = self.dims[axis] as i64;
        if (0..n).contains(&c) {
            Some(c as u32)
        } else if self.periodic[axis] {
            Some(c.rem_euclid(n) as u32)
        } else {
            None
        }
    }
}

impl MeshTopology for CartesianMesh {
    fn rank_count(&self) -> u32 {
        self.ranks
    }

    fn owner(&self, cell: CellId) -> Result<Rank, TopologyError> {
        let [x, _, _] = self.coords(cell)?;
        // Inverse of slab_start: the rank whose [start, next start) range
        // contains x.
        let r = (((x as u64 + 1) * self.ranks as u64 - 1) / self.dims[0] as u64) as u32;
        debug_assert!(self.slab_start(r) <= x);
        debug_assert!(r + 1 == self.ranks || x < self.slab_start(r + 1));
        Ok(Rank(r))
    }

    fn cells_of(&self, rank: Rank) -> Vec<CellId> {
        if rank.0 >= self.ranks {
            return Vec::new();
        }
        let x0 = self.slab_start(rank.0);
        let x1 = if rank.0 + 1 == self.ranks {
            self.dims[0]
        } else {
            self.slab_start(rank.0 + 1)
        };
        let mut cells = Vec::new();
        for z in 0..self.dims[2] {
            for y in 0..self.dims[1] {
                for x in x0..x1 {
                    // In-range by construction.
                    if let Some(id) = self.cell_id([x, y, z]) {
                        cells.push(id);
                    }
                }
            }
        }
        cells
    }

    fn neighbor(&self, cell: CellId, offset: Offset) -> Result<Option<CellId>, TopologyError> {
        let c = self.coords(cell)?;
        let mut out = [0u32; 3];
        for axis in 0..3 {
            match self.wrap(axis, c[axis] as i64 + offset[axis] as i64) {
                Some(w) => out[axis] = w,
                None => return Ok(None),
            }
        }
        Ok(self.cell_id(out))
    }

    fn spacing(&self) -> [f64; 3] {
        self.spacing
    }

    fn position(&self, cell: CellId) -> Result<[f64; 3], TopologyError> {
        let c = self.coords(cell)?;
        Ok([
            self.origin[0] + c[0] as f64 * self.spacing[0],
            self.origin[1] + c[1] as f64 * self.spacing[1],
            self.origin[2] + c[2] as f64 * self.spacing[2],
        ])
    }
}
