//! Boundary-governed cells must be left alone by the pipeline:
//! do-not-compute cells keep their state and zero flux, and neither
//! translation nor time-centering writes their moments. The
//! post-acceleration moment pass is the one exception and covers
//! every cell with content.

use aurora_comm::LocalFabric;
use aurora_core::{BoundaryKind, BoundaryTag, CellStore, Moments, Rank};
use aurora_engine::{MoverConfig, MoverContext, VlasovMover};
use aurora_mesh::CartesianMesh;
use aurora_test_utils::{cell_mass, identity_passes, maxwellian_cell, standard_grid};

#[test]
fn excluded_cells_are_never_advanced() {
    let mesh = CartesianMesh::new([3, 1, 1], [1.0; 3], [false; 3], 1).unwrap();
    let grid = standard_grid();

    let ordinary_id = mesh.cell_id([0, 0, 0]).unwrap();
    let excluded_id = mesh.cell_id([1, 0, 0]).unwrap();
    let deep_id = mesh.cell_id([2, 0, 0]).unwrap();

    let mut store = CellStore::new();
    store.insert(maxwellian_cell(ordinary_id, &grid, 1.0, 0.8));
    let mut excluded = maxwellian_cell(excluded_id, &grid, 2.0, 0.8);
    excluded.boundary = BoundaryTag::DoNotCompute;
    store.insert(excluded);
    let mut deep = maxwellian_cell(deep_id, &grid, 3.0, 0.8);
    deep.boundary = BoundaryTag::Boundary(BoundaryKind::Outflow);
    deep.boundary_layer = 2;
    store.insert(deep);

    let excluded_mass = cell_mass(store.get(excluded_id).unwrap());
    let deep_mass = cell_mass(store.get(deep_id).unwrap());

    let context = MoverContext::build(&mesh, &mut store, Rank(0)).unwrap();
    let transport = LocalFabric::endpoints(1).pop().unwrap();
    let mut mover = VlasovMover::new(MoverConfig::new(grid.clone()), context, transport);
    let metrics = mover.step(&mut store, &identity_passes(), 0.05).unwrap();

    // Only the ordinary cell went through acceleration.
    assert_eq!(metrics.cells_accelerated, 1);

    let excluded = store.get(excluded_id).unwrap();
    assert!((cell_mass(excluded) - excluded_mass).abs() < 1e-14);
    for block in excluded.blocks.values() {
        assert!(block.flux_is_zero());
    }
    // The raw slot stays zero (time-centering covers ordinary cells
    // only) and propagation zeroed the provisional slot, but the
    // post-acceleration pass integrates every cell with content,
    // boundary-governed ones included.
    assert_eq!(excluded.params.moments, Moments::zero());
    assert_eq!(excluded.params.moments_r, Moments::zero());
    assert!(excluded.params.moments_v.rho > 0.0);

    let deep = store.get(deep_id).unwrap();
    assert!((cell_mass(deep) - deep_mass).abs() < 1e-14);
    assert_eq!(deep.params.moments, Moments::zero());
    assert!(deep.params.moments_v.rho > 0.0);

    // The ordinary cell saw replicated neighbors on both sides (its
    // real neighbor is excluded), so the step is a fixed point for it
    // too, with populated moments.
    let ordinary = store.get(ordinary_id).unwrap();
    assert!(ordinary.params.moments.rho > 0.0);
}
