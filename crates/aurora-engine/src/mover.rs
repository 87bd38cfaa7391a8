//! The mover pipeline.

use aurora_comm::{
    admit_update_blocks, apply_averages, apply_updates, decode, encode_averages, encode_updates,
    CommError, Transport,
};
use aurora_core::{CellId, CellStore, MomentSlot, SolverError};
use aurora_mesh::TopologyError;
use aurora_solver::remap::RemapStats;
use aurora_solver::{
    accelerate_cell, apply_contributions, apply_translation, compute_flux_contributions,
    moments, update_spatial_cfl, AccelPass,
};
use rayon::prelude::*;

use crate::config::MoverConfig;
use crate::context::MoverContext;
use crate::error::MoverError;
use crate::metrics::MoverMetrics;

/// One rank's semi-Lagrangian Vlasov mover.
///
/// Owns the configuration, the communication context, and the
/// transport endpoint; the cell store is passed into each call so the
/// surrounding simulation keeps ownership of the state.
pub struct VlasovMover<T: Transport> {
    config: MoverConfig,
    context: MoverContext,
    transport: T,
}

impl<T: Transport> VlasovMover<T> {
    /// Assemble a mover from its parts.
    pub fn new(config: MoverConfig, context: MoverContext, transport: T) -> Self {
        Self {
            config,
            context,
            transport,
        }
    }

    /// The communication context.
    pub fn context(&self) -> &MoverContext {
        &self.context
    }

    /// The communication context, for rebuilds after repartitioning.
    pub fn context_mut(&mut self) -> &mut MoverContext {
        &mut self.context
    }

    /// Advance one step: acceleration, post-acceleration moments, the
    /// spatial flux pipeline, flux propagation with its halo exchange,
    /// and time-centered moments.
    pub fn step(
        &mut self,
        store: &mut CellStore,
        passes: &[AccelPass],
        dt: f64,
    ) -> Result<MoverMetrics, MoverError> {
        let mut metrics = MoverMetrics::new();
        self.accelerate(store, passes, dt, &mut metrics)?;
        moments::integrate_all(store, &self.config.velocity_grid, MomentSlot::PostAcceleration);
        self.flux_stage(store, dt, &mut metrics)?;
        self.propagate_stage(store, &mut metrics)?;
        moments::interpolated(store);
        Ok(metrics)
    }

    /// Run the acceleration remap over every local cell with content.
    ///
    /// Cells are mutually independent, so the loop runs data-parallel;
    /// the first conservation violation aborts the step.
    pub fn accelerate(
        &self,
        store: &mut CellStore,
        passes: &[AccelPass],
        dt: f64,
        metrics: &mut MoverMetrics,
    ) -> Result<(), MoverError> {
        let grid = &self.config.velocity_grid;
        let max_blocks = self.config.max_blocks_per_cell;
        let tolerance = self.config.conservation_tolerance;
        let results: Vec<Result<RemapStats, SolverError>> = store
            .map_mut()
            .par_values_mut()
            .filter(|c| !c.is_halo && !c.is_boundary_governed() && !c.blocks.is_empty())
            .map(|c| accelerate_cell(c, grid, passes, dt, max_blocks, tolerance))
            .collect();
        for result in results {
            let stats = result?;
            metrics.cells_accelerated += 1;
            metrics.columns_remapped += stats.columns;
            metrics.clipped_mass += stats.clipped_mass;
        }
        metrics.min_acceleration_dt = store
            .map()
            .values()
            .filter(|c| !c.is_halo)
            .map(|c| c.params.max_acceleration_dt)
            .fold(f64::INFINITY, f64::min);
        Ok(())
    }

    /// Flux computation with overlapped halo exchange: post sends,
    /// compute inner cells, drain receives into the halos, compute
    /// boundary cells.
    fn flux_stage(
        &self,
        store: &mut CellStore,
        dt: f64,
        metrics: &mut MoverMetrics,
    ) -> Result<(), MoverError> {
        let grid = &self.config.velocity_grid;

        // Every flux accumulator starts the pass at zero, halos too.
        store
            .map_mut()
            .par_values_mut()
            .for_each(|c| c.zero_flux_buffers());
        store
            .map_mut()
            .par_values_mut()
            .filter(|c| !c.is_halo && c.is_flux_eligible())
            .for_each(|c| update_spatial_cfl(c, grid));
        metrics.min_spatial_dt = store
            .map()
            .values()
            .filter(|c| !c.is_halo)
            .map(|c| c.params.max_spatial_dt)
            .fold(f64::INFINITY, f64::min);

        let stencil = self.context.averages();
        for e in &stencil.sends {
            let cell = store
                .get(e.subject)
                .ok_or(TopologyError::MissingCell { cell: e.subject })?;
            self.transport.send(e.dest, e.tag, encode_averages(cell))?;
            metrics.messages_sent += 1;
        }

        let pending = compute_flux_contributions(store, grid, &stencil.inner, dt);
        apply_contributions(store, &pending, self.config.max_blocks_per_cell);

        for (&(source, tag), _) in &stencil.recvs {
            let bytes = self.transport.recv(source, tag)?;
            apply_averages(store, &bytes)?;
            metrics.messages_received += 1;
        }

        let pending = compute_flux_contributions(store, grid, &stencil.boundary, dt);
        apply_contributions(store, &pending, self.config.max_blocks_per_cell);

        self.transport.wait_sends()?;
        Ok(())
    }

    /// Ship halo flux home, apply inner cells while it travels, fold
    /// the arrived contributions into boundary cells.
    fn propagate_stage(
        &mut self,
        store: &mut CellStore,
        metrics: &mut MoverMetrics,
    ) -> Result<(), MoverError> {
        let grid = &self.config.velocity_grid;
        let (stencil, buffers) = self.context.updates_and_buffers();

        // Block counts moved during acceleration; refresh buffer sizes.
        let sized: Vec<CellId> = buffers.cells().collect();
        for cell in sized {
            let len = store.get(cell).map_or(0, |c| c.payload_len());
            buffers.ensure_sized(cell, len);
        }

        for e in &stencil.sends {
            let halo = store
                .get(e.subject)
                .ok_or(TopologyError::MissingCell { cell: e.subject })?;
            self.transport.send(e.dest, e.tag, encode_updates(halo))?;
            metrics.messages_sent += 1;
        }

        for &cell in &stencil.inner {
            if let Some(c) = store.get_mut(cell) {
                apply_translation(c, grid, None);
            }
        }

        for (&(source, tag), &cell) in &stencil.recvs {
            let bytes = self.transport.recv(source, tag)?;
            let payload = decode(&bytes).map_err(CommError::from)?;
            let owner = store
                .get_mut(cell)
                .ok_or(TopologyError::MissingCell { cell })?;
            // The halo may have accumulated flux into blocks this rank
            // never held; grow the owner and its buffers to take them.
            metrics.clipped_mass +=
                admit_update_blocks(owner, &payload, self.config.max_blocks_per_cell);
            buffers.grow(cell, owner.payload_len());
            let buffer = buffers.buffer_mut(cell, source)?;
            apply_updates(owner, &payload, buffer);
            metrics.messages_received += 1;
        }

        for &cell in &stencil.boundary {
            let remote = buffers.reduce(cell);
            if let Some(c) = store.get_mut(cell) {
                apply_translation(c, grid, remote);
            }
        }

        self.transport.wait_sends()?;
        Ok(())
    }
}
