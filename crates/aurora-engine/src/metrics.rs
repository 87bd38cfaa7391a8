//! Per-step mover metrics.

/// Counters and bounds recorded over one [`crate::VlasovMover::step`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MoverMetrics {
    /// Cells that went through the acceleration remap.
    pub cells_accelerated: usize,
    /// Velocity sub-columns remapped across all cells and passes.
    pub columns_remapped: usize,
    /// Mass dropped to the sparse-block budget this step.
    pub clipped_mass: f64,
    /// Messages posted across both exchanges.
    pub messages_sent: usize,
    /// Messages received across both exchanges.
    pub messages_received: usize,
    /// Tightest spatial CFL bound over local cells.
    pub min_spatial_dt: f64,
    /// Tightest velocity-space CFL bound over local cells.
    pub min_acceleration_dt: f64,
}

impl MoverMetrics {
    /// Fresh counters with infinite CFL bounds.
    pub fn new() -> Self {
        Self {
            min_spatial_dt: f64::INFINITY,
            min_acceleration_dt: f64::INFINITY,
            ..Self::default()
        }
    }
}
