//! Per-cell macroscopic parameters and moment slots.

/// Velocity moments of the distribution function for one cell.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Moments {
    /// Number density.
    pub rho: f64,
    /// Momentum density per spatial axis.
    pub rho_v: [f64; 3],
}

impl Moments {
    /// All-zero moments.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Arithmetic mean of two moment sets (time-centering).
    pub fn mean(a: &Moments, b: &Moments) -> Moments {
        Moments {
            rho: 0.5 * (a.rho + b.rho),
            rho_v: [
                0.5 * (a.rho_v[0] + b.rho_v[0]),
                0.5 * (a.rho_v[1] + b.rho_v[1]),
                0.5 * (a.rho_v[2] + b.rho_v[2]),
            ],
        }
    }
}

/// Which moment slot an integration pass writes.
///
/// The field solver reads `Raw`; the two provisional slots bracket the
/// transport stages and are averaged into `Raw` for time-centering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MomentSlot {
    /// Field-solver-facing moments.
    Raw,
    /// Provisional moments after the acceleration stage (`_V`).
    PostAcceleration,
    /// Provisional moments after the spatial-translation stage (`_R`).
    PostTranslation,
}

/// Macroscopic parameter block of a spatial cell.
#[derive(Clone, Debug, PartialEq)]
pub struct CellParams {
    /// Position of the cell's lower corner.
    pub position: [f64; 3],
    /// Spatial cell spacing per axis.
    pub dx: [f64; 3],
    /// Field-solver-facing moments.
    pub moments: Moments,
    /// Provisional moments after acceleration.
    pub moments_v: Moments,
    /// Provisional moments after spatial translation.
    pub moments_r: Moments,
    /// Largest stable timestep for spatial transport in this cell.
    pub max_spatial_dt: f64,
    /// Largest stable timestep for velocity-space transport in this cell.
    pub max_acceleration_dt: f64,
}

impl CellParams {
    /// Immutable access to a moment slot.
    pub fn slot(&self, slot: MomentSlot) -> &Moments {
        match slot {
            MomentSlot::Raw => &self.moments,
            MomentSlot::PostAcceleration => &self.moments_v,
            MomentSlot::PostTranslation => &self.moments_r,
        }
    }

    /// Mutable access to a moment slot.
    pub fn slot_mut(&mut self, slot: MomentSlot) -> &mut Moments {
        match slot {
            MomentSlot::Raw => &mut self.moments,
            MomentSlot::PostAcceleration => &mut self.moments_v,
            MomentSlot::PostTranslation => &mut self.moments_r,
        }
    }
}

impl Default for CellParams {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            dx: [1.0; 3],
            moments: Moments::zero(),
            moments_v: Moments::zero(),
            moments_r: Moments::zero(),
            max_spatial_dt: f64::INFINITY,
            max_acceleration_dt: f64::INFINITY,
        }
    }
}
