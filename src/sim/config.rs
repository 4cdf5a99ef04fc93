/// Settings for a propagation simulation run.
pub struct SimulationConfig {
    /// Number of rays emitted in total.
    pub num_rays: usize,
    /// Rays per parallel batch; progress is reported between batches.
    pub batch_size: usize,
    /// Bounce budget per ray; `None` removes the budget entirely.
    pub max_reflections: Option<u32>,
    /// Radius of the smoothing box filter applied after tracing.
    pub filter_radius: usize,
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self {
            num_rays: 10_000,
            batch_size: 1_000,
            max_reflections: Some(7),
            filter_radius: 1,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}
