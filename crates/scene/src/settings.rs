use serde::{Deserialize, Serialize};

/// Tunable constants of one marching loop.
///
/// The full-frame pass and the single-pixel picking pass use different
/// values: picking runs for one pixel only, so it marches with a looser
/// threshold, a shorter range and fewer steps.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarchSettings {
    pub max_steps: u32,
    pub max_distance: f32,
    pub surface_epsilon: f32,
}

impl MarchSettings {
    /// Constants of the per-pixel shading pass.
    #[must_use]
    pub const fn render() -> Self {
        Self {
            max_steps: 256,
            max_distance: 100.0,
            surface_epsilon: 0.001,
        }
    }

    /// Constants of the single-pixel picking pass.
    #[must_use]
    pub const fn picking() -> Self {
        Self {
            max_steps: 128,
            max_distance: 50.0,
            surface_epsilon: 0.01,
        }
    }
}

impl Default for MarchSettings {
    fn default() -> Self {
        Self::render()
    }
}
