//! Erosion configuration.

use serde::{Deserialize, Serialize};

/// Parameters for the particle-based hydraulic erosion simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErosionConfig {
    /// Number of droplets to spawn and simulate sequentially.
    pub particles: u32,
    /// Integration timestep.
    pub dt: f32,
    /// Water density; divides the slope acceleration together with volume.
    pub density: f32,
    /// Velocity damping factor per step (0-1). At 1.0 with `dt` 1.0 the
    /// damping zeroes velocity before the capacity computation, so no
    /// sediment is ever picked up; lower it to get visible transport.
    pub friction: f32,
    /// Fractional volume loss per step.
    pub evaporation_rate: f32,
    /// Rate at which sediment moves between droplet and terrain.
    pub deposition_rate: f32,
    /// Droplets terminate once their volume drops below this threshold.
    pub min_volume: f32,
    /// Step budget per droplet. 1 reproduces the legacy single-step
    /// behavior where each droplet acts on the terrain exactly once.
    pub max_steps: u32,
    /// Seed for the droplet spawn stream. Droplets mutate shared terrain
    /// sequentially, so the result is a pure function of this seed.
    pub seed: u64,
}

impl Default for ErosionConfig {
    fn default() -> Self {
        Self {
            particles: 1000,
            dt: 1.0,
            density: 1.0,
            friction: 1.0,
            evaporation_rate: 1e-3,
            deposition_rate: 1e-3,
            min_volume: 0.01,
            max_steps: 500,
            seed: 42,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ErosionConfig::default();
        assert_eq!(config.particles, 1000);
        assert_eq!(config.dt, 1.0);
        assert_eq!(config.density, 1.0);
        assert_eq!(config.friction, 1.0);
        assert_eq!(config.evaporation_rate, 1e-3);
        assert_eq!(config.deposition_rate, 1e-3);
    }
}
