//! Sequential particle-based hydraulic erosion.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::erosion::{ErosionConfig, Particle};
use crate::grid::HeightField;

/// Aggregate outcome of an erosion run.
#[derive(Debug, Clone, Default)]
pub struct ErosionStats {
    /// Droplets spawned.
    pub particles_spawned: u32,
    /// Droplets that terminated by dropping below the volume threshold.
    pub particles_evaporated: u32,
    /// Droplets that flowed off the grid and were discarded.
    pub particles_left_grid: u32,
    /// Droplets that exhausted their step budget.
    pub particles_out_of_steps: u32,
    /// Total material removed from the terrain.
    pub total_eroded: f64,
    /// Total material returned to the terrain.
    pub total_deposited: f64,
}

/// What a single droplet step did.
enum StepOutcome {
    /// Droplet is still on the grid; the height at its pre-move cell
    /// changed by `height_delta` (negative = erosion, positive = deposit).
    Flowing { height_delta: f32 },
    /// The integrated position left the grid; the step was rejected before
    /// touching the terrain.
    LeftGrid,
}

/// Rounds a continuous grid coordinate to its cell index, clamped to the
/// grid edge (rounding at the boundary can land one past the last vertex).
#[inline]
fn cell_of(v: f32, len: u32) -> u32 {
    debug_assert!(v >= 0.0 && v < len as f32);
    (v.round() as i64).clamp(0, len as i64 - 1) as u32
}

/// Advances a droplet by one step, mutating the terrain it crossed.
///
/// The step follows the droplet model: accelerate along the surface normal's
/// horizontal components, integrate position, damp velocity, then exchange
/// sediment with the pre-move cell according to the capacity difference, and
/// finally evaporate. Capacity is clamped at zero, so uphill or stalled
/// droplets pick up nothing.
fn step(field: &mut HeightField, p: &mut Particle, config: &ErosionConfig) -> StepOutcome {
    let dt = config.dt;

    let col0 = cell_of(p.x, field.width);
    let row0 = cell_of(p.y, field.height);
    let normal = field.normal_at(col0, row0);

    // Steeper slope means a larger horizontal normal component, hence more
    // acceleration toward the downhill gradient.
    p.dx += dt * normal.x / (p.volume * config.density);
    p.dy += dt * normal.y / (p.volume * config.density);
    p.x += dt * p.dx;
    p.y += dt * p.dy;
    p.dx *= 1.0 - dt * config.friction;
    p.dy *= 1.0 - dt * config.friction;

    if p.x < 0.0 || p.x >= field.width as f32 || p.y < 0.0 || p.y >= field.height as f32 {
        return StepOutcome::LeftGrid;
    }

    let col1 = cell_of(p.x, field.width);
    let row1 = cell_of(p.y, field.height);
    let h_old = field.get_height(col0, row0);
    let h_new = field.get_height(col1, row1);

    let c_eq = (p.volume * p.speed() * (h_old - h_new)).max(0.0);
    let cdiff = c_eq - p.sediment;

    p.sediment += dt * config.deposition_rate * cdiff;
    let height_delta = -(dt * p.volume * config.deposition_rate * cdiff);
    let idx = field.index(col0, row0);
    field.heights[idx] += height_delta;

    p.volume *= 1.0 - dt * config.evaporation_rate;

    StepOutcome::Flowing { height_delta }
}

/// Runs the hydraulic erosion simulation over the field.
///
/// `config.particles` droplets are spawned at uniformly random vertices
/// (seeded stream) and simulated strictly sequentially, each to termination
/// before the next spawns; every droplet sees the height mutations of its
/// predecessors. Normal lookups read the live heights, and the field's
/// stored normals are refreshed once after the run.
pub fn erode(field: &mut HeightField, config: &ErosionConfig) -> ErosionStats {
    assert!(config.dt > 0.0, "timestep must be positive");
    assert!(config.min_volume > 0.0, "volume threshold must be positive");

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut stats = ErosionStats::default();

    for _ in 0..config.particles {
        let col = rng.random_range(0..field.width);
        let row = rng.random_range(0..field.height);
        let mut particle = Particle::spawn(col as f32, row as f32);
        stats.particles_spawned += 1;

        let mut steps = 0u32;
        loop {
            match step(field, &mut particle, config) {
                StepOutcome::LeftGrid => {
                    stats.particles_left_grid += 1;
                    break;
                }
                StepOutcome::Flowing { height_delta } => {
                    if height_delta < 0.0 {
                        stats.total_eroded += f64::from(-height_delta);
                    } else {
                        stats.total_deposited += f64::from(height_delta);
                    }
                }
            }

            steps += 1;
            if particle.volume < config.min_volume {
                stats.particles_evaporated += 1;
                break;
            }
            if steps >= config.max_steps {
                stats.particles_out_of_steps += 1;
                break;
            }
        }
    }

    field.recompute_normals();
    stats
}
