//! Dungeon Horde - deterministic simulation core for a top-down survival game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (world chunks, combat, spawning, progression)
//! - `settings`: Data-driven world and pacing configuration
//! - `sprites`: Optional sprite lookup capability with procedural fallbacks

pub mod settings;
pub mod sim;
pub mod sprites;

pub use settings::Settings;
pub use sim::{CharacterId, Simulation, StateSnapshot, TickInput};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 14.0;
    pub const PLAYER_SPEED: f32 = 150.0;
    /// Invulnerability window after taking contact damage (seconds)
    pub const INVULNERABILITY_SECS: f32 = 0.5;
    /// Distance the player is shoved away from an enemy on contact
    pub const KNOCKBACK_DISTANCE: f32 = 24.0;

    /// Pickups
    pub const MAGNET_RADIUS: f32 = 100.0;
    pub const COLLECT_RADIUS: f32 = 20.0;
    /// Max hp gained per level
    pub const LEVEL_UP_MAX_HP: u32 = 10;
    /// Fraction of max hp restored on level up
    pub const LEVEL_UP_HEAL_FRACTION: f32 = 0.25;
    /// Hp restored by a health drop
    pub const HEALTH_PICKUP_VALUE: u32 = 20;

    /// Spawning
    pub const BOSS_WAVE_INTERVAL: u32 = 5;
    /// Distance outside the viewport edge where enemies appear
    pub const SPAWN_MARGIN: f32 = 60.0;
    /// Enemies farther than this from the player are despawned
    pub const ENEMY_CULL_RADIUS: f32 = 1400.0;

    /// Projectiles outside the camera box grown by this margin are dropped
    pub const PROJECTILE_CULL_MARGIN: f32 = 200.0;

    /// Particles
    pub const MAX_PARTICLES: usize = 256;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Cheap deterministic hash used for visual-only jitter (never gameplay)
#[inline]
pub fn jitter_hash(seed: u32, salt: u32) -> u32 {
    seed.wrapping_mul(2654435761).wrapping_add(salt.wrapping_mul(7919))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_wraps() {
        assert!((normalize_angle(2.5 * PI) - 0.5 * PI).abs() < 1e-4);
        assert!((normalize_angle(-2.5 * PI) - (-0.5 * PI)).abs() < 1e-4);
        assert!((normalize_angle(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_polar_to_cartesian() {
        let p = polar_to_cartesian(10.0, PI / 2.0);
        assert!(p.x.abs() < 1e-4);
        assert!((p.y - 10.0).abs() < 1e-4);
    }
}
