//! Data-driven game balance
//!
//! Everything a designer may want to retune without touching simulation code.
//! The driver can deserialize a `Tuning` blob from JSON and hand it to
//! `GameState::new`; structural constants that are not meant to be tuned at
//! runtime stay in `crate::consts`.

use serde::{Deserialize, Serialize};

/// Kinematic constants for an actor body
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorTuning {
    /// Top speed on neutral terrain, pixels per second
    pub max_speed: f32,
    /// Acceleration rate, pixels per second squared
    pub accel: f32,
    /// Deceleration rate, pixels per second squared
    pub decel: f32,
    /// Additive bias inside the square-root easing term
    pub nonlinear_factor: f32,
    /// Maximum turn rate, radians per second
    pub rotation_speed: f32,
}

impl Default for ActorTuning {
    fn default() -> Self {
        Self {
            max_speed: 190.0,
            accel: 620.0,
            decel: 780.0,
            nonlinear_factor: 0.08,
            rotation_speed: 11.0,
        }
    }
}

/// Gameplay tuning for projectiles
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    /// Muzzle speed in pixels per second
    pub speed: f32,
    /// Damage applied to the first tile hit
    pub damage: i32,
    /// Ticks between shots
    pub fire_cooldown_ticks: u32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            speed: 440.0,
            damage: 40,
            fire_cooldown_ticks: 18,
        }
    }
}

/// Level layout tuning
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    /// Level width in tiles
    pub width: usize,
    /// Level height in tiles
    pub height: usize,
    /// Pickups scattered at level start
    pub pickup_count: usize,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            width: 48,
            height: 32,
            pickup_count: 6,
        }
    }
}

/// Complete tuning blob for one level
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub actor: ActorTuning,
    pub projectile: ProjectileTuning,
    pub world: WorldTuning,
}
