//! Level state
//!
//! The owning aggregate for one level: the world grid plus every body moving
//! through it. Construction seeds the RNG, generates the grid, and places the
//! player and the initial pickups through the spawn search.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::actor::{ActorBody, RotationStrategy};
use super::grid::{SpawnError, WorldGrid};
use super::projectile::Projectile;
use super::terrain::DEFAULT_GEN_TABLE;
use crate::consts::{ACTOR_SIZE, PICKUP_SIZE, PROJECTILE_SIZE};
use crate::tuning::Tuning;

/// What a pickup grants when collected; interpreted by the scene layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupKind {
    Repair,
    Ammo,
    Boost,
}

/// A collectible lying on the ground
#[derive(Debug, Clone)]
pub struct Pickup {
    pub pos: Vec2,
    pub size: f32,
    pub kind: PickupKind,
}

/// Complete simulation state for one level
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// The only source of randomness in the core
    pub rng: Pcg32,
    pub grid: WorldGrid,
    pub player: ActorBody,
    pub projectiles: Vec<Projectile>,
    pub pickups: Vec<Pickup>,
    /// Ticks until the player may fire again
    pub fire_cooldown: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub tuning: Tuning,
}

impl GameState {
    /// Build a level from a seed
    ///
    /// Fails only when the spawn search cannot place a body - a level
    /// configuration error the caller must surface, not paper over.
    pub fn new(seed: u64, tuning: Tuning) -> Result<Self, SpawnError> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let grid = WorldGrid::generate(
            tuning.world.width,
            tuning.world.height,
            DEFAULT_GEN_TABLE,
            &mut rng,
        );

        let spawn = grid.find_walkable_position(None, ACTOR_SIZE, &mut rng)?;
        let player = ActorBody::new(spawn, ACTOR_SIZE, tuning.actor, RotationStrategy::Auto);

        let mut pickups = Vec::with_capacity(tuning.world.pickup_count);
        for i in 0..tuning.world.pickup_count {
            let pos = grid.find_walkable_position(None, PICKUP_SIZE, &mut rng)?;
            let kind = match i % 3 {
                0 => PickupKind::Repair,
                1 => PickupKind::Ammo,
                _ => PickupKind::Boost,
            };
            pickups.push(Pickup { pos, size: PICKUP_SIZE, kind });
        }

        log::info!(
            "level ready: {}x{} tiles, player at ({:.0},{:.0}), {} pickups",
            grid.width(),
            grid.height(),
            spawn.x,
            spawn.y,
            pickups.len()
        );

        Ok(Self {
            seed,
            rng,
            grid,
            player,
            projectiles: Vec::new(),
            pickups,
            fire_cooldown: 0,
            time_ticks: 0,
            tuning,
        })
    }

    /// Spawn a shot from the player's muzzle along its heading
    pub fn spawn_projectile(&mut self) {
        let dir = Vec2::new(self.player.heading.cos(), self.player.heading.sin());
        let muzzle = self.player.center() + dir * (self.player.size / 2.0);
        self.projectiles.push(Projectile::new(
            muzzle - Vec2::splat(PROJECTILE_SIZE / 2.0),
            dir * self.tuning.projectile.speed,
            self.tuning.projectile.damage,
        ));
    }
}
