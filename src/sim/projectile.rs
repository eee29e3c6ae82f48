//! Projectile kinematics
//!
//! A ballistic body that flies in a straight line until it hits a blocking
//! tile (damaging it) or leaves the grid. Collision is single-step: only the
//! tick's candidate position is tested, with no sweep in between, so a shot
//! displacing more than a tile per tick can pass through a one-tile obstacle.

use glam::Vec2;

use super::grid::WorldGrid;
use crate::consts::PROJECTILE_SIZE;

/// A fired shot
///
/// `pos` is the top-left corner of the square footprint. Once `alive` is
/// false the body is inert; owners stop updating it and may reclaim it.
#[derive(Debug, Clone)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub damage: i32,
    pub alive: bool,
}

impl Projectile {
    pub fn new(pos: Vec2, vel: Vec2, damage: i32) -> Self {
        Self {
            pos,
            vel,
            size: PROJECTILE_SIZE,
            damage,
            alive: true,
        }
    }

    /// Advance one fixed timestep
    ///
    /// On impact the shot is consumed where it stands; the position is not
    /// advanced into the tile.
    pub fn update(&mut self, dt: f32, grid: &mut WorldGrid) {
        if !self.alive {
            return;
        }

        let next = self.pos + self.vel * dt;

        if let Some(hit) = grid.tile_at_rect(next.x, next.y, self.size) {
            grid.damage_tile(hit.col, hit.row, self.damage);
            self.alive = false;
            return;
        }

        let outside = next.x + self.size <= 0.0
            || next.y + self.size <= 0.0
            || next.x >= grid.pixel_width()
            || next.y >= grid.pixel_height();
        if outside {
            self.alive = false;
            return;
        }

        self.pos = next;
    }
}
