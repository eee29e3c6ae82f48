//! Fixed timestep simulation tick
//!
//! One call advances the whole level deterministically. Order within a tick
//! is fixed and must stay fixed: actor motion, fire resolution, projectile
//! motion (the only phase that damages tiles), pickup collection, highlight
//! decay.

use glam::Vec2;

use super::actor::ActorInput;
use super::state::GameState;

/// Input commands for a single tick, pre-normalized by the input layer
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Unit movement direction, or zero
    pub move_dir: Vec2,
    /// Unit aim direction, or zero
    pub look_dir: Vec2,
    /// Fire request; gated by the cooldown
    pub fire: bool,
}

/// Advance the level by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;

    // Actor motion; the grid is only read here
    let actor_input = ActorInput {
        move_dir: input.move_dir,
        look_dir: input.look_dir,
    };
    state
        .player
        .update(dt, &actor_input, &state.grid, &mut state.rng);

    // Fire resolution
    if state.fire_cooldown > 0 {
        state.fire_cooldown -= 1;
    }
    if input.fire && state.fire_cooldown == 0 {
        state.spawn_projectile();
        state.fire_cooldown = state.tuning.projectile.fire_cooldown_ticks;
    }

    // Projectiles fly and may wear tiles down
    for projectile in &mut state.projectiles {
        projectile.update(dt, &mut state.grid);
    }
    state.projectiles.retain(|p| p.alive);

    // Pickup collection by footprint overlap
    let player_min = state.player.pos;
    let player_max = state.player.pos + Vec2::splat(state.player.size);
    state.pickups.retain(|pickup| {
        let collected = pickup.pos.x < player_max.x
            && pickup.pos.x + pickup.size > player_min.x
            && pickup.pos.y < player_max.y
            && pickup.pos.y + pickup.size > player_min.y;
        if collected {
            log::debug!("pickup collected: {:?}", pickup.kind);
        }
        !collected
    });

    state.grid.decay_highlights(dt);
}
