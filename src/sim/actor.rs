//! Actor kinematics
//!
//! Per-tick motion for a walking body: a non-linear acceleration blend toward
//! the input direction, eased heading with a reversal tie-break, and
//! axis-independent sliding against the tile grid. Every step is a total
//! function of its inputs; nothing in here can fail.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::WorldGrid;
use crate::consts::{
    HEADING_SPEED_EPSILON, INPUT_TRACE_DECAY, INPUT_TRACE_LENGTH, LOOK_EPSILON, MOTION_EPSILON,
    REVERSAL_EPSILON, VELOCITY_SNAP,
};
use crate::normalize_angle;
use crate::tuning::ActorTuning;

/// Rule for resolving a heading change of exactly ±π, where the turn
/// direction is ambiguous
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RotationStrategy {
    /// Always turn through +π
    Clockwise,
    /// Always turn through -π
    CounterClockwise,
    /// Coin flip per occurrence
    #[default]
    Auto,
}

/// Cosmetic label derived from the kinematic state; not a state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    Idle,
    Moving,
    Shooting,
}

/// Bounded history of movement inputs, newest first, weighted by an
/// exponential decay; animation layers read the smoothed direction
#[derive(Debug, Clone, Default)]
pub struct InputTrace {
    samples: Vec<Vec2>,
}

impl InputTrace {
    /// Record one tick's movement direction
    pub fn record(&mut self, dir: Vec2) {
        self.samples.insert(0, dir);
        if self.samples.len() > INPUT_TRACE_LENGTH {
            let _ = self.samples.pop();
        }
    }

    /// Decay-weighted average of recent inputs
    pub fn weighted_dir(&self) -> Vec2 {
        let mut sum = Vec2::ZERO;
        let mut weight = 1.0;
        let mut total = 0.0;
        for dir in &self.samples {
            sum += *dir * weight;
            total += weight;
            weight *= INPUT_TRACE_DECAY;
        }
        if total > 0.0 { sum / total } else { Vec2::ZERO }
    }
}

/// Per-tick intent for one actor, pre-normalized by the input layer
#[derive(Debug, Clone, Copy, Default)]
pub struct ActorInput {
    /// Unit movement direction, or zero to coast to rest
    pub move_dir: Vec2,
    /// Unit aim direction, or zero to face the direction of travel
    pub look_dir: Vec2,
}

/// A walking body with a square footprint
///
/// `pos` is the top-left corner of the footprint; `heading` stays in
/// (-π, π].
#[derive(Debug, Clone)]
pub struct ActorBody {
    pub pos: Vec2,
    pub size: f32,
    pub vel: Vec2,
    pub heading: f32,
    pub tuning: ActorTuning,
    pub rotation_strategy: RotationStrategy,
    pub trace: InputTrace,
}

impl ActorBody {
    pub fn new(
        pos: Vec2,
        size: f32,
        tuning: ActorTuning,
        rotation_strategy: RotationStrategy,
    ) -> Self {
        Self {
            pos,
            size,
            vel: Vec2::ZERO,
            heading: 0.0,
            tuning,
            rotation_strategy,
            trace: InputTrace::default(),
        }
    }

    /// Footprint center in pixels
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }

    /// Smoothed recent movement direction, for animation layers
    pub fn smoothed_dir(&self) -> Vec2 {
        self.trace.weighted_dir()
    }

    /// Cosmetic state derived from velocity and the fire flag
    pub fn motion_state(&self, firing: bool) -> MotionState {
        if firing {
            MotionState::Shooting
        } else if self.vel.length() > HEADING_SPEED_EPSILON {
            MotionState::Moving
        } else {
            MotionState::Idle
        }
    }

    /// Advance one fixed timestep
    pub fn update(&mut self, dt: f32, input: &ActorInput, grid: &WorldGrid, rng: &mut Pcg32) {
        self.trace.record(input.move_dir);

        // Defensive clamp into the grid, independent of tile collision
        let max_x = (grid.pixel_width() - self.size).max(0.0);
        let max_y = (grid.pixel_height() - self.size).max(0.0);
        self.pos.x = self.pos.x.clamp(0.0, max_x);
        self.pos.y = self.pos.y.clamp(0.0, max_y);

        self.blend_velocity(dt, input.move_dir, grid);
        self.turn_heading(dt, input, rng);
        self.slide(dt, grid);
    }

    /// Non-linear velocity blend: ease-in while accelerating, ease-out while
    /// coasting to rest
    fn blend_velocity(&mut self, dt: f32, move_dir: Vec2, grid: &WorldGrid) {
        let center = self.center();
        let factor = grid.speed_factor_at(center.x, center.y);
        let target = move_dir * self.tuning.max_speed * factor;

        let diff = target - self.vel;
        if diff.length_squared() > 0.0 {
            let has_input = move_dir != Vec2::ZERO;
            let rate = if has_input {
                self.tuning.accel
            } else {
                self.tuning.decel
            };
            let target_speed = target.length();
            let speed_ratio = if target_speed > 0.0 {
                self.vel.length() / target_speed
            } else {
                0.0
            };
            let max_delta = if has_input {
                rate * dt * (speed_ratio + self.tuning.nonlinear_factor).sqrt()
            } else {
                rate * dt * (1.0 - speed_ratio + self.tuning.nonlinear_factor).sqrt()
            };
            self.vel += diff.clamp_length_max(max_delta);
        }

        // Snap to rest instead of decaying asymptotically forever
        if self.vel.length() < VELOCITY_SNAP {
            self.vel = Vec2::ZERO;
        }
    }

    /// Ease the heading toward the aim direction, or the travel direction
    /// when there is no aim input
    fn turn_heading(&mut self, dt: f32, input: &ActorInput, rng: &mut Pcg32) {
        use std::f32::consts::PI;

        let target = if input.look_dir.length() > LOOK_EPSILON {
            input.look_dir.y.atan2(input.look_dir.x)
        } else if self.vel.length() > HEADING_SPEED_EPSILON {
            self.vel.y.atan2(self.vel.x)
        } else {
            return;
        };

        let mut diff = normalize_angle(target - self.heading);
        // A direct reversal is ambiguous; the strategy picks the turn side
        if (diff.abs() - PI).abs() < REVERSAL_EPSILON {
            diff = match self.rotation_strategy {
                RotationStrategy::Clockwise => PI,
                RotationStrategy::CounterClockwise => -PI,
                RotationStrategy::Auto => {
                    if rng.random_bool(0.5) {
                        PI
                    } else {
                        -PI
                    }
                }
            };
        }

        let max_step = self.tuning.rotation_speed * dt;
        self.heading = normalize_angle(self.heading + diff.clamp(-max_step, max_step));
    }

    /// Per-axis collision resolution; motion along an unobstructed axis
    /// continues even when the other axis is blocked
    fn slide(&mut self, dt: f32, grid: &WorldGrid) {
        if self.vel.x.abs() > MOTION_EPSILON {
            let new_x = self.pos.x + self.vel.x * dt;
            if grid.is_colliding_rect(new_x, self.pos.y, self.size, self.size) {
                self.vel.x = 0.0;
            } else {
                self.pos.x = new_x;
            }
        }
        if self.vel.y.abs() > MOTION_EPSILON {
            let new_y = self.pos.y + self.vel.y * dt;
            if grid.is_colliding_rect(self.pos.x, new_y, self.size, self.size) {
                self.vel.y = 0.0;
            } else {
                self.pos.y = new_y;
            }
        }
    }
}
