//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod actor;
pub mod grid;
pub mod projectile;
pub mod state;
pub mod terrain;
pub mod tick;

pub use actor::{ActorBody, ActorInput, InputTrace, MotionState, RotationStrategy};
pub use grid::{Region, SpawnError, TileHit, WorldGrid};
pub use projectile::Projectile;
pub use state::{GameState, Pickup, PickupKind};
pub use terrain::{DEFAULT_GEN_TABLE, GenWeight, TerrainConfig, TerrainKind};
pub use tick::{TickInput, tick};
