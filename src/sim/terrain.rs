//! Terrain catalog
//!
//! Maps each terrain kind to its static physical properties. The catalog is a
//! closed enum resolved by `match`, so lookups are O(1) and every grid cell is
//! guaranteed to name a valid kind.

use serde::{Deserialize, Serialize};

/// Terrain kinds a tile can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TerrainKind {
    /// Open ground, full speed
    #[default]
    Floor,
    /// Loose ground that slows movement
    Sand,
    /// Waterlogged ground, slowest walkable terrain
    Mud,
    /// Solid rock, impassable and permanent
    Wall,
    /// Ore cluster, impassable until shot out
    Mineral,
}

/// Physical properties of one terrain kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainConfig {
    /// Whether a footprint may occupy the tile
    pub walkable: bool,
    /// Multiplier on an actor's target speed while standing on the tile.
    /// Impassable kinds keep a nominal 0.0; passability is governed solely
    /// by `walkable`.
    pub speed_factor: f32,
    /// Whether projectile damage wears the tile down
    pub destructible: bool,
    /// Hit points for destructible kinds
    pub max_durability: Option<i32>,
}

const FLOOR: TerrainConfig = TerrainConfig {
    walkable: true,
    speed_factor: 1.0,
    destructible: false,
    max_durability: None,
};

const SAND: TerrainConfig = TerrainConfig {
    walkable: true,
    speed_factor: 0.65,
    destructible: false,
    max_durability: None,
};

const MUD: TerrainConfig = TerrainConfig {
    walkable: true,
    speed_factor: 0.45,
    destructible: false,
    max_durability: None,
};

const WALL: TerrainConfig = TerrainConfig {
    walkable: false,
    speed_factor: 0.0,
    destructible: false,
    max_durability: None,
};

const MINERAL: TerrainConfig = TerrainConfig {
    walkable: false,
    speed_factor: 0.0,
    destructible: true,
    max_durability: Some(100),
};

impl TerrainKind {
    /// Kind a destroyed tile converts to
    pub const DEFAULT: TerrainKind = TerrainKind::Floor;

    /// Static property lookup
    pub const fn config(self) -> &'static TerrainConfig {
        match self {
            TerrainKind::Floor => &FLOOR,
            TerrainKind::Sand => &SAND,
            TerrainKind::Mud => &MUD,
            TerrainKind::Wall => &WALL,
            TerrainKind::Mineral => &MINERAL,
        }
    }

    #[inline]
    pub fn walkable(self) -> bool {
        self.config().walkable
    }
}

/// One entry of the world-generation table
///
/// `weight` is relative probability mass; the table need not sum to 1.
/// `inherit_chance` is the chance a neighboring cell copies this kind during
/// the clustering pass.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GenWeight {
    pub kind: TerrainKind,
    pub weight: f32,
    pub inherit_chance: f32,
}

/// Default generation table; the first entry doubles as the fallback kind
pub const DEFAULT_GEN_TABLE: &[GenWeight] = &[
    GenWeight { kind: TerrainKind::Floor, weight: 0.58, inherit_chance: 0.30 },
    GenWeight { kind: TerrainKind::Sand, weight: 0.12, inherit_chance: 0.55 },
    GenWeight { kind: TerrainKind::Mud, weight: 0.06, inherit_chance: 0.50 },
    GenWeight { kind: TerrainKind::Wall, weight: 0.14, inherit_chance: 0.62 },
    GenWeight { kind: TerrainKind::Mineral, weight: 0.10, inherit_chance: 0.68 },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walkable_kinds_have_positive_speed() {
        for kind in [TerrainKind::Floor, TerrainKind::Sand, TerrainKind::Mud] {
            assert!(kind.walkable());
            assert!(kind.config().speed_factor > 0.0);
        }
    }

    #[test]
    fn blocking_kinds_are_not_walkable() {
        assert!(!TerrainKind::Wall.walkable());
        assert!(!TerrainKind::Mineral.walkable());
    }

    #[test]
    fn only_mineral_is_destructible() {
        for kind in [
            TerrainKind::Floor,
            TerrainKind::Sand,
            TerrainKind::Mud,
            TerrainKind::Wall,
        ] {
            assert!(!kind.config().destructible);
        }
        let mineral = TerrainKind::Mineral.config();
        assert!(mineral.destructible);
        assert_eq!(mineral.max_durability, Some(100));
    }

    #[test]
    fn default_kind_is_open_ground() {
        let config = TerrainKind::DEFAULT.config();
        assert!(config.walkable);
        assert!(!config.destructible);
    }

    #[test]
    fn gen_table_leads_with_the_fallback_kind() {
        assert_eq!(DEFAULT_GEN_TABLE[0].kind, TerrainKind::DEFAULT);
    }
}
