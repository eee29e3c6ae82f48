//! World grid
//!
//! Owns the tile field for one level: terrain kinds plus the parallel
//! per-tile durability and highlight-timer arrays. The grid generates itself
//! procedurally at construction, answers every collision and geometry query
//! the kinematics need, and is mutated only through the tile-damage API.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use thiserror::Error;

use super::terrain::{GenWeight, TerrainKind};
use crate::consts::{SPAWN_MAX_ATTEMPTS, TILE_FLASH_DURATION, TILE_SIZE};

/// Spawn-search failure
///
/// Exhausting the attempt bound is a configuration error for that spawn
/// request; callers get the failure, never a degraded position.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpawnError {
    #[error("no walkable position found after {attempts} attempts")]
    NoWalkablePosition { attempts: u32 },
}

/// First blocking tile found under a rectangle query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileHit {
    pub col: usize,
    pub row: usize,
    pub durability: i32,
}

/// Pixel-space sub-rectangle for region-limited spawn search
#[derive(Debug, Clone, Copy)]
pub struct Region {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// A fixed-size tile field with parallel per-tile state
///
/// All three arrays are row-major, indexed `row * width + col`.
#[derive(Debug, Clone)]
pub struct WorldGrid {
    width: usize,
    height: usize,
    tile_size: f32,
    kinds: Vec<TerrainKind>,
    /// Remaining hit points; zero for non-destructible kinds
    durability: Vec<i32>,
    /// Damage flash timers, decaying toward zero; read by the render layer
    highlight: Vec<f32>,
}

impl WorldGrid {
    /// Generate a level procedurally
    ///
    /// Each cell draws a uniform sample against the table's cumulative
    /// weights (first match wins, the first entry is the fallback), then may
    /// copy an already-generated left/top neighbor with that neighbor's
    /// `inherit_chance`. The inheritance pass biases the field toward
    /// contiguous clusters without a full noise function.
    pub fn generate(
        width: usize,
        height: usize,
        table: &[GenWeight],
        rng: &mut Pcg32,
    ) -> Self {
        let mut grid = Self::from_fn(width, height, TILE_SIZE, |_, _| TerrainKind::DEFAULT);
        let total: f32 = table.iter().map(|e| e.weight).sum();

        for row in 0..height {
            for col in 0..width {
                let sample = rng.random::<f32>().min(0.9999);
                let mut kind = table
                    .first()
                    .map(|e| e.kind)
                    .unwrap_or(TerrainKind::DEFAULT);
                let mut cumulative = 0.0;
                for entry in table {
                    cumulative += entry.weight / total;
                    if cumulative > sample {
                        kind = entry.kind;
                        break;
                    }
                }

                // Inheritance pass over the already-generated neighbors
                let mut neighbors = [TerrainKind::DEFAULT; 2];
                let mut count = 0;
                if col > 0 {
                    neighbors[count] = grid.kinds[row * width + col - 1];
                    count += 1;
                }
                if row > 0 {
                    neighbors[count] = grid.kinds[(row - 1) * width + col];
                    count += 1;
                }
                if count > 0 {
                    let picked = neighbors[rng.random_range(0..count)];
                    if rng.random::<f32>() < inherit_chance(table, picked) {
                        kind = picked;
                    }
                }

                let idx = row * width + col;
                grid.kinds[idx] = kind;
                grid.durability[idx] = kind.config().max_durability.unwrap_or(0);
            }
        }

        log::debug!("generated {width}x{height} grid");
        grid
    }

    /// Build a grid from an explicit layout (tests, level tooling)
    pub fn from_fn(
        width: usize,
        height: usize,
        tile_size: f32,
        mut kind_at: impl FnMut(usize, usize) -> TerrainKind,
    ) -> Self {
        let mut kinds = Vec::with_capacity(width * height);
        let mut durability = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                let kind = kind_at(col, row);
                kinds.push(kind);
                durability.push(kind.config().max_durability.unwrap_or(0));
            }
        }
        Self {
            width,
            height,
            tile_size,
            kinds,
            durability,
            highlight: vec![0.0; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Grid extent in pixels
    #[inline]
    pub fn pixel_width(&self) -> f32 {
        self.width as f32 * self.tile_size
    }

    #[inline]
    pub fn pixel_height(&self) -> f32 {
        self.height as f32 * self.tile_size
    }

    #[inline]
    fn index(&self, col: usize, row: usize) -> usize {
        row * self.width + col
    }

    #[inline]
    fn in_bounds(&self, col: i64, row: i64) -> bool {
        col >= 0 && row >= 0 && (col as usize) < self.width && (row as usize) < self.height
    }

    pub fn kind_at(&self, col: usize, row: usize) -> Option<TerrainKind> {
        (col < self.width && row < self.height).then(|| self.kinds[self.index(col, row)])
    }

    pub fn durability_at(&self, col: usize, row: usize) -> Option<i32> {
        (col < self.width && row < self.height).then(|| self.durability[self.index(col, row)])
    }

    pub fn highlight_at(&self, col: usize, row: usize) -> Option<f32> {
        (col < self.width && row < self.height).then(|| self.highlight[self.index(col, row)])
    }

    /// Tile-index span overlapped by the half-open pixel interval
    /// `[min, min + len)`; the exclusive end keeps a footprint flush against
    /// a tile boundary out of the next tile.
    fn cell_span(&self, min: f32, len: f32) -> (i64, i64) {
        let lo = (min / self.tile_size).floor() as i64;
        let hi = ((min + len) / self.tile_size).ceil() as i64;
        (lo, hi)
    }

    /// Whether the square footprint `[x, x+size) × [y, y+size)` lies fully on
    /// walkable, in-bounds tiles
    pub fn is_walkable_area(&self, x: f32, y: f32, size: f32) -> bool {
        let (c0, c1) = self.cell_span(x, size);
        let (r0, r1) = self.cell_span(y, size);
        for row in r0..r1 {
            for col in c0..c1 {
                if !self.in_bounds(col, row) {
                    return false;
                }
                if !self.kinds[self.index(col as usize, row as usize)].walkable() {
                    return false;
                }
            }
        }
        true
    }

    /// Whether a rectangle overlaps any blocking tile; the grid bounds are
    /// solid, so a rect leaving the grid on any side collides immediately
    pub fn is_colliding_rect(&self, x: f32, y: f32, w: f32, h: f32) -> bool {
        if x < 0.0 || y < 0.0 || x + w > self.pixel_width() || y + h > self.pixel_height() {
            return true;
        }
        let (c0, c1) = self.cell_span(x, w);
        let (r0, r1) = self.cell_span(y, h);
        for row in r0..r1 {
            for col in c0..c1 {
                if !self.in_bounds(col, row) {
                    return true;
                }
                if !self.kinds[self.index(col as usize, row as usize)].walkable() {
                    return true;
                }
            }
        }
        false
    }

    /// First non-walkable tile overlapped by a square footprint
    ///
    /// Scan order is row-major and the first match wins. Out-of-range cells
    /// are skipped, not reported - unlike `is_colliding_rect`, this query
    /// only ever names a real tile.
    pub fn tile_at_rect(&self, x: f32, y: f32, size: f32) -> Option<TileHit> {
        let (c0, c1) = self.cell_span(x, size);
        let (r0, r1) = self.cell_span(y, size);
        for row in r0..r1 {
            for col in c0..c1 {
                if !self.in_bounds(col, row) {
                    continue;
                }
                let (col, row) = (col as usize, row as usize);
                let idx = self.index(col, row);
                if !self.kinds[idx].walkable() {
                    return Some(TileHit {
                        col,
                        row,
                        durability: self.durability[idx],
                    });
                }
            }
        }
        None
    }

    /// Speed factor of the tile containing a point; neutral (1.0) outside
    /// the grid
    pub fn speed_factor_at(&self, x: f32, y: f32) -> f32 {
        let col = (x / self.tile_size).floor() as i64;
        let row = (y / self.tile_size).floor() as i64;
        if !self.in_bounds(col, row) {
            return 1.0;
        }
        self.kinds[self.index(col as usize, row as usize)]
            .config()
            .speed_factor
    }

    /// Apply damage to one tile
    ///
    /// No-op for out-of-range indices, indestructible terrain, or kinds with
    /// no durability. A tile worn to zero converts to the default kind; the
    /// conversion is one-way.
    pub fn damage_tile(&mut self, col: usize, row: usize, amount: i32) {
        if col >= self.width || row >= self.height {
            return;
        }
        let idx = self.index(col, row);
        let config = self.kinds[idx].config();
        if !config.destructible || config.max_durability.is_none() {
            return;
        }
        self.durability[idx] -= amount;
        self.highlight[idx] = TILE_FLASH_DURATION;
        if self.durability[idx] <= 0 {
            self.durability[idx] = 0;
            self.kinds[idx] = TerrainKind::DEFAULT;
            log::debug!("tile ({col},{row}) broke");
        }
    }

    /// Instantly convert a destructible tile to the default kind
    pub fn break_tile(&mut self, col: usize, row: usize) {
        if col >= self.width || row >= self.height {
            return;
        }
        let idx = self.index(col, row);
        if !self.kinds[idx].config().destructible {
            return;
        }
        self.durability[idx] = 0;
        self.kinds[idx] = TerrainKind::DEFAULT;
        self.highlight[idx] = TILE_FLASH_DURATION;
    }

    /// Decay every damage flash toward zero; called once per tick
    pub fn decay_highlights(&mut self, dt: f32) {
        for timer in &mut self.highlight {
            *timer = (*timer - dt).max(0.0);
        }
    }

    /// Sample a random position whose footprint is fully walkable
    ///
    /// Bounded retry inside the grid or the caller's sub-rectangle.
    pub fn find_walkable_position(
        &self,
        region: Option<Region>,
        size: f32,
        rng: &mut Pcg32,
    ) -> Result<Vec2, SpawnError> {
        let (min_x, min_y, max_x, max_y) = match region {
            Some(r) => (r.x, r.y, r.x + r.w - size, r.y + r.h - size),
            None => (
                0.0,
                0.0,
                self.pixel_width() - size,
                self.pixel_height() - size,
            ),
        };
        for _ in 0..SPAWN_MAX_ATTEMPTS {
            let x = if max_x > min_x {
                rng.random_range(min_x..max_x)
            } else {
                min_x
            };
            let y = if max_y > min_y {
                rng.random_range(min_y..max_y)
            } else {
                min_y
            };
            if self.is_walkable_area(x, y, size) {
                return Ok(Vec2::new(x, y));
            }
        }
        Err(SpawnError::NoWalkablePosition {
            attempts: SPAWN_MAX_ATTEMPTS,
        })
    }
}

fn inherit_chance(table: &[GenWeight], kind: TerrainKind) -> f32 {
    table
        .iter()
        .find(|e| e.kind == kind)
        .map(|e| e.inherit_chance)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::terrain::DEFAULT_GEN_TABLE;
    use proptest::prelude::*;
    use rand::SeedableRng;

    const TS: f32 = 32.0;

    fn open_grid(width: usize, height: usize) -> WorldGrid {
        WorldGrid::from_fn(width, height, TS, |_, _| TerrainKind::Floor)
    }

    /// 3x3 grid that is all wall except the center cell
    fn donut_grid() -> WorldGrid {
        WorldGrid::from_fn(3, 3, TS, |col, row| {
            if col == 1 && row == 1 {
                TerrainKind::Floor
            } else {
                TerrainKind::Wall
            }
        })
    }

    #[test]
    fn generation_is_deterministic_per_seed() {
        let mut rng_a = Pcg32::seed_from_u64(77);
        let mut rng_b = Pcg32::seed_from_u64(77);
        let a = WorldGrid::generate(20, 15, DEFAULT_GEN_TABLE, &mut rng_a);
        let b = WorldGrid::generate(20, 15, DEFAULT_GEN_TABLE, &mut rng_b);
        for row in 0..15 {
            for col in 0..20 {
                assert_eq!(a.kind_at(col, row), b.kind_at(col, row));
            }
        }
    }

    #[test]
    fn walkable_area_respects_half_open_footprint() {
        let grid = WorldGrid::from_fn(2, 1, TS, |col, _| {
            if col == 0 {
                TerrainKind::Floor
            } else {
                TerrainKind::Wall
            }
        });
        // Footprint flush against the wall tile's left edge does not touch it
        assert!(grid.is_walkable_area(0.0, 0.0, TS));
        assert!(!grid.is_walkable_area(0.1, 0.0, TS));
    }

    #[test]
    fn queries_outside_bounds_are_definite() {
        let grid = open_grid(4, 4);
        assert!(!grid.is_walkable_area(-1.0, 0.0, 8.0));
        assert!(!grid.is_walkable_area(0.0, grid.pixel_height() - 4.0, 8.0));
        assert!(grid.is_colliding_rect(-1.0, 0.0, 8.0, 8.0));
        assert!(grid.is_colliding_rect(grid.pixel_width() - 4.0, 0.0, 8.0, 8.0));
        assert!(!grid.is_colliding_rect(8.0, 8.0, 8.0, 8.0));
    }

    #[test]
    fn speed_factor_is_neutral_outside_the_grid() {
        let grid = WorldGrid::from_fn(2, 2, TS, |_, _| TerrainKind::Mud);
        assert_eq!(grid.speed_factor_at(16.0, 16.0), 0.45);
        assert_eq!(grid.speed_factor_at(-5.0, 16.0), 1.0);
        assert_eq!(grid.speed_factor_at(16.0, 1000.0), 1.0);
    }

    #[test]
    fn tile_at_rect_returns_first_in_scan_order() {
        // Two blocking tiles side by side; the row-major scan finds the
        // left one first
        let grid = WorldGrid::from_fn(3, 2, TS, |_, row| {
            if row == 1 {
                TerrainKind::Wall
            } else {
                TerrainKind::Floor
            }
        });
        let hit = grid
            .tile_at_rect(10.0, 40.0, 50.0)
            .expect("footprint overlaps the wall row");
        assert_eq!((hit.col, hit.row), (0, 1));
    }

    #[test]
    fn tile_at_rect_skips_out_of_range_cells() {
        let grid = donut_grid();
        // Footprint straddling the left edge: the out-of-range column is
        // skipped and the in-range wall reported
        let hit = grid.tile_at_rect(-10.0, 4.0, 20.0).expect("wall at (0,0)");
        assert_eq!((hit.col, hit.row), (0, 0));
        // Fully outside: nothing to report
        assert!(grid.tile_at_rect(-100.0, -100.0, 20.0).is_none());
    }

    #[test]
    fn damage_wears_a_mineral_down_to_floor() {
        let mut grid = WorldGrid::from_fn(1, 1, TS, |_, _| TerrainKind::Mineral);
        grid.damage_tile(0, 0, 40);
        assert_eq!(grid.durability_at(0, 0), Some(60));
        grid.damage_tile(0, 0, 40);
        assert_eq!(grid.durability_at(0, 0), Some(20));
        grid.damage_tile(0, 0, 40);
        // Clamped at zero, never negative, and converted to the default kind
        assert_eq!(grid.durability_at(0, 0), Some(0));
        assert_eq!(grid.kind_at(0, 0), Some(TerrainKind::Floor));
        // Further damage is a no-op on the converted tile
        grid.damage_tile(0, 0, 40);
        assert_eq!(grid.durability_at(0, 0), Some(0));
        assert_eq!(grid.kind_at(0, 0), Some(TerrainKind::Floor));
    }

    #[test]
    fn damage_is_monotonic_and_sets_highlight() {
        let mut grid = WorldGrid::from_fn(1, 1, TS, |_, _| TerrainKind::Mineral);
        let mut last = grid.durability_at(0, 0).unwrap();
        for _ in 0..10 {
            grid.damage_tile(0, 0, 15);
            let now = grid.durability_at(0, 0).unwrap();
            assert!(now <= last);
            last = now;
        }
        assert!(grid.highlight_at(0, 0).unwrap() > 0.0);
        grid.decay_highlights(10.0);
        assert_eq!(grid.highlight_at(0, 0), Some(0.0));
    }

    #[test]
    fn damage_ignores_walls_and_bad_indices() {
        let mut grid = WorldGrid::from_fn(2, 1, TS, |col, _| {
            if col == 0 {
                TerrainKind::Wall
            } else {
                TerrainKind::Floor
            }
        });
        grid.damage_tile(0, 0, 50);
        assert_eq!(grid.kind_at(0, 0), Some(TerrainKind::Wall));
        // Out of range: silently ignored
        grid.damage_tile(99, 99, 50);
        grid.break_tile(99, 99);
    }

    #[test]
    fn break_tile_is_instant_and_one_way() {
        let mut grid = WorldGrid::from_fn(1, 1, TS, |_, _| TerrainKind::Mineral);
        grid.break_tile(0, 0);
        assert_eq!(grid.kind_at(0, 0), Some(TerrainKind::Floor));
        assert_eq!(grid.durability_at(0, 0), Some(0));
        // Walls are not destructible, break is a no-op
        let mut walls = WorldGrid::from_fn(1, 1, TS, |_, _| TerrainKind::Wall);
        walls.break_tile(0, 0);
        assert_eq!(walls.kind_at(0, 0), Some(TerrainKind::Wall));
    }

    #[test]
    fn spawn_search_finds_the_only_open_cell() {
        let grid = donut_grid();
        let mut rng = Pcg32::seed_from_u64(5);
        let pos = grid
            .find_walkable_position(None, 16.0, &mut rng)
            .expect("a 16px footprint fits the center cell");
        // The only walkable placements sit inside the center tile
        assert!(pos.x >= TS && pos.x + 16.0 <= 2.0 * TS);
        assert!(pos.y >= TS && pos.y + 16.0 <= 2.0 * TS);
    }

    #[test]
    fn spawn_search_fails_when_nothing_fits() {
        let grid = donut_grid();
        let mut rng = Pcg32::seed_from_u64(5);
        // A footprint wider than a tile cannot fit the single open cell
        let err = grid
            .find_walkable_position(None, TS + 1.0, &mut rng)
            .unwrap_err();
        assert_eq!(
            err,
            SpawnError::NoWalkablePosition { attempts: SPAWN_MAX_ATTEMPTS }
        );
    }

    #[test]
    fn spawn_search_honors_the_region() {
        let grid = open_grid(8, 8);
        let region = Region { x: 64.0, y: 64.0, w: 64.0, h: 64.0 };
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..20 {
            let pos = grid
                .find_walkable_position(Some(region), 10.0, &mut rng)
                .expect("open grid");
            assert!(pos.x >= region.x && pos.x + 10.0 <= region.x + region.w);
            assert!(pos.y >= region.y && pos.y + 10.0 <= region.y + region.h);
        }
    }

    proptest! {
        #[test]
        fn generated_cells_follow_the_catalog(
            seed in 0u64..512,
            width in 1usize..32,
            height in 1usize..32,
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let grid = WorldGrid::generate(width, height, DEFAULT_GEN_TABLE, &mut rng);
            for row in 0..height {
                for col in 0..width {
                    let kind = grid.kind_at(col, row).unwrap();
                    let durability = grid.durability_at(col, row).unwrap();
                    prop_assert!(durability >= 0);
                    prop_assert_eq!(
                        durability,
                        kind.config().max_durability.unwrap_or(0)
                    );
                }
            }
        }

        #[test]
        fn footprints_touching_the_outside_never_pass(
            x in -200.0f32..400.0,
            y in -200.0f32..400.0,
        ) {
            let grid = open_grid(4, 4);
            let size = 10.0;
            let outside = x < 0.0
                || y < 0.0
                || x + size > grid.pixel_width()
                || y + size > grid.pixel_height();
            if outside {
                prop_assert!(!grid.is_walkable_area(x, y, size));
                prop_assert!(grid.is_colliding_rect(x, y, size, size));
            } else {
                prop_assert!(grid.is_walkable_area(x, y, size));
                prop_assert!(!grid.is_colliding_rect(x, y, size, size));
            }
        }
    }
}
