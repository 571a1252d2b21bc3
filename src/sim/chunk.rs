//! Procedural chunk generation
//!
//! A chunk is a square grid of floor tiles plus the decorations scattered on
//! top of it. Generation is a pure function of `(world_seed, coord)`: the
//! same coordinate always yields the same tiles and decoration layout, no
//! matter which chunks were generated before it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::rng::Prng;

/// Decorations never get closer than this to each other
pub const DECORATION_PADDING: f32 = 8.0;
/// Decoration count range per chunk (inclusive)
pub const DECORATIONS_PER_CHUNK: (u32, u32) = (8, 16);
/// Rare tile clusters per chunk (inclusive)
pub const TILE_CLUSTERS: (u32, u32) = (1, 3);
/// Rare tile cluster radius range, in tiles
pub const TILE_CLUSTER_RADIUS: (f32, f32) = (1.5, 4.0);

/// Integer chunk coordinate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chunk containing a world position
    #[inline]
    pub fn from_world(pos: Vec2, chunk_world_size: f32) -> Self {
        Self {
            x: (pos.x / chunk_world_size).floor() as i32,
            y: (pos.y / chunk_world_size).floor() as i32,
        }
    }

    /// Chebyshev (king move) distance in chunks
    #[inline]
    pub fn chebyshev(self, other: ChunkCoord) -> u32 {
        (self.x - other.x).unsigned_abs().max((self.y - other.y).unsigned_abs())
    }

    /// World position of this chunk's top-left corner
    #[inline]
    pub fn origin(self, chunk_world_size: f32) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32) * chunk_world_size
    }
}

/// Floor tile variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    Floor,
    FloorCracked,
    FloorTiled,
    Wet,
    Moss,
}

/// Base tile weights; plain floors dominate
pub const TILE_WEIGHTS: [(Tile, u32); 5] = [
    (Tile::Floor, 50),
    (Tile::FloorCracked, 20),
    (Tile::FloorTiled, 20),
    (Tile::Wet, 5),
    (Tile::Moss, 5),
];

impl Tile {
    pub fn is_rare(self) -> bool {
        matches!(self, Tile::Wet | Tile::Moss)
    }
}

/// Decoration kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecorationKind {
    Pillar,
    Crate,
    Barrel,
    Urn,
    Bones,
    Rubble,
}

pub const DECORATION_WEIGHTS: [(DecorationKind, u32); 6] = [
    (DecorationKind::Pillar, 10),
    (DecorationKind::Crate, 20),
    (DecorationKind::Barrel, 15),
    (DecorationKind::Urn, 15),
    (DecorationKind::Bones, 20),
    (DecorationKind::Rubble, 20),
];

/// Static description of a decoration kind
#[derive(Debug, Clone, Copy)]
pub struct DecorationProfile {
    pub size: Vec2,
    /// 0 = indestructible
    pub max_hp: f32,
    pub collidable: bool,
    pub variants: u8,
    pub gold: (u32, u32),
    pub health_chance: f32,
    pub enemy_chance: f32,
}

impl DecorationKind {
    pub fn profile(self) -> DecorationProfile {
        match self {
            DecorationKind::Pillar => DecorationProfile {
                size: Vec2::new(32.0, 32.0),
                max_hp: 0.0,
                collidable: true,
                variants: 2,
                gold: (0, 0),
                health_chance: 0.0,
                enemy_chance: 0.0,
            },
            DecorationKind::Crate => DecorationProfile {
                size: Vec2::new(28.0, 28.0),
                max_hp: 20.0,
                collidable: true,
                variants: 3,
                gold: (1, 3),
                health_chance: 0.05,
                enemy_chance: 0.0,
            },
            DecorationKind::Barrel => DecorationProfile {
                size: Vec2::new(24.0, 24.0),
                max_hp: 15.0,
                collidable: true,
                variants: 2,
                gold: (0, 2),
                health_chance: 0.10,
                enemy_chance: 0.05,
            },
            DecorationKind::Urn => DecorationProfile {
                size: Vec2::new(20.0, 20.0),
                max_hp: 10.0,
                collidable: true,
                variants: 3,
                gold: (1, 5),
                health_chance: 0.15,
                enemy_chance: 0.02,
            },
            DecorationKind::Bones => DecorationProfile {
                size: Vec2::new(24.0, 16.0),
                max_hp: 0.0,
                collidable: false,
                variants: 4,
                gold: (0, 0),
                health_chance: 0.0,
                enemy_chance: 0.0,
            },
            DecorationKind::Rubble => DecorationProfile {
                size: Vec2::new(30.0, 20.0),
                max_hp: 0.0,
                collidable: false,
                variants: 3,
                gold: (0, 0),
                health_chance: 0.0,
                enemy_chance: 0.0,
            },
        }
    }
}

/// Stable decoration identity: owning chunk plus index within it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecorationId {
    pub chunk: ChunkCoord,
    pub index: u16,
}

/// Rewards rolled once when the decoration is generated
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Loot {
    pub gold: u32,
    pub drops_health: bool,
    pub spawns_enemy: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decoration {
    pub id: DecorationId,
    /// Center in world space
    pub pos: Vec2,
    pub kind: DecorationKind,
    pub variant: u8,
    pub hp: f32,
    /// 0 = indestructible
    pub max_hp: f32,
    pub destroyed: bool,
    pub collidable: bool,
    /// Footprint width/height
    pub size: Vec2,
    pub loot: Loot,
}

impl Decoration {
    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size * 0.5)
    }

    #[inline]
    pub fn is_destructible(&self) -> bool {
        self.max_hp > 0.0
    }

    /// Whether this decoration currently blocks movement and shots
    #[inline]
    pub fn blocks(&self) -> bool {
        self.collidable && !self.destroyed
    }
}

/// A generated chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub coord: ChunkCoord,
    /// Tiles per side
    pub size: u32,
    /// Row-major tile grid
    pub tiles: Vec<Tile>,
    pub decorations: Vec<Decoration>,
    /// Host has a rendered tile image for this chunk
    pub render_cached: bool,
}

impl Chunk {
    #[inline]
    pub fn tile(&self, x: u32, y: u32) -> Tile {
        self.tiles[(y * self.size + x) as usize]
    }
}

/// Generate the chunk at `coord`
pub fn generate_chunk(world_seed: u64, coord: ChunkCoord, chunk_size: u32, tile_size: f32) -> Chunk {
    let mut rng = Prng::for_chunk(world_seed, coord);
    let tiles = generate_tiles(&mut rng, chunk_size);
    let decorations = generate_decorations(&mut rng, coord, chunk_size as f32 * tile_size);

    log::debug!(
        "Generated chunk ({}, {}) with {} decorations",
        coord.x,
        coord.y,
        decorations.len()
    );

    Chunk {
        coord,
        size: chunk_size,
        tiles,
        decorations,
        render_cached: false,
    }
}

fn generate_tiles(rng: &mut Prng, size: u32) -> Vec<Tile> {
    let mut tiles: Vec<Tile> = (0..size * size).map(|_| *rng.weighted(&TILE_WEIGHTS)).collect();

    // Overlay a few blobs of a rare variant so they read as patches, not noise
    let clusters = rng.range_u32(TILE_CLUSTERS.0, TILE_CLUSTERS.1);
    for _ in 0..clusters {
        let rare = if rng.chance(0.5) { Tile::Wet } else { Tile::Moss };
        let center = Vec2::new(rng.range_f32(0.0, size as f32), rng.range_f32(0.0, size as f32));
        let radius = rng.range_f32(TILE_CLUSTER_RADIUS.0, TILE_CLUSTER_RADIUS.1);

        for y in 0..size {
            for x in 0..size {
                let cell = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if cell.distance(center) <= radius {
                    tiles[(y * size + x) as usize] = rare;
                }
            }
        }
    }

    tiles
}

fn generate_decorations(rng: &mut Prng, coord: ChunkCoord, chunk_world_size: f32) -> Vec<Decoration> {
    let origin = coord.origin(chunk_world_size);
    let count = rng.range_u32(DECORATIONS_PER_CHUNK.0, DECORATIONS_PER_CHUNK.1);
    let mut placed: Vec<Decoration> = Vec::with_capacity(count as usize);

    for _ in 0..count {
        let kind = *rng.weighted(&DECORATION_WEIGHTS);
        let profile = kind.profile();
        let variant = rng.range_u32(0, profile.variants as u32 - 1) as u8;

        // Keep a footprint-sized margin from the chunk edge
        let pos = origin
            + Vec2::new(
                rng.range_f32(profile.size.x, chunk_world_size - profile.size.x),
                rng.range_f32(profile.size.y, chunk_world_size - profile.size.y),
            );

        let loot = if profile.max_hp > 0.0 {
            Loot {
                gold: rng.range_u32(profile.gold.0, profile.gold.1),
                drops_health: rng.chance(profile.health_chance),
                spawns_enemy: rng.chance(profile.enemy_chance),
            }
        } else {
            Loot::default()
        };

        // Greedy placement: a candidate that crowds an existing one is dropped
        let candidate = Aabb::from_center(pos, profile.size * 0.5).expanded(DECORATION_PADDING);
        if placed.iter().any(|d| candidate.intersects(&d.aabb())) {
            continue;
        }

        placed.push(Decoration {
            id: DecorationId {
                chunk: coord,
                index: placed.len() as u16,
            },
            pos,
            kind,
            variant,
            hp: profile.max_hp,
            max_hp: profile.max_hp,
            destroyed: false,
            collidable: profile.collidable,
            size: profile.size,
            loot,
        });
    }

    placed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_is_deterministic() {
        let a = generate_chunk(1234, ChunkCoord::new(3, -2), 16, 32.0);
        // Unrelated generation in between must not matter
        let _ = generate_chunk(1234, ChunkCoord::new(0, 0), 16, 32.0);
        let b = generate_chunk(1234, ChunkCoord::new(3, -2), 16, 32.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_coords_differ() {
        let a = generate_chunk(1234, ChunkCoord::new(0, 0), 16, 32.0);
        let b = generate_chunk(1234, ChunkCoord::new(1, 0), 16, 32.0);
        assert_ne!(a.tiles, b.tiles);
    }

    #[test]
    fn test_tile_grid_is_full() {
        let chunk = generate_chunk(5, ChunkCoord::new(0, 0), 16, 32.0);
        assert_eq!(chunk.tiles.len(), 256);
        // Clusters guarantee at least one rare tile
        assert!(chunk.tiles.iter().any(|t| t.is_rare()));
    }

    #[test]
    fn test_plain_floors_dominate() {
        let (mut plain, mut total) = (0, 0);
        for x in 0..20 {
            let chunk = generate_chunk(5, ChunkCoord::new(x, 0), 16, 32.0);
            plain += chunk.tiles.iter().filter(|t| !t.is_rare()).count();
            total += chunk.tiles.len();
        }
        assert!(plain * 2 > total);
    }

    #[test]
    fn test_decorations_inside_chunk_and_apart() {
        for seed in 0..20 {
            let coord = ChunkCoord::new(seed as i32 - 10, 4);
            let chunk = generate_chunk(seed, coord, 16, 32.0);
            let bounds = Aabb::new(coord.origin(512.0), coord.origin(512.0) + Vec2::splat(512.0));
            assert!(chunk.decorations.len() <= DECORATIONS_PER_CHUNK.1 as usize);

            for (i, a) in chunk.decorations.iter().enumerate() {
                assert!(bounds.contains(a.aabb().min) && bounds.contains(a.aabb().max));
                assert_eq!(a.id.index as usize, i);
                for b in &chunk.decorations[i + 1..] {
                    assert!(!a.aabb().expanded(DECORATION_PADDING).intersects(&b.aabb()));
                }
            }
        }
    }

    #[test]
    fn test_indestructible_decorations_have_no_loot() {
        let chunk = generate_chunk(77, ChunkCoord::new(-1, -1), 16, 32.0);
        for deco in chunk.decorations.iter().filter(|d| !d.is_destructible()) {
            assert_eq!(deco.loot, Loot::default());
        }
    }

    #[test]
    fn test_from_world_floors_negative() {
        assert_eq!(ChunkCoord::from_world(Vec2::new(-1.0, 0.0), 512.0), ChunkCoord::new(-1, 0));
        assert_eq!(ChunkCoord::from_world(Vec2::new(511.9, 512.0), 512.0), ChunkCoord::new(0, 1));
    }
}
