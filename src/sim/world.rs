//! Chunk cache and world queries
//!
//! Keeps the chunks around the player generated, drops the ones that fall
//! too far behind, and answers decoration collision and damage queries.
//! Queries only ever look at the 3x3 chunk neighborhood around a point.

use std::collections::HashMap;

use glam::Vec2;

use super::chunk::{Chunk, ChunkCoord, Decoration, DecorationId, Loot, generate_chunk};
use super::collision::circle_aabb_collision;
use crate::settings::Settings;

/// Chunks generated and evicted by one window update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowChange {
    pub generated: Vec<ChunkCoord>,
    pub evicted: Vec<ChunkCoord>,
}

/// Outcome of damaging one decoration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecorationHit {
    pub id: DecorationId,
    pub pos: Vec2,
    /// Went from intact to destroyed during this call
    pub destroyed_now: bool,
    /// Loot rolled at generation time
    pub loot: Loot,
}

/// Procedural world made of lazily generated chunks
#[derive(Debug, Clone)]
pub struct ChunkWorld {
    seed: u64,
    chunk_size: u32,
    tile_size: f32,
    render_distance: u32,
    eviction_slack: u32,
    chunks: HashMap<ChunkCoord, Chunk>,
    /// Chunk the player stood in at the last window update
    center: ChunkCoord,
}

impl ChunkWorld {
    pub fn new(seed: u64, settings: &Settings) -> Self {
        Self {
            seed,
            chunk_size: settings.chunk_size,
            tile_size: settings.tile_size,
            render_distance: settings.render_distance,
            eviction_slack: settings.eviction_slack,
            chunks: HashMap::new(),
            center: ChunkCoord::default(),
        }
    }

    /// Chunk edge length in world units
    #[inline]
    pub fn chunk_world_size(&self) -> f32 {
        self.chunk_size as f32 * self.tile_size
    }

    #[inline]
    pub fn coord_of(&self, pos: Vec2) -> ChunkCoord {
        ChunkCoord::from_world(pos, self.chunk_world_size())
    }

    /// Chunk at `coord`, generating it on first request
    pub fn chunk_at(&mut self, coord: ChunkCoord) -> &Chunk {
        let (seed, size, tile) = (self.seed, self.chunk_size, self.tile_size);
        self.chunks
            .entry(coord)
            .or_insert_with(|| generate_chunk(seed, coord, size, tile))
    }

    /// Already generated chunk, if any
    pub fn get(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    pub fn loaded_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn loaded_coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.chunks.keys().copied()
    }

    /// Generate the render window around the player and evict stragglers
    pub fn update_active(&mut self, player_pos: Vec2) -> WindowChange {
        let center = self.coord_of(player_pos);
        self.center = center;
        let mut change = WindowChange::default();

        let r = self.render_distance as i32;
        for dy in -r..=r {
            for dx in -r..=r {
                let coord = ChunkCoord::new(center.x + dx, center.y + dy);
                if !self.chunks.contains_key(&coord) {
                    self.chunk_at(coord);
                    change.generated.push(coord);
                }
            }
        }

        // Distance 0 is never beyond the limit, so the player's chunk stays
        let limit = self.render_distance + self.eviction_slack;
        self.chunks.retain(|coord, _| {
            let keep = coord.chebyshev(center) <= limit;
            if !keep {
                change.evicted.push(*coord);
            }
            keep
        });

        if !change.evicted.is_empty() {
            change.evicted.sort();
            log::debug!("Evicted {} chunks around ({}, {})", change.evicted.len(), center.x, center.y);
        }
        change
    }

    /// Chunks inside the render window still waiting for a tile image
    pub fn chunks_needing_render(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<ChunkCoord> = self
            .chunks
            .values()
            .filter(|c| !c.render_cached && c.coord.chebyshev(self.center) <= self.render_distance)
            .map(|c| c.coord)
            .collect();
        coords.sort();
        coords
    }

    /// Host reports that it cached the tile image for `coord`
    pub fn mark_rendered(&mut self, coord: ChunkCoord) {
        if let Some(chunk) = self.chunks.get_mut(&coord) {
            chunk.render_cached = true;
        }
    }

    /// Loaded chunks in the 3x3 block around `pos`
    fn neighborhood(&self, pos: Vec2) -> impl Iterator<Item = &Chunk> + '_ {
        let center = self.coord_of(pos);
        (-1..=1).flat_map(move |dy| {
            (-1..=1).filter_map(move |dx| self.chunks.get(&ChunkCoord::new(center.x + dx, center.y + dy)))
        })
    }

    /// Blocking decorations whose box touches the circle
    pub fn decorations_near(&self, pos: Vec2, radius: f32) -> Vec<&Decoration> {
        self.neighborhood(pos)
            .flat_map(|chunk| chunk.decorations.iter())
            .filter(|d| d.blocks() && circle_aabb_collision(pos, radius, &d.aabb()).hit)
            .collect()
    }

    /// Push a circle out of decorations.
    ///
    /// Each overlap contributes a push along the center-to-center axis scaled
    /// by its penetration. If the summed push still leaves the circle
    /// overlapping something, `prev` is returned instead.
    pub fn resolve_collision(&self, pos: Vec2, radius: f32, prev: Vec2) -> Vec2 {
        let mut push = Vec2::ZERO;
        let mut overlapping = false;
        for deco in self.decorations_near(pos, radius) {
            let hit = circle_aabb_collision(pos, radius, &deco.aabb());
            push += hit.normal * hit.penetration;
            overlapping = true;
        }
        if !overlapping {
            return pos;
        }

        let resolved = pos + push;
        if self.decorations_near(resolved, radius).is_empty() {
            resolved
        } else {
            prev
        }
    }

    /// Damage destructible, intact decorations touching the circle
    pub fn damage_decorations(&mut self, pos: Vec2, radius: f32, damage: f32) -> Vec<DecorationHit> {
        let center = self.coord_of(pos);
        let mut hits = Vec::new();

        for dy in -1..=1 {
            for dx in -1..=1 {
                let Some(chunk) = self.chunks.get_mut(&ChunkCoord::new(center.x + dx, center.y + dy)) else {
                    continue;
                };
                for deco in chunk.decorations.iter_mut() {
                    if !deco.is_destructible() || deco.destroyed {
                        continue;
                    }
                    if !circle_aabb_collision(pos, radius, &deco.aabb()).hit {
                        continue;
                    }

                    deco.hp = (deco.hp - damage).max(0.0);
                    let destroyed_now = deco.hp <= 0.0;
                    if destroyed_now {
                        deco.destroyed = true;
                        log::debug!("Decoration {:?} destroyed at ({:.0}, {:.0})", deco.kind, deco.pos.x, deco.pos.y);
                    }
                    hits.push(DecorationHit {
                        id: deco.id,
                        pos: deco.pos,
                        destroyed_now,
                        loot: deco.loot,
                    });
                }
            }
        }

        hits
    }

    /// First blocking decoration touching the circle, if any
    pub fn first_blocking(&self, pos: Vec2, radius: f32) -> Option<&Decoration> {
        self.decorations_near(pos, radius).into_iter().next()
    }
}
