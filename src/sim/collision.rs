//! Collision detection and response
//!
//! Geometry primitives (circles against axis-aligned boxes and other
//! circles) plus the per-tick resolution passes: projectiles against
//! enemies, enemy deaths, and enemies touching the player.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GamePhase, GameState, KillEvent, PickupKind};
use crate::consts::*;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Grow every side by `pad`
    #[inline]
    pub fn expanded(&self, pad: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(pad),
            max: self.max + Vec2::splat(pad),
        }
    }

    /// Strict overlap (touching edges do not count)
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Closest point of the box to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }
}

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Push direction for the circle (obstacle center toward circle center)
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Circle against box using the closest-point method
pub fn circle_aabb_collision(center: Vec2, radius: f32, aabb: &Aabb) -> CollisionResult {
    let closest = aabb.closest_point(center);
    let dist_sq = center.distance_squared(closest);
    if dist_sq >= radius * radius {
        return CollisionResult::miss();
    }

    let axis = center - aabb.center();
    let normal = if axis.length_squared() > 1e-6 {
        axis.normalize()
    } else {
        Vec2::Y
    };

    CollisionResult {
        hit: true,
        normal,
        penetration: radius - dist_sq.sqrt(),
    }
}

#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let r = ra + rb;
    a.distance_squared(b) < r * r
}

/// Projectiles against enemies: damage, record hits, retire spent projectiles
pub fn resolve_projectile_hits(state: &mut GameState) {
    let mut sparks: Vec<Vec2> = Vec::new();

    let GameState {
        projectiles,
        enemies,
        ..
    } = state;

    for projectile in projectiles.iter_mut() {
        for enemy in enemies.iter_mut() {
            if !enemy.is_alive() || projectile.hit_enemies.contains(&enemy.id) {
                continue;
            }
            if !circles_overlap(projectile.pos, projectile.hit_radius, enemy.pos, enemy.radius) {
                continue;
            }

            enemy.take_damage(projectile.damage);
            projectile.hit_enemies.push(enemy.id);
            sparks.push(enemy.pos);

            if projectile.is_spent() {
                break;
            }
        }
    }

    // Pierce exhaustion retires the projectile in the same tick
    projectiles.retain(|p| !p.is_spent());

    for pos in sparks {
        state.spawn_hit_particles(pos, PARTICLE_COLOR_HIT, 4);
    }
}

/// Remove enemies at or below zero hp, dropping their rewards
pub fn reap_dead_enemies(state: &mut GameState) {
    if state.enemies.iter().all(|e| e.is_alive()) {
        return;
    }

    let (dead, alive): (Vec<_>, Vec<_>) = std::mem::take(&mut state.enemies)
        .into_iter()
        .partition(|e| !e.is_alive());
    state.enemies = alive;

    for enemy in dead {
        state.spawn_pickup(PickupKind::Xp, enemy.pos, enemy.xp_reward);
        state.spawn_pickup(PickupKind::Gold, enemy.pos, enemy.gold_reward);
        state.kills += 1;
        state.spawn_hit_particles(enemy.pos, PARTICLE_COLOR_DEATH, 8);
        state.events.push(GameEvent::EnemyKilled(KillEvent {
            enemy_id: enemy.id,
            kind: enemy.kind,
            pos: enemy.pos,
            total_kills: state.kills,
        }));
    }
}

/// Enemy touching the player: damage, invulnerability window, knockback
pub fn resolve_player_contact(state: &mut GameState) {
    if state.player.invulnerable || state.phase == GamePhase::Dead {
        return;
    }

    let player = &state.player;
    let Some(enemy) = state
        .enemies
        .iter()
        .find(|e| e.is_alive() && circles_overlap(player.pos, player.radius, e.pos, e.radius))
    else {
        return;
    };
    let (damage, enemy_pos) = (enemy.damage, enemy.pos);

    let now = state.elapsed;
    let player = &mut state.player;
    player.hp = player.hp.saturating_sub(damage);
    player.grant_invulnerability(now, INVULNERABILITY_SECS);

    let away = player.pos - enemy_pos;
    let normal = if away.length_squared() > 1e-6 {
        away.normalize()
    } else {
        -player.facing
    };
    let prev = player.pos;
    let shoved = prev + normal * KNOCKBACK_DISTANCE;
    player.pos = state.world.resolve_collision(shoved, player.radius, prev);

    log::debug!("Player hit for {} (hp {}/{})", damage, player.hp, player.max_hp);

    if player.hp == 0 {
        log::info!(
            "Player died at {:.1}s on wave {} with {} kills",
            state.elapsed,
            state.wave,
            state.kills
        );
        state.phase = GamePhase::Dead;
        state.events.push(GameEvent::PlayerDied);
    }
}

/// Particle color ids (looked up by the renderer)
pub const PARTICLE_COLOR_HIT: u32 = 1;
pub const PARTICLE_COLOR_DEATH: u32 = 2;
pub const PARTICLE_COLOR_DEBRIS: u32 = 3;
