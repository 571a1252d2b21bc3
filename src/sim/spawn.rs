//! Enemy spawning
//!
//! Wave-driven pacing: the spawn interval shrinks and the live-enemy cap
//! grows with each wave, and every fifth wave opens with a boss.

use glam::Vec2;

use super::rng::Prng;
use super::state::{Behavior, Enemy, EnemyKind, GameEvent, GameState};
use crate::consts::*;

/// Base stats for an enemy kind at wave 1
#[derive(Debug, Clone, Copy)]
pub struct EnemyTemplate {
    pub hp: f32,
    pub damage: u32,
    pub speed: f32,
    pub xp_reward: u32,
    pub gold_reward: u32,
    pub radius: f32,
    /// First wave this kind may appear as a regular spawn
    pub min_wave: u32,
    /// Weight in the regular spawn draw
    pub weight: u32,
}

impl EnemyKind {
    pub fn template(self) -> EnemyTemplate {
        match self {
            EnemyKind::Basic => EnemyTemplate {
                hp: 30.0,
                damage: 10,
                speed: 60.0,
                xp_reward: 10,
                gold_reward: 1,
                radius: 12.0,
                min_wave: 1,
                weight: 60,
            },
            EnemyKind::Fast => EnemyTemplate {
                hp: 15.0,
                damage: 8,
                speed: 120.0,
                xp_reward: 8,
                gold_reward: 1,
                radius: 10.0,
                min_wave: 2,
                weight: 25,
            },
            EnemyKind::Tank => EnemyTemplate {
                hp: 100.0,
                damage: 20,
                speed: 35.0,
                xp_reward: 25,
                gold_reward: 3,
                radius: 18.0,
                min_wave: 3,
                weight: 15,
            },
            EnemyKind::Boss => EnemyTemplate {
                hp: 800.0,
                damage: 30,
                speed: 50.0,
                xp_reward: 200,
                gold_reward: 25,
                radius: 32.0,
                min_wave: BOSS_WAVE_INTERVAL,
                weight: 0,
            },
        }
    }
}

/// Kinds that show up in the regular spawn draw
pub const REGULAR_KINDS: [EnemyKind; 3] = [EnemyKind::Basic, EnemyKind::Fast, EnemyKind::Tank];

/// Seconds between regular spawns
pub fn spawn_interval(wave: u32) -> f32 {
    (2.0 - 0.15 * wave.saturating_sub(1) as f32).max(0.3)
}

/// Live enemy cap
pub fn max_enemies(wave: u32) -> usize {
    (20 + 10 * wave as usize).min(300)
}

#[inline]
pub fn is_boss_wave(wave: u32) -> bool {
    wave >= BOSS_WAVE_INTERVAL && wave % BOSS_WAVE_INTERVAL == 0
}

/// Hp multiplier applied to every spawn
fn hp_scale(wave: u32) -> f32 {
    1.0 + 0.1 * wave.saturating_sub(1) as f32
}

/// Run the spawner for one tick
pub fn update_spawns(state: &mut GameState) {
    if is_boss_wave(state.wave) && !state.boss_spawned_this_wave {
        let half_view = state.camera_half_extents();
        let pos = spawn_position(&mut state.rng, state.player.pos, half_view);
        let id = spawn_enemy(state, EnemyKind::Boss, pos);
        state.boss_spawned_this_wave = true;
        state.events.push(GameEvent::BossSpawned { enemy_id: id, wave: state.wave });
        log::info!("Boss spawned on wave {}", state.wave);
        return;
    }

    let wave = state.wave;
    if state.elapsed - state.last_spawn_time < spawn_interval(wave) {
        return;
    }
    if state.enemies.len() >= max_enemies(wave) {
        return;
    }

    let table: Vec<(EnemyKind, u32)> = REGULAR_KINDS
        .iter()
        .map(|k| (*k, k.template()))
        .filter(|(_, t)| t.min_wave <= wave)
        .map(|(k, t)| (k, t.weight))
        .collect();
    let kind = *state.rng.weighted(&table);
    let half_view = state.camera_half_extents();
    let pos = spawn_position(&mut state.rng, state.player.pos, half_view);
    spawn_enemy(state, kind, pos);
    state.last_spawn_time = state.elapsed;
}

/// Just outside a random viewport edge, so spawns are never on screen
pub fn spawn_position(rng: &mut Prng, player_pos: Vec2, half_view: Vec2) -> Vec2 {
    let offset = match rng.index(4) {
        // top
        0 => Vec2::new(rng.range_f32(-half_view.x, half_view.x), -half_view.y - SPAWN_MARGIN),
        // right
        1 => Vec2::new(half_view.x + SPAWN_MARGIN, rng.range_f32(-half_view.y, half_view.y)),
        // bottom
        2 => Vec2::new(rng.range_f32(-half_view.x, half_view.x), half_view.y + SPAWN_MARGIN),
        // left
        _ => Vec2::new(-half_view.x - SPAWN_MARGIN, rng.range_f32(-half_view.y, half_view.y)),
    };
    player_pos + offset
}

fn roll_behavior(kind: EnemyKind, rng: &mut Prng) -> Behavior {
    match kind {
        EnemyKind::Basic => Behavior::Chase,
        EnemyKind::Fast => {
            if rng.chance(0.5) {
                Behavior::Charge
            } else {
                Behavior::Circle
            }
        }
        EnemyKind::Tank => Behavior::Teleport,
        EnemyKind::Boss => {
            if rng.chance(0.5) {
                Behavior::Circle
            } else {
                Behavior::Chase
            }
        }
    }
}

/// Add an enemy of `kind` at `pos`, scaled to the current wave
pub fn spawn_enemy(state: &mut GameState, kind: EnemyKind, pos: Vec2) -> u32 {
    let template = kind.template();
    let hp = template.hp * hp_scale(state.wave);
    let behavior = roll_behavior(kind, &mut state.rng);
    let id = state.next_entity_id();
    state.enemies.push(Enemy {
        id,
        kind,
        pos,
        vel: Vec2::ZERO,
        hp,
        max_hp: hp,
        damage: template.damage,
        speed: template.speed,
        xp_reward: template.xp_reward,
        gold_reward: template.gold_reward,
        radius: template.radius,
        behavior,
        hit_flash: 0.0,
    });
    id
}
