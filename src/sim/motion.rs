//! Player and enemy movement
//!
//! The player integrates held input and is pushed out of decorations.
//! Enemies pick a velocity every tick from their behavior tag; there is no
//! persistent AI state beyond the velocity itself.

use glam::Vec2;

use super::rng::Prng;
use super::state::{Behavior, Enemy, GameState};
use crate::consts::*;

/// Charge enemies only re-aim while slower than this
pub const CHARGE_AIM_EPSILON: f32 = 1.0;
/// Circle blend: tangential vs inward
pub const CIRCLE_TANGENT_WEIGHT: f32 = 0.8;
pub const CIRCLE_INWARD_WEIGHT: f32 = 0.35;
/// Teleporters only blink when at least this far away
pub const TELEPORT_MIN_DISTANCE: f32 = 300.0;
pub const TELEPORT_CHANCE_PER_TICK: f32 = 0.01;
pub const TELEPORT_DISTANCE: f32 = 150.0;

/// Move the player along `direction` (already normalized or zero)
pub fn move_player(state: &mut GameState, direction: Vec2, dt: f32) {
    let player = &mut state.player;
    player.vel = direction * player.speed;
    if direction != Vec2::ZERO {
        player.facing = direction;
    }

    let prev = player.pos;
    let next = prev + player.vel * dt;
    player.pos = state.world.resolve_collision(next, player.radius, prev);
}

/// Advance every enemy by its behavior
pub fn move_enemies(state: &mut GameState, dt: f32) {
    let GameState {
        enemies, rng, player, ..
    } = state;

    for enemy in enemies.iter_mut() {
        steer(enemy, player.pos, rng);
        enemy.pos += enemy.vel * dt;
        enemy.hit_flash = (enemy.hit_flash - dt).max(0.0);
    }
}

/// Pick this tick's velocity (and possibly blink) for one enemy
pub fn steer(enemy: &mut Enemy, player_pos: Vec2, rng: &mut Prng) {
    let to_player = player_pos - enemy.pos;
    let dist = to_player.length();
    let dir = to_player.normalize_or_zero();

    match enemy.behavior {
        Behavior::Chase => {
            enemy.vel = dir * enemy.speed;
        }
        Behavior::Charge => {
            // Commits to the first aim; a stalled charger keeps its stale heading
            if enemy.vel.length() < CHARGE_AIM_EPSILON {
                enemy.vel = dir * enemy.speed;
            }
        }
        Behavior::Circle => {
            let tangent = Vec2::new(-dir.y, dir.x);
            let blend = tangent * CIRCLE_TANGENT_WEIGHT + dir * CIRCLE_INWARD_WEIGHT;
            enemy.vel = blend.normalize_or_zero() * enemy.speed;
        }
        Behavior::Teleport => {
            if dist > TELEPORT_MIN_DISTANCE && rng.chance(TELEPORT_CHANCE_PER_TICK) {
                enemy.pos += dir * TELEPORT_DISTANCE;
            }
            enemy.vel = dir * enemy.speed;
        }
    }
}

/// Drop enemies that wandered too far from the player (no rewards)
pub fn cull_distant_enemies(state: &mut GameState) {
    let player_pos = state.player.pos;
    let before = state.enemies.len();
    state
        .enemies
        .retain(|e| e.pos.distance_squared(player_pos) <= ENEMY_CULL_RADIUS * ENEMY_CULL_RADIUS);
    let culled = before - state.enemies.len();
    if culled > 0 {
        log::debug!("Culled {} distant enemies", culled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::spawn::spawn_enemy;
    use crate::sim::state::{CharacterId, EnemyKind};

    fn state() -> GameState {
        GameState::new(5, CharacterId::Imelda, Settings::default())
    }

    fn enemy(behavior: Behavior, pos: Vec2) -> Enemy {
        Enemy {
            id: 1,
            kind: EnemyKind::Fast,
            pos,
            vel: Vec2::ZERO,
            hp: 10.0,
            max_hp: 10.0,
            damage: 5,
            speed: 100.0,
            xp_reward: 1,
            gold_reward: 1,
            radius: 10.0,
            behavior,
            hit_flash: 0.0,
        }
    }

    #[test]
    fn test_player_moves_and_remembers_facing() {
        let mut state = state();
        let dir = Vec2::new(1.0, 1.0).normalize();
        move_player(&mut state, dir, 0.1);
        assert!((state.player.pos.length() - PLAYER_SPEED * 0.1).abs() < 1e-3);
        assert_eq!(state.player.facing, dir);

        move_player(&mut state, Vec2::ZERO, 0.1);
        assert_eq!(state.player.facing, dir);
        assert_eq!(state.player.vel, Vec2::ZERO);
    }

    #[test]
    fn test_chase_recomputes_each_tick() {
        let mut rng = Prng::new(1);
        let mut e = enemy(Behavior::Chase, Vec2::new(100.0, 0.0));
        steer(&mut e, Vec2::ZERO, &mut rng);
        assert!(e.vel.x < -99.0);
        steer(&mut e, Vec2::new(100.0, 100.0), &mut rng);
        assert!(e.vel.y > 99.0);
    }

    #[test]
    fn test_charge_commits_to_first_aim() {
        let mut rng = Prng::new(1);
        let mut e = enemy(Behavior::Charge, Vec2::new(100.0, 0.0));
        steer(&mut e, Vec2::ZERO, &mut rng);
        let committed = e.vel;
        // Player moves; the charger does not re-aim
        steer(&mut e, Vec2::new(100.0, 500.0), &mut rng);
        assert_eq!(e.vel, committed);
    }

    #[test]
    fn test_circle_is_mostly_tangential() {
        let mut rng = Prng::new(1);
        let mut e = enemy(Behavior::Circle, Vec2::new(100.0, 0.0));
        steer(&mut e, Vec2::ZERO, &mut rng);
        // Inward is -x; tangent is -y for this layout
        assert!(e.vel.x < 0.0);
        assert!(e.vel.y.abs() > e.vel.x.abs());
        assert!((e.vel.length() - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_teleport_blinks_only_when_far() {
        let mut rng = Prng::new(1);
        let mut near = enemy(Behavior::Teleport, Vec2::new(100.0, 0.0));
        for _ in 0..1000 {
            near.pos = Vec2::new(100.0, 0.0);
            steer(&mut near, Vec2::ZERO, &mut rng);
            assert_eq!(near.pos, Vec2::new(100.0, 0.0));
        }

        let mut far = enemy(Behavior::Teleport, Vec2::new(1000.0, 0.0));
        let mut blinked = false;
        for _ in 0..2000 {
            steer(&mut far, Vec2::ZERO, &mut rng);
            if far.pos.x < 1000.0 {
                blinked = true;
                break;
            }
        }
        assert!(blinked);
        assert_eq!(far.pos, Vec2::new(1000.0 - TELEPORT_DISTANCE, 0.0));
    }

    #[test]
    fn test_enemies_close_in_and_flash_decays() {
        let mut state = state();
        let id = spawn_enemy(&mut state, EnemyKind::Basic, Vec2::new(200.0, 0.0));
        state.enemies[0].hit_flash = 0.05;
        move_enemies(&mut state, 0.1);
        let e = state.enemies.iter().find(|e| e.id == id).unwrap();
        assert!(e.pos.x < 200.0);
        assert_eq!(e.hit_flash, 0.0);
    }

    #[test]
    fn test_cull_distant() {
        let mut state = state();
        spawn_enemy(&mut state, EnemyKind::Basic, Vec2::new(ENEMY_CULL_RADIUS + 10.0, 0.0));
        spawn_enemy(&mut state, EnemyKind::Basic, Vec2::new(100.0, 0.0));
        cull_distant_enemies(&mut state);
        assert_eq!(state.enemies.len(), 1);
    }
}
