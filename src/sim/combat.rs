//! Weapon firing and projectile lifecycle
//!
//! Each owned weapon fires on its own cooldown with its own targeting
//! algorithm. Projectiles fly, expire, leave the camera area or run into
//! decorations; orbiters instead ride a fixed circle around the player.

use std::f32::consts::TAU;

use glam::Vec2;

use super::collision::{Aabb, PARTICLE_COLOR_DEBRIS, PARTICLE_COLOR_HIT};
use super::spawn::spawn_enemy;
use super::state::{Enemy, EnemyKind, GameState, PickupKind, Projectile};
use super::weapons::{Weapon, WeaponKind, WeaponStats};
use super::world::DecorationHit;
use crate::consts::*;
use crate::polar_to_cartesian;

/// Radial burst phase rotation (radians per second of game time)
pub const NOVA_SPIN: f32 = 1.7;
/// Total fan angle for directional spreads (radians)
pub const KNIFE_SPREAD: f32 = 0.35;
/// Outward shove applied by the aura per pulse
pub const AURA_PUSH: f32 = 6.0;
/// Orbit angle advance per tick (radians)
pub const ORBIT_ANGLE_STEP: f32 = 0.06;

/// Fire every weapon whose cooldown has elapsed
pub fn fire_weapons(state: &mut GameState) {
    let now = state.elapsed;
    let weapons = state.player.weapons.clone();

    for weapon in &weapons {
        let slot = weapon.kind.index();
        let ready = match state.last_fire[slot] {
            None => true,
            Some(last) => now - last >= weapon.stats.cooldown,
        };
        if !ready {
            continue;
        }

        // The timer restarts whether or not anything was in range
        state.last_fire[slot] = Some(now);
        fire(state, weapon);
    }
}

fn fire(state: &mut GameState, weapon: &Weapon) {
    let stats = weapon.stats;
    let origin = state.player.pos;

    match weapon.kind {
        WeaponKind::MagicWand => {
            let targets = nearest_enemies(&state.enemies, origin, stats.range, stats.projectile_count as usize);
            for idx in targets {
                let dir = (state.enemies[idx].pos - origin).normalize_or_zero();
                let dir = if dir == Vec2::ZERO { state.player.facing } else { dir };
                spawn_projectile(state, weapon.kind, origin, dir, &stats);
            }
        }
        WeaponKind::HolyNova => {
            let count = stats.projectile_count.max(1);
            let phase = state.elapsed * NOVA_SPIN;
            for i in 0..count {
                let angle = phase + i as f32 * TAU / count as f32;
                spawn_projectile(state, weapon.kind, origin, polar_to_cartesian(1.0, angle), &stats);
            }
        }
        WeaponKind::Lightning => {
            let targets = nearest_enemies(&state.enemies, origin, stats.range, stats.projectile_count as usize);
            for idx in targets {
                state.enemies[idx].take_damage(stats.damage);
                let pos = state.enemies[idx].pos;
                state.spawn_hit_particles(pos, PARTICLE_COLOR_HIT, 6);
            }
        }
        WeaponKind::Garlic => {
            let radius = stats.range * stats.area;
            for enemy in state.enemies.iter_mut().filter(|e| e.is_alive()) {
                let away = enemy.pos - origin;
                if away.length_squared() > radius * radius {
                    continue;
                }
                enemy.take_damage(stats.damage);
                enemy.pos += away.normalize_or_zero() * AURA_PUSH;
            }
        }
        WeaponKind::Knife => {
            let count = stats.projectile_count.max(1);
            let base = state.player.facing.y.atan2(state.player.facing.x);
            for i in 0..count {
                let offset = if count == 1 {
                    0.0
                } else {
                    -KNIFE_SPREAD / 2.0 + i as f32 * KNIFE_SPREAD / (count - 1) as f32
                };
                spawn_projectile(state, weapon.kind, origin, polar_to_cartesian(1.0, base + offset), &stats);
            }
        }
        WeaponKind::Bible => {
            // Orbiters are persistent; a "fire" just opens the next re-hit window
            let mut hits = Vec::new();
            let GameState {
                projectiles, world, ..
            } = state;
            for orbiter in projectiles.iter_mut().filter(|p| p.weapon.is_orbiting()) {
                orbiter.hit_enemies.clear();
                hits.extend(world.damage_decorations(orbiter.pos, orbiter.hit_radius, orbiter.damage));
            }
            drop_decoration_loot(state, &hits);
        }
    }
}

/// Indices of up to `n` living enemies within `range`, nearest first
pub fn nearest_enemies(enemies: &[Enemy], origin: Vec2, range: f32, n: usize) -> Vec<usize> {
    let mut candidates: Vec<(f32, u32, usize)> = enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_alive())
        .map(|(i, e)| (e.pos.distance_squared(origin), e.id, i))
        .filter(|(d2, _, _)| *d2 <= range * range)
        .collect();
    candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    candidates.into_iter().take(n).map(|(_, _, i)| i).collect()
}

fn spawn_projectile(state: &mut GameState, kind: WeaponKind, pos: Vec2, dir: Vec2, stats: &WeaponStats) {
    let id = state.next_entity_id();
    let vel = dir * stats.projectile_speed;
    state.projectiles.push(Projectile {
        id,
        weapon: kind,
        pos,
        vel,
        damage: stats.damage,
        lifetime: stats.duration,
        pierce: stats.pierce.max(1),
        hit_enemies: Vec::new(),
        angle: vel.y.atan2(vel.x),
        orbit_radius: None,
        hit_radius: kind.hit_radius() * stats.area,
    });
}

/// Keep exactly one orbiter per projectile count and place them on the circle
pub fn update_orbiters(state: &mut GameState) {
    let Some(weapon) = state.player.weapon(WeaponKind::Bible).cloned() else {
        // Weapon gone: its orbiters go with it
        state.projectiles.retain(|p| !p.weapon.is_orbiting());
        return;
    };
    let stats = weapon.stats;
    let want = stats.projectile_count as usize;

    let existing = state
        .projectiles
        .iter()
        .filter(|p| p.weapon.is_orbiting())
        .count();
    if existing < want {
        let base = state
            .projectiles
            .iter()
            .find(|p| p.weapon.is_orbiting())
            .map_or(0.0, |p| p.angle);
        for _ in existing..want {
            let id = state.next_entity_id();
            state.projectiles.push(Projectile {
                id,
                weapon: WeaponKind::Bible,
                pos: state.player.pos,
                vel: Vec2::ZERO,
                damage: stats.damage,
                lifetime: 0.0,
                pierce: stats.pierce.max(1),
                hit_enemies: Vec::new(),
                angle: base,
                orbit_radius: Some(stats.range),
                hit_radius: 0.0,
            });
        }

        // Re-space the whole ring evenly from the first orbiter
        let orbiters = state.projectiles.iter_mut().filter(|p| p.weapon.is_orbiting());
        for (i, orbiter) in orbiters.enumerate() {
            orbiter.angle = base + i as f32 * TAU / want as f32;
        }
    }

    let center = state.player.pos;
    let hit_radius = WeaponKind::Bible.hit_radius() * stats.area;
    for orbiter in state.projectiles.iter_mut().filter(|p| p.weapon.is_orbiting()) {
        orbiter.damage = stats.damage;
        orbiter.hit_radius = hit_radius;
        orbiter.orbit_radius = Some(stats.range);
        orbiter.angle = crate::normalize_angle(orbiter.angle + ORBIT_ANGLE_STEP);
        orbiter.pos = center + polar_to_cartesian(stats.range, orbiter.angle);
    }
}

/// Move projectiles, count down lifetimes and drop the ones off camera
pub fn advance_projectiles(state: &mut GameState, dt: f32) {
    update_orbiters(state);

    let bounds = Aabb::from_center(
        state.player.pos,
        state.camera_half_extents() + Vec2::splat(PROJECTILE_CULL_MARGIN),
    );
    for projectile in state.projectiles.iter_mut().filter(|p| !p.is_orbiting()) {
        projectile.pos += projectile.vel * dt;
        projectile.lifetime -= dt;
    }
    state
        .projectiles
        .retain(|p| p.is_orbiting() || (p.lifetime > 0.0 && bounds.contains(p.pos)));
}

/// Flying projectiles stop at blocking decorations, damaging breakable ones
pub fn resolve_decoration_hits(state: &mut GameState) {
    let mut hits = Vec::new();
    let GameState {
        projectiles, world, ..
    } = state;

    projectiles.retain(|p| {
        if p.is_orbiting() || world.first_blocking(p.pos, p.hit_radius).is_none() {
            return true;
        }
        hits.extend(world.damage_decorations(p.pos, p.hit_radius, p.damage));
        false
    });

    drop_decoration_loot(state, &hits);
}

/// Rewards for decorations destroyed by `hits`, each exactly once
fn drop_decoration_loot(state: &mut GameState, hits: &[DecorationHit]) {
    for hit in hits.iter().filter(|h| h.destroyed_now) {
        if hit.loot.gold > 0 {
            state.spawn_pickup(PickupKind::Gold, hit.pos, hit.loot.gold);
        }
        if hit.loot.drops_health {
            state.spawn_pickup(PickupKind::Health, hit.pos, HEALTH_PICKUP_VALUE);
        }
        if hit.loot.spawns_enemy {
            spawn_enemy(state, EnemyKind::Basic, hit.pos);
        }
        state.spawn_hit_particles(hit.pos, PARTICLE_COLOR_DEBRIS, 6);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::chunk::ChunkCoord;
    use crate::sim::state::CharacterId;

    fn state_with(kind: WeaponKind) -> GameState {
        let mut state = GameState::new(21, CharacterId::Imelda, Settings::default());
        state.player.weapons = vec![Weapon::new(kind)];
        state
    }

    fn add_enemy(state: &mut GameState, pos: Vec2) -> u32 {
        spawn_enemy(state, EnemyKind::Basic, pos)
    }

    #[test]
    fn test_homing_targets_nearest_in_range() {
        let mut state = state_with(WeaponKind::MagicWand);
        add_enemy(&mut state, Vec2::new(300.0, 0.0));
        add_enemy(&mut state, Vec2::new(0.0, 100.0));
        add_enemy(&mut state, Vec2::new(5000.0, 0.0));
        fire_weapons(&mut state);

        assert_eq!(state.projectiles.len(), 1);
        let p = &state.projectiles[0];
        assert!(p.vel.y > 0.0 && p.vel.x.abs() < 1e-3);
    }

    #[test]
    fn test_cooldown_resets_without_target() {
        let mut state = state_with(WeaponKind::MagicWand);
        state.elapsed = 3.0;
        fire_weapons(&mut state);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.last_fire[WeaponKind::MagicWand.index()], Some(3.0));

        // Target appears, but the weapon is still cooling down
        add_enemy(&mut state, Vec2::new(100.0, 0.0));
        state.elapsed = 3.5;
        fire_weapons(&mut state);
        assert!(state.projectiles.is_empty());

        state.elapsed = 4.0;
        fire_weapons(&mut state);
        assert_eq!(state.projectiles.len(), 1);
    }

    #[test]
    fn test_radial_burst_even_and_rotating() {
        let mut state = state_with(WeaponKind::HolyNova);
        fire_weapons(&mut state);
        let count = WeaponKind::HolyNova.stats(1).projectile_count as usize;
        assert_eq!(state.projectiles.len(), count);
        let first: Vec<f32> = state.projectiles.iter().map(|p| p.angle).collect();
        let step = crate::normalize_angle(first[1] - first[0]);
        assert!((step - TAU / count as f32).abs() < 1e-3);

        state.projectiles.clear();
        state.elapsed = 10.0;
        fire_weapons(&mut state);
        assert!((state.projectiles[0].angle - first[0]).abs() > 1e-3);
    }

    #[test]
    fn test_lightning_strikes_without_projectiles() {
        let mut state = state_with(WeaponKind::Lightning);
        add_enemy(&mut state, Vec2::new(50.0, 0.0));
        add_enemy(&mut state, Vec2::new(60.0, 0.0));
        fire_weapons(&mut state);

        assert!(state.projectiles.is_empty());
        assert_eq!(state.enemies[0].hp, 10.0);
        assert_eq!(state.enemies[1].hp, 30.0);
    }

    #[test]
    fn test_aura_damages_and_pushes() {
        let mut state = state_with(WeaponKind::Garlic);
        add_enemy(&mut state, Vec2::new(40.0, 0.0));
        add_enemy(&mut state, Vec2::new(200.0, 0.0));
        fire_weapons(&mut state);

        assert_eq!(state.enemies[0].hp, 26.0);
        assert!(state.enemies[0].pos.x > 40.0);
        assert_eq!(state.enemies[1].hp, 30.0);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_knives_fan_around_facing() {
        let mut state = state_with(WeaponKind::Knife);
        state.player.weapons[0] = Weapon::new(WeaponKind::Knife).upgraded().upgraded();
        state.player.facing = Vec2::Y;
        fire_weapons(&mut state);

        assert_eq!(state.projectiles.len(), 3);
        let angles: Vec<f32> = state.projectiles.iter().map(|p| p.angle).collect();
        let up = std::f32::consts::FRAC_PI_2;
        assert!((angles[0] - (up - KNIFE_SPREAD / 2.0)).abs() < 1e-4);
        assert!((angles[1] - up).abs() < 1e-4);
        assert!((angles[2] - (up + KNIFE_SPREAD / 2.0)).abs() < 1e-4);
    }

    #[test]
    fn test_orbiters_track_count_and_player() {
        let mut state = state_with(WeaponKind::Bible);
        advance_projectiles(&mut state, SIM_DT);
        assert_eq!(state.projectiles.len(), 1);

        state.player.pos = Vec2::new(500.0, 500.0);
        for _ in 0..600 {
            advance_projectiles(&mut state, SIM_DT);
        }
        // Never expires by lifetime
        assert_eq!(state.projectiles.len(), 1);
        let radius = WeaponKind::Bible.stats(1).range;
        assert!((state.projectiles[0].pos.distance(state.player.pos) - radius).abs() < 1e-2);

        // Upgrade grows the ring lazily
        state.player.weapons[0] = state.player.weapons[0].upgraded().upgraded();
        advance_projectiles(&mut state, SIM_DT);
        assert_eq!(state.projectiles.len(), 3);

        // Losing the weapon removes the ring
        state.player.weapons.clear();
        advance_projectiles(&mut state, SIM_DT);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_orbiter_ring_respaced_after_upgrade() {
        let mut state = state_with(WeaponKind::Bible);
        state.player.weapons[0] = state.player.weapons[0].upgraded();
        for _ in 0..37 {
            advance_projectiles(&mut state, SIM_DT);
        }
        assert_eq!(state.projectiles.len(), 2);

        state.player.weapons[0] = state.player.weapons[0].upgraded();
        advance_projectiles(&mut state, SIM_DT);
        assert_eq!(state.projectiles.len(), 3);

        let angles: Vec<f32> = state.projectiles.iter().map(|p| p.angle).collect();
        for i in 0..3 {
            let gap = crate::normalize_angle(angles[(i + 1) % 3] - angles[i]).abs();
            assert!((gap - TAU / 3.0).abs() < 1e-3, "uneven ring: {angles:?}");
        }
    }

    #[test]
    fn test_orbiter_angle_advances_by_fixed_step() {
        let mut state = state_with(WeaponKind::Bible);
        advance_projectiles(&mut state, SIM_DT);
        let a0 = state.projectiles[0].angle;
        advance_projectiles(&mut state, SIM_DT);
        let a1 = state.projectiles[0].angle;
        assert!((crate::normalize_angle(a1 - a0) - ORBIT_ANGLE_STEP).abs() < 1e-4);
    }

    #[test]
    fn test_orbiter_fire_clears_hit_set() {
        let mut state = state_with(WeaponKind::Bible);
        advance_projectiles(&mut state, SIM_DT);
        state.projectiles[0].hit_enemies.push(99);
        fire_weapons(&mut state);
        assert!(state.projectiles[0].hit_enemies.is_empty());
    }

    #[test]
    fn test_projectiles_expire_and_leave_camera() {
        let mut state = state_with(WeaponKind::Knife);
        fire_weapons(&mut state);
        assert_eq!(state.projectiles.len(), 1);
        let lifetime = WeaponKind::Knife.stats(1).duration;
        let steps = (lifetime / SIM_DT).ceil() as usize + 1;
        for _ in 0..steps {
            advance_projectiles(&mut state, SIM_DT);
        }
        assert!(state.projectiles.is_empty());

        state.elapsed = 10.0;
        fire_weapons(&mut state);
        assert!(!state.projectiles.is_empty());
        state.player.pos = Vec2::new(10_000.0, 0.0);
        advance_projectiles(&mut state, SIM_DT);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_projectile_breaks_decoration_and_drops_loot() {
        let mut state = state_with(WeaponKind::Knife);
        state.world.update_active(Vec2::ZERO);

        // Any breakable blocker in the loaded window will do
        let mut coords: Vec<ChunkCoord> = state.world.loaded_coords().collect();
        coords.sort();
        let target = coords
            .iter()
            .filter_map(|c| state.world.get(*c))
            .flat_map(|chunk| chunk.decorations.iter())
            .find(|d| d.is_destructible() && d.blocks())
            .cloned()
            .expect("window holds a breakable decoration");
        let coord = target.id.chunk;

        let id = state.next_entity_id();
        state.projectiles.push(Projectile {
            id,
            weapon: WeaponKind::Knife,
            pos: target.pos,
            vel: Vec2::ZERO,
            damage: 1000.0,
            lifetime: 1.0,
            pierce: 1,
            hit_enemies: Vec::new(),
            angle: 0.0,
            orbit_radius: None,
            hit_radius: 6.0,
        });
        let pickups_before = state.pickups.len();
        resolve_decoration_hits(&mut state);

        assert!(state.projectiles.is_empty());
        let deco = state.world.get(coord).unwrap().decorations[target.id.index as usize].clone();
        assert!(deco.destroyed);
        let expected = (target.loot.gold > 0) as usize + target.loot.drops_health as usize;
        assert_eq!(state.pickups.len() - pickups_before, expected);
        assert_eq!(state.enemies.len(), target.loot.spawns_enemy as usize);
    }
}
