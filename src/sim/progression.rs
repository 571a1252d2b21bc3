//! Pickups, leveling and wave pacing

use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GamePhase, GameState, PickupKind};
use super::weapons::{Weapon, WeaponKind};
use crate::consts::*;

/// One option presented on level up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelUpChoice {
    /// Move an owned weapon to its next stat row
    Upgrade(WeaponKind),
    /// Add a level-1 weapon the player does not own yet
    New(WeaponKind),
}

impl LevelUpChoice {
    pub fn kind(&self) -> WeaponKind {
        match self {
            LevelUpChoice::Upgrade(kind) | LevelUpChoice::New(kind) => *kind,
        }
    }
}

/// Level for a cumulative XP total: one plus the thresholds already reached
pub fn level_for_xp(thresholds: &[u32], xp: u32) -> u32 {
    1 + thresholds.iter().filter(|t| **t <= xp).count() as u32
}

/// Pull nearby pickups toward the player and consume the ones in reach
pub fn collect_pickups(state: &mut GameState, dt: f32) {
    let player_pos = state.player.pos;
    let (mut xp, mut gold, mut heal) = (0u32, 0u32, 0u32);

    state.pickups.retain_mut(|pickup| {
        let to_player = player_pos - pickup.pos;
        let dist = to_player.length();
        if dist <= MAGNET_RADIUS {
            let step = (pickup.kind.magnet_speed() * dt).min(dist);
            pickup.pos += to_player.normalize_or_zero() * step;
        }
        if pickup.pos.distance(player_pos) > COLLECT_RADIUS {
            return true;
        }

        match pickup.kind {
            PickupKind::Xp => xp = xp.saturating_add(pickup.value),
            PickupKind::Gold => gold = gold.saturating_add(pickup.value),
            PickupKind::Health => heal = heal.saturating_add(pickup.value),
        }
        false
    });

    state.xp = state.xp.saturating_add(xp);
    state.gold = state.gold.saturating_add(gold);
    if heal > 0 {
        state.player.heal(heal);
    }
}

/// Apply any level gain since the last check.
///
/// Crossing several thresholds at once is still one level-up: one fixed hp
/// bonus and one choice offer.
pub fn check_level_up(state: &mut GameState) {
    let level = level_for_xp(&state.settings.xp_thresholds, state.xp);
    if level <= state.level {
        return;
    }

    let gained = level - state.level;
    state.level = level;

    let player = &mut state.player;
    player.max_hp += LEVEL_UP_MAX_HP;
    let heal = (player.max_hp as f32 * LEVEL_UP_HEAL_FRACTION) as u32;
    player.heal(heal);

    state.events.push(GameEvent::LevelUp { level });
    log::info!("Level up: {} (+{})", level, gained);

    offer_choices(state);
}

/// Build the level-up offer; an empty offer leaves play running
pub fn offer_choices(state: &mut GameState) {
    let limit = state.settings.level_up_choices;

    let mut choices: Vec<LevelUpChoice> = state
        .player
        .weapons
        .iter()
        .filter(|w| !w.is_maxed())
        .map(|w| LevelUpChoice::Upgrade(w.kind))
        .take(limit)
        .collect();

    let mut unowned: Vec<WeaponKind> = WeaponKind::ALL
        .iter()
        .copied()
        .filter(|k| !state.player.owns(*k))
        .collect();
    while choices.len() < limit && !unowned.is_empty() {
        let pick = state.rng.index(unowned.len());
        choices.push(LevelUpChoice::New(unowned.remove(pick)));
    }

    if choices.is_empty() {
        log::debug!("Nothing left to offer at level {}", state.level);
        state.pending_choices.clear();
        return;
    }

    state.pending_choices = choices;
    state.phase = GamePhase::LevelUp;
}

/// Take the offered choice at `index` (0-based). Returns false if ignored.
pub fn apply_choice(state: &mut GameState, index: usize) -> bool {
    if state.phase != GamePhase::LevelUp {
        return false;
    }
    let Some(choice) = state.pending_choices.get(index).copied() else {
        log::warn!(
            "Ignoring level-up choice {} ({} on offer)",
            index + 1,
            state.pending_choices.len()
        );
        return false;
    };

    match choice {
        LevelUpChoice::Upgrade(kind) => {
            if let Some(weapon) = state.player.weapons.iter_mut().find(|w| w.kind == kind) {
                *weapon = weapon.upgraded();
            }
        }
        LevelUpChoice::New(kind) => state.player.weapons.push(Weapon::new(kind)),
    }
    log::info!("Picked {:?}", choice);

    state.pending_choices.clear();
    state.phase = GamePhase::Playing;
    true
}

/// Advance the wave counter from elapsed time
pub fn update_wave(state: &mut GameState) {
    let wave = 1 + (state.elapsed / state.settings.wave_duration).floor() as u32;
    while state.wave < wave {
        state.wave += 1;
        state.boss_spawned_this_wave = false;
        state.events.push(GameEvent::WaveStarted { wave: state.wave });
        log::info!("Wave {} started", state.wave);
    }
}
