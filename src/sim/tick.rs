//! Fixed timestep simulation tick
//!
//! `step` runs one tick of the pipeline in a fixed order. `Simulation` wraps
//! it with the run lifecycle, host pacing and the kill hook.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{reap_dead_enemies, resolve_player_contact, resolve_projectile_hits};
use super::combat::{advance_projectiles, fire_weapons, resolve_decoration_hits};
use super::motion::{cull_distant_enemies, move_enemies, move_player};
use super::progression::{apply_choice, check_level_up, collect_pickups, update_wave};
use super::spawn::update_spawns;
use super::state::{CharacterId, GameEvent, GamePhase, GameState, KillEvent};
use crate::consts::*;
use crate::settings::Settings;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Held movement keys
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Level-up option to take (1-based)
    pub choice: Option<u8>,
    /// Pause toggle
    pub pause: bool,
}

impl TickInput {
    /// Unit movement direction from held keys (zero when idle or cancelled)
    pub fn direction(&self) -> Vec2 {
        let x = self.right as i32 - self.left as i32;
        let y = self.down as i32 - self.up as i32;
        Vec2::new(x as f32, y as f32).normalize_or_zero()
    }
}

/// What the host shows after every tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub hp: u32,
    pub max_hp: u32,
    pub xp: u32,
    pub level: u32,
    pub gold: u32,
    pub wave: u32,
    pub kills: u32,
    /// Whole seconds of gameplay
    pub time_survived: u32,
    pub is_dead: bool,
}

impl StateSnapshot {
    pub fn of(state: &GameState) -> Self {
        Self {
            hp: state.player.hp,
            max_hp: state.player.max_hp,
            xp: state.xp,
            level: state.level,
            gold: state.gold,
            wave: state.wave,
            kills: state.kills,
            time_survived: state.elapsed.floor() as u32,
            is_dead: state.is_dead(),
        }
    }
}

/// Advance the game state by one fixed timestep
pub fn step(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                log::info!("Paused at {:.1}s", state.elapsed);
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                log::info!("Resumed at {:.1}s", state.elapsed);
            }
            _ => {}
        }
    }

    // Choices are still taken while everything else is frozen
    if state.phase == GamePhase::LevelUp {
        match input.choice {
            Some(0) => log::warn!("Ignoring level-up choice 0 (choices are 1-based)"),
            Some(n) => {
                apply_choice(state, n as usize - 1);
            }
            None => {}
        }
        return;
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    // 1. Clock
    state.time_ticks += 1;
    state.elapsed += dt;
    if state.player.invulnerable && state.elapsed >= state.player.invulnerable_until {
        state.player.invulnerable = false;
    }
    update_wave(state);

    // 2. World window
    let change = state.world.update_active(state.player.pos);
    if !change.generated.is_empty() {
        log::debug!("Generated {} chunks", change.generated.len());
    }

    // 3. Movement
    move_player(state, input.direction(), dt);
    move_enemies(state, dt);
    cull_distant_enemies(state);

    // 4. Spawning
    update_spawns(state);

    // 5. Weapons and projectiles
    fire_weapons(state);
    advance_projectiles(state, dt);
    resolve_decoration_hits(state);

    // 6. Hits, deaths and contact
    resolve_projectile_hits(state);
    reap_dead_enemies(state);
    resolve_player_contact(state);

    // 7. Progression
    if state.phase == GamePhase::Playing {
        collect_pickups(state, dt);
        check_level_up(state);
    }

    update_particles(state, dt);
    state.normalize_order();
}

fn update_particles(state: &mut GameState, dt: f32) {
    for particle in state.particles.iter_mut() {
        particle.pos += particle.vel * dt;
        particle.vel *= 0.92;
        particle.life -= dt * 2.0;
    }
    state.particles.retain(|p| p.life > 0.0);
}

/// Callback run for every enemy death
pub type KillHook = Box<dyn FnMut(&KillEvent)>;

/// Run lifecycle and host-facing entry point
pub struct Simulation {
    settings: Settings,
    state: Option<GameState>,
    running: bool,
    accumulator: f32,
    /// Seed and character of the last `start`, for `reset`
    last_run: Option<(u64, CharacterId)>,
    kill_hook: Option<KillHook>,
}

impl Simulation {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            state: None,
            running: false,
            accumulator: 0.0,
            last_run: None,
            kill_hook: None,
        }
    }

    /// Begin a fresh run
    pub fn start(&mut self, seed: u64, character: CharacterId) {
        let mut state = GameState::new(seed, character, self.settings.clone());
        state.world.update_active(state.player.pos);
        self.state = Some(state);
        self.running = true;
        self.accumulator = 0.0;
        self.last_run = Some((seed, character));
        log::info!("Run started: seed {} as {}", seed, character.as_str());
    }

    /// Stop ticking; the state stays readable
    pub fn stop(&mut self) {
        if self.running {
            log::info!("Run stopped");
        }
        self.running = false;
    }

    /// Continue a stopped run
    pub fn resume(&mut self) {
        if self.state.is_some() {
            self.running = true;
        }
    }

    /// Restart with the previous seed and character
    pub fn reset(&mut self) {
        self.stop();
        if let Some((seed, character)) = self.last_run {
            self.start(seed, character);
        }
    }

    /// Bring a dead player back at half hp. Returns false if not dead.
    pub fn revive(&mut self) -> bool {
        let Some(state) = self.state.as_mut() else {
            return false;
        };
        if !state.is_dead() {
            return false;
        }

        let now = state.elapsed;
        let player = &mut state.player;
        player.hp = player.max_hp / 2;
        player.grant_invulnerability(now, INVULNERABILITY_SECS);
        state.phase = GamePhase::Playing;
        log::info!("Revived with {} hp", state.player.hp);
        true
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Install the kill hook, replacing any previous one
    pub fn set_kill_hook(&mut self, hook: impl FnMut(&KillEvent) + 'static) {
        self.kill_hook = Some(Box::new(hook));
    }

    /// One fixed tick. `None` when no run is active.
    pub fn tick(&mut self, input: &TickInput, dt: f32) -> Option<StateSnapshot> {
        if !self.running {
            return None;
        }
        let state = self.state.as_mut()?;
        step(state, input, dt);

        if let Some(hook) = self.kill_hook.as_mut() {
            for event in &state.events {
                if let GameEvent::EnemyKilled(kill) = event {
                    hook(kill);
                }
            }
        }

        Some(StateSnapshot::of(state))
    }

    /// Run as many fixed ticks as `frame_dt` covers (capped per frame).
    ///
    /// One-shot inputs (pause, choice) apply to the first tick only.
    pub fn advance(&mut self, input: &TickInput, frame_dt: f32) -> Option<StateSnapshot> {
        if !self.running {
            return None;
        }
        self.accumulator += frame_dt.min(SIM_DT * MAX_SUBSTEPS as f32);

        let held = TickInput {
            choice: None,
            pause: false,
            ..input.clone()
        };
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = if substeps == 0 { input } else { &held };
            self.tick(input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        self.snapshot()
    }

    /// Current summary, if a run exists
    pub fn snapshot(&self) -> Option<StateSnapshot> {
        self.state.as_ref().map(StateSnapshot::of)
    }

    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    /// Mutable access for hosts (e.g. `world.mark_rendered`)
    pub fn state_mut(&mut self) -> Option<&mut GameState> {
        self.state.as_mut()
    }
}
