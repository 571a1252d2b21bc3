//! Game state and core simulation types
//!
//! Everything one run needs lives in `GameState`. Entities sit in flat
//! vectors sorted by id; systems refer to each other's entities by id only.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::progression::LevelUpChoice;
use super::rng::Prng;
use super::weapons::{Weapon, WeaponKind};
use super::world::ChunkWorld;
use crate::consts::*;
use crate::settings::Settings;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Waiting for the player to pick a level-up option
    LevelUp,
    /// Paused by the player
    Paused,
    /// Run ended (can still be revived)
    Dead,
}

/// Playable characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CharacterId {
    #[default]
    Imelda,
    Antonio,
    Pasqualina,
    Gennaro,
    Mortaccio,
    Vitalis,
}

impl CharacterId {
    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterId::Imelda => "imelda",
            CharacterId::Antonio => "antonio",
            CharacterId::Pasqualina => "pasqualina",
            CharacterId::Gennaro => "gennaro",
            CharacterId::Mortaccio => "mortaccio",
            CharacterId::Vitalis => "vitalis",
        }
    }

    /// Unknown names fall back to the starter character
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "antonio" => CharacterId::Antonio,
            "pasqualina" => CharacterId::Pasqualina,
            "gennaro" => CharacterId::Gennaro,
            "mortaccio" => CharacterId::Mortaccio,
            "vitalis" => CharacterId::Vitalis,
            _ => CharacterId::Imelda,
        }
    }

    pub fn base_hp(&self) -> u32 {
        match self {
            CharacterId::Imelda => 100,
            CharacterId::Antonio => 120,
            CharacterId::Pasqualina => 80,
            CharacterId::Gennaro => 110,
            CharacterId::Mortaccio => 90,
            CharacterId::Vitalis => 95,
        }
    }

    pub fn starting_weapon(&self) -> WeaponKind {
        match self {
            CharacterId::Imelda => WeaponKind::MagicWand,
            CharacterId::Antonio => WeaponKind::Garlic,
            CharacterId::Pasqualina => WeaponKind::HolyNova,
            CharacterId::Gennaro => WeaponKind::Knife,
            CharacterId::Mortaccio => WeaponKind::Bible,
            CharacterId::Vitalis => WeaponKind::Lightning,
        }
    }
}

/// The player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Last nonzero movement direction (unit length)
    pub facing: Vec2,
    pub hp: u32,
    pub max_hp: u32,
    pub speed: f32,
    pub radius: f32,
    pub invulnerable: bool,
    /// Elapsed time at which invulnerability ends
    pub invulnerable_until: f32,
    pub weapons: Vec<Weapon>,
    pub character: CharacterId,
}

impl Player {
    pub fn new(character: CharacterId) -> Self {
        let hp = character.base_hp();
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            facing: Vec2::X,
            hp,
            max_hp: hp,
            speed: PLAYER_SPEED,
            radius: PLAYER_RADIUS,
            invulnerable: false,
            invulnerable_until: 0.0,
            weapons: vec![Weapon::new(character.starting_weapon())],
            character,
        }
    }

    pub fn weapon(&self, kind: WeaponKind) -> Option<&Weapon> {
        self.weapons.iter().find(|w| w.kind == kind)
    }

    pub fn owns(&self, kind: WeaponKind) -> bool {
        self.weapon(kind).is_some()
    }

    /// Heal, clamped to max hp
    pub fn heal(&mut self, amount: u32) {
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
    }

    /// Start an invulnerability window ending `secs` after `now`
    pub fn grant_invulnerability(&mut self, now: f32, secs: f32) {
        self.invulnerable = true;
        self.invulnerable_until = now + secs;
    }
}

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Basic,
    Fast,
    Tank,
    Boss,
}

/// Per-tick movement pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Behavior {
    /// Steer straight at the player every tick
    Chase,
    /// Aim once while stationary, then rush in a straight line
    Charge,
    /// Orbit the player while slowly closing in
    Circle,
    /// Occasionally blink toward the player when far away
    Teleport,
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub hp: f32,
    pub max_hp: f32,
    pub damage: u32,
    pub speed: f32,
    pub xp_reward: u32,
    pub gold_reward: u32,
    pub radius: f32,
    pub behavior: Behavior,
    /// Seconds of white flash left after being hit
    pub hit_flash: f32,
}

impl Enemy {
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.hp -= amount;
        self.hit_flash = HIT_FLASH_SECS;
    }
}

/// Seconds an enemy flashes after a hit
pub const HIT_FLASH_SECS: f32 = 0.1;

/// A projectile entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub weapon: WeaponKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: f32,
    /// Seconds left (ignored for orbiters)
    pub lifetime: f32,
    pub pierce: u32,
    /// Enemy ids already damaged
    pub hit_enemies: Vec<u32>,
    /// Facing angle for rendering, or orbit angle for orbiters
    pub angle: f32,
    /// Set for projectiles that circle the player
    pub orbit_radius: Option<f32>,
    pub hit_radius: f32,
}

impl Projectile {
    #[inline]
    pub fn is_orbiting(&self) -> bool {
        self.orbit_radius.is_some()
    }

    /// Pierce budget used up (orbiters never run out)
    #[inline]
    pub fn is_spent(&self) -> bool {
        !self.is_orbiting() && self.hit_enemies.len() as u32 >= self.pierce
    }
}

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    Xp,
    Gold,
    Health,
}

impl PickupKind {
    /// Speed at which a magnetized pickup flies to the player
    pub fn magnet_speed(self) -> f32 {
        match self {
            PickupKind::Xp => 300.0,
            PickupKind::Gold => 250.0,
            PickupKind::Health => 200.0,
        }
    }
}

/// A pickup entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    pub pos: Vec2,
    pub value: u32,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: u32,
    pub life: f32, // 0-1, decreases over time
    pub size: f32,
}

/// Enemy death, handed to the host's kill hook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KillEvent {
    pub enemy_id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub total_kills: u32,
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemyKilled(KillEvent),
    BossSpawned { enemy_id: u32, wave: u32 },
    WaveStarted { wave: u32 },
    LevelUp { level: u32 },
    PlayerDied,
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Gameplay randomness (spawns, behaviors, choice offers)
    pub rng: Prng,
    pub settings: Settings,
    pub world: ChunkWorld,
    pub phase: GamePhase,
    /// Seconds of gameplay simulated
    pub elapsed: f32,
    pub time_ticks: u64,
    /// Current wave (1-based)
    pub wave: u32,
    pub boss_spawned_this_wave: bool,
    pub last_spawn_time: f32,
    pub xp: u32,
    pub level: u32,
    pub gold: u32,
    pub kills: u32,
    pub player: Player,
    /// Active entities (sorted by id for determinism)
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub pickups: Vec<Pickup>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Elapsed time of each weapon's last fire, indexed by `WeaponKind::index`
    pub last_fire: [Option<f32>; WeaponKind::COUNT],
    /// Options on offer while in `GamePhase::LevelUp`
    pub pending_choices: Vec<LevelUpChoice>,
    /// Events raised this tick, drained by the scheduler
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Fresh run with the given seed and character
    pub fn new(seed: u64, character: CharacterId, settings: Settings) -> Self {
        let world = ChunkWorld::new(seed, &settings);
        Self {
            seed,
            rng: Prng::new(seed ^ GAMEPLAY_STREAM_SALT),
            settings,
            world,
            phase: GamePhase::Playing,
            elapsed: 0.0,
            time_ticks: 0,
            wave: 1,
            boss_spawned_this_wave: false,
            last_spawn_time: 0.0,
            xp: 0,
            level: 1,
            gold: 0,
            kills: 0,
            player: Player::new(character),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
            particles: Vec::new(),
            last_fire: [None; WeaponKind::COUNT],
            pending_choices: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_dead(&self) -> bool {
        self.phase == GamePhase::Dead
    }

    pub fn spawn_pickup(&mut self, kind: PickupKind, pos: Vec2, value: u32) {
        let id = self.next_entity_id();
        self.pickups.push(Pickup { id, kind, pos, value });
    }

    /// Camera rectangle centered on the player
    pub fn camera_half_extents(&self) -> Vec2 {
        self.settings.half_viewport()
    }

    /// Burst of hit sparks (deterministic hash spread, no RNG draw)
    pub fn spawn_hit_particles(&mut self, pos: Vec2, color: u32, count: u32) {
        let seed = self.time_ticks as u32;
        for i in 0..count {
            if self.particles.len() >= MAX_PARTICLES {
                self.particles.remove(0);
            }
            let hash = crate::jitter_hash(seed, i.wrapping_add(color * 131));
            let angle = (hash % 1000) as f32 / 1000.0 * std::f32::consts::TAU;
            let speed = 60.0 + ((hash >> 10) % 100) as f32;
            self.particles.push(Particle {
                pos,
                vel: crate::polar_to_cartesian(speed, angle),
                color,
                life: 1.0,
                size: 2.0 + ((hash >> 20) % 100) as f32 / 50.0,
            });
        }
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.projectiles.sort_by_key(|p| p.id);
        self.pickups.sort_by_key(|p| p.id);
    }
}

/// Keeps the gameplay stream distinct from chunk streams sharing the seed
const GAMEPLAY_STREAM_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_parse_falls_back() {
        assert_eq!(CharacterId::parse("Antonio"), CharacterId::Antonio);
        assert_eq!(CharacterId::parse("nobody"), CharacterId::Imelda);
        assert_eq!(CharacterId::parse(CharacterId::Vitalis.as_str()), CharacterId::Vitalis);
    }

    #[test]
    fn test_new_player_uses_character_stats() {
        let player = Player::new(CharacterId::Pasqualina);
        assert_eq!(player.hp, 80);
        assert_eq!(player.max_hp, 80);
        assert!(player.owns(WeaponKind::HolyNova));
    }

    #[test]
    fn test_heal_clamps() {
        let mut player = Player::new(CharacterId::Imelda);
        player.hp = 90;
        player.heal(50);
        assert_eq!(player.hp, player.max_hp);
    }

    #[test]
    fn test_projectile_spent() {
        let mut p = Projectile {
            id: 1,
            weapon: WeaponKind::Knife,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            damage: 1.0,
            lifetime: 1.0,
            pierce: 2,
            hit_enemies: vec![4],
            angle: 0.0,
            orbit_radius: None,
            hit_radius: 6.0,
        };
        assert!(!p.is_spent());
        p.hit_enemies.push(5);
        assert!(p.is_spent());
        p.orbit_radius = Some(80.0);
        assert!(!p.is_spent());
    }

    #[test]
    fn test_new_state_starts_at_wave_one() {
        let state = GameState::new(7, CharacterId::default(), Settings::default());
        assert_eq!(state.wave, 1);
        assert_eq!(state.level, 1);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.last_fire.iter().all(Option::is_none));
    }
}
