//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod chunk;
pub mod collision;
pub mod combat;
pub mod motion;
pub mod progression;
pub mod rng;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod weapons;
pub mod world;

pub use chunk::{Chunk, ChunkCoord, Decoration, DecorationId, DecorationKind, Tile, generate_chunk};
pub use collision::{Aabb, CollisionResult, circle_aabb_collision};
pub use progression::{LevelUpChoice, level_for_xp};
pub use rng::Prng;
pub use state::{
    Behavior, CharacterId, Enemy, EnemyKind, GameEvent, GamePhase, GameState, KillEvent, Pickup,
    PickupKind, Player, Projectile,
};
pub use tick::{KillHook, Simulation, StateSnapshot, TickInput, step};
pub use weapons::{Weapon, WeaponKind, WeaponStats};
pub use world::{ChunkWorld, DecorationHit, WindowChange};
