//! Sprite lookup with procedural fallbacks
//!
//! Hosts that have art implement [`SpriteSource`]; anything missing is drawn
//! as a simple colored shape. The simulation itself never looks sprites up.

use crate::sim::{CharacterId, DecorationKind, EnemyKind, PickupKind, Tile, WeaponKind};

/// Everything a renderer may need a picture for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKey {
    Player(CharacterId),
    Enemy(EnemyKind),
    Projectile(WeaponKind),
    Pickup(PickupKind),
    Tile(Tile),
    Decoration {
        kind: DecorationKind,
        variant: u8,
        destroyed: bool,
    },
}

impl SpriteKey {
    /// Asset-style name, e.g. `enemy_tank` or `decoration_crate_2_destroyed`
    pub fn name(&self) -> String {
        match self {
            SpriteKey::Player(character) => format!("player_{}", character.as_str()),
            SpriteKey::Enemy(kind) => format!("enemy_{}", enemy_name(*kind)),
            SpriteKey::Projectile(kind) => format!("projectile_{}", kind.as_str()),
            SpriteKey::Pickup(kind) => format!("pickup_{}", pickup_name(*kind)),
            SpriteKey::Tile(tile) => format!("tile_{}", tile_name(*tile)),
            SpriteKey::Decoration {
                kind,
                variant,
                destroyed,
            } => {
                let suffix = if *destroyed { "_destroyed" } else { "" };
                format!("decoration_{}_{}{}", decoration_name(*kind), variant, suffix)
            }
        }
    }
}

fn enemy_name(kind: EnemyKind) -> &'static str {
    match kind {
        EnemyKind::Basic => "basic",
        EnemyKind::Fast => "fast",
        EnemyKind::Tank => "tank",
        EnemyKind::Boss => "boss",
    }
}

fn pickup_name(kind: PickupKind) -> &'static str {
    match kind {
        PickupKind::Xp => "xp",
        PickupKind::Gold => "gold",
        PickupKind::Health => "health",
    }
}

fn tile_name(tile: Tile) -> &'static str {
    match tile {
        Tile::Floor => "floor",
        Tile::FloorCracked => "floor_cracked",
        Tile::FloorTiled => "floor_tiled",
        Tile::Wet => "wet",
        Tile::Moss => "moss",
    }
}

fn decoration_name(kind: DecorationKind) -> &'static str {
    match kind {
        DecorationKind::Pillar => "pillar",
        DecorationKind::Crate => "crate",
        DecorationKind::Barrel => "barrel",
        DecorationKind::Urn => "urn",
        DecorationKind::Bones => "bones",
        DecorationKind::Rubble => "rubble",
    }
}

/// Host-provided sprite lookup
pub trait SpriteSource {
    /// Whatever the host draws with (texture id, atlas rect, ...)
    type Handle;

    fn sprite(&self, key: &SpriteKey) -> Option<Self::Handle>;
}

/// A source with no art at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSprites;

impl SpriteSource for NoSprites {
    type Handle = ();

    fn sprite(&self, _key: &SpriteKey) -> Option<()> {
        None
    }
}

/// Primitive used when no sprite exists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Circle,
    Square,
    Diamond,
    Triangle,
}

/// Shape and RGBA color standing in for a missing sprite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackShape {
    pub shape: Shape,
    pub color: [f32; 4],
}

/// What to draw for a key
#[derive(Debug, Clone, PartialEq)]
pub enum Drawable<H> {
    Sprite(H),
    Fallback(FallbackShape),
}

/// Sprite from `source` when it has one, otherwise the fallback shape
pub fn resolve<S: SpriteSource + ?Sized>(source: &S, key: &SpriteKey) -> Drawable<S::Handle> {
    match source.sprite(key) {
        Some(handle) => Drawable::Sprite(handle),
        None => Drawable::Fallback(fallback(key)),
    }
}

/// Deterministic stand-in for `key`
pub fn fallback(key: &SpriteKey) -> FallbackShape {
    let (shape, color) = match key {
        SpriteKey::Player(_) => (Shape::Circle, [0.3, 0.6, 1.0, 1.0]),
        SpriteKey::Enemy(kind) => match kind {
            EnemyKind::Basic => (Shape::Circle, [0.8, 0.2, 0.2, 1.0]),
            EnemyKind::Fast => (Shape::Triangle, [1.0, 0.6, 0.1, 1.0]),
            EnemyKind::Tank => (Shape::Square, [0.5, 0.1, 0.5, 1.0]),
            EnemyKind::Boss => (Shape::Diamond, [0.6, 0.0, 0.0, 1.0]),
        },
        SpriteKey::Projectile(kind) => match kind {
            WeaponKind::MagicWand => (Shape::Circle, [0.5, 0.8, 1.0, 1.0]),
            WeaponKind::HolyNova => (Shape::Circle, [1.0, 1.0, 0.7, 1.0]),
            WeaponKind::Lightning => (Shape::Triangle, [0.9, 0.9, 1.0, 1.0]),
            WeaponKind::Garlic => (Shape::Circle, [0.9, 0.9, 0.8, 0.3]),
            WeaponKind::Knife => (Shape::Triangle, [0.8, 0.8, 0.8, 1.0]),
            WeaponKind::Bible => (Shape::Square, [0.9, 0.8, 0.4, 1.0]),
        },
        SpriteKey::Pickup(kind) => match kind {
            PickupKind::Xp => (Shape::Diamond, [0.2, 0.5, 1.0, 1.0]),
            PickupKind::Gold => (Shape::Circle, [1.0, 0.85, 0.2, 1.0]),
            PickupKind::Health => (Shape::Square, [0.2, 0.9, 0.3, 1.0]),
        },
        SpriteKey::Tile(tile) => match tile {
            Tile::Floor => (Shape::Square, [0.22, 0.2, 0.2, 1.0]),
            Tile::FloorCracked => (Shape::Square, [0.2, 0.18, 0.18, 1.0]),
            Tile::FloorTiled => (Shape::Square, [0.25, 0.23, 0.22, 1.0]),
            Tile::Wet => (Shape::Square, [0.15, 0.2, 0.3, 1.0]),
            Tile::Moss => (Shape::Square, [0.15, 0.3, 0.15, 1.0]),
        },
        SpriteKey::Decoration {
            kind,
            variant,
            destroyed,
        } => {
            let base = match kind {
                DecorationKind::Pillar => [0.5, 0.5, 0.55, 1.0],
                DecorationKind::Crate => [0.6, 0.4, 0.2, 1.0],
                DecorationKind::Barrel => [0.5, 0.3, 0.15, 1.0],
                DecorationKind::Urn => [0.7, 0.5, 0.35, 1.0],
                DecorationKind::Bones => [0.9, 0.9, 0.85, 1.0],
                DecorationKind::Rubble => [0.4, 0.38, 0.35, 1.0],
            };
            let color = shade(base, *variant);
            if *destroyed {
                // Broken remains read as dim debris
                (Shape::Diamond, [color[0] * 0.5, color[1] * 0.5, color[2] * 0.5, color[3]])
            } else {
                (Shape::Square, color)
            }
        }
    };
    FallbackShape { shape, color }
}

/// Darken a color a little per variant so variants stay distinguishable
fn shade(color: [f32; 4], variant: u8) -> [f32; 4] {
    let hash = crate::jitter_hash(variant as u32, 0x5eed);
    let factor = 0.8 + (hash % 200) as f32 / 1000.0;
    [color[0] * factor, color[1] * factor, color[2] * factor, color[3]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Atlas(HashMap<String, u32>);

    impl SpriteSource for Atlas {
        type Handle = u32;

        fn sprite(&self, key: &SpriteKey) -> Option<u32> {
            self.0.get(&key.name()).copied()
        }
    }

    #[test]
    fn test_resolve_prefers_sprite() {
        let atlas = Atlas(HashMap::from([("enemy_tank".to_string(), 7)]));
        assert_eq!(resolve(&atlas, &SpriteKey::Enemy(EnemyKind::Tank)), Drawable::Sprite(7));
        assert!(matches!(
            resolve(&atlas, &SpriteKey::Enemy(EnemyKind::Boss)),
            Drawable::Fallback(_)
        ));
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let key = SpriteKey::Decoration {
            kind: DecorationKind::Crate,
            variant: 2,
            destroyed: false,
        };
        assert_eq!(fallback(&key), fallback(&key));
        assert_eq!(resolve(&NoSprites, &key), Drawable::Fallback(fallback(&key)));

        let broken = SpriteKey::Decoration {
            kind: DecorationKind::Crate,
            variant: 2,
            destroyed: true,
        };
        assert_eq!(fallback(&broken), fallback(&broken));
        assert_ne!(fallback(&broken), fallback(&key));
        assert_eq!(fallback(&broken).shape, Shape::Diamond);
        assert!(fallback(&broken).color[0] < fallback(&key).color[0]);
    }

    #[test]
    fn test_names() {
        assert_eq!(SpriteKey::Player(CharacterId::Antonio).name(), "player_antonio");
        assert_eq!(SpriteKey::Tile(Tile::FloorCracked).name(), "tile_floor_cracked");
        assert_eq!(
            SpriteKey::Decoration {
                kind: DecorationKind::Urn,
                variant: 1,
                destroyed: false,
            }
            .name(),
            "decoration_urn_1"
        );
        assert_eq!(
            SpriteKey::Decoration {
                kind: DecorationKind::Crate,
                variant: 2,
                destroyed: true,
            }
            .name(),
            "decoration_crate_2_destroyed"
        );
    }

    #[test]
    fn test_shade_stays_in_range() {
        for variant in 0..8 {
            let c = shade([1.0, 1.0, 1.0, 0.5], variant);
            assert!(c.iter().take(3).all(|v| (0.8..=1.0).contains(v)));
            assert_eq!(c[3], 0.5);
        }
    }
}
