//! Weapon definitions and upgrade tables
//!
//! Each weapon kind has a fixed table of stat rows, one per level. A weapon
//! instance is just its kind plus a copy of the current row; upgrading swaps
//! in the next row wholesale.

use serde::{Deserialize, Serialize};

/// Weapon kinds, one firing algorithm each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Homing bolts at the nearest enemies
    MagicWand,
    /// Radial burst with a rotating phase
    HolyNova,
    /// Instant strike on the nearest enemies, no projectile
    Lightning,
    /// Damaging aura around the player, no projectile
    Garlic,
    /// Fan of knives along the facing direction
    Knife,
    /// Books orbiting the player
    Bible,
}

impl WeaponKind {
    pub const COUNT: usize = 6;

    pub const ALL: [WeaponKind; Self::COUNT] = [
        WeaponKind::MagicWand,
        WeaponKind::HolyNova,
        WeaponKind::Lightning,
        WeaponKind::Garlic,
        WeaponKind::Knife,
        WeaponKind::Bible,
    ];

    /// Dense index for enum-keyed arrays
    #[inline]
    pub fn index(self) -> usize {
        match self {
            WeaponKind::MagicWand => 0,
            WeaponKind::HolyNova => 1,
            WeaponKind::Lightning => 2,
            WeaponKind::Garlic => 3,
            WeaponKind::Knife => 4,
            WeaponKind::Bible => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponKind::MagicWand => "magic_wand",
            WeaponKind::HolyNova => "holy_nova",
            WeaponKind::Lightning => "lightning",
            WeaponKind::Garlic => "garlic",
            WeaponKind::Knife => "knife",
            WeaponKind::Bible => "bible",
        }
    }

    fn table(self) -> &'static [WeaponStats] {
        match self {
            WeaponKind::MagicWand => &MAGIC_WAND,
            WeaponKind::HolyNova => &HOLY_NOVA,
            WeaponKind::Lightning => &LIGHTNING,
            WeaponKind::Garlic => &GARLIC,
            WeaponKind::Knife => &KNIFE,
            WeaponKind::Bible => &BIBLE,
        }
    }

    pub fn max_level(self) -> u32 {
        self.table().len() as u32
    }

    /// Stat row for `level` (1-based).
    ///
    /// Panics when the level is outside the table: the engine and the data
    /// tables disagree and clamping would hide it.
    pub fn stats(self, level: u32) -> WeaponStats {
        let table = self.table();
        assert!(
            level >= 1 && level as usize <= table.len(),
            "{} has no level {} (max {})",
            self.as_str(),
            level,
            table.len()
        );
        table[level as usize - 1]
    }

    /// Collision radius of this weapon's projectiles (before area scaling)
    pub fn hit_radius(self) -> f32 {
        match self {
            WeaponKind::MagicWand => 8.0,
            WeaponKind::HolyNova => 10.0,
            WeaponKind::Knife => 6.0,
            WeaponKind::Bible => 14.0,
            WeaponKind::Lightning | WeaponKind::Garlic => 0.0,
        }
    }

    /// Whether projectiles of this kind orbit the player instead of flying
    #[inline]
    pub fn is_orbiting(self) -> bool {
        matches!(self, WeaponKind::Bible)
    }
}

/// One level's worth of weapon stats
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponStats {
    pub damage: f32,
    /// Seconds between fires (re-hit interval for orbiters)
    pub cooldown: f32,
    pub projectile_speed: f32,
    pub projectile_count: u32,
    /// Targeting range, aura radius or orbit radius
    pub range: f32,
    pub pierce: u32,
    /// Area multiplier
    pub area: f32,
    /// Projectile lifetime in seconds
    pub duration: f32,
}

const fn row(
    damage: f32,
    cooldown: f32,
    projectile_speed: f32,
    projectile_count: u32,
    range: f32,
    pierce: u32,
    area: f32,
    duration: f32,
) -> WeaponStats {
    WeaponStats {
        damage,
        cooldown,
        projectile_speed,
        projectile_count,
        range,
        pierce,
        area,
        duration,
    }
}

//                          dmg   cd    speed  n  range  pierce area duration
const MAGIC_WAND: [WeaponStats; 5] = [
    row(10.0, 1.0, 400.0, 1, 450.0, 1, 1.0, 1.5),
    row(10.0, 0.9, 400.0, 2, 450.0, 1, 1.0, 1.5),
    row(15.0, 0.9, 420.0, 2, 475.0, 2, 1.0, 1.5),
    row(15.0, 0.8, 420.0, 3, 475.0, 2, 1.0, 1.5),
    row(20.0, 0.7, 450.0, 3, 500.0, 3, 1.0, 1.5),
];

const HOLY_NOVA: [WeaponStats; 5] = [
    row(8.0, 2.5, 250.0, 6, 300.0, 1, 1.0, 1.2),
    row(10.0, 2.3, 250.0, 8, 300.0, 1, 1.0, 1.2),
    row(12.0, 2.1, 260.0, 10, 320.0, 2, 1.1, 1.2),
    row(14.0, 1.9, 260.0, 12, 320.0, 2, 1.2, 1.3),
    row(16.0, 1.7, 280.0, 14, 340.0, 2, 1.3, 1.4),
];

const LIGHTNING: [WeaponStats; 5] = [
    row(20.0, 2.0, 0.0, 1, 400.0, 1, 1.0, 0.0),
    row(25.0, 1.8, 0.0, 2, 400.0, 1, 1.0, 0.0),
    row(30.0, 1.6, 0.0, 2, 425.0, 1, 1.0, 0.0),
    row(35.0, 1.5, 0.0, 3, 450.0, 1, 1.0, 0.0),
    row(45.0, 1.3, 0.0, 4, 475.0, 1, 1.0, 0.0),
];

const GARLIC: [WeaponStats; 5] = [
    row(4.0, 0.5, 0.0, 0, 60.0, 0, 1.0, 0.0),
    row(5.0, 0.5, 0.0, 0, 60.0, 0, 1.2, 0.0),
    row(6.0, 0.45, 0.0, 0, 60.0, 0, 1.3, 0.0),
    row(7.0, 0.45, 0.0, 0, 60.0, 0, 1.4, 0.0),
    row(8.0, 0.4, 0.0, 0, 60.0, 0, 1.6, 0.0),
];

const KNIFE: [WeaponStats; 5] = [
    row(8.0, 0.8, 550.0, 1, 500.0, 1, 1.0, 1.0),
    row(10.0, 0.7, 550.0, 2, 500.0, 1, 1.0, 1.0),
    row(10.0, 0.6, 575.0, 3, 500.0, 2, 1.0, 1.0),
    row(12.0, 0.6, 575.0, 3, 525.0, 2, 1.0, 1.0),
    row(14.0, 0.5, 600.0, 4, 550.0, 3, 1.0, 1.0),
];

const BIBLE: [WeaponStats; 5] = [
    row(8.0, 0.6, 0.0, 1, 80.0, 1, 1.0, 0.0),
    row(10.0, 0.6, 0.0, 2, 80.0, 1, 1.0, 0.0),
    row(10.0, 0.5, 0.0, 3, 90.0, 1, 1.1, 0.0),
    row(12.0, 0.5, 0.0, 3, 90.0, 1, 1.2, 0.0),
    row(15.0, 0.4, 0.0, 4, 100.0, 1, 1.3, 0.0),
];

/// An owned weapon: kind, level and that level's stat row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub kind: WeaponKind,
    pub level: u32,
    pub stats: WeaponStats,
}

impl Weapon {
    pub fn new(kind: WeaponKind) -> Self {
        Self {
            kind,
            level: 1,
            stats: kind.stats(1),
        }
    }

    pub fn is_maxed(&self) -> bool {
        self.level >= self.kind.max_level()
    }

    /// Next level's weapon. Panics past the last row.
    pub fn upgraded(&self) -> Self {
        let level = self.level + 1;
        Self {
            kind: self.kind,
            level,
            stats: self.kind.stats(level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_is_dense_and_matches_all() {
        for (i, kind) in WeaponKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_upgrade_swaps_whole_row() {
        let wand = Weapon::new(WeaponKind::MagicWand);
        let next = wand.upgraded();
        assert_eq!(next.level, 2);
        assert_eq!(next.stats, WeaponKind::MagicWand.stats(2));
    }

    #[test]
    fn test_maxed_after_last_row() {
        let mut knife = Weapon::new(WeaponKind::Knife);
        while !knife.is_maxed() {
            knife = knife.upgraded();
        }
        assert_eq!(knife.level, 5);
    }

    #[test]
    #[should_panic(expected = "has no level 6")]
    fn test_level_past_table_panics() {
        WeaponKind::Garlic.stats(6);
    }

    #[test]
    #[should_panic]
    fn test_upgrading_maxed_weapon_panics() {
        let mut bible = Weapon::new(WeaponKind::Bible);
        for _ in 0..5 {
            bible = bible.upgraded();
        }
    }
}
