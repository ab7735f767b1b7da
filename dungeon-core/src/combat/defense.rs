//! Defensive math: armor mitigation and dodge rating.
//!
//! - Armor removes `armor / (armor + ARMOR_HALF_POINT)` of incoming damage,
//!   so it never reaches full immunity.
//! - Dodge lowers the attacker's hit chance point for point against dexterity.

use crate::constants::{ARMOR_HALF_POINT, MIN_DAMAGE};

/// Fraction of damage removed by `armor`, in `[0, 1)`.
pub fn armor_reduction(armor: i32) -> f32 {
    let armor = armor.max(0) as f32;
    armor / (armor + ARMOR_HALF_POINT)
}

/// Apply armor to pre-mitigation damage. Result is at least [`MIN_DAMAGE`].
pub fn mitigate(pre_mitigation: f32, armor: i32) -> u32 {
    let after = pre_mitigation.max(0.0) * (1.0 - armor_reduction(armor));
    (after.round() as u32).max(MIN_DAMAGE)
}

/// Dodge rating from dexterity plus flat gear dodge.
pub fn dodge_rating(dexterity: i32, gear_dodge: i32) -> i32 {
    (dexterity / 2 + gear_dodge).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_armor_reduction_curve() {
        assert!(armor_reduction(0).abs() < f32::EPSILON);
        assert!((armor_reduction(20) - 0.5).abs() < f32::EPSILON);
        assert!(armor_reduction(10_000) < 1.0);
        assert!(armor_reduction(-5).abs() < f32::EPSILON, "negative armor counts as zero");
    }

    #[test]
    fn test_mitigate_has_floor() {
        assert_eq!(mitigate(0.0, 0), MIN_DAMAGE);
        assert_eq!(mitigate(1.0, 500), MIN_DAMAGE);
        assert_eq!(mitigate(20.0, 20), 10);
    }

    #[test]
    fn test_more_armor_never_more_damage() {
        let mut last = u32::MAX;
        for armor in 0..100 {
            let dmg = mitigate(50.0, armor);
            assert!(dmg <= last, "armor {armor}: {dmg} > {last}");
            last = dmg;
        }
    }

    #[test]
    fn test_dodge_rating() {
        assert_eq!(dodge_rating(10, 0), 5);
        assert_eq!(dodge_rating(10, 3), 8);
        assert_eq!(dodge_rating(0, -4), 0);
    }
}
