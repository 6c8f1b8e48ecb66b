//! Progressive difficulty
//!
//! Five fixed tiers selected by score. Every knob moves toward "harder" as the
//! tier increases and the ramp stops at `Tier::Expert`.

use serde::{Deserialize, Serialize};

/// Physics and spawn parameters for one tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierSettings {
    /// Added to vertical velocity every tick
    pub gravity: f32,
    /// Velocity assigned by an impulse (negative is up)
    pub impulse_velocity: f32,
    pub terminal_velocity: f32,
    /// Height of the opening in each obstacle
    pub gap_height: f32,
    pub obstacle_speed: f32,
    pub spawn_interval_ms: f64,
    /// How much smaller the effective hitbox is than the sprite (per side)
    pub hitbox_margin: f32,
    /// Max distance of a gap center from the field middle
    pub gap_variance: f32,
}

/// Difficulty tier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum Tier {
    #[default]
    Beginner,
    Easy,
    Normal,
    Hard,
    Expert,
}

impl Tier {
    pub const ALL: [Tier; 5] = [
        Tier::Beginner,
        Tier::Easy,
        Tier::Normal,
        Tier::Hard,
        Tier::Expert,
    ];

    /// Tier reached at a given score
    pub fn for_score(score: u32) -> Self {
        match score {
            0..3 => Tier::Beginner,
            3..7 => Tier::Easy,
            7..15 => Tier::Normal,
            15..25 => Tier::Hard,
            _ => Tier::Expert,
        }
    }

    /// 1-based level number for display
    pub fn level(self) -> u8 {
        self as u8 + 1
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::Beginner => "BEGINNER",
            Tier::Easy => "EASY",
            Tier::Normal => "NORMAL",
            Tier::Hard => "HARD",
            Tier::Expert => "EXPERT",
        }
    }

    pub fn settings(self) -> TierSettings {
        match self {
            Tier::Beginner => TierSettings {
                gravity: 0.22,
                impulse_velocity: -4.5,
                terminal_velocity: 5.5,
                gap_height: 45.0,
                obstacle_speed: 1.8,
                spawn_interval_ms: 2800.0,
                hitbox_margin: 5.0,
                gap_variance: 8.0,
            },
            Tier::Easy => TierSettings {
                gravity: 0.25,
                impulse_velocity: -4.8,
                terminal_velocity: 6.0,
                gap_height: 42.0,
                obstacle_speed: 2.0,
                spawn_interval_ms: 2500.0,
                hitbox_margin: 4.5,
                gap_variance: 12.0,
            },
            Tier::Normal => TierSettings {
                gravity: 0.28,
                impulse_velocity: -5.0,
                terminal_velocity: 6.5,
                gap_height: 38.0,
                obstacle_speed: 2.3,
                spawn_interval_ms: 2200.0,
                hitbox_margin: 4.0,
                gap_variance: 15.0,
            },
            Tier::Hard => TierSettings {
                gravity: 0.30,
                impulse_velocity: -5.2,
                terminal_velocity: 7.0,
                gap_height: 35.0,
                obstacle_speed: 2.6,
                spawn_interval_ms: 1900.0,
                hitbox_margin: 3.5,
                gap_variance: 18.0,
            },
            Tier::Expert => TierSettings {
                gravity: 0.32,
                impulse_velocity: -5.4,
                terminal_velocity: 7.5,
                gap_height: 32.0,
                obstacle_speed: 2.9,
                spawn_interval_ms: 1700.0,
                hitbox_margin: 3.0,
                gap_variance: 22.0,
            },
        }
    }
}

/// Settings in effect at a given score
pub fn tier(score: u32) -> TierSettings {
    Tier::for_score(score).settings()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_thresholds() {
        assert_eq!(Tier::for_score(0), Tier::Beginner);
        assert_eq!(Tier::for_score(2), Tier::Beginner);
        assert_eq!(Tier::for_score(3), Tier::Easy);
        assert_eq!(Tier::for_score(6), Tier::Easy);
        assert_eq!(Tier::for_score(7), Tier::Normal);
        assert_eq!(Tier::for_score(14), Tier::Normal);
        assert_eq!(Tier::for_score(15), Tier::Hard);
        assert_eq!(Tier::for_score(24), Tier::Hard);
        assert_eq!(Tier::for_score(25), Tier::Expert);
        assert_eq!(Tier::for_score(10_000), Tier::Expert);
    }

    #[test]
    fn test_levels_and_labels() {
        let levels: Vec<u8> = Tier::ALL.iter().map(|t| t.level()).collect();
        assert_eq!(levels, vec![1, 2, 3, 4, 5]);
        assert_eq!(Tier::Hard.label(), "HARD");
    }

    #[test]
    fn test_beginner_values() {
        let s = tier(0);
        assert_eq!(s.gravity, 0.22);
        assert_eq!(s.impulse_velocity, -4.5);
        assert_eq!(s.spawn_interval_ms, 2800.0);
    }

    #[test]
    fn test_each_tier_is_harder_on_every_axis() {
        for pair in Tier::ALL.windows(2) {
            let (easy, hard) = (pair[0].settings(), pair[1].settings());
            assert!(hard.gap_height < easy.gap_height);
            assert!(hard.obstacle_speed > easy.obstacle_speed);
            assert!(hard.spawn_interval_ms < easy.spawn_interval_ms);
            assert!(hard.hitbox_margin < easy.hitbox_margin);
            assert!(hard.gap_variance > easy.gap_variance);
            assert!(hard.gravity > easy.gravity);
        }
    }

    proptest! {
        #[test]
        fn prop_difficulty_is_monotonic(a in 0u32..200, b in 0u32..200) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(Tier::for_score(lo) <= Tier::for_score(hi));

            let (easy, hard) = (tier(lo), tier(hi));
            prop_assert!(hard.gap_height <= easy.gap_height);
            prop_assert!(hard.obstacle_speed >= easy.obstacle_speed);
        }
    }
}
