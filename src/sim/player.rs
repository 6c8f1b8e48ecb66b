//! Player physics
//!
//! Gravity and impulse integration for the diver. Pure functions: each call
//! returns the next state and never touches anything else.

use serde::{Deserialize, Serialize};

use super::difficulty::TierSettings;
use crate::consts::*;

/// Vertical state of the player (x is fixed at `PLAYER_X`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Center height in percent of the field (0 = top)
    pub y: f32,
    /// Positive is downward
    pub velocity: f32,
    /// Sprite tilt in degrees (cosmetic)
    pub rotation: f32,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            y: PLAYER_START_Y,
            velocity: 0.0,
            rotation: 0.0,
        }
    }
}

impl PlayerState {
    /// Advance one fixed tick under gravity
    pub fn integrate(self, settings: &TierSettings) -> Self {
        let mut velocity = self.velocity + settings.gravity;
        // Floaty ascent
        if velocity < 0.0 {
            velocity *= RISE_DAMPING;
        }
        let velocity = velocity.clamp(-settings.terminal_velocity, settings.terminal_velocity);
        let y = (self.y + velocity * PLAYER_INTEGRATION_SCALE).clamp(0.0, 100.0);

        let target = if velocity > 0.0 {
            (velocity * 6.0).min(50.0)
        } else {
            (velocity * 3.0).max(-15.0)
        };
        let rotation = self.rotation + (target - self.rotation) * ROTATION_EASING;

        Self {
            y,
            velocity,
            rotation,
        }
    }

    /// Replace the current velocity with the tier's impulse.
    ///
    /// Absolute, not additive: tapping while already rising restarts the
    /// full impulse instead of stacking.
    pub fn apply_impulse(self, settings: &TierSettings) -> Self {
        Self {
            velocity: settings.impulse_velocity,
            ..self
        }
    }

    /// Visual top edge of the sprite
    pub fn top(&self) -> f32 {
        self.y - PLAYER_HALF_SIZE
    }

    /// Visual bottom edge of the sprite
    pub fn bottom(&self) -> f32 {
        self.y + PLAYER_HALF_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::difficulty::{Tier, tier};
    use proptest::prelude::*;

    #[test]
    fn test_gravity_pulls_down() {
        let settings = tier(0);
        let next = PlayerState::default().integrate(&settings);
        assert!((next.velocity - 0.22).abs() < 1e-6);
        assert!((next.y - (50.0 + 0.22 * 0.55)).abs() < 1e-5);
        assert!(next.rotation > 0.0);
    }

    #[test]
    fn test_impulse_is_absolute() {
        let settings = tier(0);
        let rising = PlayerState {
            velocity: -3.0,
            ..Default::default()
        };
        assert_eq!(rising.apply_impulse(&settings).velocity, -4.5);

        let falling = PlayerState {
            velocity: 5.0,
            ..Default::default()
        };
        assert_eq!(falling.apply_impulse(&settings).velocity, -4.5);
        assert_eq!(falling.apply_impulse(&settings).y, falling.y);
    }

    #[test]
    fn test_single_impulse_rises_peaks_and_falls() {
        let settings = tier(0);
        let mut player = PlayerState::default().apply_impulse(&settings);
        assert_eq!(player.velocity, -4.5);

        let mut heights = vec![player.y];
        for _ in 0..40 {
            player = player.integrate(&settings);
            heights.push(player.y);
        }

        let peak = heights
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert!(peak > 0 && peak < heights.len() - 1);
        // Strictly rising before the peak, falling after it
        assert!(heights[..=peak].windows(2).all(|w| w[1] < w[0]));
        assert!(heights[peak..].windows(2).all(|w| w[1] >= w[0]));
        // Damping slows the ascent: second rise step is shorter than the first
        assert!((heights[1] - heights[2]) < (heights[0] - heights[1]));
    }

    #[test]
    fn test_position_clamped_to_field() {
        let settings = tier(0);
        let mut player = PlayerState {
            y: 99.5,
            velocity: 5.5,
            rotation: 0.0,
        };
        player = player.integrate(&settings);
        assert_eq!(player.y, 100.0);

        let mut player = PlayerState {
            y: 0.5,
            velocity: -5.5,
            rotation: 0.0,
        };
        player = player.integrate(&settings);
        assert_eq!(player.y, 0.0);
    }

    proptest! {
        #[test]
        fn prop_velocity_stays_within_terminal(
            taps in prop::collection::vec(any::<bool>(), 1..300),
            tier_index in 0usize..5,
            start_velocity in -20.0f32..20.0,
        ) {
            let settings = Tier::ALL[tier_index].settings();
            let mut player = PlayerState { velocity: start_velocity, ..Default::default() };
            for tap in taps {
                if tap {
                    player = player.apply_impulse(&settings);
                }
                player = player.integrate(&settings);
                prop_assert!(player.velocity.abs() <= settings.terminal_velocity);
                prop_assert!((0.0..=100.0).contains(&player.y));
            }
        }
    }
}
