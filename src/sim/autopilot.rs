//! Demo/attract-mode controller
//!
//! Taps whenever the player has started falling below the next opening.
//! Used by the native headless host.

use super::obstacle::Obstacle;
use super::player::PlayerState;
use crate::consts::{PLAYER_HALF_SIZE, PLAYER_START_Y, PLAYER_X};

/// Default distance below the gap center at which the autopilot taps
pub const DEFAULT_AIM_OFFSET: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Autopilot {
    /// Tap once the player drops this far below the target
    pub aim_offset: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            aim_offset: DEFAULT_AIM_OFFSET,
        }
    }
}

impl Autopilot {
    /// Height the autopilot steers toward: the next opening, or mid-field
    pub fn target(&self, obstacles: &[Obstacle]) -> f32 {
        obstacles
            .iter()
            .find(|o| o.right() > PLAYER_X - PLAYER_HALF_SIZE)
            .map(|o| o.gap_center)
            .unwrap_or(PLAYER_START_Y)
    }

    pub fn wants_impulse(&self, player: &PlayerState, obstacles: &[Obstacle]) -> bool {
        player.velocity >= 0.0 && player.y > self.target(obstacles) + self.aim_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::difficulty::Tier;
    use crate::sim::obstacle::Distraction;

    fn obstacle(x: f32, gap_center: f32) -> Obstacle {
        Obstacle {
            id: 1,
            x,
            gap_center,
            gap_height: 40.0,
            scored: false,
            created_at_tier: Tier::Beginner,
            kind: Distraction::Slack,
        }
    }

    #[test]
    fn test_targets_next_opening() {
        let autopilot = Autopilot::default();
        assert_eq!(autopilot.target(&[]), PLAYER_START_Y);
        // The first obstacle is already behind the player
        let obstacles = [obstacle(-2.0, 30.0), obstacle(60.0, 70.0)];
        assert_eq!(autopilot.target(&obstacles), 70.0);
    }

    #[test]
    fn test_taps_only_when_falling_below_target() {
        let autopilot = Autopilot::default();
        let falling_low = PlayerState {
            y: 60.0,
            velocity: 1.0,
            rotation: 0.0,
        };
        assert!(autopilot.wants_impulse(&falling_low, &[]));

        let rising_low = PlayerState {
            velocity: -1.0,
            ..falling_low
        };
        assert!(!autopilot.wants_impulse(&rising_low, &[]));

        let falling_high = PlayerState {
            y: 52.0,
            ..falling_low
        };
        assert!(!autopilot.wants_impulse(&falling_high, &[]));
    }
}
