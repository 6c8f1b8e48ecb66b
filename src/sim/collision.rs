//! Collision detection, near misses and scoring
//!
//! Everything is axis-aligned: the player is a square at a fixed x, each
//! obstacle is a vertical band with one opening. The player's effective
//! hitbox is shrunk by the tier's `hitbox_margin` when tested against
//! obstacles, so low tiers forgive a little overlap with the sprite.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::difficulty::TierSettings;
use super::obstacle::Obstacle;
use crate::consts::*;

/// Axis-aligned box in field coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, half: Vec2) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Strict overlap on the x axis
    pub fn overlaps_x(&self, left: f32, right: f32) -> bool {
        self.max.x > left && self.min.x < right
    }

    pub fn top(&self) -> f32 {
        self.min.y
    }

    pub fn bottom(&self) -> f32 {
        self.max.y
    }
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionCause {
    /// Hit the top of the field
    Ceiling,
    /// Hit the bottom of the field
    Floor,
    /// Hit the wall of an obstacle
    Obstacle { id: u32 },
}

/// Result of a collision check
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    /// Terminal collision, if any
    pub collision: Option<CollisionCause>,
    /// Obstacles whose center passed the player for the first time
    pub scored_ids: Vec<u32>,
    /// Close call inside an obstacle opening (cosmetic)
    pub near_miss: bool,
}

impl CollisionReport {
    pub fn collided(&self) -> bool {
        self.collision.is_some()
    }
}

/// Effective hitbox used against obstacles
pub fn player_hitbox(player_y: f32, settings: &TierSettings) -> Aabb {
    let half = (PLAYER_HALF_SIZE - settings.hitbox_margin).max(0.0);
    Aabb::from_center(Vec2::new(PLAYER_X, player_y), Vec2::splat(half))
}

/// Check the player against the field edges and every obstacle.
///
/// Does not mutate anything: the caller marks `scored_ids` as scored.
pub fn check_collision(
    player_y: f32,
    obstacles: &[Obstacle],
    settings: &TierSettings,
) -> CollisionReport {
    let mut report = CollisionReport::default();

    // Field edges use the full sprite
    if player_y - PLAYER_HALF_SIZE < FIELD_TOP {
        report.collision = Some(CollisionCause::Ceiling);
    } else if player_y + PLAYER_HALF_SIZE > FIELD_BOTTOM {
        report.collision = Some(CollisionCause::Floor);
    }

    let hitbox = player_hitbox(player_y, settings);

    for obstacle in obstacles {
        if !obstacle.scored && obstacle.center_x() < PLAYER_X {
            report.scored_ids.push(obstacle.id);
        }

        if !hitbox.overlaps_x(obstacle.x, obstacle.right()) {
            continue;
        }

        let gap_top = obstacle.gap_top();
        let gap_bottom = obstacle.gap_bottom();

        if hitbox.top() < gap_top || hitbox.bottom() > gap_bottom {
            if report.collision.is_none() {
                report.collision = Some(CollisionCause::Obstacle { id: obstacle.id });
            }
            continue;
        }

        if hitbox.top() < gap_top + NEAR_MISS_THRESHOLD
            || hitbox.bottom() > gap_bottom - NEAR_MISS_THRESHOLD
        {
            report.near_miss = true;
        }
    }

    if report.collided() {
        report.near_miss = false;
    }

    report
}
