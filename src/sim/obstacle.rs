//! Obstacles and the spawner
//!
//! Obstacles enter from the right, move left at the current tier's speed and
//! are dropped once fully off-screen. Gap geometry is fixed at spawn time.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::difficulty::{Tier, TierSettings};
use crate::consts::*;

/// What an obstacle looks like (cosmetic only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Distraction {
    Phone,
    Email,
    Slack,
    Meeting,
    Notification,
    Games,
    Tv,
    Social,
}

impl Distraction {
    pub const ALL: [Distraction; 8] = [
        Distraction::Phone,
        Distraction::Email,
        Distraction::Slack,
        Distraction::Meeting,
        Distraction::Notification,
        Distraction::Games,
        Distraction::Tv,
        Distraction::Social,
    ];

    pub fn emoji(self) -> &'static str {
        match self {
            Distraction::Phone => "📱",
            Distraction::Email => "📧",
            Distraction::Slack => "💬",
            Distraction::Meeting => "🗓️",
            Distraction::Notification => "🔔",
            Distraction::Games => "🎮",
            Distraction::Tv => "📺",
            Distraction::Social => "🐦",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Distraction::Phone => "Phone",
            Distraction::Email => "Email",
            Distraction::Slack => "Slack",
            Distraction::Meeting => "Meeting",
            Distraction::Notification => "Notif",
            Distraction::Games => "Games",
            Distraction::Tv => "TV",
            Distraction::Social => "Social",
        }
    }
}

/// A wall with a single opening
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge in percent of field width
    pub x: f32,
    pub gap_center: f32,
    pub gap_height: f32,
    /// Set once the obstacle's center passes the player
    pub scored: bool,
    pub created_at_tier: Tier,
    pub kind: Distraction,
}

impl Obstacle {
    pub fn gap_top(&self) -> f32 {
        self.gap_center - self.gap_height / 2.0
    }

    pub fn gap_bottom(&self) -> f32 {
        self.gap_center + self.gap_height / 2.0
    }

    pub fn right(&self) -> f32 {
        self.x + OBSTACLE_WIDTH
    }

    pub fn center_x(&self) -> f32 {
        self.x + OBSTACLE_WIDTH / 2.0
    }

    /// Fully past the left edge
    pub fn is_off_screen(&self) -> bool {
        self.x < -OBSTACLE_WIDTH - OBSTACLE_RETIRE_MARGIN
    }
}

/// Spawn timing for one session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Spawner {
    /// Simulation time of the last spawn (None until the first one)
    last_spawn_ms: Option<f64>,
}

impl Spawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the start-of-session grace period
    pub fn reset(&mut self) {
        self.last_spawn_ms = None;
    }

    pub fn last_spawn_ms(&self) -> Option<f64> {
        self.last_spawn_ms
    }

    /// Whether an obstacle is due at `elapsed_ms` since session start
    pub fn is_due(&self, elapsed_ms: f64, settings: &TierSettings) -> bool {
        match self.last_spawn_ms {
            None => elapsed_ms > FIRST_SPAWN_DELAY_MS,
            Some(last) => elapsed_ms - last > settings.spawn_interval_ms,
        }
    }

    /// Advance one tick: move, retire, then spawn if due.
    ///
    /// Returns the new obstacle, if one was created (already pushed onto
    /// `obstacles`).
    pub fn tick<R: Rng>(
        &mut self,
        elapsed_ms: f64,
        tier: Tier,
        obstacles: &mut Vec<Obstacle>,
        next_id: u32,
        rng: &mut R,
    ) -> Option<u32> {
        let settings = tier.settings();

        for obstacle in obstacles.iter_mut() {
            obstacle.x -= settings.obstacle_speed * OBSTACLE_INTEGRATION_SCALE;
        }
        obstacles.retain(|o| !o.is_off_screen());

        if !self.is_due(elapsed_ms, &settings) {
            return None;
        }

        self.last_spawn_ms = Some(elapsed_ms);
        obstacles.push(spawn_obstacle(next_id, tier, rng));
        Some(next_id)
    }
}

/// Build an obstacle with a randomized gap for the given tier
pub fn spawn_obstacle<R: Rng>(id: u32, tier: Tier, rng: &mut R) -> Obstacle {
    let settings = tier.settings();
    let offset: f32 = rng.random_range(-1.0..=1.0);
    let gap_center = (50.0 + offset * settings.gap_variance).clamp(GAP_CENTER_MIN, GAP_CENTER_MAX);
    let kind = Distraction::ALL[rng.random_range(0..Distraction::ALL.len())];

    log::debug!("Spawned obstacle {} (gap {:.1} at {:.1})", id, settings.gap_height, gap_center);

    Obstacle {
        id,
        x: OBSTACLE_SPAWN_X,
        gap_center,
        gap_height: settings.gap_height,
        scored: false,
        created_at_tier: tier,
        kind,
    }
}
