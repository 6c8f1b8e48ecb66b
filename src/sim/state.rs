//! Game state and core simulation types
//!
//! `SimulationState` is the single authoritative copy of a session. The host
//! owns it and hands it to `tick` by mutable reference; renderers only ever
//! see a `Snapshot`.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::CollisionCause;
use super::difficulty::Tier;
use super::obstacle::{Obstacle, Spawner};
use super::player::PlayerState;
use crate::consts::FIXED_STEP_MS;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first tap
    #[default]
    Idle,
    /// Active gameplay
    Playing,
    /// Run ended by a collision; waits for a restart
    Ended,
}

/// Things that happened during a tick or transition, for feedback and HUD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Impulse,
    ObstacleSpawned { id: u32 },
    Scored { id: u32, score: u32 },
    TierUp { tier: Tier },
    NearMiss,
    Collided { cause: CollisionCause, score: u32 },
}

/// Complete simulation state (deterministic for a given seed and input)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    pub player: PlayerState,
    /// Active obstacles, oldest first
    pub obstacles: Vec<Obstacle>,
    pub score: u32,
    /// Tier in effect (follows `score`)
    pub tier: Tier,
    /// Fixed ticks since the session started
    pub time_ticks: u64,
    /// Player currently inside a near-miss window
    pub near_miss: bool,
    pub spawner: Spawner,
    /// Events since the host last drained them
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    rng: Pcg32,
    /// Next entity ID
    next_id: u32,
}

impl SimulationState {
    /// Create an idle state with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            phase: GamePhase::Idle,
            player: PlayerState::default(),
            obstacles: Vec::new(),
            score: 0,
            tier: Tier::Beginner,
            time_ticks: 0,
            near_miss: false,
            spawner: Spawner::new(),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Reset everything for a fresh run and enter `Playing`.
    ///
    /// The RNG keeps running so consecutive runs get different gaps while the
    /// whole sequence stays reproducible from the seed.
    pub fn begin(&mut self) {
        self.phase = GamePhase::Playing;
        self.player = PlayerState::default();
        self.obstacles.clear();
        self.score = 0;
        self.tier = Tier::Beginner;
        self.time_ticks = 0;
        self.near_miss = false;
        self.spawner.reset();
        self.events.push(GameEvent::Started);
    }

    /// Move and retire obstacles, then spawn one if due.
    ///
    /// Returns the ID of the new obstacle.
    pub fn advance_obstacles(&mut self) -> Option<u32> {
        let elapsed_ms = self.elapsed_ms();
        let spawned = self.spawner.tick(
            elapsed_ms,
            self.tier,
            &mut self.obstacles,
            self.next_id,
            &mut self.rng,
        );
        if let Some(id) = spawned {
            self.next_id = id + 1;
        }
        spawned
    }

    /// Simulation time since the session started
    pub fn elapsed_ms(&self) -> f64 {
        self.time_ticks as f64 * FIXED_STEP_MS
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self, best_score: u32) -> Snapshot {
        Snapshot {
            phase: self.phase,
            player: self.player,
            obstacles: self.obstacles.clone(),
            score: self.score,
            best_score,
            tier: self.tier,
            near_miss: self.near_miss,
            elapsed_ms: self.elapsed_ms(),
        }
    }
}

/// Immutable per-frame view for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub player: PlayerState,
    pub obstacles: Vec<Obstacle>,
    pub score: u32,
    pub best_score: u32,
    pub tier: Tier,
    pub near_miss: bool,
    pub elapsed_ms: f64,
}
