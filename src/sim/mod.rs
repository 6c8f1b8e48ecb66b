//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (oldest obstacle first)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod clock;
pub mod collision;
pub mod difficulty;
pub mod obstacle;
pub mod player;
pub mod state;
pub mod tick;

pub use autopilot::Autopilot;
pub use clock::SimulationClock;
pub use collision::{Aabb, CollisionCause, CollisionReport, check_collision};
pub use difficulty::{Tier, TierSettings, tier};
pub use obstacle::{Distraction, Obstacle, Spawner, spawn_obstacle};
pub use player::PlayerState;
pub use state::{GameEvent, GamePhase, SimulationState, Snapshot};
pub use tick::{TickInput, tick};
