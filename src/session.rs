//! Session controller
//!
//! Owns the simulation state, the clock, the best score and the frame loop.
//! Phases: Idle -> Playing -> Ended -> Playing ...
//!
//! The controller starts the host's frame loop when a session begins and
//! stops it, before returning, when the session ends or the player leaves.
//! No tick can therefore run against a finished session.

use crate::highscores::{BEST_SCORE_KEY, BestScore, MemoryStore, ScoreStore};
use crate::reporting::{GAME_ID, LogReporter, ScoreReporter, ScoreSubmission};
use crate::sim::{
    GameEvent, GamePhase, SimulationClock, SimulationState, Snapshot, TickInput, tick,
};

/// Drives the per-frame callback chain (requestAnimationFrame on the web)
pub trait FrameScheduler {
    /// Begin requesting frames
    fn start(&mut self);
    /// Stop requesting frames and cancel any pending request
    fn stop(&mut self);
}

/// Scheduler for hosts that pump frames themselves (headless runs, tests)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualScheduler {
    running: bool,
    starts: u32,
    stops: u32,
}

impl ManualScheduler {
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn starts(&self) -> u32 {
        self.starts
    }

    pub fn stops(&self) -> u32 {
        self.stops
    }
}

impl FrameScheduler for ManualScheduler {
    fn start(&mut self) {
        self.running = true;
        self.starts += 1;
    }

    fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.stops += 1;
        }
    }
}

/// Per-controller configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Seed for obstacle placement
    pub seed: u64,
    /// Leaderboard ID sent with submissions
    pub game_id: String,
    /// Storage key for the best score
    pub best_score_key: String,
}

impl SessionConfig {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            game_id: GAME_ID.to_string(),
            best_score_key: BEST_SCORE_KEY.to_string(),
        }
    }
}

/// The game controller
pub struct Session {
    config: SessionConfig,
    state: SimulationState,
    clock: SimulationClock,
    best: BestScore,
    reporter: Box<dyn ScoreReporter>,
    scheduler: Box<dyn FrameScheduler>,
    /// Impulse queued since the last tick
    pending_impulse: bool,
    /// Host timestamp of the previous frame
    last_frame_ms: Option<f64>,
    /// Host timestamp of the session's first frame
    started_at_ms: Option<f64>,
    /// Frame loop currently armed
    running: bool,
    new_best: bool,
}

impl Session {
    /// Controller with in-memory storage, log-only reporting and a manual
    /// scheduler. Replace collaborators with the `with_*` builders.
    pub fn new(config: SessionConfig) -> Self {
        let best = BestScore::load(config.best_score_key.clone(), Box::new(MemoryStore::new()));
        Self {
            state: SimulationState::new(config.seed),
            config,
            clock: SimulationClock::default(),
            best,
            reporter: Box::new(LogReporter),
            scheduler: Box::new(ManualScheduler::default()),
            pending_impulse: false,
            last_frame_ms: None,
            started_at_ms: None,
            running: false,
            new_best: false,
        }
    }

    /// Use `store` for the best score (read once, here)
    pub fn with_store(mut self, store: Box<dyn ScoreStore>) -> Self {
        self.best = BestScore::load(self.config.best_score_key.clone(), store);
        self
    }

    pub fn with_reporter(mut self, reporter: Box<dyn ScoreReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_scheduler(mut self, scheduler: Box<dyn FrameScheduler>) -> Self {
        self.scheduler = scheduler;
        self
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn best_score(&self) -> u32 {
        self.best.get()
    }

    /// Whether the last finished session set a new best
    pub fn is_new_best(&self) -> bool {
        self.new_best
    }

    /// Whether the frame loop is armed
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot(self.best.get())
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    /// Tap/click/key.
    ///
    /// Starts a session from Idle or Ended; while playing, queues an impulse
    /// for the next tick. Several taps before a tick collapse into one.
    pub fn impulse(&mut self) {
        match self.state.phase {
            GamePhase::Idle | GamePhase::Ended => self.start(),
            GamePhase::Playing => self.pending_impulse = true,
        }
    }

    /// Enter Playing from any phase with a fresh run
    pub fn start(&mut self) {
        self.scheduler.stop();

        self.state.begin();
        self.clock.reset();
        self.pending_impulse = false;
        self.last_frame_ms = None;
        self.started_at_ms = None;
        self.new_best = false;

        self.running = true;
        self.scheduler.start();
        log::info!("Session started (best {})", self.best.get());
    }

    /// Start again after a session ended
    pub fn restart(&mut self) {
        self.start();
    }

    /// The player navigated away: stop the loop and drop the run unrecorded
    pub fn leave(&mut self) {
        self.stop_loop();
        if self.state.phase == GamePhase::Playing {
            log::info!("Session abandoned at score {}", self.state.score);
        }
        self.state.phase = GamePhase::Idle;
        self.pending_impulse = false;
    }

    /// Animation-frame callback with the host's timestamp.
    ///
    /// The first frame of a session only records the timestamp. Returns the
    /// number of ticks run.
    pub fn frame(&mut self, now_ms: f64) -> u32 {
        if !self.running {
            return 0;
        }
        let Some(last) = self.last_frame_ms.replace(now_ms) else {
            self.started_at_ms = Some(now_ms);
            return 0;
        };
        self.advance(now_ms - last)
    }

    /// Advance by an explicit wall-clock delta. Returns the number of ticks run.
    pub fn advance(&mut self, delta_ms: f64) -> u32 {
        if !self.running {
            return 0;
        }

        let due = self.clock.advance(delta_ms);
        let mut ran = 0;
        for _ in 0..due {
            let input = TickInput {
                impulse: std::mem::take(&mut self.pending_impulse),
            };
            tick(&mut self.state, &input);
            ran += 1;

            if self.state.phase == GamePhase::Ended {
                self.finish();
                break;
            }
        }
        ran
    }

    /// Playing -> Ended bookkeeping
    fn finish(&mut self) {
        let wall_ms = self
            .last_frame_ms
            .zip(self.started_at_ms)
            .map(|(last, started)| last - started);
        self.stop_loop();
        self.clock.reset();

        let score = self.state.score;
        self.new_best = self.best.submit(score);
        log::info!(
            "Session ended: score {} (best {}{}) after {:.1}s",
            score,
            self.best.get(),
            if self.new_best { ", new best" } else { "" },
            wall_ms.unwrap_or_else(|| self.state.elapsed_ms()) / 1000.0
        );

        if score > 0 {
            self.reporter
                .report(ScoreSubmission::new(self.config.game_id.clone(), score));
        }
    }

    fn stop_loop(&mut self) {
        self.running = false;
        self.last_frame_ms = None;
        self.scheduler.stop();
    }
}
