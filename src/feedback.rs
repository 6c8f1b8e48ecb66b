//! Player feedback derived from game events
//!
//! Turns `GameEvent`s into sound, vibration, flash, shake and confetti cues.
//! Nothing here affects gameplay; hosts play whatever cues they support.

use crate::settings::Settings;
use crate::sim::{GameEvent, Tier};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Session started
    Start,
    /// Player tapped
    Jump,
    /// Obstacle passed
    Pass,
    /// Close call
    NearMiss,
    /// Difficulty went up
    LevelUp,
    /// Session ended
    Fail,
    /// Session ended with a new best
    HighScore,
}

/// Full-field color flash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    Cyan,
    Green,
    Red,
}

/// Confetti burst
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confetti {
    pub particles: u32,
}

/// Everything a host should do for one event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cue {
    pub sound: Option<SoundEffect>,
    /// Vibration pattern in milliseconds (on, off, on, ...)
    pub haptic: Option<&'static [u32]>,
    pub flash: Option<Flash>,
    pub shake: bool,
    pub confetti: Option<Confetti>,
}

/// Scores that fire a confetti burst
pub const CELEBRATION_SCORES: [u32; 6] = [3, 7, 15, 25, 35, 50];

/// Confetti particles for a new best
const NEW_BEST_CONFETTI: u32 = 120;

// Vibration patterns
const JUMP_HAPTIC: &[u32] = &[6];
const PASS_HAPTIC: &[u32] = &[5];
const NEAR_MISS_HAPTIC: &[u32] = &[8, 15, 8];
const LEVEL_UP_HAPTIC: &[u32] = &[15, 30, 15];
const CRASH_HAPTIC: &[u32] = &[80];

/// Build the cue for one event, filtered by the player's settings
pub fn cue_for(event: &GameEvent, new_best: bool, settings: &Settings) -> Cue {
    let mut cue = match *event {
        GameEvent::Started => Cue {
            sound: Some(SoundEffect::Start),
            ..Default::default()
        },
        GameEvent::Impulse => Cue {
            sound: Some(SoundEffect::Jump),
            haptic: Some(JUMP_HAPTIC),
            flash: Some(Flash::Cyan),
            ..Default::default()
        },
        GameEvent::Scored { score, .. } => Cue {
            sound: Some(SoundEffect::Pass),
            haptic: Some(PASS_HAPTIC),
            flash: Some(Flash::Green),
            confetti: CELEBRATION_SCORES
                .contains(&score)
                .then_some(Confetti {
                    particles: 50 + score,
                }),
            ..Default::default()
        },
        GameEvent::NearMiss => Cue {
            sound: Some(SoundEffect::NearMiss),
            haptic: Some(NEAR_MISS_HAPTIC),
            ..Default::default()
        },
        GameEvent::TierUp { .. } => Cue {
            sound: Some(SoundEffect::LevelUp),
            haptic: Some(LEVEL_UP_HAPTIC),
            ..Default::default()
        },
        GameEvent::Collided { .. } => Cue {
            sound: Some(if new_best {
                SoundEffect::HighScore
            } else {
                SoundEffect::Fail
            }),
            haptic: Some(CRASH_HAPTIC),
            flash: Some(Flash::Red),
            shake: true,
            confetti: new_best.then_some(Confetti {
                particles: NEW_BEST_CONFETTI,
            }),
        },
        GameEvent::ObstacleSpawned { .. } => Cue::default(),
    };

    if settings.effective_volume() <= 0.0 {
        cue.sound = None;
    }
    if !settings.haptics {
        cue.haptic = None;
    }
    if !settings.effective_flash() {
        cue.flash = None;
    }
    cue.shake &= settings.effective_screen_shake();
    if !settings.effective_confetti() {
        cue.confetti = None;
    }
    cue
}

/// Rank shown next to the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Milestone {
    JustStarting,
    WarmingUp,
    GettingThere,
    Focused,
    Expert,
    Master,
    Legendary,
}

impl Milestone {
    pub fn for_score(score: u32) -> Self {
        match score {
            50.. => Milestone::Legendary,
            35.. => Milestone::Master,
            25.. => Milestone::Expert,
            15.. => Milestone::Focused,
            7.. => Milestone::GettingThere,
            3.. => Milestone::WarmingUp,
            _ => Milestone::JustStarting,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Milestone::JustStarting => "JUST STARTING",
            Milestone::WarmingUp => "WARMING UP",
            Milestone::GettingThere => "GETTING THERE",
            Milestone::Focused => "FOCUSED",
            Milestone::Expert => "EXPERT",
            Milestone::Master => "MASTER",
            Milestone::Legendary => "LEGENDARY",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Milestone::JustStarting => "🌱",
            Milestone::WarmingUp => "💪",
            Milestone::GettingThere => "🔥",
            Milestone::Focused => "🎯",
            Milestone::Expert => "⭐",
            Milestone::Master => "💎",
            Milestone::Legendary => "👑",
        }
    }
}

/// Title for the share sheet
pub const SHARE_TITLE: &str = "Deep Work Dive Challenge";

/// Where challenged friends can play
pub const SHARE_URL: &str = "AgenticAIHome.com/games";

/// Challenge message for sharing a finished session's score
pub fn share_text(score: u32) -> String {
    let milestone = Milestone::for_score(score);
    format!(
        "{} I dodged {} distractions in Deep Work Dive!\n\n{} status achieved! \
         Think you can beat me? 🎮\n\nPlay free: {}",
        milestone.emoji(),
        score,
        milestone.label(),
        SHARE_URL
    )
}

/// HUD text for the difficulty badge, e.g. "LV 3 NORMAL"
pub fn difficulty_badge(tier: Tier) -> String {
    format!("LV {} {}", tier.level(), tier.label())
}
