//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!

use web_sys::{AudioContext, AudioNode, BiquadFilterType, GainNode, OscillatorNode, OscillatorType};

use crate::feedback::SoundEffect;
use crate::settings::Settings;

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: settings.effective_volume(),
        }
    }

    /// Pick up volume and mute changes
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.volume = settings.effective_volume();
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.volume;
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Start => {
                self.play_sweep(ctx, vol * 0.1, (200.0, 800.0), 0.2, OscillatorType::Sine)
            }
            SoundEffect::Jump => {
                self.play_sweep(ctx, vol * 0.08, (400.0, 600.0), 0.1, OscillatorType::Sine)
            }
            SoundEffect::Pass => self.play_pass(ctx, vol),
            SoundEffect::NearMiss => {
                self.play_sweep(ctx, vol * 0.12, (350.0, 250.0), 0.15, OscillatorType::Triangle)
            }
            SoundEffect::LevelUp => {
                self.play_arpeggio(ctx, vol * 0.08, &[440.0, 554.0, 659.0, 880.0])
            }
            SoundEffect::Fail => {
                self.play_sweep(ctx, vol * 0.15, (220.0, 110.0), 0.2, OscillatorType::Sine)
            }
            SoundEffect::HighScore => {
                self.play_arpeggio(ctx, vol * 0.12, &[523.0, 659.0, 784.0, 1047.0])
            }
        }
    }

    // === Sound generators ===

    /// Oscillator -> gain -> `output`
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
        output: &AudioNode,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(output).ok()?;

        Some((osc, gain))
    }

    /// Single tone gliding between two pitches
    fn play_sweep(
        &self,
        ctx: &AudioContext,
        peak: f32,
        (from, to): (f32, f32),
        duration: f64,
        osc_type: OscillatorType,
    ) {
        let Some((osc, gain)) = self.create_osc(ctx, from, osc_type, &ctx.destination()) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(peak, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + duration)
            .ok();
        osc.frequency().set_value_at_time(from, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(to, t + duration * 0.5)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + duration).ok();
    }

    /// Obstacle passed - muffled whoosh
    fn play_pass(&self, ctx: &AudioContext, vol: f32) {
        let Ok(filter) = ctx.create_biquad_filter() else {
            return;
        };
        filter.set_type(BiquadFilterType::Lowpass);
        if filter.connect_with_audio_node(&ctx.destination()).is_err() {
            return;
        }

        let Some((osc, gain)) = self.create_osc(ctx, 200.0, OscillatorType::Sawtooth, &filter)
        else {
            return;
        };
        let t = ctx.current_time();

        filter.frequency().set_value_at_time(1200.0, t).ok();
        filter
            .frequency()
            .exponential_ramp_to_value_at_time(400.0, t + 0.1)
            .ok();
        gain.gain().set_value_at_time(vol * 0.06, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency().set_value_at_time(200.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(100.0, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.12).ok();
    }

    /// Rising notes, one after another
    fn play_arpeggio(&self, ctx: &AudioContext, peak: f32, notes: &[f32]) {
        for (i, freq) in notes.iter().enumerate() {
            let delay = i as f64 * 0.08;
            if let Some((osc, gain)) =
                self.create_osc(ctx, *freq, OscillatorType::Sine, &ctx.destination())
            {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(peak, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.25).ok();
            }
        }
    }
}
