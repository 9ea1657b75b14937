//! Audio system
//!
//! Simulation events map to short procedurally generated cues (Web Audio
//! oscillators, no sample files) plus one looping music track. The mapping
//! is platform independent; playback only exists on wasm32. Audio failures
//! are swallowed: the game never waits on or reacts to playback.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Music track, relative to the page
pub const MUSIC_URL: &str = "audio/music.mp3";

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Shrimp collected
    Collect,
    /// Golden shrimp collected
    BonusCollect,
    /// Hit a gate
    Crash,
    /// Run started
    Start,
}

/// What the music track should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicCue {
    /// Rewind and play
    PlayFromStart,
    /// Continue from the current position
    Resume,
    Pause,
    /// Pause and rewind
    Stop,
}

/// Sound effect for an event (`Stopped` is silent)
pub fn cue_for(event: &GameEvent) -> Option<SoundEffect> {
    match event {
        GameEvent::Started => Some(SoundEffect::Start),
        GameEvent::Collected { bonus: true, .. } => Some(SoundEffect::BonusCollect),
        GameEvent::Collected { bonus: false, .. } => Some(SoundEffect::Collect),
        GameEvent::Crashed { .. } => Some(SoundEffect::Crash),
        GameEvent::Stopped => None,
    }
}

/// Music reaction to an event
pub fn music_for(event: &GameEvent, muted: bool) -> Option<MusicCue> {
    match event {
        GameEvent::Started if !muted => Some(MusicCue::PlayFromStart),
        GameEvent::Crashed { .. } => Some(MusicCue::Pause),
        GameEvent::Stopped => Some(MusicCue::Stop),
        _ => None,
    }
}

/// Music reaction to the mute toggle
pub fn music_on_mute_change(muted: bool, running: bool) -> Option<MusicCue> {
    if muted {
        Some(MusicCue::Pause)
    } else if running {
        Some(MusicCue::Resume)
    } else {
        None
    }
}

/// Music track volume, scaled by the master volume like the effects
pub fn music_volume(settings: &Settings) -> f32 {
    settings.master_volume * settings.music_volume
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, HtmlAudioElement, OscillatorNode, OscillatorType};

    use super::{
        MUSIC_URL, MusicCue, SoundEffect, cue_for, music_for, music_on_mute_change, music_volume,
    };
    use crate::settings::Settings;
    use crate::sim::GameEvent;

    /// Start the track, swallowing the rejection a missing file or the
    /// autoplay policy produces
    fn play_quietly(track: &HtmlAudioElement) {
        if let Ok(promise) = track.play() {
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = wasm_bindgen_futures::JsFuture::from(promise).await {
                    log::debug!("Music playback refused: {:?}", e);
                }
            });
        }
    }

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        music: Option<HtmlAudioElement>,
        master_volume: f32,
        sfx_volume: f32,
        muted: bool,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - sound effects disabled");
            }

            let music = HtmlAudioElement::new_with_src(MUSIC_URL).ok();
            match &music {
                Some(track) => {
                    track.set_loop(true);
                    track.set_volume(music_volume(settings) as f64);
                }
                None => log::warn!("Music track unavailable"),
            }

            Self {
                ctx,
                music,
                master_volume: settings.master_volume,
                sfx_volume: settings.sfx_volume,
                muted: settings.muted,
            }
        }

        pub fn muted(&self) -> bool {
            self.muted
        }

        /// Mute/unmute all audio
        pub fn set_muted(&mut self, muted: bool, running: bool) {
            self.muted = muted;
            if let Some(cue) = music_on_mute_change(muted, running) {
                self.music(cue);
            }
        }

        /// Play whatever the event calls for
        pub fn handle_event(&self, event: &GameEvent) {
            if let Some(effect) = cue_for(event) {
                self.play(effect);
            }
            if let Some(cue) = music_for(event, self.muted) {
                self.music(cue);
            }
        }

        /// Stop the music (teardown)
        pub fn silence(&self) {
            self.music(MusicCue::Stop);
        }

        fn music(&self, cue: MusicCue) {
            let Some(track) = &self.music else { return };
            match cue {
                MusicCue::PlayFromStart => {
                    track.set_current_time(0.0);
                    play_quietly(track);
                }
                MusicCue::Resume => play_quietly(track),
                MusicCue::Pause => {
                    let _ = track.pause();
                }
                MusicCue::Stop => {
                    let _ = track.pause();
                    track.set_current_time(0.0);
                }
            }
        }

        fn effective_volume(&self) -> f32 {
            if self.muted {
                0.0
            } else {
                self.master_volume * self.sfx_volume
            }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Collect => self.play_arpeggio(ctx, vol, &[600.0, 800.0, 1000.0], 0.06),
                SoundEffect::BonusCollect => {
                    self.play_arpeggio(ctx, vol, &[700.0, 900.0, 1100.0, 1400.0], 0.05)
                }
                SoundEffect::Crash => self.play_crash(ctx, vol),
                SoundEffect::Start => self.play_start(ctx, vol),
            }
        }

        // === Sound generators ===

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Rising ding per note
        fn play_arpeggio(&self, ctx: &AudioContext, vol: f32, notes: &[f32], step: f64) {
            for (i, freq) in notes.iter().enumerate() {
                let delay = i as f64 * step;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.25, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.2).ok();
                }
            }
        }

        /// Crash - thud plus a short falling buzz
        fn play_crash(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            if let Some((osc, gain)) = self.create_osc(ctx, 120.0, OscillatorType::Sawtooth) {
                gain.gain().set_value_at_time(vol * 0.45, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                    .ok();
                osc.frequency().set_value_at_time(120.0, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(30.0, t + 0.4)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.5).ok();
            }

            for (i, freq) in [400.0, 300.0, 200.0].iter().enumerate() {
                let delay = i as f64 * 0.12;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                    let t = t + delay;
                    gain.gain().set_value_at_time(vol * 0.25, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.25).ok();
                }
            }
        }

        /// Start - whoosh up
        fn play_start(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 200.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                .ok();
            osc.frequency().set_value_at_time(200.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(600.0, t + 0.15)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.25).ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_cues() {
        assert_eq!(cue_for(&GameEvent::Started), Some(SoundEffect::Start));
        assert_eq!(
            cue_for(&GameEvent::Collected {
                points: 1,
                bonus: false
            }),
            Some(SoundEffect::Collect)
        );
        assert_eq!(
            cue_for(&GameEvent::Collected {
                points: 3,
                bonus: true
            }),
            Some(SoundEffect::BonusCollect)
        );
        assert_eq!(cue_for(&GameEvent::Crashed { score: 4 }), Some(SoundEffect::Crash));
        assert_eq!(cue_for(&GameEvent::Stopped), None);
    }

    #[test]
    fn test_music_follows_run() {
        assert_eq!(music_for(&GameEvent::Started, false), Some(MusicCue::PlayFromStart));
        assert_eq!(music_for(&GameEvent::Started, true), None);
        assert_eq!(music_for(&GameEvent::Crashed { score: 0 }, false), Some(MusicCue::Pause));
        assert_eq!(music_for(&GameEvent::Stopped, true), Some(MusicCue::Stop));
        assert_eq!(
            music_for(
                &GameEvent::Collected {
                    points: 1,
                    bonus: false
                },
                false
            ),
            None
        );
    }

    #[test]
    fn test_mute_toggle_music() {
        assert_eq!(music_on_mute_change(true, true), Some(MusicCue::Pause));
        assert_eq!(music_on_mute_change(false, true), Some(MusicCue::Resume));
        assert_eq!(music_on_mute_change(false, false), None);
    }

    #[test]
    fn test_music_volume_follows_master() {
        let settings = Settings::default();
        assert!((music_volume(&settings) - 0.8 * 0.45).abs() < 1e-6);

        let quiet = Settings {
            master_volume: 0.0,
            ..Settings::default()
        };
        assert_eq!(music_volume(&quiet), 0.0);
    }
}
