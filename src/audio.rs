//! Sound triggers
//!
//! The engine only names what to play. In the browser `AudioManager` plays
//! decoded pop samples and procedurally generated effects through Web Audio;
//! every failure along the way turns the call into a no-op.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SoundEffect {
    /// Target destroyed
    Pop,
    /// Boss took damage
    BossHit,
}

/// Fire-and-forget sound playback
pub trait SoundPlayer {
    fn play(&mut self, effect: SoundEffect);
}

/// Plays nothing (native builds, muted hosts)
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl SoundPlayer for Silent {
    fn play(&mut self, _effect: SoundEffect) {}
}

/// Shared player, e.g. one the host also unlocks and mutes
impl<P: SoundPlayer> SoundPlayer for Rc<RefCell<P>> {
    fn play(&mut self, effect: SoundEffect) {
        self.borrow_mut().play(effect);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{AudioBuffer, AudioContext, GainNode, OscillatorNode, OscillatorType, Response};

    use super::{SoundEffect, SoundPlayer};
    use crate::settings::Settings;

    /// Pop samples, one picked at random per pop
    const POP_SOURCES: [&str; 3] = ["/sounds/k1.wav", "/sounds/k2.wav", "/sounds/k3.wav"];

    /// Audio manager for the page
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        pop_buffers: Rc<RefCell<Vec<AudioBuffer>>>,
        loading: Rc<Cell<bool>>,
        unlocked: bool,
        master_volume: f32,
        sfx_volume: f32,
        muted: bool,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            Self {
                ctx: None,
                pop_buffers: Rc::new(RefCell::new(Vec::new())),
                loading: Rc::new(Cell::new(false)),
                unlocked: false,
                master_volume: settings.master_volume.clamp(0.0, 1.0),
                sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
                muted: settings.muted,
            }
        }

        /// First user gesture: create/resume the context and start loading samples
        pub fn unlock(&mut self) {
            self.unlocked = true;
            self.ensure_context();
            self.resume();
            self.start_loading();
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                if ctx.state() == web_sys::AudioContextState::Suspended {
                    let _ = ctx.resume();
                }
            }
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        /// Flip mute; returns the new state
        pub fn toggle_mute(&mut self) -> bool {
            self.muted = !self.muted;
            self.muted
        }

        pub fn is_muted(&self) -> bool {
            self.muted
        }

        /// Get effective volume
        fn effective_volume(&self) -> f32 {
            if self.muted {
                0.0
            } else {
                self.master_volume * self.sfx_volume
            }
        }

        fn ensure_context(&mut self) {
            if self.ctx.is_some() {
                return;
            }
            // May fail outside a secure context
            self.ctx = AudioContext::new().ok();
            if self.ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
        }

        /// Fetch and decode the pop samples once; failures leave the list empty
        fn start_loading(&self) {
            if self.loading.get() || !self.pop_buffers.borrow().is_empty() {
                return;
            }
            let Some(ctx) = self.ctx.clone() else { return };

            self.loading.set(true);
            let buffers = self.pop_buffers.clone();
            let loading = self.loading.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let mut decoded = Vec::with_capacity(POP_SOURCES.len());
                for src in POP_SOURCES {
                    match load_sample(&ctx, src).await {
                        Some(buffer) => decoded.push(buffer),
                        None => log::debug!("Pop sample {src} unavailable"),
                    }
                }
                log::info!("Loaded {} pop samples", decoded.len());
                *buffers.borrow_mut() = decoded;
                loading.set(false);
            });
        }

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

        /// Pop - random decoded sample, synthesized blip until samples arrive
        fn play_pop(&self, ctx: &AudioContext, vol: f32) {
            let buffers = self.pop_buffers.borrow();
            if buffers.is_empty() {
                drop(buffers);
                self.start_loading();
                self.play_synth_pop(ctx, vol);
                return;
            }

            let pick = (js_sys::Math::random() * buffers.len() as f64) as usize;
            let Some(buffer) = buffers.get(pick.min(buffers.len() - 1)) else {
                return;
            };
            let Ok(source) = ctx.create_buffer_source() else {
                return;
            };
            let Ok(gain) = ctx.create_gain() else { return };
            gain.gain().set_value(vol);
            source.set_buffer(Some(buffer));
            if source.connect_with_audio_node(&gain).is_err()
                || gain.connect_with_audio_node(&ctx.destination()).is_err()
            {
                return;
            }
            // Background tabs may refuse playback
            source.start().ok();
        }

        fn play_synth_pop(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 600.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.4, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.08)
                .ok();
            osc.frequency().set_value_at_time(600.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(180.0, t + 0.08)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }

        /// Boss hit - low metallic thud with a bright ping on top
        fn play_boss_hit(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            if let Some((osc, gain)) = self.create_osc(ctx, 140.0, OscillatorType::Square) {
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.18)
                    .ok();
                osc.frequency().set_value_at_time(140.0, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(55.0, t + 0.18)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.2).ok();
            }

            if let Some((osc, gain)) = self.create_osc(ctx, 1200.0, OscillatorType::Triangle) {
                gain.gain().set_value_at_time(vol * 0.15, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.06)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.08).ok();
            }
        }
    }

    impl SoundPlayer for AudioManager {
        fn play(&mut self, effect: SoundEffect) {
            if !self.unlocked {
                return;
            }
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }

            self.ensure_context();
            self.resume();
            let Some(ctx) = self.ctx.clone() else { return };

            match effect {
                SoundEffect::Pop => self.play_pop(&ctx, vol),
                SoundEffect::BossHit => self.play_boss_hit(&ctx, vol),
            }
        }
    }

    async fn load_sample(ctx: &AudioContext, src: &str) -> Option<AudioBuffer> {
        let window = web_sys::window()?;
        let response: Response = JsFuture::from(window.fetch_with_str(src))
            .await
            .ok()?
            .dyn_into()
            .ok()?;
        if !response.ok() {
            return None;
        }
        let bytes = JsFuture::from(response.array_buffer().ok()?).await.ok()?;
        let bytes: js_sys::ArrayBuffer = bytes.dyn_into().ok()?;
        let decoded = JsFuture::from(ctx.decode_audio_data(&bytes).ok()?)
            .await
            .ok()?;
        decoded.dyn_into().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_accepts_everything() {
        let mut player = Silent;
        player.play(SoundEffect::Pop);
        player.play(SoundEffect::BossHit);
    }
}
