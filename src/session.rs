//! Session orchestration — the per-tick pipeline an external driver runs on
//! its acquisition cadence (reference: every 100 ms).
//!
//! Each tick analyzes one sample window, classifies it, generates the next
//! note cycle, and swaps the active voice set. The voice set is the only
//! shared mutable resource: it lives behind one mutex, and both the tick
//! path and the deferred expiry path ([`Session::reap`]) take that lock, so
//! a cycle swap can never race an expiry callback.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::classify::Classification;
use crate::error::MindMusicError;
use crate::music::engine::MusicEngine;
use crate::music::pattern::NoteEvent;
use crate::music::voice::VoiceManager;
use crate::processor::{EegProcessor, ProcessorConfig, WindowAnalysis};

/// Session configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub processor: ProcessorConfig,
    /// Multiplier on the derived intensity (confidence / 100). The product
    /// is clamped back to [0, 1].
    pub intensity_scale: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            processor: ProcessorConfig::default(),
            intensity_scale: 1.0,
        }
    }
}

/// What one valid tick produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub analysis: WindowAnalysis,
    pub notes: Vec<NoteEvent>,
    /// Generation cycle the notes were scheduled under.
    pub cycle: u64,
}

impl TickReport {
    /// JSON form for non-WASM embedders.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// A running biosignal-to-music session.
pub struct Session {
    processor: EegProcessor,
    engine: MusicEngine,
    voices: Arc<Mutex<VoiceManager>>,
    last_classification: Option<Classification>,
    intensity_scale: f64,
}

impl Session {
    pub fn new(config: SessionConfig) -> Result<Self, MindMusicError> {
        Session::build(config, MusicEngine::new())
    }

    /// Session with a seeded engine, for reproducible pitch selection.
    pub fn with_seed(config: SessionConfig, seed: u64) -> Result<Self, MindMusicError> {
        Session::build(config, MusicEngine::with_seed(seed))
    }

    fn build(config: SessionConfig, engine: MusicEngine) -> Result<Self, MindMusicError> {
        Ok(Session {
            processor: EegProcessor::new(config.processor)?,
            engine,
            voices: Arc::new(Mutex::new(VoiceManager::new())),
            last_classification: None,
            intensity_scale: config.intensity_scale,
        })
    }

    /// Run one tick: analyze the window at absolute time `now` (seconds on
    /// the driver's clock), then replace the active voice cycle with the
    /// newly generated notes.
    ///
    /// A degenerate (zero-power) window returns the error to the caller but
    /// keeps both the previous classification and the running voice cycle,
    /// so the reported state never flickers on a dropout.
    pub fn tick(&mut self, window: &[f64], now: f64) -> Result<TickReport, MindMusicError> {
        let analysis = match self.processor.process(window) {
            Ok(analysis) => analysis,
            Err(MindMusicError::DegenerateSignal) => {
                log::debug!("degenerate window, holding previous classification");
                return Err(MindMusicError::DegenerateSignal);
            }
            Err(err) => return Err(err),
        };

        let classification = analysis.classification;
        if self.last_classification.map(|c| c.state) != Some(classification.state) {
            log::debug!("state -> {}", classification.state.label());
        }
        self.last_classification = Some(classification);

        let intensity = (classification.confidence / 100.0 * self.intensity_scale).clamp(0.0, 1.0);
        let notes = self.engine.generate(classification.state, intensity);

        let mut voices = self.voices.lock().unwrap();
        let cycle = voices.begin_cycle();
        for note in &notes {
            voices.spawn(note, now);
        }

        Ok(TickReport { analysis, notes, cycle })
    }

    /// The most recent valid classification. Survives degenerate ticks.
    pub fn classification(&self) -> Option<Classification> {
        self.last_classification
    }

    /// Deferred natural-expiry entry point for the external audio clock.
    /// Takes the same lock as `tick`, so it cannot race a forced clear.
    /// Returns how many voices were released.
    pub fn reap(&self, now: f64) -> usize {
        self.voices.lock().unwrap().advance(now)
    }

    pub fn active_voices(&self) -> usize {
        self.voices.lock().unwrap().active_count()
    }

    /// Shared handle to the voice set, for sink/clock collaborators.
    pub fn voices(&self) -> Arc<Mutex<VoiceManager>> {
        Arc::clone(&self.voices)
    }

    /// Release every voice (end of session).
    pub fn shutdown(&mut self) {
        let released = self.voices.lock().unwrap().stop_all();
        if released > 0 {
            log::debug!("shutdown released {released} voices");
        }
    }
}
