pub mod bands;
pub mod classify;
pub mod error;
pub mod music;
pub mod processor;
pub mod session;
pub mod sim;
pub mod spectrum;

use crate::error::MindMusicError;
use crate::music::engine::MusicEngine;
use crate::music::pattern::NoteEvent;
use crate::processor::{EegProcessor, ProcessorConfig, WindowAnalysis};
use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the mindmusic-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// Analyze one sample window: band powers (raw and normalized) plus the
/// classified mental state. The window length must be a power of two.
pub fn analyze(samples: &[f64], sampling_rate_hz: f64) -> Result<WindowAnalysis, MindMusicError> {
    let config = ProcessorConfig {
        sampling_rate_hz,
        window_size: samples.len(),
    };
    let processor = EegProcessor::new(config)?;
    processor.process(samples)
}

/// WASM-exposed: analyze one sample window into a JSON-shaped object
/// (raw powers, normalized powers, classification).
#[wasm_bindgen]
pub fn analyze_window(samples: &[f64], sampling_rate_hz: f64) -> Result<JsValue, JsValue> {
    let analysis =
        analyze(samples, sampling_rate_hz).map_err(|e| JsValue::from_str(&format!("{e}")))?;
    serde_wasm_bindgen::to_value(&analysis).map_err(|e| JsValue::from_str(&format!("{e}")))
}

/// WASM-exposed: generate one cycle of note events for a state label at the
/// given intensity [0, 1]. Unknown labels use the ambient pattern.
#[wasm_bindgen]
pub fn generate_notes(state: &str, intensity: f64) -> Result<JsValue, JsValue> {
    let notes = MusicEngine::new().generate_for_label(state, intensity);
    serde_wasm_bindgen::to_value(&notes).map_err(|e| JsValue::from_str(&format!("{e}")))
}

/// JSON form of a note-event list, for non-WASM embedders.
pub fn notes_to_json(notes: &[NoteEvent]) -> Result<String, serde_json::Error> {
    serde_json::to_string(notes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::MentalState;
    use std::f64::consts::PI;

    #[test]
    fn analyze_classifies_an_alpha_sine() {
        let window: Vec<f64> = (0..256)
            .map(|i| (2.0 * PI * 10.0 * i as f64 / 256.0).sin())
            .collect();
        let analysis = analyze(&window, 256.0).unwrap();
        assert_eq!(analysis.classification.state, MentalState::Relaxed);
    }

    #[test]
    fn analyze_rejects_bad_window_lengths() {
        let err = analyze(&[0.0; 100], 256.0).unwrap_err();
        assert_eq!(err, MindMusicError::InvalidInputLength { len: 100 });
    }

    #[test]
    fn note_json_carries_waveform_names() {
        let notes = MusicEngine::with_seed(1).generate(MentalState::Drowsy, 0.5);
        let json = notes_to_json(&notes).unwrap();
        assert!(json.contains("\"sine\""));
        assert!(json.contains("65.41"));
    }
}
