//! Music generation engine — dispatches states to pattern generators.

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::classify::MentalState;
use crate::music::pattern::{NoteEvent, Pattern};

/// Generates note events from classified states.
///
/// The only state the engine carries is its random source; every `generate`
/// call returns a fully materialized event list with no carry-over besides
/// the intensity argument.
pub struct MusicEngine {
    rng: SmallRng,
}

impl MusicEngine {
    pub fn new() -> Self {
        MusicEngine { rng: SmallRng::from_entropy() }
    }

    /// Engine with a fixed seed, for reproducible pitch selection in tests.
    pub fn with_seed(seed: u64) -> Self {
        MusicEngine { rng: SmallRng::seed_from_u64(seed) }
    }

    /// Generate one cycle's notes for a state at the given intensity [0, 1].
    pub fn generate(&mut self, state: MentalState, intensity: f64) -> Vec<NoteEvent> {
        Pattern::for_state(state).generate(intensity, &mut self.rng)
    }

    /// Generate from an external state label.
    ///
    /// Unmapped labels fall back to the ambient pattern — an explicit
    /// default, never an error.
    pub fn generate_for_label(&mut self, label: &str, intensity: f64) -> Vec<NoteEvent> {
        match MentalState::from_label(label) {
            Some(state) => self.generate(state, intensity),
            None => {
                log::debug!("unmapped state label {label:?}, using ambient pattern");
                Pattern::Ambient.generate(intensity, &mut self.rng)
            }
        }
    }
}

impl Default for MusicEngine {
    fn default() -> Self {
        MusicEngine::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::pattern::Waveform;

    #[test]
    fn drowsy_at_half_intensity_matches_the_reference_note() {
        let mut engine = MusicEngine::with_seed(1);
        let notes = engine.generate(MentalState::Drowsy, 0.5);
        assert_eq!(notes.len(), 1, "drowsy yields exactly one note");
        let note = notes[0];
        assert_eq!(note.frequency_hz, 65.41);
        assert_eq!(note.waveform, Waveform::Sine);
        assert!((note.gain - 0.075).abs() < 1e-12);
        assert_eq!(note.duration_secs, 0.5);
    }

    #[test]
    fn seeded_engines_agree() {
        let mut a = MusicEngine::with_seed(99);
        let mut b = MusicEngine::with_seed(99);
        for _ in 0..20 {
            assert_eq!(
                a.generate(MentalState::Excited, 1.0),
                b.generate(MentalState::Excited, 1.0)
            );
        }
    }

    #[test]
    fn known_labels_dispatch_to_their_pattern() {
        let mut engine = MusicEngine::with_seed(5);
        let notes = engine.generate_for_label("meditative", 1.0);
        assert_eq!(notes.len(), 4);
        assert!(notes.iter().all(|n| n.waveform == Waveform::Triangle));
    }

    #[test]
    fn unknown_label_falls_back_to_ambient() {
        let mut engine = MusicEngine::with_seed(5);
        let notes = engine.generate_for_label("bewildered", 1.0);
        assert_eq!(notes.len(), 4);
        assert!(notes.iter().all(|n| n.waveform == Waveform::Sine));
        assert!((notes[1].start_offset_secs - 0.1).abs() < 1e-12);
    }

    #[test]
    fn generation_is_fully_materialized() {
        let mut engine = MusicEngine::with_seed(3);
        let notes = engine.generate(MentalState::Relaxed, 0.6);
        assert_eq!(notes.len(), 4);
        for note in &notes {
            assert!(note.gain > 0.0);
            assert!(note.duration_secs > 0.0);
        }
    }
}
