//! Fixed note-pattern generators, one per mental state.
//!
//! Each pattern owns its pitch set, waveform, base gain, and note duration.
//! Pitch constants are the equal-tempered frequencies of the underlying
//! chords (C major scale for techno, C3/E3/G3/B3 for ambient, and so on).

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::classify::MentalState;

/// Oscillator waveform requested from the audio sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// One fully specified note, ready for the sink.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    pub frequency_hz: f64,
    pub waveform: Waveform,
    /// Final gain: the pattern's base gain scaled by intensity.
    pub gain: f64,
    pub duration_secs: f64,
    /// Offset from the start of the generation cycle.
    pub start_offset_secs: f64,
}

/// Stagger between successive ambient chord notes.
const AMBIENT_STAGGER_SECS: f64 = 0.1;

/// The five pattern generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Techno,
    Ambient,
    DeepBass,
    Ethereal,
    Experimental,
}

impl Pattern {
    /// Pattern assigned to each mental state.
    pub fn for_state(state: MentalState) -> Pattern {
        match state {
            MentalState::Focused => Pattern::Techno,
            MentalState::Relaxed => Pattern::Ambient,
            MentalState::Drowsy => Pattern::DeepBass,
            MentalState::Meditative => Pattern::Ethereal,
            MentalState::Excited => Pattern::Experimental,
        }
    }

    /// The fixed pitch set, in Hz.
    pub fn pitches(self) -> &'static [f64] {
        match self {
            // C4 D4 E4 G4 A4
            Pattern::Techno => &[261.63, 293.66, 329.63, 392.00, 440.00],
            // C3 E3 G3 B3
            Pattern::Ambient => &[130.81, 164.81, 196.00, 246.94],
            // C2
            Pattern::DeepBass => &[65.41],
            // C4 D4 E4 G4
            Pattern::Ethereal => &[261.63, 293.66, 329.63, 392.00],
            // C5 D5 E5 F#5
            Pattern::Experimental => &[523.25, 587.33, 659.25, 739.99],
        }
    }

    pub fn waveform(self) -> Waveform {
        match self {
            Pattern::Techno => Waveform::Square,
            Pattern::Ambient => Waveform::Sine,
            Pattern::DeepBass => Waveform::Sine,
            Pattern::Ethereal => Waveform::Triangle,
            Pattern::Experimental => Waveform::Sawtooth,
        }
    }

    pub fn base_gain(self) -> f64 {
        match self {
            Pattern::Techno => 0.10,
            Pattern::Ambient => 0.05,
            Pattern::DeepBass => 0.15,
            Pattern::Ethereal => 0.08,
            Pattern::Experimental => 0.12,
        }
    }

    pub fn duration_secs(self) -> f64 {
        match self {
            Pattern::Techno => 0.10,
            Pattern::Ambient => 2.0,
            Pattern::DeepBass => 0.5,
            Pattern::Ethereal => 1.0,
            Pattern::Experimental => 0.05,
        }
    }

    /// Emit this pattern's notes at the given intensity.
    ///
    /// Techno and experimental pick one pitch uniformly at random; ambient
    /// plays its whole chord staggered by 100 ms per note; deep bass is a
    /// single drone; ethereal plays its chord simultaneously.
    pub fn generate<R: Rng>(self, intensity: f64, rng: &mut R) -> Vec<NoteEvent> {
        let intensity = intensity.clamp(0.0, 1.0);
        let gain = self.base_gain() * intensity;

        match self {
            Pattern::Techno | Pattern::Experimental => {
                let pitches = self.pitches();
                let pitch = pitches[rng.gen_range(0..pitches.len())];
                vec![self.note(pitch, gain, 0.0)]
            }
            Pattern::DeepBass => vec![self.note(self.pitches()[0], gain, 0.0)],
            Pattern::Ambient => self
                .pitches()
                .iter()
                .enumerate()
                .map(|(i, &pitch)| self.note(pitch, gain, i as f64 * AMBIENT_STAGGER_SECS))
                .collect(),
            Pattern::Ethereal => self
                .pitches()
                .iter()
                .map(|&pitch| self.note(pitch, gain, 0.0))
                .collect(),
        }
    }

    fn note(self, frequency_hz: f64, gain: f64, start_offset_secs: f64) -> NoteEvent {
        NoteEvent {
            frequency_hz,
            waveform: self.waveform(),
            gain,
            duration_secs: self.duration_secs(),
            start_offset_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    #[test]
    fn deep_bass_is_a_single_fixed_drone() {
        let notes = Pattern::DeepBass.generate(0.5, &mut rng());
        assert_eq!(notes.len(), 1);
        let note = notes[0];
        assert_eq!(note.frequency_hz, 65.41);
        assert_eq!(note.waveform, Waveform::Sine);
        assert!((note.gain - 0.075).abs() < 1e-12, "0.15 × 0.5 = 0.075");
        assert_eq!(note.duration_secs, 0.5);
        assert_eq!(note.start_offset_secs, 0.0);
    }

    #[test]
    fn techno_picks_from_its_scale() {
        let mut rng = rng();
        for _ in 0..50 {
            let notes = Pattern::Techno.generate(1.0, &mut rng);
            assert_eq!(notes.len(), 1);
            assert!(Pattern::Techno.pitches().contains(&notes[0].frequency_hz));
            assert_eq!(notes[0].waveform, Waveform::Square);
            assert_eq!(notes[0].duration_secs, 0.10);
        }
    }

    #[test]
    fn techno_selection_is_reproducible_under_a_seed() {
        let picks_a: Vec<f64> = (0..10)
            .map(|_| Pattern::Techno.generate(1.0, &mut SmallRng::seed_from_u64(7))[0].frequency_hz)
            .collect();
        let picks_b: Vec<f64> = (0..10)
            .map(|_| Pattern::Techno.generate(1.0, &mut SmallRng::seed_from_u64(7))[0].frequency_hz)
            .collect();
        assert_eq!(picks_a, picks_b);
    }

    #[test]
    fn ambient_staggers_its_chord() {
        let notes = Pattern::Ambient.generate(1.0, &mut rng());
        assert_eq!(notes.len(), 4);
        for (i, note) in notes.iter().enumerate() {
            assert!((note.start_offset_secs - i as f64 * 0.1).abs() < 1e-12);
            assert_eq!(note.waveform, Waveform::Sine);
            assert_eq!(note.duration_secs, 2.0);
        }
        assert_eq!(notes[0].frequency_hz, 130.81);
    }

    #[test]
    fn ethereal_chord_is_simultaneous() {
        let notes = Pattern::Ethereal.generate(0.8, &mut rng());
        assert_eq!(notes.len(), 4);
        assert!(notes.iter().all(|n| n.start_offset_secs == 0.0));
        assert!(notes.iter().all(|n| n.waveform == Waveform::Triangle));
        assert!(notes.iter().all(|n| (n.gain - 0.064).abs() < 1e-12));
    }

    #[test]
    fn intensity_is_clamped_to_unit_range() {
        let loud = Pattern::DeepBass.generate(3.0, &mut rng());
        assert!((loud[0].gain - 0.15).abs() < 1e-12);
        let negative = Pattern::DeepBass.generate(-1.0, &mut rng());
        assert_eq!(negative[0].gain, 0.0);
    }

    #[test]
    fn every_state_has_a_pattern() {
        assert_eq!(Pattern::for_state(MentalState::Focused), Pattern::Techno);
        assert_eq!(Pattern::for_state(MentalState::Relaxed), Pattern::Ambient);
        assert_eq!(Pattern::for_state(MentalState::Drowsy), Pattern::DeepBass);
        assert_eq!(Pattern::for_state(MentalState::Meditative), Pattern::Ethereal);
        assert_eq!(Pattern::for_state(MentalState::Excited), Pattern::Experimental);
    }
}
