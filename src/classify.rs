//! Mental-state classification from normalized band powers.
//!
//! The band→state and band→emotion tables are exhaustive matches over the
//! closed [`Band`] enum, so the compiler guarantees every band is mapped.

use serde::{Deserialize, Serialize};

use crate::bands::{Band, BandPowers};

/// The classifier's state space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentalState {
    Drowsy,
    Meditative,
    Relaxed,
    Focused,
    Excited,
}

impl MentalState {
    pub fn label(self) -> &'static str {
        match self {
            MentalState::Drowsy => "drowsy",
            MentalState::Meditative => "meditative",
            MentalState::Relaxed => "relaxed",
            MentalState::Focused => "focused",
            MentalState::Excited => "excited",
        }
    }

    /// Parse an external state label. Unknown labels return `None`; the
    /// generation layer resolves those with its ambient fallback.
    pub fn from_label(label: &str) -> Option<MentalState> {
        match label {
            "drowsy" => Some(MentalState::Drowsy),
            "meditative" => Some(MentalState::Meditative),
            "relaxed" => Some(MentalState::Relaxed),
            "focused" => Some(MentalState::Focused),
            "excited" => Some(MentalState::Excited),
            _ => None,
        }
    }
}

/// Emotion paired with each state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Sleepy,
    Calm,
    Peaceful,
    Alert,
    Energized,
}

impl Emotion {
    pub fn label(self) -> &'static str {
        match self {
            Emotion::Sleepy => "sleepy",
            Emotion::Calm => "calm",
            Emotion::Peaceful => "peaceful",
            Emotion::Alert => "alert",
            Emotion::Energized => "energized",
        }
    }
}

/// State mapped from a dominant band.
pub fn state_for(band: Band) -> MentalState {
    match band {
        Band::Delta => MentalState::Drowsy,
        Band::Theta => MentalState::Meditative,
        Band::Alpha => MentalState::Relaxed,
        Band::Beta => MentalState::Focused,
        Band::Gamma => MentalState::Excited,
    }
}

/// Emotion mapped from a dominant band.
pub fn emotion_for(band: Band) -> Emotion {
    match band {
        Band::Delta => Emotion::Sleepy,
        Band::Theta => Emotion::Calm,
        Band::Alpha => Emotion::Peaceful,
        Band::Beta => Emotion::Alert,
        Band::Gamma => Emotion::Energized,
    }
}

/// Result of classifying one window's normalized band powers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub dominant: Band,
    pub state: MentalState,
    pub emotion: Emotion,
    /// The dominant band's normalized percentage, clamped to [0, 100].
    pub confidence: f64,
}

/// Classify normalized band powers.
///
/// Dominance is strict greater-than scanned in enumeration order, so exact
/// ties resolve to the earlier band (delta before theta, and so on).
pub fn classify(normalized: &BandPowers) -> Classification {
    let mut dominant = Band::Delta;
    for band in Band::ALL {
        if normalized.get(band) > normalized.get(dominant) {
            dominant = band;
        }
    }

    Classification {
        dominant,
        state: state_for(dominant),
        emotion: emotion_for(dominant),
        confidence: normalized.get(dominant).clamp(0.0, 100.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn powers(delta: f64, theta: f64, alpha: f64, beta: f64, gamma: f64) -> BandPowers {
        BandPowers { delta, theta, alpha, beta, gamma }
    }

    #[test]
    fn dominant_band_maps_through_table() {
        let c = classify(&powers(5.0, 10.0, 60.0, 15.0, 10.0));
        assert_eq!(c.dominant, Band::Alpha);
        assert_eq!(c.state, MentalState::Relaxed);
        assert_eq!(c.emotion, Emotion::Peaceful);
        assert!((c.confidence - 60.0).abs() < 1e-9);
    }

    #[test]
    fn exact_tie_resolves_to_earlier_band() {
        let c = classify(&powers(50.0, 50.0, 0.0, 0.0, 0.0));
        assert_eq!(c.dominant, Band::Delta, "delta wins a delta/theta tie");
        assert_eq!(c.state, MentalState::Drowsy);
    }

    #[test]
    fn gamma_dominance_classifies_excited() {
        let c = classify(&powers(5.0, 5.0, 5.0, 15.0, 70.0));
        assert_eq!(c.state, MentalState::Excited);
        assert_eq!(c.emotion, Emotion::Energized);
    }

    #[test]
    fn confidence_is_clamped() {
        // Not reachable from normalize(), but classify still has to bound it.
        let c = classify(&powers(150.0, 0.0, 0.0, 0.0, 0.0));
        assert_eq!(c.confidence, 100.0);
    }

    #[test]
    fn labels_round_trip() {
        for state in [
            MentalState::Drowsy,
            MentalState::Meditative,
            MentalState::Relaxed,
            MentalState::Focused,
            MentalState::Excited,
        ] {
            assert_eq!(MentalState::from_label(state.label()), Some(state));
        }
        assert_eq!(MentalState::from_label("transcendent"), None);
    }
}
