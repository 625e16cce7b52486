//! Canonical EEG frequency bands and band-power records.

use serde::{Deserialize, Serialize};

use crate::error::MindMusicError;

/// The five canonical bands, in fixed enumeration order.
///
/// The order doubles as the classifier's tie-break order: when two bands
/// carry exactly equal power, the earlier one wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Delta,
    Theta,
    Alpha,
    Beta,
    Gamma,
}

impl Band {
    /// All bands in enumeration (and tie-break) order.
    pub const ALL: [Band; 5] = [Band::Delta, Band::Theta, Band::Alpha, Band::Beta, Band::Gamma];

    /// Frequency range `[low, high)` in Hz.
    pub fn range_hz(self) -> (f64, f64) {
        match self {
            Band::Delta => (0.5, 4.0),
            Band::Theta => (4.0, 8.0),
            Band::Alpha => (8.0, 13.0),
            Band::Beta => (13.0, 30.0),
            Band::Gamma => (30.0, 50.0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Band::Delta => "delta",
            Band::Theta => "theta",
            Band::Alpha => "alpha",
            Band::Beta => "beta",
            Band::Gamma => "gamma",
        }
    }
}

/// Per-band power record. Values are mean PSD per band, or percentages
/// after [`normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BandPowers {
    pub delta: f64,
    pub theta: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl BandPowers {
    pub fn get(&self, band: Band) -> f64 {
        match band {
            Band::Delta => self.delta,
            Band::Theta => self.theta,
            Band::Alpha => self.alpha,
            Band::Beta => self.beta,
            Band::Gamma => self.gamma,
        }
    }

    pub fn set(&mut self, band: Band, value: f64) {
        match band {
            Band::Delta => self.delta = value,
            Band::Theta => self.theta = value,
            Band::Alpha => self.alpha = value,
            Band::Beta => self.beta = value,
            Band::Gamma => self.gamma = value,
        }
    }

    /// Sum over all five bands.
    pub fn total(&self) -> f64 {
        self.delta + self.theta + self.alpha + self.beta + self.gamma
    }
}

/// Rescale band powers to a common percentage scale (each band → share of
/// the total × 100).
///
/// Zero-policy: a signal with no power in any band cannot be normalized;
/// this returns `DegenerateSignal` rather than letting NaN leak out.
pub fn normalize(powers: &BandPowers) -> Result<BandPowers, MindMusicError> {
    let total = powers.total();
    if !total.is_finite() || total <= 0.0 {
        return Err(MindMusicError::DegenerateSignal);
    }

    let mut normalized = BandPowers::default();
    for band in Band::ALL {
        normalized.set(band, powers.get(band) / total * 100.0);
    }
    Ok(normalized)
}
