//! Synthetic EEG source.
//!
//! A deterministic stand-in for live acquisition: one sinusoid per canonical
//! band plus uniform noise, mirroring the demo stream the web app falls back
//! to when no dataset is present. The core pipeline treats this source
//! exactly like a live or replayed one.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

/// (frequency Hz, amplitude) per band component: delta, theta, alpha,
/// beta, gamma.
const BAND_COMPONENTS: [(f64, f64); 5] = [
    (2.0, 30.0),
    (6.0, 20.0),
    (10.0, 40.0),
    (20.0, 25.0),
    (40.0, 15.0),
];

const NOISE_AMPLITUDE: f64 = 10.0;

/// Seedable generator of EEG-like samples.
pub struct SyntheticEeg {
    rng: SmallRng,
    sampling_rate_hz: f64,
    sample_index: u64,
}

impl SyntheticEeg {
    pub fn new(sampling_rate_hz: f64) -> Self {
        SyntheticEeg {
            rng: SmallRng::from_entropy(),
            sampling_rate_hz,
            sample_index: 0,
        }
    }

    /// Deterministic stream for tests.
    pub fn with_seed(sampling_rate_hz: f64, seed: u64) -> Self {
        SyntheticEeg {
            rng: SmallRng::seed_from_u64(seed),
            sampling_rate_hz,
            sample_index: 0,
        }
    }

    /// Next scalar sample: the five band sinusoids plus noise.
    pub fn next_sample(&mut self) -> f64 {
        let t = self.sample_index as f64 / self.sampling_rate_hz;
        self.sample_index += 1;

        let tone: f64 = BAND_COMPONENTS
            .iter()
            .map(|&(freq, amplitude)| amplitude * (2.0 * std::f64::consts::PI * freq * t).sin())
            .sum();
        let noise = self.rng.gen_range(-0.5..0.5) * NOISE_AMPLITUDE;
        tone + noise
    }

    /// Fill one window of the given length.
    pub fn next_window(&mut self, len: usize) -> Vec<f64> {
        (0..len).map(|_| self.next_sample()).collect()
    }
}
