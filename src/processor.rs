//! EEG signal-processing front-end.
//!
//! Owns the acquisition configuration and runs the per-window chain:
//! spectrum → PSD → band powers → normalization → classification. The PSD is
//! computed once per window and sliced five times, one slice per band.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::bands::{self, Band, BandPowers};
use crate::classify::{self, Classification};
use crate::error::MindMusicError;
use crate::spectrum;

/// Radius of the trivial moving-average smoothing pass, in samples.
const SMOOTHING_RADIUS: usize = 5;

/// Acquisition configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Sampling rate in Hz.
    pub sampling_rate_hz: f64,
    /// Window length in samples; must be a power of two.
    pub window_size: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        ProcessorConfig {
            sampling_rate_hz: 256.0,
            window_size: 256,
        }
    }
}

impl ProcessorConfig {
    /// Validate the configuration: the window length must be a power of two
    /// and every band must cover at least one frequency bin at the resulting
    /// resolution.
    pub fn validate(&self) -> Result<(), MindMusicError> {
        if self.window_size == 0 || !self.window_size.is_power_of_two() {
            return Err(MindMusicError::InvalidInputLength { len: self.window_size });
        }
        let resolution = self.sampling_rate_hz / self.window_size as f64;
        for band in Band::ALL {
            band_bin_range(band, resolution, self.window_size)?;
        }
        Ok(())
    }
}

/// One multichannel acquisition instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EegSample {
    pub timestamp_ms: f64,
    pub channels: Vec<f64>,
}

impl EegSample {
    /// Collapse the channels to one scalar by averaging. An empty channel
    /// list yields zero.
    pub fn mean(&self) -> f64 {
        if self.channels.is_empty() {
            return 0.0;
        }
        self.channels.iter().sum::<f64>() / self.channels.len() as f64
    }
}

/// Fixed-capacity sliding window over the incoming scalar stream.
///
/// `push` evicts the oldest sample once the buffer is full; `window` yields
/// a snapshot only when a full window is available.
#[derive(Debug, Clone)]
pub struct WindowBuffer {
    buffer: VecDeque<f64>,
    capacity: usize,
}

impl WindowBuffer {
    pub fn new(capacity: usize) -> Self {
        WindowBuffer {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, sample: f64) {
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(sample);
    }

    pub fn is_full(&self) -> bool {
        self.buffer.len() == self.capacity
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Snapshot of the current window, oldest sample first. `None` until
    /// the buffer has filled once.
    pub fn window(&self) -> Option<Vec<f64>> {
        if !self.is_full() {
            return None;
        }
        Some(self.buffer.iter().copied().collect())
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

/// Everything derived from one valid sample window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowAnalysis {
    /// Raw band powers (mean PSD per band).
    pub raw: BandPowers,
    /// Band powers on the common percentage scale.
    pub normalized: BandPowers,
    pub classification: Classification,
}

/// The EEG processor: spectral analysis and band-power extraction.
pub struct EegProcessor {
    config: ProcessorConfig,
}

impl EegProcessor {
    pub fn new(config: ProcessorConfig) -> Result<Self, MindMusicError> {
        config.validate()?;
        Ok(EegProcessor { config })
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Extract the five band powers from one sample window.
    ///
    /// The resolution follows the actual window length, so shorter or longer
    /// (power-of-two) windows than the configured size still analyze
    /// correctly.
    pub fn extract_band_powers(&self, window: &[f64]) -> Result<BandPowers, MindMusicError> {
        let spectrum = spectrum::transform(window)?;
        let psd = spectrum::psd(&spectrum);
        let resolution = self.config.sampling_rate_hz / window.len() as f64;

        let mut powers = BandPowers::default();
        for band in Band::ALL {
            let (low_idx, high_idx) = band_bin_range(band, resolution, psd.len())?;
            let sum: f64 = psd[low_idx..high_idx].iter().sum();
            powers.set(band, sum / (high_idx - low_idx) as f64);
        }
        Ok(powers)
    }

    /// Run the full chain on one window: extract, normalize, classify.
    pub fn process(&self, window: &[f64]) -> Result<WindowAnalysis, MindMusicError> {
        let raw = self.extract_band_powers(window)?;
        let normalized = bands::normalize(&raw)?;
        let classification = classify::classify(&normalized);
        Ok(WindowAnalysis { raw, normalized, classification })
    }

    /// Trivial smoothing pass: centered moving average over ±5 samples,
    /// with edge windows shrunk to the available neighbors.
    pub fn smooth(&self, signal: &[f64]) -> Vec<f64> {
        let mut filtered = Vec::with_capacity(signal.len());
        for i in 0..signal.len() {
            let start = i.saturating_sub(SMOOTHING_RADIUS);
            let end = (i + SMOOTHING_RADIUS + 1).min(signal.len());
            let sum: f64 = signal[start..end].iter().sum();
            filtered.push(sum / (end - start) as f64);
        }
        filtered
    }
}

/// Bin range `[low_idx, high_idx)` for a band at the given resolution,
/// clamped to the spectrum length. A band narrower than one bin is a
/// configuration error.
fn band_bin_range(
    band: Band,
    resolution: f64,
    spectrum_len: usize,
) -> Result<(usize, usize), MindMusicError> {
    let (low_hz, high_hz) = band.range_hz();
    let low_idx = (low_hz / resolution).floor() as usize;
    let high_idx = ((high_hz / resolution).floor() as usize).min(spectrum_len);
    if high_idx <= low_idx {
        return Err(MindMusicError::DegenerateBand { band, low_hz, high_hz });
    }
    Ok((low_idx, high_idx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn processor() -> EegProcessor {
        EegProcessor::new(ProcessorConfig::default()).unwrap()
    }

    fn sine_window(freq_hz: f64, amplitude: f64) -> Vec<f64> {
        (0..256)
            .map(|i| amplitude * (2.0 * PI * freq_hz * i as f64 / 256.0).sin())
            .collect()
    }

    #[test]
    fn default_config_is_valid() {
        assert!(ProcessorConfig::default().validate().is_ok());
    }

    #[test]
    fn tiny_window_degenerates_bands() {
        // 16 samples at 256 Hz → 16 Hz resolution: delta spans zero bins
        let config = ProcessorConfig { sampling_rate_hz: 256.0, window_size: 16 };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, MindMusicError::DegenerateBand { band: Band::Delta, .. }));
    }

    #[test]
    fn non_power_of_two_window_size_rejected() {
        let config = ProcessorConfig { sampling_rate_hz: 256.0, window_size: 200 };
        assert_eq!(
            config.validate().unwrap_err(),
            MindMusicError::InvalidInputLength { len: 200 }
        );
    }

    #[test]
    fn ten_hz_sine_lands_in_alpha() {
        let powers = processor().extract_band_powers(&sine_window(10.0, 1.0)).unwrap();
        assert!(powers.alpha > powers.delta, "alpha should beat delta");
        assert!(powers.alpha > powers.theta, "alpha should beat theta");
        assert!(powers.alpha > powers.beta, "alpha should beat beta");
        assert!(powers.alpha > powers.gamma, "alpha should beat gamma");
    }

    #[test]
    fn band_powers_are_non_negative() {
        let window: Vec<f64> = (0..256).map(|i| ((i * 37 % 101) as f64 - 50.0) / 50.0).collect();
        let powers = processor().extract_band_powers(&window).unwrap();
        for band in Band::ALL {
            assert!(powers.get(band) >= 0.0, "{} power negative", band.name());
        }
    }

    #[test]
    fn process_classifies_alpha_sine_as_relaxed() {
        let analysis = processor().process(&sine_window(10.0, 1.0)).unwrap();
        assert_eq!(analysis.classification.state.label(), "relaxed");
        assert!((analysis.normalized.total() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn all_zero_window_reports_degenerate_signal() {
        let err = processor().process(&[0.0; 256]).unwrap_err();
        assert_eq!(err, MindMusicError::DegenerateSignal);
    }

    #[test]
    fn smooth_flattens_a_spike() {
        let mut signal = vec![0.0; 32];
        signal[16] = 11.0;
        let smoothed = processor().smooth(&signal);
        assert_eq!(smoothed.len(), signal.len());
        assert!((smoothed[16] - 1.0).abs() < 1e-9, "spike spread over 11 samples");
        assert!(smoothed[10].abs() < 1e-9, "outside the radius stays flat");
    }

    #[test]
    fn smooth_preserves_constant_signals_at_edges() {
        let smoothed = processor().smooth(&[2.0; 16]);
        assert!(smoothed.iter().all(|&s| (s - 2.0).abs() < 1e-9));
    }

    #[test]
    fn window_buffer_slides() {
        let mut buffer = WindowBuffer::new(4);
        assert!(buffer.window().is_none());
        for i in 0..4 {
            buffer.push(i as f64);
        }
        assert_eq!(buffer.window().unwrap(), vec![0.0, 1.0, 2.0, 3.0]);

        buffer.push(4.0);
        assert_eq!(buffer.window().unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(buffer.len(), 4);
    }

    #[test]
    fn sample_mean_averages_channels() {
        let sample = EegSample { timestamp_ms: 0.0, channels: vec![1.0, 2.0, 3.0, 6.0] };
        assert!((sample.mean() - 3.0).abs() < 1e-12);
        let empty = EegSample { timestamp_ms: 0.0, channels: vec![] };
        assert_eq!(empty.mean(), 0.0);
    }
}
