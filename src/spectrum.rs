//! Spectral analyzer — radix-2 FFT over real sample windows.
//!
//! The transform is iterative (bit-reversal permutation followed by butterfly
//! passes) so large windows never risk recursion depth. Input windows are
//! never mutated; every call produces a fresh spectrum.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::MindMusicError;

/// A single complex frequency-domain bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub fn new(re: f64, im: f64) -> Self {
        Complex { re, im }
    }

    /// Squared magnitude `re² + im²` — the power of this bin.
    pub fn magnitude_squared(self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    fn conjugate(self) -> Self {
        Complex::new(self.re, -self.im)
    }
}

impl std::ops::Add for Complex {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Complex::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl std::ops::Sub for Complex {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Complex::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl std::ops::Mul for Complex {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Complex::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

/// Forward transform of a real sample window.
///
/// The window length must be a power of two ≥ 1. Returns a spectrum of the
/// same length; bin k holds the component at frequency `k * rate / len`.
pub fn transform(window: &[f64]) -> Result<Vec<Complex>, MindMusicError> {
    check_length(window.len())?;
    let mut data: Vec<Complex> = window.iter().map(|&s| Complex::new(s, 0.0)).collect();
    fft_in_place(&mut data);
    Ok(data)
}

/// Inverse transform, recovering time-domain samples from a spectrum.
///
/// Implemented as conjugate → forward → conjugate, scaled by 1/n. A real
/// input round-trips through `transform` then `inverse` with imaginary
/// parts at numerical noise level.
pub fn inverse(spectrum: &[Complex]) -> Result<Vec<Complex>, MindMusicError> {
    let n = spectrum.len();
    check_length(n)?;
    let mut data: Vec<Complex> = spectrum.iter().map(|c| c.conjugate()).collect();
    fft_in_place(&mut data);
    let scale = 1.0 / n as f64;
    for c in data.iter_mut() {
        *c = c.conjugate();
        c.re *= scale;
        c.im *= scale;
    }
    Ok(data)
}

/// Power spectral density: `|spectrum[i]|²` for every bin.
pub fn psd(spectrum: &[Complex]) -> Vec<f64> {
    spectrum.iter().map(|c| c.magnitude_squared()).collect()
}

fn check_length(len: usize) -> Result<(), MindMusicError> {
    if len == 0 || !len.is_power_of_two() {
        return Err(MindMusicError::InvalidInputLength { len });
    }
    Ok(())
}

/// In-place radix-2 Cooley-Tukey FFT. Length must be a power of two.
fn fft_in_place(data: &mut [Complex]) {
    let n = data.len();
    if n <= 1 {
        return;
    }

    // Bit-reversal permutation
    let mut j = 0usize;
    for i in 0..n {
        if i < j {
            data.swap(i, j);
        }
        let mut m = n >> 1;
        while m >= 1 && j >= m {
            j -= m;
            m >>= 1;
        }
        j += m;
    }

    // Butterfly passes, doubling the sub-transform length each round.
    // Twiddle factor: exp(-2πik / len)
    let mut len = 2;
    while len <= n {
        let half = len / 2;
        let angle = -2.0 * PI / len as f64;
        for start in (0..n).step_by(len) {
            for k in 0..half {
                let tw = Complex::new((angle * k as f64).cos(), (angle * k as f64).sin());
                let u = data[start + k];
                let v = data[start + k + half] * tw;
                data[start + k] = u + v;
                data[start + k + half] = u - v;
            }
        }
        len <<= 1;
    }
}
