use crate::bands::Band;
use std::fmt;

/// Errors surfaced by the analysis pipeline.
///
/// Generation and voice lifecycle never fail for valid inputs; unknown
/// state labels are resolved by the ambient fallback rather than an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MindMusicError {
    /// The sample window length is not a power of two (fatal to that call).
    InvalidInputLength { len: usize },
    /// A frequency band is narrower than the spectral resolution, so it
    /// covers zero bins. A configuration mistake, fatal at setup time.
    DegenerateBand { band: Band, low_hz: f64, high_hz: f64 },
    /// The window carries no power (all-zero signal). Recoverable: callers
    /// keep their previous classification until a valid tick arrives.
    DegenerateSignal,
}

impl fmt::Display for MindMusicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MindMusicError::InvalidInputLength { len } => {
                write!(f, "window length {len} is not a power of two")
            }
            MindMusicError::DegenerateBand { band, low_hz, high_hz } => {
                write!(
                    f,
                    "{} band ({low_hz}-{high_hz} Hz) spans zero frequency bins at this resolution",
                    band.name()
                )
            }
            MindMusicError::DegenerateSignal => {
                write!(f, "signal has zero total power, cannot normalize")
            }
        }
    }
}

impl std::error::Error for MindMusicError {}
