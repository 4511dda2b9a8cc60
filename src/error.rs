//! Error types for the codec.

/// Failure reported by [`crate::Encoder::new`] / [`crate::Decoder::new`].
///
/// Encode/decode never fail once construction has succeeded: every division
/// is epsilon-guarded, every pitch is clamped to `[WO_MIN, WO_MAX]`, every VQ
/// index is bit-masked at emission and on lookup. The only documented
/// failure mode of the codec is resource setup, reported per subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// The harmonic-analysis FFT subsystem failed to initialise.
    AnalysisFft,
    /// The harmonic-synthesis FFT subsystem failed to initialise.
    SynthesisFft,
    /// The pitch-estimation FFT subsystem failed to initialise.
    PitchFft,
}

#[cfg(feature = "std")]
impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::AnalysisFft => write!(f, "analysis FFT subsystem failed to initialise"),
            CodecError::SynthesisFft => write!(f, "synthesis FFT subsystem failed to initialise"),
            CodecError::PitchFft => write!(f, "pitch FFT subsystem failed to initialise"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CodecError {}
