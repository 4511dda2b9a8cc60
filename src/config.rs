//! Fixed constants of the 700C sinusoidal codec.
//!
//! Every one of these is part of the wire format or the numerical design of
//! the codec; none of it is tunable at runtime. [`CodecConfig`] exists only
//! so call sites have a self-describing value to assert buffer sizes
//! against.

/// Sample rate, Hz.
pub const FS: usize = 8000;
/// PCM samples per 10 ms sub-frame.
pub const N_SAMP: usize = 80;
/// Sub-frames per 40 ms superframe.
pub const N_MODELS: usize = 4;
/// PCM samples per 40 ms superframe (`N_SAMP * N_MODELS`).
pub const SAMPLES_PER_FRAME: usize = N_SAMP * N_MODELS;
/// Pitch analysis window, samples.
pub const M_PITCH: usize = 320;
/// Minimum pitch period, samples.
pub const P_MIN: usize = 20;
/// Maximum pitch period, samples.
pub const P_MAX: usize = 160;
/// Maximum number of harmonics modelled in a sub-frame.
pub const MAX_AMP: usize = 80;
/// FFT size used for harmonic analysis/synthesis and NLP pitch estimation.
pub const FFT_SIZE: usize = 512;
/// FFT size used for minimum-phase reconstruction.
pub const PHASE_FFT_SIZE: usize = 128;
/// Number of one-sided phase-spectrum bins (`PHASE_FFT_SIZE / 2 + 1`).
pub const NS: usize = PHASE_FFT_SIZE / 2 + 1;
/// Analysis window length (Hamming2).
pub const NW: usize = 279;
/// NLP decimation factor.
pub const DEC: usize = 5;
/// NLP decimation low-pass filter order.
pub const NLP_NTAP: usize = 48;
/// Rate-K resampling grid size.
pub const AMP_K: usize = 20;
/// VQ codebook entry count (per stage).
pub const AMP_M: usize = 512;
/// MBest search stages (stage-1 index, stage-2 index, unused, unused).
pub const MBEST_STAGES: usize = 4;
/// MBest candidates retained per stage.
pub const MBEST_ENTRIES: usize = 5;
/// Voicing decision SNR threshold, dB.
pub const V_THRESH: f32 = 6.0;
/// Pitch quantiser levels (6 bits).
pub const WO_LEVELS: usize = 64;
/// Energy quantiser levels (4 bits).
pub const ENERGY_LEVELS: usize = 16;

/// One-pole DC-notch coefficient used by the NLP pitch detector.
pub const NLP_NOTCH_COEFF: f32 = 0.9497;
/// Sub-multiple post-processing acceptance ratio.
pub const NLP_SUBMULT_THRESH: f32 = 0.3;
/// Smallest FFT bin searched by the NLP pitch detector (`FFT_SIZE * DEC / P_MAX`).
pub const NLP_MIN_BIN: usize = FFT_SIZE * DEC / P_MAX;

/// `0.9497 * PI`, the harmonic-count clamp threshold.
pub const FRACT_PI: f32 = 0.9497 * core::f32::consts::PI;
/// Angular pitch frequency corresponding to 60 Hz, used by the voicing override.
pub const SIXTY_WO: f32 = core::f32::consts::TAU * 60.0 / FS as f32;

/// Minimum fundamental angular frequency (`2*PI / P_MAX`).
pub const WO_MIN: f32 = core::f32::consts::TAU / P_MAX as f32;
/// Maximum fundamental angular frequency (`2*PI / P_MIN`).
pub const WO_MAX: f32 = core::f32::consts::TAU / P_MIN as f32;

/// Nominal fundamental used when interpolating between two unvoiced endpoints.
pub const WO_UNVOICED: f32 = core::f32::consts::TAU / 100.0;

/// Background-noise estimator threshold, dB (post-filter phase randomisation).
pub const BG_THRESH: f32 = 40.0;
/// Background-noise estimator smoothing factor.
pub const BG_BETA: f32 = 0.1;
/// Background-noise estimator margin, dB, added before deriving the
/// phase-randomisation amplitude threshold.
pub const BG_MARGIN: f32 = 6.0;

/// Output saturation bound, deliberately short of `i16::MAX` / `i16::MIN`.
pub const OUTPUT_CLAMP: f32 = 32760.0;
/// Post-synthesis make-up gain (700C runs a little quiet by design).
pub const SYNTH_MAKEUP_GAIN: f32 = 1.5;
/// Post-filter formant enhancement gain.
pub const POSTFILTER_GAIN: f32 = 1.5;

/// PRNG modulus for unvoiced excitation / phase jitter (`CODEC2_RND_MAX`).
pub const PRNG_MAX: f32 = 32767.0;

/// Snapshot of the single supported operating point, useful for call sites
/// that want to assert their own buffers match the codec's expectations.
///
/// This codec has exactly one mode (700 bit/s, 8 kHz, 320-sample
/// superframes); `CodecConfig` does not make any of that configurable, it
/// just documents it as a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Sample rate, Hz.
    pub sample_rate: usize,
    /// PCM samples consumed/produced per `encode`/`decode` call.
    pub samples_per_frame: usize,
    /// Index words per encoded frame.
    pub indexes_per_frame: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self { sample_rate: FS, samples_per_frame: SAMPLES_PER_FRAME, indexes_per_frame: 4 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wo_bounds_bracket_pitch_range() {
        assert!(WO_MIN < WO_MAX);
        assert!((WO_MIN - core::f32::consts::TAU / 160.0).abs() < 1e-6);
        assert!((WO_MAX - core::f32::consts::TAU / 20.0).abs() < 1e-6);
    }

    #[test]
    fn default_config_matches_wire_format() {
        let cfg = CodecConfig::default();
        assert_eq!(cfg.samples_per_frame, 320);
        assert_eq!(cfg.indexes_per_frame, 4);
    }
}
