//! Top-level encoder.
//!
//! Orchestrates pitch estimation, harmonic analysis, rate-K resampling, and
//! the scalar/vector quantisers into one 4-word index frame per
//! `SAMPLES_PER_FRAME` input samples. Harmonic analysis re-runs once per
//! `N_SAMP`-sample sub-frame (its rolling window needs the finer-grained
//! history), but only the last sub-frame's model is quantised and
//! transmitted — the decoder reconstructs the intermediate sub-frames by
//! interpolating between consecutive superframes' transmitted models.

use crate::analysis::{AnalysisState, Model};
use crate::config::{AMP_K, N_MODELS, N_SAMP, SAMPLES_PER_FRAME};
use crate::error::CodecError;
use crate::pitch::NlpState;
use crate::quantize;
use crate::rate_k::resample_to_rate_k;

/// Encoder state: one instance per independent audio stream.
pub struct Encoder {
    nlp: NlpState,
    analysis: AnalysisState,
}

impl Encoder {
    /// PCM samples consumed by one [`Self::encode`] call.
    pub const SAMPLES_PER_FRAME: usize = SAMPLES_PER_FRAME;
    /// 16-bit index words produced by one [`Self::encode`] call.
    pub const INDEXES_PER_FRAME: usize = 4;

    pub fn new() -> Result<Self, CodecError> {
        Ok(Self { nlp: NlpState::new(), analysis: AnalysisState::new() })
    }

    pub fn samples_per_frame(&self) -> usize {
        Self::SAMPLES_PER_FRAME
    }

    pub fn indexes_per_frame(&self) -> usize {
        Self::INDEXES_PER_FRAME
    }

    /// Encodes one 320-sample (40 ms) superframe into its 4-word index
    /// frame: `[vq_stage2, vq_stage1, energy, pitch]`.
    pub fn encode(&mut self, samples: &[i16; SAMPLES_PER_FRAME]) -> [u16; 4] {
        let mut float_samples = [0.0f32; SAMPLES_PER_FRAME];
        for (f, &s) in float_samples.iter_mut().zip(samples.iter()) {
            *f = s as f32;
        }

        let wo_coarse = self.nlp.estimate(&float_samples);

        let mut model = Model::default();
        for sub in 0..N_MODELS {
            let mut chunk = [0.0f32; N_SAMP];
            chunk.copy_from_slice(&float_samples[sub * N_SAMP..(sub + 1) * N_SAMP]);
            self.analysis.push_samples(&chunk);
            model = self.analysis.analyze(wo_coarse);
        }

        let mut rate_k_db = [0.0f32; AMP_K];
        resample_to_rate_k(&model.a, model.l, model.wo, &mut rate_k_db);

        let mean_db: f32 = rate_k_db.iter().sum::<f32>() / AMP_K as f32;
        for v in rate_k_db.iter_mut() {
            *v -= mean_db;
        }

        let (vq0, vq1, _) = quantize::vq_encode(&rate_k_db);
        let energy_idx = quantize::encode_energy(mean_db);
        let pitch_idx = if model.voiced { quantize::encode_pitch(model.wo) } else { 0 };

        [vq0, vq1, energy_idx as u16, pitch_idx as u16]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_a_full_frame_without_panicking() {
        let mut enc = Encoder::new().unwrap();
        assert_eq!(enc.samples_per_frame(), 320);
        assert_eq!(enc.indexes_per_frame(), 4);

        let mut samples = [0i16; SAMPLES_PER_FRAME];
        for (i, s) in samples.iter_mut().enumerate() {
            let t = i as f32 / crate::config::FS as f32;
            *s = (8000.0 * libm::sinf(core::f32::consts::TAU * 150.0 * t)) as i16;
        }
        let indexes = enc.encode(&samples);
        // 9-bit VQ indices, 4-bit energy, 6-bit pitch: all fit comfortably in u16.
        assert!(indexes[0] < crate::config::AMP_M as u16);
        assert!(indexes[1] < crate::config::AMP_M as u16);
        assert!(indexes[2] < 16);
        assert!(indexes[3] < 64);
    }

    #[test]
    fn silence_encodes_to_the_unvoiced_pitch_code() {
        let mut enc = Encoder::new().unwrap();
        let samples = [0i16; SAMPLES_PER_FRAME];
        let indexes = enc.encode(&samples);
        assert_eq!(indexes[3], 0);
    }
}
