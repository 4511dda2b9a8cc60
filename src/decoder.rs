//! Top-level decoder.
//!
//! Inverse-quantises one superframe's index frame, interpolates
//! `Wo`/voicing/spectral envelope across its `N_MODELS` sub-frames against
//! the previous superframe's final state, reconstructs minimum phase, and
//! runs the sinusoidal synthesiser once per sub-frame.

use crate::config::{
    AMP_K, MAX_AMP, N_MODELS, N_SAMP, OUTPUT_CLAMP, SAMPLES_PER_FRAME, WO_LEVELS, WO_UNVOICED,
};
use crate::error::CodecError;
use crate::interp_frame::{interp_amplitude_db, interp_wov, weight_for_subframe};
use crate::phase::{post_filter_amp, reconstruct_phase};
use crate::quantize;
use crate::rate_k::resample_to_rate_l;
use crate::synth::SynthState;
use crate::tables::build_pitch_table;

/// Snapshot of the parameters needed at a superframe boundary, so the next
/// call can interpolate from it.
#[derive(Clone, Copy)]
struct Endpoint {
    wo: f32,
    voiced: bool,
    rate_k_db: [f32; AMP_K],
}

impl Default for Endpoint {
    fn default() -> Self {
        Self { wo: WO_UNVOICED, voiced: false, rate_k_db: [-50.0; AMP_K] }
    }
}

/// Decoder state: one instance per independent audio stream.
pub struct Decoder {
    pitch_table: [f32; WO_LEVELS],
    synth: SynthState,
    prev: Endpoint,
}

impl Decoder {
    /// PCM samples produced by one [`Self::decode`] call.
    pub const SAMPLES_PER_FRAME: usize = SAMPLES_PER_FRAME;
    /// 16-bit index words consumed by one [`Self::decode`] call.
    pub const INDEXES_PER_FRAME: usize = 4;

    pub fn new() -> Result<Self, CodecError> {
        Ok(Self { pitch_table: build_pitch_table(), synth: SynthState::new(), prev: Endpoint::default() })
    }

    pub fn samples_per_frame(&self) -> usize {
        Self::SAMPLES_PER_FRAME
    }

    pub fn indexes_per_frame(&self) -> usize {
        Self::INDEXES_PER_FRAME
    }

    /// Decodes the mean speech energy (linear power) an index frame
    /// carries, without running full synthesis.
    pub fn decode_energy(&self, indexes: &[u16; 4]) -> f32 {
        let mut mean_db = quantize::decode_energy(indexes[2] as u8) - 10.0;
        if indexes[3] == 0 {
            mean_db -= 10.0;
        }
        libm::powf(10.0, mean_db / 10.0)
    }

    /// Decodes one 4-word index frame into its 320-sample (40 ms) PCM
    /// superframe.
    pub fn decode(&mut self, indexes: &[u16; 4]) -> [i16; SAMPLES_PER_FRAME] {
        let mut rate_k_db = quantize::vq_decode(indexes[0], indexes[1]);
        let energy_db = quantize::decode_energy(indexes[2] as u8);
        for v in rate_k_db.iter_mut() {
            *v += energy_db;
        }
        let (wo, voiced) = quantize::decode_pitch(indexes[3] as u8, &self.pitch_table);

        let mut postfiltered = [0.0f32; AMP_K];
        post_filter_amp(&rate_k_db, &mut postfiltered);
        let next = Endpoint { wo, voiced, rate_k_db: postfiltered };

        let mut out = [0i16; SAMPLES_PER_FRAME];
        for sub in 0..N_MODELS {
            let c = weight_for_subframe(sub);
            let (sub_wo, sub_voiced) =
                interp_wov(self.prev.wo, self.prev.voiced, next.wo, next.voiced, sub, c);
            let mut sub_rate_k_db = [0.0f32; AMP_K];
            interp_amplitude_db(&self.prev.rate_k_db, &next.rate_k_db, c, &mut sub_rate_k_db);

            let l = crate::analysis::harmonic_count(sub_wo);
            let mut a = [0.0f32; MAX_AMP];
            resample_to_rate_l(&sub_rate_k_db, l, sub_wo, &mut a);
            for v in a[..l].iter_mut() {
                *v = libm::powf(10.0, *v / 20.0);
            }

            let mut phase = [0.0f32; MAX_AMP];
            reconstruct_phase(&a, sub_wo, l, &mut phase);

            let segment = self.synth.synthesize_one_segment(sub_wo, l, sub_voiced, &a, &phase);
            let base = sub * N_SAMP;
            for i in 0..N_SAMP {
                out[base + i] = segment[i].clamp(-OUTPUT_CLAMP, OUTPUT_CLAMP) as i16;
            }
        }

        self.prev = next;
        out
    }
}

// Energy is interpolated implicitly: it's baked into `rate_k_db` (added in
// above before post-filtering), so `interp_amplitude_db` blending the two
// endpoints' envelopes blends energy along with spectral shape in one pass.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_silence_to_silence() {
        let mut dec = Decoder::new().unwrap();
        assert_eq!(dec.samples_per_frame(), 320);
        assert_eq!(dec.indexes_per_frame(), 4);

        let indexes = [0u16, 0u16, 0u16, 0u16];
        let out = dec.decode(&indexes);
        let peak = out.iter().map(|&s| (s as i32).abs()).max().unwrap();
        assert!(peak < 200, "peak was {peak}");
    }

    #[test]
    fn decode_energy_matches_unvoiced_floor_convention() {
        let dec = Decoder::new().unwrap();
        let e = dec.decode_energy(&[0, 0, 0, 0]);
        assert!(e > 0.0);
        assert!(e.is_finite());
    }

    #[test]
    fn voiced_pitch_code_produces_bounded_nonzero_output() {
        let mut dec = Decoder::new().unwrap();
        // A mid-range VQ pair, high energy, a mid-range voiced pitch code.
        let indexes = [10u16, 10u16, 12u16, 30u16];
        let out = dec.decode(&indexes);
        assert!(out.iter().any(|&s| s != 0));
        for &s in out.iter() {
            assert!((s as i32).abs() <= 32760);
        }
    }
}
