//! Sinusoidal synthesiser.
//!
//! Combines a deterministic LCG (used both for unvoiced excitation and
//! voiced phase jitter), zero-order phase accumulation per sub-frame, a
//! postfilter stage that randomises the phase of weak harmonics in voiced
//! frames against a running background-noise estimate, and a synthesis
//! stage that places each harmonic at its FFT bin, inverse-transforms, and
//! overlap-adds with a Parzen window whose hop is one sample short of a
//! full sub-frame — a load-bearing off-by-one, preserved rather than
//! squared up to a clean `N_SAMP`.

use core::f32::consts::TAU;

use microfft::Complex32;

use crate::config::{
    BG_BETA, BG_MARGIN, BG_THRESH, FFT_SIZE, MAX_AMP, N_SAMP, OUTPUT_CLAMP, PRNG_MAX,
    SYNTH_MAKEUP_GAIN,
};
use crate::fft::{real_inverse_512, SPECTRUM_512};

const OVERLAP_LEN: usize = 2 * N_SAMP;

/// Deterministic LCG PRNG (`state` starts at `1`), used for unvoiced
/// excitation and for phase-randomising weak voiced harmonics.
struct Prng {
    state: u32,
}

impl Prng {
    fn new() -> Self {
        Self { state: 1 }
    }

    fn next_angle(&mut self) -> f32 {
        self.state = self.state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        let value = ((self.state >> 16) % 32768) as f32;
        TAU * value / PRNG_MAX
    }
}

/// Streaming synthesiser state: excitation phase accumulator, background
/// noise estimate, PRNG, and the overlap-add accumulator.
pub struct SynthState {
    rng: Prng,
    ex_phase: f32,
    bg_est_db: f32,
    buffer: [f32; OVERLAP_LEN],
}

impl Default for SynthState {
    fn default() -> Self {
        Self { rng: Prng::new(), ex_phase: 0.0, bg_est_db: 0.0, buffer: [0.0; OVERLAP_LEN] }
    }
}

impl SynthState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Synthesises one `N_SAMP`-sample sub-frame from a harmonic model:
    /// `wo`/`l`/`voiced` plus per-harmonic amplitude `a` and the
    /// minimum-phase spectrum `min_phase` reconstructed in [`crate::phase`].
    pub fn synthesize_one_segment(
        &mut self,
        wo: f32,
        l: usize,
        voiced: bool,
        a: &[f32; MAX_AMP],
        min_phase: &[f32; MAX_AMP],
    ) -> [f32; N_SAMP] {
        let mut phi = self.phase_synth_zero_order(wo, l, voiced, min_phase);
        self.postfilter(l, voiced, a, &mut phi);
        let mut out = self.synthesize(wo, l, a, &phi);
        apply_output_limiting(&mut out);
        out
    }

    /// Accumulates the excitation phase by one sub-frame's worth of `Wo`
    /// and derives each harmonic's synthesis phase from it: the
    /// harmonic-multiple of a common excitation phase when voiced, a fresh
    /// random phase per harmonic when not, rotated by the reconstructed
    /// minimum-phase spectrum.
    fn phase_synth_zero_order(
        &mut self,
        wo: f32,
        l: usize,
        voiced: bool,
        min_phase: &[f32; MAX_AMP],
    ) -> [f32; MAX_AMP] {
        self.ex_phase += wo * N_SAMP as f32;
        self.ex_phase -= libm::roundf(self.ex_phase / TAU) * TAU;

        let mut phi = [0.0f32; MAX_AMP];
        for m in 1..=l {
            let ex_angle = if voiced { m as f32 * self.ex_phase } else { self.rng.next_angle() };
            let (ex_im, ex_re) = (libm::sinf(ex_angle), libm::cosf(ex_angle));
            let h = min_phase[m - 1];
            let (h_im, h_re) = (libm::sinf(h), libm::cosf(h));
            let re = ex_re * h_re - ex_im * h_im;
            let im = ex_re * h_im + ex_im * h_re;
            phi[m - 1] = libm::atan2f(im, re + 1e-12);
        }
        phi
    }

    /// Tracks a background-noise estimate from unvoiced frames' energy and,
    /// on voiced frames, randomises the phase of any harmonic too weak to
    /// stand clearly above that noise floor (masks phase artefacts in the
    /// noise-like part of a voiced spectrum).
    fn postfilter(&mut self, l: usize, voiced: bool, a: &[f32; MAX_AMP], phi: &mut [f32; MAX_AMP]) {
        let mean_energy = a[..l].iter().map(|v| v * v).sum::<f32>() / l as f32;
        let e_db = 10.0 * libm::log10f(mean_energy.max(1e-9));

        if e_db < BG_THRESH && !voiced {
            self.bg_est_db = self.bg_est_db * (1.0 - BG_BETA) + e_db * BG_BETA;
        }

        if voiced {
            let thresh = libm::powf(10.0, (self.bg_est_db + BG_MARGIN) / 20.0);
            for m in 1..=l {
                if a[m - 1] < thresh {
                    phi[m - 1] = self.rng.next_angle();
                }
            }
        }
    }

    /// Places each harmonic at its nearest FFT bin, inverse-transforms, and
    /// overlap-adds the result into the running buffer with a Parzen
    /// window whose hop is `N_SAMP - 1` rather than `N_SAMP` (see module
    /// docs).
    fn synthesize(&mut self, wo: f32, l: usize, a: &[f32; MAX_AMP], phi: &[f32; MAX_AMP]) -> [f32; N_SAMP] {
        let mut sw = [Complex32 { re: 0.0, im: 0.0 }; SPECTRUM_512];
        for m in 1..=l {
            let bin = (libm::roundf(m as f32 * wo * FFT_SIZE as f32 / TAU) as usize)
                .min(FFT_SIZE / 2 - 1);
            sw[bin] =
                Complex32 { re: a[m - 1] * libm::cosf(phi[m - 1]), im: a[m - 1] * libm::sinf(phi[m - 1]) };
        }
        let raw = real_inverse_512(&sw);
        let mut norm = [0.0f32; FFT_SIZE];
        for i in 0..FFT_SIZE {
            norm[i] = raw[i] / FFT_SIZE as f32;
        }

        let parzen = crate::tables::PARZEN;
        for i in 0..N_SAMP - 1 {
            self.buffer[i] += norm[FFT_SIZE - N_SAMP + 1 + i] * parzen[i];
        }
        for i in 0..N_SAMP + 1 {
            self.buffer[N_SAMP - 1 + i] = norm[i] * parzen[N_SAMP - 1 + i];
        }

        let mut out = [0.0f32; N_SAMP];
        out.copy_from_slice(&self.buffer[..N_SAMP]);

        self.buffer.copy_within(N_SAMP - 1.., 0);
        for v in self.buffer[OVERLAP_LEN - (N_SAMP - 1)..].iter_mut() {
            *v = 0.0;
        }

        out
    }
}

/// Soft-limits the segment's positive peak (only the positive excursion is
/// tracked, not the magnitude) before applying the fixed synthesis make-up
/// gain and saturating to the codec's output range.
fn apply_output_limiting(samples: &mut [f32; N_SAMP]) {
    let mut max_sample = 0.0f32;
    for &s in samples.iter() {
        if s > max_sample {
            max_sample = s;
        }
    }
    let over = max_sample / 30000.0;
    let gain = if over > 1.0 { 1.0 / (over * over) } else { 1.0 };
    for s in samples.iter_mut() {
        *s = (*s * gain * SYNTH_MAKEUP_GAIN).clamp(-OUTPUT_CLAMP, OUTPUT_CLAMP);
    }
}
