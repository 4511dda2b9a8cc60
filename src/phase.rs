//! Minimum-phase reconstruction via the real cepstrum, and the post-filter's
//! formant-enhancement gain stage.
//!
//! Only harmonic *magnitudes* are transmitted, so a minimum-phase spectrum
//! consistent with those magnitudes is reconstructed via the real cepstrum
//! (log-magnitude spectrum -> inverse FFT -> causal cepstral fold -> forward
//! FFT -> imaginary part) rather than synthesizing every harmonic in phase,
//! which would buzz.

use core::f32::consts::TAU;

use microfft::Complex32;

use crate::config::{AMP_K, MAX_AMP, NS, PHASE_FFT_SIZE, POSTFILTER_GAIN};
use crate::fft::{complex_forward_128, complex_inverse_128};
use crate::interp::interp_para;
use crate::rate_k::harmonic_khz;
use crate::tables::AMP_PRE;

const SCALE: f32 = 20.0 / core::f32::consts::LN_10;

/// Frequency grid the phase spectrum is evaluated on, `8*i/PHASE_FFT_SIZE`
/// kHz for `i` in `0..NS` — spans DC to Nyquist for an 8 kHz signal.
fn sample_freqs_khz() -> [f32; NS] {
    let mut f = [0.0f32; NS];
    for (i, slot) in f.iter_mut().enumerate() {
        *slot = 8.0 * i as f32 / PHASE_FFT_SIZE as f32;
    }
    f
}

/// Adds the formant pre-emphasis curve, boosts the resulting envelope's
/// total energy by [`POSTFILTER_GAIN`], then removes an equal-and-opposite
/// gain (plus the pre-emphasis) so the output's total energy matches the
/// input's — sharpens formants without changing overall loudness.
pub fn post_filter_amp(rate_k_db: &[f32; AMP_K], out: &mut [f32; AMP_K]) {
    let mut boosted = [0.0f32; AMP_K];
    let mut e_before = 0.0f32;
    for k in 0..AMP_K {
        boosted[k] = rate_k_db[k] + AMP_PRE[k];
        e_before += libm::powf(10.0, boosted[k] / 10.0);
    }
    for v in boosted.iter_mut() {
        *v *= POSTFILTER_GAIN;
    }
    let mut e_after = 0.0f32;
    for &v in boosted.iter() {
        e_after += libm::powf(10.0, v / 10.0);
    }
    let gain_db = if e_after > 0.0 { 10.0 * libm::log10f(e_before / e_after) } else { 0.0 };
    for k in 0..AMP_K {
        out[k] = boosted[k] + gain_db - AMP_PRE[k];
    }
}

/// Real-cepstrum minimum-phase spectrum for a log-magnitude (dB) envelope
/// sampled at `NS` points from DC to Nyquist.
fn mag_to_phase(mag_db: &[f32; NS]) -> [f32; PHASE_FFT_SIZE] {
    let mut sdb = [Complex32 { re: 0.0, im: 0.0 }; PHASE_FFT_SIZE];
    for i in 0..NS {
        sdb[i] = Complex32 { re: mag_db[i], im: 0.0 };
    }
    for i in 1..NS - 1 {
        sdb[PHASE_FFT_SIZE - i] = Complex32 { re: mag_db[i], im: 0.0 };
    }

    let mut c = complex_inverse_128(&mut sdb);
    for v in c.iter_mut() {
        v.re /= PHASE_FFT_SIZE as f32;
        v.im /= PHASE_FFT_SIZE as f32;
    }

    // Cepstral fold: fold the anti-causal half onto the causal half,
    // leaving the minimum-phase (causal) cepstrum.
    let mut cf = [Complex32 { re: 0.0, im: 0.0 }; PHASE_FFT_SIZE];
    cf[0] = c[0];
    for i in 1..NS - 1 {
        cf[i] = Complex32 { re: c[i].re + c[PHASE_FFT_SIZE - i].re, im: 0.0 };
    }
    cf[NS - 1] = c[NS - 1];

    let spectrum = complex_forward_128(&mut cf);
    let mut phase = [0.0f32; PHASE_FFT_SIZE];
    for (i, slot) in phase.iter_mut().enumerate() {
        *slot = spectrum[i].im / SCALE;
    }
    phase
}

/// Resamples the rate-L per-harmonic amplitude envelope onto the `NS`-point
/// phase-spectrum frequency grid, reconstructs a minimum-phase spectrum from
/// it, and samples a phase value for each of the `l` harmonics of `wo`.
pub fn reconstruct_phase(a: &[f32; MAX_AMP], wo: f32, l: usize, phase_out: &mut [f32; MAX_AMP]) {
    let mut freqs_khz = [0.0f32; MAX_AMP];
    let mut db = [0.0f32; MAX_AMP];
    for m in 1..=l {
        freqs_khz[m - 1] = harmonic_khz(m, wo);
        db[m - 1] = 20.0 * libm::log10f(a[m - 1].max(1e-6));
    }

    let freqs_grid = sample_freqs_khz();
    let mut gdb = [0.0f32; NS];
    interp_para(&freqs_khz[..l], &db[..l], &freqs_grid, &mut gdb);

    let phase = mag_to_phase(&gdb);
    for m in 1..=l {
        let bin = (0.5 + m as f32 * wo * PHASE_FFT_SIZE as f32 / TAU) as usize;
        phase_out[m - 1] = phase[bin.min(PHASE_FFT_SIZE - 1)];
    }
}
