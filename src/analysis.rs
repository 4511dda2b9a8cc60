//! Harmonic analyser: two-stage pitch refinement, per-harmonic amplitude
//! estimation, and MBE voicing decision.
//!
//! Builds a zero-phase-windowed 512-point spectrum from a 320-sample history
//! buffer, walks that spectrum's harmonic-sum energy around the NLP's coarse
//! `Wo` estimate, integrates spectral energy in each harmonic's band, then
//! compares that against a synthetic single-sinusoid-per-band projection
//! (Multi-Band Excitation) to decide voiced/unvoiced.

use core::f32::consts::TAU;

use microfft::Complex32;

use crate::config::{
    FFT_SIZE, FRACT_PI, MAX_AMP, M_PITCH, N_SAMP, SIXTY_WO, V_THRESH, WO_MAX, WO_MIN,
};
use crate::fft::{real_forward_512, SPECTRUM_512};
use crate::logging::trace_log;
use crate::tables::HAMMING2;

/// One analysed sub-frame's harmonic model.
#[derive(Debug, Clone)]
pub struct Model {
    pub wo: f32,
    pub l: usize,
    pub voiced: bool,
    pub a: [f32; MAX_AMP],
}

impl Default for Model {
    fn default() -> Self {
        Self { wo: WO_MAX, l: harmonic_count(WO_MAX), voiced: false, a: [0.0; MAX_AMP] }
    }
}

/// Number of harmonics representable below Nyquist for a given `Wo`, with a
/// guard against the top harmonic aliasing past the Nyquist-adjacent
/// analysis band (decrement `L` if `Wo * L >= FRACT_PI`).
pub fn harmonic_count(wo: f32) -> usize {
    let mut l = (core::f32::consts::PI / wo) as usize;
    if wo * l as f32 >= FRACT_PI {
        l -= 1;
    }
    l.clamp(1, MAX_AMP)
}

/// Rolling 320-sample analysis window, advanced 80 samples (one sub-frame)
/// at a time.
pub struct AnalysisState {
    history: [f32; M_PITCH],
    /// Spectrum of the zero-phase-windowed Hamming2 analysis window itself,
    /// used as the per-band kernel in the MBE voicing projection.
    window_kernel: [Complex32; SPECTRUM_512],
}

impl AnalysisState {
    pub fn new() -> Self {
        let mut buf = [0.0f32; FFT_SIZE];
        zero_phase_layout(&HAMMING2, &mut buf);
        let kernel = real_forward_512(&mut buf);
        Self { history: [0.0; M_PITCH], window_kernel: kernel }
    }

    /// Shifts the analysis window left by one sub-frame and appends `new`.
    pub fn push_samples(&mut self, new_samples: &[f32; N_SAMP]) {
        self.history.copy_within(N_SAMP.., 0);
        self.history[M_PITCH - N_SAMP..].copy_from_slice(new_samples);
    }

    /// Produces the harmonic model for the current analysis window, given
    /// the NLP's coarse pitch estimate for this sub-frame.
    pub fn analyze(&self, wo_coarse: f32) -> Model {
        let mut windowed = [0.0f32; M_PITCH];
        for i in 0..M_PITCH {
            windowed[i] = self.history[i] * HAMMING2[i];
        }
        let mut fft_in = [0.0f32; FFT_SIZE];
        zero_phase_layout(&windowed, &mut fft_in);
        let spectrum = real_forward_512(&mut fft_in);

        let wo = two_stage_pitch_refinement(&spectrum, wo_coarse);
        let l = harmonic_count(wo);
        let a = estimate_amplitudes(&spectrum, wo, l);
        let voiced = estimate_voicing_mbe(&spectrum, &self.window_kernel, wo, l, &a);

        Model { wo, l, voiced, a }
    }
}

impl Default for AnalysisState {
    fn default() -> Self {
        Self::new()
    }
}

/// Places a window (already applied to the samples) into a longer FFT
/// buffer split around its centre, so the transform sees a zero-phase
/// signal rather than one shifted by half the window's length.
fn zero_phase_layout(windowed: &[f32; M_PITCH], fft_in: &mut [f32; FFT_SIZE]) {
    let half = M_PITCH / 2;
    fft_in[..half].copy_from_slice(&windowed[half..]);
    fft_in[FFT_SIZE - half..].copy_from_slice(&windowed[..half]);
}

fn bin_of(angular_freq: f32) -> f32 {
    angular_freq * FFT_SIZE as f32 / TAU
}

fn harmonic_sum_energy(spectrum: &[Complex32; SPECTRUM_512], wo: f32) -> f32 {
    let l = harmonic_count(wo);
    let mut sum = 0.0f32;
    for m in 1..=l {
        let bin = bin_of(m as f32 * wo).round() as usize;
        let bin = bin.min(SPECTRUM_512 - 1);
        let c = spectrum[bin];
        sum += c.re * c.re + c.im * c.im;
    }
    sum
}

/// Coarse ±5-bin, then fine ±1-bin-in-quarter-steps search around the NLP's
/// pitch estimate, maximising the harmonic-sum energy.
fn two_stage_pitch_refinement(spectrum: &[Complex32; SPECTRUM_512], wo_coarse: f32) -> f32 {
    let delta = TAU / FFT_SIZE as f32;

    let mut coarse_wo = wo_coarse;
    let mut coarse_energy = harmonic_sum_energy(spectrum, wo_coarse);
    for step in -5..=5i32 {
        let candidate = (wo_coarse + step as f32 * delta).clamp(WO_MIN, WO_MAX);
        let e = harmonic_sum_energy(spectrum, candidate);
        if e > coarse_energy {
            coarse_energy = e;
            coarse_wo = candidate;
        }
    }

    let mut fine_wo = coarse_wo;
    let mut fine_energy = coarse_energy;
    let mut step = -1.0f32;
    while step <= 1.0 + f32::EPSILON {
        let candidate = (coarse_wo + step * delta).clamp(WO_MIN, WO_MAX);
        let e = harmonic_sum_energy(spectrum, candidate);
        if e > fine_energy {
            fine_energy = e;
            fine_wo = candidate;
        }
        step += 0.25;
    }

    fine_wo
}

/// Sums spectral energy in the band around each harmonic (bounded by the
/// midpoints to its neighbours) and takes the square root.
fn estimate_amplitudes(spectrum: &[Complex32; SPECTRUM_512], wo: f32, l: usize) -> [f32; MAX_AMP] {
    let mut a = [0.0f32; MAX_AMP];
    for m in 1..=l {
        let centre = m as f32 * wo;
        let lo = bin_of(centre - wo / 2.0).round().max(0.0) as usize;
        let hi = (bin_of(centre + wo / 2.0).round() as usize).min(SPECTRUM_512 - 1);
        let hi = hi.max(lo);
        let mut energy = 0.0f32;
        for bin in lo..=hi {
            let c = spectrum[bin];
            energy += c.re * c.re + c.im * c.im;
        }
        a[m - 1] = libm::sqrtf(energy);
    }
    a
}

/// Multi-Band Excitation voicing decision: for the first quarter of the
/// harmonics, fits the analysis window's own spectral shape to the actual
/// spectrum around each harmonic by least squares, and compares the
/// already-estimated harmonic energy against the residual of that fit.
/// Declares the frame voiced if the resulting SNR clears [`V_THRESH`], then
/// applies an energy-ratio override between the lower and upper halves of
/// the harmonic spread.
fn estimate_voicing_mbe(
    spectrum: &[Complex32; SPECTRUM_512],
    window_kernel: &[Complex32; SPECTRUM_512],
    wo: f32,
    l: usize,
    a: &[f32; MAX_AMP],
) -> bool {
    let test_harmonics = (l / 4).max(1);

    let mut signal = 0.0f32;
    let mut noise = 0.0f32;

    for m in 1..=test_harmonics {
        let centre = bin_of(m as f32 * wo).round() as i32;
        let lo = bin_of((m as f32 - 0.5) * wo).round().max(0.0) as usize;
        let hi = (bin_of((m as f32 + 0.5) * wo).round() as usize).min(SPECTRUM_512 - 1);
        let hi = hi.max(lo);

        signal += a[m - 1] * a[m - 1];

        // Least-squares complex coefficient fitting the window's own
        // spectral shape, placed at this harmonic's centre bin, to the
        // actual spectrum over the band.
        let mut num_re = 0.0f32;
        let mut num_im = 0.0f32;
        let mut den = 0.0f32;
        for bin in lo..=hi {
            let offset = (bin as i32 - centre).unsigned_abs() as usize;
            let h = window_kernel[offset.min(SPECTRUM_512 - 1)];
            let s = spectrum[bin];
            num_re += s.re * h.re + s.im * h.im;
            num_im += s.im * h.re - s.re * h.im;
            den += h.re * h.re + h.im * h.im;
        }
        let (am_re, am_im) = if den > 1e-9 { (num_re / den, num_im / den) } else { (0.0, 0.0) };

        for bin in lo..=hi {
            let offset = (bin as i32 - centre).unsigned_abs() as usize;
            let h = window_kernel[offset.min(SPECTRUM_512 - 1)];
            let s = spectrum[bin];
            let err_re = s.re - (am_re * h.re - am_im * h.im);
            let err_im = s.im - (am_re * h.im + am_im * h.re);
            noise += err_re * err_re + err_im * err_im;
        }
    }

    let mut voiced = if noise <= 1e-6 {
        signal > 0.0
    } else {
        let snr_db = 10.0 * libm::log10f(signal / noise);
        snr_db > V_THRESH
    };

    let half = (l / 2).max(1).min(l);
    let low_energy: f32 = a[..half].iter().map(|v| v * v).sum();
    let high_energy: f32 = a[half..l].iter().map(|v| v * v).sum();
    let er_db = if high_energy > 1e-9 {
        10.0 * libm::log10f(low_energy.max(1e-9) / high_energy)
    } else {
        f32::INFINITY
    };

    let before = voiced;
    if !voiced && er_db > 10.0 {
        voiced = true;
    } else if voiced && er_db < -10.0 {
        voiced = false;
    } else if voiced && er_db < -4.0 && wo <= SIXTY_WO {
        voiced = false;
    }

    if voiced != before {
        trace_log!("voicing: flipped {} -> {} (er_db={})", before, voiced, er_db);
    }

    voiced
}
