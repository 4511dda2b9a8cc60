//! Non-Linear Pitch (NLP) estimator.
//!
//! Square the input, run it through a one-pole DC notch, low-pass and
//! decimate by [`DEC`], window and zero-pad into a 512-point FFT, then pick
//! the strongest bin in the valid pitch range — checking lower-frequency
//! sub-multiples of that peak first, since NLP's classic failure mode is
//! locking onto an overtone of the true fundamental.

use microfft::Complex32;

use crate::config::{
    DEC, FFT_SIZE, M_PITCH, NLP_MIN_BIN, NLP_NOTCH_COEFF, NLP_NTAP, NLP_SUBMULT_THRESH, P_MIN,
    WO_MAX, WO_MIN,
};
use crate::fft::complex_forward_512;
use crate::logging::trace_log;
use crate::tables::{NLP_COSW, NLP_FIR};

const DECIMATED_LEN: usize = M_PITCH / DEC;

/// Streaming state for the pitch estimator: notch-filter memory, FIR history
/// carried across frame boundaries, and the previously accepted pitch bin
/// (damps octave jumps between superframes).
pub struct NlpState {
    mem_x: f32,
    mem_y: f32,
    fir_history: [f32; NLP_NTAP],
    prev_f0_bin: usize,
}

impl Default for NlpState {
    fn default() -> Self {
        Self { mem_x: 0.0, mem_y: 0.0, fir_history: [0.0; NLP_NTAP], prev_f0_bin: 0 }
    }
}

impl NlpState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Estimates `Wo`, the angular fundamental frequency, for one superframe
    /// of `M_PITCH` input samples.
    pub fn estimate(&mut self, samples: &[f32; M_PITCH]) -> f32 {
        let mut notched = [0.0f32; M_PITCH];
        for (i, &s) in samples.iter().enumerate() {
            let sq = s * s;
            let y = (sq - self.mem_x) + NLP_NOTCH_COEFF * self.mem_y;
            self.mem_x = sq;
            self.mem_y = y;
            notched[i] = y;
        }

        let mut filtered = [0.0f32; M_PITCH];
        for i in 0..M_PITCH {
            let mut acc = 0.0f32;
            for (tap, &coeff) in NLP_FIR.iter().enumerate() {
                let idx = i as isize - tap as isize;
                let sample = if idx >= 0 {
                    notched[idx as usize]
                } else {
                    let hist_idx = (self.fir_history.len() as isize + idx) as usize;
                    self.fir_history[hist_idx]
                };
                acc += coeff * sample;
            }
            filtered[i] = acc;
        }
        let tail_start = M_PITCH - NLP_NTAP;
        self.fir_history.copy_from_slice(&notched[tail_start..]);

        let mut windowed = [0.0f32; DECIMATED_LEN];
        for i in 0..DECIMATED_LEN {
            windowed[i] = filtered[i * DEC] * NLP_COSW[i];
        }

        let mut spectrum_in = [Complex32 { re: 0.0, im: 0.0 }; FFT_SIZE];
        for (i, &w) in windowed.iter().enumerate() {
            spectrum_in[i] = Complex32 { re: w, im: 0.0 };
        }
        let spectrum = complex_forward_512(&mut spectrum_in);

        let lo_bin = NLP_MIN_BIN.max(1);
        let hi_bin = (FFT_SIZE * DEC / P_MIN).min(FFT_SIZE / 2 - 1);

        let energy = |bin: usize| -> f32 {
            let c = spectrum[bin];
            c.re * c.re + c.im * c.im
        };

        let mut gmax_bin = lo_bin;
        let mut gmax = energy(lo_bin);
        for bin in lo_bin..=hi_bin {
            let e = energy(bin);
            if e > gmax {
                gmax = e;
                gmax_bin = bin;
            }
        }

        let best_bin = self.accept_best_submultiple(&energy, gmax_bin, gmax, lo_bin, hi_bin);
        self.prev_f0_bin = best_bin;

        let wo = core::f32::consts::TAU * best_bin as f32 / (FFT_SIZE * DEC) as f32;
        wo.clamp(WO_MIN, WO_MAX)
    }

    /// Walks sub-multiples `gmax_bin / m` for `m = 2, 3, ...` looking for a
    /// lower-frequency candidate that is still a clear local peak and
    /// strong enough relative to the global peak to be the true fundamental
    /// (NLP's classic failure mode is locking onto an overtone instead).
    fn accept_best_submultiple(
        &self,
        energy: &impl Fn(usize) -> f32,
        gmax_bin: usize,
        gmax: f32,
        lo_bin: usize,
        hi_bin: usize,
    ) -> usize {
        let mut best_bin = gmax_bin;
        let mut m = 2usize;
        while gmax_bin / m >= lo_bin {
            let b = gmax_bin / m;
            let lo_win = ((b as f32 * 0.8) as usize).max(lo_bin);
            let hi_win = ((b as f32 * 1.2) as usize).min(hi_bin);
            if lo_win >= hi_win {
                m += 1;
                continue;
            }

            let mut local_bin = lo_win;
            let mut local_max = energy(lo_win);
            for bin in lo_win..=hi_win {
                let e = energy(bin);
                if e > local_max {
                    local_max = e;
                    local_bin = bin;
                }
            }

            let mut thresh = NLP_SUBMULT_THRESH * gmax;
            if self.prev_f0_bin >= lo_win && self.prev_f0_bin <= hi_win {
                thresh *= 0.5;
            }

            let is_peak = local_bin > lo_bin
                && local_bin < hi_bin
                && local_max > energy(local_bin - 1)
                && local_max > energy(local_bin + 1);

            if local_max > thresh && is_peak {
                trace_log!("nlp: accepted sub-multiple m={} bin={} (gmax_bin={})", m, local_bin, gmax_bin);
                best_bin = local_bin;
            }

            m += 1;
        }
        best_bin
    }
}
