//! Rate-K / rate-L resampling.
//!
//! The harmonic amplitude set has a variable length `L` that changes every
//! sub-frame with `Wo`; quantisation needs a fixed-size vector. The encoder
//! resamples the `L` harmonic amplitudes (in dB, by frequency) onto the
//! fixed `AMP_K`-point grid in [`AMP_FREQS_KHZ`]; the decoder resamples back
//! onto whatever `L` the interpolated `Wo` calls for. Both directions go
//! through the one shared [`interp_para`].

use core::f32::consts::TAU;

use crate::config::{AMP_K, FS, MAX_AMP};
use crate::interp::interp_para;
use crate::tables::AMP_FREQS_KHZ;

const DB_FLOOR_BELOW_PEAK: f32 = 50.0;

pub(crate) fn harmonic_khz(m: usize, wo: f32) -> f32 {
    m as f32 * wo * FS as f32 / (TAU * 1000.0)
}

/// Resamples `l` harmonic amplitudes (linear, at their own harmonic
/// frequencies) onto the fixed rate-K grid, in dB, clipped to
/// `[peak - 50, peak]` so a single outlier harmonic can't drag the whole
/// spectral envelope around.
pub fn resample_to_rate_k(a: &[f32; MAX_AMP], l: usize, wo: f32, out: &mut [f32; AMP_K]) {
    debug_assert!(l >= 1);

    let mut freqs_khz = [0.0f32; MAX_AMP];
    let mut db = [0.0f32; MAX_AMP];
    let mut peak = f32::MIN;
    for m in 1..=l {
        let mag = a[m - 1].max(1e-6);
        let level = 20.0 * libm::log10f(mag);
        freqs_khz[m - 1] = harmonic_khz(m, wo);
        db[m - 1] = level;
        if level > peak {
            peak = level;
        }
    }
    let floor = peak - DB_FLOOR_BELOW_PEAK;
    for v in db[..l].iter_mut() {
        *v = v.max(floor);
    }

    interp_para(&freqs_khz[..l], &db[..l], &AMP_FREQS_KHZ, out);
}

/// Resamples the fixed rate-K dB envelope back onto `l` harmonic
/// amplitudes (linear) for the sub-frame's interpolated `Wo`. Both ends of
/// the control-point set are pinned to 0 dB (DC and just past the last
/// rate-K point, `4 kHz`) so harmonics outside the quantised band roll off
/// to silence instead of extrapolating the envelope's edge value outward.
pub fn resample_to_rate_l(rate_k_db: &[f32; AMP_K], l: usize, wo: f32, out: &mut [f32; MAX_AMP]) {
    debug_assert!(l >= 1);

    let mut freqs_khz = [0.0f32; AMP_K + 2];
    let mut db = [0.0f32; AMP_K + 2];
    freqs_khz[0] = 0.0;
    db[0] = 0.0;
    freqs_khz[1..=AMP_K].copy_from_slice(&AMP_FREQS_KHZ);
    db[1..=AMP_K].copy_from_slice(rate_k_db);
    freqs_khz[AMP_K + 1] = 4.0;
    db[AMP_K + 1] = 0.0;

    let mut query = [0.0f32; MAX_AMP];
    let mut result = [0.0f32; MAX_AMP];
    for m in 1..=l {
        query[m - 1] = harmonic_khz(m, wo);
    }
    interp_para(&freqs_khz, &db, &query[..l], &mut result[..l]);

    for m in 1..=l {
        out[m - 1] = libm::powf(10.0, result[m - 1] / 20.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_preserves_rough_spectral_shape() {
        let wo = TAU * 150.0 / FS as f32;
        let l = (core::f32::consts::PI / wo) as usize;
        let mut a = [0.0f32; MAX_AMP];
        for m in 1..=l {
            // A gently sloping harmonic series, like a voiced vowel.
            a[m - 1] = 1000.0 / m as f32;
        }

        let mut rate_k = [0.0f32; AMP_K];
        resample_to_rate_k(&a, l, wo, &mut rate_k);

        let mut back = [0.0f32; MAX_AMP];
        resample_to_rate_l(&rate_k, l, wo, &mut back);

        // First harmonic should survive roughly intact; far harmonics are
        // lossy by construction but should stay in the same ballpark.
        assert!((back[0] - a[0]).abs() / a[0] < 0.5);
        for m in 0..l {
            assert!(back[m] > 0.0);
        }
    }

    #[test]
    fn handles_a_single_harmonic() {
        let wo = crate::config::WO_MAX;
        let mut a = [0.0f32; MAX_AMP];
        a[0] = 500.0;
        let mut rate_k = [0.0f32; AMP_K];
        resample_to_rate_k(&a, 1, wo, &mut rate_k);
        assert!(rate_k.iter().all(|v| v.is_finite()));

        let mut back = [0.0f32; MAX_AMP];
        resample_to_rate_l(&rate_k, 1, wo, &mut back);
        assert!(back[0] > 0.0);
    }
}
