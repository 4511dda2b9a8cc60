//! Window functions used by the pitch estimator and harmonic analyser.
//!
//! All three are generated at compile time rather than delivered as opaque
//! fixed data; what matters is that encoder and decoder (or, for the
//! analysis window, the one consumer) see byte-identical values, which a
//! `const` array guarantees trivially.

use crate::config::{M_PITCH, N_SAMP, NW};
use crate::tables::const_math::{cos_2pi, fabs};

const fn hamming_coef(n: usize, size: usize) -> f32 {
    if size <= 1 {
        return 1.0;
    }
    let normalized = n as f32 / (size - 1) as f32;
    0.54 - 0.46 * cos_2pi(normalized)
}

/// 279-tap Hamming window, zero-padded into a 320-sample buffer centered on
/// the pitch-analysis window: the centre-symmetric product of this window
/// with the sample history.
pub const HAMMING2: [f32; M_PITCH] = {
    let mut w = [0.0f32; M_PITCH];
    let offset = M_PITCH / 2 - NW / 2;
    let mut i = 0;
    while i < NW {
        w[offset + i] = hamming_coef(i, NW);
        i += 1;
    }
    w
};

const fn parzen_coef(n: usize, size: usize) -> f32 {
    // u in [-1, 1], centered on the window.
    let half = (size - 1) as f32 / 2.0;
    let u = (n as f32 - half) / (size as f32 / 2.0);
    let au = fabs(u);
    if au <= 0.5 {
        1.0 - 6.0 * au * au * (1.0 - au)
    } else {
        2.0 * (1.0 - au) * (1.0 - au) * (1.0 - au)
    }
}

/// Parzen (triangular-squared) overlap-add window, length `2 * N_SAMP`.
pub const PARZEN: [f32; 2 * N_SAMP] = {
    let mut w = [0.0f32; 2 * N_SAMP];
    let mut i = 0;
    while i < 2 * N_SAMP {
        w[i] = parzen_coef(i, 2 * N_SAMP);
        i += 1;
    }
    w
};

const fn nlp_cosw_coef(n: usize, size: usize) -> f32 {
    if size <= 1 {
        return 1.0;
    }
    let normalized = n as f32 / (size - 1) as f32;
    0.5 - 0.5 * cos_2pi(normalized)
}

/// Raised-cosine window applied to the decimated NLP pitch-detection signal
/// before zero-padding and the FFT.
pub const NLP_COSW: [f32; crate::config::M_PITCH / crate::config::DEC] = {
    const SIZE: usize = M_PITCH / crate::config::DEC;
    let mut w = [0.0f32; SIZE];
    let mut i = 0;
    while i < SIZE {
        w[i] = nlp_cosw_coef(i, SIZE);
        i += 1;
    }
    w
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hamming2_is_zero_outside_its_support() {
        assert_eq!(HAMMING2[0], 0.0);
        assert_eq!(HAMMING2[M_PITCH - 1], 0.0);
    }

    #[test]
    fn hamming2_peaks_near_one_at_centre() {
        let centre = M_PITCH / 2;
        assert!(HAMMING2[centre] > 0.9);
    }

    #[test]
    fn parzen_is_zero_at_both_ends_and_peaks_in_the_middle() {
        assert!(PARZEN[0] < 0.05);
        assert!(PARZEN[PARZEN.len() - 1] < 0.05);
        let mid = PARZEN.len() / 2;
        assert!(PARZEN[mid] > PARZEN[0]);
        assert!(PARZEN[mid] > 0.5);
    }

    #[test]
    fn nlp_cosw_is_symmetric_taper() {
        assert!(NLP_COSW[0] < 0.1);
        let mid = NLP_COSW.len() / 2;
        assert!(NLP_COSW[mid] > NLP_COSW[0]);
    }
}
