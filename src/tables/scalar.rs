//! Scalar quantiser tables and the rate-K frequency grid.

use crate::config::{AMP_K, ENERGY_LEVELS, WO_LEVELS, WO_MAX, WO_MIN};

/// Rate-K resampling grid, kHz, monotone within `[0, 4]`. Quadratically
/// warped so the fixed `AMP_K` points sit more densely at low frequency,
/// where most voiced speech energy lives.
pub const AMP_FREQS_KHZ: [f32; AMP_K] = {
    let mut freqs = [0.0f32; AMP_K];
    let mut k = 0;
    while k < AMP_K {
        let t = (k + 1) as f32 / AMP_K as f32;
        freqs[k] = 4.0 * t * t;
        k += 1;
    }
    freqs
};

/// Pre-emphasis curve added before, and removed after, the post-filter's
/// formant-enhancement gain step.
pub const AMP_PRE: [f32; AMP_K] = {
    let mut pre = [0.0f32; AMP_K];
    let mut k = 0;
    while k < AMP_K {
        let t = AMP_FREQS_KHZ[k] / 4.0;
        pre[k] = 6.0 * t;
        k += 1;
    }
    pre
};

/// 16-entry scalar energy (mean log-amplitude) quantiser table, dB.
pub const ENERGY_TABLE: [f32; ENERGY_LEVELS] = {
    const LO: f32 = -10.0;
    const HI: f32 = 45.0;
    let mut t = [0.0f32; ENERGY_LEVELS];
    let mut i = 0;
    while i < ENERGY_LEVELS {
        let frac = i as f32 / (ENERGY_LEVELS - 1) as f32;
        t[i] = LO + frac * (HI - LO);
        i += 1;
    }
    t
};

/// Builds the 64-entry pitch quantiser table: the `Wo` value each of the
/// `WO_LEVELS` pitch codes decodes to, i.e. the exact inverse of the
/// encoder's log-domain pitch quantiser. Needs `log10`/`powf`
/// which aren't `const fn`, so unlike the other tables this one is built
/// once at codec construction time rather than baked in as a `const`.
pub fn build_pitch_table() -> [f32; WO_LEVELS] {
    let log_min = libm::log10f(WO_MIN);
    let log_max = libm::log10f(WO_MAX);
    let mut table = [0.0f32; WO_LEVELS];
    for (i, slot) in table.iter_mut().enumerate() {
        let frac = i as f32 / (WO_LEVELS - 1) as f32;
        let log_wo = log_min + frac * (log_max - log_min);
        *slot = libm::powf(10.0, log_wo);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amp_freqs_are_monotone_and_bounded() {
        for w in AMP_FREQS_KHZ.windows(2) {
            assert!(w[1] > w[0]);
        }
        assert!(AMP_FREQS_KHZ[0] > 0.0);
        assert!(*AMP_FREQS_KHZ.last().unwrap() <= 4.0 + 1e-6);
    }

    #[test]
    fn energy_table_is_monotone() {
        for w in ENERGY_TABLE.windows(2) {
            assert!(w[1] > w[0]);
        }
    }

    #[test]
    fn pitch_table_brackets_wo_range() {
        let table = build_pitch_table();
        assert!((table[0] - WO_MIN).abs() < 1e-4);
        assert!((table[WO_LEVELS - 1] - WO_MAX).abs() < 1e-3);
        for w in table.windows(2) {
            assert!(w[1] > w[0]);
        }
    }
}
