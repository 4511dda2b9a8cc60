//! Inter-frame interpolation of decoder parameters.
//!
//! Each superframe decodes one set of quantised parameters, but the decoder
//! needs a `Wo`/voicing/envelope value for every one of its `N_MODELS`
//! sub-frames, interpolated
//! between the previous superframe's final state and this superframe's
//! newly decoded state. `Wo`/voicing interpolation is case-split on the two
//! endpoints' voicing, not a blind blend — blending Wo across a
//! voiced/unvoiced boundary would produce a pitch glide through silence.

use crate::config::{AMP_K, N_MODELS, WO_UNVOICED};

/// Interpolation weight for sub-frame `i` (`0..N_MODELS`): `1.0` at the
/// previous frame, descending one `N_MODELS`th per sub-frame, never
/// reaching `0.0` since the next frame's own weight is applied by the
/// following call's `i = 0`.
pub fn weight_for_subframe(i: usize) -> f32 {
    debug_assert!(i < N_MODELS);
    1.0 - i as f32 / N_MODELS as f32
}

/// Interpolates `Wo` and voicing between the previous and next superframe's
/// endpoint models for sub-frame `i` (`0..N_MODELS`) at weight `c`
/// (`1.0` = previous, `0.0` = next).
///
/// - both voiced: voiced, `Wo` linearly blended.
/// - previous voiced only: the first half of the sub-frames stay voiced at
///   the previous `Wo` (a clean decay into silence rather than jumping
///   straight to idle), the second half go unvoiced.
/// - next voiced only: the first half of the sub-frames are unvoiced, the
///   second half pre-empt the next frame's `Wo` and go voiced.
/// - neither voiced: unvoiced, nominal `Wo`.
pub fn interp_wov(
    prev_wo: f32,
    prev_voiced: bool,
    next_wo: f32,
    next_voiced: bool,
    i: usize,
    c: f32,
) -> (f32, bool) {
    let half = N_MODELS / 2;
    match (prev_voiced, next_voiced) {
        (true, true) => (prev_wo * c + next_wo * (1.0 - c), true),
        (true, false) => {
            if i < half {
                (prev_wo, true)
            } else {
                (WO_UNVOICED, false)
            }
        }
        (false, true) => {
            if i < half {
                (WO_UNVOICED, false)
            } else {
                (next_wo, true)
            }
        }
        (false, false) => (WO_UNVOICED, false),
    }
}

/// Linearly blends two rate-K dB envelopes.
pub fn interp_amplitude_db(prev: &[f32; AMP_K], next: &[f32; AMP_K], c: f32, out: &mut [f32; AMP_K]) {
    for k in 0..AMP_K {
        out[k] = prev[k] * c + next[k] * (1.0 - c);
    }
}

/// Linearly blends two scalar energy values (dB).
pub fn interp_energy_db(prev: f32, next: f32, c: f32) -> f32 {
    prev * c + next * (1.0 - c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_voiced_blends_linearly() {
        let (wo, voiced) = interp_wov(1.0, true, 2.0, true, 0, 0.5);
        assert!(voiced);
        assert!((wo - 1.5).abs() < 1e-6);
    }

    #[test]
    fn previous_voiced_next_unvoiced_holds_previous_wo_for_first_half() {
        let (wo, voiced) = interp_wov(1.2, true, 0.3, false, 0, 1.0);
        assert!(voiced);
        assert!((wo - 1.2).abs() < 1e-6);

        let (wo, voiced) = interp_wov(1.2, true, 0.3, false, N_MODELS - 1, 0.25);
        assert!(!voiced);
        assert!((wo - WO_UNVOICED).abs() < 1e-6);
    }

    #[test]
    fn previous_unvoiced_next_voiced_holds_next_wo_for_second_half() {
        let (wo, voiced) = interp_wov(0.3, false, 1.8, true, 0, 1.0);
        assert!(!voiced);
        assert!((wo - WO_UNVOICED).abs() < 1e-6);

        let (wo, voiced) = interp_wov(0.3, false, 1.8, true, N_MODELS - 1, 0.25);
        assert!(voiced);
        assert!((wo - 1.8).abs() < 1e-6);
    }

    #[test]
    fn neither_voiced_uses_nominal_wo() {
        let (wo, voiced) = interp_wov(0.3, false, 1.8, false, 0, 0.5);
        assert!(!voiced);
        assert!((wo - WO_UNVOICED).abs() < 1e-6);
    }

    #[test]
    fn subframe_weights_descend_from_unity_without_reaching_zero() {
        let weights: Vec<f32> = (0..N_MODELS).map(weight_for_subframe).collect();
        for w in weights.windows(2) {
            assert!(w[1] < w[0]);
        }
        assert!((weights[0] - 1.0).abs() < 1e-6);
        assert!(*weights.last().unwrap() > 0.0);
    }
}
