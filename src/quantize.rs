//! Scalar energy/pitch quantisers and the two-stage amplitude VQ.
//!
//! The encode-side index assignment here follows a deliberate wire
//! convention: `index[0]` carries the stage-2 (refinement) codebook index,
//! `index[1]` the stage-1 (coarse) one. Encode and decode both follow this
//! same convention, so the round trip is self-consistent.

use crate::config::{AMP_K, ENERGY_LEVELS, WO_LEVELS, WO_MAX, WO_MIN};
use crate::logging::trace_log;
use crate::mbest::MbestList;
use crate::tables::{CODEBOOK1, CODEBOOK2, ENERGY_TABLE};

fn sq_error(a: &[f32; AMP_K], b: &[f32; AMP_K]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Two-stage vector-quantises a mean-removed rate-K amplitude vector.
/// Stage 1 keeps the `MBEST_ENTRIES` closest [`CODEBOOK1`] matches; each of
/// those residuals is then matched in full against [`CODEBOOK2`], and the
/// globally best (stage-1, stage-2) pair wins.
///
/// Returns `(index0, index1, quantized)` where `index0`/`index1` are
/// already in wire order (stage-2, stage-1) and `quantized` is
/// `CODEBOOK1[stage1] + CODEBOOK2[stage2]`.
pub fn vq_encode(mean_removed: &[f32; AMP_K]) -> (u16, u16, [f32; AMP_K]) {
    let mut stage1 = MbestList::new();
    for (j, entry) in CODEBOOK1.iter().enumerate() {
        let err = sq_error(mean_removed, entry);
        stage1.insert([j, 0, 0, 0], err);
    }

    let mut best_n1 = stage1.best().index[0];
    let mut best_n2 = 0usize;
    let mut best_err = f32::MAX;

    for cand in stage1.entries().iter() {
        if cand.error >= f32::MAX {
            continue;
        }
        let n1 = cand.index[0];
        let mut residual = [0.0f32; AMP_K];
        for k in 0..AMP_K {
            residual[k] = mean_removed[k] - CODEBOOK1[n1][k];
        }
        for (j, entry) in CODEBOOK2.iter().enumerate() {
            let err = sq_error(&residual, entry);
            if err < best_err {
                best_err = err;
                best_n1 = n1;
                best_n2 = j;
            }
        }
    }

    let mut quantized = [0.0f32; AMP_K];
    for k in 0..AMP_K {
        quantized[k] = CODEBOOK1[best_n1][k] + CODEBOOK2[best_n2][k];
    }

    trace_log!("vq: stage1={} stage2={} err={}", best_n1, best_n2, best_err);
    (best_n2 as u16, best_n1 as u16, quantized)
}

/// Reconstructs the rate-K dB vector from its two wire-order VQ indices.
pub fn vq_decode(index0: u16, index1: u16) -> [f32; AMP_K] {
    let n2 = index0 as usize;
    let n1 = index1 as usize;
    let mut out = [0.0f32; AMP_K];
    for k in 0..AMP_K {
        out[k] = CODEBOOK1[n1][k] + CODEBOOK2[n2][k];
    }
    out
}

/// Nearest-neighbour 4-bit energy quantiser.
pub fn encode_energy(mean_db: f32) -> u8 {
    let mut best = 0usize;
    let mut best_dist = f32::MAX;
    for (i, &level) in ENERGY_TABLE.iter().enumerate() {
        let d = (mean_db - level).abs();
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    (best as u8) & 0x0F
}

pub fn decode_energy(index: u8) -> f32 {
    ENERGY_TABLE[(index as usize) & (ENERGY_LEVELS - 1)]
}

/// Log-spaced 6-bit pitch quantiser. Code `0` is reserved for the unvoiced
/// case, so a voiced frame that would otherwise round to `0` is floored up
/// to `1` — voiced frames never emit the unvoiced pitch code.
pub fn encode_pitch(wo: f32) -> u8 {
    let log_min = libm::log10f(WO_MIN);
    let log_max = libm::log10f(WO_MAX);
    let diff = log_max - log_min;
    let raw = WO_LEVELS as f32 * (libm::log10f(wo) - log_min) / diff + 0.5;
    let level = (raw as i32).clamp(0, (WO_LEVELS - 1) as i32) as u8;
    let level = if level == 0 { 1 } else { level };
    level & 0x3F
}

/// Decodes a 6-bit pitch code against a pre-built [`crate::tables::scalar::build_pitch_table`]
/// lookup table. Code `0` means unvoiced.
pub fn decode_pitch(index: u8, pitch_table: &[f32; WO_LEVELS]) -> (f32, bool) {
    let index = (index as usize) & (WO_LEVELS - 1);
    if index == 0 {
        (crate::config::WO_UNVOICED, false)
    } else {
        (pitch_table[index], true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::build_pitch_table;

    #[test]
    fn vq_round_trip_recovers_a_codebook_entry_exactly() {
        let target = CODEBOOK1[3];
        let (i0, i1, quantized) = vq_encode(&target);
        // Stage 2 should contribute (close to) nothing when stage 1 already
        // landed on the exact entry; the decode path must agree bit for bit
        // with what was encoded.
        let decoded = vq_decode(i0, i1);
        assert_eq!(quantized, decoded);
        let err: f32 = (0..AMP_K).map(|k| (quantized[k] - target[k]).powi(2)).sum();
        assert!(err < 1e-3);
    }

    #[test]
    fn energy_quantiser_round_trips_within_one_level() {
        for &truth in &[-5.0f32, 0.0, 12.5, 30.0] {
            let code = encode_energy(truth);
            let decoded = decode_energy(code);
            let step = (ENERGY_TABLE[1] - ENERGY_TABLE[0]).abs();
            assert!((decoded - truth).abs() <= step);
        }
    }

    #[test]
    fn pitch_quantiser_never_emits_zero_for_voiced_input() {
        let wo = crate::config::WO_MAX * 0.999;
        let code = encode_pitch(wo);
        assert_ne!(code, 0);
    }

    #[test]
    fn pitch_round_trip_is_close() {
        let table = build_pitch_table();
        let wo = core::f32::consts::TAU * 150.0 / crate::config::FS as f32;
        let code = encode_pitch(wo);
        let (decoded_wo, voiced) = decode_pitch(code, &table);
        assert!(voiced);
        assert!((decoded_wo - wo).abs() / wo < 0.05);
    }

    #[test]
    fn zero_code_decodes_unvoiced() {
        let table = build_pitch_table();
        let (_, voiced) = decode_pitch(0, &table);
        assert!(!voiced);
    }
}
