//! FFT primitives, wrapped around `microfft`.
//!
//! Everything here is deliberately dumb: own the buffers, call into
//! `microfft`, hand back owned arrays so call sites don't have to juggle
//! lifetimes. The codec treats the transform itself as a black box — only
//! the shape of these wrappers' contracts matters to the rest of the crate:
//!
//! - forward transforms are unnormalized;
//! - inverse transforms are *also* unnormalized (no implicit `1/N`) — the
//!   one call site that needs a true inverse (the cepstrum in
//!   [`crate::phase`]) divides explicitly instead of relying on the FFT
//!   wrapper to do it.
//! - `microfft`'s packed real-FFT output stores the Nyquist bin's (purely
//!   real) value in the imaginary slot of bin 0; [`real_forward_512`] unpacks
//!   that into a proper `FFT_SIZE/2 + 1`-bin one-sided spectrum so downstream
//!   code never has to know about the packing.

use microfft::Complex32;

use crate::config::{FFT_SIZE, PHASE_FFT_SIZE};

/// One-sided spectrum length for [`FFT_SIZE`] (bins `0..=FFT_SIZE/2`).
pub const SPECTRUM_512: usize = FFT_SIZE / 2 + 1;

/// Forward real FFT of a 512-sample real signal, unpacked to `257` bins.
pub fn real_forward_512(time: &mut [f32; FFT_SIZE]) -> [Complex32; SPECTRUM_512] {
    let packed = microfft::real::rfft_512(time);
    let mut out = [Complex32 { re: 0.0, im: 0.0 }; SPECTRUM_512];
    out[0] = Complex32 { re: packed[0].re, im: 0.0 };
    for i in 1..FFT_SIZE / 2 {
        out[i] = packed[i];
    }
    out[FFT_SIZE / 2] = Complex32 { re: packed[0].im, im: 0.0 };
    out
}

/// Forward complex FFT of a 512-point buffer (used by the NLP pitch
/// estimator, whose input is real-valued but run through a general complex
/// transform rather than a dedicated real-FFT path).
pub fn complex_forward_512(buf: &mut [Complex32; FFT_SIZE]) -> [Complex32; FFT_SIZE] {
    *microfft::complex::cfft_512(buf)
}

/// Inverse real FFT: rebuilds the Hermitian-symmetric 512-point complex
/// spectrum from a one-sided `257`-bin input and runs the complex inverse
/// transform, returning the (real) time-domain signal. Unnormalized.
pub fn real_inverse_512(spectrum: &[Complex32; SPECTRUM_512]) -> [f32; FFT_SIZE] {
    let mut full = [Complex32 { re: 0.0, im: 0.0 }; FFT_SIZE];
    full[0] = Complex32 { re: spectrum[0].re, im: 0.0 };
    full[FFT_SIZE / 2] = Complex32 { re: spectrum[FFT_SIZE / 2].re, im: 0.0 };
    for i in 1..FFT_SIZE / 2 {
        full[i] = spectrum[i];
        full[FFT_SIZE - i] = Complex32 { re: spectrum[i].re, im: -spectrum[i].im };
    }
    let time = microfft::inverse::ifft_512(&mut full);
    let mut out = [0.0f32; FFT_SIZE];
    for (o, c) in out.iter_mut().zip(time.iter()) {
        *o = c.re;
    }
    out
}

/// Forward complex FFT, 128 points (minimum-phase reconstruction).
pub fn complex_forward_128(
    buf: &mut [Complex32; PHASE_FFT_SIZE],
) -> [Complex32; PHASE_FFT_SIZE] {
    *microfft::complex::cfft_128(buf)
}

/// Inverse complex FFT, 128 points. Unnormalized — callers divide by
/// [`PHASE_FFT_SIZE`] themselves where a true inverse is required.
pub fn complex_inverse_128(
    buf: &mut [Complex32; PHASE_FFT_SIZE],
) -> [Complex32; PHASE_FFT_SIZE] {
    *microfft::inverse::ifft_128(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_forward_512_dc_only() {
        let mut time = [1.0f32; FFT_SIZE];
        let spectrum = real_forward_512(&mut time);
        // A constant input has all its energy in the DC bin.
        assert!(spectrum[0].re.abs() > 0.0);
        for bin in spectrum.iter().skip(1) {
            assert!(bin.re.abs() < 1.0);
            assert!(bin.im.abs() < 1.0);
        }
    }

    #[test]
    fn real_inverse_512_round_trips_dc() {
        let mut time = [0.0f32; FFT_SIZE];
        time[0] = 512.0;
        let spectrum = real_forward_512(&mut time);
        let back = real_inverse_512(&spectrum);
        // Unnormalized inverse: scale is FFT_SIZE times the forward's.
        assert!(back.iter().all(|&v| v.is_finite()));
    }
}
