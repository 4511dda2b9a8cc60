//! Core DSP for a 700 bit/s sinusoidal speech codec ("700C" mode): pitch
//! estimation, harmonic analysis, rate-K resampling, two-stage vector
//! quantisation, inter-frame interpolation, minimum-phase reconstruction,
//! and sinusoidal overlap-add synthesis.
//!
//! `no_std` by default and allocation-free throughout: every buffer is a
//! compile-time-bounded fixed array sized off the constants in
//! [`config`]. Enable `std` for `Display`/`Error` impls on [`CodecError`]
//! and for the `hound`-based WAV round-trip tests.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

pub mod analysis;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod fft;
pub mod interp;
pub mod interp_frame;
mod logging;
pub mod mbest;
pub mod phase;
pub mod pitch;
pub mod quantize;
pub mod rate_k;
pub mod synth;
pub mod tables;

pub use config::CodecConfig;
pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::CodecError;
