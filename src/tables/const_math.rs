//! Compile-time-evaluable helpers for generating the window tables.
//!
//! `cos`/`sin` are not `const fn` in stable Rust, so window generation uses
//! a Chebyshev polynomial approximation of `cos(2*pi*t)` for `t` in
//! `[0, 1]` instead, which is exactly the domain every window formula
//! below needs.

/// `cos(2*pi*normalized)` for `normalized` in `[0, 1]`, via a degree-6
/// Chebyshev approximation, generalized to be reusable across window
/// shapes beyond just a Hann window.
pub const fn cos_2pi(normalized: f32) -> f32 {
    let x = 2.0 * normalized - 1.0; // map [0,1] -> [-1,1]
    let x2 = x * x;
    let x4 = x2 * x2;
    let x6 = x4 * x2;
    // Approximates cos(pi*(x+1)) == cos(2*pi*normalized).
    -(1.0 - 2.0 * x2 + (2.0 / 3.0) * x4 - (4.0 / 45.0) * x6)
}

/// `sin(2*pi*normalized)`, derived from [`cos_2pi`] via a quarter-turn
/// phase shift (`sin(t) = cos(t - pi/2)`), wrapped back into `[0, 1]`.
pub const fn sin_2pi(normalized: f32) -> f32 {
    let mut shifted = normalized - 0.25;
    if shifted < 0.0 {
        shifted += 1.0;
    }
    cos_2pi(shifted)
}

/// Branchless-in-spirit `abs` usable in `const fn` without relying on the
/// `f32::abs` intrinsic being const-stable.
pub const fn fabs(x: f32) -> f32 {
    if x < 0.0 { -x } else { x }
}
