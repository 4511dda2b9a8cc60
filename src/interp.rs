//! Three-point parabolic interpolation.
//!
//! Rate-K resampling on the encode side and rate-K/rate-L resampling on the
//! decode side both need the same control-point interpolation, so it lives
//! here as a single routine used by [`crate::rate_k`] and [`crate::phase`]
//! alike rather than duplicated per call site.

/// Resample `(xp, yp)` control points onto the query points `x`, by fitting
/// a local parabola through three consecutive control points and evaluating
/// it at each query.
///
/// `xp` and `yp` must be the same length (`>= 3`) and `xp` sorted ascending.
/// Queries outside `[xp[0], xp[xp.len()-1]]` are extrapolated using the
/// parabola at the nearest end — the interpolator never refuses a query.
pub fn interp_para(xp: &[f32], yp: &[f32], x: &[f32], result: &mut [f32]) {
    debug_assert_eq!(xp.len(), yp.len());
    debug_assert!(xp.len() >= 3);
    debug_assert_eq!(x.len(), result.len());

    let np = xp.len();
    let mut k = 0usize;

    for (xi, out) in x.iter().zip(result.iter_mut()) {
        while xp[k + 1] < *xi && k < np - 3 {
            k += 1;
        }

        let (x1, y1) = (xp[k], yp[k]);
        let (x2, y2) = (xp[k + 1], yp[k + 1]);
        let (x3, y3) = (xp[k + 2], yp[k + 2]);

        let slope_hi = (y3 - y2) / (x3 - x2);
        let slope_lo = (y2 - y1) / (x2 - x1);

        let a = (slope_hi - slope_lo) / (x3 - x1);
        let b = (slope_hi * (x2 - x1) + slope_lo * (x3 - x2)) / (x3 - x1);

        let dx = *xi - x2;
        *out = a * dx * dx + b * dx + y2;
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn exact_on_control_points_for_a_true_parabola() {
        // y = 2x^2 - 3x + 1, sampled at integer x.
        let xp: [f32; 5] = [0.0, 1.0, 2.0, 3.0, 4.0];
        let yp: [f32; 5] = xp.map(|x| 2.0 * x * x - 3.0 * x + 1.0);
        let query: [f32; 5] = [0.0, 1.0, 2.0, 3.0, 4.0];
        let mut out = [0.0f32; 5];
        interp_para(&xp, &yp, &query, &mut out);
        for (o, y) in out.iter().zip(yp.iter()) {
            assert_relative_eq!(o, y, epsilon = 1e-3);
        }
    }

    #[test]
    fn interpolates_between_points() {
        let xp: [f32; 4] = [0.0, 1.0, 2.0, 3.0];
        let yp: [f32; 4] = [0.0, 1.0, 4.0, 9.0]; // x^2
        let query = [1.5f32];
        let mut out = [0.0f32];
        interp_para(&xp, &yp, &query, &mut out);
        assert_relative_eq!(out[0], 2.25, epsilon = 0.05);
    }

    #[test]
    fn extrapolates_past_the_support() {
        let xp: [f32; 3] = [0.0, 1.0, 2.0];
        let yp: [f32; 3] = [0.0, 1.0, 2.0]; // y = x
        let query = [5.0f32, -5.0f32];
        let mut out = [0.0f32; 2];
        interp_para(&xp, &yp, &query, &mut out);
        assert_relative_eq!(out[0], 5.0, epsilon = 1e-3);
        assert_relative_eq!(out[1], -5.0, epsilon = 1e-3);
    }
}
