//! Natural cubic spline fitting and evaluation.
//!
//! The fit solves the classic tridiagonal system for the second derivative
//! at every knot (natural boundary, zero curvature at both ends) and keeps
//! those moments alongside the knots. Evaluation picks the owning segment
//! and computes its cubic directly; outside the knot range the boundary
//! segment's cubic keeps going, so extrapolation uses the same basis as
//! interpolation.

/// A fitted natural cubic spline over strictly increasing knots.
///
/// Fitting is deterministic: the same knots always produce the same
/// coefficients, and evaluation is pure, so a fitted spline can be shared
/// across threads freely.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    second_derivs: Vec<f64>,
}

impl CubicSpline {
    /// Fit a natural cubic spline through the given knots.
    ///
    /// Returns `None` unless `xs` and `ys` have the same length of at least
    /// two, every value is finite, and `xs` is strictly increasing.
    #[must_use]
    pub fn fit(xs: &[f64], ys: &[f64]) -> Option<Self> {
        if xs.len() != ys.len() || xs.len() < 2 {
            return None;
        }
        if xs.windows(2).any(|pair| pair[1] <= pair[0]) {
            return None;
        }
        if xs.iter().chain(ys.iter()).any(|value| !value.is_finite()) {
            return None;
        }

        let n = xs.len();
        let mut second_derivs = vec![0.0; n];
        if n > 2 {
            let h: Vec<f64> = xs.windows(2).map(|pair| pair[1] - pair[0]).collect();
            let interior = n - 2;
            // Thomas sweep over the interior knots; the natural boundary
            // pins the first and last second derivative at zero.
            let mut upper = vec![0.0; interior];
            let mut rhs = vec![0.0; interior];
            for k in 0..interior {
                let i = k + 1;
                let sub = h[i - 1];
                let diag = 2.0 * (h[i - 1] + h[i]);
                let sup = h[i];
                let target =
                    6.0 * ((ys[i + 1] - ys[i]) / h[i] - (ys[i] - ys[i - 1]) / h[i - 1]);
                if k == 0 {
                    upper[k] = sup / diag;
                    rhs[k] = target / diag;
                } else {
                    let denom = diag - sub * upper[k - 1];
                    upper[k] = sup / denom;
                    rhs[k] = (target - sub * rhs[k - 1]) / denom;
                }
            }
            for k in (0..interior).rev() {
                second_derivs[k + 1] = rhs[k] - upper[k] * second_derivs[k + 2];
            }
        }

        Some(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            second_derivs,
        })
    }

    /// Evaluate the spline at `x`, extrapolating beyond the knot range.
    #[must_use]
    pub fn eval(&self, x: f64) -> f64 {
        let seg = self.segment_index(x);
        let (x0, x1) = (self.xs[seg], self.xs[seg + 1]);
        let (y0, y1) = (self.ys[seg], self.ys[seg + 1]);
        let (m0, m1) = (self.second_derivs[seg], self.second_derivs[seg + 1]);
        let h = x1 - x0;
        let t0 = x1 - x;
        let t1 = x - x0;
        (m0 * t0.powi(3) + m1 * t1.powi(3)) / (6.0 * h)
            + (y0 / h - m0 * h / 6.0) * t0
            + (y1 / h - m1 * h / 6.0) * t1
    }

    /// Inclusive range of the fitted knots.
    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }

    /// Number of knots the spline was fitted through.
    #[must_use]
    pub fn knot_count(&self) -> usize {
        self.xs.len()
    }

    /// The original knots as `(x, y)` pairs.
    pub fn knots(&self) -> impl Iterator<Item = (f64, f64)> {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }

    fn segment_index(&self, x: f64) -> usize {
        let upper = self.xs.len() - 2;
        self.xs
            .partition_point(|&knot| knot <= x)
            .saturating_sub(1)
            .min(upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    #[test]
    fn reproduces_knots_exactly() {
        let xs = [1.0, 2.0, 3.0, 5.0, 8.0];
        let ys = [0.0, 3.0, 1.0, 4.0, 2.0];
        let spline = CubicSpline::fit(&xs, &ys).expect("valid knots must fit");
        for (x, y) in xs.iter().zip(ys.iter()) {
            let got = spline.eval(*x);
            assert!(
                (got - y).abs() < TOL,
                "eval({x}) = {got}, expected {y}"
            );
        }
    }

    #[test]
    fn linear_data_stays_linear_even_outside_the_domain() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let ys: Vec<f64> = xs.iter().map(|x| 3.0 * x + 1.0).collect();
        let spline = CubicSpline::fit(&xs, &ys).expect("valid knots must fit");
        assert!((spline.eval(2.5) - 8.5).abs() < TOL);
        assert!((spline.eval(10.0) - 31.0).abs() < TOL, "extrapolation should continue the line");
        assert!((spline.eval(-2.0) + 5.0).abs() < TOL);
    }

    #[test]
    fn two_knots_degrade_to_a_line() {
        let spline = CubicSpline::fit(&[0.0, 10.0], &[5.0, 25.0]).expect("two knots fit");
        assert!((spline.eval(5.0) - 15.0).abs() < TOL);
        assert!((spline.eval(20.0) - 45.0).abs() < TOL);
    }

    #[test]
    fn refits_are_bitwise_identical() {
        let xs = [10.0, 50.0, 100.0, 500.0, 1000.0, 2000.0];
        let ys = [0.0, 20.0, 45.0, 250.0, 520.0, 1100.0];
        let first = CubicSpline::fit(&xs, &ys).expect("fit");
        let second = CubicSpline::fit(&xs, &ys).expect("fit");
        for x in [10.0, 77.5, 100.0, 1999.0, 4000.0] {
            assert!(
                first.eval(x).to_bits() == second.eval(x).to_bits(),
                "refit diverged at {x}"
            );
        }
    }

    #[test]
    fn rejects_unusable_knots() {
        assert!(CubicSpline::fit(&[1.0], &[1.0]).is_none());
        assert!(CubicSpline::fit(&[1.0, 2.0], &[1.0]).is_none());
        assert!(CubicSpline::fit(&[2.0, 1.0], &[0.0, 0.0]).is_none());
        assert!(CubicSpline::fit(&[1.0, 1.0], &[0.0, 0.0]).is_none());
        assert!(CubicSpline::fit(&[1.0, 2.0], &[0.0, f64::NAN]).is_none());
    }
}
