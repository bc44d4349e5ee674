//! Inverse roots of the AR and MA operators.

use std::ops::{Add, Div, Mul, Sub};

const MAX_ITERATIONS: usize = 500;
const ROOT_TOLERANCE: f64 = 1e-12;

/// Inverse roots closer than this are treated as a common factor.
pub const CANCELLATION_DISTANCE: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const ONE: Complex = Complex { re: 1.0, im: 0.0 };

    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    pub fn abs(&self) -> f64 {
        self.re.hypot(self.im)
    }
}

impl Add for Complex {
    type Output = Complex;
    fn add(self, rhs: Complex) -> Complex {
        Complex::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for Complex {
    type Output = Complex;
    fn sub(self, rhs: Complex) -> Complex {
        Complex::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Mul for Complex {
    type Output = Complex;
    fn mul(self, rhs: Complex) -> Complex {
        Complex::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

impl Div for Complex {
    type Output = Complex;
    fn div(self, rhs: Complex) -> Complex {
        let denom = rhs.re * rhs.re + rhs.im * rhs.im;
        Complex::new(
            (self.re * rhs.re + self.im * rhs.im) / denom,
            (self.im * rhs.re - self.re * rhs.im) / denom,
        )
    }
}

/// Roots of `z^n + c_1 z^{n-1} + … + c_n` (Durand–Kerner).
pub fn monic_roots(coeffs: &[f64]) -> Vec<Complex> {
    let n = coeffs.len();
    let eval = |z: Complex| {
        coeffs
            .iter()
            .fold(Complex::ONE, |acc, &c| acc * z + Complex::new(c, 0.0))
    };

    let seed = Complex::new(0.4, 0.9);
    let mut roots = Vec::with_capacity(n);
    let mut power = Complex::ONE;
    for _ in 0..n {
        power = power * seed;
        roots.push(power);
    }

    for _ in 0..MAX_ITERATIONS {
        let mut largest_step = 0.0_f64;
        for i in 0..n {
            let denom = (0..n)
                .filter(|&j| j != i)
                .fold(Complex::ONE, |acc, j| acc * (roots[i] - roots[j]));
            if denom.abs() == 0.0 {
                continue;
            }
            let step = eval(roots[i]) / denom;
            roots[i] = roots[i] - step;
            largest_step = largest_step.max(step.abs());
        }
        if largest_step < ROOT_TOLERANCE {
            break;
        }
    }
    roots
}

/// Inverse roots of `1 - Σ φ_j B^j`.
pub fn ar_inverse_roots(ar: &[f64]) -> Vec<Complex> {
    let negated: Vec<f64> = ar.iter().map(|phi| -phi).collect();
    monic_roots(&negated)
}

/// Inverse roots of `1 + Σ θ_j B^j`.
pub fn ma_inverse_roots(ma: &[f64]) -> Vec<Complex> {
    monic_roots(ma)
}

/// Whether an AR and an MA factor nearly cancel, leaving a redundant order.
pub fn has_near_common_factor(ar: &[f64], ma: &[f64]) -> bool {
    if ar.is_empty() || ma.is_empty() {
        return false;
    }
    let ma_roots = ma_inverse_roots(ma);
    ar_inverse_roots(ar).iter().any(|a| {
        ma_roots
            .iter()
            .any(|b| (*a - *b).abs() < CANCELLATION_DISTANCE)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sorted_real_parts(roots: &[Complex]) -> Vec<f64> {
        let mut re: Vec<f64> = roots.iter().map(|r| r.re).collect();
        re.sort_by(|a, b| a.total_cmp(b));
        re
    }

    #[test]
    fn test_real_roots() {
        // (z - 0.5)(z + 0.2) = z^2 - 0.3 z - 0.1
        let roots = monic_roots(&[-0.3, -0.1]);
        let re = sorted_real_parts(&roots);
        assert_abs_diff_eq!(re[0], -0.2, epsilon = 1e-9);
        assert_abs_diff_eq!(re[1], 0.5, epsilon = 1e-9);
        assert!(roots.iter().all(|r| r.im.abs() < 1e-9));
    }

    #[test]
    fn test_complex_pair() {
        // z^2 + 0.25 has roots ±0.5i
        let roots = monic_roots(&[0.0, 0.25]);
        assert!(roots.iter().all(|r| r.re.abs() < 1e-9));
        assert!(roots.iter().all(|r| (r.abs() - 0.5).abs() < 1e-9));
    }

    #[test]
    fn test_inverse_root_conventions() {
        // 1 - 0.6B has inverse root 0.6, 1 + 0.6B has inverse root -0.6
        assert_abs_diff_eq!(ar_inverse_roots(&[0.6])[0].re, 0.6, epsilon = 1e-9);
        assert_abs_diff_eq!(ma_inverse_roots(&[0.6])[0].re, -0.6, epsilon = 1e-9);
    }

    #[test]
    fn test_near_common_factor() {
        // (1 - 0.7B) against (1 - 0.65B)
        assert!(has_near_common_factor(&[0.7], &[-0.65]));
        assert!(!has_near_common_factor(&[0.7], &[0.4]));
        assert!(!has_near_common_factor(&[0.7], &[]));
        // (1 - 0.5B)(1 + 0.3B) against (1 - 0.45B)
        assert!(has_near_common_factor(&[0.2, 0.15], &[-0.45]));
    }
}
