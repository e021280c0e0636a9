#[inline]
pub fn fmod(x: f64, y: f64) -> f64 {
    libm::fmod(x, y)
}

/// Evaluates a polynomial with coefficients in ascending powers of `x`
/// (Horner form). An empty coefficient slice evaluates to zero.
#[inline]
pub fn polynomial(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

/// Evaluates the first derivative of the same ascending-power polynomial.
#[inline]
pub fn polynomial_derivative(coeffs: &[f64], x: f64) -> f64 {
    if coeffs.len() < 2 {
        return 0.0;
    }
    coeffs
        .iter()
        .enumerate()
        .skip(1)
        .rev()
        .fold(0.0, |acc, (i, &c)| acc * x + i as f64 * c)
}

#[inline]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polynomial_constant() {
        assert_eq!(polynomial(&[5.145], 123.4), 5.145);
    }

    #[test]
    fn polynomial_ascending_powers() {
        // 1 + 2x + 3x^2 at x = 2 -> 1 + 4 + 12
        assert_eq!(polynomial(&[1.0, 2.0, 3.0], 2.0), 17.0);
    }

    #[test]
    fn polynomial_empty_is_zero() {
        assert_eq!(polynomial(&[], 1.0), 0.0);
    }

    #[test]
    fn derivative_of_constant_is_zero() {
        assert_eq!(polynomial_derivative(&[5.145], 0.3), 0.0);
    }

    #[test]
    fn derivative_ascending_powers() {
        // d/dx (1 + 2x + 3x^2) = 2 + 6x at x = 2 -> 14
        assert_eq!(polynomial_derivative(&[1.0, 2.0, 3.0], 2.0), 14.0);
    }

    #[test]
    fn dot_product() {
        assert_eq!(dot(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]), 32.0);
    }
}
