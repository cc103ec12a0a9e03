//! Root-location checks for fitted AR and MA polynomials.
//!
//! A fitted model is only usable for forecasting when its characteristic
//! polynomials have all roots strictly outside the unit circle. The check
//! uses the Levinson step-down recursion: the polynomial
//! `1 - a_1 z - ... - a_p z^p` has all roots outside the unit circle if
//! and only if every reflection coefficient obtained by stepping the
//! order down lies strictly inside (-1, 1). No eigensolver needed.

/// Margin treating a reflection coefficient as on the unit circle.
const BOUNDARY_MARGIN: f64 = 1e-10;

/// Whether all roots of `1 - a_1 z - ... - a_p z^p` lie strictly outside
/// the unit circle. An empty coefficient slice is trivially stable.
fn roots_outside_unit_circle(coefficients: &[f64]) -> bool {
    let mut a = coefficients.to_vec();
    while let Some(&reflection) = a.last() {
        if reflection.abs() >= 1.0 - BOUNDARY_MARGIN {
            return false;
        }
        let m = a.len() - 1;
        if m == 0 {
            break;
        }
        let denom = 1.0 - reflection * reflection;
        let stepped: Vec<f64> = (0..m)
            .map(|j| (a[j] + reflection * a[m - 1 - j]) / denom)
            .collect();
        a = stepped;
    }
    true
}

/// Whether AR coefficients `phi` define a stationary autoregression.
pub fn is_stationary(phi: &[f64]) -> bool {
    roots_outside_unit_circle(phi)
}

/// Whether MA coefficients `theta` define an invertible moving average.
///
/// The MA polynomial is `1 + theta_1 z + ... + theta_q z^q`; negating the
/// coefficients maps it onto the AR sign convention.
pub fn is_invertible(theta: &[f64]) -> bool {
    let negated: Vec<f64> = theta.iter().map(|t| -t).collect();
    roots_outside_unit_circle(&negated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_polynomials_are_stable() {
        assert!(is_stationary(&[]));
        assert!(is_invertible(&[]));
    }

    #[test]
    fn ar1_stationarity_boundary() {
        assert!(is_stationary(&[0.7]));
        assert!(is_stationary(&[-0.95]));
        assert!(!is_stationary(&[1.0]));
        assert!(!is_stationary(&[-1.0]));
        assert!(!is_stationary(&[1.3]));
    }

    #[test]
    fn ar2_stationarity_region() {
        // Inside the triangular region.
        assert!(is_stationary(&[0.5, 0.3]));
        assert!(is_stationary(&[1.2, -0.4]));
        // phi_1 + phi_2 >= 1 violates it.
        assert!(!is_stationary(&[0.7, 0.5]));
        // |phi_2| >= 1 violates it.
        assert!(!is_stationary(&[0.0, 1.1]));
    }

    #[test]
    fn ma1_invertibility_boundary() {
        assert!(is_invertible(&[0.6]));
        assert!(is_invertible(&[-0.6]));
        assert!(!is_invertible(&[1.0]));
        assert!(!is_invertible(&[-1.2]));
    }

    #[test]
    fn ma2_invertibility_region() {
        assert!(is_invertible(&[0.4, 0.2]));
        // theta(z) = 1 + 0.5 z - 0.6 z^2 has a root at about -0.94.
        assert!(!is_invertible(&[0.5, -0.6]));
    }
}
