//! Derivative-free minimization used for model parameter estimation.

/// Standard Nelder-Mead coefficients: reflection, expansion, contraction,
/// shrinkage.
const ALPHA: f64 = 1.0;
const GAMMA: f64 = 2.0;
const RHO: f64 = 0.5;
const SIGMA: f64 = 0.5;

/// Configuration for the simplex search.
#[derive(Debug, Clone)]
pub struct SimplexOptions {
    /// Iteration cap.
    pub max_iterations: usize,
    /// Relative tolerance on the objective spread across the simplex.
    pub tolerance: f64,
    /// Initial simplex step size, relative to each coordinate.
    pub initial_step: f64,
}

impl Default for SimplexOptions {
    fn default() -> Self {
        Self {
            max_iterations: 2000,
            tolerance: 1e-8,
            initial_step: 0.05,
        }
    }
}

/// Outcome of a simplex search.
#[derive(Debug, Clone)]
pub struct SimplexOutcome {
    /// Best point found.
    pub point: Vec<f64>,
    /// Objective value at the best point.
    pub value: f64,
    /// Iterations performed.
    pub iterations: usize,
    /// Whether a convergence criterion was met before the iteration cap.
    pub converged: bool,
}

/// Minimize `objective` with the Nelder-Mead simplex method.
///
/// Convergence is declared when the relative objective spread across the
/// simplex falls below `tolerance`, or when the simplex itself collapses.
/// `bounds`, when given, clamp every candidate coordinate to `(min, max)`.
///
/// # Example
/// ```
/// use skyseries::utils::optimization::{minimize, SimplexOptions};
///
/// let outcome = minimize(
///     |x| (x[0] - 2.0).powi(2) + (x[1] - 3.0).powi(2),
///     &[0.0, 0.0],
///     None,
///     SimplexOptions::default(),
/// );
/// assert!(outcome.converged);
/// assert!((outcome.point[0] - 2.0).abs() < 0.01);
/// ```
pub fn minimize<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    options: SimplexOptions,
) -> SimplexOutcome
where
    F: Fn(&[f64]) -> f64,
{
    let n = initial.len();
    if n == 0 {
        return SimplexOutcome {
            point: vec![],
            value: f64::NAN,
            iterations: 0,
            converged: false,
        };
    }

    // Initial simplex: the starting point plus one perturbed vertex per axis.
    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
    simplex.push(clamp_to(initial.to_vec(), bounds));
    for i in 0..n {
        let mut vertex = initial.to_vec();
        let step = if initial[i].abs() > 1e-10 {
            options.initial_step * initial[i].abs()
        } else {
            options.initial_step
        };
        vertex[i] += step;
        simplex.push(clamp_to(vertex, bounds));
    }

    let mut values: Vec<f64> = simplex.iter().map(|v| objective(v)).collect();

    let mut iterations = 0;
    let mut converged = false;

    while iterations < options.max_iterations {
        iterations += 1;

        let mut order: Vec<usize> = (0..=n).collect();
        order.sort_by(|&a, &b| {
            values[a]
                .partial_cmp(&values[b])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let best = order[0];
        let worst = order[n];
        let second_worst = order[n - 1];

        // Relative spread of objective values across the simplex.
        let spread = values[worst] - values[best];
        if spread <= options.tolerance * (values[best].abs() + options.tolerance) {
            converged = true;
            break;
        }

        let centroid = centroid_excluding(&simplex, worst);

        // Collapsed simplex counts as converged as well.
        let max_dist = simplex
            .iter()
            .map(|v| distance(v, &centroid))
            .fold(0.0, f64::max);
        if max_dist < options.tolerance {
            converged = true;
            break;
        }

        let reflected = clamp_to(affine(&centroid, &simplex[worst], -ALPHA), bounds);
        let reflected_value = objective(&reflected);

        if reflected_value < values[second_worst] && reflected_value >= values[best] {
            simplex[worst] = reflected;
            values[worst] = reflected_value;
            continue;
        }

        if reflected_value < values[best] {
            let expanded = clamp_to(affine(&centroid, &reflected, GAMMA), bounds);
            let expanded_value = objective(&expanded);
            if expanded_value < reflected_value {
                simplex[worst] = expanded;
                values[worst] = expanded_value;
            } else {
                simplex[worst] = reflected;
                values[worst] = reflected_value;
            }
            continue;
        }

        if reflected_value < values[worst] {
            // Outside contraction.
            let contracted = clamp_to(affine(&centroid, &reflected, RHO), bounds);
            let contracted_value = objective(&contracted);
            if contracted_value <= reflected_value {
                simplex[worst] = contracted;
                values[worst] = contracted_value;
                continue;
            }
        } else {
            // Inside contraction.
            let contracted = clamp_to(affine(&centroid, &simplex[worst], RHO), bounds);
            let contracted_value = objective(&contracted);
            if contracted_value < values[worst] {
                simplex[worst] = contracted;
                values[worst] = contracted_value;
                continue;
            }
        }

        // Shrink everything toward the best vertex.
        let anchor = simplex[best].clone();
        for i in 0..=n {
            if i != best {
                for j in 0..n {
                    let shrunk = anchor[j] + SIGMA * (simplex[i][j] - anchor[j]);
                    simplex[i][j] = shrunk;
                }
                simplex[i] = clamp_to(simplex[i].clone(), bounds);
                values[i] = objective(&simplex[i]);
            }
        }
    }

    let best = values
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0);

    SimplexOutcome {
        point: simplex[best].clone(),
        value: values[best],
        iterations,
        converged,
    }
}

/// `origin + t * (target - origin)`; negative `t` reflects through `origin`.
fn affine(origin: &[f64], target: &[f64], t: f64) -> Vec<f64> {
    origin
        .iter()
        .zip(target.iter())
        .map(|(o, p)| o + t * (p - o))
        .collect()
}

fn centroid_excluding(simplex: &[Vec<f64>], exclude: usize) -> Vec<f64> {
    let n = simplex[0].len();
    let count = (simplex.len() - 1) as f64;
    let mut centroid = vec![0.0; n];
    for (i, vertex) in simplex.iter().enumerate() {
        if i != exclude {
            for j in 0..n {
                centroid[j] += vertex[j];
            }
        }
    }
    for c in &mut centroid {
        *c /= count;
    }
    centroid
}

fn clamp_to(mut point: Vec<f64>, bounds: Option<&[(f64, f64)]>) -> Vec<f64> {
    if let Some(b) = bounds {
        for (i, x) in point.iter_mut().enumerate() {
            if i < b.len() {
                *x = x.clamp(b[i].0, b[i].1);
            }
        }
    }
    point
}

fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn minimize_quadratic_2d() {
        let outcome = minimize(
            |x| (x[0] - 2.0).powi(2) + (x[1] - 3.0).powi(2),
            &[0.0, 0.0],
            None,
            SimplexOptions::default(),
        );

        assert!(outcome.converged);
        assert_relative_eq!(outcome.point[0], 2.0, epsilon = 1e-3);
        assert_relative_eq!(outcome.point[1], 3.0, epsilon = 1e-3);
    }

    #[test]
    fn minimize_rosenbrock() {
        let options = SimplexOptions {
            max_iterations: 5000,
            tolerance: 1e-12,
            ..Default::default()
        };
        let outcome = minimize(
            |x| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0].powi(2)).powi(2),
            &[0.0, 0.0],
            None,
            options,
        );

        assert_relative_eq!(outcome.point[0], 1.0, epsilon = 1e-2);
        assert_relative_eq!(outcome.point[1], 1.0, epsilon = 1e-2);
    }

    #[test]
    fn minimize_respects_bounds() {
        // Unconstrained optimum at 5, box ends at 3.
        let outcome = minimize(
            |x| (x[0] - 5.0).powi(2),
            &[1.0],
            Some(&[(0.0, 3.0)]),
            SimplexOptions::default(),
        );
        assert_relative_eq!(outcome.point[0], 3.0, epsilon = 1e-3);
    }

    #[test]
    fn minimize_empty_initial() {
        let outcome = minimize(|_| 0.0, &[], None, SimplexOptions::default());
        assert!(!outcome.converged);
        assert!(outcome.value.is_nan());
    }

    #[test]
    fn minimize_already_at_optimum() {
        let outcome = minimize(
            |x| (x[0] - 2.0).powi(2),
            &[2.0],
            None,
            SimplexOptions::default(),
        );
        assert!(outcome.converged);
        assert_relative_eq!(outcome.point[0], 2.0, epsilon = 1e-3);
    }

    #[test]
    fn minimize_reports_iteration_cap() {
        let options = SimplexOptions {
            max_iterations: 2,
            tolerance: 1e-16,
            ..Default::default()
        };
        let outcome = minimize(
            |x| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0].powi(2)).powi(2),
            &[-3.0, 7.0],
            None,
            options,
        );
        assert!(!outcome.converged);
        assert_eq!(outcome.iterations, 2);
    }
}
