//! Derivative-free minimization (Nelder–Mead simplex).

/// Stopping rules for [`nelder_mead`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NelderMeadOptions {
    /// Iteration cap
    pub max_iterations: usize,
    /// Relative spread of objective values at which to stop
    pub f_tolerance: f64,
    /// Simplex diameter, relative to the best point, at which to stop
    pub x_tolerance: f64,
}

impl Default for NelderMeadOptions {
    fn default() -> Self {
        Self {
            max_iterations: 5000,
            f_tolerance: 1e-10,
            x_tolerance: 1e-7,
        }
    }
}

/// Outcome of a minimization run.
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    pub x: Vec<f64>,
    pub value: f64,
    pub iterations: usize,
    pub converged: bool,
}

const REFLECT: f64 = 1.0;
const EXPAND: f64 = 2.0;
const CONTRACT: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// Minimize `f` starting from `x0` with per-coordinate initial `steps`.
///
/// Infeasible points may return `f64::INFINITY`; the simplex moves away from them.
pub fn nelder_mead<F>(f: F, x0: &[f64], steps: &[f64], options: &NelderMeadOptions) -> Minimum
where
    F: Fn(&[f64]) -> f64,
{
    let n = x0.len();
    if n == 0 {
        let value = f(x0);
        return Minimum {
            x: Vec::new(),
            value,
            iterations: 0,
            converged: value.is_finite(),
        };
    }

    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
    simplex.push(x0.to_vec());
    for i in 0..n {
        let mut vertex = x0.to_vec();
        vertex[i] += steps.get(i).copied().unwrap_or(0.1);
        simplex.push(vertex);
    }
    let mut values: Vec<f64> = simplex.iter().map(|v| f(v)).collect();

    let mut iterations = 0;
    let mut converged = false;

    while iterations < options.max_iterations {
        // Order vertices best to worst
        let mut order: Vec<usize> = (0..=n).collect();
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
        simplex = order.iter().map(|&i| simplex[i].clone()).collect();
        values = order.iter().map(|&i| values[i]).collect();

        if has_converged(&simplex, &values, options) {
            converged = true;
            break;
        }
        iterations += 1;

        let centroid: Vec<f64> = (0..n)
            .map(|j| simplex[..n].iter().map(|v| v[j]).sum::<f64>() / n as f64)
            .collect();
        let worst = &simplex[n];
        let towards = |coef: f64| -> Vec<f64> {
            centroid
                .iter()
                .zip(worst)
                .map(|(c, w)| c + coef * (c - w))
                .collect()
        };

        let reflected = towards(REFLECT);
        let f_reflected = f(&reflected);

        if f_reflected < values[0] {
            let expanded = towards(EXPAND);
            let f_expanded = f(&expanded);
            if f_expanded < f_reflected {
                simplex[n] = expanded;
                values[n] = f_expanded;
            } else {
                simplex[n] = reflected;
                values[n] = f_reflected;
            }
            continue;
        }

        if f_reflected < values[n - 1] {
            simplex[n] = reflected;
            values[n] = f_reflected;
            continue;
        }

        let (contracted, f_contracted) = if f_reflected < values[n] {
            let outside = towards(CONTRACT);
            let value = f(&outside);
            (outside, value)
        } else {
            let inside = towards(-CONTRACT);
            let value = f(&inside);
            (inside, value)
        };
        if f_contracted < values[n].min(f_reflected) {
            simplex[n] = contracted;
            values[n] = f_contracted;
            continue;
        }

        // Shrink towards the best vertex
        let best = simplex[0].clone();
        for i in 1..=n {
            for j in 0..n {
                simplex[i][j] = best[j] + SHRINK * (simplex[i][j] - best[j]);
            }
            values[i] = f(&simplex[i]);
        }
    }

    let best = (0..=n)
        .min_by(|&a, &b| values[a].total_cmp(&values[b]))
        .unwrap_or(0);
    let value = values[best];
    Minimum {
        x: simplex[best].clone(),
        value,
        iterations,
        converged: converged && value.is_finite(),
    }
}

fn has_converged(simplex: &[Vec<f64>], values: &[f64], options: &NelderMeadOptions) -> bool {
    let best = values[0];
    let worst = values[values.len() - 1];
    if !best.is_finite() || !worst.is_finite() {
        return false;
    }
    let f_spread = (worst - best).abs();
    if f_spread > options.f_tolerance * (best.abs() + options.f_tolerance) {
        return false;
    }

    let anchor = &simplex[0];
    let scale = anchor.iter().fold(1.0_f64, |acc, v| acc.max(v.abs()));
    simplex[1..].iter().all(|vertex| {
        vertex
            .iter()
            .zip(anchor)
            .all(|(a, b)| (a - b).abs() <= options.x_tolerance * scale)
    })
}
