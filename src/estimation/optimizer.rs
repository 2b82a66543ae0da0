//! Bounded scalar minimization.
//!
//! A coarse grid scan picks the starting basin, then projected Newton steps
//! with finite-difference derivatives and a backtracking line search refine
//! it. Every iterate is clamped into the bounds. Deterministic: the same
//! objective and settings always visit the same points.

use serde::{Deserialize, Serialize};

/// Tuning for [`BoundedMinimizer`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizerSettings {
    /// Grid intervals scanned across the bounds before refinement.
    #[serde(default = "default_grid_points")]
    pub grid_points: usize,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Stop once an accepted step moves less than this.
    #[serde(default = "default_step_tolerance")]
    pub step_tolerance: f64,
    /// Stop once the projected gradient is smaller than this.
    #[serde(default = "default_gradient_tolerance")]
    pub gradient_tolerance: f64,
    /// Finite-difference half width.
    #[serde(default = "default_difference_step")]
    pub difference_step: f64,
}

fn default_grid_points() -> usize {
    32
}
fn default_max_iterations() -> usize {
    100
}
fn default_step_tolerance() -> f64 {
    1e-8
}
fn default_gradient_tolerance() -> f64 {
    1e-6
}
fn default_difference_step() -> f64 {
    1e-5
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            grid_points: default_grid_points(),
            max_iterations: default_max_iterations(),
            step_tolerance: default_step_tolerance(),
            gradient_tolerance: default_gradient_tolerance(),
            difference_step: default_difference_step(),
        }
    }
}

/// Result of a minimization run.
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    pub x: f64,
    pub value: f64,
    pub iterations: usize,
    pub evaluations: usize,
    pub converged: bool,
    pub message: String,
}

const ARMIJO: f64 = 1e-4;
const MAX_BACKTRACKS: usize = 40;
/// Projected-gradient size still accepted as stationary when the line search stalls.
const STALL_GRADIENT: f64 = 1e-4;

#[derive(Debug, Clone, Default)]
pub struct BoundedMinimizer {
    settings: OptimizerSettings,
}

impl BoundedMinimizer {
    pub fn new(settings: OptimizerSettings) -> Self {
        Self { settings }
    }

    /// Minimize `f` over `[lo, hi]` starting from `x0`.
    ///
    /// Callers guarantee `lo <= hi` and both finite. NaN objective values
    /// are treated as `+inf`.
    pub fn minimize<F>(&self, f: F, x0: f64, (lo, hi): (f64, f64)) -> Minimum
    where
        F: Fn(f64) -> f64,
    {
        let mut evaluations = 0usize;
        let mut eval = |x: f64| {
            evaluations += 1;
            let v = f(x);
            if v.is_nan() {
                f64::INFINITY
            } else {
                v
            }
        };
        let clamp = |x: f64| x.max(lo).min(hi);

        let mut x = if x0.is_finite() { clamp(x0) } else { clamp(0.0) };
        let mut fx = eval(x);

        // Ties keep the earlier point, so the initial guess wins over grid points.
        let grid = self.settings.grid_points.max(1);
        for i in 0..=grid {
            let xi = lo + (hi - lo) * i as f64 / grid as f64;
            let fi = eval(xi);
            if fi < fx {
                x = xi;
                fx = fi;
            }
        }

        if hi - lo <= 0.0 {
            return Minimum {
                x,
                value: fx,
                iterations: 0,
                evaluations,
                converged: true,
                message: "degenerate interval".to_string(),
            };
        }

        let h = self.settings.difference_step;
        let mut iterations = 0usize;
        let mut converged = false;
        let mut message = "iteration limit reached".to_string();

        while iterations < self.settings.max_iterations {
            iterations += 1;

            let xp = clamp(x + h);
            let xm = clamp(x - h);
            let fp = eval(xp);
            let fm = eval(xm);
            let gradient = (fp - fm) / (xp - xm);
            if !gradient.is_finite() {
                message = "non-finite gradient".to_string();
                break;
            }

            let projected = clamp(x - gradient) - x;
            if projected.abs() < self.settings.gradient_tolerance {
                converged = true;
                message = "projected gradient below tolerance".to_string();
                break;
            }

            let half = (xp - xm) / 2.0;
            let curvature = (fp - 2.0 * fx + fm) / (half * half);
            let step = if curvature > 0.0 && curvature.is_finite() {
                -gradient / curvature
            } else {
                -gradient.signum() * 0.1 * (hi - lo)
            };

            let mut t = 1.0;
            let mut accepted = None;
            for _ in 0..MAX_BACKTRACKS {
                let candidate = clamp(x + t * step);
                if candidate != x {
                    let fc = eval(candidate);
                    if fc <= fx - ARMIJO * (gradient * (candidate - x)).abs() {
                        accepted = Some((candidate, fc));
                        break;
                    }
                }
                t *= 0.5;
            }

            let Some((next, f_next)) = accepted else {
                converged = projected.abs() < STALL_GRADIENT;
                message = "line search made no progress".to_string();
                break;
            };

            let moved = (next - x).abs();
            x = next;
            fx = f_next;
            if moved < self.settings.step_tolerance {
                converged = true;
                message = "step below tolerance".to_string();
                break;
            }
        }

        Minimum {
            x,
            value: fx,
            iterations,
            evaluations,
            converged,
            message,
        }
    }
}
