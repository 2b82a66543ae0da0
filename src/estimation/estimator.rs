use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::likelihood::negative_log_likelihood;
use super::optimizer::{BoundedMinimizer, OptimizerSettings};
use crate::error::{Result, RiskError};
use crate::games::{Choice, Scenario};
use crate::monitoring::{tracing_sink, DiagnosticSink};

/// Smallest wealth used when dividing out the Arrow-Pratt coefficient.
const MIN_WEALTH: f64 = 1e-6;

/// Knobs for a single fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimatorSettings {
    pub rho_bounds: (f64, f64),
    pub initial_rho: f64,
    pub temperature: f64,
    /// Reference wealth for the Arrow-Pratt coefficient. `None` = mean safe value.
    #[serde(default)]
    pub wealth_base: Option<f64>,
    #[serde(default)]
    pub optimizer: OptimizerSettings,
}

impl Default for EstimatorSettings {
    fn default() -> Self {
        Self {
            rho_bounds: (-4.0, 4.0),
            initial_rho: 0.0,
            temperature: 1.0,
            wealth_base: None,
            optimizer: OptimizerSettings::default(),
        }
    }
}

impl EstimatorSettings {
    pub fn validate(&self) -> Result<()> {
        let (lo, hi) = self.rho_bounds;
        if !lo.is_finite() || !hi.is_finite() {
            return Err(RiskError::invalid_bounds_error(format!(
                "rho bounds must be finite, got ({}, {})",
                lo, hi
            )));
        }
        if lo > hi {
            return Err(RiskError::invalid_bounds_error(format!(
                "lower rho bound {} exceeds upper bound {}",
                lo, hi
            )));
        }
        Ok(())
    }
}

/// Fitted CRRA curvature and the derived Arrow-Pratt coefficient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationResult {
    /// > 0 risk-averse, 0 risk-neutral, < 0 risk-seeking. Always inside the bounds.
    pub rho_hat: f64,
    pub arrow_pratt_coefficient: f64,
    pub negative_log_likelihood: f64,
    pub converged: bool,
    pub iterations: usize,
    pub evaluations: usize,
}

/// Maximum-likelihood fit of the CRRA curvature from observed choices.
///
/// Strict: bad input is an error, never a default.
#[derive(Clone)]
pub struct Estimator {
    settings: EstimatorSettings,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl Default for Estimator {
    fn default() -> Self {
        Self::new(EstimatorSettings::default(), tracing_sink())
    }
}

impl Estimator {
    pub fn new(settings: EstimatorSettings, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            settings,
            diagnostics,
        }
    }

    pub fn settings(&self) -> &EstimatorSettings {
        &self.settings
    }

    pub fn fit(&self, choices: &[Choice], scenarios: &[Scenario]) -> Result<EstimationResult> {
        if choices.is_empty() {
            return Err(RiskError::empty_choices_error(
                "at least one choice is required for estimation",
            ));
        }
        if choices.len() != scenarios.len() {
            return Err(RiskError::LengthMismatch {
                choices: choices.len(),
                scenarios: scenarios.len(),
            });
        }
        self.settings.validate()?;

        let EstimatorSettings {
            rho_bounds,
            initial_rho,
            temperature,
            ..
        } = self.settings;

        self.diagnostics.info(&format!(
            "Estimating rho with {} choices, temperature: {}, initial_rho: {}, bounds: {:?}",
            choices.len(),
            temperature,
            initial_rho,
            rho_bounds
        ));

        let minimum = BoundedMinimizer::new(self.settings.optimizer).minimize(
            |rho| negative_log_likelihood(rho, choices, scenarios, temperature),
            initial_rho,
            rho_bounds,
        );

        if !minimum.converged {
            self.diagnostics.warn(&format!(
                "Optimization for rho_hat did not converge: {}. Using x = {:.4} after {} iterations",
                minimum.message, minimum.x, minimum.iterations
            ));
        }

        let (lo, hi) = rho_bounds;
        let rho_hat = minimum.x.max(lo).min(hi);

        let wealth_base = self
            .settings
            .wealth_base
            .unwrap_or_else(|| mean_safe_value(scenarios));
        let arrow_pratt_coefficient = rho_hat / wealth_base.max(MIN_WEALTH);

        Ok(EstimationResult {
            rho_hat,
            arrow_pratt_coefficient,
            negative_log_likelihood: minimum.value,
            converged: minimum.converged,
            iterations: minimum.iterations,
            evaluations: minimum.evaluations,
        })
    }
}

/// Mean of the finite safe values; 1.0 when there are none.
pub fn mean_safe_value(scenarios: &[Scenario]) -> f64 {
    let finite: Vec<f64> = scenarios
        .iter()
        .map(|sc| sc.safe_value)
        .filter(|v| v.is_finite())
        .collect();
    if finite.is_empty() {
        return 1.0;
    }
    finite.iter().sum::<f64>() / finite.len() as f64
}
