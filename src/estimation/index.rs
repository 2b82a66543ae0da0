use std::sync::Arc;

use super::estimator::{Estimator, EstimatorSettings};
use crate::games::{Choice, Scenario};
use crate::monitoring::{tracing_sink, DiagnosticSink};

/// Score returned whenever estimation cannot say anything.
pub const NEUTRAL_INDEX: f64 = 0.5;

/// Maps a fitted curvature to `[0, 1]`; higher means bolder.
///
/// `rho = -4 -> 0.982`, `rho = 0 -> 0.5`, `rho = 4 -> 0.018`.
pub fn index_from_rho(rho_hat: f64) -> f64 {
    1.0 / (1.0 + rho_hat.exp())
}

/// Lenient front door to the [`Estimator`]: failures become [`NEUTRAL_INDEX`].
#[derive(Clone)]
pub struct RiskIndexMapper {
    estimator: Estimator,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl Default for RiskIndexMapper {
    fn default() -> Self {
        Self::new(EstimatorSettings::default(), tracing_sink())
    }
}

impl RiskIndexMapper {
    pub fn new(settings: EstimatorSettings, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            estimator: Estimator::new(settings, diagnostics.clone()),
            diagnostics,
        }
    }

    pub fn estimator(&self) -> &Estimator {
        &self.estimator
    }

    pub fn index(&self, choices: &[Choice], scenarios: &[Scenario]) -> f64 {
        if choices.is_empty() {
            self.diagnostics
                .warn("Risk index requested for an empty choice list. Returning neutral index 0.5.");
            return NEUTRAL_INDEX;
        }

        let rho_hat = match self.estimator.fit(choices, scenarios) {
            Ok(result) => result.rho_hat,
            Err(e) => {
                self.diagnostics.error(&format!(
                    "Error during rho estimation: {}. Returning neutral index 0.5.",
                    e
                ));
                return NEUTRAL_INDEX;
            }
        };
        self.diagnostics
            .info(&format!("Estimated rho_hat for index calculation: {:.4}", rho_hat));

        let risk_index = index_from_rho(rho_hat);
        if !risk_index.is_finite() {
            self.diagnostics.error(&format!(
                "Risk index is not finite for rho_hat {}. Returning neutral index 0.5.",
                rho_hat
            ));
            return NEUTRAL_INDEX;
        }

        self.diagnostics
            .info(&format!("Calculated risk_index: {:.4}", risk_index));
        risk_index
    }
}
