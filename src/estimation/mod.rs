//! CRRA risk-aversion estimation.
//!
//! utility -> likelihood -> optimizer -> estimator -> index. The estimator is
//! strict about its inputs; the index mapper is the lenient entry point.

pub mod estimator;
pub mod index;
pub mod likelihood;
pub mod optimizer;
pub mod utility;

pub use estimator::{mean_safe_value, EstimationResult, Estimator, EstimatorSettings};
pub use index::{index_from_rho, RiskIndexMapper, NEUTRAL_INDEX};
pub use likelihood::{negative_log_likelihood, stable_sigmoid};
pub use optimizer::{BoundedMinimizer, Minimum, OptimizerSettings};
pub use utility::{crra_utility, expected_utility};
