
//! Quadrature rules for integrals carrying the weakly singular kernel
//! `(upper - t)^(-alpha)` of the fractional calculus.
//!
//! Every rule computes its nodes and weights eagerly at construction
//! and can re-derive the weights for a new fractional order through
//! [`QuadratureRule::update_weights`]. The composite hybrid rules in
//! [`hybrid`] split the domain so a smooth-region rule and a
//! singularity-aware rule each cover the part they are good at.

pub mod hybrid;
pub mod laguerre;
pub mod legendre;
pub mod precise;
pub mod riemann;

pub use hybrid::{GaussLegendreGaussLaguerre, GaussLegendreRiemannSum};
pub use laguerre::GaussLaguerre;
pub use legendre::GaussLegendre;
pub use riemann::RiemannSum;

use crate::integrand::Integrand;

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
#[non_exhaustive]
pub enum QuadratureError {
  #[error("No integrand available for '{description}'; supply one at construction or call time")]
  MissingIntegrand { description: String },
  #[error("Invalid interval: lower bound {lower} must be strictly less than upper bound {upper}")]
  InvalidInterval { lower: f64, upper: f64 },
  #[error("Invalid parameter '{parameter}': {message}")]
  InvalidParameter {
    parameter: &'static str,
    message: String,
  },
  #[error("Unknown quadrature method '{name}'; expected one of {expected}")]
  UnknownMethod {
    name: String,
    expected: &'static str,
  },
}

/// The capability shared by every quadrature rule variant.
///
/// `points` and `weights` are parallel sequences of equal length.
/// `update_weights` swaps in a freshly computed weight vector; it
/// never mutates weights in place through a shared reference.
pub trait QuadratureRule: std::fmt::Debug {
  fn points(&self) -> &[f64];
  fn weights(&self) -> &[f64];
  fn alpha(&self) -> f64;
  fn lower(&self) -> f64;
  fn upper(&self) -> f64;
  /// Whether the rule is specialized for the endpoint singularity.
  fn singularity(&self) -> bool;
  fn description(&self) -> &str;
  fn update_weights(&mut self, alpha: f64) -> Result<(), QuadratureError>;
  /// Evaluates the weighted sum over the rule's nodes. `f` overrides
  /// the integrand stored at construction; with neither available the
  /// configuration is rejected.
  fn integrate(&self, f: Option<&Integrand>) -> Result<f64, crate::error::Error>;
}

pub(crate) fn check_interval(lower: f64, upper: f64) -> Result<(), QuadratureError> {
  if lower < upper {
    Ok(())
  } else {
    Err(QuadratureError::InvalidInterval { lower, upper })
  }
}

/// The fractional order must lie in [0, 1); anything else is rejected
/// rather than silently producing nonsense weights.
pub(crate) fn check_alpha(alpha: f64) -> Result<(), QuadratureError> {
  if (0.0..1.0).contains(&alpha) {
    Ok(())
  } else {
    Err(QuadratureError::InvalidParameter {
      parameter: "alpha",
      message: format!("fractional order must lie in [0, 1), got {alpha}"),
    })
  }
}

pub(crate) fn check_positive(parameter: &'static str, n: usize) -> Result<(), QuadratureError> {
  if n > 0 {
    Ok(())
  } else {
    Err(QuadratureError::InvalidParameter {
      parameter,
      message: String::from("must be at least 1"),
    })
  }
}

/// Shared integration kernel: resolve the integrand, evaluate it over
/// the nodes, and form the dot product with the weights. Summation
/// order follows node order so results are reproducible.
pub(crate) fn weighted_sum(
  points: &[f64],
  weights: &[f64],
  stored: Option<&Integrand>,
  supplied: Option<&Integrand>,
  description: &str,
) -> Result<f64, crate::error::Error> {
  let f = supplied.or(stored).ok_or_else(|| QuadratureError::MissingIntegrand {
    description: description.to_string(),
  })?;
  let values = f.evaluate(points)?;
  Ok(values.iter().zip(weights).map(|(v, w)| v * w).sum())
}
