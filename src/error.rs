
use crate::expr::calculus::DifferentiationError;
use crate::expr::eval::EvalError;
use crate::quadrature::QuadratureError;

use thiserror::Error;

/// Top-level error type for the crate.
///
/// Each subsystem defines its own error enum; this type aggregates
/// them for callers that drive the whole pipeline, such as the
/// formula-level entry points in [`crate::fod`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
  #[error("{0}")]
  QuadratureError(#[from] QuadratureError),
  #[error("{0}")]
  EvalError(#[from] EvalError),
  #[error("{0}")]
  DifferentiationError(#[from] DifferentiationError),
}
