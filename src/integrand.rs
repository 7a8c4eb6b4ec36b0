
//! Integrand representations.
//!
//! The quadrature rules accept either a plain numeric callable or a
//! symbolic expression; the two are modeled as a tagged variant so
//! every rule depends only on the common vectorized-evaluation
//! contract and the two paths cannot be confused at runtime.

use crate::error::Error;
use crate::expr::Expr;
use crate::expr::calculus::differentiate;
use crate::expr::eval::evaluate;
use crate::expr::function::standard_table;
use crate::expr::number::Number;
use crate::expr::var::Var;

use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// A numeric integrand: an arbitrary `f64 -> f64` callable, evaluated
/// pointwise over the quadrature nodes.
#[derive(Clone)]
pub struct NumericFunction {
  f: Arc<dyn Fn(f64) -> f64 + Send + Sync>,
}

/// A symbolic integrand: an expression in one variable, evaluated
/// exactly and cast to a float only at the summation boundary.
#[derive(Debug, Clone)]
pub struct SymbolicFunction {
  expr: Expr,
  var: Var,
}

#[derive(Debug, Clone)]
pub enum Integrand {
  Numeric(NumericFunction),
  Symbolic(SymbolicFunction),
}

impl NumericFunction {
  pub fn new(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
    Self { f: Arc::new(f) }
  }

  pub fn evaluate_at(&self, t: f64) -> f64 {
    (self.f)(t)
  }

  /// Central-difference derivative with a step scaled to the cube root
  /// of the machine epsilon, the usual optimum for two-sided
  /// differencing.
  pub fn differentiate(&self) -> NumericFunction {
    let f = Arc::clone(&self.f);
    NumericFunction::new(move |t| {
      let h = f64::EPSILON.cbrt() * t.abs().max(1.0);
      (f(t + h) - f(t - h)) / (2.0 * h)
    })
  }
}

impl Debug for NumericFunction {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.write_str("NumericFunction(..)")
  }
}

impl SymbolicFunction {
  pub fn new(expr: Expr, var: Var) -> Self {
    Self { expr, var }
  }

  pub fn expr(&self) -> &Expr {
    &self.expr
  }

  pub fn evaluate_at(&self, t: f64) -> Result<f64, Error> {
    let value = evaluate(standard_table(), &self.expr, &self.var, Number::from(t))?;
    Ok(value.to_f64().unwrap_or(f64::NAN))
  }

  /// Exact symbolic derivative with respect to the function's own
  /// variable.
  pub fn differentiate(&self) -> Result<SymbolicFunction, Error> {
    let deriv = differentiate(standard_table(), self.expr.clone(), self.var.clone())
      .map_err(|failure| failure.error)?;
    Ok(SymbolicFunction::new(deriv, self.var.clone()))
  }
}

impl Integrand {
  /// Wraps a plain numeric callable.
  pub fn from_fn(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Integrand {
    Integrand::Numeric(NumericFunction::new(f))
  }

  /// Wraps a symbolic expression in the given variable.
  pub fn symbolic(expr: Expr, var: Var) -> Integrand {
    Integrand::Symbolic(SymbolicFunction::new(expr, var))
  }

  /// Evaluates the integrand at every point, in order.
  pub fn evaluate(&self, points: &[f64]) -> Result<Vec<f64>, Error> {
    match self {
      Integrand::Numeric(f) => Ok(points.iter().map(|&t| f.evaluate_at(t)).collect()),
      Integrand::Symbolic(f) => points.iter().map(|&t| f.evaluate_at(t)).collect(),
    }
  }

  /// The derivative of the integrand, in the same representation:
  /// symbolic functions differentiate exactly, numeric functions fall
  /// back to central differencing.
  pub fn differentiate(&self) -> Result<Integrand, Error> {
    match self {
      Integrand::Numeric(f) => Ok(Integrand::Numeric(f.differentiate())),
      Integrand::Symbolic(f) => Ok(Integrand::Symbolic(f.differentiate()?)),
    }
  }
}

impl From<NumericFunction> for Integrand {
  fn from(f: NumericFunction) -> Integrand {
    Integrand::Numeric(f)
  }
}

impl From<SymbolicFunction> for Integrand {
  fn from(f: SymbolicFunction) -> Integrand {
    Integrand::Symbolic(f)
  }
}
