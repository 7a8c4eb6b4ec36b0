
//! Evaluation of expression trees at a point: the target variable is
//! substituted and the tree is folded bottom-up, staying exact until a
//! rule forces a float.

use super::Expr;
use super::atom::Atom;
use super::function::FunctionTable;
use super::number::Number;
use super::var::Var;

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
#[non_exhaustive]
pub enum EvalError {
  #[error("Unknown function '{0}'")]
  UnknownFunction(String),
  #[error("Function '{function}' expected {expected} argument(s), got {got}")]
  WrongArity {
    function: String,
    expected: String,
    got: usize,
  },
  #[error("Function '{function}': {message}")]
  DomainError { function: String, message: String },
  #[error("Division by zero")]
  DivisionByZero,
  #[error("Unbound variable '{0}'")]
  UnboundVariable(Var),
}

#[derive(Debug)]
pub struct Evaluator<'a> {
  target_variable: Var,
  value: Number,
  function_table: &'a FunctionTable,
}

impl<'a> Evaluator<'a> {
  pub fn new(function_table: &'a FunctionTable, target_variable: Var, value: Number) -> Self {
    Self { target_variable, value, function_table }
  }

  pub fn eval(&self, expr: &Expr) -> Result<Number, EvalError> {
    match expr {
      Expr::Atom(Atom::Number(n)) => Ok(n.clone()),
      Expr::Atom(Atom::Var(var)) => {
        if var == &self.target_variable {
          Ok(self.value.clone())
        } else {
          Err(EvalError::UnboundVariable(var.clone()))
        }
      }
      Expr::Call(function, args) => {
        let args = args
          .iter()
          .map(|arg| self.eval(arg))
          .collect::<Result<Vec<_>, _>>()?;
        let known_function = self
          .function_table
          .get(function)
          .ok_or_else(|| EvalError::UnknownFunction(function.clone()))?;
        known_function.eval(&args)
      }
    }
  }
}

/// Evaluates `expr` with `var` bound to `value`.
pub fn evaluate(
  function_table: &FunctionTable,
  expr: &Expr,
  var: &Var,
  value: Number,
) -> Result<Number, EvalError> {
  Evaluator::new(function_table, var.clone(), value).eval(expr)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::expr::function::standard_table;
  use crate::expr::number::NumberKind;

  use approx::assert_abs_diff_eq;

  fn t() -> Var {
    Var::new("t").unwrap()
  }

  #[test]
  fn test_eval_polynomial_exactly() {
    // t^2 + 3/2 at t = 1/2 is 7/4, exactly.
    let expr = Expr::call("+", vec![
      Expr::call("^", vec![Expr::var("t").unwrap(), Expr::from(2)]),
      Expr::from(Number::ratio(3, 2)),
    ]);
    let out = evaluate(standard_table(), &expr, &t(), Number::ratio(1, 2)).unwrap();
    assert_eq!(out, Number::ratio(7, 4));
    assert_eq!(out.kind(), NumberKind::Ratio);
  }

  #[test]
  fn test_eval_transcendental() {
    let expr = Expr::call("exp", vec![
      Expr::call("*", vec![Expr::from(2), Expr::var("t").unwrap()]),
    ]);
    let out = evaluate(standard_table(), &expr, &t(), Number::from(0.5)).unwrap();
    assert_abs_diff_eq!(out.to_f64().unwrap(), 1.0_f64.exp(), epsilon = 1e-12);
  }

  #[test]
  fn test_unbound_variable() {
    let expr = Expr::var("u").unwrap();
    let err = evaluate(standard_table(), &expr, &t(), Number::from(1)).unwrap_err();
    assert!(matches!(err, EvalError::UnboundVariable(_)));
  }

  #[test]
  fn test_unknown_function() {
    let expr = Expr::call("gamma", vec![Expr::var("t").unwrap()]);
    let err = evaluate(standard_table(), &expr, &t(), Number::from(1)).unwrap_err();
    assert_eq!(err, EvalError::UnknownFunction(String::from("gamma")));
  }
}
