
//! The table of functions known to the evaluation and differentiation
//! engines, with one evaluation rule and one derivative rule per
//! function.

use super::Expr;
use super::calculus::{DerivativeEngine, DifferentiationError, DifferentiationFailure};
use super::eval::EvalError;
use super::number::Number;

use num::ToPrimitive;
use num::Zero;
use once_cell::sync::Lazy;

use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};

type EvalRule = dyn Fn(&[Number]) -> Result<Number, EvalError> + Send + Sync;
type DerivRule = dyn Fn(Vec<Expr>, &DerivativeEngine) -> Result<Expr, DifferentiationFailure> + Send + Sync;

/// A mathematical function known to the expression engine.
pub struct KnownFunction {
  name: String,
  eval_rule: Box<EvalRule>,
  derivative_rule: Option<Box<DerivRule>>,
}

impl KnownFunction {
  pub fn new(
    name: &str,
    eval_rule: impl Fn(&[Number]) -> Result<Number, EvalError> + Send + Sync + 'static,
  ) -> Self {
    Self {
      name: name.to_string(),
      eval_rule: Box::new(eval_rule),
      derivative_rule: None,
    }
  }

  pub fn with_derivative(
    mut self,
    rule: impl Fn(Vec<Expr>, &DerivativeEngine) -> Result<Expr, DifferentiationFailure> + Send + Sync + 'static,
  ) -> Self {
    self.derivative_rule = Some(Box::new(rule));
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn eval(&self, args: &[Number]) -> Result<Number, EvalError> {
    (self.eval_rule)(args)
  }

  pub fn differentiate(
    &self,
    args: Vec<Expr>,
    engine: &DerivativeEngine,
  ) -> Result<Expr, DifferentiationFailure> {
    match &self.derivative_rule {
      Some(rule) => rule(args, engine),
      None => Err(engine.error(DifferentiationError::UnknownDerivative(self.name.clone()))),
    }
  }
}

impl Debug for KnownFunction {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.debug_struct("KnownFunction")
      .field("name", &self.name)
      .field("has_derivative", &self.derivative_rule.is_some())
      .finish_non_exhaustive()
  }
}

/// A table of known functions, keyed by name.
#[derive(Debug, Default)]
pub struct FunctionTable {
  known_functions: HashMap<String, KnownFunction>,
}

impl FunctionTable {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, func: KnownFunction) {
    self.known_functions.insert(func.name().to_string(), func);
  }

  pub fn get(&self, name: &str) -> Option<&KnownFunction> {
    self.known_functions.get(name)
  }
}

impl FromIterator<KnownFunction> for FunctionTable {
  fn from_iter<I: IntoIterator<Item = KnownFunction>>(iter: I) -> Self {
    let mut table = Self::new();
    for func in iter {
      table.insert(func);
    }
    table
  }
}

/// The functions understood by the integration engine: the field
/// operators plus the transcendental functions whose derivatives the
/// Caputo formula needs.
pub fn standard_table() -> &'static FunctionTable {
  static TABLE: Lazy<FunctionTable> = Lazy::new(|| {
    [
      addition(),
      subtraction(),
      negation(),
      multiplication(),
      division(),
      power(),
      exponential(),
      natural_log(),
      square_root(),
      sine(),
      cosine(),
    ]
    .into_iter()
    .collect()
  });
  &TABLE
}

fn expect_arity(function: &str, args: &[Number], n: usize) -> Result<(), EvalError> {
  if args.len() == n {
    Ok(())
  } else {
    Err(EvalError::WrongArity {
      function: function.to_string(),
      expected: n.to_string(),
      got: args.len(),
    })
  }
}

fn expect_nonempty(function: &str, args: &[Number]) -> Result<(), EvalError> {
  if args.is_empty() {
    Err(EvalError::WrongArity {
      function: function.to_string(),
      expected: String::from("at least 1"),
      got: 0,
    })
  } else {
    Ok(())
  }
}

pub fn addition() -> KnownFunction {
  KnownFunction::new("+", |args| {
    expect_nonempty("+", args)?;
    Ok(args.iter().cloned().fold(Number::zero(), |acc, x| acc + x))
  })
  .with_derivative(|args, engine| {
    let derivs = args
      .into_iter()
      .map(|arg| engine.differentiate(arg))
      .collect::<Result<Vec<_>, _>>()?;
    Ok(Expr::call("+", derivs))
  })
}

pub fn subtraction() -> KnownFunction {
  KnownFunction::new("-", |args| {
    expect_arity("-", args, 2)?;
    Ok(args[0].clone() - args[1].clone())
  })
  .with_derivative(|args, engine| {
    let [a, b] = unpack_two("-", args, engine)?;
    let da = engine.differentiate(a)?;
    let db = engine.differentiate(b)?;
    Ok(Expr::call("-", vec![da, db]))
  })
}

pub fn negation() -> KnownFunction {
  KnownFunction::new("neg", |args| {
    expect_arity("neg", args, 1)?;
    Ok(-args[0].clone())
  })
  .with_derivative(|args, engine| {
    let a = unpack_one("neg", args, engine)?;
    let da = engine.differentiate(a)?;
    Ok(Expr::call("neg", vec![da]))
  })
}

pub fn multiplication() -> KnownFunction {
  KnownFunction::new("*", |args| {
    expect_nonempty("*", args)?;
    Ok(args.iter().cloned().fold(Number::from(1), |acc, x| acc * x))
  })
  .with_derivative(|args, engine| {
    // n-ary product rule: sum over factors of the product with that
    // factor replaced by its derivative.
    let mut terms = Vec::with_capacity(args.len());
    for i in 0..args.len() {
      let mut factors = args.clone();
      factors[i] = engine.differentiate(factors[i].clone())?;
      terms.push(Expr::call("*", factors));
    }
    Ok(Expr::call("+", terms))
  })
}

pub fn division() -> KnownFunction {
  KnownFunction::new("/", |args| {
    expect_arity("/", args, 2)?;
    if args[1].is_zero() {
      return Err(EvalError::DivisionByZero);
    }
    Ok(args[0].clone() / args[1].clone())
  })
  .with_derivative(|args, engine| {
    let [a, b] = unpack_two("/", args, engine)?;
    let da = engine.differentiate(a.clone())?;
    let db = engine.differentiate(b.clone())?;
    Ok(Expr::call("/", vec![
      Expr::call("-", vec![
        Expr::call("*", vec![da, b.clone()]),
        Expr::call("*", vec![a, db]),
      ]),
      Expr::call("^", vec![b, Expr::from(2)]),
    ]))
  })
}

pub fn power() -> KnownFunction {
  KnownFunction::new("^", |args| {
    expect_arity("^", args, 2)?;
    let base = &args[0];
    let exponent = &args[1];
    // Exact integer exponents stay exact; everything else goes through
    // the float power.
    if let Number::Integer(i) = exponent {
      if let Some(small) = i.to_i32() {
        return Ok(base.powi(small));
      }
    }
    Ok(Number::from(base.powf(exponent.to_f64_lossy())))
  })
  .with_derivative(|args, engine| {
    let [a, b] = unpack_two("^", args, engine)?;
    let da = engine.differentiate(a.clone())?;
    let db = engine.differentiate(b.clone())?;
    if db.is_zero() {
      // Constant exponent: b * a^(b-1) * a'
      Ok(Expr::call("*", vec![
        b.clone(),
        Expr::call("^", vec![a, Expr::call("-", vec![b, Expr::one()])]),
        da,
      ]))
    } else {
      // General rule: a^b * (b' ln a + b a' / a)
      Ok(Expr::call("*", vec![
        Expr::call("^", vec![a.clone(), b.clone()]),
        Expr::call("+", vec![
          Expr::call("*", vec![db, Expr::call("ln", vec![a.clone()])]),
          Expr::call("/", vec![Expr::call("*", vec![b, da]), a]),
        ]),
      ]))
    }
  })
}

pub fn exponential() -> KnownFunction {
  KnownFunction::new("exp", |args| {
    expect_arity("exp", args, 1)?;
    Ok(Number::from(args[0].to_f64_lossy().exp()))
  })
  .with_derivative(|args, engine| {
    let a = unpack_one("exp", args, engine)?;
    let da = engine.differentiate(a.clone())?;
    Ok(Expr::call("*", vec![da, Expr::call("exp", vec![a])]))
  })
}

pub fn natural_log() -> KnownFunction {
  KnownFunction::new("ln", |args| {
    expect_arity("ln", args, 1)?;
    if args[0] <= Number::zero() {
      return Err(EvalError::DomainError {
        function: String::from("ln"),
        message: format!("expected a positive argument, got {}", args[0]),
      });
    }
    Ok(Number::from(args[0].to_f64_lossy().ln()))
  })
  .with_derivative(|args, engine| {
    let a = unpack_one("ln", args, engine)?;
    let da = engine.differentiate(a.clone())?;
    Ok(Expr::call("/", vec![da, a]))
  })
}

pub fn square_root() -> KnownFunction {
  KnownFunction::new("sqrt", |args| {
    expect_arity("sqrt", args, 1)?;
    if args[0] < Number::zero() {
      return Err(EvalError::DomainError {
        function: String::from("sqrt"),
        message: format!("expected a non-negative argument, got {}", args[0]),
      });
    }
    Ok(Number::from(args[0].to_f64_lossy().sqrt()))
  })
  .with_derivative(|args, engine| {
    let a = unpack_one("sqrt", args, engine)?;
    let da = engine.differentiate(a.clone())?;
    Ok(Expr::call("/", vec![
      da,
      Expr::call("*", vec![Expr::from(2), Expr::call("sqrt", vec![a])]),
    ]))
  })
}

pub fn sine() -> KnownFunction {
  KnownFunction::new("sin", |args| {
    expect_arity("sin", args, 1)?;
    Ok(Number::from(args[0].to_f64_lossy().sin()))
  })
  .with_derivative(|args, engine| {
    let a = unpack_one("sin", args, engine)?;
    let da = engine.differentiate(a.clone())?;
    Ok(Expr::call("*", vec![da, Expr::call("cos", vec![a])]))
  })
}

pub fn cosine() -> KnownFunction {
  KnownFunction::new("cos", |args| {
    expect_arity("cos", args, 1)?;
    Ok(Number::from(args[0].to_f64_lossy().cos()))
  })
  .with_derivative(|args, engine| {
    let a = unpack_one("cos", args, engine)?;
    let da = engine.differentiate(a.clone())?;
    Ok(Expr::call("neg", vec![
      Expr::call("*", vec![da, Expr::call("sin", vec![a])]),
    ]))
  })
}

fn unpack_one(
  name: &str,
  mut args: Vec<Expr>,
  engine: &DerivativeEngine,
) -> Result<Expr, DifferentiationFailure> {
  if args.len() == 1 {
    Ok(args.pop().unwrap())
  } else {
    Err(engine.error(DifferentiationError::BadArity {
      function: name.to_string(),
      got: args.len(),
    }))
  }
}

fn unpack_two(
  name: &str,
  mut args: Vec<Expr>,
  engine: &DerivativeEngine,
) -> Result<[Expr; 2], DifferentiationFailure> {
  if args.len() == 2 {
    let b = args.pop().unwrap();
    let a = args.pop().unwrap();
    Ok([a, b])
  } else {
    Err(engine.error(DifferentiationError::BadArity {
      function: name.to_string(),
      got: args.len(),
    }))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::expr::number::NumberKind;

  #[test]
  fn test_table_lookup() {
    let table = standard_table();
    assert!(table.get("+").is_some());
    assert!(table.get("exp").is_some());
    assert!(table.get("gamma").is_none());
  }

  #[test]
  fn test_addition_is_variadic() {
    let plus = addition();
    let args = [Number::from(1), Number::ratio(1, 2), Number::from(2)];
    assert_eq!(plus.eval(&args).unwrap(), Number::ratio(7, 2));
    assert!(plus.eval(&[]).is_err());
  }

  #[test]
  fn test_division_by_zero_is_an_error() {
    let div = division();
    let err = div.eval(&[Number::from(1), Number::from(0)]).unwrap_err();
    assert!(matches!(err, EvalError::DivisionByZero));
  }

  #[test]
  fn test_power_exact_integer_exponent() {
    let pow = power();
    let out = pow.eval(&[Number::ratio(3, 2), Number::from(2)]).unwrap();
    assert_eq!(out, Number::ratio(9, 4));
    assert_eq!(out.kind(), NumberKind::Ratio);
  }

  #[test]
  fn test_ln_domain() {
    let ln = natural_log();
    assert!(ln.eval(&[Number::from(-1)]).is_err());
    assert!(ln.eval(&[Number::from(0)]).is_err());
    assert!(ln.eval(&[Number::from(1)]).is_ok());
  }
}
