
//! A small symbolic expression engine: enough structure to represent
//! the integrands fed to the quadrature rules, evaluate them exactly,
//! and differentiate them for the Caputo formula.

pub mod atom;
pub mod calculus;
pub mod eval;
pub mod function;
pub mod number;
pub mod var;

use atom::Atom;
use number::Number;
use var::Var;

use serde::{Deserialize, Serialize};

use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
  Atom(Atom),
  Call(String, Vec<Expr>),
}

impl Expr {
  /// Convenience constructor for [`Expr::Call`].
  pub fn call(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Call(name.to_string(), args)
  }

  /// A variable expression, or `None` if the name is not a valid
  /// variable name.
  pub fn var(name: &str) -> Option<Expr> {
    Var::new(name).map(|v| Expr::Atom(Atom::Var(v)))
  }

  pub fn zero() -> Expr {
    Expr::from(Number::from(0))
  }

  pub fn one() -> Expr {
    Expr::from(Number::from(1))
  }

  pub fn is_zero(&self) -> bool {
    matches!(self, Expr::Atom(Atom::Number(n)) if num::Zero::is_zero(n))
  }
}

impl From<Atom> for Expr {
  fn from(a: Atom) -> Expr {
    Expr::Atom(a)
  }
}

impl From<Number> for Expr {
  fn from(n: Number) -> Expr {
    Expr::Atom(Atom::Number(n))
  }
}

impl From<Var> for Expr {
  fn from(v: Var) -> Expr {
    Expr::Atom(Atom::Var(v))
  }
}

impl From<i64> for Expr {
  fn from(n: i64) -> Expr {
    Expr::Atom(Atom::from(n))
  }
}

impl From<f64> for Expr {
  fn from(n: f64) -> Expr {
    Expr::Atom(Atom::from(n))
  }
}

impl Display for Expr {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      Expr::Atom(a) => write!(f, "{a}"),
      Expr::Call(name, args) => {
        write!(f, "{name}(")?;
        for (i, arg) in args.iter().enumerate() {
          if i > 0 {
            write!(f, ", ")?;
          }
          write!(f, "{arg}")?;
        }
        write!(f, ")")
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_display() {
    let expr = Expr::call("exp", vec![
      Expr::call("*", vec![Expr::from(2), Expr::var("t").unwrap()]),
    ]);
    assert_eq!(expr.to_string(), "exp(*(2, t))");
  }

  #[test]
  fn test_is_zero() {
    assert!(Expr::zero().is_zero());
    assert!(Expr::from(Number::ratio(0, 5)).is_zero());
    assert!(!Expr::one().is_zero());
    assert!(!Expr::var("t").unwrap().is_zero());
  }
}
