
//! General-purpose scalar type capable of switching between an exact
//! (arbitrary-precision) integer, an exact rational, and an IEEE 754
//! floating point representation.
//!
//! Field operations on exact operands stay exact; transcendental
//! functions always produce floats. Division never truncates.

use num::{BigInt, BigRational, One, ToPrimitive, Zero};
use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::ops;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Number {
  Integer(BigInt),
  Ratio(BigRational),
  Float(f64),
}

/// Representation tag for a [`Number`], mostly useful in tests that
/// assert exactness is preserved through an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
  Integer,
  Ratio,
  Float,
}

/// A pair of numbers promoted to a common representation. Exact
/// representations are widened toward rationals, and any float operand
/// drags both operands to floats.
enum NumberPair {
  Integers(BigInt, BigInt),
  Ratios(BigRational, BigRational),
  Floats(f64, f64),
}

impl NumberPair {
  fn promote(left: Number, right: Number) -> NumberPair {
    use Number::*;
    match (left, right) {
      (Integer(a), Integer(b)) => NumberPair::Integers(a, b),
      (Integer(a), Ratio(b)) => NumberPair::Ratios(BigRational::from(a), b),
      (Ratio(a), Integer(b)) => NumberPair::Ratios(a, BigRational::from(b)),
      (Ratio(a), Ratio(b)) => NumberPair::Ratios(a, b),
      (a, b) => NumberPair::Floats(a.to_f64_lossy(), b.to_f64_lossy()),
    }
  }
}

impl Number {
  /// The current representation of the number.
  pub fn kind(&self) -> NumberKind {
    match self {
      Number::Integer(_) => NumberKind::Integer,
      Number::Ratio(_) => NumberKind::Ratio,
      Number::Float(_) => NumberKind::Float,
    }
  }

  /// Produces a rational number, simplified to an integer
  /// representation when the denominator divides the numerator.
  ///
  /// Panics if `denom == 0`.
  pub fn ratio(numer: impl Into<BigInt>, denom: impl Into<BigInt>) -> Number {
    Number::from(BigRational::new(numer.into(), denom.into()))
  }

  /// If the number is stored as a rational but is in fact an integer,
  /// convert to the integer representation. Floats are never promoted
  /// back to an exact representation.
  fn simplify(self) -> Number {
    if let Number::Ratio(r) = &self {
      if r.denom().is_one() {
        return Number::Integer(r.numer().clone());
      }
    }
    self
  }

  /// Converts to an `f64` on a best-effort basis.
  pub fn to_f64(&self) -> Option<f64> {
    match self {
      Number::Integer(i) => i.to_f64(),
      Number::Ratio(r) => r.to_f64(),
      Number::Float(f) => Some(*f),
    }
  }

  pub(crate) fn to_f64_lossy(&self) -> f64 {
    self.to_f64().unwrap_or(f64::NAN)
  }

  pub fn recip(&self) -> Number {
    Number::one() / self.clone()
  }

  /// Raises the number to an integer power, staying exact for exact
  /// bases. The indeterminate form `0^0` is treated as 1.
  pub fn powi(&self, exp: i32) -> Number {
    match exp.cmp(&0) {
      Ordering::Equal => Number::one(),
      Ordering::Less => self.recip().powi(-exp),
      Ordering::Greater => {
        if let Number::Float(f) = self {
          return Number::from(f.powi(exp));
        }
        // Repeated squaring on the exact representations.
        let mut acc = Number::one();
        let mut base = self.clone();
        let mut e = exp as u32;
        while e > 0 {
          if e & 1 == 1 {
            acc = acc * base.clone();
          }
          base = base.clone() * base;
          e >>= 1;
        }
        acc
      }
    }
  }

  /// Raises the number to a floating power. The result is always a
  /// float and may be NaN when no real value exists.
  pub fn powf(&self, exp: f64) -> f64 {
    self.to_f64_lossy().powf(exp)
  }
}

impl From<i32> for Number {
  fn from(i: i32) -> Number {
    Number::Integer(i.into())
  }
}

impl From<i64> for Number {
  fn from(i: i64) -> Number {
    Number::Integer(i.into())
  }
}

impl From<usize> for Number {
  fn from(i: usize) -> Number {
    Number::Integer(i.into())
  }
}

impl From<BigInt> for Number {
  fn from(i: BigInt) -> Number {
    Number::Integer(i)
  }
}

impl From<BigRational> for Number {
  fn from(r: BigRational) -> Number {
    Number::Ratio(r).simplify()
  }
}

impl From<f64> for Number {
  fn from(f: f64) -> Number {
    Number::Float(f)
  }
}

impl Default for Number {
  fn default() -> Number {
    Number::from(0)
  }
}

impl Display for Number {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      Number::Integer(i) => i.fmt(f),
      Number::Ratio(r) => write!(f, "{}/{}", r.numer(), r.denom()),
      Number::Float(d) => write!(f, "{}", d),
    }
  }
}

/// Compares the numerical value and ignores the representation, so
/// `Number::from(1)` equals `Number::from(1.0)`.
impl PartialEq for Number {
  fn eq(&self, other: &Number) -> bool {
    match NumberPair::promote(self.clone(), other.clone()) {
      NumberPair::Integers(a, b) => a == b,
      NumberPair::Ratios(a, b) => a == b,
      NumberPair::Floats(a, b) => a == b,
    }
  }
}

impl PartialOrd for Number {
  fn partial_cmp(&self, other: &Number) -> Option<Ordering> {
    match NumberPair::promote(self.clone(), other.clone()) {
      NumberPair::Integers(a, b) => a.partial_cmp(&b),
      NumberPair::Ratios(a, b) => a.partial_cmp(&b),
      NumberPair::Floats(a, b) => a.partial_cmp(&b),
    }
  }
}

impl ops::Add for Number {
  type Output = Number;

  fn add(self, other: Number) -> Number {
    match NumberPair::promote(self, other) {
      NumberPair::Integers(a, b) => Number::from(a + b),
      NumberPair::Ratios(a, b) => Number::from(a + b),
      NumberPair::Floats(a, b) => Number::from(a + b),
    }
  }
}

impl ops::Sub for Number {
  type Output = Number;

  fn sub(self, other: Number) -> Number {
    match NumberPair::promote(self, other) {
      NumberPair::Integers(a, b) => Number::from(a - b),
      NumberPair::Ratios(a, b) => Number::from(a - b),
      NumberPair::Floats(a, b) => Number::from(a - b),
    }
  }
}

impl ops::Mul for Number {
  type Output = Number;

  fn mul(self, other: Number) -> Number {
    match NumberPair::promote(self, other) {
      NumberPair::Integers(a, b) => Number::from(a * b),
      NumberPair::Ratios(a, b) => Number::from(a * b),
      NumberPair::Floats(a, b) => Number::from(a * b),
    }
  }
}

/// Division preserves exactness but never truncates: two integers
/// divide to a rational. Division of an exact value by exact zero is
/// the caller's responsibility to rule out; the float path follows
/// IEEE semantics.
impl ops::Div for Number {
  type Output = Number;

  fn div(self, other: Number) -> Number {
    match NumberPair::promote(self, other) {
      NumberPair::Integers(a, b) =>
        Number::from(BigRational::from(a) / BigRational::from(b)),
      NumberPair::Ratios(a, b) => Number::from(a / b),
      NumberPair::Floats(a, b) => Number::from(a / b),
    }
  }
}

impl ops::Neg for Number {
  type Output = Number;

  fn neg(self) -> Number {
    match self {
      Number::Integer(i) => Number::Integer(-i),
      Number::Ratio(r) => Number::Ratio(-r),
      Number::Float(f) => Number::Float(-f),
    }
  }
}

impl Zero for Number {
  fn zero() -> Number {
    Number::from(0)
  }

  fn is_zero(&self) -> bool {
    match self {
      Number::Integer(i) => i.is_zero(),
      Number::Ratio(r) => r.is_zero(),
      Number::Float(f) => f.is_zero(),
    }
  }
}

impl One for Number {
  fn one() -> Number {
    Number::from(1)
  }

  fn is_one(&self) -> bool {
    match self {
      Number::Integer(i) => i.is_one(),
      Number::Ratio(r) => r.is_one(),
      Number::Float(f) => f.is_one(),
    }
  }
}

impl AbsDiffEq for Number {
  type Epsilon = f64;

  fn default_epsilon() -> f64 {
    <f64 as AbsDiffEq>::default_epsilon()
  }

  fn abs_diff_eq(&self, other: &Number, epsilon: f64) -> bool {
    self.to_f64_lossy().abs_diff_eq(&other.to_f64_lossy(), epsilon)
  }
}

impl RelativeEq for Number {
  fn default_max_relative() -> f64 {
    <f64 as RelativeEq>::default_max_relative()
  }

  fn relative_eq(&self, other: &Number, epsilon: f64, max_relative: f64) -> bool {
    self.to_f64_lossy().relative_eq(&other.to_f64_lossy(), epsilon, max_relative)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use approx::assert_abs_diff_eq;

  #[test]
  fn test_kind() {
    assert_eq!(Number::from(3).kind(), NumberKind::Integer);
    assert_eq!(Number::ratio(1, 2).kind(), NumberKind::Ratio);
    assert_eq!(Number::from(0.5).kind(), NumberKind::Float);
    // A rational that reduces to an integer uses the integer repr.
    assert_eq!(Number::ratio(4, 2).kind(), NumberKind::Integer);
  }

  #[test]
  fn test_value_eq() {
    assert_eq!(Number::from(3), Number::from(3));
    assert_eq!(Number::from(3), Number::from(3.0));
    assert_eq!(Number::ratio(1, 2), Number::from(0.5));
    assert_ne!(Number::ratio(1, 3), Number::from(0.5));
  }

  #[test]
  fn test_add_preserves_exactness() {
    let sum = Number::from(3) + Number::ratio(1, 2);
    assert_eq!(sum, Number::ratio(7, 2));
    assert_eq!(sum.kind(), NumberKind::Ratio);
    let sum = Number::ratio(1, 2) + Number::ratio(1, 2);
    assert_eq!(sum, Number::from(1));
    assert_eq!(sum.kind(), NumberKind::Integer);
    let sum = Number::from(3) + Number::from(3.0);
    assert_eq!(sum.kind(), NumberKind::Float);
  }

  #[test]
  fn test_div_never_truncates() {
    assert_eq!(Number::from(3) / Number::from(2), Number::ratio(3, 2));
    assert_eq!(Number::from(3) / Number::ratio(1, 2), Number::from(6));
    assert_eq!(
      (Number::from(3) / Number::from(2)).kind(),
      NumberKind::Ratio,
    );
  }

  #[test]
  fn test_mul_and_neg() {
    assert_eq!(Number::ratio(1, 2) * Number::ratio(2, 3), Number::ratio(1, 3));
    assert_eq!(-Number::ratio(-1, 2), Number::ratio(1, 2));
    assert_eq!(-Number::from(3), Number::from(-3));
  }

  #[test]
  fn test_powi() {
    assert_eq!(Number::from(3).powi(0), Number::from(1));
    assert_eq!(Number::from(3).powi(4), Number::from(81));
    assert_eq!(Number::ratio(3, 2).powi(2), Number::ratio(9, 4));
    assert_eq!(Number::from(3).powi(-2), Number::ratio(1, 9));
    assert_eq!(Number::from(2.0).powi(-2), Number::from(0.25));
  }

  #[test]
  fn test_powf() {
    assert_abs_diff_eq!(Number::from(4).powf(0.5), 2.0);
    assert_abs_diff_eq!(Number::ratio(1, 4).powf(0.5), 0.5);
  }

  #[test]
  fn test_ordering() {
    assert!(Number::ratio(1, 3) < Number::from(0.5));
    assert!(Number::from(2) > Number::ratio(3, 2));
  }

  #[test]
  fn test_to_f64() {
    assert_eq!(Number::from(3).to_f64(), Some(3.0));
    assert_eq!(Number::ratio(1, 2).to_f64(), Some(0.5));
    assert_eq!(Number::from(1.25).to_f64(), Some(1.25));
  }
}
