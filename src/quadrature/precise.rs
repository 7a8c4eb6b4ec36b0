
//! Arbitrary-precision refinement of generalized Gauss-Laguerre rules.
//!
//! At high degree the float Newton iteration loses accuracy in the
//! outermost roots, and the exponential mapping onto a finite interval
//! amplifies that loss next to the singular endpoint. This module
//! reruns the Newton iteration in exact rational arithmetic, truncated
//! to a fixed number of decimal digits after each step so operand size
//! stays bounded, then rounds the result back to the working floats.
//!
//! This is the only place in the crate where the arbitrary-precision
//! representation leaks past a single function call; callers see plain
//! `f64` nodes and weights.

use crate::special;

use num::{BigInt, BigRational, Signed, ToPrimitive, Zero};

const MAX_NEWTON_STEPS: usize = 12;

/// Refines float seed roots of the generalized Laguerre polynomial
/// `L_deg^(a)` to `n_digits` decimal digits, and recomputes the
/// quadrature weights from the refined roots. Returns ascending
/// nodes/weights on [0, inf).
pub fn refine_rule(deg: usize, a: f64, seeds: &[f64], n_digits: u32) -> (Vec<f64>, Vec<f64>) {
  let a_exact = BigRational::from_float(a).unwrap_or_else(BigRational::zero);
  // Gamma(deg + a + 1) / deg!, the scale factor of the weight formula.
  let scale = (special::ln_gamma(deg as f64 + a + 1.0) - special::ln_gamma(deg as f64 + 1.0)).exp();

  let mut nodes = Vec::with_capacity(seeds.len());
  let mut weights = Vec::with_capacity(seeds.len());
  for &seed in seeds {
    let root = newton(deg, &a_exact, seed, n_digits);
    let lnp1 = laguerre_value(deg + 1, &a_exact, &root);
    let x = root.to_f64().unwrap_or(seed);
    let denom = ((deg + 1) * (deg + 1)) as f64 * lnp1 * lnp1;
    nodes.push(x);
    weights.push(scale * x / denom);
  }
  (nodes, weights)
}

/// One Newton-Raphson solve in truncated rational arithmetic. Working
/// precision is twice the requested digits; each Newton step roughly
/// doubles the number of correct digits, so a float seed converges in
/// a couple of steps.
fn newton(deg: usize, a: &BigRational, seed: f64, n_digits: u32) -> BigRational {
  let working_digits = 2 * n_digits;
  let tolerance = BigRational::new(BigInt::from(1), pow10(n_digits));
  let mut z = match BigRational::from_float(seed) {
    Some(z) => z,
    None => return BigRational::zero(),
  };
  for _ in 0..MAX_NEWTON_STEPS {
    let (p, p_prev) = laguerre_pair(deg, a, &z);
    // L'_n(x) = (n L_n(x) - (n + a) L_{n-1}(x)) / x
    let n = BigRational::from_integer(BigInt::from(deg));
    let dp = (n.clone() * p.clone() - (n + a.clone()) * p_prev) / z.clone();
    if dp.is_zero() {
      break;
    }
    let step = p / dp;
    z = truncate(&(z - step.clone()), working_digits);
    if step.abs() < tolerance {
      break;
    }
  }
  z
}

/// Evaluates `L_n^(a)` and `L_{n-1}^(a)` at `x` through the three-term
/// recurrence, entirely in rational arithmetic.
fn laguerre_pair(n: usize, a: &BigRational, x: &BigRational) -> (BigRational, BigRational) {
  let one = BigRational::from_integer(BigInt::from(1));
  if n == 0 {
    return (one.clone(), BigRational::zero());
  }
  let mut p_prev = one.clone();
  let mut p_curr = one + a.clone() - x.clone();
  for k in 1..n {
    let kq = BigRational::from_integer(BigInt::from(k));
    let two_k = BigRational::from_integer(BigInt::from(2 * k + 1));
    let p_next = ((two_k + a.clone() - x.clone()) * p_curr.clone()
      - (kq.clone() + a.clone()) * p_prev)
      / (kq + BigRational::from_integer(BigInt::from(1)));
    p_prev = p_curr;
    p_curr = p_next;
  }
  (p_curr, p_prev)
}

fn laguerre_value(n: usize, a: &BigRational, x: &BigRational) -> f64 {
  laguerre_pair(n, a, x).0.to_f64().unwrap_or(f64::NAN)
}

/// Rounds a rational to `digits` decimal digits, keeping numerator and
/// denominator from growing without bound across Newton steps.
fn truncate(x: &BigRational, digits: u32) -> BigRational {
  let scale = pow10(digits);
  let scaled = (x * BigRational::from_integer(scale.clone())).round();
  BigRational::new(scaled.to_integer(), scale)
}

fn pow10(digits: u32) -> BigInt {
  num::pow::pow(BigInt::from(10), digits as usize)
}

#[cfg(test)]
mod tests {
  use super::*;
  use approx::assert_abs_diff_eq;

  #[test]
  fn test_truncate() {
    let third = BigRational::new(BigInt::from(1), BigInt::from(3));
    let rounded = truncate(&third, 4);
    assert_eq!(rounded, BigRational::new(BigInt::from(3333), BigInt::from(10000)));
  }

  #[test]
  fn test_refine_deg2_closed_form() {
    // For a = 0 and deg 2 the roots are 2 -+ sqrt(2) and the weights
    // are (2 +- sqrt(2))/4.
    let seeds = [0.59, 3.41];
    let (nodes, weights) = refine_rule(2, 0.0, &seeds, 30);
    let sqrt2 = 2.0_f64.sqrt();
    assert_abs_diff_eq!(nodes[0], 2.0 - sqrt2, epsilon = 1e-14);
    assert_abs_diff_eq!(nodes[1], 2.0 + sqrt2, epsilon = 1e-14);
    assert_abs_diff_eq!(weights[0], (2.0 + sqrt2) / 4.0, epsilon = 1e-13);
    assert_abs_diff_eq!(weights[1], (2.0 - sqrt2) / 4.0, epsilon = 1e-13);
  }

  #[test]
  fn test_newton_fixes_perturbed_seed() {
    // A deliberately sloppy seed still converges to the small root of
    // L_2 (2 - sqrt(2) ~ 0.5858).
    let root = newton(2, &BigRational::zero(), 0.52, 30);
    assert_abs_diff_eq!(root.to_f64().unwrap(), 2.0 - 2.0_f64.sqrt(), epsilon = 1e-14);
  }
}
