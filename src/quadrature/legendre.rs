
//! Composite Gauss-Legendre quadrature.
//!
//! The canonical rule on [-1, 1] is tiled over `ndom` equal
//! subdomains of the integration interval; the fractional kernel is
//! folded into the weights on demand by `update_weights`. This is the
//! workhorse for the smooth part of the domain, away from the
//! singular endpoint.

use super::{check_alpha, check_interval, check_positive, weighted_sum, QuadratureError, QuadratureRule};
use crate::integrand::Integrand;

use itertools::Itertools;

pub const DEFAULT_NDOM: usize = 5;
pub const DEFAULT_DEG: usize = 5;

/// Canonical Gauss-Legendre nodes and weights on [-1, 1], ascending.
/// Degrees 1 through 10 use tabulated values; higher degrees fall back
/// to Newton-Raphson on the Legendre recurrence.
fn reference_rule(deg: usize) -> Result<(Vec<f64>, Vec<f64>), QuadratureError> {
  check_positive("deg", deg)?;
  let (nodes, weights): (Vec<f64>, Vec<f64>) = match deg {
    1 => (vec![0.0], vec![2.0]),
    2 => (
      vec![-0.5773502691896257, 0.5773502691896257],
      vec![1.0, 1.0],
    ),
    3 => (
      vec![-0.7745966692414834, 0.0, 0.7745966692414834],
      vec![5.0 / 9.0, 8.0 / 9.0, 5.0 / 9.0],
    ),
    4 => (
      vec![
        -0.8611363115940526,
        -0.3399810435848563,
        0.3399810435848563,
        0.8611363115940526,
      ],
      vec![
        0.3478548451374538,
        0.6521451548625461,
        0.6521451548625461,
        0.3478548451374538,
      ],
    ),
    5 => (
      vec![
        -0.9061798459386640,
        -0.5384693101056831,
        0.0,
        0.5384693101056831,
        0.9061798459386640,
      ],
      vec![
        0.2369268850561891,
        0.4786286704993665,
        0.5688888888888889,
        0.4786286704993665,
        0.2369268850561891,
      ],
    ),
    6 => (
      vec![
        -0.9324695142031521,
        -0.6612093864662645,
        -0.2386191860831969,
        0.2386191860831969,
        0.6612093864662645,
        0.9324695142031521,
      ],
      vec![
        0.1713244923791704,
        0.3607615730481386,
        0.4679139345726910,
        0.4679139345726910,
        0.3607615730481386,
        0.1713244923791704,
      ],
    ),
    7 => (
      vec![
        -0.9491079123427585,
        -0.7415311855993945,
        -0.4058451513773972,
        0.0,
        0.4058451513773972,
        0.7415311855993945,
        0.9491079123427585,
      ],
      vec![
        0.1294849661688697,
        0.2797053914892766,
        0.3818300505051189,
        0.4179591836734694,
        0.3818300505051189,
        0.2797053914892766,
        0.1294849661688697,
      ],
    ),
    8 => (
      vec![
        -0.9602898564975363,
        -0.7966664774136267,
        -0.5255324099163290,
        -0.1834346424956498,
        0.1834346424956498,
        0.5255324099163290,
        0.7966664774136267,
        0.9602898564975363,
      ],
      vec![
        0.1012285362903763,
        0.2223810344533745,
        0.3137066458778873,
        0.3626837833783620,
        0.3626837833783620,
        0.3137066458778873,
        0.2223810344533745,
        0.1012285362903763,
      ],
    ),
    9 => (
      vec![
        -0.9681602395076261,
        -0.8360311073266358,
        -0.6133714327005904,
        -0.3242534234038089,
        0.0,
        0.3242534234038089,
        0.6133714327005904,
        0.8360311073266358,
        0.9681602395076261,
      ],
      vec![
        0.0812743883615744,
        0.1806481606948574,
        0.2606106964029354,
        0.3123470770400029,
        0.3302393550012598,
        0.3123470770400029,
        0.2606106964029354,
        0.1806481606948574,
        0.0812743883615744,
      ],
    ),
    10 => (
      vec![
        -0.9739065285171717,
        -0.8650633666889845,
        -0.6794095682990244,
        -0.4333953941292472,
        -0.1488743389816312,
        0.1488743389816312,
        0.4333953941292472,
        0.6794095682990244,
        0.8650633666889845,
        0.9739065285171717,
      ],
      vec![
        0.0666713443086881,
        0.1494513491505806,
        0.2190863625159820,
        0.2692667193099963,
        0.2955242247147529,
        0.2955242247147529,
        0.2692667193099963,
        0.2190863625159820,
        0.1494513491505806,
        0.0666713443086881,
      ],
    ),
    _ => computed_reference_rule(deg),
  };
  Ok((nodes, weights))
}

/// Evaluate the Legendre polynomial P_n(x) and its derivative via the
/// three-term recurrence.
fn legendre_eval(n: usize, x: f64) -> (f64, f64) {
  if n == 0 {
    return (1.0, 0.0);
  }
  let mut p_prev = 1.0;
  let mut p_curr = x;
  let mut dp_prev = 0.0;
  let mut dp_curr = 1.0;
  for k in 1..n {
    let kf = k as f64;
    let p_next = ((2.0 * kf + 1.0) * x * p_curr - kf * p_prev) / (kf + 1.0);
    let dp_next = ((2.0 * kf + 1.0) * (p_curr + x * dp_curr) - kf * dp_prev) / (kf + 1.0);
    p_prev = p_curr;
    p_curr = p_next;
    dp_prev = dp_curr;
    dp_curr = dp_next;
  }
  (p_curr, dp_curr)
}

/// Newton-Raphson root-finding on P_n with Chebyshev initial guesses,
/// exploiting the symmetry of the node set.
fn computed_reference_rule(n: usize) -> (Vec<f64>, Vec<f64>) {
  let eps = 1e-15;
  let max_iter = 100;
  let m = n.div_ceil(2);

  let mut pairs = Vec::with_capacity(n);
  for i in 0..m {
    let mut x = ((4 * i + 3) as f64 / (4 * n + 2) as f64 * std::f64::consts::PI).cos();
    for _ in 0..max_iter {
      let (p, dp) = legendre_eval(n, x);
      let dx = p / dp;
      x -= dx;
      if dx.abs() < eps {
        break;
      }
    }
    let (_, dp) = legendre_eval(n, x);
    let w = 2.0 / ((1.0 - x * x) * dp * dp);
    pairs.push((x, w));
    if i != n - 1 - i {
      pairs.push((-x, w));
    }
  }
  pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
  pairs.into_iter().unzip()
}

/// Composite Gauss-Legendre rule over [lower, upper].
#[derive(Debug, Clone)]
pub struct GaussLegendre {
  points: Vec<f64>,
  weights: Vec<f64>,
  initial_weights: Vec<f64>,
  alpha: f64,
  lower: f64,
  upper: f64,
  singular_point: f64,
  f: Option<Integrand>,
  description: &'static str,
}

impl GaussLegendre {
  /// Builds the composite rule: `ndom` subdomains, `deg` nodes per
  /// subdomain, with the ordinary (alpha = 0) weights.
  pub fn new(ndom: usize, deg: usize, lower: f64, upper: f64) -> Result<Self, QuadratureError> {
    check_interval(lower, upper)?;
    check_positive("ndom", ndom)?;
    let h = (upper - lower) / ndom as f64;
    let points = Self::gauss_points(ndom, deg, h, lower)?;
    let initial_weights = Self::gauss_weights(ndom, deg, h)?;
    Ok(Self {
      points,
      weights: initial_weights.clone(),
      initial_weights,
      alpha: 0.0,
      lower,
      upper,
      singular_point: upper,
      f: None,
      description: "Gauss-Legendre",
    })
  }

  pub fn with_alpha(mut self, alpha: f64) -> Result<Self, QuadratureError> {
    self.recompute_weights(alpha)?;
    Ok(self)
  }

  pub fn with_integrand(mut self, f: Integrand) -> Self {
    self.f = Some(f);
    self
  }

  /// Overrides the kernel reference point. A standalone rule is
  /// singular at its own upper bound, but inside a hybrid rule the
  /// smooth sub-rule must weight its nodes against the singular
  /// endpoint of the *whole* domain.
  pub fn with_singular_point(mut self, singular_point: f64) -> Result<Self, QuadratureError> {
    if singular_point < self.upper {
      return Err(QuadratureError::InvalidParameter {
        parameter: "singular_point",
        message: format!(
          "kernel reference {singular_point} must not lie inside the domain ending at {}",
          self.upper,
        ),
      });
    }
    self.singular_point = singular_point;
    self.recompute_weights(self.alpha)?;
    Ok(self)
  }

  pub fn singular_point(&self) -> f64 {
    self.singular_point
  }

  pub fn initial_weights(&self) -> &[f64] {
    &self.initial_weights
  }

  /// Canonical nodes for the requested degree, mapped to [0, 1].
  pub fn base_gauss_points(deg: usize) -> Result<Vec<f64>, QuadratureError> {
    let (nodes, _) = reference_rule(deg)?;
    Ok(nodes.into_iter().map(|x| (x + 1.0) / 2.0).collect())
  }

  /// Canonical weights for the requested degree, scaled to a
  /// subdomain of width `h`.
  pub fn base_gauss_weights(deg: usize, h: f64) -> Result<Vec<f64>, QuadratureError> {
    let (_, weights) = reference_rule(deg)?;
    Ok(weights.into_iter().map(|w| w * h / 2.0).collect())
  }

  /// The full flattened node sequence: `ndom * deg` nodes, subdomain
  /// by subdomain.
  pub fn gauss_points(
    ndom: usize,
    deg: usize,
    h: f64,
    lower: f64,
  ) -> Result<Vec<f64>, QuadratureError> {
    check_positive("ndom", ndom)?;
    let base = Self::base_gauss_points(deg)?;
    Ok(
      (0..ndom)
        .cartesian_product(base)
        .map(|(i, p)| lower + h * (i as f64 + p))
        .collect(),
    )
  }

  /// The full flattened weight sequence, parallel to `gauss_points`.
  pub fn gauss_weights(ndom: usize, deg: usize, h: f64) -> Result<Vec<f64>, QuadratureError> {
    check_positive("ndom", ndom)?;
    let base = Self::base_gauss_weights(deg, h)?;
    Ok(base.repeat(ndom))
  }

  fn recompute_weights(&mut self, alpha: f64) -> Result<(), QuadratureError> {
    check_alpha(alpha)?;
    self.alpha = alpha;
    self.weights = if alpha == 0.0 {
      self.initial_weights.clone()
    } else {
      self
        .initial_weights
        .iter()
        .zip(&self.points)
        .map(|(w, t)| w * (self.singular_point - t).powf(-alpha))
        .collect()
    };
    Ok(())
  }
}

impl QuadratureRule for GaussLegendre {
  fn points(&self) -> &[f64] {
    &self.points
  }

  fn weights(&self) -> &[f64] {
    &self.weights
  }

  fn alpha(&self) -> f64 {
    self.alpha
  }

  fn lower(&self) -> f64 {
    self.lower
  }

  fn upper(&self) -> f64 {
    self.upper
  }

  fn singularity(&self) -> bool {
    false
  }

  fn description(&self) -> &str {
    self.description
  }

  fn update_weights(&mut self, alpha: f64) -> Result<(), QuadratureError> {
    self.recompute_weights(alpha)
  }

  fn integrate(&self, f: Option<&Integrand>) -> Result<f64, crate::error::Error> {
    weighted_sum(&self.points, &self.weights, self.f.as_ref(), f, self.description)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use approx::assert_abs_diff_eq;

  #[test]
  fn test_base_gauss_points_deg4() {
    let expected = [
      0.069431844202974,
      0.330009478207572,
      0.669990521792428,
      0.930568155797026,
    ];
    let got = GaussLegendre::base_gauss_points(4).unwrap();
    assert_eq!(got.len(), 4);
    for (g, e) in got.iter().zip(&expected) {
      assert_abs_diff_eq!(g, e, epsilon = 1e-12);
    }
  }

  #[test]
  fn test_base_gauss_weights_deg4() {
    let expected = [
      0.017392742256873,
      0.032607257743127,
      0.032607257743127,
      0.017392742256873,
    ];
    let got = GaussLegendre::base_gauss_weights(4, 0.1).unwrap();
    assert_eq!(got.len(), 4);
    for (g, e) in got.iter().zip(&expected) {
      assert_abs_diff_eq!(g, e, epsilon = 1e-12);
    }
  }

  #[test]
  fn test_composite_counts() {
    for &(ndom, deg) in &[(4, 4), (10, 6), (1, 3), (7, 12)] {
      let rule = GaussLegendre::new(ndom, deg, 1.0, 12.0).unwrap();
      assert_eq!(rule.points().len(), ndom * deg);
      assert_eq!(rule.weights().len(), ndom * deg);
    }
  }

  #[test]
  fn test_composite_points_are_increasing_and_interior() {
    let rule = GaussLegendre::new(6, 5, 1.0, 12.0).unwrap();
    let points = rule.points();
    for pair in points.windows(2) {
      assert!(pair[0] < pair[1]);
    }
    assert!(points[0] > 1.0);
    assert!(*points.last().unwrap() < 12.0);
  }

  #[test]
  fn test_ordinary_integral() {
    // exp(2t) over [0, 1] integrates to (e^2 - 1)/2.
    let rule = GaussLegendre::new(10, 6, 0.0, 1.0).unwrap();
    let f = Integrand::from_fn(|t| (2.0 * t).exp());
    let got = rule.integrate(Some(&f)).unwrap();
    let expected = (2.0_f64.exp() - 1.0) / 2.0;
    assert_abs_diff_eq!(got, expected, epsilon = 1e-10);
  }

  #[test]
  fn test_update_weights_applies_kernel() {
    let mut rule = GaussLegendre::new(3, 4, 0.0, 1.0).unwrap();
    rule.update_weights(0.5).unwrap();
    assert_eq!(rule.alpha(), 0.5);
    for ((w, w0), t) in rule.weights().iter().zip(rule.initial_weights()).zip(rule.points()) {
      assert_abs_diff_eq!(w, &(w0 * (1.0 - t).powf(-0.5)), epsilon = 1e-14);
    }
  }

  #[test]
  fn test_update_weights_does_not_compound() {
    // Going to alpha = 0.5 and back to 0 restores the plain weights.
    let mut rule = GaussLegendre::new(3, 4, 0.0, 1.0).unwrap();
    let plain = rule.weights().to_vec();
    rule.update_weights(0.5).unwrap();
    rule.update_weights(0.0).unwrap();
    assert_eq!(rule.weights(), &plain[..]);
  }

  #[test]
  fn test_newton_fallback_reference_rule() {
    let (nodes, weights) = reference_rule(15).unwrap();
    assert_eq!(nodes.len(), 15);
    assert_abs_diff_eq!(weights.iter().sum::<f64>(), 2.0, epsilon = 1e-12);
    for i in 0..7 {
      assert_abs_diff_eq!(nodes[i], -nodes[14 - i], epsilon = 1e-12);
      assert_abs_diff_eq!(weights[i], weights[14 - i], epsilon = 1e-12);
    }
  }

  #[test]
  fn test_invalid_configuration() {
    assert!(GaussLegendre::new(0, 4, 0.0, 1.0).is_err());
    assert!(GaussLegendre::new(4, 0, 0.0, 1.0).is_err());
    assert!(GaussLegendre::new(4, 4, 1.0, 1.0).is_err());
    assert!(GaussLegendre::new(4, 4, 0.0, 1.0).unwrap().with_alpha(1.0).is_err());
  }

  #[test]
  fn test_missing_integrand() {
    let rule = GaussLegendre::new(4, 4, 0.0, 1.0).unwrap();
    let err = rule.integrate(None).unwrap_err();
    assert!(matches!(
      err,
      crate::error::Error::QuadratureError(QuadratureError::MissingIntegrand { .. }),
    ));
  }
}
