
//! Composite hybrid rules.
//!
//! The domain is split at a configurable fraction: a composite
//! Gauss-Legendre rule covers the smooth majority of the interval and
//! a singularity-aware rule (Gauss-Laguerre or the exact-kernel
//! Riemann sum) covers the tail adjacent to the singular upper bound.
//! Both sub-rules share the fractional order, and the smooth sub-rule
//! weights its nodes against the singular endpoint of the whole
//! domain, not its own upper bound.

use super::laguerre::{self, GaussLaguerre};
use super::legendre::{self, GaussLegendre};
use super::riemann::{self, RiemannSum};
use super::{check_alpha, check_interval, QuadratureError, QuadratureRule};
use crate::integrand::Integrand;

pub const DEFAULT_PERCENT: f64 = 0.9;

fn check_percent(percent: f64) -> Result<(), QuadratureError> {
  if percent > 0.0 && percent < 1.0 {
    Ok(())
  } else {
    Err(QuadratureError::InvalidParameter {
      parameter: "percent",
      message: format!("split fraction must lie strictly inside (0, 1), got {percent}"),
    })
  }
}

/// Gauss-Legendre on the smooth region, Gauss-Laguerre on the tail.
#[derive(Debug)]
pub struct GaussLegendreGaussLaguerre {
  pub gleg: GaussLegendre,
  pub glag: GaussLaguerre,
  alpha: f64,
  lower: f64,
  upper: f64,
  percent: f64,
  ndom: usize,
  deg: usize,
  tail_deg: usize,
  extend_precision: bool,
  n_digits: u32,
  f: Option<Integrand>,
  description: &'static str,
}

impl GaussLegendreGaussLaguerre {
  pub fn new(lower: f64, upper: f64) -> Result<Self, QuadratureError> {
    check_interval(lower, upper)?;
    let mut rule = Self {
      // Placeholder sub-rules, replaced by the rebuild below.
      gleg: GaussLegendre::new(1, 1, lower, upper)?,
      glag: GaussLaguerre::new(1, lower, upper)?,
      alpha: 0.0,
      lower,
      upper,
      percent: DEFAULT_PERCENT,
      ndom: legendre::DEFAULT_NDOM,
      deg: legendre::DEFAULT_DEG,
      tail_deg: laguerre::DEFAULT_DEG,
      extend_precision: true,
      n_digits: laguerre::DEFAULT_DIGITS,
      f: None,
      description: "Hybrid: Gauss-Legendre, Gauss-Laguerre",
    };
    rule.rebuild()?;
    Ok(rule)
  }

  pub fn with_percent(mut self, percent: f64) -> Result<Self, QuadratureError> {
    check_percent(percent)?;
    self.percent = percent;
    self.rebuild()?;
    Ok(self)
  }

  pub fn with_alpha(mut self, alpha: f64) -> Result<Self, QuadratureError> {
    self.update_weights(alpha)?;
    Ok(self)
  }

  pub fn with_integrand(mut self, f: Integrand) -> Self {
    self.f = Some(f);
    self
  }

  pub fn with_extend_precision(mut self, extend_precision: bool) -> Result<Self, QuadratureError> {
    self.extend_precision = extend_precision;
    self.rebuild()?;
    Ok(self)
  }

  pub fn with_n_digits(mut self, n_digits: u32) -> Result<Self, QuadratureError> {
    self.n_digits = n_digits;
    self.rebuild()?;
    Ok(self)
  }

  /// Overrides the default subdomain count and degrees of the two
  /// sub-rules.
  pub fn with_resolution(
    mut self,
    ndom: usize,
    deg: usize,
    tail_deg: usize,
  ) -> Result<Self, QuadratureError> {
    self.ndom = ndom;
    self.deg = deg;
    self.tail_deg = tail_deg;
    self.rebuild()?;
    Ok(self)
  }

  pub fn alpha(&self) -> f64 {
    self.alpha
  }

  pub fn percent(&self) -> f64 {
    self.percent
  }

  /// The shared bound between the two sub-rules.
  pub fn split_point(&self) -> f64 {
    self.lower + self.percent * (self.upper - self.lower)
  }

  pub fn description(&self) -> &str {
    self.description
  }

  fn rebuild(&mut self) -> Result<(), QuadratureError> {
    let split = self.split_point();
    self.gleg = GaussLegendre::new(self.ndom, self.deg, self.lower, split)?
      .with_singular_point(self.upper)?
      .with_alpha(self.alpha)?;
    self.glag = GaussLaguerre::new(self.tail_deg, split, self.upper)?
      .with_extend_precision(self.extend_precision)
      .with_n_digits(self.n_digits)?
      .with_alpha(self.alpha)?;
    Ok(())
  }

  /// Propagates the fractional order to both sub-rules. The shared
  /// split bound is re-asserted: the smooth sub-rule ends exactly
  /// where the tail sub-rule begins.
  pub fn update_weights(&mut self, alpha: f64) -> Result<(), QuadratureError> {
    check_alpha(alpha)?;
    self.alpha = alpha;
    self.gleg.update_weights(alpha)?;
    self.glag.update_weights(alpha)?;
    debug_assert_eq!(self.gleg.upper(), self.glag.lower());
    Ok(())
  }

  /// The two partial integrals (smooth region, singular tail).
  pub fn partial_integrals(&self, f: Option<&Integrand>) -> Result<(f64, f64), crate::error::Error> {
    let g = f.or(self.f.as_ref()).ok_or_else(|| QuadratureError::MissingIntegrand {
      description: self.description.to_string(),
    })?;
    Ok((self.gleg.integrate(Some(g))?, self.glag.integrate(Some(g))?))
  }

  /// Total integral over the whole domain, either integrand
  /// representation; always a plain float.
  pub fn integrate(&self, f: Option<&Integrand>) -> Result<f64, crate::error::Error> {
    let (i1, i2) = self.partial_integrals(f)?;
    Ok(i1 + i2)
  }

  /// Surrenders the two sub-rules, e.g. for diagnostic retention.
  pub fn into_parts(self) -> (GaussLegendre, GaussLaguerre) {
    (self.gleg, self.glag)
  }
}

/// Gauss-Legendre on the smooth region, exact-kernel Riemann sum on
/// the tail.
#[derive(Debug)]
pub struct GaussLegendreRiemannSum {
  pub gleg: GaussLegendre,
  pub rs: RiemannSum,
  alpha: f64,
  lower: f64,
  upper: f64,
  percent: f64,
  ndom: usize,
  deg: usize,
  nrs: usize,
  f: Option<Integrand>,
  description: &'static str,
}

impl GaussLegendreRiemannSum {
  pub fn new(lower: f64, upper: f64) -> Result<Self, QuadratureError> {
    check_interval(lower, upper)?;
    let mut rule = Self {
      gleg: GaussLegendre::new(1, 1, lower, upper)?,
      rs: RiemannSum::new(2, lower, upper)?,
      alpha: 0.0,
      lower,
      upper,
      percent: DEFAULT_PERCENT,
      ndom: legendre::DEFAULT_NDOM,
      deg: legendre::DEFAULT_DEG,
      nrs: riemann::DEFAULT_N,
      f: None,
      description: "Hybrid: Gauss-Legendre, Riemann-Sum",
    };
    rule.rebuild()?;
    Ok(rule)
  }

  pub fn with_percent(mut self, percent: f64) -> Result<Self, QuadratureError> {
    check_percent(percent)?;
    self.percent = percent;
    self.rebuild()?;
    Ok(self)
  }

  pub fn with_alpha(mut self, alpha: f64) -> Result<Self, QuadratureError> {
    self.update_weights(alpha)?;
    Ok(self)
  }

  pub fn with_integrand(mut self, f: Integrand) -> Self {
    self.f = Some(f);
    self
  }

  /// Overrides the default subdomain count, degree, and tail sample
  /// count.
  pub fn with_resolution(
    mut self,
    ndom: usize,
    deg: usize,
    nrs: usize,
  ) -> Result<Self, QuadratureError> {
    self.ndom = ndom;
    self.deg = deg;
    self.nrs = nrs;
    self.rebuild()?;
    Ok(self)
  }

  pub fn alpha(&self) -> f64 {
    self.alpha
  }

  pub fn percent(&self) -> f64 {
    self.percent
  }

  pub fn split_point(&self) -> f64 {
    self.lower + self.percent * (self.upper - self.lower)
  }

  pub fn description(&self) -> &str {
    self.description
  }

  fn rebuild(&mut self) -> Result<(), QuadratureError> {
    let split = self.split_point();
    self.gleg = GaussLegendre::new(self.ndom, self.deg, self.lower, split)?
      .with_singular_point(self.upper)?
      .with_alpha(self.alpha)?;
    self.rs = RiemannSum::new(self.nrs, split, self.upper)?.with_alpha(self.alpha)?;
    Ok(())
  }

  pub fn update_weights(&mut self, alpha: f64) -> Result<(), QuadratureError> {
    check_alpha(alpha)?;
    self.alpha = alpha;
    self.gleg.update_weights(alpha)?;
    self.rs.update_weights(alpha)?;
    debug_assert_eq!(self.gleg.upper(), self.rs.lower());
    Ok(())
  }

  pub fn partial_integrals(&self, f: Option<&Integrand>) -> Result<(f64, f64), crate::error::Error> {
    let g = f.or(self.f.as_ref()).ok_or_else(|| QuadratureError::MissingIntegrand {
      description: self.description.to_string(),
    })?;
    Ok((self.gleg.integrate(Some(g))?, self.rs.integrate(Some(g))?))
  }

  pub fn integrate(&self, f: Option<&Integrand>) -> Result<f64, crate::error::Error> {
    let (i1, i2) = self.partial_integrals(f)?;
    Ok(i1 + i2)
  }

  pub fn into_parts(self) -> (GaussLegendre, RiemannSum) {
    (self.gleg, self.rs)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use approx::assert_abs_diff_eq;

  #[test]
  fn test_split_bound_is_shared() {
    let mut q = GaussLegendreGaussLaguerre::new(1.0, 12.0).unwrap();
    assert_abs_diff_eq!(q.gleg.upper(), 10.9, epsilon = 1e-12);
    assert_abs_diff_eq!(q.glag.lower(), 10.9, epsilon = 1e-12);
    assert_eq!(q.gleg.lower(), 1.0);
    assert_eq!(q.glag.upper(), 12.0);
    // No gap and no overlap, before and after a weight update.
    assert_eq!(q.gleg.upper(), q.glag.lower());
    q.update_weights(0.5).unwrap();
    assert_eq!(q.gleg.upper(), q.glag.lower());
    assert_eq!(q.alpha(), 0.5);
    assert_eq!(q.gleg.alpha(), 0.5);
    assert_eq!(q.glag.alpha(), 0.5);
  }

  #[test]
  fn test_split_bound_is_shared_for_riemann_tail() {
    let mut q = GaussLegendreRiemannSum::new(1.0, 12.0).unwrap();
    assert_abs_diff_eq!(q.gleg.upper(), 10.9, epsilon = 1e-12);
    assert_abs_diff_eq!(q.rs.lower(), 10.9, epsilon = 1e-12);
    q.update_weights(0.5).unwrap();
    assert_eq!(q.gleg.upper(), q.rs.lower());
  }

  #[test]
  fn test_smooth_subrule_sees_the_global_singularity() {
    let q = GaussLegendreRiemannSum::new(1.0, 12.0).unwrap();
    assert_eq!(q.gleg.singular_point(), 12.0);
  }

  #[test]
  fn test_subrule_sizes_follow_resolution() {
    let q = GaussLegendreRiemannSum::new(0.0, 1.0)
      .unwrap()
      .with_resolution(4, 6, 21)
      .unwrap();
    assert_eq!(q.gleg.points().len(), 24);
    assert_eq!(q.rs.points().len(), 20);
  }

  #[test]
  fn test_ordinary_integral_gleg_rs() {
    let q = GaussLegendreRiemannSum::new(0.0, 1.0)
      .unwrap()
      .with_resolution(10, 6, 501)
      .unwrap()
      .with_integrand(Integrand::from_fn(|t| (2.0 * t).exp()));
    let expected = (2.0_f64.exp() - 1.0) / 2.0;
    assert_abs_diff_eq!(q.integrate(None).unwrap(), expected, epsilon = 1e-6);
  }

  #[test]
  fn test_ordinary_integral_gleg_glag() {
    let q = GaussLegendreGaussLaguerre::new(0.0, 1.0)
      .unwrap()
      .with_resolution(10, 6, 20)
      .unwrap();
    let f = Integrand::from_fn(|t| (2.0 * t).exp());
    let expected = (2.0_f64.exp() - 1.0) / 2.0;
    assert_abs_diff_eq!(q.integrate(Some(&f)).unwrap(), expected, epsilon = 1e-4);
  }

  #[test]
  fn test_partial_integrals_sum_to_total() {
    let f = Integrand::from_fn(|t| t * t);
    let q = GaussLegendreRiemannSum::new(0.0, 2.0).unwrap();
    let (i1, i2) = q.partial_integrals(Some(&f)).unwrap();
    assert_abs_diff_eq!(i1 + i2, q.integrate(Some(&f)).unwrap(), epsilon = 1e-14);
    assert!(i1 > 0.0 && i2 > 0.0);
  }

  #[test]
  fn test_invalid_percent() {
    assert!(GaussLegendreRiemannSum::new(0.0, 1.0).unwrap().with_percent(0.0).is_err());
    assert!(GaussLegendreRiemannSum::new(0.0, 1.0).unwrap().with_percent(1.0).is_err());
    assert!(GaussLegendreGaussLaguerre::new(0.0, 1.0).unwrap().with_percent(1.5).is_err());
  }

  #[test]
  fn test_missing_integrand() {
    let q = GaussLegendreGaussLaguerre::new(0.0, 1.0).unwrap();
    assert!(matches!(
      q.integrate(None).unwrap_err(),
      crate::error::Error::QuadratureError(QuadratureError::MissingIntegrand { .. }),
    ));
  }
}
