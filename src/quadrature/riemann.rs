
//! Midpoint Riemann sum with analytically exact kernel weights.
//!
//! The weight of each cell is the exact antiderivative of the
//! fractional kernel over that cell, so the only approximation error
//! left is the midpoint sampling of `f` itself. That makes this the
//! cheap singularity-exact rule for the tail next to the upper bound.

use super::{check_alpha, check_interval, weighted_sum, QuadratureError, QuadratureRule};
use crate::integrand::Integrand;

pub const DEFAULT_N: usize = 50;

/// Midpoint rule over [lower, upper] with `n` grid samples (n - 1
/// cells).
#[derive(Debug, Clone)]
pub struct RiemannSum {
  grid: Vec<f64>,
  points: Vec<f64>,
  weights: Vec<f64>,
  alpha: f64,
  lower: f64,
  upper: f64,
  f: Option<Integrand>,
  description: &'static str,
}

impl RiemannSum {
  pub fn new(n: usize, lower: f64, upper: f64) -> Result<Self, QuadratureError> {
    check_interval(lower, upper)?;
    if n < 2 {
      return Err(QuadratureError::InvalidParameter {
        parameter: "n",
        message: String::from("need at least 2 grid samples for one cell"),
      });
    }
    let grid = Self::grid(lower, upper, n);
    let points = grid.windows(2).map(|cell| (cell[0] + cell[1]) / 2.0).collect();
    let mut rule = Self {
      grid,
      points,
      weights: Vec::new(),
      alpha: 0.0,
      lower,
      upper,
      f: None,
      description: "Riemann-Sum",
    };
    rule.recompute_weights(0.0)?;
    Ok(rule)
  }

  pub fn with_alpha(mut self, alpha: f64) -> Result<Self, QuadratureError> {
    self.recompute_weights(alpha)?;
    Ok(self)
  }

  pub fn with_integrand(mut self, f: Integrand) -> Self {
    self.f = Some(f);
    self
  }

  /// `n` evenly spaced samples from `lower` to `upper` inclusive.
  pub fn grid(lower: f64, upper: f64, n: usize) -> Vec<f64> {
    let span = upper - lower;
    (0..n)
      .map(|k| {
        if k == n - 1 {
          // Pin the endpoint so the last cell's kernel weight sees an
          // exact zero distance to the singularity.
          upper
        } else {
          lower + span * k as f64 / (n - 1) as f64
        }
      })
      .collect()
  }

  pub fn grid_points(&self) -> &[f64] {
    &self.grid
  }

  /// Exact closed-form weights: minus the antiderivative of
  /// `(upper - t)^(-alpha)` evaluated across each cell. At alpha = 0
  /// this is just the cell width.
  fn recompute_weights(&mut self, alpha: f64) -> Result<(), QuadratureError> {
    check_alpha(alpha)?;
    self.alpha = alpha;
    let upper = self.upper;
    self.weights = self
      .grid
      .windows(2)
      .map(|cell| {
        -1.0 / (1.0 - alpha)
          * ((upper - cell[1]).powf(1.0 - alpha) - (upper - cell[0]).powf(1.0 - alpha))
      })
      .collect();
    Ok(())
  }
}

impl QuadratureRule for RiemannSum {
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
    true
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
