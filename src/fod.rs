
//! Fractional-order derivative formulas.
//!
//! Each formula selects one of the quadrature rules, drives it over
//! [lower, upper] with the requested order, and returns the scalar
//! result together with the intermediate integrals and the rules that
//! produced them, retained for inspection.

use crate::error::Error;
use crate::integrand::Integrand;
use crate::quadrature::{
  hybrid, laguerre, legendre, riemann, GaussLaguerre, GaussLegendre,
  GaussLegendreGaussLaguerre, GaussLegendreRiemannSum, QuadratureError, QuadratureRule,
  RiemannSum,
};
use crate::special;

use num::{BigInt, BigRational, One, ToPrimitive, Zero};
use phf::phf_map;
use serde::{Deserialize, Serialize};

use std::str::FromStr;

/// Default step count for the Grunwald-Letnikov series.
pub const DEFAULT_GL_STEPS: usize = 100;

/// The closed set of quadrature methods a formula can be driven with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuadratureMethod {
  GaussLegendre,
  GaussLaguerre,
  RiemannSum,
  GaussLegendreGaussLaguerre,
  GaussLegendreRiemannSum,
}

/// Name-to-method dispatch table, fixed at compile time.
static METHOD_NAMES: phf::Map<&'static str, QuadratureMethod> = phf_map! {
  "gleg" => QuadratureMethod::GaussLegendre,
  "glag" => QuadratureMethod::GaussLaguerre,
  "rs" => QuadratureMethod::RiemannSum,
  "gleg+glag" => QuadratureMethod::GaussLegendreGaussLaguerre,
  "gleg+rs" => QuadratureMethod::GaussLegendreRiemannSum,
};

const METHOD_NAME_LIST: &str = "'gleg', 'glag', 'rs', 'gleg+glag', 'gleg+rs'";

impl QuadratureMethod {
  pub fn name(&self) -> &'static str {
    match self {
      QuadratureMethod::GaussLegendre => "gleg",
      QuadratureMethod::GaussLaguerre => "glag",
      QuadratureMethod::RiemannSum => "rs",
      QuadratureMethod::GaussLegendreGaussLaguerre => "gleg+glag",
      QuadratureMethod::GaussLegendreRiemannSum => "gleg+rs",
    }
  }
}

/// An unrecognized method name is a configuration error reported to
/// the caller, never a reason to abort the process.
impl FromStr for QuadratureMethod {
  type Err = QuadratureError;

  fn from_str(name: &str) -> Result<Self, Self::Err> {
    METHOD_NAMES.get(name).copied().ok_or_else(|| QuadratureError::UnknownMethod {
      name: name.to_string(),
      expected: METHOD_NAME_LIST,
    })
  }
}

/// Resolution and method settings shared by the formula entry points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FodSettings {
  /// Quadrature method driven by `riemannliouville` and `caputo`.
  pub method: QuadratureMethod,
  /// Grid samples of a Riemann-sum rule or tail.
  pub nrs: usize,
  /// Subdomain count of a composite Gauss-Legendre rule.
  pub ndom: usize,
  /// Degree per Gauss-Legendre subdomain.
  pub deg: usize,
  /// Degree of a Gauss-Laguerre rule or tail.
  pub glag_deg: usize,
  /// Fraction of the domain given to the smooth sub-rule of a hybrid.
  pub percent: f64,
  /// Extended-precision Laguerre root-finding.
  pub extend_precision: bool,
  /// Decimal digits carried by the extended-precision mode.
  pub n_digits: u32,
}

impl Default for FodSettings {
  fn default() -> Self {
    Self {
      method: QuadratureMethod::GaussLegendreRiemannSum,
      nrs: riemann::DEFAULT_N,
      ndom: legendre::DEFAULT_NDOM,
      deg: legendre::DEFAULT_DEG,
      glag_deg: laguerre::DEFAULT_DEG,
      percent: hybrid::DEFAULT_PERCENT,
      extend_precision: true,
      n_digits: laguerre::DEFAULT_DIGITS,
    }
  }
}

/// Result of a fractional-derivative formula. `fd` is the only field
/// every formula guarantees; the rest are diagnostics retained for
/// inspection and testing.
#[derive(Debug)]
pub struct FodResult {
  /// The derivative/integral value.
  pub fd: f64,
  /// Primary partial integral, before the gamma-function scale.
  pub i1: Option<f64>,
  /// Tail partial integral, populated by hybrid methods only.
  pub i2: Option<f64>,
  /// The primary rule actually used.
  pub q1: Option<Box<dyn QuadratureRule>>,
  /// The tail rule, populated by hybrid methods only.
  pub q2: Option<Box<dyn QuadratureRule>>,
}

/// Riemann-Liouville fractional integral
/// `1/Gamma(1-alpha) * integral of (upper-tau)^(-alpha) f(tau) dtau`
/// for alpha in [0, 1). At alpha = 0 this is the ordinary definite
/// integral of `f`.
pub fn riemannliouville(
  f: Integrand,
  alpha: f64,
  lower: f64,
  upper: f64,
  settings: &FodSettings,
) -> Result<FodResult, Error> {
  let scale = 1.0 / special::gamma(1.0 - alpha);
  match settings.method {
    QuadratureMethod::GaussLegendre => {
      let q = GaussLegendre::new(settings.ndom, settings.deg, lower, upper)?
        .with_alpha(alpha)?
        .with_integrand(f);
      let i1 = q.integrate(None)?;
      Ok(FodResult {
        fd: scale * i1,
        i1: Some(i1),
        i2: None,
        q1: Some(Box::new(q)),
        q2: None,
      })
    }
    QuadratureMethod::GaussLaguerre => {
      let q = GaussLaguerre::new(settings.glag_deg, lower, upper)?
        .with_extend_precision(settings.extend_precision)
        .with_n_digits(settings.n_digits)?
        .with_alpha(alpha)?
        .with_integrand(f);
      let i1 = q.integrate(None)?;
      Ok(FodResult {
        fd: scale * i1,
        i1: Some(i1),
        i2: None,
        q1: Some(Box::new(q)),
        q2: None,
      })
    }
    QuadratureMethod::RiemannSum => {
      let q = RiemannSum::new(settings.nrs, lower, upper)?
        .with_alpha(alpha)?
        .with_integrand(f);
      let i1 = q.integrate(None)?;
      Ok(FodResult {
        fd: scale * i1,
        i1: Some(i1),
        i2: None,
        q1: Some(Box::new(q)),
        q2: None,
      })
    }
    QuadratureMethod::GaussLegendreGaussLaguerre => {
      let q = GaussLegendreGaussLaguerre::new(lower, upper)?
        .with_percent(settings.percent)?
        .with_resolution(settings.ndom, settings.deg, settings.glag_deg)?
        .with_extend_precision(settings.extend_precision)?
        .with_n_digits(settings.n_digits)?
        .with_alpha(alpha)?
        .with_integrand(f);
      let (i1, i2) = q.partial_integrals(None)?;
      let (q1, q2) = q.into_parts();
      Ok(FodResult {
        fd: scale * (i1 + i2),
        i1: Some(i1),
        i2: Some(i2),
        q1: Some(Box::new(q1)),
        q2: Some(Box::new(q2)),
      })
    }
    QuadratureMethod::GaussLegendreRiemannSum => {
      let q = GaussLegendreRiemannSum::new(lower, upper)?
        .with_percent(settings.percent)?
        .with_resolution(settings.ndom, settings.deg, settings.nrs)?
        .with_alpha(alpha)?
        .with_integrand(f);
      let (i1, i2) = q.partial_integrals(None)?;
      let (q1, q2) = q.into_parts();
      Ok(FodResult {
        fd: scale * (i1 + i2),
        i1: Some(i1),
        i2: Some(i2),
        q1: Some(Box::new(q1)),
        q2: Some(Box::new(q2)),
      })
    }
  }
}

/// Caputo fractional derivative: the same kernel integrated against
/// the derivative of `f`. Symbolic integrands are differentiated
/// exactly; numeric integrands fall back to central differencing. At
/// alpha = 0 this telescopes to `f(upper) - f(lower)`.
pub fn caputo(
  f: Integrand,
  alpha: f64,
  lower: f64,
  upper: f64,
  settings: &FodSettings,
) -> Result<FodResult, Error> {
  let df = f.differentiate()?;
  let out = riemannliouville(df, alpha, lower, upper, settings)?;
  let i1 = match (out.i1, out.i2) {
    (Some(a), Some(b)) => Some(a + b),
    (a, _) => a,
  };
  Ok(FodResult {
    fd: out.fd,
    i1,
    i2: None,
    q1: out.q1,
    q2: None,
  })
}

/// Grunwald-Letnikov fractional derivative at `upper`:
///
///   fd ~ h^(-alpha) * sum over k of (-1)^k C(alpha, k) f(upper - k h)
///
/// with h = (upper - lower)/n. The signed binomial coefficients are
/// computed with exact rational arithmetic through the recurrence
/// `c_k = c_{k-1} (k - 1 - alpha)/k`, and the whole alternating sum is
/// accumulated exactly; naive float binomials cancel catastrophically
/// at large k. The sum is cast to a float only at the very end. At
/// alpha = 0 the series collapses to `f(upper)`.
pub fn grunwaldletnikov(
  f: Integrand,
  alpha: f64,
  lower: f64,
  upper: f64,
  n: usize,
) -> Result<FodResult, Error> {
  crate::quadrature::check_alpha(alpha)?;
  crate::quadrature::check_interval(lower, upper)?;
  crate::quadrature::check_positive("n", n)?;

  let h = (upper - lower) / n as f64;
  let points: Vec<f64> = (0..=n).map(|k| upper - k as f64 * h).collect();
  let values = f.evaluate(&points)?;

  let alpha_exact = exact(alpha, "alpha")?;
  let mut coeff = BigRational::one();
  let mut acc = BigRational::zero();
  for (k, &value) in values.iter().enumerate() {
    if k > 0 {
      let kq = BigRational::from_integer(BigInt::from(k));
      coeff = coeff * (kq.clone() - BigRational::one() - alpha_exact.clone()) / kq;
    }
    acc += coeff.clone() * exact(value, "f")?;
  }

  let fd = acc.to_f64().unwrap_or(f64::NAN) * h.powf(-alpha);
  Ok(FodResult {
    fd,
    i1: None,
    i2: None,
    q1: None,
    q2: None,
  })
}

fn exact(value: f64, parameter: &'static str) -> Result<BigRational, QuadratureError> {
  BigRational::from_float(value).ok_or_else(|| QuadratureError::InvalidParameter {
    parameter,
    message: format!("expected a finite value, got {value}"),
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::expr::var::Var;
  use crate::expr::Expr;

  use approx::assert_abs_diff_eq;

  fn fexp() -> Integrand {
    Integrand::from_fn(|t| (2.0 * t).exp())
  }

  fn fsym() -> Integrand {
    let t = Var::new("t").unwrap();
    let expr = Expr::call("exp", vec![
      Expr::call("*", vec![Expr::from(2), Expr::from(t.clone())]),
    ]);
    Integrand::symbolic(expr, t)
  }

  fn exact_integral() -> f64 {
    (2.0_f64.exp() - 1.0) / 2.0
  }

  #[test]
  fn test_method_dispatch() {
    assert_eq!("gleg".parse::<QuadratureMethod>().unwrap(), QuadratureMethod::GaussLegendre);
    assert_eq!("glag".parse::<QuadratureMethod>().unwrap(), QuadratureMethod::GaussLaguerre);
    assert_eq!("rs".parse::<QuadratureMethod>().unwrap(), QuadratureMethod::RiemannSum);
    assert_eq!(
      "gleg+glag".parse::<QuadratureMethod>().unwrap(),
      QuadratureMethod::GaussLegendreGaussLaguerre,
    );
    assert_eq!(
      "gleg+rs".parse::<QuadratureMethod>().unwrap(),
      QuadratureMethod::GaussLegendreRiemannSum,
    );
    for (name, method) in METHOD_NAMES.entries() {
      assert_eq!(method.name(), *name);
    }
  }

  #[test]
  fn test_unknown_method_is_a_typed_error() {
    let err = "hello".parse::<QuadratureMethod>().unwrap_err();
    assert!(matches!(err, QuadratureError::UnknownMethod { .. }));
    assert!(err.to_string().contains("hello"));
  }

  #[test]
  fn test_riemannliouville_alpha_zero_default_method() {
    let out = riemannliouville(fexp(), 0.0, 0.0, 1.0, &FodSettings::default()).unwrap();
    assert_abs_diff_eq!(out.fd, exact_integral(), epsilon = 1e-4);
    // The default method is a hybrid, so every diagnostic is present.
    assert!(out.i1.is_some());
    assert!(out.i2.is_some());
    assert!(out.q1.is_some());
    assert!(out.q2.is_some());
    assert_abs_diff_eq!(
      out.i1.unwrap() + out.i2.unwrap(),
      exact_integral(),
      epsilon = 1e-4,
    );
  }

  #[test]
  fn test_riemannliouville_alpha_zero_single_rules() {
    let gleg = FodSettings {
      method: QuadratureMethod::GaussLegendre,
      ndom: 10,
      deg: 6,
      ..FodSettings::default()
    };
    let out = riemannliouville(fexp(), 0.0, 0.0, 1.0, &gleg).unwrap();
    assert_abs_diff_eq!(out.fd, exact_integral(), epsilon = 1e-9);
    assert!(out.i2.is_none());
    assert!(out.q2.is_none());

    let rs = FodSettings {
      method: QuadratureMethod::RiemannSum,
      nrs: 2001,
      ..FodSettings::default()
    };
    let out = riemannliouville(fexp(), 0.0, 0.0, 1.0, &rs).unwrap();
    assert_abs_diff_eq!(out.fd, exact_integral(), epsilon = 1e-5);

    let glag = FodSettings {
      method: QuadratureMethod::GaussLaguerre,
      glag_deg: 30,
      extend_precision: false,
      ..FodSettings::default()
    };
    let out = riemannliouville(fexp(), 0.0, 0.0, 1.0, &glag).unwrap();
    assert_abs_diff_eq!(out.fd, exact_integral(), epsilon = 1e-3);
  }

  #[test]
  fn test_riemannliouville_symbolic_integrand() {
    let out = riemannliouville(fsym(), 0.0, 0.0, 1.0, &FodSettings::default()).unwrap();
    assert_abs_diff_eq!(out.fd, exact_integral(), epsilon = 1e-4);
  }

  #[test]
  fn test_riemannliouville_singular_kernel() {
    // With f = 1 and alpha = 1/2 over [0, 1] the integral is exactly
    // 2, so fd = 2/Gamma(1/2).
    let f = Integrand::from_fn(|_| 1.0);
    let settings = FodSettings { nrs: 201, ..FodSettings::default() };
    let out = riemannliouville(f, 0.5, 0.0, 1.0, &settings).unwrap();
    assert_abs_diff_eq!(out.fd, 2.0 / special::gamma(0.5), epsilon = 1e-4);
  }

  #[test]
  fn test_caputo_alpha_zero_telescopes() {
    // integral of f' = f(1) - f(0) = e^2 - 1, for both integrand
    // representations.
    let expected = 2.0_f64.exp() - 1.0;
    let out = caputo(fsym(), 0.0, 0.0, 1.0, &FodSettings::default()).unwrap();
    assert_abs_diff_eq!(out.fd, expected, epsilon = 1e-4);
    assert!(out.i1.is_some());
    assert!(out.q1.is_some());
    assert!(out.i2.is_none());
    assert!(out.q2.is_none());

    let out = caputo(fexp(), 0.0, 0.0, 1.0, &FodSettings::default()).unwrap();
    assert_abs_diff_eq!(out.fd, expected, epsilon = 1e-3);
  }

  #[test]
  fn test_caputo_half_order_of_t_squared() {
    // Caputo D^(1/2) of t^2 at t = 1 is Gamma(3)/Gamma(5/2) = 2/Gamma(5/2).
    let t = Var::new("t").unwrap();
    let expr = Expr::call("^", vec![Expr::from(t.clone()), Expr::from(2)]);
    let f = Integrand::symbolic(expr, t);
    let settings = FodSettings { nrs: 501, ..FodSettings::default() };
    let out = caputo(f, 0.5, 0.0, 1.0, &settings).unwrap();
    assert_abs_diff_eq!(out.fd, 2.0 / special::gamma(2.5), epsilon = 1e-3);
  }

  #[test]
  fn test_grunwaldletnikov_alpha_zero() {
    // The series collapses to f(upper), for either representation.
    let out = grunwaldletnikov(fexp(), 0.0, 0.0, 1.0, DEFAULT_GL_STEPS).unwrap();
    assert_abs_diff_eq!(out.fd, 2.0_f64.exp(), epsilon = 1e-12);
    let out = grunwaldletnikov(fsym(), 0.0, 0.0, 1.0, DEFAULT_GL_STEPS).unwrap();
    assert_abs_diff_eq!(out.fd, 2.0_f64.exp(), epsilon = 1e-12);
    assert!(out.i1.is_none());
    assert!(out.q1.is_none());
  }

  #[test]
  fn test_grunwaldletnikov_half_order_of_constant() {
    // D^(1/2) of 1 over [0, 1] tends to 1/Gamma(1/2) = 1/sqrt(pi);
    // the truncated series converges at first order in 1/n.
    let f = Integrand::from_fn(|_| 1.0);
    let out = grunwaldletnikov(f, 0.5, 0.0, 1.0, 1000).unwrap();
    assert_abs_diff_eq!(out.fd, 1.0 / special::gamma(0.5), epsilon = 1e-3);
  }

  #[test]
  fn test_settings_roundtrip_through_serde() {
    let settings = FodSettings {
      method: QuadratureMethod::GaussLaguerre,
      nrs: 77,
      ..FodSettings::default()
    };
    let json = serde_json::to_string(&settings).unwrap();
    let back: FodSettings = serde_json::from_str(&json).unwrap();
    assert_eq!(back.method, QuadratureMethod::GaussLaguerre);
    assert_eq!(back.nrs, 77);
    assert_eq!(back.deg, settings.deg);
  }

  #[test]
  fn test_invalid_order_is_rejected() {
    assert!(riemannliouville(fexp(), 1.0, 0.0, 1.0, &FodSettings::default()).is_err());
    assert!(grunwaldletnikov(fexp(), -0.25, 0.0, 1.0, 100).is_err());
  }
}
