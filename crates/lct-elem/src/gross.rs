use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use lct_core::errors::{ErrorInfo, LctError};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::quadrature::{integrate, QuadratureLimits};

fn config_error(code: &str, message: impl Into<String>) -> LctError {
    LctError::Config(ErrorInfo::new(code, message.into()))
}

fn default_epsilon() -> f64 {
    0.01
}

fn default_abs_tol() -> f64 {
    1.49e-8
}

fn default_rel_tol() -> f64 {
    1.49e-8
}

fn default_max_subdivisions() -> usize {
    50
}

/// Knobs of the singular t-channel quadrature.
///
/// `epsilon` is the half-width of the strip excised around `x = y`. The
/// excision biases the result by `O(epsilon)` (the second-order term of the
/// numerator Taylor expansion is dropped inside the strip). A smaller
/// strip puts the inner integrand closer to its `1/(y-x)` pole and needs more
/// subdivisions. Keep it fixed across a run so matrices stay comparable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuadratureOpts {
    /// Half-width of the excised diagonal strip.
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    /// Absolute error target for every nested integration.
    #[serde(default = "default_abs_tol")]
    pub abs_tol: f64,
    /// Relative error target for every nested integration.
    #[serde(default = "default_rel_tol")]
    pub rel_tol: f64,
    /// Subinterval budget for every nested integration.
    #[serde(default = "default_max_subdivisions")]
    pub max_subdivisions: usize,
    /// Wall-clock budget for one integral, in milliseconds.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// When set, a tuple that fails to converge is retried once with both
    /// tolerances multiplied by this factor. Off by default.
    #[serde(default)]
    pub relaxed_retry_factor: Option<f64>,
}

impl Default for QuadratureOpts {
    fn default() -> Self {
        Self {
            epsilon: default_epsilon(),
            abs_tol: default_abs_tol(),
            rel_tol: default_rel_tol(),
            max_subdivisions: default_max_subdivisions(),
            timeout_ms: None,
            relaxed_retry_factor: None,
        }
    }
}

impl QuadratureOpts {
    /// Returns a copy with a different strip half-width.
    pub fn with_epsilon(&self, epsilon: f64) -> Self {
        Self {
            epsilon,
            ..self.clone()
        }
    }

    /// Checks that every knob is inside its admissible range.
    pub fn validate(&self) -> Result<(), LctError> {
        if !(self.epsilon > 0.0 && self.epsilon < 0.5) {
            return Err(
                config_error("invalid-epsilon", "epsilon must lie strictly inside (0, 0.5)")
                    .with_context("epsilon", self.epsilon.to_string()),
            );
        }
        if !(self.abs_tol > 0.0 && self.abs_tol.is_finite())
            || !(self.rel_tol >= 0.0 && self.rel_tol.is_finite())
        {
            return Err(config_error(
                "invalid-tolerance",
                "tolerances must be finite, abs_tol positive and rel_tol non-negative",
            )
            .with_context("abs_tol", self.abs_tol.to_string())
            .with_context("rel_tol", self.rel_tol.to_string()));
        }
        if let Some(factor) = self.relaxed_retry_factor {
            if !(factor > 1.0 && factor.is_finite()) {
                return Err(config_error(
                    "invalid-retry-factor",
                    "relaxed retry factor must be finite and greater than one",
                )
                .with_context("relaxed_retry_factor", factor.to_string()));
            }
        }
        if self.max_subdivisions == 0 {
            return Err(config_error(
                "invalid-subdivisions",
                "subdivision budget must be positive",
            ));
        }
        Ok(())
    }

    /// Options for the single relaxed retry, if one is enabled.
    pub fn relaxed(&self) -> Option<Self> {
        self.relaxed_retry_factor.map(|factor| Self {
            abs_tol: self.abs_tol * factor,
            rel_tol: self.rel_tol * factor,
            relaxed_retry_factor: None,
            ..self.clone()
        })
    }

    fn limits(&self, deadline: Option<Instant>) -> QuadratureLimits {
        QuadratureLimits {
            abs_tol: self.abs_tol,
            rel_tol: self.rel_tol,
            max_subdivisions: self.max_subdivisions,
            deadline,
        }
    }
}

/// Regularised t-channel double integral
/// `∬ x^a (1-x)^b [y^c (1-y)^d - x^c (1-x)^d] / (x-y)^2 dy dx` over the unit
/// square with the strip `|x - y| < epsilon` removed.
///
/// For each `x` the inner integral runs over `[0, x-ε]` and `[x+ε, 1]`. Near
/// the edges (`x < ε` or `x > 1-ε`) one piece has reversed limits and is
/// integrated as a signed integral. The outer integral is split at `ε` and
/// `1-ε`, where one inner piece changes orientation.
pub fn gross_integral(k: [u32; 4], opts: &QuadratureOpts) -> Result<f64, LctError> {
    opts.validate()?;
    let [a, b, c, d] = k;
    let eps = opts.epsilon;
    let deadline = opts
        .timeout_ms
        .map(|ms| Instant::now() + Duration::from_millis(ms));
    let limits = opts.limits(deadline);

    let weight = |x: f64| x.powi(a as i32) * (1.0 - x).powi(b as i32);
    let profile = |y: f64| y.powi(c as i32) * (1.0 - y).powi(d as i32);
    let inner = |x: f64| -> Result<f64, LctError> {
        let gx = profile(x);
        let integrand = |y: f64| -> Result<f64, LctError> {
            let gap = x - y;
            Ok((profile(y) - gx) / (gap * gap))
        };
        let below = integrate(&integrand, 0.0, x - eps, &limits)
            .map_err(|err| err.with_context("stage", "inner-below").with_context("x", x.to_string()))?;
        let above = integrate(&integrand, x + eps, 1.0, &limits)
            .map_err(|err| err.with_context("stage", "inner-above").with_context("x", x.to_string()))?;
        Ok(weight(x) * (below.value + above.value))
    };

    let mut total = 0.0;
    for (lo, hi) in [(0.0, eps), (eps, 1.0 - eps), (1.0 - eps, 1.0)] {
        let estimate = integrate(&inner, lo, hi, &limits).map_err(|err| {
            let err = if err.info().context.contains_key("stage") {
                err
            } else {
                err.with_context("stage", "outer")
            };
            err.with_context("exponents", format!("({a},{b},{c},{d})"))
                .with_context("epsilon", eps.to_string())
                .with_context("abs_tol", opts.abs_tol.to_string())
                .with_context("rel_tol", opts.rel_tol.to_string())
        })?;
        total += estimate.value;
    }
    Ok(total)
}

/// Memoising front end to [`gross_integral`].
///
/// The same exponent tuples recur across many basis-state pairs, so each
/// tuple is integrated once per evaluator. Safe to share between worker
/// threads.
#[derive(Debug)]
pub struct GrossEvaluator {
    opts: QuadratureOpts,
    cache: RwLock<HashMap<[u32; 4], f64>>,
    integrations: AtomicUsize,
}

impl GrossEvaluator {
    /// Creates an evaluator after validating the options.
    pub fn new(opts: QuadratureOpts) -> Result<Self, LctError> {
        opts.validate()?;
        Ok(Self {
            opts,
            cache: RwLock::new(HashMap::new()),
            integrations: AtomicUsize::new(0),
        })
    }

    /// Options used for every integral.
    pub fn opts(&self) -> &QuadratureOpts {
        &self.opts
    }

    /// Returns `I(a, b, c, d)`, integrating on first use.
    pub fn evaluate(&self, k: [u32; 4]) -> Result<f64, LctError> {
        let cached = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&k)
            .copied();
        if let Some(value) = cached {
            return Ok(value);
        }
        let value = match (gross_integral(k, &self.opts), self.opts.relaxed()) {
            (Ok(value), _) => value,
            (Err(err), Some(relaxed)) if is_convergence_failure(&err) => {
                warn!(exponents = ?k, abs_tol = relaxed.abs_tol, rel_tol = relaxed.rel_tol, error = %err, "retrying t-channel integral with relaxed tolerances");
                gross_integral(k, &relaxed)
                    .map_err(|err| err.with_context("retry", "relaxed"))?
            }
            (Err(err), _) => return Err(err),
        };
        self.integrations.fetch_add(1, Ordering::Relaxed);
        debug!(exponents = ?k, value, "t-channel integral");
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(k, value);
        Ok(value)
    }

    /// Number of quadratures actually performed (cache misses).
    pub fn integrations(&self) -> usize {
        self.integrations.load(Ordering::Relaxed)
    }
}

fn is_convergence_failure(err: &LctError) -> bool {
    matches!(err, LctError::Quadrature(_))
        && matches!(err.code(), "quadrature-divergence" | "quadrature-roundoff")
}
