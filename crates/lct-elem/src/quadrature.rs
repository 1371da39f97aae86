use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Instant;

use lct_core::errors::{ErrorInfo, LctError};

fn quadrature_error(code: &str, message: impl Into<String>) -> LctError {
    LctError::Quadrature(ErrorInfo::new(code, message.into()))
}

// 21-point Kronrod nodes on [0, 1); odd indices are the 10-point Gauss nodes.
const XGK: [f64; 11] = [
    0.995_657_163_025_808_080_735_527_280_689_003,
    0.973_906_528_517_171_720_077_964_012_084_452,
    0.930_157_491_355_708_226_001_207_180_059_508,
    0.865_063_366_688_984_510_732_096_688_423_493,
    0.780_817_726_586_416_897_063_717_578_345_042,
    0.679_409_568_299_024_406_234_327_365_114_874,
    0.562_757_134_668_604_683_339_000_099_272_694,
    0.433_395_394_129_247_190_799_265_943_165_784,
    0.294_392_862_701_460_198_131_126_603_103_866,
    0.148_874_338_981_631_210_884_826_001_129_720,
    0.0,
];

const WGK: [f64; 11] = [
    0.011_694_638_867_371_874_278_064_396_062_192,
    0.032_558_162_307_964_727_478_818_972_459_390,
    0.054_755_896_574_351_996_031_381_300_244_580,
    0.075_039_674_810_919_952_767_043_140_916_190,
    0.093_125_454_583_697_605_535_065_465_083_366,
    0.109_387_158_802_297_641_899_210_590_325_805,
    0.123_491_976_262_065_851_077_208_980_276_224,
    0.134_709_217_311_473_325_928_054_001_771_707,
    0.142_775_938_577_060_080_797_094_273_138_717,
    0.147_739_104_901_338_491_374_841_515_972_068,
    0.149_445_554_002_916_905_664_936_468_389_821,
];

const WG: [f64; 5] = [
    0.066_671_344_308_688_137_593_568_809_893_332,
    0.149_451_349_150_580_593_145_776_339_657_697,
    0.219_086_362_515_982_043_995_534_934_228_163,
    0.269_266_719_309_996_355_091_226_921_569_469,
    0.295_524_224_714_752_870_173_892_994_651_338,
];

/// Stopping rules for [`integrate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadratureLimits {
    /// Absolute error target.
    pub abs_tol: f64,
    /// Relative error target.
    pub rel_tol: f64,
    /// Maximum number of subintervals before giving up.
    pub max_subdivisions: usize,
    /// Wall-clock deadline shared by nested integrations.
    pub deadline: Option<Instant>,
}

/// Converged integral with its error estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    /// Integral value.
    pub value: f64,
    /// Estimated absolute error.
    pub abs_error: f64,
    /// Number of subintervals in the final partition.
    pub subdivisions: usize,
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    a: f64,
    b: f64,
    value: f64,
    error: f64,
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Segment {}

impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Segment {
    fn cmp(&self, other: &Self) -> Ordering {
        self.error
            .total_cmp(&other.error)
            .then_with(|| other.a.total_cmp(&self.a))
    }
}

fn kronrod21<F>(f: &F, a: f64, b: f64) -> Result<Segment, LctError>
where
    F: Fn(f64) -> Result<f64, LctError>,
{
    let center = 0.5 * (a + b);
    let half = 0.5 * (b - a);
    let eval = |x: f64| -> Result<f64, LctError> {
        let value = f(x)?;
        if !value.is_finite() {
            return Err(quadrature_error("non-finite-integrand", "integrand is not finite")
                .with_context("x", x.to_string()));
        }
        Ok(value)
    };

    let fc = eval(center)?;
    let mut res_gauss = 0.0;
    let mut res_kronrod = WGK[10] * fc;
    let mut res_abs = res_kronrod.abs();
    let mut lower = [0.0f64; 10];
    let mut upper = [0.0f64; 10];
    for j in 0..10 {
        let abscissa = half * XGK[j];
        let f1 = eval(center - abscissa)?;
        let f2 = eval(center + abscissa)?;
        lower[j] = f1;
        upper[j] = f2;
        res_kronrod += WGK[j] * (f1 + f2);
        res_abs += WGK[j] * (f1.abs() + f2.abs());
        if j % 2 == 1 {
            res_gauss += WG[j / 2] * (f1 + f2);
        }
    }

    let mean = 0.5 * res_kronrod;
    let mut res_asc = WGK[10] * (fc - mean).abs();
    for j in 0..10 {
        res_asc += WGK[j] * ((lower[j] - mean).abs() + (upper[j] - mean).abs());
    }

    let scale = half.abs();
    let value = res_kronrod * half;
    res_abs *= scale;
    res_asc *= scale;
    let mut error = ((res_kronrod - res_gauss) * half).abs();
    if res_asc != 0.0 && error != 0.0 {
        error = res_asc * (200.0 * error / res_asc).powf(1.5).min(1.0);
    }
    if res_abs > f64::MIN_POSITIVE / (50.0 * f64::EPSILON) {
        error = error.max(50.0 * f64::EPSILON * res_abs);
    }
    Ok(Segment { a, b, value, error })
}

fn deadline_passed(limits: &QuadratureLimits) -> bool {
    limits
        .deadline
        .map(|deadline| Instant::now() >= deadline)
        .unwrap_or(false)
}

/// Adaptive 21-point Gauss–Kronrod integration of `f` over `[a, b]`.
///
/// The subinterval with the largest error estimate is bisected until the
/// summed estimate drops below `max(abs_tol, rel_tol·|value|)`. Limits may be
/// given in either order: for `b < a` the result is `-∫_b^a f`, and equal
/// limits integrate to zero. Failure to converge within
/// the subdivision budget or before the deadline is an error, never a
/// silently inaccurate value.
pub fn integrate<F>(f: F, a: f64, b: f64, limits: &QuadratureLimits) -> Result<Estimate, LctError>
where
    F: Fn(f64) -> Result<f64, LctError>,
{
    if b == a {
        return Ok(Estimate {
            value: 0.0,
            abs_error: 0.0,
            subdivisions: 0,
        });
    }
    if b < a {
        let forward = integrate(f, b, a, limits)?;
        return Ok(Estimate {
            value: -forward.value,
            ..forward
        });
    }
    if deadline_passed(limits) {
        return Err(deadline_error(a, b, limits));
    }

    let mut heap = BinaryHeap::new();
    heap.push(kronrod21(&f, a, b)?);
    loop {
        let (value, abs_error) = heap
            .iter()
            .fold((0.0, 0.0), |(v, e), seg| (v + seg.value, e + seg.error));
        if abs_error <= limits.abs_tol.max(limits.rel_tol * value.abs()) {
            return Ok(Estimate {
                value,
                abs_error,
                subdivisions: heap.len(),
            });
        }
        if heap.len() >= limits.max_subdivisions {
            return Err(quadrature_error(
                "quadrature-divergence",
                "subdivision budget exhausted before reaching tolerance",
            )
            .with_context("interval", format!("[{a}, {b}]"))
            .with_context("estimate", value.to_string())
            .with_context("abs_error", abs_error.to_string())
            .with_context("abs_tol", limits.abs_tol.to_string())
            .with_context("rel_tol", limits.rel_tol.to_string())
            .with_context("subdivisions", heap.len().to_string()));
        }
        if deadline_passed(limits) {
            return Err(deadline_error(a, b, limits));
        }
        let Some(worst) = heap.pop() else {
            return Err(quadrature_error("empty-partition", "no subinterval left to refine"));
        };
        let mid = 0.5 * (worst.a + worst.b);
        if !(worst.a < mid && mid < worst.b) {
            return Err(quadrature_error(
                "quadrature-roundoff",
                "subinterval cannot be bisected further",
            )
            .with_context("interval", format!("[{}, {}]", worst.a, worst.b)));
        }
        heap.push(kronrod21(&f, worst.a, mid)?);
        heap.push(kronrod21(&f, mid, worst.b)?);
    }
}

fn deadline_error(a: f64, b: f64, limits: &QuadratureLimits) -> LctError {
    quadrature_error("quadrature-deadline", "quadrature exceeded its time budget")
        .with_context("interval", format!("[{a}, {b}]"))
        .with_context("abs_tol", limits.abs_tol.to_string())
        .with_context("rel_tol", limits.rel_tol.to_string())
        .with_hint("raise timeout_ms or loosen the tolerances")
}
