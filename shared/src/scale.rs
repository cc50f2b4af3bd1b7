//! Domain-to-range transforms shared by every chart.
//!
//! Scales are built fresh for each render and never mutated afterwards.

use std::collections::HashMap;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScaleError {
    #[error("scale bound is not finite: {0}")]
    NonFiniteBound(f64),
    #[error("power scale exponent must be positive and finite, got {0}")]
    InvalidExponent(f64),
    #[error("band padding must be within 0..=1, got {0}")]
    InvalidPadding(f64),
    #[error("duplicate category `{0}` in band scale")]
    DuplicateCategory(String),
    #[error("unknown category `{0}`")]
    UnknownCategory(String),
    #[error("threshold breakpoints must be sorted ascending and finite")]
    UnsortedBreakpoints,
    #[error("threshold scale with {breakpoints} breakpoints needs {} outputs, got {outputs}", .breakpoints + 1)]
    OutputCountMismatch { breakpoints: usize, outputs: usize },
}

fn check_finite(pair: (f64, f64)) -> Result<(), ScaleError> {
    for v in [pair.0, pair.1] {
        if !v.is_finite() {
            return Err(ScaleError::NonFiniteBound(v));
        }
    }
    Ok(())
}

/// Normalized position of `v` within `[d0, d1]`. A degenerate domain maps
/// every value to the midpoint.
#[inline]
fn normalize(v: f64, d0: f64, d1: f64) -> f64 {
    let span = d1 - d0;
    if span == 0.0 { 0.5 } else { (v - d0) / span }
}

#[inline]
fn interpolate(t: f64, r0: f64, r1: f64) -> f64 {
    r0 + t * (r1 - r0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Result<Self, ScaleError> {
        check_finite(domain)?;
        check_finite(range)?;
        Ok(Self { domain, range })
    }

    pub fn map(&self, v: f64) -> f64 {
        let t = normalize(v, self.domain.0, self.domain.1);
        interpolate(t, self.range.0, self.range.1)
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain.0, self.domain.1, count)
    }
}

/// Linear interpolation after raising domain and input to `exponent`.
/// Negative inputs keep their sign.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowScale {
    domain: (f64, f64),
    range: (f64, f64),
    exponent: f64,
}

impl PowScale {
    pub fn new(domain: (f64, f64), range: (f64, f64), exponent: f64) -> Result<Self, ScaleError> {
        check_finite(domain)?;
        check_finite(range)?;
        if !exponent.is_finite() || exponent <= 0.0 {
            return Err(ScaleError::InvalidExponent(exponent));
        }
        Ok(Self {
            domain,
            range,
            exponent,
        })
    }

    #[inline]
    fn raise(&self, v: f64) -> f64 {
        if v < 0.0 {
            -(-v).powf(self.exponent)
        } else {
            v.powf(self.exponent)
        }
    }

    pub fn map(&self, v: f64) -> f64 {
        let t = normalize(
            self.raise(v),
            self.raise(self.domain.0),
            self.raise(self.domain.1),
        );
        interpolate(t, self.range.0, self.range.1)
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn exponent(&self) -> f64 {
        self.exponent
    }

    /// Tick values are chosen in domain space, like a linear scale.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain.0, self.domain.1, count)
    }
}

/// Equal-width slots for an ordered set of unique categories.
///
/// `padding` is applied both between slots and at the outer edges, in units of
/// the slot step; slots are centred within the range.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    labels: Vec<String>,
    index: HashMap<String, usize>,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    pub fn new<I, S>(labels: I, range: (f64, f64), padding: f64) -> Result<Self, ScaleError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        check_finite(range)?;
        if !(0.0..=1.0).contains(&padding) {
            return Err(ScaleError::InvalidPadding(padding));
        }

        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let mut index = HashMap::with_capacity(labels.len());
        for (i, label) in labels.iter().enumerate() {
            if index.insert(label.clone(), i).is_some() {
                return Err(ScaleError::DuplicateCategory(label.clone()));
            }
        }

        let n = labels.len() as f64;
        let (r0, r1) = range;
        let span = r1 - r0;
        let step = span / (n - padding + 2.0 * padding).max(1.0);
        let start = r0 + (span - step * (n - padding)) * 0.5;
        let bandwidth = step * (1.0 - padding);

        Ok(Self {
            labels,
            index,
            start,
            step,
            bandwidth,
        })
    }

    /// Start offset of the slot for `label`.
    pub fn position(&self, label: &str) -> Result<f64, ScaleError> {
        let i = self
            .index
            .get(label)
            .ok_or_else(|| ScaleError::UnknownCategory(label.to_string()))?;
        Ok(self.start + self.step * *i as f64)
    }

    /// Centre of the slot for `label`.
    pub fn center(&self, label: &str) -> Result<f64, ScaleError> {
        Ok(self.position(label)? + self.bandwidth / 2.0)
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

/// Maps a continuous value to one of `breakpoints.len() + 1` outputs.
/// Output `i` covers `b[i-1] <= v < b[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdScale<T> {
    breakpoints: Vec<f64>,
    outputs: Vec<T>,
}

impl<T> ThresholdScale<T> {
    pub fn new(breakpoints: Vec<f64>, outputs: Vec<T>) -> Result<Self, ScaleError> {
        if breakpoints.iter().any(|b| !b.is_finite())
            || breakpoints.windows(2).any(|w| w[0] > w[1])
        {
            return Err(ScaleError::UnsortedBreakpoints);
        }
        if outputs.len() != breakpoints.len() + 1 {
            return Err(ScaleError::OutputCountMismatch {
                breakpoints: breakpoints.len(),
                outputs: outputs.len(),
            });
        }
        Ok(Self {
            breakpoints,
            outputs,
        })
    }

    /// Bucket index for `v`. NaN falls into the lowest bucket.
    pub fn bucket(&self, v: f64) -> usize {
        if v.is_nan() {
            return 0;
        }
        self.breakpoints.partition_point(|b| *b <= v)
    }

    pub fn map(&self, v: f64) -> &T {
        &self.outputs[self.bucket(v)]
    }

    pub fn breakpoints(&self) -> &[f64] {
        &self.breakpoints
    }

    pub fn outputs(&self) -> &[T] {
        &self.outputs
    }
}

/// Roughly `count` human-friendly tick values (multiples of 1, 2 or 5 × 10^k)
/// covering `[start, stop]`.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if !start.is_finite() || !stop.is_finite() || count == 0 {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };

    let inc = tick_increment(lo, hi, count);
    if inc == 0.0 || !inc.is_finite() {
        return Vec::new();
    }

    let mut out = Vec::new();
    if inc > 0.0 {
        let i0 = (lo / inc).ceil() as i64;
        let i1 = (hi / inc).floor() as i64;
        for i in i0..=i1 {
            out.push(i as f64 * inc);
        }
    } else {
        // Negative increment encodes 1/step to keep decimal ticks exact.
        let inv = -inc;
        let i0 = (lo * inv).ceil() as i64;
        let i1 = (hi * inv).floor() as i64;
        for i in i0..=i1 {
            out.push(i as f64 / inv);
        }
    }
    if reverse {
        out.reverse();
    }
    out
}

fn tick_increment(lo: f64, hi: f64, count: usize) -> f64 {
    let e10 = 50f64.sqrt();
    let e5 = 10f64.sqrt();
    let e2 = 2f64.sqrt();

    let step = (hi - lo) / count as f64;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= e10 {
        10.0
    } else if error >= e5 {
        5.0
    } else if error >= e2 {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -(10f64.powf(-power)) / factor
    }
}
