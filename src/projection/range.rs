use serde::Serialize;

use crate::error::{CoreError, Result};

/// Granularity that axis bounds are rounded out to.
const ROUNDING: f64 = 10.0;

// ---------------------------------------------------------------------------
// AxisRange – rounded value bounds for tick rendering
// ---------------------------------------------------------------------------

/// Vertical bounds of the plotted values, rounded out to multiples of ten.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    /// `max` is the largest magnitude rounded up, `min` the smallest signed
    /// value rounded down.
    pub fn from_values(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(CoreError::EmptyDataset.logged());
        }
        let largest = values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        let smallest = values.iter().copied().fold(f64::INFINITY, f64::min);

        let max = (largest / ROUNDING).ceil() * ROUNDING;
        // max >= |min| >= min
        let min = (smallest / ROUNDING).floor() * ROUNDING;
        Ok(Self { min, max })
    }

    /// Validate a stored range.
    pub fn checked(range: Option<Self>) -> Result<Self> {
        match range {
            Some(r) if r.min <= r.max => Ok(r),
            Some(r) => Err(CoreError::InvertedRange {
                bounds: Some((r.min, r.max)),
            }
            .logged()),
            None => Err(CoreError::InvertedRange { bounds: None }.logged()),
        }
    }

    /// Largest absolute bound, used to scale values into `[-1, 1]`.
    pub fn magnitude(&self) -> f64 {
        self.min.abs().max(self.max.abs())
    }

    /// Tick values from 0 up to `max`.
    pub fn ticks(&self) -> YTicks {
        YTicks::new(self.max)
    }
}

// ---------------------------------------------------------------------------
// YTicks – lazy tick iterator
// ---------------------------------------------------------------------------

/// Ticks from `0` to `max` inclusive.
///
/// The step is 1 up to a maximum of 10 and 10 beyond that. Cloning restarts
/// the sequence from wherever the clone was taken.
#[derive(Debug, Clone)]
pub struct YTicks {
    index: u64,
    count: u64,
    step: f64,
}

impl YTicks {
    pub fn new(max: f64) -> Self {
        let step = if max <= 10.0 { 1.0 } else { 10.0 };
        // `as` saturates for huge or infinite quotients
        let count = if max >= 0.0 {
            ((max / step).floor() as u64).saturating_add(1)
        } else {
            0
        };
        Self {
            index: 0,
            count,
            step,
        }
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Number of ticks left, without walking the sequence.
    pub fn remaining(&self) -> u64 {
        self.count - self.index
    }
}

impl Iterator for YTicks {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.index >= self.count {
            return None;
        }
        let value = self.index as f64 * self.step;
        self.index += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining()) {
            Ok(left) => (left, Some(left)),
            Err(_) => (usize::MAX, None),
        }
    }
}
