use crate::data::dataset::TabularDataset;
use crate::error::Result;

use super::range::{AxisRange, YTicks};
use super::PlottedPoint;

// ---------------------------------------------------------------------------
// TimeSeriesPoint – 2-D wrapper around a dataset point
// ---------------------------------------------------------------------------

/// Position of one dataset point in the time-series layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSeriesPoint {
    /// Index into `TabularDataset::points`.
    pub index: usize,
    pub position: [f64; 2],
}

// ---------------------------------------------------------------------------
// TimeSeriesProjection
// ---------------------------------------------------------------------------

/// Lays points out left to right in row order, with height proportional to
/// value.
#[derive(Debug, Clone)]
pub struct TimeSeriesProjection {
    /// Left edge of the horizontal extent.
    left: f64,
    /// Width of the horizontal extent.
    span: f64,
    y_range: Option<AxisRange>,
    points: Vec<TimeSeriesPoint>,
}

impl Default for TimeSeriesProjection {
    fn default() -> Self {
        Self::new(-1.0, 2.0)
    }
}

impl TimeSeriesProjection {
    pub fn new(left: f64, span: f64) -> Self {
        Self {
            left,
            span,
            y_range: None,
            points: Vec::new(),
        }
    }

    /// Recompute the rounded vertical bounds from the plotted values.
    pub fn set_range(&mut self, dataset: &TabularDataset) -> Result<()> {
        let range = AxisRange::from_values(&dataset.displayed_values())?;
        self.y_range = Some(range);
        Ok(())
    }

    pub fn y_range(&self) -> Result<AxisRange> {
        AxisRange::checked(self.y_range)
    }

    /// Y-axis tick values, 0 through `y_range().max`.
    pub fn time_series_y_range(&self) -> Result<YTicks> {
        Ok(self.y_range()?.ticks())
    }

    /// X-axis tick labels, one per point in row order.
    pub fn time_series_x_range<'a>(&self, dataset: &'a TabularDataset) -> Vec<&'a str> {
        dataset.points().iter().map(|p| p.time_label()).collect()
    }

    /// One wrapper per dataset point, positions unassigned.
    pub fn add_points(&mut self, dataset: &TabularDataset) {
        self.points = (0..dataset.points().len())
            .map(|index| TimeSeriesPoint {
                index,
                position: [0.0, 0.0],
            })
            .collect();
    }

    pub fn increment_y_header(&self, dataset: &mut TabularDataset) {
        cycle_y_header(dataset, true);
    }

    pub fn decrement_y_header(&self, dataset: &mut TabularDataset) {
        cycle_y_header(dataset, false);
    }

    /// Rebuild range, points and wrappers, then position every wrapper.
    ///
    /// The only fallible step runs first, so a failure leaves the previous
    /// layout in place.
    pub fn update_point_position(&mut self, dataset: &mut TabularDataset) -> Result<()> {
        self.set_range(dataset)?;
        dataset.populate_points();
        self.add_points(dataset);

        let range = self.y_range()?;
        let tick_count = range.ticks().remaining().max(1) as f64;
        let slot = self.span / self.points.len().max(1) as f64;

        for (wrapper, point) in self.points.iter_mut().zip(dataset.points()) {
            let x = self.left + slot * (wrapper.index as f64 + 0.5);
            let y = (point.value() / 100.0) * (range.max / tick_count) - 1.0;
            wrapper.position = [x, y];
        }

        log::debug!("Positioned {} time-series points", self.points.len());
        Ok(())
    }

    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    /// Whether `add_points` has run at least once.
    pub fn is_populated(&self) -> bool {
        !self.points.is_empty()
    }

    /// Render records joining positions with the dataset's point data.
    pub fn plotted_points(&self, dataset: &TabularDataset) -> Vec<PlottedPoint> {
        self.points
            .iter()
            .filter_map(|w| {
                let p = dataset.point(w.index)?;
                Some(PlottedPoint {
                    x: w.position[0],
                    y: w.position[1],
                    time_label: p.time_label().to_string(),
                    value: p.value(),
                    selected: p.is_selected(),
                })
            })
            .collect()
    }
}

/// Step the y header one position through `headers`, wrapping at the ends
/// and stepping over the time header.
fn cycle_y_header(dataset: &mut TabularDataset, forward: bool) {
    let headers = dataset.headers();
    if headers.len() < 3 {
        return;
    }
    let (Some(time), Some(current)) = (dataset.time_header(), dataset.y_header()) else {
        return;
    };
    let Some(mut idx) = headers.iter().position(|h| h == current) else {
        return;
    };

    let len = headers.len();
    let step = |i: usize| if forward { (i + 1) % len } else { (i + len - 1) % len };
    idx = step(idx);
    if headers[idx] == time {
        idx = step(idx);
    }

    let next = headers[idx].clone();
    dataset.set_y_header(&next);
}
