//! Geometric projections of a [`TabularDataset`](crate::data::dataset::TabularDataset).
//!
//! Both projections keep one wrapper per dataset [`Point`](crate::data::model::Point),
//! referring to it by index, and rebuild the whole wrapper list on every update.

pub mod phase_space;
pub mod range;
pub mod time_series;

use serde::Serialize;

pub use phase_space::{PhaseSpacePoint, PhaseSpaceProjection};
pub use range::{AxisRange, YTicks};
pub use time_series::{TimeSeriesPoint, TimeSeriesProjection};

/// A time-series point as handed to a 2-D renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlottedPoint {
    pub x: f64,
    pub y: f64,
    pub time_label: String,
    pub value: f64,
    pub selected: bool,
}

/// A phase-space point as handed to a 3-D renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub time_label: String,
    pub value: f64,
    pub selected: bool,
}
