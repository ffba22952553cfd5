use crate::data::dataset::TabularDataset;
use crate::error::{CoreError, Result};

use super::range::AxisRange;
use super::EmbeddedPoint;

// ---------------------------------------------------------------------------
// PhaseSpacePoint – 3-D wrapper around a dataset point
// ---------------------------------------------------------------------------

/// Delay vector of one dataset point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseSpacePoint {
    /// Index into `TabularDataset::points`.
    pub index: usize,
    /// `[v(t), v(t - tau), v(t - 2 tau)]`
    pub position: [f64; 3],
}

// ---------------------------------------------------------------------------
// PhaseSpaceProjection – delay-coordinate embedding
// ---------------------------------------------------------------------------

/// Reconstructs a 3-D trajectory from the selected column by pairing every
/// sample with two lagged copies of itself.
///
/// History before the first row is zero-filled, so the first `2 * tau`
/// vectors sit partly on the axes.
#[derive(Debug, Clone)]
pub struct PhaseSpaceProjection {
    tau: usize,
    y_range: Option<AxisRange>,
    points: Vec<PhaseSpacePoint>,
}

impl Default for PhaseSpaceProjection {
    fn default() -> Self {
        Self {
            tau: 1,
            y_range: None,
            points: Vec::new(),
        }
    }
}

impl PhaseSpaceProjection {
    pub fn with_tau(tau: i64) -> Result<Self> {
        let mut projection = Self::default();
        projection.set_tau(tau)?;
        Ok(projection)
    }

    pub fn tau(&self) -> usize {
        self.tau
    }

    /// Change the lag. Values below 1 are rejected and leave tau unchanged.
    pub fn set_tau(&mut self, tau: i64) -> Result<()> {
        if tau < 1 {
            return Err(CoreError::InvalidTau { tau }.logged());
        }
        if self.tau != tau as usize {
            log::info!("Tau set to {tau}");
            self.tau = tau as usize;
        }
        Ok(())
    }

    /// Delay vector for observation `index`.
    pub fn calculate_vector_position(
        &self,
        index: i64,
        dataset: &TabularDataset,
    ) -> Result<[f64; 3]> {
        if index < 0 {
            return Err(CoreError::NegativeIndex { index }.logged());
        }
        let tau = self.tau as i64;
        Ok([
            self.retrieve_coordinate_value(index, dataset)?,
            self.retrieve_coordinate_value(index - tau, dataset)?,
            self.retrieve_coordinate_value(index - 2 * tau, dataset)?,
        ])
    }

    /// Plotted value at `index`, or `0` before the start of the series.
    pub fn retrieve_coordinate_value(&self, index: i64, dataset: &TabularDataset) -> Result<f64> {
        if index < 0 {
            return Ok(0.0);
        }
        let index = index as usize;
        dataset.displayed_value(index).ok_or_else(|| {
            CoreError::IndexOutOfBounds {
                index,
                len: dataset.len(),
            }
            .logged()
        })
    }

    /// One delay vector per dataset point, in row order.
    pub fn add_points(&mut self, dataset: &TabularDataset) -> Result<()> {
        let points = (0..dataset.points().len())
            .map(|index| {
                Ok(PhaseSpacePoint {
                    index,
                    position: self.calculate_vector_position(index as i64, dataset)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        self.points = points;
        Ok(())
    }

    pub fn set_range(&mut self, dataset: &TabularDataset) -> Result<()> {
        let range = AxisRange::from_values(&dataset.displayed_values())?;
        self.y_range = Some(range);
        Ok(())
    }

    pub fn y_range(&self) -> Result<AxisRange> {
        AxisRange::checked(self.y_range)
    }

    /// Rebuild the embedding. Expects `dataset.populate_points()` to have run.
    pub fn update_embedded_points(&mut self, dataset: &TabularDataset) -> Result<()> {
        self.points.clear();
        self.add_points(dataset)?;
        log::debug!(
            "Embedded {} points with tau {}",
            self.points.len(),
            self.tau
        );
        Ok(())
    }

    /// Position scaled by the range's largest bound, inside `[-1, 1]^3`.
    pub fn normalized_position(&self, point: &PhaseSpacePoint) -> Result<[f64; 3]> {
        let bound = self.y_range()?.magnitude();
        if bound == 0.0 {
            return Ok(point.position);
        }
        Ok(point.position.map(|c| c / bound))
    }

    pub fn points(&self) -> &[PhaseSpacePoint] {
        &self.points
    }

    pub fn is_populated(&self) -> bool {
        !self.points.is_empty()
    }

    /// Render records joining delay vectors with the dataset's point data.
    pub fn embedded_points(&self, dataset: &TabularDataset) -> Vec<EmbeddedPoint> {
        self.points
            .iter()
            .filter_map(|w| {
                let p = dataset.point(w.index)?;
                let [x, y, z] = w.position;
                Some(EmbeddedPoint {
                    x,
                    y,
                    z,
                    time_label: p.time_label().to_string(),
                    value: p.value(),
                    selected: p.is_selected(),
                })
            })
            .collect()
    }
}
