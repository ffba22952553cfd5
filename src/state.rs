use serde::Serialize;

use crate::config::ViewConfig;
use crate::data::dataset::TabularDataset;
use crate::data::loader::RawTable;
use crate::data::model::Row;
use crate::error::{CoreError, Result};
use crate::projection::{
    AxisRange, EmbeddedPoint, PhaseSpaceProjection, PlottedPoint, TimeSeriesProjection,
};

/// Upper bound on tick values copied into a [`Snapshot`].
pub const MAX_SNAPSHOT_TICKS: usize = 1_000;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The dataset and both projections, independent of rendering.
///
/// Every mutating call leaves the projections rebuilt for the current
/// selection, so a renderer can read positions straight after it.
pub struct AppState {
    /// Loaded dataset (None until the first successful load).
    pub dataset: Option<TabularDataset>,

    pub time_series: TimeSeriesProjection,

    pub phase_space: PhaseSpaceProjection,

    pub config: ViewConfig,

    /// Last error, for display.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            time_series: TimeSeriesProjection::default(),
            phase_space: PhaseSpaceProjection::default(),
            config: ViewConfig::default(),
            status_message: None,
        }
    }
}

impl AppState {
    pub fn with_config(config: ViewConfig) -> Result<Self> {
        Ok(Self {
            time_series: TimeSeriesProjection::new(config.horizontal_left, config.horizontal_span),
            phase_space: PhaseSpaceProjection::with_tau(config.default_tau)?,
            config,
            ..Self::default()
        })
    }

    /// Replace the dataset with a freshly loaded one.
    ///
    /// The new dataset and projections are built aside and only swapped in
    /// once everything succeeded; on error the previous dataset stays.
    pub fn set_dataset(&mut self, rows: Vec<Row>, headers: Vec<String>) -> Result<()> {
        let mut dataset = TabularDataset::new();
        let mut time_series = self.time_series.clone();
        let mut phase_space = self.phase_space.clone();

        let built = dataset.load(rows, headers).and_then(|()| {
            dataset.set_first_differencing(self.config.first_differencing);
            rebuild(&mut dataset, &mut time_series, &mut phase_space)
        });
        if let Err(err) = built {
            return Err(self.fail(err));
        }

        self.dataset = Some(dataset);
        self.time_series = time_series;
        self.phase_space = phase_space;
        self.status_message = None;
        Ok(())
    }

    pub fn set_table(&mut self, table: RawTable) -> Result<()> {
        self.set_dataset(table.rows, table.headers)
    }

    /// Rebuild both projections from the current dataset.
    pub fn refresh(&mut self) -> Result<()> {
        let Some(dataset) = self.dataset.as_mut() else {
            return Ok(());
        };
        let result = rebuild(dataset, &mut self.time_series, &mut self.phase_space);
        result.map_err(|err| self.fail(err))
    }

    pub fn select_y_header(&mut self, header: &str) -> Result<()> {
        self.ensure_dataset()?;
        if let Some(dataset) = self.dataset.as_mut() {
            dataset.set_y_header(header);
        }
        self.refresh()
    }

    pub fn next_y_header(&mut self) -> Result<()> {
        self.ensure_dataset()?;
        if let Some(dataset) = self.dataset.as_mut() {
            self.time_series.increment_y_header(dataset);
        }
        self.refresh()
    }

    pub fn previous_y_header(&mut self) -> Result<()> {
        self.ensure_dataset()?;
        if let Some(dataset) = self.dataset.as_mut() {
            self.time_series.decrement_y_header(dataset);
        }
        self.refresh()
    }

    pub fn set_first_differencing(&mut self, enabled: bool) -> Result<()> {
        self.config.first_differencing = enabled;
        if let Some(dataset) = self.dataset.as_mut() {
            dataset.set_first_differencing(enabled);
        }
        self.refresh()
    }

    /// Change the embedding delay. Only the phase-space points are rebuilt;
    /// dataset points and their selection are left alone.
    pub fn set_tau(&mut self, tau: i64) -> Result<()> {
        if let Err(err) = self.phase_space.set_tau(tau) {
            return Err(self.fail(err));
        }
        let Some(dataset) = self.dataset.as_ref() else {
            return Ok(());
        };
        let result = self.phase_space.update_embedded_points(dataset);
        result.map_err(|err| self.fail(err))
    }

    /// Flag a point as selected. Renderers pick this up on their next read.
    pub fn set_point_selected(&mut self, index: usize, selected: bool) -> Result<()> {
        self.ensure_dataset()?;
        let result = match self.dataset.as_mut() {
            Some(dataset) => dataset.set_selected(index, selected),
            None => Ok(()),
        };
        result.map_err(|err| self.fail(err))
    }

    /// Everything a renderer needs for one frame.
    pub fn snapshot(&self) -> Result<Snapshot> {
        let Some(dataset) = self.dataset.as_ref() else {
            return Err(CoreError::EmptyDataset.logged());
        };
        Ok(Snapshot {
            time_header: dataset.time_header().unwrap_or_default().to_string(),
            y_header: dataset.y_header().unwrap_or_default().to_string(),
            first_differencing: dataset.first_differencing(),
            tau: self.phase_space.tau(),
            y_range: self.time_series.y_range()?,
            y_ticks: self
                .time_series
                .time_series_y_range()?
                .take(MAX_SNAPSHOT_TICKS)
                .collect(),
            x_ticks: self
                .time_series
                .time_series_x_range(dataset)
                .into_iter()
                .map(str::to_string)
                .collect(),
            time_series: self.time_series.plotted_points(dataset),
            phase_space: self.phase_space.embedded_points(dataset),
        })
    }

    fn ensure_dataset(&mut self) -> Result<()> {
        if self.dataset.is_some() {
            return Ok(());
        }
        Err(self.fail(CoreError::EmptyDataset.logged()))
    }

    /// Record an (already logged) error for display and hand it back.
    fn fail(&mut self, err: CoreError) -> CoreError {
        self.status_message = Some(err.to_string());
        err
    }
}

fn rebuild(
    dataset: &mut TabularDataset,
    time_series: &mut TimeSeriesProjection,
    phase_space: &mut PhaseSpaceProjection,
) -> Result<()> {
    time_series.update_point_position(dataset)?;
    phase_space.set_range(dataset)?;
    phase_space.update_embedded_points(dataset)
}

// ---------------------------------------------------------------------------
// Snapshot – serialisable view of both projections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub time_header: String,
    pub y_header: String,
    pub first_differencing: bool,
    pub tau: usize,
    pub y_range: AxisRange,
    pub y_ticks: Vec<f64>,
    pub x_ticks: Vec<String>,
    pub time_series: Vec<PlottedPoint>,
    pub phase_space: Vec<EmbeddedPoint>,
}
