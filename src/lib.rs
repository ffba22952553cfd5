//! Time-series and phase-space projection of tabular data.
//!
//! A [`TabularDataset`](data::dataset::TabularDataset) owns validated rows and
//! the current selection (time column, value column, first differencing).
//! Two projections turn its points into coordinates:
//!
//! - [`TimeSeriesProjection`](projection::TimeSeriesProjection): 2-D layout
//!   with rounded y bounds and tick values.
//! - [`PhaseSpaceProjection`](projection::PhaseSpaceProjection): 3-D delay
//!   embedding `[v(t), v(t - tau), v(t - 2 tau)]`.
//!
//! [`AppState`](state::AppState) wires the three together.
//!
//! ```
//! use rusty_phase::data::model::Row;
//! use rusty_phase::state::AppState;
//!
//! let rows = vec![
//!     Row::new().with("Time", "t0").with("X", 12.0),
//!     Row::new().with("Time", "t1").with("X", 38.0),
//!     Row::new().with("Time", "t2").with("X", 7.0),
//! ];
//! let mut state = AppState::default();
//! state.set_dataset(rows, vec!["Time".into(), "X".into()]).unwrap();
//!
//! let snap = state.snapshot().unwrap();
//! assert_eq!(snap.y_range.max, 40.0);
//! assert_eq!(snap.phase_space[1].y, 12.0);
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod projection;
pub mod state;

pub use error::{CoreError, Result};
