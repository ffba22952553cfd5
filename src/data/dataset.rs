use std::collections::{BTreeMap, BTreeSet};

use crate::error::{CoreError, Result};

use super::model::{Point, Row, EXTRA_COLUMN_KEY};

/// Header names recognised as the time axis, matched case-sensitively.
const TIME_HEADERS: [&str; 2] = ["Time", "time"];

// ---------------------------------------------------------------------------
// TabularDataset – validated rows plus selection state
// ---------------------------------------------------------------------------

/// The loaded table, the chosen time and value columns, and the derived
/// [`Point`] list.
///
/// Created empty, filled once by [`TabularDataset::load`]. `points` is only
/// ever rebuilt wholesale by [`TabularDataset::populate_points`].
#[derive(Debug, Clone, Default)]
pub struct TabularDataset {
    headers: Vec<String>,
    rows: Vec<Row>,
    /// Numeric value columns (every header except the time header).
    columns: BTreeMap<String, Vec<f64>>,
    time_header: Option<String>,
    y_header: Option<String>,
    first_differencing: bool,
    points: Vec<Point>,
}

impl TabularDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and store a complete row set.
    ///
    /// All checks run before anything is stored: on error the dataset is
    /// left exactly as it was.
    pub fn load(&mut self, rows: Vec<Row>, headers: Vec<String>) -> Result<()> {
        let (time_header, y_header, columns) =
            validate(&rows, &headers).map_err(CoreError::logged)?;

        log::info!(
            "Loaded {} rows with {} columns (time '{}', y '{}')",
            rows.len(),
            headers.len(),
            time_header,
            y_header
        );

        self.headers = headers;
        self.rows = rows;
        self.columns = columns;
        self.time_header = Some(time_header);
        self.y_header = Some(y_header);
        self.first_differencing = false;
        self.points.clear();
        Ok(())
    }

    /// First header named `Time` or `time`.
    pub fn find_time_header(&self) -> Result<String> {
        time_header_in(&self.headers)
            .map(str::to_string)
            .map_err(CoreError::logged)
    }

    /// First header that is not the time header.
    pub fn find_first_header(&self) -> Result<String> {
        if self.headers.len() <= 1 {
            return Err(CoreError::InsufficientHeaders {
                count: self.headers.len(),
            }
            .logged());
        }
        let time_header = self.find_time_header()?;
        first_value_header_in(&self.headers, &time_header)
            .map(str::to_string)
            .map_err(CoreError::logged)
    }

    /// Select the value column. Unknown headers (and the time header) are
    /// ignored without error.
    pub fn set_y_header(&mut self, header: &str) {
        if !self.columns.contains_key(header) {
            log::debug!("Ignoring y header '{header}': not a value column");
            return;
        }
        if self.y_header.as_deref() != Some(header) {
            log::info!("Y header set to '{header}'");
            self.y_header = Some(header.to_string());
        }
    }

    pub fn set_first_differencing(&mut self, enabled: bool) {
        if self.first_differencing != enabled {
            log::info!("First differencing {}", if enabled { "enabled" } else { "disabled" });
            self.first_differencing = enabled;
        }
    }

    /// Successive differences of the y column; index 0 is always `0`.
    pub fn calculate_first_differencing_values(&self) -> Vec<f64> {
        let values = self.y_values();
        let mut out = Vec::with_capacity(values.len());
        if !values.is_empty() {
            out.push(0.0);
        }
        out.extend(values.windows(2).map(|w| w[1] - w[0]));
        out
    }

    /// Values as currently plotted: differenced or raw.
    pub fn displayed_values(&self) -> Vec<f64> {
        if self.first_differencing {
            self.calculate_first_differencing_values()
        } else {
            self.y_values().to_vec()
        }
    }

    /// The plotted value of a single row, without materialising the series.
    pub fn displayed_value(&self, index: usize) -> Option<f64> {
        let values = self.y_values();
        let current = *values.get(index)?;
        if !self.first_differencing {
            return Some(current);
        }
        Some(match index {
            0 => 0.0,
            i => current - values[i - 1],
        })
    }

    /// Rebuild `points` from the rows, one per row.
    pub fn populate_points(&mut self) {
        let values = self.displayed_values();
        let time_header = self.time_header.as_deref().unwrap_or_default();

        self.points = self
            .rows
            .iter()
            .zip(values)
            .map(|(row, value)| {
                let label = row.get(time_header).map(|v| v.to_string()).unwrap_or_default();
                Point::new(label, value)
            })
            .collect();

        log::debug!("Populated {} points", self.points.len());
    }

    /// Raw y value of the first row in which *any* cell stringifies to
    /// `time_label`.
    ///
    /// Every column is searched, not just the time column.
    pub fn get_data_by_time(&self, time_label: &str) -> Option<f64> {
        let index = self
            .rows
            .iter()
            .position(|row| row.values().any(|v| v.to_string() == time_label))?;
        self.y_values().get(index).copied()
    }

    /// Mark a point as selected or not.
    pub fn set_selected(&mut self, index: usize, selected: bool) -> Result<()> {
        let len = self.points.len();
        let point = self
            .points
            .get_mut(index)
            .ok_or_else(|| CoreError::IndexOutOfBounds { index, len }.logged())?;
        point.set_selected(selected);
        Ok(())
    }

    /// Raw values of the y column.
    pub fn y_values(&self) -> &[f64] {
        self.y_header
            .as_ref()
            .and_then(|h| self.columns.get(h))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn time_header(&self) -> Option<&str> {
        self.time_header.as_deref()
    }

    pub fn y_header(&self) -> Option<&str> {
        self.y_header.as_deref()
    }

    pub fn first_differencing(&self) -> bool {
        self.first_differencing
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn point(&self, index: usize) -> Option<&Point> {
        self.points.get(index)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

fn time_header_in(headers: &[String]) -> Result<&str> {
    headers
        .iter()
        .find(|h| TIME_HEADERS.contains(&h.as_str()))
        .map(String::as_str)
        .ok_or_else(|| CoreError::MissingTimeHeader {
            headers: headers.to_vec(),
        })
}

fn first_value_header_in<'a>(headers: &'a [String], time_header: &str) -> Result<&'a str> {
    if headers.len() <= 1 {
        return Err(CoreError::InsufficientHeaders {
            count: headers.len(),
        });
    }
    headers
        .iter()
        .map(String::as_str)
        .find(|h| *h != time_header)
        .ok_or(CoreError::InsufficientHeaders {
            count: headers.len(),
        })
}

/// Check a candidate row set and extract its numeric columns.
fn validate(
    rows: &[Row],
    headers: &[String],
) -> Result<(String, String, BTreeMap<String, Vec<f64>>)> {
    if rows.is_empty() {
        return Err(CoreError::EmptyDataset);
    }

    let mut seen = BTreeSet::new();
    if let Some(header) = headers.iter().find(|h| !seen.insert(h.as_str())) {
        return Err(CoreError::DuplicateHeader {
            header: header.clone(),
        });
    }

    for (i, row) in rows.iter().enumerate() {
        if row.contains(EXTRA_COLUMN_KEY) {
            return Err(CoreError::ExtraColumn { row: i });
        }
        if row.len() != headers.len() || !headers.iter().all(|h| row.contains(h)) {
            return Err(CoreError::RowShape {
                row: i,
                expected: headers.len(),
                actual: row.len(),
            });
        }
    }

    let time_header = time_header_in(headers)?.to_string();
    let y_header = first_value_header_in(headers, &time_header)?.to_string();

    let mut columns = BTreeMap::new();
    for header in headers.iter().filter(|h| **h != time_header) {
        let mut values = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            let cell = row.get(header);
            match cell.and_then(|c| c.as_f64()) {
                Some(v) => values.push(v),
                None => {
                    return Err(CoreError::TypeViolation {
                        row: i,
                        column: header.clone(),
                        value: cell.map(|c| c.to_string()).unwrap_or_default(),
                    })
                }
            }
        }
        columns.insert(header.clone(), values);
    }

    Ok((time_header, y_header, columns))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> TabularDataset {
        let rows = vec![
            Row::new().with("Time", "t0").with("X", 10.0).with("Y", 1.0),
            Row::new().with("Time", "t1").with("X", 20.0).with("Y", 2.0),
            Row::new().with("Time", "t2").with("X", 45.0).with("Y", 3.0),
            Row::new().with("Time", "t3").with("X", 5.0).with("Y", 4.0),
        ];
        let mut ds = TabularDataset::new();
        ds.load(rows, headers(&["Time", "X", "Y"])).unwrap();
        ds
    }

    #[test]
    fn load_picks_time_and_first_value_header() {
        let ds = sample();
        assert_eq!(ds.time_header(), Some("Time"));
        assert_eq!(ds.y_header(), Some("X"));
        assert_eq!(ds.find_first_header().unwrap(), "X");
        assert_eq!(ds.len(), 4);
    }

    #[test]
    fn populate_points_one_per_row() {
        let mut ds = sample();
        ds.populate_points();
        let labels: Vec<_> = ds.points().iter().map(|p| p.time_label()).collect();
        assert_eq!(labels, vec!["t0", "t1", "t2", "t3"]);
        assert_eq!(ds.points()[2].value(), 45.0);
    }

    #[test]
    fn numeric_time_labels_are_stringified() {
        let rows = vec![
            Row::new().with("time", 1.0).with("V", 3.0),
            Row::new().with("time", 2.5).with("V", 4.0),
        ];
        let mut ds = TabularDataset::new();
        ds.load(rows, headers(&["time", "V"])).unwrap();
        ds.populate_points();
        assert_eq!(ds.points()[0].time_label(), "1");
        assert_eq!(ds.points()[1].time_label(), "2.5");
    }

    #[test]
    fn first_differencing_values() {
        let ds = sample();
        assert_eq!(
            ds.calculate_first_differencing_values(),
            vec![0.0, 10.0, 25.0, -40.0]
        );
    }

    #[test]
    fn differenced_points_and_single_values_agree() {
        let mut ds = sample();
        ds.set_first_differencing(true);
        ds.populate_points();
        let values: Vec<_> = ds.points().iter().map(|p| p.value()).collect();
        assert_eq!(values, vec![0.0, 10.0, 25.0, -40.0]);
        assert_eq!(ds.displayed_value(3), Some(-40.0));
        assert_eq!(ds.displayed_value(0), Some(0.0));
        assert_eq!(ds.displayed_value(4), None);
    }

    #[test]
    fn set_y_header_ignores_unknown_and_time() {
        let mut ds = sample();
        ds.set_y_header("Y");
        assert_eq!(ds.y_header(), Some("Y"));
        ds.set_y_header("nope");
        assert_eq!(ds.y_header(), Some("Y"));
        ds.set_y_header("Time");
        assert_eq!(ds.y_header(), Some("Y"));
    }

    #[test]
    fn get_data_by_time_matches_any_column() {
        let mut ds = sample();
        ds.set_y_header("Y");
        assert_eq!(ds.get_data_by_time("t2"), Some(3.0));
        // "20" is an X value, not a time label, but still matches row 1.
        assert_eq!(ds.get_data_by_time("20"), Some(2.0));
        assert_eq!(ds.get_data_by_time("t9"), None);
    }

    #[test]
    fn missing_time_header_is_rejected() {
        let rows = vec![Row::new().with("A", 1.0).with("B", 2.0)];
        let mut ds = TabularDataset::new();
        let err = ds.load(rows, headers(&["A", "B"])).unwrap_err();
        assert!(matches!(err, CoreError::MissingTimeHeader { .. }));
    }

    #[test]
    fn empty_rows_are_rejected() {
        let mut ds = TabularDataset::new();
        assert_eq!(
            ds.load(Vec::new(), headers(&["Time", "X"])),
            Err(CoreError::EmptyDataset)
        );
    }

    #[test]
    fn single_header_is_insufficient_before_time_lookup() {
        let ds = TabularDataset {
            headers: headers(&["A"]),
            ..Default::default()
        };
        assert_eq!(
            ds.find_first_header(),
            Err(CoreError::InsufficientHeaders { count: 1 })
        );

        let ds = TabularDataset {
            headers: headers(&["A", "B"]),
            ..Default::default()
        };
        assert!(matches!(
            ds.find_first_header(),
            Err(CoreError::MissingTimeHeader { .. })
        ));
    }

    #[test]
    fn duplicate_headers_are_rejected() {
        let rows = vec![Row::new().with("Time", "t0").with("X", 1.0)];
        let mut ds = sample();
        assert_eq!(
            ds.load(rows, headers(&["Time", "X", "X"])),
            Err(CoreError::DuplicateHeader { header: "X".into() })
        );
        // previous table untouched
        assert_eq!(ds.len(), 4);
        assert_eq!(ds.headers(), headers(&["Time", "X", "Y"]).as_slice());
    }

    #[test]
    fn time_only_table_has_insufficient_headers() {
        let rows = vec![Row::new().with("Time", "t0")];
        let mut ds = TabularDataset::new();
        assert_eq!(
            ds.load(rows, headers(&["Time"])),
            Err(CoreError::InsufficientHeaders { count: 1 })
        );
    }

    #[test]
    fn overflow_column_is_rejected() {
        let rows = vec![Row::new()
            .with("Time", "t0")
            .with("X", 1.0)
            .with(EXTRA_COLUMN_KEY, "9")];
        let mut ds = TabularDataset::new();
        assert_eq!(
            ds.load(rows, headers(&["Time", "X"])),
            Err(CoreError::ExtraColumn { row: 0 })
        );
    }

    #[test]
    fn short_row_is_rejected() {
        let rows = vec![
            Row::new().with("Time", "t0").with("X", 1.0),
            Row::new().with("Time", "t1"),
        ];
        let mut ds = TabularDataset::new();
        assert_eq!(
            ds.load(rows, headers(&["Time", "X"])),
            Err(CoreError::RowShape {
                row: 1,
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn text_in_value_column_is_rejected() {
        let rows = vec![Row::new().with("Time", "t0").with("X", "abc")];
        let mut ds = TabularDataset::new();
        let err = ds.load(rows, headers(&["Time", "X"])).unwrap_err();
        assert!(matches!(err, CoreError::TypeViolation { row: 0, .. }));
    }

    #[test]
    fn rejected_load_keeps_previous_state() {
        let mut ds = sample();
        ds.populate_points();
        let bad = vec![Row::new().with("A", 1.0).with("B", 2.0)];
        assert!(ds.load(bad, headers(&["A", "B"])).is_err());
        assert_eq!(ds.len(), 4);
        assert_eq!(ds.points().len(), 4);
        assert_eq!(ds.y_header(), Some("X"));
    }

    #[test]
    fn selection_goes_through_the_dataset() {
        let mut ds = sample();
        ds.populate_points();
        ds.set_selected(1, true).unwrap();
        assert!(ds.point(1).unwrap().is_selected());
        assert!(matches!(
            ds.set_selected(10, true),
            Err(CoreError::IndexOutOfBounds { index: 10, len: 4 })
        ));
    }

    #[test]
    fn empty_dataset_header_lookups_fail() {
        let ds = TabularDataset::new();
        assert!(matches!(
            ds.find_time_header(),
            Err(CoreError::MissingTimeHeader { .. })
        ));
        assert!(ds.calculate_first_differencing_values().is_empty());
    }
}
