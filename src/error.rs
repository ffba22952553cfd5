use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy for the dataset and projection core
// ---------------------------------------------------------------------------

/// Local validation failures raised by the dataset and the projections.
///
/// None of these are retried internally. Callers get the error back after it
/// has been reported once to the log (see [`CoreError::logged`]).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("dataset has no rows")]
    EmptyDataset,

    #[error("no 'Time' or 'time' column among headers {headers:?}")]
    MissingTimeHeader { headers: Vec<String> },

    #[error("need a time column and at least one value column, got {count} header(s)")]
    InsufficientHeaders { count: usize },

    #[error("row {row}: expected {expected} values but found {actual}")]
    RowShape {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("row {row}: more values than the header defines")]
    ExtraColumn { row: usize },

    #[error("row {row}, column '{column}': '{value}' is not a number")]
    TypeViolation {
        row: usize,
        column: String,
        value: String,
    },

    #[error("observation index {index} is negative")]
    NegativeIndex { index: i64 },

    #[error("observation index {index} is out of bounds for {len} row(s)")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("tau must be at least 1, got {tau}")]
    InvalidTau { tau: i64 },

    #[error("{}", describe_range(.bounds))]
    InvertedRange { bounds: Option<(f64, f64)> },

    #[error("header '{header}' appears more than once")]
    DuplicateHeader { header: String },
}

fn describe_range(bounds: &Option<(f64, f64)>) -> String {
    match bounds {
        Some((min, max)) => format!("axis range is inverted (min {min}, max {max})"),
        None => "axis range has not been set".to_string(),
    }
}

impl CoreError {
    /// Report the error to the log sink and hand it back for propagation.
    pub fn logged(self) -> Self {
        log::error!("{self}");
        self
    }
}

pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logged_returns_the_same_error() {
        let err = CoreError::InvalidTau { tau: 0 }.logged();
        assert_eq!(err, CoreError::InvalidTau { tau: 0 });
    }

    #[test]
    fn messages_carry_context() {
        let err = CoreError::RowShape {
            row: 3,
            expected: 4,
            actual: 2,
        };
        assert_eq!(err.to_string(), "row 3: expected 4 values but found 2");

        let err = CoreError::TypeViolation {
            row: 0,
            column: "X".into(),
            value: "abc".into(),
        };
        assert!(err.to_string().contains("'X'"));
    }
}
