use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// View configuration
// ---------------------------------------------------------------------------

/// Layout and embedding defaults. Every field is optional in the JSON file.
///
/// ```json
/// { "horizontal_left": -1.0, "horizontal_span": 2.0, "default_tau": 3 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Left edge of the time-series x extent.
    pub horizontal_left: f64,
    /// Width of the time-series x extent.
    pub horizontal_span: f64,
    /// Initial delay for the phase-space embedding.
    pub default_tau: i64,
    /// Whether newly loaded data starts out differenced.
    pub first_differencing: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            horizontal_left: -1.0,
            horizontal_span: 2.0,
            default_tau: 1,
            first_differencing: false,
        }
    }
}

impl ViewConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: ViewConfig = serde_json::from_str(text).context("parsing view config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.horizontal_span.is_finite() && self.horizontal_span > 0.0,
            "horizontal_span must be positive, got {}",
            self.horizontal_span
        );
        ensure!(
            self.horizontal_left.is_finite(),
            "horizontal_left must be finite"
        );
        ensure!(
            self.default_tau >= 1,
            "default_tau must be at least 1, got {}",
            self.default_tau
        );
        Ok(())
    }
}
