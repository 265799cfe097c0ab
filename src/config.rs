//! Visual settings, loadable from TOML.
//!
//! Every field has a default, so a config file only needs the keys it changes:
//!
//! ```
//! use lintrans::config::VisualizerConfig;
//!
//! let config = VisualizerConfig::from_toml_str("default_size = 3.0").unwrap();
//! assert_eq!(config.default_size, 3.0);
//! assert_eq!(config.basis_colors, ["red".to_string(), "blue".to_string()]);
//! ```

use crate::error::VisualError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Qualitative ten-color cycle used for user vectors.
pub const DEFAULT_PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Appearance and defaults for a [`TransformationSession`](crate::session::TransformationSession).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    /// View half-size used by `fit_default`.
    pub default_size: f64,
    /// Colors cycled through for user vectors, restarting at each `transform`.
    pub palette: Vec<String>,
    /// Colors of the `i` and `j` markers.
    pub basis_colors: [String; 2],
    /// Side of one square panel in the SVG output, in pixels.
    pub panel_pixels: f64,
    /// Space around and between panels, in pixels.
    pub panel_gap: f64,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            default_size: 5.0,
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            basis_colors: ["red".to_string(), "blue".to_string()],
            panel_pixels: 500.0,
            panel_gap: 40.0,
        }
    }
}

impl VisualizerConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, VisualError> {
        Ok(toml::from_str(s)?)
    }

    /// Reads and parses a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, VisualError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Color of the `n`-th user vector within one `transform` call.
    pub fn palette_color(&self, n: usize) -> &str {
        if self.palette.is_empty() {
            return DEFAULT_PALETTE[n % DEFAULT_PALETTE.len()];
        }
        &self.palette[n % self.palette.len()]
    }
}
