//! Render property values and plot dimension parsing
//!
//! User-set properties arrive as plain name/value string pairs, whether they come
//! from the JSON config file or from command-line overrides. Typed access and
//! defaults live in `render_properties`.

use serde::{Deserialize, Serialize};

/// A single user-set property (name → raw string value)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyValue {
    pub name: String,
    pub value: String,
}

impl PropertyValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Plot dimension - either explicit pixels or "auto" (figure size × DPI)
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PlotDimension {
    #[default]
    Auto,
    Pixels(u32),
}

impl PlotDimension {
    /// Parse from string property value
    ///
    /// Valid formats:
    /// - "auto" or "" (empty) → Auto
    /// - "1500" → Pixels(1500) if in valid range [100, 10000]
    pub fn parse(value: &str, default: PlotDimension) -> Self {
        let trimmed = value.trim();

        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("auto") {
            return PlotDimension::Auto;
        }

        match trimmed.parse::<u32>() {
            Ok(px) if (100..=10000).contains(&px) => PlotDimension::Pixels(px),
            Ok(px) => {
                tracing::warn!(
                    "Plot dimension {} out of valid range [100-10000], using default: {:?}",
                    px,
                    default
                );
                default
            }
            Err(_) => {
                tracing::warn!(
                    "Invalid plot dimension '{}', using default: {:?}",
                    trimmed,
                    default
                );
                default
            }
        }
    }

    /// Resolve to actual pixels
    ///
    /// For Auto: the exhibit's figure size in inches times the output DPI,
    /// the way matplotlib sizes a figure (e.g. 10in × 300dpi = 3000px).
    pub fn resolve(&self, inches: f64, dpi: f64) -> u32 {
        match self {
            PlotDimension::Pixels(px) => *px,
            PlotDimension::Auto => (inches * dpi).round().max(1.0) as u32,
        }
    }
}
