//! Render configuration from exhibit properties
//!
//! Configuration is loaded from render properties (defined in renderer.json).
//! All default values come from renderer.json - no hardcoded fallbacks in this code.
//!
//! User values are layered: the optional JSON config file first, then
//! command-line overrides appended after it (later values win).

use crate::exhibits::error::{ExhibitError, Result};
use crate::exhibits::figure::SizeInches;
use crate::exhibits::palettes::{
    DEFAULT_CATEGORICAL_PALETTE, DEFAULT_STATUS_PALETTE, GRAYSCALE_PALETTE,
    GRAYSCALE_STATUS_PALETTE,
};
use crate::exhibits::properties::{PlotDimension, PropertyValue};
use crate::exhibits::render_properties::RenderPropertyReader;
use std::path::{Path, PathBuf};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "render_config.json";

/// Which files are written per exhibit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Svg,
    Both,
}

impl OutputFormat {
    /// Parse from string value
    ///
    /// Validation happens in RenderPropertyReader.get_enum()
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "png" => Self::Png,
            "svg" => Self::Svg,
            _ => Self::Both,
        }
    }

    pub fn wants_png(self) -> bool {
        matches!(self, Self::Png | Self::Both)
    }

    pub fn wants_svg(self) -> bool {
        matches!(self, Self::Svg | Self::Both)
    }
}

/// Colour theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    /// Explicit Pix/CoDi brand colours where an exhibit pins them
    Brand,
    /// Palette slots only
    Default,
    /// Print-friendly gray palettes
    Grayscale,
}

impl Theme {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "default" => Self::Default,
            "grayscale" => Self::Grayscale,
            _ => Self::Brand,
        }
    }

    /// Categorical palette used when no `palette` property is set
    pub fn categorical_palette(self) -> &'static str {
        match self {
            Self::Grayscale => GRAYSCALE_PALETTE,
            Self::Brand | Self::Default => DEFAULT_CATEGORICAL_PALETTE,
        }
    }

    pub fn status_palette(self) -> &'static str {
        match self {
            Self::Grayscale => GRAYSCALE_STATUS_PALETTE,
            Self::Brand | Self::Default => DEFAULT_STATUS_PALETTE,
        }
    }

    pub fn honors_brand_colors(self) -> bool {
        self == Self::Brand
    }
}

#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Directory receiving PNG/SVG files and the manifest
    pub output_dir: PathBuf,

    pub format: OutputFormat,

    /// Raster resolution; also scales fonts and strokes in the PNG
    pub png_dpi: f64,

    /// Units per inch of the SVG canvas
    pub svg_dpi: f64,

    /// Canvas width (pixels or Auto = figure width × DPI)
    pub plot_width: PlotDimension,

    /// Canvas height (pixels or Auto = figure height × DPI)
    pub plot_height: PlotDimension,

    pub theme: Theme,

    /// Categorical palette override (None = theme palette)
    pub palette: Option<String>,

    pub font_family: String,

    pub show_footnotes: bool,

    /// Render exhibits concurrently on blocking worker threads
    pub parallel: bool,

    pub write_manifest: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::from_properties(&[])
    }
}

impl RenderConfig {
    /// Create config from render properties
    ///
    /// All default values come from renderer.json via RenderPropertyReader.
    pub fn from_properties(values: &[PropertyValue]) -> Self {
        let props = RenderPropertyReader::new(values);

        let output_dir = PathBuf::from(props.get_string("output.dir"));
        let format = OutputFormat::parse(&props.get_enum("output.format"));

        let png_dpi = props.get_f64_in_range("png.dpi", 50.0, 600.0);
        let svg_dpi = props.get_f64_in_range("svg.dpi", 50.0, 600.0);

        // "auto" → Auto (figure size × DPI), "1500" → Pixels(1500) in [100-10000]
        let plot_width =
            PlotDimension::parse(&props.get_string("plot.width"), PlotDimension::Auto);
        let plot_height =
            PlotDimension::parse(&props.get_string("plot.height"), PlotDimension::Auto);

        let theme = Theme::parse(&props.get_enum("theme"));
        let palette = props.get_optional_string("palette");
        let font_family = props.get_string("font.family");

        let show_footnotes = props.get_enum("footnotes") == "show";
        let parallel = props.get_bool("render.parallel");
        let write_manifest = props.get_bool("manifest");

        Self {
            output_dir,
            format,
            png_dpi,
            svg_dpi,
            plot_width,
            plot_height,
            theme,
            palette,
            font_family,
            show_footnotes,
            parallel,
            write_manifest,
        }
    }

    /// Resolve the canvas size in pixels for a figure at the given DPI
    ///
    /// Returns (width, height) in pixels
    pub fn resolve_dimensions(&self, size_in: SizeInches, dpi: f64) -> (u32, u32) {
        (
            self.plot_width.resolve(size_in.0, dpi),
            self.plot_height.resolve(size_in.1, dpi),
        )
    }

    /// Name of the categorical palette to draw with
    pub fn categorical_palette(&self) -> &str {
        self.palette
            .as_deref()
            .unwrap_or_else(|| self.theme.categorical_palette())
    }
}

/// Read a flat JSON object of property values
///
/// Strings, numbers and booleans are accepted; other values are skipped with
/// a warning.
pub fn load_properties_file(path: &Path) -> Result<Vec<PropertyValue>> {
    let json = std::fs::read_to_string(path).map_err(|e| {
        ExhibitError::Config(format!("cannot read {}: {}", path.display(), e))
    })?;
    parse_properties_json(&json)
}

/// Load the config file if present
///
/// An explicitly requested file must exist; the default file is optional.
pub fn load_user_properties(explicit: Option<&Path>) -> Result<Vec<PropertyValue>> {
    match explicit {
        Some(path) => {
            let values = load_properties_file(path)?;
            tracing::info!("Loaded configuration from {}", path.display());
            Ok(values)
        }
        None => {
            let path = Path::new(DEFAULT_CONFIG_FILE);
            if path.exists() {
                let values = load_properties_file(path)?;
                tracing::info!("Loaded configuration from {}", DEFAULT_CONFIG_FILE);
                Ok(values)
            } else {
                tracing::debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                Ok(Vec::new())
            }
        }
    }
}

fn parse_properties_json(json: &str) -> Result<Vec<PropertyValue>> {
    let config_map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;

    let mut property_values = Vec::new();
    for (key, value) in config_map {
        let value_str = match value {
            serde_json::Value::String(s) => s,
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Bool(b) => b.to_string(),
            other => {
                tracing::warn!("Ignoring property '{}' with non-scalar value {}", key, other);
                continue;
            }
        };
        property_values.push(PropertyValue::new(key, value_str));
    }

    Ok(property_values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exhibits::palettes::palette_registry;

    #[test]
    fn test_defaults_come_from_registry() {
        let config = RenderConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("results"));
        assert_eq!(config.format, OutputFormat::Both);
        assert_eq!(config.png_dpi, 300.0);
        assert_eq!(config.svg_dpi, 72.0);
        assert_eq!(config.plot_width, PlotDimension::Auto);
        assert_eq!(config.theme, Theme::Brand);
        assert_eq!(config.palette, None);
        assert_eq!(config.font_family, "sans-serif");
        assert!(config.show_footnotes);
        assert!(config.parallel);
        assert!(config.write_manifest);
    }

    #[test]
    fn test_overrides_win() {
        let config = RenderConfig::from_properties(&[
            PropertyValue::new("output.format", "png"),
            PropertyValue::new("png.dpi", "150"),
            PropertyValue::new("theme", "Grayscale"),
            PropertyValue::new("footnotes", "hide"),
            PropertyValue::new("render.parallel", "false"),
            PropertyValue::new("plot.width", "1200"),
        ]);
        assert_eq!(config.format, OutputFormat::Png);
        assert!(config.format.wants_png());
        assert!(!config.format.wants_svg());
        assert_eq!(config.png_dpi, 150.0);
        assert_eq!(config.theme, Theme::Grayscale);
        assert_eq!(config.categorical_palette(), "Grayscale");
        assert!(!config.show_footnotes);
        assert!(!config.parallel);
        assert_eq!(config.plot_width, PlotDimension::Pixels(1200));
    }

    #[test]
    fn test_theme_palettes_exist_in_registry() {
        let registry = palette_registry();
        for theme in [Theme::Brand, Theme::Default, Theme::Grayscale] {
            assert!(registry.get(theme.categorical_palette()).is_some(), "{:?}", theme);
            assert!(registry.get(theme.status_palette()).is_some(), "{:?}", theme);
        }
        assert_eq!(
            registry.get(Theme::Brand.categorical_palette()).map(|p| p.name.as_str()),
            registry.default_categorical().map(|p| p.name.as_str())
        );
        assert_eq!(
            registry.get(Theme::Default.status_palette()).map(|p| p.name.as_str()),
            registry.default_status().map(|p| p.name.as_str())
        );
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = RenderConfig::from_properties(&[
            PropertyValue::new("png.dpi", "5000"),
            PropertyValue::new("output.format", "gif"),
            PropertyValue::new("theme", "neon"),
        ]);
        assert_eq!(config.png_dpi, 300.0);
        assert_eq!(config.format, OutputFormat::Both);
        assert_eq!(config.theme, Theme::Brand);
    }

    #[test]
    fn test_later_values_override_earlier() {
        let config = RenderConfig::from_properties(&[
            PropertyValue::new("output.dir", "from_file"),
            PropertyValue::new("output.dir", "from_cli"),
        ]);
        assert_eq!(config.output_dir, PathBuf::from("from_cli"));
    }

    #[test]
    fn test_resolve_dimensions() {
        let config = RenderConfig::default();
        assert_eq!(config.resolve_dimensions((10.0, 6.0), 300.0), (3000, 1800));
        assert_eq!(config.resolve_dimensions((9.0, 6.0), 72.0), (648, 432));

        let config = RenderConfig::from_properties(&[PropertyValue::new("plot.height", "900")]);
        assert_eq!(config.resolve_dimensions((12.0, 7.0), 100.0), (1200, 900));
    }

    #[test]
    fn test_palette_override() {
        let config = RenderConfig::from_properties(&[PropertyValue::new("palette", "Brand")]);
        assert_eq!(config.categorical_palette(), "Brand");
    }

    #[test]
    fn test_parse_properties_json() {
        let values = parse_properties_json(
            r#"{"output.dir": "out", "png.dpi": 200, "manifest": false, "nested": {"a": 1}}"#,
        )
        .unwrap();
        assert_eq!(values.len(), 3);
        assert!(values.contains(&PropertyValue::new("png.dpi", "200")));
        assert!(values.contains(&PropertyValue::new("manifest", "false")));

        let config = RenderConfig::from_properties(&values);
        assert_eq!(config.png_dpi, 200.0);
        assert!(!config.write_manifest);
    }

    #[test]
    fn test_config_file_errors() {
        assert!(parse_properties_json("[1, 2]").is_err());
        let missing = load_properties_file(Path::new("definitely/not/here.json"));
        assert!(matches!(missing, Err(ExhibitError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("render_config.json");
        std::fs::write(&path, r#"{"theme": "default", "svg.dpi": "96"}"#).unwrap();

        let values = load_user_properties(Some(&path)).unwrap();
        let config = RenderConfig::from_properties(&values);
        assert_eq!(config.theme, Theme::Default);
        assert_eq!(config.svg_dpi, 96.0);
    }
}
