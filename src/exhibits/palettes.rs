//! Palette registry for loading and accessing exhibit colour palettes
//!
//! Loads palettes from palettes.json (embedded at compile time) and provides
//! access by name.
//!
//! Palette types:
//! - `categorical`: Series colours, indexed by slot (colours repeat after exhausting the list)
//! - `status`: Scorecard colours in Met / Partial / NotMet order

use serde::Deserialize;
use std::collections::HashMap;

/// Embedded palettes.json content
const PALETTES_JSON: &str = include_str!("../../palettes.json");

/// Default categorical palette name (matplotlib's default cycle)
pub const DEFAULT_CATEGORICAL_PALETTE: &str = "Tableau10";

/// Default status palette name
pub const DEFAULT_STATUS_PALETTE: &str = "Status";

/// Print-friendly palettes used by the grayscale theme
pub const GRAYSCALE_PALETTE: &str = "Grayscale";
pub const GRAYSCALE_STATUS_PALETTE: &str = "StatusGray";

const FALLBACK_GRAY: [u8; 3] = [128, 128, 128];

/// Palette type as defined in palettes.json
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteType {
    Categorical,
    Status,
}

/// A single palette definition from palettes.json
#[derive(Debug, Clone, Deserialize)]
pub struct PaletteDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub palette_type: PaletteType,
    pub colors: Vec<String>,
}

impl PaletteDefinition {
    /// Get a color by index (wraps around)
    pub fn get_color(&self, index: usize) -> [u8; 3] {
        if self.colors.is_empty() {
            return FALLBACK_GRAY;
        }
        let idx = index % self.colors.len();
        parse_hex_color(&self.colors[idx]).unwrap_or(FALLBACK_GRAY)
    }
}

/// Registry of all available palettes
#[derive(Debug, Clone, Default)]
pub struct PaletteRegistry {
    /// All palettes by name (lowercase keys for case-insensitive lookup)
    palettes: HashMap<String, PaletteDefinition>,
    categorical_names: Vec<String>,
    status_names: Vec<String>,
}

impl PaletteRegistry {
    /// Load palettes from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let definitions: Vec<PaletteDefinition> = serde_json::from_str(json)?;

        let mut registry = Self::default();

        for def in definitions {
            let name = def.name.clone();
            match def.palette_type {
                PaletteType::Categorical => registry.categorical_names.push(name.clone()),
                PaletteType::Status => registry.status_names.push(name.clone()),
            }
            registry.palettes.insert(name.to_lowercase(), def);
        }

        tracing::debug!(
            "PaletteRegistry: loaded {} palettes ({} categorical, {} status)",
            registry.palettes.len(),
            registry.categorical_names.len(),
            registry.status_names.len()
        );

        Ok(registry)
    }

    /// Get a palette by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&PaletteDefinition> {
        self.palettes.get(&name.to_lowercase())
    }

    pub fn default_categorical(&self) -> Option<&PaletteDefinition> {
        self.get(DEFAULT_CATEGORICAL_PALETTE)
    }

    pub fn default_status(&self) -> Option<&PaletteDefinition> {
        self.get(DEFAULT_STATUS_PALETTE)
    }

    pub fn categorical_palettes(&self) -> &[String] {
        &self.categorical_names
    }

    pub fn status_palettes(&self) -> &[String] {
        &self.status_names
    }
}

static PALETTE_REGISTRY: std::sync::OnceLock<PaletteRegistry> = std::sync::OnceLock::new();

/// Global palette registry, initialized lazily on first access
pub fn palette_registry() -> &'static PaletteRegistry {
    PALETTE_REGISTRY.get_or_init(|| {
        PaletteRegistry::from_json(PALETTES_JSON).unwrap_or_else(|e| {
            tracing::error!("Failed to load palettes.json: {}", e);
            PaletteRegistry::default()
        })
    })
}

/// Parse a hex color string to RGB array
///
/// Supports formats:
/// - `#RRGGBB` (6 hex digits)
/// - `#RRGGBBAA` (8 hex digits, alpha ignored)
/// - `RRGGBB` / `RRGGBBAA` (without #)
pub fn parse_hex_color(hex: &str) -> Option<[u8; 3]> {
    let hex = hex.trim_start_matches('#');

    if (hex.len() != 6 && hex.len() != 8) || !hex.is_ascii() {
        tracing::warn!("Invalid hex color '{}'", hex);
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some([r, g, b])
}
