//! Render property definitions with defaults from renderer.json
//!
//! renderer.json is embedded at compile time so defaults are defined in ONE place
//! and never repeated as hardcoded fallbacks across the codebase.

use super::error::{ExhibitError, Result};
use super::properties::PropertyValue;
use serde::Deserialize;
use std::collections::HashMap;

/// renderer.json embedded at compile time
const RENDERER_JSON: &str = include_str!("../../renderer.json");

/// Property definition from renderer.json
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDef {
    pub name: String,
    pub kind: PropertyKind,
    #[serde(default)]
    pub default_value: String,
    #[serde(default)]
    pub description: String,
    /// Allowed values, enumerated properties only
    #[serde(default, rename = "values")]
    pub valid_values: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum PropertyKind {
    #[serde(rename = "StringProperty")]
    String,
    #[serde(rename = "EnumeratedProperty")]
    Enumerated,
}

#[derive(Deserialize)]
struct RendererDocument {
    properties: Vec<PropertyDef>,
}

/// Registry of all render properties with their defaults
#[derive(Debug, Default)]
pub struct PropertyRegistry {
    properties: HashMap<String, PropertyDef>,
}

impl PropertyRegistry {
    /// Parse a renderer.json document
    ///
    /// An enumerated property must list its values and include its default.
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: RendererDocument = serde_json::from_str(json)?;

        let mut properties = HashMap::with_capacity(doc.properties.len());
        for mut def in doc.properties {
            match def.kind {
                PropertyKind::String => def.valid_values = None,
                PropertyKind::Enumerated => {
                    let values = def.valid_values.as_deref().unwrap_or_default();
                    if !values.iter().any(|v| v.eq_ignore_ascii_case(&def.default_value)) {
                        return Err(ExhibitError::Config(format!(
                            "default '{}' of '{}' is not one of [{}]",
                            def.default_value,
                            def.name,
                            values.join(", ")
                        )));
                    }
                }
            }
            properties.insert(def.name.clone(), def);
        }

        Ok(Self { properties })
    }

    pub fn get_default(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(|p| p.default_value.as_str())
    }

    pub fn get_property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.get(name)
    }

    /// All property definitions, sorted by name
    pub fn definitions(&self) -> Vec<&PropertyDef> {
        let mut defs: Vec<&PropertyDef> = self.properties.values().collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Whether `value` is allowed; non-enumerated properties accept anything
    pub fn is_valid_enum_value(&self, name: &str, value: &str) -> bool {
        match self.properties.get(name).and_then(|p| p.valid_values.as_ref()) {
            Some(values) => values.iter().any(|v| v.eq_ignore_ascii_case(value)),
            None => true,
        }
    }
}

static REGISTRY: std::sync::OnceLock<PropertyRegistry> = std::sync::OnceLock::new();

/// The registry parsed from the embedded renderer.json
pub fn registry() -> &'static PropertyRegistry {
    REGISTRY.get_or_init(|| {
        PropertyRegistry::from_json(RENDERER_JSON).unwrap_or_else(|e| {
            tracing::error!("Failed to load renderer.json: {}", e);
            PropertyRegistry::default()
        })
    })
}

fn default_of(name: &str) -> &'static str {
    registry().get_default(name).unwrap_or("")
}

/// Typed render property reader
///
/// User values win over renderer.json defaults. Later values with the same
/// name override earlier ones, so CLI overrides can simply be appended after
/// the config file values.
pub struct RenderPropertyReader {
    user_values: HashMap<String, String>,
}

impl RenderPropertyReader {
    pub fn new(values: &[PropertyValue]) -> Self {
        let user_values = values
            .iter()
            .filter(|p| !p.value.is_empty()) // Empty = not set
            .map(|p| (p.name.clone(), p.value.clone()))
            .collect();

        Self { user_values }
    }

    pub fn get_string(&self, name: &str) -> String {
        self.user_values
            .get(name)
            .cloned()
            .unwrap_or_else(|| default_of(name).to_string())
    }

    /// Enumerated value, lowercased; invalid user values fall back to the default
    pub fn get_enum(&self, name: &str) -> String {
        let default = default_of(name);
        let Some(value) = self.user_values.get(name) else {
            return default.to_string();
        };

        let reg = registry();
        if reg.is_valid_enum_value(name, value) {
            return value.to_lowercase();
        }

        let allowed = reg
            .get_property(name)
            .and_then(|p| p.valid_values.as_ref())
            .map(|v| v.join(", "))
            .unwrap_or_default();
        tracing::warn!(
            "Invalid value '{}' for '{}' (allowed: {}), using '{}'",
            value,
            name,
            allowed,
            default
        );
        default.to_string()
    }

    /// Boolean stored as the "true"/"false" enum
    pub fn get_bool(&self, name: &str) -> bool {
        self.get_enum(name) == "true"
    }

    /// None when the value (user or default) is empty
    pub fn get_optional_string(&self, name: &str) -> Option<String> {
        Some(self.get_string(name)).filter(|v| !v.is_empty())
    }

    /// Numeric value; unparseable or non-finite input falls back to the default
    pub fn get_f64(&self, name: &str) -> f64 {
        let default = default_of(name).parse::<f64>().unwrap_or(0.0);
        let Some(value) = self.user_values.get(name) else {
            return default;
        };

        match value.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => {
                tracing::warn!("'{}' is not a number for '{}', using {}", value, name, default);
                default
            }
        }
    }

    /// Numeric value clamped to [min, max] by falling back to the default
    pub fn get_f64_in_range(&self, name: &str, min: f64, max: f64) -> f64 {
        let value = self.get_f64(name);
        if (min..=max).contains(&value) {
            return value;
        }

        let default = default_of(name).parse::<f64>().unwrap_or(min);
        tracing::warn!(
            "{} for '{}' is outside [{}, {}], using {}",
            value,
            name,
            min,
            max,
            default
        );
        default
    }
}
