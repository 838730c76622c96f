//! Exhibit data, metrics and figure definitions
//!
//! Module organization:
//! - `data`: literal source tables and their validation
//! - `metrics`: derived values shown in callouts
//! - `figure`: backend-independent chart model
//! - `catalog`: exhibit ids and their figure builders
//! - `output`: writing rendered files and the manifest
//! - `properties`, `render_properties`, `palettes`: embedded registries

pub mod catalog;
pub mod data;
pub mod error;
pub mod figure;
pub mod metrics;
pub mod output;
pub mod palettes;
pub mod properties;
pub mod render_properties;

pub use catalog::{catalog, find, select, Exhibit};
pub use data::Dataset;
pub use error::{ExhibitError, Result};
pub use figure::Figure;
pub use output::{write_exhibit, write_manifest, ExhibitOutput, OutputFile};
