//! Pix vs CoDi/DiMo comparative exhibits
//!
//! Builds each exhibit of the study from literal tables and renders it to
//! PNG and SVG with plotters.
//!
//! Module organization:
//! - `exhibits`: tables, metrics, figure model, catalogue, file output
//! - `render`: drawing a figure on a plotters backend
//! - `pipeline`: rendering a selection of exhibits
//! - `config`: render properties layered from defaults, file and CLI
//! - `cli`, `logging`, `memprof`: binary support

pub mod cli;
pub mod config;
pub mod exhibits;
pub mod logging;
pub mod memprof;
pub mod pipeline;
pub mod render;

pub use config::RenderConfig;
pub use logging::{init_logging, Verbosity};
pub use pipeline::generate_exhibits;
