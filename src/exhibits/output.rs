//! Writing rendered exhibits to disk
//!
//! Flow per exhibit:
//! 1. Ensure the output directory exists
//! 2. Render PNG and/or SVG to `<dir>/<file_stem>.{png,svg}`
//! 3. Record the produced paths and byte sizes
//!
//! After a run, `write_manifest` serializes every `ExhibitOutput` to
//! `<dir>/manifest.json`.

use super::error::{ExhibitError, Result};
use super::figure::Figure;
use crate::config::RenderConfig;
use crate::render;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Manifest file name inside the output directory
pub const MANIFEST_FILE: &str = "manifest.json";

/// One file produced for an exhibit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputFile {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Files produced for one exhibit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExhibitOutput {
    pub id: String,
    pub file_stem: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub png: Option<OutputFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svg: Option<OutputFile>,
}

#[derive(Serialize)]
struct Manifest<'a> {
    generator: &'static str,
    version: &'static str,
    exhibits: &'a [ExhibitOutput],
}

/// Create the output directory and any missing parents
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|source| ExhibitError::DirectoryCreate {
        path: dir.to_path_buf(),
        source,
    })
}

fn output_file(path: PathBuf) -> Result<OutputFile> {
    let bytes = std::fs::metadata(&path)?.len();
    Ok(OutputFile { path, bytes })
}

/// Render one figure in the configured formats
pub fn write_exhibit(figure: &Figure, config: &RenderConfig) -> Result<ExhibitOutput> {
    ensure_output_dir(&config.output_dir)?;

    let png = if config.format.wants_png() {
        let path = config.output_dir.join(format!("{}.png", figure.file_stem));
        render::render_png(figure, config, &path)?;
        let file = output_file(path)?;
        tracing::debug!("  {} ({} bytes)", file.path.display(), file.bytes);
        Some(file)
    } else {
        None
    };

    let svg = if config.format.wants_svg() {
        let path = config.output_dir.join(format!("{}.svg", figure.file_stem));
        render::render_svg(figure, config, &path)?;
        let file = output_file(path)?;
        tracing::debug!("  {} ({} bytes)", file.path.display(), file.bytes);
        Some(file)
    } else {
        None
    };

    Ok(ExhibitOutput {
        id: figure.id.clone(),
        file_stem: figure.file_stem.clone(),
        title: figure.title.clone(),
        png,
        svg,
    })
}

/// Write `manifest.json` listing every produced file, returns its path
pub fn write_manifest(dir: &Path, outputs: &[ExhibitOutput]) -> Result<PathBuf> {
    ensure_output_dir(dir)?;

    let manifest = Manifest {
        generator: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        exhibits: outputs,
    };
    let path = dir.join(MANIFEST_FILE);
    std::fs::write(&path, serde_json::to_string_pretty(&manifest)?)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exhibits::catalog::find;
    use crate::exhibits::data::Dataset;
    use crate::exhibits::properties::PropertyValue;

    fn config_for(dir: &Path, format: &str) -> RenderConfig {
        RenderConfig::from_properties(&[
            PropertyValue::new("output.dir", dir.to_string_lossy()),
            PropertyValue::new("output.format", format),
            PropertyValue::new("png.dpi", "50"),
        ])
    }

    #[test]
    fn test_ensure_output_dir_creates_parents() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b");
        ensure_output_dir(&nested).unwrap();
        assert!(nested.is_dir());
        // Existing directory is fine
        ensure_output_dir(&nested).unwrap();
    }

    #[test]
    fn test_ensure_output_dir_over_file_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("taken");
        std::fs::write(&file, "x").unwrap();

        let err = ensure_output_dir(&file.join("sub")).unwrap_err();
        assert!(matches!(err, ExhibitError::DirectoryCreate { .. }));
    }

    #[test]
    fn test_write_svg_only() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_for(tmp.path(), "svg");
        let figure = find("9.3").unwrap().build(&Dataset::default()).unwrap();

        let output = write_exhibit(&figure, &config).unwrap();
        assert!(output.png.is_none());
        let svg = output.svg.unwrap();
        assert_eq!(svg.path, tmp.path().join("Exhibit9_3_Nuevos_Usuarios.svg"));
        assert!(svg.bytes > 0);
        assert!(!tmp.path().join("Exhibit9_3_Nuevos_Usuarios.png").exists());
    }

    #[test]
    fn test_manifest_lists_outputs() {
        let tmp = tempfile::tempdir().unwrap();
        let outputs = vec![ExhibitOutput {
            id: "9.1".to_string(),
            file_stem: "Exhibit9_1_Ahorros_Anuales_USD".to_string(),
            title: "Ahorros".to_string(),
            png: None,
            svg: Some(OutputFile {
                path: tmp.path().join("Exhibit9_1_Ahorros_Anuales_USD.svg"),
                bytes: 1234,
            }),
        }];

        let path = write_manifest(tmp.path(), &outputs).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();

        assert_eq!(json["generator"], "pix_exhibits");
        assert_eq!(json["exhibits"][0]["id"], "9.1");
        assert_eq!(json["exhibits"][0]["svg"]["bytes"], 1234);
        assert!(json["exhibits"][0].get("png").is_none());
    }
}
