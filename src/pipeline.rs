//! Exhibit generation pipeline
//!
//! The pipeline:
//! 1. Validates the literal tables
//! 2. Builds each selected exhibit's figure
//! 3. Renders PNG/SVG files (concurrently on blocking workers, or in order)
//! 4. Writes the manifest
//!
//! Outputs always come back in catalogue order.

use crate::config::RenderConfig;
use crate::exhibits::catalog::{catalog, Exhibit};
use crate::exhibits::data::Dataset;
use crate::exhibits::error::{ExhibitError, Result};
use crate::exhibits::output::{write_exhibit, write_manifest, ExhibitOutput};
use crate::memprof;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;

/// Build and write one exhibit
fn render_exhibit(exhibit: &Exhibit, data: &Dataset, config: &RenderConfig) -> Result<ExhibitOutput> {
    let start = Instant::now();
    let figure = exhibit.build(data)?;
    let output = write_exhibit(&figure, config)?;
    tracing::info!(
        "✓ {} → {} [{:.2}s]",
        exhibit.id,
        exhibit.file_stem,
        start.elapsed().as_secs_f64()
    );
    Ok(output)
}

/// Render the selected exhibits with the given configuration
///
/// The first failing exhibit aborts the run; its id is part of the error.
pub async fn generate_exhibits(
    selection: &[&'static Exhibit],
    config: &RenderConfig,
) -> Result<Vec<ExhibitOutput>> {
    let m0 = memprof::checkpoint("generate_exhibits START");
    let t0 = Instant::now();

    tracing::info!("[1/3] Validating tables...");
    let data = Dataset::default();
    data.validate()?;

    tracing::debug!("  Output dir: {}", config.output_dir.display());
    tracing::debug!("  Format: {:?}, theme: {:?}", config.format, config.theme);
    tracing::debug!("  DPI: png {}, svg {}", config.png_dpi, config.svg_dpi);

    tracing::info!(
        "[2/3] Rendering {} exhibit(s){}...",
        selection.len(),
        if config.parallel { " in parallel" } else { "" }
    );
    let t1 = Instant::now();
    let mut outputs = if config.parallel && selection.len() > 1 {
        render_parallel(selection, data, config).await?
    } else {
        selection
            .iter()
            .map(|exhibit| render_exhibit(exhibit, &data, config))
            .collect::<Result<Vec<_>>>()?
    };
    let m1 = memprof::delta("After rendering", m0);
    let t2 = memprof::time_delta("After rendering", t0, t1);

    outputs.sort_by_key(|output| catalogue_position(&output.id));

    if config.write_manifest {
        tracing::info!("[3/3] Writing manifest...");
        let path = write_manifest(&config.output_dir, &outputs)?;
        tracing::debug!("  {}", path.display());
    } else {
        tracing::info!("[3/3] Manifest disabled");
    }
    memprof::delta("generate_exhibits END", m1);
    memprof::time_delta("generate_exhibits END", t0, t2);

    Ok(outputs)
}

async fn render_parallel(
    selection: &[&'static Exhibit],
    data: Dataset,
    config: &RenderConfig,
) -> Result<Vec<ExhibitOutput>> {
    let data = Arc::new(data);
    let config = Arc::new(config.clone());

    let mut tasks = JoinSet::new();
    for exhibit in selection.iter().copied() {
        let data = Arc::clone(&data);
        let config = Arc::clone(&config);
        tasks.spawn_blocking(move || render_exhibit(exhibit, &data, &config));
    }

    let mut outputs = Vec::with_capacity(selection.len());
    while let Some(joined) = tasks.join_next().await {
        let output = joined.map_err(|e| ExhibitError::Task(e.to_string()))??;
        outputs.push(output);
    }
    Ok(outputs)
}

fn catalogue_position(id: &str) -> usize {
    catalog()
        .iter()
        .position(|exhibit| exhibit.id == id)
        .unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exhibits::catalog::select;
    use crate::exhibits::properties::PropertyValue;

    fn config_for(dir: &std::path::Path, parallel: bool) -> RenderConfig {
        RenderConfig::from_properties(&[
            PropertyValue::new("output.dir", dir.to_string_lossy()),
            PropertyValue::new("output.format", "svg"),
            PropertyValue::new("render.parallel", parallel.to_string()),
        ])
    }

    #[test]
    fn test_catalogue_position() {
        assert_eq!(catalogue_position("1"), 0);
        assert!(catalogue_position("10") > catalogue_position("9.3"));
        assert_eq!(catalogue_position("nope"), usize::MAX);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_parallel_keeps_catalogue_order() {
        let tmp = tempfile::tempdir().unwrap();
        let selection = select(&["10", "2", "9.1", "1"]).unwrap();

        let outputs = generate_exhibits(&selection, &config_for(tmp.path(), true))
            .await
            .unwrap();
        let ids: Vec<&str> = outputs.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "9.1", "10"]);
    }

    #[tokio::test]
    async fn test_sequential_matches_parallel() {
        let tmp_seq = tempfile::tempdir().unwrap();
        let tmp_par = tempfile::tempdir().unwrap();
        let selection = select(&["3", "7"]).unwrap();

        let seq = generate_exhibits(&selection, &config_for(tmp_seq.path(), false))
            .await
            .unwrap();
        let par = generate_exhibits(&selection, &config_for(tmp_par.path(), true))
            .await
            .unwrap();

        let stems = |outs: &[ExhibitOutput]| outs.iter().map(|o| o.file_stem.clone()).collect::<Vec<_>>();
        assert_eq!(stems(&seq), stems(&par));
        assert!(tmp_seq.path().join("manifest.json").exists());
    }
}
