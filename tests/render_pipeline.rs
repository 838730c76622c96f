//! End-to-end rendering into a temporary output directory

use pix_exhibits::config::RenderConfig;
use pix_exhibits::exhibits::catalog::{catalog, select};
use pix_exhibits::exhibits::error::ExhibitError;
use pix_exhibits::exhibits::properties::PropertyValue;
use pix_exhibits::generate_exhibits;
use std::path::Path;

fn config(dir: &Path, extra: &[(&str, &str)]) -> RenderConfig {
    let mut values = vec![
        PropertyValue::new("output.dir", dir.to_string_lossy()),
        // Small rasters keep the test fast
        PropertyValue::new("png.dpi", "50"),
    ];
    values.extend(extra.iter().map(|(k, v)| PropertyValue::new(*k, *v)));
    RenderConfig::from_properties(&values)
}

#[tokio::test(flavor = "multi_thread")]
async fn renders_every_exhibit_with_manifest() {
    let tmp = tempfile::tempdir().unwrap();
    let selection = select::<&str>(&[]).unwrap();
    assert_eq!(selection.len(), catalog().len());

    let outputs = generate_exhibits(&selection, &config(tmp.path(), &[]))
        .await
        .unwrap();
    assert_eq!(outputs.len(), catalog().len());

    for output in &outputs {
        let png = output.png.as_ref().expect("png written");
        let svg = output.svg.as_ref().expect("svg written");
        assert!(png.bytes > 0 && png.path.exists(), "{}", output.id);
        assert!(svg.bytes > 0 && svg.path.exists(), "{}", output.id);

        let header = std::fs::read(&png.path).unwrap();
        assert_eq!(&header[..8], b"\x89PNG\r\n\x1a\n");
    }

    let manifest: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(tmp.path().join("manifest.json")).unwrap(),
    )
    .unwrap();
    let ids: Vec<&str> = manifest["exhibits"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap())
        .collect();
    let expected: Vec<&str> = catalog().iter().map(|e| e.id).collect();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn png_only_without_manifest() {
    let tmp = tempfile::tempdir().unwrap();
    let selection = select(&["5", "7"]).unwrap();
    let config = config(
        tmp.path(),
        &[("output.format", "png"), ("manifest", "false"), ("theme", "grayscale")],
    );

    let outputs = generate_exhibits(&selection, &config).await.unwrap();
    assert!(outputs.iter().all(|o| o.png.is_some() && o.svg.is_none()));
    assert!(!tmp.path().join("manifest.json").exists());
    assert!(tmp.path().join("Exhibit7_Scorecard_Estrategica.png").exists());
}

#[tokio::test]
async fn output_dir_is_created() {
    let tmp = tempfile::tempdir().unwrap();
    let nested = tmp.path().join("reports").join("exhibits");
    let selection = select(&["9.2"]).unwrap();

    generate_exhibits(&selection, &config(&nested, &[("output.format", "svg")]))
        .await
        .unwrap();
    assert!(nested.join("Exhibit9_2_Contribucion_PIB.svg").exists());
}

#[test]
fn unknown_exhibit_is_rejected() {
    let err = select(&["1", "42"]).unwrap_err();
    assert!(matches!(err, ExhibitError::UnknownExhibit(ref id) if id == "42"));
}
