//! Figure rendering on plotters backends
//!
//! `render_figure` lays a `Figure` out on any `DrawingBackend`: title band,
//! body, footnote band, then annotations on top in canvas pixels. The PNG and
//! SVG entry points pick the DPI for their output and map drawing errors to
//! `ExhibitError::Render` carrying the exhibit id.

pub mod annotate;
pub mod cartesian;
pub mod frame;
pub mod panels;
pub mod style;

use crate::config::RenderConfig;
use crate::exhibits::error::{ExhibitError, Result};
use crate::exhibits::figure::{Body, Figure};
use annotate::{draw_annotation, draw_lines, text_width, wrap_text, LINE_SPACING};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use style::{Style, TEXT_COLOR};

pub use frame::PlotFrame;

/// Result of a drawing call on backend `DB`
pub type DrawResult<T, DB> = std::result::Result<T, DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

const FOOTNOTE_PT: f64 = 9.0;
const FOOTNOTE_COLOR: RGBColor = RGBColor(0x55, 0x55, 0x55);
const MARGIN_PT: f64 = 10.0;

/// Draw `figure` onto `root` and present it
pub fn render_figure<DB: DrawingBackend>(
    figure: &Figure,
    root: &DrawingArea<DB, Shift>,
    style: &Style,
) -> DrawResult<(), DB> {
    root.fill(&WHITE)?;

    let (width, height) = root.dim_in_pixel();
    let margin = style.px(MARGIN_PT);
    let max_w = width.saturating_sub(2 * margin).max(1);

    // Title band
    let title_style = style.text(
        figure.title_pt,
        true,
        TEXT_COLOR,
        Pos::new(HPos::Center, VPos::Top),
    );
    let title_lines = wrap_text(&figure.title, max_w, |s| text_width(root, s, &title_style));
    let title_line_h = style.pxf(figure.title_pt * LINE_SPACING);
    draw_lines(
        root,
        &title_lines,
        ((width / 2) as i32, margin as i32),
        title_line_h.round() as i32,
        &title_style,
    )?;
    let title_h = margin as f64 + title_lines.len() as f64 * title_line_h + style.pxf(4.0);

    // Footnote band
    let foot_style = style.text(
        FOOTNOTE_PT,
        false,
        FOOTNOTE_COLOR,
        Pos::new(HPos::Left, VPos::Top),
    );
    let foot_lines: Vec<String> = if style.show_footnotes {
        figure
            .footnotes
            .iter()
            .flat_map(|note| wrap_text(note, max_w, |s| text_width(root, s, &foot_style)))
            .collect()
    } else {
        Vec::new()
    };
    let foot_line_h = style.pxf(FOOTNOTE_PT * LINE_SPACING);
    let foot_h = if foot_lines.is_empty() {
        margin as f64 / 2.0
    } else {
        foot_lines.len() as f64 * foot_line_h + margin as f64
    };

    let body_top = (title_h.round() as u32).min(height);
    let body_bottom = height
        .saturating_sub(foot_h.round() as u32)
        .max(body_top);

    let (_, rest) = root.split_vertically(body_top);
    let (body, footer) = rest.split_vertically(body_bottom - body_top);

    let frame = match &figure.body {
        Body::Bars(chart) => cartesian::draw_bars(&body, chart, figure.legend, style)?,
        Body::Lines(chart) => cartesian::draw_lines(&body, chart, figure.legend, style)?,
        Body::Ranges(chart) => cartesian::draw_ranges(&body, chart, style)?,
        Body::Callouts(callouts) => panels::draw_callouts(&body, callouts, style)?,
        Body::Scorecard(table) => panels::draw_scorecard(&body, table, style)?,
    };

    draw_lines(
        &footer,
        &foot_lines,
        (margin as i32, (margin / 4) as i32),
        foot_line_h.round() as i32,
        &foot_style,
    )?;

    for annotation in &figure.annotations {
        draw_annotation(root, &frame, annotation, style)?;
    }

    root.present()
}

/// Render to a PNG file at `png.dpi`
pub fn render_png(figure: &Figure, config: &RenderConfig, path: &Path) -> Result<()> {
    figure.validate()?;

    let dpi = config.png_dpi;
    let size = config.resolve_dimensions(figure.size_in, dpi);
    let style = Style::new(config, dpi);

    let root = BitMapBackend::new(path, size).into_drawing_area();
    render_figure(figure, &root, &style).map_err(|e| ExhibitError::render(&figure.id, e))
}

/// Render to an in-memory SVG document at `svg.dpi`
pub fn render_svg_string(figure: &Figure, config: &RenderConfig) -> Result<String> {
    figure.validate()?;

    let dpi = config.svg_dpi;
    let size = config.resolve_dimensions(figure.size_in, dpi);
    let style = Style::new(config, dpi);

    let mut buffer = String::new();
    {
        let root = SVGBackend::with_string(&mut buffer, size).into_drawing_area();
        render_figure(figure, &root, &style).map_err(|e| ExhibitError::render(&figure.id, e))?;
    }
    Ok(buffer)
}

/// Render to an SVG file
pub fn render_svg(figure: &Figure, config: &RenderConfig, path: &Path) -> Result<()> {
    let svg = render_svg_string(figure, config)?;
    std::fs::write(path, svg).map_err(|e| ExhibitError::render(&figure.id, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exhibits::catalog::{catalog, find};
    use crate::exhibits::data::Dataset;
    use crate::exhibits::figure::{BarChart, BarSeries, Paint, ValueAxis};
    use crate::exhibits::properties::PropertyValue;

    #[test]
    fn test_every_exhibit_renders_to_svg() {
        let data = Dataset::default();
        let config = RenderConfig::default();

        for exhibit in catalog() {
            let figure = exhibit.build(&data).unwrap();
            let svg = render_svg_string(&figure, &config).unwrap();
            assert!(svg.starts_with("<svg"), "exhibit {}", exhibit.id);

            let first_word = figure.title.split_whitespace().next().unwrap();
            assert!(svg.contains(first_word), "exhibit {} lacks its title", exhibit.id);
        }
    }

    #[test]
    fn test_svg_canvas_follows_figure_size() {
        let figure = find("9.1").unwrap().build(&Dataset::default()).unwrap();
        let svg = render_svg_string(&figure, &RenderConfig::default()).unwrap();
        // 9 × 6 inches at 72 units per inch
        assert!(svg.contains("width=\"648\""));
        assert!(svg.contains("height=\"432\""));
    }

    #[test]
    fn test_hidden_footnotes() {
        let figure = find("9.1").unwrap().build(&Dataset::default()).unwrap();

        let shown = render_svg_string(&figure, &RenderConfig::default()).unwrap();
        assert!(shown.contains("Fuente:"));

        let config = RenderConfig::from_properties(&[PropertyValue::new("footnotes", "hide")]);
        let hidden = render_svg_string(&figure, &config).unwrap();
        assert!(!hidden.contains("Fuente:"));
    }

    #[test]
    fn test_mismatched_series_is_rejected() {
        let chart = BarChart::vertical(vec!["A".into(), "B".into()], ValueAxis::new("", 0.0, 10.0))
            .series(BarSeries::new(&[1.0, 2.0, 3.0], Paint::slot(0)));
        let figure = Figure::new("x", "x", "Broken", (4.0, 3.0), Body::Bars(chart));

        let err = render_svg_string(&figure, &RenderConfig::default()).unwrap_err();
        assert!(matches!(err, ExhibitError::InvalidData { .. }));
        assert!(err.to_string().contains("exhibit x"));
        assert!(err.to_string().contains("3 values for 2 categories"));
    }

    #[test]
    fn test_empty_categories_are_rejected() {
        let chart = BarChart::horizontal(Vec::new(), ValueAxis::new("", 0.0, 1.0));
        let figure = Figure::new("y", "y", "Empty", (4.0, 3.0), Body::Bars(chart));
        assert!(render_svg_string(&figure, &RenderConfig::default()).is_err());
    }
}
