//! Declarative chart model
//!
//! A `Figure` describes one exhibit independently of the drawing backend:
//! sizes in inches and points, positions in data or axes-fraction coordinates,
//! colours as palette slots. The renderer turns it into pixels.

use super::error::{ExhibitError, Result};

/// Figure sizes in inches (matplotlib-style figsize)
pub type SizeInches = (f64, f64);

/// One exhibit ready to render
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    /// Catalogue id, e.g. "9.1"
    pub id: String,
    /// Output file name without extension
    pub file_stem: String,
    /// Title, may contain '\n'
    pub title: String,
    pub title_pt: f64,
    pub size_in: SizeInches,
    pub body: Body,
    pub annotations: Vec<Annotation>,
    pub footnotes: Vec<String>,
    pub legend: Option<LegendPosition>,
}

impl Figure {
    pub fn new(id: &str, file_stem: &str, title: impl Into<String>, size_in: SizeInches, body: Body) -> Self {
        Self {
            id: id.to_string(),
            file_stem: file_stem.to_string(),
            title: title.into(),
            title_pt: 14.0,
            size_in,
            body,
            annotations: Vec::new(),
            footnotes: Vec::new(),
            legend: None,
        }
    }

    pub fn title_pt(mut self, pt: f64) -> Self {
        self.title_pt = pt;
        self
    }

    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn footnote(mut self, text: impl Into<String>) -> Self {
        self.footnotes.push(text.into());
        self
    }

    pub fn legend(mut self, position: LegendPosition) -> Self {
        self.legend = Some(position);
        self
    }

    /// Reject bodies whose series do not line up with their axes
    pub fn validate(&self) -> Result<()> {
        self.body.validate().map_err(|e| match e {
            ExhibitError::InvalidData { table, message } => {
                ExhibitError::invalid_data(table, format!("exhibit {}: {}", self.id, message))
            }
            other => other,
        })
    }
}

/// The drawable content of a figure
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Bars(BarChart),
    Lines(LineChart),
    Ranges(RangeChart),
    Callouts(Vec<CalloutPanel>),
    Scorecard(ScorecardTable),
}

impl Body {
    pub fn validate(&self) -> Result<()> {
        match self {
            Body::Bars(chart) => chart.validate(),
            Body::Lines(chart) => {
                if !(chart.x_axis.max > chart.x_axis.min) || !(chart.y_axis.max > chart.y_axis.min) {
                    return Err(ExhibitError::invalid_data("line chart", "empty axis range"));
                }
                Ok(())
            }
            Body::Ranges(chart) => {
                if chart.categories.is_empty() || chart.ranges.len() != chart.categories.len() {
                    return Err(ExhibitError::invalid_data(
                        "range chart",
                        format!(
                            "{} ranges for {} categories",
                            chart.ranges.len(),
                            chart.categories.len()
                        ),
                    ));
                }
                Ok(())
            }
            Body::Scorecard(table) => {
                let aligned = table.cells.len() == table.rows.len()
                    && table.cells.iter().all(|row| row.len() == table.columns.len());
                if !aligned {
                    return Err(ExhibitError::invalid_data(
                        "scorecard",
                        "cells do not match rows × columns",
                    ));
                }
                Ok(())
            }
            Body::Callouts(_) => Ok(()),
        }
    }
}

/// A colour reference: palette slot, optionally pinned to a brand colour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub slot: usize,
    pub brand: Option<&'static str>,
}

impl Paint {
    pub const fn slot(slot: usize) -> Self {
        Self { slot, brand: None }
    }

    pub const fn brand(slot: usize, hex: &'static str) -> Self {
        Self {
            slot,
            brand: Some(hex),
        }
    }
}

/// How a value label is printed next to its bar or point
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueFormat {
    /// No label
    Hidden,
    /// "6.0"
    Fixed(usize),
    /// "0.35%"
    Percent(usize),
    /// "18 M", "276.7 M"
    Millions(usize),
}

impl ValueFormat {
    pub fn format(&self, value: f64) -> Option<String> {
        match self {
            ValueFormat::Hidden => None,
            ValueFormat::Fixed(d) => Some(format!("{:.*}", *d, value)),
            ValueFormat::Percent(d) => Some(format!("{:.*}%", *d, value)),
            ValueFormat::Millions(d) => Some(format!("{:.*} M", *d, value)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisSide {
    Primary,
    Secondary,
}

/// A continuous value axis
#[derive(Debug, Clone, PartialEq)]
pub struct ValueAxis {
    pub desc: String,
    pub min: f64,
    pub max: f64,
    /// Dashed-style grid lines along this axis
    pub grid: bool,
}

impl ValueAxis {
    pub fn new(desc: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            desc: desc.into(),
            min,
            max,
            grid: true,
        }
    }

    pub fn without_grid(mut self) -> Self {
        self.grid = false;
        self
    }
}

/// One bar per category
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub label: Option<String>,
    /// None leaves the category empty for this series
    pub values: Vec<Option<f64>>,
    pub paint: Paint,
    /// Outline colour; outlined bars are drawn with a hatched fill
    pub edge: Option<Paint>,
    pub value_format: ValueFormat,
    pub axis: AxisSide,
}

impl BarSeries {
    pub fn new(values: &[f64], paint: Paint) -> Self {
        Self {
            label: None,
            values: values.iter().map(|v| Some(*v)).collect(),
            paint,
            edge: None,
            value_format: ValueFormat::Hidden,
            axis: AxisSide::Primary,
        }
    }

    pub fn sparse(values: Vec<Option<f64>>, paint: Paint) -> Self {
        Self {
            values,
            ..Self::new(&[], paint)
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn edge(mut self, paint: Paint) -> Self {
        self.edge = Some(paint);
        self
    }

    pub fn value_format(mut self, format: ValueFormat) -> Self {
        self.value_format = format;
        self
    }

    pub fn on_secondary(mut self) -> Self {
        self.axis = AxisSide::Secondary;
        self
    }
}

/// A line drawn over a bar chart on the secondary axis, one point per category
#[derive(Debug, Clone, PartialEq)]
pub struct LineOverlay {
    pub label: Option<String>,
    pub values: Vec<Option<f64>>,
    pub paint: Paint,
}

/// Grouped bar chart, vertical or horizontal
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub orientation: Orientation,
    pub categories: Vec<String>,
    pub category_desc: Option<String>,
    pub series: Vec<BarSeries>,
    pub value_axis: ValueAxis,
    pub secondary_axis: Option<ValueAxis>,
    pub overlay: Option<LineOverlay>,
    /// Fraction of a category slot occupied by its group of bars
    pub group_width: f64,
}

impl BarChart {
    pub fn vertical(categories: Vec<String>, value_axis: ValueAxis) -> Self {
        Self {
            orientation: Orientation::Vertical,
            categories,
            category_desc: None,
            series: Vec::new(),
            value_axis,
            secondary_axis: None,
            overlay: None,
            group_width: 0.8,
        }
    }

    pub fn horizontal(categories: Vec<String>, value_axis: ValueAxis) -> Self {
        Self {
            orientation: Orientation::Horizontal,
            ..Self::vertical(categories, value_axis)
        }
    }

    pub fn category_desc(mut self, desc: impl Into<String>) -> Self {
        self.category_desc = Some(desc.into());
        self
    }

    pub fn series(mut self, series: BarSeries) -> Self {
        self.series.push(series);
        self
    }

    pub fn secondary_axis(mut self, axis: ValueAxis) -> Self {
        self.secondary_axis = Some(axis);
        self
    }

    pub fn overlay(mut self, overlay: LineOverlay) -> Self {
        self.overlay = Some(overlay);
        self
    }

    pub fn group_width(mut self, width: f64) -> Self {
        self.group_width = width;
        self
    }

    /// Every series and the overlay carry one value per category
    pub fn validate(&self) -> Result<()> {
        let fail = |message: String| Err(ExhibitError::invalid_data("bar chart", message));
        let n = self.categories.len();

        if n == 0 {
            return fail("no categories".to_string());
        }
        if !(self.value_axis.max > self.value_axis.min) {
            return fail("empty value axis range".to_string());
        }
        for series in &self.series {
            if series.values.len() != n {
                return fail(format!(
                    "series {:?} has {} values for {} categories",
                    series.label.as_deref().unwrap_or("<unnamed>"),
                    series.values.len(),
                    n
                ));
            }
        }
        if let Some(overlay) = &self.overlay {
            if self.secondary_axis.is_none() {
                return fail("line overlay needs a secondary axis".to_string());
            }
            if overlay.values.len() != n {
                return fail(format!(
                    "overlay has {} values for {} categories",
                    overlay.values.len(),
                    n
                ));
            }
        }
        if self.secondary_axis.is_some() && self.orientation == Orientation::Horizontal {
            return fail("secondary axis is only supported on vertical bars".to_string());
        }
        Ok(())
    }

    /// Centre offset of series `index` within its category slot
    ///
    /// With n series the group is split into n equal bars, centred on the
    /// category position.
    pub fn bar_offset(&self, index: usize) -> (f64, f64) {
        let n = self.series.len().max(1) as f64;
        let bar = self.group_width / n;
        let start = -self.group_width / 2.0;
        let centre = start + bar * (index as f64 + 0.5);
        (centre, bar)
    }
}

/// A numeric-x line series with markers
#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub label: String,
    pub points: Vec<(f64, f64)>,
    pub paint: Paint,
    /// Stroke width in points
    pub width_pt: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub x_axis: ValueAxis,
    pub x_ticks: Vec<f64>,
    pub y_axis: ValueAxis,
    pub series: Vec<LineSeries>,
}

/// Horizontal whiskers around a midpoint per category
#[derive(Debug, Clone, PartialEq)]
pub struct RangeChart {
    pub categories: Vec<String>,
    /// (midpoint, half range) per category
    pub ranges: Vec<(f64, f64)>,
    pub value_axis: ValueAxis,
    pub paint: Paint,
}

/// A bordered text panel in axes-fraction coordinates (0..1, origin bottom-left)
#[derive(Debug, Clone, PartialEq)]
pub struct CalloutPanel {
    /// (x, y, width, height)
    pub rect: (f64, f64, f64, f64),
    /// (text, size in points, bold) lines, centred
    pub lines: Vec<(String, f64, bool)>,
}

/// Pillar × country status table
#[derive(Debug, Clone, PartialEq)]
pub struct ScorecardTable {
    pub header: String,
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    /// Status palette slot per row and column
    pub cells: Vec<Vec<usize>>,
    /// Legend entries (label, status slot)
    pub legend: Vec<(String, usize)>,
}

/// Where an annotation is anchored
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
    /// Data coordinates of the primary axes
    Data(f64, f64),
    /// Data coordinates of the secondary axes
    SecondaryData(f64, f64),
    /// Fraction of the plotting area, origin bottom-left
    Axes(f64, f64),
}

/// Horizontal alignment of annotation text relative to its anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Text callout, optionally boxed and pointing at a data target
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub text: String,
    pub at: Anchor,
    pub arrow_to: Option<Anchor>,
    pub align: Align,
    pub boxed: bool,
    pub size_pt: f64,
    pub bold: bool,
    pub paint: Option<Paint>,
}

impl Annotation {
    pub fn text(text: impl Into<String>, at: Anchor) -> Self {
        Self {
            text: text.into(),
            at,
            arrow_to: None,
            align: Align::Center,
            boxed: false,
            size_pt: 11.0,
            bold: false,
            paint: None,
        }
    }

    pub fn boxed(mut self) -> Self {
        self.boxed = true;
        self
    }

    pub fn arrow_to(mut self, target: Anchor) -> Self {
        self.arrow_to = Some(target);
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn size(mut self, pt: f64) -> Self {
        self.size_pt = pt;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn paint(mut self, paint: Paint) -> Self {
        self.paint = Some(paint);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendPosition {
    UpperLeft,
    UpperRight,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_format() {
        assert_eq!(ValueFormat::Hidden.format(1.0), None);
        assert_eq!(ValueFormat::Fixed(1).format(6.0), Some("6.0".into()));
        assert_eq!(ValueFormat::Percent(2).format(0.35), Some("0.35%".into()));
        assert_eq!(ValueFormat::Millions(0).format(18.0), Some("18 M".into()));
        assert_eq!(ValueFormat::Millions(1).format(276.7), Some("276.7 M".into()));
    }

    #[test]
    fn test_bar_offsets_are_centred() {
        let chart = BarChart::vertical(vec!["CoDi".into(), "DiMo".into()], ValueAxis::new("%", 0.0, 60.0))
            .series(BarSeries::new(&[38.0, 18.5], Paint::slot(0)))
            .series(BarSeries::new(&[12.8, 6.8], Paint::slot(1)))
            .group_width(0.72);

        let (c0, w0) = chart.bar_offset(0);
        let (c1, w1) = chart.bar_offset(1);
        assert!((w0 - 0.36).abs() < 1e-9);
        assert!((w1 - 0.36).abs() < 1e-9);
        assert!((c0 + 0.18).abs() < 1e-9);
        assert!((c1 - 0.18).abs() < 1e-9);
    }

    #[test]
    fn test_single_series_offset_is_zero() {
        let chart = BarChart::vertical(vec!["1".into()], ValueAxis::new("", 0.0, 1.0))
            .series(BarSeries::new(&[0.5], Paint::slot(0)));
        let (centre, width) = chart.bar_offset(0);
        assert!(centre.abs() < 1e-9);
        assert!((width - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_series_length_mismatch_is_invalid_data() {
        let chart = BarChart::vertical(vec!["CoDi".into(), "DiMo".into()], ValueAxis::new("%", 0.0, 60.0))
            .series(BarSeries::new(&[38.0, 18.5, 12.8], Paint::slot(0)).label("Conocimiento"));
        let figure = Figure::new("1", "Exhibit1", "Paradoja", (10.0, 6.0), Body::Bars(chart));

        let err = figure.validate().unwrap_err();
        assert!(matches!(err, ExhibitError::InvalidData { table: "bar chart", .. }));
        let message = err.to_string();
        assert!(message.contains("exhibit 1"));
        assert!(message.contains("\"Conocimiento\" has 3 values for 2 categories"));
    }

    #[test]
    fn test_overlay_length_and_axis_are_checked() {
        let overlay = LineOverlay {
            label: None,
            values: vec![Some(0.1)],
            paint: Paint::slot(1),
        };
        let base = BarChart::vertical(vec!["1".into(), "2".into()], ValueAxis::new("", 0.0, 6.0))
            .series(BarSeries::new(&[1.5, 3.0], Paint::slot(0)));

        let without_axis = base.clone().overlay(overlay.clone());
        assert!(without_axis.validate().is_err());

        let short = base
            .clone()
            .secondary_axis(ValueAxis::new("", 0.0, 0.6))
            .overlay(overlay);
        let err = short.validate().unwrap_err();
        assert!(err.to_string().contains("overlay has 1 values for 2 categories"));

        assert!(base.validate().is_ok());
    }

    #[test]
    fn test_other_bodies_validate() {
        let ranges = RangeChart {
            categories: vec!["Efectivo".into(), "Pix".into()],
            ranges: vec![(3.5, 1.5)],
            value_axis: ValueAxis::new("%", 0.0, 6.0),
            paint: Paint::slot(0),
        };
        assert!(matches!(
            Body::Ranges(ranges).validate(),
            Err(ExhibitError::InvalidData { table: "range chart", .. })
        ));

        let table = ScorecardTable {
            header: "Pilar".into(),
            rows: vec!["Mandato".into()],
            columns: vec!["Brasil".into(), "México".into()],
            cells: vec![vec![0]],
            legend: Vec::new(),
        };
        assert!(Body::Scorecard(table).validate().is_err());
        assert!(Body::Callouts(Vec::new()).validate().is_ok());
    }

    #[test]
    fn test_figure_builder() {
        let fig = Figure::new(
            "6.1",
            "Exhibit6_1",
            "Title",
            (8.0, 6.0),
            Body::Callouts(vec![]),
        )
        .footnote("Fuente: tabla interna")
        .annotate(Annotation::text("x", Anchor::Axes(0.5, 0.5)).boxed())
        .legend(LegendPosition::UpperLeft);

        assert_eq!(fig.footnotes.len(), 1);
        assert!(fig.annotations[0].boxed);
        assert_eq!(fig.legend, Some(LegendPosition::UpperLeft));
    }
}
