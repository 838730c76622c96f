//! Bar, line and range charts on keyed cartesian axes
//!
//! Both axes are `f64` ranges with explicit key points: category axes put
//! one key per category at 0, 1, 2, ... and value axes use `nice_ticks`. A
//! secondary value axis is only drawn; its series are projected into primary
//! units and drawn through the primary coordinates.

use super::annotate::text_width;
use super::frame::{nice_ticks, project, tick_decimals, PlotFrame};
use super::style::{Style, BOX_EDGE, TEXT_COLOR};
use super::DrawResult;
use crate::exhibits::figure::{
    AxisSide, BarChart, LegendPosition, LineChart, Orientation, RangeChart, ValueAxis,
    ValueFormat,
};
use plotters::coord::ranged1d::{DefaultFormatting, KeyPointHint};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::ops::Range;

type Coords = Cartesian2d<KeyedAxis, KeyedAxis>;

/// `f64` axis whose bold ticks sit exactly on the given key points
///
/// Labels come from the mesh's label formatter, so the default `Debug`
/// formatting only satisfies the mesh's `ValueFormatter` bound.
#[derive(Clone)]
struct KeyedAxis {
    inner: RangedCoordf64,
    keys: Vec<f64>,
}

impl Ranged for KeyedAxis {
    type FormatOption = DefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.inner.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        // Light grid lines are never drawn
        if hint.weight().allow_light_points() {
            Vec::new()
        } else {
            self.keys.clone()
        }
    }

    fn range(&self) -> Range<f64> {
        self.inner.range()
    }
}

const TICK_PT: f64 = 10.0;
const DESC_PT: f64 = 12.0;
const VALUE_LABEL_PT: f64 = 11.0;
const TARGET_TICKS: usize = 6;

enum TickLabels {
    Categories(Vec<String>),
    Numbers(usize),
}

/// One axis: range, key points, label formatting and grid
struct AxisSpec {
    range: (f64, f64),
    keys: Vec<f64>,
    labels: TickLabels,
    desc: Option<String>,
    grid: bool,
}

impl AxisSpec {
    fn categories(categories: &[String], desc: Option<&str>) -> Self {
        let n = categories.len();
        Self {
            range: (-0.5, n as f64 - 0.5),
            keys: (0..n).map(|i| i as f64).collect(),
            labels: TickLabels::Categories(categories.to_vec()),
            desc: desc.map(str::to_string),
            grid: false,
        }
    }

    fn values(axis: &ValueAxis) -> Self {
        Self::with_ticks(axis, nice_ticks(axis.min, axis.max, TARGET_TICKS))
    }

    fn with_ticks(axis: &ValueAxis, keys: Vec<f64>) -> Self {
        let decimals = tick_decimals(&keys);
        Self {
            range: (axis.min, axis.max),
            keys,
            labels: TickLabels::Numbers(decimals),
            desc: if axis.desc.is_empty() {
                None
            } else {
                Some(axis.desc.clone())
            },
            grid: axis.grid,
        }
    }

    fn format(&self, v: f64) -> String {
        match &self.labels {
            TickLabels::Numbers(decimals) => format!("{:.*}", *decimals, v),
            TickLabels::Categories(names) => {
                let idx = v.round();
                if idx < 0.0 || (v - idx).abs() > 1e-6 {
                    return String::new();
                }
                names.get(idx as usize).cloned().unwrap_or_default()
            }
        }
    }

    fn coord(&self) -> KeyedAxis {
        KeyedAxis {
            inner: (self.range.0..self.range.1).into(),
            keys: self.keys.clone(),
        }
    }

    fn widest_label<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>, style: &Style) -> u32 {
        let font = style.label(TICK_PT);
        self.keys
            .iter()
            .map(|k| text_width(area, &self.format(*k), &font))
            .max()
            .unwrap_or(0)
    }
}

/// Width of a vertical axis label area: tick labels plus rotated description
fn side_label_area<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    axis: &AxisSpec,
    style: &Style,
) -> u32 {
    let desc = if axis.desc.is_some() {
        style.px(DESC_PT * 1.3) + style.px(6.0)
    } else {
        0
    };
    axis.widest_label(area, style) + style.px(10.0) + desc
}

/// Height of the bottom label area: tick labels plus description
fn bottom_label_area(axis: &AxisSpec, style: &Style) -> u32 {
    let desc = if axis.desc.is_some() {
        style.px(DESC_PT * 1.3) + style.px(4.0)
    } else {
        0
    };
    style.px(TICK_PT * 1.3) + style.px(8.0) + desc
}

/// Build the chart, draw axes and grid, and record where the plot landed
fn build_chart<'a, DB: DrawingBackend>(
    area: &'a DrawingArea<DB, Shift>,
    x: &AxisSpec,
    y: &AxisSpec,
    right: Option<&AxisSpec>,
    style: &Style,
) -> DrawResult<(ChartContext<'a, DB, Coords>, PlotFrame), DB> {
    // Margins and label areas share each dimension with the plot; a tiny
    // canvas must not invert the plotting rectangle
    let (w, h) = area.dim_in_pixel();
    let fit_w = |size: u32| size.min(w / 5);
    let fit_h = |size: u32| size.min(h / 5);

    let mut builder = ChartBuilder::on(area);
    builder
        .margin_top(fit_h(style.px(8.0)))
        .margin_left(fit_w(style.px(4.0)))
        .margin_bottom(fit_h(style.px(4.0)))
        .margin_right(fit_w(style.px(if right.is_some() { 4.0 } else { 14.0 })))
        .x_label_area_size(fit_h(bottom_label_area(x, style)))
        .y_label_area_size(fit_w(side_label_area(area, y, style)));
    if let Some(right) = right {
        builder.right_y_label_area_size(fit_w(side_label_area(area, right, style)));
    }

    let mut chart = builder.build_cartesian_2d(x.coord(), y.coord())?;

    let (xs, ys) = chart.plotting_area().get_pixel_range();
    let frame = PlotFrame {
        x_px: (xs.start, xs.end),
        y_px: (ys.start, ys.end),
        x_range: x.range,
        y_range: y.range,
        y2_range: right.map(|r| r.range),
    };

    let x_fmt = |v: &f64| x.format(*v);
    let y_fmt = |v: &f64| y.format(*v);

    let mut mesh = chart.configure_mesh();
    mesh.x_labels(x.keys.len().max(1))
        .y_labels(y.keys.len().max(1))
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .label_style(style.label(TICK_PT))
        .axis_desc_style(style.label(DESC_PT))
        .light_line_style(TRANSPARENT)
        .bold_line_style(BLACK.mix(0.12))
        .axis_style(BLACK.mix(0.6));
    if let Some(desc) = &x.desc {
        mesh.x_desc(desc.as_str());
    }
    if let Some(desc) = &y.desc {
        mesh.y_desc(desc.as_str());
    }
    if !x.grid {
        mesh.disable_x_mesh();
    }
    if !y.grid {
        mesh.disable_y_mesh();
    }
    mesh.draw()?;

    Ok((chart, frame))
}

/// Attach the right-hand value axis
fn draw_secondary_axis<'a, DB: DrawingBackend + 'a>(
    chart: ChartContext<'a, DB, Coords>,
    x: &AxisSpec,
    right: &AxisSpec,
    style: &Style,
) -> DrawResult<(), DB> {
    let mut dual = chart.set_secondary_coord(x.coord(), right.coord());

    let x_fmt = |v: &f64| x.format(*v);
    let y_fmt = |v: &f64| right.format(*v);

    let mut axes = dual.configure_secondary_axes();
    axes.x_labels(x.keys.len().max(1))
        .y_labels(right.keys.len().max(1))
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .label_style(style.label(TICK_PT))
        .axis_desc_style(style.label(DESC_PT))
        .axis_style(BLACK.mix(0.6));
    if let Some(desc) = &right.desc {
        axes.y_desc(desc.as_str());
    }
    axes.draw()
}

fn draw_legend<'a, DB: DrawingBackend + 'a>(
    chart: &mut ChartContext<'a, DB, Coords>,
    position: LegendPosition,
    style: &Style,
) -> DrawResult<(), DB> {
    let position = match position {
        LegendPosition::UpperLeft => SeriesLabelPosition::UpperLeft,
        LegendPosition::UpperRight => SeriesLabelPosition::UpperRight,
    };
    chart
        .configure_series_labels()
        .position(position)
        .margin(style.px(6.0))
        .label_font(style.label(TICK_PT))
        .background_style(WHITE.mix(0.85))
        .border_style(BOX_EDGE)
        .draw()
}

/// Chart-space point for a (category, value) pair
fn place(orientation: Orientation, category: f64, value: f64) -> (f64, f64) {
    match orientation {
        Orientation::Vertical => (category, value),
        Orientation::Horizontal => (value, category),
    }
}

/// 45° hatch segments covering a pixel rectangle, rising to the right
pub fn hatch_segments(
    top_left: (f64, f64),
    bottom_right: (f64, f64),
    spacing: f64,
) -> Vec<((f64, f64), (f64, f64))> {
    let (x0, y0) = top_left;
    let (x1, y1) = bottom_right;
    if spacing <= 0.0 || x1 <= x0 || y1 <= y0 {
        return Vec::new();
    }

    // Lines x + y = k, k stepping across the rectangle
    let mut segments = Vec::new();
    let mut k = x0 + y0 + spacing;
    while k < x1 + y1 {
        let start_x = x0.max(k - y1);
        let end_x = x1.min(k - y0);
        if start_x < end_x {
            segments.push(((start_x, k - start_x), (end_x, k - end_x)));
        }
        k += spacing;
    }
    segments
}

pub fn draw_bars<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    spec: &BarChart,
    legend: Option<LegendPosition>,
    style: &Style,
) -> DrawResult<PlotFrame, DB> {
    let categories = AxisSpec::categories(&spec.categories, spec.category_desc.as_deref());
    let values = AxisSpec::values(&spec.value_axis);
    let secondary = spec.secondary_axis.as_ref().map(AxisSpec::values);

    let (x, y) = match spec.orientation {
        Orientation::Vertical => (&categories, &values),
        Orientation::Horizontal => (&values, &categories),
    };
    let (mut chart, frame) = build_chart(area, x, y, secondary.as_ref(), style)?;

    let primary = (spec.value_axis.min, spec.value_axis.max);
    let span = primary.1 - primary.0;
    let base = 0f64.clamp(primary.0, primary.1);
    let to_primary = |side: AxisSide, v: f64| match (&spec.secondary_axis, side) {
        (Some(sec), AxisSide::Secondary) => project(v, (sec.min, sec.max), primary),
        _ => v,
    };

    let mut has_labels = false;

    for (i, series) in spec.series.iter().enumerate() {
        let (offset, width) = spec.bar_offset(i);
        let color = style.paint(series.paint);

        let bars: Vec<(f64, f64)> = series
            .values
            .iter()
            .enumerate()
            .filter_map(|(j, v)| v.map(|v| (j as f64 + offset, to_primary(series.axis, v))))
            .collect();

        let rects = bars.iter().map(|(c, v)| {
            Rectangle::new(
                [
                    place(spec.orientation, c - width / 2.0, base),
                    place(spec.orientation, c + width / 2.0, *v),
                ],
                color.filled(),
            )
        });
        let anno = chart.draw_series(rects)?;

        if let Some(label) = &series.label {
            has_labels = true;
            let swatch = style.px(TICK_PT * 0.4) as i32;
            anno.label(label.as_str()).legend(move |(lx, ly)| {
                Rectangle::new(
                    [(lx, ly - swatch), (lx + 2 * swatch, ly + swatch)],
                    color.filled(),
                )
            });
        }

        if let Some(edge) = series.edge {
            let edge_color = style.paint(edge);
            for (c, v) in &bars {
                let a = place(spec.orientation, c - width / 2.0, base);
                let b = place(spec.orientation, c + width / 2.0, *v);
                let pa = frame.data_to_px(a.0, a.1);
                let pb = frame.data_to_px(b.0, b.1);
                let top_left = (pa.0.min(pb.0), pa.1.min(pb.1));
                let bottom_right = (pa.0.max(pb.0), pa.1.max(pb.1));

                let hatch = hatch_segments(top_left, bottom_right, style.pxf(6.0));
                chart.draw_series(hatch.into_iter().map(|(s, e)| {
                    PathElement::new(
                        vec![frame.px_to_data(s.0, s.1), frame.px_to_data(e.0, e.1)],
                        edge_color.stroke_width(style.px(0.8)),
                    )
                }))?;
                chart.draw_series(std::iter::once(Rectangle::new(
                    [a, b],
                    edge_color.stroke_width(style.px(1.0)),
                )))?;
            }
        }

        if series.value_format != ValueFormat::Hidden {
            // Labels print the series' own units, placed at the projected bar end
            let raw = series.values.iter().flatten();
            let labels: Vec<_> = bars
                .iter()
                .zip(raw)
                .filter_map(|((c, v), original)| {
                    let text = series.value_format.format(*original)?;
                    Some(match spec.orientation {
                        Orientation::Vertical => Text::new(
                            text,
                            (*c, v + span * 0.012),
                            style.text(
                                VALUE_LABEL_PT,
                                false,
                                TEXT_COLOR,
                                Pos::new(HPos::Center, VPos::Bottom),
                            ),
                        ),
                        Orientation::Horizontal => Text::new(
                            text,
                            (v + span * 0.01, *c),
                            style.text(
                                VALUE_LABEL_PT,
                                false,
                                TEXT_COLOR,
                                Pos::new(HPos::Left, VPos::Center),
                            ),
                        ),
                    })
                })
                .collect();
            chart.draw_series(labels)?;
        }
    }

    if let (Some(overlay), Some(sec)) = (&spec.overlay, &spec.secondary_axis) {
        let color = style.paint(overlay.paint);
        let points: Vec<(f64, f64)> = overlay
            .values
            .iter()
            .enumerate()
            .filter_map(|(j, v)| {
                v.map(|v| place(spec.orientation, j as f64, project(v, (sec.min, sec.max), primary)))
            })
            .collect();

        let stroke = color.stroke_width(style.px(1.5));
        let anno = chart.draw_series(LineSeries::new(points.clone(), stroke))?;
        if let Some(label) = &overlay.label {
            has_labels = true;
            let half = style.px(TICK_PT * 0.8) as i32;
            anno.label(label.as_str()).legend(move |(lx, ly)| {
                PathElement::new(vec![(lx, ly), (lx + 2 * half, ly)], stroke)
            });
        }
        let radius = style.px(3.0);
        chart.draw_series(points.iter().map(|p| Circle::new(*p, radius, color.filled())))?;
    }

    if let (Some(position), true) = (legend, has_labels) {
        draw_legend(&mut chart, position, style)?;
    }

    if let Some(right) = &secondary {
        draw_secondary_axis(chart, x, right, style)?;
    }

    Ok(frame)
}

pub fn draw_lines<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    spec: &LineChart,
    legend: Option<LegendPosition>,
    style: &Style,
) -> DrawResult<PlotFrame, DB> {
    let x = AxisSpec::with_ticks(&spec.x_axis, spec.x_ticks.clone());
    let y = AxisSpec::values(&spec.y_axis);
    let (mut chart, frame) = build_chart(area, &x, &y, None, style)?;

    for series in &spec.series {
        let color = style.paint(series.paint);
        let stroke = color.stroke_width(style.px(series.width_pt));
        let half = style.px(TICK_PT * 0.8) as i32;

        chart
            .draw_series(LineSeries::new(series.points.iter().copied(), stroke))?
            .label(series.label.as_str())
            .legend(move |(lx, ly)| PathElement::new(vec![(lx, ly), (lx + 2 * half, ly)], stroke));

        let radius = style.px(series.width_pt * 1.6);
        chart.draw_series(
            series
                .points
                .iter()
                .map(|p| Circle::new(*p, radius, color.filled())),
        )?;
    }

    if let Some(position) = legend {
        draw_legend(&mut chart, position, style)?;
    }

    Ok(frame)
}

pub fn draw_ranges<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    spec: &RangeChart,
    style: &Style,
) -> DrawResult<PlotFrame, DB> {
    let x = AxisSpec::values(&spec.value_axis);
    let y = AxisSpec::categories(&spec.categories, None);
    let (mut chart, frame) = build_chart(area, &x, &y, None, style)?;

    let color = style.paint(spec.paint);
    let stroke = color.stroke_width(style.px(1.5));
    let cap = 0.12;

    for (j, (mid, half)) in spec.ranges.iter().enumerate() {
        let c = j as f64;
        let (lo, hi) = (mid - half, mid + half);

        if *half > 0.0 {
            chart.draw_series([
                PathElement::new(vec![(lo, c), (hi, c)], stroke),
                PathElement::new(vec![(lo, c - cap), (lo, c + cap)], stroke),
                PathElement::new(vec![(hi, c - cap), (hi, c + cap)], stroke),
            ])?;
        }
        chart.draw_series(std::iter::once(Circle::new(
            (*mid, c),
            style.px(4.0),
            color.filled(),
        )))?;
    }

    Ok(frame)
}
