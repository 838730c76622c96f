//! Figures without data axes: text callout panels and the status scorecard

use super::annotate::{draw_box, draw_lines, text_width, wrap_text, LINE_SPACING};
use super::frame::PlotFrame;
use super::style::{Style, BOX_EDGE, CELL_EDGE, HEADER_FILL, TEXT_COLOR};
use super::DrawResult;
use crate::exhibits::figure::{CalloutPanel, ScorecardTable};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

const TABLE_PT: f64 = 11.0;
const LEGEND_PT: f64 = 10.0;

/// Frame covering the whole area in absolute canvas pixels
fn area_frame<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>) -> PlotFrame {
    let (bx, by) = area.get_base_pixel();
    let (w, h) = area.dim_in_pixel();
    PlotFrame::unit((bx, bx + w as i32), (by, by + h as i32))
}

/// Pixel rectangle of an axes-fraction rect (x, y, w, h), relative to the area
pub fn fraction_rect(rect: (f64, f64, f64, f64), dim: (u32, u32)) -> ((i32, i32), (i32, i32)) {
    let (x, y, w, h) = rect;
    let (width, height) = (dim.0 as f64, dim.1 as f64);
    let left = x * width;
    let top = (1.0 - y - h) * height;
    (
        (left.round() as i32, top.round() as i32),
        ((left + w * width).round() as i32, (top + h * height).round() as i32),
    )
}

pub fn draw_callouts<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panels: &[CalloutPanel],
    style: &Style,
) -> DrawResult<PlotFrame, DB> {
    let dim = area.dim_in_pixel();

    for panel in panels {
        let (top_left, bottom_right) = fraction_rect(panel.rect, dim);
        draw_box(area, top_left, bottom_right, BOX_EDGE, style)?;

        let centre_x = (top_left.0 + bottom_right.0) / 2;
        let centre_y = (top_left.1 + bottom_right.1) as f64 / 2.0;
        let total: f64 = panel
            .lines
            .iter()
            .map(|(_, pt, _)| style.pxf(pt * LINE_SPACING))
            .sum();

        let mut y = centre_y - total / 2.0;
        for (text, pt, bold) in &panel.lines {
            let text_style = style.text(*pt, *bold, TEXT_COLOR, Pos::new(HPos::Center, VPos::Top));
            area.draw_text(text, &text_style, (centre_x, y.round() as i32))?;
            y += style.pxf(pt * LINE_SPACING);
        }
    }

    Ok(area_frame(area))
}

/// Column widths as fractions: the label column takes half, statuses share the rest
pub fn column_fractions(status_columns: usize) -> Vec<f64> {
    let mut widths = vec![0.5];
    if status_columns > 0 {
        let each = 0.5 / status_columns as f64;
        widths.extend(std::iter::repeat(each).take(status_columns));
    }
    widths
}

pub fn draw_scorecard<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    table: &ScorecardTable,
    style: &Style,
) -> DrawResult<PlotFrame, DB> {
    let (w, h) = area.dim_in_pixel();
    let (w, h) = (w as f64, h as f64);

    let margin_x = w * 0.05;
    let table_top = h * 0.04;
    let table_bottom = h * 0.82;
    let table_w = w - 2.0 * margin_x;
    let row_h = (table_bottom - table_top) / (table.rows.len() + 1) as f64;

    let mut columns = vec![margin_x];
    for fraction in column_fractions(table.columns.len()) {
        let last = columns[columns.len() - 1];
        columns.push(last + fraction * table_w);
    }

    let header_style = style.text(TABLE_PT, true, TEXT_COLOR, Pos::new(HPos::Center, VPos::Center));
    let label_style = style.text(TABLE_PT, false, TEXT_COLOR, Pos::new(HPos::Left, VPos::Top));
    let line_h = style.pxf(TABLE_PT * LINE_SPACING);
    let pad = style.pxf(6.0);

    let cell = |col: usize, row: usize| {
        (
            (columns[col].round() as i32, (table_top + row as f64 * row_h).round() as i32),
            (
                columns[col + 1].round() as i32,
                (table_top + (row + 1) as f64 * row_h).round() as i32,
            ),
        )
    };
    let edge = CELL_EDGE.stroke_width(style.px(0.8));

    // Header row
    let headers = std::iter::once(&table.header).chain(table.columns.iter());
    for (col, text) in headers.enumerate() {
        let (tl, br) = cell(col, 0);
        area.draw(&Rectangle::new([tl, br], HEADER_FILL.filled()))?;
        area.draw(&Rectangle::new([tl, br], edge))?;
        area.draw_text(text, &header_style, ((tl.0 + br.0) / 2, (tl.1 + br.1) / 2))?;
    }

    let radius = (row_h.min(columns[1] - columns[0]) * 0.28).min(style.pxf(14.0)) as i32;

    for (r, label) in table.rows.iter().enumerate() {
        let row = r + 1;

        let (tl, br) = cell(0, row);
        area.draw(&Rectangle::new([tl, br], edge))?;
        let max_w = (br.0 - tl.0) as f64 - 2.0 * pad;
        let lines = wrap_text(label, max_w.max(1.0) as u32, |s| text_width(area, s, &label_style));
        let block = lines.len() as f64 * line_h;
        let top = (tl.1 + br.1) as f64 / 2.0 - block / 2.0;
        draw_lines(
            area,
            &lines,
            ((tl.0 as f64 + pad).round() as i32, top.round() as i32),
            line_h.round() as i32,
            &label_style,
        )?;

        for col in 0..table.columns.len() {
            let (tl, br) = cell(col + 1, row);
            area.draw(&Rectangle::new([tl, br], edge))?;

            let slot = table
                .cells
                .get(r)
                .and_then(|cells| cells.get(col))
                .copied();
            if let Some(slot) = slot {
                let centre = ((tl.0 + br.0) / 2, (tl.1 + br.1) / 2);
                area.draw(&Circle::new(centre, radius, style.status(slot).filled()))?;
                area.draw(&Circle::new(centre, radius, BLACK.stroke_width(style.px(0.8))))?;
            }
        }
    }

    // Legend band under the table
    if !table.legend.is_empty() {
        let legend_style = style.text(LEGEND_PT, false, TEXT_COLOR, Pos::new(HPos::Left, VPos::Center));
        let band_y = ((table_bottom + h) / 2.0).round() as i32;
        let marker = style.px(LEGEND_PT * 0.45) as i32;
        let gap = style.pxf(6.0);

        let widths: Vec<f64> = table
            .legend
            .iter()
            .map(|(label, _)| 2.0 * marker as f64 + gap + text_width(area, label, &legend_style) as f64)
            .collect();
        let spacing = style.pxf(24.0);
        let total = widths.iter().sum::<f64>() + spacing * (widths.len() - 1) as f64;

        let mut x = (w - total) / 2.0;
        for ((label, slot), width) in table.legend.iter().zip(&widths) {
            let centre = ((x + marker as f64).round() as i32, band_y);
            area.draw(&Circle::new(centre, marker, style.status(*slot).filled()))?;
            area.draw(&Circle::new(centre, marker, BLACK.stroke_width(1)))?;
            area.draw_text(
                label,
                &legend_style,
                ((x + 2.0 * marker as f64 + gap).round() as i32, band_y),
            )?;
            x += width + spacing;
        }
    }

    Ok(area_frame(area))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_rect() {
        // Bottom-left origin flips to top-left pixel rows
        let (tl, br) = fraction_rect((0.10, 0.42, 0.80, 0.30), (1000, 500));
        assert_eq!(tl, (100, 140));
        assert_eq!(br, (900, 290));
    }

    #[test]
    fn test_column_fractions() {
        assert_eq!(column_fractions(2), vec![0.5, 0.25, 0.25]);
        assert_eq!(column_fractions(0), vec![0.5]);
        let four = column_fractions(4);
        assert!((four.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }
}
