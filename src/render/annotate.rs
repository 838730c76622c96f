//! Text blocks, boxed callouts and arrows in canvas pixels

use super::frame::PlotFrame;
use super::style::{Style, BOX_EDGE, TEXT_COLOR};
use super::DrawResult;
use crate::exhibits::figure::{Align, Annotation};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

/// Average glyph width in em, used when the backend cannot measure text
const APPROX_GLYPH_EM: f64 = 0.55;

/// Line height as a multiple of the font size
pub const LINE_SPACING: f64 = 1.3;

/// Greedy word wrap
///
/// Explicit '\n' always breaks. A single word wider than `max_width` keeps its
/// own line rather than being split.
pub fn wrap_text<F>(text: &str, max_width: u32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> u32,
{
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate = format!("{} {}", current, word);
            if measure(&candidate) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
            }
        }
        lines.push(current);
    }

    lines
}

/// Rendered width of `text` in pixels
pub fn text_width<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    text: &str,
    style: &TextStyle,
) -> u32 {
    match area.estimate_text_size(text, style) {
        Ok((w, _)) => w,
        Err(e) => {
            tracing::debug!("Text measurement failed ({}), estimating width", e);
            (text.chars().count() as f64 * style.font.get_size() * APPROX_GLYPH_EM).round() as u32
        }
    }
}

/// Draw lines top-down starting at `origin`, anchored by the style's position
pub fn draw_lines<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    lines: &[String],
    origin: (i32, i32),
    line_height: i32,
    style: &TextStyle,
) -> DrawResult<(), DB> {
    for (i, line) in lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        area.draw_text(line, style, (origin.0, origin.1 + i as i32 * line_height))?;
    }
    Ok(())
}

/// Point where the segment from the box centre towards `target` leaves the box
///
/// Returns None when the target lies inside the box.
pub fn clip_to_box(
    centre: (f64, f64),
    half: (f64, f64),
    target: (f64, f64),
) -> Option<(f64, f64)> {
    let dx = target.0 - centre.0;
    let dy = target.1 - centre.1;
    let sx = if dx == 0.0 { f64::INFINITY } else { half.0 / dx.abs() };
    let sy = if dy == 0.0 { f64::INFINITY } else { half.1 / dy.abs() };
    let scale = sx.min(sy);
    if scale >= 1.0 {
        return None;
    }
    Some((centre.0 + dx * scale, centre.1 + dy * scale))
}

/// Triangle of an arrow head with its tip at `tip`, pointing away from `from`
pub fn arrow_head(tip: (f64, f64), from: (f64, f64), length: f64, half_width: f64) -> [(i32, i32); 3] {
    let dx = tip.0 - from.0;
    let dy = tip.1 - from.1;
    let norm = (dx * dx + dy * dy).sqrt();
    let (ux, uy) = if norm == 0.0 { (0.0, -1.0) } else { (dx / norm, dy / norm) };

    let base = (tip.0 - ux * length, tip.1 - uy * length);
    let left = (base.0 - uy * half_width, base.1 + ux * half_width);
    let right = (base.0 + uy * half_width, base.1 - ux * half_width);

    [
        (tip.0.round() as i32, tip.1.round() as i32),
        (left.0.round() as i32, left.1.round() as i32),
        (right.0.round() as i32, right.1.round() as i32),
    ]
}

/// Straight arrow from `from` to `to` with a filled head
pub fn draw_arrow<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    from: (f64, f64),
    to: (f64, f64),
    color: RGBColor,
    style: &Style,
) -> DrawResult<(), DB> {
    let head_len = style.pxf(7.0);
    let head = arrow_head(to, from, head_len, head_len * 0.4);

    // Stop the shaft at the head's base so the tip stays sharp
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let norm = (dx * dx + dy * dy).sqrt().max(1.0);
    let shaft_end = (to.0 - dx / norm * head_len, to.1 - dy / norm * head_len);

    area.draw(&PathElement::new(
        vec![
            (from.0.round() as i32, from.1.round() as i32),
            (shaft_end.0.round() as i32, shaft_end.1.round() as i32),
        ],
        color.stroke_width(style.px(1.0)),
    ))?;
    area.draw(&Polygon::new(head.to_vec(), color.filled()))?;
    Ok(())
}

/// White box with a thin border
pub fn draw_box<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    top_left: (i32, i32),
    bottom_right: (i32, i32),
    edge: RGBColor,
    style: &Style,
) -> DrawResult<(), DB> {
    area.draw(&Rectangle::new([top_left, bottom_right], WHITE.filled()))?;
    area.draw(&Rectangle::new(
        [top_left, bottom_right],
        edge.stroke_width(style.px(1.0)),
    ))?;
    Ok(())
}

/// Draw one callout onto the full canvas
pub fn draw_annotation<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    frame: &PlotFrame,
    annotation: &Annotation,
    style: &Style,
) -> DrawResult<(), DB> {
    let text_color = annotation.paint.map(|p| style.paint(p)).unwrap_or(TEXT_COLOR);
    let edge_color = annotation.paint.map(|p| style.paint(p)).unwrap_or(BOX_EDGE);

    let hpos = match annotation.align {
        Align::Left => HPos::Left,
        Align::Center => HPos::Center,
        Align::Right => HPos::Right,
    };
    let text_style = style.text(
        annotation.size_pt,
        annotation.bold,
        text_color,
        Pos::new(hpos, VPos::Top),
    );

    let lines: Vec<String> = annotation.text.split('\n').map(str::to_string).collect();
    let text_w = lines
        .iter()
        .map(|l| text_width(root, l, &text_style))
        .max()
        .unwrap_or(0) as f64;
    let line_h = style.pxf(annotation.size_pt * LINE_SPACING);
    let pad = style.pxf(annotation.size_pt * 0.4);

    let box_w = text_w + 2.0 * pad;
    let box_h = lines.len() as f64 * line_h + 2.0 * pad;

    let (ax, ay) = frame.resolve(annotation.at);
    let left = match annotation.align {
        Align::Left => ax,
        Align::Center => ax - box_w / 2.0,
        Align::Right => ax - box_w,
    };
    let top = ay - box_h / 2.0;
    let centre = (left + box_w / 2.0, ay);

    if let Some(target) = annotation.arrow_to {
        let tip = frame.resolve(target);
        if let Some(start) = clip_to_box(centre, (box_w / 2.0, box_h / 2.0), tip) {
            draw_arrow(root, start, tip, edge_color, style)?;
        }
    }

    if annotation.boxed {
        draw_box(
            root,
            (left.round() as i32, top.round() as i32),
            ((left + box_w).round() as i32, (top + box_h).round() as i32),
            edge_color,
            style,
        )?;
    }

    let text_x = match annotation.align {
        Align::Left => left + pad,
        Align::Center => left + box_w / 2.0,
        Align::Right => left + box_w - pad,
    };
    draw_lines(
        root,
        &lines,
        (text_x.round() as i32, (top + pad).round() as i32),
        line_h.round() as i32,
        &text_style,
    )
}
