//! Pixel geometry of a drawn plot
//!
//! `PlotFrame` remembers where the plotting rectangle landed on the canvas and
//! which data ranges it spans, so callouts in data or axes-fraction
//! coordinates can be placed after the chart itself is drawn.

use crate::exhibits::figure::Anchor;

/// Plotting rectangle in absolute canvas pixels plus its data ranges
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotFrame {
    /// (left, right) pixel columns
    pub x_px: (i32, i32),
    /// (top, bottom) pixel rows
    pub y_px: (i32, i32),
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    /// Secondary y range sharing the x axis
    pub y2_range: Option<(f64, f64)>,
}

impl PlotFrame {
    /// Frame with unit ranges, used by panels without data axes
    pub fn unit(x_px: (i32, i32), y_px: (i32, i32)) -> Self {
        Self {
            x_px,
            y_px,
            x_range: (0.0, 1.0),
            y_range: (0.0, 1.0),
            y2_range: None,
        }
    }

    pub fn width(&self) -> i32 {
        self.x_px.1 - self.x_px.0
    }

    pub fn height(&self) -> i32 {
        self.y_px.1 - self.y_px.0
    }

    fn map_x(&self, x: f64) -> f64 {
        let (lo, hi) = self.x_range;
        self.x_px.0 as f64 + fraction(x, lo, hi) * self.width() as f64
    }

    fn map_y(&self, y: f64, range: (f64, f64)) -> f64 {
        self.y_px.1 as f64 - fraction(y, range.0, range.1) * self.height() as f64
    }

    /// Data coordinates of the primary axes to pixels
    pub fn data_to_px(&self, x: f64, y: f64) -> (f64, f64) {
        (self.map_x(x), self.map_y(y, self.y_range))
    }

    /// Data coordinates of the secondary axes to pixels
    ///
    /// Falls back to the primary range when the plot has no secondary axis.
    pub fn secondary_to_px(&self, x: f64, y: f64) -> (f64, f64) {
        let range = self.y2_range.unwrap_or(self.y_range);
        (self.map_x(x), self.map_y(y, range))
    }

    /// Axes fraction (origin bottom-left) to pixels
    pub fn axes_to_px(&self, fx: f64, fy: f64) -> (f64, f64) {
        (
            self.x_px.0 as f64 + fx * self.width() as f64,
            self.y_px.1 as f64 - fy * self.height() as f64,
        )
    }

    pub fn resolve(&self, anchor: Anchor) -> (f64, f64) {
        match anchor {
            Anchor::Data(x, y) => self.data_to_px(x, y),
            Anchor::SecondaryData(x, y) => self.secondary_to_px(x, y),
            Anchor::Axes(fx, fy) => self.axes_to_px(fx, fy),
        }
    }

    /// Pixels back to primary data coordinates
    pub fn px_to_data(&self, px: f64, py: f64) -> (f64, f64) {
        let (x0, x1) = self.x_range;
        let (y0, y1) = self.y_range;
        let fx = if self.width() == 0 {
            0.0
        } else {
            (px - self.x_px.0 as f64) / self.width() as f64
        };
        let fy = if self.height() == 0 {
            0.0
        } else {
            (self.y_px.1 as f64 - py) / self.height() as f64
        };
        (x0 + fx * (x1 - x0), y0 + fy * (y1 - y0))
    }
}

fn fraction(v: f64, lo: f64, hi: f64) -> f64 {
    if hi == lo {
        0.0
    } else {
        (v - lo) / (hi - lo)
    }
}

/// Re-express a secondary-axis value in primary-axis units
pub fn project(value: f64, from: (f64, f64), onto: (f64, f64)) -> f64 {
    onto.0 + fraction(value, from.0, from.1) * (onto.1 - onto.0)
}

/// Round tick positions covering [min, max] with roughly `target` steps
///
/// Steps are 1, 2, 2.5 or 5 times a power of ten.
pub fn nice_ticks(min: f64, max: f64, target: usize) -> Vec<f64> {
    if !(max > min) || !min.is_finite() || !max.is_finite() {
        return vec![min];
    }
    let step = nice_step((max - min) / target.max(1) as f64);
    let first = (min / step - 1e-9).ceil() as i64;
    let last = (max / step + 1e-9).floor() as i64;

    // Snap away binary noise such as 0.30000000000000004
    let decimals = (1.0 - step.log10().floor()).max(0.0) as i32;
    let factor = 10f64.powi(decimals);

    (first..=last)
        .map(|i| (i as f64 * step * factor).round() / factor)
        .collect()
}

fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 2.5 {
        2.5
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Decimals needed to print every tick distinctly
pub fn tick_decimals(ticks: &[f64]) -> usize {
    (0..=3)
        .find(|d| {
            let factor = 10f64.powi(*d as i32);
            ticks
                .iter()
                .all(|t| ((t * factor).round() - t * factor).abs() < 1e-6)
        })
        .unwrap_or(3)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> PlotFrame {
        PlotFrame {
            x_px: (100, 600),
            y_px: (50, 450),
            x_range: (-0.5, 4.5),
            y_range: (0.0, 8.0),
            y2_range: Some((0.0, 0.8)),
        }
    }

    #[test]
    fn test_data_mapping() {
        let f = frame();
        assert_eq!(f.data_to_px(-0.5, 0.0), (100.0, 450.0));
        assert_eq!(f.data_to_px(4.5, 8.0), (600.0, 50.0));
        assert_eq!(f.data_to_px(2.0, 4.0), (350.0, 250.0));
    }

    #[test]
    fn test_secondary_mapping() {
        let f = frame();
        assert_eq!(f.secondary_to_px(2.0, 0.4), (350.0, 250.0));

        let mut single = f;
        single.y2_range = None;
        assert_eq!(single.secondary_to_px(2.0, 4.0), (350.0, 250.0));
    }

    #[test]
    fn test_axes_fraction_mapping() {
        let f = frame();
        assert_eq!(f.axes_to_px(0.0, 0.0), (100.0, 450.0));
        assert_eq!(f.axes_to_px(0.5, 0.15), (350.0, 390.0));
        assert_eq!(f.resolve(Anchor::Axes(1.0, 1.0)), (600.0, 50.0));
    }

    #[test]
    fn test_inverse_mapping() {
        let f = frame();
        let (x, y) = f.px_to_data(350.0, 250.0);
        assert!((x - 2.0).abs() < 1e-9);
        assert!((y - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_frame() {
        let f = PlotFrame::unit((10, 10), (20, 20));
        assert_eq!(f.px_to_data(10.0, 20.0), (0.0, 0.0));
        assert_eq!(f.data_to_px(0.5, 0.5), (10.0, 20.0));
    }

    #[test]
    fn test_project() {
        assert!((project(0.25, (0.0, 0.5), (0.0, 8.0)) - 4.0).abs() < 1e-9);
        assert!((project(-3.0, (-3.6, 0.0), (0.0, 22.5)) - 3.75).abs() < 1e-9);
    }

    #[test]
    fn test_nice_ticks() {
        assert_eq!(nice_ticks(0.0, 60.0, 6), vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0]);
        assert_eq!(nice_ticks(0.0, 7.5, 6), vec![0.0, 2.0, 4.0, 6.0]);
        assert_eq!(nice_ticks(0.0, 0.6, 6), vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6]);
        assert_eq!(nice_ticks(-3.6, 0.0, 6), vec![-3.0, -2.0, -1.0, 0.0]);
        assert_eq!(nice_ticks(1.0, 1.0, 6), vec![1.0]);
    }

    #[test]
    fn test_tick_decimals() {
        assert_eq!(tick_decimals(&[0.0, 10.0, 20.0]), 0);
        assert_eq!(tick_decimals(&[0.0, 0.1, 0.2]), 1);
        assert_eq!(tick_decimals(&[0.0, 2.5, 5.0]), 1);
        assert_eq!(tick_decimals(&[0.0, 0.25, 0.5]), 2);
    }
}
