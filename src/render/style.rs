//! Resolution-aware drawing style
//!
//! Figures are specified in inches and points. `Style` converts them to
//! backend pixels for one output (PNG at `png.dpi`, SVG at `svg.dpi`) and
//! resolves palette slots to concrete colours for the configured theme.

use crate::config::RenderConfig;
use crate::exhibits::figure::Paint;
use crate::exhibits::palettes::{palette_registry, parse_hex_color, PaletteDefinition};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};

/// Points per inch
const PT_PER_INCH: f64 = 72.0;

const FALLBACK_GRAY: RGBColor = RGBColor(128, 128, 128);

pub const TEXT_COLOR: RGBColor = RGBColor(0x22, 0x22, 0x22);
pub const BOX_EDGE: RGBColor = RGBColor(0x80, 0x80, 0x80);
pub const HEADER_FILL: RGBColor = RGBColor(0xF0, 0xF0, 0xF0);
pub const CELL_EDGE: RGBColor = RGBColor(0xD3, 0xD3, 0xD3);

#[derive(Debug, Clone)]
pub struct Style {
    pub dpi: f64,
    pub font_family: String,
    pub show_footnotes: bool,
    honor_brand: bool,
    categorical: Option<PaletteDefinition>,
    status: Option<PaletteDefinition>,
}

impl Style {
    pub fn new(config: &RenderConfig, dpi: f64) -> Self {
        let registry = palette_registry();

        let categorical = registry
            .get(config.categorical_palette())
            .or_else(|| {
                tracing::warn!(
                    "Unknown palette '{}', using {}",
                    config.categorical_palette(),
                    config.theme.categorical_palette()
                );
                registry.get(config.theme.categorical_palette())
            })
            .or_else(|| registry.default_categorical())
            .cloned();
        let status = registry
            .get(config.theme.status_palette())
            .or_else(|| registry.default_status())
            .cloned();

        Self {
            dpi,
            font_family: config.font_family.clone(),
            show_footnotes: config.show_footnotes,
            honor_brand: config.theme.honors_brand_colors(),
            categorical,
            status,
        }
    }

    /// Points to pixels (at least one pixel)
    pub fn px(&self, pt: f64) -> u32 {
        self.pxf(pt).round().max(1.0) as u32
    }

    pub fn pxf(&self, pt: f64) -> f64 {
        pt * self.dpi / PT_PER_INCH
    }

    pub fn font(&self, pt: f64) -> FontDesc<'_> {
        FontDesc::new(
            FontFamily::from(self.font_family.as_str()),
            self.pxf(pt),
            FontStyle::Normal,
        )
    }

    pub fn bold_font(&self, pt: f64) -> FontDesc<'_> {
        FontDesc::new(
            FontFamily::from(self.font_family.as_str()),
            self.pxf(pt),
            FontStyle::Bold,
        )
    }

    /// Text style anchored at `pos`
    pub fn text(&self, pt: f64, bold: bool, color: RGBColor, pos: Pos) -> TextStyle<'_> {
        let font = if bold {
            self.bold_font(pt)
        } else {
            self.font(pt)
        };
        TextStyle {
            font,
            color: color.to_backend_color(),
            pos,
        }
    }

    /// Plain body text, left/top anchored
    pub fn label(&self, pt: f64) -> TextStyle<'_> {
        self.text(pt, false, TEXT_COLOR, Pos::new(HPos::Left, VPos::Top))
    }

    /// Concrete colour of a series paint
    pub fn paint(&self, paint: Paint) -> RGBColor {
        if self.honor_brand {
            if let Some(rgb) = paint.brand.and_then(parse_hex_color) {
                return RGBColor(rgb[0], rgb[1], rgb[2]);
            }
        }
        match &self.categorical {
            Some(palette) => {
                let [r, g, b] = palette.get_color(paint.slot);
                RGBColor(r, g, b)
            }
            None => FALLBACK_GRAY,
        }
    }

    /// Concrete colour of a scorecard status slot
    pub fn status(&self, slot: usize) -> RGBColor {
        match &self.status {
            Some(palette) => {
                let [r, g, b] = palette.get_color(slot);
                RGBColor(r, g, b)
            }
            None => FALLBACK_GRAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exhibits::properties::PropertyValue;

    fn style_with(values: &[PropertyValue], dpi: f64) -> Style {
        Style::new(&RenderConfig::from_properties(values), dpi)
    }

    #[test]
    fn test_points_to_pixels() {
        let style = style_with(&[], 300.0);
        assert_eq!(style.px(72.0), 300);
        assert_eq!(style.px(12.0), 50);
        assert_eq!(style.px(0.01), 1);

        let svg = style_with(&[], 72.0);
        assert_eq!(svg.px(11.0), 11);
    }

    #[test]
    fn test_brand_colors_follow_theme() {
        let pix = Paint::brand(2, "#28A745");

        let brand = style_with(&[], 72.0);
        assert_eq!(brand.paint(pix), RGBColor(40, 167, 69));

        // Default theme ignores the brand hex and uses Tableau10 slot 2
        let default = style_with(&[PropertyValue::new("theme", "default")], 72.0);
        assert_eq!(default.paint(pix), RGBColor(0x2C, 0xA0, 0x2C));

        let gray = style_with(&[PropertyValue::new("theme", "grayscale")], 72.0);
        assert_eq!(gray.paint(Paint::slot(0)), RGBColor(0x25, 0x25, 0x25));
        assert_eq!(gray.status(0), RGBColor(0x25, 0x25, 0x25));
    }

    #[test]
    fn test_status_colors() {
        let style = style_with(&[], 72.0);
        assert_eq!(style.status(0), RGBColor(40, 167, 69));
        assert_eq!(style.status(1), RGBColor(255, 215, 0));
        assert_eq!(style.status(2), RGBColor(220, 53, 69));
    }

    #[test]
    fn test_unknown_palette_falls_back_to_theme() {
        let style = style_with(&[PropertyValue::new("palette", "Neon")], 72.0);
        assert_eq!(style.paint(Paint::slot(0)), RGBColor(0x1F, 0x77, 0xB4));

        let style = style_with(&[PropertyValue::new("palette", "Brand")], 72.0);
        assert_eq!(style.paint(Paint::slot(0)), RGBColor(0x00, 0x33, 0x66));
    }
}
