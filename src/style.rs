//! Stateless drawing delegates consulted by widgets at paint time.
//!
//! A [`Style`] keeps widget rendering consistent across a panel: widgets
//! hand it their visual state and bounds and it issues the actual drawing
//! commands. Colors are keyed by small integer [`ColorId`]s so embedders
//! can retheme without touching widget code.

use std::collections::HashMap;

use crate::geometry::Rect;
use crate::graphics::{Align, Graphics};

/// An RGBA color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Shift all color channels by `amount` (negative darkens).
    pub fn brighter(&self, amount: f32) -> Self {
        Self {
            r: (self.r + amount).clamp(0.0, 1.0),
            g: (self.g + amount).clamp(0.0, 1.0),
            b: (self.b + amount).clamp(0.0, 1.0),
            a: self.a,
        }
    }

    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// A key into a style's color table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorId(pub u16);

impl ColorId {
    pub const BUTTON_BASE: ColorId = ColorId(1);
    pub const BUTTON_ON: ColorId = ColorId(2);
    pub const BUTTON_TEXT_OFF: ColorId = ColorId(3);
    pub const BUTTON_TEXT_ON: ColorId = ColorId(4);
    pub const SLIDER_BASE: ColorId = ColorId(5);
    pub const SLIDER_THUMB: ColorId = ColorId(6);
}

/// Visual state a button hands to the style.
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonVisual {
    pub highlighted: bool,
    pub down: bool,
    pub toggled: bool,
}

/// Slider orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderKind {
    HorizontalBar,
    VerticalBar,
}

pub trait Style {
    /// Look up a themed color; unknown ids fall back to black.
    fn color(&self, id: ColorId) -> Color;

    fn draw_button_shape(&self, g: &mut Graphics<'_>, visual: ButtonVisual, bounds: Rect);

    fn draw_button_text(&self, g: &mut Graphics<'_>, visual: ButtonVisual, text: &str, bounds: Rect);

    /// `pos` is the thumb position in pixels along the slider's axis.
    fn draw_slider(&self, g: &mut Graphics<'_>, kind: SliderKind, bounds: Rect, pos: f32);
}

/// The built-in dark style.
pub struct DefaultStyle {
    colors: HashMap<ColorId, Color>,
}

impl DefaultStyle {
    pub fn new() -> Self {
        let mut colors = HashMap::new();
        colors.insert(ColorId::BUTTON_BASE, Color::from_hex(0x464646));
        colors.insert(ColorId::BUTTON_ON, Color::from_hex(0x252525));
        colors.insert(ColorId::BUTTON_TEXT_OFF, Color::from_hex(0xeeeeee));
        colors.insert(ColorId::BUTTON_TEXT_ON, Color::from_hex(0xdddddd));
        colors.insert(ColorId::SLIDER_BASE, Color::from_hex(0x141414));
        colors.insert(ColorId::SLIDER_THUMB, Color::from_hex(0x451414));
        Self { colors }
    }

    pub fn set_color(&mut self, id: ColorId, color: Color) {
        self.colors.insert(id, color);
    }
}

impl Default for DefaultStyle {
    fn default() -> Self {
        Self::new()
    }
}

impl Style for DefaultStyle {
    fn color(&self, id: ColorId) -> Color {
        self.colors.get(&id).copied().unwrap_or(Color::BLACK)
    }

    fn draw_button_shape(&self, g: &mut Graphics<'_>, visual: ButtonVisual, bounds: Rect) {
        let mut bc = if visual.toggled {
            self.color(ColorId::BUTTON_ON)
        } else {
            self.color(ColorId::BUTTON_BASE)
        };
        if visual.down {
            bc = bc.brighter(-0.035);
        } else if visual.highlighted {
            bc = bc.brighter(-0.015);
        }

        g.set_color(bc.brighter(-0.02));
        g.fill_rect(bounds.at_origin());
        g.set_color(bc);
        g.fill_rect(bounds.at_origin());
    }

    fn draw_button_text(&self, g: &mut Graphics<'_>, visual: ButtonVisual, text: &str, bounds: Rect) {
        let mut c = self.color(if visual.toggled {
            ColorId::BUTTON_TEXT_ON
        } else {
            ColorId::BUTTON_TEXT_OFF
        });
        if visual.highlighted || visual.down {
            c = c.brighter(0.05);
        }
        g.set_color(c);
        g.draw_text(text, bounds.at_origin(), Align::Centered);
    }

    fn draw_slider(&self, g: &mut Graphics<'_>, kind: SliderKind, bounds: Rect, pos: f32) {
        let r = bounds.at_origin();
        g.set_color(self.color(ColorId::SLIDER_BASE));
        g.fill_rect(r);

        g.set_color(self.color(ColorId::SLIDER_THUMB));
        let filled = match kind {
            SliderKind::HorizontalBar => Rect::new(0.0, 0.0, pos, r.height),
            // Filled region grows upward from the bottom edge.
            SliderKind::VerticalBar => Rect::new(0.0, r.height - pos, r.width, pos),
        };
        g.fill_rect(filled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::record::RecordingSurface;

    #[test]
    fn test_color_from_hex() {
        let c = Color::from_hex(0xFF0000);
        assert_eq!((c.r, c.g, c.b, c.a), (1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_color_brighter_clamps() {
        let c = Color::rgb(0.95, 0.5, 0.0).brighter(0.1);
        assert_eq!(c.r, 1.0);
        assert!((c.g - 0.6).abs() < 1e-6);
        assert!((c.b - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_default_style_palette() {
        let style = DefaultStyle::new();
        assert_eq!(style.color(ColorId::BUTTON_BASE), Color::from_hex(0x464646));
        // unknown ids fall back to black
        assert_eq!(style.color(ColorId(999)), Color::BLACK);
    }

    #[test]
    fn test_slider_fill_horizontal() {
        let style = DefaultStyle::new();
        let mut surface = RecordingSurface::new();
        let mut g = Graphics::new(&mut surface);
        style.draw_slider(
            &mut g,
            SliderKind::HorizontalBar,
            Rect::new(0.0, 0.0, 100.0, 20.0),
            40.0,
        );
        let fills = surface.fills();
        assert_eq!(fills.len(), 2);
        assert_eq!(fills[1], Rect::new(0.0, 0.0, 40.0, 20.0));
    }

    #[test]
    fn test_slider_fill_vertical_grows_upward() {
        let style = DefaultStyle::new();
        let mut surface = RecordingSurface::new();
        let mut g = Graphics::new(&mut surface);
        style.draw_slider(
            &mut g,
            SliderKind::VerticalBar,
            Rect::new(0.0, 0.0, 20.0, 100.0),
            30.0,
        );
        let fills = surface.fills();
        assert_eq!(fills[1], Rect::new(0.0, 70.0, 20.0, 30.0));
    }
}
