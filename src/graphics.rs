//! The abstract drawing boundary between the widget tree and a renderer.
//!
//! Concrete surfaces (CPU rasterizer, OpenGL, Vulkan) live outside this
//! crate; they implement [`Surface`] and are handed to the paint walk by
//! a [`NativeView`](crate::backend::NativeView). Widgets never see the
//! surface directly: they draw through a [`Graphics`] handle, which also
//! carries the save/restore discipline the pipeline relies on.

use crate::geometry::{Affine, Point, Rect};
use crate::style::Color;

/// How text is placed relative to its anchor point or box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    TopLeft,
    Centered,
}

/// The drawing-surface contract a rendering backend must satisfy.
///
/// `save`/`restore` must be balanced: every `save` is matched by exactly
/// one `restore`, and `restore` reinstates the translation and clip that
/// were current at the matching `save`.
pub trait Surface {
    fn scale_factor(&self) -> f32 {
        1.0
    }

    fn translate(&mut self, delta: Point);
    fn transform(&mut self, mat: Affine);

    /// Replace the clip with `r` (in the current space).
    fn clip(&mut self, r: Rect);
    /// Shrink the clip to its intersection with `r`.
    fn intersect_clip(&mut self, r: Rect);
    /// The current clip, in the current space.
    fn last_clip(&self) -> Rect;

    fn save(&mut self);
    fn restore(&mut self);

    fn set_fill(&mut self, color: Color);
    fn fill_rect(&mut self, r: Rect);

    /// Draw text at `x`/`y`. Returns false when the surface has no text
    /// support; callers must treat that as a painted no-op.
    fn text(&mut self, _text: &str, _x: f32, _y: f32, _align: Align) -> bool {
        false
    }
}

/// The drawing handle a widget paints through.
pub struct Graphics<'a> {
    surface: &'a mut dyn Surface,
}

impl<'a> Graphics<'a> {
    pub fn new(surface: &'a mut dyn Surface) -> Self {
        Self { surface }
    }

    pub fn save(&mut self) {
        self.surface.save();
    }

    pub fn restore(&mut self) {
        self.surface.restore();
    }

    pub fn translate(&mut self, delta: Point) {
        self.surface.translate(delta);
    }

    pub fn intersect_clip(&mut self, r: Rect) {
        self.surface.intersect_clip(r);
    }

    pub fn last_clip(&self) -> Rect {
        self.surface.last_clip()
    }

    pub fn set_color(&mut self, color: Color) {
        self.surface.set_fill(color);
    }

    pub fn fill_rect(&mut self, r: Rect) {
        if r.is_empty() {
            return;
        }
        self.surface.fill_rect(r);
    }

    pub fn draw_text(&mut self, text: &str, area: Rect, align: Align) -> bool {
        let (x, y) = match align {
            Align::TopLeft => (area.x, area.y),
            Align::Centered => (area.x + area.width / 2.0, area.y + area.height / 2.0),
        };
        self.surface.text(text, x, y, align)
    }

    pub fn scale_factor(&self) -> f32 {
        self.surface.scale_factor()
    }
}
