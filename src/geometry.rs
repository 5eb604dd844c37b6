//! Geometry value types shared by the widget tree and the paint pipeline.
//!
//! All coordinates are `f32` logical pixels. A rectangle with a
//! non-positive width or height is *empty*: it contains no point and
//! intersects with nothing.

use std::ops::{Add, AddAssign, Sub, SubAssign};

/// A point in 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, o: Point) -> Point {
        Point::new(self.x + o.x, self.y + o.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, o: Point) {
        self.x += o.x;
        self.y += o.y;
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, o: Point) -> Point {
        Point::new(self.x - o.x, self.y - o.y)
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, o: Point) {
        self.x -= o.x;
        self.y -= o.y;
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    pub fn pos(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// The same rectangle with its top-left corner at the origin.
    pub fn at_origin(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// The same rectangle with its top-left corner moved to `pos`.
    pub fn at(&self, pos: Point) -> Rect {
        Rect::new(pos.x, pos.y, self.width, self.height)
    }

    pub fn offset(&self, delta: Point) -> Rect {
        Rect::new(self.x + delta.x, self.y + delta.y, self.width, self.height)
    }

    /// True if the rectangle covers no area.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Point containment. Empty rectangles contain nothing. The right and
    /// bottom edges are exclusive.
    pub fn contains(&self, pt: Point) -> bool {
        if self.is_empty() {
            return false;
        }
        pt.x >= self.x && pt.x < self.x + self.width && pt.y >= self.y && pt.y < self.y + self.height
    }

    /// True if `other` lies entirely inside this rectangle.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.x <= other.x
            && self.y <= other.y
            && self.x + self.width >= other.x + other.width
            && self.y + self.height >= other.y + other.height
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        !self.intersection(other).is_empty()
    }

    /// The overlapping region, or an empty rectangle when there is none.
    pub fn intersection(&self, other: &Rect) -> Rect {
        if self.is_empty() || other.is_empty() {
            return Rect::default();
        }
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = (self.x + self.width).min(other.x + other.width);
        let y1 = (self.y + self.height).min(other.y + other.height);
        if x1 <= x0 || y1 <= y0 {
            return Rect::default();
        }
        Rect::new(x0, y0, x1 - x0, y1 - y0)
    }
}

/// A 2D affine transform in row-major order.
///
/// Only what the drawing surface contract needs: identity, translation,
/// scaling, composition and point application.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub m00: f32,
    pub m01: f32,
    pub m02: f32,
    pub m10: f32,
    pub m11: f32,
    pub m12: f32,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        m00: 1.0,
        m01: 0.0,
        m02: 0.0,
        m10: 0.0,
        m11: 1.0,
        m12: 0.0,
    };

    pub fn translation(dx: f32, dy: f32) -> Self {
        Affine {
            m02: dx,
            m12: dy,
            ..Self::IDENTITY
        }
    }

    pub fn scaling(sx: f32, sy: f32) -> Self {
        Affine {
            m00: sx,
            m11: sy,
            ..Self::IDENTITY
        }
    }

    pub fn apply(&self, pt: Point) -> Point {
        Point::new(
            self.m00 * pt.x + self.m01 * pt.y + self.m02,
            self.m10 * pt.x + self.m11 * pt.y + self.m12,
        )
    }

    /// `self` applied after `other`.
    pub fn then(&self, other: &Affine) -> Affine {
        Affine {
            m00: self.m00 * other.m00 + self.m01 * other.m10,
            m01: self.m00 * other.m01 + self.m01 * other.m11,
            m02: self.m00 * other.m02 + self.m01 * other.m12 + self.m02,
            m10: self.m10 * other.m00 + self.m11 * other.m10,
            m11: self.m10 * other.m01 + self.m11 * other.m11,
            m12: self.m10 * other.m02 + self.m11 * other.m12 + self.m12,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_ops() {
        let a = Point::new(3.0, 4.0);
        let b = Point::new(1.0, 2.0);
        assert_eq!(a + b, Point::new(4.0, 6.0));
        assert_eq!(a - b, Point::new(2.0, 2.0));

        let mut c = a;
        c += b;
        assert_eq!(c, Point::new(4.0, 6.0));
        c -= b;
        assert_eq!(c, a);
    }

    #[test]
    fn test_rect_contains() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert!(r.contains(Point::new(50.0, 40.0)));
        assert!(r.contains(Point::new(10.0, 20.0))); // top-left inclusive
        assert!(!r.contains(Point::new(110.0, 70.0))); // bottom-right exclusive
        assert!(!r.contains(Point::new(5.0, 40.0)));
    }

    #[test]
    fn test_empty_rect_contains_nothing() {
        let zero_width = Rect::new(0.0, 0.0, 0.0, 10.0);
        assert!(zero_width.is_empty());
        assert!(!zero_width.contains(Point::new(0.0, 5.0)));
        assert!(!zero_width.contains(Point::ZERO));

        let negative = Rect::new(0.0, 0.0, -5.0, 10.0);
        assert!(negative.is_empty());
        assert!(!negative.contains(Point::ZERO));
    }

    #[test]
    fn test_empty_rect_intersects_nothing() {
        let empty = Rect::new(0.0, 0.0, 0.0, 10.0);
        let full = Rect::new(-100.0, -100.0, 200.0, 200.0);
        assert!(!empty.intersects(&full));
        assert!(!full.intersects(&empty));
        assert!(full.intersection(&empty).is_empty());
    }

    #[test]
    fn test_rect_intersection() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 50.0, 100.0, 100.0);
        assert_eq!(a.intersection(&b), Rect::new(50.0, 50.0, 50.0, 50.0));

        let c = Rect::new(200.0, 200.0, 10.0, 10.0);
        assert!(a.intersection(&c).is_empty());
    }

    #[test]
    fn test_rect_contains_rect() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(outer.contains_rect(&inner));
        assert!(!inner.contains_rect(&outer));
    }

    #[test]
    fn test_affine_translation() {
        let t = Affine::translation(5.0, -3.0);
        assert_eq!(t.apply(Point::new(1.0, 1.0)), Point::new(6.0, -2.0));
    }

    #[test]
    fn test_affine_compose() {
        let t = Affine::translation(10.0, 0.0);
        let s = Affine::scaling(2.0, 2.0);
        // scale first, then translate
        let ts = t.then(&s);
        assert_eq!(ts.apply(Point::new(3.0, 4.0)), Point::new(16.0, 8.0));
    }

    #[test]
    fn test_rect_at_origin() {
        let r = Rect::new(7.0, 8.0, 30.0, 40.0);
        assert_eq!(r.at_origin(), Rect::new(0.0, 0.0, 30.0, 40.0));
        assert_eq!(r.pos(), Point::new(7.0, 8.0));
        assert_eq!(r.size(), Size::new(30.0, 40.0));
    }
}
