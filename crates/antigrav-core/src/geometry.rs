//! Surface geometry in virtual pixels.

use std::ops::{Add, Sub};

/// Pointer position meaning "no active pointer". Far enough off-surface that
/// no particle is ever inside the repulsion radius.
pub const POINTER_SENTINEL: Point = Point::new(-1000.0, -1000.0);

/// A position on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean length of the vector from the origin to this point.
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Drawable surface dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

impl SurfaceSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn min_side(self) -> f32 {
        self.width.min(self.height)
    }

    pub fn max_side(self) -> f32 {
        self.width.max(self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_center_and_sides() {
        let size = SurfaceSize::new(1000.0, 800.0);
        assert_eq!(size.center(), Point::new(500.0, 400.0));
        assert_eq!(size.min_side(), 800.0);
        assert_eq!(size.max_side(), 1000.0);
    }

    #[test]
    fn test_point_arithmetic() {
        let p = Point::new(3.0, 4.0) - Point::new(0.0, 0.0);
        assert_eq!(p.length(), 5.0);
        assert_eq!(p + Point::new(1.0, 1.0), Point::new(4.0, 5.0));
    }
}
