//! Draw primitives the particle field renders through.

use antigrav_core::{Point, Rgb, SurfaceSize};

/// Translate-then-rotate transform from object space to surface space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Point,
    pub rotation: f32,
}

impl Transform {
    pub fn new(translation: Point, rotation: f32) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    /// Map an object-space point into surface space.
    pub fn apply(&self, local: Point) -> Point {
        let (sin, cos) = self.rotation.sin_cos();
        Point::new(
            self.translation.x + local.x * cos - local.y * sin,
            self.translation.y + local.x * sin + local.y * cos,
        )
    }
}

/// Object-space vertices of an upward-pointing triangle of the given size.
pub fn triangle_vertices(size: f32) -> [Point; 3] {
    let half = size / 2.0;
    [
        Point::new(0.0, -half),
        Point::new(half, half),
        Point::new(-half, half),
    ]
}

/// A surface the field can draw into.
pub trait Canvas {
    /// Erase everything drawn so far.
    fn clear(&mut self, surface: SurfaceSize);

    /// Fill a triangle of `size` placed by `transform`.
    fn fill_triangle(&mut self, transform: Transform, size: f32, color: Rgb);
}

/// One filled triangle recorded by a [`DrawList`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawTriangle {
    pub transform: Transform,
    pub size: f32,
    pub color: Rgb,
}

impl DrawTriangle {
    /// Surface-space vertices.
    pub fn vertices(&self) -> [Point; 3] {
        triangle_vertices(self.size).map(|v| self.transform.apply(v))
    }
}

/// Canvas that records triangles for a backend to rasterize later.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    surface: SurfaceSize,
    triangles: Vec<DrawTriangle>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface size passed to the last `clear`.
    pub fn surface(&self) -> SurfaceSize {
        self.surface
    }

    /// Triangles in draw order.
    pub fn triangles(&self) -> &[DrawTriangle] {
        &self.triangles
    }
}

impl Canvas for DrawList {
    fn clear(&mut self, surface: SurfaceSize) {
        self.surface = surface;
        self.triangles.clear();
    }

    fn fill_triangle(&mut self, transform: Transform, size: f32, color: Rgb) {
        self.triangles.push(DrawTriangle {
            transform,
            size,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn test_transform_translates_without_rotation() {
        let t = Transform::new(Point::new(10.0, 20.0), 0.0);
        assert!(approx(t.apply(Point::new(1.0, 2.0)), Point::new(11.0, 22.0)));
    }

    #[test]
    fn test_transform_rotates_before_translating() {
        let t = Transform::new(Point::new(10.0, 10.0), FRAC_PI_2);
        // A quarter turn maps +x onto +y in y-down surface space.
        assert!(approx(t.apply(Point::new(1.0, 0.0)), Point::new(10.0, 11.0)));
    }

    #[test]
    fn test_triangle_vertices_point_up() {
        let [apex, right, left] = triangle_vertices(8.0);
        assert_eq!(apex, Point::new(0.0, -4.0));
        assert_eq!(right, Point::new(4.0, 4.0));
        assert_eq!(left, Point::new(-4.0, 4.0));
    }

    #[test]
    fn test_draw_list_clear_discards_triangles() {
        let mut list = DrawList::new();
        let red = Rgb::new(255, 0, 0);
        list.fill_triangle(Transform::new(Point::default(), 0.0), 4.0, red);
        assert_eq!(list.triangles().len(), 1);

        list.clear(SurfaceSize::new(80.0, 40.0));
        assert!(list.triangles().is_empty());
        assert_eq!(list.surface(), SurfaceSize::new(80.0, 40.0));
    }
}
