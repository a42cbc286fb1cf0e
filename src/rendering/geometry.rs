/// Plane geometry shared by the walk and the rasterizer

use std::ops::{Add, AddAssign, Sub};

/// A point (or displacement) in canvas pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (other - self).length()
    }

    pub fn dot(self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Axis-aligned pixel bounds, half-open on the max side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl PixelRect {
    /// Pixels touched by the real-valued box `[min, max]`, clipped to a
    /// `width` x `height` surface. Returns None when nothing is on canvas.
    pub fn covering(min: Point, max: Point, width: u32, height: u32) -> Option<Self> {
        let clip = |v: f64, limit: u32| v.clamp(0.0, limit as f64) as u32;
        let x0 = clip(min.x.floor(), width);
        let y0 = clip(min.y.floor(), height);
        let x1 = clip(max.x.floor() + 1.0, width);
        let y1 = clip(max.y.floor() + 1.0, height);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some(Self { x0, y0, x1, y1 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_arithmetic() {
        let mut p = Point::new(100.0, 100.0);
        p += Point::new(3.0, 4.0);
        assert_eq!(p, Point::new(103.0, 104.0));
        assert_eq!(Point::new(100.0, 100.0).distance_to(p), 5.0);
        assert_eq!(p - p, Point::ORIGIN);
    }

    #[test]
    fn covering_clips_to_surface() {
        let r = PixelRect::covering(Point::new(-3.5, 2.2), Point::new(4.1, 9.0), 8, 8).unwrap();
        assert_eq!(r, PixelRect { x0: 0, y0: 2, x1: 5, y1: 8 });
        assert!(PixelRect::covering(Point::new(20.0, 20.0), Point::new(30.0, 30.0), 8, 8).is_none());
    }
}
