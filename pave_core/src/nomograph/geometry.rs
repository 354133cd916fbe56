//! Chart-plane geometry for turning-line constructions.

use serde::{Deserialize, Serialize};

/// Point in chart coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Infinite line through two points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub a: Point,
    pub b: Point,
}

impl Line {
    pub fn through(a: Point, b: Point) -> Self {
        Line { a, b }
    }

    pub fn horizontal(y: f64) -> Self {
        Line::through(Point::new(0.0, y), Point::new(1.0, y))
    }

    pub fn vertical(x: f64) -> Self {
        Line::through(Point::new(x, 0.0), Point::new(x, 1.0))
    }

    fn dx(&self) -> f64 {
        self.b.x - self.a.x
    }

    fn dy(&self) -> f64 {
        self.b.y - self.a.y
    }

    /// Intersection point; `None` for parallel or coincident lines.
    pub fn intersection(&self, other: &Line) -> Option<Point> {
        let denom = self.dx() * other.dy() - self.dy() * other.dx();
        if denom == 0.0 {
            return None;
        }
        let s = ((other.a.x - self.a.x) * other.dy() - (other.a.y - self.a.y) * other.dx()) / denom;
        Some(Point::new(self.a.x + s * self.dx(), self.a.y + s * self.dy()))
    }

    /// x where the line crosses height `y`; `None` for a horizontal line.
    pub fn x_at_y(&self, y: f64) -> Option<f64> {
        if self.dy() == 0.0 {
            return None;
        }
        Some(self.a.x + (y - self.a.y) / self.dy() * self.dx())
    }

    /// y where the line crosses `x`; `None` for a vertical line.
    pub fn y_at_x(&self, x: f64) -> Option<f64> {
        if self.dx() == 0.0 {
            return None;
        }
        Some(self.a.y + (x - self.a.x) / self.dx() * self.dy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersection() {
        let diagonal = Line::through(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        let p = diagonal.intersection(&Line::horizontal(4.0)).unwrap();
        assert!((p.x - 4.0).abs() < 1e-12 && (p.y - 4.0).abs() < 1e-12);

        let q = Line::vertical(3.0).intersection(&Line::horizontal(7.0)).unwrap();
        assert_eq!(q, Point::new(3.0, 7.0));
    }

    #[test]
    fn test_parallel_lines() {
        let a = Line::through(Point::new(0.0, 0.0), Point::new(1.0, 2.0));
        let b = Line::through(Point::new(0.0, 1.0), Point::new(1.0, 3.0));
        assert!(a.intersection(&b).is_none());
    }

    #[test]
    fn test_axis_crossings() {
        let line = Line::through(Point::new(0.0, 10.0), Point::new(10.0, 30.0));
        assert!((line.y_at_x(5.0).unwrap() - 20.0).abs() < 1e-12);
        assert!((line.x_at_y(20.0).unwrap() - 5.0).abs() < 1e-12);
        assert!(Line::horizontal(1.0).x_at_y(2.0).is_none());
        assert!(Line::vertical(1.0).y_at_x(2.0).is_none());
    }
}
