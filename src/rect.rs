//! Rectangles.

use cgmath::{Point2, Vector2};

/// A rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Rectangle origin.
    pub origin: Point2<f64>,

    /// Rectangle size.
    pub size: Vector2<f64>,
}

impl Rect {
    /// Creates a new rectangle.
    pub fn new(origin: Point2<f64>, size: Vector2<f64>) -> Rect {
        Rect { origin, size }
    }

    /// The x coordinate of the right edge; where the next column starts.
    pub fn max_x(&self) -> f64 {
        self.origin.x + self.size.x
    }

    /// Returns true if the point is inside the rectangle.
    ///
    /// The right and bottom edges are exclusive, so adjacent columns never both contain a point.
    pub fn contains(&self, point: Point2<f64>) -> bool {
        point.x >= self.origin.x
            && point.y >= self.origin.y
            && point.x < self.max_x()
            && point.y < self.origin.y + self.size.y
    }
}

#[test]
fn test_rect_edges() {
    let a = Rect::new(Point2::new(0., 0.), Vector2::new(100., 50.));
    let b = Rect::new(Point2::new(a.max_x(), 0.), Vector2::new(20., 50.));
    assert_eq!(b.max_x(), 120.);
    assert!(a.contains(Point2::new(99.9, 10.)));
    assert!(!a.contains(Point2::new(100., 10.)));
    assert!(b.contains(Point2::new(100., 10.)));
    assert!(!b.contains(Point2::new(110., 50.)));
}
