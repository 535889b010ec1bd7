//! Common types used throughout arena_robotics
//!
//! Positions are arena-relative, in centimeters. Headings are in
//! degrees, normalized to [0, 360).

use nalgebra::Vector2;

/// 2D point representation (arena coordinates, centimeters)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn distance(&self, other: &Point2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Vector pointing from this point to `other`
    pub fn vector_to(&self, other: &Point2D) -> Vector2<f64> {
        Vector2::new(other.x - self.x, other.y - self.y)
    }

    pub fn translated(&self, v: &Vector2<f64>) -> Point2D {
        Point2D::new(self.x + v[0], self.y + v[1])
    }

    pub fn to_vector(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
}

impl From<(f64, f64)> for Point2D {
    fn from(tuple: (f64, f64)) -> Self {
        Self { x: tuple.0, y: tuple.1 }
    }
}

impl From<Vector2<f64>> for Point2D {
    fn from(v: Vector2<f64>) -> Self {
        Self { x: v[0], y: v[1] }
    }
}

/// Normalize a heading to [0, 360)
pub fn normalize_deg(deg: f64) -> f64 {
    let mut d = deg % 360.0;
    if d < 0.0 {
        d += 360.0;
    }
    d
}

/// Shortest signed rotation from `from` to `to`, in (-180, 180].
///
/// The drivetrain accepts signed rotation commands; commanding the long
/// way around a near-full circle wastes several seconds per correction,
/// so every rotation delta goes through here.
pub fn shortest_angular_delta(from: f64, to: f64) -> f64 {
    let mut delta = (to - from) % 360.0;
    if delta > 180.0 {
        delta -= 360.0;
    } else if delta <= -180.0 {
        delta += 360.0;
    }
    delta
}

/// Angle of a vector in degrees, in [0, 360)
pub fn vector_angle_deg(v: &Vector2<f64>) -> f64 {
    normalize_deg(v[1].atan2(v[0]).to_degrees())
}

/// Mount orientation of an obstacle.
///
/// An obstacle hanging from the north or south wall blocks the lateral
/// strip between its body and that wall; an omnidirectional obstacle
/// only blocks its own inflated footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleTag {
    North,
    South,
    Omni,
}

/// Obstacle on the table: position of its center plus mount tag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub position: Point2D,
    pub tag: ObstacleTag,
}

impl Obstacle {
    pub fn new(position: Point2D, tag: ObstacleTag) -> Self {
        Self { position, tag }
    }

    pub fn omni(x: f64, y: f64) -> Self {
        Self { position: Point2D::new(x, y), tag: ObstacleTag::Omni }
    }
}

/// Low-level command sent to the hardware link
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveCommand {
    /// Translate by (dx, dy) centimeters in arena coordinates
    Translate(Vector2<f64>),
    /// Rotate by a signed delta in degrees
    Rotate(f64),
}

/// Path represented as an ordered sequence of 2D points.
///
/// Also the payload of a path-changed notification broadcast to the
/// operator UI whenever the waypoint queue is rebuilt.
#[derive(Debug, Clone)]
pub struct Path2D {
    pub points: Vec<Point2D>,
}

impl Path2D {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    pub fn from_points(points: Vec<Point2D>) -> Self {
        Self { points }
    }

    pub fn push(&mut self, point: Point2D) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn x_coords(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.x).collect()
    }

    pub fn y_coords(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y).collect()
    }

    pub fn total_length(&self) -> f64 {
        if self.points.len() < 2 {
            return 0.0;
        }
        self.points.windows(2)
            .map(|w| w[0].distance(&w[1]))
            .sum()
    }
}

impl Default for Path2D {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point2d_distance() {
        let p1 = Point2D::new(0.0, 0.0);
        let p2 = Point2D::new(3.0, 4.0);
        assert!((p1.distance(&p2) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_vector_to() {
        let p1 = Point2D::new(20.0, 20.0);
        let p2 = Point2D::new(30.0, 30.0);
        let v = p1.vector_to(&p2);
        assert!((v[0] - 10.0).abs() < 1e-10);
        assert!((v[1] - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_normalize_deg() {
        assert!((normalize_deg(370.0) - 10.0).abs() < 1e-10);
        assert!((normalize_deg(-90.0) - 270.0).abs() < 1e-10);
        assert!((normalize_deg(360.0) - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_shortest_angular_delta_takes_short_arc() {
        assert!((shortest_angular_delta(350.0, 10.0) - 20.0).abs() < 1e-10);
        assert!((shortest_angular_delta(10.0, 350.0) + 20.0).abs() < 1e-10);
        assert!((shortest_angular_delta(0.0, 180.0) - 180.0).abs() < 1e-10);
    }

    #[test]
    fn test_vector_angle_deg() {
        let v = Vector2::new(0.0, 1.0);
        assert!((vector_angle_deg(&v) - 90.0).abs() < 1e-10);
        let v = Vector2::new(-1.0, 0.0);
        assert!((vector_angle_deg(&v) - 180.0).abs() < 1e-10);
    }

    #[test]
    fn test_path2d_total_length() {
        let path = Path2D::from_points(vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(1.0, 0.0),
            Point2D::new(1.0, 1.0),
        ]);
        assert!((path.total_length() - 2.0).abs() < 1e-10);
    }
}
