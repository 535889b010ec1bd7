//! Ordered queue of waypoints leading to a checkpoint
//!
//! Produced whole by the planner and consumed one node at a time by the
//! servo manager; a new plan replaces the old queue, never merges into
//! it. Emptying the queue signals "checkpoint reached".

use std::collections::VecDeque;

use crate::common::types::{Path2D, Point2D};

#[derive(Debug, Clone, Default)]
pub struct WaypointQueue {
    nodes: VecDeque<Point2D>,
}

impl WaypointQueue {
    pub fn new() -> Self {
        Self { nodes: VecDeque::new() }
    }

    pub fn from_points(points: Vec<Point2D>) -> Self {
        Self { nodes: points.into() }
    }

    /// Next intermediate target, if any
    pub fn pop_next(&mut self) -> Option<Point2D> {
        self.nodes.pop_front()
    }

    pub fn peek(&self) -> Option<&Point2D> {
        self.nodes.front()
    }

    pub fn push_back(&mut self, point: Point2D) {
        self.nodes.push_back(point);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Snapshot for the path-changed notification
    pub fn as_path(&self) -> Path2D {
        Path2D::from_points(self.nodes.iter().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut queue = WaypointQueue::from_points(vec![
            Point2D::new(1.0, 0.0),
            Point2D::new(2.0, 0.0),
        ]);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop_next(), Some(Point2D::new(1.0, 0.0)));
        assert_eq!(queue.pop_next(), Some(Point2D::new(2.0, 0.0)));
        assert!(queue.pop_next().is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_snapshot_preserves_order() {
        let queue = WaypointQueue::from_points(vec![
            Point2D::new(1.0, 0.0),
            Point2D::new(2.0, 0.0),
        ]);
        let path = queue.as_path();
        assert_eq!(path.len(), 2);
        assert_eq!(path.points[1], Point2D::new(2.0, 0.0));
    }
}
