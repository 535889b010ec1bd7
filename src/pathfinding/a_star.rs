//! Weighted A* search over the cost field
//!
//! The potential acts as a penalty layered on top of raw distance: the
//! cost of stepping into a cell is its weight, plus the weight delta
//! from the cell being left, plus the Euclidean cell distance. Ties are
//! broken by total estimated cost and then by insertion order, which
//! keeps plans deterministic for a given snapshot.

use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::common::error::{NavError, NavResult};
use crate::common::types::Point2D;
use crate::pathfinding::cost_field::CostField;
use crate::pathfinding::waypoint::WaypointQueue;

#[derive(Debug, Clone)]
struct Node {
    ix: i32,
    iy: i32,
    cost: f64,
    parent: Option<usize>,
}

/// 4-neighbor motion model (the drivetrain only translates along axes
/// between corrections)
const MOTION: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

pub struct AStarPlanner<'a> {
    field: &'a CostField,
}

impl<'a> AStarPlanner<'a> {
    pub fn new(field: &'a CostField) -> Self {
        AStarPlanner { field }
    }

    /// Plan an ordered waypoint queue from `start` to `goal`.
    ///
    /// The start cell is excluded from the result; the final waypoint is
    /// the exact goal position rather than its cell center.
    pub fn plan(&self, start: Point2D, goal: Point2D) -> NavResult<WaypointQueue> {
        let goal_index = self.field.index_of(goal);
        if self.field.is_blocked(goal_index.0, goal_index.1) {
            return Err(NavError::CheckpointNotAccessible(goal));
        }

        // A pose hugging a wall lands inside the inflated band; search
        // from the nearest free cell instead of failing, so every
        // expanded cell keeps a finite weight.
        let (six, siy) = self.field.index_of(start);
        let start_index = match self.field.nearest_free(six, siy) {
            Some(index) => index,
            None => return Err(NavError::CheckpointNotAccessible(goal)),
        };

        let mut storage = vec![Node {
            ix: start_index.0,
            iy: start_index.1,
            cost: 0.0,
            parent: None,
        }];
        let mut open = BinaryHeap::new();
        let mut best: HashMap<(i32, i32), f64> = HashMap::new();
        let mut sequence: usize = 0;

        best.insert(start_index, 0.0);
        open.push(Reverse((
            OrderedFloat(self.heuristic(start_index, goal_index)),
            sequence,
            0usize,
        )));

        while let Some(Reverse((_, _, current_index))) = open.pop() {
            let current = storage[current_index].clone();

            if (current.ix, current.iy) == goal_index {
                return Ok(self.reconstruct(current_index, &storage, goal));
            }

            // A cheaper route to this cell has already been expanded
            if let Some(&cost) = best.get(&(current.ix, current.iy)) {
                if current.cost > cost {
                    continue;
                }
            }

            for &(dx, dy) in &MOTION {
                let (nix, niy) = (current.ix + dx, current.iy + dy);
                if self.field.is_blocked(nix, niy) {
                    continue;
                }

                let src_weight = self.field.cost(current.ix, current.iy);
                let dst_weight = self.field.cost(nix, niy);
                let edge = dst_weight + (dst_weight - src_weight) + self.field.cell_size();
                let new_cost = current.cost + edge;

                if best.get(&(nix, niy)).map_or(true, |&c| new_cost < c) {
                    best.insert((nix, niy), new_cost);
                    storage.push(Node {
                        ix: nix,
                        iy: niy,
                        cost: new_cost,
                        parent: Some(current_index),
                    });
                    sequence += 1;
                    open.push(Reverse((
                        OrderedFloat(new_cost + self.heuristic((nix, niy), goal_index)),
                        sequence,
                        storage.len() - 1,
                    )));
                }
            }
        }

        Err(NavError::CheckpointNotAccessible(goal))
    }

    /// Single-waypoint queue straight to `goal`, bypassing the grid,
    /// for moves known to be unobstructed (e.g. returning from the
    /// antenna sweep).
    pub fn plan_direct(goal: Point2D) -> WaypointQueue {
        WaypointQueue::from_points(vec![goal])
    }

    fn heuristic(&self, from: (i32, i32), to: (i32, i32)) -> f64 {
        self.field
            .position_of(from.0, from.1)
            .distance(&self.field.position_of(to.0, to.1))
    }

    fn reconstruct(&self, goal_index: usize, storage: &[Node], goal: Point2D) -> WaypointQueue {
        let mut points = Vec::new();
        let mut cursor = Some(goal_index);
        while let Some(index) = cursor {
            let node = &storage[index];
            points.push(self.field.position_of(node.ix, node.iy));
            cursor = node.parent;
        }
        points.reverse();
        // start cell excluded, exact goal included
        points.remove(0);
        if let Some(last) = points.last_mut() {
            *last = goal;
        } else {
            points.push(goal);
        }
        WaypointQueue::from_points(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::{Obstacle, ObstacleTag};
    use crate::pathfinding::cost_field::CostFieldConfig;

    fn open_table() -> CostField {
        CostField::build(
            Point2D::new(0.0, 0.0),
            Point2D::new(231.0, 114.0),
            &[],
            &CostFieldConfig::default(),
        )
    }

    #[test]
    fn test_plan_reaches_goal() {
        let field = open_table();
        let planner = AStarPlanner::new(&field);
        let start = Point2D::new(40.0, 40.0);
        let goal = Point2D::new(190.0, 80.0);
        let queue = planner.plan(start, goal).unwrap();
        assert!(!queue.is_empty());
        let path = queue.as_path();
        let last = *path.points.last().unwrap();
        assert!(last.distance(&goal) < 1e-10);
        // start itself is excluded
        assert!(path.points[0].distance(&start) > 1e-10);
    }

    #[test]
    fn test_plan_avoids_obstacle() {
        let config = CostFieldConfig::default();
        let obstacle = Obstacle::omni(115.0, 57.0);
        let field = CostField::build(
            Point2D::new(0.0, 0.0),
            Point2D::new(231.0, 114.0),
            &[obstacle],
            &config,
        );
        let planner = AStarPlanner::new(&field);
        let queue = planner
            .plan(Point2D::new(40.0, 57.0), Point2D::new(190.0, 57.0))
            .unwrap();
        let clearance = config.obstacle_radius + config.safety_margin - config.cell_size;
        for p in &queue.as_path().points {
            assert!(p.distance(&obstacle.position) > clearance);
        }
    }

    #[test]
    fn test_goal_inside_obstacle_not_accessible() {
        let obstacle = Obstacle::omni(115.0, 57.0);
        let field = CostField::build(
            Point2D::new(0.0, 0.0),
            Point2D::new(231.0, 114.0),
            &[obstacle],
            &CostFieldConfig::default(),
        );
        let planner = AStarPlanner::new(&field);
        let result = planner.plan(Point2D::new(40.0, 57.0), obstacle.position);
        assert!(matches!(result, Err(NavError::CheckpointNotAccessible(_))));
    }

    #[test]
    fn test_walled_off_goal_not_accessible() {
        // a north-mounted and a south-mounted obstacle at the same x
        // close the full column between the walls
        let obstacles = [
            Obstacle::new(Point2D::new(115.0, 85.0), ObstacleTag::North),
            Obstacle::new(Point2D::new(115.0, 30.0), ObstacleTag::South),
        ];
        let field = CostField::build(
            Point2D::new(0.0, 0.0),
            Point2D::new(231.0, 114.0),
            &obstacles,
            &CostFieldConfig::default(),
        );
        let planner = AStarPlanner::new(&field);
        let result = planner.plan(Point2D::new(40.0, 57.0), Point2D::new(190.0, 57.0));
        assert!(matches!(result, Err(NavError::CheckpointNotAccessible(_))));
    }

    #[test]
    fn test_plan_is_deterministic() {
        let field = open_table();
        let planner = AStarPlanner::new(&field);
        let start = Point2D::new(40.0, 40.0);
        let goal = Point2D::new(190.0, 80.0);
        let a = planner.plan(start, goal).unwrap().as_path();
        let b = planner.plan(start, goal).unwrap().as_path();
        assert_eq!(a.len(), b.len());
        for (pa, pb) in a.points.iter().zip(b.points.iter()) {
            assert!(pa.distance(pb) < 1e-12);
        }
    }

    #[test]
    fn test_wall_adjacent_start_still_plans() {
        let field = open_table();
        let planner = AStarPlanner::new(&field);
        // robot center 12 cm from the west wall, well inside the band
        let start = Point2D::new(12.0, 57.0);
        let goal = Point2D::new(115.0, 57.0);
        let queue = planner.plan(start, goal).unwrap();
        let path = queue.as_path();
        assert!(path.points.last().unwrap().distance(&goal) < 1e-10);
        // the plan never routes through a blocked cell
        for p in &path.points {
            let (ix, iy) = field.index_of(*p);
            assert!(!field.is_blocked(ix, iy));
        }
    }

    #[test]
    fn test_plan_direct_is_single_waypoint() {
        let queue = AStarPlanner::plan_direct(Point2D::new(50.0, 20.0));
        assert_eq!(queue.len(), 1);
        assert_eq!(*queue.peek().unwrap(), Point2D::new(50.0, 20.0));
    }
}
