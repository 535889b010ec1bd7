//! Potential cost field over the arena
//!
//! The field is rebuilt once per game-map snapshot and read-only
//! afterwards. Walls and inflated obstacles are impassable (infinite
//! cost); finite costs are ring-propagated outward from every blocked
//! cell by 4-neighbor relaxation, dropping by one cell width per ring,
//! so cost rises smoothly with proximity to obstacles.

use itertools::Itertools;
use nalgebra::DMatrix;
use std::collections::VecDeque;

use crate::common::types::{Obstacle, ObstacleTag, Point2D};

/// Tunables of the cost-field builder, in centimeters
#[derive(Debug, Clone, Copy)]
pub struct CostFieldConfig {
    /// Width of one grid cell
    pub cell_size: f64,
    /// Half the robot footprint, inflates the walls
    pub robot_half_width: f64,
    /// Physical radius of a table obstacle
    pub obstacle_radius: f64,
    /// Extra clearance kept around obstacles
    pub safety_margin: f64,
    /// Cost of the first free ring next to a blocked cell
    pub max_cost: f64,
}

impl Default for CostFieldConfig {
    fn default() -> Self {
        Self {
            cell_size: 5.0,
            robot_half_width: 11.0,
            obstacle_radius: 20.0,
            safety_margin: 5.0,
            max_cost: 30.0,
        }
    }
}

/// Discretized scalar cost field plus the position <-> index mapping
#[derive(Debug, Clone)]
pub struct CostField {
    min: Point2D,
    cell_size: f64,
    nx: i32,
    ny: i32,
    costs: DMatrix<f64>,
}

impl CostField {
    /// Build a fresh field for one arena snapshot.
    ///
    /// Obstacle centers outside the area are clamped to the valid index
    /// range rather than rejected.
    pub fn build(
        area_min: Point2D,
        area_max: Point2D,
        obstacles: &[Obstacle],
        config: &CostFieldConfig,
    ) -> Self {
        let nx = (((area_max.x - area_min.x) / config.cell_size).round() as i32).max(1);
        let ny = (((area_max.y - area_min.y) / config.cell_size).round() as i32).max(1);
        let mut field = CostField {
            min: area_min,
            cell_size: config.cell_size,
            nx,
            ny,
            costs: DMatrix::from_element(nx as usize, ny as usize, 0.0),
        };

        field.block_wall_band(config);
        for obstacle in obstacles {
            field.block_obstacle(obstacle, config);
        }
        field.propagate(config);
        field
    }

    fn block_wall_band(&mut self, config: &CostFieldConfig) {
        let band = (config.robot_half_width / config.cell_size).ceil() as i32 + 1;
        for (ix, iy) in (0..self.nx).cartesian_product(0..self.ny) {
            if ix < band || ix >= self.nx - band || iy < band || iy >= self.ny - band {
                self.costs[(ix as usize, iy as usize)] = f64::INFINITY;
            }
        }
    }

    fn block_obstacle(&mut self, obstacle: &Obstacle, config: &CostFieldConfig) {
        let radius =
            ((config.obstacle_radius + config.safety_margin) / config.cell_size).ceil() as i32;
        let (cx, cy) = self.index_of(obstacle.position);

        for (dx, dy) in (-radius..=radius).cartesian_product(-radius..=radius) {
            let (ix, iy) = (cx + dx, cy + dy);
            if self.in_bounds(ix, iy) {
                self.costs[(ix as usize, iy as usize)] = f64::INFINITY;
            }
        }

        // A wall-mounted obstacle also closes off the strip between its
        // body and the wall it hangs from.
        let strip: Box<dyn Iterator<Item = i32>> = match obstacle.tag {
            ObstacleTag::North => Box::new(cy + radius..self.ny),
            ObstacleTag::South => Box::new(0..cy - radius),
            ObstacleTag::Omni => return,
        };
        for iy in strip {
            for ix in cx - radius..=cx + radius {
                if self.in_bounds(ix, iy) {
                    self.costs[(ix as usize, iy as usize)] = f64::INFINITY;
                }
            }
        }
    }

    /// 4-neighbor ring relaxation outward from every blocked cell,
    /// decreasing weight order: first ring gets `max_cost`, each
    /// further ring one cell width less, floored at zero.
    fn propagate(&mut self, config: &CostFieldConfig) {
        let mut frontier: VecDeque<(i32, i32, f64)> = VecDeque::new();
        let mut visited = vec![false; (self.nx * self.ny) as usize];

        for (ix, iy) in (0..self.nx).cartesian_product(0..self.ny) {
            if self.costs[(ix as usize, iy as usize)].is_infinite() {
                visited[(ix * self.ny + iy) as usize] = true;
                frontier.push_back((ix, iy, config.max_cost));
            }
        }

        while let Some((ix, iy, cost)) = frontier.pop_front() {
            if cost <= 0.0 {
                continue;
            }
            for (dx, dy) in &[(1, 0), (-1, 0), (0, 1), (0, -1)] {
                let (nx, ny) = (ix + dx, iy + dy);
                if !self.in_bounds(nx, ny) {
                    continue;
                }
                let flat = (nx * self.ny + ny) as usize;
                if visited[flat] {
                    continue;
                }
                visited[flat] = true;
                self.costs[(nx as usize, ny as usize)] = cost;
                frontier.push_back((nx, ny, cost - self.cell_size));
            }
        }
    }

    /// Grid index of a position, clamped to the valid range
    pub fn index_of(&self, position: Point2D) -> (i32, i32) {
        let ix = ((position.x - self.min.x) / self.cell_size).floor() as i32;
        let iy = ((position.y - self.min.y) / self.cell_size).floor() as i32;
        (ix.clamp(0, self.nx - 1), iy.clamp(0, self.ny - 1))
    }

    /// Center of a grid cell in arena coordinates
    pub fn position_of(&self, ix: i32, iy: i32) -> Point2D {
        Point2D::new(
            self.min.x + (ix as f64 + 0.5) * self.cell_size,
            self.min.y + (iy as f64 + 0.5) * self.cell_size,
        )
    }

    pub fn in_bounds(&self, ix: i32, iy: i32) -> bool {
        ix >= 0 && ix < self.nx && iy >= 0 && iy < self.ny
    }

    pub fn cost(&self, ix: i32, iy: i32) -> f64 {
        self.costs[(ix as usize, iy as usize)]
    }

    pub fn is_blocked(&self, ix: i32, iy: i32) -> bool {
        !self.in_bounds(ix, iy) || self.costs[(ix as usize, iy as usize)].is_infinite()
    }

    /// Nearest unblocked cell to the given index (the index itself when
    /// already free), by squared index distance with a lexicographic
    /// tie-break. `None` only when every cell is blocked.
    pub fn nearest_free(&self, ix: i32, iy: i32) -> Option<(i32, i32)> {
        if !self.is_blocked(ix, iy) {
            return Some((ix, iy));
        }
        (0..self.nx)
            .cartesian_product(0..self.ny)
            .filter(|&(cx, cy)| !self.is_blocked(cx, cy))
            .min_by_key(|&(cx, cy)| ((cx - ix).pow(2) + (cy - iy).pow(2), cx, cy))
    }

    pub fn width(&self) -> i32 {
        self.nx
    }

    pub fn height(&self) -> i32 {
        self.ny
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Blocked cell centers, for plotting
    pub fn blocked_positions(&self) -> Vec<Point2D> {
        (0..self.nx)
            .cartesian_product(0..self.ny)
            .filter(|&(ix, iy)| self.is_blocked(ix, iy))
            .map(|(ix, iy)| self.position_of(ix, iy))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> (Point2D, Point2D) {
        (Point2D::new(0.0, 0.0), Point2D::new(231.0, 114.0))
    }

    #[test]
    fn test_wall_band_is_impassable() {
        let (min, max) = table();
        let config = CostFieldConfig::default();
        let field = CostField::build(min, max, &[], &config);
        let band = (config.robot_half_width / config.cell_size).ceil() as i32 + 1;
        for ix in 0..field.width() {
            for iy in 0..field.height() {
                let near_wall = ix < band
                    || ix >= field.width() - band
                    || iy < band
                    || iy >= field.height() - band;
                if near_wall {
                    assert!(field.cost(ix, iy).is_infinite());
                }
            }
        }
    }

    #[test]
    fn test_no_obstacles_degrades_gracefully() {
        let (min, max) = table();
        let field = CostField::build(min, max, &[], &CostFieldConfig::default());
        // the table center is far enough from every wall to sit at the
        // propagation floor
        let (cx, cy) = field.index_of(Point2D::new(115.0, 57.0));
        assert!((field.cost(cx, cy) - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_obstacle_footprint_blocked() {
        let (min, max) = table();
        let config = CostFieldConfig::default();
        let obstacle = Obstacle::omni(115.0, 57.0);
        let field = CostField::build(min, max, &[obstacle], &config);
        let (cx, cy) = field.index_of(obstacle.position);
        assert!(field.is_blocked(cx, cy));
        // a cell just outside the inflated footprint is costly but open
        let radius =
            ((config.obstacle_radius + config.safety_margin) / config.cell_size).ceil() as i32;
        assert!(!field.is_blocked(cx + radius + 1, cy));
        assert!(field.cost(cx + radius + 1, cy) > 0.0);
    }

    #[test]
    fn test_cost_monotonically_non_increasing_away_from_obstacle() {
        let (min, max) = table();
        let obstacle = Obstacle::omni(115.0, 57.0);
        let field = CostField::build(min, max, &[obstacle], &CostFieldConfig::default());
        let (cx, cy) = field.index_of(obstacle.position);
        let mut previous = f64::INFINITY;
        for ix in cx..field.width() - 14 {
            let cost = field.cost(ix, cy);
            assert!(cost <= previous);
            previous = cost;
        }
    }

    #[test]
    fn test_north_tag_blocks_strip_to_wall() {
        let (min, max) = table();
        let config = CostFieldConfig::default();
        let obstacle = Obstacle::new(Point2D::new(115.0, 80.0), ObstacleTag::North);
        let field = CostField::build(min, max, &[obstacle], &config);
        let (cx, cy) = field.index_of(obstacle.position);
        // every cell from the obstacle to the north wall is closed
        for iy in cy..field.height() {
            assert!(field.is_blocked(cx, iy));
        }
        // the south side stays open past the inflated footprint
        let radius =
            ((config.obstacle_radius + config.safety_margin) / config.cell_size).ceil() as i32;
        assert!(!field.is_blocked(cx, cy - radius - 1));
    }

    #[test]
    fn test_obstacle_outside_bounds_is_clamped() {
        let (min, max) = table();
        let obstacle = Obstacle::omni(500.0, 500.0);
        // must not panic; the footprint lands in the far corner
        let field = CostField::build(min, max, &[obstacle], &CostFieldConfig::default());
        assert!(field.is_blocked(field.width() - 1, field.height() - 1));
    }

    #[test]
    fn test_nearest_free_snaps_out_of_wall_band() {
        let (min, max) = table();
        let field = CostField::build(min, max, &[], &CostFieldConfig::default());
        // a robot hugging the west wall sits inside the inflated band
        let (ix, iy) = field.index_of(Point2D::new(12.0, 57.0));
        assert!(field.is_blocked(ix, iy));
        let (fx, fy) = field.nearest_free(ix, iy).unwrap();
        assert!(!field.is_blocked(fx, fy));
        // the snap moves straight east to the first open column
        assert_eq!((fx, fy), (4, iy));
        // a free index is returned unchanged
        let (cx, cy) = field.index_of(Point2D::new(115.0, 57.0));
        assert_eq!(field.nearest_free(cx, cy), Some((cx, cy)));
    }

    #[test]
    fn test_index_round_trip_within_half_cell() {
        let (min, max) = table();
        let field = CostField::build(min, max, &[], &CostFieldConfig::default());
        for &(x, y) in &[(12.3, 45.6), (115.0, 57.0), (200.1, 99.9)] {
            let p = Point2D::new(x, y);
            let (ix, iy) = field.index_of(p);
            let back = field.position_of(ix, iy);
            assert!((back.x - p.x).abs() <= field.cell_size() / 2.0 + 1e-10);
            assert!((back.y - p.y).abs() <= field.cell_size() / 2.0 + 1e-10);
        }
    }
}
