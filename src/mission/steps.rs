//! Data-driven mission step table
//!
//! One generic travel executor consumes a table of (step name, point of
//! interest, post-arrival action) entries; steps differ only in data,
//! not in code.

use crate::common::error::{NavError, NavResult};
use crate::common::types::Point2D;
use crate::mission::game_map::{GameMap, PoiLocation};
use crate::pathfinding::{AStarPlanner, CostField, WaypointQueue};

/// Side effect performed after arriving at the step's landmark
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    None,
    ScanAntenna,
    CaptureFigure,
    DrawFigure,
    LeaveArena,
}

/// One mission step: travel to a named landmark, then act
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSpec {
    pub name: &'static str,
    pub poi: &'static str,
    pub action: StepAction,
}

/// Ordered mission step sequence with a cursor
#[derive(Debug, Clone)]
pub struct MissionPlan {
    steps: Vec<StepSpec>,
    cursor: usize,
}

impl MissionPlan {
    /// The standard mission: align, sweep the antenna zone, fetch and
    /// capture the figure, draw it, leave.
    pub fn standard() -> Self {
        Self {
            steps: vec![
                StepSpec { name: "travel_to_antenna", poi: "antenna_start", action: StepAction::None },
                StepSpec { name: "sweep_antenna", poi: "antenna_stop", action: StepAction::ScanAntenna },
                StepSpec { name: "travel_to_figure", poi: "figure", action: StepAction::CaptureFigure },
                StepSpec { name: "travel_to_drawing_zone", poi: "drawing_zone", action: StepAction::DrawFigure },
                StepSpec { name: "leave_arena", poi: "exit", action: StepAction::LeaveArena },
            ],
            cursor: 0,
        }
    }

    pub fn from_steps(steps: Vec<StepSpec>) -> Self {
        Self { steps, cursor: 0 }
    }

    pub fn current(&self) -> Option<&StepSpec> {
        self.steps.get(self.cursor)
    }

    pub fn advance(&mut self) -> Option<&StepSpec> {
        if self.cursor < self.steps.len() {
            self.cursor += 1;
        }
        self.current()
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.steps.len()
    }

    pub fn steps(&self) -> &[StepSpec] {
        &self.steps
    }
}

/// Plan the travel leg of a step: resolve its landmark and find a path.
///
/// Candidate landmarks are tried in table order; the first accessible
/// one wins. Exhausting every candidate is a terminal error
/// (`NoReachableExit`) rather than the silent fall-through of older
/// revisions.
pub fn plan_travel(
    map: &GameMap,
    field: &CostField,
    from: Point2D,
    poi_name: &str,
) -> NavResult<WaypointQueue> {
    let planner = AStarPlanner::new(field);
    match map.poi(poi_name)? {
        PoiLocation::Single(goal) => planner.plan(from, *goal),
        PoiLocation::Candidates(goals) => {
            for goal in goals {
                match planner.plan(from, *goal) {
                    Ok(queue) => return Ok(queue),
                    Err(NavError::CheckpointNotAccessible(_)) => continue,
                    Err(other) => return Err(other),
                }
            }
            Err(NavError::NoReachableExit)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::{Obstacle, ObstacleTag};
    use crate::pathfinding::CostFieldConfig;

    fn field_for(map: &GameMap) -> CostField {
        CostField::build(
            map.area_min(),
            map.area_max(),
            &map.obstacles,
            &CostFieldConfig::default(),
        )
    }

    #[test]
    fn test_standard_plan_order() {
        let plan = MissionPlan::standard();
        let names: Vec<_> = plan.steps().iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                "travel_to_antenna",
                "sweep_antenna",
                "travel_to_figure",
                "travel_to_drawing_zone",
                "leave_arena",
            ]
        );
    }

    #[test]
    fn test_cursor_advances_to_completion() {
        let mut plan = MissionPlan::standard();
        assert_eq!(plan.current().unwrap().name, "travel_to_antenna");
        while !plan.is_complete() {
            plan.advance();
        }
        assert!(plan.current().is_none());
    }

    #[test]
    fn test_plan_travel_to_single_poi() {
        let map = GameMap::standard(Vec::new());
        let field = field_for(&map);
        let queue = plan_travel(&map, &field, Point2D::new(115.0, 57.0), "drawing_zone").unwrap();
        assert!(!queue.is_empty());
        let goal = map.poi_single("drawing_zone").unwrap();
        assert!(queue.as_path().points.last().unwrap().distance(&goal) < 1e-10);
    }

    #[test]
    fn test_plan_travel_falls_back_to_next_candidate() {
        let mut map = GameMap::standard(Vec::new());
        // first candidate buried inside an obstacle, second one open
        map.obstacles.push(Obstacle::omni(200.0, 85.0));
        map.insert_poi(
            "exit",
            PoiLocation::Candidates(vec![
                Point2D::new(200.0, 85.0),
                Point2D::new(160.0, 57.0),
            ]),
        );
        let field = field_for(&map);
        let queue = plan_travel(&map, &field, Point2D::new(60.0, 57.0), "exit").unwrap();
        let last = *queue.as_path().points.last().unwrap();
        assert!(last.distance(&Point2D::new(160.0, 57.0)) < 1e-10);
    }

    #[test]
    fn test_plan_travel_exhausted_candidates_is_terminal() {
        let mut map = GameMap::standard(Vec::new());
        // wall the whole east half off
        map.obstacles.push(Obstacle::new(Point2D::new(140.0, 85.0), ObstacleTag::North));
        map.obstacles.push(Obstacle::new(Point2D::new(140.0, 30.0), ObstacleTag::South));
        let field = field_for(&map);
        let result = plan_travel(&map, &field, Point2D::new(60.0, 57.0), "exit");
        assert!(matches!(result, Err(NavError::NoReachableExit)));
    }

    #[test]
    fn test_plan_travel_unknown_poi() {
        let map = GameMap::standard(Vec::new());
        let field = field_for(&map);
        let result = plan_travel(&map, &field, Point2D::new(60.0, 57.0), "charging_dock");
        assert!(matches!(result, Err(NavError::UnknownPointOfInterest(_))));
    }

    #[test]
    fn test_standard_plan_resolves_on_standard_map() {
        // every landmark the standard step table names must exist on
        // the standard map and be reachable from the previous one
        let map = GameMap::standard(Vec::new());
        let field = field_for(&map);
        let mut from = Point2D::new(115.0, 57.0);
        for step in MissionPlan::standard().steps() {
            let queue = plan_travel(&map, &field, from, step.poi)
                .unwrap_or_else(|e| panic!("step '{}' failed: {}", step.name, e));
            from = *queue.as_path().points.last().unwrap();
        }
    }
}
