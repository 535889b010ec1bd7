// Plan a path across the standard table and plot it.

use arena_robotics::mission::{plan_travel, GameMap};
use arena_robotics::pathfinding::{CostField, CostFieldConfig};
use arena_robotics::utils::{colors, PathStyle, Visualizer};
use arena_robotics::{Obstacle, ObstacleTag, Point2D};

fn main() {
    println!("Arena path planning start!!");

    let obstacles = vec![
        Obstacle::omni(115.0, 57.0),
        Obstacle::new(Point2D::new(150.0, 85.0), ObstacleTag::North),
    ];
    let map = GameMap::standard(obstacles);
    let config = CostFieldConfig::default();
    let field = CostField::build(map.area_min(), map.area_max(), &map.obstacles, &config);
    println!(
        "Cost field: {}x{} cells of {} cm",
        field.width(),
        field.height(),
        field.cell_size()
    );

    let start = Point2D::new(190.0, 30.0);
    match plan_travel(&map, &field, start, "drawing_zone") {
        Ok(queue) => {
            let path = queue.as_path();
            println!(
                "Path found: {} waypoints, {:.1} cm",
                path.len(),
                path.total_length()
            );

            std::fs::create_dir_all("img").unwrap_or_default();
            let mut vis = Visualizer::new("Arena Path Planning");
            vis.set_arena(map.area_min(), map.area_max())
                .plot_blocked_cells(&field.blocked_positions())
                .plot_obstacles(&map.obstacles)
                .plot_start(start)
                .plot_goal(map.poi_single("drawing_zone").unwrap())
                .plot_path(&path, &PathStyle::new(colors::PATH, "Planned path"))
                .plot_waypoints(&path);
            let output = "img/plan_demo.png";
            vis.save_png(output, 800, 600).unwrap();
            println!("Plot saved to: {}", output);
        }
        Err(e) => println!("Planning failed: {}", e),
    }

    println!("Arena path planning finish!!");
}
