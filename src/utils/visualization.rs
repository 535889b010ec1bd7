//! Plotting utilities for arena_robotics
//!
//! gnuplot-backed rendering of the arena: blocked cells, planned
//! waypoints, robot pose. Used by the demo binaries and for inspecting
//! path-changed notifications offline.

use gnuplot::{AutoOption, AxesCommon, Caption, Color, Figure, LineWidth, PointSize, PointSymbol};

use crate::common::types::{Obstacle, Path2D, Point2D};

/// Color palette for consistent styling
pub mod colors {
    pub const OBSTACLE: &str = "#000000";
    pub const BLOCKED: &str = "#808080";
    pub const START: &str = "#00FF00";
    pub const GOAL: &str = "#0000FF";
    pub const PATH: &str = "#FF0000";
    pub const WAYPOINT: &str = "#FFA500";
    pub const ROBOT: &str = "#00FFFF";
    pub const ACTUAL: &str = "#35C788";
    pub const COMMANDED: &str = "#DD3355";
}

/// Style for path rendering
#[derive(Debug, Clone)]
pub struct PathStyle {
    pub color: String,
    pub line_width: f64,
    pub caption: String,
}

impl PathStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            line_width: 2.0,
            caption: caption.to_string(),
        }
    }

    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }
}

impl Default for PathStyle {
    fn default() -> Self {
        Self::new(colors::PATH, "Path")
    }
}

/// Arena plotter
pub struct Visualizer {
    figure: Figure,
    title: String,
    x_range: Option<(f64, f64)>,
    y_range: Option<(f64, f64)>,
}

impl Visualizer {
    pub fn new(title: &str) -> Self {
        Self {
            figure: Figure::new(),
            title: title.to_string(),
            x_range: None,
            y_range: None,
        }
    }

    /// Frame the plot on the table area
    pub fn set_arena(&mut self, min: Point2D, max: Point2D) -> &mut Self {
        self.x_range = Some((min.x - 10.0, max.x + 10.0));
        self.y_range = Some((min.y - 10.0, max.y + 10.0));
        self
    }

    pub fn plot_obstacles(&mut self, obstacles: &[Obstacle]) -> &mut Self {
        let x: Vec<f64> = obstacles.iter().map(|o| o.position.x).collect();
        let y: Vec<f64> = obstacles.iter().map(|o| o.position.y).collect();
        self.figure.axes2d().points(
            &x,
            &y,
            &[
                Caption("Obstacles"),
                Color(colors::OBSTACLE),
                PointSymbol('S'),
                PointSize(2.0),
            ],
        );
        self
    }

    /// Impassable cell centers of the cost field
    pub fn plot_blocked_cells(&mut self, cells: &[Point2D]) -> &mut Self {
        let x: Vec<f64> = cells.iter().map(|p| p.x).collect();
        let y: Vec<f64> = cells.iter().map(|p| p.y).collect();
        self.figure.axes2d().points(
            &x,
            &y,
            &[Caption("Blocked"), Color(colors::BLOCKED), PointSymbol('S'), PointSize(0.4)],
        );
        self
    }

    pub fn plot_path(&mut self, path: &Path2D, style: &PathStyle) -> &mut Self {
        self.figure.axes2d().lines(
            &path.x_coords(),
            &path.y_coords(),
            &[
                Caption(&style.caption),
                Color(&style.color),
                LineWidth(style.line_width),
            ],
        );
        self
    }

    /// Planned waypoints as individual markers
    pub fn plot_waypoints(&mut self, path: &Path2D) -> &mut Self {
        self.figure.axes2d().points(
            &path.x_coords(),
            &path.y_coords(),
            &[
                Caption("Waypoints"),
                Color(colors::WAYPOINT),
                PointSymbol('O'),
                PointSize(1.0),
            ],
        );
        self
    }

    /// Robot position with a heading tick (heading in degrees)
    pub fn plot_robot(&mut self, position: Point2D, heading_deg: f64) -> &mut Self {
        self.figure.axes2d().points(
            &[position.x],
            &[position.y],
            &[Caption("Robot"), Color(colors::ROBOT), PointSymbol('O'), PointSize(1.5)],
        );
        let rad = heading_deg.to_radians();
        let tip = Point2D::new(position.x + 8.0 * rad.cos(), position.y + 8.0 * rad.sin());
        self.figure.axes2d().lines(
            &[position.x, tip.x],
            &[position.y, tip.y],
            &[Color(colors::ROBOT), LineWidth(2.0)],
        );
        self
    }

    pub fn plot_start(&mut self, point: Point2D) -> &mut Self {
        self.figure.axes2d().points(
            &[point.x],
            &[point.y],
            &[Caption("Start"), Color(colors::START), PointSymbol('O'), PointSize(1.5)],
        );
        self
    }

    pub fn plot_goal(&mut self, point: Point2D) -> &mut Self {
        self.figure.axes2d().points(
            &[point.x],
            &[point.y],
            &[Caption("Goal"), Color(colors::GOAL), PointSymbol('O'), PointSize(1.5)],
        );
        self
    }

    pub fn show(&mut self) -> Result<(), String> {
        self.apply_settings();
        self.figure.show().map_err(|e| e.to_string()).map(|_| ())
    }

    pub fn save_png(&mut self, path: &str, width: u32, height: u32) -> Result<(), String> {
        self.apply_settings();
        self.figure.save_to_png(path, width, height).map_err(|e| e.to_string())
    }

    fn apply_settings(&mut self) {
        let axes = self.figure.axes2d();
        if !self.title.is_empty() {
            axes.set_title(&self.title, &[]);
        }
        axes.set_x_label("X [cm]", &[]);
        axes.set_y_label("Y [cm]", &[]);
        axes.set_aspect_ratio(AutoOption::Fix(1.0));
        if let Some((min, max)) = self.x_range {
            axes.set_x_range(AutoOption::Fix(min), AutoOption::Fix(max));
        }
        if let Some((min, max)) = self.y_range {
            axes.set_y_range(AutoOption::Fix(min), AutoOption::Fix(max));
        }
    }
}
