// Closed-loop servo simulation: a drifting drivetrain plus noisy
// telemetry, driven by the correction state machine until the
// checkpoint is reached.

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc::{channel, Sender};
use std::time::{Duration, Instant};

use arena_robotics::kinematics::RobotState;
use arena_robotics::mission::{plan_travel, GameMap};
use arena_robotics::pathfinding::{CostField, CostFieldConfig};
use arena_robotics::servo::{MotionEvent, ServoConfig, ServoManager, TickOutcome};
use arena_robotics::telemetry::TelemetrySample;
use arena_robotics::utils::{colors, PathStyle, Visualizer};
use arena_robotics::{HardwareLink, Obstacle, Path2D, Point2D};

const SIM_DT: f64 = 0.06; // simulated step [s]
const SPEED_CM_S: f64 = 12.0;
const TURN_RATE_DEG_S: f64 = 45.0;
const DRIFT_DEG: f64 = 6.0; // systematic drivetrain pull
const NOISE_SIGMA_CM: f64 = 0.2;
const MAX_STEPS: usize = 20000;

enum Pending {
    Translate(Vector2<f64>),
    Rotate(f64),
}

/// Physical drivetrain stand-in: executes one command at a time with a
/// systematic angular drift, and reports completion over the event
/// channel exactly as the real hardware layer does.
struct SimDrive {
    position: Point2D,
    heading_deg: f64,
    pending: Option<Pending>,
    events: Sender<MotionEvent>,
}

impl SimDrive {
    fn new(position: Point2D, heading_deg: f64, events: Sender<MotionEvent>) -> Self {
        Self { position, heading_deg, pending: None, events }
    }

    fn step(&mut self, dt: f64) {
        match self.pending.take() {
            Some(Pending::Translate(remaining)) => {
                let step_len = SPEED_CM_S * dt;
                if remaining.norm() <= step_len {
                    self.position = self.position.translated(&remaining);
                    let _ = self.events.send(MotionEvent::TranslationDone);
                } else {
                    let direction = remaining / remaining.norm();
                    self.position = self.position.translated(&(direction * step_len));
                    self.pending = Some(Pending::Translate(remaining - direction * step_len));
                }
            }
            Some(Pending::Rotate(remaining)) => {
                let step = TURN_RATE_DEG_S * dt;
                if remaining.abs() <= step {
                    self.heading_deg += remaining;
                    let _ = self.events.send(MotionEvent::RotationDone);
                } else {
                    let signed = step * remaining.signum();
                    self.heading_deg += signed;
                    self.pending = Some(Pending::Rotate(remaining - signed));
                }
            }
            None => {}
        }
    }
}

#[derive(Clone)]
struct SimLink(Rc<RefCell<SimDrive>>);

impl HardwareLink for SimLink {
    fn translate(&mut self, vector: Vector2<f64>) {
        // the drivetrain pulls a few degrees off the commanded bearing
        let drift = DRIFT_DEG.to_radians();
        let pulled = Vector2::new(
            vector[0] * drift.cos() - vector[1] * drift.sin(),
            vector[0] * drift.sin() + vector[1] * drift.cos(),
        );
        self.0.borrow_mut().pending = Some(Pending::Translate(pulled));
    }

    fn rotate(&mut self, delta_deg: f64) {
        self.0.borrow_mut().pending = Some(Pending::Rotate(delta_deg));
    }
}

fn main() {
    println!("Servo correction simulation start!!");

    let map = GameMap::standard(vec![Obstacle::omni(115.0, 57.0)]);
    let field = CostField::build(
        map.area_min(),
        map.area_max(),
        &map.obstacles,
        &CostFieldConfig::default(),
    );

    let start = Point2D::new(190.0, 90.0);
    let queue = plan_travel(&map, &field, start, "drawing_zone").expect("goal not accessible");
    println!("Planned {} waypoints", queue.len());

    let (event_tx, event_rx) = channel();
    let drive = Rc::new(RefCell::new(SimDrive::new(start, 90.0, event_tx)));
    let robot = RobotState::new(start, 90.0).with_cruise_speed(SPEED_CM_S);
    let mut manager = ServoManager::new(
        SimLink(drive.clone()),
        event_rx,
        robot,
        ServoConfig::default(),
    );

    let planned = manager.start_path(queue);

    let mut rng = StdRng::seed_from_u64(42);
    let noise = Normal::new(0.0, NOISE_SIGMA_CM).unwrap();
    let base = Instant::now();
    let mut actual = Path2D::new();
    let mut corrections = 0usize;
    let mut nodes = 0usize;
    let mut reached = false;

    for step in 0..MAX_STEPS {
        drive.borrow_mut().step(SIM_DT);
        let (true_position, true_heading) = {
            let d = drive.borrow();
            (d.position, d.heading_deg)
        };
        actual.push(true_position);

        let observed = Point2D::new(
            true_position.x + noise.sample(&mut rng),
            true_position.y + noise.sample(&mut rng),
        );
        let timestamp = base + Duration::from_millis((step as u64 + 1) * 60);
        let sample = TelemetrySample::new(observed, true_heading, timestamp);

        match manager.tick(&sample) {
            TickOutcome::Corrected => corrections += 1,
            TickOutcome::MovingTowardsCheckpoint(_) => nodes += 1,
            TickOutcome::CheckpointReached => {
                println!("Checkpoint reached after {} steps", step + 1);
                reached = true;
                break;
            }
            TickOutcome::RotationComplete | TickOutcome::Waiting => {}
        }
    }

    if !reached {
        println!("Checkpoint not reached within {} steps", MAX_STEPS);
    }
    println!(
        "Intermediate nodes: {}, trajectory corrections: {}",
        nodes, corrections
    );
    println!(
        "Final believed position: ({:.1}, {:.1})",
        manager.robot().position().x,
        manager.robot().position().y
    );

    std::fs::create_dir_all("img").unwrap_or_default();
    let mut vis = Visualizer::new("Servo Correction Simulation");
    vis.set_arena(map.area_min(), map.area_max())
        .plot_blocked_cells(&field.blocked_positions())
        .plot_obstacles(&map.obstacles)
        .plot_start(start)
        .plot_goal(map.poi_single("drawing_zone").unwrap())
        .plot_path(&planned, &PathStyle::new(colors::COMMANDED, "Planned path"))
        .plot_path(&actual, &PathStyle::new(colors::ACTUAL, "Actual trajectory"));
    let output = "img/servo_sim.png";
    vis.save_png(output, 800, 600).unwrap();
    println!("Plot saved to: {}", output);

    println!("Servo correction simulation finish!!");
}
