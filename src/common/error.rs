//! Error types for arena_robotics

use std::fmt;
use crate::common::types::Point2D;

/// Main error type for the navigation core
#[derive(Debug)]
pub enum NavError {
    /// No traversable path exists to the requested checkpoint
    CheckpointNotAccessible(Point2D),
    /// The bounded retry budget for a figure capture is exhausted
    OutOfCaptureRetries { attempts: u32 },
    /// Every candidate exit point failed the accessibility check
    NoReachableExit,
    /// Requested point of interest is not part of the game map
    UnknownPointOfInterest(String),
}

impl fmt::Display for NavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavError::CheckpointNotAccessible(goal) => {
                write!(f, "Checkpoint not accessible: ({:.1}, {:.1})", goal.x, goal.y)
            }
            NavError::OutOfCaptureRetries { attempts } => {
                write!(f, "Out of capture retries after {} attempts", attempts)
            }
            NavError::NoReachableExit => write!(f, "No reachable exit point"),
            NavError::UnknownPointOfInterest(name) => {
                write!(f, "Unknown point of interest: {}", name)
            }
        }
    }
}

impl std::error::Error for NavError {}

/// Result type alias for navigation operations
pub type NavResult<T> = Result<T, NavError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NavError::CheckpointNotAccessible(Point2D::new(30.0, 30.0));
        assert_eq!(format!("{}", err), "Checkpoint not accessible: (30.0, 30.0)");
    }

    #[test]
    fn test_retry_error_display() {
        let err = NavError::OutOfCaptureRetries { attempts: 3 };
        assert_eq!(format!("{}", err), "Out of capture retries after 3 attempts");
    }
}
