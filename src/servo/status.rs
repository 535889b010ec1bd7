//! Per-axis movement status
//!
//! Exactly one status value per axis is active at a time; transitions
//! happen only inside the servo manager's tick.

use std::fmt;

/// Translation axis state.
///
/// Every translation is physically decomposed into a bulk move, a
/// heading settle, and a fine position correction, because the
/// drivetrain cannot change heading and position simultaneously with
/// bounded error. Keeping the phases explicit keeps their failure
/// modes (wrong heading vs. wrong position) separately diagnosable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationStatus {
    Idle,
    Moving,
    CorrectingHeading,
    CorrectingPosition,
}

/// Rotation axis state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationStatus {
    Idle,
    Rotating,
    CorrectingHeading,
}

impl fmt::Display for TranslationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TranslationStatus::Idle => "idle",
            TranslationStatus::Moving => "moving",
            TranslationStatus::CorrectingHeading => "correcting-heading",
            TranslationStatus::CorrectingPosition => "correcting-position",
        };
        write!(f, "{}", name)
    }
}

impl fmt::Display for RotationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RotationStatus::Idle => "idle",
            RotationStatus::Rotating => "rotating",
            RotationStatus::CorrectingHeading => "correcting-heading",
        };
        write!(f, "{}", name)
    }
}

/// Completion event pushed by the hardware layer when a commanded
/// movement physically finishes. Edge-triggered: the servo manager
/// never infers completion from elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionEvent {
    TranslationDone,
    RotationDone,
}
