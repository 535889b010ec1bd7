//! Bounded retry budget for the visual figure capture

use crate::common::error::{NavError, NavResult};

#[derive(Debug, Clone)]
pub struct CaptureBudget {
    remaining: u32,
    attempts: u32,
}

impl CaptureBudget {
    pub fn new(retries: u32) -> Self {
        Self { remaining: retries, attempts: 0 }
    }

    /// Book one attempt; exhaustion aborts the mission step.
    pub fn try_attempt(&mut self) -> NavResult<u32> {
        if self.remaining == 0 {
            return Err(NavError::OutOfCaptureRetries { attempts: self.attempts });
        }
        self.remaining -= 1;
        self.attempts += 1;
        Ok(self.remaining)
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_counts_down() {
        let mut budget = CaptureBudget::new(2);
        assert_eq!(budget.try_attempt().unwrap(), 1);
        assert_eq!(budget.try_attempt().unwrap(), 0);
        match budget.try_attempt() {
            Err(NavError::OutOfCaptureRetries { attempts }) => assert_eq!(attempts, 2),
            other => panic!("expected OutOfCaptureRetries, got {:?}", other),
        }
    }
}
