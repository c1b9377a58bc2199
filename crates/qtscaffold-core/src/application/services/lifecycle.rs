//! Scaffold run state machine.
//!
//! ```text
//! Idle ──► ConfigValidated ──► Rendered ──► Emitted ──► Done
//!   │             │               │
//!   └─────────────┴───────────────┴──► Failed(reason)
//! ```

use std::fmt;

use tracing::{info, warn};
use uuid::Uuid;

use crate::application::ApplicationError;
use crate::error::ScaffoldResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    ConfigValidated,
    Rendered,
    Emitted,
    Done,
    Failed(String),
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed(_))
    }

    fn can_advance_to(&self, next: &Phase) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::ConfigValidated)
                | (Self::ConfigValidated, Self::Rendered)
                | (Self::Rendered, Self::Emitted)
                | (Self::Emitted, Self::Done)
                | (
                    Self::Idle | Self::ConfigValidated | Self::Rendered,
                    Self::Failed(_)
                )
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::ConfigValidated => f.write_str("config-validated"),
            Self::Rendered => f.write_str("rendered"),
            Self::Emitted => f.write_str("emitted"),
            Self::Done => f.write_str("done"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Tracks one scaffold run and records every phase it passes through.
#[derive(Debug, Clone)]
pub struct ScaffoldLifecycle {
    run_id: Uuid,
    history: Vec<Phase>,
}

impl ScaffoldLifecycle {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            history: vec![Phase::Idle],
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn phase(&self) -> &Phase {
        // history always starts with Idle
        &self.history[self.history.len() - 1]
    }

    pub fn history(&self) -> &[Phase] {
        &self.history
    }

    pub fn advance(&mut self, next: Phase) -> ScaffoldResult<()> {
        let current = self.phase();
        if !current.can_advance_to(&next) {
            return Err(ApplicationError::InvalidTransition {
                from: current.to_string(),
                to: next.to_string(),
            }
            .into());
        }

        match &next {
            Phase::Failed(reason) => {
                warn!(run_id = %self.run_id, from = %current, %reason, "scaffold failed")
            }
            _ => info!(run_id = %self.run_id, from = %current, to = %next, "phase transition"),
        }
        self.history.push(next);
        Ok(())
    }

    /// Record a failure if the current phase allows it.
    pub fn fail(&mut self, reason: impl Into<String>) {
        // Failing from a terminal or emitted phase is not a valid transition;
        // the error is still returned to the caller.
        let _ = self.advance(Phase::Failed(reason.into()));
    }
}

impl Default for ScaffoldLifecycle {
    fn default() -> Self {
        Self::new()
    }
}
