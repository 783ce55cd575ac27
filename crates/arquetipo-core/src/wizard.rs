//! Wizard step sequencer.
//!
//! A content-agnostic state machine over the integer positions
//! `1..=total_steps`. It enforces bounds and nothing else; per-step
//! validation (respondent data, block completeness) is the session
//! controller's job, which decides *when* to advance.
//!
//! ## Layout
//!
//! ```text
//! 1            landing
//! 2            personal data
//! 3..N+2       question blocks 1..N
//! N+3          review
//! N+4          results
//! ```

use serde::{Deserialize, Serialize};

use crate::error::WizardError;

/// Number of non-question steps: landing, personal data, review, results.
const FIXED_STEPS: u32 = 4;

/// What a given wizard position presents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepKind {
    Landing,
    PersonalData,
    /// 1-based question block number.
    Question { block: u32 },
    Review,
    Results,
}

/// Linear step sequencer.
///
/// The position is serialized as part of the persisted session so a
/// resumed session lands on the step it left.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSequencer {
    current_step: u32,
    total_steps: u32,
}

impl StepSequencer {
    /// Create a sequencer for a flow with `block_count` question blocks.
    pub fn new(block_count: u32) -> Self {
        Self {
            current_step: 1,
            total_steps: block_count + FIXED_STEPS,
        }
    }

    /// Restore a sequencer at a persisted position, clamped into range.
    pub fn resume(block_count: u32, position: u32) -> Self {
        let mut seq = Self::new(block_count);
        seq.current_step = position.clamp(1, seq.total_steps);
        seq
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn current_step(&self) -> u32 {
        self.current_step
    }

    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    pub fn block_count(&self) -> u32 {
        self.total_steps - FIXED_STEPS
    }

    pub fn is_first(&self) -> bool {
        self.current_step == 1
    }

    pub fn is_last(&self) -> bool {
        self.current_step == self.total_steps
    }

    /// What the current position presents.
    pub fn step_kind(&self) -> StepKind {
        self.step_kind_at(self.current_step)
    }

    /// What `step` presents. Positions outside `[1, total_steps]` are
    /// never produced by the sequencer itself.
    pub fn step_kind_at(&self, step: u32) -> StepKind {
        match step {
            0 | 1 => StepKind::Landing,
            2 => StepKind::PersonalData,
            s if s == self.total_steps - 1 => StepKind::Review,
            s if s >= self.total_steps => StepKind::Results,
            s => StepKind::Question { block: s - 2 },
        }
    }

    /// `current_step / total_steps`, in `[1/total_steps, 1]`.
    /// Monotonic non-decreasing as the respondent advances.
    pub fn progress_fraction(&self) -> f64 {
        self.current_step as f64 / self.total_steps as f64
    }

    /// Rounded whole-percent progress for display.
    pub fn progress_percent(&self) -> u32 {
        (self.progress_fraction() * 100.0).round() as u32
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Move forward one step, clamped at the last step (no-op there).
    pub fn advance(&mut self) {
        if self.current_step < self.total_steps {
            self.current_step += 1;
        }
    }

    /// Move back one step, clamped at the first step (no-op there).
    pub fn retreat(&mut self) {
        if self.current_step > 1 {
            self.current_step -= 1;
        }
    }

    /// Jump directly to a step. Used for deep links and tests; normal
    /// flow only ever advances/retreats.
    ///
    /// # Errors
    /// [`WizardError::OutOfRange`] if `step` is outside `[1, total_steps]`.
    pub fn jump_to(&mut self, step: u32) -> Result<(), WizardError> {
        if step < 1 || step > self.total_steps {
            return Err(WizardError::OutOfRange {
                step,
                total_steps: self.total_steps,
            });
        }
        self.current_step = step;
        Ok(())
    }

    /// Return to the first step. Does not touch the ledger or the
    /// respondent; clearing those is an explicit, separate action of
    /// the session controller.
    pub fn reset(&mut self) {
        self.current_step = 1;
    }
}
