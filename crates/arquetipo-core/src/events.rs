use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Archetype;
use crate::wizard::StepKind;

/// Every session mutation produces an Event. The UI collaborator
/// renders them; the CLI prints them as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    StepChanged {
        from_step: u32,
        to_step: u32,
        step: StepKind,
        progress_pct: u32,
        at: DateTime<Utc>,
    },
    RespondentSaved {
        name: String,
        at: DateTime<Utc>,
    },
    AnswerRecorded {
        block_id: u32,
        completed_blocks: u32,
        total_blocks: u32,
        at: DateTime<Utc>,
    },
    FinalConsentSet {
        granted: bool,
        at: DateTime<Utc>,
    },
    ResultsComputed {
        predominant: Archetype,
        at: DateTime<Utc>,
    },
    SessionReset {
        at: DateTime<Utc>,
    },
    /// Full session snapshot for status queries.
    StateSnapshot {
        session_id: String,
        current_step: u32,
        total_steps: u32,
        step: StepKind,
        progress_pct: u32,
        completed_blocks: u32,
        total_blocks: u32,
        respondent_valid: bool,
        final_consent: bool,
        has_result: bool,
        at: DateTime<Utc>,
    },
}
