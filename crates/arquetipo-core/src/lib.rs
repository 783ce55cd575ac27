//! # Arquetipo Core Library
//!
//! This library provides the core business logic for the Arquetipo
//! behavioral-profile assessment. It implements a CLI-first philosophy
//! where every operation is available via a standalone CLI binary,
//! with any GUI being a thin presentation layer over the same core.
//!
//! ## Architecture
//!
//! - **Step Sequencer**: a linear wizard state machine over the flow
//!   landing -> personal data -> N question blocks -> review -> results
//! - **Answer Ledger**: the respondent's per-block selections with
//!   completeness queries
//! - **Scoring Engine**: a pure function turning ledger + catalog into
//!   normalized percentages and a single predominant archetype
//! - **Storage**: SQLite-backed session persistence and TOML-based
//!   configuration
//!
//! ## Key Components
//!
//! - [`AssessmentSession`]: session controller gating step progression
//! - [`StepSequencer`]: the wizard position state machine
//! - [`compute_results`]: the scoring engine entry point
//! - [`Database`]: session state and submission-history persistence

pub mod catalog;
pub mod error;
pub mod events;
pub mod ledger;
pub mod respondent;
pub mod scoring;
pub mod session;
pub mod storage;
pub mod wizard;

pub use catalog::{Archetype, QuestionBlock, QuestionCatalog, QuestionOption};
pub use error::{AnswerError, ConfigError, CoreError, ScoringError, SessionError, StorageError, WizardError};
pub use events::Event;
pub use ledger::{AnswerLedger, AnswerMode, BlockAnswer};
pub use respondent::{FieldIssue, Respondent};
pub use scoring::{compute_results, ArchetypeScore, ResultRecord};
pub use session::AssessmentSession;
pub use storage::{Config, Database, DbSessionStore, MemoryStore, PersistedSession, SessionStore};
pub use wizard::{StepKind, StepSequencer};
