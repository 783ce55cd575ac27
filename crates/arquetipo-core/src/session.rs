//! Assessment session controller.
//!
//! Owns the step sequencer, the answer ledger, the respondent record
//! and the last result as one explicit state object, with persistence
//! injected as a [`SessionStore`] capability: loaded once at startup,
//! saved after every mutation.
//!
//! The controller is where per-step gating lives. The sequencer only
//! clamps bounds; deciding *whether* the respondent may leave a step
//! (valid respondent, complete block, fully complete ledger, final
//! consent) happens here, and gate failures never advance the
//! position.

use chrono::Utc;

use crate::catalog::QuestionCatalog;
use crate::error::{AnswerError, Result, SessionError};
use crate::events::Event;
use crate::ledger::{AnswerLedger, AnswerMode, BlockAnswer};
use crate::respondent::Respondent;
use crate::scoring::{compute_results, ResultRecord};
use crate::storage::{PersistedSession, SessionStore};
use crate::wizard::{StepKind, StepSequencer};

/// A single respondent's assessment session.
pub struct AssessmentSession {
    id: String,
    catalog: QuestionCatalog,
    mode: AnswerMode,
    sequencer: StepSequencer,
    ledger: AnswerLedger,
    respondent: Option<Respondent>,
    last_result: Option<ResultRecord>,
    /// Whether leaving the review step demands an explicit final
    /// consent check before results are computed.
    require_final_consent: bool,
    final_consent: bool,
    /// Guards against double-submit while a submit-then-advance
    /// sequence is being applied. Not a lock; there is one writer.
    busy: bool,
    store: Box<dyn SessionStore>,
}

impl AssessmentSession {
    /// Start or resume a session from the injected store.
    ///
    /// A resumed session is reconciled with the result invariant: a
    /// stored result belonging to a position before the results step
    /// is dropped, and a results-step position without a result falls
    /// back to the review step.
    ///
    /// # Errors
    /// Propagates store read failures.
    pub fn open(
        catalog: QuestionCatalog,
        mode: AnswerMode,
        require_final_consent: bool,
        store: Box<dyn SessionStore>,
    ) -> Result<Self> {
        let persisted = store.load()?;
        let block_count = catalog.len() as u32;
        let mut sequencer = StepSequencer::resume(block_count, persisted.wizard_position);
        let mut last_result = persisted.last_result;

        let results_step = sequencer.total_steps();
        if sequencer.current_step() < results_step {
            last_result = None;
        } else if last_result.is_none() {
            sequencer.jump_to(results_step - 1).ok();
        }

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            catalog,
            mode,
            sequencer,
            ledger: persisted.answers,
            respondent: persisted.respondent,
            last_result,
            require_final_consent,
            final_consent: persisted.final_consent,
            busy: false,
            store,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub fn answer_mode(&self) -> AnswerMode {
        self.mode
    }

    pub fn current_step(&self) -> u32 {
        self.sequencer.current_step()
    }

    pub fn total_steps(&self) -> u32 {
        self.sequencer.total_steps()
    }

    pub fn step_kind(&self) -> StepKind {
        self.sequencer.step_kind()
    }

    pub fn progress_fraction(&self) -> f64 {
        self.sequencer.progress_fraction()
    }

    pub fn ledger(&self) -> &AnswerLedger {
        &self.ledger
    }

    pub fn respondent(&self) -> Option<&Respondent> {
        self.respondent.as_ref()
    }

    pub fn last_result(&self) -> Option<&ResultRecord> {
        self.last_result.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn final_consent(&self) -> bool {
        self.final_consent
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            session_id: self.id.clone(),
            current_step: self.sequencer.current_step(),
            total_steps: self.sequencer.total_steps(),
            step: self.sequencer.step_kind(),
            progress_pct: self.sequencer.progress_percent(),
            completed_blocks: self.ledger.completed_count(),
            total_blocks: self.catalog.len() as u32,
            respondent_valid: self.respondent.as_ref().is_some_and(Respondent::is_valid),
            final_consent: self.final_consent,
            has_result: self.last_result.is_some(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Save the respondent record. Partial data is persisted as-is;
    /// validity is only enforced when leaving the personal-data step.
    pub fn set_respondent(&mut self, respondent: Respondent) -> Result<Event> {
        let name = respondent.name.clone();
        self.respondent = Some(respondent);
        self.persist()?;
        Ok(Event::RespondentSaved {
            name,
            at: Utc::now(),
        })
    }

    /// Record (or withdraw) the final consent checked on the review
    /// step before results may be computed.
    pub fn set_final_consent(&mut self, granted: bool) -> Result<Event> {
        self.final_consent = granted;
        self.persist()?;
        Ok(Event::FinalConsentSet {
            granted,
            at: Utc::now(),
        })
    }

    /// Record an answer for a block. Does not advance; the caller
    /// advances separately once the submission succeeded.
    pub fn submit_answer(&mut self, block_id: u32, answer: BlockAnswer) -> Result<Event> {
        if self.busy {
            return Err(SessionError::Busy.into());
        }
        self.busy = true;
        let outcome = self.apply_answer(block_id, answer);
        self.busy = false;
        outcome
    }

    fn apply_answer(&mut self, block_id: u32, answer: BlockAnswer) -> Result<Event> {
        match (self.mode, &answer) {
            (AnswerMode::SingleChoice, BlockAnswer::Ranked { .. }) => {
                return Err(AnswerError::WrongShape {
                    block_id,
                    expected: "single_choice",
                }
                .into());
            }
            (AnswerMode::ForcedRank, BlockAnswer::Single { .. }) => {
                return Err(AnswerError::WrongShape {
                    block_id,
                    expected: "forced_rank",
                }
                .into());
            }
            _ => {}
        }

        self.ledger.set_answer(&self.catalog, block_id, answer)?;
        self.persist()?;
        Ok(Event::AnswerRecorded {
            block_id,
            completed_blocks: self.ledger.completed_count(),
            total_blocks: self.catalog.len() as u32,
            at: Utc::now(),
        })
    }

    /// Advance one step if the current step's gate passes.
    ///
    /// Leaving the review step computes the results; on the last step
    /// this is a clamped no-op.
    ///
    /// # Errors
    /// A gate failure leaves the position (and everything else)
    /// unchanged.
    pub fn try_advance(&mut self) -> Result<Event> {
        match self.sequencer.step_kind() {
            StepKind::Landing => {}
            StepKind::PersonalData => {
                let issues = self
                    .respondent
                    .as_ref()
                    .map(Respondent::validate)
                    .unwrap_or_else(|| Respondent::default().validate());
                if !issues.is_empty() {
                    let fields: Vec<&str> = issues.iter().map(|i| i.field).collect();
                    return Err(SessionError::RespondentInvalid(fields.join(", ")).into());
                }
            }
            StepKind::Question { block } => {
                if !self.ledger.is_complete(block) {
                    return Err(SessionError::BlockIncomplete(block).into());
                }
            }
            StepKind::Review => {
                if !self.ledger.is_fully_complete(&self.catalog) {
                    return Err(SessionError::LedgerIncomplete {
                        completed: self.ledger.completed_count(),
                        total: self.catalog.len() as u32,
                    }
                    .into());
                }
                if self.require_final_consent && !self.final_consent {
                    return Err(SessionError::FinalConsentMissing.into());
                }
                let record = compute_results(&self.ledger, &self.catalog)?;
                let predominant = record.predominant;
                self.last_result = Some(record);
                self.sequencer.advance();
                self.persist()?;
                return Ok(Event::ResultsComputed {
                    predominant,
                    at: Utc::now(),
                });
            }
            StepKind::Results => {
                // Terminal step; advance is a clamped no-op.
                return Ok(self.step_changed(self.sequencer.current_step()));
            }
        }

        let from = self.sequencer.current_step();
        self.sequencer.advance();
        self.persist()?;
        Ok(self.step_changed(from))
    }

    /// Move back one step (clamped no-op at the first step). Leaving
    /// the results step backwards discards the stored result; a
    /// regenerated record always comes from a fresh computation.
    pub fn retreat(&mut self) -> Result<Event> {
        let from = self.sequencer.current_step();
        self.sequencer.retreat();
        if self.sequencer.current_step() < self.sequencer.total_steps() {
            self.last_result = None;
        }
        self.persist()?;
        Ok(self.step_changed(from))
    }

    /// Jump directly to a step, keeping the result invariant intact:
    /// jumping before the results step drops the result, jumping to
    /// the results step recomputes it (and requires a complete
    /// ledger).
    ///
    /// # Errors
    /// `WizardError::OutOfRange` for an invalid target;
    /// `SessionError::LedgerIncomplete` when targeting the results
    /// step with unanswered blocks;
    /// `SessionError::FinalConsentMissing` when targeting the results
    /// step without the required consent.
    pub fn jump_to(&mut self, step: u32) -> Result<Event> {
        let results_step = self.sequencer.total_steps();
        if step == results_step {
            if !self.ledger.is_fully_complete(&self.catalog) {
                return Err(SessionError::LedgerIncomplete {
                    completed: self.ledger.completed_count(),
                    total: self.catalog.len() as u32,
                }
                .into());
            }
            if self.require_final_consent && !self.final_consent {
                return Err(SessionError::FinalConsentMissing.into());
            }
        }

        let from = self.sequencer.current_step();
        self.sequencer.jump_to(step)?;

        if step == results_step {
            self.last_result = Some(compute_results(&self.ledger, &self.catalog)?);
        } else {
            self.last_result = None;
        }
        self.persist()?;
        Ok(self.step_changed(from))
    }

    /// Explicit, user-triggered full clear: position, ledger,
    /// respondent and result all return to the empty state and the
    /// persisted records are removed.
    pub fn reset_all(&mut self) -> Result<Event> {
        self.sequencer.reset();
        self.ledger.clear();
        self.respondent = None;
        self.last_result = None;
        self.final_consent = false;
        self.store.clear()?;
        Ok(Event::SessionReset { at: Utc::now() })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn step_changed(&self, from: u32) -> Event {
        Event::StepChanged {
            from_step: from,
            to_step: self.sequencer.current_step(),
            step: self.sequencer.step_kind(),
            progress_pct: self.sequencer.progress_percent(),
            at: Utc::now(),
        }
    }

    fn persist(&self) -> Result<()> {
        self.store.save(&PersistedSession {
            wizard_position: self.sequencer.current_step(),
            answers: self.ledger.clone(),
            respondent: self.respondent.clone(),
            last_result: self.last_result.clone(),
            final_consent: self.final_consent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Archetype;
    use crate::error::CoreError;
    use crate::storage::MemoryStore;

    fn session() -> AssessmentSession {
        session_with_consent_gate(false)
    }

    fn session_with_consent_gate(require_final_consent: bool) -> AssessmentSession {
        AssessmentSession::open(
            QuestionCatalog::default(),
            AnswerMode::ForcedRank,
            require_final_consent,
            Box::new(MemoryStore::new()),
        )
        .unwrap()
    }

    fn valid_respondent() -> Respondent {
        Respondent {
            name: "Ana Souza".to_string(),
            whatsapp: "11987654321".to_string(),
            email: "ana@example.com".to_string(),
            consent_given: true,
        }
    }

    fn ranked(most: &str, least: &str) -> BlockAnswer {
        BlockAnswer::Ranked {
            most_id: most.to_string(),
            least_id: least.to_string(),
        }
    }

    fn answer_all_blocks(session: &mut AssessmentSession) {
        for id in session.catalog().block_ids() {
            let most = format!("{id}a");
            let least = format!("{id}d");
            session.submit_answer(id, ranked(&most, &least)).unwrap();
        }
    }

    #[test]
    fn fresh_session_starts_at_landing() {
        let s = session();
        assert_eq!(s.current_step(), 1);
        assert_eq!(s.step_kind(), StepKind::Landing);
        assert!(s.last_result().is_none());
    }

    #[test]
    fn personal_data_gate_blocks_invalid_respondent() {
        let mut s = session();
        s.try_advance().unwrap(); // leave landing
        assert_eq!(s.step_kind(), StepKind::PersonalData);

        let err = s.try_advance().unwrap_err();
        assert!(matches!(
            err,
            CoreError::Session(SessionError::RespondentInvalid(_))
        ));
        assert_eq!(s.current_step(), 2);

        s.set_respondent(valid_respondent()).unwrap();
        s.try_advance().unwrap();
        assert_eq!(s.step_kind(), StepKind::Question { block: 1 });
    }

    #[test]
    fn question_gate_blocks_unanswered_block() {
        let mut s = session();
        s.try_advance().unwrap();
        s.set_respondent(valid_respondent()).unwrap();
        s.try_advance().unwrap();

        let err = s.try_advance().unwrap_err();
        assert!(matches!(
            err,
            CoreError::Session(SessionError::BlockIncomplete(1))
        ));

        s.submit_answer(1, ranked("1a", "1b")).unwrap();
        s.try_advance().unwrap();
        assert_eq!(s.step_kind(), StepKind::Question { block: 2 });
    }

    #[test]
    fn review_gate_requires_full_ledger_and_computes_results() {
        let mut s = session();
        s.try_advance().unwrap();
        s.set_respondent(valid_respondent()).unwrap();
        answer_all_blocks(&mut s);
        s.jump_to(23).unwrap();
        assert_eq!(s.step_kind(), StepKind::Review);

        let event = s.try_advance().unwrap();
        assert!(matches!(event, Event::ResultsComputed { .. }));
        assert_eq!(s.step_kind(), StepKind::Results);
        // raw {20, 0, 0, -20} -> shifted {40, 20, 20, 0}, total 80.
        let result = s.last_result().unwrap();
        assert_eq!(result.predominant, Archetype::Warrior);
        assert_eq!(result.warrior.percentage, 50);
        assert_eq!(result.mage.percentage, 0);
    }

    #[test]
    fn review_gate_rejects_incomplete_ledger() {
        let mut s = session();
        s.submit_answer(1, ranked("1a", "1b")).unwrap();
        s.jump_to(23).unwrap();

        let err = s.try_advance().unwrap_err();
        assert!(matches!(
            err,
            CoreError::Session(SessionError::LedgerIncomplete { completed: 1, total: 20 })
        ));
        assert_eq!(s.step_kind(), StepKind::Review);
        assert!(s.last_result().is_none());
    }

    #[test]
    fn review_gate_requires_final_consent_when_enabled() {
        let mut s = session_with_consent_gate(true);
        answer_all_blocks(&mut s);
        s.jump_to(23).unwrap();
        assert_eq!(s.step_kind(), StepKind::Review);

        let err = s.try_advance().unwrap_err();
        assert!(matches!(
            err,
            CoreError::Session(SessionError::FinalConsentMissing)
        ));
        assert_eq!(s.step_kind(), StepKind::Review);
        assert!(s.last_result().is_none());

        let event = s.set_final_consent(true).unwrap();
        assert!(matches!(event, Event::FinalConsentSet { granted: true, .. }));
        s.try_advance().unwrap();
        assert_eq!(s.step_kind(), StepKind::Results);
        assert!(s.last_result().is_some());
    }

    #[test]
    fn jump_to_results_requires_final_consent_when_enabled() {
        let mut s = session_with_consent_gate(true);
        answer_all_blocks(&mut s);

        let err = s.jump_to(24).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Session(SessionError::FinalConsentMissing)
        ));
        assert_eq!(s.current_step(), 1);

        s.set_final_consent(true).unwrap();
        s.jump_to(24).unwrap();
        assert_eq!(s.step_kind(), StepKind::Results);
    }

    #[test]
    fn withdrawn_consent_blocks_the_review_gate_again() {
        let mut s = session_with_consent_gate(true);
        answer_all_blocks(&mut s);
        s.set_final_consent(true).unwrap();
        s.set_final_consent(false).unwrap();
        s.jump_to(23).unwrap();

        let err = s.try_advance().unwrap_err();
        assert!(matches!(
            err,
            CoreError::Session(SessionError::FinalConsentMissing)
        ));
    }

    #[test]
    fn disabled_consent_gate_lets_review_advance() {
        let mut s = session();
        answer_all_blocks(&mut s);
        s.jump_to(23).unwrap();
        assert!(!s.final_consent());

        s.try_advance().unwrap();
        assert_eq!(s.step_kind(), StepKind::Results);
    }

    #[test]
    fn reset_all_withdraws_final_consent() {
        let mut s = session_with_consent_gate(true);
        s.set_final_consent(true).unwrap();
        s.reset_all().unwrap();
        assert!(!s.final_consent());
    }

    #[test]
    fn advance_on_results_step_is_a_noop() {
        let mut s = session();
        answer_all_blocks(&mut s);
        s.jump_to(23).unwrap();
        s.try_advance().unwrap();
        assert_eq!(s.current_step(), 24);

        s.try_advance().unwrap();
        assert_eq!(s.current_step(), 24);
        assert!(s.last_result().is_some());
    }

    #[test]
    fn retreating_from_results_drops_the_record() {
        let mut s = session();
        answer_all_blocks(&mut s);
        s.jump_to(24).unwrap();
        assert!(s.last_result().is_some());

        s.retreat().unwrap();
        assert_eq!(s.step_kind(), StepKind::Review);
        assert!(s.last_result().is_none());
    }

    #[test]
    fn jump_to_results_requires_complete_ledger() {
        let mut s = session();
        let err = s.jump_to(24).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Session(SessionError::LedgerIncomplete { .. })
        ));
        assert_eq!(s.current_step(), 1);
    }

    #[test]
    fn wrong_shape_for_mode_is_rejected() {
        let mut s = session();
        let err = s
            .submit_answer(
                1,
                BlockAnswer::Single {
                    option_id: "1a".to_string(),
                },
            )
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Answer(AnswerError::WrongShape { block_id: 1, .. })
        ));
        assert!(s.ledger().is_empty());
    }

    #[test]
    fn reset_all_clears_everything() {
        let mut s = session();
        s.try_advance().unwrap();
        s.set_respondent(valid_respondent()).unwrap();
        s.submit_answer(3, ranked("3a", "3c")).unwrap();

        s.reset_all().unwrap();
        assert_eq!(s.current_step(), 1);
        assert!(s.ledger().is_empty());
        assert!(s.respondent().is_none());
        assert!(s.last_result().is_none());
    }

    #[test]
    fn session_resumes_from_persisted_state() {
        let store = Box::new(MemoryStore::new());
        let state = PersistedSession {
            wizard_position: 7,
            answers: AnswerLedger::new(),
            respondent: Some(valid_respondent()),
            last_result: None,
            final_consent: false,
        };
        store.save(&state).unwrap();

        let s = AssessmentSession::open(
            QuestionCatalog::default(),
            AnswerMode::ForcedRank,
            false,
            store,
        )
        .unwrap();
        assert_eq!(s.current_step(), 7);
        assert_eq!(s.respondent().unwrap().name, "Ana Souza");
    }

    #[test]
    fn resume_drops_result_stored_before_results_step() {
        let catalog = QuestionCatalog::default();
        let mut ledger = AnswerLedger::new();
        ledger.set_answer(&catalog, 1, ranked("1a", "1b")).unwrap();
        let record = compute_results(&ledger, &catalog).unwrap();

        let store = Box::new(MemoryStore::new());
        store
            .save(&PersistedSession {
                wizard_position: 5,
                answers: ledger,
                respondent: None,
                last_result: Some(record),
                final_consent: false,
            })
            .unwrap();

        let s = AssessmentSession::open(catalog, AnswerMode::ForcedRank, false, store).unwrap();
        assert!(s.last_result().is_none());
        assert_eq!(s.current_step(), 5);
    }

    #[test]
    fn resume_at_results_without_record_falls_back_to_review() {
        let store = Box::new(MemoryStore::new());
        store
            .save(&PersistedSession {
                wizard_position: 24,
                answers: AnswerLedger::new(),
                respondent: None,
                last_result: None,
                final_consent: false,
            })
            .unwrap();

        let s = AssessmentSession::open(
            QuestionCatalog::default(),
            AnswerMode::ForcedRank,
            false,
            store,
        )
        .unwrap();
        assert_eq!(s.step_kind(), StepKind::Review);
    }

    #[test]
    fn snapshot_reflects_session_state() {
        let mut s = session();
        s.submit_answer(1, ranked("1a", "1c")).unwrap();
        match s.snapshot() {
            Event::StateSnapshot {
                current_step,
                total_steps,
                completed_blocks,
                total_blocks,
                has_result,
                ..
            } => {
                assert_eq!(current_step, 1);
                assert_eq!(total_steps, 24);
                assert_eq!(completed_blocks, 1);
                assert_eq!(total_blocks, 20);
                assert!(!has_result);
            }
            _ => panic!("Expected StateSnapshot"),
        }
    }
}
