//! Answer ledger: the respondent's per-block selections.
//!
//! At most one answer per block; re-submission overwrites. The ledger
//! validates answers against the catalog on write and exposes the
//! completeness queries the wizard gates on.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::QuestionCatalog;
use crate::error::AnswerError;

/// Which answer shape the product collects.
///
/// Both shapes exist across product iterations; the active one is a
/// configuration choice, not a compile-time decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerMode {
    /// One selected option per block.
    SingleChoice,
    /// Most-identified and least-identified option per block.
    #[default]
    ForcedRank,
}

impl std::str::FromStr for AnswerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single_choice" => Ok(AnswerMode::SingleChoice),
            "forced_rank" => Ok(AnswerMode::ForcedRank),
            other => Err(format!("unknown answer mode: {other}")),
        }
    }
}

/// A respondent's answer to one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum BlockAnswer {
    /// Single-choice shape.
    Single { option_id: String },
    /// Forced-rank (most/least) shape. Invariant: `most_id != least_id`.
    Ranked { most_id: String, least_id: String },
}

impl BlockAnswer {
    /// Whether this answer satisfies its shape's completeness rules.
    pub fn is_complete(&self) -> bool {
        match self {
            BlockAnswer::Single { option_id } => !option_id.is_empty(),
            BlockAnswer::Ranked { most_id, least_id } => {
                !most_id.is_empty() && !least_id.is_empty() && most_id != least_id
            }
        }
    }
}

/// Mapping from block id to the respondent's answer.
///
/// Created empty at session start, mutated only through
/// [`AnswerLedger::set_answer`], cleared on reset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerLedger {
    answers: BTreeMap<u32, BlockAnswer>,
}

impl AnswerLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert the answer for a block.
    ///
    /// Validates that the block and every referenced option exist in
    /// the catalog, and that a forced-rank answer names two different
    /// options. Idempotent for repeated identical submissions.
    ///
    /// # Errors
    /// Returns [`AnswerError`] and leaves the ledger unchanged if
    /// validation fails.
    pub fn set_answer(
        &mut self,
        catalog: &QuestionCatalog,
        block_id: u32,
        answer: BlockAnswer,
    ) -> Result<(), AnswerError> {
        let block = catalog
            .block(block_id)
            .ok_or(AnswerError::UnknownBlock(block_id))?;

        let check_option = |option_id: &str| -> Result<(), AnswerError> {
            if block.option(option_id).is_none() {
                return Err(AnswerError::UnknownOption {
                    block_id,
                    option_id: option_id.to_string(),
                });
            }
            Ok(())
        };

        match &answer {
            BlockAnswer::Single { option_id } => check_option(option_id)?,
            BlockAnswer::Ranked { most_id, least_id } => {
                check_option(most_id)?;
                check_option(least_id)?;
                if most_id == least_id {
                    return Err(AnswerError::MostEqualsLeast {
                        block_id,
                        option_id: most_id.clone(),
                    });
                }
            }
        }

        self.answers.insert(block_id, answer);
        Ok(())
    }

    /// The answer for a block, if any.
    pub fn answer(&self, block_id: u32) -> Option<&BlockAnswer> {
        self.answers.get(&block_id)
    }

    /// Whether the block has a complete answer.
    pub fn is_complete(&self, block_id: u32) -> bool {
        self.answers
            .get(&block_id)
            .map(BlockAnswer::is_complete)
            .unwrap_or(false)
    }

    /// Number of blocks with a complete answer.
    pub fn completed_count(&self) -> u32 {
        self.answers.values().filter(|a| a.is_complete()).count() as u32
    }

    /// Whether every catalog block has a complete answer.
    pub fn is_fully_complete(&self, catalog: &QuestionCatalog) -> bool {
        self.completed_count() == catalog.len() as u32
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Iterate (block_id, answer) in block order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &BlockAnswer)> + '_ {
        self.answers.iter().map(|(id, a)| (*id, a))
    }

    /// Empty the ledger.
    pub fn clear(&mut self) {
        self.answers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> QuestionCatalog {
        QuestionCatalog::default()
    }

    fn ranked(most: &str, least: &str) -> BlockAnswer {
        BlockAnswer::Ranked {
            most_id: most.to_string(),
            least_id: least.to_string(),
        }
    }

    #[test]
    fn set_and_get_answer() {
        let catalog = catalog();
        let mut ledger = AnswerLedger::new();
        ledger.set_answer(&catalog, 1, ranked("1a", "1d")).unwrap();
        assert_eq!(ledger.answer(1), Some(&ranked("1a", "1d")));
        assert!(ledger.is_complete(1));
        assert_eq!(ledger.completed_count(), 1);
    }

    #[test]
    fn most_equals_least_rejected_and_ledger_unchanged() {
        let catalog = catalog();
        let mut ledger = AnswerLedger::new();
        let err = ledger.set_answer(&catalog, 1, ranked("1a", "1a")).unwrap_err();
        assert!(matches!(err, AnswerError::MostEqualsLeast { block_id: 1, .. }));
        assert!(ledger.is_empty());
        assert!(!ledger.is_complete(1));
    }

    #[test]
    fn same_archetype_different_options_accepted() {
        // Both ids resolve to real options; same-category is legal as
        // long as the option ids differ.
        let catalog = catalog();
        let mut ledger = AnswerLedger::new();
        ledger.set_answer(&catalog, 1, ranked("1b", "1c")).unwrap();
        assert!(ledger.is_complete(1));
    }

    #[test]
    fn unknown_block_rejected() {
        let catalog = catalog();
        let mut ledger = AnswerLedger::new();
        let err = ledger.set_answer(&catalog, 99, ranked("1a", "1b")).unwrap_err();
        assert_eq!(err, AnswerError::UnknownBlock(99));
    }

    #[test]
    fn unknown_option_rejected() {
        let catalog = catalog();
        let mut ledger = AnswerLedger::new();
        let err = ledger.set_answer(&catalog, 1, ranked("1a", "9z")).unwrap_err();
        assert!(matches!(err, AnswerError::UnknownOption { block_id: 1, .. }));
        assert!(ledger.is_empty());
    }

    #[test]
    fn resubmission_overwrites_without_duplicating() {
        let catalog = catalog();
        let mut ledger = AnswerLedger::new();
        ledger.set_answer(&catalog, 5, ranked("5a", "5b")).unwrap();
        ledger.set_answer(&catalog, 5, ranked("5c", "5d")).unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.completed_count(), 1);
        assert_eq!(ledger.answer(5), Some(&ranked("5c", "5d")));
    }

    #[test]
    fn single_choice_answers_count_toward_completion() {
        let catalog = catalog();
        let mut ledger = AnswerLedger::new();
        ledger
            .set_answer(
                &catalog,
                1,
                BlockAnswer::Single {
                    option_id: "1a".to_string(),
                },
            )
            .unwrap();
        assert!(ledger.is_complete(1));
        assert_eq!(ledger.completed_count(), 1);
    }

    #[test]
    fn full_completion_requires_every_block() {
        let catalog = catalog();
        let mut ledger = AnswerLedger::new();
        for id in catalog.block_ids() {
            assert!(!ledger.is_fully_complete(&catalog));
            let most = format!("{id}a");
            let least = format!("{id}d");
            ledger.set_answer(&catalog, id, ranked(&most, &least)).unwrap();
        }
        assert!(ledger.is_fully_complete(&catalog));
    }

    #[test]
    fn clear_empties_the_ledger() {
        let catalog = catalog();
        let mut ledger = AnswerLedger::new();
        ledger.set_answer(&catalog, 1, ranked("1a", "1b")).unwrap();
        ledger.clear();
        assert!(ledger.is_empty());
        assert_eq!(ledger.completed_count(), 0);
    }
}
