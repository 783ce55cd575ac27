//! Scoring engine: answers in, normalized percentages and a single
//! predominant archetype out.
//!
//! [`compute_results`] is a pure function over the ledger and catalog.
//! It never partially fails: either the ledger has at least one entry
//! and a complete, invariant-respecting [`ResultRecord`] comes back,
//! or it fails with [`ScoringError::EmptyLedger`]. Partial ledgers are
//! scored as-is; gating "may the respondent request scoring" is the
//! session controller's job, not the engine's.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{Archetype, QuestionCatalog};
use crate::error::ScoringError;
use crate::ledger::{AnswerLedger, BlockAnswer};

/// Per-archetype score breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArchetypeScore {
    /// Net tally: +1 per most/selected, -1 per least.
    pub raw: i32,
    /// Normalized share, 0..=100. The four percentages sum to 100.
    pub percentage: i32,
    /// Times chosen as most/selected. Tie-break input only.
    pub most_count: u32,
    /// Times chosen as least. Tie-break input only.
    pub least_count: u32,
}

/// Immutable scoring outcome for one ledger.
///
/// Regenerating a record means recomputing from the ledger; records
/// are never mutated incrementally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub warrior: ArchetypeScore,
    pub king: ArchetypeScore,
    pub lover: ArchetypeScore,
    pub mage: ArchetypeScore,
    pub predominant: Archetype,
    pub computed_at: DateTime<Utc>,
}

impl ResultRecord {
    /// The score for one archetype.
    pub fn score(&self, archetype: Archetype) -> &ArchetypeScore {
        match archetype {
            Archetype::Warrior => &self.warrior,
            Archetype::King => &self.king,
            Archetype::Lover => &self.lover,
            Archetype::Mage => &self.mage,
        }
    }

    /// (archetype, score) pairs in declaration order.
    pub fn scores(&self) -> [(Archetype, &ArchetypeScore); 4] {
        [
            (Archetype::Warrior, &self.warrior),
            (Archetype::King, &self.king),
            (Archetype::Lover, &self.lover),
            (Archetype::Mage, &self.mage),
        ]
    }
}

fn index_of(archetype: Archetype) -> usize {
    match archetype {
        Archetype::Warrior => 0,
        Archetype::King => 1,
        Archetype::Lover => 2,
        Archetype::Mage => 3,
    }
}

/// Compute the full result record from a ledger.
///
/// Rounding rule: percentages use round half away from zero
/// (`f64::round`), matching the original product's runtime default.
/// Because independently rounded shares need not sum to 100, any
/// remainder is added to the single highest percentage, scanning
/// archetypes in declaration order on ties.
///
/// Ledger entries referencing unknown blocks or options are skipped
/// rather than rejected; `AnswerLedger::set_answer` makes them
/// unreachable in practice, but scoring stays total.
///
/// # Errors
/// [`ScoringError::EmptyLedger`] if the ledger has zero entries.
pub fn compute_results(
    ledger: &AnswerLedger,
    catalog: &QuestionCatalog,
) -> Result<ResultRecord, ScoringError> {
    if ledger.is_empty() {
        return Err(ScoringError::EmptyLedger);
    }

    let mut raw = [0i32; 4];
    let mut most_counts = [0u32; 4];
    let mut least_counts = [0u32; 4];

    for (block_id, answer) in ledger.iter() {
        let Some(block) = catalog.block(block_id) else {
            continue;
        };
        match answer {
            BlockAnswer::Single { option_id } => {
                if let Some(option) = block.option(option_id) {
                    let i = index_of(option.archetype);
                    raw[i] += 1;
                    most_counts[i] += 1;
                }
            }
            BlockAnswer::Ranked { most_id, least_id } => {
                if let Some(option) = block.option(most_id) {
                    let i = index_of(option.archetype);
                    raw[i] += 1;
                    most_counts[i] += 1;
                }
                if let Some(option) = block.option(least_id) {
                    let i = index_of(option.archetype);
                    raw[i] -= 1;
                    least_counts[i] += 1;
                }
            }
        }
    }

    let percentages = to_percentages(&raw);

    let score_at = |i: usize| ArchetypeScore {
        raw: raw[i],
        percentage: percentages[i],
        most_count: most_counts[i],
        least_count: least_counts[i],
    };

    let scores = [score_at(0), score_at(1), score_at(2), score_at(3)];
    let predominant = predominant_archetype(&scores);

    Ok(ResultRecord {
        warrior: scores[0],
        king: scores[1],
        lover: scores[2],
        mage: scores[3],
        predominant,
        computed_at: Utc::now(),
    })
}

/// Min-shift normalization to whole percentages summing to exactly 100.
fn to_percentages(raw: &[i32; 4]) -> [i32; 4] {
    let min = *raw.iter().min().unwrap_or(&0);
    let max = *raw.iter().max().unwrap_or(&0);

    // All tied (including all-zero): an even 4-way split is exact.
    if min == max {
        return [25; 4];
    }

    let shifted: Vec<i32> = raw.iter().map(|s| s - min).collect();
    let total: i32 = shifted.iter().sum();

    let mut percentages = [0i32; 4];
    for (i, s) in shifted.iter().enumerate() {
        percentages[i] = ((*s as f64 / total as f64) * 100.0).round() as i32;
    }

    // Independent rounding can miss 100; pin the remainder on the
    // single highest percentage, first in declaration order on ties.
    let sum: i32 = percentages.iter().sum();
    if sum != 100 {
        let highest = (0..4)
            .max_by_key(|&i| (percentages[i], std::cmp::Reverse(i)))
            .unwrap_or(0);
        percentages[highest] += 100 - sum;
    }

    percentages
}

/// Ordered tie-break cascade selecting exactly one archetype.
///
/// 1. Highest percentage, if strictly ahead.
/// 2. Among percentage-tied: highest most_count, if strictly ahead.
/// 3. Among those still tied: lowest least_count, if strictly ahead.
/// 4. Declaration order (warrior, king, lover, mage).
fn predominant_archetype(scores: &[ArchetypeScore; 4]) -> Archetype {
    let mut tied: Vec<usize> = (0..4).collect();

    let top_pct = tied.iter().map(|&i| scores[i].percentage).max().unwrap_or(0);
    tied.retain(|&i| scores[i].percentage == top_pct);
    if let [winner] = tied[..] {
        return Archetype::ALL[winner];
    }

    let top_most = tied.iter().map(|&i| scores[i].most_count).max().unwrap_or(0);
    tied.retain(|&i| scores[i].most_count == top_most);
    if let [winner] = tied[..] {
        return Archetype::ALL[winner];
    }

    let low_least = tied.iter().map(|&i| scores[i].least_count).min().unwrap_or(0);
    tied.retain(|&i| scores[i].least_count == low_least);

    // Remaining candidates are indistinguishable on every score; the
    // fixed priority order terminates the cascade.
    Archetype::ALL[tied[0]]
}
