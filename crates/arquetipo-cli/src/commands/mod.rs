pub mod answer;
pub mod catalog;
pub mod config;
pub mod respondent;
pub mod results;
pub mod wizard;

use arquetipo_core::storage::{Config, Database, DbSessionStore};
use arquetipo_core::{AssessmentSession, QuestionCatalog};

/// Open (or resume) the assessment session backed by the default
/// database, honoring the configured answer mode and consent gate.
pub fn open_session() -> Result<AssessmentSession, Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = Database::open()?;
    let session = AssessmentSession::open(
        QuestionCatalog::default(),
        config.answer_mode,
        config.require_final_consent,
        Box::new(DbSessionStore::new(db)),
    )?;
    Ok(session)
}
