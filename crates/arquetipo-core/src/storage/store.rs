//! Durable session state.
//!
//! Four independent records make up a persisted session: wizard
//! position, answer ledger, respondent, last result. Persistence is
//! an injected capability of the session controller: loaded once at
//! startup, written after every mutation, last write wins.

use std::cell::RefCell;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, StorageError};
use crate::ledger::AnswerLedger;
use crate::respondent::Respondent;
use crate::scoring::ResultRecord;

use super::database::Database;

const KEY_POSITION: &str = "wizard_position";
const KEY_ANSWERS: &str = "answers";
const KEY_RESPONDENT: &str = "respondent";
const KEY_RESULT: &str = "last_result";
const KEY_FINAL_CONSENT: &str = "final_consent";

/// The persisted shape of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedSession {
    pub wizard_position: u32,
    pub answers: AnswerLedger,
    pub respondent: Option<Respondent>,
    pub last_result: Option<ResultRecord>,
    /// Final consent checked on the review step.
    #[serde(default)]
    pub final_consent: bool,
}

impl Default for PersistedSession {
    fn default() -> Self {
        Self {
            wizard_position: 1,
            answers: AnswerLedger::new(),
            respondent: None,
            last_result: None,
            final_consent: false,
        }
    }
}

/// Durable side channel for session state.
pub trait SessionStore {
    /// Read the persisted session, or the empty default if none exists.
    fn load(&self) -> Result<PersistedSession, CoreError>;

    /// Write the full session state.
    fn save(&self, state: &PersistedSession) -> Result<(), CoreError>;

    /// Remove every persisted record.
    fn clear(&self) -> Result<(), CoreError>;
}

/// Session store over the SQLite kv table.
pub struct DbSessionStore {
    db: Database,
}

impl DbSessionStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Access the underlying database (submission history lives there).
    pub fn database(&self) -> &Database {
        &self.db
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CoreError> {
        match self.db.kv_get(key)? {
            Some(json) => {
                let value = serde_json::from_str(&json).map_err(|e| {
                    CoreError::Storage(StorageError::CorruptRecord {
                        key: key.to_string(),
                        message: e.to_string(),
                    })
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CoreError> {
        let json = serde_json::to_string(value)?;
        self.db.kv_set(key, &json)?;
        Ok(())
    }
}

impl SessionStore for DbSessionStore {
    fn load(&self) -> Result<PersistedSession, CoreError> {
        Ok(PersistedSession {
            wizard_position: self.get_json(KEY_POSITION)?.unwrap_or(1),
            answers: self.get_json(KEY_ANSWERS)?.unwrap_or_default(),
            respondent: self.get_json(KEY_RESPONDENT)?,
            last_result: self.get_json(KEY_RESULT)?,
            final_consent: self.get_json(KEY_FINAL_CONSENT)?.unwrap_or(false),
        })
    }

    fn save(&self, state: &PersistedSession) -> Result<(), CoreError> {
        self.set_json(KEY_POSITION, &state.wizard_position)?;
        self.set_json(KEY_ANSWERS, &state.answers)?;
        match &state.respondent {
            Some(r) => self.set_json(KEY_RESPONDENT, r)?,
            None => self.db.kv_delete(KEY_RESPONDENT)?,
        }
        match &state.last_result {
            Some(r) => self.set_json(KEY_RESULT, r)?,
            None => self.db.kv_delete(KEY_RESULT)?,
        }
        self.set_json(KEY_FINAL_CONSENT, &state.final_consent)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        for key in [
            KEY_POSITION,
            KEY_ANSWERS,
            KEY_RESPONDENT,
            KEY_RESULT,
            KEY_FINAL_CONSENT,
        ] {
            self.db.kv_delete(key)?;
        }
        Ok(())
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    state: RefCell<Option<PersistedSession>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<PersistedSession, CoreError> {
        Ok(self.state.borrow().clone().unwrap_or_default())
    }

    fn save(&self, state: &PersistedSession) -> Result<(), CoreError> {
        *self.state.borrow_mut() = Some(state.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        *self.state.borrow_mut() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::QuestionCatalog;
    use crate::ledger::BlockAnswer;

    fn sample_state() -> PersistedSession {
        let catalog = QuestionCatalog::default();
        let mut answers = AnswerLedger::new();
        answers
            .set_answer(
                &catalog,
                1,
                BlockAnswer::Ranked {
                    most_id: "1a".to_string(),
                    least_id: "1d".to_string(),
                },
            )
            .unwrap();
        PersistedSession {
            wizard_position: 4,
            answers,
            respondent: Some(Respondent {
                name: "Ana Souza".to_string(),
                whatsapp: "11987654321".to_string(),
                email: "ana@example.com".to_string(),
                consent_given: true,
            }),
            last_result: None,
            final_consent: true,
        }
    }

    #[test]
    fn db_store_roundtrips_the_session() {
        let store = DbSessionStore::new(Database::open_memory().unwrap());
        let state = sample_state();
        store.save(&state).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.wizard_position, 4);
        assert_eq!(loaded.answers.completed_count(), 1);
        assert_eq!(loaded.respondent.unwrap().name, "Ana Souza");
        assert!(loaded.last_result.is_none());
        assert!(loaded.final_consent);
    }

    #[test]
    fn db_store_load_defaults_when_empty() {
        let store = DbSessionStore::new(Database::open_memory().unwrap());
        let loaded = store.load().unwrap();
        assert_eq!(loaded.wizard_position, 1);
        assert!(loaded.answers.is_empty());
        assert!(loaded.respondent.is_none());
    }

    #[test]
    fn db_store_clear_removes_all_records() {
        let store = DbSessionStore::new(Database::open_memory().unwrap());
        store.save(&sample_state()).unwrap();
        store.clear().unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.wizard_position, 1);
        assert!(loaded.answers.is_empty());
        assert!(loaded.respondent.is_none());
        assert!(!loaded.final_consent);
    }

    #[test]
    fn corrupt_record_surfaces_typed_error() {
        let db = Database::open_memory().unwrap();
        db.kv_set("answers", "not json").unwrap();
        let store = DbSessionStore::new(db);
        let err = store.load().unwrap_err();
        assert!(matches!(
            err,
            CoreError::Storage(StorageError::CorruptRecord { .. })
        ));
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryStore::new();
        store.save(&sample_state()).unwrap();
        assert_eq!(store.load().unwrap().wizard_position, 4);
        store.clear().unwrap();
        assert_eq!(store.load().unwrap().wizard_position, 1);
    }
}
