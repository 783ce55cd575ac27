//! TOML-based application configuration.
//!
//! Stores the answer-collection mode and review-step behavior.
//! Configuration is stored at `~/.config/arquetipo/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::ledger::AnswerMode;

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/arquetipo/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Which answer shape the product collects per block.
    #[serde(default)]
    pub answer_mode: AnswerMode,
    /// Whether the review step demands a final consent check before
    /// computing results.
    #[serde(default = "default_true")]
    pub require_final_consent: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            answer_mode: AnswerMode::default(),
            require_final_consent: true,
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(Self::path()?, content)?;
        Ok(())
    }

    /// Get a config value as string by key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "answer_mode" => Some(
                match self.answer_mode {
                    AnswerMode::SingleChoice => "single_choice",
                    AnswerMode::ForcedRank => "forced_rank",
                }
                .to_string(),
            ),
            "require_final_consent" => Some(self.require_final_consent.to_string()),
            _ => None,
        }
    }

    /// Set a config value by key and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be
    /// parsed, or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        match key {
            "answer_mode" => self.answer_mode = value.parse()?,
            "require_final_consent" => self.require_final_consent = value.parse()?,
            other => return Err(format!("unknown config key: {other}").into()),
        }
        self.save()?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}
