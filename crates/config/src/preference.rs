//! Persisted locale preference
//!
//! The visitor's language choice outlives the chat widget. It is stored as
//! a tiny JSON document, e.g. `{"language":"ar"}`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use vendchat_core::Language;

use crate::ConfigError;

#[derive(Debug, Serialize, Deserialize)]
struct StoredPreference {
    language: Language,
}

/// File-backed language preference
#[derive(Debug, Clone)]
pub struct LocalePreferenceStore {
    path: PathBuf,
    fallback: Language,
}

impl LocalePreferenceStore {
    pub fn new(path: impl Into<PathBuf>, fallback: Language) -> Self {
        Self {
            path: path.into(),
            fallback,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saved language, or the fallback if nothing usable is stored
    pub fn load(&self) -> Language {
        match self.try_load() {
            Ok(Some(language)) => language,
            Ok(None) => self.fallback,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Ignoring unreadable locale preference"
                );
                self.fallback
            }
        }
    }

    fn try_load(&self) -> Result<Option<Language>, ConfigError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        let stored: StoredPreference =
            serde_json::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        Ok(Some(stored.language))
    }

    /// Persist a language choice
    pub fn save(&self, language: Language) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string(&StoredPreference { language })
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        std::fs::write(&self.path, content)?;
        tracing::debug!(
            path = %self.path.display(),
            language = language.code(),
            "Saved locale preference"
        );
        Ok(())
    }
}
