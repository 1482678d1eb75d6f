//! Locale dictionaries
//!
//! English and Arabic dictionaries are compiled into the binary. A
//! deployment can override either one by dropping `<code>.json` into the
//! configured locales directory.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use vendchat_core::{Language, TranslationDictionary};

use crate::ConfigError;

const EMBEDDED_EN: &str = include_str!("../locales/en.json");
const EMBEDDED_AR: &str = include_str!("../locales/ar.json");

fn embedded_source(language: Language) -> &'static str {
    match language {
        Language::English => EMBEDDED_EN,
        Language::Arabic => EMBEDDED_AR,
    }
}

/// One dictionary per supported language
#[derive(Debug, Clone)]
pub struct LocaleCatalog {
    dictionaries: HashMap<Language, Arc<TranslationDictionary>>,
}

impl LocaleCatalog {
    /// Catalog built from the embedded dictionaries
    pub fn builtin() -> Result<Self, ConfigError> {
        let mut dictionaries = HashMap::new();
        for &language in Language::all() {
            let dictionary =
                TranslationDictionary::from_json_str(language, embedded_source(language))?;
            dictionaries.insert(language, Arc::new(dictionary));
        }
        Ok(Self { dictionaries })
    }

    /// Catalog read from `<dir>/<code>.json`
    ///
    /// Languages without a file keep the embedded dictionary. A file that
    /// exists but does not parse is an error.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        let mut catalog = Self::builtin()?;

        for &language in Language::all() {
            let path = dir.join(format!("{}.json", language.code()));
            if !path.is_file() {
                tracing::debug!(
                    path = %path.display(),
                    "No locale override, using embedded dictionary"
                );
                continue;
            }

            let content = std::fs::read_to_string(&path)?;
            let dictionary = TranslationDictionary::from_json_str(language, &content).map_err(|e| {
                ConfigError::ParseError(format!("{}: {}", path.display(), e))
            })?;
            tracing::info!(
                language = language.code(),
                path = %path.display(),
                "Loaded locale override"
            );
            catalog.dictionaries.insert(language, Arc::new(dictionary));
        }

        Ok(catalog)
    }

    /// Catalog for an optional override directory
    pub fn load(dir: Option<&str>) -> Result<Self, ConfigError> {
        match dir {
            Some(dir) if Path::new(dir).is_dir() => Self::from_dir(dir),
            _ => Self::builtin(),
        }
    }

    /// Dictionary for a language
    pub fn dictionary(&self, language: Language) -> Arc<TranslationDictionary> {
        self.dictionaries
            .get(&language)
            .cloned()
            .unwrap_or_else(|| Arc::new(TranslationDictionary::empty(language)))
    }
}
