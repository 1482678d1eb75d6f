//! Translation lookup and interpolation
//!
//! Locale dictionaries are nested JSON documents addressed with dotted keys
//! such as `chatbot.responses.pricing`. A lookup that misses any path
//! segment resolves to the key itself so untranslated copy stays visible in
//! the transcript instead of failing.

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::language::Language;
use crate::{Error, Result};

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").expect("placeholder pattern is valid"));

/// A node of a locale dictionary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TranslationTree {
    Text(String),
    List(Vec<String>),
    Node(BTreeMap<String, TranslationTree>),
}

impl TranslationTree {
    fn child(&self, segment: &str) -> Option<Found<'_>> {
        match self {
            Self::Node(map) => map.get(segment).map(Found::Tree),
            // Positional access into arrays, e.g. `footer.links.0`
            Self::List(items) => segment
                .parse::<usize>()
                .ok()
                .and_then(|i| items.get(i))
                .map(|s| Found::Item(s.as_str())),
            Self::Text(_) => None,
        }
    }
}

enum Found<'a> {
    Tree(&'a TranslationTree),
    Item(&'a str),
}

impl Found<'_> {
    fn to_owned_tree(&self) -> TranslationTree {
        match self {
            Found::Tree(tree) => (*tree).clone(),
            Found::Item(s) => TranslationTree::Text((*s).to_string()),
        }
    }
}

/// Interpolation variables
///
/// Values are kept in their display form; `{name}` placeholders are
/// replaced with them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vars(HashMap<String, String>);

impl Vars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl std::fmt::Display) -> Self {
        self.0.insert(name.into(), value.to_string());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Replace `{name}` placeholders with values from `vars`
///
/// Placeholders without a matching variable are left untouched, braces
/// included.
pub fn interpolate(text: &str, vars: &Vars) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures<'_>| match vars.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Translation lookup used by anything that renders copy
pub trait Translator: Send + Sync {
    /// Language of the active dictionary
    fn language(&self) -> Language;

    /// Walk a dotted key; `None` if any segment is missing
    fn lookup(&self, key: &str) -> Option<TranslationTree>;

    /// Resolve a dotted key, echoing the key itself on a miss
    fn resolve(&self, key: &str) -> TranslationTree {
        self.lookup(key).unwrap_or_else(|| {
            tracing::debug!(language = self.language().code(), key, "Missing translation");
            TranslationTree::Text(key.to_string())
        })
    }

    /// Resolve a key to display text
    fn t(&self, key: &str) -> String {
        self.t_with(key, None)
    }

    /// Resolve a key to display text, interpolating `vars` when given
    ///
    /// A key that points at a list or a nested section has no single display
    /// string and renders as the key.
    fn t_with(&self, key: &str, vars: Option<&Vars>) -> String {
        match self.resolve(key) {
            TranslationTree::Text(text) => match vars {
                Some(vars) => interpolate(&text, vars),
                None => text,
            },
            _ => {
                tracing::debug!(key, "Translation is not a string");
                key.to_string()
            }
        }
    }
}

/// A complete locale dictionary for one language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationDictionary {
    language: Language,
    root: TranslationTree,
}

impl TranslationDictionary {
    /// Create a dictionary from an already-built tree
    ///
    /// The root must be a section (JSON object).
    pub fn new(language: Language, root: TranslationTree) -> Result<Self> {
        match root {
            TranslationTree::Node(_) => Ok(Self { language, root }),
            _ => Err(Error::Dictionary(format!(
                "root of the {} dictionary must be an object",
                language.code()
            ))),
        }
    }

    /// Parse a dictionary from JSON text
    pub fn from_json_str(language: Language, json: &str) -> Result<Self> {
        let root: TranslationTree = serde_json::from_str(json)?;
        Self::new(language, root)
    }

    /// Empty dictionary (every lookup echoes its key)
    pub fn empty(language: Language) -> Self {
        Self {
            language,
            root: TranslationTree::Node(BTreeMap::new()),
        }
    }

    fn walk(&self, key: &str) -> Option<Found<'_>> {
        let mut current = Found::Tree(&self.root);
        for segment in key.split('.') {
            current = match current {
                Found::Tree(tree) => tree.child(segment)?,
                Found::Item(_) => return None,
            };
        }
        Some(current)
    }
}

impl Translator for TranslationDictionary {
    fn language(&self) -> Language {
        self.language
    }

    fn lookup(&self, key: &str) -> Option<TranslationTree> {
        self.walk(key).map(|found| found.to_owned_tree())
    }

    fn t_with(&self, key: &str, vars: Option<&Vars>) -> String {
        // Avoid cloning whole sections just to find out they are not text
        let text = match self.walk(key) {
            Some(Found::Tree(TranslationTree::Text(text))) => text.as_str(),
            Some(Found::Item(text)) => text,
            Some(_) => {
                tracing::debug!(key, "Translation is not a string");
                return key.to_string();
            }
            None => {
                tracing::debug!(language = self.language.code(), key, "Missing translation");
                return key.to_string();
            }
        };

        match vars {
            Some(vars) => interpolate(text, vars),
            None => text.to_string(),
        }
    }
}
