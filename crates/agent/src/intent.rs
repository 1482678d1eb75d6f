//! Intent Detection
//!
//! Counts how many of each intent's keywords occur in the visitor's
//! utterance and recent context. Matching is plain substring containment,
//! so "prices" matches "price" and compound words can trigger a category
//! they do not belong to.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use vendchat_config::KeywordTables;
use vendchat_core::IntentKind;

/// Keyword hits for one intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentScore {
    pub intent: IntentKind,
    pub count: usize,
}

/// Classification result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedIntent {
    /// Winning intent, `Default` when nothing matched
    pub intent: IntentKind,
    /// Number of distinct keywords of the winner found in the haystack
    pub count: usize,
    /// Keywords of the winner that matched
    pub matched: Vec<String>,
}

impl DetectedIntent {
    fn fallback() -> Self {
        Self {
            intent: IntentKind::Default,
            count: 0,
            matched: Vec::new(),
        }
    }
}

/// Intent detector
pub struct IntentDetector {
    /// Keyword sets in tie-break order
    tables: RwLock<Vec<(IntentKind, Vec<String>)>>,
}

impl IntentDetector {
    /// Create a detector over the given keyword tables
    pub fn new(keywords: &KeywordTables) -> Self {
        Self {
            tables: RwLock::new(Self::ordered(keywords)),
        }
    }

    /// Swap in new keyword tables
    pub fn reload(&self, keywords: &KeywordTables) {
        *self.tables.write() = Self::ordered(keywords);
        tracing::info!("Reloaded intent keyword tables");
    }

    // Tie-break order is fixed by `IntentKind::CLASSIFIABLE`, whatever order
    // the tables were written in.
    fn ordered(keywords: &KeywordTables) -> Vec<(IntentKind, Vec<String>)> {
        IntentKind::CLASSIFIABLE
            .iter()
            .map(|&intent| {
                let words = keywords
                    .keywords_for(intent)
                    .iter()
                    .map(|w| w.to_lowercase())
                    .collect();
                (intent, words)
            })
            .collect()
    }

    /// Build the search surface for an utterance and its recent context
    pub fn haystack<'a>(utterance: &str, context: impl IntoIterator<Item = &'a str>) -> String {
        let mut haystack = utterance.to_lowercase();
        for entry in context {
            haystack.push(' ');
            haystack.push_str(&entry.to_lowercase());
        }
        haystack
    }

    /// Keyword hit counts for every classifiable intent, in tie-break order
    pub fn score(&self, haystack: &str) -> Vec<IntentScore> {
        let haystack = haystack.to_lowercase();
        self.tables
            .read()
            .iter()
            .map(|(intent, words)| IntentScore {
                intent: *intent,
                count: words.iter().filter(|w| haystack.contains(w.as_str())).count(),
            })
            .collect()
    }

    /// Classify an utterance, using recent context as extra match surface
    ///
    /// The strictly highest count wins; on a tie the intent earlier in
    /// tie-break order is kept. No hits at all yields `Default`.
    pub fn classify<'a>(
        &self,
        utterance: &str,
        context: impl IntoIterator<Item = &'a str>,
    ) -> DetectedIntent {
        let haystack = Self::haystack(utterance, context);
        self.classify_haystack(&haystack)
    }

    /// Classify a prepared haystack
    pub fn classify_haystack(&self, haystack: &str) -> DetectedIntent {
        let mut best: Option<IntentScore> = None;
        for candidate in self.score(haystack) {
            let current = best.as_ref().map(|b| b.count).unwrap_or(0);
            if candidate.count > current {
                best = Some(candidate);
            }
        }

        let Some(best) = best else {
            tracing::debug!("No intent keywords matched");
            return DetectedIntent::fallback();
        };

        let haystack = haystack.to_lowercase();
        let matched = self
            .tables
            .read()
            .iter()
            .find(|(intent, _)| *intent == best.intent)
            .map(|(_, words)| {
                words
                    .iter()
                    .filter(|w| haystack.contains(w.as_str()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        tracing::debug!(intent = %best.intent, count = best.count, "Detected intent");
        DetectedIntent {
            intent: best.intent,
            count: best.count,
            matched,
        }
    }
}
