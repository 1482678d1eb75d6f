//! Visitor preference signals
//!
//! When an utterance mentions money or a venue, the whole utterance is kept
//! so the reply can refer back to it. Later mentions replace earlier ones.

use serde::{Deserialize, Serialize};

use vendchat_config::KeywordTables;

/// Signals gathered during a session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Last utterance that mentioned budget or cost
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_signal: Option<String>,
    /// Last utterance that mentioned a sector or venue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry_signal: Option<String>,
}

impl Preferences {
    /// Overwrite fields present in `update`, keep the rest
    pub fn merge(&mut self, update: Preferences) {
        if update.budget_signal.is_some() {
            self.budget_signal = update.budget_signal;
        }
        if update.industry_signal.is_some() {
            self.industry_signal = update.industry_signal;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.budget_signal.is_none() && self.industry_signal.is_none()
    }
}

/// Extracts preference signals from utterances
#[derive(Debug, Clone)]
pub struct PreferenceExtractor {
    budget: Vec<String>,
    industry: Vec<String>,
}

impl PreferenceExtractor {
    pub fn new(keywords: &KeywordTables) -> Self {
        Self {
            budget: keywords.budget.iter().map(|w| w.to_lowercase()).collect(),
            industry: keywords.industry.iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    /// Signals carried by one utterance
    ///
    /// Each signal holds the original utterance text, not the keyword.
    pub fn extract(&self, utterance: &str) -> Preferences {
        let lower = utterance.to_lowercase();
        let mentions = |words: &[String]| words.iter().any(|w| lower.contains(w.as_str()));

        Preferences {
            budget_signal: mentions(&self.budget).then(|| utterance.to_string()),
            industry_signal: mentions(&self.industry).then(|| utterance.to_string()),
        }
    }

    /// Extract and merge into existing preferences
    pub fn apply(&self, preferences: &mut Preferences, utterance: &str) {
        let update = self.extract(utterance);
        if !update.is_empty() {
            tracing::debug!(
                budget = update.budget_signal.is_some(),
                industry = update.industry_signal.is_some(),
                "Captured preference signal"
            );
        }
        preferences.merge(update);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> PreferenceExtractor {
        PreferenceExtractor::new(&KeywordTables::default())
    }

    #[test]
    fn test_budget_signal_keeps_full_utterance() {
        let mut prefs = Preferences::default();
        extractor().apply(&mut prefs, "I have a limited budget");
        assert_eq!(prefs.budget_signal.as_deref(), Some("I have a limited budget"));
        assert_eq!(prefs.industry_signal, None);
    }

    #[test]
    fn test_unrelated_turn_keeps_signals() {
        let extractor = extractor();
        let mut prefs = Preferences::default();
        extractor.apply(&mut prefs, "I have a limited budget");
        extractor.apply(&mut prefs, "just checking products");
        assert_eq!(prefs.budget_signal.as_deref(), Some("I have a limited budget"));
    }

    #[test]
    fn test_last_write_wins_per_field() {
        let extractor = extractor();
        let mut prefs = Preferences::default();
        extractor.apply(&mut prefs, "We run a hotel");
        extractor.apply(&mut prefs, "Something affordable please");
        extractor.apply(&mut prefs, "Actually it is for a school");
        assert_eq!(prefs.budget_signal.as_deref(), Some("Something affordable please"));
        assert_eq!(prefs.industry_signal.as_deref(), Some("Actually it is for a school"));
    }

    #[test]
    fn test_both_signals_from_one_utterance() {
        let update = extractor().extract("ميزانية محدودة لمكتب صغير");
        assert!(update.budget_signal.is_some());
        assert!(update.industry_signal.is_some());
    }

    #[test]
    fn test_serialization_skips_missing_signals() {
        let prefs = Preferences {
            budget_signal: Some("cheap".to_string()),
            industry_signal: None,
        };
        assert_eq!(serde_json::to_string(&prefs).unwrap(), r#"{"budget_signal":"cheap"}"#);
    }
}
