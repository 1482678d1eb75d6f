//! Keyword tables
//!
//! The assistant does no language modelling: intents and visitor
//! preferences are recognised by substring matches against these tables.
//! Each table mixes English and Arabic tokens. Tables can be replaced by a
//! YAML file:
//!
//! ```yaml
//! intents:
//!   - intent: pricing
//!     keywords: [price, cost, سعر]
//! budget: [budget, ميزانية]
//! industry: [office, مكتب]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use vendchat_core::IntentKind;

use crate::ConfigError;

/// Keywords for a single intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentKeywords {
    pub intent: IntentKind,
    pub keywords: Vec<String>,
}

impl IntentKeywords {
    pub fn new(intent: IntentKind, keywords: &[&str]) -> Self {
        Self {
            intent,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// All keyword tables used by the assistant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordTables {
    #[serde(default = "default_intents")]
    pub intents: Vec<IntentKeywords>,

    /// Words signalling the visitor cares about cost
    #[serde(default = "default_budget")]
    pub budget: Vec<String>,

    /// Words naming the visitor's sector or venue
    #[serde(default = "default_industry")]
    pub industry: Vec<String>,
}

impl Default for KeywordTables {
    fn default() -> Self {
        Self {
            intents: default_intents(),
            budget: default_budget(),
            industry: default_industry(),
        }
    }
}

impl KeywordTables {
    /// Load tables from a YAML file
    ///
    /// Sections missing from the file keep their built-in content.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        let tables: Self =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        let tables = tables.normalized();
        tables.validate()?;

        tracing::debug!(
            path = %path.display(),
            intents = tables.intents.len(),
            "Loaded keyword tables"
        );
        Ok(tables)
    }

    /// Load from an optional override path, falling back to built-in tables
    pub fn load_or_default(path: Option<&str>) -> Self {
        match path {
            Some(path) => Self::from_yaml_file(path).unwrap_or_else(|e| {
                tracing::warn!(
                    path,
                    error = %e,
                    "Failed to load keyword tables, using built-in tables"
                );
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// Lower-case and trim every keyword, dropping empty ones
    pub fn normalized(mut self) -> Self {
        fn clean(words: &mut Vec<String>) {
            *words = words
                .iter()
                .map(|w| w.trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect();
        }

        for table in &mut self.intents {
            clean(&mut table.keywords);
        }
        clean(&mut self.budget);
        clean(&mut self.industry);
        self
    }

    /// Validate tables
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for table in &self.intents {
            if table.intent == IntentKind::Default {
                return Err(ConfigError::InvalidValue {
                    field: "intents".to_string(),
                    message: "The default intent is a fallback and cannot have keywords"
                        .to_string(),
                });
            }
            if !seen.insert(table.intent) {
                return Err(ConfigError::InvalidValue {
                    field: "intents".to_string(),
                    message: format!("Intent '{}' is listed more than once", table.intent),
                });
            }
        }
        Ok(())
    }

    /// Keywords for an intent (empty when the intent has no table)
    pub fn keywords_for(&self, intent: IntentKind) -> &[String] {
        self.intents
            .iter()
            .find(|t| t.intent == intent)
            .map(|t| t.keywords.as_slice())
            .unwrap_or(&[])
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

fn default_intents() -> Vec<IntentKeywords> {
    vec![
        IntentKeywords::new(
            IntentKind::Greeting,
            &[
                "hello", "good morning", "good afternoon", "good evening", "greetings",
                "مرحبا", "أهلا", "اهلا", "السلام عليكم", "صباح الخير", "مساء الخير",
            ],
        ),
        IntentKeywords::new(
            IntentKind::Pricing,
            &[
                "price", "pricing", "cost", "how much", "expensive", "cheap", "afford",
                "سعر", "أسعار", "اسعار", "تكلفة", "بكم", "ميزانية",
            ],
        ),
        IntentKeywords::new(
            IntentKind::Products,
            &[
                "product", "machine", "vending", "snack", "coffee", "beverage", "drink", "catalog",
                "منتج", "منتجات", "آلة", "آلات", "ماكينة", "مكينة", "قهوة", "مشروبات",
                "وجبات خفيفة",
            ],
        ),
        IntentKeywords::new(
            IntentKind::Features,
            &[
                "feature", "touchscreen", "touch screen", "cashless", "smart", "specification",
                "specs",
                "مميزات", "ميزات", "خصائص", "شاشة", "ذكية",
            ],
        ),
        IntentKeywords::new(
            IntentKind::Contact,
            &[
                "contact", "phone", "call", "email", "whatsapp", "reach", "talk to",
                "اتصال", "تواصل", "هاتف", "واتساب", "بريد", "رقم",
            ],
        ),
        IntentKeywords::new(
            IntentKind::Quote,
            &[
                "quote", "quotation", "proposal", "estimate", "offer",
                "عرض سعر", "عرض", "تسعيرة",
            ],
        ),
        IntentKeywords::new(
            IntentKind::Support,
            &[
                "support", "help", "problem", "issue", "broken", "not working", "repair",
                "دعم", "مساعدة", "مشكلة", "عطل", "إصلاح", "اصلاح",
            ],
        ),
        IntentKeywords::new(
            IntentKind::Company,
            &[
                "company", "about us", "who are you", "history", "experience", "team",
                "شركة", "من نحن", "من أنتم", "خبرة", "فريق",
            ],
        ),
        IntentKeywords::new(
            IntentKind::Industries,
            &[
                "industry", "industries", "sector", "office", "school", "hospital", "university",
                "gym", "shopping mall", "hotel", "factory",
                "قطاع", "مكتب", "مدرسة", "مستشفى", "جامعة", "نادي", "فندق", "مصنع",
            ],
        ),
        IntentKeywords::new(
            IntentKind::Installation,
            &[
                "install", "installation", "setup", "set up", "delivery", "deliver",
                "تركيب", "تثبيت", "توصيل",
            ],
        ),
        IntentKeywords::new(
            IntentKind::Maintenance,
            &[
                "maintenance", "maintain", "servicing", "refill", "restock", "cleaning",
                "صيانة", "تعبئة", "تنظيف",
            ],
        ),
        IntentKeywords::new(
            IntentKind::Payment,
            &[
                "payment", "pay", "card", "cash", "installment", "financing", "invoice",
                "دفع", "بطاقة", "نقدا", "تقسيط", "فاتورة",
            ],
        ),
        IntentKeywords::new(
            IntentKind::Analytics,
            &[
                "analytics", "report", "dashboard", "statistics", "sales data", "monitoring",
                "tracking",
                "تحليلات", "تقارير", "تقرير", "لوحة تحكم", "إحصائيات", "مراقبة",
            ],
        ),
    ]
}

fn default_budget() -> Vec<String> {
    words(&[
        "budget", "limited", "affordable", "cheap", "low cost", "expensive", "price range",
        "ميزانية", "محدودة", "رخيص", "اقتصادي", "تكلفة منخفضة",
    ])
}

fn default_industry() -> Vec<String> {
    words(&[
        "office", "school", "hospital", "university", "gym", "shopping mall", "hotel", "factory",
        "airport", "retail",
        "مكتب", "مدرسة", "مستشفى", "جامعة", "نادي", "فندق", "مصنع", "مطار",
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_builtin_tables_cover_every_intent() {
        let tables = KeywordTables::default();
        assert!(tables.validate().is_ok());
        for intent in IntentKind::CLASSIFIABLE {
            assert!(!tables.keywords_for(intent).is_empty(), "no keywords for {}", intent);
        }
        assert!(tables.keywords_for(IntentKind::Default).is_empty());
    }

    #[test]
    fn test_builtin_tables_are_normalized() {
        let tables = KeywordTables::default();
        assert_eq!(tables.clone().normalized(), tables);
    }

    #[test]
    fn test_yaml_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keywords.yaml");
        fs::write(
            &path,
            concat!(
                "intents:\n",
                "  - intent: pricing\n",
                "    keywords: [\" PRICE \", \"\", سعر]\n",
                "budget: [Cheap]\n",
            ),
        )
        .unwrap();

        let tables = KeywordTables::from_yaml_file(&path).unwrap();
        assert_eq!(tables.intents.len(), 1);
        assert_eq!(tables.keywords_for(IntentKind::Pricing), ["price", "سعر"]);
        assert_eq!(tables.budget, vec!["cheap"]);
        // Section absent from the file keeps built-in content
        assert!(tables.industry.contains(&"office".to_string()));
    }

    #[test]
    fn test_rejects_default_and_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");

        fs::write(&path, "intents:\n  - intent: default\n    keywords: [x]\n").unwrap();
        assert!(KeywordTables::from_yaml_file(&path).is_err());

        fs::write(
            &path,
            concat!(
                "intents:\n",
                "  - intent: quote\n",
                "    keywords: [x]\n",
                "  - intent: quote\n",
                "    keywords: [y]\n",
            ),
        )
        .unwrap();
        assert!(KeywordTables::from_yaml_file(&path).is_err());
    }

    #[test]
    fn test_missing_override_falls_back() {
        let tables = KeywordTables::load_or_default(Some("/no/such/keywords.yaml"));
        assert_eq!(tables, KeywordTables::default());
        assert!(matches!(
            KeywordTables::from_yaml_file("/no/such/keywords.yaml"),
            Err(ConfigError::FileNotFound(_))
        ));
    }
}
