//! Language definitions for the assistant
//!
//! The site ships English and Arabic copy. Arabic is rendered right-to-left,
//! so every language also carries its script and text direction.

use serde::{Deserialize, Serialize};

/// Supported languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ar")]
    Arabic,
}

impl Language {
    /// Get ISO 639-1 code
    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Arabic => "ar",
        }
    }

    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Arabic => "Arabic",
        }
    }

    /// Name of the language written in itself, as shown in the language switcher
    pub fn native_name(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Arabic => "العربية",
        }
    }

    /// Get script used by this language
    pub fn script(&self) -> Script {
        match self {
            Self::English => Script::Latin,
            Self::Arabic => Script::Arabic,
        }
    }

    /// Check if this language uses right-to-left script
    pub fn is_rtl(&self) -> bool {
        matches!(self.script(), Script::Arabic)
    }

    /// Text direction for layout
    pub fn direction(&self) -> TextDirection {
        if self.is_rtl() {
            TextDirection::Rtl
        } else {
            TextDirection::Ltr
        }
    }

    /// Parse from string (case-insensitive)
    pub fn from_str_loose(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "en" | "eng" | "english" => Some(Self::English),
            "ar" | "ara" | "arabic" | "العربية" => Some(Self::Arabic),
            _ => None,
        }
    }

    /// Get all supported languages
    pub fn all() -> &'static [Language] {
        &[Self::English, Self::Arabic]
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Language {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_loose(s).ok_or_else(|| crate::Error::UnknownLanguage(s.to_string()))
    }
}

/// Horizontal text direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl TextDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }
}

/// Script systems used by the supported languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Script {
    Latin,
    Arabic,
}

impl Script {
    /// Get Unicode range for this script (first block only)
    pub fn unicode_range(&self) -> (u32, u32) {
        match self {
            Self::Latin => (0x0000, 0x007F),
            Self::Arabic => (0x0600, 0x06FF),
        }
    }

    /// Check if a character belongs to this script
    pub fn contains_char(&self, c: char) -> bool {
        let code = c as u32;
        let (start, end) = self.unicode_range();
        code >= start && code <= end
    }

    /// Detect script from text (returns most frequent script)
    ///
    /// Whitespace, digits and ASCII punctuation are ignored so that a short
    /// Arabic sentence with a trailing "?" still reads as Arabic.
    pub fn detect(text: &str) -> Option<Self> {
        let mut latin = 0usize;
        let mut arabic = 0usize;

        for c in text.chars() {
            if c.is_whitespace() || c.is_ascii_digit() || c.is_ascii_punctuation() {
                continue;
            }
            if Self::Arabic.contains_char(c) {
                arabic += 1;
            } else if Self::Latin.contains_char(c) {
                latin += 1;
            }
        }

        match (latin, arabic) {
            (0, 0) => None,
            (l, a) if a > l => Some(Self::Arabic),
            _ => Some(Self::Latin),
        }
    }
}
