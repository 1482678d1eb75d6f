//! Core types for the vendchat assistant
//!
//! This crate provides foundational types used across all other crates:
//! - Language definitions (English, Arabic) with script and direction
//! - Translation dictionaries, dotted-key lookup and interpolation
//! - Visitor intents
//! - Transcript messages and actionable buttons
//! - Error types

pub mod action;
pub mod conversation;
pub mod error;
pub mod i18n;
pub mod intent;
pub mod language;

pub use action::{Action, ActionEffect, ActionKind, WidgetHost};
pub use conversation::{Message, MessageId, MessageKind, Sender};
pub use error::{Error, Result};
pub use i18n::{interpolate, TranslationDictionary, TranslationTree, Translator, Vars};
pub use intent::IntentKind;
pub use language::{Language, Script, TextDirection};
