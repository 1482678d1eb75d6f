//! Recent context
//!
//! The last few visitor utterances, lower-cased, used only as extra match
//! surface for intent detection.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Bounded ring buffer of recent utterances, most recent last
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentContext {
    capacity: usize,
    entries: VecDeque<String>,
}

impl Default for RecentContext {
    fn default() -> Self {
        Self::new(5)
    }
}

impl RecentContext {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Append an utterance, dropping the oldest once full
    pub fn push(&mut self, utterance: &str) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(utterance.to_lowercase());
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_lowercases() {
        let mut context = RecentContext::default();
        context.push("Tell Me About PRICING");
        assert_eq!(context.iter().collect::<Vec<_>>(), vec!["tell me about pricing"]);
    }

    #[test]
    fn test_drops_oldest_when_full() {
        let mut context = RecentContext::new(5);
        for i in 0..7 {
            context.push(&format!("utterance {}", i));
        }
        assert_eq!(context.len(), 5);
        assert_eq!(
            context.iter().collect::<Vec<_>>(),
            vec!["utterance 2", "utterance 3", "utterance 4", "utterance 5", "utterance 6"]
        );
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let mut context = RecentContext::new(0);
        context.push("a");
        context.push("b");
        assert_eq!(context.capacity(), 1);
        assert_eq!(context.iter().collect::<Vec<_>>(), vec!["b"]);
    }
}
