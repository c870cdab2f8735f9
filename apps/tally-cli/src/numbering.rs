//! # Document Numbering
//!
//! In-process sequence allocation behind [`DocumentNumberAllocator`].
//!
//! ## Thread Safety
//! Counters live behind a `Mutex` so several editors can issue documents at
//! once without handing out the same number twice.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use tally_core::{DocumentKind, DocumentNumberAllocator};
use tracing::debug;

use crate::config::NumberingConfig;

/// Per-kind counters starting at a configurable value.
#[derive(Debug)]
pub struct SequentialNumberAllocator {
    config: NumberingConfig,
    start: u64,
    counters: Mutex<HashMap<DocumentKind, u64>>,
}

impl SequentialNumberAllocator {
    /// The first number handed out for every kind is `start`.
    pub fn new(config: NumberingConfig, start: u64) -> Self {
        SequentialNumberAllocator {
            config,
            start,
            counters: Mutex::new(HashMap::new()),
        }
    }
}

impl DocumentNumberAllocator for SequentialNumberAllocator {
    fn next_number(&self, kind: DocumentKind) -> String {
        // A poisoned lock still holds valid counters
        let mut counters = self.counters.lock().unwrap_or_else(PoisonError::into_inner);
        let counter = counters.entry(kind).or_insert(self.start);
        let sequence = *counter;
        *counter += 1;

        let number = format!(
            "{}{:0width$}",
            self.config.prefix(kind),
            sequence,
            width = self.config.width
        );
        debug!(?kind, %number, "document number allocated");
        number
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_sequences_are_per_kind() {
        let numbers = SequentialNumberAllocator::new(NumberingConfig::default(), 1);

        assert_eq!(numbers.next_number(DocumentKind::Invoice), "INV-0001");
        assert_eq!(numbers.next_number(DocumentKind::Invoice), "INV-0002");
        assert_eq!(numbers.next_number(DocumentKind::Quote), "QUO-0001");
        assert_eq!(numbers.next_number(DocumentKind::CreditMemo), "CM-0001");
    }

    #[test]
    fn test_start_and_width() {
        let config = NumberingConfig {
            width: 6,
            ..NumberingConfig::default()
        };
        let numbers = SequentialNumberAllocator::new(config, 42);
        assert_eq!(numbers.next_number(DocumentKind::Invoice), "INV-000042");
    }

    #[test]
    fn test_concurrent_allocation_never_repeats() {
        let numbers = Arc::new(SequentialNumberAllocator::new(NumberingConfig::default(), 1));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let numbers = Arc::clone(&numbers);
                thread::spawn(move || {
                    (0..25)
                        .map(|_| numbers.next_number(DocumentKind::Invoice))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut all: Vec<String> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 200);
    }
}
