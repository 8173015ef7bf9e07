//! Per-object sequence counters
//!
//! Clients use these to order and deduplicate motion and control messages.
//! Each counter tracks a monotonic issue count; the 16-bit value sent on the
//! wire cycles within the counter's `[start, max]` range.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

/// Named sequence kinds every object carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceType {
    /// Motion message counter
    MotionMessage,
    /// Motion counter; the high bit is reserved on the wire
    Motion,
    /// Server control counter
    ServerControl,
}

impl SequenceType {
    /// All sequence kinds, in registration order
    pub const ALL: [SequenceType; 3] = [
        SequenceType::MotionMessage,
        SequenceType::Motion,
        SequenceType::ServerControl,
    ];

    /// Start value and maximum for this kind
    pub fn bounds(self) -> (u16, u16) {
        match self {
            Self::Motion => (1, 0x7FFF),
            Self::MotionMessage | Self::ServerControl => (0, u16::MAX),
        }
    }
}

/// A 16-bit counter with a bounded wire range
#[derive(Debug)]
pub struct UShortSequence {
    start: u16,
    max: u16,
    issued: AtomicU64,
}

impl UShortSequence {
    /// Create a counter over `[start, max]`
    pub fn new(start: u16, max: u16) -> Self {
        Self {
            start,
            max: max.max(start),
            issued: AtomicU64::new(0),
        }
    }

    /// Create a counter with the bounds of a sequence kind
    pub fn for_type(sequence_type: SequenceType) -> Self {
        let (start, max) = sequence_type.bounds();
        Self::new(start, max)
    }

    fn wire_value(&self, issued: u64) -> u16 {
        let span = (self.max - self.start) as u64 + 1;
        (self.start as u64 + issued % span) as u16
    }

    /// Advance and return the new wire value
    pub fn next(&self) -> u16 {
        let issued = self.issued.fetch_add(1, Ordering::AcqRel) + 1;
        self.wire_value(issued)
    }

    /// Current wire value without advancing
    pub fn current(&self) -> u16 {
        self.wire_value(self.issued.load(Ordering::Acquire))
    }

    /// Total number of values issued so far
    pub fn issued(&self) -> u64 {
        self.issued.load(Ordering::Acquire)
    }
}

/// Registry of an object's sequence counters
#[derive(Debug, Default)]
pub struct SequenceManager {
    sequences: DashMap<SequenceType, UShortSequence>,
}

impl SequenceManager {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every standard sequence kind
    pub fn with_defaults() -> Self {
        let manager = Self::new();
        for sequence_type in SequenceType::ALL {
            manager.add_sequence(sequence_type, UShortSequence::for_type(sequence_type));
        }
        manager
    }

    /// Register a counter; an existing counter of the same kind is kept
    pub fn add_sequence(&self, sequence_type: SequenceType, sequence: UShortSequence) {
        self.sequences.entry(sequence_type).or_insert(sequence);
    }

    /// Advance a counter, returning its new wire value
    pub fn next(&self, sequence_type: SequenceType) -> Option<u16> {
        self.sequences.get(&sequence_type).map(|seq| seq.next())
    }

    /// Read a counter's wire value without advancing it
    pub fn current(&self, sequence_type: SequenceType) -> Option<u16> {
        self.sequences.get(&sequence_type).map(|seq| seq.current())
    }

    /// Number of values a counter has issued
    pub fn issued(&self, sequence_type: SequenceType) -> Option<u64> {
        self.sequences.get(&sequence_type).map(|seq| seq.issued())
    }

    /// Check if a counter is registered
    pub fn contains(&self, sequence_type: SequenceType) -> bool {
        self.sequences.contains_key(&sequence_type)
    }

    /// Number of registered counters
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    /// Check if no counters are registered
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_start_values() {
        let manager = SequenceManager::with_defaults();
        assert_eq!(manager.len(), 3);
        assert_eq!(manager.current(SequenceType::Motion), Some(1));
        assert_eq!(manager.current(SequenceType::MotionMessage), Some(0));
        assert_eq!(manager.current(SequenceType::ServerControl), Some(0));
    }

    #[test]
    fn test_next_advances() {
        let manager = SequenceManager::with_defaults();
        assert_eq!(manager.next(SequenceType::Motion), Some(2));
        assert_eq!(manager.next(SequenceType::Motion), Some(3));
        assert_eq!(manager.current(SequenceType::Motion), Some(3));
        assert_eq!(manager.issued(SequenceType::Motion), Some(2));
    }

    #[test]
    fn test_unregistered_type() {
        let manager = SequenceManager::new();
        assert_eq!(manager.next(SequenceType::Motion), None);
        assert_eq!(manager.current(SequenceType::Motion), None);
    }

    #[test]
    fn test_add_existing_is_noop() {
        let manager = SequenceManager::with_defaults();
        manager.next(SequenceType::ServerControl);
        manager.add_sequence(SequenceType::ServerControl, UShortSequence::new(0, 10));
        assert_eq!(manager.current(SequenceType::ServerControl), Some(1));
    }

    #[test]
    fn test_wire_value_wraps_to_start() {
        let seq = UShortSequence::new(1, 3);
        assert_eq!(seq.next(), 2);
        assert_eq!(seq.next(), 3);
        assert_eq!(seq.next(), 1);
        assert_eq!(seq.issued(), 3);
    }

    #[test]
    fn test_motion_keeps_high_bit_clear() {
        let seq = UShortSequence::for_type(SequenceType::Motion);
        for _ in 0..0x8000 {
            assert!(seq.next() <= 0x7FFF);
        }
    }

    #[test]
    fn test_concurrent_next_is_monotonic() {
        let manager = Arc::new(SequenceManager::with_defaults());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let manager = Arc::clone(&manager);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        manager.next(SequenceType::MotionMessage);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(manager.issued(SequenceType::MotionMessage), Some(4000));
        assert_eq!(manager.current(SequenceType::MotionMessage), Some(4000));
    }
}
