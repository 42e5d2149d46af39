//! Narration boundary - the voice collaborator seam.
//!
//! The engine never talks to a speech synthesizer directly; it hands
//! utterances to a `Narrator` and moves on. Announcing is fire-and-forget,
//! and the player cancels any in-flight utterance before issuing the next
//! one, so an implementation holds at most one pending utterance.

use std::sync::{Arc, Mutex};

use log::info;

/// Voice output seam. Implementations must not block the tick loop.
pub trait Narrator: Send {
    /// Speak `text` for the step identified by `step_id`. Fire-and-forget.
    fn announce(&mut self, text: &str, step_id: &str);

    /// Drop any utterance not yet spoken.
    fn cancel(&mut self);
}

/// Narrator that swallows everything (headless runs, tests that don't care).
#[derive(Debug, Default)]
pub struct NullNarrator;

impl Narrator for NullNarrator {
    fn announce(&mut self, _text: &str, _step_id: &str) {}
    fn cancel(&mut self) {}
}

/// Narrator that logs utterances - the CLI's "voice".
#[derive(Debug, Default)]
pub struct LogNarrator;

impl Narrator for LogNarrator {
    fn announce(&mut self, text: &str, step_id: &str) {
        info!("announce [{}]: {}", step_id, text);
    }

    fn cancel(&mut self) {}
}

/// One recorded utterance
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub step_id: String,
}

/// Narrator that records utterances in memory.
///
/// Hosts and tests keep the `MemoryNarrator::log()` handle and hand the
/// narrator itself to the player.
#[derive(Debug, Default)]
pub struct MemoryNarrator {
    log: Arc<Mutex<Vec<Utterance>>>,
    cancelled: Arc<Mutex<usize>>,
}

impl MemoryNarrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle onto the recorded utterances
    pub fn log(&self) -> Arc<Mutex<Vec<Utterance>>> {
        Arc::clone(&self.log)
    }

    /// Shared handle onto the cancel counter
    pub fn cancel_count(&self) -> Arc<Mutex<usize>> {
        Arc::clone(&self.cancelled)
    }
}

impl Narrator for MemoryNarrator {
    fn announce(&mut self, text: &str, step_id: &str) {
        self.log
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Utterance {
                text: text.to_string(),
                step_id: step_id.to_string(),
            });
    }

    fn cancel(&mut self) {
        *self.cancelled.lock().unwrap_or_else(|e| e.into_inner()) += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_narrator_records_in_order() {
        let mut narrator = MemoryNarrator::new();
        let log = narrator.log();

        narrator.announce("warrior one", "id-1");
        narrator.announce("warrior two", "id-2");

        let recorded = log.lock().unwrap();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0].text, "warrior one");
        assert_eq!(recorded[1].step_id, "id-2");
    }

    #[test]
    fn test_memory_narrator_counts_cancels() {
        let mut narrator = MemoryNarrator::new();
        let cancels = narrator.cancel_count();
        narrator.cancel();
        narrator.cancel();
        assert_eq!(*cancels.lock().unwrap(), 2);
    }
}
