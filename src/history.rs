//! Snapshot-based undo history.
//!
//! Every mutating operation pushes a full copy of the editable state
//! (paint assignments and raster pixels) immediately before it mutates.
//! Undo pops the newest entry and restores it. There is no redo.

use std::collections::VecDeque;

use livery_raster::{RasterBuffer, RasterSnapshot};

use crate::constants::DEFAULT_HISTORY_DEPTH;
use crate::region::PaintState;

/// Editable state captured before one mutation.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// Paint assignments before the mutation.
    pub paint_state: PaintState,
    /// Raster pixels before the mutation.
    pub raster: RasterSnapshot,
}

/// Proof that a history entry was pushed for the mutation about to happen.
///
/// Only [`HistoryManager::push`] can create one; layer mutators require a
/// reference, so a mutation cannot be written without a matching snapshot.
#[must_use = "push a checkpoint only right before mutating"]
#[derive(Debug)]
pub struct Checkpoint {
    _private: (),
}

/// Configuration for the history stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Maximum number of entries to keep; None keeps everything
    pub max_depth: Option<usize>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_depth: Some(DEFAULT_HISTORY_DEPTH),
        }
    }
}

/// Undo stack of full-state snapshots, newest at the back.
#[derive(Debug, Clone, Default)]
pub struct HistoryManager {
    entries: VecDeque<HistoryEntry>,
    config: HistoryConfig,
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: HistoryConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Capture the current state. Call immediately before mutating.
    pub fn push(&mut self, paint_state: &PaintState, raster: &RasterBuffer) -> Checkpoint {
        self.entries.push_back(HistoryEntry {
            paint_state: paint_state.clone(),
            raster: raster.snapshot(),
        });

        if let Some(max) = self.config.max_depth {
            while self.entries.len() > max.max(1) {
                self.entries.pop_front();
            }
        }

        log::debug!("📝 History: pushed entry #{}", self.entries.len());
        Checkpoint { _private: () }
    }

    /// Remove and return the newest entry.
    pub fn pop(&mut self) -> Option<HistoryEntry> {
        let entry = self.entries.pop_back()?;
        log::debug!("⏪ History: popped, {} left", self.entries.len());
        Some(entry)
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.entries.clear();
        log::debug!("🗑️ History cleared");
    }

    /// Bytes held by raster snapshots.
    pub fn memory_size(&self) -> usize {
        self.entries.iter().map(|e| e.raster.memory_size()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer() -> RasterBuffer {
        RasterBuffer::new(4, 4).expect("buffer")
    }

    #[test]
    fn test_push_and_pop() {
        let mut history = HistoryManager::new();
        assert!(!history.can_undo());

        let _checkpoint = history.push(&PaintState::new(), &buffer());
        assert!(history.can_undo());
        assert_eq!(history.len(), 1);

        assert!(history.pop().is_some());
        assert!(history.pop().is_none());
        assert!(history.is_empty());
    }

    #[test]
    fn test_max_depth_drops_oldest() {
        let mut history = HistoryManager::with_config(HistoryConfig { max_depth: Some(3) });
        let raster = buffer();
        for _ in 0..5 {
            let _checkpoint = history.push(&PaintState::new(), &raster);
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.memory_size(), 3 * 4 * 4 * 4);
    }

    #[test]
    fn test_unbounded_history() {
        let mut history = HistoryManager::with_config(HistoryConfig { max_depth: None });
        let raster = buffer();
        for _ in 0..250 {
            let _checkpoint = history.push(&PaintState::new(), &raster);
        }
        assert_eq!(history.len(), 250);
        history.clear();
        assert!(history.is_empty());
    }
}
