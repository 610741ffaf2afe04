//! Ordered collection of the parts in a session.

use super::{Part, PartId};
use crate::error::EngineError;

/// All parts of the current image.
///
/// Keeps arrival order and a smallest-area-first priority index, so that a
/// small part nested inside a larger one wins hit tests.
#[derive(Debug, Clone, Default)]
pub struct PartSet {
    /// Parts in arrival order.
    parts: Vec<Part>,
    /// Indices into `parts`, smallest area first. Ties keep arrival order.
    priority: Vec<usize>,
}

impl PartSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from a batch of parts, rejecting duplicate ids.
    pub fn from_parts(parts: Vec<Part>) -> Result<Self, EngineError> {
        let mut set = Self::new();
        for part in parts {
            set.insert(part)?;
        }
        Ok(set)
    }

    /// Append a part and re-sort the priority index.
    pub fn insert(&mut self, part: Part) -> Result<(), EngineError> {
        if self.contains(&part.id) {
            return Err(EngineError::DuplicatePart {
                id: part.id.to_string(),
            });
        }
        self.parts.push(part);
        self.reindex();
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.id.as_str() == id)
    }

    pub fn contains(&self, id: &PartId) -> bool {
        self.get(id.as_str()).is_some()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn clear(&mut self) {
        self.parts.clear();
        self.priority.clear();
    }

    /// Parts in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter()
    }

    /// Parts in hit-test priority order (smallest area first).
    pub fn by_priority(&self) -> impl DoubleEndedIterator<Item = &Part> {
        self.priority.iter().map(move |&i| &self.parts[i])
    }

    /// Parts in gallery order (largest area first, ties in arrival order).
    pub fn gallery_order(&self) -> Vec<&Part> {
        let mut ordered: Vec<&Part> = self.parts.iter().collect();
        ordered.sort_by(|a, b| b.area.total_cmp(&a.area));
        ordered
    }

    fn reindex(&mut self) {
        let mut priority: Vec<usize> = (0..self.parts.len()).collect();
        priority.sort_by(|&a, &b| self.parts[a].area.total_cmp(&self.parts[b].area));
        self.priority = priority;
    }
}
