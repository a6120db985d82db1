use image::DynamicImage;
use std::collections::VecDeque;
use std::sync::Arc;

use crate::adjust::Adjustments;

/// A committed image state. Snapshots are never mutated once stored.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub image: Arc<DynamicImage>,
    /// Slider values the image was computed with
    pub adjustments: Adjustments,
}

/// Bounded undo/redo history of full image snapshots.
///
/// The top of the undo stack is always the state the session currently
/// shows. The oldest entry acts as a floor: undo never pops the last
/// remaining snapshot.
pub struct EditHistory {
    /// Committed states, oldest first
    undo_stack: VecDeque<Snapshot>,
    /// Undone states, most recently undone last
    redo_stack: Vec<Snapshot>,
    capacity: usize,
}

impl EditHistory {
    /// Creates an empty history holding at most `capacity` snapshots
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            undo_stack: VecDeque::with_capacity(capacity),
            redo_stack: Vec::new(),
            capacity,
        }
    }

    /// Record a committed state.
    ///
    /// Evicts the oldest snapshot when over capacity and drops every redo
    /// state, since history is linear.
    pub fn push(&mut self, image: &DynamicImage) {
        self.push_with(image, Adjustments::default());
    }

    /// Record a committed state together with the slider values behind it
    pub fn push_with(&mut self, image: &DynamicImage, adjustments: Adjustments) {
        self.undo_stack.push_back(Snapshot {
            image: Arc::new(image.clone()),
            adjustments,
        });
        while self.undo_stack.len() > self.capacity {
            self.undo_stack.pop_front();
        }
        self.redo_stack.clear();
    }

    /// Step back one state and return a copy of the state now on top.
    ///
    /// With a single snapshot left this is a no-op that returns that
    /// snapshot unchanged. Returns `None` only when the history is empty.
    pub fn undo(&mut self) -> Option<DynamicImage> {
        if self.undo_stack.len() > 1 {
            if let Some(undone) = self.undo_stack.pop_back() {
                self.redo_stack.push(undone);
            }
        }
        self.top()
    }

    /// Re-apply the most recently undone state, if any
    pub fn redo(&mut self) -> Option<DynamicImage> {
        let snapshot = self.redo_stack.pop()?;
        let image = (*snapshot.image).clone();
        self.undo_stack.push_back(snapshot);
        // Redo never grows the stack past what push allowed, but keep the bound explicit.
        while self.undo_stack.len() > self.capacity {
            self.undo_stack.pop_front();
        }
        Some(image)
    }

    /// A copy of the current committed state
    pub fn top(&self) -> Option<DynamicImage> {
        self.undo_stack.back().map(|snapshot| (*snapshot.image).clone())
    }

    /// Slider values of the current committed state
    pub fn top_adjustments(&self) -> Adjustments {
        self.undo_stack
            .back()
            .map(|snapshot| snapshot.adjustments)
            .unwrap_or_default()
    }

    /// Returns true if there is a state before the current one
    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    /// Returns true if there are undone states that can be re-applied
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of snapshots on the undo stack
    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    /// Number of snapshots on the redo stack
    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Clear the whole history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl std::fmt::Debug for EditHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditHistory")
            .field("undo", &self.undo_stack.len())
            .field("redo", &self.redo_stack.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}
