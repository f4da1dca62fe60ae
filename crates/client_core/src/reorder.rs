//! Drag-and-drop reordering.
//!
//! [`move_entry`] is the pure reordering step; [`commit_drag`] feeds its
//! result into [`EntityCollection::reorder`]. Nothing here talks to the
//! remote store.

use tracing::debug;

use crate::{collection::EntityCollection, error::ListError};

/// A completed drag: where the item was picked up and where it was
/// dropped. `destination` is `None` when the drop landed outside the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragGesture {
    pub source: usize,
    pub destination: Option<usize>,
}

impl DragGesture {
    pub fn new(source: usize, destination: Option<usize>) -> Self {
        Self {
            source,
            destination,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// The gesture had no destination; nothing changed.
    Aborted,
    Committed,
}

/// Returns a copy of `items` with the entry at `source` removed and
/// reinserted at `destination`. Both indices must be below `items.len()`.
pub fn move_entry<T: Clone>(
    items: &[T],
    source: usize,
    destination: usize,
) -> Result<Vec<T>, ListError> {
    if source >= items.len() || destination >= items.len() {
        return Err(ListError::invalid(format!(
            "move {source} -> {destination} is outside a list of {}",
            items.len()
        )));
    }
    let mut moved = items.to_vec();
    let entry = moved.remove(source);
    moved.insert(destination, entry);
    Ok(moved)
}

pub fn commit_drag(
    collection: &mut EntityCollection,
    gesture: DragGesture,
) -> Result<DragOutcome, ListError> {
    let Some(destination) = gesture.destination else {
        debug!(source = gesture.source, "drag dropped outside the list");
        return Ok(DragOutcome::Aborted);
    };

    let order = move_entry(&collection.ids(), gesture.source, destination)
        .map_err(|err| collection.record(err))?;
    collection.reorder(&order)?;
    Ok(DragOutcome::Committed)
}
