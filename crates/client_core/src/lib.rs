//! Client-side synchronization engine for the room/place checklist.

pub mod collection;
pub mod edit_session;
pub mod error;
pub mod gateway;
pub mod reorder;
pub mod session;

pub use collection::{EntityCollection, LoadState};
pub use edit_session::EditSession;
pub use error::{ListError, ValidationError};
pub use gateway::{CollectionSnapshot, HttpListGateway, RemoteStoreGateway, SignupFailure};
pub use reorder::{commit_drag, move_entry, DragGesture, DragOutcome};
pub use session::ChecklistSession;

#[cfg(test)]
pub(crate) mod test_support;
