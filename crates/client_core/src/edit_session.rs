//! Single-slot inline rename state machine.
//!
//! A collection owns exactly one `EditSession`, so at most one entity can be
//! in edit mode at a time. Starting an edit on another entity replaces the
//! current one.

use shared::domain::EntityId;

use crate::error::ListError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditSession {
    #[default]
    Idle,
    Editing {
        target: EntityId,
        draft: String,
        error: Option<ListError>,
    },
}

impl EditSession {
    /// Enters edit mode for `target` seeded with its current name. Returns the
    /// id of a session that was implicitly cancelled, if any.
    pub fn start(&mut self, target: EntityId, current_name: &str) -> Option<EntityId> {
        let previous = self.target().filter(|id| *id != target);
        *self = Self::Editing {
            target,
            draft: current_name.to_string(),
            error: None,
        };
        previous
    }

    /// Replaces the draft text and clears any shown error. Returns `false`
    /// when no session is active.
    pub fn set_draft(&mut self, text: &str) -> bool {
        match self {
            Self::Idle => false,
            Self::Editing { draft, error, .. } => {
                *draft = text.to_string();
                *error = None;
                true
            }
        }
    }

    pub fn cancel(&mut self) -> Option<EntityId> {
        let target = self.target();
        *self = Self::Idle;
        target
    }

    /// Keeps the session open with `err` attached.
    pub fn fail(&mut self, err: ListError) {
        if let Self::Editing { error, .. } = self {
            *error = Some(err);
        }
    }

    pub(crate) fn finish(&mut self) {
        *self = Self::Idle;
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing { .. })
    }

    pub fn is_editing_entity(&self, id: EntityId) -> bool {
        self.target() == Some(id)
    }

    pub fn target(&self) -> Option<EntityId> {
        match self {
            Self::Idle => None,
            Self::Editing { target, .. } => Some(*target),
        }
    }

    pub fn draft(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Editing { draft, .. } => Some(draft.as_str()),
        }
    }

    pub fn error(&self) -> Option<&ListError> {
        match self {
            Self::Idle => None,
            Self::Editing { error, .. } => error.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    #[test]
    fn starts_idle() {
        let session = EditSession::default();
        assert!(!session.is_editing());
        assert_eq!(session.target(), None);
        assert_eq!(session.draft(), None);
    }

    #[test]
    fn start_seeds_draft_with_current_name() {
        let mut session = EditSession::default();
        assert_eq!(session.start(EntityId(3), "Kitchen"), None);
        assert_eq!(session.target(), Some(EntityId(3)));
        assert_eq!(session.draft(), Some("Kitchen"));
        assert!(session.error().is_none());
    }

    #[test]
    fn starting_another_edit_replaces_the_active_one() {
        let mut session = EditSession::default();
        session.start(EntityId(1), "Kitchen");
        session.set_draft("Kitch");

        assert_eq!(session.start(EntityId(2), "Bath"), Some(EntityId(1)));
        assert_eq!(session.target(), Some(EntityId(2)));
        assert_eq!(session.draft(), Some("Bath"));
    }

    #[test]
    fn restarting_the_same_target_reports_no_cancellation() {
        let mut session = EditSession::default();
        session.start(EntityId(1), "Kitchen");
        assert_eq!(session.start(EntityId(1), "Kitchen"), None);
    }

    #[test]
    fn draft_change_clears_error() {
        let mut session = EditSession::default();
        session.start(EntityId(1), "Kitchen");
        session.fail(ListError::Validation(ValidationError::Empty));
        assert!(session.error().is_some());

        assert!(session.set_draft("Pantry"));
        assert!(session.error().is_none());
        assert_eq!(session.draft(), Some("Pantry"));
    }

    #[test]
    fn draft_change_while_idle_is_ignored() {
        let mut session = EditSession::default();
        assert!(!session.set_draft("anything"));
        assert_eq!(session, EditSession::Idle);
    }

    #[test]
    fn cancel_returns_to_idle() {
        let mut session = EditSession::default();
        session.start(EntityId(5), "Garage");
        assert_eq!(session.cancel(), Some(EntityId(5)));
        assert_eq!(session, EditSession::Idle);
        assert_eq!(session.cancel(), None);
    }

    #[test]
    fn fail_while_idle_does_not_open_a_session() {
        let mut session = EditSession::default();
        session.fail(ListError::InvalidOperation("stale".into()));
        assert_eq!(session, EditSession::Idle);
    }
}
