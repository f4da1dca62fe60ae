//! Ordered, server-backed collection of entities for one scope.
//!
//! Create, rename and delete are confirmed by the remote store before they
//! touch local state, so a failed write leaves the collection exactly as it
//! was. Reordering is local only and is discarded by the next `load`.

use std::{collections::HashMap, sync::Arc};

use shared::domain::{Entity, EntityId, Scope};
use tracing::{debug, info, warn};

use crate::{
    edit_session::EditSession,
    error::{ListError, ValidationError},
    gateway::RemoteStoreGateway,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    NotLoaded,
    Loaded,
    Failed,
}

pub struct EntityCollection {
    gateway: Arc<dyn RemoteStoreGateway>,
    scope: Scope,
    entities: Vec<Entity>,
    scope_label: String,
    load_state: LoadState,
    edit: EditSession,
    pending_error: Option<String>,
}

impl EntityCollection {
    /// Creates an empty collection for `scope`; call [`load`](Self::load) to
    /// populate it.
    pub fn new(gateway: Arc<dyn RemoteStoreGateway>, scope: Scope) -> Self {
        Self {
            gateway,
            scope,
            entities: Vec::new(),
            scope_label: String::new(),
            load_state: LoadState::NotLoaded,
            edit: EditSession::default(),
            pending_error: None,
        }
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn scope_label(&self) -> &str {
        &self.scope_label
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    pub fn position(&self, id: EntityId) -> Option<usize> {
        self.entities.iter().position(|entity| entity.id == id)
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn edit_session(&self) -> &EditSession {
        &self.edit
    }

    pub fn pending_error(&self) -> Option<&str> {
        self.pending_error.as_deref()
    }

    /// Called whenever the user changes an input field.
    pub fn clear_pending_error(&mut self) {
        self.pending_error = None;
    }

    /// Replaces the whole collection with the server's view, in server order.
    pub async fn load(&mut self) -> Result<(), ListError> {
        match self.gateway.fetch_collection(self.scope).await {
            Ok(snapshot) => {
                info!(scope = %self.scope, count = snapshot.entities.len(), "collection loaded");
                self.entities = snapshot.entities;
                self.scope_label = snapshot.scope_label;
                self.load_state = LoadState::Loaded;
                self.pending_error = None;
                if let Some(target) = self.edit.target() {
                    if self.get(target).is_none() {
                        self.edit.cancel();
                    }
                }
                Ok(())
            }
            Err(err) => {
                self.entities.clear();
                self.scope_label.clear();
                self.load_state = LoadState::Failed;
                self.edit.cancel();
                Err(self.record(ListError::load(&err)))
            }
        }
    }

    /// Adds a new entity at the end of the collection once the server has
    /// assigned it an id.
    pub async fn create(&mut self, raw_name: &str) -> Result<Entity, ListError> {
        let name = self
            .check_name(raw_name, None)
            .map_err(|err| self.record(err.into()))?;

        match self.gateway.create_entity(self.scope, &name).await {
            Ok(entity) => {
                info!(scope = %self.scope, id = %entity.id, name = %entity.name, "entity created");
                self.entities.push(entity.clone());
                self.pending_error = None;
                Ok(entity)
            }
            Err(err) => Err(self.record(ListError::remote_write(&err))),
        }
    }

    /// Renames `id`. The gateway's returned entity replaces the local one.
    pub async fn rename(&mut self, id: EntityId, raw_name: &str) -> Result<Entity, ListError> {
        match self.rename_confirmed(id, raw_name).await {
            Ok(entity) => {
                self.pending_error = None;
                Ok(entity)
            }
            Err(err) => Err(self.record(err)),
        }
    }

    async fn rename_confirmed(
        &mut self,
        id: EntityId,
        raw_name: &str,
    ) -> Result<Entity, ListError> {
        if self.get(id).is_none() {
            return Err(ListError::invalid(format!("entity {id} is not in {}", self.scope)));
        }
        let name = self.check_name(raw_name, Some(id))?;

        let entity = self
            .gateway
            .rename_entity(self.scope, id, &name)
            .await
            .map_err(|err| ListError::remote_write(&err))?;

        let Some(slot) = self.entities.iter_mut().find(|entity| entity.id == id) else {
            return Err(ListError::invalid(format!("entity {id} is not in {}", self.scope)));
        };
        info!(scope = %self.scope, %id, name = %entity.name, "entity renamed");
        *slot = entity.clone();
        Ok(entity)
    }

    /// Removes `id` after the server confirms. Confirmation with the user is
    /// the caller's job.
    pub async fn delete(&mut self, id: EntityId) -> Result<(), ListError> {
        if self.get(id).is_none() {
            return Err(self.record(ListError::invalid(format!(
                "entity {id} is not in {}",
                self.scope
            ))));
        }

        match self.gateway.delete_entity(self.scope, id).await {
            Ok(()) => {
                info!(scope = %self.scope, %id, "entity deleted");
                self.entities.retain(|entity| entity.id != id);
                if self.edit.is_editing_entity(id) {
                    self.edit.cancel();
                }
                self.pending_error = None;
                Ok(())
            }
            Err(err) => Err(self.record(ListError::remote_write(&err))),
        }
    }

    /// Applies a new local order. `order` must hold exactly the ids currently
    /// in the collection. Never reaches the remote store.
    pub fn reorder(&mut self, order: &[EntityId]) -> Result<(), ListError> {
        if order.len() != self.entities.len() {
            return Err(self.record(ListError::invalid(format!(
                "reorder expects {} entries, got {}",
                self.entities.len(),
                order.len()
            ))));
        }

        let reordered = {
            let mut by_id: HashMap<EntityId, &Entity> =
                self.entities.iter().map(|entity| (entity.id, entity)).collect();
            order
                .iter()
                .map(|id| {
                    by_id.remove(id).cloned().ok_or_else(|| {
                        ListError::invalid(format!(
                            "reorder references unknown or repeated entity {id}"
                        ))
                    })
                })
                .collect::<Result<Vec<_>, _>>()
        };
        let reordered = reordered.map_err(|err| self.record(err))?;

        debug!(scope = %self.scope, "collection reordered locally");
        self.entities = reordered;
        self.pending_error = None;
        Ok(())
    }

    /// Opens the inline editor on `id`, replacing any other active edit.
    pub fn start_edit(&mut self, id: EntityId) -> Result<(), ListError> {
        let Some(entity) = self.get(id) else {
            return Err(self.record(ListError::invalid(format!(
                "entity {id} is not in {}",
                self.scope
            ))));
        };
        let name = entity.name.clone();
        if let Some(previous) = self.edit.start(id, &name) {
            debug!(scope = %self.scope, %previous, "previous edit cancelled");
        }
        self.pending_error = None;
        Ok(())
    }

    pub fn update_draft(&mut self, text: &str) -> Result<(), ListError> {
        self.pending_error = None;
        if self.edit.set_draft(text) {
            Ok(())
        } else {
            Err(ListError::invalid("no edit in progress"))
        }
    }

    pub fn cancel_edit(&mut self) {
        self.edit.cancel();
        self.pending_error = None;
    }

    /// Submits the draft through [`rename`](Self::rename). Any failure keeps
    /// the session open with the error attached; it only closes on success
    /// or an explicit cancel.
    pub async fn commit_edit(&mut self) -> Result<Entity, ListError> {
        let (target, draft) = match &self.edit {
            EditSession::Idle => return Err(ListError::invalid("no edit in progress")),
            EditSession::Editing { target, draft, .. } => (*target, draft.clone()),
        };

        match self.rename_confirmed(target, &draft).await {
            Ok(entity) => {
                self.edit.finish();
                self.pending_error = None;
                Ok(entity)
            }
            Err(err) => {
                warn!(scope = %self.scope, %target, error = %err, "edit commit failed");
                self.edit.fail(err.clone());
                Err(err)
            }
        }
    }

    /// Trims `raw` and rejects it when empty or already held by an entity
    /// other than `except`. Comparison is exact and case-sensitive.
    fn check_name(&self, raw: &str, except: Option<EntityId>) -> Result<String, ValidationError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(ValidationError::Empty);
        }
        let taken = self
            .entities
            .iter()
            .any(|entity| Some(entity.id) != except && entity.name.trim() == name);
        if taken {
            return Err(ValidationError::Duplicate);
        }
        Ok(name.to_string())
    }

    pub(crate) fn record(&mut self, err: ListError) -> ListError {
        warn!(scope = %self.scope, error = %err, "collection operation failed");
        self.pending_error = Some(err.user_message());
        err
    }

    pub(crate) fn ids(&self) -> Vec<EntityId> {
        self.entities.iter().map(|entity| entity.id).collect()
    }

    #[cfg(test)]
    pub(crate) fn distinct_names(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        self.entities
            .iter()
            .all(|entity| seen.insert(entity.name.trim().to_string()))
    }
}

#[cfg(test)]
#[path = "tests/collection_tests.rs"]
mod tests;
