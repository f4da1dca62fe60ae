//! Scope navigation: the user's rooms plus the places of the room that is
//! currently open.

use std::sync::Arc;

use shared::domain::{EntityId, Scope};
use tracing::{debug, info};

use crate::{collection::EntityCollection, error::ListError, gateway::RemoteStoreGateway};

pub const UNTITLED_ROOM: &str = "(untitled room)";

pub struct ChecklistSession {
    gateway: Arc<dyn RemoteStoreGateway>,
    rooms: EntityCollection,
    open_room: Option<EntityCollection>,
}

impl ChecklistSession {
    pub fn new(gateway: Arc<dyn RemoteStoreGateway>) -> Self {
        let rooms = EntityCollection::new(Arc::clone(&gateway), Scope::Rooms);
        Self {
            gateway,
            rooms,
            open_room: None,
        }
    }

    pub fn rooms(&self) -> &EntityCollection {
        &self.rooms
    }

    pub fn rooms_mut(&mut self) -> &mut EntityCollection {
        &mut self.rooms
    }

    pub fn places(&self) -> Option<&EntityCollection> {
        self.open_room.as_ref()
    }

    pub fn places_mut(&mut self) -> Option<&mut EntityCollection> {
        self.open_room.as_mut()
    }

    pub fn open_room_id(&self) -> Option<EntityId> {
        match self.open_room.as_ref()?.scope() {
            Scope::Places { room_id } => Some(room_id),
            Scope::Rooms => None,
        }
    }

    /// Title of the open room as reported by the places fetch.
    pub fn room_title(&self) -> Option<&str> {
        let places = self.open_room.as_ref()?;
        match places.scope_label() {
            "" => Some(UNTITLED_ROOM),
            title => Some(title),
        }
    }

    /// The collection the user is currently looking at.
    pub fn active(&self) -> &EntityCollection {
        self.open_room.as_ref().unwrap_or(&self.rooms)
    }

    pub fn active_mut(&mut self) -> &mut EntityCollection {
        match self.open_room.as_mut() {
            Some(places) => places,
            None => &mut self.rooms,
        }
    }

    pub async fn load_rooms(&mut self) -> Result<(), ListError> {
        self.rooms.load().await
    }

    /// Enters `room_id`, discarding any previously open room. The new places
    /// collection stays open even when its first load fails so it can be
    /// reloaded.
    pub async fn open_room(&mut self, room_id: EntityId) -> Result<(), ListError> {
        if self.rooms.get(room_id).is_none() {
            return Err(self.rooms.record(ListError::invalid(format!(
                "room {room_id} is not in the room list"
            ))));
        }
        self.close_room();

        info!(%room_id, "opening room");
        let places = self
            .open_room
            .insert(EntityCollection::new(Arc::clone(&self.gateway), Scope::Places { room_id }));
        places.load().await
    }

    pub fn close_room(&mut self) {
        if let Some(places) = self.open_room.take() {
            debug!(scope = %places.scope(), "room closed");
        }
    }

    /// Deletes a room and closes it if it was open.
    pub async fn delete_room(&mut self, room_id: EntityId) -> Result<(), ListError> {
        self.rooms.delete(room_id).await?;
        if self.open_room_id() == Some(room_id) {
            self.close_room();
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
