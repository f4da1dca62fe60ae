//! REST payloads of the list service.

use serde::{Deserialize, Serialize};

use crate::domain::{Entity, EntityId};

/// Rooms travel as `{id, title}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomPayload {
    pub id: EntityId,
    pub title: String,
}

impl From<RoomPayload> for Entity {
    fn from(value: RoomPayload) -> Self {
        Entity::new(value.id, value.title)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacePayload {
    pub id: EntityId,
    pub name: String,
}

impl From<PlacePayload> for Entity {
    fn from(value: PlacePayload) -> Self {
        Entity::new(value.id, value.name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomPlacesResponse {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub places: Option<Vec<PlacePayload>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomTitleRequest {
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceNameRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
}
