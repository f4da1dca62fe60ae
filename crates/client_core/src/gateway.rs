//! Remote store seam and its HTTP implementation against the list service.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use shared::{
    account::{SignupError, SignupForm},
    domain::{Entity, EntityId, Scope},
    error::ApiError,
    protocol::{PlaceNameRequest, PlacePayload, RoomPayload, RoomPlacesResponse, RoomTitleRequest},
};
use thiserror::Error;
use tracing::debug;
use url::Url;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Result of fetching one scope: members in server order plus the
/// parent's display label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionSnapshot {
    pub entities: Vec<Entity>,
    pub scope_label: String,
}

/// Stateless request/response facade to the remote list service.
///
/// Errors are opaque to callers: transport failures, rejected statuses and
/// undecodable bodies all come back as a plain `anyhow::Error`.
#[async_trait]
pub trait RemoteStoreGateway: Send + Sync {
    async fn fetch_collection(&self, scope: Scope) -> Result<CollectionSnapshot>;
    async fn create_entity(&self, scope: Scope, name: &str) -> Result<Entity>;
    async fn rename_entity(&self, scope: Scope, id: EntityId, name: &str) -> Result<Entity>;
    async fn delete_entity(&self, scope: Scope, id: EntityId) -> Result<()>;
}

#[derive(Debug, Error)]
pub enum SignupFailure {
    #[error(transparent)]
    Invalid(#[from] SignupError),
    #[error("{0}")]
    Rejected(String),
    #[error("sign-up request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

pub struct HttpListGateway {
    http: Client,
    server_url: String,
    token: Option<String>,
}

impl HttpListGateway {
    pub fn new(server_url: &str, token: Option<String>) -> Result<Self> {
        Self::with_timeout(server_url, token, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(
        server_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let parsed = Url::parse(server_url)
            .with_context(|| format!("invalid server url '{server_url}'"))?;
        if parsed.cannot_be_a_base() {
            return Err(anyhow!("server url '{server_url}' cannot be used as a base"));
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build http client")?;
        Ok(Self {
            http,
            server_url: server_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.authorized(request).send().await?.error_for_status()?;
        Ok(response)
    }

    /// Registers a new account. The form is validated locally first and no
    /// request is made when it fails.
    pub async fn signup(&self, form: &SignupForm) -> std::result::Result<(), SignupFailure> {
        form.validate()?;
        let response = self
            .http
            .post(format!("{}/auth/signup", self.server_url))
            .json(&form.to_request())
            .send()
            .await?;
        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        let detail = response
            .json::<ApiError>()
            .await
            .ok()
            .and_then(|body| body.detail);
        debug!(%status, ?detail, "sign-up rejected");
        Err(SignupFailure::Rejected(detail.unwrap_or_else(|| {
            "account could not be created; check the entered details".to_string()
        })))
    }
}

#[async_trait]
impl RemoteStoreGateway for HttpListGateway {
    async fn fetch_collection(&self, scope: Scope) -> Result<CollectionSnapshot> {
        match scope {
            Scope::Rooms => {
                let rooms: Vec<RoomPayload> = self
                    .send(self.http.get(format!("{}/lists/", self.server_url)))
                    .await
                    .context("failed to fetch rooms")?
                    .json()
                    .await
                    .context("malformed rooms payload")?;
                Ok(CollectionSnapshot {
                    entities: rooms.into_iter().map(Entity::from).collect(),
                    scope_label: String::new(),
                })
            }
            Scope::Places { room_id } => {
                let body: RoomPlacesResponse = self
                    .send(
                        self.http
                            .get(format!("{}/lists/{}/places", self.server_url, room_id.0)),
                    )
                    .await
                    .with_context(|| format!("failed to fetch places for room {}", room_id.0))?
                    .json()
                    .await
                    .context("malformed places payload")?;
                Ok(CollectionSnapshot {
                    entities: body
                        .places
                        .unwrap_or_default()
                        .into_iter()
                        .map(Entity::from)
                        .collect(),
                    scope_label: body.title.unwrap_or_default(),
                })
            }
        }
    }

    async fn create_entity(&self, scope: Scope, name: &str) -> Result<Entity> {
        match scope {
            Scope::Rooms => {
                let room: RoomPayload = self
                    .send(
                        self.http
                            .post(format!("{}/lists/", self.server_url))
                            .json(&RoomTitleRequest {
                                title: name.to_string(),
                            }),
                    )
                    .await
                    .context("failed to create room")?
                    .json()
                    .await
                    .context("malformed room payload")?;
                Ok(room.into())
            }
            Scope::Places { room_id } => {
                let place: PlacePayload = self
                    .send(
                        self.http
                            .post(format!("{}/lists/{}/places", self.server_url, room_id.0))
                            .json(&PlaceNameRequest {
                                name: name.to_string(),
                            }),
                    )
                    .await
                    .with_context(|| format!("failed to create place in room {}", room_id.0))?
                    .json()
                    .await
                    .context("malformed place payload")?;
                Ok(place.into())
            }
        }
    }

    async fn rename_entity(&self, scope: Scope, id: EntityId, name: &str) -> Result<Entity> {
        match scope {
            Scope::Rooms => {
                let room: RoomPayload = self
                    .send(
                        self.http
                            .put(format!("{}/lists/{}", self.server_url, id.0))
                            .json(&RoomTitleRequest {
                                title: name.to_string(),
                            }),
                    )
                    .await
                    .with_context(|| format!("failed to rename room {}", id.0))?
                    .json()
                    .await
                    .context("malformed room payload")?;
                Ok(room.into())
            }
            Scope::Places { .. } => {
                let place: PlacePayload = self
                    .send(
                        self.http
                            .put(format!("{}/lists/places/{}", self.server_url, id.0))
                            .json(&PlaceNameRequest {
                                name: name.to_string(),
                            }),
                    )
                    .await
                    .with_context(|| format!("failed to rename place {}", id.0))?
                    .json()
                    .await
                    .context("malformed place payload")?;
                Ok(place.into())
            }
        }
    }

    async fn delete_entity(&self, scope: Scope, id: EntityId) -> Result<()> {
        let path = match scope {
            Scope::Rooms => format!("{}/lists/{}", self.server_url, id.0),
            Scope::Places { .. } => format!("{}/lists/places/{}", self.server_url, id.0),
        };
        self.send(self.http.delete(path))
            .await
            .with_context(|| format!("failed to delete {} entry {}", scope, id.0))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/gateway_tests.rs"]
mod tests;
