//! In-memory gateway used by engine tests.

use std::sync::{
    atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering},
    Mutex,
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::domain::{Entity, EntityId, Scope};

use crate::gateway::{CollectionSnapshot, RemoteStoreGateway};

pub(crate) struct FakeGateway {
    pub(crate) served: Mutex<Vec<Entity>>,
    pub(crate) label: Mutex<String>,
    pub(crate) fail: AtomicBool,
    pub(crate) calls: AtomicUsize,
    pub(crate) renames: Mutex<Vec<(Scope, EntityId, String)>>,
    /// Applied to names echoed back from rename, to mimic a server that
    /// normalizes differently from the client.
    pub(crate) rename_echo: Mutex<Option<String>>,
    next_id: AtomicI64,
}

impl FakeGateway {
    pub(crate) fn with_names(names: &[&str]) -> Self {
        let served = names
            .iter()
            .enumerate()
            .map(|(idx, name)| Entity::new(EntityId(idx as i64 + 1), *name))
            .collect::<Vec<_>>();
        Self {
            next_id: AtomicI64::new(served.len() as i64 + 1),
            served: Mutex::new(served),
            label: Mutex::new(String::new()),
            fail: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
            renames: Mutex::new(Vec::new()),
            rename_echo: Mutex::new(None),
        }
    }

    pub(crate) fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn serve(&self, names: &[&str]) {
        let served = names
            .iter()
            .enumerate()
            .map(|(idx, name)| Entity::new(EntityId(idx as i64 + 1), *name))
            .collect();
        *self.served.lock().expect("served lock") = served;
    }

    fn begin(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow!("simulated gateway failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteStoreGateway for FakeGateway {
    async fn fetch_collection(&self, _scope: Scope) -> Result<CollectionSnapshot> {
        self.begin()?;
        Ok(CollectionSnapshot {
            entities: self.served.lock().expect("served lock").clone(),
            scope_label: self.label.lock().expect("label lock").clone(),
        })
    }

    async fn create_entity(&self, _scope: Scope, name: &str) -> Result<Entity> {
        self.begin()?;
        let entity = Entity::new(
            EntityId(self.next_id.fetch_add(1, Ordering::SeqCst)),
            name,
        );
        self.served.lock().expect("served lock").push(entity.clone());
        Ok(entity)
    }

    async fn rename_entity(&self, scope: Scope, id: EntityId, name: &str) -> Result<Entity> {
        self.begin()?;
        self.renames
            .lock()
            .expect("renames lock")
            .push((scope, id, name.to_string()));
        let echoed = self
            .rename_echo
            .lock()
            .expect("echo lock")
            .clone()
            .unwrap_or_else(|| name.to_string());
        Ok(Entity::new(id, echoed))
    }

    async fn delete_entity(&self, _scope: Scope, id: EntityId) -> Result<()> {
        self.begin()?;
        self.served
            .lock()
            .expect("served lock")
            .retain(|entity| entity.id != id);
        Ok(())
    }
}

pub(crate) fn names(entities: &[Entity]) -> Vec<&str> {
    entities.iter().map(|entity| entity.name.as_str()).collect()
}
