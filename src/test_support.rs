//! Fixtures shared by unit tests.

use crate::error::ServiceError;
use crate::model::{ListQuery, Mutation, Page, Resource};
use crate::service::{EntityService, InMemoryService};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct Note {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
}

impl Note {
    pub(crate) fn new(id: Option<&str>, title: &str) -> Self {
        Note {
            id: id.map(str::to_string),
            title: title.to_string(),
        }
    }
}

impl Resource for Note {
    type Id = String;

    fn id(&self) -> Option<&String> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}

pub(crate) fn note_store() -> InMemoryService<Note> {
    InMemoryService::new(|n| n.to_string())
}

/// Records the name of every call before forwarding it.
pub(crate) struct Recorder<S> {
    inner: S,
    calls: Mutex<Vec<&'static str>>,
}

impl<S> Recorder<S> {
    pub(crate) fn new(inner: S) -> Self {
        Recorder {
            inner,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn mutating_calls(&self) -> Vec<&'static str> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(*c, "create" | "edit" | "delete"))
            .collect()
    }

    fn note(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl<M: Resource, S: EntityService<M>> EntityService<M> for Recorder<S> {
    async fn list(&self, query: &ListQuery) -> Result<Page<M>, ServiceError> {
        self.note("list");
        self.inner.list(query).await
    }

    async fn find(&self, id: &M::Id) -> Result<Option<M>, ServiceError> {
        self.note("find");
        self.inner.find(id).await
    }

    async fn create(&self, model: M) -> Result<Mutation<M>, ServiceError> {
        self.note("create");
        self.inner.create(model).await
    }

    async fn edit(&self, model: M) -> Result<Mutation, ServiceError> {
        self.note("edit");
        self.inner.edit(model).await
    }

    async fn delete(&self, model: M) -> Result<Mutation, ServiceError> {
        self.note("delete");
        self.inner.delete(model).await
    }

    async fn exists(&self, id: &M::Id) -> Result<bool, ServiceError> {
        self.note("exists");
        self.inner.exists(id).await
    }
}
