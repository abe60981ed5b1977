//! In-process entity service keyed by identifier. Backs the demo and the tests.

use super::EntityService;
use crate::error::ServiceError;
use crate::model::{ListQuery, Mutation, Page, Resource};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

type IdGenerator<I> = Box<dyn Fn(u64) -> I + Send + Sync>;

pub struct InMemoryService<M: Resource> {
    rows: RwLock<BTreeMap<M::Id, M>>,
    sequence: AtomicU64,
    next_id: IdGenerator<M::Id>,
}

impl<M: Resource> InMemoryService<M> {
    /// `next_id` receives a 1-based sequence number for each created entity lacking an id.
    pub fn new(next_id: impl Fn(u64) -> M::Id + Send + Sync + 'static) -> Self {
        InMemoryService {
            rows: RwLock::new(BTreeMap::new()),
            sequence: AtomicU64::new(0),
            next_id: Box::new(next_id),
        }
    }

    /// Insert persisted models directly, bypassing `create`. Models without an id are skipped.
    pub fn with_rows(self, models: impl IntoIterator<Item = M>) -> Self {
        {
            let mut rows = self.rows.write().unwrap_or_else(|e| e.into_inner());
            for model in models {
                if let Some(id) = model.id().cloned() {
                    rows.insert(id, model);
                }
            }
        }
        self
    }

    pub fn len(&self) -> usize {
        self.read().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<M::Id, M>>, ServiceError> {
        self.rows
            .read()
            .map_err(|_| ServiceError::Storage("in-memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<M::Id, M>>, ServiceError> {
        self.rows
            .write()
            .map_err(|_| ServiceError::Storage("in-memory store lock poisoned".into()))
    }
}

/// Case-insensitive substring match against any string field of the model's JSON form.
fn matches_filter<M: Resource>(model: &M, needle: &str) -> bool {
    fn contains(value: &Value, needle: &str) -> bool {
        match value {
            Value::String(s) => s.to_lowercase().contains(needle),
            Value::Array(items) => items.iter().any(|v| contains(v, needle)),
            Value::Object(map) => map.values().any(|v| contains(v, needle)),
            _ => false,
        }
    }
    serde_json::to_value(model)
        .map(|v| contains(&v, &needle.to_lowercase()))
        .unwrap_or(false)
}

#[async_trait]
impl<M: Resource> EntityService<M> for InMemoryService<M> {
    async fn list(&self, query: &ListQuery) -> Result<Page<M>, ServiceError> {
        let rows = self.read()?;
        let matching: Vec<&M> = rows
            .values()
            .filter(|m| query.filter.as_deref().map_or(true, |f| matches_filter(*m, f)))
            .collect();
        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(query.offset())
            .take(query.per_page as usize)
            .cloned()
            .collect();
        Ok(Page {
            items,
            total,
            page: query.page,
            per_page: query.per_page,
        })
    }

    async fn find(&self, id: &M::Id) -> Result<Option<M>, ServiceError> {
        Ok(self.read()?.get(id).cloned())
    }

    async fn create(&self, mut model: M) -> Result<Mutation<M>, ServiceError> {
        let mut rows = self.write()?;
        let id = match model.id().cloned() {
            Some(id) if rows.contains_key(&id) => {
                return Ok(Mutation::rejected("id", format!("{} already exists", id)));
            }
            Some(id) => id,
            None => {
                let n = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
                let id = (self.next_id)(n);
                model.set_id(id.clone());
                id
            }
        };
        rows.insert(id, model.clone());
        Ok(Mutation::Applied(model))
    }

    async fn edit(&self, model: M) -> Result<Mutation, ServiceError> {
        let Some(id) = model.id().cloned() else {
            return Ok(Mutation::rejected("id", "is required"));
        };
        let mut rows = self.write()?;
        match rows.get_mut(&id) {
            Some(slot) => {
                *slot = model;
                Ok(Mutation::Applied(()))
            }
            None => Ok(Mutation::rejected("id", format!("{} does not exist", id))),
        }
    }

    async fn delete(&self, model: M) -> Result<Mutation, ServiceError> {
        let Some(id) = model.id() else {
            return Ok(Mutation::rejected("id", "is required"));
        };
        match self.write()?.remove(id) {
            Some(_) => Ok(Mutation::Applied(())),
            None => Ok(Mutation::rejected("id", format!("{} does not exist", id))),
        }
    }

    async fn exists(&self, id: &M::Id) -> Result<bool, ServiceError> {
        Ok(self.read()?.contains_key(id))
    }
}
