//! Domain events raised around entity deletion.

use crate::error::ServiceError;
use crate::model::{ListQuery, Mutation, Page, Resource};
use crate::service::EntityService;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Before the delete is delegated. A failing handler aborts the delete.
    Deleting,
    /// After the delete was applied.
    Deleted,
}

#[derive(Clone, Debug, Serialize)]
pub struct EntityEvent<M> {
    pub kind: EventKind,
    pub entity: M,
    pub occurred_at: DateTime<Utc>,
}

impl<M> EntityEvent<M> {
    pub fn new(kind: EventKind, entity: M) -> Self {
        EntityEvent {
            kind,
            entity,
            occurred_at: Utc::now(),
        }
    }
}

/// `Ok(Mutation::Rejected)` refuses a `Deleting` event as a business rule violation;
/// `Err` is reserved for infrastructure failures.
#[async_trait]
pub trait EventHandler<M: Resource>: Send + Sync {
    async fn handle(&self, event: &EntityEvent<M>) -> Result<Mutation, ServiceError>;
}

/// Ordered handler list. Handlers run one after another; the first rejection or error
/// stops dispatch.
pub struct EventDispatcher<M: Resource> {
    handlers: Vec<Arc<dyn EventHandler<M>>>,
}

impl<M: Resource> Default for EventDispatcher<M> {
    fn default() -> Self {
        EventDispatcher { handlers: Vec::new() }
    }
}

impl<M: Resource> Clone for EventDispatcher<M> {
    fn clone(&self) -> Self {
        EventDispatcher {
            handlers: self.handlers.clone(),
        }
    }
}

impl<M: Resource> EventDispatcher<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, handler: impl EventHandler<M> + 'static) -> &mut Self {
        self.handlers.push(Arc::new(handler));
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub async fn publish(&self, event: &EntityEvent<M>) -> Result<Mutation, ServiceError> {
        for handler in &self.handlers {
            if let Mutation::Rejected(errors) = handler.handle(event).await? {
                return Ok(Mutation::Rejected(errors));
            }
        }
        Ok(Mutation::Applied(()))
    }
}

/// Publishes `Deleting` and `Deleted` around the inner service's delete.
///
/// A rejected `Deleting` event becomes the delete's outcome and the inner service is not
/// called. `Deleted` is published only for applied deletes; its handlers cannot undo the
/// delete, so their rejections and errors are logged and the applied outcome is returned.
pub struct EventingService<M: Resource, S> {
    inner: S,
    dispatcher: EventDispatcher<M>,
}

impl<M: Resource, S> EventingService<M, S> {
    pub fn new(inner: S, dispatcher: EventDispatcher<M>) -> Self {
        EventingService { inner, dispatcher }
    }
}

#[async_trait]
impl<M, S> EntityService<M> for EventingService<M, S>
where
    M: Resource,
    S: EntityService<M>,
{
    async fn list(&self, query: &ListQuery) -> Result<Page<M>, ServiceError> {
        self.inner.list(query).await
    }

    async fn find(&self, id: &M::Id) -> Result<Option<M>, ServiceError> {
        self.inner.find(id).await
    }

    async fn create(&self, model: M) -> Result<Mutation<M>, ServiceError> {
        self.inner.create(model).await
    }

    async fn edit(&self, model: M) -> Result<Mutation, ServiceError> {
        self.inner.edit(model).await
    }

    async fn delete(&self, model: M) -> Result<Mutation, ServiceError> {
        if self.dispatcher.is_empty() {
            return self.inner.delete(model).await;
        }
        let deleting = EntityEvent::new(EventKind::Deleting, model);
        if let Mutation::Rejected(errors) = self.dispatcher.publish(&deleting).await? {
            return Ok(Mutation::Rejected(errors));
        }
        let outcome = self.inner.delete(deleting.entity.clone()).await?;
        if outcome.is_applied() {
            let deleted = EntityEvent::new(EventKind::Deleted, deleting.entity);
            match self.dispatcher.publish(&deleted).await {
                Ok(Mutation::Applied(())) => {}
                Ok(Mutation::Rejected(errors)) => tracing::warn!(
                    id = ?deleted.entity.id(),
                    fields = errors.len(),
                    "deleted handler rejected an applied delete"
                ),
                Err(e) => tracing::warn!(id = ?deleted.entity.id(), error = %e, "deleted handler failed"),
            }
        }
        Ok(outcome)
    }

    async fn exists(&self, id: &M::Id) -> Result<bool, ServiceError> {
        self.inner.exists(id).await
    }
}
