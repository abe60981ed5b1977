//! Entity service contract, the in-memory reference implementation and the
//! decorators that layer validation, transactions and tracing onto it.

mod decorators;
mod memory;
mod stack;
mod transaction;
mod validation;

pub use decorators::{TracedService, TransactionalService, ValidatingService};
pub use memory::InMemoryService;
pub use stack::ServiceStack;
pub use transaction::{LockingTransactions, Transaction, TransactionManager};
pub use validation::{RuleValidator, ValidationRule, Validator};

use crate::error::ServiceError;
use crate::model::{ListQuery, Mutation, Page, Resource};
use async_trait::async_trait;
use std::sync::Arc;

/// Operations the CRUD handlers delegate to. `Err` is reserved for
/// infrastructure failures; business rule violations are `Mutation::Rejected`.
#[async_trait]
pub trait EntityService<M: Resource>: Send + Sync {
    async fn list(&self, query: &ListQuery) -> Result<Page<M>, ServiceError>;

    async fn find(&self, id: &M::Id) -> Result<Option<M>, ServiceError>;

    /// Returns the created model carrying its assigned identifier.
    async fn create(&self, model: M) -> Result<Mutation<M>, ServiceError>;

    async fn edit(&self, model: M) -> Result<Mutation, ServiceError>;

    async fn delete(&self, model: M) -> Result<Mutation, ServiceError>;

    async fn exists(&self, id: &M::Id) -> Result<bool, ServiceError> {
        Ok(self.find(id).await?.is_some())
    }
}

pub type SharedService<M> = Arc<dyn EntityService<M>>;

#[async_trait]
impl<M, S> EntityService<M> for Arc<S>
where
    M: Resource,
    S: EntityService<M> + ?Sized,
{
    async fn list(&self, query: &ListQuery) -> Result<Page<M>, ServiceError> {
        (**self).list(query).await
    }

    async fn find(&self, id: &M::Id) -> Result<Option<M>, ServiceError> {
        (**self).find(id).await
    }

    async fn create(&self, model: M) -> Result<Mutation<M>, ServiceError> {
        (**self).create(model).await
    }

    async fn edit(&self, model: M) -> Result<Mutation, ServiceError> {
        (**self).edit(model).await
    }

    async fn delete(&self, model: M) -> Result<Mutation, ServiceError> {
        (**self).delete(model).await
    }

    async fn exists(&self, id: &M::Id) -> Result<bool, ServiceError> {
        (**self).exists(id).await
    }
}
