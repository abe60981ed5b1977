//! Construction-time composition of service decorators.

use super::{
    EntityService, SharedService, TracedService, TransactionManager, TransactionalService,
    ValidatingService, Validator,
};
use crate::events::{EventDispatcher, EventingService};
use crate::model::Resource;
use std::sync::Arc;

/// Wraps a service in decorators, in call order: each layer added wraps everything added
/// before it, so the last one added runs first.
///
/// ```ignore
/// let notes = ServiceStack::new(InMemoryService::new(|n| n))
///     .validate(rules)
///     .events(dispatcher)
///     .transactional(Arc::new(LockingTransactions::new()))
///     .traced("notes")
///     .build();
/// ```
pub struct ServiceStack<M: Resource> {
    service: SharedService<M>,
}

impl<M: Resource> ServiceStack<M> {
    pub fn new(inner: impl EntityService<M> + 'static) -> Self {
        ServiceStack {
            service: Arc::new(inner),
        }
    }

    pub fn from_shared(service: SharedService<M>) -> Self {
        ServiceStack { service }
    }

    pub fn validate(self, validator: impl Validator<M> + 'static) -> Self {
        Self::from_shared(Arc::new(ValidatingService::new(self.service, validator)))
    }

    pub fn events(self, dispatcher: EventDispatcher<M>) -> Self {
        Self::from_shared(Arc::new(EventingService::new(self.service, dispatcher)))
    }

    pub fn transactional(self, transactions: Arc<dyn TransactionManager>) -> Self {
        Self::from_shared(Arc::new(TransactionalService::new(self.service, transactions)))
    }

    pub fn traced(self, resource: impl Into<String>) -> Self {
        Self::from_shared(Arc::new(TracedService::new(self.service, resource)))
    }

    pub fn build(self) -> SharedService<M> {
        self.service
    }
}
