//! Unit-of-work seam used by `TransactionalService`.

use crate::error::ServiceError;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[async_trait]
pub trait Transaction: Send {
    async fn commit(self: Box<Self>) -> Result<(), ServiceError>;

    async fn rollback(self: Box<Self>) -> Result<(), ServiceError>;
}

#[async_trait]
pub trait TransactionManager: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn Transaction>, ServiceError>;
}

/// Serializes mutations in-process: each transaction holds one async mutex until it ends.
#[derive(Clone, Default)]
pub struct LockingTransactions {
    lock: Arc<Mutex<()>>,
}

impl LockingTransactions {
    pub fn new() -> Self {
        Self::default()
    }
}

struct LockedTransaction {
    _guard: OwnedMutexGuard<()>,
}

#[async_trait]
impl Transaction for LockedTransaction {
    async fn commit(self: Box<Self>) -> Result<(), ServiceError> {
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), ServiceError> {
        Ok(())
    }
}

#[async_trait]
impl TransactionManager for LockingTransactions {
    async fn begin(&self) -> Result<Box<dyn Transaction>, ServiceError> {
        let guard = self.lock.clone().lock_owned().await;
        Ok(Box::new(LockedTransaction { _guard: guard }))
    }
}
