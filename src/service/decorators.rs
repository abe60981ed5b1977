//! Service decorators. Each wraps an inner `EntityService` and implements the same trait.

use super::{EntityService, TransactionManager, Validator};
use crate::error::ServiceError;
use crate::model::{ListQuery, Mutation, Page, Resource};
use async_trait::async_trait;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

/// Rejects invalid models on create and edit before the inner service sees them.
pub struct ValidatingService<M, S, V> {
    inner: S,
    validator: V,
    _model: PhantomData<fn(M)>,
}

impl<M, S, V> ValidatingService<M, S, V> {
    pub fn new(inner: S, validator: V) -> Self {
        ValidatingService {
            inner,
            validator,
            _model: PhantomData,
        }
    }
}

#[async_trait]
impl<M, S, V> EntityService<M> for ValidatingService<M, S, V>
where
    M: Resource,
    S: EntityService<M>,
    V: Validator<M>,
{
    async fn list(&self, query: &ListQuery) -> Result<Page<M>, ServiceError> {
        self.inner.list(query).await
    }

    async fn find(&self, id: &M::Id) -> Result<Option<M>, ServiceError> {
        self.inner.find(id).await
    }

    async fn create(&self, model: M) -> Result<Mutation<M>, ServiceError> {
        let errors = self.validator.validate(&model);
        if !errors.is_empty() {
            return Ok(Mutation::Rejected(errors));
        }
        self.inner.create(model).await
    }

    async fn edit(&self, model: M) -> Result<Mutation, ServiceError> {
        let errors = self.validator.validate(&model);
        if !errors.is_empty() {
            return Ok(Mutation::Rejected(errors));
        }
        self.inner.edit(model).await
    }

    async fn delete(&self, model: M) -> Result<Mutation, ServiceError> {
        self.inner.delete(model).await
    }

    async fn exists(&self, id: &M::Id) -> Result<bool, ServiceError> {
        self.inner.exists(id).await
    }
}

/// Runs each mutation in its own transaction: commit when applied, roll back otherwise.
pub struct TransactionalService<S> {
    inner: S,
    transactions: Arc<dyn TransactionManager>,
}

impl<S> TransactionalService<S> {
    pub fn new(inner: S, transactions: Arc<dyn TransactionManager>) -> Self {
        TransactionalService { inner, transactions }
    }

    async fn in_transaction<T, F>(&self, op: F) -> Result<Mutation<T>, ServiceError>
    where
        F: Future<Output = Result<Mutation<T>, ServiceError>> + Send,
        T: Send,
    {
        let tx = self.transactions.begin().await?;
        match op.await {
            Ok(Mutation::Applied(value)) => {
                tx.commit().await?;
                Ok(Mutation::Applied(value))
            }
            Ok(rejected) => {
                tx.rollback().await?;
                Ok(rejected)
            }
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    tracing::warn!(error = %rollback, "rollback failed after service error");
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl<M, S> EntityService<M> for TransactionalService<S>
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
        self.in_transaction(self.inner.create(model)).await
    }

    async fn edit(&self, model: M) -> Result<Mutation, ServiceError> {
        self.in_transaction(self.inner.edit(model)).await
    }

    async fn delete(&self, model: M) -> Result<Mutation, ServiceError> {
        self.in_transaction(self.inner.delete(model)).await
    }

    async fn exists(&self, id: &M::Id) -> Result<bool, ServiceError> {
        self.inner.exists(id).await
    }
}

/// Emits a tracing event for every call, tagged with the resource name.
pub struct TracedService<S> {
    inner: S,
    resource: String,
}

impl<S> TracedService<S> {
    pub fn new(inner: S, resource: impl Into<String>) -> Self {
        TracedService {
            inner,
            resource: resource.into(),
        }
    }

    fn record<T>(&self, op: &'static str, result: &Result<Mutation<T>, ServiceError>) {
        match result {
            Ok(Mutation::Applied(_)) => {
                tracing::debug!(resource = %self.resource, op, "mutation applied")
            }
            Ok(Mutation::Rejected(errors)) => {
                tracing::info!(resource = %self.resource, op, fields = errors.len(), "mutation rejected")
            }
            Err(e) => tracing::warn!(resource = %self.resource, op, error = %e, "service call failed"),
        }
    }

    fn record_failure<T>(&self, op: &'static str, result: &Result<T, ServiceError>) {
        if let Err(e) = result {
            tracing::warn!(resource = %self.resource, op, error = %e, "service call failed");
        }
    }
}

#[async_trait]
impl<M, S> EntityService<M> for TracedService<S>
where
    M: Resource,
    S: EntityService<M>,
{
    async fn list(&self, query: &ListQuery) -> Result<Page<M>, ServiceError> {
        let result = self.inner.list(query).await;
        if let Ok(page) = &result {
            tracing::debug!(
                resource = %self.resource,
                op = "list",
                page = page.page,
                per_page = page.per_page,
                total = page.total,
                count = page.items.len(),
                "read completed"
            );
        }
        self.record_failure("list", &result);
        result
    }

    async fn find(&self, id: &M::Id) -> Result<Option<M>, ServiceError> {
        let result = self.inner.find(id).await;
        if let Ok(found) = &result {
            tracing::debug!(resource = %self.resource, op = "find", id = %id, found = found.is_some(), "read completed");
        }
        self.record_failure("find", &result);
        result
    }

    async fn create(&self, model: M) -> Result<Mutation<M>, ServiceError> {
        let result = self.inner.create(model).await;
        self.record("create", &result);
        result
    }

    async fn edit(&self, model: M) -> Result<Mutation, ServiceError> {
        let result = self.inner.edit(model).await;
        self.record("edit", &result);
        result
    }

    async fn delete(&self, model: M) -> Result<Mutation, ServiceError> {
        let result = self.inner.delete(model).await;
        self.record("delete", &result);
        result
    }

    async fn exists(&self, id: &M::Id) -> Result<bool, ServiceError> {
        let result = self.inner.exists(id).await;
        if let Ok(exists) = &result {
            tracing::debug!(resource = %self.resource, op = "exists", id = %id, exists = *exists, "read completed");
        }
        self.record_failure("exists", &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldErrors;
    use crate::service::Transaction;
    use crate::test_support::{note_store, Note, Recorder};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Journal(Mutex<Vec<&'static str>>);

    struct JournalTx(Arc<Journal>);

    #[async_trait]
    impl Transaction for JournalTx {
        async fn commit(self: Box<Self>) -> Result<(), ServiceError> {
            self.0 .0.lock().unwrap().push("commit");
            Ok(())
        }

        async fn rollback(self: Box<Self>) -> Result<(), ServiceError> {
            self.0 .0.lock().unwrap().push("rollback");
            Ok(())
        }
    }

    struct JournalManager(Arc<Journal>);

    #[async_trait]
    impl TransactionManager for JournalManager {
        async fn begin(&self) -> Result<Box<dyn Transaction>, ServiceError> {
            self.0 .0.lock().unwrap().push("begin");
            Ok(Box::new(JournalTx(self.0.clone())))
        }
    }

    fn non_empty_title(note: &Note) -> FieldErrors {
        if note.title.trim().is_empty() {
            FieldErrors::single("title", "title is required")
        } else {
            FieldErrors::new()
        }
    }

    #[tokio::test]
    async fn validation_short_circuits_before_inner_service() {
        let inner = Arc::new(Recorder::new(note_store()));
        let svc: ValidatingService<Note, _, _> = ValidatingService::new(inner.clone(), non_empty_title);

        let outcome = svc.create(Note::new(None, " ")).await.unwrap();
        assert_eq!(outcome.errors().and_then(|e| e.get("title")).map(|m| m.len()), Some(1));
        assert!(inner.calls().is_empty());

        assert!(svc.create(Note::new(None, "ok")).await.unwrap().is_applied());
        assert_eq!(inner.calls(), vec!["create"]);
    }

    #[tokio::test]
    async fn transactions_commit_on_applied_and_roll_back_on_rejected() {
        let journal = Arc::new(Journal::default());
        let svc = TransactionalService::new(note_store(), Arc::new(JournalManager(journal.clone())));

        assert!(svc.create(Note::new(Some("1"), "a")).await.unwrap().is_applied());
        assert!(!svc.create(Note::new(Some("1"), "dup")).await.unwrap().is_applied());
        let _ = svc.find(&"1".to_string()).await.unwrap();

        assert_eq!(
            *journal.0.lock().unwrap(),
            vec!["begin", "commit", "begin", "rollback"]
        );
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[tokio::test]
    async fn traced_service_records_read_outcomes() {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(captured.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let svc = TracedService::new(note_store().with_rows([Note::new(Some("1"), "a")]), "notes");
        svc.list(&ListQuery::default()).await.unwrap();
        svc.find(&"9".to_string()).await.unwrap();
        svc.exists(&"1".to_string()).await.unwrap();

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("total=1"), "{output}");
        assert!(output.contains("found=false"), "{output}");
        assert!(output.contains("exists=true"), "{output}");
    }

    #[tokio::test]
    async fn traced_service_is_transparent() {
        let svc = TracedService::new(note_store(), "notes");
        let created = svc.create(Note::new(None, "a")).await.unwrap().into_result().unwrap();
        assert!(svc.exists(created.id.as_ref().unwrap()).await.unwrap());
        assert!(svc.delete(created).await.unwrap().is_applied());
    }
}
