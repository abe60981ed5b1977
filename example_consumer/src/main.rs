//! Example consumer: a notes service assembled from crud-scaffold.
//!
//! Run from repo root: `cargo run -p example-consumer`
//! Configure with `CRUD_*` variables (see `crud_scaffold::config`) or a `.env` file.

use async_trait::async_trait;
use crud_scaffold::service::{LockingTransactions, RuleValidator, ValidationRule};
use crud_scaffold::{
    app_router, init_tracing, load_policies, AppConfig, Authorizer, CrudRegistry, EntityEvent, EventDispatcher,
    EventHandler, EventKind, InMemoryService, Mutation, PermissionSet, Resource, ServiceError, ServiceStack,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Note {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<Uuid>,
    title: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    pinned: bool,
}

impl Resource for Note {
    type Id = Uuid;

    fn id(&self) -> Option<&Uuid> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = Some(id);
    }
}

/// Logs deletions and refuses to delete pinned notes.
struct DeletionAudit;

#[async_trait]
impl EventHandler<Note> for DeletionAudit {
    async fn handle(&self, event: &EntityEvent<Note>) -> Result<Mutation, ServiceError> {
        if event.kind == EventKind::Deleting && event.entity.pinned {
            return Ok(Mutation::rejected("pinned", "pinned notes cannot be deleted"));
        }
        tracing::info!(kind = ?event.kind, id = ?event.entity.id, at = %event.occurred_at, "note deletion");
        Ok(Mutation::Applied(()))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing("crud_scaffold=info,example_consumer=info");

    let config = AppConfig::from_env()?;
    let evaluator = load_policies(&config).await?;
    let authorizer = Authorizer::new(Arc::new(evaluator), config.permission_prefix.clone());

    let mut dispatcher = EventDispatcher::<Note>::new();
    dispatcher.subscribe(DeletionAudit);

    let notes = ServiceStack::new(InMemoryService::<Note>::new(|_| Uuid::new_v4()))
        .validate(
            RuleValidator::new()
                .rule(
                    "title",
                    ValidationRule {
                        required: Some(true),
                        min_length: Some(1),
                        max_length: Some(200),
                        ..Default::default()
                    },
                )
                .rule(
                    "body",
                    ValidationRule {
                        max_length: Some(10_000),
                        ..Default::default()
                    },
                ),
        )
        .events(dispatcher)
        .transactional(Arc::new(LockingTransactions::new()))
        .traced("notes")
        .build();

    let resources = CrudRegistry::new(authorizer)
        .get_permission(config.get_permission)
        .register("notes", notes, PermissionSet::for_resource("Notes"))?;

    let app = app_router(resources, "/api/v1", config.body_limit);

    let listener = TcpListener::bind(config.bind_addr.as_str()).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
