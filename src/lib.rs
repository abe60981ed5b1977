//! CRUD scaffold: permission-gated generic CRUD handlers over an injected entity
//! service, with decorator-composed validation, transactions, tracing and
//! deletion events.

pub mod authz;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod registry;
pub mod response;
pub mod routes;
pub mod service;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod test_support;

pub use authz::{Authorizer, Decision, GetPermission, PermissionEvaluator, PermissionSet, Principal, StaticPolicyEvaluator};
pub use config::{load_policies, AppConfig};
pub use controller::{CrudController, CrudResponse};
pub use error::{AppError, ConfigError, ServiceError};
pub use events::{EntityEvent, EventDispatcher, EventHandler, EventKind};
pub use model::{FieldErrors, ListQuery, Mutation, Page, Resource};
pub use registry::CrudRegistry;
pub use routes::{app_router, common_routes, crud_routes};
pub use service::{EntityService, InMemoryService, ServiceStack, SharedService};
pub use telemetry::init_tracing;
