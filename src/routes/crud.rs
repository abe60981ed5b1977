//! Resource CRUD routes: `/{segment}` for list and create, `/{segment}/:id` for the rest.

use crate::controller::CrudController;
use crate::handlers::crud::{create, delete as delete_handler, list, read, update};
use crate::model::Resource;
use axum::{routing::get, Router};

pub fn crud_routes<M: Resource>(segment: &str, controller: CrudController<M>) -> Router {
    let collection = format!("/{}", segment);
    let item = format!("/{}/:id", segment);
    Router::new()
        .route(&collection, get(list::<M>).post(create::<M>))
        .route(&item, get(read::<M>).put(update::<M>).delete(delete_handler::<M>))
        .with_state(controller)
}
