//! CRUD handlers: list, read, create, update, delete. Generic over the resource; the
//! controller in state decides permissions and outcomes.

use crate::authz::Principal;
use crate::controller::{CrudController, CrudResponse};
use crate::error::AppError;
use crate::model::{ListQuery, Resource};
use axum::extract::{Path, Query, State};
use axum::Json;

pub async fn list<M: Resource>(
    State(ctl): State<CrudController<M>>,
    principal: Principal,
    Query(query): Query<ListQuery>,
) -> Result<CrudResponse<M>, AppError> {
    ctl.list(&principal, query).await
}

pub async fn read<M: Resource>(
    State(ctl): State<CrudController<M>>,
    principal: Principal,
    Path(id): Path<M::Id>,
) -> Result<CrudResponse<M>, AppError> {
    ctl.get(&principal, id).await
}

pub async fn create<M: Resource>(
    State(ctl): State<CrudController<M>>,
    principal: Principal,
    Json(model): Json<M>,
) -> Result<CrudResponse<M>, AppError> {
    ctl.create(&principal, model).await
}

pub async fn update<M: Resource>(
    State(ctl): State<CrudController<M>>,
    principal: Principal,
    Path(id): Path<M::Id>,
    Json(model): Json<M>,
) -> Result<CrudResponse<M>, AppError> {
    ctl.update(&principal, id, model).await
}

pub async fn delete<M: Resource>(
    State(ctl): State<CrudController<M>>,
    principal: Principal,
    Path(id): Path<M::Id>,
) -> Result<CrudResponse<M>, AppError> {
    ctl.delete(&principal, id).await
}
