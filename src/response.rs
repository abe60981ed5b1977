//! Standard response envelope helpers.

use crate::controller::CrudResponse;
use crate::model::Page;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Serialize)]
pub struct SuccessOne<T> {
    pub data: T,
}

#[derive(Serialize)]
pub struct SuccessMany<T> {
    pub data: Vec<T>,
    pub meta: MetaPage,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaPage {
    pub count: u64,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

pub fn success_one<T: Serialize>(data: T) -> (StatusCode, Json<SuccessOne<T>>) {
    (StatusCode::OK, Json(SuccessOne { data }))
}

pub fn success_page<T: Serialize>(page: Page<T>) -> (StatusCode, Json<SuccessMany<T>>) {
    let count = page.items.len() as u64;
    (
        StatusCode::OK,
        Json(SuccessMany {
            data: page.items,
            meta: MetaPage {
                count,
                total: page.total,
                page: page.page,
                per_page: page.per_page,
            },
        }),
    )
}

impl<M: Serialize> IntoResponse for CrudResponse<M> {
    fn into_response(self) -> Response {
        match self {
            CrudResponse::Page(page) => success_page(page).into_response(),
            CrudResponse::Model(model) => success_one(model).into_response(),
            CrudResponse::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}
