//! Extract the calling principal from request headers set by upstream authentication.

use crate::authz::Principal;
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};

pub const USER_ID_HEADER: &str = "x-user-id";
/// Comma-separated role names.
pub const USER_ROLES_HEADER: &str = "x-user-roles";

#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(principal_from_headers(&parts.headers))
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn principal_from_headers(headers: &HeaderMap) -> Principal {
    let Some(user_id) = header_value(headers, USER_ID_HEADER) else {
        return Principal::anonymous();
    };
    let roles = header_value(headers, USER_ROLES_HEADER)
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    Principal {
        user_id: Some(user_id.to_string()),
        roles,
    }
}
