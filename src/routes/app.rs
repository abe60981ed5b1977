//! Service router: common routes plus registered resources, behind a request body limit.

use super::common_routes;
use crate::registry::CrudRegistry;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

/// Resources are nested under `base_path` (merged at the root for `""` or `"/"`).
/// Bodies larger than `body_limit` bytes are answered with 413.
pub fn app_router(registry: CrudRegistry, base_path: &str, body_limit: usize) -> Router {
    let base = base_path.trim_end_matches('/');
    let common = common_routes(base, registry.segments().map(str::to_string).collect::<Vec<_>>());
    let resources = registry.into_router();
    let router = match base {
        "" => common.merge(resources),
        base => common.nest(base, resources),
    };
    router.layer(RequestBodyLimitLayer::new(body_limit))
}
