mod app;
mod common;
mod crud;

pub use app::app_router;
pub use common::common_routes;
pub use crud::crud_routes;
