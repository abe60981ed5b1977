//! Request extractors.

mod principal;
pub use principal::{USER_ID_HEADER, USER_ROLES_HEADER};
