//! Service layer for business logic
//!
//! Services receive the storage handle at construction and are shared by
//! the HTTP handlers through `web::Data`.

mod analytics_service;
mod link_service;
mod resolution;
pub mod token;

pub use analytics_service::*;
pub use link_service::*;
pub use resolution::*;
pub use token::{RandomTokenSource, TokenGenerator, TokenSource};
