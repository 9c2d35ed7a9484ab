//! Request types: flat access as `crate::request::*`.

mod app;
mod auth;

pub use app::*;
pub use auth::*;
