//! Client state types: flat access as `crate::state::*`.
//!
//! Each type carries the store path it lives at as `PATH`.

mod app;
mod auth;

pub use app::*;
pub use auth::*;
