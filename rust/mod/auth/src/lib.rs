//! Two-step OTP login and permission-gated navigation for the Pragati
//! client.
//!
//! # Layout
//!
//! - [`state`] / [`request`]: the Flux paths a shell reads and emits.
//! - [`handshake`]: credentials → OTP → session.
//! - [`guard`] + [`navigation`]: route decisions and history.
//! - [`session`] + [`permission`]: the persisted record and its map.
//! - [`handlers`]: wires requests to the above.
//!
//! # Usage
//!
//! ```ignore
//! let ctx = Arc::new(AuthContext::new(api, ip, kv));
//! let flux = Flux::new();
//! register_handlers(&flux, ctx);
//! flux.emit(InitializeReq::PATH, InitializeReq { path: "/dashboard".into() }).await;
//! ```

#[path = "../dsl/state/mod.rs"]
pub mod state;

#[path = "../dsl/request/mod.rs"]
pub mod request;

pub mod guard;
pub mod handlers;
pub mod handshake;
pub mod navigation;
pub mod otp;
pub mod permission;
pub mod routes;
pub mod session;
pub mod validate;

pub use handlers::{register_handlers, AuthContext};
