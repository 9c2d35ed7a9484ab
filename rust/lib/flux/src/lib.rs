//! Flux: path-based client state engine.
//!
//! The client core owns all state and logic; a shell (CLI, desktop, web
//! view) only renders what it reads and emits what the user does.
//!
//! - `get(path)` reads state, an `Arc` clone
//! - `emit(path, payload)` routes a request to matching handler(s)
//! - `subscribe(pattern, f)` observes state writes
//!
//! Paths are `/`-separated (`auth/login`, `app/route`). Handler and
//! subscription patterns accept MQTT-style wildcards: `+` for one level,
//! `#` for everything below.

pub mod app;
pub mod router;
pub mod store;
pub mod trie;
pub mod value;

pub use app::Flux;
pub use router::{BoxFuture, Payload, Router};
pub use store::{ChangeHandler, StateStore};
pub use value::{StateValue, SubscriptionId};
