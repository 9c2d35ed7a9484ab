//! Durable string-keyed storage for client-side session data.
//!
//! Two backends share the [`KVStore`] trait: [`MemoryStore`] for tests and
//! throwaway shells, [`RedbStore`] for a session that survives restarts.

pub mod error;
pub mod memory;
pub mod redb;
pub mod traits;

pub use error::KVError;
pub use memory::MemoryStore;
pub use redb::RedbStore;
pub use traits::KVStore;
