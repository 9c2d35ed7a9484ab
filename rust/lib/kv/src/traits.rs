use crate::error::KVError;

/// KVStore is the string-keyed storage the session layer persists into.
///
/// Keys are flat names such as `isAuthenticated` or `userData`; values are
/// UTF-8 strings (JSON blobs are stored already encoded).
pub trait KVStore: Send + Sync {
    /// Get the value for a key. Returns None if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<String>, KVError>;

    /// Set a key-value pair, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), KVError>;

    /// Delete a key. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), KVError>;

    /// Set several pairs in one atomic write.
    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), KVError>;

    /// Delete several keys in one atomic write.
    fn delete_many(&self, keys: &[&str]) -> Result<(), KVError>;

    /// All keys currently stored, sorted.
    fn keys(&self) -> Result<Vec<String>, KVError>;
}
