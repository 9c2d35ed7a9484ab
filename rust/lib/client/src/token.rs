use crate::error::ApiError;

/// Supplies the `Authorization` value for each protected request.
///
/// Read on every call so a logout or re-login is seen immediately.
/// `Ok(None)` sends the request without the header.
#[async_trait::async_trait]
pub trait TokenSource: Send + Sync + 'static {
    async fn token(&self) -> Result<Option<String>, ApiError>;
}
