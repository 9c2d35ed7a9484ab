use std::sync::Arc;

use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::token::TokenSource;

/// How the stored token is written into the `Authorization` header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthScheme {
    /// The token verbatim. This is what the Pragati API expects.
    #[default]
    Raw,
    /// `Bearer <token>`.
    Bearer,
}

/// Called once per `401` response, before the error is returned.
pub type UnauthorizedHook = Arc<dyn Fn() + Send + Sync>;

/// Client for authenticated API calls.
///
/// Every call goes through one place that recognises an expired or
/// rejected token: the registered [`UnauthorizedHook`] runs (typically
/// clearing the session and sending the user to login), then
/// [`ApiError::Unauthorized`] is returned.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token_source: Arc<dyn TokenSource>,
    scheme: AuthScheme,
    on_unauthorized: Option<UnauthorizedHook>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token_source: Arc<dyn TokenSource>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token_source,
            scheme: AuthScheme::default(),
            on_unauthorized: None,
        }
    }

    pub fn with_scheme(mut self, scheme: AuthScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn on_unauthorized(mut self, hook: UnauthorizedHook) -> Self {
        self.on_unauthorized = Some(hook);
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.send(self.http.get(self.url(path))).await
    }

    pub async fn post_json<B: Serialize + Sync, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ApiError> {
        self.send(self.http.post(self.url(path)).json(body)).await
    }

    async fn send<R: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<R, ApiError> {
        let builder = match self.token_source.token().await? {
            Some(token) => builder.header(AUTHORIZATION, self.header_value(&token)),
            None => builder,
        };

        let resp = builder.send().await?;
        let status = resp.status();
        debug!("{} {}", status.as_u16(), resp.url());

        if status == StatusCode::UNAUTHORIZED {
            let message = resp.text().await.unwrap_or_default();
            warn!("api: token rejected, ending session");
            if let Some(hook) = &self.on_unauthorized {
                hook();
            }
            return Err(ApiError::Unauthorized(message));
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }
        resp.json::<R>()
            .await
            .map_err(|e| ApiError::Decode(format!("response body: {}", e)))
    }

    fn header_value(&self, token: &str) -> String {
        match self.scheme {
            AuthScheme::Raw => token.to_string(),
            AuthScheme::Bearer => format!("Bearer {}", token),
        }
    }
}
