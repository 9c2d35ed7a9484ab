use serde::Deserialize;
use tracing::warn;

/// Public service queried for the caller's address.
pub const DEFAULT_IP_LOOKUP_URL: &str = "https://api.ipify.org?format=json";

/// Best-effort discovery of the client's public IP.
///
/// Never fails: a lookup that cannot complete yields `None` and login
/// proceeds with an empty address.
#[async_trait::async_trait]
pub trait IpLookup: Send + Sync + 'static {
    async fn client_ip(&self) -> Option<String>;
}

/// [`IpLookup`] against a JSON service answering `{"ip": "..."}`.
pub struct HttpIpLookup {
    http: reqwest::Client,
    url: String,
}

#[derive(Deserialize)]
struct IpReply {
    ip: String,
}

impl HttpIpLookup {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

impl Default for HttpIpLookup {
    fn default() -> Self {
        Self::new(DEFAULT_IP_LOOKUP_URL)
    }
}

#[async_trait::async_trait]
impl IpLookup for HttpIpLookup {
    async fn client_ip(&self) -> Option<String> {
        let resp = match self.http.get(&self.url).send().await {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                warn!("ip lookup: {} returned {}", self.url, r.status());
                return None;
            }
            Err(e) => {
                warn!("ip lookup: {}", e);
                return None;
            }
        };
        match resp.json::<IpReply>().await {
            Ok(reply) if !reply.ip.is_empty() => Some(reply.ip),
            Ok(_) => None,
            Err(e) => {
                warn!("ip lookup: bad reply: {}", e);
                None
            }
        }
    }
}
