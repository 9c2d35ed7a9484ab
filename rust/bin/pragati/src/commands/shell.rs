//! The Flux instance every command drives, built from the client config.

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use pragati_auth::request::*;
use pragati_auth::state::*;
use pragati_auth::{register_handlers, AuthContext};
use pragati_client::{ApiClient, HttpAuthApi, HttpIpLookup};
use pragati_flux::Flux;
use pragati_kv::RedbStore;

use crate::config::ClientConfig;

pub struct Shell {
    pub flux: Flux,
    pub ctx: Arc<AuthContext>,
    pub config: ClientConfig,
}

impl Shell {
    pub fn open(config: ClientConfig) -> Result<Self> {
        let db = config.session_path();
        debug!("session db: {}", db.display());
        let kv = RedbStore::open(&db)?;
        let ctx = Arc::new(AuthContext::new(
            Arc::new(HttpAuthApi::new(config.server.as_str())),
            Arc::new(HttpIpLookup::new(config.ip_lookup.as_str())),
            Arc::new(kv),
        ));
        let flux = Flux::new();
        register_handlers(&flux, ctx.clone());
        Ok(Self { flux, ctx, config })
    }

    pub fn require_server(&self) -> Result<()> {
        if self.config.server.is_empty() {
            anyhow::bail!("No server URL set. Run `pragati config set server <url>`.");
        }
        Ok(())
    }

    pub async fn start(&self, path: &str) {
        self.flux
            .emit(InitializeReq::PATH, InitializeReq { path: path.to_string() })
            .await;
    }

    pub fn route(&self) -> Option<AppRoute> {
        self.flux.get_as(AppRoute::PATH)
    }

    pub fn login_state(&self) -> LoginState {
        self.flux.get_as(LoginState::PATH).unwrap_or_default()
    }

    pub fn api(&self) -> ApiClient {
        self.ctx.api_client(
            self.flux.store().clone(),
            &self.config.server,
            self.config.auth_scheme.into(),
        )
    }

    /// Print the pending notice, if any, and acknowledge it.
    pub async fn show_notice(&self) -> Option<Notice> {
        let notice = self
            .flux
            .get_as::<NoticeState>(NoticeState::PATH)
            .and_then(|s| s.current)?;
        let tag = match notice.kind {
            NoticeKind::Success => "ok",
            NoticeKind::Error => "error",
            NoticeKind::Warning => "warning",
        };
        match &notice.text {
            Some(text) => eprintln!("[{}] {}: {}", tag, notice.title, text),
            None => eprintln!("[{}] {}", tag, notice.title),
        }
        self.flux.emit(AcknowledgeReq::PATH, AcknowledgeReq).await;
        Some(notice)
    }
}
