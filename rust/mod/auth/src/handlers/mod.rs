//! Flux wiring: one `flux.on(...)` per request path.

mod app_handlers;
mod auth_handlers;

use std::any::Any;
use std::sync::Arc;

use tracing::warn;

use pragati_client::{ApiClient, AuthApi, AuthScheme, IpLookup};
use pragati_flux::{Flux, Payload, StateStore};
use pragati_kv::KVStore;

use crate::guard::NavigationGuard;
use crate::handshake::HandshakeController;
use crate::navigation::Navigator;
use crate::request::*;
use crate::routes::RouteTable;
use crate::session::SessionStore;

/// Everything the handlers share.
pub struct AuthContext {
    pub handshake: HandshakeController,
    pub navigator: Navigator,
}

impl AuthContext {
    pub fn new(api: Arc<dyn AuthApi>, ip: Arc<dyn IpLookup>, kv: Arc<dyn KVStore>) -> Self {
        let session = SessionStore::new(kv);
        let guard = NavigationGuard::new(Arc::new(RouteTable::standard()), session.clone());
        Self {
            handshake: HandshakeController::new(api, ip, session.clone()),
            navigator: Navigator::new(guard, session),
        }
    }

    pub fn session(&self) -> &SessionStore {
        self.navigator.session()
    }

    /// Client for protected endpoints. A 401 from any call ends the
    /// session and sends the user back to login.
    pub fn api_client(
        &self,
        store: Arc<StateStore>,
        base_url: &str,
        scheme: AuthScheme,
    ) -> ApiClient {
        let navigator = self.navigator.clone();
        ApiClient::new(base_url, Arc::new(self.session().clone()))
            .with_scheme(scheme)
            .on_unauthorized(Arc::new(move || navigator.session_expired(&store)))
    }
}

fn payload_as<R: Any + Clone>(path: &str, payload: &Payload) -> Option<R> {
    let req = payload.downcast_ref::<R>().cloned();
    if req.is_none() {
        warn!("{}: unexpected payload type", path);
    }
    req
}

/// Register all handlers with a Flux instance.
pub fn register_handlers(flux: &Flux, ctx: Arc<AuthContext>) {
    // app/initialize
    {
        let ctx = ctx.clone();
        flux.on(InitializeReq::PATH, move |_, payload, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                if let Some(req) = payload_as::<InitializeReq>(InitializeReq::PATH, &payload) {
                    app_handlers::handle_initialize(&req, &store, &ctx).await;
                }
            }
        });
    }

    // app/navigate
    {
        let ctx = ctx.clone();
        flux.on(NavigateReq::PATH, move |_, payload, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                if let Some(req) = payload_as::<NavigateReq>(NavigateReq::PATH, &payload) {
                    app_handlers::handle_navigate(&req, &store, &ctx).await;
                }
            }
        });
    }

    // app/back
    {
        let ctx = ctx.clone();
        flux.on(BackReq::PATH, move |_, _, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                app_handlers::handle_back(&store, &ctx).await;
            }
        });
    }

    // app/acknowledge
    {
        let ctx = ctx.clone();
        flux.on(AcknowledgeReq::PATH, move |_, _, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                ctx.navigator.acknowledge(&store);
            }
        });
    }

    // auth/username
    {
        let ctx = ctx.clone();
        flux.on(UsernameInputReq::PATH, move |_, payload, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                if let Some(req) = payload_as::<UsernameInputReq>(UsernameInputReq::PATH, &payload) {
                    ctx.handshake.set_username(&store, &req.value);
                }
            }
        });
    }

    // auth/password
    {
        let ctx = ctx.clone();
        flux.on(PasswordInputReq::PATH, move |_, payload, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                if let Some(req) = payload_as::<PasswordInputReq>(PasswordInputReq::PATH, &payload) {
                    ctx.handshake.set_password(&store, &req.value);
                }
            }
        });
    }

    // auth/send-otp
    {
        let ctx = ctx.clone();
        flux.on(SendOtpReq::PATH, move |_, _, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                auth_handlers::handle_send_otp(&store, &ctx).await;
            }
        });
    }

    // auth/otp-input
    {
        let ctx = ctx.clone();
        flux.on(OtpInputReq::PATH, move |_, payload, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                if let Some(req) = payload_as::<OtpInputReq>(OtpInputReq::PATH, &payload) {
                    ctx.handshake.otp_input(&store, req.index, &req.text);
                }
            }
        });
    }

    // auth/otp-backspace
    {
        let ctx = ctx.clone();
        flux.on(OtpBackspaceReq::PATH, move |_, payload, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                if let Some(req) = payload_as::<OtpBackspaceReq>(OtpBackspaceReq::PATH, &payload) {
                    ctx.handshake.otp_backspace(&store, req.index);
                }
            }
        });
    }

    // auth/verify-otp
    {
        let ctx = ctx.clone();
        flux.on(VerifyOtpReq::PATH, move |_, _, store: Arc<StateStore>| {
            let ctx = ctx.clone();
            async move {
                auth_handlers::handle_verify_otp(&store, &ctx).await;
            }
        });
    }

    // auth/logout
    flux.on(LogoutReq::PATH, move |_, _, store: Arc<StateStore>| {
        let ctx = ctx.clone();
        async move {
            auth_handlers::handle_logout(&store, &ctx).await;
        }
    });
}
