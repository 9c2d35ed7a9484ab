//! App lifecycle handler implementations.

use pragati_flux::StateStore;

use super::AuthContext;
use crate::guard::GuardDecision;
use crate::request::*;
use crate::routes::View;
use crate::state::*;

/// Handle `app/initialize`: fresh navigation state, then open the
/// requested path.
pub async fn handle_initialize(req: &InitializeReq, store: &StateStore, ctx: &AuthContext) {
    store.set(NavHistory::PATH, NavHistory::default());
    store.set(NoticeState::PATH, NoticeState::default());
    ctx.handshake.reset(store);
    open(&req.path, store, ctx).await;
}

/// Handle `app/navigate`.
pub async fn handle_navigate(req: &NavigateReq, store: &StateStore, ctx: &AuthContext) {
    open(&req.path, store, ctx).await;
}

/// Handle `app/back`.
pub async fn handle_back(store: &StateStore, ctx: &AuthContext) {
    if ctx.navigator.back(store).is_some() {
        on_login_view(store, ctx).await;
    }
}

async fn open(path: &str, store: &StateStore, ctx: &AuthContext) {
    let decision = ctx.navigator.navigate(store, path);
    if !matches!(decision, GuardDecision::Deny { .. }) {
        on_login_view(store, ctx).await;
    }
}

/// The login view resolves the client address when it mounts.
async fn on_login_view(store: &StateStore, ctx: &AuthContext) {
    let on_login = store
        .get_as::<AppRoute>(AppRoute::PATH)
        .is_some_and(|r| r.view == View::Login);
    if on_login {
        ctx.handshake.lookup_ip(store).await;
    }
}
