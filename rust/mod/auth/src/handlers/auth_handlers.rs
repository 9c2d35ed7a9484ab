//! Login/logout handler implementations.

use pragati_flux::StateStore;

use super::AuthContext;
use crate::handshake::Outcome;
use crate::routes::DASHBOARD_PATH;

/// Handle `auth/send-otp`.
pub async fn handle_send_otp(store: &StateStore, ctx: &AuthContext) {
    ctx.handshake.send_otp(store).await;
}

/// Handle `auth/verify-otp`. A successful login lands on the dashboard.
pub async fn handle_verify_otp(store: &StateStore, ctx: &AuthContext) {
    if ctx.handshake.verify_otp(store).await == Outcome::Authenticated {
        ctx.navigator.navigate(store, DASHBOARD_PATH);
    }
}

/// Handle `auth/logout`.
pub async fn handle_logout(store: &StateStore, ctx: &AuthContext) {
    ctx.navigator.logout(store);
}
