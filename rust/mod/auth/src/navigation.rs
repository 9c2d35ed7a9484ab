//! Route/history/notice maintenance on top of the guard.

use tracing::{error, info};

use pragati_flux::StateStore;

use crate::guard::{GuardDecision, NavigationGuard};
use crate::routes::{View, DASHBOARD_PATH, LOGIN_PATH};
use crate::session::SessionStore;
use crate::state::*;

/// Show a notice, replacing any pending one.
pub fn notify(store: &StateStore, notice: Notice) {
    store.set(NoticeState::PATH, NoticeState { current: Some(notice) });
}

#[derive(Clone)]
pub struct Navigator {
    guard: NavigationGuard,
    session: SessionStore,
}

impl Navigator {
    pub fn new(guard: NavigationGuard, session: SessionStore) -> Self {
        Self { guard, session }
    }

    pub fn guard(&self) -> &NavigationGuard {
        &self.guard
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Attempt to open `path` and apply the guard's decision.
    pub fn navigate(&self, store: &StateStore, path: &str) -> GuardDecision {
        let decision = self.guard.evaluate(path);
        match &decision {
            GuardDecision::Render { path, view } => {
                self.show(store, path, *view, false);
            }
            GuardDecision::RedirectToLogin => {
                self.show(store, LOGIN_PATH, View::Login, true);
            }
            GuardDecision::Deny { view, .. } => {
                notify(
                    store,
                    Notice::error(
                        "Access Denied",
                        format!("You do not have permission to view {}.", view.title()),
                    ),
                );
                self.show(store, DASHBOARD_PATH, View::Dashboard, false);
            }
        }
        decision
    }

    /// Step back one history entry. The previous entry is guarded again,
    /// so a session that ended in the meantime still lands on login.
    pub fn back(&self, store: &StateStore) -> Option<GuardDecision> {
        let mut history = store
            .get_as::<NavHistory>(NavHistory::PATH)
            .unwrap_or_default();
        if history.entries.len() < 2 {
            return None;
        }
        history.entries.pop();
        let target = history.entries.last().cloned().unwrap_or_default();
        store.set(NavHistory::PATH, history);
        Some(self.navigate(store, &target))
    }

    /// Explicit logout: drop the session and return to a fresh login form.
    pub fn logout(&self, store: &StateStore) {
        if let Err(e) = self.session.clear_session() {
            error!("logout: {}", e);
        }
        info!("logged out");
        self.reset_to_login(store);
    }

    /// The server refused the stored token.
    pub fn session_expired(&self, store: &StateStore) {
        if let Err(e) = self.session.clear_session() {
            error!("session expired: {}", e);
        }
        info!("session expired, returning to login");
        notify(store, Notice::warning("Session expired", "Please log in again."));
        self.reset_to_login(store);
    }

    pub fn acknowledge(&self, store: &StateStore) {
        store.set(NoticeState::PATH, NoticeState::default());
    }

    fn reset_to_login(&self, store: &StateStore) {
        store.set(LoginState::PATH, LoginState::default());
        store.set(
            NavHistory::PATH,
            NavHistory {
                entries: vec![LOGIN_PATH.to_string()],
            },
        );
        store.set(
            AppRoute::PATH,
            AppRoute {
                path: LOGIN_PATH.to_string(),
                view: View::Login,
            },
        );
    }

    fn show(&self, store: &StateStore, path: &str, view: View, replace: bool) {
        let mut history = store
            .get_as::<NavHistory>(NavHistory::PATH)
            .unwrap_or_default();
        if replace {
            history.replace(path);
        } else {
            history.push(path);
        }
        store.set(NavHistory::PATH, history);

        if view != View::Login {
            if let Err(e) = self.session.set_header_copies() {
                error!("header copies: {}", e);
            }
        }
        store.set(
            AppRoute::PATH,
            AppRoute {
                path: path.to_string(),
                view,
            },
        );
    }
}
