//! Per-navigation access decision.

use std::sync::Arc;

use tracing::debug;

use crate::permission::{Action, ModuleKey};
use crate::routes::{Access, RouteTable, View};
use crate::session::SessionStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Render { path: &'static str, view: View },
    /// No session, or the path is unknown. History entry is replaced.
    RedirectToLogin,
    /// Logged in but the role cannot read `module`.
    Deny { view: View, module: ModuleKey },
}

/// Decides whether a path may be rendered.
///
/// The session is read on every call; nothing is cached, so a re-login
/// with a different role takes effect on the next navigation. The guard
/// never writes to the session.
#[derive(Clone)]
pub struct NavigationGuard {
    routes: Arc<RouteTable>,
    session: SessionStore,
}

impl NavigationGuard {
    pub fn new(routes: Arc<RouteTable>, session: SessionStore) -> Self {
        Self { routes, session }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn evaluate(&self, path: &str) -> GuardDecision {
        let Some(route) = self.routes.resolve(path) else {
            debug!("guard: unknown path {:?}", path);
            return GuardDecision::RedirectToLogin;
        };
        let render = GuardDecision::Render {
            path: route.path,
            view: route.view,
        };

        if route.access == Access::Public {
            return render;
        }
        if !self.session.is_authenticated() {
            debug!("guard: {} needs a session", route.path);
            return GuardDecision::RedirectToLogin;
        }
        if let Access::Module(module) = route.access {
            if !self.session.permissions().allows(module, Action::Read) {
                debug!("guard: {} denied, no read on {}", route.path, module);
                return GuardDecision::Deny {
                    view: route.view,
                    module,
                };
            }
        }
        render
    }
}
