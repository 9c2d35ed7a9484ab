//! The fixed route table: path → view, plus the module a view needs.

use serde::{Deserialize, Serialize};

use crate::permission::ModuleKey;

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum View {
    Login,
    Dashboard,
    ChangePassword,
    PartyMaster,
    Transactions,
    IncomeCategory,
    ExpenseCategory,
    Roles,
    Users,
    Reports,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            View::Login => "Login",
            View::Dashboard => "Dashboard",
            View::ChangePassword => "Change Password",
            View::PartyMaster => "Party Master",
            View::Transactions => "Transactions",
            View::IncomeCategory => "Income Categories",
            View::ExpenseCategory => "Expense Categories",
            View::Roles => "Roles",
            View::Users => "Users",
            View::Reports => "Reports",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Anyone, logged in or not.
    Public,
    /// Any logged-in user.
    Authenticated,
    /// Logged-in users whose role can read the module.
    Module(ModuleKey),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub view: View,
    pub access: Access,
}

impl Route {
    /// The module whose read permission the view needs, if any.
    pub fn module(&self) -> Option<ModuleKey> {
        match self.access {
            Access::Module(m) => Some(m),
            Access::Public | Access::Authenticated => None,
        }
    }
}

pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// The application's routes.
    pub fn standard() -> Self {
        use Access::*;
        let r = |path: &'static str, view: View, access: Access| Route { path, view, access };
        Self::new(vec![
            r(LOGIN_PATH, View::Login, Public),
            r(DASHBOARD_PATH, View::Dashboard, Authenticated),
            r("/change-password", View::ChangePassword, Authenticated),
            r("/party-master", View::PartyMaster, Module(ModuleKey::PartyMaster)),
            r("/transactions", View::Transactions, Module(ModuleKey::Transactions)),
            r("/income-category", View::IncomeCategory, Module(ModuleKey::IncomeCategory)),
            r("/expense-category", View::ExpenseCategory, Module(ModuleKey::ExpenseCategory)),
            r("/roles", View::Roles, Module(ModuleKey::Roles)),
            r("/users", View::Users, Module(ModuleKey::Users)),
            r("/reports", View::Reports, Module(ModuleKey::Reports)),
        ])
    }

    /// Look up a path. Query strings, fragments and a trailing slash are
    /// ignored.
    pub fn resolve(&self, path: &str) -> Option<&Route> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        self.routes.iter().find(|r| r.path == path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }
}
