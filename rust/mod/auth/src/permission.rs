//! Per-module capabilities granted by the user's role.
//!
//! The server sends permissions as a loosely shaped object (sometimes
//! JSON-encoded inside a string). [`PermissionMap::normalize`] turns that
//! into a closed, typed map exactly once, when the session is created.
//! Anything missing or malformed reads as "no access".

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Modules a role can be granted access to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKey {
    PartyMaster,
    Transactions,
    IncomeCategory,
    ExpenseCategory,
    Roles,
    Users,
    Reports,
}

impl ModuleKey {
    pub const ALL: [ModuleKey; 7] = [
        ModuleKey::PartyMaster,
        ModuleKey::Transactions,
        ModuleKey::IncomeCategory,
        ModuleKey::ExpenseCategory,
        ModuleKey::Roles,
        ModuleKey::Users,
        ModuleKey::Reports,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleKey::PartyMaster => "party_master",
            ModuleKey::Transactions => "transactions",
            ModuleKey::IncomeCategory => "income_category",
            ModuleKey::ExpenseCategory => "expense_category",
            ModuleKey::Roles => "roles",
            ModuleKey::Users => "users",
            ModuleKey::Reports => "reports",
        }
    }
}

impl fmt::Display for ModuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModuleKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModuleKey::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("unknown module: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Add,
    Edit,
    Delete,
}

/// The four switches a role holds for one module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub add: bool,
    #[serde(default)]
    pub edit: bool,
    #[serde(default)]
    pub delete: bool,
}

impl Capabilities {
    pub fn allows(&self, action: Action) -> bool {
        match action {
            Action::Read => self.read,
            Action::Add => self.add,
            Action::Edit => self.edit,
            Action::Delete => self.delete,
        }
    }

    /// Only a literal JSON `true` grants an action.
    fn from_value(value: &Value) -> Self {
        let flag = |name: &str| matches!(value.get(name), Some(Value::Bool(true)));
        Self {
            read: flag("read"),
            add: flag("add"),
            edit: flag("edit"),
            delete: flag("delete"),
        }
    }
}

/// Capabilities keyed by module. A module that is absent has none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PermissionMap(BTreeMap<ModuleKey, Capabilities>);

impl PermissionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from whatever the server sent.
    ///
    /// Accepts an object or a string holding a JSON object. Unknown module
    /// names are dropped; anything else yields an empty map.
    pub fn normalize(raw: &Value) -> Self {
        match raw {
            Value::Object(modules) => {
                let mut map = BTreeMap::new();
                for (name, caps) in modules {
                    match name.parse::<ModuleKey>() {
                        Ok(key) => {
                            map.insert(key, Capabilities::from_value(caps));
                        }
                        Err(_) => debug!("permissions: ignoring module {:?}", name),
                    }
                }
                Self(map)
            }
            Value::String(encoded) => match serde_json::from_str::<Value>(encoded) {
                Ok(inner @ Value::Object(_)) => Self::normalize(&inner),
                Ok(_) | Err(_) => {
                    warn!("permissions: payload string is not a JSON object");
                    Self::default()
                }
            },
            Value::Null => Self::default(),
            other => {
                warn!("permissions: unexpected payload type {}", type_name(other));
                Self::default()
            }
        }
    }

    pub fn set(&mut self, module: ModuleKey, caps: Capabilities) {
        self.0.insert(module, caps);
    }

    pub fn get(&self, module: ModuleKey) -> Capabilities {
        self.0.get(&module).copied().unwrap_or_default()
    }

    pub fn allows(&self, module: ModuleKey, action: Action) -> bool {
        self.get(module).allows(action)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ModuleKey, Capabilities)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }
}

impl<'de> Deserialize<'de> for PermissionMap {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(Self::normalize(&Value::deserialize(d)?))
    }
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn module_key_round_trips_names() {
        for key in ModuleKey::ALL {
            assert_eq!(key.as_str().parse::<ModuleKey>(), Ok(key));
            assert_eq!(serde_json::to_value(key).unwrap(), json!(key.as_str()));
        }
        assert!("dashboard".parse::<ModuleKey>().is_err());
    }

    #[test]
    fn normalize_object() {
        let map = PermissionMap::normalize(&json!({
            "reports": { "read": true, "add": false, "edit": true, "delete": false },
            "roles": { "read": false }
        }));
        assert!(map.allows(ModuleKey::Reports, Action::Read));
        assert!(map.allows(ModuleKey::Reports, Action::Edit));
        assert!(!map.allows(ModuleKey::Reports, Action::Delete));
        assert!(!map.allows(ModuleKey::Roles, Action::Read));
    }

    #[test]
    fn normalize_json_string() {
        let raw = json!("{\"party_master\":{\"read\":true,\"add\":true}}");
        let map = PermissionMap::normalize(&raw);
        assert!(map.allows(ModuleKey::PartyMaster, Action::Add));
        assert!(!map.allows(ModuleKey::PartyMaster, Action::Delete));
    }

    #[test]
    fn missing_module_or_action_is_denied() {
        let map = PermissionMap::normalize(&json!({ "users": { "read": true } }));
        assert!(!map.allows(ModuleKey::Reports, Action::Read));
        assert!(!map.allows(ModuleKey::Users, Action::Edit));
        assert_eq!(map.get(ModuleKey::Transactions), Capabilities::default());
    }

    #[test]
    fn truthy_non_bool_flags_are_denied() {
        let map = PermissionMap::normalize(&json!({
            "reports": { "read": "true", "add": 1, "edit": null }
        }));
        assert_eq!(map.get(ModuleKey::Reports), Capabilities::default());
    }

    #[test]
    fn unknown_modules_are_dropped() {
        let map = PermissionMap::normalize(&json!({
            "renewals": { "read": true },
            "reports": { "read": true }
        }));
        assert_eq!(map.iter().count(), 1);
    }

    #[test]
    fn malformed_payloads_yield_empty() {
        for raw in [json!(null), json!(42), json!([1, 2]), json!("not json"), json!("[1]")] {
            assert!(PermissionMap::normalize(&raw).is_empty(), "{raw}");
        }
    }

    #[test]
    fn serialized_map_reads_back() {
        let mut map = PermissionMap::new();
        map.set(
            ModuleKey::Reports,
            Capabilities {
                read: true,
                ..Default::default()
            },
        );
        let text = serde_json::to_string(&map).unwrap();
        assert_eq!(
            text,
            r#"{"reports":{"read":true,"add":false,"edit":false,"delete":false}}"#
        );
        let back: PermissionMap = serde_json::from_str(&text).unwrap();
        assert_eq!(back, map);
    }
}
