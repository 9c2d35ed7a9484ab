//! App-level state: route, history, notices.

use serde::{Deserialize, Serialize};

use crate::routes::View;

/// The view currently rendered. Stored at `app/route`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppRoute {
    pub path: String,
    pub view: View,
}

impl AppRoute {
    pub const PATH: &'static str = "app/route";
}

/// Visited paths, oldest first. Stored at `app/history`.
///
/// Redirects replace the last entry, so going back never lands on a path
/// the guard refused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavHistory {
    pub entries: Vec<String>,
}

impl NavHistory {
    pub const PATH: &'static str = "app/history";

    pub fn push(&mut self, path: &str) {
        if self.entries.last().map(String::as_str) != Some(path) {
            self.entries.push(path.to_string());
        }
    }

    pub fn replace(&mut self, path: &str) {
        self.entries.pop();
        self.push(path);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeKind {
    Success,
    Error,
    Warning,
}

/// A blocking acknowledgement dialog: icon, title, optional body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Notice {
    pub fn success(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, title, text)
    }

    pub fn error(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, title, text)
    }

    pub fn warning(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(NoticeKind::Warning, title, text)
    }

    fn new(kind: NoticeKind, title: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            kind,
            title: title.into(),
            text: (!text.is_empty()).then_some(text),
        }
    }
}

/// The pending notice, if any. Stored at `app/notice`; cleared by
/// acknowledging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeState {
    pub current: Option<Notice>,
}

impl NoticeState {
    pub const PATH: &'static str = "app/notice";
}
