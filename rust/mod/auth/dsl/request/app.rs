//! App lifecycle and navigation requests.

/// Reset client state and open the first view.
#[derive(Debug, Clone)]
pub struct InitializeReq {
    pub path: String,
}

impl InitializeReq {
    pub const PATH: &'static str = "app/initialize";
}

/// Attempt to open a view.
#[derive(Debug, Clone)]
pub struct NavigateReq {
    pub path: String,
}

impl NavigateReq {
    pub const PATH: &'static str = "app/navigate";
}

/// Go back one history entry. The guard runs again.
#[derive(Debug, Clone)]
pub struct BackReq;

impl BackReq {
    pub const PATH: &'static str = "app/back";
}

/// Dismiss the pending notice.
#[derive(Debug, Clone)]
pub struct AcknowledgeReq;

impl AcknowledgeReq {
    pub const PATH: &'static str = "app/acknowledge";
}
