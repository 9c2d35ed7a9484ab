//! Login form state: stored at `auth/login`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::otp::OtpInput;

/// Where the two-step login currently stands.
///
/// Failures are not a phase: they surface as a notice and the form stays
/// in the last interactive phase so the user can retry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HandshakePhase {
    #[default]
    Idle,
    CredentialsEntered,
    OtpRequested,
    OtpEntered,
    Authenticated,
}

/// Everything the login view renders.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginState {
    pub phase: HandshakePhase,
    pub username: String,
    #[serde(skip)]
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_error: Option<String>,
    /// `None` until an OTP has been requested successfully; the boxes are
    /// not shown before that.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<OtpInput>,
    /// A request is on the wire; the shell shows a spinner.
    pub busy: bool,
}

impl LoginState {
    pub const PATH: &'static str = "auth/login";

    /// Both fields filled in and currently valid.
    pub fn can_send_otp(&self) -> bool {
        !self.username.is_empty()
            && !self.password.is_empty()
            && self.username_error.is_none()
            && self.password_error.is_none()
    }

    /// OTP boxes are visible and all four are filled.
    pub fn can_verify(&self) -> bool {
        self.otp.as_ref().is_some_and(OtpInput::is_complete)
    }
}

impl fmt::Debug for LoginState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginState")
            .field("phase", &self.phase)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("username_error", &self.username_error)
            .field("password_error", &self.password_error)
            .field("otp_filled", &self.otp.as_ref().map(|o| o.filled()))
            .field("busy", &self.busy)
            .finish()
    }
}

/// Public address found at login mount, empty when the lookup failed.
/// Stored at `auth/client-ip`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl ClientIp {
    pub const PATH: &'static str = "auth/client-ip";
}
