//! Login and logout requests.

/// Username field changed.
#[derive(Debug, Clone)]
pub struct UsernameInputReq {
    pub value: String,
}

impl UsernameInputReq {
    pub const PATH: &'static str = "auth/username";
}

/// Password field changed.
#[derive(Clone)]
pub struct PasswordInputReq {
    pub value: String,
}

impl PasswordInputReq {
    pub const PATH: &'static str = "auth/password";
}

/// "Send OTP" pressed.
#[derive(Debug, Clone)]
pub struct SendOtpReq;

impl SendOtpReq {
    pub const PATH: &'static str = "auth/send-otp";
}

/// Text typed into one OTP box.
#[derive(Debug, Clone)]
pub struct OtpInputReq {
    pub index: usize,
    pub text: String,
}

impl OtpInputReq {
    pub const PATH: &'static str = "auth/otp-input";
}

/// Backspace pressed in one OTP box.
#[derive(Debug, Clone)]
pub struct OtpBackspaceReq {
    pub index: usize,
}

impl OtpBackspaceReq {
    pub const PATH: &'static str = "auth/otp-backspace";
}

/// "Login" pressed.
#[derive(Debug, Clone)]
pub struct VerifyOtpReq;

impl VerifyOtpReq {
    pub const PATH: &'static str = "auth/verify-otp";
}

/// End the session.
#[derive(Debug, Clone)]
pub struct LogoutReq;

impl LogoutReq {
    pub const PATH: &'static str = "auth/logout";
}
