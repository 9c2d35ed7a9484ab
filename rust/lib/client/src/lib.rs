//! Pragati REST client.
//!
//! - [`AuthApi`]: the two-step OTP login endpoints
//! - [`IpLookup`]: best-effort public IP discovery sent along with login
//! - [`ApiClient`]: authenticated calls for everything after login, with a
//!   single hook that fires on any `401`
//!
//! Authentication for [`ApiClient`] comes from a pluggable [`TokenSource`].

mod api;
mod auth;
mod error;
mod ip;
mod token;

#[cfg(test)]
mod testutil;

pub use api::{ApiClient, AuthScheme, UnauthorizedHook};
pub use auth::{
    server_timestamp, AuthApi, HttpAuthApi, OtpRequestBody, OtpRequestResponse, RemoteUser,
    VerifyOtpBody, VerifyOtpResponse,
};
pub use error::ApiError;
pub use ip::{HttpIpLookup, IpLookup, DEFAULT_IP_LOOKUP_URL};
pub use token::TokenSource;
