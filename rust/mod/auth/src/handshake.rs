//! Two-step login: credentials → OTP request → OTP verification → session.
//!
//! Every step reads the current [`LoginState`] from the store, applies one
//! transition and writes it back. Requests re-read the state after the
//! network round-trip, so edits made while a request was pending are kept.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use pragati_client::{server_timestamp, AuthApi, IpLookup, OtpRequestBody, VerifyOtpBody};
use pragati_flux::StateStore;

use crate::navigation::notify;
use crate::otp::OtpInput;
use crate::session::{SessionRecord, SessionStore, UserData};
use crate::state::*;
use crate::validate;

/// What a triggered action ended in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The same action is still in flight; the trigger was ignored.
    Busy,
    /// Refused before any request: invalid fields or incomplete OTP.
    Blocked,
    OtpSent,
    /// The server answered with a non-zero `errorcode`.
    Rejected { message: String },
    /// Transport error or unusable reply.
    Failed,
    /// The credentials changed while the request was pending; the reply
    /// belongs to the old pair and was dropped.
    Stale,
    Authenticated,
}

/// Clears an in-flight flag on every exit path.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        if flag.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn login_state(store: &StateStore) -> LoginState {
    store.get_as::<LoginState>(LoginState::PATH).unwrap_or_default()
}

fn set_busy(store: &StateStore, busy: bool) {
    let mut state = login_state(store);
    state.busy = busy;
    store.set(LoginState::PATH, state);
}

fn something_went_wrong(store: &StateStore) {
    notify(store, Notice::error("Something went wrong", "Please try again"));
}

pub struct HandshakeController {
    api: Arc<dyn AuthApi>,
    ip: Arc<dyn IpLookup>,
    session: SessionStore,
    otp_request_in_flight: AtomicBool,
    verify_in_flight: AtomicBool,
}

impl HandshakeController {
    pub fn new(api: Arc<dyn AuthApi>, ip: Arc<dyn IpLookup>, session: SessionStore) -> Self {
        Self {
            api,
            ip,
            session,
            otp_request_in_flight: AtomicBool::new(false),
            verify_in_flight: AtomicBool::new(false),
        }
    }

    /// Resolve the client address once. An empty [`ClientIp`] records a
    /// failed lookup so it is not retried on every request.
    pub async fn lookup_ip(&self, store: &StateStore) -> String {
        if let Some(ClientIp(ip)) = store.get_as::<ClientIp>(ClientIp::PATH) {
            return ip;
        }
        let ip = self.ip.client_ip().await.unwrap_or_default();
        debug!("client ip: {:?}", ip);
        store.set(ClientIp::PATH, ClientIp(ip.clone()));
        ip
    }

    pub fn set_username(&self, store: &StateStore, value: &str) {
        let mut state = login_state(store);
        state.username = value.to_string();
        state.username_error = validate::username(value).err();
        credentials_edited(&mut state);
        store.set(LoginState::PATH, state);
    }

    pub fn set_password(&self, store: &StateStore, value: &str) {
        let mut state = login_state(store);
        state.password = value.to_string();
        state.password_error = validate::password(value).err();
        credentials_edited(&mut state);
        store.set(LoginState::PATH, state);
    }

    /// Step one: ask the server to send an OTP.
    pub async fn send_otp(&self, store: &StateStore) -> Outcome {
        let Some(_guard) = InFlight::acquire(&self.otp_request_in_flight) else {
            debug!("send-otp ignored, request already in flight");
            return Outcome::Busy;
        };

        let mut state = login_state(store);
        state.username_error = validate::username(&state.username).err();
        state.password_error = validate::password(&state.password).err();
        if !state.can_send_otp() {
            store.set(LoginState::PATH, state);
            return Outcome::Blocked;
        }
        state.busy = true;
        let (username, password) = (state.username.clone(), state.password.clone());
        store.set(LoginState::PATH, state);

        let ip = self.lookup_ip(store).await;
        let body = OtpRequestBody {
            username,
            password,
            ip,
            date_time: server_timestamp(),
        };
        let result = self.api.request_otp(&body).await;

        let mut state = login_state(store);
        state.busy = self.verify_in_flight.load(Ordering::Acquire);
        if state.username != body.username || state.password != body.password {
            debug!("otp reply dropped, credentials changed while pending");
            store.set(LoginState::PATH, state);
            return Outcome::Stale;
        }
        let outcome = match result {
            Ok(resp) if resp.errorcode == 0 => {
                info!("otp requested for {}", body.username);
                state.otp = Some(OtpInput::new());
                state.phase = HandshakePhase::OtpRequested;
                notify(store, Notice::success("OTP Sent", resp.message));
                Outcome::OtpSent
            }
            Ok(resp) => {
                warn!("otp request refused: errorcode {}", resp.errorcode);
                notify(store, Notice::error("Login Failed", resp.message.clone()));
                Outcome::Rejected {
                    message: resp.message,
                }
            }
            Err(e) => {
                warn!("otp request failed: {}", e);
                something_went_wrong(store);
                Outcome::Failed
            }
        };
        store.set(LoginState::PATH, state);
        outcome
    }

    /// Type into OTP box `index`. Ignored while the boxes are hidden.
    pub fn otp_input(&self, store: &StateStore, index: usize, text: &str) -> bool {
        self.edit_otp(store, |otp| otp.input(index, text))
    }

    pub fn otp_backspace(&self, store: &StateStore, index: usize) -> bool {
        self.edit_otp(store, |otp| otp.backspace(index))
    }

    fn edit_otp(&self, store: &StateStore, f: impl FnOnce(&mut OtpInput) -> bool) -> bool {
        let mut state = login_state(store);
        let Some(otp) = state.otp.as_mut() else {
            return false;
        };
        if !f(otp) {
            return false;
        }
        state.phase = if otp.is_complete() {
            HandshakePhase::OtpEntered
        } else {
            HandshakePhase::OtpRequested
        };
        store.set(LoginState::PATH, state);
        true
    }

    /// Step two: verify the OTP and persist the session.
    pub async fn verify_otp(&self, store: &StateStore) -> Outcome {
        let Some(_guard) = InFlight::acquire(&self.verify_in_flight) else {
            debug!("verify-otp ignored, request already in flight");
            return Outcome::Busy;
        };

        let state = login_state(store);
        let Some(otp) = state.otp.as_ref() else {
            debug!("verify-otp before an otp was requested");
            return Outcome::Blocked;
        };
        if validate::username(&state.username).is_err()
            || validate::password(&state.password).is_err()
        {
            debug!("verify-otp with invalid credentials");
            return Outcome::Blocked;
        }
        if !otp.is_complete() {
            notify(store, Notice::error("Invalid OTP", "Please enter the 4-digit OTP"));
            return Outcome::Blocked;
        }
        let otp = otp.value();
        let (username, password) = (state.username, state.password);
        set_busy(store, true);

        let body = VerifyOtpBody {
            username,
            password,
            otp,
            ip: self.lookup_ip(store).await,
            date_time: server_timestamp(),
        };
        let result = self.api.verify_otp(&body).await;

        let outcome = match result {
            Ok(resp) if resp.errorcode == 0 => {
                match resp.token.filter(|t| !t.is_empty()) {
                    Some(token) => {
                        let user = resp
                            .user
                            .as_ref()
                            .map(UserData::from_remote)
                            .unwrap_or_default();
                        self.establish(store, SessionRecord { token, user }, resp.message)
                    }
                    None => {
                        warn!("verify-otp succeeded without a token");
                        notify(store, Notice::error("Login Failed", "Login failed"));
                        Outcome::Rejected {
                            message: "Login failed".into(),
                        }
                    }
                }
            }
            Ok(resp) => {
                warn!("otp verification refused: errorcode {}", resp.errorcode);
                let message = if resp.message.is_empty() {
                    "Login failed".to_string()
                } else {
                    resp.message
                };
                notify(store, Notice::error("Login Failed", message.clone()));
                Outcome::Rejected { message }
            }
            Err(e) => {
                warn!("otp verification failed: {}", e);
                something_went_wrong(store);
                Outcome::Failed
            }
        };
        if outcome != Outcome::Authenticated {
            let pending = self.otp_request_in_flight.load(Ordering::Acquire);
            set_busy(store, pending);
        }
        outcome
    }

    fn establish(&self, store: &StateStore, record: SessionRecord, message: String) -> Outcome {
        if let Err(e) = self.session.set_session(&record) {
            error!("persist session: {}", e);
            something_went_wrong(store);
            return Outcome::Failed;
        }
        info!("logged in as {}", record.user.name);
        let state = login_state(store);
        store.set(
            LoginState::PATH,
            LoginState {
                phase: HandshakePhase::Authenticated,
                username: state.username,
                busy: self.otp_request_in_flight.load(Ordering::Acquire),
                ..LoginState::default()
            },
        );
        notify(store, Notice::success("Login Successful", message));
        Outcome::Authenticated
    }

    /// Back to an empty form. The resolved client address is kept.
    pub fn reset(&self, store: &StateStore) {
        store.set(LoginState::PATH, LoginState::default());
    }
}

/// Credentials changed: any requested OTP belongs to the old pair.
fn credentials_edited(state: &mut LoginState) {
    state.otp = None;
    state.phase = if state.username.is_empty() && state.password.is_empty() {
        HandshakePhase::Idle
    } else {
        HandshakePhase::CredentialsEntered
    };
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use pragati_client::{
        ApiError, OtpRequestResponse, RemoteUser, VerifyOtpResponse,
    };
    use pragati_kv::{KVStore, MemoryStore};
    use serde_json::json;
    use tokio::sync::Notify;

    use super::*;
    use crate::permission::{Action, ModuleKey};
    use crate::session::keys;

    /// Scripted [`AuthApi`] that records every body it receives.
    #[derive(Default)]
    struct FakeApi {
        otp_reply: Mutex<Option<Result<OtpRequestResponse, ApiError>>>,
        verify_reply: Mutex<Option<Result<VerifyOtpResponse, ApiError>>>,
        otp_calls: Mutex<Vec<OtpRequestBody>>,
        verify_calls: Mutex<Vec<VerifyOtpBody>>,
        gate: Option<Arc<Notify>>,
    }

    #[async_trait]
    impl AuthApi for FakeApi {
        async fn request_otp(&self, body: &OtpRequestBody) -> Result<OtpRequestResponse, ApiError> {
            self.otp_calls.lock().unwrap().push(body.clone());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.otp_reply
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Ok(OtpRequestResponse {
                    errorcode: 0,
                    message: "OTP sent to your email".into(),
                }))
        }

        async fn verify_otp(&self, body: &VerifyOtpBody) -> Result<VerifyOtpResponse, ApiError> {
            self.verify_calls.lock().unwrap().push(body.clone());
            self.verify_reply.lock().unwrap().take().unwrap_or(Ok(VerifyOtpResponse {
                errorcode: 0,
                message: "Welcome".into(),
                token: Some("tok-123".into()),
                user: Some(RemoteUser {
                    name: "Asha".into(),
                    role: "2".into(),
                    role_name: "Accountant".into(),
                    id: "7".into(),
                    description: json!({ "reports": { "read": true, "add": "yes" } }),
                }),
            }))
        }
    }

    struct FixedIp(Option<&'static str>);

    #[async_trait]
    impl IpLookup for FixedIp {
        async fn client_ip(&self) -> Option<String> {
            self.0.map(String::from)
        }
    }

    fn controller(api: Arc<FakeApi>) -> (HandshakeController, Arc<MemoryStore>, StateStore) {
        let kv = Arc::new(MemoryStore::new());
        let hs = HandshakeController::new(
            api,
            Arc::new(FixedIp(Some("203.0.113.9"))),
            SessionStore::new(kv.clone()),
        );
        (hs, kv, StateStore::new())
    }

    fn state(store: &StateStore) -> LoginState {
        login_state(store)
    }

    fn notice(store: &StateStore) -> Notice {
        store
            .get_as::<NoticeState>(NoticeState::PATH)
            .and_then(|n| n.current)
            .unwrap()
    }

    fn fill_credentials(hs: &HandshakeController, store: &StateStore) {
        hs.set_username(store, "asha.k");
        hs.set_password(store, "Ledger@2026");
    }

    fn type_otp(hs: &HandshakeController, store: &StateStore, digits: &str) {
        for (i, d) in digits.chars().enumerate() {
            assert!(hs.otp_input(store, i, &d.to_string()));
        }
    }

    #[test]
    fn edits_validate_inline() {
        let (hs, _, store) = controller(Arc::default());
        hs.set_username(&store, "ab");
        let s = state(&store);
        assert_eq!(s.phase, HandshakePhase::CredentialsEntered);
        assert!(s.username_error.is_some());
        assert!(!s.can_send_otp());

        hs.set_username(&store, "asha.k");
        hs.set_password(&store, "short");
        let s = state(&store);
        assert!(s.username_error.is_none());
        assert!(s.password_error.is_some());

        hs.set_password(&store, "Ledger@2026");
        assert!(state(&store).can_send_otp());
    }

    #[tokio::test]
    async fn invalid_credentials_never_reach_the_network() {
        let api = Arc::new(FakeApi::default());
        let (hs, _, store) = controller(api.clone());
        hs.set_username(&store, "asha.k");
        hs.set_password(&store, "nosymbol1A");

        assert_eq!(hs.send_otp(&store).await, Outcome::Blocked);
        assert!(api.otp_calls.lock().unwrap().is_empty());
        assert!(state(&store).otp.is_none());
    }

    #[tokio::test]
    async fn send_otp_reveals_boxes() {
        let api = Arc::new(FakeApi::default());
        let (hs, _, store) = controller(api.clone());
        fill_credentials(&hs, &store);

        assert_eq!(hs.send_otp(&store).await, Outcome::OtpSent);

        let calls = api.otp_calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].username, "asha.k");
        assert_eq!(calls[0].password, "Ledger@2026");
        assert_eq!(calls[0].ip, "203.0.113.9");
        assert_eq!(calls[0].date_time.len(), "2026-01-01 00:00:00".len());

        let s = state(&store);
        assert_eq!(s.phase, HandshakePhase::OtpRequested);
        assert_eq!(s.otp, Some(OtpInput::new()));
        assert!(!s.busy);
        let n = notice(&store);
        assert_eq!(n.kind, NoticeKind::Success);
        assert_eq!(n.text.as_deref(), Some("OTP sent to your email"));
    }

    #[tokio::test]
    async fn refused_otp_request_keeps_boxes_hidden() {
        let api = Arc::new(FakeApi::default());
        *api.otp_reply.lock().unwrap() = Some(Ok(OtpRequestResponse {
            errorcode: 3,
            message: "Invalid credentials".into(),
        }));
        let (hs, _, store) = controller(api);
        fill_credentials(&hs, &store);

        assert_eq!(
            hs.send_otp(&store).await,
            Outcome::Rejected {
                message: "Invalid credentials".into()
            }
        );
        let s = state(&store);
        assert!(s.otp.is_none());
        assert_eq!(s.phase, HandshakePhase::CredentialsEntered);
        assert_eq!(notice(&store).kind, NoticeKind::Error);
    }

    #[tokio::test]
    async fn transport_error_shows_generic_notice() {
        let api = Arc::new(FakeApi::default());
        *api.otp_reply.lock().unwrap() = Some(Err(ApiError::Server {
            status: 502,
            message: "bad gateway".into(),
        }));
        let (hs, _, store) = controller(api);
        fill_credentials(&hs, &store);

        assert_eq!(hs.send_otp(&store).await, Outcome::Failed);
        let n = notice(&store);
        assert_eq!(n.title, "Something went wrong");
        assert_eq!(n.text.as_deref(), Some("Please try again"));
        assert!(!state(&store).busy);
    }

    #[tokio::test]
    async fn failed_ip_lookup_sends_empty_ip() {
        let api = Arc::new(FakeApi::default());
        let hs = HandshakeController::new(
            api.clone(),
            Arc::new(FixedIp(None)),
            SessionStore::new(Arc::new(MemoryStore::new())),
        );
        let store = StateStore::new();
        fill_credentials(&hs, &store);

        assert_eq!(hs.send_otp(&store).await, Outcome::OtpSent);
        assert_eq!(api.otp_calls.lock().unwrap()[0].ip, "");
        assert_eq!(store.get_as::<ClientIp>(ClientIp::PATH), Some(ClientIp(String::new())));
    }

    #[tokio::test]
    async fn second_send_while_pending_is_ignored() {
        let gate = Arc::new(Notify::new());
        let api = Arc::new(FakeApi {
            gate: Some(gate.clone()),
            ..FakeApi::default()
        });
        let (hs, _, store) = controller(api.clone());
        let (hs, store) = (Arc::new(hs), Arc::new(store));
        fill_credentials(&hs, &store);

        let first = {
            let (hs, store) = (hs.clone(), store.clone());
            tokio::spawn(async move { hs.send_otp(&store).await })
        };
        while api.otp_calls.lock().unwrap().is_empty() {
            tokio::task::yield_now().await;
        }
        assert!(state(&store).busy);
        assert_eq!(hs.send_otp(&store).await, Outcome::Busy);

        gate.notify_one();
        assert_eq!(first.await.unwrap(), Outcome::OtpSent);
        assert_eq!(api.otp_calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn edit_while_send_pending_drops_reply() {
        let gate = Arc::new(Notify::new());
        let api = Arc::new(FakeApi {
            gate: Some(gate.clone()),
            ..FakeApi::default()
        });
        let (hs, kv, store) = controller(api.clone());
        let (hs, store) = (Arc::new(hs), Arc::new(store));
        fill_credentials(&hs, &store);

        let pending = {
            let (hs, store) = (hs.clone(), store.clone());
            tokio::spawn(async move { hs.send_otp(&store).await })
        };
        while api.otp_calls.lock().unwrap().is_empty() {
            tokio::task::yield_now().await;
        }
        hs.set_password(&store, "");
        gate.notify_one();
        assert_eq!(pending.await.unwrap(), Outcome::Stale);

        let s = state(&store);
        assert!(s.otp.is_none());
        assert_eq!(s.phase, HandshakePhase::CredentialsEntered);
        assert!(s.password_error.is_some());
        assert!(!s.busy);
        assert!(store
            .get_as::<NoticeState>(NoticeState::PATH)
            .and_then(|n| n.current)
            .is_none());

        assert_eq!(hs.verify_otp(&store).await, Outcome::Blocked);
        assert!(api.verify_calls.lock().unwrap().is_empty());
        assert!(kv.keys().unwrap().is_empty());
    }

    #[tokio::test]
    async fn verify_refuses_invalid_credentials() {
        let api = Arc::new(FakeApi::default());
        let (hs, kv, store) = controller(api.clone());
        let mut otp = OtpInput::new();
        for (i, d) in ["1", "2", "3", "4"].iter().enumerate() {
            otp.input(i, d);
        }
        store.set(
            LoginState::PATH,
            LoginState {
                phase: HandshakePhase::OtpEntered,
                username: "asha.k".into(),
                password: String::new(),
                otp: Some(otp),
                ..LoginState::default()
            },
        );

        assert_eq!(hs.verify_otp(&store).await, Outcome::Blocked);
        assert!(api.verify_calls.lock().unwrap().is_empty());
        assert!(kv.keys().unwrap().is_empty());
    }

    #[tokio::test]
    async fn verify_transport_error_keeps_digits() {
        let api = Arc::new(FakeApi::default());
        *api.verify_reply.lock().unwrap() = Some(Err(ApiError::Server {
            status: 503,
            message: "unavailable".into(),
        }));
        let (hs, kv, store) = controller(api.clone());
        fill_credentials(&hs, &store);
        hs.send_otp(&store).await;
        type_otp(&hs, &store, "4821");

        assert_eq!(hs.verify_otp(&store).await, Outcome::Failed);
        assert_eq!(api.verify_calls.lock().unwrap().len(), 1);
        let n = notice(&store);
        assert_eq!(n.title, "Something went wrong");
        assert_eq!(n.text.as_deref(), Some("Please try again"));
        let s = state(&store);
        assert!(!s.busy);
        assert_eq!(s.phase, HandshakePhase::OtpEntered);
        assert_eq!(s.otp.unwrap().value(), "4821");
        assert!(kv.keys().unwrap().is_empty());
    }

    #[tokio::test]
    async fn busy_stays_set_while_either_action_pending() {
        let gate = Arc::new(Notify::new());
        let api = Arc::new(FakeApi {
            gate: Some(gate.clone()),
            ..FakeApi::default()
        });
        *api.verify_reply.lock().unwrap() = Some(Ok(VerifyOtpResponse {
            errorcode: 1,
            message: "OTP mismatch".into(),
            token: None,
            user: None,
        }));
        let (hs, _, store) = controller(api.clone());
        let (hs, store) = (Arc::new(hs), Arc::new(store));
        fill_credentials(&hs, &store);

        let spawn_send = || {
            let (hs, store) = (hs.clone(), store.clone());
            tokio::spawn(async move { hs.send_otp(&store).await })
        };
        let first = spawn_send();
        while api.otp_calls.lock().unwrap().is_empty() {
            tokio::task::yield_now().await;
        }
        gate.notify_one();
        assert_eq!(first.await.unwrap(), Outcome::OtpSent);
        type_otp(&hs, &store, "0000");

        let resend = spawn_send();
        while api.otp_calls.lock().unwrap().len() < 2 {
            tokio::task::yield_now().await;
        }
        assert!(matches!(hs.verify_otp(&store).await, Outcome::Rejected { .. }));
        assert!(state(&store).busy, "resend still pending");

        gate.notify_one();
        assert_eq!(resend.await.unwrap(), Outcome::OtpSent);
        assert!(!state(&store).busy);
    }

    #[tokio::test]
    async fn otp_boxes_drive_phase() {
        let (hs, _, store) = controller(Arc::default());
        assert!(!hs.otp_input(&store, 0, "1"), "boxes hidden before request");

        fill_credentials(&hs, &store);
        hs.send_otp(&store).await;
        type_otp(&hs, &store, "123");
        assert_eq!(state(&store).phase, HandshakePhase::OtpRequested);
        assert!(!hs.otp_input(&store, 3, "x"));
        assert!(hs.otp_input(&store, 3, "4"));

        let s = state(&store);
        assert_eq!(s.phase, HandshakePhase::OtpEntered);
        assert_eq!(s.otp.as_ref().unwrap().value(), "1234");
        assert!(s.can_verify());

        assert!(hs.otp_backspace(&store, 3));
        assert_eq!(state(&store).phase, HandshakePhase::OtpRequested);
    }

    #[tokio::test]
    async fn editing_credentials_hides_boxes() {
        let (hs, _, store) = controller(Arc::default());
        fill_credentials(&hs, &store);
        hs.send_otp(&store).await;
        type_otp(&hs, &store, "12");

        hs.set_password(&store, "Ledger@2027");
        let s = state(&store);
        assert!(s.otp.is_none());
        assert_eq!(s.phase, HandshakePhase::CredentialsEntered);
    }

    #[tokio::test]
    async fn incomplete_otp_is_invalid_without_request() {
        let api = Arc::new(FakeApi::default());
        let (hs, _, store) = controller(api.clone());
        fill_credentials(&hs, &store);
        hs.send_otp(&store).await;
        type_otp(&hs, &store, "12");

        assert_eq!(hs.verify_otp(&store).await, Outcome::Blocked);
        assert_eq!(notice(&store).title, "Invalid OTP");
        assert!(api.verify_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn verify_persists_session() {
        let api = Arc::new(FakeApi::default());
        let (hs, kv, store) = controller(api.clone());
        fill_credentials(&hs, &store);
        hs.send_otp(&store).await;
        type_otp(&hs, &store, "4821");

        assert_eq!(hs.verify_otp(&store).await, Outcome::Authenticated);

        let body = api.verify_calls.lock().unwrap()[0].clone();
        assert_eq!(body.otp, "4821");
        assert_eq!(body.password, "Ledger@2026");
        assert_eq!(body.ip, "203.0.113.9");

        assert_eq!(kv.get(keys::IS_AUTHENTICATED).unwrap().as_deref(), Some("true"));
        assert_eq!(kv.get(keys::AUTHORIZATION).unwrap().as_deref(), Some("tok-123"));
        let session = SessionStore::new(kv.clone());
        let user = session.user_data();
        assert_eq!(user.name, "Asha");
        assert_eq!(user.role_id, "7");
        assert!(user.permissions.allows(ModuleKey::Reports, Action::Read));
        assert!(!user.permissions.allows(ModuleKey::Reports, Action::Add));

        let s = state(&store);
        assert_eq!(s.phase, HandshakePhase::Authenticated);
        assert!(s.password.is_empty());
        assert!(s.otp.is_none());
    }

    #[tokio::test]
    async fn refused_verify_keeps_digits() {
        let api = Arc::new(FakeApi::default());
        *api.verify_reply.lock().unwrap() = Some(Ok(VerifyOtpResponse {
            errorcode: 1,
            message: String::new(),
            token: None,
            user: None,
        }));
        let (hs, kv, store) = controller(api);
        fill_credentials(&hs, &store);
        hs.send_otp(&store).await;
        type_otp(&hs, &store, "0000");

        assert_eq!(
            hs.verify_otp(&store).await,
            Outcome::Rejected {
                message: "Login failed".into()
            }
        );
        let s = state(&store);
        assert_eq!(s.phase, HandshakePhase::OtpEntered);
        assert_eq!(s.otp.unwrap().value(), "0000");
        assert!(!s.busy);
        assert!(kv.keys().unwrap().is_empty());
    }

    #[tokio::test]
    async fn success_without_token_is_rejected() {
        let api = Arc::new(FakeApi::default());
        *api.verify_reply.lock().unwrap() = Some(Ok(VerifyOtpResponse {
            errorcode: 0,
            message: "ok".into(),
            token: Some(String::new()),
            user: None,
        }));
        let (hs, kv, store) = controller(api);
        fill_credentials(&hs, &store);
        hs.send_otp(&store).await;
        type_otp(&hs, &store, "1111");

        assert!(matches!(hs.verify_otp(&store).await, Outcome::Rejected { .. }));
        assert!(kv.get(keys::IS_AUTHENTICATED).unwrap().is_none());
    }
}
