use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::error::ApiError;

/// Local wall-clock time in the format the login endpoints expect:
/// `YYYY-MM-DD HH:MM:SS`.
pub fn server_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

// ── Wire types ──────────────────────────────────────────────────────

/// Body of `POST /auth/login` (step one: ask for an OTP).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtpRequestBody {
    pub username: String,
    pub password: String,
    pub ip: String,
    #[serde(rename = "dateTime")]
    pub date_time: String,
}

/// Body of `POST /auth/verify-otp` (step two).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyOtpBody {
    pub username: String,
    pub password: String,
    pub otp: String,
    pub ip: String,
    #[serde(rename = "dateTime")]
    pub date_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtpRequestResponse {
    pub errorcode: i64,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyOtpResponse {
    pub errorcode: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<RemoteUser>,
}

/// User block of a successful verification.
///
/// `description` carries the raw permission payload, either an object or
/// a JSON-encoded string; it is normalized once by the session layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteUser {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub role: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub role_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default)]
    pub description: serde_json::Value,
}

/// Accept a string, number or null where a string is expected.
fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match serde_json::Value::deserialize(d)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

// ── AuthApi ─────────────────────────────────────────────────────────

/// The unauthenticated login endpoints.
#[async_trait::async_trait]
pub trait AuthApi: Send + Sync + 'static {
    async fn request_otp(&self, body: &OtpRequestBody) -> Result<OtpRequestResponse, ApiError>;
    async fn verify_otp(&self, body: &VerifyOtpBody) -> Result<VerifyOtpResponse, ApiError>;
}

/// [`AuthApi`] over HTTP.
pub struct HttpAuthApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAuthApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn post<B: Serialize + Sync, R: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);
        let resp = self.http.post(&url).json(body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }
        resp.json::<R>()
            .await
            .map_err(|e| ApiError::Decode(format!("{}: {}", path, e)))
    }
}

#[async_trait::async_trait]
impl AuthApi for HttpAuthApi {
    async fn request_otp(&self, body: &OtpRequestBody) -> Result<OtpRequestResponse, ApiError> {
        self.post("/auth/login", body).await
    }

    async fn verify_otp(&self, body: &VerifyOtpBody) -> Result<VerifyOtpResponse, ApiError> {
        self.post("/auth/verify-otp", body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::serve;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    fn otp_body() -> OtpRequestBody {
        OtpRequestBody {
            username: "asha.k".into(),
            password: "Secret@123".into(),
            ip: "203.0.113.7".into(),
            date_time: "2026-10-16 09:30:00".into(),
        }
    }

    #[test]
    fn timestamp_has_server_format() {
        let ts = server_timestamp();
        assert!(chrono::NaiveDateTime::parse_from_str(&ts, "%Y-%m-%d %H:%M:%S").is_ok());
        assert_eq!(ts.len(), 19);
    }

    #[test]
    fn request_body_uses_camel_case_datetime() {
        let v = serde_json::to_value(otp_body()).unwrap();
        assert_eq!(v["dateTime"], "2026-10-16 09:30:00");
        assert!(v.get("date_time").is_none());
        assert_eq!(v.as_object().unwrap().len(), 4);
    }

    #[test]
    fn remote_user_accepts_numeric_ids() {
        let u: RemoteUser = serde_json::from_value(json!({
            "name": "Asha",
            "role": 2,
            "role_name": "Accountant",
            "id": 17,
            "description": "{\"reports\":{\"read\":true}}"
        }))
        .unwrap();
        assert_eq!(u.role, "2");
        assert_eq!(u.id, "17");
        assert!(u.description.is_string());
    }

    #[tokio::test]
    async fn request_otp_posts_four_fields() {
        let app = Router::new().route(
            "/auth/login",
            post(|Json(body): Json<Value>| async move {
                let keys = body.as_object().map(|o| o.len()).unwrap_or(0);
                Json(json!({
                    "errorcode": 0,
                    "message": format!("OTP sent to {} ({} fields)", body["username"].as_str().unwrap_or(""), keys),
                }))
            }),
        );
        let api = HttpAuthApi::new(serve(app).await);

        let resp = api.request_otp(&otp_body()).await.unwrap();
        assert_eq!(resp.errorcode, 0);
        assert_eq!(resp.message, "OTP sent to asha.k (4 fields)");
    }

    #[tokio::test]
    async fn verify_otp_parses_token_and_user() {
        let app = Router::new().route(
            "/auth/verify-otp",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["otp"], "1234");
                Json(json!({
                    "errorcode": 0,
                    "message": "ok",
                    "token": "tok-xyz",
                    "user": {
                        "name": "Asha",
                        "role": "2",
                        "role_name": "Accountant",
                        "id": "9",
                        "description": { "reports": { "read": true } }
                    }
                }))
            }),
        );
        let api = HttpAuthApi::new(format!("{}/", serve(app).await));

        let body = VerifyOtpBody {
            username: "asha.k".into(),
            password: "Secret@123".into(),
            otp: "1234".into(),
            ip: String::new(),
            date_time: server_timestamp(),
        };
        let resp = api.verify_otp(&body).await.unwrap();
        assert_eq!(resp.token.as_deref(), Some("tok-xyz"));
        let user = resp.user.unwrap();
        assert_eq!(user.role_name, "Accountant");
        assert_eq!(user.description["reports"]["read"], true);
    }

    #[tokio::test]
    async fn non_success_status_is_server_error() {
        let app = Router::new().route(
            "/auth/login",
            post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );
        let api = HttpAuthApi::new(serve(app).await);

        match api.request_otp(&otp_body()).await.unwrap_err() {
            ApiError::Server { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream down");
            }
            other => panic!("expected Server error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn garbage_body_is_decode_error() {
        let app = Router::new().route("/auth/login", post(|| async { "not json" }));
        let api = HttpAuthApi::new(serve(app).await);
        assert!(matches!(
            api.request_otp(&otp_body()).await.unwrap_err(),
            ApiError::Decode(_)
        ));
    }
}
