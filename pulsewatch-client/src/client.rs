//! HTTP client for the dashboard service.
//!
//! The service keeps the session in a cookie, so one client instance should
//! be shared for login, data fetches and logout.
//!
//! ## Example
//!
//! ```rust,no_run
//! use pulsewatch_client::{FetchOptions, HealthApiClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HealthApiClient::builder()
//!         .endpoint("http://127.0.0.1:5000")
//!         .build()?;
//!
//!     client.login("ada@example.com", "Str0ngPass").await?;
//!     let snapshot = client.fetch_dashboard(1, FetchOptions::default()).await?;
//!
//!     println!("avg steps: {:?}", snapshot.summary.avg_steps());
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use chrono::Utc;
use reqwest::header::CACHE_CONTROL;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use pulsewatch_types::DashboardSnapshot;

use crate::wire::DashboardPayload;
use crate::{ClientError, SignupForm};

/// Default service endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Options for a single dashboard fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Bypass any intermediate cache.
    pub force_fresh: bool,
}

impl FetchOptions {
    pub fn fresh() -> Self {
        Self { force_fresh: true }
    }
}

/// The signed-in user as reported by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuthUser {
    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Profile shown in the dashboard header.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub initials: String,
}

impl UserProfile {
    /// Initials as sent by the service, or derived from the name.
    pub fn display_initials(&self) -> String {
        if !self.initials.trim().is_empty() {
            return self.initials.trim().to_string();
        }
        let derived: String = self
            .name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect();
        if derived.is_empty() {
            "?".to_string()
        } else {
            derived
        }
    }
}

/// Body of the login and signup responses.
#[derive(Debug, Default, Deserialize)]
struct AuthResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    user: Option<AuthUser>,
    #[serde(default)]
    user_id: Option<u64>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

impl AuthResponse {
    fn message(&self) -> Option<String> {
        self.message.clone().or_else(|| self.error.clone())
    }

    fn into_user(self) -> AuthUser {
        self.user.unwrap_or(AuthUser {
            user_id: self.user_id,
            username: self.username,
            email: self.email,
        })
    }
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// Client for the wearable dashboard service.
#[derive(Debug, Clone)]
pub struct HealthApiClient {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl HealthApiClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> HealthApiClientBuilder {
        HealthApiClientBuilder::default()
    }

    /// The base URL requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    /// Fetch the dashboard snapshot for a user.
    ///
    /// With `force_fresh` the request carries `Cache-Control: no-cache` and a
    /// cache-busting query parameter.
    pub async fn fetch_dashboard(
        &self,
        user_id: u64,
        options: FetchOptions,
    ) -> Result<DashboardSnapshot, ClientError> {
        let mut url = self.url(&format!("/api/dashboard/{}", user_id));
        if options.force_fresh {
            url = format!("{}?_={}", url, Utc::now().timestamp_millis());
        }
        let mut request = self.client.get(&url);
        if options.force_fresh {
            request = request.header(CACHE_CONTROL, "no-cache");
        }

        tracing::debug!(%url, force_fresh = options.force_fresh, "fetching dashboard");
        let response = checked(request.send().await?)?;
        let body = response.bytes().await?;
        let payload = DashboardPayload::from_slice(&body)?;

        Ok(payload.into_snapshot(user_id, Utc::now()))
    }

    /// Fetch the signed-in user's profile.
    pub async fn profile(&self) -> Result<UserProfile, ClientError> {
        let response = checked(self.client.get(self.url("/api/user/profile")).send().await?)?;
        response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }

    /// Ask the service to scan for nearby wearables.
    pub async fn scan_wearables(&self) -> Result<(), ClientError> {
        checked(self.client.post(self.url("/api/wearable/scan")).send().await?)?;
        Ok(())
    }

    /// Download the user's data as CSV bytes.
    pub async fn export_csv(&self, user_id: u64) -> Result<Vec<u8>, ClientError> {
        let url = self.url(&format!("/api/export/{}", user_id));
        let response = checked(self.client.get(&url).send().await?)?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Sign in; the session cookie is kept by this client.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthUser, ClientError> {
        let response = self
            .client
            .post(self.url("/login"))
            .json(&Credentials { email, password })
            .send()
            .await?;
        let user = auth_result(response, "Invalid credentials").await?;
        tracing::info!(email, "signed in");
        Ok(user)
    }

    /// Create an account.
    ///
    /// The form is validated locally first; a validation failure returns
    /// without contacting the service.
    pub async fn signup(&self, form: &SignupForm) -> Result<AuthUser, ClientError> {
        let form = form.validate()?;
        let response = self.client.post(self.url("/signup")).json(&form).send().await?;
        auth_result(response, "Signup failed").await
    }

    /// End the session.
    pub async fn logout(&self) -> Result<(), ClientError> {
        checked(self.client.get(self.url("/logout")).send().await?)?;
        Ok(())
    }
}

/// Map a non-2xx response to [`ClientError::Http`].
fn checked(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ClientError::Http {
            status: status.as_u16(),
        })
    }
}

/// Interpret a login or signup response.
///
/// A 4xx status or an explicit `success: false` is a rejection carrying the
/// service's message.
async fn auth_result(response: Response, fallback: &str) -> Result<AuthUser, ClientError> {
    let status = response.status();
    if status.is_server_error() {
        return Err(ClientError::Http {
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await?;
    let parsed: AuthResponse = serde_json::from_slice(&body).unwrap_or_default();

    if status.is_client_error() || parsed.success == Some(false) {
        let code = if status.is_client_error() {
            status.as_u16()
        } else {
            401
        };
        return Err(ClientError::Rejected {
            status: code,
            message: parsed.message().unwrap_or_else(|| fallback.to_string()),
        });
    }

    Ok(parsed.into_user())
}

/// Builder for [`HealthApiClient`].
#[derive(Debug, Default)]
pub struct HealthApiClientBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl HealthApiClientBuilder {
    /// Set the service endpoint (e.g., "http://127.0.0.1:5000").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<HealthApiClient, ClientError> {
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);

        let client = Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .map_err(|e| ClientError::Network(format!("failed to build HTTP client: {}", e)))?;

        let endpoint = self
            .endpoint
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(HealthApiClient {
            client,
            endpoint,
            timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValidationError;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    // Nothing listens on port 1, so requests fail without a response.
    const DEAD_ENDPOINT: &str = "http://127.0.0.1:1";

    fn response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
    }

    /// Serve one canned response; the handle yields the raw request.
    async fn serve_once(reply: String) -> (HealthApiClient, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = stream.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
                if let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                    let head = String::from_utf8_lossy(&request[..end]).to_lowercase();
                    let body_len = head
                        .lines()
                        .find_map(|line| line.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if request.len() >= end + 4 + body_len {
                        break;
                    }
                }
            }
            stream.write_all(reply.as_bytes()).await.unwrap();
            let _ = stream.shutdown().await;
            String::from_utf8_lossy(&request).into_owned()
        });

        let client = HealthApiClient::builder()
            .endpoint(endpoint)
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        (client, handle)
    }

    #[test]
    fn test_builder_defaults() {
        let client = HealthApiClient::builder().build().unwrap();
        assert_eq!(client.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(client.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_builder_custom() {
        let client = HealthApiClient::builder()
            .endpoint("http://health.local:8080/")
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();
        assert_eq!(client.endpoint(), "http://health.local:8080");
        assert_eq!(client.url("/logout"), "http://health.local:8080/logout");
        assert_eq!(client.timeout(), Duration::from_secs(2));
    }

    #[tokio::test]
    async fn unreachable_service_is_a_network_error() {
        let client = HealthApiClient::builder()
            .endpoint(DEAD_ENDPOINT)
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();

        let err = client.fetch_dashboard(1, FetchOptions::fresh()).await.unwrap_err();
        assert!(err.is_network(), "unexpected error: {err:?}");
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn non_success_dashboard_is_an_http_error() {
        let (client, server) = serve_once(response("503 Service Unavailable", "{}")).await;

        let err = client.fetch_dashboard(1, FetchOptions::default()).await.unwrap_err();
        assert!(matches!(err, ClientError::Http { status: 503 }), "unexpected error: {err:?}");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn plain_fetch_has_no_cache_busting() {
        let (client, server) = serve_once(response("200 OK", "{}")).await;

        let snapshot = client.fetch_dashboard(3, FetchOptions::default()).await.unwrap();
        assert_eq!(snapshot.user_id, 3);

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/dashboard/3 HTTP/1.1"), "{request}");
        assert!(!request.to_lowercase().contains("cache-control"));
    }

    #[tokio::test]
    async fn forced_fetch_bypasses_caches() {
        let (client, server) = serve_once(response("200 OK", "{}")).await;

        client.fetch_dashboard(1, FetchOptions::fresh()).await.unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/dashboard/1?_="), "{request}");
        assert!(request.to_lowercase().contains("cache-control: no-cache"));
    }

    #[tokio::test]
    async fn login_client_error_is_rejected_with_message() {
        let body = r#"{"success": false, "message": "Invalid email or password"}"#;
        let (client, server) = serve_once(response("401 Unauthorized", body)).await;

        let err = client.login("ada@example.com", "wrong").await.unwrap_err();
        match err {
            ClientError::Rejected { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid email or password");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /login "));
        assert!(request.contains(r#""email":"ada@example.com""#));
    }

    #[tokio::test]
    async fn login_refused_in_body_is_rejected() {
        let body = r#"{"success": false, "message": "Account locked"}"#;
        let (client, server) = serve_once(response("200 OK", body)).await;

        let err = client.login("ada@example.com", "Str0ngPass").await.unwrap_err();
        assert!(
            matches!(err, ClientError::Rejected { ref message, .. } if message == "Account locked"),
            "unexpected error: {err:?}"
        );
        server.await.unwrap();
    }

    #[tokio::test]
    async fn login_success_returns_user() {
        let body = r#"{"success": true, "user": {"user_id": 7, "username": "ada"}}"#;
        let (client, server) = serve_once(response("200 OK", body)).await;

        let user = client.login("ada@example.com", "Str0ngPass").await.unwrap();
        assert_eq!(user.user_id, Some(7));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn logout_hits_the_logout_route() {
        let (client, server) = serve_once(response("200 OK", "")).await;

        client.logout().await.unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /logout HTTP/1.1"), "{request}");
    }

    #[tokio::test]
    async fn invalid_signup_never_reaches_the_network() {
        let client = HealthApiClient::builder().endpoint(DEAD_ENDPOINT).build().unwrap();
        let form = SignupForm::new("al", "al@example.com", "Str0ngPass");

        let err = client.signup(&form).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Validation(ValidationError::UsernameTooShort)
        ));
    }

    #[test]
    fn profile_initials_fall_back_to_name() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"name": "ada lovelace", "email": "ada@example.com"}"#).unwrap();
        assert_eq!(profile.display_initials(), "AL");

        let profile: UserProfile = serde_json::from_str(r#"{"initials": "QX"}"#).unwrap();
        assert_eq!(profile.display_initials(), "QX");

        let profile: UserProfile = serde_json::from_str("{}").unwrap();
        assert_eq!(profile.display_initials(), "?");
    }

    #[test]
    fn auth_response_accepts_flat_and_nested_users() {
        let flat: AuthResponse =
            serde_json::from_str(r#"{"user_id": 4, "username": "ada", "email": "a@b.io"}"#).unwrap();
        assert_eq!(flat.into_user().user_id, Some(4));

        let nested: AuthResponse =
            serde_json::from_str(r#"{"user": {"username": "ada"}}"#).unwrap();
        assert_eq!(nested.into_user().username.as_deref(), Some("ada"));

        let refused: AuthResponse =
            serde_json::from_str(r#"{"success": false, "message": "Invalid credentials"}"#).unwrap();
        assert_eq!(refused.message().as_deref(), Some("Invalid credentials"));
    }
}
