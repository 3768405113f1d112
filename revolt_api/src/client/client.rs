//! Revolt HTTP client.
//!
//! The client supports an **optional HTTP proxy** used for *all* HTTP
//! requests and for the WebSocket tunnel. Supported proxy formats:
//! * `http://USERNAME:PASSWORD@IP:PORT`
//! * `http://IP:PORT` *(user / password omitted)*

use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, ClientBuilder, Method, Proxy, Response};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;
use url::Url;

use crate::error::RevoltError;
use crate::types::error_types::Error as ApiError;
use crate::websocket::connection::{ConnectionState, WsSink};
use crate::websocket::event_handler::EventHandler;

/// Upper bound on a single REST round trip.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("revolt_api/", env!("CARGO_PKG_VERSION"), " (giveaway bot)");

/// How the client authenticates against the API.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// A bot account token, sent as `X-Bot-Token`.
    Bot(String),
    /// A user session token (e.g. from [`crate::AuthApi::login`]), sent as `X-Session-Token`.
    Session(String),
}

impl Credentials {
    pub fn token(&self) -> &str {
        match self {
            Credentials::Bot(t) | Credentials::Session(t) => t,
        }
    }

    fn header_name(&self) -> &'static str {
        match self {
            Credentials::Bot(_) => "X-Bot-Token",
            Credentials::Session(_) => "X-Session-Token",
        }
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Bot(_) => f.write_str("Bot(<redacted>)"),
            Credentials::Session(_) => f.write_str("Session(<redacted>)"),
        }
    }
}

/// Main client to interact with the Revolt API.
#[derive(Clone)]
pub struct RevoltClient {
    /* ───────────────────────── Public configuration ───────────────────────── */
    pub base_url: String,
    pub ws_url: Option<String>,
    /// Optional HTTP proxy, see the module docs for accepted formats.
    pub proxy: Option<String>,

    /* ───────────────────────── Internal plumbing ──────────────────────────── */
    pub http: Client,
    pub credentials: Arc<Mutex<Option<Credentials>>>,
    pub(crate) ws_tx: Arc<Mutex<Option<WsSink>>>,
    pub(crate) event_handler: Arc<Mutex<Option<Arc<dyn EventHandler>>>>,
    pub(crate) connection_state: Arc<Mutex<ConnectionState>>,
}

impl Debug for RevoltClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevoltClient")
            .field("base_url", &self.base_url)
            .field("ws_url", &self.ws_url)
            .field("proxy", &self.proxy)
            .field("http", &"reqwest::Client")
            .field("credentials", &self.credentials)
            .field("connection_state", &self.connection_state)
            .finish()
    }
}

impl RevoltClient {
    /// Construct a new [`RevoltClient`].
    ///
    /// # Parameters
    /// * `base_url` – REST endpoint (e.g. `https://api.revolt.chat`).
    /// * `ws_url`   – WebSocket endpoint (`wss://…`); if `None`, the public
    ///   Revolt event server is used.
    /// * `proxy`    – optional proxy URL.
    pub fn new(
        base_url: String,
        ws_url: Option<String>,
        proxy: Option<String>,
    ) -> Result<Self, RevoltError> {
        let mut builder = ClientBuilder::new()
            .user_agent(USER_AGENT)
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(REQUEST_TIMEOUT)
            .use_rustls_tls();

        if let Some(ref p) = proxy {
            let full = normalize_proxy(p);
            let req_proxy = Proxy::all(&full)
                .map_err(|e| RevoltError::Other(format!("Invalid proxy URL `{full}`: {e}")))?;
            builder = builder.proxy(req_proxy);
        }

        let http = builder.build()?;

        Ok(Self {
            base_url,
            ws_url,
            proxy,
            http,
            credentials: Arc::new(Mutex::new(None)),
            ws_tx: Arc::new(Mutex::new(None)),
            event_handler: Arc::new(Mutex::new(None)),
            connection_state: Arc::new(Mutex::new(ConnectionState::Disconnected)),
        })
    }

    /* ─────────────────────────── Runtime helpers ─────────────────────────── */

    /// Manually set or clear the credentials.
    pub async fn set_credentials(&self, credentials: Option<Credentials>) {
        *self.credentials.lock().await = credentials;
    }

    /// Build an authenticated `reqwest::RequestBuilder`.
    async fn authed_request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        let credentials = self.credentials.lock().await.clone();

        let mut req = self
            .http
            .request(method, url)
            .header("Accept", "application/json");

        if let Some(c) = credentials {
            req = req.header(c.header_name(), c.token());
        }

        req
    }

    /* ───────────── Convenience wrappers around HTTP verbs ───────────── */

    pub async fn authed_get(&self, url: Url) -> Result<Response, RevoltError> {
        Ok(self.authed_request(Method::GET, url).await.send().await?)
    }

    pub async fn authed_post<T: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &T,
    ) -> Result<Response, RevoltError> {
        Ok(self
            .authed_request(Method::POST, url)
            .await
            .json(body)
            .send()
            .await?)
    }

    pub async fn authed_put_empty(&self, url: Url) -> Result<Response, RevoltError> {
        Ok(self.authed_request(Method::PUT, url).await.send().await?)
    }

    pub async fn authed_patch<T: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &T,
    ) -> Result<Response, RevoltError> {
        Ok(self
            .authed_request(Method::PATCH, url)
            .await
            .json(body)
            .send()
            .await?)
    }

    pub async fn authed_delete(&self, url: Url) -> Result<Response, RevoltError> {
        Ok(self.authed_request(Method::DELETE, url).await.send().await?)
    }

    pub async fn authed_delete_with_body<T: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &T,
    ) -> Result<Response, RevoltError> {
        Ok(self
            .authed_request(Method::DELETE, url)
            .await
            .json(body)
            .send()
            .await?)
    }
}

/// Accept proxies given without a scheme by assuming plain HTTP.
pub(crate) fn normalize_proxy(raw: &str) -> String {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    }
}

/// Parse the body as JSON **iff** the response status is success.
pub async fn parse_json_if_ok<T: DeserializeOwned>(resp: Response) -> Result<T, RevoltError> {
    let status = resp.status();
    let bytes = resp.bytes().await?;

    if !status.is_success() {
        return Err(error_from_body(status.as_u16(), &bytes));
    }

    serde_json::from_slice::<T>(&bytes).map_err(RevoltError::SerdeError)
}

/// Succeed on any 2xx status, discarding the body (most `204` endpoints).
pub async fn require_success(resp: Response) -> Result<(), RevoltError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(());
    }
    let bytes = resp.bytes().await?;
    Err(error_from_body(status.as_u16(), &bytes))
}

fn error_from_body(code: u16, bytes: &[u8]) -> RevoltError {
    match serde_json::from_slice::<ApiError>(bytes) {
        Ok(api_err) => api_err.into(),
        Err(_) => RevoltError::HttpStatus {
            code,
            body: String::from_utf8_lossy(bytes).to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::error_types::ErrorKind;

    #[test]
    fn proxy_without_scheme_gets_http() {
        assert_eq!(normalize_proxy("10.0.0.1:8080"), "http://10.0.0.1:8080");
        assert_eq!(normalize_proxy("https://u:p@host:1"), "https://u:p@host:1");
    }

    #[test]
    fn credentials_pick_the_right_header() {
        assert_eq!(Credentials::Bot("t".into()).header_name(), "X-Bot-Token");
        assert_eq!(Credentials::Session("t".into()).header_name(), "X-Session-Token");
        assert_eq!(format!("{:?}", Credentials::Bot("secret".into())), "Bot(<redacted>)");
    }

    #[test]
    fn typed_error_bodies_become_api_errors() {
        let err = error_from_body(403, br#"{"type":"MissingPermission","permission":"AssignRoles","location":"x"}"#);
        assert!(matches!(
            err.api_kind(),
            Some(ErrorKind::MissingPermission { permission }) if permission == "AssignRoles"
        ));
    }

    #[test]
    fn untyped_error_bodies_keep_the_status() {
        let err = error_from_body(502, b"bad gateway");
        assert_eq!(err.status(), Some(502));
    }
}
