//! Authenticated CaaS connection.
//!
//! A [`Connection`] is bound to one region and one credential pair. It signs every
//! request with HTTP Basic authentication, builds paths for both API generations
//! and lazily resolves the account's organization id, which most resources are
//! scoped under.

use crate::response::parse_response;
use crate::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use dimensiondata_core::client::{
    ClientConfig, API_PATH_VERSION_1, API_PATH_VERSION_2, API_VERSION_1, API_VERSION_2,
};
use dimensiondata_core::config::ConnectionConfig;
use dimensiondata_core::region::Region;
use dimensiondata_core::xml::{XmlDocument, DIRECTORY_NS};
use dimensiondata_core::Error;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, Method, Proxy};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use url::Url;

const USER_AGENT: &str = concat!("dimensiondata-caas/", env!("CARGO_PKG_VERSION"));

/// Account endpoint carrying the organization id.
pub const MY_ACCOUNT_ACTION: &str = "myaccount";

/// Content type sent with every request.
pub const XML_CONTENT_TYPE: &str = "application/xml";

/// Value of the `Authorization` header for a credential pair.
#[must_use]
pub fn authorization_header(user_id: &str, key: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{user_id}:{key}")))
}

/// `/oec/0.9/<action>`
#[must_use]
pub fn api_1_path(action: &str) -> String {
    format!("{API_PATH_VERSION_1}/{API_VERSION_1}/{action}")
}

/// `/caas/2.0/<path>/<action>`
#[must_use]
pub fn api_2_path(path: &str, action: &str) -> String {
    format!("{API_PATH_VERSION_2}/{API_VERSION_2}/{path}/{action}")
}

/// `/oec/0.9/<org_id>`
#[must_use]
pub fn org_resource_path_api_1(org_id: &str) -> String {
    format!("{API_PATH_VERSION_1}/{API_VERSION_1}/{org_id}")
}

/// `/caas/2.0/<org_id>`
#[must_use]
pub fn org_resource_path_api_2(org_id: &str) -> String {
    format!("{API_PATH_VERSION_2}/{API_VERSION_2}/{org_id}")
}

/// `/oec/0.9/<org_id>/<action>`
#[must_use]
pub fn org_api_1_path(org_id: &str, action: &str) -> String {
    format!("{}/{action}", org_resource_path_api_1(org_id))
}

/// `/caas/2.0/<org_id>/<path>/<action>`
#[must_use]
pub fn org_api_2_path(org_id: &str, path: &str, action: &str) -> String {
    format!("{}/{path}/{action}", org_resource_path_api_2(org_id))
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum OrgIdState {
    Unresolved,
    Resolved(String),
}

#[derive(Debug)]
struct Credentials {
    user_id: String,
    key: SecretString,
}

/// Builder for [`Connection`].
#[derive(Debug)]
pub struct ConnectionBuilder {
    user_id: String,
    key: SecretString,
    region: &'static Region,
    host: Option<String>,
    port: Option<u16>,
    secure: bool,
    proxy_url: Option<String>,
    http_config: ClientConfig,
    org_id: Option<String>,
}

impl ConnectionBuilder {
    /// Create a builder for the default region.
    pub fn new(user_id: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            key: SecretString::from(key.into()),
            region: Region::default_region(),
            host: None,
            port: None,
            secure: true,
            proxy_url: None,
            http_config: ClientConfig::new(),
            org_id: None,
        }
    }

    /// Create a builder from a validated configuration.
    pub fn from_config(config: &ConnectionConfig) -> Result<Self> {
        config.ensure_valid()?;

        let mut builder = Self::new(config.user_id.clone(), config.key.clone())
            .with_secure(config.secure)
            .with_timeout(config.timeout());
        builder.region = config.resolve_region()?;
        builder.host = config.host.clone();
        builder.port = config.port;
        builder.proxy_url = config.proxy_url.clone();
        Ok(builder)
    }

    /// Select the region by code.
    pub fn with_region(mut self, code: &str) -> Result<Self> {
        self.region = Region::lookup(code)?;
        Ok(self)
    }

    /// Override the region host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Override the default port for the scheme.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Use HTTPS (default) or plain HTTP.
    #[must_use]
    pub const fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Override the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http_config.timeout = timeout;
        self
    }

    /// Route requests through an HTTP(S) proxy.
    #[must_use]
    pub fn with_proxy(mut self, proxy_url: impl Into<String>) -> Self {
        self.proxy_url = Some(proxy_url.into());
        self
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Seed the organization id so it is never fetched.
    #[must_use]
    pub fn with_org_id(mut self, org_id: impl Into<String>) -> Self {
        self.org_id = Some(org_id.into());
        self
    }

    /// Build the connection.
    pub fn build(self) -> Result<Connection> {
        let host = self.host.as_deref().unwrap_or(self.region.host);
        let scheme = if self.secure { "https" } else { "http" };
        if !self.secure {
            warn!(host, "CaaS connection is not using TLS");
        }

        let mut base_url = Url::parse(&format!("{scheme}://{host}"))?;
        if let Some(port) = self.port {
            base_url.set_port(Some(port)).map_err(|()| {
                Error::ConfigError(format!("Cannot set port {port} on `{base_url}`"))
            })?;
        }

        let mut builder = ClientBuilder::new()
            .timeout(self.http_config.timeout)
            .user_agent(USER_AGENT)
            .pool_idle_timeout(self.http_config.pool_idle_timeout)
            .pool_max_idle_per_host(self.http_config.pool_max_idle_per_host)
            .connect_timeout(self.http_config.connect_timeout);

        if !self.http_config.enable_compression {
            builder = builder.no_gzip();
        }
        if let Some(proxy_url) = &self.proxy_url {
            let proxy = Proxy::all(proxy_url.as_str()).map_err(|err| {
                Error::ConfigError(format!("Invalid proxy URL `{proxy_url}`: {err}"))
            })?;
            builder = builder.proxy(proxy);
        }

        let http = builder.build().map_err(|err| {
            Error::ConfigError(format!("Failed to build CaaS HTTP client: {err}"))
        })?;

        let org_id = self
            .org_id
            .map_or(OrgIdState::Unresolved, OrgIdState::Resolved);

        Ok(Connection {
            http,
            base_url,
            region: self.region,
            credentials: Arc::new(Credentials {
                user_id: self.user_id,
                key: self.key,
            }),
            org_id: Arc::new(Mutex::new(org_id)),
        })
    }
}

/// Authenticated connection to the CaaS API.
///
/// Clones share the organization id cache.
#[derive(Debug, Clone)]
pub struct Connection {
    http: Client,
    base_url: Url,
    region: &'static Region,
    credentials: Arc<Credentials>,
    org_id: Arc<Mutex<OrgIdState>>,
}

impl Connection {
    /// Connect to the default region.
    pub fn new(user_id: impl Into<String>, key: impl Into<String>) -> Result<Self> {
        ConnectionBuilder::new(user_id, key).build()
    }

    /// Connect using a configuration.
    pub fn from_config(config: &ConnectionConfig) -> Result<Self> {
        ConnectionBuilder::from_config(config)?.build()
    }

    /// Access the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Host requests are sent to.
    #[must_use]
    pub fn host(&self) -> &str {
        self.base_url.host_str().unwrap_or_default()
    }

    /// Port requests are sent to.
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.base_url.port_or_known_default()
    }

    /// The region this connection was created for.
    #[must_use]
    pub const fn region(&self) -> &'static Region {
        self.region
    }

    /// Driver name attached to API errors.
    #[must_use]
    pub const fn driver(&self) -> &'static str {
        self.region.vendor
    }

    /// The API user id.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.credentials.user_id
    }

    /// Headers added to every request.
    pub fn default_headers(&self) -> Result<HeaderMap> {
        let credentials = &self.credentials;
        let mut authorization = HeaderValue::from_str(&authorization_header(
            &credentials.user_id,
            credentials.key.expose_secret(),
        ))
        .map_err(|err| Error::ConfigError(format!("Invalid credentials for header: {err}")))?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(XML_CONTENT_TYPE));
        Ok(headers)
    }

    /// Issue a request against `/oec/0.9/<action>`.
    pub async fn request_api_1(
        &self,
        method: Method,
        action: &str,
        params: &[(&'static str, String)],
        body: Option<&str>,
    ) -> Result<String> {
        self.send(method, &api_1_path(action), params, body).await
    }

    /// Issue a request against `/caas/2.0/<path>/<action>`.
    pub async fn request_api_2(
        &self,
        method: Method,
        path: &str,
        action: &str,
        params: &[(&'static str, String)],
        body: Option<&str>,
    ) -> Result<String> {
        self.send(method, &api_2_path(path, action), params, body)
            .await
    }

    /// Issue a request against `/oec/0.9/<org_id>/<action>`.
    pub async fn request_with_org_id_api_1(
        &self,
        method: Method,
        action: &str,
        params: &[(&'static str, String)],
        body: Option<&str>,
    ) -> Result<String> {
        let org_id = self.resolve_org_id().await?;
        self.send(method, &org_api_1_path(&org_id, action), params, body)
            .await
    }

    /// Issue a request against `/caas/2.0/<org_id>/<path>/<action>`.
    pub async fn request_with_org_id_api_2(
        &self,
        method: Method,
        path: &str,
        action: &str,
        params: &[(&'static str, String)],
        body: Option<&str>,
    ) -> Result<String> {
        let org_id = self.resolve_org_id().await?;
        self.send(method, &org_api_2_path(&org_id, path, action), params, body)
            .await
    }

    /// Resource path `/oec/0.9/<org_id>` for resources referenced by full path.
    pub async fn resource_path_api_1(&self) -> Result<String> {
        Ok(org_resource_path_api_1(&self.resolve_org_id().await?))
    }

    /// Resource path `/caas/2.0/<org_id>` for resources referenced by full path.
    pub async fn resource_path_api_2(&self) -> Result<String> {
        Ok(org_resource_path_api_2(&self.resolve_org_id().await?))
    }

    /// Organization id of the account, fetched from `myaccount` on first use.
    ///
    /// The lock is held for the whole lookup, so concurrent callers wait for a single
    /// request. A response without `orgId` leaves the cache unresolved and the next
    /// call asks again.
    pub async fn resolve_org_id(&self) -> Result<String> {
        let mut state = self.org_id.lock().await;
        if let OrgIdState::Resolved(org_id) = &*state {
            return Ok(org_id.clone());
        }

        debug!("resolving organization id");
        let body = self
            .request_api_1(Method::GET, MY_ACCOUNT_ACTION, &[], None)
            .await?;
        let document = XmlDocument::parse(&body)?;

        match document.findtext("orgId", DIRECTORY_NS) {
            Some(org_id) if !org_id.is_empty() => {
                debug!(org_id, "organization id resolved");
                *state = OrgIdState::Resolved(org_id.to_string());
                Ok(org_id.to_string())
            }
            _ => {
                warn!("account response did not include an organization id");
                Err(Error::OrganizationUnresolved(format!(
                    "`orgId` missing from {} response",
                    api_1_path(MY_ACCOUNT_ACTION)
                )))
            }
        }
    }

    /// The cached organization id, without fetching it.
    pub async fn cached_org_id(&self) -> Option<String> {
        match &*self.org_id.lock().await {
            OrgIdState::Resolved(org_id) => Some(org_id.clone()),
            OrgIdState::Unresolved => None,
        }
    }

    fn build_url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        params: &[(&'static str, String)],
        body: Option<&str>,
    ) -> Result<String> {
        let url = self.build_url(path)?;
        let mut request = self
            .http
            .request(method.clone(), url)
            .headers(self.default_headers()?)
            .query(params);
        if let Some(payload) = body {
            request = request.body(payload.to_string());
        }

        info!(%method, path, "CaaS request");

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await.map_err(|err| {
            Error::HttpError(format!("Failed to read CaaS response body: {err}"))
        })?;
        debug!(path, status = status.as_u16(), "CaaS response");

        parse_response(status, text, self.driver()).map_err(|err| {
            if err.should_log() {
                error!(path, code = err.error_code(), error = %err, "CaaS request failed");
            } else {
                debug!(path, code = err.error_code(), "CaaS request failed");
            }
            err
        })
    }
}
