//! Main API client implementation

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::extensions::{ExtensionDescriptor, ExtensionRegistry};
use crate::types::{CreatePin, DeleteSummary, Metadata, Pin, UpdatePin};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// Pin collection route
const PINS_ROUTE: &str = "/pins";

/// Waypost pin API client
///
/// This client wraps `reqwest` and adds:
/// - Bearer-key authentication forced onto every request
/// - Typed pin CRUD operations and metadata lookup
/// - Request correlation IDs for tracing
/// - An extension registry built at construction time
///
/// The client is stateless per call; every operation is a fresh round trip.
/// Cloning is cheap and all clones share the same configuration.
#[derive(Debug, Clone)]
pub struct WaypostClient {
    ops: PinOperations,
    extensions: Arc<ExtensionRegistry>,
}

impl WaypostClient {
    /// Create a new client with configuration from the environment
    pub fn new() -> ApiResult<Self> {
        let config = ClientConfig::from_env()?;
        Self::with_config(config)
    }

    /// Create a new client with specific configuration and no extensions
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        Self::build(config, Vec::new())
    }

    /// Start building a client with the given base URL and bearer key
    #[must_use]
    pub fn builder(api_url: impl Into<String>, key: impl Into<String>) -> ClientBuilder {
        ClientBuilder {
            config: ClientConfig::new(api_url, key),
            extensions: Vec::new(),
        }
    }

    fn build(config: ClientConfig, descriptors: Vec<ExtensionDescriptor>) -> ApiResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_static("waypost-api-client/0.3"),
        );

        let mut builder = Client::builder().default_headers(default_headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ApiError::Request)?;

        let ops = PinOperations {
            http,
            config: Arc::new(config),
        };

        // Extensions are instantiated in the order given; a duplicate key
        // overwrites the earlier instance.
        let mut registry = ExtensionRegistry::default();
        for descriptor in descriptors {
            let (key, factory) = descriptor.into_parts();
            registry.insert(key, factory(ops.clone()));
        }

        Ok(Self {
            ops,
            extensions: Arc::new(registry),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.ops.config
    }

    /// Get the base URL
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.ops.config.api_url
    }

    /// The bound operation set this client uses for every request
    ///
    /// The same handle is given to extensions, so an extension calling an
    /// operation on it performs the identical authenticated request as the
    /// client's own method.
    #[must_use]
    pub fn operations(&self) -> &PinOperations {
        &self.ops
    }

    /// The extensions instantiated at construction time
    #[must_use]
    pub fn extensions(&self) -> &ExtensionRegistry {
        &self.extensions
    }

    /// Look up an extension by key, downcast to its concrete type
    #[must_use]
    pub fn extension<T: Any>(&self, key: &str) -> Option<&T> {
        self.extensions.get::<T>(key)
    }

    // -------------------------------------------------------------------------
    // Pin operations
    // -------------------------------------------------------------------------

    /// Create pins; the server assigns ids and applies defaults
    pub async fn create_pins(&self, pins: &[CreatePin]) -> ApiResult<Vec<Pin>> {
        self.ops.create_pins(pins).await
    }

    /// Apply partial updates to existing pins
    pub async fn update_pins(&self, pins: &[UpdatePin]) -> ApiResult<Vec<Pin>> {
        self.ops.update_pins(pins).await
    }

    /// Delete pins by id
    pub async fn delete_pins(&self, ids: &[String]) -> ApiResult<DeleteSummary> {
        self.ops.delete_pins(ids).await
    }

    /// Fetch every pin sharing the given meta id
    pub async fn get_pins(&self, meta_id: &str) -> ApiResult<Vec<Pin>> {
        self.ops.get_pins(meta_id).await
    }

    /// Fetch the opaque metadata document for the given meta id
    pub async fn get_metadata(&self, meta_id: &str) -> ApiResult<Metadata> {
        self.ops.get_metadata(meta_id).await
    }
}

/// Builder for [`WaypostClient`]
///
/// Collects configuration overrides and extension descriptors, then
/// validates and instantiates everything in [`build`](Self::build).
#[derive(Debug)]
pub struct ClientBuilder {
    config: ClientConfig,
    extensions: Vec<ExtensionDescriptor>,
}

impl ClientBuilder {
    /// Add a default header merged into every request
    ///
    /// Default headers take precedence over per-call headers; the forced
    /// `Authorization` and `Content-Type` headers win over both.
    #[must_use]
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config = self.config.with_default_header(name, value);
        self
    }

    /// Set the transport timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_timeout(timeout);
        self
    }

    /// Register an extension under `key`
    ///
    /// The factory receives the client's bound operation set and runs during
    /// [`build`](Self::build), in registration order. A later duplicate key
    /// overwrites the earlier instance.
    #[must_use]
    pub fn extension<T, F>(mut self, key: impl Into<String>, factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: FnOnce(PinOperations) -> T + Send + 'static,
    {
        self.extensions.push(ExtensionDescriptor::new(key, factory));
        self
    }

    /// Register a pre-built extension descriptor
    #[must_use]
    pub fn descriptor(mut self, descriptor: ExtensionDescriptor) -> Self {
        self.extensions.push(descriptor);
        self
    }

    /// Validate the configuration and construct the client
    ///
    /// Fails with a configuration error if the key is empty or not a
    /// three-segment bearer token. Instantiates every registered extension
    /// before returning; performs no network I/O.
    pub fn build(self) -> ApiResult<WaypostClient> {
        WaypostClient::build(self.config, self.extensions)
    }
}

/// The client's bound operation set
///
/// A cheap-to-clone handle carrying the transport and configuration. Every
/// public operation on [`WaypostClient`] delegates here, and the same handle
/// is passed to extension factories, so extension calls are
/// indistinguishable from the client's own.
#[derive(Debug, Clone)]
pub struct PinOperations {
    http: Client,
    config: Arc<ClientConfig>,
}

impl PinOperations {
    /// Create pins
    ///
    /// POST /pins
    #[instrument(skip(self, pins), fields(count = pins.len()))]
    pub async fn create_pins(&self, pins: &[CreatePin]) -> ApiResult<Vec<Pin>> {
        self.post(PINS_ROUTE, &pins).await
    }

    /// Apply partial updates to existing pins
    ///
    /// PUT /pins
    #[instrument(skip(self, pins), fields(count = pins.len()))]
    pub async fn update_pins(&self, pins: &[UpdatePin]) -> ApiResult<Vec<Pin>> {
        self.put(PINS_ROUTE, &pins).await
    }

    /// Delete pins by id
    ///
    /// DELETE /pins
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn delete_pins(&self, ids: &[String]) -> ApiResult<DeleteSummary> {
        self.delete(PINS_ROUTE, &ids).await
    }

    /// Fetch every pin sharing the given meta id
    ///
    /// GET /pins?meta-id=<meta_id>
    #[instrument(skip(self))]
    pub async fn get_pins(&self, meta_id: &str) -> ApiResult<Vec<Pin>> {
        self.get(&format!("{PINS_ROUTE}?meta-id={meta_id}")).await
    }

    /// Fetch the opaque metadata document for the given meta id
    ///
    /// GET /metadata/<meta_id>
    #[instrument(skip(self))]
    pub async fn get_metadata(&self, meta_id: &str) -> ApiResult<Metadata> {
        self.get(&format!("/metadata/{meta_id}")).await
    }

    // -------------------------------------------------------------------------
    // Low-level typed HTTP methods
    // -------------------------------------------------------------------------

    /// Perform a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.request(Method::GET, path, Option::<&()>::None).await
    }

    /// Perform a POST request
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        self.request(Method::POST, path, Some(body)).await
    }

    /// Perform a PUT request
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        self.request(Method::PUT, path, Some(body)).await
    }

    /// Perform a DELETE request with a body
    pub async fn delete<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        self.request(Method::DELETE, path, Some(body)).await
    }

    /// Execute an authenticated request against a path under the base URL
    pub async fn request<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ApiResult<T> {
        self.execute(method, path, body, None).await
    }

    /// Execute an authenticated request with per-call headers
    ///
    /// Per-call headers have the lowest precedence: configured default
    /// headers override them, and the forced `Authorization` and
    /// `Content-Type` pair overrides everything.
    pub async fn request_with_headers<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        headers: HeaderMap,
    ) -> ApiResult<T> {
        self.execute(method, path, body, Some(headers)).await
    }

    async fn execute<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        call_headers: Option<HeaderMap>,
    ) -> ApiResult<T> {
        let url = endpoint_url(&self.config.api_url, path);
        let request_id = Uuid::new_v4().to_string();
        let headers = self.request_headers(call_headers)?;

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(X_REQUEST_ID, &request_id)
            .headers(headers);

        if let Some(b) = body {
            request = request.body(serde_json::to_string(b)?);
        }

        debug!(
            request_id = %request_id,
            method = %method,
            url = %url,
            "Sending request"
        );

        let start = Instant::now();
        let response = request.send().await?;
        let elapsed = start.elapsed();

        debug!(
            request_id = %request_id,
            status = response.status().as_u16(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Response received"
        );

        self.handle_response(&request_id, response).await
    }

    /// Merge headers in increasing precedence: per-call, configured
    /// defaults, then the forced authentication pair. `HeaderMap::insert`
    /// replaces all prior values, so the forced headers appear exactly once.
    fn request_headers(&self, call_headers: Option<HeaderMap>) -> ApiResult<HeaderMap> {
        let mut headers = call_headers.unwrap_or_default();

        for (name, value) in &self.config.default_headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ApiError::invalid_header(name))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| ApiError::invalid_header(format!("value for {name}")))?;
            headers.insert(header_name, header_value);
        }

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.config.key))
            .map_err(|_| ApiError::invalid_header("Authorization"))?;
        headers.insert(AUTHORIZATION, bearer);

        Ok(headers)
    }

    /// Parse the response body as JSON regardless of status; status > 399
    /// fails with the parsed body, anything else deserializes into `T`.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        request_id: &str,
        response: Response,
    ) -> ApiResult<T> {
        let status = response.status().as_u16();
        let text = response.text().await?;
        let body: serde_json::Value = serde_json::from_str(&text)?;

        if status > 399 {
            warn!(
                request_id = %request_id,
                status = status,
                "Request failed"
            );
            return Err(ApiError::api(status, body));
        }

        serde_json::from_value(body).map_err(ApiError::Json)
    }
}

/// Join the base URL and a sub-resource path
fn endpoint_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}
