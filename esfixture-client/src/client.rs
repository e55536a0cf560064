use crate::decoder::{decode_with, DefaultDecoder, Decoder};
use crate::error::{ClientError, Result};
use crate::observer::{RequestInfo, ResponseHead, ResponseObserver};
use crate::services::{
    CountService, CreateIndexService, DeleteIndexService, FlushService, GetService,
    IndexExistsService, IndexService,
};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_URL: &str = "http://127.0.0.1:9200";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const TRACE_TARGET: &str = "esfixture_client::trace";

/// A single client setting, applied in order by [`ClientBuilder::options`].
#[derive(Debug, Clone)]
pub enum ClientOption {
    Url(String),
    BasicAuth { username: String, password: String },
    Timeout(Duration),
    /// Write every request and response body to the trace log
    TraceLog(bool),
    Decoder(Arc<dyn Decoder>),
    /// Ping the cluster while building; an unreachable cluster fails the build
    HealthCheck(bool),
}

pub struct ClientBuilder {
    url: String,
    basic_auth: Option<(String, String)>,
    timeout: Duration,
    trace_log: bool,
    decoder: Option<Arc<dyn Decoder>>,
    health_check: bool,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            basic_auth: None,
            timeout: DEFAULT_TIMEOUT,
            trace_log: false,
            decoder: None,
            health_check: true,
        }
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.basic_auth = Some((username.into(), password.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn trace_log(mut self, enabled: bool) -> Self {
        self.trace_log = enabled;
        self
    }

    pub fn decoder(mut self, decoder: Arc<dyn Decoder>) -> Self {
        self.decoder = Some(decoder);
        self
    }

    pub fn health_check(mut self, enabled: bool) -> Self {
        self.health_check = enabled;
        self
    }

    pub fn option(self, option: ClientOption) -> Self {
        match option {
            ClientOption::Url(url) => self.url(url),
            ClientOption::BasicAuth { username, password } => self.basic_auth(username, password),
            ClientOption::Timeout(timeout) => self.timeout(timeout),
            ClientOption::TraceLog(enabled) => self.trace_log(enabled),
            ClientOption::Decoder(decoder) => self.decoder(decoder),
            ClientOption::HealthCheck(enabled) => self.health_check(enabled),
        }
    }

    pub fn options<I>(self, options: I) -> Self
    where
        I: IntoIterator<Item = ClientOption>,
    {
        options.into_iter().fold(self, ClientBuilder::option)
    }

    /// Builds the client, pinging the cluster first unless health checks are off.
    pub async fn build(self) -> Result<Client> {
        let base_url = Url::parse(&self.url).map_err(|e| ClientError::InvalidUrl {
            url: self.url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl {
                url: self.url,
                reason: "expected an http or https URL".to_string(),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        let client = Client {
            http,
            base_url,
            basic_auth: self.basic_auth,
            trace_log: self.trace_log,
            decoder: self.decoder.unwrap_or_else(|| Arc::new(DefaultDecoder)),
            observer: None,
        };

        if self.health_check {
            client.ping().await?;
        }

        tracing::debug!(
            "[CLIENT] connected to {} (decoder={}, trace_log={})",
            client.base_url,
            client.decoder.name(),
            client.trace_log
        );

        Ok(client)
    }
}

/// Raw response after the observer has seen it.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn error_for_status(self) -> Result<Self> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(ClientError::from_response(self.status, &self.body))
        }
    }
}

/// Elasticsearch HTTP client with an assignable decoder and response observer.
///
/// Cloning is cheap; clones share the connection pool but carry their own
/// decoder and observer slots.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
    basic_auth: Option<(String, String)>,
    trace_log: bool,
    decoder: Arc<dyn Decoder>,
    observer: Option<Arc<dyn ResponseObserver>>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .field("decoder", &self.decoder)
            .field("trace_log", &self.trace_log)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Builds a client from a list of options.
    pub async fn new<I>(options: I) -> Result<Self>
    where
        I: IntoIterator<Item = ClientOption>,
    {
        ClientBuilder::new().options(options).build().await
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn decoder(&self) -> &Arc<dyn Decoder> {
        &self.decoder
    }

    pub fn set_decoder(&mut self, decoder: Arc<dyn Decoder>) {
        self.decoder = decoder;
    }

    pub fn response_observer(&self) -> Option<&Arc<dyn ResponseObserver>> {
        self.observer.as_ref()
    }

    pub fn set_response_observer(&mut self, observer: Option<Arc<dyn ResponseObserver>>) {
        self.observer = observer;
    }

    /// Decodes a response body with the installed decoder.
    pub fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T> {
        Ok(decode_with(self.decoder.as_ref(), data)?)
    }

    pub async fn ping(&self) -> Result<()> {
        self.perform_request(Method::GET, &[], &[], None)
            .await?
            .error_for_status()?;
        Ok(())
    }

    pub fn create_index(&self, index: impl Into<String>) -> CreateIndexService<'_> {
        CreateIndexService::new(self, index.into())
    }

    pub fn delete_index(&self, index: impl Into<String>) -> DeleteIndexService<'_> {
        DeleteIndexService::new(self, index.into())
    }

    pub fn index_exists(&self, index: impl Into<String>) -> IndexExistsService<'_> {
        IndexExistsService::new(self, index.into())
    }

    pub fn index(&self) -> IndexService<'_> {
        IndexService::new(self)
    }

    pub fn flush(&self) -> FlushService<'_> {
        FlushService::new(self)
    }

    pub fn get(&self) -> GetService<'_> {
        GetService::new(self)
    }

    pub fn count(&self) -> CountService<'_> {
        CountService::new(self)
    }

    /// Sends one request and hands the response head to the observer.
    ///
    /// Non-2xx statuses are returned as-is; callers decide with
    /// [`RawResponse::error_for_status`].
    pub async fn perform_request(
        &self,
        method: Method,
        path: &[&str],
        params: &[(&str, String)],
        body: Option<String>,
    ) -> Result<RawResponse> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ClientError::InvalidUrl {
                    url: self.base_url.to_string(),
                    reason: "URL cannot carry a path".to_string(),
                })?;
            segments.pop_if_empty().extend(path);
        }
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }

        if self.trace_log {
            tracing::trace!(
                target: TRACE_TARGET,
                "{} {}\n{}",
                method,
                url,
                body.as_deref().unwrap_or("")
            );
        }

        let mut request = self.http.request(method.clone(), url.clone());
        if let Some((username, password)) = &self.basic_auth {
            request = request.basic_auth(username, Some(password));
        }
        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(body);
        }

        let response = request.send().await?;
        let head = ResponseHead {
            status: response.status(),
            headers: response.headers().clone(),
        };

        if let Some(observer) = &self.observer {
            observer.observe(&RequestInfo { method, url }, &head);
        }

        let body = response.bytes().await?.to_vec();

        if self.trace_log {
            tracing::trace!(
                target: TRACE_TARGET,
                "{}\n{}",
                head.status,
                String::from_utf8_lossy(&body)
            );
        }

        Ok(RawResponse {
            status: head.status,
            headers: head.headers,
            body,
        })
    }
}
