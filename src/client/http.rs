//! HTTP client implementation for the lemon.markets APIs.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, IF_MODIFIED_SINCE};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::api::{MarketDataApi, StreamingApi, TradingApi};
use crate::error::{classify, ErrorDomain};
use crate::{Error, Result};

use super::config::{ClientConfig, Environment, RetryConfig};
use super::paginated::PageFetcher;
use super::query::Query;

/// The main client for interacting with the lemon.markets APIs.
///
/// One token authenticates against the market data, trading and realtime
/// APIs; each is reached through its own accessor.
///
/// # Example
///
/// ```no_run
/// use futures_util::StreamExt;
/// use lemon_rs::LemonClient;
/// use lemon_rs::api::InstrumentsQuery;
///
/// # async fn example() -> lemon_rs::Result<()> {
/// let client = LemonClient::new("your-api-token")?;
///
/// let page = client
///     .market_data()
///     .instruments()
///     .get(InstrumentsQuery::new().search("tesla"))
///     .await?;
///
/// let mut instruments = page.auto_iter();
/// while let Some(instrument) = instruments.next().await {
///     println!("{}", instrument?.isin);
/// }
///
/// let account = client.trading().account().get().await?;
/// println!("{:?}", account.results.cash_to_invest);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct LemonClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    market_data: ApiClient,
    trading: ApiClient,
    streaming: ApiClient,
    config: ClientConfig,
}

impl LemonClient {
    /// Create a client for the paper trading environment with default settings.
    pub fn new(api_token: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::new(api_token))
    }

    /// Create a client with a custom configuration.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let api = |base_url: &str, domain| {
            ApiClient::new(
                http.clone(),
                base_url,
                config.api_token.clone(),
                config.retry.clone(),
                domain,
            )
        };
        let market_data = api(&config.market_data_url, ErrorDomain::MarketData)?;
        let trading = api(config.trading_url(), ErrorDomain::Trading)?;
        let streaming = api(&config.streaming_url, ErrorDomain::Streaming)?;

        tracing::debug!(
            environment = %config.environment,
            market_data = %market_data.base_url(),
            trading = %trading.base_url(),
            "created lemon.markets client"
        );

        Ok(Self {
            inner: Arc::new(ClientInner {
                market_data,
                trading,
                streaming,
                config,
            }),
        })
    }

    /// The market data API.
    pub fn market_data(&self) -> MarketDataApi<'_> {
        MarketDataApi::new(&self.inner.market_data)
    }

    /// The trading API for the configured environment.
    pub fn trading(&self) -> TradingApi<'_> {
        TradingApi::new(&self.inner.trading)
    }

    /// The realtime API.
    pub fn streaming(&self) -> StreamingApi<'_> {
        StreamingApi::new(&self.inner.streaming)
    }

    /// The configured trading environment.
    pub fn environment(&self) -> Environment {
        self.inner.config.environment
    }

    /// The client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }
}

impl std::fmt::Debug for LemonClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LemonClient")
            .field("config", &self.inner.config)
            .finish()
    }
}

/// Shared request path for one lemon.markets API host.
///
/// Every verb goes through the same retry loop and the same error
/// classification. Paths are resolved against the versioned base URL, so
/// `"instruments"` becomes `https://data.lemon.markets/v1/instruments` and
/// an absolute URL (such as a `next` page link) replaces the base.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: SecretString,
    retry: RetryConfig,
    domain: ErrorDomain,
}

impl ApiClient {
    pub(crate) fn new(
        http: reqwest::Client,
        base_url: &str,
        token: SecretString,
        retry: RetryConfig,
        domain: ErrorDomain,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!("not a base URL: {base_url}")));
        }
        Ok(Self {
            http,
            base_url,
            token,
            retry,
            domain,
        })
    }

    /// The versioned base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Which error code table applies to this API.
    pub fn domain(&self) -> ErrorDomain {
        self.domain
    }

    /// Resolve a path against the base URL.
    pub fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Make a GET request.
    pub async fn get(&self, path: &str, query: &Query) -> Result<Value> {
        let url = self.url(path)?;
        let response = self.execute(Method::GET, url, query, HeaderMap::new(), None).await?;
        self.handle_response(response).await
    }

    /// Make a GET request carrying `If-Modified-Since`.
    ///
    /// Returns `None` when the server answers `304 Not Modified`.
    pub async fn get_conditional(
        &self,
        path: &str,
        query: &Query,
        modified_since: Option<DateTime<Utc>>,
    ) -> Result<Option<Value>> {
        let url = self.url(path)?;
        let mut headers = HeaderMap::new();
        if let Some(since) = modified_since {
            let value = since.format("%a, %d %b %Y %H:%M:%S GMT").to_string();
            headers.insert(
                IF_MODIFIED_SINCE,
                HeaderValue::from_str(&value)
                    .map_err(|_| Error::InvalidInput(format!("invalid timestamp: {value}")))?,
            );
        }

        let response = self.execute(Method::GET, url, query, headers, None).await?;
        if response.status() == StatusCode::NOT_MODIFIED {
            tracing::debug!(path, "not modified");
            return Ok(None);
        }
        self.handle_response(response).await.map(Some)
    }

    /// Make a POST request with a JSON body.
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        let url = self.url(path)?;
        let body = serde_json::to_value(body)?;
        let response = self
            .execute(Method::POST, url, &Query::new(), HeaderMap::new(), Some(body))
            .await?;
        self.handle_response(response).await
    }

    /// Make a PUT request with a JSON body.
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        let url = self.url(path)?;
        let body = serde_json::to_value(body)?;
        let response = self
            .execute(Method::PUT, url, &Query::new(), HeaderMap::new(), Some(body))
            .await?;
        self.handle_response(response).await
    }

    /// Make a DELETE request.
    pub async fn delete(&self, path: &str, query: &Query) -> Result<Value> {
        let url = self.url(path)?;
        let response = self
            .execute(Method::DELETE, url, query, HeaderMap::new(), None)
            .await?;
        self.handle_response(response).await
    }

    /// Build request headers with authentication.
    fn build_headers(&self, extra: &HeaderMap) -> Result<HeaderMap> {
        let mut headers = extra.clone();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", self.token.expose_secret()))
            .map_err(|_| Error::InvalidInput("Invalid token format".to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        Ok(headers)
    }

    fn request(
        &self,
        method: &Method,
        url: &Url,
        query: &Query,
        headers: &HeaderMap,
        body: Option<&Value>,
    ) -> RequestBuilder {
        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .headers(headers.clone());
        if !query.is_empty() {
            request = request.query(query.pairs());
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        request
    }

    /// Send a request, retrying idempotent verbs on transient failures.
    async fn execute(
        &self,
        method: Method,
        url: Url,
        query: &Query,
        headers: HeaderMap,
        body: Option<Value>,
    ) -> Result<Response> {
        let headers = self.build_headers(&headers)?;
        let idempotent = matches!(method, Method::GET | Method::DELETE | Method::HEAD);
        let mut attempt = 0;

        loop {
            tracing::debug!(%method, %url, attempt, "sending request");
            let result = self
                .request(&method, &url, query, &headers, body.as_ref())
                .send()
                .await;

            let retryable = idempotent
                && match &result {
                    Ok(response) => self.retry.should_retry_status(response.status().as_u16()),
                    Err(err) => err.is_timeout() || err.is_connect(),
                };
            if !retryable || attempt >= self.retry.max_retries {
                return Ok(result?);
            }

            let backoff = self.retry.backoff_for_attempt(attempt);
            match &result {
                Ok(response) => tracing::warn!(
                    %method, %url, status = response.status().as_u16(), ?backoff,
                    "retrying request"
                ),
                Err(err) => tracing::warn!(
                    %method, %url, error = %err, ?backoff,
                    "retrying request"
                ),
            }
            tokio::time::sleep(backoff).await;
            attempt += 1;
        }
    }

    /// Handle an API response.
    ///
    /// Every response, whatever the verb, is classified here.
    async fn handle_response(&self, response: Response) -> Result<Value> {
        let status = response.status();
        let text = response.text().await?;

        let body = if status.is_success() {
            if text.trim().is_empty() {
                Value::Null
            } else {
                serde_json::from_str(&text)?
            }
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        classify(self.domain, status.is_success(), body).map_err(|err| {
            tracing::debug!(status = status.as_u16(), error = %err, "API error");
            Error::Api(err)
        })
    }
}

impl PageFetcher for ApiClient {
    fn fetch_page(&self, url: &str) -> impl Future<Output = Result<Value>> + Send {
        async move {
            tracing::debug!(url, "fetching next page");
            self.get(url, &Query::new()).await
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("domain", &self.domain)
            .finish()
    }
}
