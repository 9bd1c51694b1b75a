//! Client configuration options.

use std::fmt;
use std::time::Duration;

use secrecy::SecretString;

/// Default market data API base URL.
pub const DEFAULT_MARKET_DATA_URL: &str = "https://data.lemon.markets/v1/";
/// Default paper trading API base URL.
pub const DEFAULT_PAPER_TRADING_URL: &str = "https://paper-trading.lemon.markets/v1/";
/// Default money (live) trading API base URL.
pub const DEFAULT_MONEY_TRADING_URL: &str = "https://trading.lemon.markets/v1/";
/// Default realtime API base URL.
pub const DEFAULT_STREAMING_URL: &str = "https://realtime.lemon.markets/v1/";

/// Trading environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Environment {
    /// Paper trading with simulated funds
    #[default]
    Paper,
    /// Live trading with real funds
    Money,
}

impl Environment {
    /// Default trading API base URL for this environment.
    pub fn trading_base_url(&self) -> &'static str {
        match self {
            Environment::Paper => DEFAULT_PAPER_TRADING_URL,
            Environment::Money => DEFAULT_MONEY_TRADING_URL,
        }
    }

    /// The wire value (`"paper"` or `"money"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Paper => "paper",
            Environment::Money => "money",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for the lemon.markets client.
///
/// # Example
///
/// ```
/// use lemon_rs::{ClientConfig, Environment};
/// use std::time::Duration;
///
/// let config = ClientConfig::new("my-api-token")
///     .with_environment(Environment::Money)
///     .with_timeout(Duration::from_secs(10))
///     .with_user_agent("my-app/1.0");
/// assert_eq!(config.trading_url(), "https://trading.lemon.markets/v1/");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API token sent as a bearer token
    pub api_token: SecretString,
    /// Trading environment
    pub environment: Environment,
    /// Market data API base URL
    pub market_data_url: String,
    /// Trading API base URL; `None` picks the environment's default
    pub trading_url: Option<String>,
    /// Realtime API base URL
    pub streaming_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
    /// Retry configuration
    pub retry: RetryConfig,
}

impl ClientConfig {
    /// Create a configuration with default values for the given token.
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: SecretString::from(api_token.into()),
            environment: Environment::default(),
            market_data_url: DEFAULT_MARKET_DATA_URL.to_string(),
            trading_url: None,
            streaming_url: DEFAULT_STREAMING_URL.to_string(),
            timeout: Duration::from_secs(5),
            user_agent: format!("lemon-rs/{} (Rust)", env!("CARGO_PKG_VERSION")),
            retry: RetryConfig::default(),
        }
    }

    /// Set the trading environment.
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Override the market data API base URL.
    pub fn with_market_data_url(mut self, url: impl Into<String>) -> Self {
        self.market_data_url = url.into();
        self
    }

    /// Override the trading API base URL.
    pub fn with_trading_url(mut self, url: impl Into<String>) -> Self {
        self.trading_url = Some(url.into());
        self
    }

    /// Override the realtime API base URL.
    pub fn with_streaming_url(mut self, url: impl Into<String>) -> Self {
        self.streaming_url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the retry configuration.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// The effective trading API base URL.
    pub fn trading_url(&self) -> &str {
        self.trading_url
            .as_deref()
            .unwrap_or_else(|| self.environment.trading_base_url())
    }
}

/// Configuration for automatic retries.
///
/// By default, the client will retry idempotent requests (GET, DELETE)
/// on transient errors with exponential backoff.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Initial backoff duration
    pub initial_backoff: Duration,
    /// Maximum backoff duration
    pub max_backoff: Duration,
    /// HTTP status codes to retry on
    pub retry_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(10),
            retry_statuses: vec![429, 500, 502, 503, 504],
        }
    }
}

impl RetryConfig {
    /// Create a configuration with no retries.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Set the maximum number of retries.
    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    /// Set the initial backoff duration.
    pub fn with_initial_backoff(mut self, duration: Duration) -> Self {
        self.initial_backoff = duration;
        self
    }

    /// Set the maximum backoff duration.
    pub fn with_max_backoff(mut self, duration: Duration) -> Self {
        self.max_backoff = duration;
        self
    }

    /// Calculate the backoff duration for a given attempt.
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        let backoff_millis = (self.initial_backoff.as_millis() as u64).saturating_mul(factor);
        let max_millis = self.max_backoff.as_millis() as u64;
        Duration::from_millis(backoff_millis.min(max_millis))
    }

    /// Check if a status code should be retried.
    pub fn should_retry_status(&self, status: u16) -> bool {
        self.retry_statuses.contains(&status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::new("token");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.environment, Environment::Paper);
        assert_eq!(config.api_token.expose_secret(), "token");
        assert_eq!(config.market_data_url, "https://data.lemon.markets/v1/");
        assert_eq!(config.trading_url(), "https://paper-trading.lemon.markets/v1/");
    }

    #[test]
    fn test_trading_url_override() {
        let config = ClientConfig::new("token")
            .with_environment(Environment::Money)
            .with_trading_url("http://localhost:8080/v1/");
        assert_eq!(config.trading_url(), "http://localhost:8080/v1/");
    }

    #[test]
    fn test_token_not_in_debug() {
        let config = ClientConfig::new("super-secret");
        assert!(!format!("{config:?}").contains("super-secret"));
    }

    #[test]
    fn test_retry_backoff() {
        let config = RetryConfig::default();
        assert_eq!(config.backoff_for_attempt(0), Duration::from_millis(100));
        assert_eq!(config.backoff_for_attempt(1), Duration::from_millis(200));
        assert_eq!(config.backoff_for_attempt(2), Duration::from_millis(400));
    }

    #[test]
    fn test_retry_backoff_max() {
        let config = RetryConfig::default()
            .with_initial_backoff(Duration::from_secs(10))
            .with_max_backoff(Duration::from_secs(30));

        // 10 * 2^3 = 80, but capped at 30
        assert_eq!(config.backoff_for_attempt(3), Duration::from_secs(30));
    }

    #[test]
    fn test_should_retry_status() {
        let config = RetryConfig::default();
        assert!(config.should_retry_status(429));
        assert!(config.should_retry_status(503));
        assert!(!config.should_retry_status(404));
        assert!(!config.should_retry_status(401));
    }
}
