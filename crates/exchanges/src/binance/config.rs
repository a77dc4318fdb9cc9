use std::fmt;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

pub const TESTNET_BASE_URL: &str = "https://testnet.binancefuture.com";
pub const DEFAULT_RECV_WINDOW: u64 = 5000;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub const API_KEY_VAR: &str = "BINANCE_API_KEY";
pub const API_SECRET_VAR: &str = "BINANCE_API_SECRET";
pub const BASE_URL_VAR: &str = "BINANCE_BASE_URL";
pub const RECV_WINDOW_VAR: &str = "BINANCE_RECV_WINDOW";

/// API 키/시크릿. 시크릿은 로그나 Debug 출력에 노출되지 않는다.
pub struct Credentials {
    api_key: String,
    api_secret: SecretString,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: SecretString::from(api_secret.into()),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub(crate) fn api_secret(&self) -> &str {
        self.api_secret.expose_secret()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key_hint: String = self.api_key.chars().take(4).collect();
        f.debug_struct("Credentials")
            .field("api_key", &format!("{}***", key_hint))
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}

/// 클라이언트 생성 시 명시적으로 넘기는 설정
#[derive(Debug)]
pub struct ClientConfig {
    pub base_url: String,
    pub credentials: Option<Credentials>,
    pub recv_window: u64,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: TESTNET_BASE_URL.to_string(),
            credentials: None,
            recv_window: DEFAULT_RECV_WINDOW,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// 프로세스 환경 변수에서 설정을 읽는다 (`.env`는 호출 측에서 미리 로드)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let credentials = match (non_empty(API_KEY_VAR), non_empty(API_SECRET_VAR)) {
            (Some(key), Some(secret)) => Some(Credentials::new(key.trim(), secret.trim())),
            _ => None,
        };

        let base_url = non_empty(BASE_URL_VAR)
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| TESTNET_BASE_URL.to_string());

        let recv_window = match non_empty(RECV_WINDOW_VAR) {
            Some(raw) => raw.trim().parse::<u64>().unwrap_or_else(|_| {
                tracing::warn!(
                    "Ignoring invalid {}={}, using {}",
                    RECV_WINDOW_VAR,
                    raw,
                    DEFAULT_RECV_WINDOW
                );
                DEFAULT_RECV_WINDOW
            }),
            None => DEFAULT_RECV_WINDOW,
        };

        Self {
            base_url,
            credentials,
            recv_window,
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }
}
