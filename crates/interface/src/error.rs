use thiserror::Error;

/// 네트워크 호출 전에 잡히는 입력 오류. 규칙 하나당 variant 하나.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Symbol cannot be empty")]
    EmptySymbol,
    #[error("Invalid symbol format: {0}")]
    InvalidSymbol(String),
    #[error("Symbol too short: {symbol} (minimum {min} characters)")]
    SymbolTooShort { symbol: String, min: usize },
    #[error("Side cannot be empty")]
    EmptySide,
    #[error("Invalid side: {0}. Must be one of [BUY, SELL]")]
    InvalidSide(String),
    #[error("Order type cannot be empty")]
    EmptyOrderType,
    #[error("Invalid order type: {0}. Must be one of [MARKET, LIMIT]")]
    InvalidOrderType(String),
    #[error("Invalid quantity: {0}. Must be a number")]
    InvalidQuantity(String),
    #[error("Quantity must be positive: {0}")]
    NonPositiveQuantity(String),
    #[error("Price is required for LIMIT orders")]
    MissingPrice,
    #[error("Invalid price: {0}. Must be a number")]
    InvalidPrice(String),
    #[error("Price must be positive: {0}")]
    NonPositivePrice(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Api,
    Network,
    Config,
}

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// 거래소가 `{code, msg}` 형태로 돌려준 오류. 코드와 메시지는 그대로 전달한다.
    #[error("API error {code}: {msg}")]
    Api { status: u16, code: i64, msg: String },
    #[error("HTTP error: status {status}, response: {body}")]
    Http { status: u16, body: String },
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("API credentials not configured (set BINANCE_API_KEY and BINANCE_API_SECRET)")]
    MissingCredentials,
}

impl ExchangeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExchangeError::Validation(_) => ErrorKind::Validation,
            ExchangeError::Api { .. } | ExchangeError::Http { .. } | ExchangeError::Decode(_) => {
                ErrorKind::Api
            }
            ExchangeError::Network(_) => ErrorKind::Network,
            ExchangeError::MissingCredentials => ErrorKind::Config,
        }
    }

    /// 거래소 오류 코드 (API 오류일 때만)
    pub fn api_code(&self) -> Option<i64> {
        match self {
            ExchangeError::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}
