use async_trait::async_trait;

use interface::{AccountInfo, ExchangeError, OrderRequest, OrderResult, ServerTime};

pub mod binance;

/// 선물 거래소에 대한 단건 요청 인터페이스.
/// 각 호출은 정확히 한 번의 HTTP 요청을 보내며 재시도하지 않는다.
#[async_trait]
pub trait FuturesExchange: Send + Sync {
    /// 서명 없는 연결 확인
    async fn ping(&self) -> Result<(), ExchangeError>;

    async fn server_time(&self) -> Result<ServerTime, ExchangeError>;

    async fn account(&self) -> Result<AccountInfo, ExchangeError>;

    async fn place_order(&self, order: &OrderRequest) -> Result<OrderResult, ExchangeError>;

    async fn get_order(&self, symbol: &str, order_id: u64) -> Result<OrderResult, ExchangeError>;

    async fn cancel_order(&self, symbol: &str, order_id: u64)
        -> Result<OrderResult, ExchangeError>;
}

// Convenience re-exports
pub use binance::{BinanceFuturesClient, ClientConfig, Credentials};
