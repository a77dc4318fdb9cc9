use std::str::FromStr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use exchanges::{ClientConfig, FuturesExchange};
use futures_bot::{
    check_connectivity, place_order_with_config, prepare_order, CredentialStatus, OrderManager,
};
use interface::{
    AccountInfo, Decimal, ErrorKind, ExchangeError, OrderRequest, OrderResult, RawOrderInput,
    ServerTime, ValidationError,
};

/// 받은 요청을 기록하고 미리 정한 응답을 돌려주는 가짜 거래소
#[derive(Default)]
struct FakeExchange {
    calls: Mutex<Vec<String>>,
    placed: Mutex<Vec<OrderRequest>>,
    order_error: Option<(u16, i64, &'static str)>,
    credentials_missing: bool,
}

impl FakeExchange {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }
}

fn result_for(order: &OrderRequest) -> OrderResult {
    let status = match order.price() {
        Some(_) => "NEW",
        None => "FILLED",
    };
    OrderResult {
        order_id: 1001,
        client_order_id: "fake".to_string(),
        symbol: order.symbol.clone(),
        status: status.to_string(),
        side: Some(order.side.to_string()),
        order_type: Some(order.order_type().to_string()),
        orig_qty: Some(order.quantity),
        executed_qty: Some(order.quantity),
        price: order.price(),
        avg_price: None,
        time_in_force: order.price().map(|_| "GTC".to_string()),
        update_time: Some(1_700_000_000_000),
    }
}

#[async_trait]
impl FuturesExchange for FakeExchange {
    async fn ping(&self) -> Result<(), ExchangeError> {
        self.record("ping");
        Ok(())
    }

    async fn server_time(&self) -> Result<ServerTime, ExchangeError> {
        self.record("time");
        Ok(ServerTime {
            server_time: 1_700_000_000_000,
        })
    }

    async fn account(&self) -> Result<AccountInfo, ExchangeError> {
        self.record("account");
        if self.credentials_missing {
            return Err(ExchangeError::MissingCredentials);
        }
        Ok(AccountInfo::default())
    }

    async fn place_order(&self, order: &OrderRequest) -> Result<OrderResult, ExchangeError> {
        self.record("place_order");
        self.placed.lock().unwrap().push(order.clone());

        if let Some((status, code, msg)) = self.order_error {
            return Err(ExchangeError::Api {
                status,
                code,
                msg: msg.to_string(),
            });
        }
        Ok(result_for(order))
    }

    async fn get_order(&self, symbol: &str, order_id: u64) -> Result<OrderResult, ExchangeError> {
        self.record(&format!("get_order {} {}", symbol, order_id));
        let mut result = result_for(&OrderRequest::market(symbol, interface::Side::Buy, Decimal::ONE));
        result.order_id = order_id;
        Ok(result)
    }

    async fn cancel_order(
        &self,
        symbol: &str,
        order_id: u64,
    ) -> Result<OrderResult, ExchangeError> {
        self.record(&format!("cancel_order {} {}", symbol, order_id));
        let mut result = result_for(&OrderRequest::market(symbol, interface::Side::Buy, Decimal::ONE));
        result.order_id = order_id;
        result.status = "CANCELED".to_string();
        Ok(result)
    }
}

fn raw(symbol: &str, side: &str, order_type: &str, quantity: &str, price: Option<&str>) -> RawOrderInput {
    RawOrderInput {
        symbol: symbol.to_string(),
        side: side.to_string(),
        order_type: order_type.to_string(),
        quantity: quantity.to_string(),
        price: price.map(str::to_string),
    }
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[tokio::test]
async fn short_symbol_never_reaches_the_exchange() {
    let exchange = Arc::new(FakeExchange::default());
    let manager = OrderManager::new(exchange.clone());

    let err = manager
        .place_order(&raw("BTC", "BUY", "MARKET", "0.001", None))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(matches!(
        err,
        ExchangeError::Validation(ValidationError::SymbolTooShort { .. })
    ));
    assert!(exchange.calls().is_empty());
}

#[tokio::test]
async fn limit_without_valid_price_never_reaches_the_exchange() {
    let exchange = Arc::new(FakeExchange::default());
    let manager = OrderManager::new(exchange.clone());

    for price in [None, Some("0"), Some("-10"), Some("")] {
        let err = manager
            .place_order(&raw("ETHUSDT", "SELL", "LIMIT", "0.01", price))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    assert!(exchange.calls().is_empty());
}

#[tokio::test]
async fn market_order_drops_supplied_price() {
    let exchange = Arc::new(FakeExchange::default());
    let manager = OrderManager::new(exchange.clone());

    let result = manager
        .place_order(&raw("btcusdt", "buy", "market", "0.001", Some("99999")))
        .await
        .unwrap();

    assert_eq!(result.status, "FILLED");
    assert_eq!(exchange.calls(), vec!["place_order"]);

    let placed = exchange.placed.lock().unwrap();
    assert_eq!(placed.len(), 1);
    assert_eq!(placed[0].symbol, "BTCUSDT");
    assert_eq!(placed[0].quantity, dec("0.001"));
    assert_eq!(placed[0].price(), None);
}

#[tokio::test]
async fn limit_order_is_placed_once_with_price() {
    let exchange = Arc::new(FakeExchange::default());
    let manager = OrderManager::new(exchange.clone());

    let result = manager
        .place_order(&raw("ETHUSDT", "SELL", "LIMIT", "0.01", Some("2500")))
        .await
        .unwrap();

    assert_eq!(result.status, "NEW");
    let placed = exchange.placed.lock().unwrap();
    assert_eq!(placed.len(), 1);
    assert_eq!(placed[0].price(), Some(dec("2500")));
}

#[tokio::test]
async fn api_error_is_returned_verbatim_after_single_attempt() {
    let exchange = Arc::new(FakeExchange {
        order_error: Some((400, -2019, "Margin is insufficient")),
        ..FakeExchange::default()
    });
    let manager = OrderManager::new(exchange.clone());

    let err = manager
        .place_order(&raw("BTCUSDT", "BUY", "MARKET", "0.001", None))
        .await
        .unwrap_err();

    assert_eq!(err.api_code(), Some(-2019));
    assert_eq!(err.to_string(), "API error -2019: Margin is insufficient");
    assert_eq!(exchange.calls(), vec!["place_order"]);
}

#[tokio::test]
async fn status_and_cancel_normalize_symbol() {
    let exchange = Arc::new(FakeExchange::default());
    let manager = OrderManager::new(exchange.clone());

    let status = manager.order_status("ethusdt", 7).await.unwrap();
    let cancelled = manager.cancel_order("ethusdt", 7).await.unwrap();

    assert_eq!(status.order_id, 7);
    assert_eq!(cancelled.status, "CANCELED");
    assert_eq!(
        exchange.calls(),
        vec!["get_order ETHUSDT 7", "cancel_order ETHUSDT 7"]
    );

    let err = manager.cancel_order("ETH", 7).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(exchange.calls().len(), 2);
}

#[tokio::test]
async fn connectivity_check_reports_credentials() {
    let exchange = FakeExchange::default();
    let report = check_connectivity(&exchange).await.unwrap();

    assert!(report.is_healthy());
    assert_eq!(report.server_time, 1_700_000_000_000);
    assert_eq!(exchange.calls(), vec!["ping", "time", "account"]);
}

#[tokio::test]
async fn connectivity_check_without_credentials_is_not_healthy() {
    let exchange = FakeExchange {
        credentials_missing: true,
        ..FakeExchange::default()
    };
    let report = check_connectivity(&exchange).await.unwrap();

    assert!(matches!(report.credentials, CredentialStatus::NotConfigured));
    assert!(!report.is_healthy());
}

fn unreachable_config() -> ClientConfig {
    ClientConfig::default().with_base_url("http://127.0.0.1:1")
}

#[tokio::test]
async fn invalid_input_is_reported_before_missing_credentials() {
    let config = unreachable_config();
    assert!(!config.has_credentials());

    let err = place_order_with_config(&raw("BTC", "BUY", "MARKET", "0.001", None), config)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(matches!(
        err,
        ExchangeError::Validation(ValidationError::SymbolTooShort { .. })
    ));
}

#[tokio::test]
async fn valid_input_without_credentials_is_a_config_error() {
    let err = place_order_with_config(
        &raw("BTCUSDT", "BUY", "MARKET", "0.001", None),
        unreachable_config(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ExchangeError::MissingCredentials));
    assert_eq!(err.kind(), ErrorKind::Config);
}

#[test]
fn prepare_order_needs_no_exchange() {
    let order = prepare_order(&raw("ethusdt", "sell", "limit", "0.0100", Some("2500.0"))).unwrap();

    assert_eq!(order.symbol, "ETHUSDT");
    assert_eq!(order.price(), Some(dec("2500")));

    let err = prepare_order(&raw("ETHUSDT", "SELL", "LIMIT", "0.01", None)).unwrap_err();
    assert!(matches!(
        err,
        ExchangeError::Validation(ValidationError::MissingPrice)
    ));
}
