use std::sync::Arc;

use tracing::{error, info, warn};

use exchanges::{BinanceFuturesClient, ClientConfig, FuturesExchange};
use interface::{ExchangeError, OrderRequest, OrderResult, OrderType, RawOrderInput};

use crate::validator::{validate_order, validate_symbol};

/// 검증과 거래소 호출을 묶는 주문 처리기.
/// 검증에 실패하면 거래소는 호출되지 않는다.
pub struct OrderManager {
    exchange: Arc<dyn FuturesExchange>,
}

impl OrderManager {
    pub fn new(exchange: Arc<dyn FuturesExchange>) -> Self {
        Self { exchange }
    }

    pub async fn place_order(&self, raw: &RawOrderInput) -> Result<OrderResult, ExchangeError> {
        let order = prepare_order(raw)?;
        self.submit(&order).await
    }

    /// 이미 검증된 주문을 거래소에 한 번 보낸다.
    pub async fn submit(&self, order: &OrderRequest) -> Result<OrderResult, ExchangeError> {
        match self.exchange.place_order(order).await {
            Ok(result) => {
                info!(
                    "Order placed successfully. Order ID: {}, status: {}",
                    result.order_id, result.status
                );
                Ok(result)
            }
            Err(e) => {
                error!("Failed to place order [{}]: {}", order, e);
                Err(e)
            }
        }
    }

    pub async fn order_status(
        &self,
        symbol: &str,
        order_id: u64,
    ) -> Result<OrderResult, ExchangeError> {
        let symbol = validate_symbol(symbol)?;
        info!("Querying order status for Order ID: {} ({})", order_id, symbol);

        self.exchange
            .get_order(&symbol, order_id)
            .await
            .inspect_err(|e| error!("Failed to get order status for {} {}: {}", symbol, order_id, e))
    }

    pub async fn cancel_order(
        &self,
        symbol: &str,
        order_id: u64,
    ) -> Result<OrderResult, ExchangeError> {
        let symbol = validate_symbol(symbol)?;
        info!("Cancelling order {} for {}", order_id, symbol);

        let result = self
            .exchange
            .cancel_order(&symbol, order_id)
            .await
            .inspect_err(|e| error!("Failed to cancel order {} {}: {}", symbol, order_id, e))?;

        info!("Order {} cancelled, status: {}", result.order_id, result.status);
        Ok(result)
    }
}

/// 입력을 검증하고 요약을 남긴다. 네트워크나 자격 증명은 필요 없다.
pub fn prepare_order(raw: &RawOrderInput) -> Result<OrderRequest, ExchangeError> {
    info!(
        "Initiating order placement: {} {} {} {}",
        raw.order_type, raw.side, raw.quantity, raw.symbol
    );

    let order = validate_order(raw).map_err(|e| {
        error!("Validation failed: {}", e);
        ExchangeError::from(e)
    })?;

    if order.order_type() == OrderType::Market {
        if let Some(price) = raw.price.as_deref().filter(|p| !p.trim().is_empty()) {
            warn!("Ignoring price {} for MARKET order", price.trim());
        }
    }

    log_order_summary(&order);
    Ok(order)
}

/// 설정으로 주문 한 건을 처리한다.
/// 검증이 먼저 끝나야 자격 증명을 보고 클라이언트를 만든다.
pub async fn place_order_with_config(
    raw: &RawOrderInput,
    config: ClientConfig,
) -> Result<OrderResult, ExchangeError> {
    let order = prepare_order(raw)?;

    if !config.has_credentials() {
        error!("Cannot place order without API credentials");
        return Err(ExchangeError::MissingCredentials);
    }

    info!("Using Binance Futures endpoint {}", config.base_url);
    let client = BinanceFuturesClient::new(config)?;
    OrderManager::new(Arc::new(client)).submit(&order).await
}

fn log_order_summary(order: &OrderRequest) {
    info!("ORDER REQUEST SUMMARY");
    info!("Symbol:   {}", order.symbol);
    info!("Side:     {}", order.side);
    info!("Type:     {}", order.order_type());
    info!("Quantity: {}", order.quantity);
    match order.price() {
        Some(price) => info!("Price:    {}", price),
        None => info!("Price:    MARKET (best available)"),
    }
}
