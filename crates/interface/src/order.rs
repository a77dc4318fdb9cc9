use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// 주문 방향
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 대소문자 구분 없이 파싱 (`buy` -> `BUY`)
impl FromStr for Side {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        match normalized.as_str() {
            "" => Err(ValidationError::EmptySide),
            "BUY" => Ok(Side::Buy),
            "SELL" => Ok(Side::Sell),
            _ => Err(ValidationError::InvalidSide(normalized)),
        }
    }
}

/// 주문 타입. 이 클라이언트는 MARKET / LIMIT만 지원한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    Market,
    Limit,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        match normalized.as_str() {
            "" => Err(ValidationError::EmptyOrderType),
            "MARKET" => Ok(OrderType::Market),
            "LIMIT" => Ok(OrderType::Limit),
            _ => Err(ValidationError::InvalidOrderType(normalized)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Good-Til-Cancelled
    #[default]
    #[serde(rename = "GTC")]
    Gtc,
}

impl TimeInForce {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeInForce::Gtc => "GTC",
        }
    }
}

/// CLI에서 들어온 검증 전 주문 입력
#[derive(Debug, Clone, Default)]
pub struct RawOrderInput {
    pub symbol: String,
    pub side: String,
    pub order_type: String,
    pub quantity: String,
    pub price: Option<String>,
}

/// 주문 타입별 부가 정보. MARKET 주문은 가격을 가질 수 없다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderKind {
    Market,
    Limit {
        price: Decimal,
        time_in_force: TimeInForce,
    },
}

/// 검증이 끝난 주문 요청
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: Side,
    pub quantity: Decimal,
    pub kind: OrderKind,
}

impl OrderRequest {
    pub fn market(symbol: impl Into<String>, side: Side, quantity: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            quantity,
            kind: OrderKind::Market,
        }
    }

    pub fn limit(symbol: impl Into<String>, side: Side, quantity: Decimal, price: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            quantity,
            kind: OrderKind::Limit {
                price,
                time_in_force: TimeInForce::Gtc,
            },
        }
    }

    pub fn order_type(&self) -> OrderType {
        match self.kind {
            OrderKind::Market => OrderType::Market,
            OrderKind::Limit { .. } => OrderType::Limit,
        }
    }

    pub fn price(&self) -> Option<Decimal> {
        match self.kind {
            OrderKind::Market => None,
            OrderKind::Limit { price, .. } => Some(price),
        }
    }
}

impl fmt::Display for OrderRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.order_type(),
            self.side,
            self.quantity,
            self.symbol
        )?;
        if let Some(price) = self.price() {
            write!(f, " @ {}", price)?;
        }
        Ok(())
    }
}

/// `/fapi/v1/order` 응답. 거래소가 준 값을 해석 없이 그대로 담는다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResult {
    pub order_id: u64,
    #[serde(default)]
    pub client_order_id: String,
    pub symbol: String,
    pub status: String,
    #[serde(default)]
    pub side: Option<String>,
    #[serde(default, rename = "type")]
    pub order_type: Option<String>,
    #[serde(default)]
    pub orig_qty: Option<Decimal>,
    #[serde(default)]
    pub executed_qty: Option<Decimal>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub avg_price: Option<Decimal>,
    #[serde(default)]
    pub time_in_force: Option<String>,
    #[serde(default)]
    pub update_time: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_parses_case_insensitively() {
        assert_eq!("buy".parse::<Side>().unwrap(), Side::Buy);
        assert_eq!(" Sell ".parse::<Side>().unwrap(), Side::Sell);
        assert!(matches!(
            "hold".parse::<Side>(),
            Err(ValidationError::InvalidSide(s)) if s == "HOLD"
        ));
        assert!(matches!("".parse::<Side>(), Err(ValidationError::EmptySide)));
    }

    #[test]
    fn order_type_rejects_unsupported_types() {
        assert_eq!("limit".parse::<OrderType>().unwrap(), OrderType::Limit);
        assert!(matches!(
            "stop".parse::<OrderType>(),
            Err(ValidationError::InvalidOrderType(_))
        ));
    }

    #[test]
    fn market_order_has_no_price() {
        let order = OrderRequest::market("BTCUSDT", Side::Buy, Decimal::new(1, 3));
        assert_eq!(order.order_type(), OrderType::Market);
        assert_eq!(order.price(), None);
        assert_eq!(order.to_string(), "MARKET BUY 0.001 BTCUSDT");
    }

    #[test]
    fn limit_order_defaults_to_gtc() {
        let order = OrderRequest::limit("ETHUSDT", Side::Sell, Decimal::new(1, 2), Decimal::new(2500, 0));
        assert_eq!(
            order.kind,
            OrderKind::Limit {
                price: Decimal::new(2500, 0),
                time_in_force: TimeInForce::Gtc
            }
        );
        assert_eq!(order.to_string(), "LIMIT SELL 0.01 ETHUSDT @ 2500");
    }

    #[test]
    fn order_result_maps_exchange_json() {
        let body = r#"{
            "orderId": 4611875134427365377,
            "symbol": "BTCUSDT",
            "status": "FILLED",
            "clientOrderId": "testOrder",
            "price": "0",
            "avgPrice": "43012.10",
            "origQty": "0.001",
            "executedQty": "0.001",
            "cumQuote": "43.01210",
            "timeInForce": "GTC",
            "type": "MARKET",
            "reduceOnly": false,
            "side": "BUY",
            "updateTime": 1700000000000
        }"#;

        let result: OrderResult = serde_json::from_str(body).unwrap();
        assert_eq!(result.order_id, 4611875134427365377);
        assert_eq!(result.status, "FILLED");
        assert_eq!(result.order_type.as_deref(), Some("MARKET"));
        assert_eq!(result.executed_qty, Some(Decimal::new(1, 3)));
        assert_eq!(result.avg_price, Some(Decimal::new(4301210, 2)));
        assert_eq!(result.update_time, Some(1700000000000));
    }
}
