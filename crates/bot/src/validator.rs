//! 주문 입력 검증
//!
//! 규칙은 항상 같은 순서(symbol → side → type → quantity → price)로 검사하므로
//! 같은 입력에는 항상 같은 오류가 나온다. 네트워크/파일 접근이나 로깅은 하지 않는다.

use std::str::FromStr;

use interface::{Decimal, OrderRequest, OrderType, RawOrderInput, Side, ValidationError};

/// BTCUSDT, ETHUSDT 같은 선물 심볼의 최소 길이
pub const MIN_SYMBOL_LEN: usize = 6;

pub fn validate_symbol(symbol: &str) -> Result<String, ValidationError> {
    let symbol = symbol.trim().to_uppercase();

    if symbol.is_empty() {
        return Err(ValidationError::EmptySymbol);
    }
    if !symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::InvalidSymbol(symbol));
    }
    if symbol.len() < MIN_SYMBOL_LEN {
        return Err(ValidationError::SymbolTooShort {
            symbol,
            min: MIN_SYMBOL_LEN,
        });
    }

    Ok(symbol)
}

pub fn validate_side(side: &str) -> Result<Side, ValidationError> {
    side.parse()
}

pub fn validate_order_type(order_type: &str) -> Result<OrderType, ValidationError> {
    order_type.parse()
}

pub fn validate_quantity(quantity: &str) -> Result<Decimal, ValidationError> {
    let raw = quantity.trim();
    let qty = Decimal::from_str(raw)
        .map_err(|_| ValidationError::InvalidQuantity(raw.to_string()))?;

    if qty <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveQuantity(raw.to_string()));
    }

    Ok(qty.normalize())
}

/// LIMIT이면 양수 가격 필수, MARKET이면 입력값을 보지 않고 `None`
pub fn validate_price(
    price: Option<&str>,
    order_type: OrderType,
) -> Result<Option<Decimal>, ValidationError> {
    if order_type == OrderType::Market {
        return Ok(None);
    }

    let raw = match price.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Err(ValidationError::MissingPrice),
    };

    let price = Decimal::from_str(raw).map_err(|_| ValidationError::InvalidPrice(raw.to_string()))?;

    if price <= Decimal::ZERO {
        return Err(ValidationError::NonPositivePrice(raw.to_string()));
    }

    Ok(Some(price.normalize()))
}

/// 모든 규칙을 순서대로 적용해 정규화된 주문을 만든다.
pub fn validate_order(raw: &RawOrderInput) -> Result<OrderRequest, ValidationError> {
    let symbol = validate_symbol(&raw.symbol)?;
    let side = validate_side(&raw.side)?;
    let order_type = validate_order_type(&raw.order_type)?;
    let quantity = validate_quantity(&raw.quantity)?;

    let order = match validate_price(raw.price.as_deref(), order_type)? {
        Some(price) => OrderRequest::limit(symbol, side, quantity, price),
        None => OrderRequest::market(symbol, side, quantity),
    };

    Ok(order)
}
