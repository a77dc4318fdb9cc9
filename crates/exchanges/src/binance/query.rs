use reqwest::Method;
use url::form_urlencoded;

use interface::{OrderKind, OrderRequest};

use super::generate_signature;

/// 삽입 순서를 그대로 유지하는 쿼리 파라미터 목록.
/// 서명은 인코딩된 문자열 그대로에 대해 계산되므로 순서가 바뀌면 안 된다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &str, value: impl ToString) -> &mut Self {
        self.pairs.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.push(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// `application/x-www-form-urlencoded` 인코딩
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.pairs {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }
}

/// 주문 파라미터: symbol, side, type, quantity, (price, timeInForce)
pub fn order_params(order: &OrderRequest) -> QueryParams {
    let mut params = QueryParams::new();
    params
        .push("symbol", &order.symbol)
        .push("side", order.side.as_str())
        .push("type", order.order_type().as_str())
        .push("quantity", order.quantity.normalize());

    if let OrderKind::Limit {
        price,
        time_in_force,
    } = order.kind
    {
        params
            .push("price", price.normalize())
            .push("timeInForce", time_in_force.as_str());
    }

    params
}

/// 서명까지 끝난 단건 요청
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub method: Method,
    pub endpoint: &'static str,
    /// 서명 대상이 된 쿼리 문자열 (timestamp, recvWindow 포함)
    pub query: String,
    pub signature: String,
}

impl SignedRequest {
    pub fn sign(
        method: Method,
        endpoint: &'static str,
        mut params: QueryParams,
        timestamp: i64,
        recv_window: u64,
        api_secret: &str,
    ) -> Self {
        params
            .push("timestamp", timestamp)
            .push("recvWindow", recv_window);

        let query = params.encode();
        let signature = generate_signature(&query, api_secret);

        Self {
            method,
            endpoint,
            query,
            signature,
        }
    }

    /// 실제로 전송되는 쿼리: `<query>&signature=<hex>`
    pub fn signed_query(&self) -> String {
        format!("{}&signature={}", self.query, self.signature)
    }
}
