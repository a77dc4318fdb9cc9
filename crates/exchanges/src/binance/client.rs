use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use interface::{
    AccountInfo, ExchangeError, OrderRequest, OrderResult, RequestReporter, ServerTime,
    TracingReporter,
};

use super::config::ClientConfig;
use super::query::{order_params, QueryParams, SignedRequest};
use super::{
    get_timestamp, ACCOUNT_ENDPOINT, API_KEY_HEADER, ORDER_ENDPOINT, PING_ENDPOINT, TIME_ENDPOINT,
};
use crate::FuturesExchange;

/// 오류 응답 본문을 로그/에러에 담을 때 최대 길이
const BODY_PREVIEW_CHARS: usize = 200;

/// 거래소가 돌려주는 오류 본문 `{"code": -2019, "msg": "..."}`
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: i64,
    msg: String,
}

/// Binance Futures REST 클라이언트. 호출당 요청 한 번, 재시도 없음.
pub struct BinanceFuturesClient {
    http: reqwest::Client,
    config: ClientConfig,
    reporter: Arc<dyn RequestReporter>,
    clock: fn() -> i64,
}

impl BinanceFuturesClient {
    pub fn new(config: ClientConfig) -> Result<Self, ExchangeError> {
        Self::with_reporter(config, Arc::new(TracingReporter))
    }

    pub fn with_reporter(
        config: ClientConfig,
        reporter: Arc<dyn RequestReporter>,
    ) -> Result<Self, ExchangeError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| ExchangeError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            config,
            reporter,
            clock: get_timestamp,
        })
    }

    /// timestamp 생성 함수 교체 (테스트에서 고정 시각 사용)
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn send_public<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        params: QueryParams,
    ) -> Result<T, ExchangeError> {
        let query = params.encode();
        self.reporter.request(Method::GET.as_str(), endpoint, &query);

        let mut url = format!("{}{}", self.config.base_url, endpoint);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }

        self.execute(endpoint, self.http.get(&url)).await
    }

    async fn send_signed<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &'static str,
        params: QueryParams,
    ) -> Result<T, ExchangeError> {
        let credentials = match self.config.credentials.as_ref() {
            Some(credentials) => credentials,
            None => {
                let e = ExchangeError::MissingCredentials;
                self.reporter.failure(endpoint, &e);
                return Err(e);
            }
        };

        let signed = SignedRequest::sign(
            method,
            endpoint,
            params,
            (self.clock)(),
            self.config.recv_window,
            credentials.api_secret(),
        );

        self.reporter
            .request(signed.method.as_str(), endpoint, &signed.query);

        let url = format!(
            "{}{}?{}",
            self.config.base_url,
            endpoint,
            signed.signed_query()
        );

        let request = self
            .http
            .request(signed.method.clone(), &url)
            .header(API_KEY_HEADER, credentials.api_key())
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            );

        self.execute(endpoint, request).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ExchangeError> {
        let result: Result<T, ExchangeError> = async {
            let response = request
                .send()
                .await
                .map_err(|e| ExchangeError::Network(describe_transport_error(&e)))?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| ExchangeError::Network(describe_transport_error(&e)))?;

            self.reporter.response(endpoint, status.as_u16(), &body);

            parse_response(status, &body)
        }
        .await;

        if let Err(e) = &result {
            self.reporter.failure(endpoint, e);
        }

        result
    }
}

#[async_trait]
impl FuturesExchange for BinanceFuturesClient {
    async fn ping(&self) -> Result<(), ExchangeError> {
        let _: serde_json::Value = self.send_public(PING_ENDPOINT, QueryParams::new()).await?;
        Ok(())
    }

    async fn server_time(&self) -> Result<ServerTime, ExchangeError> {
        self.send_public(TIME_ENDPOINT, QueryParams::new()).await
    }

    async fn account(&self) -> Result<AccountInfo, ExchangeError> {
        self.send_signed(Method::GET, ACCOUNT_ENDPOINT, QueryParams::new())
            .await
    }

    async fn place_order(&self, order: &OrderRequest) -> Result<OrderResult, ExchangeError> {
        self.send_signed(Method::POST, ORDER_ENDPOINT, order_params(order))
            .await
    }

    async fn get_order(&self, symbol: &str, order_id: u64) -> Result<OrderResult, ExchangeError> {
        let params = QueryParams::new()
            .with("symbol", symbol)
            .with("orderId", order_id);
        self.send_signed(Method::GET, ORDER_ENDPOINT, params).await
    }

    async fn cancel_order(
        &self,
        symbol: &str,
        order_id: u64,
    ) -> Result<OrderResult, ExchangeError> {
        let params = QueryParams::new()
            .with("symbol", symbol)
            .with("orderId", order_id);
        self.send_signed(Method::DELETE, ORDER_ENDPOINT, params)
            .await
    }
}

/// 상태 코드와 본문을 결과 또는 오류로 변환한다.
///
/// - 본문이 `{code, msg}`이고 상태가 실패이거나 code가 음수면 `Api`
/// - 그 외 실패 상태는 `Http` (본문 앞부분만 보관)
/// - 성공 상태에서 파싱 실패는 `Decode`
pub(crate) fn parse_response<T: DeserializeOwned>(
    status: StatusCode,
    body: &str,
) -> Result<T, ExchangeError> {
    if let Ok(api_error) = serde_json::from_str::<ApiErrorBody>(body) {
        if !status.is_success() || api_error.code < 0 {
            return Err(ExchangeError::Api {
                status: status.as_u16(),
                code: api_error.code,
                msg: api_error.msg,
            });
        }
    }

    if !status.is_success() {
        return Err(ExchangeError::Http {
            status: status.as_u16(),
            body: preview(body),
        });
    }

    serde_json::from_str(body).map_err(|e| {
        ExchangeError::Decode(format!("{}, response: {}", e, preview(body)))
    })
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

fn describe_transport_error(e: &reqwest::Error) -> String {
    let kind = if e.is_timeout() {
        "timeout"
    } else if e.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };

    match std::error::Error::source(e) {
        Some(source) => format!("{}: {} ({})", kind, e, source),
        None => format!("{}: {}", kind, e),
    }
}
