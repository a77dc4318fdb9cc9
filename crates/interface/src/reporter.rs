use crate::error::ExchangeError;

/// 클라이언트가 요청/응답을 보고하는 통로.
/// 시크릿은 절대 넘기지 않는다: `query`는 서명 전 파라미터 문자열이다.
pub trait RequestReporter: Send + Sync {
    fn request(&self, method: &str, endpoint: &str, query: &str);

    fn response(&self, endpoint: &str, status: u16, body: &str);

    fn failure(&self, endpoint: &str, error: &ExchangeError);
}

/// `tracing`으로 내보내는 기본 구현
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl RequestReporter for TracingReporter {
    fn request(&self, method: &str, endpoint: &str, query: &str) {
        if query.is_empty() {
            tracing::info!(target: "binance", "{} {}", method, endpoint);
        } else {
            tracing::info!(target: "binance", "{} {} params: {}", method, endpoint, query);
        }
    }

    fn response(&self, endpoint: &str, status: u16, body: &str) {
        tracing::info!(target: "binance", "{} response (status {}): {}", endpoint, status, body);
    }

    fn failure(&self, endpoint: &str, error: &ExchangeError) {
        tracing::error!(target: "binance", "{} failed: {}", endpoint, error);
    }
}
