use tracing::{info, warn};

use exchanges::binance::get_timestamp;
use exchanges::FuturesExchange;
use interface::ExchangeError;

#[derive(Debug)]
pub enum CredentialStatus {
    Valid,
    /// 서명 요청이 실패함 (잘못된 키, 권한, 시간 오차 등)
    Rejected(ExchangeError),
    NotConfigured,
}

#[derive(Debug)]
pub struct ConnectivityReport {
    pub server_time: i64,
    /// 서버 시각 - 로컬 시각 (ms)
    pub clock_offset_ms: i64,
    pub credentials: CredentialStatus,
}

impl ConnectivityReport {
    pub fn is_healthy(&self) -> bool {
        matches!(self.credentials, CredentialStatus::Valid)
    }
}

/// 1) 서명 없는 ping/time 으로 도달 가능 여부 확인
/// 2) 서명된 account 조회로 자격 증명 확인
///
/// 도달 불가면 `Err`, 자격 증명 문제는 리포트에 담는다.
pub async fn check_connectivity(
    exchange: &dyn FuturesExchange,
) -> Result<ConnectivityReport, ExchangeError> {
    exchange.ping().await?;

    let local_time = get_timestamp();
    let server_time = exchange.server_time().await?.server_time;
    let clock_offset_ms = server_time - local_time;
    info!(
        "Exchange reachable. Server time: {}, clock offset: {} ms",
        server_time, clock_offset_ms
    );

    let credentials = match exchange.account().await {
        Ok(_) => {
            info!("API credentials accepted");
            CredentialStatus::Valid
        }
        Err(ExchangeError::MissingCredentials) => {
            warn!("API credentials not configured; skipped signed check");
            CredentialStatus::NotConfigured
        }
        Err(e) => {
            warn!("Signed account check failed: {}", e);
            CredentialStatus::Rejected(e)
        }
    };

    Ok(ConnectivityReport {
        server_time,
        clock_offset_ms,
        credentials,
    })
}
