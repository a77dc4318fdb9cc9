//! Binance USDⓈ-M Futures REST 클라이언트
//!
//! - `config`: 접속 정보와 API 자격 증명
//! - `query`: 정렬이 고정된 쿼리 문자열 및 서명된 요청
//! - `client`: HTTP 전송과 응답/오류 매핑

pub mod client;
pub mod config;
pub mod query;

use hmac::{Hmac, Mac};
use sha2::Sha256;

pub use client::BinanceFuturesClient;
pub use config::{ClientConfig, Credentials, DEFAULT_RECV_WINDOW, TESTNET_BASE_URL};
pub use query::{order_params, QueryParams, SignedRequest};

pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";

pub const PING_ENDPOINT: &str = "/fapi/v1/ping";
pub const TIME_ENDPOINT: &str = "/fapi/v1/time";
pub const ORDER_ENDPOINT: &str = "/fapi/v1/order";
pub const ACCOUNT_ENDPOINT: &str = "/fapi/v2/account";

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256(secret, query) 의 hex 문자열
pub fn generate_signature(query_string: &str, api_secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(api_secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(query_string.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// 현재 epoch 밀리초
pub fn get_timestamp() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_matches_binance_documentation_example() {
        let secret = "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j";
        let query = "symbol=LTCBTC&side=BUY&type=LIMIT&timeInForce=GTC&quantity=1&price=0.1&recvWindow=5000&timestamp=1499827319559";

        assert_eq!(
            generate_signature(query, secret),
            "c8db56825ae71d6d79447849e617115f4a920fa2acdcab2b053c4b2838bd6b71"
        );
    }

    #[test]
    fn signature_matches_rfc4231_vector() {
        assert_eq!(
            generate_signature("what do ya want for nothing?", "Jefe"),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn timestamp_is_in_milliseconds() {
        // 2020-01-01 이후, 밀리초 단위
        assert!(get_timestamp() > 1_577_836_800_000);
    }
}
