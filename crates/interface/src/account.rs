use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// `/fapi/v2/account` 응답 중 화면에 필요한 부분
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    #[serde(default)]
    pub total_wallet_balance: Decimal,
    #[serde(default)]
    pub total_unrealized_profit: Decimal,
    #[serde(default)]
    pub available_balance: Decimal,
    #[serde(default)]
    pub assets: Vec<AccountAsset>,
    #[serde(default)]
    pub positions: Vec<PositionInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountAsset {
    pub asset: String,
    #[serde(default)]
    pub wallet_balance: Decimal,
    #[serde(default)]
    pub unrealized_profit: Decimal,
    #[serde(default)]
    pub available_balance: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionInfo {
    pub symbol: String,
    #[serde(default)]
    pub position_amt: Decimal,
    #[serde(default)]
    pub entry_price: Decimal,
    #[serde(default)]
    pub unrealized_profit: Decimal,
    #[serde(default)]
    pub leverage: Option<String>,
}

impl PositionInfo {
    pub fn is_open(&self) -> bool {
        !self.position_amt.is_zero()
    }
}

/// `/fapi/v1/time` 응답
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerTime {
    pub server_time: i64,
}
