//! 콘솔 출력용 포맷터

use std::fmt;

use interface::{AccountInfo, Decimal, OrderResult};

use crate::health::{ConnectivityReport, CredentialStatus};

const RULE_WIDTH: usize = 60;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "N/A".to_string())
}

/// 주문 응답. 0인 가격/평균가는 표시하지 않는다.
pub fn format_order_result(result: &OrderResult) -> String {
    OrderBlock(result).to_string()
}

/// 잔고와 열린 포지션. `symbol_filter`가 있으면 해당 문자열을 포함한 포지션만 보여준다.
pub fn format_account(account: &AccountInfo, symbol_filter: Option<&str>) -> String {
    AccountBlock {
        account,
        filter: symbol_filter.map(|s| s.trim().to_uppercase()),
    }
    .to_string()
}

struct OrderBlock<'a>(&'a OrderResult);

impl fmt::Display for OrderBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;

        writeln!(f, "{}", rule())?;
        writeln!(f, "ORDER RESPONSE")?;
        writeln!(f, "{}", rule())?;
        writeln!(f, "Order ID:         {}", result.order_id)?;
        writeln!(f, "Client Order ID:  {}", result.client_order_id)?;
        writeln!(f, "Symbol:           {}", result.symbol)?;
        writeln!(f, "Status:           {}", result.status)?;
        writeln!(f, "Side:             {}", or_na(result.side.as_deref()))?;
        writeln!(f, "Type:             {}", or_na(result.order_type.as_deref()))?;
        writeln!(f, "Quantity:         {}", or_na(result.orig_qty))?;
        writeln!(f, "Executed Qty:     {}", or_na(result.executed_qty))?;

        if let Some(price) = result.price.filter(|p| !p.is_zero()) {
            writeln!(f, "Price:            {}", price)?;
        }
        if let Some(avg_price) = result.avg_price.filter(|p| !p.is_zero()) {
            writeln!(f, "Average Price:    {}", avg_price)?;
        }
        if let Some(update_time) = result.update_time {
            writeln!(f, "Update Time:      {}", format_millis(update_time))?;
        }

        write!(f, "{}", rule())
    }
}

struct AccountBlock<'a> {
    account: &'a AccountInfo,
    filter: Option<String>,
}

impl fmt::Display for AccountBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let account = self.account;

        writeln!(f, "{}", rule())?;
        writeln!(f, "ACCOUNT INFORMATION")?;
        writeln!(f, "{}", rule())?;
        writeln!(f, "Total Wallet Balance:  {}", account.total_wallet_balance)?;
        writeln!(f, "Unrealized PnL:        {}", account.total_unrealized_profit)?;
        writeln!(f, "Available Balance:     {}", account.available_balance)?;

        writeln!(f, "\nBalances:")?;
        for asset in &account.assets {
            if asset.wallet_balance > Decimal::ZERO || self.filter.is_none() {
                writeln!(f, "   {:8}: {:.8}", asset.asset, asset.wallet_balance)?;
            }
        }

        writeln!(f, "\nOpen Positions:")?;
        let open: Vec<_> = account
            .positions
            .iter()
            .filter(|p| p.is_open())
            .filter(|p| self.filter.as_deref().map_or(true, |s| p.symbol.contains(s)))
            .collect();

        if open.is_empty() {
            writeln!(f, "   No open positions")?;
        }
        for position in open {
            writeln!(
                f,
                "   {}: {} @ {} (uPnL {})",
                position.symbol, position.position_amt, position.entry_price, position.unrealized_profit
            )?;
        }

        write!(f, "{}", rule())
    }
}

pub fn format_connectivity(report: &ConnectivityReport) -> String {
    let credentials = match &report.credentials {
        CredentialStatus::Valid => "valid".to_string(),
        CredentialStatus::Rejected(e) => format!("rejected ({})", e),
        CredentialStatus::NotConfigured => {
            "not configured (set BINANCE_API_KEY and BINANCE_API_SECRET)".to_string()
        }
    };

    format!(
        "Server time:   {}\nClock offset:  {} ms\nCredentials:   {}",
        format_millis(report.server_time),
        report.clock_offset_ms,
        credentials
    )
}

fn format_millis(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S%.3f UTC").to_string())
        .unwrap_or_else(|| millis.to_string())
}
