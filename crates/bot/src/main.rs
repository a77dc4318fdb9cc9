use std::path::Path;
use std::sync::Arc;

use color_eyre::eyre;
use structopt::StructOpt;
use tracing::{error, info, warn};

use exchanges::{BinanceFuturesClient, ClientConfig, FuturesExchange};
use futures_bot::display::{format_account, format_connectivity, format_order_result};
use futures_bot::logger::{self, LogLevel, LOG_DIR};
use futures_bot::{check_connectivity, place_order_with_config, OrderManager};
use interface::{ErrorKind, ExchangeError, RawOrderInput};

#[derive(Debug, StructOpt)]
#[structopt(
    name = "futures-bot",
    about = "Place MARKET and LIMIT orders on Binance Futures Testnet"
)]
struct Opt {
    /// Log level: DEBUG, INFO, WARNING, ERROR
    #[structopt(long, default_value = "INFO", global = true)]
    log_level: LogLevel,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Place an order
    Order {
        /// Trading pair (e.g. BTCUSDT)
        #[structopt(short, long)]
        symbol: String,
        /// BUY or SELL
        #[structopt(short = "d", long)]
        side: String,
        /// MARKET or LIMIT
        #[structopt(short = "t", long = "type")]
        order_type: String,
        /// Order quantity
        #[structopt(short, long)]
        quantity: String,
        /// Order price (required for LIMIT orders)
        #[structopt(short, long)]
        price: Option<String>,
    },
    /// Check connectivity and API credentials
    Test,
    /// Show balances and open positions
    Account {
        /// Only show positions containing this symbol
        #[structopt(short, long)]
        symbol: Option<String>,
    },
    /// Query an existing order
    Status {
        #[structopt(short, long)]
        symbol: String,
        #[structopt(long)]
        order_id: u64,
    },
    /// Cancel an open order
    Cancel {
        #[structopt(short, long)]
        symbol: String,
        #[structopt(long)]
        order_id: u64,
    },
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // init error reporting
    color_eyre::install()?;

    // .env가 있으면 환경 변수로 로드
    dotenv::dotenv().ok();

    let opt = Opt::from_args();

    // guards는 main이 끝날 때까지 유지해야 로그가 flush된다
    let guards = logger::init_tracing(opt.log_level, Path::new(LOG_DIR))?;
    info!("Logging initialized. Log file: {}", guards.log_file().display());
    info!("Log level: {}", opt.log_level);

    let result = match opt.cmd {
        Command::Order {
            symbol,
            side,
            order_type,
            quantity,
            price,
        } => {
            let raw = RawOrderInput {
                symbol,
                side,
                order_type,
                quantity,
                price,
            };
            run_order(raw, guards.log_file()).await
        }
        Command::Test => run_test().await,
        Command::Account { symbol } => run_account(symbol.as_deref()).await,
        Command::Status { symbol, order_id } => run_status(&symbol, order_id).await,
        Command::Cancel { symbol, order_id } => run_cancel(&symbol, order_id).await,
    };

    if let Err(e) = &result {
        error!("Command failed: {:#}", e);
    }

    result
}

/// 환경 변수에서 설정을 읽어 클라이언트 생성
fn build_client(require_credentials: bool) -> eyre::Result<Arc<BinanceFuturesClient>> {
    let config = ClientConfig::from_env();

    if require_credentials && !config.has_credentials() {
        return Err(labelled(ExchangeError::MissingCredentials));
    }

    info!("Using Binance Futures endpoint {}", config.base_url);
    Ok(Arc::new(BinanceFuturesClient::new(config).map_err(labelled)?))
}

/// 실패 종류를 머리말로 붙인다
fn labelled(e: ExchangeError) -> eyre::Report {
    let label = match e.kind() {
        ErrorKind::Validation => "Validation Error",
        ErrorKind::Api => "API Error",
        ErrorKind::Network => "Network Error",
        ErrorKind::Config => "Configuration Error",
    };
    eyre::Report::new(e).wrap_err(label)
}

async fn run_order(raw: RawOrderInput, log_file: &Path) -> eyre::Result<()> {
    info!("STARTING ORDER PLACEMENT");

    println!("Placing order...");
    let result = place_order_with_config(&raw, ClientConfig::from_env())
        .await
        .map_err(labelled)?;

    println!();
    println!("{}", format_order_result(&result));

    match result.status.as_str() {
        "NEW" | "FILLED" | "PARTIALLY_FILLED" => {
            println!("\nOrder placed successfully!");
            info!("Order placement completed successfully");
        }
        status => {
            println!("\nOrder status: {}", status);
            warn!("Order placed with status: {}", status);
        }
    }

    println!("\nFull details logged to: {}", log_file.display());
    Ok(())
}

async fn run_test() -> eyre::Result<()> {
    info!("Testing connection to Binance Futures Testnet...");

    let client = build_client(false)?;
    let report = check_connectivity(client.as_ref()).await.map_err(labelled)?;

    println!("Connection successful!");
    println!("{}", format_connectivity(&report));

    if !report.is_healthy() {
        return Err(eyre::eyre!("credential check did not pass"));
    }

    info!("Connectivity test passed");
    Ok(())
}

async fn run_account(symbol: Option<&str>) -> eyre::Result<()> {
    let client = build_client(true)?;
    let account = client.account().await.map_err(labelled)?;

    println!("{}", format_account(&account, symbol));
    info!("Account information retrieved successfully");
    Ok(())
}

async fn run_status(symbol: &str, order_id: u64) -> eyre::Result<()> {
    let manager = OrderManager::new(build_client(true)?);
    let result = manager.order_status(symbol, order_id).await.map_err(labelled)?;

    println!("{}", format_order_result(&result));
    Ok(())
}

async fn run_cancel(symbol: &str, order_id: u64) -> eyre::Result<()> {
    let manager = OrderManager::new(build_client(true)?);
    let result = manager.cancel_order(symbol, order_id).await.map_err(labelled)?;

    println!("{}", format_order_result(&result));
    println!("\nOrder cancelled.");
    Ok(())
}
