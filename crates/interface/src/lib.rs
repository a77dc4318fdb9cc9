pub mod account;
pub mod error;
pub mod order;
pub mod reporter;

pub use account::{AccountAsset, AccountInfo, PositionInfo, ServerTime};
pub use error::{ErrorKind, ExchangeError, ValidationError};
pub use order::{OrderKind, OrderRequest, OrderResult, OrderType, RawOrderInput, Side, TimeInForce};
pub use reporter::{RequestReporter, TracingReporter};

pub use rust_decimal::Decimal;
