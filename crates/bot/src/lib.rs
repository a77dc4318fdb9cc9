pub mod display;
pub mod health;
pub mod logger;
pub mod orders;
pub mod validator;

pub use health::{check_connectivity, ConnectivityReport, CredentialStatus};
pub use orders::{place_order_with_config, prepare_order, OrderManager};
pub use validator::validate_order;
