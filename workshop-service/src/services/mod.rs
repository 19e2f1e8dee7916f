pub mod customers;
pub mod database;
pub mod inventory;
pub mod metrics;
pub mod service_items;
pub mod service_orders;
pub mod staff;
pub mod stock;
pub mod vehicles;

pub use database::Database;
pub use metrics::{get_metrics, init_metrics};
pub use stock::{StockCheck, StockLedger};
