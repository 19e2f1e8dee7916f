pub mod customers;
pub mod health;
pub mod inventory;
pub mod service_items;
pub mod service_orders;
pub mod vehicles;
