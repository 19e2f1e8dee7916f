//! Workshop Service - Garage management: customers, vehicles, inventory and service orders.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;
