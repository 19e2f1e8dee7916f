pub mod customer;
pub mod inventory_item;
pub mod service_item;
pub mod service_order;
pub mod staff;
pub mod vehicle;

pub use customer::{CreateCustomer, Customer, UpdateCustomer};
pub use inventory_item::{
    CreateInventoryItem, InventoryItem, InventoryListParams, SortField, SortOrder, StockFilter,
    UpdateInventoryItem,
};
pub use service_item::{CreateServiceItem, ServiceItem, ServiceItemDetail, UpdateServiceItem};
pub use service_order::{
    CreateServiceOrder, ServiceOrder, ServiceOrderDetail, UpdateServiceOrder, VehicleWithCustomer,
};
pub use staff::Staff;
pub use vehicle::{CreateVehicle, UpdateVehicle, Vehicle};
