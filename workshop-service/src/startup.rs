//! Application startup and lifecycle management.

use crate::config::WorkshopConfig;
use crate::handlers;
use crate::services::Database;
use axum::{middleware, routing::get, Router};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use workshop_core::error::AppError;
use workshop_core::middleware::metrics::metrics_middleware;
use workshop_core::middleware::tracing::request_id_middleware;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: WorkshopConfig,
    pub db: Arc<Database>,
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
    state: AppState,
}

impl Application {
    pub async fn build(config: WorkshopConfig) -> Result<Self, AppError> {
        let db = Database::new(
            &config.database.url,
            config.database.max_connections,
            config.database.min_connections,
        )
        .await?;
        db.run_migrations().await?;

        let state = AppState {
            config: config.clone(),
            db: Arc::new(db),
        };

        let api = Router::new()
            .route(
                "/customers",
                get(handlers::customers::list_customers).post(handlers::customers::create_customer),
            )
            .route(
                "/customers/:customer_id",
                get(handlers::customers::get_customer)
                    .put(handlers::customers::update_customer)
                    .delete(handlers::customers::delete_customer),
            )
            .route(
                "/vehicles",
                get(handlers::vehicles::list_vehicles).post(handlers::vehicles::create_vehicle),
            )
            .route(
                "/vehicles/:vehicle_id",
                get(handlers::vehicles::get_vehicle)
                    .put(handlers::vehicles::update_vehicle)
                    .delete(handlers::vehicles::delete_vehicle),
            )
            .route(
                "/inventory-items",
                get(handlers::inventory::list_inventory_items)
                    .post(handlers::inventory::create_inventory_item),
            )
            .route("/inventory-items/low-stock", get(handlers::inventory::low_stock_items))
            .route(
                "/inventory-items/out-of-stock",
                get(handlers::inventory::out_of_stock_items),
            )
            .route(
                "/inventory-items/:item_id",
                get(handlers::inventory::get_inventory_item)
                    .put(handlers::inventory::update_inventory_item)
                    .delete(handlers::inventory::delete_inventory_item),
            )
            .route(
                "/service-orders",
                get(handlers::service_orders::list_service_orders)
                    .post(handlers::service_orders::create_service_order),
            )
            .route(
                "/service-orders/:order_id",
                get(handlers::service_orders::get_service_order)
                    .put(handlers::service_orders::update_service_order)
                    .delete(handlers::service_orders::delete_service_order),
            )
            .route(
                "/service-orders/:order_id/items",
                get(handlers::service_items::list_order_items)
                    .post(handlers::service_items::create_service_item),
            )
            .route(
                "/service-items/:service_item_id",
                get(handlers::service_items::get_service_item)
                    .put(handlers::service_items::update_service_item)
                    .delete(handlers::service_items::delete_service_item),
            );

        let app = Router::new()
            .route("/health", get(handlers::health::health_check))
            .route("/ready", get(handlers::health::readiness_check))
            .route("/metrics", get(handlers::health::metrics))
            .nest("/api", api)
            .layer(middleware::from_fn(metrics_middleware))
            .layer(middleware::from_fn(request_id_middleware))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            .with_state(state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
            state,
        })
    }

    pub fn db(&self) -> &Database {
        &self.state.db
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
