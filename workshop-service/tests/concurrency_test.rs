//! Concurrent order creation against the same inventory item: stock must
//! never go negative and exactly the affordable orders succeed.

mod common;

use common::TestApp;
use reqwest::Client;
use serde_json::json;

#[tokio::test]
async fn concurrent_orders_cannot_oversell_an_item() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let (staff_id, vehicle_id) = app.seed_order_prerequisites().await;
    // 10 on hand, two orders of 7 each: only one can fit
    let item = app.seed_inventory_item("Battery", "BAT-1", 10, 12000).await;

    let order_body = json!({
        "total_cost": 84000,
        "vehicle_id": vehicle_id,
        "items": [
            { "description": "Fleet batteries", "quantity": 7, "unit_price": 12000, "inventory_item_id": item }
        ]
    });

    let url = format!("{}/api/service-orders", app.address);
    let first = client
        .post(&url)
        .header("X-Staff-ID", staff_id.to_string())
        .json(&order_body)
        .send();
    let second = client
        .post(&url)
        .header("X-Staff-ID", staff_id.to_string())
        .json(&order_body)
        .send();

    let (first, second) = tokio::join!(first, second);
    let statuses = [first.unwrap().status(), second.unwrap().status()];

    let created = statuses.iter().filter(|s| s.as_u16() == 201).count();
    let rejected = statuses.iter().filter(|s| s.as_u16() == 400).count();
    assert_eq!(created, 1, "exactly one order should win: {:?}", statuses);
    assert_eq!(rejected, 1);

    assert_eq!(app.stock_of(item).await, 3);

    let orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM service_orders")
        .fetch_one(app.db.pool())
        .await
        .unwrap();
    assert_eq!(orders, 1);

    app.cleanup().await;
}

#[tokio::test]
async fn many_small_concurrent_orders_drain_stock_exactly_to_zero() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let (staff_id, vehicle_id) = app.seed_order_prerequisites().await;
    let item = app.seed_inventory_item("Wiper Blade", "WB-1", 5, 1000).await;

    let url = format!("{}/api/service-orders", app.address);
    let mut handles = Vec::new();
    for _ in 0..8 {
        let client = client.clone();
        let url = url.clone();
        let body = json!({
            "total_cost": 1000,
            "vehicle_id": vehicle_id,
            "items": [
                { "description": "Blade", "quantity": 1, "unit_price": 1000, "inventory_item_id": item }
            ]
        });
        let staff = staff_id.to_string();
        handles.push(tokio::spawn(async move {
            client
                .post(&url)
                .header("X-Staff-ID", staff)
                .json(&body)
                .send()
                .await
                .unwrap()
                .status()
                .as_u16()
        }));
    }

    let mut created = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            201 => created += 1,
            400 => rejected += 1,
            other => panic!("unexpected status {}", other),
        }
    }

    assert_eq!(created, 5);
    assert_eq!(rejected, 3);
    assert_eq!(app.stock_of(item).await, 0);

    app.cleanup().await;
}
