//! Line item integration tests: quantity edits reconcile stock by delta,
//! deletes restore, reference changes release and re-reserve.

mod common;

use common::TestApp;
use reqwest::Client;
use serde_json::json;
use uuid::Uuid;

/// Create an order with one line of `quantity` against `item`, returning
/// (order_id, service_item_id).
async fn order_with_one_line(
    app: &TestApp,
    client: &Client,
    staff_id: Uuid,
    vehicle_id: Uuid,
    item: Uuid,
    quantity: i32,
) -> (String, String) {
    let created: serde_json::Value = client
        .post(&format!("{}/api/service-orders", app.address))
        .header("X-Staff-ID", staff_id.to_string())
        .json(&json!({
            "total_cost": 1000,
            "vehicle_id": vehicle_id,
            "items": [
                { "description": "Line", "quantity": quantity, "unit_price": 1000, "inventory_item_id": item }
            ]
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    (
        created["order"]["order_id"].as_str().unwrap().to_string(),
        created["items"][0]["item"]["service_item_id"]
            .as_str()
            .unwrap()
            .to_string(),
    )
}

#[tokio::test]
async fn increasing_quantity_reserves_only_the_delta() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let (staff_id, vehicle_id) = app.seed_order_prerequisites().await;
    let item = app.seed_inventory_item("Oil Filter", "OF-1", 10, 1500).await;
    let (_, line_id) =
        order_with_one_line(&app, &client, staff_id, vehicle_id, item, 3).await;
    assert_eq!(app.stock_of(item).await, 7);

    let response = client
        .put(&format!("{}/api/service-items/{}", app.address, line_id))
        .json(&json!({ "quantity": 5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let updated: serde_json::Value = response.json().await.unwrap();
    assert_eq!(updated["item"]["quantity"], 5);

    // Only the delta of 2 moved
    assert_eq!(app.stock_of(item).await, 5);

    app.cleanup().await;
}

#[tokio::test]
async fn decreasing_quantity_releases_the_delta() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let (staff_id, vehicle_id) = app.seed_order_prerequisites().await;
    let item = app.seed_inventory_item("Brake Pads", "BP-1", 8, 4500).await;
    let (_, line_id) =
        order_with_one_line(&app, &client, staff_id, vehicle_id, item, 4).await;
    assert_eq!(app.stock_of(item).await, 4);

    let response = client
        .put(&format!("{}/api/service-items/{}", app.address, line_id))
        .json(&json!({ "quantity": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    assert_eq!(app.stock_of(item).await, 7);

    app.cleanup().await;
}

#[tokio::test]
async fn insufficient_delta_rejects_the_update_and_keeps_the_line() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let (staff_id, vehicle_id) = app.seed_order_prerequisites().await;
    let item = app.seed_inventory_item("Bulb", "BL-1", 5, 200).await;
    let (_, line_id) =
        order_with_one_line(&app, &client, staff_id, vehicle_id, item, 3).await;
    assert_eq!(app.stock_of(item).await, 2);

    // Raising to 6 needs a delta of 3 but only 2 remain
    let response = client
        .put(&format!("{}/api/service-items/{}", app.address, line_id))
        .json(&json!({ "quantity": 6 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["shortfall"]["item"], "Bulb");

    // Line and stock unchanged
    assert_eq!(app.stock_of(item).await, 2);
    let line: serde_json::Value = client
        .get(&format!("{}/api/service-items/{}", app.address, line_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(line["item"]["quantity"], 3);

    app.cleanup().await;
}

#[tokio::test]
async fn changing_the_inventory_reference_moves_the_reservation() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let (staff_id, vehicle_id) = app.seed_order_prerequisites().await;
    let old_item = app.seed_inventory_item("Filter A", "FA-1", 10, 1200).await;
    let new_item = app.seed_inventory_item("Filter B", "FB-1", 6, 1400).await;
    let (_, line_id) =
        order_with_one_line(&app, &client, staff_id, vehicle_id, old_item, 4).await;
    assert_eq!(app.stock_of(old_item).await, 6);

    let response = client
        .put(&format!("{}/api/service-items/{}", app.address, line_id))
        .json(&json!({ "inventory_item_id": new_item, "quantity": 5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let updated: serde_json::Value = response.json().await.unwrap();
    assert_eq!(updated["inventory_item"]["sku"], "FB-1");

    // Old reservation released in full, new one taken in full
    assert_eq!(app.stock_of(old_item).await, 10);
    assert_eq!(app.stock_of(new_item).await, 1);

    app.cleanup().await;
}

#[tokio::test]
async fn reference_change_to_an_insufficient_item_changes_nothing() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let (staff_id, vehicle_id) = app.seed_order_prerequisites().await;
    let old_item = app.seed_inventory_item("Disc A", "DA-1", 10, 9000).await;
    let new_item = app.seed_inventory_item("Disc B", "DB-1", 2, 9500).await;
    let (_, line_id) =
        order_with_one_line(&app, &client, staff_id, vehicle_id, old_item, 4).await;

    let response = client
        .put(&format!("{}/api/service-items/{}", app.address, line_id))
        .json(&json!({ "inventory_item_id": new_item }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    assert_eq!(app.stock_of(old_item).await, 6);
    assert_eq!(app.stock_of(new_item).await, 2);

    app.cleanup().await;
}

#[tokio::test]
async fn adding_a_line_to_an_existing_order_reserves_stock() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let (staff_id, vehicle_id) = app.seed_order_prerequisites().await;
    let first = app.seed_inventory_item("Alternator", "AL-1", 2, 18000).await;
    let extra = app.seed_inventory_item("Drive Belt", "DB-1", 7, 2600).await;
    let (order_id, _) =
        order_with_one_line(&app, &client, staff_id, vehicle_id, first, 1).await;

    let response = client
        .post(&format!(
            "{}/api/service-orders/{}/items",
            app.address, order_id
        ))
        .json(&json!({
            "description": "Replace belt while in there",
            "quantity": 1,
            "unit_price": 2600,
            "inventory_item_id": extra
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    assert_eq!(app.stock_of(extra).await, 6);

    let items: serde_json::Value = client
        .get(&format!(
            "{}/api/service-orders/{}/items",
            app.address, order_id
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(items.as_array().unwrap().len(), 2);
    // Sorted by inventory item name
    assert_eq!(items[0]["inventory_item"]["name"], "Alternator");
    assert_eq!(items[1]["inventory_item"]["name"], "Drive Belt");

    app.cleanup().await;
}

#[tokio::test]
async fn deleting_a_line_restores_its_stock() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let (staff_id, vehicle_id) = app.seed_order_prerequisites().await;
    let item = app.seed_inventory_item("Thermostat", "TH-1", 5, 3400).await;
    let (_, line_id) =
        order_with_one_line(&app, &client, staff_id, vehicle_id, item, 2).await;
    assert_eq!(app.stock_of(item).await, 3);

    let response = client
        .delete(&format!("{}/api/service-items/{}", app.address, line_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 204);

    assert_eq!(app.stock_of(item).await, 5);

    let response = client
        .get(&format!("{}/api/service-items/{}", app.address, line_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    app.cleanup().await;
}

#[tokio::test]
async fn adding_a_line_to_a_missing_order_is_404() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let item = app.seed_inventory_item("Hose", "HO-1", 4, 800).await;

    let response = client
        .post(&format!(
            "{}/api/service-orders/{}/items",
            app.address,
            Uuid::new_v4()
        ))
        .json(&json!({
            "description": "Hose",
            "quantity": 1,
            "unit_price": 800,
            "inventory_item_id": item
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    assert_eq!(app.stock_of(item).await, 4);

    app.cleanup().await;
}
