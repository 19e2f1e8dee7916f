//! Customer and vehicle integration tests.

mod common;

use common::TestApp;
use reqwest::Client;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn customer_crud_round_trip() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .post(&format!("{}/api/customers", app.address))
        .json(&json!({ "name": "Riley Smith", "phone_number": "555-0142" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let customer: serde_json::Value = response.json().await.unwrap();
    let customer_id = customer["customer_id"].as_str().unwrap();

    let response = client
        .put(&format!("{}/api/customers/{}", app.address, customer_id))
        .json(&json!({ "phone_number": "555-0199" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let updated: serde_json::Value = response.json().await.unwrap();
    assert_eq!(updated["name"], "Riley Smith");
    assert_eq!(updated["phone_number"], "555-0199");

    let response = client
        .delete(&format!("{}/api/customers/{}", app.address, customer_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 204);

    let response = client
        .get(&format!("{}/api/customers/{}", app.address, customer_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    app.cleanup().await;
}

#[tokio::test]
async fn vehicle_requires_an_existing_customer() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .post(&format!("{}/api/vehicles", app.address))
        .json(&json!({
            "registration_plate": "XX-0000",
            "make": "Honda",
            "model": "Civic",
            "customer_id": Uuid::new_v4()
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    app.cleanup().await;
}

#[tokio::test]
async fn vehicle_listing_nests_its_customer() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let customer_id = app.seed_customer("Morgan Lee").await;
    app.seed_vehicle(customer_id, "AB-1234").await;

    let body: serde_json::Value = client
        .get(&format!("{}/api/vehicles", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["vehicle"]["registration_plate"], "AB-1234");
    assert_eq!(body["data"][0]["customer"]["name"], "Morgan Lee");

    app.cleanup().await;
}

#[tokio::test]
async fn vehicle_with_order_history_cannot_be_deleted() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let (staff_id, vehicle_id) = app.seed_order_prerequisites().await;
    let item = app.seed_inventory_item("Clutch Kit", "CK-1", 6, 21000).await;

    let created = client
        .post(&format!("{}/api/service-orders", app.address))
        .header("X-Staff-ID", staff_id.to_string())
        .json(&json!({
            "total_cost": 21000,
            "vehicle_id": vehicle_id,
            "items": [
                { "description": "Clutch", "quantity": 1, "unit_price": 21000, "inventory_item_id": item }
            ]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status(), 201);
    assert_eq!(app.stock_of(item).await, 5);

    let response = client
        .delete(&format!("{}/api/vehicles/{}", app.address, vehicle_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 409);

    // The order, its reservation and the vehicle all survive
    assert_eq!(app.stock_of(item).await, 5);
    let response = client
        .get(&format!("{}/api/vehicles/{}", app.address, vehicle_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    app.cleanup().await;
}

#[tokio::test]
async fn customer_delete_is_blocked_by_a_vehicles_order_history() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let staff_id = app.seed_staff("Alex Mechanic").await;
    let customer_id = app.seed_customer("Devin Ortiz").await;
    let vehicle_id = app.seed_vehicle(customer_id, "EF-9012").await;
    let item = app.seed_inventory_item("Timing Belt", "TB-1", 4, 8000).await;

    let created = client
        .post(&format!("{}/api/service-orders", app.address))
        .header("X-Staff-ID", staff_id.to_string())
        .json(&json!({
            "total_cost": 8000,
            "vehicle_id": vehicle_id,
            "items": [
                { "description": "Belt", "quantity": 2, "unit_price": 8000, "inventory_item_id": item }
            ]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status(), 201);
    assert_eq!(app.stock_of(item).await, 2);

    // The vehicle cascade would drop the order, so the whole delete is refused
    let response = client
        .delete(&format!("{}/api/customers/{}", app.address, customer_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 409);

    assert_eq!(app.stock_of(item).await, 2);
    let response = client
        .get(&format!("{}/api/customers/{}", app.address, customer_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    app.cleanup().await;
}

#[tokio::test]
async fn deleting_a_customer_cascades_to_vehicles() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let customer_id = app.seed_customer("Casey Ng").await;
    let vehicle_id = app.seed_vehicle(customer_id, "CD-5678").await;

    let response = client
        .delete(&format!("{}/api/customers/{}", app.address, customer_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 204);

    let response = client
        .get(&format!("{}/api/vehicles/{}", app.address, vehicle_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    app.cleanup().await;
}
