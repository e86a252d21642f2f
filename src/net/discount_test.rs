use mockito::{Matcher, Server};

use super::*;
use crate::config::Timeouts;
use crate::net::types::{DiscountKind, DiscountValueType};

fn client(url: String) -> ApiClient {
    ApiClient::new(url, Timeouts::default()).unwrap()
}

#[tokio::test]
async fn create_sends_type_field() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v1/vendor/discounts/")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "type": "total_bill", "value_type": "percentage", "value": 10.0, "branches": ["b-1"]
        })))
        .with_status(201)
        .with_body(
            r#"{"id": "d-1", "vendor": "v-1", "type": "total_bill", "value_type": "percentage",
                "value": "10.00", "branches": ["b-1"], "is_active": true}"#,
        )
        .create_async()
        .await;

    let body = DiscountCreate {
        vendor: "v-1".to_owned(),
        kind: DiscountKind::TotalBill,
        value_type: DiscountValueType::Percentage,
        value: 10.0,
        category: None,
        description: None,
        branches: vec!["b-1".to_owned()],
        expiry_date: None,
        is_active: true,
    };
    let api = client(server.url());
    let discount = api.discounts("tok").create(&body).await.unwrap();
    assert_eq!(discount.id, "d-1");
    assert!((discount.value - 10.0).abs() < f64::EPSILON);
    mock.assert_async().await;
}

#[tokio::test]
async fn deactivate_patches_flag_only() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PATCH", "/api/v1/vendor/discounts/d-1/")
        .match_body(Matcher::Json(serde_json::json!({"is_active": false})))
        .with_status(200)
        .with_body(
            r#"{"id": "d-1", "vendor": "v-1", "type": "special_offer", "value_type": "flat",
                "value": 500, "is_active": false}"#,
        )
        .create_async()
        .await;

    let api = client(server.url());
    let update = DiscountUpdate { is_active: Some(false), ..DiscountUpdate::default() };
    let discount = api.discounts("tok").update("d-1", &update).await.unwrap();
    assert!(!discount.is_active);
    mock.assert_async().await;
}

#[tokio::test]
async fn delete_reports_server_message() {
    let mut server = Server::new_async().await;
    server
        .mock("DELETE", "/api/v1/vendor/discounts/d-9/")
        .with_status(404)
        .with_body(r#"{"detail": "No Discount matches the given query."}"#)
        .create_async()
        .await;

    let api = client(server.url());
    let err = api.discounts("tok").delete("d-9").await.unwrap_err();
    assert_eq!(err.to_string(), "No Discount matches the given query.");
}
