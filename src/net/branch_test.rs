use mockito::{Matcher, Server};

use super::*;
use crate::config::Timeouts;

const BRANCH_JSON: &str = r#"{
    "id": "b-1", "vendor": "v-1", "country": "c-in", "state": "s-kl", "district": "d-tvm",
    "shop_locality": "Statue", "nearby_town": "Thampanoor", "pin_code": "695001",
    "key_person_name": "Asha", "key_person_contact_number": "98470", "land_phone": null
}"#;

fn client(url: String) -> ApiClient {
    ApiClient::new(url, Timeouts::default()).unwrap()
}

#[tokio::test]
async fn create_posts_vendor_scoped_branch() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v1/vendor/branches/")
        .match_body(Matcher::PartialJson(serde_json::json!({"vendor": "v-1", "pin_code": "695001"})))
        .with_status(201)
        .with_body(BRANCH_JSON)
        .create_async()
        .await;

    let body = BranchCreate {
        vendor: "v-1".to_owned(),
        country: "c-in".to_owned(),
        state: "s-kl".to_owned(),
        district: "d-tvm".to_owned(),
        shop_locality: "Statue".to_owned(),
        nearby_town: "Thampanoor".to_owned(),
        pin_code: "695001".to_owned(),
        key_person_name: "Asha".to_owned(),
        key_person_contact_number: "98470".to_owned(),
        land_phone: None,
        latitude: None,
        longitude: None,
        status: None,
    };
    let api = client(server.url());
    let branch = api.branches("tok").create(&body).await.unwrap();
    assert_eq!(branch.id, "b-1");
    assert_eq!(branch.vendor.as_deref(), Some("v-1"));
    mock.assert_async().await;
}

#[tokio::test]
async fn list_and_get_use_collection_and_item_paths() {
    let mut server = Server::new_async().await;
    let list = server
        .mock("GET", "/api/v1/vendor/branches/")
        .with_status(200)
        .with_body(format!("[{BRANCH_JSON}]"))
        .create_async()
        .await;
    let get = server
        .mock("GET", "/api/v1/vendor/branches/b-1/")
        .with_status(200)
        .with_body(BRANCH_JSON)
        .create_async()
        .await;

    let api = client(server.url());
    assert_eq!(api.branches("tok").list().await.unwrap().len(), 1);
    assert_eq!(api.branches("tok").get("b-1").await.unwrap().shop_locality, "Statue");
    list.assert_async().await;
    get.assert_async().await;
}

#[tokio::test]
async fn update_patches_item() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PATCH", "/api/v1/vendor/branches/b-1/")
        .match_body(Matcher::Json(serde_json::json!({"nearby_town": "Kazhakkoottam"})))
        .with_status(200)
        .with_body(BRANCH_JSON)
        .create_async()
        .await;

    let api = client(server.url());
    let update = BranchUpdate { nearby_town: Some("Kazhakkoottam".to_owned()), ..BranchUpdate::default() };
    api.branches("tok").update("b-1", &update).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn delete_accepts_empty_no_content() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("DELETE", "/api/v1/vendor/branches/b-1/")
        .with_status(204)
        .create_async()
        .await;

    let api = client(server.url());
    api.branches("tok").delete("b-1").await.unwrap();
    mock.assert_async().await;
}
