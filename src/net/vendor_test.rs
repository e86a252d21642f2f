use mockito::{Matcher, Server};

use super::*;
use crate::config::Timeouts;
use crate::net::error::ErrorKind;

fn client(url: String) -> ApiClient {
    ApiClient::new(url, Timeouts::default()).unwrap()
}

#[tokio::test]
async fn update_sends_only_present_fields_and_returns_patch() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PATCH", "/api/v1/vendor/update/")
        .match_header("authorization", "Bearer tok")
        .match_body(Matcher::Json(serde_json::json!({"land_phone": "0471 2345"})))
        .with_status(200)
        .with_body(r#"{"id": "v-1", "name": "Corner Books", "land_phone": "0471 2345"}"#)
        .create_async()
        .await;

    let api = client(server.url());
    let update = VendorUpdate { land_phone: Some("0471 2345".to_owned()), ..VendorUpdate::default() };
    let patch = api.vendors("tok").update(&update).await.unwrap();
    assert_eq!(patch.name.as_deref(), Some("Corner Books"));
    assert!(patch.is_onboarded.is_none());
    mock.assert_async().await;
}

#[tokio::test]
async fn profile_update_is_multipart_with_files() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PATCH", "/api/v1/vendor/profile/update/")
        .match_header("content-type", Matcher::Regex("multipart/form-data".to_owned()))
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="registered_address"\r\n\r\n12 MG Road"#.to_owned()),
            Matcher::Regex(r#"name="logo"; filename="logo.png""#.to_owned()),
        ]))
        .with_status(200)
        .with_body(r#"{"registered_address": "12 MG Road"}"#)
        .create_async()
        .await;

    let api = client(server.url());
    let update = VendorProfileUpdate {
        registered_address: Some("12 MG Road".to_owned()),
        logo: Some(Upload { file_name: "logo.png".to_owned(), bytes: vec![0x89, 0x50] }),
        ..VendorProfileUpdate::default()
    };
    let echo = api.vendors("tok").update_profile(update).await.unwrap();
    assert_eq!(echo["registered_address"], "12 MG Road");
    mock.assert_async().await;
}

#[tokio::test]
async fn verification_status_decodes() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v1/vendor/verification-status/")
        .with_status(200)
        .with_body(r#"{"verified": false, "pending_changes": true, "verification_message": "Under review"}"#)
        .create_async()
        .await;

    let api = client(server.url());
    let status = api.vendors("tok").verification_status().await.unwrap();
    assert!(!status.verified);
    assert!(status.pending_changes);
    assert_eq!(status.verification_message, "Under review");
}

#[tokio::test]
async fn expired_token_is_unauthorized() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v1/vendor/details/")
        .with_status(401)
        .with_body(r#"{"detail": "Given token not valid for any token type"}"#)
        .create_async()
        .await;

    let api = client(server.url());
    let err = api.vendors("stale").details().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert_eq!(err.to_string(), "Given token not valid for any token type");
}
