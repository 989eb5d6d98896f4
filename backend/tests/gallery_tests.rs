mod common;

use axum::http::StatusCode;
use common::*;
use portfolio_backend::media_storage::mock::MockMediaGateway;

const JPEG_BYTES: &[u8] = b"\xFF\xD8\xFF\xE0 not really a jpeg";

async fn upload(setup: &TestSetup, parts: &[MultipartPart<'_>]) -> axum::response::Response {
    setup
        .send_multipart_request("/api/admin/upload", parts, Some(&setup.admin_token()))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_upload_then_list() {
    let setup = TestSetup::new().await;

    let response = upload(&setup, &[image_part("dragon.jpg", "image/jpeg", JPEG_BYTES)]).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "Image uploaded successfully");
    assert_eq!(body["image"]["category"], "tattoo");
    assert_eq!(body["image"]["title"], "");
    assert!(body["image"]["url"].as_str().unwrap().starts_with("https://"));
    assert!(body["image"]["uploadedAt"].is_string());

    let response = setup.send_get_request("/api/gallery").await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let images = parse_response_body(response).await;
    assert_eq!(images.as_array().unwrap().len(), 1);
    assert_eq!(images[0]["id"], body["image"]["id"]);

    let uploads = setup.media_gateway.uploads();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].len, JPEG_BYTES.len());
    assert_eq!(uploads[0].options.target_folder, "portfolio/tattoo");
}

#[tokio::test]
async fn test_upload_with_fields_and_category_filter() {
    let setup = TestSetup::new().await;

    let response = upload(
        &setup,
        &[
            MultipartPart::Text {
                name: "category",
                value: "mirror",
            },
            MultipartPart::Text {
                name: "title",
                value: "Art deco mirror",
            },
            image_part("mirror.png", "image/png", JPEG_BYTES),
            MultipartPart::Text {
                name: "description",
                value: "Hand engraved",
            },
        ],
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["image"]["category"], "mirror");
    assert_eq!(body["image"]["title"], "Art deco mirror");
    assert_eq!(body["image"]["description"], "Hand engraved");

    let response = upload(&setup, &[image_part("koi.webp", "image/webp", JPEG_BYTES)]).await;
    assert_eq!(response.status(), StatusCode::OK);

    for (query, expected) in [
        ("", 2),
        ("?category=all", 2),
        ("?category=mirror", 1),
        ("?category=tattoo", 1),
        ("?category=portrait", 0),
    ] {
        let response = setup
            .send_get_request(&format!("/api/gallery{query}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let images = parse_response_body(response).await;
        assert_eq!(images.as_array().unwrap().len(), expected, "{query}");
    }

    let response = setup
        .send_get_request("/api/gallery?category=mirror")
        .await
        .unwrap();
    let images = parse_response_body(response).await;
    assert_eq!(images[0]["title"], "Art deco mirror");
}

#[tokio::test]
async fn test_upload_without_image() {
    let setup = TestSetup::new().await;

    let response = upload(
        &setup,
        &[MultipartPart::Text {
            name: "title",
            value: "Nothing attached",
        }],
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "No image provided");
}

#[tokio::test]
async fn test_rejected_uploads_never_reach_media_host() {
    let setup = TestSetup::new().await;
    let oversized = vec![0u8; 5 * 1024 * 1024 + 1];

    let cases = [
        ("gif", image_part("anim.gif", "image/gif", JPEG_BYTES)),
        ("pdf", image_part("doc.pdf", "application/pdf", JPEG_BYTES)),
        ("extension", image_part("photo.exe", "image/jpeg", JPEG_BYTES)),
        ("oversized", image_part("big.jpg", "image/jpeg", &oversized)),
    ];

    for (name, part) in cases {
        let response = upload(&setup, &[part]).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{name}");
        let body = parse_response_body(response).await;
        assert_eq!(body["code"], "validation_error", "{name}");
    }

    assert!(setup.media_gateway.uploads().is_empty());
    assert!(setup.record_store.load().await.unwrap().images.is_empty());

    // Staged files are gone after every rejection
    let leftovers = std::fs::read_dir(setup.staging_dir())
        .map(|entries| entries.count())
        .unwrap_or(0);
    assert_eq!(leftovers, 0);
}

#[tokio::test]
async fn test_upload_rejected_by_media_host() {
    let setup = TestSetup::with_gateway(MockMediaGateway::failing(true, false)).await;

    let response = upload(&setup, &[image_part("dragon.jpg", "image/jpeg", JPEG_BYTES)]).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = parse_response_body(response).await;
    assert_eq!(body["code"], "upload_failed");
    assert!(body["details"].as_str().unwrap().contains("mock rejection"));
    assert!(setup.record_store.load().await.unwrap().images.is_empty());
}

#[tokio::test]
async fn test_delete_image() {
    let setup = TestSetup::new().await;
    let token = setup.admin_token();

    let response = upload(&setup, &[image_part("dragon.jpg", "image/jpeg", JPEG_BYTES)]).await;
    let body = parse_response_body(response).await;
    let id = body["image"]["id"].as_str().unwrap().to_string();
    let media_id = body["image"]["mediaId"].as_str().unwrap().to_string();

    let response = setup
        .send_delete_request(&format!("/api/admin/image/{id}"), Some(&token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "Image deleted successfully");

    assert_eq!(setup.media_gateway.deletes(), vec![media_id]);

    let response = setup.send_get_request("/api/gallery").await.unwrap();
    let images = parse_response_body(response).await;
    assert!(images.as_array().unwrap().is_empty());

    let response = setup
        .send_delete_request(&format!("/api/admin/image/{id}"), Some(&token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "Image not found");
}

#[tokio::test]
async fn test_delete_survives_media_host_failure() {
    let setup = TestSetup::with_gateway(MockMediaGateway::failing(false, true)).await;

    let response = upload(&setup, &[image_part("dragon.jpg", "image/jpeg", JPEG_BYTES)]).await;
    let body = parse_response_body(response).await;
    let id = body["image"]["id"].as_str().unwrap().to_string();

    let response = setup
        .send_delete_request(&format!("/api/admin/image/{id}"), Some(&setup.admin_token()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(setup.record_store.load().await.unwrap().images.is_empty());
}
