mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;

fn testimonial(rating: i64, text: &str) -> serde_json::Value {
    json!({
        "clientName": "Ana",
        "service": "Fine line tattoo",
        "rating": rating,
        "text": text,
    })
}

#[tokio::test]
async fn test_public_submission() {
    let setup = TestSetup::new().await;

    let response = setup
        .send_post_request(
            "/api/testimonials/submit",
            json!({
                "clientName": "  Ana ",
                "service": "Mirror engraving",
                "rating": 5,
                "text": "  Wonderful work on our family mirror!  ",
            }),
            None,
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = parse_response_body(response).await;
    assert!(body["message"].is_string());
    assert_eq!(body["testimonial"]["clientName"], "Ana");
    assert_eq!(
        body["testimonial"]["text"],
        "Wonderful work on our family mirror!"
    );
    assert_eq!(body["testimonial"]["rating"], 5);

    let response = setup.send_get_request("/api/testimonials").await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let testimonials = parse_response_body(response).await;
    assert_eq!(testimonials.as_array().unwrap().len(), 1);
    assert_eq!(testimonials[0]["id"], body["testimonial"]["id"]);
}

#[tokio::test]
async fn test_public_submission_validation() {
    let setup = TestSetup::new().await;

    let cases = [
        ("short text", testimonial(5, &"a".repeat(19))),
        ("long text", testimonial(5, &"a".repeat(501))),
        ("rating zero", testimonial(0, &"a".repeat(20))),
        ("rating six", testimonial(6, &"a".repeat(20))),
        ("blank name", json!({
            "clientName": "   ",
            "service": "Tattoo",
            "rating": 4,
            "text": "a".repeat(20),
        })),
        ("missing field", json!({ "clientName": "Ana", "rating": 4 })),
    ];

    for (name, payload) in cases {
        let response = setup
            .send_post_request("/api/testimonials/submit", payload, None)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{name}");

        let body = parse_response_body(response).await;
        assert_eq!(body["code"], "validation_error", "{name}");
    }

    assert!(setup
        .record_store
        .load()
        .await
        .unwrap()
        .testimonials
        .is_empty());
}

#[tokio::test]
async fn test_admin_create_and_delete() {
    let setup = TestSetup::new().await;
    let token = setup.admin_token();

    let response = setup
        .send_post_request(
            "/api/admin/testimonials",
            testimonial(4, &"a".repeat(500)),
            Some(&token),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let record = parse_response_body(response).await;
    assert_eq!(record["rating"], 4);
    assert!(record["createdAt"].is_string());
    let id = record["id"].as_str().unwrap().to_string();

    let response = setup
        .send_post_request(
            "/api/admin/testimonials",
            testimonial(1, &"a".repeat(501)),
            Some(&token),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = setup
        .send_delete_request("/api/admin/testimonials/missing", Some(&token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = setup
        .send_delete_request(&format!("/api/admin/testimonials/{id}"), Some(&token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "Testimonial deleted successfully");

    let response = setup.send_get_request("/api/testimonials").await.unwrap();
    let testimonials = parse_response_body(response).await;
    assert!(testimonials.as_array().unwrap().is_empty());
}
