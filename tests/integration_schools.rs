mod common;

use axum::http::StatusCode;
use common::{empty_app, json_body, request, seeded_app, superintendent, token};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_list_schools_is_public() {
    let app = seeded_app().await;

    let response = app
        .oneshot(request("GET", "/schools", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(
        body,
        json!({
            "schools": [
                {"id": 1, "name": "School Name 1", "address": "1 School Street"},
                {"id": 2, "name": "School Name 2", "address": "2 School Street"}
            ]
        })
    );
}

#[tokio::test]
async fn test_create_school_then_listed_once() {
    let app = seeded_app().await;
    let token = token("post:school");

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/schools",
            Some(&token),
            Some(json!({"name": "X", "address": "Y"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let created = json_body(response).await;
    assert_eq!(created, json!({"id": 3, "name": "X", "address": "Y"}));

    let response = app
        .oneshot(request("GET", "/schools", None, None))
        .await
        .unwrap();
    let body = json_body(response).await;
    let matches = body["schools"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|s| **s == created)
        .count();
    assert_eq!(matches, 1);
}

#[tokio::test]
async fn test_create_school_requires_post_scope() {
    let app = seeded_app().await;
    let token = token("modify:school get:students");

    let response = app
        .oneshot(request(
            "POST",
            "/schools",
            Some(&token),
            Some(json!({"name": "X", "address": "Y"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json_body(response).await;
    assert_eq!(
        body,
        json!({
            "code": "unauthorized",
            "description": "You don't have permission to access this resource."
        })
    );
}

#[tokio::test]
async fn test_create_school_validation() {
    let app = empty_app();
    let token = superintendent();

    let cases = [
        json!({"name": "X"}),
        json!({"address": "Y"}),
        json!({"name": "", "address": "Y"}),
        json!({"name": "X", "address": "   "}),
        json!({"name": "n".repeat(81), "address": "Y"}),
        json!({"name": 5, "address": "Y"}),
    ];

    for body in cases {
        let response = app
            .clone()
            .oneshot(request("POST", "/schools", Some(&token), Some(body.clone())))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(json_body(response).await["code"], "bad_request");
    }
}

#[tokio::test]
async fn test_create_school_accepts_80_characters() {
    let app = empty_app();

    let response = app
        .oneshot(request(
            "POST",
            "/schools",
            Some(&superintendent()),
            Some(json!({"name": "n".repeat(80), "address": "a".repeat(80)})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_duplicate_school_conflicts() {
    let app = seeded_app().await;

    let response = app
        .oneshot(request(
            "POST",
            "/schools",
            Some(&superintendent()),
            Some(json!({"name": "School Name 1", "address": "somewhere else"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(json_body(response).await["code"], "conflict");
}

#[tokio::test]
async fn test_update_school() {
    let app = seeded_app().await;
    let token = token("modify:school");

    let response = app
        .clone()
        .oneshot(request(
            "PATCH",
            "/schools/1",
            Some(&token),
            Some(json!({"name": "Renamed", "address": "1 New Street"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({"school": {"id": 1, "name": "Renamed", "address": "1 New Street"}})
    );

    let response = app
        .oneshot(request("GET", "/schools", None, None))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["schools"][0]["name"], "Renamed");
    assert_eq!(body["schools"][0]["address"], "1 New Street");
}

#[tokio::test]
async fn test_update_school_keeping_own_values() {
    let app = seeded_app().await;

    let response = app
        .oneshot(request(
            "PATCH",
            "/schools/1",
            Some(&token("modify:school")),
            Some(json!({"name": "School Name 1", "address": "1 School Street"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_update_school_requires_both_fields() {
    let app = seeded_app().await;

    let response = app
        .oneshot(request(
            "PATCH",
            "/schools/1",
            Some(&token("modify:school")),
            Some(json!({"name": "Only a name"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_missing_school_is_not_found() {
    let app = seeded_app().await;

    let response = app
        .oneshot(request(
            "PATCH",
            "/schools/99",
            Some(&token("modify:school")),
            Some(json!({"name": "X", "address": "Y"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["code"], "not_found");
}

#[tokio::test]
async fn test_update_school_requires_modify_scope() {
    let app = seeded_app().await;

    let response = app
        .oneshot(request(
            "PATCH",
            "/schools/1",
            Some(&token("post:school")),
            Some(json!({"name": "X", "address": "Y"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_delete_school_with_students_is_refused() {
    let app = seeded_app().await;
    let token = token("modify:school");

    let response = app
        .clone()
        .oneshot(request("DELETE", "/schools/1", Some(&token), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(json_body(response).await["code"], "school_has_students");

    let response = app
        .oneshot(request("GET", "/schools", None, None))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["schools"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_delete_childless_school() {
    let app = seeded_app().await;
    let token = superintendent();

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/schools",
            Some(&token),
            Some(json!({"name": "X", "address": "Y"})),
        ))
        .await
        .unwrap();
    let id = json_body(response).await["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(request("DELETE", &format!("/schools/{id}"), Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({"school_id": id}));

    let response = app
        .clone()
        .oneshot(request("GET", "/schools", None, None))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert!(body["schools"].as_array().unwrap().iter().all(|s| s["id"] != id));

    // Already gone
    let response = app
        .oneshot(request("DELETE", &format!("/schools/{id}"), Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_numeric_id_is_not_found() {
    let app = seeded_app().await;
    let token = superintendent();

    for (method, uri) in [
        ("DELETE", "/schools/abc"),
        ("GET", "/schools/abc/students"),
    ] {
        let response = app
            .clone()
            .oneshot(request(method, uri, Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{method} {uri}");
    }
}

#[tokio::test]
async fn test_unknown_route_is_json_not_found() {
    let app = empty_app();

    let response = app
        .oneshot(request("GET", "/nowhere", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["code"], "not_found");
}

#[tokio::test]
async fn test_unsupported_method_is_json_method_not_allowed() {
    let app = seeded_app().await;
    let token = superintendent();

    for (method, uri) in [("PUT", "/schools/1"), ("DELETE", "/schools"), ("POST", "/students")] {
        let response = app
            .clone()
            .oneshot(request(method, uri, Some(&token), None))
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::METHOD_NOT_ALLOWED,
            "{method} {uri}"
        );
        let body = json_body(response).await;
        assert_eq!(body["code"], "method_not_allowed", "{method} {uri}");
        assert!(body["description"].is_string());
    }
}
