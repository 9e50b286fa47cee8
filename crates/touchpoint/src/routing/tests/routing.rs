use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::routing::router::{get_detail_handler, routing_router};

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request builds")
}

fn post_json(uri: &str, body: String) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .expect("request builds")
}

#[tokio::test]
async fn get_detail_handler_degrades_missing_record_to_fallback() {
    let (state, _) = seeded_state(coventry_postcodes());
    let response =
        get_detail_handler(State(state), HeaderMap::new(), Ok(Path("0000000404".to_string())))
            .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await, fallback_json());
}

#[tokio::test]
async fn location_query_resolves_postcode() {
    let (state, _) = seeded_state(coventry_postcodes());
    seed_coventry(&state).await;

    let response = routing_router(state)
        .oneshot(get("/api/routing?location=CV1%204JP"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["TouchpointID"], "0000000123");
    assert_eq!(body["Area"], "West Midlands");
}

#[tokio::test]
async fn empty_location_degrades_to_fallback() {
    let (state, _) = seeded_state(coventry_postcodes());
    let response = routing_router(state)
        .oneshot(get("/api/routing?location="))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await, fallback_json());
}

#[tokio::test]
async fn repeated_location_parameter_degrades_to_fallback() {
    let (state, _) = seeded_state(coventry_postcodes());
    seed_coventry(&state).await;

    let response = routing_router(state)
        .oneshot(get("/api/routing?location=CV1&location=LE1"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await, fallback_json());
}

#[tokio::test]
async fn undecodable_touchpoint_id_degrades_to_fallback() {
    let (state, _) = seeded_state(coventry_postcodes());
    let response = routing_router(state)
        .oneshot(get("/api/routing/%FF%FE"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await, fallback_json());
}

#[tokio::test]
async fn undecodable_key_on_delete_is_bad_request() {
    let (state, _) = seeded_state(coventry_postcodes());
    let response = routing_router(state)
        .oneshot(
            Request::delete("/api/authorities/%FF%FE")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn postcode_outage_degrades_to_fallback() {
    let mut postcodes = coventry_postcodes();
    postcodes.unavailable = true;
    let (state, _) = seeded_state(postcodes);
    seed_coventry(&state).await;

    let response = routing_router(state)
        .oneshot(get("/api/routing?location=CV1"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await, fallback_json());
}

#[tokio::test]
async fn listing_without_location_returns_all_details() {
    let (state, _) = seeded_state(coventry_postcodes());
    let empty = routing_router(state.clone())
        .oneshot(get("/api/routing"))
        .await
        .expect("router responds");
    assert_eq!(empty.status(), StatusCode::OK);
    assert_eq!(read_json_body(empty).await, json!([]));

    seed_coventry(&state).await;
    let listed = routing_router(state)
        .oneshot(get("/api/routing"))
        .await
        .expect("router responds");
    let body = read_json_body(listed).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn unparseable_post_body_is_bad_request() {
    let (state, _) = seeded_state(coventry_postcodes());
    let response = routing_router(state)
        .oneshot(post_json("/api/routing", "{ not json".to_string()))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_fields_are_unprocessable() {
    let (state, _) = seeded_state(coventry_postcodes());
    let mut record = detail("0000000123");
    record.area.clear();

    let response = routing_router(state)
        .oneshot(post_json(
            "/api/routing",
            serde_json::to_string(&record).expect("serializes"),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        read_json_body(response).await,
        json!([{ "Field": "Area", "Message": "is required" }])
    );
}

#[tokio::test]
async fn deleting_missing_detail_is_no_content() {
    let (state, _) = seeded_state(coventry_postcodes());
    let response = routing_router(state)
        .oneshot(
            Request::delete("/api/routing/0000000404")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn authority_endpoints_create_and_fetch() {
    let (state, _) = seeded_state(coventry_postcodes());
    let coventry = authority("E08000026", "0000000123", "Coventry");

    let created = routing_router(state.clone())
        .oneshot(post_json(
            "/api/authorities",
            serde_json::to_string(&coventry).expect("serializes"),
        ))
        .await
        .expect("router responds");
    assert_eq!(created.status(), StatusCode::CREATED);

    let duplicate = routing_router(state.clone())
        .oneshot(post_json(
            "/api/authorities",
            serde_json::to_string(&coventry).expect("serializes"),
        ))
        .await
        .expect("router responds");
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    let fetched = routing_router(state)
        .oneshot(get("/api/authorities/E08000026"))
        .await
        .expect("router responds");
    assert_eq!(fetched.status(), StatusCode::OK);
    assert_eq!(
        read_json_body(fetched).await,
        json!({ "LADCode": "E08000026", "TouchpointID": "0000000123", "Name": "Coventry" })
    );
}
