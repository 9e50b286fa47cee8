use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::domain::{LocalAuthority, RoutingDetail};
use super::faults::Fault;
use super::responses::FaultResponder;
use super::safe::attempt_async;
use super::scope::TracingScope;
use super::service::{LocalAuthorityService, RoutingDetailService};
use super::store::StoreOperation;

/// Shared handles for the routing endpoints.
#[derive(Clone)]
pub struct RoutingState {
    pub details: Arc<RoutingDetailService>,
    pub authorities: Arc<LocalAuthorityService>,
    pub faults: Arc<FaultResponder>,
}

/// Router builder exposing routing-detail and local-authority endpoints.
pub fn routing_router(state: RoutingState) -> Router {
    Router::new()
        .route(
            "/api/routing",
            get(locate_or_list_handler).post(create_detail_handler),
        )
        .route(
            "/api/routing/:touchpoint_id",
            get(get_detail_handler).delete(delete_detail_handler),
        )
        .route("/api/authorities", axum::routing::post(create_authority_handler))
        .route(
            "/api/authorities/:lad_code",
            get(get_authority_handler).delete(delete_authority_handler),
        )
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RoutingQuery {
    #[serde(default)]
    pub(crate) location: Option<String>,
}

/// Runs `action` behind the fault boundary, mapping any fault with `operation`'s table.
async fn respond<F>(
    faults: &FaultResponder,
    operation: StoreOperation,
    scope: &TracingScope,
    action: F,
) -> Response
where
    F: Future<Output = Result<Response, Fault>>,
{
    attempt_async(action, |fault| {
        faults
            .response_for(&fault, operation.kind(), scope)
            .into_response()
    })
    .await
}

fn body_or_fault<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Fault> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| Fault::malformed(rejection.body_text()))
}

fn key_or_fault(key: Result<Path<String>, PathRejection>) -> Result<String, Fault> {
    key.map(|Path(key)| key)
        .map_err(|rejection| Fault::malformed(rejection.body_text()))
}

fn query_or_fault(
    query: Result<Query<RoutingQuery>, QueryRejection>,
) -> Result<RoutingQuery, Fault> {
    query
        .map(|Query(query)| query)
        .map_err(|rejection| Fault::malformed(rejection.body_text()))
}

pub(crate) async fn locate_or_list_handler(
    State(state): State<RoutingState>,
    headers: HeaderMap,
    query: Result<Query<RoutingQuery>, QueryRejection>,
) -> Response {
    let scope = TracingScope::from_headers(&headers);
    // An unreadable query string is treated as a failed location lookup.
    let operation = match &query {
        Ok(Query(RoutingQuery { location: None })) => StoreOperation::GetAll,
        _ => StoreOperation::GetByLocation,
    };
    respond(&state.faults, operation, &scope, async {
        match query_or_fault(query)?.location {
            Some(location) => {
                let detail = state.details.get_by_location(&location, &scope).await?;
                Ok((StatusCode::OK, Json(detail)).into_response())
            }
            None => {
                let details = state.details.get_all(&scope).await?;
                Ok((StatusCode::OK, Json(details)).into_response())
            }
        }
    })
    .await
}

pub(crate) async fn get_detail_handler(
    State(state): State<RoutingState>,
    headers: HeaderMap,
    touchpoint_id: Result<Path<String>, PathRejection>,
) -> Response {
    let scope = TracingScope::from_headers(&headers);
    respond(&state.faults, StoreOperation::GetById, &scope, async {
        let touchpoint_id = key_or_fault(touchpoint_id)?;
        let detail = state.details.get_by_id(&touchpoint_id, &scope).await?;
        Ok((StatusCode::OK, Json(detail)).into_response())
    })
    .await
}

pub(crate) async fn create_detail_handler(
    State(state): State<RoutingState>,
    headers: HeaderMap,
    payload: Result<Json<RoutingDetail>, JsonRejection>,
) -> Response {
    let scope = TracingScope::from_headers(&headers);
    respond(&state.faults, StoreOperation::Post, &scope, async {
        let detail = body_or_fault(payload)?;
        let stored = state.details.add(detail, &scope).await?;
        Ok((StatusCode::CREATED, Json(stored)).into_response())
    })
    .await
}

pub(crate) async fn delete_detail_handler(
    State(state): State<RoutingState>,
    headers: HeaderMap,
    touchpoint_id: Result<Path<String>, PathRejection>,
) -> Response {
    let scope = TracingScope::from_headers(&headers);
    respond(&state.faults, StoreOperation::Delete, &scope, async {
        let touchpoint_id = key_or_fault(touchpoint_id)?;
        state.details.delete(&touchpoint_id, &scope).await?;
        Ok(StatusCode::OK.into_response())
    })
    .await
}

pub(crate) async fn get_authority_handler(
    State(state): State<RoutingState>,
    headers: HeaderMap,
    lad_code: Result<Path<String>, PathRejection>,
) -> Response {
    let scope = TracingScope::from_headers(&headers);
    respond(&state.faults, StoreOperation::GetById, &scope, async {
        let lad_code = key_or_fault(lad_code)?;
        let authority = state.authorities.get(&lad_code, &scope).await?;
        Ok((StatusCode::OK, Json(authority)).into_response())
    })
    .await
}

pub(crate) async fn create_authority_handler(
    State(state): State<RoutingState>,
    headers: HeaderMap,
    payload: Result<Json<LocalAuthority>, JsonRejection>,
) -> Response {
    let scope = TracingScope::from_headers(&headers);
    respond(&state.faults, StoreOperation::Post, &scope, async {
        let authority = body_or_fault(payload)?;
        let stored = state.authorities.add(authority, &scope).await?;
        Ok((StatusCode::CREATED, Json(stored)).into_response())
    })
    .await
}

pub(crate) async fn delete_authority_handler(
    State(state): State<RoutingState>,
    headers: HeaderMap,
    lad_code: Result<Path<String>, PathRejection>,
) -> Response {
    let scope = TracingScope::from_headers(&headers);
    respond(&state.faults, StoreOperation::Delete, &scope, async {
        let lad_code = key_or_fault(lad_code)?;
        state.authorities.delete(&lad_code, &scope).await?;
        Ok(StatusCode::OK.into_response())
    })
    .await
}
