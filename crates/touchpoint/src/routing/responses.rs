use std::collections::HashMap;
use std::error::Error;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

use super::domain::RoutingDetail;
use super::faults::{Fault, FaultKind};
use super::scope::LogScope;

/// The kind of request being served; selects which fault table applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Get,
    Post,
    Patch,
    Delete,
}

/// Body of a mapped fault response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Empty,
    Message(String),
    Json(Value),
}

/// Status and body produced for a fault.
#[derive(Debug, Clone, PartialEq)]
pub struct FaultResponse {
    pub status: StatusCode,
    pub body: ResponseBody,
}

impl FaultResponse {
    fn empty(status: StatusCode) -> Self {
        Self {
            status,
            body: ResponseBody::Empty,
        }
    }

    fn message(status: StatusCode, fault: &Fault) -> Self {
        Self {
            status,
            body: ResponseBody::Message(fault.to_string()),
        }
    }
}

impl IntoResponse for FaultResponse {
    fn into_response(self) -> Response {
        match self.body {
            ResponseBody::Empty => self.status.into_response(),
            ResponseBody::Message(message) => (
                self.status,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                message,
            )
                .into_response(),
            ResponseBody::Json(value) => (self.status, Json(value)).into_response(),
        }
    }
}

type FaultHandler = fn(&Fault) -> FaultResponse;

/// Fault kind to handler mapping for one operation group. Lookups are exact; anything not
/// registered goes to the fallback handler.
pub struct FaultTable {
    handlers: HashMap<FaultKind, FaultHandler>,
    fallback: FaultHandler,
}

impl FaultTable {
    fn new(entries: &[(FaultKind, FaultHandler)], fallback: FaultHandler) -> Self {
        Self {
            handlers: entries.iter().copied().collect(),
            fallback,
        }
    }

    pub fn is_registered(&self, kind: FaultKind) -> bool {
        self.handlers.contains_key(&kind)
    }
}

/// Maps faults to HTTP responses according to the operation being served.
///
/// Get operations degrade to the national fallback record for most faults so callers always
/// receive a routing destination; mutations report faults honestly.
pub struct FaultResponder {
    default: FaultTable,
    get: FaultTable,
    post: FaultTable,
}

impl Default for FaultResponder {
    fn default() -> Self {
        Self::new()
    }
}

impl FaultResponder {
    pub fn new() -> Self {
        let default = FaultTable::new(
            &[
                (FaultKind::MalformedRequest, bad_request),
                (FaultKind::NoContent, no_content_message),
                (FaultKind::ConflictingResource, conflict),
                (FaultKind::UnprocessableEntity, unprocessable),
                (FaultKind::AccessForbidden, forbidden),
                (FaultKind::Unauthorized, unauthorized),
                (FaultKind::PostcodeApi, bad_request),
                (FaultKind::PostcodeEmptyResponse, bad_request),
                (FaultKind::InvalidPostcode, bad_request),
            ],
            internal_error,
        );

        let get = FaultTable::new(
            &[
                (FaultKind::MalformedRequest, national_fallback),
                (FaultKind::NoContent, national_fallback),
                (FaultKind::ConflictingResource, conflict),
                (FaultKind::UnprocessableEntity, unprocessable),
                (FaultKind::AccessForbidden, forbidden),
                (FaultKind::Unauthorized, unauthorized),
                (FaultKind::PostcodeApi, national_fallback),
                (FaultKind::PostcodeEmptyResponse, national_fallback),
                (FaultKind::InvalidPostcode, national_fallback),
            ],
            national_fallback,
        );

        let post = FaultTable::new(
            &[
                (FaultKind::MalformedRequest, bad_request),
                (FaultKind::NoContent, no_content_message),
                (FaultKind::ConflictingResource, conflict),
                (FaultKind::UnprocessableEntity, unprocessable),
                (FaultKind::AccessForbidden, forbidden),
                (FaultKind::Unauthorized, unauthorized),
                (FaultKind::PostcodeApi, no_content),
                (FaultKind::PostcodeEmptyResponse, no_content),
                (FaultKind::InvalidPostcode, no_content),
            ],
            internal_error,
        );

        Self { default, get, post }
    }

    pub fn table_for(&self, operation: OperationKind) -> &FaultTable {
        match operation {
            OperationKind::Get => &self.get,
            OperationKind::Post => &self.post,
            OperationKind::Patch | OperationKind::Delete => &self.default,
        }
    }

    pub fn response_for(
        &self,
        fault: &Fault,
        operation: OperationKind,
        scope: &dyn LogScope,
    ) -> FaultResponse {
        let table = self.table_for(operation);
        match table.handlers.get(&fault.kind()) {
            Some(handler) => {
                log_fault_chain(scope, fault);
                handler(fault)
            }
            None => {
                scope.exception_detail(fault);
                (table.fallback)(fault)
            }
        }
    }
}

fn log_fault_chain(scope: &dyn LogScope, error: &(dyn Error + 'static)) {
    scope.information(&error.to_string());
    if let Some(inner) = error.source() {
        log_fault_chain(scope, inner);
    }
}

fn bad_request(_: &Fault) -> FaultResponse {
    FaultResponse::empty(StatusCode::BAD_REQUEST)
}

fn no_content(_: &Fault) -> FaultResponse {
    FaultResponse::empty(StatusCode::NO_CONTENT)
}

fn no_content_message(fault: &Fault) -> FaultResponse {
    FaultResponse::message(StatusCode::NO_CONTENT, fault)
}

fn conflict(_: &Fault) -> FaultResponse {
    FaultResponse::empty(StatusCode::CONFLICT)
}

fn unprocessable(fault: &Fault) -> FaultResponse {
    match fault {
        Fault::UnprocessableEntity(violations) => FaultResponse {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            body: ResponseBody::Json(serde_json::json!(violations)),
        },
        other => FaultResponse::message(StatusCode::UNPROCESSABLE_ENTITY, other),
    }
}

fn forbidden(fault: &Fault) -> FaultResponse {
    FaultResponse::message(StatusCode::FORBIDDEN, fault)
}

fn unauthorized(_: &Fault) -> FaultResponse {
    FaultResponse::empty(StatusCode::UNAUTHORIZED)
}

fn internal_error(fault: &Fault) -> FaultResponse {
    FaultResponse::message(StatusCode::INTERNAL_SERVER_ERROR, fault)
}

fn national_fallback(_: &Fault) -> FaultResponse {
    FaultResponse {
        status: StatusCode::OK,
        body: ResponseBody::Json(serde_json::json!(RoutingDetail::national_fallback())),
    }
}
