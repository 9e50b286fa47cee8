//! Touchpoint resolution and the routing-detail / local-authority record endpoints.
//!
//! Domain code raises typed [`Fault`]s freely; the router runs every request behind
//! [`safe::attempt_async`] and turns faults into responses through the [`FaultResponder`]
//! table for the request's operation kind.

pub mod domain;
pub mod faults;
pub mod location;
pub mod postcodes;
pub mod responses;
pub mod router;
pub mod safe;
pub mod scope;
pub mod seed;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{FieldViolation, LocalAuthority, RoutingDetail, NATIONAL_TOUCHPOINT_ID};
pub use faults::{Fault, FaultKind};
pub use location::{classify, ActionMap, ExpressionCategory, LocationResolver};
pub use postcodes::{PostcodeClient, PostcodeClientError, PostcodeResult, PostcodesIoClient};
pub use responses::{FaultResponder, FaultResponse, OperationKind, ResponseBody};
pub use router::{routing_router, RoutingState};
pub use scope::{LogScope, TracingScope};
pub use seed::{apply_seed, read_seed, SeedData, SeedError, SeedSummary};
pub use service::{LocalAuthorityService, RoutingDetailService};
pub use store::{
    DocumentClient, DocumentPath, DocumentStore, InMemoryDocumentClient, StoreError,
    StoreOperation,
};

use std::sync::Arc;

/// Wires the services, action map, and fault responder over one document client.
pub fn build_state(
    documents: Arc<dyn DocumentClient>,
    postcodes: Arc<dyn PostcodeClient>,
    autocomplete_limit: usize,
) -> RoutingState {
    let authority_store: DocumentStore<LocalAuthority> = DocumentStore::new(Arc::clone(&documents));
    let actions = Arc::new(ActionMap::new(
        postcodes,
        Arc::new(authority_store.clone()),
        autocomplete_limit,
    ));

    RoutingState {
        details: Arc::new(RoutingDetailService::new(
            DocumentStore::new(documents),
            actions,
        )),
        authorities: Arc::new(LocalAuthorityService::new(authority_store)),
        faults: Arc::new(FaultResponder::new()),
    }
}
