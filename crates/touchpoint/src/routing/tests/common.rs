use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::routing::domain::{LocalAuthority, RoutingDetail};
use crate::routing::postcodes::{PostcodeClient, PostcodeClientError, PostcodeResult};
use crate::routing::scope::LogScope;
use crate::routing::store::{DocumentClient, InMemoryDocumentClient};
use crate::routing::{build_state, RoutingState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum ScopeEvent {
    Enter(String),
    Exit(String),
    Information(String),
    ExceptionDetail(String),
}

#[derive(Default)]
pub(super) struct RecordingScope {
    events: Mutex<Vec<ScopeEvent>>,
}

impl RecordingScope {
    pub(super) fn events(&self) -> Vec<ScopeEvent> {
        self.events.lock().expect("scope mutex poisoned").clone()
    }

    pub(super) fn messages(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ScopeEvent::Information(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub(super) fn exception_details(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, ScopeEvent::ExceptionDetail(_)))
            .count()
    }

    fn push(&self, event: ScopeEvent) {
        self.events.lock().expect("scope mutex poisoned").push(event);
    }
}

impl LogScope for RecordingScope {
    fn enter_method(&self, name: &str) {
        self.push(ScopeEvent::Enter(name.to_string()));
    }

    fn exit_method(&self, name: &str) {
        self.push(ScopeEvent::Exit(name.to_string()));
    }

    fn information(&self, message: &str) {
        self.push(ScopeEvent::Information(message.to_string()));
    }

    fn exception_detail(&self, error: &(dyn Error + 'static)) {
        self.push(ScopeEvent::ExceptionDetail(format!("{error:?}")));
    }
}

/// Canned postcode service keyed by postcode and outward code.
#[derive(Default)]
pub(super) struct StubPostcodes {
    postcodes: HashMap<String, PostcodeResult>,
    outward: HashMap<String, Vec<String>>,
    pub(super) unavailable: bool,
    calls: Mutex<Vec<String>>,
}

impl StubPostcodes {
    pub(super) fn with_postcode(mut self, postcode: &str, district: &str) -> Self {
        let (outcode, incode) = postcode.split_once(' ').unwrap_or((postcode, ""));
        self.postcodes.insert(
            postcode.to_string(),
            PostcodeResult {
                postcode: postcode.to_string(),
                outcode: outcode.to_string(),
                incode: incode.to_string(),
                admin_district_code: district.to_string(),
            },
        );
        self
    }

    pub(super) fn with_outward(mut self, outward: &str, candidates: &[&str]) -> Self {
        self.outward.insert(
            outward.to_string(),
            candidates.iter().map(|value| value.to_string()).collect(),
        );
        self
    }

    pub(super) fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    fn record(&self, call: String) -> Result<(), PostcodeClientError> {
        self.calls.lock().expect("calls mutex poisoned").push(call);
        if self.unavailable {
            return Err(PostcodeClientError::Api {
                status: 503,
                message: "service unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PostcodeClient for StubPostcodes {
    async fn lookup(&self, postcode: &str) -> Result<Option<PostcodeResult>, PostcodeClientError> {
        self.record(format!("lookup:{postcode}"))?;
        Ok(self.postcodes.get(postcode).cloned())
    }

    async fn autocomplete(
        &self,
        outward_code: &str,
        limit: usize,
    ) -> Result<Vec<String>, PostcodeClientError> {
        self.record(format!("autocomplete:{outward_code}:{limit}"))?;
        Ok(self
            .outward
            .get(outward_code)
            .map(|candidates| candidates.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn validate(&self, postcode: &str) -> Result<bool, PostcodeClientError> {
        self.record(format!("validate:{postcode}"))?;
        Ok(self.postcodes.contains_key(postcode))
    }
}

pub(super) fn coventry_postcodes() -> StubPostcodes {
    StubPostcodes::default()
        .with_postcode("CV1 4JP", "E08000026")
        .with_postcode("CV1 1AA", "E08000026")
        .with_postcode("LE1 1AA", "E06000016")
        .with_outward("CV1", &["CV1 1AA", "CV1 1AB"])
        .with_outward("ZZ9", &[])
}

pub(super) fn detail(touchpoint_id: &str) -> RoutingDetail {
    RoutingDetail {
        touchpoint_id: touchpoint_id.to_string(),
        area: "West Midlands".to_string(),
        telephone_number: "0121 496 0000".to_string(),
        sms_number: "07700 900123".to_string(),
        email_address: "westmidlands@example.org".to_string(),
    }
}

pub(super) fn authority(lad_code: &str, touchpoint_id: &str, name: &str) -> LocalAuthority {
    LocalAuthority {
        lad_code: lad_code.to_string(),
        touchpoint_id: touchpoint_id.to_string(),
        name: name.to_string(),
    }
}

pub(super) fn seeded_state(postcodes: StubPostcodes) -> (RoutingState, Arc<StubPostcodes>) {
    let documents: Arc<dyn DocumentClient> = Arc::new(InMemoryDocumentClient::new());
    let postcodes = Arc::new(postcodes);
    let state = build_state(documents, postcodes.clone(), 1);
    (state, postcodes)
}

pub(super) async fn seed_coventry(state: &RoutingState) {
    let scope = RecordingScope::default();
    state
        .details
        .add(detail("0000000123"), &scope)
        .await
        .expect("seed routing detail");
    state
        .authorities
        .add(authority("E08000026", "0000000123", "Coventry"), &scope)
        .await
        .expect("seed local authority");
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}

pub(super) fn fallback_json() -> Value {
    serde_json::to_value(RoutingDetail::national_fallback()).expect("fallback serializes")
}
