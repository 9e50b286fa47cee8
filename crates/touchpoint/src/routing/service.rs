use std::sync::Arc;

use super::domain::{LocalAuthority, RoutingDetail};
use super::faults::Fault;
use super::location::ActionMap;
use super::scope::LogScope;
use super::store::{Document, DocumentStore};

/// Routing detail lookups and mutations, including resolution from a location expression.
pub struct RoutingDetailService {
    details: DocumentStore<RoutingDetail>,
    actions: Arc<ActionMap>,
}

impl RoutingDetailService {
    pub fn new(details: DocumentStore<RoutingDetail>, actions: Arc<ActionMap>) -> Self {
        Self { details, actions }
    }

    pub async fn get_by_id(
        &self,
        touchpoint_id: &str,
        scope: &dyn LogScope,
    ) -> Result<RoutingDetail, Fault> {
        scope.enter_method("RoutingDetailService::get_by_id");
        let touchpoint_id = required(touchpoint_id, "touchpoint id")?;
        let detail = self.details.get(touchpoint_id).await?;
        scope.exit_method("RoutingDetailService::get_by_id");
        Ok(detail)
    }

    /// Resolves `location` to a touchpoint and returns that touchpoint's routing detail.
    pub async fn get_by_location(
        &self,
        location: &str,
        scope: &dyn LogScope,
    ) -> Result<RoutingDetail, Fault> {
        scope.enter_method("RoutingDetailService::get_by_location");
        if location.trim().is_empty() {
            return Err(Fault::malformed("location is empty"));
        }

        let touchpoint_id = self.actions.classify_and_resolve(location, scope).await?;
        scope.information(&format!(
            "location '{location}' resolved to touchpoint {touchpoint_id}"
        ));
        let detail = self.details.get(&touchpoint_id).await?;
        scope.exit_method("RoutingDetailService::get_by_location");
        Ok(detail)
    }

    pub async fn get_all(&self, scope: &dyn LogScope) -> Result<Vec<RoutingDetail>, Fault> {
        scope.enter_method("RoutingDetailService::get_all");
        let details = self.details.get_all().await?;
        scope.exit_method("RoutingDetailService::get_all");
        Ok(details)
    }

    pub async fn add(
        &self,
        detail: RoutingDetail,
        scope: &dyn LogScope,
    ) -> Result<RoutingDetail, Fault> {
        scope.enter_method("RoutingDetailService::add");
        ensure_valid(&detail)?;
        let stored = self.details.add(detail).await?;
        scope.information(&format!("created routing detail {}", stored.touchpoint_id));
        scope.exit_method("RoutingDetailService::add");
        Ok(stored)
    }

    pub async fn delete(&self, touchpoint_id: &str, scope: &dyn LogScope) -> Result<(), Fault> {
        scope.enter_method("RoutingDetailService::delete");
        let touchpoint_id = required(touchpoint_id, "touchpoint id")?;
        self.details.delete(touchpoint_id).await?;
        scope.information(&format!("deleted routing detail {touchpoint_id}"));
        scope.exit_method("RoutingDetailService::delete");
        Ok(())
    }
}

/// Local authority records bridging district codes to touchpoints.
pub struct LocalAuthorityService {
    authorities: DocumentStore<LocalAuthority>,
}

impl LocalAuthorityService {
    pub fn new(authorities: DocumentStore<LocalAuthority>) -> Self {
        Self { authorities }
    }

    pub async fn get(&self, lad_code: &str, scope: &dyn LogScope) -> Result<LocalAuthority, Fault> {
        scope.enter_method("LocalAuthorityService::get");
        let lad_code = required(lad_code, "LAD code")?;
        let authority = self.authorities.get(lad_code).await?;
        scope.exit_method("LocalAuthorityService::get");
        Ok(authority)
    }

    pub async fn add(
        &self,
        authority: LocalAuthority,
        scope: &dyn LogScope,
    ) -> Result<LocalAuthority, Fault> {
        scope.enter_method("LocalAuthorityService::add");
        ensure_valid(&authority)?;
        let stored = self.authorities.add(authority).await?;
        scope.information(&format!("created local authority {}", stored.lad_code));
        scope.exit_method("LocalAuthorityService::add");
        Ok(stored)
    }

    pub async fn delete(&self, lad_code: &str, scope: &dyn LogScope) -> Result<(), Fault> {
        scope.enter_method("LocalAuthorityService::delete");
        let lad_code = required(lad_code, "LAD code")?;
        self.authorities.delete(lad_code).await?;
        scope.information(&format!("deleted local authority {lad_code}"));
        scope.exit_method("LocalAuthorityService::delete");
        Ok(())
    }
}

fn required<'a>(value: &'a str, what: &str) -> Result<&'a str, Fault> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(Fault::malformed(format!("{what} is empty")))
    } else {
        Ok(trimmed)
    }
}

fn ensure_valid<T: Document>(record: &T) -> Result<(), Fault> {
    let violations = record.violations();
    if violations.is_empty() {
        Ok(())
    } else {
        Err(Fault::UnprocessableEntity(violations))
    }
}
