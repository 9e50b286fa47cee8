use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::classifier::{classify, ExpressionCategory};
use crate::routing::domain::LocalAuthority;
use crate::routing::faults::Fault;
use crate::routing::postcodes::PostcodeClient;
use crate::routing::scope::LogScope;
use crate::routing::store::DocumentStore;

/// Turns a location expression of one category into a touchpoint id.
#[async_trait]
pub trait LocationResolver: Send + Sync {
    async fn resolve(&self, expression: &str, scope: &dyn LogScope) -> Result<String, Fault>;
}

/// Local authority lookup by administrative district code.
#[async_trait]
pub trait AuthorityLookup: Send + Sync {
    async fn authority(&self, lad_code: &str) -> Result<LocalAuthority, Fault>;
}

#[async_trait]
impl AuthorityLookup for DocumentStore<LocalAuthority> {
    async fn authority(&self, lad_code: &str) -> Result<LocalAuthority, Fault> {
        self.get(lad_code).await
    }
}

/// Resolver bound to categories with no strategy; fails only when invoked.
struct UnmappedResolver;

#[async_trait]
impl LocationResolver for UnmappedResolver {
    async fn resolve(&self, expression: &str, _scope: &dyn LogScope) -> Result<String, Fault> {
        Err(Fault::malformed(format!(
            "'{expression}' is not a recognised location expression"
        )))
    }
}

/// Town names pass through unchanged.
// TODO: derive a postcode or outward code from the town name and delegate to the postcode
// resolver once a place-name gazetteer is available.
struct TownResolver;

#[async_trait]
impl LocationResolver for TownResolver {
    async fn resolve(&self, expression: &str, scope: &dyn LogScope) -> Result<String, Fault> {
        scope.enter_method("TownResolver::resolve");
        scope.information(&format!("town '{expression}' is not geocoded, passing through"));
        scope.exit_method("TownResolver::resolve");
        Ok(expression.to_string())
    }
}

/// Looks a full postcode up and follows its administrative district to a touchpoint.
pub struct PostcodeResolver {
    postcodes: Arc<dyn PostcodeClient>,
    authorities: Arc<dyn AuthorityLookup>,
}

impl PostcodeResolver {
    pub fn new(postcodes: Arc<dyn PostcodeClient>, authorities: Arc<dyn AuthorityLookup>) -> Self {
        Self {
            postcodes,
            authorities,
        }
    }
}

#[async_trait]
impl LocationResolver for PostcodeResolver {
    async fn resolve(&self, expression: &str, scope: &dyn LogScope) -> Result<String, Fault> {
        scope.enter_method("PostcodeResolver::resolve");

        let postcode = self
            .postcodes
            .lookup(expression)
            .await?
            .ok_or_else(|| Fault::InvalidPostcode(expression.to_string()))?;
        scope.information(&format!(
            "found postcode {} {}",
            postcode.outcode, postcode.incode
        ));

        if postcode.admin_district_code.is_empty() {
            return Err(Fault::InvalidPostcode(expression.to_string()));
        }
        scope.information(&format!(
            "seeking local authority for district {}",
            postcode.admin_district_code
        ));

        let authority = self
            .authorities
            .authority(&postcode.admin_district_code)
            .await?;
        scope.information(&format!(
            "found local authority {} ({}) routed to touchpoint {}",
            authority.name, authority.lad_code, authority.touchpoint_id
        ));

        scope.exit_method("PostcodeResolver::resolve");
        Ok(authority.touchpoint_id)
    }
}

/// Expands an outward code to its first known postcode and resolves that.
pub struct OutwardCodeResolver {
    postcodes: Arc<dyn PostcodeClient>,
    postcode: Arc<PostcodeResolver>,
    limit: usize,
}

impl OutwardCodeResolver {
    pub fn new(
        postcodes: Arc<dyn PostcodeClient>,
        postcode: Arc<PostcodeResolver>,
        limit: usize,
    ) -> Self {
        Self {
            postcodes,
            postcode,
            limit,
        }
    }
}

#[async_trait]
impl LocationResolver for OutwardCodeResolver {
    async fn resolve(&self, expression: &str, scope: &dyn LogScope) -> Result<String, Fault> {
        scope.enter_method("OutwardCodeResolver::resolve");

        let candidates = self.postcodes.autocomplete(expression, self.limit).await?;
        let first = candidates.into_iter().next().ok_or_else(|| {
            Fault::malformed(format!("no postcodes found for outward code '{expression}'"))
        })?;
        scope.information(&format!(
            "outward code {expression} expanded to postcode {first}"
        ));

        let touchpoint = self.postcode.resolve(&first, scope).await?;
        scope.exit_method("OutwardCodeResolver::resolve");
        Ok(touchpoint)
    }
}

/// Resolver per expression category, fixed at construction.
pub struct ActionMap {
    actions: HashMap<ExpressionCategory, Arc<dyn LocationResolver>>,
    unmapped: Arc<dyn LocationResolver>,
}

impl ActionMap {
    pub fn new(
        postcodes: Arc<dyn PostcodeClient>,
        authorities: Arc<dyn AuthorityLookup>,
        autocomplete_limit: usize,
    ) -> Self {
        let postcode = Arc::new(PostcodeResolver::new(Arc::clone(&postcodes), authorities));
        let outward = OutwardCodeResolver::new(postcodes, Arc::clone(&postcode), autocomplete_limit);

        let mut actions: HashMap<ExpressionCategory, Arc<dyn LocationResolver>> = HashMap::new();
        actions.insert(ExpressionCategory::Town, Arc::new(TownResolver));
        actions.insert(ExpressionCategory::Outward, Arc::new(outward));
        actions.insert(ExpressionCategory::Postcode, postcode);

        Self {
            actions,
            unmapped: Arc::new(UnmappedResolver),
        }
    }

    /// The resolver bound to `category`. Never fails; categories without a strategy get a
    /// resolver that raises `MalformedRequest` when called.
    pub fn action_for(&self, category: ExpressionCategory) -> Arc<dyn LocationResolver> {
        self.actions
            .get(&category)
            .map_or_else(|| Arc::clone(&self.unmapped), Arc::clone)
    }

    /// Classifies `location` and runs the matching resolver.
    pub async fn classify_and_resolve(
        &self,
        location: &str,
        scope: &dyn LogScope,
    ) -> Result<String, Fault> {
        let category = classify(location);
        scope.information(&format!(
            "location '{location}' classified as {}",
            category.label()
        ));
        self.action_for(category).resolve(location, scope).await
    }
}
