//! Startup loading of routing details and local authorities from a JSON file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::domain::{LocalAuthority, RoutingDetail};
use super::faults::Fault;
use super::router::RoutingState;
use super::scope::LogScope;

#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
    #[serde(rename = "RoutingDetails", default)]
    pub routing_details: Vec<RoutingDetail>,
    #[serde(rename = "LocalAuthorities", default)]
    pub local_authorities: Vec<LocalAuthority>,
}

/// Counts of records written by [`apply_seed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub routing_details: usize,
    pub local_authorities: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("seed file {path} is not valid seed JSON")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("seed record '{key}' was rejected")]
    Rejected {
        key: String,
        #[source]
        source: Fault,
    },
}

pub fn read_seed(path: &Path) -> Result<SeedData, SeedError> {
    let raw = fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| SeedError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes seed records through the regular add path, so validation and conflicts apply.
pub async fn apply_seed(
    state: &RoutingState,
    data: SeedData,
    scope: &dyn LogScope,
) -> Result<SeedSummary, SeedError> {
    let mut summary = SeedSummary {
        routing_details: 0,
        local_authorities: 0,
    };

    for detail in data.routing_details {
        let key = detail.touchpoint_id.clone();
        state
            .details
            .add(detail, scope)
            .await
            .map_err(|source| SeedError::Rejected { key, source })?;
        summary.routing_details += 1;
    }

    for authority in data.local_authorities {
        let key = authority.lad_code.clone();
        state
            .authorities
            .add(authority, scope)
            .await
            .map_err(|source| SeedError::Rejected { key, source })?;
        summary.local_authorities += 1;
    }

    Ok(summary)
}
