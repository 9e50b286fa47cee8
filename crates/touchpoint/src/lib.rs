//! Touchpoint routing: resolves the regional contact point for a touchpoint identifier or a UK
//! location expression, and keeps the routing-detail and local-authority records behind it.

#[macro_use]
mod macros;

pub mod config;
pub mod error;
pub mod routing;
pub mod telemetry;
