//! Location expressions: classification and the per-category resolution strategies.

mod actions;
mod classifier;

pub use actions::{
    ActionMap, AuthorityLookup, LocationResolver, OutwardCodeResolver, PostcodeResolver,
};
pub use classifier::{classify, ExpressionCategory};
