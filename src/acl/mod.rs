//! Access control module
//!
//! Resolves which topic patterns a principal may use and evaluates
//! permission decisions against them.

mod engine;
mod resolver;

pub use engine::{AccessRequest, Authorize, PermissionEngine};
pub use resolver::resolve_topics;
