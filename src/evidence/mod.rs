//! Compliance evidence: records, lifecycle status, document linkage, and
//! the locator used by document generation.

pub mod handlers;
pub mod locator;
pub mod model;
