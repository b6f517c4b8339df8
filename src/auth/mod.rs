//! Session validation.
//!
//! Tokens are issued by the external identity provider; this server only
//! validates them and trusts the `sub` claim to scope every data lookup.

pub mod jwt;
pub mod middleware;
pub mod model;
