//! Security incident log and breach-notification letters.

pub mod handlers;
pub mod model;
