//! Application-level counters exported alongside the HTTP metrics on
//! `/metrics`.

use lazy_static::lazy_static;
use prometheus::{IntCounterVec, Opts, Registry};

lazy_static! {
    pub static ref DOCUMENTS_GENERATED: IntCounterVec = IntCounterVec::new(
        Opts::new(
            "documents_generated_total",
            "Policy documents generated, by document type",
        ),
        &["document_type"],
    )
    .unwrap();
    pub static ref NOTIFICATION_LETTERS_GENERATED: IntCounterVec = IntCounterVec::new(
        Opts::new(
            "notification_letters_generated_total",
            "Breach notification letters generated",
        ),
        &["organization_id"],
    )
    .unwrap();
}

pub fn register(registry: &Registry) -> Result<(), prometheus::Error> {
    registry.register(Box::new(DOCUMENTS_GENERATED.clone()))?;
    registry.register(Box::new(NOTIFICATION_LETTERS_GENERATED.clone()))?;
    Ok(())
}
