//! Policy document generation pipeline.
//!
//! Six stages run linearly per request, with no state carried between
//! requests: normalize answers, generate narrative fields, inject into the
//! legal-text template together with evidence and organization data, clean
//! remaining placeholders, and wrap the result for print.
//!
//! The final document must never contain a raw `{{...}}` token; the
//! cleanup stage is run twice and re-verified here as a last line of
//! defense.

pub mod cleanup;
pub mod fields;
pub mod formatter;
pub mod handlers;
pub mod injector;
pub mod normalizer;
pub mod templates;

pub use fields::{generate_fields, remediation_actions, DocumentFieldSet, RemediationAction};
pub use normalizer::{normalize_answers, ComplianceStatus, QuestionAnswer, RiskLevel};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::organization::model::OrganizationData;
use injector::EvidenceLine;

/// The closed set of policy documents this server can generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentType {
    SraPolicy,
    MasterPolicy,
    PrivacyPolicy,
    SecurityPolicy,
    AccessControlPolicy,
    ContingencyPlan,
    IncidentResponsePolicy,
    WorkforceTrainingPolicy,
    BaaPolicy,
}

impl DocumentType {
    pub const ALL: [DocumentType; 9] = [
        DocumentType::SraPolicy,
        DocumentType::MasterPolicy,
        DocumentType::PrivacyPolicy,
        DocumentType::SecurityPolicy,
        DocumentType::AccessControlPolicy,
        DocumentType::ContingencyPlan,
        DocumentType::IncidentResponsePolicy,
        DocumentType::WorkforceTrainingPolicy,
        DocumentType::BaaPolicy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::SraPolicy => "sra-policy",
            DocumentType::MasterPolicy => "master-policy",
            DocumentType::PrivacyPolicy => "privacy-policy",
            DocumentType::SecurityPolicy => "security-policy",
            DocumentType::AccessControlPolicy => "access-control-policy",
            DocumentType::ContingencyPlan => "contingency-plan",
            DocumentType::IncidentResponsePolicy => "incident-response-policy",
            DocumentType::WorkforceTrainingPolicy => "workforce-training-policy",
            DocumentType::BaaPolicy => "baa-policy",
        }
    }

    pub fn parse(value: &str) -> Option<DocumentType> {
        DocumentType::ALL
            .iter()
            .copied()
            .find(|doc| doc.as_str() == value)
    }

    /// Stable policy identifier printed in headers and referenced by
    /// evidence links.
    pub fn policy_id(&self) -> &'static str {
        match self {
            DocumentType::SraPolicy => "HIPAA-SRA-001",
            DocumentType::MasterPolicy => "HIPAA-MST-001",
            DocumentType::PrivacyPolicy => "HIPAA-PRV-001",
            DocumentType::SecurityPolicy => "HIPAA-SEC-001",
            DocumentType::AccessControlPolicy => "HIPAA-ACC-001",
            DocumentType::ContingencyPlan => "HIPAA-CNT-001",
            DocumentType::IncidentResponsePolicy => "HIPAA-INC-001",
            DocumentType::WorkforceTrainingPolicy => "HIPAA-TRN-001",
            DocumentType::BaaPolicy => "HIPAA-BAA-001",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DocumentType::SraPolicy => "Security Risk Analysis Policy",
            DocumentType::MasterPolicy => "Master HIPAA Compliance Policy",
            DocumentType::PrivacyPolicy => "Notice of Privacy Practices Policy",
            DocumentType::SecurityPolicy => "Information Security Policy",
            DocumentType::AccessControlPolicy => "Access Control Policy",
            DocumentType::ContingencyPlan => "Contingency and Disaster Recovery Plan",
            DocumentType::IncidentResponsePolicy => "Security Incident Response Policy",
            DocumentType::WorkforceTrainingPolicy => "Workforce Training Policy",
            DocumentType::BaaPolicy => "Business Associate Agreement Policy",
        }
    }

    pub fn supported_values() -> String {
        DocumentType::ALL
            .iter()
            .map(|doc| doc.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Fully rendered output of one pipeline run.
#[derive(Debug)]
pub struct RenderedPolicy {
    pub document: String,
    pub formatted_document: String,
    pub remediation_actions: Vec<RemediationAction>,
    pub field_count: usize,
}

/// Run the pure tail of the pipeline: fields → inject → clean (twice) →
/// verify → format. Callers are responsible for loading the organization
/// and evidence beforehand.
pub fn render_policy_document(
    document_type: DocumentType,
    answers: &[QuestionAnswer],
    organization: &OrganizationData,
    evidence: &[EvidenceLine],
) -> RenderedPolicy {
    let mut field_sets = generate_fields(answers);
    let field_set = field_sets
        .remove(&document_type)
        .unwrap_or_else(|| DocumentFieldSet::empty(document_type));
    let field_count = field_set.fields.len();

    let template = templates::template_for(document_type);
    let injected = injector::inject(template, &field_set, organization, evidence);

    // Cleanup is idempotent; the double invocation is deliberate.
    let mut document = cleanup::cleanup(&cleanup::cleanup(&injected));
    if document.contains("{{") {
        log::warn!(
            "unresolved placeholder survived cleanup for {}, applying unconditional strip",
            document_type.as_str()
        );
        document = cleanup::force_strip(&document);
    }

    let formatted_document = formatter::format_print_document(
        &document,
        document_type.title(),
        Some(document_type.policy_id()),
    );

    RenderedPolicy {
        document,
        formatted_document,
        remediation_actions: remediation_actions(answers),
        field_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        for doc in DocumentType::ALL {
            assert_eq!(DocumentType::parse(doc.as_str()), Some(doc));
        }
        assert_eq!(DocumentType::parse("not-a-real-type"), None);
    }

    #[test]
    fn test_supported_values_lists_all_nine() {
        let listed = DocumentType::supported_values();
        assert_eq!(listed.split(", ").count(), 9);
        assert!(listed.contains("sra-policy"));
        assert!(listed.contains("baa-policy"));
    }
}
