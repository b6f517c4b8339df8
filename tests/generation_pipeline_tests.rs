//! End-to-end runs of the document generation pipeline, from raw answers
//! to the print-ready rendering, without a database.

mod common;

use std::collections::HashMap;

use chrono::TimeZone;
use hipaa_compliance_server::generation::injector::EvidenceLine;
use hipaa_compliance_server::generation::normalizer::RiskLevel;
use hipaa_compliance_server::generation::{
    normalize_answers, render_policy_document, ComplianceStatus, DocumentType,
};
use serde_json::json;

fn full_questionnaire() -> serde_json::Value {
    json!({
        "q1": "yes",
        "q2": "yes",
        "q3": "yes",
        "q4": "partial",
        "q5": "yes",
        "q6": "yes",
        "q7": "quarterly",
        "q8": "no",
        "q9": "yes",
        "q10": "no",
        "q11": "yes",
        "q12": "yes",
        "q13": "yes",
        "q14": "annually",
        "q15": "yes",
        "q16": "some_vendors",
        "q17": "yes",
        "q18": "same_day"
    })
}

#[test]
fn test_full_run_produces_clean_sra_policy() {
    let answers = normalize_answers(&full_questionnaire(), &HashMap::new()).unwrap();
    let organization = common::acme_clinic();
    let evidence = vec![EvidenceLine {
        title: "Encryption configuration export".to_string(),
        uploaded_at: Some(chrono::Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap()),
        download_url: Some("https://storage.test/sign/org/kms.pdf".to_string()),
    }];

    let rendered =
        render_policy_document(DocumentType::SraPolicy, &answers, &organization, &evidence);

    assert!(!rendered.document.contains("{{"));
    assert!(!rendered.document.contains("}}"));
    assert!(rendered.document.contains("Acme Clinic"));
    assert!(rendered.document.contains("Encryption configuration export"));
    assert!(rendered.field_count > 0);
}

#[test]
fn test_missing_sra_yields_noncompliant_narrative() {
    let answers = normalize_answers(&json!({ "q1": "no" }), &HashMap::new()).unwrap();
    let organization = common::acme_clinic();

    let rendered =
        render_policy_document(DocumentType::SraPolicy, &answers, &organization, &[]);

    assert!(rendered.document.contains("Acme Clinic"));
    assert!(rendered.document.contains("has NOT conducted"));
    assert!(!rendered.document.contains("{{"));
    // Unanswered questions fall back to default prose rather than leaking.
    assert_eq!(rendered.field_count, 1);
    assert_eq!(rendered.remediation_actions.len(), 1);
    assert_eq!(rendered.remediation_actions[0].question_id, "q1");
}

#[test]
fn test_no_document_type_leaks_placeholders() {
    let answers = normalize_answers(&full_questionnaire(), &HashMap::new()).unwrap();
    let organization = common::acme_clinic();

    for document_type in DocumentType::ALL {
        let rendered = render_policy_document(document_type, &answers, &organization, &[]);
        assert!(
            !rendered.document.contains("{{"),
            "{} leaked a placeholder",
            document_type.as_str()
        );
        assert!(
            !rendered.formatted_document.contains("{{"),
            "{} formatted output leaked a placeholder",
            document_type.as_str()
        );
    }
}

#[test]
fn test_empty_answers_fall_back_to_default_prose() {
    // Every narrative field is missing, so templates must be filled from
    // the default prose table and still come out clean.
    let organization = common::acme_clinic();
    for document_type in DocumentType::ALL {
        let rendered = render_policy_document(document_type, &[], &organization, &[]);
        assert!(!rendered.document.contains("{{"), "{}", document_type.as_str());
        assert!(!rendered.document.is_empty());
        assert_eq!(rendered.field_count, 0);
    }
}

#[test]
fn test_sparse_organization_profile_still_renders() {
    let answers = normalize_answers(&json!({ "q1": "yes" }), &HashMap::new()).unwrap();
    let organization = hipaa_compliance_server::organization::model::OrganizationData {
        legal_name: "Solo Practice".to_string(),
        ..Default::default()
    };

    let rendered =
        render_policy_document(DocumentType::MasterPolicy, &answers, &organization, &[]);
    assert!(!rendered.document.contains("{{"));
    assert!(rendered.document.contains("Solo Practice"));
}

#[test]
fn test_remediation_actions_cover_gaps_only() {
    let answers = normalize_answers(&full_questionnaire(), &HashMap::new()).unwrap();
    let organization = common::acme_clinic();

    let rendered =
        render_policy_document(DocumentType::SecurityPolicy, &answers, &organization, &[]);

    // q4 partial, q8 no, q10 no, q16 partial.
    assert_eq!(rendered.remediation_actions.len(), 4);
    let gap_questions: Vec<&str> = rendered
        .remediation_actions
        .iter()
        .map(|a| a.question_id.as_str())
        .collect();
    assert!(gap_questions.contains(&"q4"));
    assert!(gap_questions.contains(&"q8"));
    assert!(gap_questions.contains(&"q10"));
    assert!(gap_questions.contains(&"q16"));

    let baa_gap = rendered
        .remediation_actions
        .iter()
        .find(|a| a.question_id == "q16")
        .unwrap();
    assert_eq!(baa_gap.risk_level, RiskLevel::High);
}

#[test]
fn test_compliant_and_noncompliant_answers_change_narrative() {
    let organization = common::acme_clinic();

    let compliant = normalize_answers(&json!({ "q4": "yes" }), &HashMap::new()).unwrap();
    let non_compliant = normalize_answers(&json!({ "q4": "no" }), &HashMap::new()).unwrap();
    assert_eq!(compliant[0].compliance_status, ComplianceStatus::Compliant);
    assert_eq!(
        non_compliant[0].compliance_status,
        ComplianceStatus::NonCompliant
    );

    let doc_compliant =
        render_policy_document(DocumentType::SecurityPolicy, &compliant, &organization, &[]);
    let doc_gap = render_policy_document(
        DocumentType::SecurityPolicy,
        &non_compliant,
        &organization,
        &[],
    );
    assert_ne!(doc_compliant.document, doc_gap.document);
}

#[test]
fn test_formatted_document_is_printable_html() {
    let answers = normalize_answers(&full_questionnaire(), &HashMap::new()).unwrap();
    let organization = common::acme_clinic();

    let rendered =
        render_policy_document(DocumentType::PrivacyPolicy, &answers, &organization, &[]);

    assert!(rendered.formatted_document.starts_with("<!DOCTYPE html>"));
    assert!(rendered.formatted_document.contains("size: A4"));
    assert!(rendered
        .formatted_document
        .contains(DocumentType::PrivacyPolicy.title()));
    assert!(rendered
        .formatted_document
        .contains(DocumentType::PrivacyPolicy.policy_id()));
}
