//! Template injection.
//!
//! Substitutes generated fields, the evidence statement, and organization
//! metadata into a legal-text template, in that order. Every substitution
//! is global because templates reuse tokens. Tokens with no matching
//! source are deliberately left in place for the cleanup stage.

use chrono::{DateTime, Utc};

use super::fields::DocumentFieldSet;
use crate::organization::model::OrganizationData;

/// Organization metadata tokens the injector resolves. Each falls back to
/// an empty string when the organization field is null.
pub const ORGANIZATION_TOKEN_NAMES: &[&str] = &[
    "ORGANIZATION_NAME",
    "ORGANIZATION_ADDRESS",
    "ORGANIZATION_PHONE",
    "EIN",
    "NPI",
    "PRIVACY_OFFICER_NAME",
    "PRIVACY_OFFICER_EMAIL",
    "SECURITY_OFFICER_NAME",
    "SECURITY_OFFICER_EMAIL",
    "EFFECTIVE_DATE",
];

/// One evidence item as rendered into the document, decoupled from where
/// it came from (database lookup or caller-supplied override).
#[derive(Debug, Clone)]
pub struct EvidenceLine {
    pub title: String,
    pub uploaded_at: Option<DateTime<Utc>>,
    pub download_url: Option<String>,
}

fn token(name: &str) -> String {
    format!("{{{{{}}}}}", name)
}

fn compose_address(org: &OrganizationData) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(line1) = &org.address_line1 {
        if !line1.is_empty() {
            parts.push(line1.clone());
        }
    }
    if let Some(line2) = &org.address_line2 {
        if !line2.is_empty() {
            parts.push(line2.clone());
        }
    }
    let mut locality = String::new();
    if let Some(city) = &org.city {
        locality.push_str(city);
    }
    if let Some(state) = &org.state {
        if !locality.is_empty() {
            locality.push_str(", ");
        }
        locality.push_str(state);
    }
    if let Some(postal) = &org.postal_code {
        if !locality.is_empty() {
            locality.push(' ');
        }
        locality.push_str(postal);
    }
    if !locality.is_empty() {
        parts.push(locality);
    }
    parts.join(", ")
}

fn organization_tokens(org: &OrganizationData) -> Vec<(&'static str, String)> {
    let opt = |value: &Option<String>| value.clone().unwrap_or_default();
    vec![
        ("ORGANIZATION_NAME", org.legal_name.clone()),
        ("ORGANIZATION_ADDRESS", compose_address(org)),
        ("ORGANIZATION_PHONE", opt(&org.phone)),
        ("EIN", opt(&org.ein)),
        ("NPI", opt(&org.npi)),
        ("PRIVACY_OFFICER_NAME", opt(&org.privacy_officer_name)),
        ("PRIVACY_OFFICER_EMAIL", opt(&org.privacy_officer_email)),
        ("SECURITY_OFFICER_NAME", opt(&org.security_officer_name)),
        ("SECURITY_OFFICER_EMAIL", opt(&org.security_officer_email)),
        (
            "EFFECTIVE_DATE",
            org.effective_date
                .map(|date| date.format("%B %-d, %Y").to_string())
                .unwrap_or_default(),
        ),
    ]
}

/// Render the evidence statement: one bullet per item, or a sentence when
/// nothing is on file.
pub fn format_evidence_list(evidence: &[EvidenceLine]) -> String {
    if evidence.is_empty() {
        return "No supporting evidence is currently on file for this policy.".to_string();
    }

    let mut out = String::from("The following evidence is on file:\n");
    for item in evidence {
        out.push_str("- ");
        out.push_str(&item.title);
        if let Some(uploaded_at) = item.uploaded_at {
            out.push_str(&format!(" (uploaded {})", uploaded_at.format("%Y-%m-%d")));
        }
        if let Some(url) = &item.download_url {
            out.push_str(" — ");
            out.push_str(url);
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}

/// Substitute all resolvable tokens into the template.
///
/// Order is significant: generated fields first, evidence second,
/// organization metadata last. Completeness is not guaranteed here.
pub fn inject(
    template: &str,
    field_set: &DocumentFieldSet,
    organization: &OrganizationData,
    evidence: &[EvidenceLine],
) -> String {
    let mut output = template.to_string();

    for (name, field) in &field_set.fields {
        output = output.replace(&token(name), &field.value);
    }

    output = output.replace(&token("EVIDENCE_ON_FILE"), &format_evidence_list(evidence));

    for (name, value) in organization_tokens(organization) {
        output = output.replace(&token(name), &value);
    }

    output
}

/// Substitute an ad-hoc token table. Used by the breach-letter flow where
/// the tokens are incident data rather than generated fields.
pub fn inject_values(
    template: &str,
    values: &[(&str, String)],
    organization: &OrganizationData,
) -> String {
    let mut output = template.to_string();
    for (name, value) in values {
        output = output.replace(&token(name), value);
    }
    for (name, value) in organization_tokens(organization) {
        output = output.replace(&token(name), &value);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::fields::{DocumentField, DocumentFieldSet};
    use crate::generation::normalizer::ComplianceStatus;
    use crate::generation::DocumentType;
    use crate::organization::model::OrganizationData;
    use chrono::TimeZone;

    fn org() -> OrganizationData {
        OrganizationData {
            legal_name: "Acme Clinic".to_string(),
            npi: Some("1234567890".to_string()),
            ..OrganizationData::default()
        }
    }

    fn field_set_with(name: &str, value: &str) -> DocumentFieldSet {
        let mut set = DocumentFieldSet::empty(DocumentType::SraPolicy);
        set.fields.insert(
            name.to_string(),
            DocumentField {
                value: value.to_string(),
                compliance_status: ComplianceStatus::Compliant,
            },
        );
        set
    }

    #[test]
    fn test_substitution_is_global() {
        let template = "{{SRA_STATUS}} and {{SRA_STATUS}} and {{SRA_STATUS}}";
        let out = inject(template, &field_set_with("SRA_STATUS", "X"), &org(), &[]);
        assert_eq!(out, "X and X and X");
    }

    #[test]
    fn test_null_organization_field_becomes_empty_string() {
        let mut organization = org();
        organization.npi = None;
        let set = DocumentFieldSet::empty(DocumentType::MasterPolicy);
        let out = inject("NPI: {{NPI}}.", &set, &organization, &[]);
        assert_eq!(out, "NPI: .");
    }

    #[test]
    fn test_empty_evidence_yields_no_evidence_sentence() {
        let set = DocumentFieldSet::empty(DocumentType::SraPolicy);
        let out = inject("{{EVIDENCE_ON_FILE}}", &set, &org(), &[]);
        assert_eq!(
            out,
            "No supporting evidence is currently on file for this policy."
        );
    }

    #[test]
    fn test_evidence_bullets_include_title_date_and_link() {
        let evidence = vec![
            EvidenceLine {
                title: "Encryption configuration export".to_string(),
                uploaded_at: Some(chrono::Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap()),
                download_url: Some("https://files.example/signed/abc".to_string()),
            },
            EvidenceLine {
                title: "Backup test report".to_string(),
                uploaded_at: None,
                download_url: None,
            },
        ];
        let rendered = format_evidence_list(&evidence);
        assert!(rendered.contains("- Encryption configuration export (uploaded 2026-03-10) — https://files.example/signed/abc"));
        assert!(rendered.contains("- Backup test report"));
        assert!(rendered.starts_with("The following evidence is on file:"));
    }

    #[test]
    fn test_unresolved_tokens_are_left_for_cleanup() {
        let set = DocumentFieldSet::empty(DocumentType::SraPolicy);
        let out = inject("{{SECURITY_POSTURE}}", &set, &org(), &[]);
        assert_eq!(out, "{{SECURITY_POSTURE}}");
    }

    #[test]
    fn test_organization_name_substituted() {
        let set = DocumentFieldSet::empty(DocumentType::SraPolicy);
        let out = inject("Issued by {{ORGANIZATION_NAME}}.", &set, &org(), &[]);
        assert_eq!(out, "Issued by Acme Clinic.");
    }
}
