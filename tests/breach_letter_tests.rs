//! Breach-notification letter rendering, mirroring the handler's pure steps.

mod common;

use hipaa_compliance_server::generation::cleanup::cleanup;
use hipaa_compliance_server::generation::formatter::format_print_document;
use hipaa_compliance_server::generation::injector::inject_values;
use hipaa_compliance_server::generation::templates::BREACH_NOTIFICATION_LETTER_TEMPLATE;

fn letter_values() -> Vec<(&'static str, String)> {
    vec![
        (
            "INCIDENT_DESCRIPTION",
            "An unencrypted laptop containing patient scheduling data was stolen from a staff vehicle.".to_string(),
        ),
        ("INCIDENT_DATE", "June 2, 2026".to_string()),
        ("DISCOVERY_DATE", "June 3, 2026".to_string()),
        ("NOTIFICATION_DATE", "June 20, 2026".to_string()),
    ]
}

#[test]
fn test_letter_resolves_incident_and_organization_tokens() {
    let organization = common::acme_clinic();
    let letter = inject_values(
        BREACH_NOTIFICATION_LETTER_TEMPLATE,
        &letter_values(),
        &organization,
    );
    let letter = cleanup(&cleanup(&letter));

    assert!(!letter.contains("{{"));
    assert!(letter.contains("Acme Clinic"));
    assert!(letter.contains("June 2, 2026"));
    assert!(letter.contains("stolen from a staff vehicle"));
}

#[test]
fn test_letter_survives_sparse_organization() {
    let organization = hipaa_compliance_server::organization::model::OrganizationData {
        legal_name: "Solo Practice".to_string(),
        ..Default::default()
    };
    let letter = inject_values(
        BREACH_NOTIFICATION_LETTER_TEMPLATE,
        &letter_values(),
        &organization,
    );
    let letter = cleanup(&cleanup(&letter));

    assert!(!letter.contains("{{"));
    assert!(letter.contains("Solo Practice"));
}

#[test]
fn test_formatted_letter_carries_title() {
    let organization = common::acme_clinic();
    let letter = inject_values(
        BREACH_NOTIFICATION_LETTER_TEMPLATE,
        &letter_values(),
        &organization,
    );
    let letter = cleanup(&cleanup(&letter));
    let formatted = format_print_document(&letter, "Breach Notification Letter", Some("HIPAA-BRN-001"));

    assert!(formatted.contains("<h1>Breach Notification Letter</h1>"));
    assert!(formatted.contains("HIPAA-BRN-001"));
    assert!(!formatted.contains("{{"));
}
