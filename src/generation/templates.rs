//! Static legal-text templates.
//!
//! One template per document type, bundled with the binary. `{{NAME}}`
//! tokens mark substitution points; the same token may appear more than
//! once in a template and every substitution is global. Tokens fall into
//! three groups: generated narrative fields, the evidence statement, and
//! organization metadata.

use super::DocumentType;

pub const SRA_POLICY_TEMPLATE: &str = r#"SECURITY RISK ANALYSIS POLICY
Policy ID: HIPAA-SRA-001

{{ORGANIZATION_NAME}}
{{ORGANIZATION_ADDRESS}}
Effective Date: {{EFFECTIVE_DATE}}

1. PURPOSE

This policy establishes the requirement of {{ORGANIZATION_NAME}} to conduct an accurate and thorough assessment of the potential risks and vulnerabilities to the confidentiality, integrity, and availability of electronic protected health information (ePHI), as required by 45 CFR 164.308(a)(1)(ii)(A).

2. CURRENT RISK ANALYSIS STATUS

{{SRA_STATUS}}

3. SECURITY POSTURE SUMMARY

{{SECURITY_POSTURE}}

4. TECHNICAL SAFEGUARD FINDINGS

Encryption of stored ePHI: {{ENCRYPTION_AT_REST}}

Audit controls: {{AUDIT_CONTROLS}}

5. SUPPORTING EVIDENCE

{{EVIDENCE_ON_FILE}}

6. RESPONSIBILITIES

The Security Officer, {{SECURITY_OFFICER_NAME}}, is responsible for ensuring that the Security Risk Analysis is reviewed at least annually and whenever significant changes occur to the environment of {{ORGANIZATION_NAME}}. Questions regarding this policy should be directed to {{SECURITY_OFFICER_EMAIL}}.

7. SANCTIONS

Workforce members who fail to comply with this policy are subject to the sanction procedures of {{ORGANIZATION_NAME}}.
"#;

pub const MASTER_POLICY_TEMPLATE: &str = r#"MASTER HIPAA COMPLIANCE POLICY
Policy ID: HIPAA-MST-001

{{ORGANIZATION_NAME}}
{{ORGANIZATION_ADDRESS}}
EIN: {{EIN}}  NPI: {{NPI}}
Effective Date: {{EFFECTIVE_DATE}}

1. PURPOSE

This master policy documents the overall HIPAA compliance program of {{ORGANIZATION_NAME}} and incorporates by reference the subordinate policies identified below.

2. COMPLIANCE OFFICERS

{{PRIVACY_OFFICER_DESIGNATION}}

{{SECURITY_OFFICER_DESIGNATION}}

Privacy Officer: {{PRIVACY_OFFICER_NAME}} ({{PRIVACY_OFFICER_EMAIL}})
Security Officer: {{SECURITY_OFFICER_NAME}} ({{SECURITY_OFFICER_EMAIL}})

3. RISK MANAGEMENT

{{SRA_STATUS}}

4. SAFEGUARDS

{{ENCRYPTION_AT_REST}}

{{DISASTER_RECOVERY}}

{{INCIDENT_PROCEDURES}}

5. WORKFORCE

{{TRAINING_PROGRAM}}

6. BUSINESS ASSOCIATES

{{BAA_COVERAGE}}

7. SUPPORTING EVIDENCE

{{EVIDENCE_ON_FILE}}

8. REVIEW

This master policy is reviewed annually by the compliance officers of {{ORGANIZATION_NAME}} and reissued upon material change.
"#;

pub const PRIVACY_POLICY_TEMPLATE: &str = r#"NOTICE OF PRIVACY PRACTICES POLICY
Policy ID: HIPAA-PRV-001

{{ORGANIZATION_NAME}}
{{ORGANIZATION_ADDRESS}}
Effective Date: {{EFFECTIVE_DATE}}

1. PURPOSE

This policy governs how {{ORGANIZATION_NAME}} develops, distributes, and maintains its Notice of Privacy Practices and protects the privacy of protected health information under 45 CFR Part 164, Subpart E.

2. PRIVACY OFFICER

{{PRIVACY_OFFICER_DESIGNATION}}

The Privacy Officer, {{PRIVACY_OFFICER_NAME}}, may be reached at {{PRIVACY_OFFICER_EMAIL}} or {{ORGANIZATION_PHONE}}.

3. USES AND DISCLOSURES

{{ORGANIZATION_NAME}} uses and discloses protected health information only as permitted or required by the Privacy Rule: for treatment, payment, and health care operations; pursuant to a valid authorization; or as otherwise required by law. The minimum necessary standard is applied to all uses and disclosures other than for treatment.

4. INDIVIDUAL RIGHTS

Individuals may inspect and obtain a copy of their protected health information, request amendment, request an accounting of disclosures, and request restrictions on uses and disclosures. Requests are directed to the Privacy Officer and answered within the timeframes established by the Privacy Rule.

5. SUPPORTING EVIDENCE

{{EVIDENCE_ON_FILE}}

6. COMPLAINTS

Complaints regarding the privacy practices of {{ORGANIZATION_NAME}} may be filed with the Privacy Officer or with the Secretary of Health and Human Services. No retaliation will result from filing a complaint.
"#;

pub const SECURITY_POLICY_TEMPLATE: &str = r#"INFORMATION SECURITY POLICY
Policy ID: HIPAA-SEC-001

{{ORGANIZATION_NAME}}
{{ORGANIZATION_ADDRESS}}
Effective Date: {{EFFECTIVE_DATE}}

1. PURPOSE

This policy establishes the administrative, physical, and technical safeguards through which {{ORGANIZATION_NAME}} protects the confidentiality, integrity, and availability of electronic protected health information, per 45 CFR Part 164, Subpart C.

2. SECURITY OFFICER

{{SECURITY_OFFICER_DESIGNATION}}

3. SECURITY POSTURE

{{SECURITY_POSTURE}}

4. TECHNICAL SAFEGUARDS

Encryption at rest: {{ENCRYPTION_AT_REST}}

Encryption in transit: {{ENCRYPTION_IN_TRANSIT}}

Audit controls: {{AUDIT_CONTROLS}}

Workstation security: {{WORKSTATION_SECURITY}}

5. SUPPORTING EVIDENCE

{{EVIDENCE_ON_FILE}}

6. ENFORCEMENT

Violations of this policy are reported to the Security Officer, {{SECURITY_OFFICER_NAME}}, and handled under the sanction policy of {{ORGANIZATION_NAME}}.
"#;

pub const ACCESS_CONTROL_POLICY_TEMPLATE: &str = r#"ACCESS CONTROL POLICY
Policy ID: HIPAA-ACC-001

{{ORGANIZATION_NAME}}
{{ORGANIZATION_ADDRESS}}
Effective Date: {{EFFECTIVE_DATE}}

1. PURPOSE

This policy governs how {{ORGANIZATION_NAME}} grants, reviews, and revokes access to systems containing electronic protected health information, per 45 CFR 164.312(a) and 164.308(a)(3)-(4).

2. UNIQUE USER IDENTIFICATION

{{UNIQUE_USER_IDENTIFICATION}}

3. ACCESS REVIEWS

{{ACCESS_REVIEW_PRACTICE}}

4. WORKSTATION SECURITY

{{WORKSTATION_SECURITY}}

5. TERMINATION PROCEDURES

{{TERMINATION_PROCEDURES}}

6. SUPPORTING EVIDENCE

{{EVIDENCE_ON_FILE}}

7. RESPONSIBILITIES

The Security Officer, {{SECURITY_OFFICER_NAME}}, approves all access grants to systems containing electronic protected health information and documents each approval.
"#;

pub const CONTINGENCY_PLAN_TEMPLATE: &str = r#"CONTINGENCY AND DISASTER RECOVERY PLAN
Policy ID: HIPAA-CNT-001

{{ORGANIZATION_NAME}}
{{ORGANIZATION_ADDRESS}}
Effective Date: {{EFFECTIVE_DATE}}

1. PURPOSE

This plan establishes the procedures of {{ORGANIZATION_NAME}} for responding to an emergency or other occurrence that damages systems containing electronic protected health information, per 45 CFR 164.308(a)(7).

2. DATA BACKUP PLAN

{{DATA_BACKUP_PLAN}}

3. BACKUP TESTING

{{BACKUP_TESTING}}

4. DISASTER RECOVERY

{{DISASTER_RECOVERY}}

5. EMERGENCY MODE OPERATION

During an emergency, {{ORGANIZATION_NAME}} continues the critical business processes necessary to protect the security of electronic protected health information while operating in emergency mode. The Security Officer, {{SECURITY_OFFICER_NAME}}, coordinates emergency mode operations and authorizes temporary procedures.

6. SUPPORTING EVIDENCE

{{EVIDENCE_ON_FILE}}

7. PLAN MAINTENANCE

This plan is tested and revised periodically; revision records are retained for six years.
"#;

pub const INCIDENT_RESPONSE_POLICY_TEMPLATE: &str = r#"SECURITY INCIDENT RESPONSE POLICY
Policy ID: HIPAA-INC-001

{{ORGANIZATION_NAME}}
{{ORGANIZATION_ADDRESS}}
Effective Date: {{EFFECTIVE_DATE}}

1. PURPOSE

This policy establishes how {{ORGANIZATION_NAME}} identifies, responds to, mitigates, and documents suspected or known security incidents, per 45 CFR 164.308(a)(6).

2. INCIDENT PROCEDURES

{{INCIDENT_PROCEDURES}}

3. BREACH NOTIFICATION

{{BREACH_NOTIFICATION_PROCESS}}

4. REPORTING

All workforce members must report suspected security incidents to the Security Officer, {{SECURITY_OFFICER_NAME}} ({{SECURITY_OFFICER_EMAIL}}), without delay. Reports are logged, triaged, and investigated; outcomes and mitigation steps are documented and retained for six years.

5. SUPPORTING EVIDENCE

{{EVIDENCE_ON_FILE}}

6. SANCTIONS

Failure to report a known security incident is itself a violation of this policy and subject to sanction by {{ORGANIZATION_NAME}}.
"#;

pub const WORKFORCE_TRAINING_POLICY_TEMPLATE: &str = r#"WORKFORCE TRAINING POLICY
Policy ID: HIPAA-TRN-001

{{ORGANIZATION_NAME}}
{{ORGANIZATION_ADDRESS}}
Effective Date: {{EFFECTIVE_DATE}}

1. PURPOSE

This policy establishes the HIPAA privacy and security training program of {{ORGANIZATION_NAME}}, per 45 CFR 164.308(a)(5) and 164.530(b).

2. TRAINING PROGRAM

{{TRAINING_PROGRAM}}

3. COMPLETION TRACKING

{{TRAINING_TRACKING}}

4. CONTENT

Training covers the privacy and security policies of {{ORGANIZATION_NAME}}, the proper handling of protected health information, recognition and reporting of security incidents, and the sanctions applicable to violations. Content is updated when policies or regulations materially change.

5. SUPPORTING EVIDENCE

{{EVIDENCE_ON_FILE}}

6. RESPONSIBILITIES

The Privacy Officer, {{PRIVACY_OFFICER_NAME}}, maintains the training curriculum and completion records.
"#;

pub const BAA_POLICY_TEMPLATE: &str = r#"BUSINESS ASSOCIATE AGREEMENT POLICY
Policy ID: HIPAA-BAA-001

{{ORGANIZATION_NAME}}
{{ORGANIZATION_ADDRESS}}
Effective Date: {{EFFECTIVE_DATE}}

1. PURPOSE

This policy governs how {{ORGANIZATION_NAME}} identifies business associates and obtains satisfactory assurances, in the form of a written Business Associate Agreement, before permitting a business associate to create, receive, maintain, or transmit protected health information on its behalf, per 45 CFR 164.502(e) and 164.504(e).

2. CURRENT COVERAGE

{{BAA_COVERAGE}}

3. REQUIRED TERMS

Each Business Associate Agreement executed by {{ORGANIZATION_NAME}} requires the business associate to: use appropriate safeguards to prevent unauthorized use or disclosure; report security incidents and breaches of unsecured protected health information; ensure that subcontractors agree to the same restrictions; make records available to the Secretary of Health and Human Services; and return or destroy protected health information at termination where feasible.

4. SUPPORTING EVIDENCE

{{EVIDENCE_ON_FILE}}

5. RESPONSIBILITIES

The Privacy Officer, {{PRIVACY_OFFICER_NAME}}, maintains the inventory of business associates and the executed agreements, and reviews the inventory at least annually.
"#;

/// Breach notification letter sent to affected individuals. Rendered by
/// the incident module through the same injector/cleanup stages.
pub const BREACH_NOTIFICATION_LETTER_TEMPLATE: &str = r#"{{ORGANIZATION_NAME}}
{{ORGANIZATION_ADDRESS}}
{{ORGANIZATION_PHONE}}

{{NOTIFICATION_DATE}}

NOTICE OF DATA BREACH

Dear Patient,

We are writing to notify you of a recent incident that may have involved some of your protected health information. {{ORGANIZATION_NAME}} takes the privacy and security of your information seriously, and we sincerely regret that this occurred.

WHAT HAPPENED

{{INCIDENT_DESCRIPTION}}

The incident occurred on or about {{INCIDENT_DATE}} and was discovered on {{DISCOVERY_DATE}}.

WHAT WE ARE DOING

Upon discovery, we began an investigation, took steps to contain the incident, and are reviewing our safeguards to reduce the likelihood of a similar incident. Where required, we have notified the Secretary of Health and Human Services.

WHAT YOU CAN DO

We recommend that you review statements from your health plan and providers, and report any services you do not recognize. You may also place a fraud alert with the major credit bureaus at no cost.

FOR MORE INFORMATION

If you have questions, please contact {{PRIVACY_OFFICER_NAME}} at {{ORGANIZATION_PHONE}}.

Sincerely,

{{PRIVACY_OFFICER_NAME}}
Privacy Officer
{{ORGANIZATION_NAME}}
"#;

/// Tokens the breach letter expects in addition to organization metadata.
pub const LETTER_TOKENS: &[&str] = &[
    "INCIDENT_DESCRIPTION",
    "INCIDENT_DATE",
    "DISCOVERY_DATE",
    "NOTIFICATION_DATE",
];

/// Canned default prose for known placeholders left unresolved by the
/// injector. Each statement references the owning policy so the document
/// reads sensibly even with no answer data behind it.
pub const DEFAULT_PLACEHOLDER_PROSE: &[(&str, &str)] = &[
    ("SRA_STATUS", "The organization conducts a Security Risk Analysis in accordance with policy HIPAA-SRA-001; the current analysis record is maintained by the Security Officer."),
    ("SECURITY_POSTURE", "The organization maintains administrative, physical, and technical safeguards appropriate to its size and complexity, as described in policy HIPAA-SEC-001."),
    ("ENCRYPTION_AT_REST", "The organization addresses encryption of stored electronic protected health information in accordance with policy HIPAA-SEC-001."),
    ("ENCRYPTION_IN_TRANSIT", "The organization addresses encryption of transmitted electronic protected health information in accordance with policy HIPAA-SEC-001."),
    ("AUDIT_CONTROLS", "The organization maintains audit controls in accordance with policy HIPAA-SEC-001."),
    ("WORKSTATION_SECURITY", "The organization maintains workstation security measures in accordance with policy HIPAA-ACC-001."),
    ("UNIQUE_USER_IDENTIFICATION", "The organization assigns unique user identifiers in accordance with policy HIPAA-ACC-001."),
    ("ACCESS_REVIEW_PRACTICE", "The organization reviews user access rights in accordance with policy HIPAA-ACC-001."),
    ("TERMINATION_PROCEDURES", "The organization revokes access upon workforce termination in accordance with policy HIPAA-ACC-001."),
    ("DATA_BACKUP_PLAN", "The organization maintains a data backup plan in accordance with policy HIPAA-CNT-001."),
    ("BACKUP_TESTING", "The organization tests backup restoration in accordance with policy HIPAA-CNT-001."),
    ("DISASTER_RECOVERY", "The organization maintains a disaster recovery plan in accordance with policy HIPAA-CNT-001."),
    ("INCIDENT_PROCEDURES", "The organization maintains security incident procedures in accordance with policy HIPAA-INC-001."),
    ("BREACH_NOTIFICATION_PROCESS", "The organization maintains a breach notification process in accordance with policy HIPAA-INC-001."),
    ("TRAINING_PROGRAM", "The organization provides workforce HIPAA training in accordance with policy HIPAA-TRN-001."),
    ("TRAINING_TRACKING", "The organization tracks workforce training completion in accordance with policy HIPAA-TRN-001."),
    ("BAA_COVERAGE", "The organization maintains Business Associate Agreements in accordance with policy HIPAA-BAA-001."),
    ("PRIVACY_OFFICER_DESIGNATION", "The organization designates a Privacy Officer in accordance with policy HIPAA-PRV-001."),
    ("SECURITY_OFFICER_DESIGNATION", "The organization designates a Security Officer in accordance with policy HIPAA-SEC-001."),
    ("EVIDENCE_ON_FILE", "No supporting evidence is currently on file for this policy."),
];

pub fn template_for(document_type: DocumentType) -> &'static str {
    match document_type {
        DocumentType::SraPolicy => SRA_POLICY_TEMPLATE,
        DocumentType::MasterPolicy => MASTER_POLICY_TEMPLATE,
        DocumentType::PrivacyPolicy => PRIVACY_POLICY_TEMPLATE,
        DocumentType::SecurityPolicy => SECURITY_POLICY_TEMPLATE,
        DocumentType::AccessControlPolicy => ACCESS_CONTROL_POLICY_TEMPLATE,
        DocumentType::ContingencyPlan => CONTINGENCY_PLAN_TEMPLATE,
        DocumentType::IncidentResponsePolicy => INCIDENT_RESPONSE_POLICY_TEMPLATE,
        DocumentType::WorkforceTrainingPolicy => WORKFORCE_TRAINING_POLICY_TEMPLATE,
        DocumentType::BaaPolicy => BAA_POLICY_TEMPLATE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::fields::known_field_placeholders;
    use crate::generation::injector::ORGANIZATION_TOKEN_NAMES;
    use regex::Regex;
    use std::collections::HashSet;

    fn tokens_in(template: &str) -> HashSet<String> {
        let re = Regex::new(r"\{\{([A-Z0-9_]+)\}\}").unwrap();
        re.captures_iter(template)
            .map(|cap| cap[1].to_string())
            .collect()
    }

    /// Every token in every policy template must be resolvable by the
    /// injector or covered by the default-prose table. This is what makes
    /// the no-leak invariant hold by construction.
    #[test]
    fn test_policy_template_tokens_are_all_known() {
        let mut known: HashSet<&str> = HashSet::new();
        known.extend(ORGANIZATION_TOKEN_NAMES.iter().copied());
        known.extend(known_field_placeholders());
        known.extend(DEFAULT_PLACEHOLDER_PROSE.iter().map(|(name, _)| *name));
        known.insert("EVIDENCE_ON_FILE");

        for doc in DocumentType::ALL {
            for token in tokens_in(template_for(doc)) {
                assert!(
                    known.contains(token.as_str()),
                    "template {} contains unknown token {}",
                    doc.as_str(),
                    token
                );
            }
        }
    }

    #[test]
    fn test_letter_tokens_are_org_or_letter_scope() {
        let mut known: HashSet<&str> = HashSet::new();
        known.extend(ORGANIZATION_TOKEN_NAMES.iter().copied());
        known.extend(LETTER_TOKENS.iter().copied());

        for token in tokens_in(BREACH_NOTIFICATION_LETTER_TEMPLATE) {
            assert!(known.contains(token.as_str()), "unknown token {}", token);
        }
    }

    #[test]
    fn test_default_prose_never_contains_placeholder_syntax() {
        for (name, prose) in DEFAULT_PLACEHOLDER_PROSE {
            assert!(!prose.contains("{{"), "default for {} reintroduces tokens", name);
        }
    }

    #[test]
    fn test_every_field_placeholder_has_a_default() {
        let defaults: HashSet<&str> = DEFAULT_PLACEHOLDER_PROSE
            .iter()
            .map(|(name, _)| *name)
            .collect();
        for placeholder in known_field_placeholders() {
            assert!(defaults.contains(placeholder), "no default for {}", placeholder);
        }
    }
}
