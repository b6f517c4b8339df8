//! Narrative field generation.
//!
//! Groups normalized answers into the documents they populate and composes
//! one narrative paragraph per placeholder from fixed phrasing templates.
//! A question may feed several documents (the encryption question appears
//! in the Security Risk Analysis, the Information Security Policy and the
//! Master Policy), and several questions may feed a single placeholder, in
//! which case the sentences are joined and the worst status wins.
//!
//! Deterministic and pure: the same answer list always yields the same
//! field sets.

use std::collections::HashMap;

use serde::Serialize;
use utoipa::ToSchema;

use super::normalizer::{ComplianceStatus, QuestionAnswer, RiskLevel};
use super::DocumentType;

/// One generated narrative field.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentField {
    pub value: String,
    pub compliance_status: ComplianceStatus,
}

/// All generated fields for one document, keyed by placeholder name.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentFieldSet {
    pub document: DocumentType,
    pub fields: HashMap<String, DocumentField>,
}

impl DocumentFieldSet {
    pub fn empty(document: DocumentType) -> Self {
        Self {
            document,
            fields: HashMap::new(),
        }
    }
}

/// A remediation item surfaced alongside the generated document for every
/// non-compliant or partially compliant answer.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemediationAction {
    pub question_id: String,
    pub action: String,
    pub risk_level: RiskLevel,
}

struct FieldRule {
    question_id: &'static str,
    placeholder: &'static str,
    documents: &'static [DocumentType],
    compliant: &'static str,
    partial: &'static str,
    non_compliant: &'static str,
    unknown: &'static str,
}

use DocumentType::*;

const FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        question_id: "q1",
        placeholder: "SRA_STATUS",
        documents: &[SraPolicy, MasterPolicy],
        compliant: "The organization has conducted a documented Security Risk Analysis within the past 12 months and maintains the findings on file.",
        partial: "The organization has begun a Security Risk Analysis but has not completed or fully documented it within the past 12 months.",
        non_compliant: "The organization has NOT conducted a documented Security Risk Analysis in the past 12 months, as required by 45 CFR 164.308(a)(1)(ii)(A).",
        unknown: "The organization has not confirmed whether a documented Security Risk Analysis was conducted in the past 12 months.",
    },
    FieldRule {
        question_id: "q2",
        placeholder: "PRIVACY_OFFICER_DESIGNATION",
        documents: &[PrivacyPolicy, MasterPolicy],
        compliant: "A Privacy Officer has been formally designated and is responsible for the development and implementation of privacy policies and procedures.",
        partial: "A Privacy Officer role exists but the designation has not been formally documented.",
        non_compliant: "The organization has NOT designated a Privacy Officer, as required by 45 CFR 164.530(a)(1).",
        unknown: "The organization has not confirmed the designation of a Privacy Officer.",
    },
    FieldRule {
        question_id: "q3",
        placeholder: "SECURITY_OFFICER_DESIGNATION",
        documents: &[SecurityPolicy, MasterPolicy],
        compliant: "A Security Officer has been formally designated and is responsible for the development and implementation of the security policies and procedures described in this document.",
        partial: "A Security Officer role exists but the designation has not been formally documented.",
        non_compliant: "The organization has NOT designated a Security Officer, as required by 45 CFR 164.308(a)(2).",
        unknown: "The organization has not confirmed the designation of a Security Officer.",
    },
    FieldRule {
        question_id: "q4",
        placeholder: "ENCRYPTION_AT_REST",
        documents: &[SecurityPolicy, SraPolicy, MasterPolicy],
        compliant: "Electronic protected health information is encrypted at rest across all systems that create, receive, maintain or transmit it.",
        partial: "Electronic protected health information is encrypted at rest on some, but not all, systems.",
        non_compliant: "Electronic protected health information is NOT encrypted at rest, leaving stored PHI exposed in the event of device loss or unauthorized access.",
        unknown: "The encryption status of stored electronic protected health information has not been confirmed.",
    },
    FieldRule {
        question_id: "q5",
        placeholder: "ENCRYPTION_IN_TRANSIT",
        documents: &[SecurityPolicy],
        compliant: "All transmissions of electronic protected health information over open networks are encrypted using current industry-standard protocols.",
        partial: "Transmissions of electronic protected health information are encrypted on some, but not all, channels.",
        non_compliant: "Transmissions of electronic protected health information are NOT consistently encrypted in transit.",
        unknown: "The encryption status of protected health information in transit has not been confirmed.",
    },
    FieldRule {
        question_id: "q6",
        placeholder: "UNIQUE_USER_IDENTIFICATION",
        documents: &[AccessControlPolicy],
        compliant: "Each workforce member is assigned a unique user identifier; shared accounts are prohibited on systems containing electronic protected health information.",
        partial: "Most workforce members hold unique user identifiers, but shared accounts remain in limited use.",
        non_compliant: "Workforce members share user accounts on systems containing electronic protected health information, contrary to 45 CFR 164.312(a)(2)(i).",
        unknown: "The organization has not confirmed that each workforce member holds a unique user identifier.",
    },
    FieldRule {
        question_id: "q7",
        placeholder: "ACCESS_REVIEW_PRACTICE",
        documents: &[AccessControlPolicy],
        compliant: "User access rights are reviewed on a recurring schedule and adjusted when roles change.",
        partial: "User access rights are reviewed only occasionally and not on a documented schedule.",
        non_compliant: "User access rights are NOT periodically reviewed, allowing access to persist after role changes.",
        unknown: "The organization has not confirmed how often user access rights are reviewed.",
    },
    FieldRule {
        question_id: "q8",
        placeholder: "WORKSTATION_SECURITY",
        documents: &[AccessControlPolicy, SecurityPolicy],
        compliant: "Workstations with access to electronic protected health information lock automatically after a period of inactivity.",
        partial: "Automatic workstation locking is configured on some, but not all, devices.",
        non_compliant: "Workstations with access to electronic protected health information do NOT lock automatically, leaving unattended sessions exposed.",
        unknown: "The organization has not confirmed whether workstations lock automatically when unattended.",
    },
    FieldRule {
        question_id: "q9",
        placeholder: "DATA_BACKUP_PLAN",
        documents: &[ContingencyPlan],
        compliant: "A documented data backup plan covers all systems holding electronic protected health information, and backups run on a defined schedule.",
        partial: "Backups are performed, but the data backup plan is not fully documented.",
        non_compliant: "The organization does NOT maintain a documented data backup plan, as required by 45 CFR 164.308(a)(7)(ii)(A).",
        unknown: "The organization has not confirmed whether a documented data backup plan exists.",
    },
    FieldRule {
        question_id: "q10",
        placeholder: "BACKUP_TESTING",
        documents: &[ContingencyPlan],
        compliant: "Backup restoration has been tested within the past year and the test results are retained.",
        partial: "Backup restoration has been tested, but not within the past year.",
        non_compliant: "Backup restoration has NOT been tested, so the organization cannot demonstrate that backups are recoverable.",
        unknown: "The organization has not confirmed when backup restoration was last tested.",
    },
    FieldRule {
        question_id: "q11",
        placeholder: "DISASTER_RECOVERY",
        documents: &[ContingencyPlan, MasterPolicy],
        compliant: "A disaster recovery plan establishes procedures to restore any loss of data and continue critical business processes.",
        partial: "Disaster recovery procedures exist but have not been consolidated into a maintained plan.",
        non_compliant: "The organization does NOT maintain a disaster recovery plan, as required by 45 CFR 164.308(a)(7)(ii)(B).",
        unknown: "The organization has not confirmed whether a disaster recovery plan is in place.",
    },
    FieldRule {
        question_id: "q12",
        placeholder: "INCIDENT_PROCEDURES",
        documents: &[IncidentResponsePolicy, MasterPolicy],
        compliant: "Documented procedures govern the identification, response, mitigation and documentation of suspected or known security incidents.",
        partial: "Security incidents are handled case by case; the response procedure is not fully documented.",
        non_compliant: "The organization does NOT maintain documented security incident response procedures, as required by 45 CFR 164.308(a)(6).",
        unknown: "The organization has not confirmed whether documented incident response procedures exist.",
    },
    FieldRule {
        question_id: "q13",
        placeholder: "BREACH_NOTIFICATION_PROCESS",
        documents: &[IncidentResponsePolicy],
        compliant: "A documented breach notification process ensures affected individuals, the Secretary of HHS and, where required, the media are notified within the timeframes of 45 CFR 164.404-408.",
        partial: "A breach notification process exists but does not address all required notification parties or timeframes.",
        non_compliant: "The organization does NOT maintain a documented breach notification process, exposing it to mandatory-notification failures under the Breach Notification Rule.",
        unknown: "The organization has not confirmed whether a documented breach notification process exists.",
    },
    FieldRule {
        question_id: "q14",
        placeholder: "TRAINING_PROGRAM",
        documents: &[WorkforceTrainingPolicy, MasterPolicy],
        compliant: "All workforce members complete HIPAA privacy and security training annually, with refresher material issued when policies materially change.",
        partial: "Workforce members receive HIPAA training at onboarding only; no recurring annual program is in place.",
        non_compliant: "The organization does NOT provide HIPAA training to its workforce, as required by 45 CFR 164.308(a)(5) and 164.530(b).",
        unknown: "The organization has not confirmed the cadence of its workforce HIPAA training.",
    },
    FieldRule {
        question_id: "q15",
        placeholder: "TRAINING_TRACKING",
        documents: &[WorkforceTrainingPolicy],
        compliant: "Training completion is tracked per workforce member, and completion certificates are retained for six years.",
        partial: "Training completion is tracked informally without retained certificates.",
        non_compliant: "Training completion is NOT tracked, so the organization cannot demonstrate workforce training compliance.",
        unknown: "The organization has not confirmed whether training completion is tracked per workforce member.",
    },
    FieldRule {
        question_id: "q16",
        placeholder: "BAA_COVERAGE",
        documents: &[BaaPolicy, MasterPolicy],
        compliant: "Executed Business Associate Agreements are on file for every vendor that creates, receives, maintains or transmits protected health information on the organization's behalf.",
        partial: "Business Associate Agreements are on file for some, but not all, vendors handling protected health information.",
        non_compliant: "The organization has NOT executed Business Associate Agreements with its vendors, permitting PHI disclosure without the safeguards required by 45 CFR 164.502(e).",
        unknown: "The organization has not confirmed whether Business Associate Agreements cover all vendors handling protected health information.",
    },
    FieldRule {
        question_id: "q17",
        placeholder: "AUDIT_CONTROLS",
        documents: &[SecurityPolicy, SraPolicy],
        compliant: "Audit logging is enabled on all systems containing electronic protected health information, and log records are reviewed for anomalous activity.",
        partial: "Audit logging is enabled on some systems, but coverage is incomplete.",
        non_compliant: "Audit logging is NOT enabled on systems containing electronic protected health information, contrary to 45 CFR 164.312(b).",
        unknown: "The organization has not confirmed whether audit logging is enabled on systems holding electronic protected health information.",
    },
    FieldRule {
        question_id: "q18",
        placeholder: "TERMINATION_PROCEDURES",
        documents: &[AccessControlPolicy],
        compliant: "Access to electronic protected health information is revoked on the same day a workforce member's employment ends.",
        partial: "Access is revoked after termination, but not reliably on the same day.",
        non_compliant: "Access to electronic protected health information is NOT promptly revoked when employment ends, contrary to 45 CFR 164.308(a)(3)(ii)(C).",
        unknown: "The organization has not confirmed how quickly access is revoked after termination.",
    },
    // Composite security posture summary assembled from the technical
    // safeguard questions. Feeds the overview section of the SRA and
    // security policies; absent entirely when none of q4/q5/q8/q17 were
    // answered, in which case cleanup supplies the canned default.
    FieldRule {
        question_id: "q4",
        placeholder: "SECURITY_POSTURE",
        documents: &[SraPolicy, SecurityPolicy],
        compliant: "Stored electronic protected health information is protected by encryption at rest.",
        partial: "Encryption at rest covers only part of the environment.",
        non_compliant: "Stored electronic protected health information is not encrypted.",
        unknown: "Encryption-at-rest coverage is unverified.",
    },
    FieldRule {
        question_id: "q5",
        placeholder: "SECURITY_POSTURE",
        documents: &[SraPolicy, SecurityPolicy],
        compliant: "Network transmissions of protected health information are encrypted.",
        partial: "Transmission encryption is only partially deployed.",
        non_compliant: "Network transmissions of protected health information are unencrypted.",
        unknown: "Transmission encryption coverage is unverified.",
    },
    FieldRule {
        question_id: "q8",
        placeholder: "SECURITY_POSTURE",
        documents: &[SraPolicy, SecurityPolicy],
        compliant: "Workstations lock automatically when unattended.",
        partial: "Automatic workstation locking is partially deployed.",
        non_compliant: "Workstations remain unlocked when unattended.",
        unknown: "Workstation locking practice is unverified.",
    },
    FieldRule {
        question_id: "q17",
        placeholder: "SECURITY_POSTURE",
        documents: &[SraPolicy, SecurityPolicy],
        compliant: "Audit logging is active across systems holding electronic protected health information.",
        partial: "Audit logging coverage is incomplete.",
        non_compliant: "Audit logging is disabled on systems holding electronic protected health information.",
        unknown: "Audit logging coverage is unverified.",
    },
];

const REMEDIATION_ACTIONS: &[(&str, &str)] = &[
    ("q1", "Conduct and document a Security Risk Analysis covering all systems that handle ePHI."),
    ("q2", "Formally designate a Privacy Officer and document the designation."),
    ("q3", "Formally designate a Security Officer and document the designation."),
    ("q4", "Enable encryption at rest on every system that stores ePHI."),
    ("q5", "Enforce TLS or an equivalent protocol for every transmission of ePHI."),
    ("q6", "Issue unique user accounts to all workforce members and retire shared credentials."),
    ("q7", "Establish a recurring, documented user access review."),
    ("q8", "Configure automatic screen locking on all workstations with ePHI access."),
    ("q9", "Write and adopt a data backup plan covering all ePHI systems."),
    ("q10", "Perform and document a backup restoration test."),
    ("q11", "Write and adopt a disaster recovery plan."),
    ("q12", "Document security incident response procedures."),
    ("q13", "Document a breach notification process meeting the 45 CFR 164.404-408 timeframes."),
    ("q14", "Establish annual HIPAA training for all workforce members."),
    ("q15", "Track training completion per workforce member and retain certificates."),
    ("q16", "Execute Business Associate Agreements with every vendor that handles PHI."),
    ("q17", "Enable audit logging on all systems containing ePHI."),
    ("q18", "Revoke system access on the same day a workforce member departs."),
];

fn phrase_for(rule: &FieldRule, status: ComplianceStatus) -> &'static str {
    match status {
        ComplianceStatus::Compliant => rule.compliant,
        ComplianceStatus::Partial => rule.partial,
        ComplianceStatus::NonCompliant => rule.non_compliant,
        ComplianceStatus::Unknown => rule.unknown,
    }
}

/// Group answers by target document and synthesize the narrative fields.
///
/// Placeholders with no contributing answer are simply absent; the cleanup
/// stage supplies defaults for those later.
pub fn generate_fields(answers: &[QuestionAnswer]) -> HashMap<DocumentType, DocumentFieldSet> {
    let mut sets: HashMap<DocumentType, DocumentFieldSet> = HashMap::new();

    for answer in answers {
        for rule in FIELD_RULES
            .iter()
            .filter(|rule| rule.question_id == answer.question_id)
        {
            let phrase = phrase_for(rule, answer.compliance_status);
            for document in rule.documents {
                let set = sets
                    .entry(*document)
                    .or_insert_with(|| DocumentFieldSet::empty(*document));
                match set.fields.get_mut(rule.placeholder) {
                    Some(field) => {
                        field.value.push(' ');
                        field.value.push_str(phrase);
                        if answer.compliance_status.severity_rank()
                            > field.compliance_status.severity_rank()
                        {
                            field.compliance_status = answer.compliance_status;
                        }
                    }
                    None => {
                        set.fields.insert(
                            rule.placeholder.to_string(),
                            DocumentField {
                                value: phrase.to_string(),
                                compliance_status: answer.compliance_status,
                            },
                        );
                    }
                }
            }
        }
    }

    sets
}

/// Derive the remediation list from every non-compliant or partially
/// compliant answer, in answer order.
pub fn remediation_actions(answers: &[QuestionAnswer]) -> Vec<RemediationAction> {
    answers
        .iter()
        .filter(|answer| {
            matches!(
                answer.compliance_status,
                ComplianceStatus::NonCompliant | ComplianceStatus::Partial
            )
        })
        .filter_map(|answer| {
            REMEDIATION_ACTIONS
                .iter()
                .find(|(id, _)| *id == answer.question_id)
                .map(|(_, action)| RemediationAction {
                    question_id: answer.question_id.clone(),
                    action: action.to_string(),
                    risk_level: answer.risk_level,
                })
        })
        .collect()
}

/// Every placeholder name a field rule can produce. Used by the template
/// coverage test to prove the no-leak invariant holds by construction.
pub fn known_field_placeholders() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = FIELD_RULES.iter().map(|rule| rule.placeholder).collect();
    names.sort_unstable();
    names.dedup();
    names
}
