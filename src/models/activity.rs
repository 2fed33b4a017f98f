//! Activity classification and supervision policy.
//!
//! Maps a free-text activity label to a coarse activity type and an
//! optional specialty requirement, and a PGY level to its supervision row.
//!
//! # Classification precedence
//! Keyword containment, case-insensitive, checked in this order:
//! 1. procedure: `procedure`, `vasectomy`, `botox`
//! 2. clinic: `clinic`, `continuity`
//! 3. inpatient: `inpatient`, `hospital`
//!
//! Unmatched labels are `clinic`.
//!
//! # Specialty table
//! Entries are scanned in configuration order; the first entry whose name
//! is a case-insensitive substring of the label wins.

use serde::{Deserialize, Serialize};

use super::profile::PROCEDURE_CREDENTIAL;
use super::CapabilityProfile;

const PROCEDURE_KEYWORDS: [&str; 3] = ["procedure", "vasectomy", "botox"];
const CLINIC_KEYWORDS: [&str; 2] = ["clinic", "continuity"];
const INPATIENT_KEYWORDS: [&str; 2] = ["inpatient", "hospital"];

/// Coarse activity type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    #[default]
    Clinic,
    Procedure,
    Inpatient,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clinic => "clinic",
            Self::Procedure => "procedure",
            Self::Inpatient => "inpatient",
        }
    }
}

/// A specialty requirement entry.
///
/// Names either an explicit faculty allow-list or a required credential.
/// When both are present the allow-list takes precedence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialtyRule {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_faculty: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_required: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl SpecialtyRule {
    /// Restricts the activity to the listed faculty ids.
    pub fn faculty(name: impl Into<String>, ids: Vec<String>) -> Self {
        Self {
            name: name.into(),
            required_faculty: Some(ids),
            credential_required: None,
            reason: None,
        }
    }

    /// Restricts the activity to holders of a credential.
    pub fn credential(name: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required_faculty: None,
            credential_required: Some(credential.into()),
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Whether a faculty profile satisfies this requirement.
    pub fn is_satisfied_by(&self, profile: &CapabilityProfile) -> bool {
        if let Some(ids) = &self.required_faculty {
            return ids.iter().any(|id| *id == profile.id);
        }
        if let Some(credential) = &self.credential_required {
            return profile.holds_credential(credential);
        }
        true
    }

    /// The table used when no specialties are configured.
    pub fn default_table() -> Vec<Self> {
        vec![
            Self::credential("Vasectomy", PROCEDURE_CREDENTIAL)
                .with_reason("Requires procedure credentials"),
            Self::credential("Botox", PROCEDURE_CREDENTIAL)
                .with_reason("Requires injection procedure credentials"),
        ]
    }
}

/// Result of classifying an activity label.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub activity_type: ActivityType,
    pub specialty: Option<SpecialtyRule>,
}

/// Keyword classifier with an ordered specialty table.
#[derive(Debug, Clone, Default)]
pub struct ActivityClassifier {
    specialties: Vec<SpecialtyRule>,
}

impl ActivityClassifier {
    pub fn new(specialties: Vec<SpecialtyRule>) -> Self {
        Self { specialties }
    }

    pub fn specialties(&self) -> &[SpecialtyRule] {
        &self.specialties
    }

    pub fn classify(&self, label: &str) -> Classification {
        Classification {
            activity_type: Self::activity_type(label),
            specialty: self.specialty_requirement(label).cloned(),
        }
    }

    /// Keyword-based activity type.
    pub fn activity_type(label: &str) -> ActivityType {
        let lower = label.to_lowercase();
        let has_any = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

        if has_any(&PROCEDURE_KEYWORDS) {
            ActivityType::Procedure
        } else if has_any(&CLINIC_KEYWORDS) {
            ActivityType::Clinic
        } else if has_any(&INPATIENT_KEYWORDS) {
            ActivityType::Inpatient
        } else {
            ActivityType::Clinic
        }
    }

    /// First specialty entry whose name appears in the label.
    pub fn specialty_requirement(&self, label: &str) -> Option<&SpecialtyRule> {
        let lower = label.to_lowercase();
        self.specialties
            .iter()
            .find(|rule| lower.contains(&rule.name.to_lowercase()))
    }
}

/// Supervision row for a PGY level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupervisionRatio {
    /// Residents per faculty in clinic.
    pub clinic: u32,
    /// Residents per faculty for procedures.
    pub procedure: u32,
    /// Whether direct supervision is required.
    pub direct: bool,
}

impl SupervisionRatio {
    const PGY1: Self = Self {
        clinic: 2,
        procedure: 1,
        direct: true,
    };
    const SENIOR: Self = Self {
        clinic: 4,
        procedure: 2,
        direct: false,
    };

    /// Table row for a PGY level. Unknown or empty levels use the PGY-1 row.
    pub fn for_level(pgy_level: &str) -> Self {
        match pgy_level.trim().to_ascii_uppercase().as_str() {
            "PGY-2" | "PGY-3" => Self::SENIOR,
            _ => Self::PGY1,
        }
    }

    /// Numeric ratio for an activity type. Inpatient has no row and uses 1.
    pub fn ratio_for(&self, activity_type: ActivityType) -> u32 {
        match activity_type {
            ActivityType::Clinic => self.clinic,
            ActivityType::Procedure => self.procedure,
            ActivityType::Inpatient => 1,
        }
    }

    pub fn supervision_type(&self) -> SupervisionType {
        if self.direct {
            SupervisionType::Direct
        } else {
            SupervisionType::Indirect
        }
    }
}

/// Direct or indirect supervision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupervisionType {
    Direct,
    Indirect,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_precedence() {
        assert_eq!(ActivityClassifier::activity_type("Procedure Clinic"), ActivityType::Procedure);
        assert_eq!(ActivityClassifier::activity_type("BOTOX injections"), ActivityType::Procedure);
        assert_eq!(ActivityClassifier::activity_type("Continuity Clinic"), ActivityType::Clinic);
        assert_eq!(ActivityClassifier::activity_type("Hospital clinic"), ActivityType::Clinic);
        assert_eq!(ActivityClassifier::activity_type("Inpatient Ward"), ActivityType::Inpatient);
        assert_eq!(ActivityClassifier::activity_type("Didactics"), ActivityType::Clinic);
    }

    #[test]
    fn test_specialty_lookup_respects_table_order() {
        let classifier = ActivityClassifier::new(vec![
            SpecialtyRule::faculty("Sports Medicine", vec!["F1".into()]),
            SpecialtyRule::credential("Medicine", "Internal Medicine"),
        ]);
        let c = classifier.classify("sports medicine clinic");
        assert_eq!(c.activity_type, ActivityType::Clinic);
        assert_eq!(c.specialty.unwrap().name, "Sports Medicine");

        let c = classifier.classify("Internal Medicine Clinic");
        assert_eq!(c.specialty.unwrap().name, "Medicine");

        assert!(classifier.classify("Peds Clinic").specialty.is_none());
    }

    #[test]
    fn test_default_table() {
        let classifier = ActivityClassifier::new(SpecialtyRule::default_table());
        let c = classifier.classify("Vasectomy Clinic");
        assert_eq!(c.activity_type, ActivityType::Procedure);
        assert_eq!(
            c.specialty.unwrap().credential_required.as_deref(),
            Some(PROCEDURE_CREDENTIAL)
        );
    }

    #[test]
    fn test_rule_satisfaction() {
        let f1 = CapabilityProfile::new("F1");
        let f2 = CapabilityProfile::new("F2").with_procedures(true);

        let allow = SpecialtyRule::faculty("Sports Medicine", vec!["F1".into()]);
        assert!(allow.is_satisfied_by(&f1));
        assert!(!allow.is_satisfied_by(&f2));

        let cred = SpecialtyRule::credential("Botox", PROCEDURE_CREDENTIAL);
        assert!(!cred.is_satisfied_by(&f1));
        assert!(cred.is_satisfied_by(&f2));
    }

    #[test]
    fn test_pgy_table() {
        let p1 = SupervisionRatio::for_level("PGY-1");
        assert_eq!(p1.ratio_for(ActivityType::Clinic), 2);
        assert_eq!(p1.ratio_for(ActivityType::Procedure), 1);
        assert_eq!(p1.supervision_type(), SupervisionType::Direct);

        let p3 = SupervisionRatio::for_level("pgy-3");
        assert_eq!(p3.ratio_for(ActivityType::Clinic), 4);
        assert_eq!(p3.ratio_for(ActivityType::Procedure), 2);
        assert_eq!(p3.ratio_for(ActivityType::Inpatient), 1);
        assert_eq!(p3.supervision_type(), SupervisionType::Indirect);

        assert_eq!(SupervisionRatio::for_level("PGY-7"), p1);
        assert_eq!(SupervisionRatio::for_level(""), p1);
    }
}
