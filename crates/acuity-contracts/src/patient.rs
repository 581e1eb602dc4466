//! Patient demographics and the age context that drives question applicability.

use serde::{Deserialize, Serialize};

use crate::error::{AcuityError, AcuityResult};

/// Patients younger than this are pediatric; everyone else is adult.
pub const PEDIATRIC_AGE_THRESHOLD: u32 = 14;

/// Lowest accepted age in years.
pub const MIN_AGE: u32 = 0;

/// Highest accepted age in years.
pub const MAX_AGE: u32 = 120;

/// The age bracket a known age falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeBracket {
    Pediatric,
    Adult,
}

impl AgeBracket {
    pub fn for_age(age: u32) -> Self {
        if age < PEDIATRIC_AGE_THRESHOLD {
            AgeBracket::Pediatric
        } else {
            AgeBracket::Adult
        }
    }
}

/// The part of the patient record the scoring engine reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientContext {
    /// Age in whole years. `None` until the clinician enters it.
    pub age: Option<u32>,
}

impl PatientContext {
    pub fn bracket(&self) -> Option<AgeBracket> {
        self.age.map(AgeBracket::for_age)
    }
}

/// Demographics entered at the top of an assessment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientDemographics {
    /// Hospital-assigned patient identifier (MRN or similar).
    pub patient_id: String,
    pub name: String,
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bed_id: Option<String>,
}

impl PatientDemographics {
    pub fn context(&self) -> PatientContext {
        PatientContext { age: self.age }
    }

    /// Reject demographics the form would never accept.
    ///
    /// Only the age range is enforced here; empty identifier or name fields
    /// are legal while an assessment is in progress and are reported by
    /// `missing_fields` instead.
    pub fn validate(&self) -> AcuityResult<()> {
        if let Some(age) = self.age {
            if !(MIN_AGE..=MAX_AGE).contains(&age) {
                return Err(AcuityError::InvalidPatient {
                    reason: format!("age {age} is outside [{MIN_AGE}, {MAX_AGE}]"),
                });
            }
        }
        Ok(())
    }

    /// Return true if `field` is present and not blank.
    pub fn has(&self, field: PatientField) -> bool {
        match field {
            PatientField::PatientId => !self.patient_id.trim().is_empty(),
            PatientField::Name => !self.name.trim().is_empty(),
            PatientField::Age => self.age.is_some(),
        }
    }

    /// The fields from `required` that are absent or blank, in the given order.
    pub fn missing_fields(&self, required: &[PatientField]) -> Vec<PatientField> {
        required.iter().copied().filter(|f| !self.has(*f)).collect()
    }
}

/// A demographic field that can be required before an assessment is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatientField {
    PatientId,
    Name,
    Age,
}

impl PatientField {
    /// The fields every assessment needs before it can be submitted.
    pub const REQUIRED: [PatientField; 3] =
        [PatientField::PatientId, PatientField::Name, PatientField::Age];

    pub fn as_str(self) -> &'static str {
        match self {
            PatientField::PatientId => "patient_id",
            PatientField::Name => "name",
            PatientField::Age => "age",
        }
    }
}
