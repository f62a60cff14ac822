//! Raw form input and its training-time encoding
//!
//! The integer codes below are the ones the classifier was fitted with. They
//! are not ordinal and must not be "tidied up": smoking history in particular
//! encodes `current-smoker` as 0.

use crate::error::{Error, Result};
use crate::types::FeatureVector;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed categorical input with an exhaustive encoding table
pub trait Categorical: Sized + Copy + 'static {
    /// Field name, used in error messages
    const FIELD: &'static str;

    /// Every variant with its accepted spelling and model code
    const TABLE: &'static [(Self, &'static str, u8)];

    /// Numeric code fed to the classifier
    fn code(self) -> u8;

    /// Canonical spelling
    fn as_str(self) -> &'static str;

    /// Parse a form value, case-insensitively
    fn parse_category(value: &str) -> Result<Self> {
        let needle = value.trim();
        Self::TABLE
            .iter()
            .find(|(_, name, _)| name.eq_ignore_ascii_case(needle))
            .map(|(variant, _, _)| *variant)
            .ok_or_else(|| Error::UnrecognizedCategory {
                field: Self::FIELD,
                value: value.to_string(),
                expected: Self::TABLE
                    .iter()
                    .map(|(_, name, _)| *name)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

macro_rules! categorical {
    ($ty:ident, $field:literal, { $($variant:ident => ($name:literal, $code:literal)),+ $(,)? }) => {
        impl Categorical for $ty {
            const FIELD: &'static str = $field;
            const TABLE: &'static [(Self, &'static str, u8)] = &[
                $(($ty::$variant, $name, $code)),+
            ];

            fn code(self) -> u8 {
                match self {
                    $($ty::$variant => $code),+
                }
            }

            fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                <$ty as Categorical>::parse_category(s)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    #[default]
    No,
    Yes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SmokingHistory {
    #[default]
    NonSmoker,
    PastSmoker,
    CurrentSmoker,
}

categorical!(Gender, "gender", {
    Male => ("male", 0),
    Female => ("female", 1),
});

categorical!(YesNo, "yes/no answer", {
    No => ("no", 0),
    Yes => ("yes", 1),
});

categorical!(SmokingHistory, "smoking history", {
    CurrentSmoker => ("current-smoker", 0),
    NonSmoker => ("non-smoker", 1),
    PastSmoker => ("past-smoker", 2),
});

/// Patient attributes as collected by the form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientInput {
    pub gender: Gender,
    pub age: u8,
    pub hypertension: YesNo,
    pub heart_disease: YesNo,
    pub smoking_history: SmokingHistory,
    pub bmi: f32,
    pub hba1c: f32,
    pub blood_glucose: f32,
}

impl Default for PatientInput {
    /// Initial values of the input form
    fn default() -> Self {
        Self {
            gender: Gender::Male,
            age: 25,
            hypertension: YesNo::No,
            heart_disease: YesNo::No,
            smoking_history: SmokingHistory::NonSmoker,
            bmi: 22.0,
            hba1c: 5.5,
            blood_glucose: 100.0,
        }
    }
}

impl PatientInput {
    /// Encode into the classifier's feature order, validating ranges
    pub fn encode(&self) -> Result<FeatureVector> {
        FeatureVector::new(&[
            f32::from(self.gender.code()),
            f32::from(self.age),
            f32::from(self.hypertension.code()),
            f32::from(self.heart_disease.code()),
            f32::from(self.smoking_history.code()),
            self.bmi,
            self.hba1c,
            self.blood_glucose,
        ])
    }
}
