//! The fourteen survey questions and the feature order.

use serde::{Deserialize, Serialize};

use crate::categories::{
    AlcoholConsumption, DietaryHabits, EducationLevel, EmploymentStatus, MaritalStatus,
    PhysicalActivityLevel, SleepPatterns, SmokingStatus, YesNo,
};

/// Number of features the classifier consumes.
pub const FEATURE_COUNT: usize = 14;

/// Column names in the order the classifier was trained on.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Age",
    "Marital Status",
    "Education Level",
    "Number of Children",
    "Smoking Status",
    "Physical Activity Level",
    "Employment Status",
    "Income",
    "Alcohol Consumption",
    "Dietary Habits",
    "Sleep Patterns",
    "History of Mental Illness",
    "History of Substance Abuse",
    "Family History of Depression",
];

/// Inclusive bounds for the integer answers.
pub const AGE_RANGE: (u8, u8) = (0, 120);
pub const CHILDREN_RANGE: (u8, u8) = (0, 20);

/// Whether a question takes a number or a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Integer,
    Real,
    Categorical,
}

/// A survey question. Declaration order is the feature order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyField {
    Age,
    MaritalStatus,
    EducationLevel,
    NumberOfChildren,
    SmokingStatus,
    PhysicalActivityLevel,
    EmploymentStatus,
    Income,
    AlcoholConsumption,
    DietaryHabits,
    SleepPatterns,
    MentalIllnessHistory,
    SubstanceAbuseHistory,
    FamilyHistoryDepression,
}

impl SurveyField {
    /// All questions in feature order.
    pub const ALL: [SurveyField; FEATURE_COUNT] = [
        SurveyField::Age,
        SurveyField::MaritalStatus,
        SurveyField::EducationLevel,
        SurveyField::NumberOfChildren,
        SurveyField::SmokingStatus,
        SurveyField::PhysicalActivityLevel,
        SurveyField::EmploymentStatus,
        SurveyField::Income,
        SurveyField::AlcoholConsumption,
        SurveyField::DietaryHabits,
        SurveyField::SleepPatterns,
        SurveyField::MentalIllnessHistory,
        SurveyField::SubstanceAbuseHistory,
        SurveyField::FamilyHistoryDepression,
    ];

    /// Position in the feature vector.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Display label, identical to the trained column name.
    pub fn label(self) -> &'static str {
        FEATURE_NAMES[self.index()]
    }

    /// Snake-case key accepted in JSON input and used for HTML form names.
    pub fn key(self) -> &'static str {
        match self {
            SurveyField::Age => "age",
            SurveyField::MaritalStatus => "marital_status",
            SurveyField::EducationLevel => "education_level",
            SurveyField::NumberOfChildren => "number_of_children",
            SurveyField::SmokingStatus => "smoking_status",
            SurveyField::PhysicalActivityLevel => "physical_activity_level",
            SurveyField::EmploymentStatus => "employment_status",
            SurveyField::Income => "income",
            SurveyField::AlcoholConsumption => "alcohol_consumption",
            SurveyField::DietaryHabits => "dietary_habits",
            SurveyField::SleepPatterns => "sleep_patterns",
            SurveyField::MentalIllnessHistory => "mental_illness_history",
            SurveyField::SubstanceAbuseHistory => "substance_abuse_history",
            SurveyField::FamilyHistoryDepression => "family_history_depression",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            SurveyField::Age | SurveyField::NumberOfChildren => FieldKind::Integer,
            SurveyField::Income => FieldKind::Real,
            _ => FieldKind::Categorical,
        }
    }

    /// Category options for categorical questions, `None` for numeric ones.
    pub fn options(self) -> Option<&'static [(&'static str, u8)]> {
        match self {
            SurveyField::Age | SurveyField::NumberOfChildren | SurveyField::Income => None,
            SurveyField::MaritalStatus => Some(MaritalStatus::OPTIONS),
            SurveyField::EducationLevel => Some(EducationLevel::OPTIONS),
            SurveyField::SmokingStatus => Some(SmokingStatus::OPTIONS),
            SurveyField::PhysicalActivityLevel => Some(PhysicalActivityLevel::OPTIONS),
            SurveyField::EmploymentStatus => Some(EmploymentStatus::OPTIONS),
            SurveyField::AlcoholConsumption => Some(AlcoholConsumption::OPTIONS),
            SurveyField::DietaryHabits => Some(DietaryHabits::OPTIONS),
            SurveyField::SleepPatterns => Some(SleepPatterns::OPTIONS),
            SurveyField::MentalIllnessHistory
            | SurveyField::SubstanceAbuseHistory
            | SurveyField::FamilyHistoryDepression => Some(YesNo::OPTIONS),
        }
    }

    /// Resolve either the display label or the snake-case key.
    pub fn from_name(name: &str) -> Option<Self> {
        SurveyField::ALL
            .iter()
            .copied()
            .find(|f| f.label() == name || f.key() == name)
    }
}

impl std::fmt::Display for SurveyField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
