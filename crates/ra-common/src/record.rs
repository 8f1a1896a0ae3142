//! Survey submissions: the raw form payload and the validated record.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::categories::{
    AlcoholConsumption, DietaryHabits, EducationLevel, EmploymentStatus, MaritalStatus,
    PhysicalActivityLevel, SleepPatterns, SmokingStatus, YesNo,
};
use crate::error::EncodeError;
use crate::field::{SurveyField, AGE_RANGE, CHILDREN_RANGE};

/// A single submitted answer before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    /// The value as it would be echoed back into a form.
    pub fn as_display(&self) -> String {
        match self {
            RawValue::Number(n) => n.to_string(),
            RawValue::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<u32> for RawValue {
    fn from(n: u32) -> Self {
        RawValue::Number(f64::from(n))
    }
}

/// Form payload keyed by question label (`"Marital Status"`) or snake-case
/// key (`"marital_status"`). Null values count as missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawSurvey {
    fields: BTreeMap<String, Option<RawValue>>,
}

impl RawSurvey {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RawValue>) {
        self.fields.insert(key.into(), Some(value.into()));
    }

    pub fn remove(&mut self, field: SurveyField) {
        self.fields.remove(field.label());
        self.fields.remove(field.key());
    }

    /// Answer for `field`, preferring the display label over the key.
    /// A null answer counts as absent, so it never hides the other spelling.
    pub fn get(&self, field: SurveyField) -> Option<&RawValue> {
        let answer = |name: &str| self.fields.get(name).and_then(Option::as_ref);
        answer(field.label()).or_else(|| answer(field.key()))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build from decoded `key=value` pairs (HTML form bodies).
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut raw = RawSurvey::new();
        for (k, v) in pairs {
            raw.insert(k.into(), RawValue::Text(v.into()));
        }
        raw
    }
}

impl From<&SurveyRecord> for RawSurvey {
    fn from(record: &SurveyRecord) -> Self {
        RawSurvey::new()
            .with(SurveyField::Age.label(), u32::from(record.age))
            .with(SurveyField::MaritalStatus.label(), record.marital_status.label())
            .with(SurveyField::EducationLevel.label(), record.education_level.label())
            .with(
                SurveyField::NumberOfChildren.label(),
                u32::from(record.number_of_children),
            )
            .with(SurveyField::SmokingStatus.label(), record.smoking_status.label())
            .with(
                SurveyField::PhysicalActivityLevel.label(),
                record.physical_activity_level.label(),
            )
            .with(
                SurveyField::EmploymentStatus.label(),
                record.employment_status.label(),
            )
            .with(SurveyField::Income.label(), record.income)
            .with(
                SurveyField::AlcoholConsumption.label(),
                record.alcohol_consumption.label(),
            )
            .with(SurveyField::DietaryHabits.label(), record.dietary_habits.label())
            .with(SurveyField::SleepPatterns.label(), record.sleep_patterns.label())
            .with(
                SurveyField::MentalIllnessHistory.label(),
                record.mental_illness_history.label(),
            )
            .with(
                SurveyField::SubstanceAbuseHistory.label(),
                record.substance_abuse_history.label(),
            )
            .with(
                SurveyField::FamilyHistoryDepression.label(),
                record.family_history_depression.label(),
            )
    }
}

/// A validated survey answer set, one field per question.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct SurveyRecord {
    #[schemars(range(min = 0, max = 120))]
    pub age: u8,
    pub marital_status: MaritalStatus,
    pub education_level: EducationLevel,
    #[schemars(range(min = 0, max = 20))]
    pub number_of_children: u8,
    pub smoking_status: SmokingStatus,
    pub physical_activity_level: PhysicalActivityLevel,
    pub employment_status: EmploymentStatus,
    #[schemars(range(min = 0))]
    pub income: f64,
    pub alcohol_consumption: AlcoholConsumption,
    pub dietary_habits: DietaryHabits,
    pub sleep_patterns: SleepPatterns,
    pub mental_illness_history: YesNo,
    pub substance_abuse_history: YesNo,
    pub family_history_depression: YesNo,
}

impl SurveyRecord {
    /// Validate a raw submission.
    ///
    /// Questions are checked in feature order and the first problem is
    /// reported.
    pub fn from_raw(raw: &RawSurvey) -> Result<Self, EncodeError> {
        Ok(SurveyRecord {
            age: integer(raw, SurveyField::Age, AGE_RANGE)?,
            marital_status: category(raw, SurveyField::MaritalStatus, MaritalStatus::from_label)?,
            education_level: category(
                raw,
                SurveyField::EducationLevel,
                EducationLevel::from_label,
            )?,
            number_of_children: integer(raw, SurveyField::NumberOfChildren, CHILDREN_RANGE)?,
            smoking_status: category(raw, SurveyField::SmokingStatus, SmokingStatus::from_label)?,
            physical_activity_level: category(
                raw,
                SurveyField::PhysicalActivityLevel,
                PhysicalActivityLevel::from_label,
            )?,
            employment_status: category(
                raw,
                SurveyField::EmploymentStatus,
                EmploymentStatus::from_label,
            )?,
            income: income(raw)?,
            alcohol_consumption: category(
                raw,
                SurveyField::AlcoholConsumption,
                AlcoholConsumption::from_label,
            )?,
            dietary_habits: category(raw, SurveyField::DietaryHabits, DietaryHabits::from_label)?,
            sleep_patterns: category(raw, SurveyField::SleepPatterns, SleepPatterns::from_label)?,
            mental_illness_history: category(
                raw,
                SurveyField::MentalIllnessHistory,
                YesNo::from_label,
            )?,
            substance_abuse_history: category(
                raw,
                SurveyField::SubstanceAbuseHistory,
                YesNo::from_label,
            )?,
            family_history_depression: category(
                raw,
                SurveyField::FamilyHistoryDepression,
                YesNo::from_label,
            )?,
        })
    }
}

impl TryFrom<RawSurvey> for SurveyRecord {
    type Error = EncodeError;

    fn try_from(raw: RawSurvey) -> Result<Self, Self::Error> {
        SurveyRecord::from_raw(&raw)
    }
}

impl<'de> Deserialize<'de> for SurveyRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawSurvey::deserialize(deserializer)?;
        SurveyRecord::from_raw(&raw).map_err(serde::de::Error::custom)
    }
}

/// Validate one answer on its own, as an interactive form does before moving
/// to the next question.
pub fn check_answer(field: SurveyField, value: &RawValue) -> Result<(), EncodeError> {
    let raw = RawSurvey::new().with(field.label(), value.clone());
    match field {
        SurveyField::Age => integer(&raw, field, AGE_RANGE).map(drop),
        SurveyField::NumberOfChildren => integer(&raw, field, CHILDREN_RANGE).map(drop),
        SurveyField::Income => income(&raw).map(drop),
        _ => {
            let options = field.options().unwrap_or_default();
            category(&raw, field, |label| {
                options.iter().find(|(l, _)| *l == label).map(|(_, code)| *code)
            })
            .map(drop)
        }
    }
}

/// Present, non-blank answer or `MissingField`.
fn present(raw: &RawSurvey, field: SurveyField) -> Result<&RawValue, EncodeError> {
    match raw.get(field) {
        Some(RawValue::Text(s)) if s.trim().is_empty() => Err(EncodeError::MissingField { field }),
        Some(value) => Ok(value),
        None => Err(EncodeError::MissingField { field }),
    }
}

fn category<T>(
    raw: &RawSurvey,
    field: SurveyField,
    lookup: impl Fn(&str) -> Option<T>,
) -> Result<T, EncodeError> {
    let value = present(raw, field)?;
    let label = match value {
        RawValue::Text(s) => s.trim().to_string(),
        RawValue::Number(n) => n.to_string(),
    };
    lookup(&label).ok_or(EncodeError::UnknownCategory {
        field,
        value: label,
    })
}

fn number(raw: &RawSurvey, field: SurveyField) -> Result<(f64, String), EncodeError> {
    match present(raw, field)? {
        RawValue::Number(n) => Ok((*n, n.to_string())),
        RawValue::Text(s) => {
            let text = s.trim();
            text.parse::<f64>()
                .map(|n| (n, text.to_string()))
                .map_err(|_| EncodeError::InvalidNumber {
                    field,
                    value: text.to_string(),
                    reason: "not a number".to_string(),
                })
        }
    }
}

fn integer(raw: &RawSurvey, field: SurveyField, range: (u8, u8)) -> Result<u8, EncodeError> {
    let (n, text) = number(raw, field)?;
    if !n.is_finite() || n.fract() != 0.0 {
        return Err(EncodeError::InvalidNumber {
            field,
            value: text,
            reason: "must be a whole number".to_string(),
        });
    }
    if n < f64::from(range.0) || n > f64::from(range.1) {
        return Err(EncodeError::InvalidNumber {
            field,
            value: text,
            reason: format!("must be between {} and {}", range.0, range.1),
        });
    }
    Ok(n as u8)
}

fn income(raw: &RawSurvey) -> Result<f64, EncodeError> {
    let (n, text) = number(raw, SurveyField::Income)?;
    check_income(n, &text)?;
    Ok(n)
}

fn check_income(n: f64, text: &str) -> Result<(), EncodeError> {
    if !n.is_finite() {
        return Err(EncodeError::InvalidNumber {
            field: SurveyField::Income,
            value: text.to_string(),
            reason: "must be a finite number".to_string(),
        });
    }
    if n < 0.0 {
        return Err(EncodeError::InvalidNumber {
            field: SurveyField::Income,
            value: text.to_string(),
            reason: "must not be negative".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// The reference submission: a 30-year-old married graduate.
    pub fn reference_raw() -> RawSurvey {
        RawSurvey::new()
            .with("Age", 30u32)
            .with("Marital Status", "Married")
            .with("Education Level", "Bachelor's Degree")
            .with("Number of Children", 0u32)
            .with("Smoking Status", "Non-smoker")
            .with("Physical Activity Level", "Active")
            .with("Employment Status", "Employed")
            .with("Income", 50000.0)
            .with("Alcohol Consumption", "Low")
            .with("Dietary Habits", "Healthy")
            .with("Sleep Patterns", "Good")
            .with("History of Mental Illness", "No")
            .with("History of Substance Abuse", "No")
            .with("Family History of Depression", "No")
    }
}
