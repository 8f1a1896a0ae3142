//! Canonical category map for the survey's categorical questions.
//!
//! Every categorical answer is its own enum. The label strings and integer
//! codes below are the ones the classifier was trained on (label-encoded in
//! alphabetical order), so they must not be reordered or renumbered.
//!
//! Both the web form and the terminal form build their option lists from
//! these definitions; there is no other copy of the table.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::field::SurveyField;

macro_rules! survey_category {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $label:literal = $code:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Labels with their encoded values, in code order.
            pub const OPTIONS: &'static [(&'static str, u8)] = &[$(($label, $code)),+];

            /// Every variant, in code order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Integer code fed to the classifier.
            pub fn code(self) -> u8 {
                match self {
                    $($name::$variant => $code,)+
                }
            }

            /// Human-readable label shown in forms.
            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            /// Exact (case-sensitive) label lookup.
            pub fn from_label(label: &str) -> Option<Self> {
                match label {
                    $($label => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

survey_category! {
    /// Marital status.
    pub enum MaritalStatus {
        Divorced => "Divorced" = 0,
        Married => "Married" = 1,
        Single => "Single" = 2,
        Widowed => "Widowed" = 3,
    }
}

survey_category! {
    /// Highest completed education.
    pub enum EducationLevel {
        AssociateDegree => "Associate Degree" = 0,
        BachelorsDegree => "Bachelor's Degree" = 1,
        HighSchool => "High School" = 2,
        MastersDegree => "Master's Degree" = 3,
        Phd => "PhD" = 4,
    }
}

survey_category! {
    /// Smoking status.
    pub enum SmokingStatus {
        Current => "Current" = 0,
        Former => "Former" = 1,
        NonSmoker => "Non-smoker" = 2,
    }
}

survey_category! {
    /// Physical activity level.
    pub enum PhysicalActivityLevel {
        Active => "Active" = 0,
        Moderate => "Moderate" = 1,
        Sedentary => "Sedentary" = 2,
    }
}

survey_category! {
    /// Employment status.
    pub enum EmploymentStatus {
        Employed => "Employed" = 0,
        Unemployed => "Unemployed" = 1,
    }
}

survey_category! {
    /// Alcohol consumption.
    pub enum AlcoholConsumption {
        High => "High" = 0,
        Low => "Low" = 1,
        Moderate => "Moderate" = 2,
    }
}

survey_category! {
    /// Dietary habits.
    pub enum DietaryHabits {
        Healthy => "Healthy" = 0,
        Moderate => "Moderate" = 1,
        Unhealthy => "Unhealthy" = 2,
    }
}

survey_category! {
    /// Sleep quality.
    pub enum SleepPatterns {
        Fair => "Fair" = 0,
        Good => "Good" = 1,
        Poor => "Poor" = 2,
    }
}

survey_category! {
    /// Answer to the history questions (mental illness, substance abuse,
    /// family history of depression).
    pub enum YesNo {
        No => "No" = 0,
        Yes => "Yes" = 1,
    }
}

/// One labelled option of a categorical question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryOption {
    pub label: String,
    pub code: u8,
}

/// Options of one categorical question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEntry {
    /// Display label of the question (e.g. "Marital Status").
    pub field: String,
    /// Snake-case key accepted in JSON input.
    pub key: String,
    /// Options in code order.
    pub options: Vec<CategoryOption>,
}

/// Serializable view of the whole category map, in feature order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMap {
    pub fields: Vec<CategoryEntry>,
}

impl CategoryMap {
    /// Build the view from the static definitions.
    pub fn canonical() -> Self {
        let fields = SurveyField::ALL
            .iter()
            .filter_map(|field| {
                field.options().map(|options| CategoryEntry {
                    field: field.label().to_string(),
                    key: field.key().to_string(),
                    options: options
                        .iter()
                        .map(|(label, code)| CategoryOption {
                            label: (*label).to_string(),
                            code: *code,
                        })
                        .collect(),
                })
            })
            .collect();
        CategoryMap { fields }
    }

    /// Render as a Markdown list (used by `categories --format md`).
    pub fn to_markdown(&self) -> String {
        let mut out = String::from("# Category map\n");
        for entry in &self.fields {
            out.push_str(&format!("\n## {}\n\n", entry.field));
            for option in &entry.options {
                out.push_str(&format!("- {} = {}\n", option.label, option.code));
            }
        }
        out
    }
}
