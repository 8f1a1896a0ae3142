//! The binary outcome of an assessment.

use serde::{Deserialize, Serialize};

/// Risk label predicted by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLabel {
    /// Class 0.
    Low,
    /// Class 1.
    High,
}

impl RiskLabel {
    /// Map a classifier class to a label. Only 0 and 1 are meaningful.
    pub fn from_class(class: i64) -> Option<Self> {
        match class {
            0 => Some(RiskLabel::Low),
            1 => Some(RiskLabel::High),
            _ => None,
        }
    }

    pub fn class(self) -> i64 {
        match self {
            RiskLabel::Low => 0,
            RiskLabel::High => 1,
        }
    }

    pub fn is_high(self) -> bool {
        self == RiskLabel::High
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLabel::Low => "low",
            RiskLabel::High => "high",
        }
    }
}

impl std::fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_mapping() {
        assert_eq!(RiskLabel::from_class(0), Some(RiskLabel::Low));
        assert_eq!(RiskLabel::from_class(1), Some(RiskLabel::High));
        assert_eq!(RiskLabel::from_class(2), None);
        assert_eq!(RiskLabel::High.class(), 1);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&RiskLabel::High).unwrap(), "\"high\"");
    }
}
