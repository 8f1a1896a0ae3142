//! `--format` values shared by every command.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed JSON document on stdout
    #[default]
    Json,
    /// Markdown tables
    Md,
    /// A single line
    Summary,
}

impl OutputFormat {
    /// Whether the payload is meant for another program rather than a person.
    pub fn is_structured(self) -> bool {
        matches!(self, OutputFormat::Json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clap_names() {
        assert_eq!(OutputFormat::from_str("md", true), Ok(OutputFormat::Md));
        assert!(OutputFormat::from_str("yaml", true).is_err());
        assert!(OutputFormat::default().is_structured());
        assert!(!OutputFormat::Summary.is_structured());
    }
}
