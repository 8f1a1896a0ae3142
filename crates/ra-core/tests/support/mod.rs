//! Shared setup for risk-assess CLI tests.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch config home with the reference model artifact on disk.
pub struct Fixture {
    pub dir: TempDir,
    pub model: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let model = dir.path().join("tree.json");
        std::fs::write(&model, ra_model::testing::reference_artifact_json()).expect("write model");
        Fixture { dir, model }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `name` under the fixture directory and return its path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create dir");
        }
        std::fs::write(&path, contents).expect("write fixture file");
        path
    }

    /// The binary with config discovery confined to this fixture.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("risk-assess").expect("risk-assess binary should exist");
        cmd.env("XDG_CONFIG_HOME", self.dir.path().join("xdg"))
            .env_remove("RISK_ASSESS_SETTINGS")
            .env_remove("RISK_ASSESS_MODEL")
            .env_remove("RISK_ASSESS_CONFIG_DIR")
            .env_remove("RA_LOG")
            .env_remove("RUST_LOG");
        cmd
    }

    /// `cmd()` with `--model` pointing at the reference tree.
    pub fn with_model(&self) -> Command {
        let mut cmd = self.cmd();
        cmd.arg("--model").arg(&self.model);
        cmd
    }
}

/// Flags for the reference low-risk submission.
pub fn low_risk_flags() -> Vec<&'static str> {
    vec![
        "--age",
        "30",
        "--marital-status",
        "Married",
        "--education-level",
        "Bachelor's Degree",
        "--number-of-children",
        "0",
        "--smoking-status",
        "Non-smoker",
        "--physical-activity-level",
        "Active",
        "--employment-status",
        "Employed",
        "--income",
        "50000",
        "--alcohol-consumption",
        "Low",
        "--dietary-habits",
        "Healthy",
        "--sleep-patterns",
        "Good",
        "--mental-illness-history",
        "No",
        "--substance-abuse-history",
        "No",
        "--family-history-depression",
        "No",
    ]
}

/// The reference submission as JSON, keyed by question label.
pub fn low_risk_json() -> String {
    serde_json::json!({
        "Age": 30,
        "Marital Status": "Married",
        "Education Level": "Bachelor's Degree",
        "Number of Children": 0,
        "Smoking Status": "Non-smoker",
        "Physical Activity Level": "Active",
        "Employment Status": "Employed",
        "Income": 50000.0,
        "Alcohol Consumption": "Low",
        "Dietary Habits": "Healthy",
        "Sleep Patterns": "Good",
        "History of Mental Illness": "No",
        "History of Substance Abuse": "No",
        "Family History of Depression": "No"
    })
    .to_string()
}
