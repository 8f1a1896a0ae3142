//! The assessment pipeline shared by every front end:
//! raw answers → record → feature vector → risk label → message.

use ra_common::{encode, EncodeError, FeatureVector, RawSurvey, RiskLabel, SurveyRecord};
use ra_config::Settings;
use ra_model::InferenceError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::log_event;
use crate::logging::{event_names, LogContext, Stage};
use crate::predictor::Predictor;

pub const WEB_HIGH_MESSAGE: &str =
    "High Risk. This profile is associated with a higher likelihood of chronic disease/depression.";
pub const WEB_LOW_MESSAGE: &str =
    "Low Risk. This profile is not strongly associated with chronic disease/depression.";
pub const DESKTOP_HIGH_MESSAGE: &str = "Yes, this person has a serious chronic disease.";
pub const DESKTOP_LOW_MESSAGE: &str = "No, this person is healthy.";

/// Wording of the outcome, per front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MessageStyle {
    #[default]
    Web,
    Desktop,
}

impl MessageStyle {
    pub fn message(self, label: RiskLabel) -> &'static str {
        match (self, label) {
            (MessageStyle::Web, RiskLabel::High) => WEB_HIGH_MESSAGE,
            (MessageStyle::Web, RiskLabel::Low) => WEB_LOW_MESSAGE,
            (MessageStyle::Desktop, RiskLabel::High) => DESKTOP_HIGH_MESSAGE,
            (MessageStyle::Desktop, RiskLabel::Low) => DESKTOP_LOW_MESSAGE,
        }
    }
}

/// Outcome of one submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub label: RiskLabel,
    pub message: String,
    pub features: FeatureVector,
}

/// Why a submission produced no outcome.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssessError {
    /// Field-level problem; the user corrects the named field.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// The classifier rejected a valid record.
    #[error("An error occurred during prediction: {0}")]
    Inference(#[from] InferenceError),
}

impl AssessError {
    /// Message shown to the user by the given front end.
    pub fn user_message(&self, style: MessageStyle) -> String {
        match (self, style) {
            (AssessError::Encode(e), _) => e.to_string(),
            (AssessError::Inference(e), MessageStyle::Desktop) => format!("Invalid Input: {}", e),
            (AssessError::Inference(_), MessageStyle::Web) => self.to_string(),
        }
    }
}

impl From<AssessError> for ra_common::Error {
    fn from(err: AssessError) -> Self {
        match err {
            AssessError::Encode(e) => ra_common::Error::Encode(e),
            AssessError::Inference(e) => e.into(),
        }
    }
}

/// Validate, encode and classify one raw submission.
pub fn assess(
    raw: &RawSurvey,
    predictor: &Predictor,
    style: MessageStyle,
) -> Result<Assessment, AssessError> {
    let record = SurveyRecord::from_raw(raw)?;
    Ok(assess_record(&record, predictor, style)?)
}

/// Classify an already validated record.
pub fn assess_record(
    record: &SurveyRecord,
    predictor: &Predictor,
    style: MessageStyle,
) -> Result<Assessment, InferenceError> {
    let features = encode(record);
    let label = predictor.predict(&features)?;
    Ok(Assessment {
        label,
        message: style.message(label).to_string(),
        features,
    })
}

/// Everything a front end needs: the model, the settings, and the log
/// correlation context. Built once at startup and passed explicitly.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub predictor: Predictor,
    pub settings: Settings,
    pub log: LogContext,
}

impl AppContext {
    pub fn new(predictor: Predictor, settings: Settings, log: LogContext) -> Self {
        AppContext {
            predictor,
            settings,
            log,
        }
    }

    /// [`assess`] with structured logging of the outcome.
    pub fn assess(&self, raw: &RawSurvey, style: MessageStyle) -> Result<Assessment, AssessError> {
        self.assess_logged(raw, style, &self.log)
    }

    /// [`assess`] logged under a specific context (e.g. one web request).
    pub fn assess_logged(
        &self,
        raw: &RawSurvey,
        style: MessageStyle,
        log: &LogContext,
    ) -> Result<Assessment, AssessError> {
        match assess(raw, &self.predictor, style) {
            Ok(assessment) => {
                log_event!(
                    log,
                    INFO,
                    event_names::ASSESS_FINISHED,
                    Stage::Predict,
                    "assessment complete",
                    label = assessment.label.as_str()
                );
                Ok(assessment)
            }
            Err(AssessError::Encode(e)) => {
                log_event!(
                    log,
                    DEBUG,
                    event_names::ENCODE_REJECTED,
                    Stage::Encode,
                    "survey rejected",
                    field = e.field().label(),
                    error = e.to_string().as_str()
                );
                Err(AssessError::Encode(e))
            }
            Err(AssessError::Inference(e)) => {
                log_event!(
                    log,
                    ERROR,
                    event_names::PREDICT_FAILED,
                    Stage::Predict,
                    "classifier rejected the feature vector",
                    error = e.to_string().as_str()
                );
                Err(AssessError::Inference(e))
            }
        }
    }
}
