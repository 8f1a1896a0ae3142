//! Stages, event names, and the correlation context for log events.

use serde::{Deserialize, Serialize};

/// Processing stages of an assessment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Startup, settings and model loading.
    Init,
    /// Survey validation and feature encoding.
    Encode,
    /// Classifier evaluation.
    Predict,
    /// Output rendering (CLI payload, HTML page, terminal text).
    Render,
    /// Web form request handling.
    Serve,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::Encode => "encode",
            Stage::Predict => "predict",
            Stage::Render => "render",
            Stage::Serve => "serve",
        };
        write!(f, "{}", s)
    }
}

/// Standard event names used in logging.
pub mod event_names {
    // Run lifecycle
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";

    // Config/init events
    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";
    pub const CONFIG_ERROR: &str = "config.error";
    pub const MODEL_LOADED: &str = "model.loaded";
    pub const MODEL_ERROR: &str = "model.error";

    // Assessment
    pub const ENCODE_REJECTED: &str = "encode.rejected";
    pub const PREDICT_FAILED: &str = "predict.failed";
    pub const ASSESS_FINISHED: &str = "assess.finished";

    // Web form
    pub const SERVE_STARTED: &str = "serve.started";
    pub const SERVE_REQUEST: &str = "serve.request";
    pub const SERVE_STOPPED: &str = "serve.stopped";

    // Terminal form
    pub const FORM_FINISHED: &str = "form.finished";
}

/// Correlation IDs attached to every event.
#[derive(Debug, Clone)]
pub struct LogContext {
    /// Unique ID for this invocation.
    pub run_id: String,
    /// Per-request ID when serving the web form.
    pub request_id: Option<String>,
}

impl LogContext {
    pub fn new(run_id: impl Into<String>) -> Self {
        LogContext {
            run_id: run_id.into(),
            request_id: None,
        }
    }

    /// Derive a context for one web request.
    pub fn with_request_id(&self, request_id: impl Into<String>) -> Self {
        LogContext {
            run_id: self.run_id.clone(),
            request_id: Some(request_id.into()),
        }
    }
}
