//! Structured logging.
//!
//! Events go to stderr, either as human lines or as one JSON object per
//! event; stdout stays reserved for command payloads. Every event carries the
//! run id, the web request id when there is one, and the pipeline stage.

pub mod config;
pub mod events;

pub use config::{LogConfig, LogFormat, LogLevel};
pub use events::{event_names, LogContext, Stage};

use std::io::{self, IsTerminal};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

type StderrLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn stderr_layer(config: &LogConfig) -> StderrLayer {
    match config.format {
        LogFormat::Jsonl => fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(false)
            .with_span_list(false)
            .with_writer(io::stderr)
            .boxed(),
        LogFormat::Human => {
            let layer = fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_ansi(io::stderr().is_terminal());
            if config.timestamps {
                layer.boxed()
            } else {
                layer.without_time().boxed()
            }
        }
    }
}

/// Install the global subscriber. Raw `RUST_LOG` directives win over
/// `config.level`; calling this twice keeps the first subscriber.
pub fn init_logging(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    let installed = tracing_subscriber::registry()
        .with(stderr_layer(config))
        .with(filter)
        .try_init();
    if installed.is_err() {
        tracing::debug!("subscriber already installed");
    }
}

/// `run-` followed by 12 hex digits.
pub fn generate_run_id() -> String {
    short_id("run", 12)
}

/// `req-` followed by 8 hex digits.
pub fn generate_request_id() -> String {
    short_id("req", 8)
}

fn short_id(prefix: &str, len: usize) -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix, &hex[..len])
}

/// Emit an event tagged with the context's ids and a stage.
///
/// ```ignore
/// log_event!(log, INFO, event_names::ASSESS_FINISHED, Stage::Predict,
///     "assessment complete", label = "low");
/// ```
#[macro_export]
macro_rules! log_event {
    ($ctx:expr, $level:ident, $event:expr, $stage:expr, $msg:expr $(, $key:ident = $val:expr)*) => {
        tracing::event!(
            target: $event,
            tracing::Level::$level,
            run_id = %$ctx.run_id,
            request_id = ?$ctx.request_id,
            stage = %$stage,
            message = $msg,
            $($key = $val,)*
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_prefixed_hex() {
        let run = generate_run_id();
        assert_eq!(run.len(), 16);
        assert!(run.starts_with("run-"));
        assert!(run[4..].chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(run, generate_run_id());

        let req = generate_request_id();
        assert_eq!(req.len(), 12);
        assert!(req.starts_with("req-"));
    }

    #[test]
    fn test_log_event_accepts_fields() {
        let ctx = LogContext::new("run-test").with_request_id("req-1");
        crate::log_event!(
            ctx,
            WARN,
            event_names::ASSESS_FINISHED,
            Stage::Predict,
            "test event",
            label = "low",
            class = 0
        );
    }
}
