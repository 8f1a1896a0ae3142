//! Web form front end.
//!
//! A blocking `tiny_http` server on a background thread. Routes:
//! - `GET /` the survey form
//! - `POST /predict` form submission, answered with the same page
//! - `POST /api/predict` JSON survey in, JSON assessment out
//! - `GET /api/categories` the category map
//! - `GET /api/model` loaded model provenance
//! - `GET /health` liveness

pub mod form;
pub mod html;

use ra_common::{CategoryMap, RawSurvey, StructuredError};
use serde::Serialize;
use std::io::Read;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tiny_http::Method;
use tracing::{error, warn};

use crate::assess::{AppContext, AssessError, MessageStyle};
use crate::log_event;
use crate::logging::{event_names, generate_request_id, LogContext, Stage};
use html::{render_page, Banner};

const HTML: &str = "text/html; charset=utf-8";
const JSON: &str = "application/json";
const TEXT: &str = "text/plain; charset=utf-8";

/// Errors starting the web server.
#[derive(Error, Debug)]
pub enum WebError {
    #[error("invalid bind address {addr}: {message}")]
    InvalidAddress { addr: String, message: String },

    #[error("failed to start web server on {addr}: {message}")]
    Bind { addr: SocketAddr, message: String },

    #[error("failed to spawn web server thread: {0}")]
    Spawn(#[source] std::io::Error),
}

impl From<WebError> for ra_common::Error {
    fn from(err: WebError) -> Self {
        match err {
            WebError::InvalidAddress { .. } => ra_common::Error::Config(err.to_string()),
            WebError::Bind { .. } => ra_common::Error::Io(std::io::Error::other(err.to_string())),
            WebError::Spawn(e) => ra_common::Error::Io(e),
        }
    }
}

/// A rendered HTTP response, independent of the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct WebResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl WebResponse {
    fn html(status: u16, body: String) -> Self {
        WebResponse {
            status,
            content_type: HTML,
            body,
        }
    }

    fn text(status: u16, body: impl Into<String>) -> Self {
        WebResponse {
            status,
            content_type: TEXT,
            body: body.into(),
        }
    }

    fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_string_pretty(value) {
            Ok(body) => WebResponse {
                status,
                content_type: JSON,
                body,
            },
            Err(e) => WebResponse::text(500, format!("serialization failed: {}", e)),
        }
    }
}

/// Handle to the running web server.
pub struct WebServer {
    shutdown: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<()>>,
    addr: SocketAddr,
}

impl WebServer {
    /// Bind `settings.server` and serve on a background thread.
    pub fn start(ctx: AppContext) -> Result<Self, WebError> {
        let listen = ctx.settings.listen_addr();
        let addr: SocketAddr = listen.parse().map_err(|e: std::net::AddrParseError| {
            WebError::InvalidAddress {
                addr: listen.clone(),
                message: e.to_string(),
            }
        })?;

        let server = tiny_http::Server::http(addr).map_err(|e| WebError::Bind {
            addr,
            message: e.to_string(),
        })?;
        let addr = server.server_addr().to_ip().unwrap_or(addr);

        log_event!(
            ctx.log,
            INFO,
            event_names::SERVE_STARTED,
            Stage::Serve,
            "web form listening",
            addr = addr.to_string().as_str(),
            model_id = ctx.predictor.info().model_id.as_str()
        );

        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let thread = thread::Builder::new()
            .name("ra-web".to_string())
            .spawn(move || {
                serve_loop(server, &ctx, &shutdown_clone);
                log_event!(
                    ctx.log,
                    INFO,
                    event_names::SERVE_STOPPED,
                    Stage::Serve,
                    "web form stopped"
                );
            })
            .map_err(WebError::Spawn)?;

        Ok(Self {
            shutdown,
            thread: Some(thread),
            addr,
        })
    }

    /// Get the bound address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Block until the serve loop exits.
    pub fn wait(mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }

    /// Stop serving and join the thread.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        // Unblock the accept loop
        let _ = std::net::TcpStream::connect(self.addr);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for WebServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn serve_loop(server: tiny_http::Server, ctx: &AppContext, shutdown: &AtomicBool) {
    let limit = ctx.settings.server.max_body_bytes;
    loop {
        if shutdown.load(Ordering::SeqCst) {
            break;
        }

        // Accept with timeout so we can check shutdown flag
        let mut request = match server.recv_timeout(Duration::from_secs(1)) {
            Ok(Some(req)) => req,
            Ok(None) => continue,
            Err(e) => {
                if !shutdown.load(Ordering::SeqCst) {
                    error!(error = %e, "web server accept error");
                }
                break;
            }
        };

        if shutdown.load(Ordering::SeqCst) {
            let _ = request
                .respond(tiny_http::Response::from_string("shutting down").with_status_code(503));
            break;
        }

        let log = ctx.log.with_request_id(generate_request_id());
        let method = request.method().clone();
        let url = request.url().to_string();

        let response = match read_body(&mut request, limit) {
            Ok(body) => route(ctx, &log, &method, &url, &body),
            Err(response) => response,
        };

        log_event!(
            log,
            DEBUG,
            event_names::SERVE_REQUEST,
            Stage::Serve,
            "request handled",
            method = method.as_str(),
            url = url.as_str(),
            status = response.status
        );

        let mut reply = tiny_http::Response::from_data(response.body.into_bytes())
            .with_status_code(response.status);
        if let Ok(header) =
            tiny_http::Header::from_bytes(&b"Content-Type"[..], response.content_type.as_bytes())
        {
            reply = reply.with_header(header);
        }
        if let Err(e) = request.respond(reply) {
            warn!(error = %e, "failed to send response");
        }
    }
}

/// Read at most `limit` bytes of body; larger bodies are answered with 413.
fn read_body(request: &mut tiny_http::Request, limit: usize) -> Result<Vec<u8>, WebResponse> {
    let too_large = || {
        WebResponse::text(
            413,
            format!("request body exceeds {} bytes", limit),
        )
    };
    if request.body_length().is_some_and(|len| len > limit) {
        return Err(too_large());
    }
    let mut body = Vec::new();
    request
        .as_reader()
        .take(limit as u64 + 1)
        .read_to_end(&mut body)
        .map_err(|e| WebResponse::text(400, format!("failed to read request body: {}", e)))?;
    if body.len() > limit {
        return Err(too_large());
    }
    Ok(body)
}

/// Dispatch one request.
pub fn route(
    ctx: &AppContext,
    log: &LogContext,
    method: &Method,
    url: &str,
    body: &[u8],
) -> WebResponse {
    let path = url.split('?').next().unwrap_or(url);
    match (method, path) {
        (Method::Get, "/") => WebResponse::html(200, render_page(&ctx.settings.form, None, None)),
        (Method::Post, "/predict") => predict_form(ctx, log, body),
        (Method::Post, "/api/predict") => predict_json(ctx, log, body),
        (Method::Get, "/api/categories") => WebResponse::json(200, &CategoryMap::canonical()),
        (Method::Get, "/api/model") => WebResponse::json(200, ctx.predictor.info()),
        (Method::Get, "/health") | (Method::Get, "/healthz") => WebResponse::text(200, "ok"),
        _ => WebResponse::text(404, "not found"),
    }
}

fn predict_form(ctx: &AppContext, log: &LogContext, body: &[u8]) -> WebResponse {
    let raw = form::parse_form(body);
    let defaults = &ctx.settings.form;
    match ctx.assess_logged(&raw, MessageStyle::Web, log) {
        Ok(assessment) => WebResponse::html(
            200,
            render_page(defaults, Some(&raw), Some(Banner::Outcome(&assessment))),
        ),
        Err(AssessError::Encode(e)) => WebResponse::html(
            422,
            render_page(defaults, Some(&raw), Some(Banner::FieldError(&e))),
        ),
        Err(err @ AssessError::Inference(_)) => {
            let message = err.user_message(MessageStyle::Web);
            WebResponse::html(
                500,
                render_page(defaults, Some(&raw), Some(Banner::Failure(&message))),
            )
        }
    }
}

fn predict_json(ctx: &AppContext, log: &LogContext, body: &[u8]) -> WebResponse {
    let raw: RawSurvey = match serde_json::from_slice(body) {
        Ok(raw) => raw,
        Err(e) => {
            let err = ra_common::Error::Json(e);
            return WebResponse::json(400, &StructuredError::from(&err));
        }
    };
    match ctx.assess_logged(&raw, MessageStyle::Web, log) {
        Ok(assessment) => WebResponse::json(200, &assessment),
        Err(err) => {
            let status = match err {
                AssessError::Encode(_) => 422,
                AssessError::Inference(_) => 500,
            };
            let err = ra_common::Error::from(err);
            WebResponse::json(status, &StructuredError::from(&err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assess::{WEB_HIGH_MESSAGE, WEB_LOW_MESSAGE};
    use crate::predictor::fixtures::{constant_predictor, reference_predictor};
    use crate::predictor::Predictor;
    use ra_config::Settings;

    fn context(predictor: Predictor) -> AppContext {
        AppContext::new(predictor, Settings::default(), LogContext::new("run-test"))
    }

    fn form_body(overrides: &[(&str, &str)]) -> Vec<u8> {
        let mut pairs = vec![
            ("age", "30"),
            ("marital_status", "Married"),
            ("education_level", "Bachelor's Degree"),
            ("number_of_children", "0"),
            ("smoking_status", "Non-smoker"),
            ("physical_activity_level", "Active"),
            ("employment_status", "Employed"),
            ("income", "50000.0"),
            ("alcohol_consumption", "Low"),
            ("dietary_habits", "Healthy"),
            ("sleep_patterns", "Good"),
            ("mental_illness_history", "No"),
            ("substance_abuse_history", "No"),
            ("family_history_depression", "No"),
        ];
        for (k, v) in overrides {
            if let Some(pair) = pairs.iter_mut().find(|(key, _)| key == k) {
                pair.1 = *v;
            }
        }
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish()
            .into_bytes()
    }

    fn call(ctx: &AppContext, method: Method, url: &str, body: &[u8]) -> WebResponse {
        route(ctx, &ctx.log, &method, url, body)
    }

    #[test]
    fn test_index_renders_form() {
        let ctx = context(reference_predictor());
        let resp = call(&ctx, Method::Get, "/", b"");
        assert_eq!(resp.status, 200);
        assert_eq!(resp.content_type, HTML);
        assert!(resp.body.contains("<form method=\"post\" action=\"/predict\">"));
    }

    #[test]
    fn test_form_predict_low_and_high() {
        let ctx = context(reference_predictor());
        let resp = call(&ctx, Method::Post, "/predict", &form_body(&[]));
        assert_eq!(resp.status, 200);
        assert!(resp.body.contains(WEB_LOW_MESSAGE));

        let resp = call(
            &ctx,
            Method::Post,
            "/predict",
            &form_body(&[("sleep_patterns", "Poor")]),
        );
        assert_eq!(resp.status, 200);
        assert!(resp.body.contains(WEB_HIGH_MESSAGE));
        assert!(resp.body.contains(r#"<option value="Poor" selected>"#));
    }

    #[test]
    fn test_form_unknown_label_is_422_naming_field() {
        let ctx = context(reference_predictor());
        let resp = call(
            &ctx,
            Method::Post,
            "/predict",
            &form_body(&[("marital_status", "Separated")]),
        );
        assert_eq!(resp.status, 422);
        assert!(resp.body.contains("<strong>Marital Status:</strong>"));
        assert!(!resp.body.contains(WEB_LOW_MESSAGE));
    }

    #[test]
    fn test_form_inference_failure_is_500() {
        let ctx = context(constant_predictor(9));
        let resp = call(&ctx, Method::Post, "/predict", &form_body(&[]));
        assert_eq!(resp.status, 500);
        assert!(resp.body.contains("An error occurred during prediction: "));
    }

    #[test]
    fn test_json_api() {
        let ctx = context(reference_predictor());
        let body = serde_json::json!({
            "age": 30, "marital_status": "Married", "education_level": "Bachelor's Degree",
            "number_of_children": 0, "smoking_status": "Non-smoker",
            "physical_activity_level": "Active", "employment_status": "Employed",
            "income": 50000.0, "alcohol_consumption": "Low", "dietary_habits": "Healthy",
            "sleep_patterns": "Poor", "mental_illness_history": "No",
            "substance_abuse_history": "No", "family_history_depression": "No"
        })
        .to_string();
        let resp = call(&ctx, Method::Post, "/api/predict", body.as_bytes());
        assert_eq!(resp.status, 200);
        let value: serde_json::Value = serde_json::from_str(&resp.body).unwrap();
        assert_eq!(value["label"], "high");
        assert_eq!(value["features"].as_array().unwrap().len(), 14);
        assert_eq!(value["features"][10], 2.0);
    }

    #[test]
    fn test_json_api_errors() {
        let ctx = context(reference_predictor());
        let resp = call(&ctx, Method::Post, "/api/predict", b"{\"age\": 30}");
        assert_eq!(resp.status, 422);
        let value: serde_json::Value = serde_json::from_str(&resp.body).unwrap();
        assert_eq!(value["code"], 10);
        assert_eq!(value["context"]["field"], "Marital Status");

        let resp = call(&ctx, Method::Post, "/api/predict", b"not json");
        assert_eq!(resp.status, 400);
    }

    #[test]
    fn test_categories_and_health() {
        let ctx = context(reference_predictor());
        let resp = call(&ctx, Method::Get, "/api/categories", b"");
        assert_eq!(resp.status, 200);
        assert!(resp.body.contains("Non-smoker"));

        let resp = call(&ctx, Method::Get, "/health", b"");
        assert_eq!(resp.body, "ok");

        let resp = call(&ctx, Method::Get, "/api/model", b"");
        assert!(resp.body.contains("test-tree"));
    }

    #[test]
    fn test_unknown_route_and_query_string() {
        let ctx = context(reference_predictor());
        assert_eq!(call(&ctx, Method::Get, "/nope", b"").status, 404);
        assert_eq!(call(&ctx, Method::Get, "/predict", b"").status, 404);
        assert_eq!(call(&ctx, Method::Get, "/?lang=en", b"").status, 200);
    }

    #[test]
    fn test_server_round_trip() {
        use std::io::Write;
        use std::net::TcpStream;

        let port = 18501 + (std::process::id() % 1000) as u16;
        let mut settings = Settings::default();
        settings.server.port = port;
        settings.server.max_body_bytes = 2048;
        let ctx = AppContext::new(reference_predictor(), settings, LogContext::new("run-test"));

        let server = match WebServer::start(ctx) {
            Ok(s) => s,
            Err(_) => return, // port in use; skip
        };

        let mut stream = TcpStream::connect(server.addr()).unwrap();
        write!(stream, "GET /health HTTP/1.0\r\n\r\n").unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).unwrap();
        assert!(response.starts_with("HTTP/1.0 200") || response.starts_with("HTTP/1.1 200"));
        assert!(response.ends_with("ok"));

        let body = "x".repeat(4096);
        let mut stream = TcpStream::connect(server.addr()).unwrap();
        let _ = write!(
            stream,
            "POST /predict HTTP/1.0\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        );
        let mut response = String::new();
        let _ = stream.read_to_string(&mut response);
        assert!(response.contains(" 413 "));

        server.shutdown();
    }
}
