//! Fuzz target for urlencoded web form bodies through the full pipeline.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ra_common::FEATURE_NAMES;
use ra_config::Settings;
use ra_core::logging::LogContext;
use ra_core::web::form::parse_form;
use ra_core::web::html::{render_page, Banner};
use ra_core::{assess, AppContext, AssessError, MessageStyle, Predictor};
use ra_model::testing::reference_artifact_json;
use ra_model::LoadedModel;

fuzz_target!(|data: &[u8]| {
    let Ok(model) = LoadedModel::from_bytes(reference_artifact_json().as_bytes(), &FEATURE_NAMES)
    else {
        return;
    };
    let ctx = AppContext::new(
        Predictor::from_model(model),
        Settings::default(),
        LogContext::new("run-fuzz"),
    );

    let raw = parse_form(data);
    let defaults = &ctx.settings.form;
    let _ = match assess(&raw, &ctx.predictor, MessageStyle::Web) {
        Ok(a) => render_page(defaults, Some(&raw), Some(Banner::Outcome(&a))),
        Err(AssessError::Encode(e)) => render_page(defaults, Some(&raw), Some(Banner::FieldError(&e))),
        Err(e) => render_page(
            defaults,
            Some(&raw),
            Some(Banner::Failure(&e.user_message(MessageStyle::Web))),
        ),
    };
});
