//! Chronic disease risk assessment core library.
//!
//! This crate wires the survey encoder and the decision-tree classifier into
//! the two presentation adapters:
//! - Web form served over HTTP ([`web`])
//! - Interactive terminal form ([`prompt`])
//!
//! Both adapters call the same pipeline in [`assess`] with a [`Predictor`]
//! held by an explicit [`AppContext`].

pub mod assess;
pub mod config;
pub mod exit_codes;
pub mod logging;
pub mod predictor;
pub mod prompt;
pub mod web;

pub use assess::{assess, AppContext, AssessError, Assessment, MessageStyle};
pub use predictor::{ModelInfo, Predictor};
