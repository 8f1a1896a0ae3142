//! Interactive terminal form.
//!
//! Asks the fourteen questions in feature order, one per line. Numeric
//! questions show their default and accept an empty answer; categorical
//! questions show a numbered pick list whose first entry is the default.
//! Every answer is checked before moving on, so a submission reaching the
//! classifier is always complete.

use ra_common::{check_answer, FieldKind, RawSurvey, RawValue, SurveyField};
use ra_config::FormDefaults;
use std::io::{self, BufRead, Write};

use crate::assess::{AppContext, MessageStyle};

pub const FORM_HEADING: &str = "Enter Patient Details";

/// Tally of one interactive session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormSummary {
    pub submitted: usize,
    pub high: usize,
    pub low: usize,
    pub failed: usize,
}

/// Run the form until the user declines another patient or input ends.
pub fn run_form<R: BufRead, W: Write>(
    ctx: &AppContext,
    mut input: R,
    mut output: W,
) -> io::Result<FormSummary> {
    let mut summary = FormSummary::default();

    loop {
        writeln!(output, "{}", FORM_HEADING)?;
        writeln!(output, "{}", "=".repeat(FORM_HEADING.len()))?;

        let mut raw = RawSurvey::new();
        for field in SurveyField::ALL {
            match ask(field, &ctx.settings.form, &mut input, &mut output)? {
                Some(value) => raw.insert(field.label(), value),
                None => return Ok(summary),
            }
        }

        summary.submitted += 1;
        match ctx.assess(&raw, MessageStyle::Desktop) {
            Ok(assessment) => {
                if assessment.label.is_high() {
                    summary.high += 1;
                } else {
                    summary.low += 1;
                }
                writeln!(output)?;
                writeln!(output, "Prediction: {}", assessment.message)?;
            }
            Err(err) => {
                summary.failed += 1;
                writeln!(output)?;
                writeln!(output, "{}", err.user_message(MessageStyle::Desktop))?;
            }
        }
        writeln!(output)?;

        match read_answer("Assess another patient? [y/N]: ", &mut input, &mut output)? {
            Some(answer) if answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes") => {
                writeln!(output)?;
            }
            _ => return Ok(summary),
        }
    }
}

/// Ask one question until it gets a valid answer. `None` on end of input.
fn ask<R: BufRead, W: Write>(
    field: SurveyField,
    defaults: &FormDefaults,
    input: &mut R,
    output: &mut W,
) -> io::Result<Option<RawValue>> {
    let options = field.options().unwrap_or_default();
    if field.kind() == FieldKind::Categorical {
        writeln!(output, "{}:", field.label())?;
        for (i, (label, _)) in options.iter().enumerate() {
            writeln!(output, "  {}) {}", i + 1, label)?;
        }
    }

    loop {
        let prompt = match field.kind() {
            FieldKind::Categorical => format!("Choose 1-{} [1]: ", options.len()),
            _ => format!("{} [{}]: ", field.label(), numeric_default(field, defaults)),
        };
        let Some(answer) = read_answer(&prompt, input, output)? else {
            return Ok(None);
        };

        let value = if answer.is_empty() {
            match field.kind() {
                FieldKind::Categorical => options
                    .first()
                    .map(|(label, _)| RawValue::from(*label))
                    .unwrap_or_else(|| RawValue::from("")),
                _ => RawValue::Text(numeric_default(field, defaults)),
            }
        } else if field.kind() == FieldKind::Categorical {
            pick(options, &answer)
        } else {
            RawValue::Text(answer)
        };

        match check_answer(field, &value) {
            Ok(()) => return Ok(Some(value)),
            Err(e) => writeln!(output, "  {}", e.field_message())?,
        }
    }
}

/// Resolve a pick-list answer: a 1-based index or the label itself.
fn pick(options: &[(&'static str, u8)], answer: &str) -> RawValue {
    answer
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| options.get(i))
        .map(|(label, _)| RawValue::from(*label))
        .unwrap_or_else(|| RawValue::from(answer))
}

fn numeric_default(field: SurveyField, defaults: &FormDefaults) -> String {
    match field {
        SurveyField::Age => defaults.default_age.to_string(),
        SurveyField::NumberOfChildren => defaults.default_children.to_string(),
        _ => format!("{:.1}", defaults.default_income),
    }
}

fn read_answer<R: BufRead, W: Write>(
    prompt: &str,
    input: &mut R,
    output: &mut W,
) -> io::Result<Option<String>> {
    write!(output, "{}", prompt)?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assess::{DESKTOP_HIGH_MESSAGE, DESKTOP_LOW_MESSAGE};
    use crate::logging::LogContext;
    use crate::predictor::fixtures::{constant_predictor, reference_predictor};
    use crate::predictor::Predictor;
    use ra_config::Settings;
    use std::io::Cursor;

    fn context(predictor: Predictor) -> AppContext {
        AppContext::new(predictor, Settings::default(), LogContext::new("run-test"))
    }

    fn run(ctx: &AppContext, script: &str) -> (FormSummary, String) {
        let mut out = Vec::new();
        let summary = run_form(ctx, Cursor::new(script.as_bytes()), &mut out).unwrap();
        (summary, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_all_defaults_is_low() {
        let ctx = context(reference_predictor());
        let script = format!("{}n\n", "\n".repeat(14));
        let (summary, out) = run(&ctx, &script);
        assert!(out.starts_with(FORM_HEADING));
        assert!(out.contains("Age [30]: "));
        assert!(out.contains("Income [50000.0]: "));
        assert!(out.contains(&format!("Prediction: {}", DESKTOP_LOW_MESSAGE)));
        assert_eq!(
            summary,
            FormSummary {
                submitted: 1,
                low: 1,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_pick_by_number_and_label() {
        let ctx = context(reference_predictor());
        // Sleep Patterns is the eleventh question; "3" picks Poor.
        let script = format!("{}3\n\n\n\ny\n{}Poor\n\n\n\nn\n", "\n".repeat(10), "\n".repeat(10));
        let (summary, out) = run(&ctx, &script);
        assert_eq!(summary.submitted, 2);
        assert_eq!(summary.high, 2);
        assert_eq!(out.matches(DESKTOP_HIGH_MESSAGE).count(), 2);
        assert!(out.contains("  3) Poor"));
    }

    #[test]
    fn test_invalid_answers_reprompt() {
        let ctx = context(reference_predictor());
        // Age: out of range, then fractional, then valid. Marital status: 9 is
        // not on the list.
        let script = format!("150\n12.5\n40\n9\n{}n\n", "\n".repeat(13));
        let (summary, out) = run(&ctx, &script);
        assert!(out.contains("  Must be between 0 and 120."));
        assert!(out.contains("  Must be a whole number."));
        assert!(out.contains("\"9\" is not a valid choice."));
        assert_eq!(out.matches("Age [30]: ").count(), 3);
        assert_eq!(summary.submitted, 1);
    }

    #[test]
    fn test_eof_mid_form_submits_nothing() {
        let ctx = context(reference_predictor());
        let (summary, out) = run(&ctx, "45\n\n");
        assert_eq!(summary, FormSummary::default());
        assert!(!out.contains("Prediction:"));
    }

    #[test]
    fn test_inference_error_shown_as_invalid_input() {
        let ctx = context(constant_predictor(7));
        let script = format!("{}\n", "\n".repeat(14));
        let (summary, out) = run(&ctx, &script);
        assert_eq!(summary.failed, 1);
        assert!(out.contains("Invalid Input: "));
    }

    #[test]
    fn test_pick() {
        let options: &[(&str, u8)] = &[("Fair", 0), ("Good", 1), ("Poor", 2)];
        assert_eq!(pick(options, "2"), RawValue::from("Good"));
        assert_eq!(pick(options, "0"), RawValue::from("0"));
        assert_eq!(pick(options, "Poor"), RawValue::from("Poor"));
    }
}
