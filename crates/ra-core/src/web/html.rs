//! HTML rendering of the survey form.

use ra_common::field::{AGE_RANGE, CHILDREN_RANGE};
use ra_common::{EncodeError, FieldKind, RawSurvey, RiskLabel, SurveyField};
use ra_config::FormDefaults;

use crate::assess::Assessment;

pub const PAGE_TITLE: &str = "Chronic Disease Risk Prediction";

/// Message shown above the form after a submission.
#[derive(Debug, Clone, Copy)]
pub enum Banner<'a> {
    Outcome(&'a Assessment),
    FieldError(&'a EncodeError),
    Failure(&'a str),
}

/// Render the full page. `values` are the submitted answers to echo back;
/// questions without a submitted answer show the configured default.
pub fn render_page(
    defaults: &FormDefaults,
    values: Option<&RawSurvey>,
    banner: Option<Banner<'_>>,
) -> String {
    let field_error = match banner {
        Some(Banner::FieldError(e)) => Some(e),
        _ => None,
    };
    let column = |fields: &[SurveyField]| {
        fields
            .iter()
            .map(|f| render_field(*f, defaults, values, field_error))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
body {{ font-family: 'Inter', sans-serif; max-width: 760px; margin: 2rem auto; color: #2c3e50; }}
h1 {{ color: skyblue; text-align: center; text-shadow: 2px 2px 4px rgba(0,0,0,0.5); }}
.subtitle {{ text-align: center; color: #555; }}
form {{ background: rgba(255,255,255,0.85); padding: 30px; border-radius: 15px; box-shadow: 0 4px 10px rgba(0,0,0,0.2); }}
.columns {{ display: grid; grid-template-columns: 1fr 1fr; gap: 0 24px; }}
.field {{ margin-bottom: 15px; display: flex; flex-direction: column; }}
.field-error {{ color: #c0392b; font-size: 0.9em; }}
.alert {{ border-radius: 10px; padding: 12px 16px; margin: 1rem 0; }}
.alert-error {{ background: #fdecea; color: #8a1c12; }}
.alert-success {{ background: #e8f6ee; color: #1d6b3a; }}
button {{ width: 100%; padding: 12px 20px; font-size: 18px; border: none; border-radius: 25px; color: white; background: linear-gradient(to right, #6a11cb 0%, #2575fc 100%); cursor: pointer; }}
</style>
</head>
<body>
<h1>🧠 {title}</h1>
<p class="subtitle">Assess lifestyle and health factors to predict risks associated with depression and chronic conditions.</p>
<details>
<summary><strong>About the Project</strong></summary>
<h3>Goal</h3>
<p>This project uses a Decision Tree model to analyze lifestyle, demographic, and medical history data to assess the risk of chronic medical conditions, including depression.</p>
<h3>Model Details</h3>
<ul>
<li><strong>Algorithm:</strong> Decision Tree Classifier</li>
<li><strong>Context:</strong> Built to understand correlations between mental health history, lifestyle (sleep, diet, substance use), and chronic disease outcomes.</li>
</ul>
<h3>Disclaimer</h3>
<p><em>This tool is for educational purposes only and does not constitute medical advice.</em></p>
</details>
{banner}
<form method="post" action="/predict">
<div class="columns">
<div class="column">
{left}
</div>
<div class="column">
{right}
</div>
</div>
<button type="submit">Predict</button>
</form>
</body>
</html>
"##,
        title = PAGE_TITLE,
        banner = banner.map(render_banner).unwrap_or_default(),
        left = column(&SurveyField::ALL[..7]),
        right = column(&SurveyField::ALL[7..]),
    )
}

fn render_banner(banner: Banner<'_>) -> String {
    match banner {
        Banner::Outcome(assessment) => match assessment.label {
            RiskLabel::High => format!(
                r#"<div class="alert alert-error" role="alert">⚠️ <strong>Prediction:</strong> {}</div>"#,
                html_escape(&assessment.message)
            ),
            RiskLabel::Low => format!(
                r#"<div class="alert alert-success" role="status">✅ <strong>Prediction:</strong> {}</div>"#,
                html_escape(&assessment.message)
            ),
        },
        Banner::FieldError(e) => format!(
            r#"<div class="alert alert-error" role="alert"><strong>{}:</strong> {}</div>"#,
            html_escape(e.field().label()),
            html_escape(&e.field_message())
        ),
        Banner::Failure(message) => format!(
            r#"<div class="alert alert-error" role="alert">{}</div>"#,
            html_escape(message)
        ),
    }
}

fn render_field(
    field: SurveyField,
    defaults: &FormDefaults,
    values: Option<&RawSurvey>,
    error: Option<&EncodeError>,
) -> String {
    let submitted = values.and_then(|v| v.get(field)).map(|v| v.as_display());
    let control = match field.kind() {
        FieldKind::Integer | FieldKind::Real => {
            let (min, max, step, default) = match field {
                SurveyField::Age => (
                    AGE_RANGE.0.to_string(),
                    Some(AGE_RANGE.1.to_string()),
                    "1".to_string(),
                    defaults.default_age.to_string(),
                ),
                SurveyField::NumberOfChildren => (
                    CHILDREN_RANGE.0.to_string(),
                    Some(CHILDREN_RANGE.1.to_string()),
                    "1".to_string(),
                    defaults.default_children.to_string(),
                ),
                _ => (
                    "0".to_string(),
                    None,
                    defaults.income_step.to_string(),
                    format!("{:.1}", defaults.default_income),
                ),
            };
            format!(
                r#"<input type="number" id="{key}" name="{key}" min="{min}"{max} step="{step}" value="{value}" required>"#,
                key = field.key(),
                min = min,
                max = max
                    .map(|m| format!(r#" max="{}""#, m))
                    .unwrap_or_default(),
                step = step,
                value = html_escape(submitted.as_deref().unwrap_or(&default)),
            )
        }
        FieldKind::Categorical => {
            let options = field
                .options()
                .unwrap_or_default()
                .iter()
                .map(|(label, _)| {
                    let selected = if submitted.as_deref() == Some(*label) {
                        " selected"
                    } else {
                        ""
                    };
                    format!(
                        r#"<option value="{v}"{selected}>{v}</option>"#,
                        v = html_escape(label),
                        selected = selected
                    )
                })
                .collect::<Vec<_>>()
                .join("");
            format!(
                r#"<select id="{key}" name="{key}">{options}</select>"#,
                key = field.key(),
                options = options
            )
        }
    };

    let message = match error {
        Some(e) if e.field() == field => format!(
            r#"<span class="field-error">{}</span>"#,
            html_escape(&e.field_message())
        ),
        _ => String::new(),
    };

    format!(
        r#"<div class="field"><label for="{key}">{label}</label>{control}{message}</div>"#,
        key = field.key(),
        label = html_escape(field.label()),
        control = control,
        message = message
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assess::{WEB_HIGH_MESSAGE, WEB_LOW_MESSAGE};
    use ra_common::FeatureVector;

    fn assessment(label: RiskLabel, message: &str) -> Assessment {
        Assessment {
            label,
            message: message.to_string(),
            features: FeatureVector::new([0.0; 14]),
        }
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_blank_form_has_defaults_and_constraints() {
        let html = render_page(&FormDefaults::default(), None, None);
        assert!(html.contains("<title>Chronic Disease Risk Prediction</title>"));
        assert!(html.contains(r#"name="age" min="0" max="120" step="1" value="30""#));
        assert!(html.contains(r#"name="number_of_children" min="0" max="20" step="1" value="0""#));
        assert!(html.contains(r#"name="income" min="0" step="1000" value="50000.0""#));
        assert!(html.contains("educational purposes only"));
        assert!(!html.contains(r#"class="alert"#));
    }

    #[test]
    fn test_selects_list_labels_in_code_order() {
        let html = render_page(&FormDefaults::default(), None, None);
        let divorced = html.find(r#"<option value="Divorced">"#).unwrap();
        let married = html.find(r#"<option value="Married">"#).unwrap();
        let widowed = html.find(r#"<option value="Widowed">"#).unwrap();
        assert!(divorced < married && married < widowed);
        assert!(html.contains(r#"<option value="Bachelor&#x27;s Degree">"#));
        assert_eq!(html.matches("<select").count(), 11);
    }

    #[test]
    fn test_outcome_banners() {
        let high = assessment(RiskLabel::High, WEB_HIGH_MESSAGE);
        let html = render_page(&FormDefaults::default(), None, Some(Banner::Outcome(&high)));
        assert!(html.contains(r#"class="alert alert-error""#));
        assert!(html.contains(WEB_HIGH_MESSAGE));

        let low = assessment(RiskLabel::Low, WEB_LOW_MESSAGE);
        let html = render_page(&FormDefaults::default(), None, Some(Banner::Outcome(&low)));
        assert!(html.contains(r#"class="alert alert-success""#));
        assert!(html.contains(WEB_LOW_MESSAGE));
    }

    #[test]
    fn test_submitted_values_preserved() {
        let values = RawSurvey::new()
            .with("age", "44")
            .with("sleep_patterns", "Poor");
        let html = render_page(&FormDefaults::default(), Some(&values), None);
        assert!(html.contains(r#"value="44""#));
        assert!(html.contains(r#"<option value="Poor" selected>"#));
    }

    #[test]
    fn test_field_error_marks_field() {
        let err = EncodeError::UnknownCategory {
            field: SurveyField::MaritalStatus,
            value: "<Engaged>".to_string(),
        };
        let html = render_page(
            &FormDefaults::default(),
            None,
            Some(Banner::FieldError(&err)),
        );
        assert!(html.contains("<strong>Marital Status:</strong>"));
        assert!(html.contains(r#"<span class="field-error">"#));
        assert!(html.contains("&lt;Engaged&gt;"));
        assert!(!html.contains("<Engaged>"));
    }
}
