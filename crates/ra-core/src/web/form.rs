//! `application/x-www-form-urlencoded` survey bodies.

use ra_common::RawSurvey;
use url::form_urlencoded;

/// Decode a form body into raw answers. Keys are the snake-case field keys
/// the HTML form uses; unknown keys are carried along and ignored later.
pub fn parse_form(body: &[u8]) -> RawSurvey {
    RawSurvey::from_pairs(form_urlencoded::parse(body).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ra_common::{RawValue, SurveyField};

    #[test]
    fn test_decodes_plus_and_percent() {
        let raw = parse_form(b"education_level=Bachelor%27s+Degree&age=30&csrf=x");
        assert_eq!(
            raw.get(SurveyField::EducationLevel),
            Some(&RawValue::Text("Bachelor's Degree".to_string()))
        );
        assert_eq!(
            raw.get(SurveyField::Age),
            Some(&RawValue::Text("30".to_string()))
        );
    }

    #[test]
    fn test_empty_body() {
        assert!(parse_form(b"").is_empty());
    }
}
