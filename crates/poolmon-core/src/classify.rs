//! Parameter status classification
//!
//! Pure, total functions: parse failures degrade to `Unknown`, never to a
//! panic or error, because the classifier sits directly behind user input.

use serde::Serialize;

use crate::decimal::parse_decimal;
use crate::ranges::range_for;
use crate::types::Parameter;

/// Where a value sits relative to its optimal range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterStatus {
    Optimal,
    Low,
    High,
    Unknown,
}

/// Classify a parameter value against its optimal range.
///
/// Both bounds are inclusive: `min <= v <= max` is `Optimal`. Non-finite
/// values classify as `Unknown`.
pub fn classify(parameter: Parameter, value: f64) -> ParameterStatus {
    if !value.is_finite() {
        return ParameterStatus::Unknown;
    }
    let range = range_for(parameter);
    if value < range.min {
        ParameterStatus::Low
    } else if value > range.max {
        ParameterStatus::High
    } else {
        ParameterStatus::Optimal
    }
}

/// String-boundary form of [`classify`].
///
/// Accepts the sheet name of the parameter and a raw decimal string with
/// either separator. An unrecognized name or unparseable value degrades to
/// `Unknown`.
pub fn classify_named(name: &str, raw: &str) -> ParameterStatus {
    let Some(parameter) = Parameter::from_name(name) else {
        return ParameterStatus::Unknown;
    };
    match parse_decimal(raw) {
        Ok(value) => classify(parameter, value),
        Err(_) => ParameterStatus::Unknown,
    }
}

/// Display attributes for a status, for the UI collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusStyle {
    pub color: &'static str,
    pub label: &'static str,
    pub css_class: &'static str,
}

/// Status → color / localized label / severity class.
pub fn status_style(status: ParameterStatus) -> StatusStyle {
    match status {
        ParameterStatus::Optimal => StatusStyle {
            color: "#00ff00",
            label: "ÓPTIMO",
            css_class: "status-optimal",
        },
        ParameterStatus::Low => StatusStyle {
            color: "#ffa500",
            label: "BAJO",
            css_class: "status-warning",
        },
        ParameterStatus::High => StatusStyle {
            color: "#ff0000",
            label: "ALTO",
            css_class: "status-critical",
        },
        ParameterStatus::Unknown => StatusStyle {
            color: "#808080",
            label: "DESCONOCIDO",
            css_class: "status-warning",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_inclusive() {
        // pH range is [7.2, 7.6]
        assert_eq!(classify(Parameter::Ph, 7.2), ParameterStatus::Optimal);
        assert_eq!(classify(Parameter::Ph, 7.6), ParameterStatus::Optimal);
        assert_eq!(classify(Parameter::Ph, 7.4), ParameterStatus::Optimal);
    }

    #[test]
    fn test_low_and_high() {
        assert_eq!(classify(Parameter::Ph, 7.19), ParameterStatus::Low);
        assert_eq!(classify(Parameter::Ph, 7.61), ParameterStatus::High);
        assert_eq!(classify(Parameter::Salinity, 2000.0), ParameterStatus::Low);
        assert_eq!(classify(Parameter::Salinity, 5000.0), ParameterStatus::High);
    }

    #[test]
    fn test_non_finite_is_unknown() {
        assert_eq!(classify(Parameter::Fac, f64::NAN), ParameterStatus::Unknown);
        assert_eq!(
            classify(Parameter::Fac, f64::INFINITY),
            ParameterStatus::Unknown
        );
    }

    #[test]
    fn test_named_form_is_total() {
        assert_eq!(classify_named("pH", "7,4"), ParameterStatus::Optimal);
        assert_eq!(classify_named("pH", "6.8"), ParameterStatus::Low);
        assert_eq!(classify_named("Alcalinidad", "100"), ParameterStatus::Unknown);
        assert_eq!(classify_named("pH", "not-a-number"), ParameterStatus::Unknown);
        assert_eq!(classify_named("", ""), ParameterStatus::Unknown);
    }

    #[test]
    fn test_status_styles() {
        assert_eq!(status_style(ParameterStatus::Optimal).label, "ÓPTIMO");
        assert_eq!(status_style(ParameterStatus::Low).label, "BAJO");
        assert_eq!(status_style(ParameterStatus::High).label, "ALTO");
        assert_eq!(status_style(ParameterStatus::Unknown).label, "DESCONOCIDO");
        // Unknown renders as a warning, not a hard failure.
        assert_eq!(
            status_style(ParameterStatus::Unknown).css_class,
            "status-warning"
        );
    }
}
