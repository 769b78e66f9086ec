// Read-time display helpers. Nothing here is cached in the store.

use crate::store::{LocationZone, Predictor};

/// Shown in place of a value when there is no result yet.
pub const NO_VALUE: &str = "—";

/// Format a currency amount as `$452,000` or `$1,234.5`.
///
/// At most three fraction digits, trailing zeros dropped, thousands
/// separated with commas.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return NO_VALUE.to_string();
    }

    let rounded = format!("{:.3}", value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(rounded.len() + 4);
    if value < 0.0 && (int_part != "0" || !frac_part.is_empty()) {
        out.push('-');
    }
    out.push('$');
    out.push_str(&group_thousands(int_part));
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// `format_currency` for an optional result.
pub fn format_result(result: Option<f64>) -> String {
    result.map(format_currency).unwrap_or_else(|| NO_VALUE.to_string())
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

impl Predictor {
    /// Short label used in the result panel heading.
    pub fn label(self) -> &'static str {
        match self {
            Predictor::Predictor1 => "Predictor-1",
            Predictor::Predictor2 => "Predictor-2",
        }
    }

    /// Human name of the model behind the predictor.
    pub fn model_name(self) -> &'static str {
        match self {
            Predictor::Predictor1 => "Linear Regression",
            Predictor::Predictor2 => "Random Forest Regression",
        }
    }
}

impl LocationZone {
    pub fn label(self) -> &'static str {
        match self {
            LocationZone::City => "City",
            LocationZone::Suburb => "Suburb",
            LocationZone::Rural => "Rural",
        }
    }
}
