use chrono::NaiveDate;

/// Shown wherever an aggregate has no defined value.
pub const NOT_AVAILABLE: &str = "N/A";

/// Amount rounded to the nearest whole unit, halves to even.
pub fn rounded_amount(value: f64, unit: &str) -> String {
    if !value.is_finite() {
        return exact_amount(value, unit);
    }
    format!("{} {unit}", value.round_ties_even() as i64)
}

pub fn optional_rounded_amount(value: Option<f64>, unit: &str) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| rounded_amount(v, unit))
}

/// Amount as stored, without rounding.
pub fn exact_amount(value: f64, unit: &str) -> String {
    format!("{value} {unit}")
}

pub fn date(value: Option<NaiveDate>) -> String {
    value.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

pub fn text(value: Option<&str>) -> &str {
    value.unwrap_or("")
}

/// Shorten long axis labels to `max` characters.
pub fn truncate(label: &str, max: usize) -> String {
    if label.chars().count() <= max {
        label.to_string()
    } else {
        let head: String = label.chars().take(max.saturating_sub(1)).collect();
        format!("{head}…")
    }
}
