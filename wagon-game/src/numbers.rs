//! Numeric conversion helpers centralizing payload coercion and safe casts.

use num_traits::cast::cast;
use serde_json::Value;

/// Coerce a textual day count such as `"3"`, `" 3 "` or `"3.0"` into an integer.
///
/// Returns `None` for empty text, non-numeric text, non-finite values and
/// values with a fractional part.
#[must_use]
pub fn coerce_day_count(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(value);
    }
    trimmed.parse::<f64>().ok().and_then(integral_f64_to_i64)
}

/// Coerce a JSON payload (number or numeric string) into an integer day count.
#[must_use]
pub fn json_day_count(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().and_then(integral_f64_to_i64)),
        Value::String(text) => coerce_day_count(text),
        _ => None,
    }
}

/// Convert an integral, finite f64 to i64, rejecting fractions and out-of-range values.
#[must_use]
pub fn integral_f64_to_i64(value: f64) -> Option<i64> {
    if !value.is_finite() || value.fract() != 0.0 {
        return None;
    }
    cast::<f64, i64>(value)
}

/// Narrow a day count into the `u32` travel payload range.
#[must_use]
pub fn day_count_to_u32(value: i64) -> Option<u32> {
    cast::<i64, u32>(value)
}

/// Multiply a per-day amount by a day count, saturating at the i64 bounds.
#[must_use]
pub fn saturating_scale(days: u32, per_day: i64) -> i64 {
    i64::from(days).saturating_mul(per_day)
}

/// Multiply a per-day distance by a day count, saturating at `u64::MAX`.
#[must_use]
pub fn saturating_scale_u64(days: u32, per_day: u64) -> u64 {
    u64::from(days).saturating_mul(per_day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coerce_accepts_padded_and_integral_float_text() {
        assert_eq!(coerce_day_count("3"), Some(3));
        assert_eq!(coerce_day_count("  7 "), Some(7));
        assert_eq!(coerce_day_count("3.0"), Some(3));
        assert_eq!(coerce_day_count("-2"), Some(-2));
    }

    #[test]
    fn coerce_rejects_garbage() {
        assert_eq!(coerce_day_count(""), None);
        assert_eq!(coerce_day_count("three"), None);
        assert_eq!(coerce_day_count("2.5"), None);
        assert_eq!(coerce_day_count("NaN"), None);
        assert_eq!(coerce_day_count("inf"), None);
    }

    #[test]
    fn json_payloads_cover_numbers_and_strings() {
        assert_eq!(json_day_count(&json!(4)), Some(4));
        assert_eq!(json_day_count(&json!(4.0)), Some(4));
        assert_eq!(json_day_count(&json!("5")), Some(5));
        assert_eq!(json_day_count(&json!(1.5)), None);
        assert_eq!(json_day_count(&json!(true)), None);
        assert_eq!(json_day_count(&Value::Null), None);
    }

    #[test]
    fn narrowing_and_scaling_respect_bounds() {
        assert_eq!(day_count_to_u32(3), Some(3));
        assert_eq!(day_count_to_u32(-1), None);
        assert_eq!(day_count_to_u32(i64::from(u32::MAX) + 1), None);
        assert_eq!(saturating_scale(3, 20), 60);
        assert_eq!(saturating_scale(u32::MAX, i64::MAX), i64::MAX);
        assert_eq!(saturating_scale_u64(3, 10), 30);
        assert_eq!(saturating_scale_u64(u32::MAX, u64::MAX), u64::MAX);
    }
}
