//! Custom deserializers for lenient parsing of inference API payloads.
//!
//! Token-classification responses vary between serving backends. These
//! helpers let a single record type accept all of them without failing the
//! whole response because one field is odd.

use serde::{Deserialize, Deserializer};

/// Deserializes a character offset, mapping anything unusable to `None`.
///
/// # Accepted Formats
///
/// * **Numeric**: non-negative integers, or floats with no fractional part
/// * **String numeric**: `"12"` → 12
///
/// Negative numbers, fractional values, booleans, objects and unparseable
/// strings all become `None`, so the span carrying them is skipped rather
/// than rejecting the whole response.
///
/// # Examples
///
/// ```json
/// { "start": 4 }       // Some(4)
/// { "start": "4" }     // Some(4)
/// { "start": -1 }      // None
/// { "start": null }    // None
/// ```
pub fn de_option_offset_lenient<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(v) = opt else { return Ok(None) };
    let offset = match v {
        serde_json::Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                usize::try_from(u).ok()
            } else if let Some(f) = n.as_f64() {
                (f.is_finite() && f >= 0.0 && f.fract() == 0.0).then_some(f as usize)
            } else {
                None
            }
        }
        serde_json::Value::String(s) => s.trim().parse::<usize>().ok(),
        _ => None,
    };
    Ok(offset)
}

/// Deserializes an optional label, accepting any scalar and stringifying it.
///
/// Empty strings are kept as `Some("")`; callers decide what empty means.
pub fn de_option_label_lenient<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(v) = opt else { return Ok(None) };
    Ok(match v {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// Deserializes a confidence score, mapping anything unusable to `None`.
///
/// Accepts finite numbers and numeric strings (`"0.9"`); everything else,
/// including NaN spelled as a string, becomes `None`.
pub fn de_option_score_lenient<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(v) = opt else { return Ok(None) };
    let score = match v {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(score.filter(|f| f.is_finite()).map(|f| f as f32))
}
