//! Field adapters that coerce loosely typed stored values instead of failing.
//!
//! Stored records were written by several panels over time, so numbers can
//! show up as strings, flags as numbers, and so on. Every adapter here is
//! total: anything it cannot make sense of becomes the type's zero value.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Numeric coercion: numbers pass through, numeric strings parse, booleans
/// become 1/0, everything else (and NaN/infinity) becomes 0.
pub fn number_from_value(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(0.0)
            }
        }
        Value::Bool(true) => 1.0,
        _ => 0.0,
    };
    if parsed.is_finite() { parsed } else { 0.0 }
}

/// Truthiness: `false`, `0`, `""` and `null` are false; everything else true.
pub fn flag_from_value(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value))
}

pub fn integer<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value).trunc() as i64)
}

pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(flag_from_value(&value))
}

pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

pub fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        other => Some(number_from_value(&other)),
    })
}

pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        _ => None,
    })
}

/// Trimmed color string; anything blank or non-string counts as no color.
pub fn color<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    })
}

/// Decodes a record only from a JSON object. Derived struct decoding would
/// also fill fields from an array by position, which is never what was stored.
pub fn object_from_value<T>(value: Value) -> Option<T>
where
    T: DeserializeOwned,
{
    match value {
        Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    }
}

/// A nested record that decodes to its default when it has the wrong shape.
pub fn record<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(object_from_value(value).unwrap_or_default())
}

/// A list of records. A non-array becomes empty; a malformed element becomes
/// a default record so the list keeps its length and order.
pub fn records<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(list_from_value(value))
}

pub fn list_from_value<T>(value: Value) -> Vec<T>
where
    T: DeserializeOwned + Default,
{
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| object_from_value(item).unwrap_or_default())
            .collect(),
        _ => Vec::new(),
    }
}

/// Like [`list_from_value`], but elements that are not usable records are
/// dropped instead of standing in as defaults. Writers use this so a stray
/// value is never saved back as a blank record.
pub fn decodable_list_from_value<T>(value: Value) -> Vec<T>
where
    T: DeserializeOwned,
{
    match value {
        Value::Array(items) => items.into_iter().filter_map(object_from_value).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_coerce_like_stored_form_values() {
        assert_eq!(number_from_value(&json!(12)), 12.0);
        assert_eq!(number_from_value(&json!(" 2.5 ")), 2.5);
        assert_eq!(number_from_value(&json!("")), 0.0);
        assert_eq!(number_from_value(&json!("abc")), 0.0);
        assert_eq!(number_from_value(&json!(true)), 1.0);
        assert_eq!(number_from_value(&json!(null)), 0.0);
        assert_eq!(number_from_value(&json!([1])), 0.0);
        assert_eq!(number_from_value(&json!("NaN")), 0.0);
        assert_eq!(number_from_value(&json!("inf")), 0.0);
    }

    #[test]
    fn flags_follow_truthiness() {
        assert!(flag_from_value(&json!(true)));
        assert!(flag_from_value(&json!(1)));
        assert!(flag_from_value(&json!("yes")));
        assert!(!flag_from_value(&json!(0)));
        assert!(!flag_from_value(&json!("")));
        assert!(!flag_from_value(&json!(null)));
    }

    #[derive(Debug, Default, PartialEq, Deserialize)]
    struct Pair {
        #[serde(default, deserialize_with = "number")]
        a: f64,
        #[serde(default, deserialize_with = "flag")]
        b: bool,
    }

    #[test]
    fn arrays_never_decode_as_records() {
        assert_eq!(object_from_value::<Pair>(json!([2000, true])), None);
        assert_eq!(
            object_from_value::<Pair>(json!({ "a": "3", "b": 1 })),
            Some(Pair { a: 3.0, b: true })
        );

        let list: Vec<Pair> = list_from_value(json!([[1, true], { "a": 2 }, 7]));
        assert_eq!(list.len(), 3);
        assert_eq!(list[0], Pair::default());
        assert_eq!(list[1].a, 2.0);
        assert_eq!(list[2], Pair::default());
    }

    #[test]
    fn decodable_list_drops_unusable_elements() {
        let list: Vec<Pair> = decodable_list_from_value(json!([7, { "a": 1 }, [1, true], null]));
        assert_eq!(list, vec![Pair { a: 1.0, b: false }]);
        assert!(decodable_list_from_value::<Pair>(json!({ "a": 1 })).is_empty());
    }

    #[derive(Debug, Deserialize)]
    struct Tinted {
        #[serde(default, deserialize_with = "color")]
        color: Option<String>,
    }

    #[test]
    fn blank_and_non_string_colors_are_missing() {
        let parse = |v: Value| serde_json::from_value::<Tinted>(v).unwrap().color;
        assert_eq!(parse(json!({ "color": " #abc " })), Some("#abc".to_string()));
        assert_eq!(parse(json!({ "color": "" })), None);
        assert_eq!(parse(json!({ "color": "   " })), None);
        assert_eq!(parse(json!({ "color": 5 })), None);
        assert_eq!(parse(json!({})), None);
    }
}
