use serde_json::Value;

/// Epoch seconds from a JSON value. Dumps carry `created_utc` as an integer,
/// a float, or a numeric string depending on the export era; accept all three.
pub fn epoch_of(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let t = s.trim();
            t.parse::<i64>()
                .ok()
                .or_else(|| t.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

/// Integer from an integer or float JSON value.
pub fn int_of(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        _ => None,
    }
}

/// Owned string from a string value.
pub fn string_of(v: &Value) -> Option<String> {
    v.as_str().map(|s| s.to_string())
}

/// Grouping key from a string or number value. Numeric ids ("id": 1) and
/// string ids ("id": "1") must land in the same group.
pub fn key_of(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn epoch_accepts_int_float_and_string() {
        assert_eq!(epoch_of(&json!(1717200000)), Some(1717200000));
        assert_eq!(epoch_of(&json!(1717200000.0)), Some(1717200000));
        assert_eq!(epoch_of(&json!("1717200000")), Some(1717200000));
        assert_eq!(epoch_of(&json!("1717200000.5")), Some(1717200000));
        assert_eq!(epoch_of(&json!(null)), None);
        assert_eq!(epoch_of(&json!("soon")), None);
    }

    #[test]
    fn keys_unify_strings_and_numbers() {
        assert_eq!(key_of(&json!("1")), Some("1".to_string()));
        assert_eq!(key_of(&json!(1)), Some("1".to_string()));
        assert_eq!(key_of(&json!(null)), None);
    }
}
