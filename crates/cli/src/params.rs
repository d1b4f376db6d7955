//! Turns command line input into an operation parameter map.
//!
//! `--json` supplies a base object; each `-p key=value` is then coerced to the
//! kind the operation declares for `key` and overlaid on it.

use operations::{AdsMediaError, Operation, ParamKind};
use serde_json::{Map, Number, Value};

/// Splits `key=value` on the first `=`.
pub fn parse_pair(raw: &str) -> Result<(String, String), AdsMediaError> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(AdsMediaError::validation(format!(
            "invalid parameter '{raw}': expected key=value"
        ))),
    }
}

/// Converts textual input to the declared kind. Undeclared keys stay strings.
pub fn coerce(name: &str, kind: Option<ParamKind>, raw: &str) -> Result<Value, AdsMediaError> {
    let invalid = |expected: &str| {
        AdsMediaError::validation(format!(
            "parameter '{name}' expects {expected}, got '{raw}'"
        ))
    };

    match kind {
        None | Some(ParamKind::String) => Ok(Value::String(raw.to_string())),
        Some(ParamKind::Integer) => raw
            .trim()
            .parse::<i64>()
            .map(|n| Value::Number(Number::from(n)))
            .map_err(|_| invalid("an integer")),
        Some(ParamKind::Boolean) => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(Value::Bool(true)),
            "false" | "0" | "no" => Ok(Value::Bool(false)),
            _ => Err(invalid("a boolean")),
        },
        Some(ParamKind::Array) => {
            if raw.trim_start().starts_with('[') {
                match serde_json::from_str::<Value>(raw) {
                    Ok(array @ Value::Array(_)) => Ok(array),
                    _ => Err(invalid("a JSON array")),
                }
            } else {
                Ok(Value::Array(
                    raw.split(',')
                        .map(str::trim)
                        .filter(|item| !item.is_empty())
                        .map(|item| Value::String(item.to_string()))
                        .collect(),
                ))
            }
        }
        Some(ParamKind::Object) => match serde_json::from_str::<Value>(raw) {
            Ok(object @ Value::Object(_)) => Ok(object),
            _ => Err(invalid("a JSON object")),
        },
    }
}

/// Builds the parameter map for `operation` from `--json` and `-p` input.
pub fn build_params(
    operation: Operation,
    json: Option<&str>,
    pairs: &[String],
) -> Result<Map<String, Value>, AdsMediaError> {
    let mut params = match json {
        None => Map::new(),
        Some(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) => return Err(AdsMediaError::validation("--json must be a JSON object")),
            Err(e) => return Err(AdsMediaError::validation(format!("--json is not valid JSON: {e}"))),
        },
    };

    let descriptor = operation.descriptor();
    for raw in pairs {
        let (key, value) = parse_pair(raw)?;
        let kind = descriptor.param(&key).map(|spec| spec.kind);
        let value = coerce(&key, kind, &value)?;
        params.insert(key, value);
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_pair_splits_on_first_equals() {
        assert_eq!(
            parse_pair("html=<a href=\"x\">").unwrap(),
            ("html".to_string(), "<a href=\"x\">".to_string())
        );
        assert!(parse_pair("novalue").is_err());
        assert!(parse_pair("=x").is_err());
    }

    #[test]
    fn test_integer_parameters_are_coerced() {
        let params = build_params(Operation::GetCampaign, None, &["id=42".into()]).unwrap();
        assert_eq!(params["id"], json!(42));
    }

    #[test]
    fn test_bad_integer_is_validation_error() {
        let err = build_params(Operation::GetCampaign, None, &["id=abc".into()]).unwrap_err();
        assert!(matches!(err, AdsMediaError::Validation { .. }));
        assert!(err.message().contains("'id'"));
    }

    #[test]
    fn test_array_accepts_comma_list_or_json() {
        let from_list = coerce("emails", Some(ParamKind::Array), "a@x.io, b@x.io,").unwrap();
        assert_eq!(from_list, json!(["a@x.io", "b@x.io"]));

        let from_json =
            coerce("contacts", Some(ParamKind::Array), r#"[{"email":"a@x.io"}]"#).unwrap();
        assert_eq!(from_json, json!([{ "email": "a@x.io" }]));
    }

    #[test]
    fn test_boolean_words() {
        assert_eq!(coerce("b", Some(ParamKind::Boolean), "Yes").unwrap(), json!(true));
        assert_eq!(coerce("b", Some(ParamKind::Boolean), "0").unwrap(), json!(false));
        assert!(coerce("b", Some(ParamKind::Boolean), "maybe").is_err());
    }

    #[test]
    fn test_pairs_override_json_base() {
        let params = build_params(
            Operation::SendEmail,
            Some(r#"{"to":"a@x.io","subject":"Old","server_id":1}"#),
            &["subject=New".into(), "server_id=7".into()],
        )
        .unwrap();
        assert_eq!(params["subject"], json!("New"));
        assert_eq!(params["server_id"], json!(7));
        assert_eq!(params["to"], json!("a@x.io"));
    }

    #[test]
    fn test_json_base_must_be_object() {
        assert!(build_params(Operation::Ping, Some("[1]"), &[]).is_err());
        assert!(build_params(Operation::Ping, Some("{"), &[]).is_err());
    }

    #[test]
    fn test_undeclared_keys_stay_strings() {
        let params = build_params(Operation::Ping, None, &["extra=5".into()]).unwrap();
        assert_eq!(params["extra"], json!("5"));
    }
}
