//! Request mapper: named operation + caller parameters → [`ApiRequest`].
//!
//! Validation happens entirely here, before a transport is ever touched.
//! Absent parameters (missing keys or JSON `null`) are omitted from the
//! request rather than sent as `null`, so server-side defaults stay in force.

use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    AdsMediaError, ApiRequest, Operation, OperationDescriptor, ParamKind, ParamLocation,
    ParamSpec, Result,
};

/// Maps `params` onto the HTTP request described by `operation`'s descriptor.
///
/// # Errors
///
/// [`AdsMediaError::Validation`] when a required parameter is missing, a value
/// has the wrong JSON kind, or `send_email` carries neither `html` nor `text`.
pub fn map_request(operation: Operation, params: &Map<String, Value>) -> Result<ApiRequest> {
    let descriptor = operation.descriptor();

    for key in params.keys() {
        if descriptor.param(key).is_none() {
            debug!(operation = %operation, parameter = %key, "Dropping undeclared parameter");
        }
    }

    check_required(descriptor, params)?;
    for (spec, value) in present_params(descriptor, params) {
        check_kind(spec, value)?;
    }
    check_content_group(descriptor, params)?;

    let query = present_params(descriptor, params)
        .filter(|(spec, _)| spec.location == ParamLocation::Query)
        .map(|(spec, value)| (spec.name.to_string(), query_value(value)))
        .collect();

    let body = descriptor.has_body().then(|| {
        present_params(descriptor, params)
            .filter(|(spec, _)| spec.location == ParamLocation::Body)
            .map(|(spec, value)| (spec.name.to_string(), value.clone()))
            .collect::<Map<String, Value>>()
    });

    Ok(ApiRequest {
        operation,
        method: descriptor.method,
        path: descriptor.path,
        query,
        body,
    })
}

/// Yields each declared parameter that is present, in descriptor order.
///
/// This is the one place optional-field inclusion is decided; both query and
/// body construction go through it.
fn present_params<'a>(
    descriptor: &'static OperationDescriptor,
    params: &'a Map<String, Value>,
) -> impl Iterator<Item = (&'static ParamSpec, &'a Value)> + 'a {
    descriptor
        .params
        .iter()
        .filter_map(move |spec| lookup(params, spec.name).map(|value| (spec, value)))
}

fn lookup<'a>(params: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    params.get(name).filter(|v| !v.is_null())
}

fn is_blank(value: &Value) -> bool {
    matches!(value, Value::String(s) if s.trim().is_empty())
}

fn check_required(descriptor: &OperationDescriptor, params: &Map<String, Value>) -> Result<()> {
    let missing: Vec<&str> = descriptor
        .params
        .iter()
        .filter(|spec| spec.required)
        .filter(|spec| lookup(params, spec.name).map_or(true, is_blank))
        .map(|spec| spec.name)
        .collect();

    match missing.as_slice() {
        [] => Ok(()),
        [one] => Err(AdsMediaError::validation(format!(
            "{}: missing required parameter '{one}'",
            descriptor.name
        ))),
        many => Err(AdsMediaError::validation(format!(
            "{}: missing required parameters {}",
            descriptor.name,
            many.iter()
                .map(|n| format!("'{n}'"))
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

fn check_kind(spec: &ParamSpec, value: &Value) -> Result<()> {
    let ok = match spec.kind {
        ParamKind::String => value.is_string(),
        ParamKind::Integer => value.is_i64() || value.is_u64(),
        ParamKind::Boolean => value.is_boolean(),
        ParamKind::Array => value.is_array(),
        ParamKind::Object => value.is_object(),
    };
    if ok {
        Ok(())
    } else {
        Err(AdsMediaError::validation(format!(
            "parameter '{}' must be of type {}",
            spec.name,
            spec.kind.json_type()
        )))
    }
}

fn check_content_group(descriptor: &OperationDescriptor, params: &Map<String, Value>) -> Result<()> {
    let group = descriptor.at_least_one_of();
    if group.is_empty() {
        return Ok(());
    }
    let satisfied = group
        .iter()
        .any(|name| lookup(params, name).is_some_and(|v| !is_blank(v)));
    if satisfied {
        Ok(())
    } else {
        Err(AdsMediaError::validation(format!(
            "{}: either {} content is required",
            descriptor.name,
            group.join(" or ")
        )))
    }
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
