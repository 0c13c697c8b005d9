//! Response classification
//!
//! The service under test does not report errors consistently: some failures
//! come as `{"status": "error"}`, some carry an `error` field, some a numeric
//! `code`. This module is the only place that sniffs bodies for those shapes.
//!
//! The rule follows the one the tester page has always applied, and it
//! is fragile: a legitimate payload with an unrelated numeric `code >= 400`
//! field is reported as a failure. Only JSON numbers count as a `code`: the
//! page compared loosely, so `{"code": "500"}` failed there but passes here.

use serde_json::Value;

use crate::types::HttpOutcome;

/// `true` when a body looks like an error report
///
/// Failure when any of:
/// - `status == "error"`
/// - `error` is present and truthy (non-empty string, non-zero number,
///   `true`, any object or array)
/// - `code` is a number `>= 400`
pub fn is_failure_body(body: &Value) -> bool {
    let Value::Object(fields) = body else {
        return false;
    };

    if fields.get("status").and_then(Value::as_str) == Some("error") {
        return true;
    }

    if fields.get("error").is_some_and(is_truthy) {
        return true;
    }

    fields
        .get("code")
        .and_then(Value::as_f64)
        .is_some_and(|code| code >= 400.0)
}

/// Map a raw HTTP status and body onto the success/failure union
pub fn classify_response(status: u16, body: Value) -> HttpOutcome {
    if (200..300).contains(&status) && !is_failure_body(&body) {
        HttpOutcome::Success { status, body }
    } else {
        HttpOutcome::Failure { status, body }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
