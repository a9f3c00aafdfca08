//! Gateway envelope decoding.
//!
//! Both endpoints answer with `{"body": "<JSON text>"}`: the payload is a
//! JSON document serialised *into a string*, not a nested object. Decoding is
//! therefore always exactly two steps, kept separate so an error names the
//! step that failed:
//!
//! 1. [`parse_outer`]: response text → JSON object.
//! 2. [`decode_body`]: the object's `body` string → typed payload.

use crate::error::AnalyzerError;
use crate::model::StorageLocator;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Step 1: parse raw response text into the outer JSON value.
pub fn parse_outer(text: &str, context: &str) -> Result<Value, AnalyzerError> {
    serde_json::from_str(text)
        .map_err(|e| AnalyzerError::malformed(context, format!("response is not JSON: {e}")))
}

/// Step 2: decode the JSON-encoded string held in the outer `body` field.
pub fn decode_body<T: DeserializeOwned>(outer: &Value, context: &str) -> Result<T, AnalyzerError> {
    let body = match outer.get("body") {
        Some(Value::String(s)) => s,
        Some(other) => {
            return Err(AnalyzerError::malformed(
                context,
                format!("'body' must be a JSON-encoded string, got {}", type_name(other)),
            ))
        }
        None => return Err(AnalyzerError::malformed(context, "missing 'body' field")),
    };

    serde_json::from_str(body)
        .map_err(|e| AnalyzerError::malformed(context, format!("cannot decode 'body': {e}")))
}

#[derive(Deserialize)]
struct LocatorBody {
    s3_uri: Option<StorageLocator>,
}

/// Pull the storage locator out of an upload response.
pub fn extract_locator(outer: &Value) -> Result<StorageLocator, AnalyzerError> {
    let body: LocatorBody = decode_body(outer, "upload endpoint")?;
    body.s3_uri
        .filter(|l| !l.as_str().is_empty())
        .ok_or_else(|| AnalyzerError::malformed("upload endpoint", "missing 's3_uri'"))
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AnalysisResult;
    use serde_json::json;

    #[test]
    fn locator_from_string_envelope() {
        let outer = json!({"statusCode": 200, "body": "{\"s3_uri\": \"s3://bucket/invoice.pdf\"}"});
        let locator = extract_locator(&outer).unwrap();
        assert_eq!(locator.as_str(), "s3://bucket/invoice.pdf");
    }

    #[test]
    fn nested_object_body_is_rejected() {
        let outer = json!({"body": {"s3_uri": "s3://bucket/invoice.pdf"}});
        let err = extract_locator(&outer).unwrap_err();
        assert!(err.to_string().contains("an object"), "got: {err}");
    }

    #[test]
    fn missing_body_is_malformed() {
        let err = extract_locator(&json!({"message": "ok"})).unwrap_err();
        assert!(matches!(err, AnalyzerError::MalformedResponse { .. }));
        assert!(err.to_string().contains("missing 'body'"));
    }

    #[test]
    fn missing_locator_is_malformed() {
        let err = extract_locator(&json!({"body": "{}"})).unwrap_err();
        assert!(err.to_string().contains("s3_uri"), "got: {err}");
    }

    #[test]
    fn body_that_is_not_json_is_malformed() {
        let err = extract_locator(&json!({"body": "Internal server error"})).unwrap_err();
        assert!(err.to_string().contains("cannot decode"), "got: {err}");
    }

    #[test]
    fn outer_text_must_be_json() {
        assert!(parse_outer("<html>502</html>", "analyze endpoint").is_err());
    }

    #[test]
    fn analysis_result_from_envelope() {
        let inner = json!({"keyValuePairs": [], "tables": [], "queries": []}).to_string();
        let outer = json!({ "body": inner });
        let result: AnalysisResult = decode_body(&outer, "analyze endpoint").unwrap();
        assert_eq!(result, AnalysisResult::default());
    }
}
