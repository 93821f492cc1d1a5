use crate::runtime::value::Value;

/// Decodes a JSON array into an argument list the way a generic decoder
/// would: every number becomes a `Float`.
pub fn decode_args(text: &str) -> Result<Vec<Value>, serde_json::Error> {
    let items: Vec<serde_json::Value> = serde_json::from_str(text)?;
    Ok(items.into_iter().map(Value::from_json_loose).collect())
}

/// Encodes a result list as a JSON array.
pub fn encode_results(values: &[Value]) -> String {
    // Serializing `Value` cannot fail: map keys are strings and there are no
    // custom Serialize impls underneath.
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}
