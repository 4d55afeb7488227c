use serde::Serialize;

/// Pretty printed JSON of tokens, declarations or any other serializable
/// front end value.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}
