/// Parse and validate a `key:value` metric tag.
///
/// The key must be non-empty and free of whitespace. The value may itself
/// contain colons (`url:http://host`).
///
/// # Errors
///
/// Returns an error message if the tag is malformed.
pub fn parse_tag(s: &str) -> Result<String, String> {
    let Some((key, value)) = s.split_once(':') else {
        return Err(format!("Tag must look like key:value: '{}'", s));
    };

    if key.is_empty() {
        return Err(format!("Tag key cannot be empty: '{}'", s));
    }
    if value.is_empty() {
        return Err(format!("Tag value cannot be empty: '{}'", s));
    }
    if key.chars().any(char::is_whitespace) {
        return Err(format!("Tag key cannot contain whitespace: '{}'", s));
    }

    Ok(s.to_string())
}
