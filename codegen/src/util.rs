/// Quote a string as a javascript string literal, escaping as needed.
pub fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{}\"", text))
}

/// Convert a schema identifier to camelCase. Underscores are dropped and the
/// following character is uppercased; every other character is lowercased.
/// `capital` controls whether the first character is uppercased.
pub fn to_camel_case(identifier: &str, capital: bool) -> String {
    let mut result = String::with_capacity(identifier.len());
    let mut upper_next = false;

    for c in identifier.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            result.extend(c.to_uppercase());
            upper_next = false;
        } else {
            result.extend(c.to_lowercase());
        }
    }

    if capital {
        let mut chars = result.chars();
        match chars.next() {
            None => result,
            Some(first) => first.to_uppercase().to_string() + chars.as_str(),
        }
    } else {
        result
    }
}
