//! Attribute key normalization
//!
//! State attributes and importer payloads use whatever casing the upstream API
//! picked (`userId`, `HTTPEndpoint`, `user_Id`). HCL attributes are snake_case,
//! so every key goes through [`normalize`] before it is written.

/// Convert a field name to snake_case.
///
/// An uppercase letter starts a new word when it follows a lowercase letter or
/// a digit, or when it is the last letter of an acronym run followed by a
/// lowercase letter. Hyphens and whitespace become underscores. Existing
/// underscores are kept as-is and a word boundary never doubles them.
pub fn normalize(field: &str) -> String {
    let chars: Vec<char> = field.chars().collect();
    let mut out = String::with_capacity(field.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c.is_whitespace() {
            if !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }

        if c.is_uppercase() {
            if i > 0 && is_word_start(&chars, i) && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
            continue;
        }

        out.push(c);
    }

    out
}

fn is_word_start(chars: &[char], i: usize) -> bool {
    let prev = chars[i - 1];
    if prev.is_lowercase() || prev.is_ascii_digit() {
        return true;
    }

    // End of an acronym: "HTTPServer" splits before the "S"
    prev.is_uppercase() && chars.get(i + 1).is_some_and(|next| next.is_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case() {
        assert_eq!(normalize("userId"), "user_id");
        assert_eq!(normalize("allowedOrigins"), "allowed_origins");
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(normalize("Enabled"), "enabled");
        assert_eq!(normalize("RoleIds"), "role_ids");
    }

    #[test]
    fn test_mixed_with_underscore() {
        assert_eq!(normalize("user_Id"), "user_id");
        assert_eq!(normalize("Parameters_Value"), "parameters_value");
    }

    #[test]
    fn test_acronyms() {
        assert_eq!(normalize("HTTPServer"), "http_server");
        assert_eq!(normalize("userID"), "user_id");
        assert_eq!(normalize("ID"), "id");
    }

    #[test]
    fn test_digits() {
        assert_eq!(normalize("ipv4Address"), "ipv4_address");
        assert_eq!(normalize("field2Name"), "field2_name");
    }

    #[test]
    fn test_separators() {
        assert_eq!(normalize("login-url"), "login_url");
        assert_eq!(normalize("display name"), "display_name");
        assert_eq!(normalize("a - b"), "a_b");
    }

    #[test]
    fn test_passthrough() {
        assert_eq!(normalize("already_snake"), "already_snake");
        assert_eq!(normalize("_x_0"), "_x_0");
        assert_eq!(normalize("123"), "123");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_idempotent() {
        for input in ["userId", "HTTPServer", "user_Id", "login-url"] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once);
        }
    }
}
