use std::sync::OnceLock;

use regex::Regex;
use shared::protocol::CSRF_ELEMENT_ID;

/// Reads the token out of the `<input id="csrf-token" value="...">` element
/// the page template injects. Attribute order does not matter.
pub fn extract_csrf_token(html: &str) -> Option<String> {
    static INPUT_TAG: OnceLock<Regex> = OnceLock::new();
    static ID_ATTR: OnceLock<Regex> = OnceLock::new();
    static VALUE_ATTR: OnceLock<Regex> = OnceLock::new();

    let input_tag = INPUT_TAG.get_or_init(|| Regex::new(r"(?is)<input\b[^>]*>").expect("valid regex"));
    let id_attr = ID_ATTR.get_or_init(|| {
        Regex::new(r#"(?i)\bid\s*=\s*["']([^"']*)["']"#).expect("valid regex")
    });
    let value_attr = VALUE_ATTR.get_or_init(|| {
        Regex::new(r#"(?i)\bvalue\s*=\s*["']([^"']*)["']"#).expect("valid regex")
    });

    input_tag
        .find_iter(html)
        .map(|tag| tag.as_str())
        .find(|tag| {
            id_attr
                .captures(tag)
                .is_some_and(|caps| &caps[1] == CSRF_ELEMENT_ID)
        })
        .and_then(|tag| value_attr.captures(tag))
        .map(|caps| caps[1].to_string())
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_token_in_hidden_input() {
        let html = r#"<form><input type="hidden" id="csrf-token" value="abc123"></form>"#;
        assert_eq!(extract_csrf_token(html).as_deref(), Some("abc123"));
    }

    #[test]
    fn attribute_order_and_quotes_do_not_matter() {
        let html = "<INPUT value='tok' type='hidden' id='csrf-token' />";
        assert_eq!(extract_csrf_token(html).as_deref(), Some("tok"));
    }

    #[test]
    fn ignores_other_inputs() {
        let html = r#"<input id="city" value="Paris"><input id="hotel-name" value="x">"#;
        assert_eq!(extract_csrf_token(html), None);
    }

    #[test]
    fn empty_token_counts_as_missing() {
        let html = r#"<input id="csrf-token" value="">"#;
        assert_eq!(extract_csrf_token(html), None);
    }
}
