//! Server-rendered management page hosting the hotel list controller.

use shared::protocol::{CitySummary, CSRF_ELEMENT_ID};

pub(crate) fn render_index(cities: &[CitySummary], csrf_token: &str) -> String {
    let mut options = String::new();
    for city in cities {
        options.push_str(&format!(
            "      <option value=\"{}\">{}</option>\n",
            escape_html(&city.name),
            escape_html(&city.code)
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Hotel management</title>
</head>
<body>
  <input type="hidden" id="{CSRF_ELEMENT_ID}" value="{token}">
  <label for="city">City</label>
  <input type="text" id="city" name="city" list="city-options">
  <datalist id="city-options">
{options}  </datalist>
  <ul id="hotel-list"></ul>
  <form id="hotel-form">
    <input type="text" id="hotel-name" name="name" maxlength="100" required>
    <input type="text" id="hotel-local-code" name="local_code" required>
    <input type="text" id="hotel-city" name="city" maxlength="3" required>
    <button type="submit">Save</button>
  </form>
</body>
</html>
"#,
        token = escape_html(csrf_token),
    )
}

pub(crate) fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
