//! Style sanitization hooks.

/// Decides which style properties need sanitizing and produces the safe value.
pub trait StyleSanitizer {
    fn needs_sanitization(&self, prop: &str) -> bool;
    fn sanitize(&self, prop: &str, value: &str) -> String;
}

/// Replacement written when a value is rejected.
pub const UNSAFE_STYLE_VALUE: &str = "unsafe";

const URL_PROPS: &[&str] = &[
    "background",
    "background-image",
    "border-image",
    "filter",
    "list-style",
    "list-style-image",
];

const SAFE_SCHEMES: &[&str] = &["http", "https", "mailto", "ftp", "tel", "file"];
const SAFE_DATA_IMAGES: &[&str] = &["png", "jpeg", "jpg", "gif", "webp", "bmp"];

/// Sanitizer for the properties that can carry `url(...)` values.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultStyleSanitizer;

impl StyleSanitizer for DefaultStyleSanitizer {
    fn needs_sanitization(&self, prop: &str) -> bool {
        URL_PROPS.contains(&prop)
    }

    fn sanitize(&self, prop: &str, value: &str) -> String {
        if is_safe_style_value(value) {
            value.to_string()
        } else {
            log::warn!("sanitizing unsafe style value for `{prop}`: {value}");
            UNSAFE_STYLE_VALUE.to_string()
        }
    }
}

/// Balanced quotes and every `url(...)` pointing at a safe target.
pub fn is_safe_style_value(value: &str) -> bool {
    has_balanced_quotes(value) && urls(value).all(is_safe_url)
}

fn has_balanced_quotes(value: &str) -> bool {
    let mut single = true;
    let mut double = true;
    for c in value.chars() {
        match c {
            '\'' if double => single = !single,
            '"' if single => double = !double,
            _ => {}
        }
    }
    single && double
}

fn urls(value: &str) -> impl Iterator<Item = &str> {
    value.match_indices("url(").filter_map(move |(start, _)| {
        let rest = &value[start + 4..];
        rest.find(')')
            .map(|end| rest[..end].trim().trim_matches(|c: char| c == '"' || c == '\''))
    })
}

fn is_safe_url(url: &str) -> bool {
    let scheme_end = url.find(|c: char| matches!(c, ':' | '/' | '?' | '#'));
    let scheme = match scheme_end {
        Some(i) if url[i..].starts_with(':') => url[..i].to_ascii_lowercase(),
        // relative
        _ => return true,
    };
    if SAFE_SCHEMES.contains(&scheme.as_str()) {
        return true;
    }
    if scheme == "data" {
        let body = &url[5..];
        return body
            .strip_prefix("image/")
            .and_then(|rest| rest.split_once(";base64,"))
            .is_some_and(|(kind, _)| SAFE_DATA_IMAGES.contains(&kind));
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_url_capable_props_only() {
        let s = DefaultStyleSanitizer;
        assert!(s.needs_sanitization("background-image"));
        assert!(s.needs_sanitization("filter"));
        assert!(!s.needs_sanitization("color"));
    }

    #[test]
    fn rejects_script_urls() {
        let s = DefaultStyleSanitizer;
        assert_eq!(
            s.sanitize("background-image", "url(javascript:alert(1))"),
            UNSAFE_STYLE_VALUE
        );
        assert_eq!(
            s.sanitize("background-image", "url('https://x.test/a.png')"),
            "url('https://x.test/a.png')"
        );
        assert_eq!(
            s.sanitize("background", "url(/img/a.png) no-repeat"),
            "url(/img/a.png) no-repeat"
        );
    }

    #[test]
    fn data_urls_must_be_images() {
        assert!(is_safe_style_value("url(data:image/png;base64,AAAA)"));
        assert!(!is_safe_style_value("url(data:text/html;base64,AAAA)"));
    }

    #[test]
    fn unbalanced_quotes_are_unsafe() {
        assert!(!is_safe_style_value("url('a.png)"));
        assert!(is_safe_style_value("\"Helvetica Neue\", sans-serif"));
    }
}
