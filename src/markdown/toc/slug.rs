use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref WHITESPACE_REGEX: Regex = Regex::new(r"\s+").unwrap();
}

/// Text to anchor transform
pub type SlugFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Default anchor: trimmed, lowercased, whitespace runs joined with `-`,
/// then percent-encoded like a URI component. Letters, digits and
/// `-_.!~*'()` are kept as they are.
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let hyphenated = WHITESPACE_REGEX.replace_all(&lowered, "-");
    encode_uri_component(&hyphenated)
}

fn encode_uri_component(text: &str) -> String {
    let mut encoded = String::with_capacity(text.len());
    let mut buf = [0u8; 4];
    for ch in text.chars() {
        match ch {
            '!' | '\'' | '(' | ')' | '*' => encoded.push(ch),
            _ => encoded.push_str(&urlencoding::encode(ch.encode_utf8(&mut buf))),
        }
    }
    encoded
}

/// ASCII-only anchor: transliterates and drops punctuation
pub fn ascii_slugify(text: &str) -> String {
    slug::slugify(text)
}

/// Built-in slug functions selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlugStyle {
    /// [`slugify`]
    #[default]
    Uri,
    /// [`ascii_slugify`]
    Ascii,
}

impl SlugStyle {
    pub fn function(self) -> SlugFn {
        match self {
            SlugStyle::Uri => Arc::new(slugify),
            SlugStyle::Ascii => Arc::new(ascii_slugify),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        let test_cases = vec![
            ("Hello World!", "hello-world!"),
            ("What's (new)?", "what's-(new)%3F"),
            ("a/b #c", "a%2Fb-%23c"),
            ("  Padded   Title  ", "padded-title"),
            ("tabs\tand\nnewlines", "tabs-and-newlines"),
            ("test_case", "test_case"),
            ("Größe", "gr%C3%B6%C3%9Fe"),
        ];

        for (input, expected) in test_cases {
            assert_eq!(slugify(input), expected);
        }
    }

    #[test]
    fn test_slugify_has_no_whitespace_and_is_pure() {
        let slug = slugify("Hello World!");

        assert!(!slug.chars().any(char::is_whitespace));
        assert_eq!(slug, slug.to_lowercase());
        assert_eq!(slug, slugify("Hello World!"));
    }

    #[test]
    fn test_ascii_slugify() {
        assert_eq!(ascii_slugify("Hello World!"), "hello-world");
        assert_eq!(ascii_slugify("Größe"), "grosse");
    }

    #[test]
    fn test_slug_style_function() {
        assert_eq!((SlugStyle::Uri.function())("A B"), "a-b");
        assert_eq!((SlugStyle::Ascii.function())("A & B"), "a-b");
    }
}
