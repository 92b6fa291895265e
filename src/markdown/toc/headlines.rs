use serde::{Deserialize, Serialize};

use crate::markdown::token::{Token, TokenKind};

/// A heading found in the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headline {
    pub level: usize,
    pub anchor: Option<String>,
    pub text: Option<String>,
}

impl Headline {
    pub fn new(level: usize, anchor: Option<&str>, text: Option<&str>) -> Self {
        Self {
            level,
            anchor: anchor.map(str::to_string),
            text: text.map(str::to_string),
        }
    }
}

/// Collect the headlines whose level is in `include_level`, in document order.
///
/// An `id` attribute on the heading is used as the anchor; otherwise the
/// anchor is the slug of the heading text. The text is the concatenation of
/// the literal text and inline code children of the heading's inline token.
pub fn extract_headlines(
    tokens: &[Token],
    include_level: &[usize],
    slugify: &dyn Fn(&str) -> String,
) -> Vec<Headline> {
    let mut headlines = Vec::new();
    let mut current: Option<Headline> = None;
    let mut has_id = false;

    for token in tokens {
        match token.kind {
            TokenKind::HeadingOpen => {
                current = None;
                let level = match token.heading_level() {
                    Some(level) if include_level.contains(&level) => level,
                    _ => continue,
                };
                let id = token.attr_get("id");
                has_id = id.is_some();
                current = Some(Headline::new(level, id, None));
            }
            TokenKind::Inline => {
                if let Some(headline) = current.as_mut() {
                    let text: String = token
                        .children
                        .iter()
                        .filter(|child| matches!(child.kind, TokenKind::Text | TokenKind::CodeInline))
                        .map(|child| child.content.as_str())
                        .collect();
                    if text.is_empty() {
                        continue;
                    }
                    if !has_id {
                        headline.anchor = Some(slugify(&text));
                    }
                    headline.text = Some(text);
                }
            }
            TokenKind::HeadingClose => {
                if let Some(headline) = current.take() {
                    headlines.push(headline);
                }
            }
            _ => {}
        }
    }

    headlines
}
