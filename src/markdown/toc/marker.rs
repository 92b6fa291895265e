use std::sync::Arc;

use log::debug;
use regex::Regex;

use crate::markdown::pipeline::{InlineRule, InlineState, RenderContext, RenderHook};
use crate::markdown::token::{MarkerKind, Token};
use crate::utils::error::{BoxResult, TocError};

use super::{compile_marker_pattern, generate_toc, TocOptions};

/// Inline rule that replaces a `[[toc]]` marker with the outline placeholders
#[derive(Debug, Clone)]
pub struct MarkerRule {
    /// The configured pattern, anchored at the scan position
    pattern: Regex,
    lead: Option<char>,
}

impl MarkerRule {
    pub fn new(pattern: &Regex) -> Result<Self, TocError> {
        let anchored = compile_marker_pattern(&format!(r"\A(?:{})", pattern.as_str()))?;
        Ok(Self {
            pattern: anchored,
            lead: leading_char(pattern.as_str()),
        })
    }

    /// First character any match must start with, if one can be told
    pub fn lead(&self) -> Option<char> {
        self.lead
    }
}

impl InlineRule for MarkerRule {
    fn scan(&self, state: &mut InlineState<'_>, silent: bool) -> bool {
        let current = match state.current_char() {
            Some(ch) => ch,
            None => return false,
        };
        if let Some(lead) = self.lead {
            if !current.to_lowercase().eq(lead.to_lowercase()) {
                return false;
            }
        }
        if silent {
            return false;
        }

        let rest = state.remaining();
        let matched = match self.pattern.find(rest) {
            Some(m) if !m.as_str().is_empty() => m.as_str(),
            _ => return false,
        };

        state.push(Token::marker(MarkerKind::OutlineStart).with_markup(matched));
        state.push(Token::marker(MarkerKind::OutlineBody));
        state.push(Token::marker(MarkerKind::OutlineEnd));

        // The rest of the marker's line is dropped
        state.pos = match rest.find('\n') {
            Some(offset) => state.pos + offset,
            None => state.pos_max,
        };
        debug!("Outline marker `{}` found", matched);
        true
    }
}

/// Derive the character a match of `pattern` has to begin with.
///
/// Skips a leading `^` or `\A` and inline flag groups like `(?i)`. Returns
/// `None` for alternations, classes, groups and optional first atoms.
pub fn leading_char(pattern: &str) -> Option<char> {
    if pattern.contains('|') {
        return None;
    }

    let mut rest = pattern;
    loop {
        if let Some(stripped) = rest.strip_prefix('^') {
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix("\\A") {
            rest = stripped;
        } else if let Some(stripped) = strip_flag_group(rest) {
            rest = stripped;
        } else {
            break;
        }
    }

    let mut chars = rest.chars();
    let lead = match chars.next()? {
        '\\' => match chars.next()? {
            ch if ch.is_ascii_punctuation() => ch,
            _ => return None,
        },
        '.' | '(' | '[' | '$' | '*' | '+' | '?' | '{' | ')' => return None,
        ch => ch,
    };

    match chars.next() {
        Some('?' | '*' | '{') => None,
        _ => Some(lead),
    }
}

fn strip_flag_group(pattern: &str) -> Option<&str> {
    let inner = pattern.strip_prefix("(?")?;
    let end = inner.find(')')?;
    let flags = &inner[..end];
    if flags.is_empty() || !flags.chars().all(|ch| ch.is_ascii_alphabetic() || ch == '-') {
        return None;
    }
    Some(&inner[end + 1..])
}

/// Opens the outline container
pub struct ContainerOpen {
    options: Arc<TocOptions>,
}

impl ContainerOpen {
    pub fn new(options: Arc<TocOptions>) -> Self {
        Self { options }
    }
}

impl RenderHook for ContainerOpen {
    fn render(&self, _tokens: &[Token], _idx: usize, _ctx: &RenderContext<'_>) -> BoxResult<String> {
        let mut html = format!(
            "<div class=\"{}\">",
            html_escape::encode_double_quoted_attribute(&self.options.container_class)
        );
        if let Some(header) = &self.options.container_header_html {
            html.push_str(header);
        }
        Ok(html)
    }
}

/// Resolves the outline from the whole document being rendered
pub struct OutlineBody {
    options: Arc<TocOptions>,
}

impl OutlineBody {
    pub fn new(options: Arc<TocOptions>) -> Self {
        Self { options }
    }
}

impl RenderHook for OutlineBody {
    fn render(&self, _tokens: &[Token], _idx: usize, ctx: &RenderContext<'_>) -> BoxResult<String> {
        generate_toc(ctx.document(), &self.options, &ctx.inline_renderer())
    }
}

/// Closes the outline container
pub struct ContainerClose {
    options: Arc<TocOptions>,
}

impl ContainerClose {
    pub fn new(options: Arc<TocOptions>) -> Self {
        Self { options }
    }
}

impl RenderHook for ContainerClose {
    fn render(&self, _tokens: &[Token], _idx: usize, _ctx: &RenderContext<'_>) -> BoxResult<String> {
        let mut html = self.options.container_footer_html.clone().unwrap_or_default();
        html.push_str("</div>");
        Ok(html)
    }
}
