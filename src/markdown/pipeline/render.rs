use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::markdown::engine::ComrakEngine;
use crate::markdown::token::{join_adjacent_text, MarkerKind, Token, TokenKind};
use crate::utils::error::{BoxResult, TocError};

use super::DocumentState;

/// Renders one marker token kind
pub trait RenderHook: Send + Sync {
    fn render(&self, tokens: &[Token], idx: usize, ctx: &RenderContext<'_>) -> BoxResult<String>;
}

/// Everything a render hook may look at beyond its own token.
///
/// Created once per render from the fully parsed document, so hooks that
/// need the whole token stream (the outline body) never see another
/// document's tokens.
pub struct RenderContext<'a> {
    document: &'a [Token],
    engine: &'a ComrakEngine,
}

impl<'a> RenderContext<'a> {
    pub fn capture(state: &'a DocumentState, engine: &'a ComrakEngine) -> Self {
        Self {
            document: &state.tokens,
            engine,
        }
    }

    /// Block tokens of the document being rendered
    pub fn document(&self) -> &'a [Token] {
        self.document
    }

    pub fn inline_renderer(&self) -> InlineRenderer<'a> {
        InlineRenderer::new(self.engine)
    }
}

/// Renders inline markdown source to HTML
#[derive(Debug, Clone, Copy)]
pub struct InlineRenderer<'a> {
    engine: &'a ComrakEngine,
}

impl<'a> InlineRenderer<'a> {
    pub fn new(engine: &'a ComrakEngine) -> Self {
        Self { engine }
    }

    pub fn render_inline(&self, src: &str) -> String {
        let mut tokens = self.engine.parse_inline(src);
        join_adjacent_text(&mut tokens);
        tokens.iter().map(render_token).collect()
    }
}

/// Token renderer with a lookup table for marker kinds
#[derive(Clone, Default)]
pub struct Renderer {
    hooks: HashMap<MarkerKind, Arc<dyn RenderHook>>,
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("hooks", &self.hooks.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the hook for a marker kind, returning the one it replaces
    pub fn set_hook(&mut self, kind: MarkerKind, hook: Arc<dyn RenderHook>) -> Option<Arc<dyn RenderHook>> {
        self.hooks.insert(kind, hook)
    }

    pub fn has_hook(&self, kind: MarkerKind) -> bool {
        self.hooks.contains_key(&kind)
    }

    pub fn render(&self, tokens: &[Token], ctx: &RenderContext<'_>) -> BoxResult<String> {
        let mut html = String::new();
        for (idx, token) in tokens.iter().enumerate() {
            match token.kind {
                TokenKind::Inline => html.push_str(&self.render(&token.children, ctx)?),
                TokenKind::Marker(kind) => {
                    let hook = self.hooks.get(&kind).ok_or_else(|| {
                        TocError::Rule(format!("no render hook registered for {:?}", kind))
                    })?;
                    html.push_str(&hook.render(tokens, idx, ctx)?);
                }
                _ => html.push_str(&render_token(token)),
            }
        }
        Ok(html)
    }
}

/// Default HTML for a single token. Marker tokens render as nothing here.
pub fn render_token(token: &Token) -> String {
    match token.kind {
        TokenKind::ParagraphOpen | TokenKind::ParagraphClose if token.hidden => String::new(),
        TokenKind::HeadingOpen
        | TokenKind::ParagraphOpen
        | TokenKind::EmOpen
        | TokenKind::StrongOpen
        | TokenKind::StrikeOpen
        | TokenKind::LinkOpen => format!("<{}{}>", token.tag, render_attrs(&token.attrs)),
        TokenKind::HeadingClose | TokenKind::ParagraphClose => format!("</{}>\n", token.tag),
        TokenKind::EmClose | TokenKind::StrongClose | TokenKind::StrikeClose | TokenKind::LinkClose => {
            format!("</{}>", token.tag)
        }
        TokenKind::Text => html_escape::encode_text(&token.content).into_owned(),
        TokenKind::CodeInline => format!("<code>{}</code>", html_escape::encode_text(&token.content)),
        TokenKind::SoftBreak => "\n".to_string(),
        TokenKind::HardBreak => "<br />\n".to_string(),
        TokenKind::Html => token.content.clone(),
        TokenKind::Inline => token.children.iter().map(render_token).collect(),
        TokenKind::Marker(_) => String::new(),
    }
}

fn render_attrs(attrs: &[(String, String)]) -> String {
    attrs
        .iter()
        .map(|(name, value)| {
            format!(" {}=\"{}\"", name, html_escape::encode_double_quoted_attribute(value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str);

    impl RenderHook for Fixed {
        fn render(&self, _tokens: &[Token], _idx: usize, _ctx: &RenderContext<'_>) -> BoxResult<String> {
            Ok(self.0.to_string())
        }
    }

    fn paragraph(children: Vec<Token>) -> Vec<Token> {
        vec![
            Token::new(TokenKind::ParagraphOpen, "p"),
            Token::inline("", children),
            Token::new(TokenKind::ParagraphClose, "p"),
        ]
    }

    #[test]
    fn test_default_token_rendering() {
        let mut open = Token::new(TokenKind::HeadingOpen, "h2");
        open.attr_set("id", "a\"b");
        let tokens = vec![
            open,
            Token::inline("", vec![Token::text("1 < 2"), Token::code_inline("<T>")]),
            Token::new(TokenKind::HeadingClose, "h2"),
        ];
        let state = DocumentState { src: String::new(), tokens };
        let engine = ComrakEngine::new();
        let ctx = RenderContext::capture(&state, &engine);

        let html = Renderer::new().render(&state.tokens, &ctx).unwrap();
        assert_eq!(html, "<h2 id=\"a&quot;b\">1 &lt; 2<code>&lt;T&gt;</code></h2>\n");
    }

    #[test]
    fn test_marker_dispatch_by_kind() {
        let mut renderer = Renderer::new();
        renderer.set_hook(MarkerKind::OutlineStart, Arc::new(Fixed("[")));
        renderer.set_hook(MarkerKind::OutlineBody, Arc::new(Fixed("body")));
        renderer.set_hook(MarkerKind::OutlineEnd, Arc::new(Fixed("]")));

        let state = DocumentState {
            src: String::new(),
            tokens: paragraph(vec![
                Token::marker(MarkerKind::OutlineStart),
                Token::marker(MarkerKind::OutlineBody),
                Token::marker(MarkerKind::OutlineEnd),
            ]),
        };
        let engine = ComrakEngine::new();
        let ctx = RenderContext::capture(&state, &engine);

        assert_eq!(renderer.render(&state.tokens, &ctx).unwrap(), "<p>[body]</p>\n");
    }

    #[test]
    fn test_missing_hook_is_an_error() {
        let state = DocumentState {
            src: String::new(),
            tokens: paragraph(vec![Token::marker(MarkerKind::OutlineBody)]),
        };
        let engine = ComrakEngine::new();
        let ctx = RenderContext::capture(&state, &engine);

        let err = Renderer::new().render(&state.tokens, &ctx).unwrap_err();
        assert!(err.to_string().contains("OutlineBody"));
    }

    #[test]
    fn test_hidden_paragraph_renders_children_only() {
        let mut tokens = paragraph(vec![Token::text("tight")]);
        tokens[0].hidden = true;
        tokens[2].hidden = true;
        let state = DocumentState { src: String::new(), tokens };
        let engine = ComrakEngine::new();
        let ctx = RenderContext::capture(&state, &engine);

        assert_eq!(Renderer::new().render(&state.tokens, &ctx).unwrap(), "tight");
    }

    #[test]
    fn test_inline_renderer() {
        let engine = ComrakEngine::new();
        let inline = InlineRenderer::new(&engine);

        assert_eq!(inline.render_inline("Hello *world*"), "Hello <em>world</em>");
        assert_eq!(inline.render_inline("a `b` & c"), "a <code>b</code> &amp; c");
    }

    #[test]
    fn test_inline_renderer_keeps_block_syntax_as_text() {
        let engine = ComrakEngine::new();
        let inline = InlineRenderer::new(&engine);

        assert_eq!(inline.render_inline("1. Introduction"), "1. Introduction");
        assert_eq!(inline.render_inline("- item"), "- item");
        assert_eq!(inline.render_inline("> quote"), "&gt; quote");
    }
}
