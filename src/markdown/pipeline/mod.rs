//! Document pipeline: block pass, inline pass, text join, then render.

mod inline;
mod render;

pub use inline::{InlineRule, InlineRuler, InlineState};
pub use render::{render_token, InlineRenderer, RenderContext, RenderHook, Renderer};

use log::debug;

use crate::markdown::engine::ComrakEngine;
use crate::markdown::token::{join_adjacent_text, Token, TokenKind};
use crate::utils::error::BoxResult;

/// A pipeline extension
pub trait Plugin {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Register rules and render hooks
    fn install(&self, pipeline: &mut Pipeline) -> BoxResult<()>;
}

/// A fully parsed document
#[derive(Debug, Clone)]
pub struct DocumentState {
    pub src: String,
    pub tokens: Vec<Token>,
}

/// Markdown to HTML pipeline.
///
/// The pipeline holds only configuration; every call to [`Pipeline::render`]
/// builds its own [`DocumentState`] and [`RenderContext`], so a single
/// pipeline can be shared between threads.
#[derive(Debug, Clone)]
pub struct Pipeline {
    engine: ComrakEngine,
    inline: InlineRuler,
    renderer: Renderer,
    plugins: Vec<String>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Pipeline {
            engine: ComrakEngine::new(),
            inline: InlineRuler::with_builtin_rules(),
            renderer: Renderer::new(),
            plugins: Vec::new(),
        }
    }

    pub fn engine(&self) -> &ComrakEngine {
        &self.engine
    }

    pub fn inline_ruler(&self) -> &InlineRuler {
        &self.inline
    }

    pub fn inline_ruler_mut(&mut self) -> &mut InlineRuler {
        &mut self.inline
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer {
        &mut self.renderer
    }

    /// Names of installed plugins, in installation order
    pub fn plugins(&self) -> &[String] {
        &self.plugins
    }

    pub fn use_plugin<P: Plugin + ?Sized>(&mut self, plugin: &P) -> BoxResult<&mut Self> {
        plugin.install(self)?;
        debug!("Installed markdown plugin: {}", plugin.name());
        self.plugins.push(plugin.name().to_string());
        Ok(self)
    }

    /// Run the block, inline and text-join passes
    pub fn parse(&self, src: &str) -> DocumentState {
        let blocks = self.engine.tokenize(src);
        let mut tokens = blocks.tokens;
        debug!("Block pass produced {} tokens", tokens.len());

        for token in tokens.iter_mut().filter(|t| t.kind == TokenKind::Inline) {
            let children = {
                let mut state = InlineState::new(&token.content);
                self.inline.tokenize(&mut state);
                state.into_tokens(&self.engine, &blocks.references)
            };
            if let Some(children) = children {
                token.children = children;
            }
            join_adjacent_text(&mut token.children);
        }

        DocumentState {
            src: src.to_string(),
            tokens,
        }
    }

    /// Render an already parsed document
    pub fn render_document(&self, state: &DocumentState) -> BoxResult<String> {
        let ctx = RenderContext::capture(state, &self.engine);
        self.renderer.render(&state.tokens, &ctx)
    }

    /// Parse and render markdown source to HTML
    pub fn render(&self, src: &str) -> BoxResult<String> {
        let state = self.parse(src);
        self.render_document(&state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_document() {
        let pipeline = Pipeline::new();
        let html = pipeline
            .render("# Title {#intro}\n\nSome *text* with `code`.\n\n- a\n- b\n")
            .unwrap();

        assert!(html.starts_with("<h1 id=\"intro\">Title</h1>\n"));
        assert!(html.contains("<p>Some <em>text</em> with <code>code</code>.</p>\n"));
        assert!(html.contains("<li>a</li>"));
    }

    #[test]
    fn test_containers_match_comrak() {
        let pipeline = Pipeline::new();
        let options = crate::markdown::engine::create_comrak_options();
        let docs = [
            "> quote\n> more\n",
            "- a\n- b\n  - c\n",
            "1. x\n\n2. y\n",
            "> - a\n>   b\n",
        ];

        for src in docs {
            assert_eq!(
                pipeline.render(src).unwrap(),
                comrak::markdown_to_html(src, &options),
                "source {:?}",
                src
            );
        }
    }

    #[test]
    fn test_text_children_are_joined() {
        let pipeline = Pipeline::new();
        let state = pipeline.parse("## a_b_c\n");

        assert_eq!(state.tokens[1].children.len(), 1);
        assert_eq!(state.tokens[1].children[0].content, "a_b_c");
    }

    #[test]
    fn test_marker_without_plugin_stays_text() {
        let pipeline = Pipeline::new();
        let html = pipeline.render("[[toc]]\n").unwrap();

        assert_eq!(html, "<p>[[toc]]</p>\n");
    }
}
