//! comrak front end: block tokenization and inline fragment parsing.

mod blocks;
mod inlines;
mod options;

pub use blocks::Blocks;
pub use options::create_comrak_options;

use crate::markdown::token::Token;

/// Markdown front end backed by comrak
#[derive(Debug, Clone, Copy, Default)]
pub struct ComrakEngine;

impl ComrakEngine {
    pub fn new() -> Self {
        ComrakEngine
    }

    /// Split a document into block tokens
    pub fn tokenize(&self, src: &str) -> Blocks {
        blocks::tokenize(src, &create_comrak_options())
    }

    /// Parse a fragment of inline markdown into inline tokens
    pub fn parse_inline(&self, fragment: &str) -> Vec<Token> {
        inlines::parse_fragment(fragment, "", &create_comrak_options())
    }

    /// Parse inline markdown that may use the document's link reference
    /// definitions
    pub fn parse_inline_with_references(&self, fragment: &str, references: &str) -> Vec<Token> {
        inlines::parse_fragment(fragment, references, &create_comrak_options())
    }
}
