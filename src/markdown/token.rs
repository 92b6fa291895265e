//! Flat token stream shared by the pipeline passes and the outline engine.
//!
//! Block structure is expressed with paired open/close tokens; the inline
//! content of a block lives in the `children` of a single [`TokenKind::Inline`]
//! token sitting between them.

/// The three placeholders an outline marker expands into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    OutlineStart,
    OutlineBody,
    OutlineEnd,
}

/// Token type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    HeadingOpen,
    HeadingClose,
    ParagraphOpen,
    ParagraphClose,
    /// Container for the inline children of a block
    Inline,
    Text,
    CodeInline,
    SoftBreak,
    HardBreak,
    EmOpen,
    EmClose,
    StrongOpen,
    StrongClose,
    StrikeOpen,
    StrikeClose,
    LinkOpen,
    LinkClose,
    /// Pre-rendered markup, emitted verbatim
    Html,
    Marker(MarkerKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Element name, e.g. `h2` or `a`
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub content: String,
    /// Source characters that produced the token, e.g. `##` or `[[toc]]`
    pub markup: String,
    pub children: Vec<Token>,
    pub block: bool,
    /// Paragraph of a tight list item; its tags are not rendered
    pub hidden: bool,
}

impl Token {
    pub fn new(kind: TokenKind, tag: impl Into<String>) -> Self {
        Self {
            kind,
            tag: tag.into(),
            attrs: Vec::new(),
            content: String::new(),
            markup: String::new(),
            children: Vec::new(),
            block: false,
            hidden: false,
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        let mut token = Self::new(TokenKind::Text, "");
        token.content = content.into();
        token
    }

    pub fn code_inline(content: impl Into<String>) -> Self {
        let mut token = Self::new(TokenKind::CodeInline, "code");
        token.content = content.into();
        token
    }

    pub fn html(content: impl Into<String>, block: bool) -> Self {
        let mut token = Self::new(TokenKind::Html, "");
        token.content = content.into();
        token.block = block;
        token
    }

    pub fn inline(content: impl Into<String>, children: Vec<Token>) -> Self {
        let mut token = Self::new(TokenKind::Inline, "");
        token.content = content.into();
        token.children = children;
        token
    }

    pub fn marker(kind: MarkerKind) -> Self {
        let tag = match kind {
            MarkerKind::OutlineBody => "",
            MarkerKind::OutlineStart | MarkerKind::OutlineEnd => "toc",
        };
        Self::new(TokenKind::Marker(kind), tag)
    }

    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.markup = markup.into();
        self
    }

    /// Look up an attribute value by name
    pub fn attr_get(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing any existing value
    pub fn attr_set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    /// Heading depth taken from the tag (`h3` is 3), for heading tokens only
    pub fn heading_level(&self) -> Option<usize> {
        match self.kind {
            TokenKind::HeadingOpen | TokenKind::HeadingClose => {
                self.tag.strip_prefix('h')?.parse().ok()
            }
            _ => None,
        }
    }
}

/// Merge runs of adjacent text tokens into one
pub fn join_adjacent_text(tokens: &mut Vec<Token>) {
    let mut joined: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens.drain(..) {
        match joined.last_mut() {
            Some(last) if last.kind == TokenKind::Text && token.kind == TokenKind::Text => {
                last.content.push_str(&token.content);
            }
            _ => joined.push(token),
        }
    }
    *tokens = joined;
}
