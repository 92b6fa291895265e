use comrak::nodes::{AstNode, NodeValue};
use comrak::{format_html, parse_document, Arena, Options};
use lazy_static::lazy_static;
use log::warn;
use regex::Regex;

use crate::markdown::token::{Token, TokenKind};

lazy_static! {
    // `1.` or `1)` list item start; the delimiter gets escaped
    static ref ORDERED_ITEM_REGEX: Regex = Regex::new(r"^(\d{1,9})[.)](?:[ \t]|$)").unwrap();

    // Bullets, ATX headings, quotes, fences, rules and setext underlines
    static ref BLOCK_START_REGEX: Regex =
        Regex::new(r"^(?:[-+*](?:[ \t]|$)|#{1,6}(?:[ \t]|$)|>|```|~~~|[-*_=][-*_= \t]*$)").unwrap();
}

/// Flatten the inline children of a comrak block node into tokens
pub(crate) fn flatten_children<'a>(node: &'a AstNode<'a>, options: &Options) -> Vec<Token> {
    let mut tokens = Vec::new();
    for child in node.children() {
        push_inline(child, options, &mut tokens);
    }
    tokens
}

fn push_inline<'a>(node: &'a AstNode<'a>, options: &Options, out: &mut Vec<Token>) {
    let value = node.data.borrow().value.clone();
    match value {
        NodeValue::Text(text) => out.push(Token::text(text.to_string())),
        NodeValue::Code(code) => out.push(Token::code_inline(code.literal.to_string())),
        NodeValue::SoftBreak => out.push(Token::new(TokenKind::SoftBreak, "br")),
        NodeValue::LineBreak => out.push(Token::new(TokenKind::HardBreak, "br")),
        NodeValue::HtmlInline(html) => out.push(Token::html(html.to_string(), false)),
        NodeValue::Emph => wrap(node, options, out, TokenKind::EmOpen, TokenKind::EmClose, "em"),
        NodeValue::Strong => wrap(
            node,
            options,
            out,
            TokenKind::StrongOpen,
            TokenKind::StrongClose,
            "strong",
        ),
        NodeValue::Strikethrough => wrap(
            node,
            options,
            out,
            TokenKind::StrikeOpen,
            TokenKind::StrikeClose,
            "del",
        ),
        NodeValue::Link(link) => {
            let mut open = Token::new(TokenKind::LinkOpen, "a");
            open.attr_set("href", link.url.to_string());
            if !link.title.is_empty() {
                open.attr_set("title", link.title.to_string());
            }
            out.push(open);
            for child in node.children() {
                push_inline(child, options, out);
            }
            out.push(Token::new(TokenKind::LinkClose, "a"));
        }
        // Images, footnote references and the like keep comrak's rendering
        _ => out.push(Token::html(render_node(node, options), false)),
    }
}

fn wrap<'a>(
    node: &'a AstNode<'a>,
    options: &Options,
    out: &mut Vec<Token>,
    open: TokenKind,
    close: TokenKind,
    tag: &str,
) {
    out.push(Token::new(open, tag));
    for child in node.children() {
        push_inline(child, options, out);
    }
    out.push(Token::new(close, tag));
}

/// Render a single comrak node (and its subtree) to HTML
pub(crate) fn render_node<'a>(node: &'a AstNode<'a>, options: &Options) -> String {
    let mut html = Vec::new();
    if let Err(e) = format_html(node, options, &mut html) {
        warn!("Failed to render markdown node: {}", e);
        return String::new();
    }
    String::from_utf8_lossy(&html).into_owned()
}

/// Parse a fragment of inline source into tokens.
///
/// Leading and trailing whitespace would be dropped by the block parser, so it
/// is turned into a soft break (when it spans a line break) or kept as text.
/// Line starts that would open a block are escaped, so the fragment always
/// reads as inline content. `references` holds link reference definitions
/// the fragment may point at.
pub(crate) fn parse_fragment(fragment: &str, references: &str, options: &Options) -> Vec<Token> {
    let body = fragment.trim();
    if body.is_empty() {
        return edge_token(fragment).into_iter().collect();
    }

    let start = fragment.len() - fragment.trim_start().len();
    let end = start + body.len();

    let mut tokens: Vec<Token> = edge_token(&fragment[..start]).into_iter().collect();

    let escaped = escape_block_starts(body);
    let body_lines = escaped.lines().count();
    let document = if references.is_empty() {
        escaped
    } else {
        format!("{}\n\n{}", escaped, references)
    };

    let arena = Arena::new();
    let root = parse_document(&arena, &document, options);
    let blocks = root
        .children()
        .filter(|block| block.data.borrow().sourcepos.start.line <= body_lines);
    for (i, block) in blocks.enumerate() {
        if i > 0 {
            tokens.push(Token::new(TokenKind::SoftBreak, "br"));
        }
        let is_inline_block = matches!(
            block.data.borrow().value,
            NodeValue::Paragraph | NodeValue::Heading(_)
        );
        if is_inline_block {
            tokens.extend(flatten_children(block, options));
        } else {
            tokens.push(Token::html(render_node(block, options), false));
        }
    }

    tokens.extend(edge_token(&fragment[end..]));
    tokens
}

/// Backslash-escape every line start comrak would read as a block opener
fn escape_block_starts(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            let indent = line.len() - line.trim_start().len();
            let (lead, rest) = line.split_at(indent);
            if let Some(caps) = ORDERED_ITEM_REGEX.captures(rest) {
                let digits = caps.get(1).map_or(0, |m| m.end());
                format!("{}{}\\{}", lead, &rest[..digits], &rest[digits..])
            } else if BLOCK_START_REGEX.is_match(rest) {
                format!("{}\\{}", lead, rest)
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn edge_token(whitespace: &str) -> Option<Token> {
    if whitespace.contains('\n') {
        Some(Token::new(TokenKind::SoftBreak, "br"))
    } else if !whitespace.is_empty() {
        Some(Token::text(whitespace))
    } else {
        None
    }
}
