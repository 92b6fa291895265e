use comrak::nodes::{AstNode, ListType, NodeValue, Sourcepos};
use comrak::{parse_document, Arena, Options};
use lazy_static::lazy_static;
use regex::Regex;

use super::inlines::{flatten_children, render_node};
use crate::markdown::token::{join_adjacent_text, Token, TokenKind};

lazy_static! {
    static ref ATX_HEADING_REGEX: Regex =
        Regex::new(r"^\s{0,3}#{1,6}(?:[ \t]+(.*?))?(?:[ \t]+#+)?[ \t]*$").unwrap();

    // Trailing `{#custom-id}` attribute block on a heading
    static ref HEADING_ID_REGEX: Regex = Regex::new(r"[ \t]*\{#([^\s{}]+)\}[ \t]*$").unwrap();

    // Link reference definition, possibly inside block quotes or list items
    static ref REFERENCE_REGEX: Regex = Regex::new(r"^(?:[ \t]*>)*[ \t]*(\[[^\]]+\]:.*)$").unwrap();
}

/// Output of the block pass
#[derive(Debug, Clone, Default)]
pub struct Blocks {
    pub tokens: Vec<Token>,
    /// Link reference definitions of the document, one per line
    pub references: String,
}

/// Split a document into block tokens.
///
/// Headings and paragraphs become open/inline/close triples whose inline
/// token carries both the raw source (for inline scanning) and comrak's
/// parsed children. Block quotes, lists and list items are walked into and
/// framed by HTML tokens. Every other block is rendered by comrak into an
/// HTML token.
pub(crate) fn tokenize(src: &str, options: &Options) -> Blocks {
    let arena = Arena::new();
    let root = parse_document(&arena, src, options);
    let lines: Vec<&str> = src.lines().collect();

    let mut walker = BlockWalker {
        lines: &lines,
        options,
        tokens: Vec::new(),
    };
    walker.walk_children(root, 0, false);

    Blocks {
        tokens: walker.tokens,
        references: collect_references(root, &lines),
    }
}

struct BlockWalker<'s, 'o, 'c> {
    lines: &'s [&'s str],
    options: &'o Options<'c>,
    tokens: Vec<Token>,
}

impl<'s, 'o, 'c> BlockWalker<'s, 'o, 'c> {
    fn walk_children<'a>(&mut self, node: &'a AstNode<'a>, quote_depth: usize, tight: bool) {
        for child in node.children() {
            self.walk(child, quote_depth, tight);
        }
    }

    fn walk<'a>(&mut self, node: &'a AstNode<'a>, quote_depth: usize, tight: bool) {
        let (value, sourcepos) = {
            let ast = node.data.borrow();
            (ast.value.clone(), ast.sourcepos)
        };

        match value {
            NodeValue::Heading(heading) => {
                self.cr();
                let source = self.block_lines(&sourcepos, quote_depth);
                let raw = heading_source(&source, heading.setext);
                let (content, id) = split_heading_id(&raw);

                let tag = format!("h{}", heading.level);
                let markup = match (heading.setext, heading.level) {
                    (true, 1) => "=".to_string(),
                    (true, _) => "-".to_string(),
                    (false, level) => "#".repeat(level as usize),
                };

                let mut open = Token::new(TokenKind::HeadingOpen, tag.clone()).with_markup(markup.clone());
                open.block = true;
                let mut children = flatten_children(node, self.options);
                join_adjacent_text(&mut children);
                if let Some(id) = id {
                    open.attr_set("id", id);
                    strip_heading_id(&mut children);
                }

                let mut close = Token::new(TokenKind::HeadingClose, tag).with_markup(markup);
                close.block = true;

                self.tokens.push(open);
                self.tokens.push(Token::inline(content, children));
                self.tokens.push(close);
            }
            NodeValue::Paragraph => {
                if !tight {
                    self.cr();
                }
                let content = self
                    .block_lines(&sourcepos, quote_depth)
                    .iter()
                    .map(|line| line.trim_start())
                    .collect::<Vec<_>>()
                    .join("\n");

                let mut open = Token::new(TokenKind::ParagraphOpen, "p");
                open.block = true;
                open.hidden = tight;
                let mut close = Token::new(TokenKind::ParagraphClose, "p");
                close.block = true;
                close.hidden = tight;

                self.tokens.push(open);
                self.tokens.push(Token::inline(content.trim_end(), flatten_children(node, self.options)));
                self.tokens.push(close);
            }
            NodeValue::BlockQuote => {
                self.cr();
                self.tokens.push(Token::html("<blockquote>\n", true));
                self.walk_children(node, quote_depth + 1, false);
                self.cr();
                self.tokens.push(Token::html("</blockquote>\n", true));
            }
            NodeValue::List(list) => {
                let (open, close) = match list.list_type {
                    ListType::Bullet => ("<ul>\n".to_string(), "</ul>\n"),
                    ListType::Ordered if list.start == 1 => ("<ol>\n".to_string(), "</ol>\n"),
                    ListType::Ordered => (format!("<ol start=\"{}\">\n", list.start), "</ol>\n"),
                };
                self.cr();
                self.tokens.push(Token::html(open, true));
                self.walk_children(node, quote_depth, list.tight);
                self.cr();
                self.tokens.push(Token::html(close, true));
            }
            NodeValue::Item(_) => {
                self.cr();
                self.tokens.push(Token::html("<li>", true));
                self.walk_children(node, quote_depth, tight);
                self.tokens.push(Token::html("</li>\n", true));
            }
            _ => {
                self.cr();
                self.tokens.push(Token::html(render_node(node, self.options), true));
            }
        }
    }

    /// Start the next block on a fresh line
    fn cr(&mut self) {
        let needs_break = match self.tokens.last() {
            Some(last) if last.kind == TokenKind::Html => !last.content.is_empty() && !last.content.ends_with('\n'),
            Some(last) => last.kind == TokenKind::ParagraphClose && last.hidden,
            None => false,
        };
        if needs_break {
            self.tokens.push(Token::html("\n", true));
        }
    }

    /// Source lines of a block without the container markup in front of them
    fn block_lines(&self, pos: &Sourcepos, quote_depth: usize) -> Vec<&'s str> {
        source_lines(self.lines, pos)
            .into_iter()
            .enumerate()
            .map(|(i, line)| match i {
                0 => line.get(pos.start.column.saturating_sub(1)..).unwrap_or(line),
                _ => strip_quote_markers(line, quote_depth),
            })
            .collect()
    }
}

fn strip_quote_markers(line: &str, depth: usize) -> &str {
    let mut rest = line;
    for _ in 0..depth {
        match rest.trim_start_matches(|ch: char| ch == ' ' || ch == '\t').strip_prefix('>') {
            Some(after) => rest = after.strip_prefix(' ').unwrap_or(after),
            None => break,
        }
    }
    rest
}

/// Link reference definitions outside code and HTML blocks
fn collect_references<'a>(root: &'a AstNode<'a>, lines: &[&str]) -> String {
    let literal: Vec<(usize, usize)> = root
        .descendants()
        .filter_map(|node| {
            let ast = node.data.borrow();
            match ast.value {
                NodeValue::CodeBlock(_) | NodeValue::HtmlBlock(_) => {
                    Some((ast.sourcepos.start.line, ast.sourcepos.end.line))
                }
                _ => None,
            }
        })
        .collect();

    lines
        .iter()
        .enumerate()
        .filter(|(i, _)| !literal.iter().any(|&(start, end)| (start..=end).contains(&(i + 1))))
        .filter_map(|(_, line)| REFERENCE_REGEX.captures(line))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().trim_end()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn source_lines<'s>(lines: &[&'s str], pos: &Sourcepos) -> Vec<&'s str> {
    let start = pos.start.line.saturating_sub(1).min(lines.len());
    let end = pos.end.line.min(lines.len()).max(start);
    lines[start..end].to_vec()
}

/// Raw inline source of a heading, without its `#` or underline markup
fn heading_source(lines: &[&str], setext: bool) -> String {
    if setext {
        let text_lines = &lines[..lines.len().saturating_sub(1)];
        return text_lines
            .iter()
            .map(|line| line.trim())
            .collect::<Vec<_>>()
            .join("\n");
    }

    let line = lines.first().copied().unwrap_or_default();
    match ATX_HEADING_REGEX.captures(line) {
        Some(caps) => caps.get(1).map_or("", |m| m.as_str()).trim().to_string(),
        None => line.trim().to_string(),
    }
}

/// Separate a trailing `{#id}` block from the heading text
fn split_heading_id(raw: &str) -> (String, Option<String>) {
    match HEADING_ID_REGEX.captures(raw) {
        Some(caps) => {
            let id = caps[1].to_string();
            let text = raw[..caps.get(0).map_or(raw.len(), |m| m.start())].to_string();
            (text, Some(id))
        }
        None => (raw.to_string(), None),
    }
}

fn strip_heading_id(children: &mut Vec<Token>) {
    if let Some(last) = children.last_mut() {
        if last.kind == TokenKind::Text {
            last.content = HEADING_ID_REGEX.replace(&last.content, "").into_owned();
            if last.content.is_empty() {
                children.pop();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::engine::create_comrak_options;

    fn tokens(src: &str) -> Vec<Token> {
        tokenize(src, &create_comrak_options()).tokens
    }

    fn html_of(tokens: &[Token]) -> String {
        tokens
            .iter()
            .map(|t| match t.kind {
                TokenKind::Html => t.content.clone(),
                TokenKind::Inline => format!("[{}]", t.content),
                TokenKind::ParagraphOpen | TokenKind::ParagraphClose if t.hidden => String::new(),
                TokenKind::HeadingOpen | TokenKind::ParagraphOpen => format!("<{}>", t.tag),
                _ => format!("</{}>\n", t.tag),
            })
            .collect()
    }

    #[test]
    fn test_heading_triples() {
        let tokens = tokens("# Top Heading\n\n## Sub `code` Heading ##\n");

        assert_eq!(tokens.len(), 6);
        assert_eq!(tokens[0].kind, TokenKind::HeadingOpen);
        assert_eq!(tokens[0].tag, "h1");
        assert_eq!(tokens[1].content, "Top Heading");
        assert_eq!(tokens[3].tag, "h2");
        assert_eq!(tokens[4].content, "Sub `code` Heading");
        assert_eq!(tokens[4].children[1].kind, TokenKind::CodeInline);
        assert_eq!(tokens[5].kind, TokenKind::HeadingClose);
    }

    #[test]
    fn test_heading_id_attribute() {
        let tokens = tokens("## Hello World {#custom_id}\n");

        assert_eq!(tokens[0].attr_get("id"), Some("custom_id"));
        assert_eq!(tokens[1].content, "Hello World");
        assert_eq!(tokens[1].children.len(), 1);
        assert_eq!(tokens[1].children[0].content, "Hello World");
    }

    #[test]
    fn test_setext_heading() {
        let tokens = tokens("Title\n=====\n\nSection\n-------\n");

        assert_eq!(tokens[0].tag, "h1");
        assert_eq!(tokens[1].content, "Title");
        assert_eq!(tokens[3].tag, "h2");
        assert_eq!(tokens[4].content, "Section");
    }

    #[test]
    fn test_paragraph_keeps_raw_source() {
        let tokens = tokens("Intro *text*\n  [[toc]]\nMore\n");

        assert_eq!(tokens[0].kind, TokenKind::ParagraphOpen);
        assert_eq!(tokens[1].content, "Intro *text*\n[[toc]]\nMore");
        assert!(tokens[1].children.iter().any(|t| t.kind == TokenKind::EmOpen));
    }

    #[test]
    fn test_other_blocks_rendered_by_comrak() {
        let tokens = tokens("```rust\nfn main() {}\n```\n\n| a |\n|---|\n| b |\n");

        assert_eq!(tokens.len(), 2);
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Html && t.block));
        assert!(tokens[0].content.contains("<pre"));
        assert!(tokens[1].content.contains("<table>"));
    }

    #[test]
    fn test_block_quote_is_walked_into() {
        let tokens = tokens("> ## Quoted\n>\n> Some\n> text\n");

        assert_eq!(
            html_of(&tokens),
            "<blockquote>\n<h2>[Quoted]</h2>\n<p>[Some\ntext]</p>\n</blockquote>\n"
        );
    }

    #[test]
    fn test_tight_list_items() {
        let tokens = tokens("- ## In list\n- one\n  two\n  - nested\n");

        assert_eq!(
            html_of(&tokens),
            "<ul>\n<li>\n<h2>[In list]</h2>\n</li>\n<li>[one\ntwo]\n<ul>\n<li>[nested]</li>\n</ul>\n</li>\n</ul>\n"
        );
        assert!(tokens
            .iter()
            .filter(|t| t.kind == TokenKind::ParagraphOpen)
            .all(|t| t.hidden));
    }

    #[test]
    fn test_loose_ordered_list() {
        let tokens = tokens("3. a\n\n4. b\n");

        assert_eq!(
            html_of(&tokens),
            "<ol start=\"3\">\n<li>\n<p>[a]</p>\n</li>\n<li>\n<p>[b]</p>\n</li>\n</ol>\n"
        );
    }

    #[test]
    fn test_references_are_collected() {
        let blocks = tokenize(
            "See [a].\n\n[a]: https://a.example\n> [b]: /b \"B\"\n\n```\n[c]: /c\n```\n",
            &create_comrak_options(),
        );

        assert_eq!(blocks.references, "[a]: https://a.example\n[b]: /b \"B\"");
    }
}
