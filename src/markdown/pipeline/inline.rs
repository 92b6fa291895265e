//! Inline scanning pass.
//!
//! The ruler walks the raw source of every inline token and offers each
//! position to its rules in order. Built-in rules only step over spans that
//! must never be handed to extension rules (escapes, code spans, delimiter
//! runs); the text they collect stays "pending" and is parsed by comrak once
//! scanning is over. Extension rules push tokens of their own, which stand in
//! the parsed source as placeholders until comrak is done with it.

use std::fmt;
use std::sync::Arc;

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::markdown::engine::ComrakEngine;
use crate::markdown::token::{join_adjacent_text, Token, TokenKind};
use crate::utils::error::TocError;

const PLACEHOLDER_OPEN: char = '\u{E000}';
const PLACEHOLDER_CLOSE: char = '\u{E001}';

lazy_static! {
    static ref PLACEHOLDER_REGEX: Regex = Regex::new("\u{E000}([0-9]+)\u{E001}").unwrap();
}

/// A rule of the inline scanning pass
pub trait InlineRule: Send + Sync {
    /// Try to consume input at `state.pos`.
    ///
    /// A rule that returns `true` has moved `state.pos` forward. In `silent`
    /// mode the rule may only validate and advance; it must not emit anything.
    fn scan(&self, state: &mut InlineState<'_>, silent: bool) -> bool;
}

enum Segment {
    Source(String),
    Token(Token),
}

/// Scan state over the raw source of one inline token
pub struct InlineState<'a> {
    pub src: &'a str,
    pub pos: usize,
    pub pos_max: usize,
    pending: String,
    segments: Vec<Segment>,
}

impl<'a> InlineState<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            pos_max: src.len(),
            pending: String::new(),
            segments: Vec::new(),
        }
    }

    /// Unscanned input from the current position
    pub fn remaining(&self) -> &'a str {
        if self.pos >= self.pos_max {
            return "";
        }
        &self.src[self.pos..self.pos_max]
    }

    pub fn current_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Queue source text for comrak to parse later
    pub fn push_pending(&mut self, text: &str) {
        self.pending.push_str(text);
    }

    /// Emit a token produced by a rule
    pub fn push(&mut self, token: Token) {
        self.flush_pending();
        self.segments.push(Segment::Token(token));
    }

    /// Tokens pushed by rules so far
    pub fn pushed(&self) -> impl Iterator<Item = &Token> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Token(token) => Some(token),
            Segment::Source(_) => None,
        })
    }

    fn flush_pending(&mut self) {
        if !self.pending.is_empty() {
            let text = std::mem::take(&mut self.pending);
            self.segments.push(Segment::Source(text));
        }
    }

    /// Final children for the inline token, or `None` when no rule emitted
    /// anything and comrak's own parse of the block can be kept.
    ///
    /// The pending source is parsed in one piece, with a private-use
    /// placeholder where each rule token sat, so constructs spanning a rule
    /// token and `references` links keep working.
    pub fn into_tokens(mut self, engine: &ComrakEngine, references: &str) -> Option<Vec<Token>> {
        if self.pushed().next().is_none() {
            return None;
        }
        self.flush_pending();

        let mut source = String::new();
        let mut rule_tokens: Vec<Option<Token>> = Vec::new();
        for segment in self.segments {
            match segment {
                Segment::Source(text) => source.push_str(&text),
                Segment::Token(token) => {
                    source.push(PLACEHOLDER_OPEN);
                    source.push_str(&rule_tokens.len().to_string());
                    source.push(PLACEHOLDER_CLOSE);
                    rule_tokens.push(Some(token));
                }
            }
        }

        let mut parsed = engine.parse_inline_with_references(&source, references);
        join_adjacent_text(&mut parsed);

        let mut tokens = Vec::with_capacity(parsed.len() + rule_tokens.len());
        for token in parsed {
            if token.kind == TokenKind::Text && token.content.contains(PLACEHOLDER_OPEN) {
                place_rule_tokens(&token.content, &mut rule_tokens, &mut tokens);
            } else {
                tokens.push(token);
            }
        }

        let unplaced: Vec<Token> = rule_tokens.into_iter().flatten().collect();
        if !unplaced.is_empty() {
            debug!("{} inline rule tokens ended up outside text, appending them", unplaced.len());
            tokens.extend(unplaced);
        }
        Some(tokens)
    }
}

/// Split a text token at its placeholders, putting the rule tokens back
fn place_rule_tokens(text: &str, rule_tokens: &mut [Option<Token>], out: &mut Vec<Token>) {
    let mut last = 0;
    for caps in PLACEHOLDER_REGEX.captures_iter(text) {
        let (whole, index) = match (caps.get(0), caps.get(1)) {
            (Some(whole), Some(index)) => (whole, index),
            _ => continue,
        };
        if whole.start() > last {
            out.push(Token::text(&text[last..whole.start()]));
        }
        let token = index
            .as_str()
            .parse::<usize>()
            .ok()
            .and_then(|i| rule_tokens.get_mut(i))
            .and_then(Option::take);
        if let Some(token) = token {
            out.push(token);
        }
        last = whole.end();
    }
    if last < text.len() {
        out.push(Token::text(&text[last..]));
    }
}

/// Ordered, named list of inline rules
#[derive(Clone, Default)]
pub struct InlineRuler {
    rules: Vec<(String, Arc<dyn InlineRule>)>,
}

impl fmt::Debug for InlineRuler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InlineRuler")
            .field("rules", &self.names())
            .finish()
    }
}

impl InlineRuler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ruler preloaded with `text`, `escape`, `backticks` and `emphasis`
    pub fn with_builtin_rules() -> Self {
        let mut ruler = Self::new();
        ruler.push("text", Arc::new(TextRule));
        ruler.push("escape", Arc::new(EscapeRule));
        ruler.push("backticks", Arc::new(BacktickRule));
        ruler.push("emphasis", Arc::new(EmphasisRule));
        ruler
    }

    pub fn push(&mut self, name: impl Into<String>, rule: Arc<dyn InlineRule>) {
        self.rules.push((name.into(), rule));
    }

    /// Insert a rule right after the rule called `after`
    pub fn insert_after(
        &mut self,
        after: &str,
        name: impl Into<String>,
        rule: Arc<dyn InlineRule>,
    ) -> Result<(), TocError> {
        let index = self.position(after)?;
        self.rules.insert(index + 1, (name.into(), rule));
        Ok(())
    }

    /// Insert a rule right before the rule called `before`
    pub fn insert_before(
        &mut self,
        before: &str,
        name: impl Into<String>,
        rule: Arc<dyn InlineRule>,
    ) -> Result<(), TocError> {
        let index = self.position(before)?;
        self.rules.insert(index, (name.into(), rule));
        Ok(())
    }

    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|(name, _)| name.as_str()).collect()
    }

    fn position(&self, name: &str) -> Result<usize, TocError> {
        self.rules
            .iter()
            .position(|(rule_name, _)| rule_name == name)
            .ok_or_else(|| TocError::Rule(format!("inline rule `{}` is not registered", name)))
    }

    /// Scan the whole input, offering every position to the rules in order
    pub fn tokenize(&self, state: &mut InlineState<'_>) {
        while state.pos < state.pos_max {
            let start = state.pos;
            let matched = self.rules.iter().any(|(_, rule)| rule.scan(state, false));
            if matched && state.pos > start {
                continue;
            }
            if matched {
                debug!("Inline rule matched without consuming input at byte {}", start);
            }

            match state.current_char() {
                Some(ch) => {
                    let mut buf = [0u8; 4];
                    state.push_pending(ch.encode_utf8(&mut buf));
                    state.pos += ch.len_utf8();
                }
                None => break,
            }
        }
    }
}

fn is_terminator(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '!'
            | '#'
            | '$'
            | '%'
            | '&'
            | '*'
            | '+'
            | '-'
            | ':'
            | '<'
            | '='
            | '>'
            | '@'
            | '['
            | '\\'
            | ']'
            | '^'
            | '_'
            | '`'
            | '{'
            | '}'
            | '~'
    )
}

/// Runs of characters no rule can start on
struct TextRule;

impl InlineRule for TextRule {
    fn scan(&self, state: &mut InlineState<'_>, silent: bool) -> bool {
        let rest = state.remaining();
        let len = rest.find(is_terminator).unwrap_or(rest.len());
        if len == 0 {
            return false;
        }
        if !silent {
            state.push_pending(&rest[..len]);
        }
        state.pos += len;
        true
    }
}

/// Backslash escapes, so `\[[toc]]` stays literal
struct EscapeRule;

impl InlineRule for EscapeRule {
    fn scan(&self, state: &mut InlineState<'_>, silent: bool) -> bool {
        let rest = state.remaining();
        let mut chars = rest.chars();
        if chars.next() != Some('\\') {
            return false;
        }
        match chars.next() {
            Some(ch) if ch.is_ascii_punctuation() || ch == '\n' => {
                let len = 1 + ch.len_utf8();
                if !silent {
                    state.push_pending(&rest[..len]);
                }
                state.pos += len;
                true
            }
            _ => false,
        }
    }
}

/// Code spans are opaque to extension rules
struct BacktickRule;

impl InlineRule for BacktickRule {
    fn scan(&self, state: &mut InlineState<'_>, silent: bool) -> bool {
        let rest = state.remaining();
        if !rest.starts_with('`') {
            return false;
        }
        let opener = run_length(rest, '`');

        let mut search = opener;
        let end = loop {
            match rest[search..].find('`') {
                None => break opener,
                Some(offset) => {
                    let run_start = search + offset;
                    let run = run_length(&rest[run_start..], '`');
                    if run == opener {
                        break run_start + run;
                    }
                    search = run_start + run;
                }
            }
        };

        if !silent {
            state.push_pending(&rest[..end]);
        }
        state.pos += end;
        true
    }
}

/// Emphasis and strikethrough delimiter runs
struct EmphasisRule;

impl InlineRule for EmphasisRule {
    fn scan(&self, state: &mut InlineState<'_>, silent: bool) -> bool {
        if silent {
            return false;
        }
        let rest = state.remaining();
        let marker = match rest.chars().next() {
            Some(ch @ ('*' | '_' | '~')) => ch,
            _ => return false,
        };
        let len = run_length(rest, marker);
        state.push_pending(&rest[..len]);
        state.pos += len;
        true
    }
}

fn run_length(text: &str, ch: char) -> usize {
    text.len() - text.trim_start_matches(ch).len()
}
