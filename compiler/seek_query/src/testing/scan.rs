//! A throwaway scanner that turns Go-like text into a [`SyntaxTree`].
//!
//! Just enough structure for position queries: top-level declarations,
//! bracket groups, identifiers, literals and comments. Keywords and other
//! punctuation produce no node.
//!
//! ```text
//! File
//!   Decl      `package`/`import`/`type`/`func`/`var`/`const` at depth 0,
//!             up to the next one
//!     Block   matched `()`, `[]` or `{}`, brackets included
//!     Ident | Literal | Comment
//! ```

use rustc_hash::FxHashSet;
use seek_ir::{
    IdentRole, NodeId, NodeKind, Span, SpanError, StringInterner, SyntaxTree, TreeBuilder,
    TreeError,
};

const KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

const DECL_KEYWORDS: &[&str] = &["package", "import", "type", "func", "var", "const"];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Tok {
    Word,
    /// Starts a top-level declaration when it appears at depth 0.
    DeclKeyword,
    Keyword,
    Literal,
    Comment,
    Open(char),
    Close(char),
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct Token {
    pub tok: Tok,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn span(self) -> Result<Span, SpanError> {
        Span::try_from_range(self.start..self.end)
    }
}

/// Split `text` into tokens, in source order.
pub(crate) fn scan(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((start, ch)) = chars.next() {
        let tok = match ch {
            c if c.is_whitespace() => continue,
            '/' if chars.peek().is_some_and(|&(_, next)| next == '/') => {
                while chars.next_if(|&(_, c)| c != '\n').is_some() {}
                Tok::Comment
            }
            '/' if chars.peek().is_some_and(|&(_, next)| next == '*') => {
                chars.next();
                let mut prev = '\0';
                for (_, c) in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
                Tok::Comment
            }
            '"' | '\'' => {
                let mut escaped = false;
                while let Some((_, c)) = chars.next_if(|&(_, c)| c != '\n') {
                    if c == ch && !escaped {
                        break;
                    }
                    escaped = c == '\\' && !escaped;
                }
                Tok::Literal
            }
            '`' => {
                while chars.next().is_some_and(|(_, c)| c != '`') {}
                Tok::Literal
            }
            c if c.is_ascii_digit() => {
                while chars
                    .next_if(|&(_, c)| c.is_alphanumeric() || c == '_' || c == '.')
                    .is_some()
                {}
                Tok::Literal
            }
            c if c.is_alphabetic() || c == '_' => {
                while chars
                    .next_if(|&(_, c)| c.is_alphanumeric() || c == '_')
                    .is_some()
                {}
                let end = chars.peek().map_or(text.len(), |&(i, _)| i);
                let word = &text[start..end];
                if DECL_KEYWORDS.contains(&word) {
                    Tok::DeclKeyword
                } else if KEYWORDS.contains(&word) {
                    Tok::Keyword
                } else {
                    Tok::Word
                }
            }
            '(' | '[' | '{' => Tok::Open(ch),
            ')' | ']' | '}' => Tok::Close(ch),
            _ => continue,
        };
        let end = chars.peek().map_or(text.len(), |&(i, _)| i);
        tokens.push(Token { tok, start, end });
    }
    tokens
}

fn closes(open: char, close: char) -> bool {
    matches!((open, close), ('(', ')') | ('[', ']') | ('{', '}'))
}

/// For every token, the index of its matching close bracket.
///
/// Unmatched brackets get `None` and are treated as punctuation.
fn pair_brackets(tokens: &[Token]) -> Vec<Option<usize>> {
    let mut pairs = vec![None; tokens.len()];
    let mut stack: Vec<(usize, char)> = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        match token.tok {
            Tok::Open(open) => stack.push((i, open)),
            Tok::Close(close) => {
                if let Some(&(at, open)) = stack.last() {
                    if closes(open, close) {
                        stack.pop();
                        pairs[at] = Some(i);
                    }
                }
            }
            _ => {}
        }
    }
    pairs
}

/// A scanned file turned into a tree.
pub(crate) struct Built {
    pub tree: SyntaxTree,
    /// Node of each `Word` token, by token index.
    pub nodes: Vec<Option<NodeId>>,
}

/// Error while turning scanned tokens into a tree.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Span(#[from] SpanError),
    #[error(transparent)]
    Tree(#[from] TreeError),
}

struct Emitter<'a> {
    text: &'a str,
    tokens: &'a [Token],
    pairs: Vec<Option<usize>>,
    declaring: &'a FxHashSet<usize>,
    interner: &'a StringInterner,
    builder: TreeBuilder,
    nodes: Vec<Option<NodeId>>,
}

impl Emitter<'_> {
    /// Emit tokens `lo..hi`, which never split a bracket pair.
    fn emit(&mut self, lo: usize, hi: usize) -> Result<(), BuildError> {
        let mut i = lo;
        while i < hi {
            let token = self.tokens[i];
            match token.tok {
                Tok::Open(_) => {
                    if let Some(close) = self.pairs[i] {
                        let span = Span::try_from_range(token.start..self.tokens[close].end)?;
                        self.builder.open(NodeKind::Block, span)?;
                        self.emit(i + 1, close)?;
                        self.builder.close()?;
                        i = close;
                    }
                }
                Tok::Word => {
                    let name = self.interner.intern(&self.text[token.start..token.end]);
                    let role = if self.declaring.contains(&i) {
                        IdentRole::Declaring
                    } else {
                        IdentRole::Use
                    };
                    let node = self
                        .builder
                        .leaf(NodeKind::Ident { name, role }, token.span()?)?;
                    self.nodes[i] = Some(node);
                }
                Tok::Literal => {
                    self.builder.leaf(NodeKind::Literal, token.span()?)?;
                }
                Tok::Comment => {
                    self.builder.leaf(NodeKind::Comment, token.span()?)?;
                }
                Tok::DeclKeyword | Tok::Keyword | Tok::Close(_) => {}
            }
            i += 1;
        }
        Ok(())
    }

    /// Index of every declaration keyword at bracket depth 0.
    fn decl_starts(&self) -> Vec<usize> {
        let mut starts = Vec::new();
        let mut i = 0;
        while i < self.tokens.len() {
            match (self.tokens[i].tok, self.pairs[i]) {
                (Tok::Open(_), Some(close)) => i = close,
                (Tok::DeclKeyword, _) => starts.push(i),
                _ => {}
            }
            i += 1;
        }
        starts
    }
}

/// Build the tree for `text`.
///
/// Word tokens whose index is in `declaring` become declaring occurrences;
/// every other word is a use.
pub(crate) fn build(
    text: &str,
    tokens: &[Token],
    declaring: &FxHashSet<usize>,
    interner: &StringInterner,
) -> Result<Built, BuildError> {
    let len = Span::try_from_range(0..text.len())?.end;
    let mut emitter = Emitter {
        text,
        tokens,
        pairs: pair_brackets(tokens),
        declaring,
        interner,
        builder: TreeBuilder::new(len),
        nodes: vec![None; tokens.len()],
    };

    emitter.builder.open(NodeKind::File, Span::new(0, len))?;
    let starts = emitter.decl_starts();
    emitter.emit(0, starts.first().copied().unwrap_or(tokens.len()))?;
    for (k, &start) in starts.iter().enumerate() {
        let end = starts.get(k + 1).copied().unwrap_or(tokens.len());
        let span = Span::try_from_range(tokens[start].start..tokens[end - 1].end)?;
        emitter.builder.open(NodeKind::Decl, span)?;
        emitter.emit(start, end)?;
        emitter.builder.close()?;
    }
    emitter.builder.close()?;

    Ok(Built {
        tree: emitter.builder.finish()?,
        nodes: emitter.nodes,
    })
}
