//! Per-document token streams read from BIO files.
//!
//! A BIO file is a sequence of blank-line separated blocks; every non-empty
//! line is `token offset [tags...]` separated by single spaces, where
//! `offset` is `doc:begin-end`. Tags are ignored here. Tokens are grouped by
//! the document named in their offset, not by block.

use std::collections::HashMap;

use crate::error::{FormatError, Result};
use crate::mention::Span;

/// One token with its character offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub begin: usize,
    pub end: usize,
}

impl Token {
    pub fn new(text: impl Into<String>, begin: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            begin,
            end,
        }
    }
}

/// Token streams for a batch of documents, in first-seen document order.
#[derive(Debug, Clone, Default)]
pub struct Documents {
    order: Vec<String>,
    tokens: HashMap<String, Vec<Token>>,
}

impl Documents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a token to `document_id`, registering the document if new.
    pub fn push(&mut self, document_id: &str, token: Token) {
        if !self.tokens.contains_key(document_id) {
            self.order.push(document_id.to_string());
        }
        self.tokens
            .entry(document_id.to_string())
            .or_default()
            .push(token);
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn tokens(&self, document_id: &str) -> &[Token] {
        self.tokens
            .get(document_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// `(document_id, tokens)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Token])> + '_ {
        self.order
            .iter()
            .map(move |doc| (doc.as_str(), self.tokens(doc)))
    }

    pub fn token_count(&self) -> usize {
        self.tokens.values().map(Vec::len).sum()
    }
}

/// Parse BIO text. A line with fewer than two columns stops the parse: the
/// offset cannot be guessed.
pub fn parse_bio(text: &str) -> Result<Documents> {
    let mut documents = Documents::new();
    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }
        let cols: Vec<&str> = line.split(' ').collect();
        if cols.len() < 2 {
            return Err(FormatError::MissingColumns {
                line: line_no,
                expected: 2,
                found: cols.len(),
                content: line.to_string(),
            }
            .into());
        }
        let span = Span::parse(cols[1], line_no)?;
        documents.push(
            &span.document_id,
            Token::new(cols[0], span.begin, span.end),
        );
    }
    Ok(documents)
}
