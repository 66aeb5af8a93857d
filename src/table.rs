//! Per-document index over a mention slice.
//!
//! Every conflict check in this crate is scoped to one document, so the
//! index only ever compares mentions that share a document id.

use std::collections::HashMap;

use crate::mention::{Mention, Span};

/// Borrowed, document-grouped view of a mention table.
///
/// Positions handed out by the table are indices into the original slice,
/// which lets callers build drop sets without cloning mentions.
pub struct SpanTable<'a> {
    mentions: &'a [Mention],
    documents: Vec<&'a str>,
    by_document: HashMap<&'a str, Vec<usize>>,
}

impl<'a> SpanTable<'a> {
    pub fn new(mentions: &'a [Mention]) -> Self {
        let mut documents = Vec::new();
        let mut by_document: HashMap<&'a str, Vec<usize>> = HashMap::new();
        for (idx, mention) in mentions.iter().enumerate() {
            let doc = mention.document_id();
            by_document
                .entry(doc)
                .or_insert_with(|| {
                    documents.push(doc);
                    Vec::new()
                })
                .push(idx);
        }
        Self {
            mentions,
            documents,
            by_document,
        }
    }

    /// Document ids in first-seen order.
    pub fn documents(&self) -> &[&'a str] {
        &self.documents
    }

    /// Indices of the mentions in `document_id`, in table order.
    pub fn in_document(&self, document_id: &str) -> &[usize] {
        self.by_document
            .get(document_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Index of a mention with exactly this span, if any.
    pub fn find_exact(&self, span: &Span) -> Option<usize> {
        self.in_document(&span.document_id)
            .iter()
            .copied()
            .find(|&idx| self.mentions[idx].span.same_extent(span))
    }

    /// Indices of mentions whose span partially overlaps `span`.
    pub fn partially_overlapping(&self, span: &Span) -> Vec<usize> {
        self.in_document(&span.document_id)
            .iter()
            .copied()
            .filter(|&idx| self.mentions[idx].span.partially_overlaps(span))
            .collect()
    }

    /// Every overlapping pair `(i, j)` with `i < j`, document by document.
    pub fn overlapping_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for doc in &self.documents {
            let members = &self.by_document[doc];
            for (pos, &i) in members.iter().enumerate() {
                for &j in &members[pos + 1..] {
                    if self.mentions[i].span.overlaps(&self.mentions[j].span) {
                        pairs.push((i, j));
                    }
                }
            }
        }
        pairs
    }

    /// True when no two mentions of the same document overlap.
    pub fn is_disjoint(&self) -> bool {
        self.overlapping_pairs().is_empty()
    }
}
