//! Poster metadata for discussion-forum documents.
//!
//! The metadata file is tab-separated; only rows whose first column is `post`
//! matter, with the document id in column 2 and the poster name in column 5.
//! Short or unrelated rows are skipped.

use std::collections::{HashMap, HashSet};

const POST_TAG: &str = "post";
const DOCUMENT_COLUMN: usize = 1;
const POSTER_COLUMN: usize = 4;

/// Known poster names per document.
#[derive(Debug, Clone, Default)]
pub struct Posters {
    by_document: HashMap<String, HashSet<String>>,
}

impl Posters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, document_id: impl Into<String>, poster: impl Into<String>) {
        self.by_document
            .entry(document_id.into())
            .or_default()
            .insert(poster.into());
    }

    /// True if `name` posted in `document_id`.
    pub fn is_poster(&self, document_id: &str, name: &str) -> bool {
        self.by_document
            .get(document_id)
            .is_some_and(|names| names.contains(name))
    }

    pub fn document_count(&self) -> usize {
        self.by_document.len()
    }

    /// Parse the metadata file.
    pub fn parse(text: &str) -> Self {
        let mut posters = Self::new();
        for line in text.lines() {
            let cols: Vec<&str> = line.split('\t').collect();
            if cols.first() != Some(&POST_TAG) || cols.len() <= POSTER_COLUMN {
                continue;
            }
            posters.insert(cols[DOCUMENT_COLUMN], cols[POSTER_COLUMN]);
        }
        posters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_only_post_rows() {
        let text = "post\tDF_001\tp1\t2016-01-01\tjdoe\nquote\tDF_001\tq1\t-\tother\npost\tDF_002\n";
        let posters = Posters::parse(text);
        assert!(posters.is_poster("DF_001", "jdoe"));
        assert!(!posters.is_poster("DF_001", "other"));
        assert!(!posters.is_poster("DF_002", "jdoe"));
        assert_eq!(posters.document_count(), 1);
    }
}
