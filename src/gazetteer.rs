//! Gazetteers and the token prefix tree used for longest-match lookup.
//!
//! A gazetteer file is tab-separated:
//!
//! ```text
//! surface  entity_type  trust_policy  [translation]
//! ```
//!
//! `trust_policy` is `p` (trusted: may overwrite existing annotations) or
//! `p2` (advisory: only fills gaps). Anything else is a configuration error,
//! since a mis-trusted entry could overwrite curated annotations.
//!
//! Surface forms are split on whitespace and stored as paths in a prefix tree
//! keyed by token. Lookups walk the tree along the document's token stream
//! and report the longest path that ends on a complete entry.

use std::collections::HashMap;
use tracing::{debug, warn};

use crate::audit::{AuditEvent, Reporter};
use crate::error::{ConfigError, FormatError, Result};
use crate::mention::EntityType;
use crate::tokens::Token;

/// Whether a gazetteer entry may override existing annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrustPolicy {
    /// `p`: replaces overlapping annotations.
    Trusted,
    /// `p2`: only added where nothing overlaps.
    Advisory,
}

impl TrustPolicy {
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "p" => Some(TrustPolicy::Trusted),
            "p2" => Some(TrustPolicy::Advisory),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrustPolicy::Trusted => "p",
            TrustPolicy::Advisory => "p2",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GazetteerEntry {
    pub surface: String,
    pub entity_type: EntityType,
    pub policy: TrustPolicy,
    pub translation: Option<String>,
}

impl GazetteerEntry {
    pub fn new(surface: impl Into<String>, entity_type: EntityType, policy: TrustPolicy) -> Self {
        Self {
            surface: surface.into(),
            entity_type,
            policy,
            translation: None,
        }
    }

    #[must_use]
    pub fn with_translation(mut self, translation: impl Into<String>) -> Self {
        self.translation = Some(translation.into());
        self
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GazetteerOptions {
    /// Lower-case keys at load time and tokens at lookup time.
    pub lowercase: bool,
}

#[derive(Debug, Default)]
struct PrefixNode {
    children: HashMap<String, PrefixNode>,
    /// Index into `Gazetteer::entries` when a complete entry ends here.
    terminal: Option<usize>,
}

/// Result of a successful [`Gazetteer::longest_match`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GazetteerMatch<'g> {
    /// Number of tokens consumed from the start position.
    pub token_count: usize,
    pub entry: &'g GazetteerEntry,
}

/// Immutable gazetteer with exact and longest-prefix lookup.
#[derive(Debug, Default)]
pub struct Gazetteer {
    entries: Vec<GazetteerEntry>,
    by_surface: HashMap<String, usize>,
    root: PrefixNode,
    options: GazetteerOptions,
}

impl Gazetteer {
    /// Build from entries. A repeated surface with a different type or
    /// policy is reported and the first-seen entry is kept.
    pub fn build(
        entries: impl IntoIterator<Item = GazetteerEntry>,
        options: GazetteerOptions,
        reporter: &mut dyn Reporter,
    ) -> Self {
        let mut gazetteer = Self {
            options,
            ..Self::default()
        };
        for entry in entries {
            gazetteer.insert(entry, reporter);
        }
        debug!("Built gazetteer with {} entries", gazetteer.len());
        gazetteer
    }

    /// Parse a gazetteer file.
    pub fn parse(text: &str, options: GazetteerOptions, reporter: &mut dyn Reporter) -> Result<Self> {
        let mut entries = Vec::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim_end_matches('\r');
            if is_comment(line) {
                continue;
            }
            entries.push(parse_entry(line, idx + 1)?);
        }
        Ok(Self::build(entries, options, reporter))
    }

    fn insert(&mut self, mut entry: GazetteerEntry, reporter: &mut dyn Reporter) {
        entry.surface = self.normalize(&entry.surface);
        let tokens: Vec<&str> = entry.surface.split_whitespace().collect();
        if tokens.is_empty() {
            warn!("Skipping gazetteer entry with empty surface");
            return;
        }

        if let Some(&existing) = self.by_surface.get(&entry.surface) {
            let kept = &self.entries[existing];
            if kept.entity_type != entry.entity_type || kept.policy != entry.policy {
                warn!(
                    "bad gaz: {} {} {}, conflict with {} {}, skip",
                    entry.surface,
                    entry.entity_type,
                    entry.policy.as_str(),
                    kept.entity_type,
                    kept.policy.as_str()
                );
                reporter.record(AuditEvent::GazetteerConflict {
                    surface: entry.surface.clone(),
                    kept: format!("{} {}", kept.entity_type, kept.policy.as_str()),
                    ignored: format!("{} {}", entry.entity_type, entry.policy.as_str()),
                });
            }
            return;
        }

        let index = self.entries.len();
        let mut node = &mut self.root;
        for token in &tokens {
            node = node.children.entry((*token).to_string()).or_default();
        }
        node.terminal = Some(index);
        self.by_surface.insert(entry.surface.clone(), index);
        self.entries.push(entry);
    }

    fn normalize(&self, text: &str) -> String {
        if self.options.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact lookup of a whole surface form.
    pub fn get(&self, surface: &str) -> Option<&GazetteerEntry> {
        let key = self.normalize(surface);
        self.by_surface.get(&key).map(|&idx| &self.entries[idx])
    }

    pub fn contains(&self, surface: &str) -> bool {
        self.get(surface).is_some()
    }

    /// Longest gazetteer entry starting at `tokens[start]`.
    ///
    /// The walk only ever extends, and it remembers the last node that closed
    /// a complete entry: with `New York` and `New York City` both present,
    /// `New York City Hall` yields the three-token match, while `New York
    /// Times` still yields `New York` even though the walk consumed `New York`
    /// and then failed on `Times`.
    pub fn longest_match(&self, tokens: &[Token], start: usize) -> Option<GazetteerMatch<'_>> {
        let mut node = &self.root;
        let mut best = None;
        for (consumed, token) in tokens.get(start..)?.iter().enumerate() {
            let key = self.normalize(&token.text);
            match node.children.get(&key) {
                Some(child) => {
                    node = child;
                    if let Some(idx) = child.terminal {
                        best = Some(GazetteerMatch {
                            token_count: consumed + 1,
                            entry: &self.entries[idx],
                        });
                    }
                }
                None => break,
            }
        }
        best
    }
}

/// Comment convention shared by gazetteer and rule files: blank lines, `//`
/// lines, and a bare `#` or `#` followed by whitespace. `#Lagos` is data.
pub(crate) fn is_comment(line: &str) -> bool {
    if line.trim().is_empty() || line.starts_with("//") {
        return true;
    }
    match line.strip_prefix('#') {
        Some(rest) => rest.is_empty() || rest.starts_with(char::is_whitespace),
        None => false,
    }
}

fn parse_entry(line: &str, line_no: usize) -> Result<GazetteerEntry> {
    let cols: Vec<&str> = line.split('\t').collect();
    if cols.len() < 3 {
        return Err(FormatError::MissingColumns {
            line: line_no,
            expected: 3,
            found: cols.len(),
            content: line.to_string(),
        }
        .into());
    }
    let entity_type = EntityType::parse(cols[1]).ok_or_else(|| ConfigError::UnknownEntityType {
        line: line_no,
        value: cols[1].to_string(),
    })?;
    let policy = TrustPolicy::parse(cols[2]).ok_or_else(|| ConfigError::UnknownTrustPolicy {
        line: line_no,
        value: cols[2].to_string(),
    })?;
    let translation = cols
        .get(3)
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string());
    Ok(GazetteerEntry {
        surface: cols[0].to_string(),
        entity_type,
        policy,
        translation,
    })
}
