//! Mention records and the tab-separated table format.
//!
//! A table row looks like
//!
//! ```text
//! run_id  mention_id  surface  doc:begin-end  kb_id  type  mention_type  confidence  [translation]
//! ```
//!
//! The ninth column only appears in translated tables; it is read when present
//! and written only by [`Mention::to_row_with_translation`].

use serde::Serialize;
use std::fmt;

use crate::error::{ConfigError, FormatError, Result};

/// Knowledge-base id used for unlinked mentions.
pub const NIL_KB_ID: &str = "NIL";

/// Marker written in the translation column when no translation exists.
pub const NO_TRANSLATION: &str = "NULL";

/// Confidence written for every generated mention.
pub const GENERATED_CONFIDENCE: &str = "1.0";

const TABLE_COLUMNS: usize = 8;

/// Entity type of a mention.
///
/// `Suppress` (`-`) is only meaningful inside gazetteers, where it marks a
/// surface form that must never become a mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum EntityType {
    #[serde(rename = "PER")]
    Person,
    #[serde(rename = "ORG")]
    Organization,
    #[serde(rename = "GPE")]
    GeoPolitical,
    #[serde(rename = "LOC")]
    Location,
    #[serde(rename = "FAC")]
    Facility,
    #[serde(rename = "WEA")]
    Weapon,
    #[serde(rename = "VEH")]
    Vehicle,
    #[serde(rename = "SID")]
    Sid,
    #[serde(rename = "-")]
    Suppress,
}

impl EntityType {
    pub const ALL: [EntityType; 9] = [
        EntityType::Person,
        EntityType::Organization,
        EntityType::GeoPolitical,
        EntityType::Location,
        EntityType::Facility,
        EntityType::Weapon,
        EntityType::Vehicle,
        EntityType::Sid,
        EntityType::Suppress,
    ];

    /// Parse the tag used in tables and resource files.
    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == tag)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Person => "PER",
            EntityType::Organization => "ORG",
            EntityType::GeoPolitical => "GPE",
            EntityType::Location => "LOC",
            EntityType::Facility => "FAC",
            EntityType::Weapon => "WEA",
            EntityType::Vehicle => "VEH",
            EntityType::Sid => "SID",
            EntityType::Suppress => "-",
        }
    }

    pub fn is_suppress(&self) -> bool {
        matches!(self, EntityType::Suppress)
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mention type column. Everything this crate generates is `Named`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MentionType {
    #[serde(rename = "NAM")]
    Named,
    #[serde(rename = "NOM")]
    Nominal,
    #[serde(rename = "PRO")]
    Pronominal,
}

impl MentionType {
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "NAM" => Some(MentionType::Named),
            "NOM" => Some(MentionType::Nominal),
            "PRO" => Some(MentionType::Pronominal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MentionType::Named => "NAM",
            MentionType::Nominal => "NOM",
            MentionType::Pronominal => "PRO",
        }
    }
}

/// Character-offset span of a mention inside one document.
///
/// Offsets are kept exactly as the upstream tagger wrote them; `begin <= end`
/// is checked at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Span {
    pub document_id: String,
    pub begin: usize,
    pub end: usize,
}

impl Span {
    pub fn new(document_id: impl Into<String>, begin: usize, end: usize) -> Self {
        Self {
            document_id: document_id.into(),
            begin,
            end,
        }
    }

    /// Same document and identical offsets.
    pub fn same_extent(&self, other: &Span) -> bool {
        self.document_id == other.document_id && self.begin == other.begin && self.end == other.end
    }

    /// Strict interval intersection, ignoring the document.
    pub fn partially_overlaps(&self, other: &Span) -> bool {
        self.begin.max(other.begin) < self.end.min(other.end)
    }

    /// Overlap as the final-table invariant defines it: an intersection or
    /// an identical span, within the same document.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.document_id == other.document_id
            && (self.partially_overlaps(other)
                || (self.begin == other.begin && self.end == other.end))
    }

    /// Parse `doc:begin-end`. The document id may itself contain colons, so
    /// the split happens at the last one.
    pub fn parse(offset: &str, line: usize) -> Result<Self> {
        let bad = || FormatError::BadOffset {
            line,
            offset: offset.to_string(),
        };
        let (doc, range) = offset.rsplit_once(':').ok_or_else(bad)?;
        let (begin, end) = range.split_once('-').ok_or_else(bad)?;
        if doc.is_empty() {
            return Err(bad().into());
        }
        let begin: usize = begin.parse().map_err(|_| bad())?;
        let end: usize = end.parse().map_err(|_| bad())?;
        if end < begin {
            return Err(FormatError::InvertedSpan { line, begin, end }.into());
        }
        Ok(Span::new(doc, begin, end))
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.document_id, self.begin, self.end)
    }
}

/// One row of a mention table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mention {
    pub run_id: String,
    pub mention_id: String,
    pub surface: String,
    pub span: Span,
    pub kb_id: String,
    pub entity_type: EntityType,
    pub mention_type: MentionType,
    /// Kept as read (after validating it as a number) so rows pass through
    /// byte for byte.
    pub confidence: String,
    pub translation: Option<String>,
}

impl Mention {
    /// A freshly generated, unlinked named mention with confidence 1.0.
    pub fn generated(
        run_id: impl Into<String>,
        mention_id: impl Into<String>,
        surface: impl Into<String>,
        span: Span,
        entity_type: EntityType,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            mention_id: mention_id.into(),
            surface: surface.into(),
            span,
            kb_id: NIL_KB_ID.to_string(),
            entity_type,
            mention_type: MentionType::Named,
            confidence: GENERATED_CONFIDENCE.to_string(),
            translation: None,
        }
    }

    #[must_use]
    pub fn with_translation(mut self, translation: Option<String>) -> Self {
        self.translation = translation;
        self
    }

    pub fn document_id(&self) -> &str {
        &self.span.document_id
    }

    /// Whitespace-delimited token count of the surface text.
    pub fn token_count(&self) -> usize {
        self.surface.split_whitespace().count()
    }

    /// Surface length in characters (not bytes).
    pub fn char_len(&self) -> usize {
        self.surface.chars().count()
    }

    /// Eight-column table row.
    pub fn to_row(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.run_id,
            self.mention_id,
            self.surface,
            self.span,
            self.kb_id,
            self.entity_type,
            self.mention_type.as_str(),
            self.confidence
        )
    }

    /// Nine-column row with the translation (or `NULL`) appended.
    pub fn to_row_with_translation(&self) -> String {
        format!(
            "{}\t{}",
            self.to_row(),
            self.translation.as_deref().unwrap_or(NO_TRANSLATION)
        )
    }

    /// Parse a single table row. `line` is 1-based and only used in errors.
    pub fn parse_row(row: &str, line: usize) -> Result<Self> {
        let cols: Vec<&str> = row.split('\t').collect();
        if cols.len() < TABLE_COLUMNS {
            return Err(FormatError::MissingColumns {
                line,
                expected: TABLE_COLUMNS,
                found: cols.len(),
                content: row.to_string(),
            }
            .into());
        }

        let span = Span::parse(cols[3], line)?;
        let entity_type =
            EntityType::parse(cols[5]).ok_or_else(|| ConfigError::UnknownEntityType {
                line,
                value: cols[5].to_string(),
            })?;
        let mention_type =
            MentionType::parse(cols[6]).ok_or_else(|| ConfigError::UnknownMentionType {
                line,
                value: cols[6].to_string(),
            })?;
        if cols[7].trim().parse::<f64>().is_err() {
            return Err(FormatError::BadNumber {
                line,
                field: "confidence",
                value: cols[7].to_string(),
            }
            .into());
        }
        let translation = cols
            .get(8)
            .filter(|t| !t.is_empty() && **t != NO_TRANSLATION)
            .map(|t| t.to_string());

        Ok(Self {
            run_id: cols[0].to_string(),
            mention_id: cols[1].to_string(),
            surface: cols[2].to_string(),
            span,
            kb_id: cols[4].to_string(),
            entity_type,
            mention_type,
            confidence: cols[7].to_string(),
            translation,
        })
    }
}

impl fmt::Display for Mention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_row())
    }
}

/// Parse a whole table. Blank lines are skipped.
pub fn parse_table(text: &str) -> Result<Vec<Mention>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| Mention::parse_row(line, idx + 1))
        .collect()
}

/// Serialize a table as newline-joined eight-column rows.
pub fn render_table(mentions: &[Mention]) -> String {
    mentions
        .iter()
        .map(Mention::to_row)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Serialize a table with the translation column.
pub fn render_translated_table(mentions: &[Mention]) -> String {
    mentions
        .iter()
        .map(Mention::to_row_with_translation)
        .collect::<Vec<_>>()
        .join("\n")
}
