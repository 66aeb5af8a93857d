//! Dictionary translation of mention surfaces.
//!
//! The dictionary is `source<TAB>target`, one pair per line. A source may
//! appear on several lines; its targets are kept once each, in file order,
//! and joined with `|` when attached to a mention.

use std::collections::HashMap;
use tracing::info;

use crate::audit::{AuditEvent, Reporter};
use crate::error::{FormatError, Result};
use crate::mention::Mention;

/// Separator between alternative translations.
pub const TARGET_SEPARATOR: &str = "|";

#[derive(Debug, Clone, Default)]
pub struct TranslationDictionary {
    targets: HashMap<String, Vec<String>>,
}

impl TranslationDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a translation; repeats of the same pair are ignored.
    pub fn insert(&mut self, source: impl Into<String>, target: impl Into<String>) {
        let target = target.into();
        let targets = self.targets.entry(source.into()).or_default();
        if !targets.contains(&target) {
            targets.push(target);
        }
    }

    /// Parse a dictionary file. Blank lines are skipped; a line without a tab
    /// is an error.
    pub fn parse(text: &str) -> Result<Self> {
        let mut dictionary = Self::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            let Some((source, rest)) = line.split_once('\t') else {
                return Err(FormatError::MissingColumns {
                    line: idx + 1,
                    expected: 2,
                    found: 1,
                    content: line.to_string(),
                }
                .into());
            };
            let target = rest.split('\t').next().unwrap_or(rest);
            dictionary.insert(source, target);
        }
        Ok(dictionary)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// `|`-joined targets for `source`.
    pub fn lookup(&self, source: &str) -> Option<String> {
        self.targets
            .get(source)
            .map(|targets| targets.join(TARGET_SEPARATOR))
    }
}

/// Attach dictionary translations to `mentions`. Returns how many mentions
/// were translated. Mentions without an entry lose any previous translation,
/// so the output column reflects this dictionary only.
pub fn translate(
    mentions: &mut [Mention],
    dictionary: &TranslationDictionary,
    reporter: &mut dyn Reporter,
) -> usize {
    let mut translated = 0;
    for mention in mentions.iter_mut() {
        mention.translation = dictionary.lookup(&mention.surface);
        if let Some(translation) = &mention.translation {
            reporter.record(AuditEvent::Translated {
                surface: mention.surface.clone(),
                translation: translation.clone(),
            });
            translated += 1;
        }
    }
    info!("{} of {} names translated", translated, mentions.len());
    translated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditLog;
    use crate::mention::{render_translated_table, EntityType, Span};

    #[test]
    fn test_targets_deduplicated_in_order() {
        let dic = TranslationDictionary::parse("Lagos\tlagosi\nLagos\tèkó\n\nLagos\tlagosi\nAbuja\tabuja\n").unwrap();
        assert_eq!(dic.len(), 2);
        assert_eq!(dic.lookup("Lagos").as_deref(), Some("lagosi|èkó"));
        assert_eq!(dic.lookup("Kano"), None);
    }

    #[test]
    fn test_line_without_tab_is_error() {
        assert!(TranslationDictionary::parse("Lagos lagosi\n").is_err());
    }

    #[test]
    fn test_translate_sets_column_and_null() {
        let mut dic = TranslationDictionary::new();
        dic.insert("Lagos", "èkó");
        let mut mentions = vec![
            Mention::generated("r", "1", "Lagos", Span::new("d", 0, 4), EntityType::GeoPolitical),
            Mention::generated("r", "2", "Kano", Span::new("d", 6, 9), EntityType::GeoPolitical)
                .with_translation(Some("stale".to_string())),
        ];
        let mut log = AuditLog::new();

        assert_eq!(translate(&mut mentions, &dic, &mut log), 1);
        let rendered = render_translated_table(&mentions);
        let rows: Vec<&str> = rendered.lines().collect();
        assert!(rows[0].ends_with("\tèkó"));
        assert!(rows[1].ends_with("\tNULL"));
        assert_eq!(log.summary().translated, 1);
    }
}
