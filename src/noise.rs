//! Heuristic removal of mentions that are almost certainly not names.

use regex_automata::meta::Regex;
use std::ops::RangeInclusive;
use tracing::info;

use crate::audit::{AuditEvent, RemovalReason, Reporter};
use crate::error::Result;
use crate::generator::DocumentConventions;
use crate::mention::Mention;
use crate::posters::Posters;

/// Default minimum token count of a mention treated as a run-on sentence.
pub const LONG_NAME_THRESHOLD: usize = 15;

/// Configuration for [`NoiseFilter`].
#[derive(Debug, Clone)]
pub struct NoiseFilterConfig {
    /// Mentions with at least this many whitespace tokens are removed.
    pub long_name_threshold: usize,
    /// Code-point ranges of the scripts we annotate. A mention with no
    /// character in any range is removed.
    pub valid_ranges: Vec<RangeInclusive<u32>>,
    /// Clock-time lookalikes.
    pub time_pattern: String,
    /// Image file names.
    pub image_pattern: String,
    /// Social documents keep all-digit mentions.
    pub conventions: DocumentConventions,
}

impl Default for NoiseFilterConfig {
    fn default() -> Self {
        Self {
            long_name_threshold: LONG_NAME_THRESHOLD,
            // ASCII plus Oriya
            valid_ranges: vec![0x00..=0x7F, 0x0B00..=0x0B7F],
            time_pattern: r"\d+:\d+".to_string(),
            image_pattern: r".+\.jpg".to_string(),
            conventions: DocumentConventions::default(),
        }
    }
}

pub struct NoiseFilter {
    config: NoiseFilterConfig,
    time_pattern: Regex,
    image_pattern: Regex,
}

impl NoiseFilter {
    pub fn new(config: NoiseFilterConfig) -> Result<Self> {
        let time_pattern = Regex::new(&config.time_pattern)?;
        let image_pattern = Regex::new(&config.image_pattern)?;
        Ok(Self {
            config,
            time_pattern,
            image_pattern,
        })
    }

    /// First removal reason that applies to `mention`, if any.
    ///
    /// All-digit mentions survive when they are a poster name of their
    /// document (forum user names are often numbers) or sit in a social
    /// document.
    pub fn check(&self, mention: &Mention, posters: Option<&Posters>) -> Option<RemovalReason> {
        let surface = mention.surface.as_str();

        if is_digits(surface) {
            let poster = posters.is_some_and(|p| p.is_poster(mention.document_id(), surface));
            let social = self.config.conventions.is_social(mention.document_id());
            if !poster && !social {
                return Some(RemovalReason::IsDigits);
            }
        }
        if surface.chars().all(|c| c.is_ascii_punctuation()) {
            return Some(RemovalReason::IsPunct);
        }
        if surface.contains("http") {
            return Some(RemovalReason::HasHttp);
        }
        if mention.token_count() >= self.config.long_name_threshold {
            return Some(RemovalReason::TooLong);
        }
        if !surface.chars().any(|c| self.is_valid_char(c)) {
            return Some(RemovalReason::InvalidChars);
        }
        if self.time_pattern.is_match(surface) {
            return Some(RemovalReason::TimePattern);
        }
        if self.image_pattern.is_match(surface) {
            return Some(RemovalReason::ImageFile);
        }
        None
    }

    fn is_valid_char(&self, c: char) -> bool {
        let code = u32::from(c);
        self.config.valid_ranges.iter().any(|r| r.contains(&code))
    }

    /// Drop every mention [`NoiseFilter::check`] flags, reporting why.
    pub fn filter(
        &self,
        mentions: Vec<Mention>,
        posters: Option<&Posters>,
        reporter: &mut dyn Reporter,
    ) -> Vec<Mention> {
        let before = mentions.len();
        let kept: Vec<Mention> = mentions
            .into_iter()
            .filter(|mention| match self.check(mention, posters) {
                Some(reason) => {
                    reporter.record(AuditEvent::Removed {
                        reason,
                        mention: mention.into(),
                    });
                    false
                }
                None => true,
            })
            .collect();
        info!("{} of {} names removed as noise", before - kept.len(), before);
        kept
    }
}

/// First code point of each run of ten decimal digits (Unicode `Nd`) in
/// the scripts we expect to see: Arabic-Indic, Extended Arabic-Indic, NKo,
/// the Indic scripts, Thai, Lao, Tibetan, Myanmar, Khmer, Mongolian and
/// fullwidth forms.
const DECIMAL_DIGIT_ZEROS: [u32; 20] = [
    0x0660, 0x06F0, 0x07C0, 0x0966, 0x09E6, 0x0A66, 0x0AE6, 0x0B66, 0x0BE6, 0x0C66, 0x0CE6,
    0x0D66, 0x0DE6, 0x0E50, 0x0ED0, 0x0F20, 0x1040, 0x17E0, 0x1810, 0xFF10,
];

/// Decimal digit, ASCII or another script's. Fractions (`½`) and numeral
/// letters (`Ⅻ`) are not digits.
fn is_decimal_digit(c: char) -> bool {
    if c.is_ascii_digit() {
        return true;
    }
    let code = u32::from(c);
    DECIMAL_DIGIT_ZEROS
        .iter()
        .any(|&zero| (zero..=zero + 9).contains(&code))
}

/// Non-empty and made of decimal digits only.
pub(crate) fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_decimal_digit)
}
