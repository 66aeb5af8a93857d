//! Structured diagnostics for every pass.
//!
//! Components never log removal or revision decisions directly; they hand an
//! [`AuditEvent`] to a [`Reporter`]. [`AuditLog`] is the collector the CLI
//! uses: it keeps the events, mirrors them to `tracing` at debug level, and
//! renders per-reason counts and the most frequent changes at the end of a
//! run. Tests assert on the collected events instead of scraping logs.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, warn};

use crate::mention::{EntityType, Mention, Span};
use crate::resolver::MergeStats;

/// Why a mention left the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RemovalReason {
    /// Surface is all digits.
    IsDigits,
    /// Surface is all punctuation.
    IsPunct,
    /// Surface contains `http`.
    HasHttp,
    /// Surface has at least the configured number of tokens.
    TooLong,
    /// No character in the permitted code-point ranges.
    InvalidChars,
    /// Looks like a clock time.
    TimePattern,
    /// Looks like an image filename.
    ImageFile,
    /// Exact `rm` (or exact `in_rm`) rule.
    Rule,
    /// `in_rm` rule whose key is a substring of the surface.
    SubstringRule,
    /// Lost a self-overlap against a longer mention of the same set.
    SelfOverlap,
}

impl RemovalReason {
    /// Stable reason code for reports.
    pub fn code(&self) -> &'static str {
        match self {
            RemovalReason::IsDigits => "IS_DIGITS",
            RemovalReason::IsPunct => "IS_PUNCT",
            RemovalReason::HasHttp => "HAS_HTTP",
            RemovalReason::TooLong => "IS_LONG",
            RemovalReason::InvalidChars => "INVALID_CHAR",
            RemovalReason::TimePattern => "TIME_PATTERN",
            RemovalReason::ImageFile => "IMAGE_FILE",
            RemovalReason::Rule => "RULE_RM",
            RemovalReason::SubstringRule => "RULE_IN_RM",
            RemovalReason::SelfOverlap => "SELF_OVERLAP",
        }
    }
}

/// Which pass changed an entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RetypeSource {
    Gazetteer,
    Rule,
}

/// Just enough of a mention to explain a decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MentionRef {
    pub surface: String,
    pub entity_type: EntityType,
    pub span: Span,
}

impl From<&Mention> for MentionRef {
    fn from(m: &Mention) -> Self {
        Self {
            surface: m.surface.clone(),
            entity_type: m.entity_type,
            span: m.span.clone(),
        }
    }
}

/// One decision taken by a pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AuditEvent {
    Removed {
        reason: RemovalReason,
        mention: MentionRef,
    },
    Retyped {
        mention: MentionRef,
        to: EntityType,
        source: RetypeSource,
    },
    /// A trusted candidate replaced an overlapping base mention.
    Replaced {
        removed: MentionRef,
        added: MentionRef,
    },
    /// A candidate mention entered the table.
    Added { stage: String, mention: MentionRef },
    /// The same gazetteer key appeared with a different type or policy.
    GazetteerConflict {
        surface: String,
        kept: String,
        ignored: String,
    },
    Translated { surface: String, translation: String },
    Merged { stage: String, stats: MergeStats },
}

/// Sink for audit events.
pub trait Reporter {
    fn record(&mut self, event: AuditEvent);
}

/// Collects events for a whole run.
#[derive(Debug, Default)]
pub struct AuditLog {
    events: Vec<AuditEvent>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[AuditEvent] {
        &self.events
    }

    /// Number of removals recorded for `reason`.
    pub fn removed_count(&self, reason: RemovalReason) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AuditEvent::Removed { reason: r, .. } if *r == reason))
            .count()
    }

    /// Aggregate counts for the stats report.
    pub fn summary(&self) -> AuditSummary {
        let mut summary = AuditSummary::default();
        for event in &self.events {
            match event {
                AuditEvent::Removed { reason, .. } => {
                    summary.total_removed += 1;
                    *summary.removed_by_reason.entry(reason.code().to_string()).or_default() += 1;
                }
                AuditEvent::Retyped { source, .. } => match source {
                    RetypeSource::Gazetteer => summary.retyped_by_gazetteer += 1,
                    RetypeSource::Rule => summary.retyped_by_rule += 1,
                },
                AuditEvent::Replaced { .. } => summary.replaced += 1,
                AuditEvent::Added { .. } => summary.added += 1,
                AuditEvent::GazetteerConflict { .. } => summary.gazetteer_conflicts += 1,
                AuditEvent::Translated { .. } => summary.translated += 1,
                AuditEvent::Merged { stage, stats } => {
                    summary.merges.push(StageStats {
                        stage: stage.clone(),
                        stats: stats.clone(),
                    });
                }
            }
        }
        summary
    }

    /// Histogram of human-readable change lines, most frequent first.
    ///
    /// Ties are broken alphabetically so the output is stable.
    pub fn history(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for event in &self.events {
            let line = match event {
                AuditEvent::Removed { reason, mention } => {
                    format!("{} {} | {}", reason.code(), mention.surface, mention.entity_type)
                }
                AuditEvent::Retyped { mention, to, .. } => {
                    format!("{} | {} -> {}", mention.surface, mention.entity_type, to)
                }
                AuditEvent::Replaced { removed, added } => format!(
                    "'{}' {} -> '{}' {}",
                    removed.surface, removed.entity_type, added.surface, added.entity_type
                ),
                AuditEvent::Added { stage, mention } => {
                    format!("{} + {} | {}", stage, mention.surface, mention.entity_type)
                }
                _ => continue,
            };
            *counts.entry(line).or_default() += 1;
        }
        let mut lines: Vec<_> = counts.into_iter().collect();
        lines.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        lines
    }

    /// Render the run summary through `tracing`.
    pub fn log_summary(&self, verbose: bool) {
        let summary = self.summary();
        for merge in &summary.merges {
            info!(
                stage = %merge.stage,
                duplicates = merge.stats.duplicates,
                overlapped = merge.stats.overlapped,
                added = merge.stats.added,
                revised = merge.stats.revised,
                "Merge summary"
            );
        }
        for (code, count) in &summary.removed_by_reason {
            info!("# of names removed ({}): {}", code, count);
        }
        info!(
            "# of revised etypes: {} by gazetteer, {} by rule",
            summary.retyped_by_gazetteer, summary.retyped_by_rule
        );
        if summary.gazetteer_conflicts > 0 {
            warn!("{} conflicting gazetteer entries ignored", summary.gazetteer_conflicts);
        }
        if verbose {
            for (line, count) in self.history() {
                info!("  {} | {}", line, count);
            }
        }
    }
}

impl Reporter for AuditLog {
    fn record(&mut self, event: AuditEvent) {
        debug!(?event, "audit");
        self.events.push(event);
    }
}

/// Merge statistics tagged with the stage that produced them.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct StageStats {
    pub stage: String,
    #[serde(flatten)]
    pub stats: MergeStats,
}

/// Whole-run counters, written as JSON by `--stats-out`.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct AuditSummary {
    pub total_removed: usize,
    pub removed_by_reason: BTreeMap<String, usize>,
    pub retyped_by_gazetteer: usize,
    pub retyped_by_rule: usize,
    pub replaced: usize,
    pub added: usize,
    pub gazetteer_conflicts: usize,
    pub translated: usize,
    pub merges: Vec<StageStats>,
}
