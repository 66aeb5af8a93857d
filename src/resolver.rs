//! Conflict resolution between mention sets.
//!
//! Two operations keep the final table free of overlapping spans:
//!
//! - [`resolve_self_conflicts`] thins out one set on its own (longer names,
//!   counted in tokens, win);
//! - [`merge`] folds a candidate set into a base table under a
//!   [`MergePolicy`].
//!
//! Both only ever compare mentions of the same document.

use serde::Serialize;
use std::collections::BTreeSet;
use tracing::info;

use crate::audit::{AuditEvent, RemovalReason, Reporter};
use crate::mention::Mention;
use crate::table::SpanTable;

/// Counters for one merge, reported per stage.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Mentions in the base table before the merge.
    pub base: usize,
    /// Candidates offered to the merge.
    pub candidates: usize,
    /// Candidates whose span already exists in the base table.
    pub duplicates: usize,
    /// (candidate, base) pairs that partially overlap.
    pub overlapped: usize,
    /// Candidates touching no base mention.
    pub non_overlapped: usize,
    /// Non-overlapped candidates appended to the table.
    pub added: usize,
    /// Overlapping candidates that replaced base mentions.
    pub revised: usize,
    /// Base mentions removed by replacements.
    pub removed: usize,
}

/// How a merge treats candidates that collide with the base table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergePolicy {
    /// Overlapping candidates replace base mentions instead of being dropped.
    pub trust_new: bool,
    /// A replacement needs a surface strictly longer (in characters) than
    /// every base mention it displaces.
    pub require_strictly_longer: bool,
}

impl MergePolicy {
    /// New mentions win conflicts, if they are longer.
    pub fn trust_new() -> Self {
        Self {
            trust_new: true,
            require_strictly_longer: true,
        }
    }

    /// Existing mentions always win; only gaps get filled.
    pub fn trust_original() -> Self {
        Self {
            trust_new: false,
            require_strictly_longer: true,
        }
    }
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self::trust_original()
    }
}

/// Indices that lose an overlap inside `mentions`.
///
/// For every overlapping pair the mention with fewer whitespace tokens loses;
/// on a tie the later one does. All pairs are judged before anything is
/// dropped, so a loser can still knock out a third mention.
fn self_conflict_losers(mentions: &[Mention]) -> BTreeSet<usize> {
    let table = SpanTable::new(mentions);
    let mut losers = BTreeSet::new();
    for (i, j) in table.overlapping_pairs() {
        if mentions[i].token_count() < mentions[j].token_count() {
            losers.insert(i);
        } else {
            losers.insert(j);
        }
    }
    losers
}

/// Drop self-overlapping mentions, keeping the longer name of every pair.
pub fn resolve_self_conflicts(mentions: Vec<Mention>, reporter: &mut dyn Reporter) -> Vec<Mention> {
    let losers = self_conflict_losers(&mentions);
    if losers.is_empty() {
        return mentions;
    }
    info!(
        "{} of {} names overlapped, longer names kept",
        losers.len(),
        mentions.len()
    );
    mentions
        .into_iter()
        .enumerate()
        .filter_map(|(idx, mention)| {
            if losers.contains(&idx) {
                reporter.record(AuditEvent::Removed {
                    reason: RemovalReason::SelfOverlap,
                    mention: (&mention).into(),
                });
                None
            } else {
                Some(mention)
            }
        })
        .collect()
}

/// Merge `candidates` into `base`.
///
/// A candidate with exactly the span of a base mention is a duplicate and
/// goes nowhere. A candidate overlapping base mentions enters the table only
/// under `trust_new`, only if it wins against every one of them, and then
/// replaces them all. Candidates touching nothing are appended. Everything
/// entering the table is first resolved against itself, so a merge never
/// introduces an overlap.
///
/// Output order is surviving base mentions, then replacements, then
/// appended candidates.
pub fn merge(
    base: Vec<Mention>,
    candidates: Vec<Mention>,
    policy: MergePolicy,
    stage: &str,
    reporter: &mut dyn Reporter,
) -> (Vec<Mention>, MergeStats) {
    let mut stats = MergeStats {
        base: base.len(),
        candidates: candidates.len(),
        ..MergeStats::default()
    };

    // (candidate, indices of the base mentions it would displace)
    let mut winners: Vec<(Mention, Vec<usize>)> = Vec::new();
    let mut gap_fillers: Vec<Mention> = Vec::new();
    {
        let index = SpanTable::new(&base);
        for candidate in candidates {
            if index.find_exact(&candidate.span).is_some() {
                stats.duplicates += 1;
                continue;
            }
            let overlapped = index.partially_overlapping(&candidate.span);
            if overlapped.is_empty() {
                stats.non_overlapped += 1;
                gap_fillers.push(candidate);
                continue;
            }
            stats.overlapped += overlapped.len();
            if !policy.trust_new {
                continue;
            }
            let wins_all = !policy.require_strictly_longer
                || overlapped
                    .iter()
                    .all(|&b| candidate.char_len() > base[b].char_len());
            if wins_all {
                winners.push((candidate, overlapped));
            }
        }
    }

    // Replacements come first so they win ties against gap fillers.
    let winner_count = winners.len();
    let (mut incoming, displaced): (Vec<Mention>, Vec<Vec<usize>>) = winners.into_iter().unzip();
    incoming.append(&mut gap_fillers);
    let losers = self_conflict_losers(&incoming);

    let mut removed: BTreeSet<usize> = BTreeSet::new();
    for (idx, mention) in incoming.iter().enumerate() {
        if losers.contains(&idx) {
            reporter.record(AuditEvent::Removed {
                reason: RemovalReason::SelfOverlap,
                mention: mention.into(),
            });
            continue;
        }
        if idx < winner_count {
            stats.revised += 1;
            for &b in &displaced[idx] {
                reporter.record(AuditEvent::Replaced {
                    removed: (&base[b]).into(),
                    added: mention.into(),
                });
                removed.insert(b);
            }
        } else {
            stats.added += 1;
            reporter.record(AuditEvent::Added {
                stage: stage.to_string(),
                mention: mention.into(),
            });
        }
    }
    stats.removed = removed.len();

    let mut merged: Vec<Mention> = base
        .into_iter()
        .enumerate()
        .filter(|(idx, _)| !removed.contains(idx))
        .map(|(_, m)| m)
        .collect();
    merged.extend(
        incoming
            .into_iter()
            .enumerate()
            .filter(|(idx, _)| !losers.contains(idx))
            .map(|(_, m)| m),
    );

    info!(
        stage,
        duplicates = stats.duplicates,
        overlapped = stats.overlapped,
        added = stats.added,
        revised = stats.revised,
        "Merged {} candidates into {} names",
        stats.candidates,
        stats.base
    );
    reporter.record(AuditEvent::Merged {
        stage: stage.to_string(),
        stats: stats.clone(),
    });
    (merged, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditLog;
    use crate::mention::{EntityType, Span};

    fn m(surface: &str, begin: usize, end: usize) -> Mention {
        Mention::generated("r", surface, surface, Span::new("doc1", begin, end), EntityType::Person)
    }

    fn surfaces(mentions: &[Mention]) -> Vec<&str> {
        mentions.iter().map(|m| m.surface.as_str()).collect()
    }

    #[test]
    fn test_self_conflicts_keep_more_tokens() {
        let mut log = AuditLog::new();
        let kept = resolve_self_conflicts(
            vec![m("New York", 0, 8), m("New York City", 0, 13), m("City Hall", 9, 18)],
            &mut log,
        );
        assert_eq!(surfaces(&kept), vec!["New York City"]);
        assert_eq!(log.removed_count(RemovalReason::SelfOverlap), 2);
    }

    #[test]
    fn test_self_conflicts_judge_every_pair_before_dropping() {
        // "b b" loses to "a a a" but still knocks out "c", which never
        // touches "a a a"
        let mut log = AuditLog::new();
        let kept = resolve_self_conflicts(
            vec![m("a a a", 0, 10), m("b b", 8, 14), m("c", 12, 20)],
            &mut log,
        );
        assert_eq!(surfaces(&kept), vec!["a a a"]);
        assert_eq!(log.removed_count(RemovalReason::SelfOverlap), 2);
    }

    #[test]
    fn test_self_conflicts_tie_drops_later() {
        let mut log = AuditLog::new();
        let kept = resolve_self_conflicts(vec![m("Lagos", 0, 5), m("Lagos", 0, 5)], &mut log);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_self_conflicts_other_documents_untouched() {
        let mut log = AuditLog::new();
        let mut other = m("Lagos", 0, 5);
        other.span.document_id = "doc2".to_string();
        let kept = resolve_self_conflicts(vec![m("Lagos", 0, 5), other], &mut log);
        assert_eq!(kept.len(), 2);
        assert!(log.events().is_empty());
    }

    #[test]
    fn test_trust_new_with_no_candidates_returns_base() {
        let base = vec![m("Obama", 10, 15), m("Lagos", 30, 35)];
        let mut log = AuditLog::new();
        let (merged, stats) = merge(base.clone(), Vec::new(), MergePolicy::trust_new(), "empty", &mut log);
        assert_eq!(merged, base);
        assert_eq!(stats.base, 2);
        assert_eq!(stats.added + stats.revised + stats.removed, 0);
    }

    #[test]
    fn test_identical_span_is_only_a_duplicate() {
        let base = vec![m("Obama", 10, 15)];
        let mut candidate = m("Obama", 10, 15);
        candidate.entity_type = EntityType::Organization;
        let mut log = AuditLog::new();
        let (merged, stats) = merge(base.clone(), vec![candidate], MergePolicy::trust_new(), "dup", &mut log);
        assert_eq!(merged, base);
        assert_eq!(stats.duplicates, 1);
        assert_eq!(stats.overlapped, 0);
        assert_eq!(stats.added, 0);
    }

    #[test]
    fn test_trust_new_longer_candidate_replaces_base() {
        let base = vec![m("Obama", 10, 15), m("Lagos", 30, 35)];
        let mut log = AuditLog::new();
        let (merged, stats) = merge(
            base,
            vec![m("Obama Jr", 10, 20)],
            MergePolicy::trust_new(),
            "gazetteer",
            &mut log,
        );
        assert_eq!(surfaces(&merged), vec!["Lagos", "Obama Jr"]);
        assert_eq!(stats.overlapped, 1);
        assert_eq!(stats.revised, 1);
        assert_eq!(stats.removed, 1);
        assert_eq!(log.summary().replaced, 1);
    }

    #[test]
    fn test_trust_new_requires_strictly_longer() {
        let base = vec![m("Obama", 10, 15)];
        let mut log = AuditLog::new();
        let (merged, stats) = merge(
            base.clone(),
            vec![m("Bamas", 12, 17)],
            MergePolicy::trust_new(),
            "strict",
            &mut log,
        );
        assert_eq!(merged, base);
        assert_eq!(stats.overlapped, 1);
        assert_eq!(stats.revised, 0);

        let lenient = MergePolicy {
            trust_new: true,
            require_strictly_longer: false,
        };
        let (merged, _) = merge(base, vec![m("Bamas", 12, 17)], lenient, "lenient", &mut log);
        assert_eq!(surfaces(&merged), vec!["Bamas"]);
    }

    #[test]
    fn test_candidate_must_win_every_pair() {
        let base = vec![m("Acme", 0, 4), m("Corporation of America", 6, 28)];
        let mut log = AuditLog::new();
        let (merged, stats) = merge(
            base.clone(),
            vec![m("Acme Corp", 0, 9)],
            MergePolicy::trust_new(),
            "p",
            &mut log,
        );
        assert_eq!(merged, base);
        assert_eq!(stats.overlapped, 2);
        assert_eq!(stats.removed, 0);
    }

    #[test]
    fn test_trust_original_only_fills_gaps() {
        let base = vec![m("Obama", 10, 15)];
        let mut log = AuditLog::new();
        let (merged, stats) = merge(
            base,
            vec![m("Obama Jr", 10, 20), m("Lagos", 30, 35)],
            MergePolicy::trust_original(),
            "p2",
            &mut log,
        );
        assert_eq!(surfaces(&merged), vec!["Obama", "Lagos"]);
        assert_eq!(stats.non_overlapped, 1);
        assert_eq!(stats.added, 1);
        assert_eq!(stats.overlapped, 1);
    }

    #[test]
    fn test_incoming_candidates_resolved_against_each_other() {
        let base = vec![m("Obama", 10, 15)];
        let mut log = AuditLog::new();
        let (merged, stats) = merge(
            base,
            vec![m("Lagos", 30, 35), m("Lagos State", 30, 41), m("Obama Jr", 10, 20)],
            MergePolicy::trust_new(),
            "p",
            &mut log,
        );
        assert_eq!(surfaces(&merged), vec!["Obama Jr", "Lagos State"]);
        assert_eq!(stats.added, 1);
        assert!(SpanTable::new(&merged).is_disjoint());
    }

    #[test]
    fn test_merge_records_stats_event() {
        let mut log = AuditLog::new();
        merge(Vec::new(), vec![m("Lagos", 0, 5)], MergePolicy::trust_new(), "social", &mut log);
        let summary = log.summary();
        assert_eq!(summary.merges.len(), 1);
        assert_eq!(summary.merges[0].stage, "social");
        assert_eq!(summary.merges[0].stats.added, 1);
        assert_eq!(summary.added, 1);
    }
}
