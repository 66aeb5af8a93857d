use tracing::info;

use crate::audit::{AuditEvent, Reporter, RetypeSource};
use crate::gazetteer::Gazetteer;
use crate::mention::Mention;

/// Set the entity type of every mention whose surface is a gazetteer key to
/// the gazetteer's type. Returns the number of mentions changed.
///
/// Matching uses the gazetteer's own normalization, so a lower-cased
/// gazetteer also revises differently-cased surfaces.
pub fn revise_entity_types(
    mentions: &mut [Mention],
    gazetteer: &Gazetteer,
    reporter: &mut dyn Reporter,
) -> usize {
    let mut revised = 0;
    for mention in mentions.iter_mut() {
        let Some(entry) = gazetteer.get(&mention.surface) else {
            continue;
        };
        if entry.entity_type == mention.entity_type {
            continue;
        }
        reporter.record(AuditEvent::Retyped {
            mention: (&*mention).into(),
            to: entry.entity_type,
            source: RetypeSource::Gazetteer,
        });
        mention.entity_type = entry.entity_type;
        revised += 1;
    }
    info!("# of revised etypes: {}", revised);
    revised
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditLog;
    use crate::gazetteer::{GazetteerEntry, GazetteerOptions, TrustPolicy};
    use crate::mention::{EntityType, Span};

    #[test]
    fn test_revise_only_exact_matches_with_different_type() {
        let gaz = Gazetteer::build(
            vec![
                GazetteerEntry::new("Lagos", EntityType::GeoPolitical, TrustPolicy::Advisory),
                GazetteerEntry::new("Acme", EntityType::Organization, TrustPolicy::Trusted),
            ],
            GazetteerOptions::default(),
            &mut AuditLog::new(),
        );
        let mut mentions = vec![
            Mention::generated("r", "1", "Lagos", Span::new("d", 0, 5), EntityType::Person),
            Mention::generated("r", "2", "Acme", Span::new("d", 7, 11), EntityType::Organization),
            Mention::generated("r", "3", "Lagos State", Span::new("d", 13, 24), EntityType::Person),
        ];
        let mut log = AuditLog::new();

        let revised = revise_entity_types(&mut mentions, &gaz, &mut log);

        assert_eq!(revised, 1);
        assert_eq!(mentions[0].entity_type, EntityType::GeoPolitical);
        assert_eq!(mentions[1].entity_type, EntityType::Organization);
        assert_eq!(mentions[2].entity_type, EntityType::Person);
        match &log.events()[0] {
            AuditEvent::Retyped { mention, to, source } => {
                assert_eq!(mention.entity_type, EntityType::Person);
                assert_eq!(*to, EntityType::GeoPolitical);
                assert_eq!(*source, RetypeSource::Gazetteer);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
