//! Candidate mention generation from token streams.
//!
//! Three sources feed the merge step:
//!
//! - poster names in discussion-forum documents,
//! - gazetteer matches (optionally extended by a preceding descriptor),
//! - `#hashtag` and `@handle` tokens in social-media documents.
//!
//! Every generator takes an explicit [`IdSequence`], so mention ids are a
//! pure function of the inputs and the sequence handed in.

use tracing::debug;

use crate::gazetteer::{Gazetteer, TrustPolicy};
use crate::mention::{EntityType, Mention, Span};
use crate::noise::is_digits;
use crate::posters::Posters;
use crate::tokens::{Documents, Token};

pub const POSTER_RUN_ID: &str = "DF_poster_author";
pub const GAZETTEER_RUN_ID: &str = "Gazetteer";
pub const HASHTAG_RUN_ID: &str = "SN_HASH";
pub const AT_MENTION_RUN_ID: &str = "SN_AT";

pub const POSTER_ID_PREFIX: &str = "DFPA_";
pub const GAZETTEER_ID_PREFIX: &str = "GAZ_";
pub const HASHTAG_ID_PREFIX: &str = "SNHASH_";
pub const AT_MENTION_ID_PREFIX: &str = "SNAT_";

/// Width of the zero-padded numeric suffix of generated ids.
pub const ID_WIDTH: usize = 7;

/// Counter behind generated mention ids (`GAZ_0000000`, `GAZ_0000001`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdSequence {
    next: usize,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an arbitrary value, e.g. to continue a previous batch.
    pub fn starting_at(next: usize) -> Self {
        Self { next }
    }

    pub fn next_id(&mut self, prefix: &str) -> String {
        let id = format!("{prefix}{:0width$}", self.next, width = ID_WIDTH);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> usize {
        self.next
    }
}

/// Document-id naming conventions that select the forum and social passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentConventions {
    /// Substring marking discussion-forum documents.
    pub forum_marker: String,
    /// Substring marking social-media documents.
    pub social_marker: String,
}

impl Default for DocumentConventions {
    fn default() -> Self {
        Self {
            forum_marker: "DF_".to_string(),
            social_marker: "SN_".to_string(),
        }
    }
}

impl DocumentConventions {
    pub fn is_forum(&self, document_id: &str) -> bool {
        document_id.contains(&self.forum_marker)
    }

    pub fn is_social(&self, document_id: &str) -> bool {
        document_id.contains(&self.social_marker)
    }
}

/// Gazetteer candidates split by the trust policy of the matched entry.
#[derive(Debug, Clone, Default)]
pub struct GazetteerCandidates {
    pub trusted: Vec<Mention>,
    pub advisory: Vec<Mention>,
}

impl GazetteerCandidates {
    pub fn len(&self) -> usize {
        self.trusted.len() + self.advisory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Generates candidate mentions over one batch of documents.
pub struct MentionGenerator<'a> {
    documents: &'a Documents,
    conventions: &'a DocumentConventions,
}

impl<'a> MentionGenerator<'a> {
    pub fn new(documents: &'a Documents, conventions: &'a DocumentConventions) -> Self {
        Self {
            documents,
            conventions,
        }
    }

    /// A PER mention for every token of a forum document that exactly
    /// matches one of that document's posters.
    pub fn poster_authors(&self, posters: &Posters, ids: &mut IdSequence) -> Vec<Mention> {
        let mut mentions = Vec::new();
        for (doc, tokens) in self.documents.iter() {
            if !self.conventions.is_forum(doc) {
                continue;
            }
            for token in tokens.iter().filter(|t| posters.is_poster(doc, &t.text)) {
                mentions.push(Mention::generated(
                    POSTER_RUN_ID,
                    ids.next_id(POSTER_ID_PREFIX),
                    token.text.clone(),
                    Span::new(doc, token.begin, token.end),
                    EntityType::Person,
                ));
            }
        }
        debug!("Generated {} poster author mentions", mentions.len());
        mentions
    }

    /// Longest gazetteer match at every token position.
    ///
    /// Matches may overlap each other; callers resolve that with
    /// [`crate::resolver::resolve_self_conflicts`]. When `descriptors` is given
    /// and the token right before a match is a descriptor key (a title or
    /// role word), the descriptor joins the mention and its type wins.
    pub fn gazetteer(
        &self,
        gazetteer: &Gazetteer,
        descriptors: Option<&Gazetteer>,
        ids: &mut IdSequence,
    ) -> GazetteerCandidates {
        let mut candidates = GazetteerCandidates::default();
        for (doc, tokens) in self.documents.iter() {
            for start in 0..tokens.len() {
                let Some(found) = gazetteer.longest_match(tokens, start) else {
                    continue;
                };
                let matched = &tokens[start..start + found.token_count];
                let mut entity_type = found.entry.entity_type;
                let mut surface = join_tokens(matched);
                let mut begin = matched[0].begin;
                let end = matched[matched.len() - 1].end;

                if let Some(descriptor) = start
                    .checked_sub(1)
                    .map(|prev| &tokens[prev])
                    .and_then(|prev| descriptors?.get(&prev.text).map(|d| (prev, d)))
                {
                    let (prev, entry) = descriptor;
                    entity_type = entry.entity_type;
                    surface = format!("{} {}", prev.text, surface);
                    begin = prev.begin;
                }

                let mention = Mention::generated(
                    GAZETTEER_RUN_ID,
                    ids.next_id(GAZETTEER_ID_PREFIX),
                    surface,
                    Span::new(doc, begin, end),
                    entity_type,
                )
                .with_translation(found.entry.translation.clone());

                match found.entry.policy {
                    TrustPolicy::Trusted => candidates.trusted.push(mention),
                    TrustPolicy::Advisory => candidates.advisory.push(mention),
                }
            }
        }
        debug!(
            "Generated {} trusted and {} advisory gazetteer mentions",
            candidates.trusted.len(),
            candidates.advisory.len()
        );
        candidates
    }

    /// Hashtag (GPE) and at-mention (PER) tokens of social-media documents.
    ///
    /// `markers` overrides the default type per token; an entry typed `-`
    /// suppresses the token. Hashtags and at-mentions share one counter.
    pub fn social_markers(&self, markers: Option<&Gazetteer>, ids: &mut IdSequence) -> Vec<Mention> {
        let mut mentions = Vec::new();
        for (doc, tokens) in self.documents.iter() {
            if !self.conventions.is_social(doc) {
                continue;
            }
            for token in tokens {
                let Some(marker) = SocialMarker::classify(&token.text) else {
                    continue;
                };
                let (entity_type, translation) = match markers.and_then(|g| g.get(&token.text)) {
                    Some(entry) if entry.entity_type.is_suppress() => continue,
                    Some(entry) => (entry.entity_type, entry.translation.clone()),
                    None => (marker.default_type(), None),
                };
                mentions.push(
                    Mention::generated(
                        marker.run_id(),
                        ids.next_id(marker.id_prefix()),
                        token.text.clone(),
                        Span::new(doc, token.begin, token.end),
                        entity_type,
                    )
                    .with_translation(translation),
                );
            }
        }
        debug!("Generated {} social marker mentions", mentions.len());
        mentions
    }
}

/// Kind of social-media marker token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialMarker {
    Hashtag,
    AtMention,
}

impl SocialMarker {
    /// Classify a token, rejecting markers whose body is numeric, pure
    /// punctuation, empty, or itself contains another marker.
    pub fn classify(token: &str) -> Option<Self> {
        let (marker, body) = if let Some(body) = token.strip_prefix('#') {
            (SocialMarker::Hashtag, body)
        } else if let Some(body) = token.strip_prefix('@') {
            (SocialMarker::AtMention, body)
        } else {
            return None;
        };

        let numeric = is_digits(body);
        let punctuation = body.chars().all(|c| c.is_ascii_punctuation());
        let nested = body.contains(['#', '@']);
        if numeric || punctuation || nested {
            return None;
        }
        Some(marker)
    }

    pub fn default_type(&self) -> EntityType {
        match self {
            SocialMarker::Hashtag => EntityType::GeoPolitical,
            SocialMarker::AtMention => EntityType::Person,
        }
    }

    pub fn run_id(&self) -> &'static str {
        match self {
            SocialMarker::Hashtag => HASHTAG_RUN_ID,
            SocialMarker::AtMention => AT_MENTION_RUN_ID,
        }
    }

    pub fn id_prefix(&self) -> &'static str {
        match self {
            SocialMarker::Hashtag => HASHTAG_ID_PREFIX,
            SocialMarker::AtMention => AT_MENTION_ID_PREFIX,
        }
    }
}

fn join_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
