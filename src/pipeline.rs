//! The four batch tools as library calls.
//!
//! Each tool consumes a table and returns a new one; every decision goes to
//! the [`Reporter`] handed in. [`Resources`] loads the optional inputs of
//! `add_names` through the async reader.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::audit::{AuditSummary, Reporter};
use crate::error::Result;
use crate::gazetteer::{Gazetteer, GazetteerOptions};
use crate::generator::{DocumentConventions, IdSequence, MentionGenerator};
use crate::mention::{parse_table, Mention};
use crate::noise::NoiseFilter;
use crate::posters::Posters;
use crate::reader::{AsyncFileReader, ReadStats};
use crate::resolver::{merge, resolve_self_conflicts, MergePolicy};
use crate::reviser::revise_entity_types;
use crate::rules::RuleTable;
use crate::tokens::{parse_bio, Documents};
use crate::translate::TranslationDictionary;

pub const STAGE_POSTERS: &str = "poster_author";
pub const STAGE_GAZETTEER_TRUSTED: &str = "gazetteer_p";
pub const STAGE_GAZETTEER_ADVISORY: &str = "gazetteer_p2";
pub const STAGE_SOCIAL: &str = "social";

/// Configuration for [`add_names`].
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Applied to the gazetteer, descriptor and social-marker files alike.
    pub gazetteer: GazetteerOptions,
    pub conventions: DocumentConventions,
    /// Generate hashtag and at-mention candidates.
    pub social: bool,
    /// Finish with a self-conflict pass over the whole table, so overlaps
    /// already present in the input are resolved too.
    pub enforce_disjoint: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            gazetteer: GazetteerOptions::default(),
            conventions: DocumentConventions::default(),
            social: true,
            enforce_disjoint: true,
        }
    }
}

/// Optional inputs of [`add_names`]. A missing resource skips its stage.
#[derive(Debug, Default)]
pub struct Resources {
    pub posters: Option<Posters>,
    pub gazetteer: Option<Gazetteer>,
    pub descriptors: Option<Gazetteer>,
    pub social_markers: Option<Gazetteer>,
}

/// Paths of the optional `add_names` inputs.
#[derive(Debug, Clone, Default)]
pub struct ResourcePaths {
    pub posters: Option<PathBuf>,
    pub gazetteer: Option<PathBuf>,
    pub descriptors: Option<PathBuf>,
    pub social_markers: Option<PathBuf>,
}

impl Resources {
    /// Load every resource named in `paths` that a stage enabled in `config`
    /// will use. Read statistics are appended to `read_stats`.
    pub async fn load(
        paths: &ResourcePaths,
        config: &PipelineConfig,
        reader: &AsyncFileReader,
        reporter: &mut dyn Reporter,
        read_stats: &mut Vec<ReadStats>,
    ) -> Result<Self> {
        let options = config.gazetteer;
        let mut resources = Self::default();
        if let Some(path) = &paths.posters {
            let text = read_into(reader, path, read_stats).await?;
            resources.posters = Some(Posters::parse(&text));
        }
        resources.gazetteer =
            load_gazetteer(paths.gazetteer.as_deref(), options, reader, reporter, read_stats).await?;
        resources.descriptors =
            load_gazetteer(paths.descriptors.as_deref(), options, reader, reporter, read_stats).await?;
        if config.social {
            resources.social_markers =
                load_gazetteer(paths.social_markers.as_deref(), options, reader, reporter, read_stats)
                    .await?;
        }
        Ok(resources)
    }
}

async fn load_gazetteer(
    path: Option<&Path>,
    options: GazetteerOptions,
    reader: &AsyncFileReader,
    reporter: &mut dyn Reporter,
    read_stats: &mut Vec<ReadStats>,
) -> Result<Option<Gazetteer>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let text = read_into(reader, path, read_stats).await?;
    let gazetteer = Gazetteer::parse(&text, options, reporter)?;
    info!("Loaded {} gazetteer entries from {}", gazetteer.len(), path.display());
    Ok(Some(gazetteer))
}

/// Read a file, keeping its statistics.
pub async fn read_into(
    reader: &AsyncFileReader,
    path: &Path,
    read_stats: &mut Vec<ReadStats>,
) -> Result<String> {
    let (text, stats) = reader.read_text(path).await?;
    read_stats.push(stats);
    Ok(text)
}

/// Read and parse a mention table.
pub async fn load_table(
    reader: &AsyncFileReader,
    path: &Path,
    read_stats: &mut Vec<ReadStats>,
) -> Result<Vec<Mention>> {
    let text = read_into(reader, path, read_stats).await?;
    parse_table(&text)
}

/// Read and parse a BIO token file.
pub async fn load_documents(
    reader: &AsyncFileReader,
    path: &Path,
    read_stats: &mut Vec<ReadStats>,
) -> Result<Documents> {
    let text = read_into(reader, path, read_stats).await?;
    parse_bio(&text)
}

/// Add poster, gazetteer and social-media mentions to `table`.
///
/// Stages run in a fixed order: poster authors (new wins), trusted gazetteer
/// matches (new wins), advisory gazetteer matches (original wins), entity
/// type revision from the gazetteer, then social markers (new wins). Each
/// candidate set is resolved against itself before its merge.
pub fn add_names(
    table: Vec<Mention>,
    documents: &Documents,
    resources: &Resources,
    config: &PipelineConfig,
    reporter: &mut dyn Reporter,
) -> Vec<Mention> {
    let generator = MentionGenerator::new(documents, &config.conventions);
    let mut table = table;
    info!(
        "Adding names to {} mentions over {} documents",
        table.len(),
        documents.len()
    );

    if let Some(posters) = &resources.posters {
        let candidates = generator.poster_authors(posters, &mut IdSequence::new());
        let candidates = resolve_self_conflicts(candidates, reporter);
        table = merge(table, candidates, MergePolicy::trust_new(), STAGE_POSTERS, reporter).0;
    }

    if let Some(gazetteer) = &resources.gazetteer {
        let found = generator.gazetteer(gazetteer, resources.descriptors.as_ref(), &mut IdSequence::new());
        let trusted = resolve_self_conflicts(found.trusted, reporter);
        let advisory = resolve_self_conflicts(found.advisory, reporter);
        table = merge(table, trusted, MergePolicy::trust_new(), STAGE_GAZETTEER_TRUSTED, reporter).0;
        table = merge(
            table,
            advisory,
            MergePolicy::trust_original(),
            STAGE_GAZETTEER_ADVISORY,
            reporter,
        )
        .0;
        revise_entity_types(&mut table, gazetteer, reporter);
    }

    if config.social {
        let candidates =
            generator.social_markers(resources.social_markers.as_ref(), &mut IdSequence::new());
        let candidates = resolve_self_conflicts(candidates, reporter);
        table = merge(table, candidates, MergePolicy::trust_new(), STAGE_SOCIAL, reporter).0;
    }

    if config.enforce_disjoint {
        table = resolve_self_conflicts(table, reporter);
    }
    info!("Finished adding names: {} mentions", table.len());
    table
}

/// Drop noisy mentions.
pub fn remove_names(
    table: Vec<Mention>,
    filter: &NoiseFilter,
    posters: Option<&Posters>,
    reporter: &mut dyn Reporter,
) -> Vec<Mention> {
    filter.filter(table, posters, reporter)
}

/// Apply hand-written rules.
pub fn apply_rules(table: Vec<Mention>, rules: &RuleTable, reporter: &mut dyn Reporter) -> Vec<Mention> {
    crate::rules::apply_rules(table, rules, reporter)
}

/// Attach translations. Returns the table and the number translated.
pub fn translate(
    mut table: Vec<Mention>,
    dictionary: &TranslationDictionary,
    reporter: &mut dyn Reporter,
) -> (Vec<Mention>, usize) {
    let translated = crate::translate::translate(&mut table, dictionary, reporter);
    (table, translated)
}

/// Whole-run report written by `--stats-out`.
#[derive(Serialize, Debug, Clone)]
pub struct RunStats {
    pub command: String,
    pub input_rows: usize,
    pub output_rows: usize,
    pub duration_ms: u64,
    pub inputs: Vec<ReadStats>,
    pub audit: AuditSummary,
}
