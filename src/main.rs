use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

use nametab::audit::AuditLog;
use nametab::gazetteer::GazetteerOptions;
use nametab::generator::DocumentConventions;
use nametab::mention::{render_table, render_translated_table};
use nametab::noise::{NoiseFilter, NoiseFilterConfig, LONG_NAME_THRESHOLD};
use nametab::pipeline::{self, PipelineConfig, ResourcePaths, Resources, RunStats};
use nametab::posters::Posters;
use nametab::reader::{write_atomic, AsyncFileReader, ReadStats, ReaderConfig};
use nametab::rules::RuleTable;
use nametab::translate::TranslationDictionary;

#[derive(Parser, Debug)]
#[command(name = "nametab")]
#[command(about = "Post-processing passes for TAC-style named-entity mention tables")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Write a JSON run report (input stats, merge stats, removals by reason)
    #[arg(long, global = true)]
    stats_out: Option<PathBuf>,

    /// Log every change, most frequent first
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add poster, gazetteer and social-media mentions
    AddNames {
        /// Input mention table
        table: PathBuf,
        /// BIO token file covering the table's documents
        bio: PathBuf,
        /// Output table
        out: PathBuf,
        /// Forum poster metadata
        #[arg(long)]
        posters: Option<PathBuf>,
        /// Gazetteer (surface, type, p|p2[, translation])
        #[arg(long)]
        gazetteer: Option<PathBuf>,
        /// Descriptor gazetteer (titles and roles preceding a name)
        #[arg(long)]
        descriptors: Option<PathBuf>,
        /// Type overrides for hashtags and at-mentions
        #[arg(long)]
        social_gazetteer: Option<PathBuf>,
        /// Skip hashtag and at-mention generation
        #[arg(long)]
        no_social: bool,
        /// Match gazetteers case-insensitively
        #[arg(long)]
        lowercase: bool,
        /// Do not resolve overlaps already present in the input table
        #[arg(long)]
        keep_input_overlaps: bool,
    },
    /// Remove noisy mentions
    RemoveNames {
        table: PathBuf,
        out: PathBuf,
        /// Forum poster metadata (all-digit poster names are kept)
        #[arg(long)]
        posters: Option<PathBuf>,
        /// Mentions with at least this many tokens are removed
        #[arg(long, default_value_t = LONG_NAME_THRESHOLD)]
        long_name_threshold: usize,
    },
    /// Apply hand-written retype and removal rules
    ApplyRules {
        table: PathBuf,
        rules: PathBuf,
        out: PathBuf,
        /// Match rule surfaces case-insensitively
        #[arg(long)]
        lowercase: bool,
    },
    /// Attach dictionary translations as a ninth column
    Translate {
        dictionary: PathBuf,
        table: PathBuf,
        out: PathBuf,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::AddNames { .. } => "add-names",
            Command::RemoveNames { .. } => "remove-names",
            Command::ApplyRules { .. } => "apply-rules",
            Command::Translate { .. } => "translate",
        }
    }
}

/// Table row counts of one run.
struct Rows {
    input: usize,
    output: usize,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // WHY: stdout stays free for tool output; logs are JSON lines on stderr
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .json()
        .init();

    info!(?cli, "Parsed CLI arguments");
    let start_time = Instant::now();
    let reader = AsyncFileReader::new(ReaderConfig::default());
    let mut log = AuditLog::new();
    let mut read_stats: Vec<ReadStats> = Vec::new();

    let rows = run(&cli.command, &reader, &mut log, &mut read_stats).await?;

    log.log_summary(cli.verbose);
    info!(
        command = cli.command.name(),
        input_rows = rows.input,
        output_rows = rows.output,
        "Run complete"
    );

    if let Some(stats_path) = &cli.stats_out {
        let stats = RunStats {
            command: cli.command.name().to_string(),
            input_rows: rows.input,
            output_rows: rows.output,
            duration_ms: start_time.elapsed().as_millis() as u64,
            inputs: read_stats,
            audit: log.summary(),
        };
        let json = serde_json::to_string_pretty(&stats)?;
        write_atomic(stats_path, &json)
            .await
            .with_context(|| format!("Failed to write stats to {}", stats_path.display()))?;
    }
    Ok(())
}

async fn run(
    command: &Command,
    reader: &AsyncFileReader,
    log: &mut AuditLog,
    read_stats: &mut Vec<ReadStats>,
) -> Result<Rows> {
    match command {
        Command::AddNames {
            table,
            bio,
            out,
            posters,
            gazetteer,
            descriptors,
            social_gazetteer,
            no_social,
            lowercase,
            keep_input_overlaps,
        } => {
            let mentions = pipeline::load_table(reader, table, read_stats)
                .await
                .with_context(|| format!("Failed to load table {}", table.display()))?;
            let documents = pipeline::load_documents(reader, bio, read_stats)
                .await
                .with_context(|| format!("Failed to load BIO file {}", bio.display()))?;

            let config = PipelineConfig {
                gazetteer: GazetteerOptions { lowercase: *lowercase },
                conventions: DocumentConventions::default(),
                social: !no_social,
                enforce_disjoint: !keep_input_overlaps,
            };
            let paths = ResourcePaths {
                posters: posters.clone(),
                gazetteer: gazetteer.clone(),
                descriptors: descriptors.clone(),
                social_markers: social_gazetteer.clone(),
            };
            let resources = Resources::load(&paths, &config, reader, log, read_stats)
                .await
                .context("Failed to load add-names resources")?;
            let input = mentions.len();
            let result = pipeline::add_names(mentions, &documents, &resources, &config, log);
            write_output(out, &render_table(&result)).await?;
            Ok(Rows {
                input,
                output: result.len(),
            })
        }
        Command::RemoveNames {
            table,
            out,
            posters,
            long_name_threshold,
        } => {
            let mentions = pipeline::load_table(reader, table, read_stats)
                .await
                .with_context(|| format!("Failed to load table {}", table.display()))?;
            let posters = match posters {
                Some(path) => {
                    let text = pipeline::read_into(reader, path, read_stats)
                        .await
                        .with_context(|| format!("Failed to load posters {}", path.display()))?;
                    Some(Posters::parse(&text))
                }
                None => None,
            };
            let filter = NoiseFilter::new(NoiseFilterConfig {
                long_name_threshold: *long_name_threshold,
                ..NoiseFilterConfig::default()
            })?;

            let input = mentions.len();
            let result = pipeline::remove_names(mentions, &filter, posters.as_ref(), log);
            write_output(out, &render_table(&result)).await?;
            Ok(Rows {
                input,
                output: result.len(),
            })
        }
        Command::ApplyRules {
            table,
            rules,
            out,
            lowercase,
        } => {
            let mentions = pipeline::load_table(reader, table, read_stats)
                .await
                .with_context(|| format!("Failed to load table {}", table.display()))?;
            let text = pipeline::read_into(reader, rules, read_stats)
                .await
                .with_context(|| format!("Failed to read rules {}", rules.display()))?;
            let rule_table = RuleTable::parse(&text, *lowercase)
                .with_context(|| format!("Invalid rule file {}", rules.display()))?;

            let input = mentions.len();
            let result = pipeline::apply_rules(mentions, &rule_table, log);
            write_output(out, &render_table(&result)).await?;
            Ok(Rows {
                input,
                output: result.len(),
            })
        }
        Command::Translate {
            dictionary,
            table,
            out,
        } => {
            let text = pipeline::read_into(reader, dictionary, read_stats)
                .await
                .with_context(|| format!("Failed to read dictionary {}", dictionary.display()))?;
            let dictionary = TranslationDictionary::parse(&text)
                .with_context(|| format!("Invalid dictionary {}", dictionary.display()))?;
            let mentions = pipeline::load_table(reader, table, read_stats)
                .await
                .with_context(|| format!("Failed to load table {}", table.display()))?;

            let input = mentions.len();
            let (result, translated) = pipeline::translate(mentions, &dictionary, log);
            write_output(out, &render_translated_table(&result)).await?;
            println!("{translated}");
            Ok(Rows {
                input,
                output: result.len(),
            })
        }
    }
}

async fn write_output(path: &Path, contents: &str) -> Result<()> {
    write_atomic(path, contents)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}
