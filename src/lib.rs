pub mod audit;
pub mod error;
pub mod gazetteer;
pub mod generator;
pub mod mention;
pub mod noise;
pub mod pipeline;
pub mod posters;
pub mod reader;
pub mod resolver;
pub mod reviser;
pub mod rules;
pub mod table;
pub mod tokens;
pub mod translate;

// Re-export main types for convenient access
pub use audit::{AuditEvent, AuditLog, AuditSummary, RemovalReason, Reporter, RetypeSource};
pub use error::{ConfigError, Error, FormatError, Result};
pub use gazetteer::{Gazetteer, GazetteerEntry, GazetteerOptions, TrustPolicy};
pub use generator::{DocumentConventions, IdSequence, MentionGenerator};
pub use mention::{parse_table, render_table, render_translated_table, EntityType, Mention, Span};
pub use noise::{NoiseFilter, NoiseFilterConfig};
pub use pipeline::{add_names, remove_names, PipelineConfig, ResourcePaths, Resources, RunStats};
pub use posters::Posters;
pub use resolver::{merge, resolve_self_conflicts, MergePolicy, MergeStats};
pub use rules::RuleTable;
pub use table::SpanTable;
pub use tokens::{parse_bio, Documents, Token};
pub use translate::TranslationDictionary;
