//! Hand-written rules that retype or remove mentions.
//!
//! Rule file rows are tab-separated:
//!
//! ```text
//! surface  scope  op  [args...]
//! ```
//!
//! `scope` is an entity type or `ALL`; `op` is `mv` (retype to the first
//! argument), `rm` (remove) or `in_rm` (remove, also when the rule surface is
//! only a substring of the mention). Comments follow the gazetteer
//! convention.

use std::collections::HashMap;
use tracing::{debug, info};

use crate::audit::{AuditEvent, RemovalReason, Reporter, RetypeSource};
use crate::error::{ConfigError, FormatError, Result};
use crate::gazetteer::is_comment;
use crate::mention::{EntityType, Mention};

const ALL_SCOPE: &str = "ALL";

/// Which mentions a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleScope {
    All,
    Type(EntityType),
}

impl RuleScope {
    pub fn parse(tag: &str) -> Option<Self> {
        if tag == ALL_SCOPE {
            Some(RuleScope::All)
        } else {
            EntityType::parse(tag).map(RuleScope::Type)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOp {
    /// `mv`: change the entity type.
    Retype(EntityType),
    /// `rm`: drop on exact match.
    Remove,
    /// `in_rm`: drop on exact or substring match.
    RemoveIfSubstring,
}

impl RuleOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleOp::Retype(_) => "mv",
            RuleOp::Remove => "rm",
            RuleOp::RemoveIfSubstring => "in_rm",
        }
    }
}

/// Rules sharing one surface key.
#[derive(Debug, Clone, Default)]
struct RuleSet {
    all: Option<RuleOp>,
    by_type: HashMap<EntityType, RuleOp>,
}

impl RuleSet {
    /// The `ALL` rule wins over a type-specific one.
    fn lookup(&self, entity_type: EntityType) -> Option<&RuleOp> {
        self.all.as_ref().or_else(|| self.by_type.get(&entity_type))
    }
}

/// Parsed rule file, keys kept in file order.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    keys: Vec<String>,
    rules: HashMap<String, RuleSet>,
    lowercase: bool,
}

impl RuleTable {
    pub fn new(lowercase: bool) -> Self {
        Self {
            lowercase,
            ..Self::default()
        }
    }

    /// Add a rule; a later rule for the same key and scope replaces the
    /// earlier one.
    pub fn insert(&mut self, surface: &str, scope: RuleScope, op: RuleOp) {
        let key = self.normalize(surface);
        if !self.rules.contains_key(&key) {
            self.keys.push(key.clone());
        }
        let set = self.rules.entry(key).or_default();
        let replaced = match scope {
            RuleScope::All => set.all.replace(op),
            RuleScope::Type(t) => set.by_type.insert(t, op),
        };
        if let Some(previous) = replaced {
            debug!("Rule for {:?} overrides earlier {}", surface, previous.as_str());
        }
    }

    /// Parse a rule file. Unknown scopes, operations, or `mv` targets are
    /// fatal.
    pub fn parse(text: &str, lowercase: bool) -> Result<Self> {
        let mut table = Self::new(lowercase);
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim_end_matches('\r');
            if is_comment(line) {
                continue;
            }
            let line_no = idx + 1;
            let cols: Vec<&str> = line.split('\t').collect();
            if cols.len() < 3 {
                return Err(FormatError::MissingColumns {
                    line: line_no,
                    expected: 3,
                    found: cols.len(),
                    content: line.to_string(),
                }
                .into());
            }
            let scope = RuleScope::parse(cols[1]).ok_or_else(|| ConfigError::UnknownEntityType {
                line: line_no,
                value: cols[1].to_string(),
            })?;
            let op = match cols[2] {
                "mv" => {
                    let target = cols.get(3).filter(|t| !t.is_empty()).ok_or_else(|| {
                        ConfigError::MissingRetypeTarget {
                            line: line_no,
                            surface: cols[0].to_string(),
                        }
                    })?;
                    let target =
                        EntityType::parse(target).ok_or_else(|| ConfigError::UnknownEntityType {
                            line: line_no,
                            value: target.to_string(),
                        })?;
                    RuleOp::Retype(target)
                }
                "rm" => RuleOp::Remove,
                "in_rm" => RuleOp::RemoveIfSubstring,
                other => {
                    return Err(ConfigError::UnknownRuleOp {
                        line: line_no,
                        value: other.to_string(),
                    }
                    .into())
                }
            };
            table.insert(cols[0], scope, op);
        }
        debug!("Loaded rules for {} surfaces", table.len());
        Ok(table)
    }

    fn normalize(&self, text: &str) -> String {
        if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        }
    }

    /// Number of distinct surface keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Rule for exactly this surface and type.
    pub fn exact(&self, surface: &str, entity_type: EntityType) -> Option<&RuleOp> {
        self.rules.get(&self.normalize(surface))?.lookup(entity_type)
    }

    /// First `in_rm` rule, in file order, whose key occurs inside `surface`.
    pub fn substring_removal(&self, surface: &str, entity_type: EntityType) -> Option<&str> {
        let surface = self.normalize(surface);
        self.keys
            .iter()
            .filter(|key| surface.contains(key.as_str()))
            .find(|key| {
                self.rules
                    .get(key.as_str())
                    .and_then(|set| set.lookup(entity_type))
                    == Some(&RuleOp::RemoveIfSubstring)
            })
            .map(String::as_str)
    }
}

/// Apply `rules` to every mention.
///
/// An exact rule, if one matches, is the only rule applied. Otherwise the
/// first substring `in_rm` rule in file order removes the mention.
pub fn apply_rules(mentions: Vec<Mention>, rules: &RuleTable, reporter: &mut dyn Reporter) -> Vec<Mention> {
    let before = mentions.len();
    let mut op_counts: HashMap<&'static str, usize> = HashMap::new();
    let mut kept = Vec::with_capacity(before);

    for mut mention in mentions {
        match rules.exact(&mention.surface, mention.entity_type) {
            Some(RuleOp::Retype(target)) => {
                *op_counts.entry("mv").or_default() += 1;
                reporter.record(AuditEvent::Retyped {
                    mention: (&mention).into(),
                    to: *target,
                    source: RetypeSource::Rule,
                });
                mention.entity_type = *target;
                kept.push(mention);
                continue;
            }
            Some(op) => {
                *op_counts.entry(op.as_str()).or_default() += 1;
                reporter.record(AuditEvent::Removed {
                    reason: RemovalReason::Rule,
                    mention: (&mention).into(),
                });
                continue;
            }
            None => {}
        }

        if let Some(key) = rules.substring_removal(&mention.surface, mention.entity_type) {
            debug!("in_rm {:?} matched inside {:?}", key, mention.surface);
            reporter.record(AuditEvent::Removed {
                reason: RemovalReason::SubstringRule,
                mention: (&mention).into(),
            });
            continue;
        }
        kept.push(mention);
    }

    for (op, count) in &op_counts {
        info!("# of {}: {}", op, count);
    }
    info!("{} of {} names removed by rules", before - kept.len(), before);
    kept
}
