use std::{
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, error};

use crate::{
    owner::Owner,
    rule::{CompileError, Rule},
};

/// A fatal engine construction error. Construction either yields a fully
/// loaded engine or one of these; a partially compiled engine is never
/// returned.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read rules file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to compile rules file {}", path.display())]
    Compile {
        path: PathBuf,
        #[source]
        source: CompileError,
    },
}

/// The result of a successful ownership query: the 0-based line number of
/// the winning rule and its owners, in rule declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ownership<'a> {
    pub line: usize,
    pub owners: &'a [Owner],
}

/// A rule's text paired with how many queries it has won, as returned by
/// [`OwnershipEngine::rule_stats`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleStat<'a> {
    pub rule: &'a str,
    pub matched: u64,
}

/// Resolves owners for repository paths against an ordered rule list.
///
/// Rules are held in file-declaration order; later rules override earlier
/// ones on overlapping patterns, mirroring GitHub's CODEOWNERS precedence.
/// The rule list is immutable after construction, so a loaded engine can be
/// queried freely; the per-rule match counters are the only state that
/// changes, and those are relaxed atomics.
#[derive(Debug)]
pub struct OwnershipEngine {
    rules: Vec<Rule>,
}

impl OwnershipEngine {
    /// Load and compile a rules file from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| {
            error!(path = %path.display(), "failed to read rules file");
            Error::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Self::from_source(&source).map_err(|source| {
            error!(path = %path.display(), %source, "failed to compile rules file");
            Error::Compile {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    /// Compile an engine from rules-file text. Carriage returns are
    /// stripped, so `\r\n` sources work unchanged.
    pub fn from_source(source: &str) -> Result<Self, CompileError> {
        let source = source.replace('\r', "");
        let mut rules = Vec::new();
        for (lineno, line) in source.split('\n').enumerate() {
            if let Some(rule) = Rule::compile(line, lineno)? {
                rules.push(rule);
            }
        }
        debug!(rules = rules.len(), "compiled ownership rules");
        Ok(Self { rules })
    }

    /// Resolve ownership for a single repo-relative path. Returns `None`
    /// when no rule matches, meaning the path is unowned; that is a normal
    /// outcome, not an error.
    ///
    /// Rules are scanned from the last declared backwards and the first hit
    /// wins, which yields last-rule-wins precedence without any sorting.
    pub fn resolve(&self, path: &str) -> Option<Ownership<'_>> {
        for rule in self.rules.iter().rev() {
            if rule.is_match(path) {
                rule.record_match();
                return Some(Ownership {
                    line: rule.line(),
                    owners: rule.owners(),
                });
            }
        }
        None
    }

    /// Per-rule match counts in declaration order, for auditing unused or
    /// over-broad rules.
    pub fn rule_stats(&self) -> Vec<RuleStat<'_>> {
        self.rules
            .iter()
            .map(|rule| RuleStat {
                rule: rule.text(),
                matched: rule.matched(),
            })
            .collect()
    }

    /// The compiled rules in declaration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}
