use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

use crate::{owner::Owner, pattern::PathPattern};

/// An error produced while compiling a rules file. Any compile error aborts
/// construction of the whole rule set; no partial engine is ever returned.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("{owner} is not a valid owner name in rule `{rule}` (line {line})")]
    InvalidOwner {
        owner: String,
        rule: String,
        line: usize,
    },
    #[error("invalid path pattern `{pattern}` (line {line})")]
    Pattern {
        pattern: String,
        line: usize,
        #[source]
        source: globset::Error,
    },
}

/// One compiled ownership rule: a path pattern plus the owners responsible
/// for paths it matches. Rules are immutable after compilation apart from
/// the match counter, which records how many queries each rule has won.
#[derive(Debug)]
pub struct Rule {
    rule: String,
    pattern: PathPattern,
    owners: Vec<Owner>,
    line: usize,
    matched: AtomicU64,
}

impl Rule {
    /// Compile a single line of a rules file. `line` is the 0-based index
    /// of the line in its source. Returns `Ok(None)` when the line is blank
    /// or comment-only and so contributes no rule.
    pub(crate) fn compile(raw: &str, line: usize) -> Result<Option<Rule>, CompileError> {
        let rule = strip_comment(raw).trim();
        if rule.is_empty() {
            return Ok(None);
        }

        let mut tokens = rule.split_whitespace();
        let pattern_text = tokens.next().expect("non-empty rule has a pattern");

        let mut owners = Vec::new();
        for token in tokens {
            match Owner::try_from(token.to_owned()) {
                Ok(owner) => owners.push(owner),
                Err(err) => {
                    return Err(CompileError::InvalidOwner {
                        owner: err.0,
                        rule: rule.to_owned(),
                        line,
                    })
                }
            }
        }

        let pattern = PathPattern::new(pattern_text).map_err(|source| CompileError::Pattern {
            pattern: pattern_text.to_owned(),
            line,
            source,
        })?;

        Ok(Some(Rule {
            rule: rule.to_owned(),
            pattern,
            owners,
            line,
            matched: AtomicU64::new(0),
        }))
    }

    /// The comment-stripped, trimmed rule text.
    pub fn text(&self) -> &str {
        &self.rule
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn owners(&self) -> &[Owner] {
        &self.owners
    }

    /// 0-based line index of the rule in its source file.
    pub fn line(&self) -> usize {
        self.line
    }

    /// How many queries this rule has won over the engine's lifetime.
    pub fn matched(&self) -> u64 {
        self.matched.load(Ordering::Relaxed)
    }

    pub(crate) fn is_match(&self, path: &str) -> bool {
        self.pattern.is_match(path)
    }

    pub(crate) fn record_match(&self) {
        self.matched.fetch_add(1, Ordering::Relaxed);
    }
}

// Everything from the first unescaped `#` onwards is a comment.
fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    for (idx, &b) in bytes.iter().enumerate() {
        if b == b'#' && (idx == 0 || bytes[idx - 1] != b'\\') {
            return &line[..idx];
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::owner::OwnerKind;

    #[test]
    fn test_compile() {
        let examples = vec![
            ("", None),
            ("   ", None),
            ("# just a comment", None),
            ("  # indented comment", None),
            ("*.rs", Some(("*.rs", vec![]))),
            ("*.rs @rustacean", Some(("*.rs", vec!["@rustacean"]))),
            (
                "/docs/ @octocat/kitty docs@example.com",
                Some(("/docs/", vec!["@octocat/kitty", "docs@example.com"])),
            ),
            ("/build/*   @release-team  # trailing", Some(("/build/*", vec!["@release-team"]))),
        ];

        for (line, expected) in examples {
            let rule = Rule::compile(line, 7).unwrap_or_else(|e| panic!("failed on `{line}`: {e}"));
            match (rule, expected) {
                (None, None) => {}
                (Some(rule), Some((pattern, owners))) => {
                    assert_eq!(rule.pattern(), pattern, "pattern mismatch for `{line}`");
                    assert_eq!(
                        rule.owners().iter().map(Owner::as_str).collect::<Vec<_>>(),
                        owners,
                        "owners mismatch for `{line}`"
                    );
                    assert_eq!(rule.line(), 7);
                    assert_eq!(rule.matched(), 0);
                }
                (got, want) => panic!("mismatch for `{line}`: got {got:?}, want {want:?}"),
            }
        }
    }

    #[test]
    fn test_comment_stripping() {
        let rule = Rule::compile("src/lib.rs @dev # owned by core", 0)
            .unwrap()
            .unwrap();
        assert_eq!(rule.text(), "src/lib.rs @dev");
    }

    #[test]
    fn test_escaped_hash_is_not_a_comment() {
        let rule = Rule::compile(r"docs/\#readme @dev", 0).unwrap().unwrap();
        assert_eq!(rule.pattern(), r"docs/\#readme");
        assert_eq!(rule.owners().len(), 1);
    }

    #[test]
    fn test_invalid_owner_fails_compilation() {
        let err = Rule::compile("*.rs @rustacean @@bad", 3).unwrap_err();
        match err {
            CompileError::InvalidOwner { owner, rule, line } => {
                assert_eq!(owner, "@@bad");
                assert_eq!(rule, "*.rs @rustacean @@bad");
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_owner_kinds_survive_compilation() {
        let rule = Rule::compile("* @octocat @octocat/kitty docs@example.com", 0)
            .unwrap()
            .unwrap();
        let kinds: Vec<_> = rule.owners().iter().map(Owner::kind).collect();
        assert_eq!(kinds, vec![OwnerKind::User, OwnerKind::Team, OwnerKind::Email]);
    }
}
