//! A library for resolving file ownership from CODEOWNERS-style rule files.
//!
//! A rules file contains one rule per line: a gitignore-style path pattern
//! followed by zero or more owner tokens (`@user`, `@org/team`, or an email
//! address). [`OwnershipEngine`] compiles the file once and then answers
//! ownership queries for individual paths, with later rules overriding
//! earlier ones.
//!
//! ```no_run
//! use fileowners::OwnershipEngine;
//!
//! # fn main() -> Result<(), fileowners::Error> {
//! let engine = OwnershipEngine::from_path("CODEOWNERS")?;
//! if let Some(ownership) = engine.resolve("src/parser/mod.rs") {
//!     for owner in ownership.owners {
//!         println!("{owner}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod engine;
mod owner;
mod pattern;
mod rule;

use std::path::Path;

pub use engine::{Error, Ownership, OwnershipEngine, RuleStat};
pub use owner::{InvalidOwner, Owner, OwnerKind};
pub use rule::{CompileError, Rule};

/// A queried path paired with its resolved owners. An unowned path carries
/// an empty owners list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOwnership {
    pub path: String,
    pub owners: Vec<Owner>,
}

/// Resolve ownership for a batch of paths against a rules file, loading the
/// engine once and querying it per path.
pub fn file_ownership(
    rules_path: impl AsRef<Path>,
    paths: impl IntoIterator<Item = impl Into<String>>,
) -> Result<Vec<FileOwnership>, Error> {
    let engine = OwnershipEngine::from_path(rules_path)?;
    Ok(paths
        .into_iter()
        .map(|path| {
            let path = path.into();
            let owners = engine
                .resolve(&path)
                .map(|ownership| ownership.owners.to_vec())
                .unwrap_or_default();
            FileOwnership { path, owners }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_file_ownership() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "*.go @gopher\ndocs/ docs@example.com\n").expect("write rules");

        let results = file_ownership(file.path(), ["main.go", "docs/guide.md", "Cargo.toml"])
            .expect("engine loads");

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].path, "main.go");
        assert_eq!(
            results[0].owners.iter().map(Owner::as_str).collect::<Vec<_>>(),
            vec!["@gopher"]
        );
        assert_eq!(
            results[1].owners.iter().map(Owner::as_str).collect::<Vec<_>>(),
            vec!["docs@example.com"]
        );
        assert!(results[2].owners.is_empty());
    }
}
