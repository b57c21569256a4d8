use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};

/// A compiled gitignore-style path pattern.
///
/// Semantics follow the CODEOWNERS flavour of gitignore globbing: `*` stays
/// within a single path segment, `**` crosses segments, a leading `/`
/// anchors the pattern to the repository root, and a trailing `/` matches
/// only paths nested beneath the named directory. A pattern without a
/// trailing slash matches the named path itself and anything nested beneath
/// it.
///
/// Patterns ending in `/*` are the exception: GitHub stops at the named
/// level and does not match nested files, unlike plain gitignore. That
/// single-segment boundary is derived from the pattern text by skipping the
/// descendant expansion for those patterns, rather than rewriting the
/// compiled matcher.
#[derive(Debug, Clone)]
pub struct PathPattern {
    pattern: String,
    set: GlobSet,
}

impl PathPattern {
    pub fn new(pattern: &str) -> Result<Self, globset::Error> {
        let anchored = pattern.starts_with('/');
        let dir_only = pattern.ends_with('/');
        let single_level = pattern.ends_with("/*");

        let mut base = String::with_capacity(pattern.len() + 3);
        if anchored {
            base.push_str(pattern.trim_start_matches('/'));
        } else {
            base.push_str("**/");
            base.push_str(pattern);
        }

        let mut builder = GlobSetBuilder::new();
        if dir_only {
            // Paths beneath the directory only, never the bare name itself
            base.push_str("**");
            builder.add(compile_glob(&base)?);
        } else {
            builder.add(compile_glob(&base)?);
            if !single_level {
                builder.add(compile_glob(&format!("{base}/**"))?);
            }
        }

        Ok(Self {
            pattern: pattern.to_owned(),
            set: builder.build()?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.set.is_match(normalize(path))
    }
}

fn compile_glob(glob: &str) -> Result<Glob, globset::Error> {
    GlobBuilder::new(glob).literal_separator(true).build()
}

// Queried paths are repo-relative; tolerate callers passing `/foo` or
// `./foo` forms.
fn normalize(path: &str) -> &str {
    let path = path.strip_prefix("./").unwrap_or(path);
    path.trim_start_matches('/')
}
