use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static HANDLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@[A-Za-z0-9_/-]+$").expect("valid handle regex"));

// RFC 5322-style address check covering the forms GitHub accepts for email
// owners: dotted-atom or quoted local parts, dotted-label or bracketed
// IPv4/IPv6 literal domains. Case-insensitive.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)^(?:[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*|"(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21\x23-\x5b\x5d-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])*")@(?:(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?|\[(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?|[a-z0-9-]*[a-z0-9]:(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21-\x5a\x5d-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])+)\])$"#,
    )
    .expect("valid email regex")
});

/// A validated owner token from a rules file: `@user`, `@org/team`, or an
/// email address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    value: String,
    kind: OwnerKind,
}

/// The syntactic form an [`Owner`] token was recognized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerKind {
    User,
    Team,
    Email,
}

impl Owner {
    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn kind(&self) -> OwnerKind {
        self.kind
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid owner: {0}")]
pub struct InvalidOwner(pub String);

impl TryFrom<String> for Owner {
    type Error = InvalidOwner;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if HANDLE_RE.is_match(&value) {
            let kind = if value.contains('/') {
                OwnerKind::Team
            } else {
                OwnerKind::User
            };
            Ok(Owner { value, kind })
        } else if EMAIL_RE.is_match(&value) {
            Ok(Owner {
                value,
                kind: OwnerKind::Email,
            })
        } else {
            Err(InvalidOwner(value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner(s: &str) -> Result<Owner, InvalidOwner> {
        Owner::try_from(s.to_string())
    }

    #[test]
    fn test_valid_owners() {
        let examples = vec![
            ("@octocat", OwnerKind::User),
            ("@octo-cat_2", OwnerKind::User),
            ("@octocat/kitty", OwnerKind::Team),
            ("@github/docs-team", OwnerKind::Team),
            ("docs@example.com", OwnerKind::Email),
            ("DOCS@EXAMPLE.COM", OwnerKind::Email),
            ("first.last@sub.example.co", OwnerKind::Email),
            ("user@[192.168.0.1]", OwnerKind::Email),
        ];

        for (token, kind) in examples {
            let parsed = owner(token).unwrap_or_else(|e| panic!("rejected {token}: {e}"));
            assert_eq!(parsed.as_str(), token);
            assert_eq!(parsed.kind(), kind, "wrong kind for {token}");
        }
    }

    #[test]
    fn test_invalid_owners() {
        let examples = vec!["octocat", "@", "@@bad", "@bad!name", "docs@", "@octo cat", "docs@nodot"];

        for token in examples {
            assert_eq!(
                owner(token),
                Err(InvalidOwner(token.to_string())),
                "expected {token} to be rejected"
            );
        }
    }
}
