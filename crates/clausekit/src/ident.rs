//! SQL identifier handling.
//!
//! Two concerns live here:
//!
//! - [`quote_keyword`]: the static table of reserved-looking column names that
//!   are wrapped in backticks whenever they are emitted from entity metadata.
//! - [`Ident`]: a validated dotted identifier (`schema.table`) used for the
//!   FROM target of a [`Db`](crate::Db) handle.
//!
//! # Example
//! ```ignore
//! use clausekit::ident::{quote_keyword, Ident};
//!
//! assert_eq!(quote_keyword("status"), "`status`");
//! assert_eq!(quote_keyword("sort"), "sort");
//!
//! let t = Ident::parse("public.school_plan")?;
//! assert_eq!(t.to_sql(), "public.school_plan");
//! # Ok::<(), clausekit::OrmError>(())
//! ```

use std::borrow::Cow;

use crate::error::{OrmError, OrmResult};

/// Column names that collide with SQL keywords and are emitted backtick-quoted.
///
/// Extend by adding entries; nothing is inferred.
pub const QUOTED_KEYWORDS: &[&str] = &["name", "describe", "status"];

/// Wrap `tag` in backticks if it is listed in [`QUOTED_KEYWORDS`].
pub fn quote_keyword(tag: &str) -> Cow<'_, str> {
    if QUOTED_KEYWORDS.contains(&tag) {
        Cow::Owned(format!("`{tag}`"))
    } else {
        Cow::Borrowed(tag)
    }
}

/// A validated SQL identifier such as `users` or `public.users`.
///
/// Each dot-separated part must match `[A-Za-z_][A-Za-z0-9_$]*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    parts: Vec<String>,
}

impl Ident {
    /// Parse and validate a dotted identifier.
    pub fn parse(s: &str) -> OrmResult<Self> {
        if s.is_empty() {
            return Err(OrmError::validation("Identifier cannot be empty"));
        }

        let mut parts = Vec::new();
        for part in s.split('.') {
            validate_part(part)?;
            parts.push(part.to_string());
        }
        Ok(Self { parts })
    }

    /// The individual identifier parts.
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Render the identifier as SQL.
    pub fn to_sql(&self) -> String {
        self.parts.join(".")
    }
}

fn validate_part(part: &str) -> OrmResult<()> {
    let mut chars = part.chars();
    let Some(first) = chars.next() else {
        return Err(OrmError::validation("Empty identifier segment"));
    };
    if !(first == '_' || first.is_ascii_alphabetic()) {
        return Err(OrmError::validation(format!(
            "Invalid identifier start character: '{first}'"
        )));
    }
    if let Some(bad) = chars.find(|c| !(*c == '_' || *c == '$' || c.is_ascii_alphanumeric())) {
        return Err(OrmError::validation(format!(
            "Invalid character in identifier: '{bad}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_backticked() {
        assert_eq!(quote_keyword("name"), "`name`");
        assert_eq!(quote_keyword("describe"), "`describe`");
        assert_eq!(quote_keyword("status"), "`status`");
    }

    #[test]
    fn other_tags_pass_through_borrowed() {
        assert!(matches!(quote_keyword("sort"), Cow::Borrowed("sort")));
        // Exact match only.
        assert_eq!(quote_keyword("Name"), "Name");
        assert_eq!(quote_keyword("user_name"), "user_name");
    }

    #[test]
    fn ident_simple_and_dotted() {
        assert_eq!(Ident::parse("users").unwrap().to_sql(), "users");
        assert_eq!(Ident::parse("public.users").unwrap().to_sql(), "public.users");
        assert_eq!(Ident::parse("my_var$1").unwrap().to_sql(), "my_var$1");
    }

    #[test]
    fn ident_rejects_injection_shapes() {
        assert!(Ident::parse("").is_err());
        assert!(Ident::parse("1table").is_err());
        assert!(Ident::parse("my table").is_err());
        assert!(Ident::parse("users; DROP TABLE x").is_err());
        assert!(Ident::parse("schema..table").is_err());
        assert!(Ident::parse("schema.").is_err());
    }
}
