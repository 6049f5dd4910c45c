//! Identifier whitelist check.
//!
//! A candidate name is accepted only if it appears verbatim in the field list
//! produced by [`extract_fields`](crate::fields::extract_fields). Matching is
//! case-sensitive and does no trimming or alias resolution: `"Name"`, `" id"`
//! and `"id; DROP TABLE x"` are all rejected against a list holding `"id"`.
//!
//! Entity fields whose tag is in the keyword table are stored quoted, so the
//! accepted spelling for a `name` column is `` `name` ``.

/// Return `candidate` if it is one of `fields`, `None` otherwise.
///
/// `None` is not an error: callers skip the clause they were about to emit.
pub fn validate<'a, S: AsRef<str>>(fields: &[S], candidate: &'a str) -> Option<&'a str> {
    if candidate.is_empty() {
        return None;
    }
    fields
        .iter()
        .any(|f| f.as_ref() == candidate)
        .then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: &[&str] = &["id", "`name`", "sort"];

    #[test]
    fn accepts_exact_member() {
        assert_eq!(validate(FIELDS, "id"), Some("id"));
        assert_eq!(validate(FIELDS, "`name`"), Some("`name`"));
    }

    #[test]
    fn rejects_near_misses() {
        assert_eq!(validate(FIELDS, "ID"), None);
        assert_eq!(validate(FIELDS, " id"), None);
        assert_eq!(validate(FIELDS, "name"), None);
        assert_eq!(validate(FIELDS, "id; DROP TABLE x"), None);
    }

    #[test]
    fn rejects_empty_inputs() {
        assert_eq!(validate(FIELDS, ""), None);
        assert_eq!(validate::<&str>(&[], "id"), None);
    }

    #[test]
    fn works_with_owned_lists() {
        let owned = vec!["sort".to_string()];
        assert_eq!(validate(owned.as_slice(), "sort"), Some("sort"));
    }
}
