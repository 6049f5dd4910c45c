//! ORDER BY and projection clause rendering.
//!
//! Plain orderings are kept as typed [`OrderClause::Column`] values. GBK
//! orderings wrap the column in `CONVERT(... USING gbk)`, which the typed form
//! cannot express, so they are stored as [`OrderClause::Raw`] text. The raw
//! path writes the column name without any escaping: it must only ever be fed
//! whitelist-validated names or names the caller explicitly trusts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    /// `Desc` if `desc` is true, `Asc` otherwise.
    pub fn from_desc(desc: bool) -> Self {
        if desc { Self::Desc } else { Self::Asc }
    }

    pub fn is_desc(self) -> bool {
        matches!(self, Self::Desc)
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// One requested ordering, typically deserialized from a request body.
///
/// ```json
/// [{"name": "sort"}, {"name": "`name`", "desc": true, "gbk": true}]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderColumn {
    /// Column name, checked against the entity's field list before use.
    pub name: String,
    /// Descending when true (default ascending).
    #[serde(default)]
    pub desc: bool,
    /// Order by the GBK-converted value (Chinese pinyin order).
    #[serde(default)]
    pub gbk: bool,
}

impl OrderColumn {
    /// Ascending, non-GBK ordering on `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            desc: false,
            gbk: false,
        }
    }

    /// Switch to descending order.
    pub fn desc(mut self) -> Self {
        self.desc = true;
        self
    }

    /// Switch to GBK collation order.
    pub fn gbk(mut self) -> Self {
        self.gbk = true;
        self
    }

    pub fn direction(&self) -> Direction {
        Direction::from_desc(self.desc)
    }
}

/// A single ORDER BY item held by a [`Statement`](crate::Statement).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderClause {
    /// Typed column ordering.
    Column { name: String, desc: bool },
    /// Raw SQL text, emitted verbatim.
    Raw(String),
}

impl OrderClause {
    /// Typed ordering on `name`.
    pub fn column(name: impl Into<String>, direction: Direction) -> Self {
        Self::Column {
            name: name.into(),
            desc: direction.is_desc(),
        }
    }

    /// GBK ordering: ` CONVERT(<name> USING gbk) <ASC|DESC>` (leading space kept).
    pub fn gbk(name: &str, direction: Direction) -> Self {
        Self::Raw(format!(" CONVERT({name} USING gbk) {direction}"))
    }

    /// Raw ordering text.
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::Raw(sql.into())
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }

    /// Render this item as SQL.
    pub fn to_sql(&self) -> String {
        let mut out = String::new();
        self.write_sql(&mut out);
        out
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        match self {
            Self::Column { name, desc } => {
                out.push_str(name);
                if *desc {
                    out.push_str(" DESC");
                }
            }
            Self::Raw(sql) => out.push_str(sql),
        }
    }
}

/// Render an ordering request into a clause.
///
/// The name is used as-is; validate it first unless it comes from trusted code.
pub fn render(spec: &OrderColumn) -> OrderClause {
    if spec.gbk {
        OrderClause::gbk(&spec.name, spec.direction())
    } else {
        OrderClause::column(spec.name.as_str(), spec.direction())
    }
}

/// Join field names into a projection list (`"a, b, c"`).
///
/// An empty list yields an empty string, which callers treat as "leave the
/// projection alone".
pub fn render_projection<S: AsRef<str>>(fields: &[S]) -> String {
    let mut out = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(field.as_ref());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gbk_fragment_matches_template_exactly() {
        assert_eq!(
            OrderClause::gbk("name", Direction::Desc),
            OrderClause::Raw(" CONVERT(name USING gbk) DESC".to_string())
        );
        assert_eq!(
            OrderClause::gbk("`name`", Direction::Asc).to_sql(),
            " CONVERT(`name` USING gbk) ASC"
        );
    }

    #[test]
    fn plain_order_is_typed() {
        let clause = render(&OrderColumn::new("sort").desc());
        assert_eq!(
            clause,
            OrderClause::Column {
                name: "sort".to_string(),
                desc: true
            }
        );
        assert!(!clause.is_raw());
        assert_eq!(clause.to_sql(), "sort DESC");
        assert_eq!(render(&OrderColumn::new("sort")).to_sql(), "sort");
    }

    #[test]
    fn gbk_request_renders_raw() {
        let clause = render(&OrderColumn::new("title").gbk());
        assert!(clause.is_raw());
        assert_eq!(clause.to_sql(), " CONVERT(title USING gbk) ASC");
    }

    #[test]
    fn projection_joins_with_comma_space() {
        assert_eq!(render_projection(&["id", "`name`", "sort"]), "id, `name`, sort");
        assert_eq!(render_projection(&["id"]), "id");
        assert_eq!(render_projection::<&str>(&[]), "");
    }

    #[test]
    fn order_column_deserializes_with_defaults() {
        let cols: Vec<OrderColumn> =
            serde_json::from_str(r#"[{"name":"sort"},{"name":"title","desc":true,"gbk":true}]"#)
                .unwrap();
        assert_eq!(cols[0], OrderColumn::new("sort"));
        assert_eq!(cols[1], OrderColumn::new("title").desc().gbk());
        assert_eq!(cols[1].direction(), Direction::Desc);
    }

    #[test]
    fn direction_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Direction::Desc).unwrap(), r#""DESC""#);
        assert_eq!(Direction::from_desc(false), Direction::Asc);
    }
}
