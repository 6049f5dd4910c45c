//! Filter predicates carried by a [`Statement`](crate::Statement).
//!
//! `Expr::build` emits `$n` placeholders numbered by the shared [`ParamList`],
//! so destination and filter predicates can be rendered into one WHERE clause
//! without renumbering.

use crate::qb::param::{Param, ParamList};
use tokio_postgres::types::ToSql;

/// Expression node for WHERE clauses.
#[derive(Clone, Debug)]
pub enum Expr {
    /// All conditions must hold.
    And(Vec<Expr>),
    /// At least one condition must hold.
    Or(Vec<Expr>),
    /// Negation.
    Not(Box<Expr>),
    /// `column op $n`
    Compare {
        column: String,
        op: &'static str,
        value: Param,
    },
    /// `column IS [NOT] NULL`
    NullCheck { column: String, is_null: bool },
    /// `column IN ($1, ...)`
    InList { column: String, values: Vec<Param> },
    /// Raw SQL without parameters.
    Raw(String),
    /// Always false (empty IN list).
    False,
}

impl Expr {
    pub fn and(exprs: Vec<Expr>) -> Self {
        Expr::And(exprs)
    }

    pub fn or(exprs: Vec<Expr>) -> Self {
        Expr::Or(exprs)
    }

    pub fn not(expr: Expr) -> Self {
        Expr::Not(Box::new(expr))
    }

    fn compare<T: ToSql + Send + Sync + 'static>(
        column: impl Into<String>,
        op: &'static str,
        value: T,
    ) -> Self {
        Expr::Compare {
            column: column.into(),
            op,
            value: Param::new(value),
        }
    }

    /// `column = value`
    pub fn eq<T: ToSql + Send + Sync + 'static>(column: impl Into<String>, value: T) -> Self {
        Self::compare(column, "=", value)
    }

    /// `column != value`
    pub fn ne<T: ToSql + Send + Sync + 'static>(column: impl Into<String>, value: T) -> Self {
        Self::compare(column, "!=", value)
    }

    /// `column > value`
    pub fn gt<T: ToSql + Send + Sync + 'static>(column: impl Into<String>, value: T) -> Self {
        Self::compare(column, ">", value)
    }

    /// `column >= value`
    pub fn gte<T: ToSql + Send + Sync + 'static>(column: impl Into<String>, value: T) -> Self {
        Self::compare(column, ">=", value)
    }

    /// `column < value`
    pub fn lt<T: ToSql + Send + Sync + 'static>(column: impl Into<String>, value: T) -> Self {
        Self::compare(column, "<", value)
    }

    /// `column <= value`
    pub fn lte<T: ToSql + Send + Sync + 'static>(column: impl Into<String>, value: T) -> Self {
        Self::compare(column, "<=", value)
    }

    /// `column LIKE pattern`
    pub fn like<T: ToSql + Send + Sync + 'static>(column: impl Into<String>, pattern: T) -> Self {
        Self::compare(column, "LIKE", pattern)
    }

    pub fn is_null(column: impl Into<String>) -> Self {
        Expr::NullCheck {
            column: column.into(),
            is_null: true,
        }
    }

    pub fn is_not_null(column: impl Into<String>) -> Self {
        Expr::NullCheck {
            column: column.into(),
            is_null: false,
        }
    }

    /// `column IN (values...)`; an empty list becomes `1=0`.
    pub fn in_list<T: ToSql + Send + Sync + 'static>(
        column: impl Into<String>,
        values: Vec<T>,
    ) -> Self {
        if values.is_empty() {
            return Expr::False;
        }
        Expr::InList {
            column: column.into(),
            values: values.into_iter().map(Param::new).collect(),
        }
    }

    pub fn raw(sql: impl Into<String>) -> Self {
        Expr::Raw(sql.into())
    }

    /// True if this expression renders to nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            Expr::And(exprs) | Expr::Or(exprs) => exprs.iter().all(Expr::is_empty),
            Expr::Not(inner) => inner.is_empty(),
            _ => false,
        }
    }

    /// Render SQL, pushing bound values onto `params`.
    pub fn build(&self, params: &mut ParamList) -> String {
        match self {
            Expr::And(exprs) => join_group(exprs, " AND ", params, |e| matches!(e, Expr::Or(_))),
            Expr::Or(exprs) => join_group(exprs, " OR ", params, |e| matches!(e, Expr::And(_))),
            Expr::Not(inner) => {
                let sql = inner.build(params);
                if sql.is_empty() {
                    sql
                } else {
                    format!("NOT ({sql})")
                }
            }
            Expr::Compare { column, op, value } => {
                let idx = params.push_param(value.clone());
                format!("{column} {op} ${idx}")
            }
            Expr::NullCheck { column, is_null } => {
                if *is_null {
                    format!("{column} IS NULL")
                } else {
                    format!("{column} IS NOT NULL")
                }
            }
            Expr::InList { column, values } => {
                let placeholders: Vec<String> = values
                    .iter()
                    .map(|v| format!("${}", params.push_param(v.clone())))
                    .collect();
                format!("{column} IN ({})", placeholders.join(", "))
            }
            Expr::Raw(sql) => sql.clone(),
            Expr::False => "1=0".to_string(),
        }
    }
}

fn join_group(
    exprs: &[Expr],
    sep: &str,
    params: &mut ParamList,
    needs_parens: impl Fn(&Expr) -> bool,
) -> String {
    let parts: Vec<String> = exprs
        .iter()
        .filter(|e| !e.is_empty())
        .map(|e| {
            let sql = e.build(params);
            if needs_parens(e) { format!("({sql})") } else { sql }
        })
        .collect();
    parts.join(sep)
}

/// AND-ed list of predicates, built up incrementally.
#[derive(Clone, Debug, Default)]
pub struct ExprGroup {
    exprs: Vec<Expr>,
}

impl ExprGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    pub fn and_expr(&mut self, expr: Expr) {
        self.exprs.push(expr);
    }

    pub fn exprs(&self) -> &[Expr] {
        &self.exprs
    }

    /// Render the group (without the `WHERE` keyword), numbering placeholders
    /// after whatever `params` already holds.
    pub fn build_into(&self, params: &mut ParamList) -> String {
        Expr::And(self.exprs.clone()).build(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_eq() {
        let mut params = ParamList::new();
        assert_eq!(Expr::eq("name", "alice").build(&mut params), "name = $1");
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn nested_groups_get_parentheses() {
        let expr = Expr::and(vec![
            Expr::eq("status", 1i32),
            Expr::or(vec![Expr::eq("role", "admin"), Expr::gt("score", 90i32)]),
        ]);
        let mut params = ParamList::new();
        assert_eq!(
            expr.build(&mut params),
            "status = $1 AND (role = $2 OR score > $3)"
        );
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn empty_in_list_is_false() {
        let mut params = ParamList::new();
        assert_eq!(Expr::in_list::<i64>("id", vec![]).build(&mut params), "1=0");
        assert!(params.is_empty());
    }

    #[test]
    fn group_continues_numbering() {
        let mut params = ParamList::new();
        params.push_param(Param::new(7i64));
        let mut group = ExprGroup::new();
        group.and_expr(Expr::in_list("id", vec![1i64, 2]));
        group.and_expr(Expr::is_null("deleted_at"));
        assert_eq!(
            group.build_into(&mut params),
            "id IN ($2, $3) AND deleted_at IS NULL"
        );
    }

    #[test]
    fn not_wraps_and_skips_empty() {
        let mut params = ParamList::new();
        assert_eq!(Expr::not(Expr::raw("archived")).build(&mut params), "NOT (archived)");
        assert_eq!(Expr::not(Expr::and(vec![])).build(&mut params), "");
    }
}
