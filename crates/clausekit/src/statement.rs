//! The accumulated state of an in-progress query.

use crate::clause::OrderClause;
use crate::error::{OrmError, OrmResult};
use crate::ident::Ident;
use crate::qb::{Expr, ExprGroup, ParamList};

/// Clauses collected by a [`Db`](crate::Db) handle before execution.
///
/// `Clone` copies every clause list; bound values are shared immutably.
#[derive(Clone, Debug)]
pub struct Statement {
    table: String,
    select_cols: Vec<String>,
    where_group: ExprGroup,
    /// Predicate derived from a destination model (its key), separate from filters.
    dest: Option<Expr>,
    order_clauses: Vec<OrderClause>,
    limit: Option<i64>,
    offset: Option<i64>,
    build_error: Option<String>,
}

impl Statement {
    /// Start a statement against `table`.
    ///
    /// An invalid table identifier is recorded and reported by [`Statement::validate`].
    pub fn new(table: &str) -> Self {
        let (table, build_error) = match Ident::parse(table) {
            Ok(ident) => (ident.to_sql(), None),
            Err(err) => (table.to_string(), Some(err.to_string())),
        };
        Self {
            table,
            select_cols: vec!["*".to_string()],
            where_group: ExprGroup::new(),
            dest: None,
            order_clauses: Vec::new(),
            limit: None,
            offset: None,
            build_error,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn select_cols(&self) -> &[String] {
        &self.select_cols
    }

    pub fn order_clauses(&self) -> &[OrderClause] {
        &self.order_clauses
    }

    pub fn filters(&self) -> &[Expr] {
        self.where_group.exprs()
    }

    pub fn dest(&self) -> Option<&Expr> {
        self.dest.as_ref()
    }

    pub fn limit(&self) -> Option<i64> {
        self.limit
    }

    pub fn offset(&self) -> Option<i64> {
        self.offset
    }

    pub(crate) fn set_select(&mut self, projection: String) {
        self.select_cols = vec![projection];
    }

    pub(crate) fn add_order(&mut self, clause: OrderClause) {
        self.order_clauses.push(clause);
    }

    pub(crate) fn and_where(&mut self, expr: Expr) {
        self.where_group.and_expr(expr);
    }

    pub(crate) fn set_dest(&mut self, expr: Expr) {
        self.dest = Some(expr);
    }

    pub(crate) fn clear_dest(&mut self) {
        self.dest = None;
    }

    pub(crate) fn set_limit(&mut self, limit: i64) {
        self.limit = Some(limit);
    }

    pub(crate) fn set_offset(&mut self, offset: i64) {
        self.offset = Some(offset);
    }

    /// Fail if an earlier builder call recorded an error.
    pub fn validate(&self) -> OrmResult<()> {
        match &self.build_error {
            Some(err) => Err(OrmError::Validation(err.clone())),
            None => Ok(()),
        }
    }

    fn has_conditions(&self) -> bool {
        self.dest.as_ref().is_some_and(|d| !d.is_empty())
            || self.where_group.exprs().iter().any(|e| !e.is_empty())
    }

    /// Append ` WHERE ...` for the destination predicate and filters, if any.
    fn write_where(&self, sql: &mut String, params: &mut ParamList) {
        if !self.has_conditions() {
            return;
        }
        let mut all = ExprGroup::new();
        if let Some(dest) = &self.dest {
            all.and_expr(dest.clone());
        }
        for expr in self.where_group.exprs() {
            all.and_expr(expr.clone());
        }
        let where_sql = all.build_into(params);
        if !where_sql.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
        }
    }

    /// Build the SELECT statement.
    pub fn build_select(&self) -> (String, ParamList) {
        let mut params = ParamList::new();
        let mut sql = format!("SELECT {} FROM {}", self.select_cols.join(", "), self.table);
        self.write_where(&mut sql, &mut params);

        if !self.order_clauses.is_empty() {
            sql.push_str(" ORDER BY ");
            for (i, clause) in self.order_clauses.iter().enumerate() {
                if i > 0 {
                    sql.push_str(", ");
                }
                clause.write_sql(&mut sql);
            }
        }
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }
        (sql, params)
    }

    /// Build the COUNT statement (ordering and paging are dropped).
    pub fn build_count(&self) -> (String, ParamList) {
        let mut params = ParamList::new();
        let mut sql = format!("SELECT COUNT(*) FROM {}", self.table);
        self.write_where(&mut sql, &mut params);
        (sql, params)
    }

    /// Build the DELETE statement.
    ///
    /// Without any predicate this renders `WHERE 1=0`, so an unconditioned
    /// delete never removes every row.
    pub fn build_delete(&self) -> (String, ParamList) {
        let mut params = ParamList::new();
        let mut sql = format!("DELETE FROM {}", self.table);
        if self.has_conditions() {
            self.write_where(&mut sql, &mut params);
        } else {
            sql.push_str(" WHERE 1=0");
        }
        (sql, params)
    }

    /// SELECT SQL (for debugging and assertions).
    pub fn to_sql(&self) -> String {
        self.build_select().0
    }

    /// COUNT SQL (for debugging and assertions).
    pub fn to_count_sql(&self) -> String {
        self.build_count().0
    }

    /// DELETE SQL (for debugging and assertions).
    pub fn to_delete_sql(&self) -> String {
        self.build_delete().0
    }
}
