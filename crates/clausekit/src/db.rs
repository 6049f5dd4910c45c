//! The chainable query handle.
//!
//! [`Db`] owns a [`Statement`] and exposes pagination, ordering and projection
//! helpers as consuming builder methods. Terminal calls (`scan_*`, `delete*`)
//! borrow the handle and hand the rendered SQL to a [`GenericClient`].
//!
//! # Whitelisted vs trusted names
//!
//! - `order_by_struct*` / `select_by_struct` only emit names that appear in the
//!   entity's field list (see [`fields`](crate::fields)). Anything else is
//!   skipped **silently**: the chain continues and no clause is added. The
//!   skip is visible only as a `tracing` debug event on `clausekit.order` /
//!   `clausekit.select`. Callers cannot tell "invalid field" from "no field"
//!   by looking at the result.
//! - `order_by_asc*` / `order_by_desc*` / `order` take the name as trusted
//!   input and write it into the SQL unchecked. Never pass request data to them.
//!
//! # Example
//! ```ignore
//! use clausekit::{Db, Direction, Entity};
//!
//! #[derive(Entity)]
//! struct SchoolPlanDto {
//!     #[orm(json = "id")]
//!     id: String,
//!     #[orm(json = "sort")]
//!     sort: i32,
//! }
//!
//! let base = Db::new("school_plan").eq("school_id", 7i64);
//! let total = base.session().scan_count(&client).await?;
//! let rows: Vec<Plan> = base
//!     .select_by_struct::<SchoolPlanDto>()
//!     .order_by_struct::<SchoolPlanDto>(&req.sort, Direction::Desc)
//!     .page_limit(req.page, req.size)
//!     .scan_all(&client)
//!     .await?;
//! ```

use std::any::Any;

use tokio_postgres::types::ToSql;

use crate::clause::{self, Direction, OrderClause, OrderColumn};
use crate::client::GenericClient;
use crate::config::DbConfig;
use crate::error::OrmResult;
use crate::fields::{self, Entity};
use crate::qb::Expr;
use crate::row::{FromRow, RowExt};
use crate::statement::Statement;
use crate::whitelist;

/// A query handle in its building state.
///
/// `Clone` (or [`Db::session`]) gives an independent handle: the two never
/// share a mutable statement.
#[derive(Clone, Debug)]
#[must_use]
pub struct Db {
    config: DbConfig,
    statement: Statement,
}

impl Db {
    /// Start a query against `table` with the default configuration.
    pub fn new(table: &str) -> Self {
        Self::with_config(table, DbConfig::default())
    }

    /// Start a query against `table` with `config`.
    pub fn with_config(table: &str, config: DbConfig) -> Self {
        Self {
            config,
            statement: Statement::new(table),
        }
    }

    pub fn statement(&self) -> &Statement {
        &self.statement
    }

    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    /// An independent copy of this handle, for branching a query.
    pub fn session(&self) -> Self {
        self.clone()
    }

    // ==================== Passthroughs ====================

    /// Replace the projection with a trusted column list.
    pub fn select(mut self, cols: &str) -> Self {
        if !cols.is_empty() {
            self.statement.set_select(cols.to_string());
        }
        self
    }

    /// Append a trusted, pre-built ORDER BY item (`"created_at DESC"`).
    pub fn order(mut self, clause: &str) -> Self {
        if !clause.is_empty() {
            self.statement.add_order(OrderClause::raw(clause));
        }
        self
    }

    /// Set LIMIT.
    pub fn limit(mut self, n: i64) -> Self {
        self.statement.set_limit(n);
        self
    }

    /// Set OFFSET.
    pub fn offset(mut self, n: i64) -> Self {
        self.statement.set_offset(n);
        self
    }

    /// Add WHERE: column = value
    pub fn eq<T: ToSql + Send + Sync + 'static>(self, column: &str, value: T) -> Self {
        self.and_expr(Expr::eq(column, value))
    }

    /// Add WHERE: column != value
    pub fn ne<T: ToSql + Send + Sync + 'static>(self, column: &str, value: T) -> Self {
        self.and_expr(Expr::ne(column, value))
    }

    /// Add WHERE: column > value
    pub fn gt<T: ToSql + Send + Sync + 'static>(self, column: &str, value: T) -> Self {
        self.and_expr(Expr::gt(column, value))
    }

    /// Add WHERE: column >= value
    pub fn gte<T: ToSql + Send + Sync + 'static>(self, column: &str, value: T) -> Self {
        self.and_expr(Expr::gte(column, value))
    }

    /// Add WHERE: column < value
    pub fn lt<T: ToSql + Send + Sync + 'static>(self, column: &str, value: T) -> Self {
        self.and_expr(Expr::lt(column, value))
    }

    /// Add WHERE: column <= value
    pub fn lte<T: ToSql + Send + Sync + 'static>(self, column: &str, value: T) -> Self {
        self.and_expr(Expr::lte(column, value))
    }

    /// Add WHERE: column LIKE pattern
    pub fn like<T: ToSql + Send + Sync + 'static>(self, column: &str, pattern: T) -> Self {
        self.and_expr(Expr::like(column, pattern))
    }

    /// Add WHERE: column IN (values...)
    pub fn in_list<T: ToSql + Send + Sync + 'static>(self, column: &str, values: Vec<T>) -> Self {
        self.and_expr(Expr::in_list(column, values))
    }

    /// Add WHERE: column IS NULL
    pub fn is_null(self, column: &str) -> Self {
        self.and_expr(Expr::is_null(column))
    }

    /// Add WHERE: column IS NOT NULL
    pub fn is_not_null(self, column: &str) -> Self {
        self.and_expr(Expr::is_not_null(column))
    }

    /// Add a raw WHERE condition without params.
    pub fn raw(self, sql: &str) -> Self {
        self.and_expr(Expr::raw(sql))
    }

    /// Add a custom expression.
    pub fn and_expr(mut self, expr: Expr) -> Self {
        self.statement.and_where(expr);
        self
    }

    /// Bind the handle to a destination row identified by `key_column = key`.
    ///
    /// The key predicate takes part in SELECT, COUNT and [`Db::delete`];
    /// [`Db::delete_by_nil`] ignores it.
    pub fn model<T: ToSql + Send + Sync + 'static>(mut self, key_column: &str, key: T) -> Self {
        self.statement.set_dest(Expr::eq(key_column, key));
        self
    }

    // ==================== Pagination ====================

    /// LIMIT `page_size` OFFSET `(page_index - 1) * page_size`, with
    /// `page_index` clamped to at least 1. `page_size` is taken as given.
    pub fn page(mut self, page_index: i64, page_size: i64) -> Self {
        let page_index = page_index.max(1);
        self.statement.set_limit(page_size);
        self.statement.set_offset((page_index - 1).saturating_mul(page_size));
        self
    }

    /// Like [`Db::page`], with `page_size` capped at `max_page_size` (50 by default).
    pub fn page_limit(self, page_index: i64, page_size: i64) -> Self {
        let page_size = page_size.min(self.config.max_page_size);
        self.page(page_index, page_size)
    }

    // ==================== Trusted ordering ====================

    /// ORDER BY `name` (trusted, unchecked). Empty `name` is a no-op.
    pub fn order_by_asc(self, name: &str) -> Self {
        self.order_trusted(name, Direction::Asc, false)
    }

    /// ORDER BY `name` DESC (trusted, unchecked). Empty `name` is a no-op.
    pub fn order_by_desc(self, name: &str) -> Self {
        self.order_trusted(name, Direction::Desc, false)
    }

    /// ORDER BY ` CONVERT(name USING gbk) ASC` (trusted, unchecked).
    pub fn order_by_asc_gbk(self, name: &str) -> Self {
        self.order_trusted(name, Direction::Asc, true)
    }

    /// ORDER BY ` CONVERT(name USING gbk) DESC` (trusted, unchecked).
    pub fn order_by_desc_gbk(self, name: &str) -> Self {
        self.order_trusted(name, Direction::Desc, true)
    }

    fn order_trusted(mut self, name: &str, direction: Direction, gbk: bool) -> Self {
        if name.is_empty() {
            self.log_skip_order("<trusted>", name);
            return self;
        }
        let clause = if gbk {
            OrderClause::gbk(name, direction)
        } else {
            OrderClause::column(name, direction)
        };
        self.statement.add_order(clause);
        self
    }

    // ==================== Whitelisted ordering ====================

    /// ORDER BY `name` if it is one of `T`'s fields; otherwise a silent no-op.
    pub fn order_by_struct<T: Entity>(self, name: &str, direction: Direction) -> Self {
        let spec = OrderColumn {
            name: name.to_string(),
            desc: direction.is_desc(),
            gbk: false,
        };
        self.order_by_struct_columns::<T>(std::slice::from_ref(&spec))
    }

    /// GBK ORDER BY `name` if it is one of `T`'s fields; otherwise a silent no-op.
    pub fn order_by_struct_gbk<T: Entity>(self, name: &str, direction: Direction) -> Self {
        let spec = OrderColumn {
            name: name.to_string(),
            desc: direction.is_desc(),
            gbk: true,
        };
        self.order_by_struct_columns::<T>(std::slice::from_ref(&spec))
    }

    /// Apply each requested ordering whose name is one of `T`'s fields, in order.
    ///
    /// Rejected entries are skipped individually; the rest still apply.
    pub fn order_by_struct_columns<T: Entity>(mut self, columns: &[OrderColumn]) -> Self {
        if columns.is_empty() {
            return self;
        }
        let fields = fields::extract_fields::<T>();
        for spec in columns {
            self.push_whitelisted(std::any::type_name::<T>(), &fields, spec);
        }
        self
    }

    /// [`Db::order_by_struct_columns`] for an entity known only at runtime.
    ///
    /// Fails with [`OrmError::InvalidInputKind`](crate::OrmError::InvalidInputKind)
    /// if `value`'s type is not a registered entity. An empty `columns` list
    /// is a no-op and never looks at `value`.
    pub fn order_by_value<V: Any + ?Sized>(
        mut self,
        value: &V,
        columns: &[OrderColumn],
    ) -> OrmResult<Self> {
        if columns.is_empty() {
            return Ok(self);
        }
        let (type_name, fields) = fields::lookup(value)?;
        for spec in columns {
            self.push_whitelisted(type_name, &fields, spec);
        }
        Ok(self)
    }

    fn push_whitelisted(&mut self, entity: &str, fields: &[String], spec: &OrderColumn) {
        match whitelist::validate(fields, &spec.name) {
            Some(_) => self.statement.add_order(clause::render(spec)),
            None => self.log_skip_order(entity, &spec.name),
        }
    }

    fn log_skip_order(&self, entity: &str, name: &str) {
        if self.config.log_rejections {
            tracing::debug!(
                target: "clausekit.order",
                entity,
                column = name,
                "order column rejected; clause skipped"
            );
        }
    }

    // ==================== Whitelisted projection ====================

    /// SELECT exactly `T`'s fields. An entity with no fields leaves the
    /// projection unchanged.
    pub fn select_by_struct<T: Entity>(self) -> Self {
        self.select_by_struct_with::<T>(&[])
    }

    /// SELECT `T`'s fields followed by `extra` columns.
    ///
    /// `extra` is trusted input and is written unchecked.
    pub fn select_by_struct_with<T: Entity>(mut self, extra: &[&str]) -> Self {
        let fields = fields::extract_fields::<T>();
        self.apply_projection(std::any::type_name::<T>(), &fields, extra);
        self
    }

    /// [`Db::select_by_struct`] for an entity known only at runtime.
    pub fn select_by_value<V: Any + ?Sized>(self, value: &V) -> OrmResult<Self> {
        self.select_by_value_with(value, &[])
    }

    /// [`Db::select_by_struct_with`] for an entity known only at runtime.
    pub fn select_by_value_with<V: Any + ?Sized>(
        mut self,
        value: &V,
        extra: &[&str],
    ) -> OrmResult<Self> {
        let (type_name, fields) = fields::lookup(value)?;
        self.apply_projection(type_name, &fields, extra);
        Ok(self)
    }

    fn apply_projection(&mut self, entity: &str, fields: &[String], extra: &[&str]) {
        let mut projection = clause::render_projection(fields);
        for column in extra.iter().filter(|c| !c.is_empty()) {
            if !projection.is_empty() {
                projection.push_str(", ");
            }
            projection.push_str(column);
        }
        if projection.is_empty() {
            if self.config.log_rejections {
                tracing::debug!(
                    target: "clausekit.select",
                    entity,
                    "entity has no selectable fields; projection unchanged"
                );
            }
            return;
        }
        self.statement.set_select(projection);
    }

    // ==================== Rendering ====================

    /// SELECT SQL (for debugging and assertions).
    pub fn to_sql(&self) -> String {
        self.statement.to_sql()
    }

    /// COUNT SQL (for debugging and assertions).
    pub fn to_count_sql(&self) -> String {
        self.statement.to_count_sql()
    }

    /// DELETE SQL (for debugging and assertions).
    pub fn to_delete_sql(&self) -> String {
        self.statement.to_delete_sql()
    }

    // ==================== Execution ====================

    /// Total number of rows matching the destination key and filters.
    pub async fn scan_count(&self, conn: &impl GenericClient) -> OrmResult<i64> {
        self.statement.validate()?;
        let (sql, params) = self.statement.build_count();
        tracing::debug!(target: "clausekit.sql", op = "count", sql = %sql);
        let row = conn.query_one(&sql, &params.as_refs()).await?;
        row.try_get_index(0)
    }

    /// First matching row, fetched with LIMIT 1.
    pub async fn scan_one<T: FromRow>(&self, conn: &impl GenericClient) -> OrmResult<Option<T>> {
        self.statement.validate()?;
        let mut statement = self.statement.clone();
        statement.set_limit(1);
        let (sql, params) = statement.build_select();
        tracing::debug!(target: "clausekit.sql", op = "scan_one", sql = %sql);
        let row = conn.query_opt(&sql, &params.as_refs()).await?;
        row.as_ref().map(T::from_row).transpose()
    }

    /// All matching rows.
    pub async fn scan_all<T: FromRow>(&self, conn: &impl GenericClient) -> OrmResult<Vec<T>> {
        self.statement.validate()?;
        let (sql, params) = self.statement.build_select();
        tracing::debug!(target: "clausekit.sql", op = "scan_all", sql = %sql);
        let rows = conn.query(&sql, &params.as_refs()).await?;
        rows.iter().map(T::from_row).collect()
    }

    /// Delete rows matching the destination key and filters.
    pub async fn delete(&self, conn: &impl GenericClient) -> OrmResult<u64> {
        Self::execute_delete(&self.statement, conn).await
    }

    /// Delete rows matching the filters only; any destination set with
    /// [`Db::model`] is cleared first.
    pub async fn delete_by_nil(&self, conn: &impl GenericClient) -> OrmResult<u64> {
        let mut statement = self.statement.clone();
        statement.clear_dest();
        Self::execute_delete(&statement, conn).await
    }

    /// DELETE SQL that [`Db::delete_by_nil`] would run.
    pub fn to_delete_by_nil_sql(&self) -> String {
        let mut statement = self.statement.clone();
        statement.clear_dest();
        statement.to_delete_sql()
    }

    async fn execute_delete(statement: &Statement, conn: &impl GenericClient) -> OrmResult<u64> {
        statement.validate()?;
        let (sql, params) = statement.build_delete();
        tracing::debug!(target: "clausekit.sql", op = "delete", sql = %sql);
        conn.execute(&sql, &params.as_refs()).await
    }
}
