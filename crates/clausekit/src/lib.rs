//! # clausekit
//!
//! Chainable query helpers on top of tokio-postgres.
//!
//! ## Features
//!
//! - **Pagination**: `page(index, size)` and the capped `page_limit(index, size)`
//! - **Whitelisted ORDER BY / SELECT**: names coming from a request are checked
//!   against an entity's field list; anything else is skipped without error
//! - **GBK ordering**: ` CONVERT(col USING gbk) ASC|DESC` for Chinese pinyin order
//! - **Branching**: `Db` is `Clone`, so a count query and a page query can be
//!   derived from one base handle
//! - **Safe defaults**: DELETE without any predicate matches nothing
//!
//! ## SQL dialect
//!
//! Filters use Postgres `$n` placeholders, but two fragments are MySQL syntax:
//!
//! - entity fields named `name`, `describe` or `status` are emitted in
//!   backticks (`` `name` ``), see [`ident::QUOTED_KEYWORDS`];
//! - GBK ordering emits ` CONVERT(col USING gbk) ASC|DESC`.
//!
//! Postgres rejects both. Against Postgres, keep keyword-named columns out of
//! `select_by_struct` / `order_by_struct*` and do not use the GBK variants.
//!
//! ```ignore
//! use clausekit::prelude::*;
//!
//! #[derive(Entity)]
//! struct SchoolPlanDto {
//!     #[orm(json = "id")]
//!     id: String,
//!     #[orm(json = "name")]
//!     name: String,
//!     #[orm(json = "sort")]
//!     sort: i32,
//! }
//!
//! let base = Db::new("school_plan").eq("school_id", school_id);
//! let total = base.session().scan_count(&client).await?;
//! let page: Vec<Plan> = base
//!     .select_by_struct::<SchoolPlanDto>()
//!     .order_by_struct_columns::<SchoolPlanDto>(&req.order)
//!     .page_limit(req.page, req.size)
//!     .scan_all(&client)
//!     .await?;
//! ```

extern crate self as clausekit;

pub mod clause;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod fields;
pub mod ident;
pub mod prelude;
pub mod qb;
pub mod row;
pub mod statement;
pub mod whitelist;

pub use clause::{Direction, OrderClause, OrderColumn};
pub use client::GenericClient;
pub use config::{DEFAULT_MAX_PAGE_SIZE, DbConfig};
pub use db::Db;
pub use error::{OrmError, OrmResult};
pub use fields::{Entity, EntityRegistration, FieldDescriptor, extract_fields, extract_fields_of};
pub use ident::Ident;
pub use qb::{Expr, ExprGroup};
pub use row::{FromRow, RowExt};
pub use statement::Statement;

#[cfg(feature = "derive")]
pub use clausekit_derive::{Entity, FromRow};

// Re-exported for use by derive macros
pub use inventory;
pub use tokio_postgres;
