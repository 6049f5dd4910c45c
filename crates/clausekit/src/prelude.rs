//! Convenient imports for typical `clausekit` usage.
//!
//! ```ignore
//! use clausekit::prelude::*;
//! ```

pub use crate::{
    Db, DbConfig, Direction, Entity, Expr, FromRow, GenericClient, OrderColumn, OrmError,
    OrmResult, RowExt,
};
