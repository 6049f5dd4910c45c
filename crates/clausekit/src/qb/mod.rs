//! Filter expression layer shared by every statement.
//!
//! ```ignore
//! use clausekit::qb::Expr;
//!
//! let filter = Expr::or(vec![Expr::eq("status", 1i32), Expr::is_null("status")]);
//! let db = clausekit::Db::new("school_plan").and_expr(filter);
//! ```

mod expr;
mod param;

pub use expr::{Expr, ExprGroup};
pub use param::{Param, ParamList};
