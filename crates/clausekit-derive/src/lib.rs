//! Derive macros for clausekit
//!
//! Provides `#[derive(Entity)]` and `#[derive(FromRow)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod attrs;
mod entity;
mod from_row;

/// Derive `Entity` field metadata for a struct.
///
/// # Example
///
/// ```ignore
/// use clausekit::Entity;
///
/// #[derive(Entity)]
/// struct SchoolPlanDto {
///     #[orm(json = "id")]
///     id: String,
///     #[orm(column = "plan_name")]
///     name: String,
///     #[serde(rename = "sort")]
///     sort_order: i32,
///     #[orm(skip)]
///     cache_key: String,
/// }
/// ```
///
/// # Attributes
///
/// - `#[orm(column = "name")]` - Primary column tag; `"-"` excludes the field
/// - `#[orm(skip)]` - Exclude the field
/// - `#[orm(json = "name,omitempty")]` - Secondary tag, modifiers are stripped
/// - `#[serde(rename = "name")]` - Secondary tag when no `orm(json)` is given
/// - `#[serde(rename_all = "...")]` on the struct - Implied secondary tag for
///   fields without an explicit rename
///
/// A field with none of these contributes no identifier. Non-generic structs
/// are also registered for runtime lookup (`Db::order_by_value`,
/// `Db::select_by_value`).
#[proc_macro_derive(Entity, attributes(orm, serde))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    entity::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derive `FromRow` trait for a struct.
///
/// # Example
///
/// ```ignore
/// use clausekit::FromRow;
///
/// #[derive(FromRow)]
/// struct Plan {
///     id: i64,
///     #[orm(column = "plan_name")]
///     name: String,
/// }
/// ```
///
/// # Attributes
///
/// - `#[orm(column = "name")]` - Map field to a different column name
/// - `#[orm(json = "...")]`, `#[serde(rename = "...")]`, `#[serde(rename_all = "...")]`
///   - Used when no column is given, matching the `Entity` field list
#[proc_macro_derive(FromRow, attributes(orm, serde))]
pub fn derive_from_row(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    from_row::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
