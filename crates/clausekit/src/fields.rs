//! Entity field metadata and the field tag extractor.
//!
//! Every entity type registers an ordered list of [`FieldDescriptor`]s, one per
//! declared field, carrying the raw tags the field was declared with:
//!
//! - a primary ORM column tag (`#[orm(column = "...")]`, `-` excludes the field)
//! - a secondary serialization tag (`#[serde(rename = "...")]` or
//!   `#[orm(json = "...")]`), possibly with modifiers such as `,omitempty`
//!
//! [`extract_fields`] turns those descriptors into the list of identifiers that
//! ORDER BY / SELECT operations are allowed to emit. The result is computed once
//! per type and cached.
//!
//! # Example
//! ```ignore
//! use clausekit::Entity;
//!
//! #[derive(Entity)]
//! struct SchoolPlanDto {
//!     #[orm(json = "id")]
//!     id: String,
//!     #[orm(json = "name,omitempty")]
//!     name: String,
//!     #[orm(skip)]
//!     internal: i32,
//! }
//!
//! assert_eq!(&*clausekit::fields::extract_fields::<SchoolPlanDto>(), ["id", "`name`"]);
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crate::error::{OrmError, OrmResult};
use crate::ident::quote_keyword;

/// Tag value that removes a field from the identifier list.
pub const EXCLUDE_TAG: &str = "-";

/// Raw tag metadata for one declared struct field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Rust field name.
    pub field: &'static str,
    /// Primary ORM column tag.
    pub column: Option<&'static str>,
    /// Secondary serialization tag, modifiers included.
    pub json: Option<&'static str>,
}

impl FieldDescriptor {
    /// A field without any tags. It contributes no identifier on its own.
    pub const fn new(field: &'static str) -> Self {
        Self {
            field,
            column: None,
            json: None,
        }
    }

    /// Set the primary column tag.
    pub const fn column(mut self, column: &'static str) -> Self {
        self.column = Some(column);
        self
    }

    /// Set the raw secondary serialization tag.
    pub const fn json(mut self, json: &'static str) -> Self {
        self.json = Some(json);
        self
    }

    /// Mark the field as excluded.
    pub const fn skip(mut self) -> Self {
        self.column = Some(EXCLUDE_TAG);
        self
    }

    /// Resolve this field to an identifier, if it has one.
    pub fn identifier(&self) -> Option<String> {
        match self.column {
            Some(EXCLUDE_TAG) => return None,
            Some(column) if !column.is_empty() => return Some(quote_keyword(column).into_owned()),
            _ => {}
        }

        let tag = strip_modifiers(self.json?);
        if tag.is_empty() || tag == EXCLUDE_TAG {
            return None;
        }
        Some(quote_keyword(tag).into_owned())
    }
}

/// Drop everything from the first `,` on (`"name,omitempty"` -> `"name"`).
fn strip_modifiers(tag: &str) -> &str {
    tag.split_once(',').map_or(tag, |(name, _)| name)
}

/// A struct type that exposes its field metadata.
///
/// Usually derived with `#[derive(Entity)]`; implement by hand when the
/// column list is not tied to a Rust struct layout.
pub trait Entity: 'static {
    /// Field descriptors in declaration order.
    fn field_descriptors() -> &'static [FieldDescriptor];
}

/// Registry entry used to resolve entity metadata from a runtime value.
///
/// Submitted through `inventory` by `#[derive(Entity)]` (non-generic types) or
/// by [`register_entity!`](crate::register_entity).
pub struct EntityRegistration {
    pub type_id: fn() -> TypeId,
    pub type_name: fn() -> &'static str,
    pub descriptors: fn() -> &'static [FieldDescriptor],
}

impl EntityRegistration {
    /// Build the registration entry for `T`.
    pub const fn of<T: Entity>() -> Self {
        Self {
            type_id: TypeId::of::<T>,
            type_name: std::any::type_name::<T>,
            descriptors: T::field_descriptors,
        }
    }
}

inventory::collect!(EntityRegistration);

/// Register an [`Entity`] type for runtime lookup.
///
/// ```ignore
/// clausekit::register_entity!(SchoolPlanDto);
/// ```
#[macro_export]
macro_rules! register_entity {
    ($ty:ty) => {
        $crate::inventory::submit! {
            $crate::fields::EntityRegistration::of::<$ty>()
        }
    };
}

type FieldCache = Mutex<HashMap<TypeId, Arc<[String]>>>;

fn cache() -> &'static FieldCache {
    static CACHE: OnceLock<FieldCache> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

fn cached_or_insert(type_id: TypeId, descriptors: &[FieldDescriptor]) -> Arc<[String]> {
    if let Some(hit) = cache()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&type_id)
    {
        return Arc::clone(hit);
    }

    // Computed outside the lock; a concurrent insert for the same type yields an equal value.
    let computed: Arc<[String]> = extract_from_descriptors(descriptors).into();
    let mut map = cache().lock().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(map.entry(type_id).or_insert(computed))
}

/// Run the extraction rules over raw descriptors, without caching.
///
/// Declaration order is kept and duplicates are not removed.
pub fn extract_from_descriptors(descriptors: &[FieldDescriptor]) -> Vec<String> {
    descriptors
        .iter()
        .filter_map(FieldDescriptor::identifier)
        .collect()
}

/// The permissible identifiers of entity `T`.
pub fn extract_fields<T: Entity>() -> Arc<[String]> {
    cached_or_insert(TypeId::of::<T>(), T::field_descriptors())
}

/// The permissible identifiers of the entity behind `value`.
///
/// Only the type of `value` is inspected. Works for `&dyn Any` as well as
/// concrete references; fails with [`OrmError::InvalidInputKind`] if the type
/// was never registered as an entity.
pub fn extract_fields_of<V: Any + ?Sized>(value: &V) -> OrmResult<Arc<[String]>> {
    lookup(value).map(|(_, fields)| fields)
}

/// Resolve `value` to its registered type name and identifiers.
pub(crate) fn lookup<V: Any + ?Sized>(value: &V) -> OrmResult<(&'static str, Arc<[String]>)> {
    let type_id = Any::type_id(value);
    inventory::iter::<EntityRegistration>
        .into_iter()
        .find(|reg| (reg.type_id)() == type_id)
        .map(|reg| ((reg.type_name)(), cached_or_insert(type_id, (reg.descriptors)())))
        .ok_or_else(|| OrmError::invalid_input_kind(describe_type::<V>()))
}

/// The static type name of `V`, or a plain description when the concrete type
/// is hidden behind a trait object.
fn describe_type<V: ?Sized>() -> &'static str {
    let name = std::any::type_name::<V>();
    if name.starts_with("dyn ") {
        "value of unregistered type"
    } else {
        name
    }
}

#[cfg(test)]
mod tests;
