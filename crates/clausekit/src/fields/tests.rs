use super::*;
use std::any::Any;
use std::sync::Arc;

struct SchoolPlanDto;

impl Entity for SchoolPlanDto {
    fn field_descriptors() -> &'static [FieldDescriptor] {
        const FIELDS: &[FieldDescriptor] = &[
            FieldDescriptor::new("id").json("id"),
            FieldDescriptor::new("name").json("name"),
            FieldDescriptor::new("describe").json("describe"),
            FieldDescriptor::new("sort").json("sort"),
            FieldDescriptor::new("status").json("status"),
        ];
        FIELDS
    }
}

crate::register_entity!(SchoolPlanDto);

struct Mixed;

impl Entity for Mixed {
    fn field_descriptors() -> &'static [FieldDescriptor] {
        const FIELDS: &[FieldDescriptor] = &[
            FieldDescriptor::new("id").column("plan_id").json("id"),
            FieldDescriptor::new("secret").skip().json("secret"),
            FieldDescriptor::new("title").json("title,omitempty"),
            FieldDescriptor::new("untagged"),
            FieldDescriptor::new("blank").json(",omitempty"),
            FieldDescriptor::new("hidden").json("-"),
            FieldDescriptor::new("status").column("status"),
        ];
        FIELDS
    }
}

struct Duplicated;

impl Entity for Duplicated {
    fn field_descriptors() -> &'static [FieldDescriptor] {
        const FIELDS: &[FieldDescriptor] = &[
            FieldDescriptor::new("a").json("sort"),
            FieldDescriptor::new("b").column("sort"),
        ];
        FIELDS
    }
}

struct NotRegistered;

#[test]
fn json_tags_in_declaration_order_with_keyword_quoting() {
    let fields = extract_fields::<SchoolPlanDto>();
    assert_eq!(&*fields, ["id", "`name`", "`describe`", "sort", "`status`"]);
}

#[test]
fn primary_tag_wins_and_exclusions_apply() {
    let fields = extract_fields::<Mixed>();
    assert_eq!(&*fields, ["plan_id", "title", "`status`"]);
}

#[test]
fn duplicates_are_kept() {
    assert_eq!(&*extract_fields::<Duplicated>(), ["sort", "sort"]);
}

#[test]
fn empty_primary_tag_falls_back_to_json() {
    let d = FieldDescriptor::new("x").column("").json("x_col,omitempty");
    assert_eq!(d.identifier().as_deref(), Some("x_col"));
}

#[test]
fn modifiers_are_stripped_before_quoting() {
    let d = FieldDescriptor::new("name").json("name,omitempty");
    assert_eq!(d.identifier().as_deref(), Some("`name`"));
}

#[test]
fn uncached_extraction_matches_cached() {
    let raw = extract_from_descriptors(Mixed::field_descriptors());
    assert_eq!(raw.as_slice(), &*extract_fields::<Mixed>());
}

#[test]
fn extraction_is_memoized_per_type() {
    let a = extract_fields::<SchoolPlanDto>();
    let b = extract_fields::<SchoolPlanDto>();
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn registered_value_resolves_through_dyn_any() {
    let dto = SchoolPlanDto;
    let value: &dyn Any = &dto;
    let fields = extract_fields_of(value).unwrap();
    assert_eq!(&*fields, ["id", "`name`", "`describe`", "sort", "`status`"]);
}

#[test]
fn primitive_value_is_invalid_input_kind() {
    let err = extract_fields_of(&42_i32).unwrap_err();
    assert!(err.is_invalid_input_kind());
    assert!(err.to_string().contains("i32"));
}

#[test]
fn unregistered_struct_is_invalid_input_kind() {
    let value: &dyn Any = &NotRegistered;
    assert!(extract_fields_of(value).unwrap_err().is_invalid_input_kind());
}

#[test]
fn lookup_reports_concrete_type_name() {
    let value: &dyn Any = &SchoolPlanDto;
    let (name, _) = lookup(value).unwrap();
    assert!(name.ends_with("SchoolPlanDto"));
}

#[test]
fn erased_unregistered_value_is_described_plainly() {
    let value: &dyn Any = &NotRegistered;
    let err = extract_fields_of(value).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid input kind: value of unregistered type is not a registered entity struct"
    );
}
