//! Attribute parsing shared by the derive macros.

use heck::{
    ToKebabCase, ToLowerCamelCase, ToShoutyKebabCase, ToShoutySnakeCase, ToSnakeCase,
    ToUpperCamelCase,
};
use syn::{Attribute, Field, Result};

/// Parsed `#[orm(...)]` field attribute.
///
/// Supports `column = "..."`, `json = "..."` and the bare `skip` marker.
#[derive(Default)]
pub struct FieldAttr {
    pub skip: bool,
    pub column: Option<String>,
    pub json: Option<String>,
}

impl syn::parse::Parse for FieldAttr {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut attr = FieldAttr::default();

        loop {
            if input.is_empty() {
                break;
            }

            let ident: syn::Ident = input.parse()?;
            if ident == "skip" {
                attr.skip = true;
            } else {
                let _: syn::Token![=] = input.parse()?;
                let value: syn::LitStr = input.parse()?;

                if ident == "column" {
                    attr.column = Some(value.value());
                } else if ident == "json" {
                    attr.json = Some(value.value());
                } else {
                    return Err(syn::Error::new_spanned(
                        ident,
                        "unknown orm attribute, expected `column`, `json` or `skip`",
                    ));
                }
            }

            if input.peek(syn::Token![,]) {
                let _: syn::Token![,] = input.parse()?;
            } else {
                break;
            }
        }

        Ok(attr)
    }
}

impl FieldAttr {
    /// Merge every `#[orm(...)]` on `field`; later attributes win.
    pub fn from_field(field: &Field) -> Result<Self> {
        let mut merged = FieldAttr::default();
        for attr in &field.attrs {
            if !attr.path().is_ident("orm") {
                continue;
            }
            let parsed: FieldAttr = attr.parse_args()?;
            merged.skip |= parsed.skip;
            if parsed.column.is_some() {
                merged.column = parsed.column;
            }
            if parsed.json.is_some() {
                merged.json = parsed.json;
            }
        }
        Ok(merged)
    }
}

/// The `rename` / `skip` parts of `#[serde(...)]` on a field.
#[derive(Default)]
pub struct SerdeField {
    pub rename: Option<String>,
    pub skip: bool,
}

impl SerdeField {
    pub fn from_field(field: &Field) -> Self {
        let mut out = SerdeField::default();
        for attr in serde_attrs(&field.attrs) {
            // Other serde keys are none of our business; a parse failure just stops the scan.
            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") && meta.input.peek(syn::Token![=]) {
                    let value: syn::LitStr = meta.value()?.parse()?;
                    out.rename = Some(value.value());
                } else if meta.path.is_ident("skip") {
                    out.skip = true;
                } else {
                    skip_meta_value(&meta)?;
                }
                Ok(())
            });
        }
        out
    }
}

/// `#[serde(rename_all = "...")]` on the container.
pub fn serde_rename_all(attrs: &[Attribute]) -> Result<Option<RenameRule>> {
    let mut rule = None;
    for attr in serde_attrs(attrs) {
        let mut found = None;
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") && meta.input.peek(syn::Token![=]) {
                let value: syn::LitStr = meta.value()?.parse()?;
                found = Some(value);
            } else {
                skip_meta_value(&meta)?;
            }
            Ok(())
        });
        if let Some(lit) = found {
            rule = Some(RenameRule::parse(&lit)?);
        }
    }
    Ok(rule)
}

fn serde_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs.iter().filter(|attr| attr.path().is_ident("serde"))
}

fn skip_meta_value(meta: &syn::meta::ParseNestedMeta<'_>) -> Result<()> {
    if meta.input.peek(syn::Token![=]) {
        let _: syn::Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|inner| skip_meta_value(&inner))?;
    }
    Ok(())
}

/// Serde's container-level case conversions.
#[derive(Clone, Copy)]
pub enum RenameRule {
    Lower,
    Upper,
    Pascal,
    Camel,
    Snake,
    ScreamingSnake,
    Kebab,
    ScreamingKebab,
}

impl RenameRule {
    fn parse(lit: &syn::LitStr) -> Result<Self> {
        Ok(match lit.value().as_str() {
            "lowercase" => Self::Lower,
            "UPPERCASE" => Self::Upper,
            "PascalCase" => Self::Pascal,
            "camelCase" => Self::Camel,
            "snake_case" => Self::Snake,
            "SCREAMING_SNAKE_CASE" => Self::ScreamingSnake,
            "kebab-case" => Self::Kebab,
            "SCREAMING-KEBAB-CASE" => Self::ScreamingKebab,
            other => {
                return Err(syn::Error::new_spanned(
                    lit,
                    format!("unsupported rename_all rule `{other}`"),
                ));
            }
        })
    }

    pub fn apply(self, field: &str) -> String {
        match self {
            Self::Lower => field.to_ascii_lowercase(),
            Self::Upper => field.to_ascii_uppercase(),
            Self::Pascal => field.to_upper_camel_case(),
            Self::Camel => field.to_lower_camel_case(),
            Self::Snake => field.to_snake_case(),
            Self::ScreamingSnake => field.to_shouty_snake_case(),
            Self::Kebab => field.to_kebab_case(),
            Self::ScreamingKebab => field.to_shouty_kebab_case(),
        }
    }
}

/// The raw secondary tag: `orm(json)`, else `serde(rename)`, else the
/// container's `rename_all` rule. `serde(skip)` leaves none.
pub fn secondary_tag(
    orm: &FieldAttr,
    serde: &SerdeField,
    rename_all: Option<RenameRule>,
    rust_name: &str,
) -> Option<String> {
    if let Some(json) = &orm.json {
        return Some(json.clone());
    }
    if serde.skip {
        return None;
    }
    serde
        .rename
        .clone()
        .or_else(|| rename_all.map(|rule| rule.apply(rust_name)))
}

/// The column a `FromRow` field is read from.
///
/// Follows the same tags the Entity field list is built from (unquoted), so a
/// `select_by_struct` projection decodes into the same struct. Falls back to
/// the field name when the field is excluded or untagged.
pub fn row_column(field: &Field, rename_all: Option<RenameRule>) -> Result<String> {
    let rust_name = field_name(field).unwrap_or_default();
    let orm = FieldAttr::from_field(field)?;
    if let Some(column) = orm.column.as_deref().filter(|c| !c.is_empty() && *c != "-") {
        return Ok(column.to_string());
    }
    let serde = SerdeField::from_field(field);
    let secondary = secondary_tag(&orm, &serde, rename_all, &rust_name);
    let tag = secondary
        .as_deref()
        .map(|tag| tag.split_once(',').map_or(tag, |(name, _)| name))
        .filter(|tag| !tag.is_empty() && *tag != "-");
    Ok(tag.map(str::to_string).unwrap_or(rust_name))
}

/// Field name without a raw-identifier prefix.
pub fn field_name(field: &Field) -> Option<String> {
    field
        .ident
        .as_ref()
        .map(|ident| ident.to_string().trim_start_matches("r#").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_of(field: Field) -> String {
        row_column(&field, None).unwrap()
    }

    #[test]
    fn row_column_prefers_primary_tag() {
        let field: Field = syn::parse_quote! {
            #[orm(column = "plan_id", json = "id")]
            id: i64
        };
        assert_eq!(column_of(field), "plan_id");
    }

    #[test]
    fn row_column_follows_secondary_tag() {
        let field: Field = syn::parse_quote! {
            #[orm(json = "title,omitempty")]
            heading: String
        };
        assert_eq!(column_of(field), "title");

        let field: Field = syn::parse_quote! {
            #[serde(rename = "sort")]
            sort_order: i32
        };
        assert_eq!(column_of(field), "sort");
    }

    #[test]
    fn row_column_falls_back_to_field_name() {
        let skipped: Field = syn::parse_quote! {
            #[orm(skip)]
            #[serde(skip)]
            cache_key: String
        };
        assert_eq!(column_of(skipped), "cache_key");

        let raw: Field = syn::parse_quote! { r#type: String };
        assert_eq!(column_of(raw), "type");
    }

    #[test]
    fn row_column_applies_rename_all() {
        let field: Field = syn::parse_quote! { plan_id: i64 };
        assert_eq!(row_column(&field, Some(RenameRule::Camel)).unwrap(), "planId");
    }
}
