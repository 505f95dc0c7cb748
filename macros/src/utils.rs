//! Utility functions for procedural macros
//!
//! Type inspection helpers shared by the derives.

use syn::{Attribute, Field, GenericArgument, PathArguments, Type};

/// The `T` of an `Option<T>`, also when written `std::option::Option<T>`
pub fn option_inner_type(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    if type_path.qself.is_some() {
        return None;
    }

    let segment = type_path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }

    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first() {
        Some(GenericArgument::Type(inner)) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}

/// The first attribute on `field` called `name`
pub fn find_attribute<'a>(field: &'a Field, name: &str) -> Option<&'a Attribute> {
    field.attrs.iter().find(|attr| attr.path().is_ident(name))
}
