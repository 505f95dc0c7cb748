//! Column identity
//!
//! A report column is identified by its table heading and column heading,
//! never by the element name the server generates for a particular run.

use std::fmt;

/// A value object that represents a unique column within an Answers report.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnIdentity {
    pub table_heading: String,
    pub column_heading: String,
}

impl ColumnIdentity {
    pub fn new(table_heading: impl Into<String>, column_heading: impl Into<String>) -> Self {
        Self {
            table_heading: table_heading.into(),
            column_heading: column_heading.into(),
        }
    }

    /// Build the identity for a declared field.
    ///
    /// When no explicit column heading is given, it is derived from the field
    /// name with [`derive_column_heading`].
    #[must_use]
    pub fn for_field(field_name: &str, table_heading: &str, column_heading: Option<&str>) -> Self {
        let column_heading = match column_heading {
            Some(heading) if !heading.is_empty() => heading.to_string(),
            _ => derive_column_heading(field_name),
        };
        Self::new(table_heading, column_heading)
    }
}

impl fmt::Display for ColumnIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.table_heading, self.column_heading)
    }
}

/// Derive an Answers column heading from a field name.
///
/// The first character is upper-cased and a space is inserted before each
/// internal upper-case character, so `designationNumber` becomes
/// `Designation Number`. An underscore is a word break as well, which gives
/// snake_case names the same heading: `designation_number` also becomes
/// `Designation Number`.
#[must_use]
pub fn derive_column_heading(field_name: &str) -> String {
    let mut heading = String::with_capacity(field_name.len() + 4);
    let mut start_of_word = true;

    for c in field_name.chars() {
        if c == '_' {
            start_of_word = true;
            continue;
        }

        if heading.is_empty() {
            heading.extend(c.to_uppercase());
        } else if start_of_word {
            heading.push(' ');
            heading.extend(c.to_uppercase());
        } else if c.is_uppercase() {
            heading.push(' ');
            heading.push(c);
        } else {
            heading.push(c);
        }
        start_of_word = false;
    }

    heading
}
