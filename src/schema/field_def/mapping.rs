//! Field access for report rows
//!
//! Setters take a converted value and store it in a row field, checking that
//! the converter produced the field's type. Getters expose a field's current
//! value for comparisons and tests.

use std::any::Any;
use std::sync::Arc;

use crate::schema::adapt::ConvertedValue;

/// Reason a converted value could not be stored in a row field
#[derive(Debug, thiserror::Error)]
pub enum AssignError {
    /// The converter produced no value for a field that must have one
    #[error("a null value cannot be assigned to a non-optional field")]
    Null,

    /// The converter produced a value of some other type
    #[error("value {value} of type {returned_type} is not assignable to the field")]
    Mismatch {
        value: String,
        returned_type: &'static str,
    },
}

/// A trait for functions that store converted values on a row
pub trait RowSetter<T>:
    Fn(&mut T, Option<Box<dyn ConvertedValue>>) -> Result<(), AssignError> + Send + Sync + 'static
{
}

impl<T, F> RowSetter<T> for F where
    F: Fn(&mut T, Option<Box<dyn ConvertedValue>>) -> Result<(), AssignError>
        + Send
        + Sync
        + 'static
{
}

/// Reads a field of a row as `Any`, `None` when the field holds no value
pub type RowGetter<T> = Arc<dyn for<'a> Fn(&'a T) -> Option<&'a dyn Any> + Send + Sync>;

/// Type-checked row setter constructors
pub struct RowSetters;

impl RowSetters {
    /// Setter for a field that must always hold a value
    pub fn required<T: 'static, V: Any>(set: fn(&mut T, V)) -> Arc<dyn RowSetter<T>> {
        Arc::new(move |row: &mut T, value: Option<Box<dyn ConvertedValue>>| {
            let value = value.ok_or(AssignError::Null)?;
            set(row, take::<V>(value)?);
            Ok(())
        })
    }

    /// Setter for an `Option` field
    pub fn optional<T: 'static, V: Any>(set: fn(&mut T, Option<V>)) -> Arc<dyn RowSetter<T>> {
        Arc::new(move |row: &mut T, value: Option<Box<dyn ConvertedValue>>| {
            let value = value.map(take::<V>).transpose()?;
            set(row, value);
            Ok(())
        })
    }
}

/// Type-erased row getter constructors
pub struct RowGetters;

impl RowGetters {
    pub fn required<T: 'static, V: Any>(get: fn(&T) -> &V) -> RowGetter<T> {
        erase(move |row| Some(get(row) as &dyn Any))
    }

    pub fn optional<T: 'static, V: Any>(get: fn(&T) -> Option<&V>) -> RowGetter<T> {
        erase(move |row| get(row).map(|value| value as &dyn Any))
    }
}

fn erase<T, F>(f: F) -> RowGetter<T>
where
    F: for<'a> Fn(&'a T) -> Option<&'a dyn Any> + Send + Sync + 'static,
{
    Arc::new(f)
}

fn take<V: Any>(value: Box<dyn ConvertedValue>) -> Result<V, AssignError> {
    value.downcast::<V>().map_err(|other| AssignError::Mismatch {
        value: format!("{other:?}"),
        returned_type: (*other).type_name(),
    })
}
