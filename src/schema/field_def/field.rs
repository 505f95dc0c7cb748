//! Declared report columns
//!
//! A [`ReportColumn`] describes one field of a row type: the column it is
//! filled from, the value type it holds and how to read and write it.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::schema::field_def::mapping::{RowGetter, RowGetters, RowSetter, RowSetters};
use crate::schema::identity::ColumnIdentity;

/// The exact type a field holds, used as the converter registry key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueType {
    id: TypeId,
    name: &'static str,
}

impl ValueType {
    #[must_use]
    pub fn of<V: Any>() -> Self {
        Self {
            id: TypeId::of::<V>(),
            name: std::any::type_name::<V>(),
        }
    }

    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// One declared field of the row type `T`
pub struct ReportColumn<T> {
    name: String,
    identity: ColumnIdentity,
    value_type: ValueType,
    nullable: bool,
    scale: Option<u32>,
    setter: Arc<dyn RowSetter<T>>,
    getter: RowGetter<T>,
}

impl<T: 'static> ReportColumn<T> {
    /// A column stored in a field of type `V`, which must always receive a value
    pub fn required<V: Any>(
        name: impl Into<String>,
        identity: ColumnIdentity,
        get: fn(&T) -> &V,
        set: fn(&mut T, V),
    ) -> Self {
        Self {
            name: name.into(),
            identity,
            value_type: ValueType::of::<V>(),
            nullable: false,
            scale: None,
            setter: RowSetters::required(set),
            getter: RowGetters::required(get),
        }
    }

    /// A column stored in a field of type `Option<V>`; empty text becomes `None`
    pub fn optional<V: Any>(
        name: impl Into<String>,
        identity: ColumnIdentity,
        get: fn(&T) -> Option<&V>,
        set: fn(&mut T, Option<V>),
    ) -> Self {
        Self {
            name: name.into(),
            identity,
            value_type: ValueType::of::<V>(),
            nullable: true,
            scale: None,
            setter: RowSetters::optional(set),
            getter: RowGetters::optional(get),
        }
    }

    /// Declare a fixed number of decimal places for the converted value
    #[must_use]
    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = Some(scale);
        self
    }
}

impl<T> ReportColumn<T> {
    /// Field name on the row type
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn identity(&self) -> &ColumnIdentity {
        &self.identity
    }

    #[must_use]
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Whether the field accepts an absent value
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    #[must_use]
    pub fn scale(&self) -> Option<u32> {
        self.scale
    }

    pub(crate) fn setter(&self) -> &dyn RowSetter<T> {
        self.setter.as_ref()
    }

    /// Read this column's field on `row` as a `V`
    ///
    /// Returns `None` when the field holds no value or is not a `V`.
    pub fn value<'a, V: Any>(&self, row: &'a T) -> Option<&'a V> {
        (self.getter)(row).and_then(|value| value.downcast_ref::<V>())
    }
}

impl<T> Clone for ReportColumn<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            identity: self.identity.clone(),
            value_type: self.value_type,
            nullable: self.nullable,
            scale: self.scale,
            setter: Arc::clone(&self.setter),
            getter: Arc::clone(&self.getter),
        }
    }
}

impl<T> fmt::Debug for ReportColumn<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportColumn")
            .field("name", &self.name)
            .field("identity", &self.identity)
            .field("value_type", &self.value_type)
            .field("nullable", &self.nullable)
            .field("scale", &self.scale)
            .finish_non_exhaustive()
    }
}
