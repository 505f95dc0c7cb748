//! Type-keyed converter registry.

use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::schema::field_def::ValueType;

/// A value produced by a converter, not yet assigned to a row field.
///
/// Carries enough about itself to report a converter that produced the
/// wrong type.
pub trait ConvertedValue: Any + fmt::Debug + Send {
    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send>;

    fn type_name(&self) -> &'static str;
}

impl<V: Any + fmt::Debug + Send> ConvertedValue for V {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<V>()
    }
}

impl dyn ConvertedValue {
    /// Whether the value is a `V`
    pub fn is<V: Any>(&self) -> bool {
        self.as_any().is::<V>()
    }

    /// Take the value as a `V`, handing it back untouched if it is not one
    pub fn downcast<V: Any>(self: Box<Self>) -> Result<V, Box<Self>> {
        if !self.is::<V>() {
            return Err(self);
        }
        match self.into_any().downcast::<V>() {
            Ok(value) => Ok(*value),
            Err(_) => unreachable!("type was checked before downcasting"),
        }
    }
}

/// Field-level information a converter may use to shape its output
#[derive(Debug, Clone, Copy)]
pub struct ConversionHints<'a> {
    /// Name of the field the value is destined for
    pub field: &'a str,
    /// Fixed number of decimal places declared on the field
    pub scale: Option<u32>,
}

impl<'a> ConversionHints<'a> {
    #[must_use]
    pub fn for_field(field: &'a str) -> Self {
        Self { field, scale: None }
    }
}

/// Converts raw column text into a typed value.
///
/// The registry never hands an empty string to a converter; empty text
/// always becomes `None`.
pub trait Converter: Send + Sync {
    fn convert(
        &self,
        text: &str,
        hints: &ConversionHints<'_>,
    ) -> anyhow::Result<Option<Box<dyn ConvertedValue>>>;

    /// Name used in error messages
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Adapts a plain function into a [`Converter`] producing `V`
pub struct FnConverter<V, F> {
    name: &'static str,
    f: F,
    _output: PhantomData<fn() -> V>,
}

impl<V, F> FnConverter<V, F>
where
    V: Any + fmt::Debug + Send,
    F: Fn(&str, &ConversionHints<'_>) -> anyhow::Result<V> + Send + Sync,
{
    pub fn new(name: &'static str, f: F) -> Self {
        Self {
            name,
            f,
            _output: PhantomData,
        }
    }
}

impl<V, F> Converter for FnConverter<V, F>
where
    V: Any + fmt::Debug + Send,
    F: Fn(&str, &ConversionHints<'_>) -> anyhow::Result<V> + Send + Sync,
{
    fn convert(
        &self,
        text: &str,
        hints: &ConversionHints<'_>,
    ) -> anyhow::Result<Option<Box<dyn ConvertedValue>>> {
        let value = (self.f)(text, hints)?;
        Ok(Some(Box::new(value)))
    }

    fn name(&self) -> &str {
        self.name
    }
}

/// Mapping from target value type to the converter producing it.
///
/// Lookup is by exact type. Registries are filled while being built and
/// shared read-only afterwards; [`ConverterRegistry::layer`] composes a
/// report-specific overlay over a base registry without touching either.
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    converters: FxHashMap<TypeId, Arc<dyn Converter>>,
}

impl ConverterRegistry {
    /// An empty registry, typically used as a per-report overlay
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `converter` as the converter producing `V`
    pub fn register<V: Any>(&mut self, converter: impl Converter + 'static) {
        self.converters.insert(TypeId::of::<V>(), Arc::new(converter));
    }

    /// Register a function as the converter producing `V`
    pub fn register_fn<V, F>(&mut self, name: &'static str, f: F)
    where
        V: Any + fmt::Debug + Send,
        F: Fn(&str, &ConversionHints<'_>) -> anyhow::Result<V> + Send + Sync + 'static,
    {
        self.register::<V>(FnConverter::new(name, f));
    }

    /// Builder-style [`ConverterRegistry::register`]
    #[must_use]
    pub fn with<V: Any>(mut self, converter: impl Converter + 'static) -> Self {
        self.register::<V>(converter);
        self
    }

    /// Builder-style [`ConverterRegistry::register_fn`]
    #[must_use]
    pub fn with_fn<V, F>(mut self, name: &'static str, f: F) -> Self
    where
        V: Any + fmt::Debug + Send,
        F: Fn(&str, &ConversionHints<'_>) -> anyhow::Result<V> + Send + Sync + 'static,
    {
        self.register_fn::<V, F>(name, f);
        self
    }

    /// Look up the converter for a value type
    #[must_use]
    pub fn get(&self, value_type: &ValueType) -> Option<Arc<dyn Converter>> {
        self.converters.get(&value_type.id()).cloned()
    }

    /// Look up the converter producing `V`
    #[must_use]
    pub fn get_for<V: Any>(&self) -> Option<Arc<dyn Converter>> {
        self.converters.get(&TypeId::of::<V>()).cloned()
    }

    #[must_use]
    pub fn contains(&self, value_type: &ValueType) -> bool {
        self.converters.contains_key(&value_type.id())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    /// Returns a new registry with every entry of `self`, where entries of
    /// `overlay` replace same-typed entries of `self`.
    #[must_use]
    pub fn layer(&self, overlay: &ConverterRegistry) -> ConverterRegistry {
        let mut converters = self.converters.clone();
        converters.extend(
            overlay
                .converters
                .iter()
                .map(|(type_id, converter)| (*type_id, Arc::clone(converter))),
        );
        ConverterRegistry { converters }
    }

    /// Convert raw text with `converter`, mapping empty text to `None`
    pub fn apply(
        converter: &dyn Converter,
        text: &str,
        hints: &ConversionHints<'_>,
    ) -> anyhow::Result<Option<Box<dyn ConvertedValue>>> {
        if text.is_empty() {
            return Ok(None);
        }
        converter.convert(text, hints)
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.converters.values().map(|converter| converter.name()))
            .finish()
    }
}
