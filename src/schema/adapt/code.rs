//! Converters for enumerations whose values arrive as fixed codes.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

use crate::schema::adapt::registry::{ConversionHints, ConvertedValue, Converter};

/// An enumeration whose variants are each represented by a code string in
/// report output.
pub trait CodedValue: Sized + Copy + fmt::Debug + Send + Sync + 'static {
    /// Every variant, in declaration order
    fn variants() -> &'static [Self];

    /// The code the report emits for this variant
    fn code(&self) -> &'static str;

    /// Find the variant emitting `code`
    fn from_code(code: &str) -> Option<Self> {
        Self::variants().iter().copied().find(|v| v.code() == code)
    }
}

/// Maps column text onto a [`CodedValue`] by exact code match
pub struct CodeConverter<E> {
    _enum: PhantomData<fn() -> E>,
}

impl<E: CodedValue> CodeConverter<E> {
    #[must_use]
    pub fn new() -> Self {
        Self { _enum: PhantomData }
    }
}

impl<E: CodedValue> Default for CodeConverter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: CodedValue + Any> Converter for CodeConverter<E> {
    fn convert(
        &self,
        text: &str,
        _hints: &ConversionHints<'_>,
    ) -> anyhow::Result<Option<Box<dyn ConvertedValue>>> {
        match E::from_code(text) {
            Some(value) => Ok(Some(Box::new(value))),
            None => anyhow::bail!(
                "The value returned by Answers ({text}) does not correspond to any variant of {}",
                std::any::type_name::<E>()
            ),
        }
    }

    fn name(&self) -> &str {
        std::any::type_name::<E>()
    }
}
