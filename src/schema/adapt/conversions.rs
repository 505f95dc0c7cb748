//! Default converters for the value types rowset columns usually carry.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;

use crate::schema::adapt::date_utils::{parse_date_time, parse_local_date, parse_utc_date_time};
use crate::schema::adapt::registry::{ConversionHints, ConverterRegistry};

impl ConverterRegistry {
    /// A registry holding the default converters.
    ///
    /// | type | accepted text |
    /// |------|---------------|
    /// | `String` | anything, unchanged |
    /// | `i32`, `i64` | decimal integer |
    /// | `f64` | decimal or scientific notation |
    /// | `Decimal` | decimal or scientific notation, rescaled to the field's scale |
    /// | `NaiveDate` | `YYYY-MM-DD` with an optional time part |
    /// | `NaiveDateTime` | `YYYY-MM-DDTHH:MM:SS[.fff]` |
    /// | `DateTime<Utc>` | as `NaiveDateTime`, read as UTC |
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new()
            .with_fn::<String, _>("string", |text, _| Ok(text.to_string()))
            .with_fn::<i32, _>("i32", |text, _| parse_number::<i32>(text))
            .with_fn::<i64, _>("i64", |text, _| parse_number::<i64>(text))
            .with_fn::<f64, _>("f64", |text, _| parse_number::<f64>(text))
            .with_fn::<Decimal, _>("decimal", convert_decimal)
            .with_fn::<NaiveDate, _>("local-date", |text, _| parse_local_date(text))
            .with_fn::<NaiveDateTime, _>("local-date-time", |text, _| parse_date_time(text))
            .with_fn::<DateTime<Utc>, _>("utc-date-time", |text, _| parse_utc_date_time(text))
    }
}

fn parse_number<N>(text: &str) -> anyhow::Result<N>
where
    N: FromStr,
    N::Err: std::error::Error + Send + Sync + 'static,
{
    text.parse::<N>()
        .map_err(|e| anyhow::anyhow!("'{text}' is not a valid {}: {e}", std::any::type_name::<N>()))
}

/// Parse a decimal and, if the field declares a scale, set exactly that
/// many decimal places. A value that would need rounding is rejected.
pub fn convert_decimal(text: &str, hints: &ConversionHints<'_>) -> anyhow::Result<Decimal> {
    let mut parsed = Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|e| anyhow::anyhow!("'{text}' is not a valid decimal: {e}"))?;

    if let Some(scale) = hints.scale {
        if parsed.round_dp(scale) != parsed {
            anyhow::bail!(
                "rounding necessary to fit '{text}' into {scale} decimal places for field {}",
                hints.field
            );
        }
        parsed.rescale(scale);
    }

    Ok(parsed)
}
