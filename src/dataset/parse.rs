// src/dataset/parse.rs
use anyhow::{bail, Result};
use std::str::FromStr;
use tracing::debug;

/// How malformed numeric cells are handled while loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParsePolicy {
    /// Malformed numbers become zero and the row is kept.
    #[default]
    Lenient,
    /// The first malformed number fails the whole load.
    Strict,
}

/// Numeric cell types the loader knows how to read.
pub trait NumericField: FromStr + Default + Copy {
    /// Whether a successfully parsed value is acceptable as data.
    fn is_usable(&self) -> bool {
        true
    }
}

impl NumericField for i32 {}

impl NumericField for f64 {
    fn is_usable(&self) -> bool {
        self.is_finite()
    }
}

/// Parse `raw` into `T`, or fall back to `T::default()` under the lenient policy.
///
/// The text is taken as-is: no trimming, so `" 12"` is malformed.
/// `row` is 1-based over data rows and only used for diagnostics.
pub fn parse_or_default<T: NumericField>(
    raw: &str,
    column: &str,
    row: usize,
    policy: ParsePolicy,
) -> Result<T> {
    match raw.parse::<T>() {
        Ok(v) if v.is_usable() => Ok(v),
        _ => match policy {
            ParsePolicy::Lenient => {
                debug!(row, column, raw, "malformed numeric field, using zero");
                Ok(T::default())
            }
            ParsePolicy::Strict => {
                bail!("row {}: column {} has malformed value {:?}", row, column, raw)
            }
        },
    }
}
