//! Data access port trait.

use crate::domain::error::SigtraderError;
use crate::domain::ohlcv::Series;

/// Supplies a fully materialized, validated bar series.
pub trait DataPort {
    fn load_series(&self) -> Result<Series, SigtraderError>;
}
