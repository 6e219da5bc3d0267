//! Report generation port trait.

use crate::domain::error::SigtraderError;
use crate::domain::ohlcv::Series;
use crate::domain::pipeline::PipelineOutput;

/// Port for persisting the outputs of a run.
pub trait ReportPort {
    fn write(&self, series: &Series, output: &PipelineOutput) -> Result<(), SigtraderError>;
}
