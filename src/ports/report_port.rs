//! Report generation port trait.

use crate::domain::engine::{EngineConfig, EngineResult};
use crate::domain::error::TrendsuiteError;
use std::path::Path;

/// Port for writing engine run reports.
pub trait ReportPort {
    fn write(
        &self,
        result: &EngineResult,
        config: &EngineConfig,
        output_path: &Path,
    ) -> Result<(), TrendsuiteError>;
}
