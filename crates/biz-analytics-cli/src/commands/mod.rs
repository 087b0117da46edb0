pub mod catalog;
pub mod kpi;
pub mod record;
pub mod report;
pub mod sales;
pub mod seed;

use biz_analytics_core::sales::CostEstimates;
use std::path::PathBuf;

/// Resolved settings shared by every ledger-backed command.
pub struct CommandContext {
    pub ledger_path: PathBuf,
    pub estimates: CostEstimates,
}
