pub mod analysis;
pub mod period;

pub use analysis::{
    build_analysis_report, dashboard_summary, AnalysisReport, ChartSeries, DashboardSummary,
    PeriodSummary,
};
pub use period::{Period, PeriodKey};
