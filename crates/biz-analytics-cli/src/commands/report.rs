use clap::{Args, ValueEnum};
use serde_json::Value;

use biz_analytics_core::report::{build_analysis_report, dashboard_summary, Period};

use crate::commands::CommandContext;
use crate::store;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum PeriodArg {
    Year,
    Quarter,
    #[default]
    Month,
}

impl From<PeriodArg> for Period {
    fn from(arg: PeriodArg) -> Self {
        match arg {
            PeriodArg::Year => Period::Year,
            PeriodArg::Quarter => Period::Quarter,
            PeriodArg::Month => Period::Month,
        }
    }
}

/// Arguments for the analysis report
#[derive(Args)]
pub struct ReportArgs {
    /// Aggregation granularity
    #[arg(long, default_value = "month")]
    pub period: PeriodArg,

    /// Emit the chart-series projection instead of the group table
    #[arg(long)]
    pub chart: bool,
}

pub fn run_report(
    args: ReportArgs,
    ctx: &CommandContext,
) -> Result<Value, Box<dyn std::error::Error>> {
    let ledger = store::load(&ctx.ledger_path)?;
    let output = build_analysis_report(ledger.records(), args.period.into())?;
    if args.chart {
        return Ok(serde_json::to_value(output.result.chart_series())?);
    }
    Ok(serde_json::to_value(output)?)
}

pub fn run_dashboard(ctx: &CommandContext) -> Result<Value, Box<dyn std::error::Error>> {
    let ledger = store::load(&ctx.ledger_path)?;
    Ok(serde_json::to_value(dashboard_summary(ledger.records()))?)
}
