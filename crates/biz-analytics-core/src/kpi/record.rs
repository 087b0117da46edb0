use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::kpi::calculator::{calculate_kpi, KpiFigures};
use crate::types::Money;
use crate::BizAnalyticsResult;

/// User-supplied inputs for one financial record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinancialInputs {
    pub date: NaiveDate,
    pub fixed_costs: Money,
    pub variable_cost_per_unit: Money,
    pub price_per_unit: Money,
    pub units_sold: u32,
    pub investment: Money,
}

/// A persisted financial record: inputs plus the KPI snapshot derived from
/// them.
///
/// `figures` is private: the derived fields are always the output of
/// `calculate_kpi` over the inputs as they stood at the last recomputation,
/// and are never individually mutable. They are recomputed on construction
/// and on `update_inputs`, not on read; serde round-trips preserve the
/// stored snapshot verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinancialRecord {
    pub id: u64,
    inputs: FinancialInputs,
    figures: KpiFigures,
    /// Set when the record was produced by the sales rollup rather than
    /// entered by hand.
    #[serde(default)]
    pub generated_from_sales: bool,
}

impl FinancialRecord {
    /// Build a record from inputs, computing the KPI snapshot once.
    pub fn new(id: u64, inputs: FinancialInputs) -> BizAnalyticsResult<Self> {
        let figures = calculate_kpi(&inputs)?.result;
        Ok(Self {
            id,
            inputs,
            figures,
            generated_from_sales: false,
        })
    }

    pub fn inputs(&self) -> &FinancialInputs {
        &self.inputs
    }

    pub fn date(&self) -> NaiveDate {
        self.inputs.date
    }

    /// The KPI snapshot as of the last input update.
    pub fn figures(&self) -> &KpiFigures {
        &self.figures
    }

    /// Replace the inputs and recompute the snapshot. On error the record is
    /// left unchanged.
    pub fn update_inputs(&mut self, inputs: FinancialInputs) -> BizAnalyticsResult<()> {
        let figures = calculate_kpi(&inputs)?.result;
        self.inputs = inputs;
        self.figures = figures;
        Ok(())
    }
}
