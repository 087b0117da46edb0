pub mod calculator;
pub mod record;

pub use calculator::{calculate_kpi, HealthAssessment, KpiFigures};
pub use record::{FinancialInputs, FinancialRecord};
