use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Aggregation granularity for the analysis report.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Period {
    Year,
    Quarter,
    /// The default granularity; unrecognised period selections fall back
    /// here.
    #[default]
    Month,
}

/// Calendar quarter for a month number: 1-3 -> Q1, 4-6 -> Q2, 7-9 -> Q3,
/// 10-12 -> Q4.
pub fn quarter_of(month: u32) -> u32 {
    (month - 1) / 3 + 1
}

/// Time key of one aggregate group.
///
/// A single report only ever holds keys of one variant, so the derived
/// `Ord` gives the ascending time ordering within a report.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum PeriodKey {
    Year(i32),
    Quarter { year: i32, quarter: u32 },
    Month { year: i32, month: u32 },
}

impl PeriodKey {
    /// The key a date falls under at the given granularity.
    pub fn for_date(date: NaiveDate, period: Period) -> Self {
        match period {
            Period::Year => PeriodKey::Year(date.year()),
            Period::Quarter => PeriodKey::Quarter {
                year: date.year(),
                quarter: quarter_of(date.month()),
            },
            Period::Month => PeriodKey::Month {
                year: date.year(),
                month: date.month(),
            },
        }
    }

    /// Display label: "2024", "Q1/2024", "1/2024".
    pub fn label(&self) -> String {
        match self {
            PeriodKey::Year(year) => format!("{}", year),
            PeriodKey::Quarter { year, quarter } => format!("Q{}/{}", quarter, year),
            PeriodKey::Month { year, month } => format!("{}/{}", month, year),
        }
    }
}
