pub mod catalog;
pub mod error;
pub mod kpi;
pub mod ledger;
pub mod report;
pub mod sales;
pub mod types;

pub use error::BizAnalyticsError;
pub use types::*;

/// Standard result type for all business-analytics operations
pub type BizAnalyticsResult<T> = Result<T, BizAnalyticsError>;
