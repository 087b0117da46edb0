//! Reference data kept alongside the financial records: categories,
//! departments, and the product catalog.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::Money;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Department {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: u64,
    pub name: String,
    /// Short stock code, e.g. "SM-001"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Current list price per unit
    pub price: Money,
    pub stock_quantity: u32,
    pub category_id: u64,
    pub created: NaiveDate,
}
