use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::messages::{deserialize_optional_filter, deserialize_optional_timestamp};

pub const DEFAULT_EXPENSE_LIMIT: u32 = 100;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewExpense {
    pub amount: f64,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub date: Option<NaiveDateTime>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub icon: Option<String>,
}

/// Used both to create a budget and to replace an existing budget's fields.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewBudget {
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Filters for listing expenses. Both date bounds are inclusive. A limit of zero means no limit.
#[derive(Clone, Debug, Deserialize)]
pub struct ExpenseQuery {
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub start_date: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub end_date: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_optional_filter")]
    pub category: Option<String>,
    #[serde(default = "default_expense_limit")]
    pub limit: u32,
}

impl Default for ExpenseQuery {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            category: None,
            limit: DEFAULT_EXPENSE_LIMIT,
        }
    }
}

fn default_expense_limit() -> u32 {
    DEFAULT_EXPENSE_LIMIT
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct BudgetQuery {
    #[serde(default, deserialize_with = "deserialize_optional_filter")]
    pub user_id: Option<String>,
}
