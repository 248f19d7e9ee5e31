use chrono::NaiveDateTime;
use diesel::{Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::budgets;

// `spent` is set to zero on creation and is never derived from expenses
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Identifiable, Queryable, Selectable)]
#[diesel(table_name = budgets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Budget {
    pub id: Uuid,
    pub name: String,
    pub amount: f64,
    pub spent: f64,
    pub category: Option<String>,
    pub user_id: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Insertable)]
#[diesel(table_name = budgets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewBudget<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub amount: f64,
    pub spent: f64,
    pub category: Option<&'a str>,
    pub user_id: Option<&'a str>,
    pub created_at: NaiveDateTime,
}

impl From<NewBudget<'_>> for Budget {
    fn from(new_budget: NewBudget<'_>) -> Self {
        Budget {
            id: new_budget.id,
            name: String::from(new_budget.name),
            amount: new_budget.amount,
            spent: new_budget.spent,
            category: new_budget.category.map(String::from),
            user_id: new_budget.user_id.map(String::from),
            created_at: new_budget.created_at,
        }
    }
}
