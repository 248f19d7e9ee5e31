use chrono::NaiveDateTime;
use diesel::{Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::expenses;

#[derive(
    Clone, Debug, PartialEq, Serialize, Deserialize, Identifiable, Queryable, Selectable,
)]
#[diesel(table_name = expenses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Expense {
    pub id: Uuid,
    pub amount: f64,
    pub category: String,
    pub description: Option<String>,
    pub date: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Insertable)]
#[diesel(table_name = expenses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewExpense<'a> {
    pub id: Uuid,
    pub amount: f64,
    pub category: &'a str,
    pub description: Option<&'a str>,
    pub date: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

impl From<NewExpense<'_>> for Expense {
    fn from(new_expense: NewExpense<'_>) -> Self {
        Expense {
            id: new_expense.id,
            amount: new_expense.amount,
            category: String::from(new_expense.category),
            description: new_expense.description.map(String::from),
            date: new_expense.date,
            created_at: new_expense.created_at,
        }
    }
}
