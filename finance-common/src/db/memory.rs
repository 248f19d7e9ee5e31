use async_trait::async_trait;
use chrono::{NaiveDateTime, SubsecRound};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::{DaoError, RecordStore};
use crate::messages::ExpenseQuery;
use crate::models::budget::{Budget, NewBudget};
use crate::models::category::{Category, NewCategory};
use crate::models::expense::{Expense, NewExpense};
use crate::summary::{self, DateRange, SpendingSummary};

/// A `RecordStore` that keeps every collection in process memory, in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    expenses: RwLock<Vec<Expense>>,
    categories: RwLock<Vec<Category>>,
    budgets: RwLock<Vec<Budget>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn create_expense(
        &self,
        amount: f64,
        category: &str,
        description: Option<&str>,
        date: NaiveDateTime,
        created_at: NaiveDateTime,
    ) -> Result<Expense, DaoError> {
        let expense = Expense::from(NewExpense {
            id: Uuid::now_v7(),
            amount,
            category,
            description,
            date: date.trunc_subsecs(6),
            created_at: created_at.trunc_subsecs(6),
        });

        self.expenses.write().await.push(expense.clone());
        Ok(expense)
    }

    async fn get_expense(&self, expense_id: Uuid) -> Result<Option<Expense>, DaoError> {
        let expenses = self.expenses.read().await;
        Ok(expenses.iter().find(|e| e.id == expense_id).cloned())
    }

    async fn get_expenses(&self, query: &ExpenseQuery) -> Result<Vec<Expense>, DaoError> {
        let expenses = self.expenses.read().await;

        let mut matching: Vec<Expense> = expenses
            .iter()
            .filter(|e| query.start_date.map_or(true, |start| e.date >= start))
            .filter(|e| query.end_date.map_or(true, |end| e.date <= end))
            .filter(|e| {
                query
                    .category
                    .as_deref()
                    .map_or(true, |category| e.category == category)
            })
            .cloned()
            .collect();

        // Newest first, and among equal dates the most recently inserted first
        matching.reverse();
        matching.sort_by(|a, b| b.date.cmp(&a.date));

        if query.limit > 0 {
            matching.truncate(query.limit as usize);
        }

        Ok(matching)
    }

    async fn delete_expense(&self, expense_id: Uuid) -> Result<(), DaoError> {
        let mut expenses = self.expenses.write().await;
        let pos = expenses
            .iter()
            .position(|e| e.id == expense_id)
            .ok_or(DaoError::NotFound)?;

        expenses.remove(pos);
        Ok(())
    }

    async fn summarize_expenses(&self, range: &DateRange) -> Result<SpendingSummary, DaoError> {
        let expenses = self.expenses.read().await;
        Ok(summary::summarize(range, expenses.iter()))
    }

    async fn get_categories(&self) -> Result<Vec<Category>, DaoError> {
        Ok(self.categories.read().await.clone())
    }

    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>, DaoError> {
        let categories = self.categories.read().await;
        Ok(categories.iter().find(|c| c.name == name).cloned())
    }

    async fn create_category(
        &self,
        name: &str,
        color: &str,
        icon: Option<&str>,
        created_at: NaiveDateTime,
    ) -> Result<Category, DaoError> {
        let category = Category::from(NewCategory {
            id: Uuid::now_v7(),
            name,
            color,
            icon,
            created_at,
        });

        self.categories.write().await.push(category.clone());
        Ok(category)
    }

    async fn count_categories(&self) -> Result<i64, DaoError> {
        Ok(self.categories.read().await.len() as i64)
    }

    async fn get_budgets(&self, user_id: Option<&str>) -> Result<Vec<Budget>, DaoError> {
        let budgets = self.budgets.read().await;
        Ok(budgets
            .iter()
            .filter(|b| user_id.map_or(true, |user_id| b.user_id.as_deref() == Some(user_id)))
            .cloned()
            .collect())
    }

    async fn get_budget(&self, budget_id: Uuid) -> Result<Option<Budget>, DaoError> {
        let budgets = self.budgets.read().await;
        Ok(budgets.iter().find(|b| b.id == budget_id).cloned())
    }

    async fn create_budget(
        &self,
        name: &str,
        amount: f64,
        category: Option<&str>,
        user_id: Option<&str>,
        created_at: NaiveDateTime,
    ) -> Result<Budget, DaoError> {
        let budget = Budget::from(NewBudget {
            id: Uuid::now_v7(),
            name,
            amount,
            spent: 0.0,
            category,
            user_id,
            created_at,
        });

        self.budgets.write().await.push(budget.clone());
        Ok(budget)
    }

    async fn update_budget(
        &self,
        budget_id: Uuid,
        name: &str,
        amount: f64,
        category: Option<&str>,
        user_id: Option<&str>,
    ) -> Result<Budget, DaoError> {
        let mut budgets = self.budgets.write().await;
        let budget = budgets
            .iter_mut()
            .find(|b| b.id == budget_id)
            .ok_or(DaoError::NotFound)?;

        budget.name = String::from(name);
        budget.amount = amount;
        budget.category = category.map(String::from);
        budget.user_id = user_id.map(String::from);

        Ok(budget.clone())
    }

    async fn delete_budget(&self, budget_id: Uuid) -> Result<(), DaoError> {
        let mut budgets = self.budgets.write().await;
        let pos = budgets
            .iter()
            .position(|b| b.id == budget_id)
            .ok_or(DaoError::NotFound)?;

        budgets.remove(pos);
        Ok(())
    }
}
