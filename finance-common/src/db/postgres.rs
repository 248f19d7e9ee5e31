use async_trait::async_trait;
use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::db::{budget, category, expense, DaoError, DbAsyncPool, RecordStore};
use crate::messages::ExpenseQuery;
use crate::models::budget::Budget;
use crate::models::category::Category;
use crate::models::expense::Expense;
use crate::summary::{DateRange, SpendingSummary};

/// A `RecordStore` backed by Postgres, with one DAO per table.
pub struct PgStore {
    expense_dao: expense::Dao,
    category_dao: category::Dao,
    budget_dao: budget::Dao,
}

impl PgStore {
    pub fn new(db_async_pool: &DbAsyncPool) -> Self {
        Self {
            expense_dao: expense::Dao::new(db_async_pool),
            category_dao: category::Dao::new(db_async_pool),
            budget_dao: budget::Dao::new(db_async_pool),
        }
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn create_expense(
        &self,
        amount: f64,
        category: &str,
        description: Option<&str>,
        date: NaiveDateTime,
        created_at: NaiveDateTime,
    ) -> Result<Expense, DaoError> {
        self.expense_dao
            .create_expense(amount, category, description, date, created_at)
            .await
    }

    async fn get_expense(&self, expense_id: Uuid) -> Result<Option<Expense>, DaoError> {
        self.expense_dao.get_expense(expense_id).await
    }

    async fn get_expenses(&self, query: &ExpenseQuery) -> Result<Vec<Expense>, DaoError> {
        self.expense_dao.get_expenses(query).await
    }

    async fn delete_expense(&self, expense_id: Uuid) -> Result<(), DaoError> {
        self.expense_dao.delete_expense(expense_id).await
    }

    async fn summarize_expenses(&self, range: &DateRange) -> Result<SpendingSummary, DaoError> {
        self.expense_dao.summarize_expenses(range).await
    }

    async fn get_categories(&self) -> Result<Vec<Category>, DaoError> {
        self.category_dao.get_categories().await
    }

    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>, DaoError> {
        self.category_dao.find_category_by_name(name).await
    }

    async fn create_category(
        &self,
        name: &str,
        color: &str,
        icon: Option<&str>,
        created_at: NaiveDateTime,
    ) -> Result<Category, DaoError> {
        self.category_dao
            .create_category(name, color, icon, created_at)
            .await
    }

    async fn count_categories(&self) -> Result<i64, DaoError> {
        self.category_dao.count_categories().await
    }

    async fn get_budgets(&self, user_id: Option<&str>) -> Result<Vec<Budget>, DaoError> {
        self.budget_dao.get_budgets(user_id).await
    }

    async fn get_budget(&self, budget_id: Uuid) -> Result<Option<Budget>, DaoError> {
        self.budget_dao.get_budget(budget_id).await
    }

    async fn create_budget(
        &self,
        name: &str,
        amount: f64,
        category: Option<&str>,
        user_id: Option<&str>,
        created_at: NaiveDateTime,
    ) -> Result<Budget, DaoError> {
        self.budget_dao
            .create_budget(name, amount, category, user_id, created_at)
            .await
    }

    async fn update_budget(
        &self,
        budget_id: Uuid,
        name: &str,
        amount: f64,
        category: Option<&str>,
        user_id: Option<&str>,
    ) -> Result<Budget, DaoError> {
        self.budget_dao
            .update_budget(budget_id, name, amount, category, user_id)
            .await
    }

    async fn delete_budget(&self, budget_id: Uuid) -> Result<(), DaoError> {
        self.budget_dao.delete_budget(budget_id).await
    }
}
