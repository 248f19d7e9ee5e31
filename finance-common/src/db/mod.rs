use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel_async::pooled_connection::bb8::Pool as AsyncPool;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::{AsyncPgConnection, SimpleAsyncConnection};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::messages::ExpenseQuery;
use crate::models::budget::Budget;
use crate::models::category::{Category, DEFAULT_CATEGORIES};
use crate::models::expense::Expense;
use crate::summary::{DateRange, SpendingSummary};

pub mod budget;
pub mod category;
pub mod expense;
pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub type DbAsyncPool = AsyncPool<AsyncPgConnection>;

pub type RecordStoreHandle = Arc<dyn RecordStore>;

const SCHEMA_SQL: &str =
    include_str!("../../../migrations/2025-01-01-000000_create_finance_tables/up.sql");

pub async fn create_db_async_pool(
    database_uri: &str,
    max_db_connections: u32,
) -> Result<DbAsyncPool, DaoError> {
    let config = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_uri);
    AsyncPool::builder()
        .max_size(max_db_connections)
        .build(config)
        .await
        .map_err(|e| DaoError::DbAsyncPoolFailure(e.to_string()))
}

/// Creates the finance tables and indexes if they do not exist yet.
pub async fn ensure_schema(db_async_pool: &DbAsyncPool) -> Result<(), DaoError> {
    let mut conn = db_async_pool.get().await?;
    conn.batch_execute(SCHEMA_SQL).await?;
    Ok(())
}

#[derive(Debug)]
pub enum DaoError {
    DbAsyncPoolFailure(String),
    QueryFailure(diesel::result::Error),
    NotFound,
}

impl std::error::Error for DaoError {}

impl fmt::Display for DaoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DaoError::DbAsyncPoolFailure(e) => {
                write!(f, "DaoError: Failed to obtain async DB connection: {e}")
            }
            DaoError::QueryFailure(e) => {
                write!(f, "DaoError: Query failed: {e}")
            }
            DaoError::NotFound => {
                write!(f, "DaoError: No record matched the given ID")
            }
        }
    }
}

impl<E: std::error::Error + Send + Sync + 'static> From<bb8::RunError<E>> for DaoError {
    fn from(error: bb8::RunError<E>) -> Self {
        DaoError::DbAsyncPoolFailure(error.to_string())
    }
}

impl From<diesel::result::Error> for DaoError {
    fn from(error: diesel::result::Error) -> Self {
        DaoError::QueryFailure(error)
    }
}

/// Persistence for expenses, categories, and budgets.
///
/// Lookups by ID return `Ok(None)` when nothing matches. Deletes and updates of a missing record
/// return `DaoError::NotFound`, including a second delete of a record that was already removed.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn create_expense(
        &self,
        amount: f64,
        category: &str,
        description: Option<&str>,
        date: NaiveDateTime,
        created_at: NaiveDateTime,
    ) -> Result<Expense, DaoError>;

    async fn get_expense(&self, expense_id: Uuid) -> Result<Option<Expense>, DaoError>;

    /// Date bounds are inclusive. Results are ordered newest first.
    async fn get_expenses(&self, query: &ExpenseQuery) -> Result<Vec<Expense>, DaoError>;

    async fn delete_expense(&self, expense_id: Uuid) -> Result<(), DaoError>;

    async fn summarize_expenses(&self, range: &DateRange) -> Result<SpendingSummary, DaoError>;

    async fn get_categories(&self) -> Result<Vec<Category>, DaoError>;

    async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>, DaoError>;

    async fn create_category(
        &self,
        name: &str,
        color: &str,
        icon: Option<&str>,
        created_at: NaiveDateTime,
    ) -> Result<Category, DaoError>;

    async fn count_categories(&self) -> Result<i64, DaoError>;

    async fn get_budgets(&self, user_id: Option<&str>) -> Result<Vec<Budget>, DaoError>;

    async fn get_budget(&self, budget_id: Uuid) -> Result<Option<Budget>, DaoError>;

    async fn create_budget(
        &self,
        name: &str,
        amount: f64,
        category: Option<&str>,
        user_id: Option<&str>,
        created_at: NaiveDateTime,
    ) -> Result<Budget, DaoError>;

    /// Replaces the name, amount, category, and user of a budget. `spent` is left alone.
    async fn update_budget(
        &self,
        budget_id: Uuid,
        name: &str,
        amount: f64,
        category: Option<&str>,
        user_id: Option<&str>,
    ) -> Result<Budget, DaoError>;

    async fn delete_budget(&self, budget_id: Uuid) -> Result<(), DaoError>;
}

/// Inserts the default categories into an empty category collection. Returns `true` if the
/// defaults were inserted.
pub async fn seed_default_categories(
    store: &dyn RecordStore,
    created_at: NaiveDateTime,
) -> Result<bool, DaoError> {
    if store.count_categories().await? > 0 {
        return Ok(false);
    }

    for default in DEFAULT_CATEGORIES.iter() {
        store
            .create_category(default.name, default.color, Some(default.icon), created_at)
            .await?;
    }

    log::info!("Seeded {} default categories", DEFAULT_CATEGORIES.len());

    Ok(true)
}
