use chrono::NaiveDateTime;
use diesel::{dsl, ExpressionMethods, OptionalExtension, QueryDsl};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::{DaoError, DbAsyncPool};
use crate::models::budget::{Budget, NewBudget};

use crate::schema::budgets as budget_fields;
use crate::schema::budgets::dsl::budgets;

pub struct Dao {
    db_async_pool: DbAsyncPool,
}

impl Dao {
    pub fn new(db_async_pool: &DbAsyncPool) -> Self {
        Self {
            db_async_pool: db_async_pool.clone(),
        }
    }

    pub async fn get_budgets(&self, user_id: Option<&str>) -> Result<Vec<Budget>, DaoError> {
        let mut conn = self.db_async_pool.get().await?;

        let ordering = (budget_fields::created_at.asc(), budget_fields::id.asc());

        let loaded = match user_id {
            Some(user_id) => {
                budgets
                    .filter(budget_fields::user_id.eq(user_id))
                    .order(ordering)
                    .load::<Budget>(&mut conn)
                    .await?
            }
            None => budgets.order(ordering).load::<Budget>(&mut conn).await?,
        };

        Ok(loaded)
    }

    pub async fn get_budget(&self, budget_id: Uuid) -> Result<Option<Budget>, DaoError> {
        let mut conn = self.db_async_pool.get().await?;
        Ok(budgets
            .find(budget_id)
            .get_result::<Budget>(&mut conn)
            .await
            .optional()?)
    }

    pub async fn create_budget(
        &self,
        name: &str,
        amount: f64,
        category: Option<&str>,
        user_id: Option<&str>,
        created_at: NaiveDateTime,
    ) -> Result<Budget, DaoError> {
        let new_budget = NewBudget {
            id: Uuid::now_v7(),
            name,
            amount,
            spent: 0.0,
            category,
            user_id,
            created_at,
        };

        let mut conn = self.db_async_pool.get().await?;
        dsl::insert_into(budgets)
            .values(&new_budget)
            .execute(&mut conn)
            .await?;

        Ok(new_budget.into())
    }

    pub async fn update_budget(
        &self,
        budget_id: Uuid,
        name: &str,
        amount: f64,
        category: Option<&str>,
        user_id: Option<&str>,
    ) -> Result<Budget, DaoError> {
        let mut conn = self.db_async_pool.get().await?;
        let updated = dsl::update(budgets.find(budget_id))
            .set((
                budget_fields::name.eq(name),
                budget_fields::amount.eq(amount),
                budget_fields::category.eq(category),
                budget_fields::user_id.eq(user_id),
            ))
            .get_result::<Budget>(&mut conn)
            .await
            .optional()?;

        updated.ok_or(DaoError::NotFound)
    }

    pub async fn delete_budget(&self, budget_id: Uuid) -> Result<(), DaoError> {
        let mut conn = self.db_async_pool.get().await?;
        let deleted_count = diesel::delete(budgets.find(budget_id))
            .execute(&mut conn)
            .await?;

        if deleted_count == 0 {
            return Err(DaoError::NotFound);
        }

        Ok(())
    }
}
