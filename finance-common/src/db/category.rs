use chrono::NaiveDateTime;
use diesel::{dsl, ExpressionMethods, OptionalExtension, QueryDsl};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::{DaoError, DbAsyncPool};
use crate::models::category::{Category, NewCategory};

use crate::schema::categories as category_fields;
use crate::schema::categories::dsl::categories;

pub struct Dao {
    db_async_pool: DbAsyncPool,
}

impl Dao {
    pub fn new(db_async_pool: &DbAsyncPool) -> Self {
        Self {
            db_async_pool: db_async_pool.clone(),
        }
    }

    pub async fn get_categories(&self) -> Result<Vec<Category>, DaoError> {
        let mut conn = self.db_async_pool.get().await?;
        Ok(categories
            .order((category_fields::created_at.asc(), category_fields::id.asc()))
            .load::<Category>(&mut conn)
            .await?)
    }

    pub async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>, DaoError> {
        let mut conn = self.db_async_pool.get().await?;
        Ok(categories
            .filter(category_fields::name.eq(name))
            .first::<Category>(&mut conn)
            .await
            .optional()?)
    }

    pub async fn create_category(
        &self,
        name: &str,
        color: &str,
        icon: Option<&str>,
        created_at: NaiveDateTime,
    ) -> Result<Category, DaoError> {
        let new_category = NewCategory {
            id: Uuid::now_v7(),
            name,
            color,
            icon,
            created_at,
        };

        let mut conn = self.db_async_pool.get().await?;
        dsl::insert_into(categories)
            .values(&new_category)
            .execute(&mut conn)
            .await?;

        Ok(new_category.into())
    }

    pub async fn count_categories(&self) -> Result<i64, DaoError> {
        let mut conn = self.db_async_pool.get().await?;
        Ok(categories.count().get_result::<i64>(&mut conn).await?)
    }
}
