use chrono::{NaiveDateTime, SubsecRound};
use diesel::pg::Pg;
use diesel::{dsl, BoolExpressionMethods, ExpressionMethods, OptionalExtension, QueryDsl};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::{DaoError, DbAsyncPool};
use crate::messages::ExpenseQuery;
use crate::models::expense::{Expense, NewExpense};
use crate::summary::{CategorySpending, DateRange, SpendingSummary, TOP_CATEGORY_COUNT};

use crate::schema::expenses as expense_fields;
use crate::schema::expenses::dsl::expenses;

pub struct Dao {
    db_async_pool: DbAsyncPool,
}

impl Dao {
    pub fn new(db_async_pool: &DbAsyncPool) -> Self {
        Self {
            db_async_pool: db_async_pool.clone(),
        }
    }

    pub async fn create_expense(
        &self,
        amount: f64,
        category: &str,
        description: Option<&str>,
        date: NaiveDateTime,
        created_at: NaiveDateTime,
    ) -> Result<Expense, DaoError> {
        let new_expense = NewExpense {
            id: Uuid::now_v7(),
            amount,
            category,
            description,
            date: date.trunc_subsecs(6),
            created_at: created_at.trunc_subsecs(6),
        };

        let mut conn = self.db_async_pool.get().await?;
        dsl::insert_into(expenses)
            .values(&new_expense)
            .execute(&mut conn)
            .await?;

        Ok(new_expense.into())
    }

    pub async fn get_expense(&self, expense_id: Uuid) -> Result<Option<Expense>, DaoError> {
        let mut conn = self.db_async_pool.get().await?;
        Ok(expenses
            .find(expense_id)
            .get_result::<Expense>(&mut conn)
            .await
            .optional()?)
    }

    pub async fn get_expenses(&self, query: &ExpenseQuery) -> Result<Vec<Expense>, DaoError> {
        let mut db_query = expenses.into_boxed::<Pg>();

        if let Some(start_date) = query.start_date {
            db_query = db_query.filter(expense_fields::date.ge(start_date));
        }

        if let Some(end_date) = query.end_date {
            db_query = db_query.filter(expense_fields::date.le(end_date));
        }

        if let Some(category) = &query.category {
            db_query = db_query.filter(expense_fields::category.eq(category.as_str()));
        }

        db_query = db_query.order((
            expense_fields::date.desc(),
            expense_fields::created_at.desc(),
        ));

        if query.limit > 0 {
            db_query = db_query.limit(i64::from(query.limit));
        }

        let mut conn = self.db_async_pool.get().await?;
        Ok(db_query.load::<Expense>(&mut conn).await?)
    }

    pub async fn delete_expense(&self, expense_id: Uuid) -> Result<(), DaoError> {
        let mut conn = self.db_async_pool.get().await?;
        let deleted_count = diesel::delete(expenses.find(expense_id))
            .execute(&mut conn)
            .await?;

        if deleted_count == 0 {
            return Err(DaoError::NotFound);
        }

        Ok(())
    }

    pub async fn summarize_expenses(&self, range: &DateRange) -> Result<SpendingSummary, DaoError> {
        let mut conn = self.db_async_pool.get().await?;

        let (total_amount, expense_count) = expenses
            .filter(
                expense_fields::date
                    .ge(range.start)
                    .and(expense_fields::date.lt(range.end)),
            )
            .select((dsl::sum(expense_fields::amount), dsl::count(expense_fields::id)))
            .get_result::<(Option<f64>, i64)>(&mut conn)
            .await?;

        if expense_count == 0 {
            return Ok(SpendingSummary::empty());
        }

        let top_categories = expenses
            .filter(
                expense_fields::date
                    .ge(range.start)
                    .and(expense_fields::date.lt(range.end)),
            )
            .group_by(expense_fields::category)
            .select((
                expense_fields::category,
                dsl::sum(expense_fields::amount),
                dsl::count(expense_fields::id),
            ))
            .order((
                dsl::sum(expense_fields::amount).desc(),
                dsl::min(expense_fields::created_at).asc(),
            ))
            .limit(TOP_CATEGORY_COUNT as i64)
            .load::<(String, Option<f64>, i64)>(&mut conn)
            .await?
            .into_iter()
            .map(|(category, amount, count)| CategorySpending {
                category,
                amount: amount.unwrap_or_default(),
                count,
            })
            .collect();

        Ok(SpendingSummary {
            total_amount: total_amount.unwrap_or_default(),
            expense_count,
            top_categories,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{NaiveDate, TimeDelta};

    use crate::clock::{Clock, LocalClock};
    use crate::db::test_utils;

    // Dated in a year no other record will use so that summaries only see this test's rows
    fn isolated_day(year: i32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, 6, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[tokio::test]
    #[ignore]
    async fn test_create_get_and_delete_expense() {
        let dao = Dao::new(&test_utils::db_async_pool().await);
        let now = LocalClock::new().now();

        let created = dao
            .create_expense(12.5, "Food", Some("Lunch"), now, now)
            .await
            .unwrap();

        let fetched = dao.get_expense(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.amount, 12.5);
        assert_eq!(fetched.category, "Food");
        assert_eq!(fetched.description.as_deref(), Some("Lunch"));

        dao.delete_expense(created.id).await.unwrap();
        assert!(dao.get_expense(created.id).await.unwrap().is_none());

        assert!(matches!(
            dao.delete_expense(created.id).await,
            Err(DaoError::NotFound)
        ));
        assert!(matches!(
            dao.delete_expense(Uuid::now_v7()).await,
            Err(DaoError::NotFound)
        ));
    }

    #[tokio::test]
    #[ignore]
    async fn test_created_expense_matches_stored_precision() {
        let dao = Dao::new(&test_utils::db_async_pool().await);
        let date = isolated_day(1904) + TimeDelta::nanoseconds(987_654_321);

        let created = dao
            .create_expense(2.0, "Food", None, date, date)
            .await
            .unwrap();
        assert_eq!(
            created.date,
            isolated_day(1904) + TimeDelta::microseconds(987_654)
        );

        let fetched = dao.get_expense(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);

        dao.delete_expense(created.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore]
    async fn test_get_expenses_filters_and_orders() {
        let dao = Dao::new(&test_utils::db_async_pool().await);
        let category = test_utils::unique_label("Filter");
        let day = isolated_day(1901);

        let mut ids = Vec::new();
        for hours in [3, 1, 2] {
            let date = day + TimeDelta::hours(hours);
            ids.push(
                dao.create_expense(1.0, &category, None, date, date)
                    .await
                    .unwrap()
                    .id,
            );
        }

        let mut query = ExpenseQuery {
            category: Some(category.clone()),
            ..Default::default()
        };

        let found = dao.get_expenses(&query).await.unwrap();
        assert_eq!(
            found.iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![ids[0], ids[2], ids[1]]
        );

        query.start_date = Some(day + TimeDelta::hours(2));
        query.end_date = Some(day + TimeDelta::hours(3));
        let found = dao.get_expenses(&query).await.unwrap();
        assert_eq!(found.len(), 2);

        query.start_date = None;
        query.end_date = None;
        query.limit = 1;
        let found = dao.get_expenses(&query).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, ids[0]);

        for id in ids {
            dao.delete_expense(id).await.unwrap();
        }
    }

    #[tokio::test]
    #[ignore]
    async fn test_summarize_expenses() {
        let dao = Dao::new(&test_utils::db_async_pool().await);
        let day = isolated_day(1902);
        let range = DateRange::day(day);

        let mut ids = Vec::new();
        for (amount, category) in [(10.0, "Food"), (20.0, "Food"), (5.0, "Transportation")] {
            ids.push(
                dao.create_expense(amount, category, None, day, day)
                    .await
                    .unwrap()
                    .id,
            );
        }

        let next_day = day + TimeDelta::days(1);
        ids.push(
            dao.create_expense(99.0, "Food", None, next_day, next_day)
                .await
                .unwrap()
                .id,
        );

        let summary = dao.summarize_expenses(&range).await.unwrap();
        assert_eq!(summary.total_amount, 35.0);
        assert_eq!(summary.expense_count, 3);
        assert_eq!(
            summary.top_categories,
            vec![
                CategorySpending {
                    category: String::from("Food"),
                    amount: 30.0,
                    count: 2,
                },
                CategorySpending {
                    category: String::from("Transportation"),
                    amount: 5.0,
                    count: 1,
                },
            ]
        );

        for id in ids {
            dao.delete_expense(id).await.unwrap();
        }

        let summary = dao.summarize_expenses(&range).await.unwrap();
        assert_eq!(summary, SpendingSummary::empty());
    }
}
