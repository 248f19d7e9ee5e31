use finance_common::clock::ClockHandle;
use finance_common::db::{DaoError, RecordStoreHandle};
use finance_common::messages::{ExpenseQuery, MessageResponse, NewExpense};
use finance_common::summary::{DateRange, SummaryPeriod};
use finance_common::validators::{self, Validity};

use actix_web::{web, HttpResponse};

use crate::handlers::error::{DoesNotExistType, HttpErrorResponse};
use crate::handlers::parse_record_id;

pub async fn create(
    store: web::Data<RecordStoreHandle>,
    clock: web::Data<ClockHandle>,
    new_expense: web::Json<NewExpense>,
) -> Result<HttpResponse, HttpErrorResponse> {
    if let Validity::Invalid(msg) = validators::validate_new_expense(&new_expense) {
        return Err(HttpErrorResponse::InvalidInput(msg));
    }

    let now = clock.now();

    let expense = match store
        .create_expense(
            new_expense.amount,
            &new_expense.category,
            new_expense.description.as_deref(),
            new_expense.date.unwrap_or(now),
            now,
        )
        .await
    {
        Ok(e) => e,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to create expense",
            )));
        }
    };

    Ok(HttpResponse::Ok().json(expense))
}

pub async fn get_all(
    store: web::Data<RecordStoreHandle>,
    query: web::Query<ExpenseQuery>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let expenses = match store.get_expenses(&query).await {
        Ok(e) => e,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to get expenses",
            )));
        }
    };

    Ok(HttpResponse::Ok().json(expenses))
}

pub async fn delete(
    store: web::Data<RecordStoreHandle>,
    expense_id: web::Path<String>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let expense_id = parse_record_id(&expense_id, DoesNotExistType::Expense)?;

    match store.delete_expense(expense_id).await {
        Ok(()) => (),
        Err(DaoError::NotFound) => {
            return Err(HttpErrorResponse::DoesNotExist(
                String::from("Expense not found"),
                DoesNotExistType::Expense,
            ));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to delete expense",
            )));
        }
    }

    Ok(HttpResponse::Ok().json(MessageResponse::new("Expense deleted successfully")))
}

pub async fn day_summary(
    store: web::Data<RecordStoreHandle>,
    clock: web::Data<ClockHandle>,
) -> Result<HttpResponse, HttpErrorResponse> {
    summarize(&store, &clock, SummaryPeriod::Day).await
}

pub async fn week_summary(
    store: web::Data<RecordStoreHandle>,
    clock: web::Data<ClockHandle>,
) -> Result<HttpResponse, HttpErrorResponse> {
    summarize(&store, &clock, SummaryPeriod::Week).await
}

pub async fn month_summary(
    store: web::Data<RecordStoreHandle>,
    clock: web::Data<ClockHandle>,
) -> Result<HttpResponse, HttpErrorResponse> {
    summarize(&store, &clock, SummaryPeriod::Month).await
}

async fn summarize(
    store: &RecordStoreHandle,
    clock: &ClockHandle,
    period: SummaryPeriod,
) -> Result<HttpResponse, HttpErrorResponse> {
    let range = DateRange::for_period(period, clock.now());

    let summary = match store.summarize_expenses(&range).await {
        Ok(s) => s,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(format!(
                "Failed to summarize expenses for the {period}"
            )));
        }
    };

    Ok(HttpResponse::Ok().json(summary))
}

#[cfg(test)]
mod tests {
    use super::*;

    use finance_common::messages::{ErrorType, ServerErrorResponse};
    use finance_common::models::expense::Expense;
    use finance_common::summary::SpendingSummary;

    use actix_web::http::StatusCode;
    use actix_web::test::{self, TestRequest};
    use chrono::{NaiveDate, TimeDelta};
    use serde_json::json;
    use uuid::Uuid;

    use crate::handlers::test_utils::{self, init_app, read_json};

    #[actix_web::test]
    async fn test_create_expense() {
        let store = test_utils::memory_store();
        let app = init_app!(store);

        let req = TestRequest::post()
            .uri("/api/expenses")
            .set_json(json!({
                "amount": 25.5,
                "category": "Food",
                "description": "Lunch at cafe",
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let expense: Expense = read_json(resp).await;
        assert_eq!(expense.amount, 25.5);
        assert_eq!(expense.category, "Food");
        assert_eq!(expense.description.as_deref(), Some("Lunch at cafe"));
        assert_eq!(expense.date, test_utils::now());
        assert_eq!(expense.created_at, test_utils::now());

        let stored = store.get_expense(expense.id).await.unwrap().unwrap();
        assert_eq!(stored, expense);
    }

    #[actix_web::test]
    async fn test_create_expense_with_date() {
        let store = test_utils::memory_store();
        let app = init_app!(store);

        let req = TestRequest::post()
            .uri("/api/expenses")
            .set_json(json!({
                "amount": 5,
                "category": "Transportation",
                "date": "2025-03-01T08:15:00",
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let expense: Expense = read_json(resp).await;
        assert_eq!(expense.amount, 5.0);
        assert_eq!(expense.description, None);
        assert_eq!(
            expense.date,
            NaiveDate::from_ymd_opt(2025, 3, 1)
                .unwrap()
                .and_hms_opt(8, 15, 0)
                .unwrap()
        );
        assert_eq!(expense.created_at, test_utils::now());
    }

    #[actix_web::test]
    async fn test_create_invalid_expense() {
        let store = test_utils::memory_store();
        let app = init_app!(store);

        let invalid_bodies = [
            json!({ "amount": -50.0, "category": "Food" }),
            json!({ "amount": 0, "category": "Food" }),
            json!({ "amount": 10.0, "category": "" }),
            json!({ "amount": 10.0, "category": "c".repeat(51) }),
            json!({ "amount": 10.0, "category": "Food", "description": "d".repeat(201) }),
        ];

        for body in invalid_bodies {
            let req = TestRequest::post()
                .uri("/api/expenses")
                .set_json(&body)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY, "{body}");

            let err: ServerErrorResponse = read_json(resp).await;
            assert_eq!(err.err_type, ErrorType::InvalidInput);
        }

        let all = store.get_expenses(&ExpenseQuery::default()).await.unwrap();
        assert!(all.is_empty());
    }

    #[actix_web::test]
    async fn test_create_malformed_expense() {
        let store = test_utils::memory_store();
        let app = init_app!(store);

        let malformed_bodies = [
            json!({ "category": "Food" }),
            json!({ "amount": "ten", "category": "Food" }),
            json!({ "amount": 10.0 }),
            json!({ "amount": 10.0, "category": "Food", "date": "last tuesday" }),
        ];

        for body in malformed_bodies {
            let req = TestRequest::post()
                .uri("/api/expenses")
                .set_json(&body)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{body}");

            let err: ServerErrorResponse = read_json(resp).await;
            assert_eq!(err.err_type, ErrorType::IncorrectlyFormed);
        }

        let req = TestRequest::post()
            .uri("/api/expenses")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_get_expenses() {
        let store = test_utils::memory_store();
        let app = init_app!(store);

        let base = test_utils::now();
        for (days_ago, category) in [(3, "Food"), (2, "Bills"), (1, "Food")] {
            let date = base - TimeDelta::days(days_ago);
            store
                .create_expense(10.0, category, None, date, date)
                .await
                .unwrap();
        }

        let req = TestRequest::get().uri("/api/expenses").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let expenses: Vec<Expense> = read_json(resp).await;
        assert_eq!(expenses.len(), 3);
        assert!(expenses.windows(2).all(|w| w[0].date >= w[1].date));

        let req = TestRequest::get()
            .uri("/api/expenses?category=Food&limit=1")
            .to_request();
        let resp = test::call_service(&app, req).await;
        let expenses: Vec<Expense> = read_json(resp).await;
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].category, "Food");
        assert_eq!(expenses[0].date, base - TimeDelta::days(1));

        let req = TestRequest::get()
            .uri("/api/expenses?start_date=2025-03-09&end_date=2025-03-10T23:59:59")
            .to_request();
        let resp = test::call_service(&app, req).await;
        let expenses: Vec<Expense> = read_json(resp).await;
        assert_eq!(expenses.len(), 2);
        assert_eq!(expenses[0].category, "Bills");
        assert_eq!(expenses[1].category, "Food");
    }

    #[actix_web::test]
    async fn test_get_expenses_with_empty_category() {
        let store = test_utils::memory_store();
        let app = init_app!(store);

        let now = test_utils::now();
        for category in ["Food", "Bills"] {
            store
                .create_expense(10.0, category, None, now, now)
                .await
                .unwrap();
        }

        let req = TestRequest::get()
            .uri("/api/expenses?category=")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let expenses: Vec<Expense> = read_json(resp).await;
        assert_eq!(expenses.len(), 2);
    }

    #[actix_web::test]
    async fn test_get_expenses_malformed_query() {
        let store = test_utils::memory_store();
        let app = init_app!(store);

        for uri in [
            "/api/expenses?limit=-1",
            "/api/expenses?limit=many",
            "/api/expenses?start_date=yesterday",
        ] {
            let req = TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");

            let err: ServerErrorResponse = read_json(resp).await;
            assert_eq!(err.err_type, ErrorType::IncorrectlyFormed);
        }
    }

    #[actix_web::test]
    async fn test_delete_expense() {
        let store = test_utils::memory_store();
        let app = init_app!(store);

        let expense = store
            .create_expense(10.0, "Food", None, test_utils::now(), test_utils::now())
            .await
            .unwrap();

        let req = TestRequest::delete()
            .uri(&format!("/api/expenses/{}", expense.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let msg: MessageResponse = read_json(resp).await;
        assert_eq!(msg.message, "Expense deleted successfully");
        assert!(store.get_expense(expense.id).await.unwrap().is_none());

        // Deleting again reports the expense as missing
        let req = TestRequest::delete()
            .uri(&format!("/api/expenses/{}", expense.id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let err: ServerErrorResponse = read_json(resp).await;
        assert_eq!(err.err_type, ErrorType::ExpenseDoesNotExist);
        assert_eq!(err.err_message, "Expense not found");
    }

    #[actix_web::test]
    async fn test_delete_nonexistent_expense() {
        let store = test_utils::memory_store();
        let app = init_app!(store);

        for id in [Uuid::now_v7().to_string(), String::from("not-a-uuid")] {
            let req = TestRequest::delete()
                .uri(&format!("/api/expenses/{id}"))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND);

            let err: ServerErrorResponse = read_json(resp).await;
            assert_eq!(err.err_type, ErrorType::ExpenseDoesNotExist);
        }
    }

    #[actix_web::test]
    async fn test_summaries() {
        let store = test_utils::memory_store();
        let app = init_app!(store);

        let now = test_utils::now();
        let expenses = [
            // Today (Wednesday)
            (10.0, "Food", now),
            (20.0, "Food", now - TimeDelta::hours(2)),
            (5.0, "Transportation", now),
            // Monday of this week
            (40.0, "Bills", now - TimeDelta::days(2)),
            // Last day of the previous week, still within this month
            (7.0, "Shopping", now - TimeDelta::days(3)),
            // Previous month
            (100.0, "Healthcare", now - TimeDelta::days(20)),
        ];

        for (amount, category, date) in expenses {
            store
                .create_expense(amount, category, None, date, date)
                .await
                .unwrap();
        }

        let req = TestRequest::get()
            .uri("/api/expenses/summary/day")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let day: SpendingSummary = read_json(resp).await;
        assert_eq!(day.total_amount, 35.0);
        assert_eq!(day.expense_count, 3);
        assert_eq!(day.top_categories.len(), 2);
        assert_eq!(day.top_categories[0].category, "Food");
        assert_eq!(day.top_categories[0].amount, 30.0);
        assert_eq!(day.top_categories[0].count, 2);
        assert_eq!(day.top_categories[1].category, "Transportation");

        let req = TestRequest::get()
            .uri("/api/expenses/summary/week")
            .to_request();
        let resp = test::call_service(&app, req).await;
        let week: SpendingSummary = read_json(resp).await;
        assert_eq!(week.total_amount, 75.0);
        assert_eq!(week.expense_count, 4);
        assert_eq!(week.top_categories[0].category, "Bills");

        let req = TestRequest::get()
            .uri("/api/expenses/summary/month")
            .to_request();
        let resp = test::call_service(&app, req).await;
        let month: SpendingSummary = read_json(resp).await;
        assert_eq!(month.total_amount, 82.0);
        assert_eq!(month.expense_count, 5);
        assert_eq!(month.top_categories.len(), 4);
    }

    #[actix_web::test]
    async fn test_summary_with_no_expenses() {
        let store = test_utils::memory_store();
        let app = init_app!(store);

        let req = TestRequest::get()
            .uri("/api/expenses/summary/month")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let summary: SpendingSummary = read_json(resp).await;
        assert_eq!(summary, SpendingSummary::empty());
    }

    #[actix_web::test]
    async fn test_unknown_summary_period() {
        let store = test_utils::memory_store();
        let app = init_app!(store);

        let req = TestRequest::get()
            .uri("/api/expenses/summary/year")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
