use finance_common::clock::ClockHandle;
use finance_common::db::{DaoError, RecordStoreHandle};
use finance_common::messages::{BudgetQuery, MessageResponse, NewBudget};
use finance_common::validators::{self, Validity};

use actix_web::{web, HttpResponse};

use crate::handlers::error::{DoesNotExistType, HttpErrorResponse};
use crate::handlers::parse_record_id;

const BUDGET_NOT_FOUND_MSG: &str = "Budget not found";

pub async fn get_all(
    store: web::Data<RecordStoreHandle>,
    query: web::Query<BudgetQuery>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let budgets = match store.get_budgets(query.user_id.as_deref()).await {
        Ok(b) => b,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to get budgets",
            )));
        }
    };

    Ok(HttpResponse::Ok().json(budgets))
}

pub async fn create(
    store: web::Data<RecordStoreHandle>,
    clock: web::Data<ClockHandle>,
    new_budget: web::Json<NewBudget>,
) -> Result<HttpResponse, HttpErrorResponse> {
    if let Validity::Invalid(msg) = validators::validate_new_budget(&new_budget) {
        return Err(HttpErrorResponse::InvalidInput(msg));
    }

    let budget = match store
        .create_budget(
            &new_budget.name,
            new_budget.amount,
            new_budget.category.as_deref(),
            new_budget.user_id.as_deref(),
            clock.now(),
        )
        .await
    {
        Ok(b) => b,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to create budget",
            )));
        }
    };

    Ok(HttpResponse::Ok().json(budget))
}

pub async fn edit(
    store: web::Data<RecordStoreHandle>,
    budget_id: web::Path<String>,
    budget_data: web::Json<NewBudget>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let budget_id = parse_record_id(&budget_id, DoesNotExistType::Budget)?;

    if let Validity::Invalid(msg) = validators::validate_new_budget(&budget_data) {
        return Err(HttpErrorResponse::InvalidInput(msg));
    }

    let budget = match store
        .update_budget(
            budget_id,
            &budget_data.name,
            budget_data.amount,
            budget_data.category.as_deref(),
            budget_data.user_id.as_deref(),
        )
        .await
    {
        Ok(b) => b,
        Err(DaoError::NotFound) => {
            return Err(HttpErrorResponse::DoesNotExist(
                String::from(BUDGET_NOT_FOUND_MSG),
                DoesNotExistType::Budget,
            ));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to update budget",
            )));
        }
    };

    Ok(HttpResponse::Ok().json(budget))
}

pub async fn delete(
    store: web::Data<RecordStoreHandle>,
    budget_id: web::Path<String>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let budget_id = parse_record_id(&budget_id, DoesNotExistType::Budget)?;

    match store.delete_budget(budget_id).await {
        Ok(()) => (),
        Err(DaoError::NotFound) => {
            return Err(HttpErrorResponse::DoesNotExist(
                String::from(BUDGET_NOT_FOUND_MSG),
                DoesNotExistType::Budget,
            ));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to delete budget",
            )));
        }
    }

    Ok(HttpResponse::Ok().json(MessageResponse::new("Budget deleted successfully")))
}
