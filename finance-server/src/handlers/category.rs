use finance_common::clock::ClockHandle;
use finance_common::db::RecordStoreHandle;
use finance_common::messages::NewCategory;
use finance_common::validators::{self, Validity};

use actix_web::{web, HttpResponse};

use crate::handlers::error::HttpErrorResponse;

pub async fn get_all(
    store: web::Data<RecordStoreHandle>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let categories = match store.get_categories().await {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to get categories",
            )));
        }
    };

    Ok(HttpResponse::Ok().json(categories))
}

pub async fn create(
    store: web::Data<RecordStoreHandle>,
    clock: web::Data<ClockHandle>,
    new_category: web::Json<NewCategory>,
) -> Result<HttpResponse, HttpErrorResponse> {
    if let Validity::Invalid(msg) = validators::validate_new_category(&new_category) {
        return Err(HttpErrorResponse::InvalidInput(msg));
    }

    // Two concurrent requests for the same name can both pass this check
    match store.find_category_by_name(&new_category.name).await {
        Ok(None) => (),
        Ok(Some(_)) => {
            return Err(HttpErrorResponse::ConflictWithExisting(String::from(
                "Category already exists",
            )));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to check for existing category",
            )));
        }
    }

    let category = match store
        .create_category(
            &new_category.name,
            &new_category.color,
            new_category.icon.as_deref(),
            clock.now(),
        )
        .await
    {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(String::from(
                "Failed to create category",
            )));
        }
    };

    Ok(HttpResponse::Ok().json(category))
}
