use actix_web::web::*;

use crate::handlers::error::HttpErrorResponse;

mod budget;
mod category;
mod expense;
mod health;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.app_data(JsonConfig::default().error_handler(|err, _req| {
        HttpErrorResponse::IncorrectlyFormed(err.to_string()).into()
    }))
    .app_data(QueryConfig::default().error_handler(|err, _req| {
        HttpErrorResponse::IncorrectlyFormed(err.to_string()).into()
    }))
    .service(
        scope("/api")
            .configure(budget::configure)
            .configure(category::configure)
            .configure(expense::configure)
            .configure(health::configure),
    );
}
