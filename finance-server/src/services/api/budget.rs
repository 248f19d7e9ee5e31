use actix_web::web::*;

use crate::handlers::budget;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/budgets")
            .route("", get().to(budget::get_all))
            .route("", post().to(budget::create))
            .route("/{budget_id}", put().to(budget::edit))
            .route("/{budget_id}", delete().to(budget::delete)),
    );
}
