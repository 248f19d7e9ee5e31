use actix_web::web::*;

use crate::handlers::expense;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/expenses")
            .route("", get().to(expense::get_all))
            .route("", post().to(expense::create))
            .route("/summary/day", get().to(expense::day_summary))
            .route("/summary/week", get().to(expense::week_summary))
            .route("/summary/month", get().to(expense::month_summary))
            .route("/{expense_id}", delete().to(expense::delete)),
    );
}
