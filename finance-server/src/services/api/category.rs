use actix_web::web::*;

use crate::handlers::category;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/categories")
            .route("", get().to(category::get_all))
            .route("", post().to(category::create)),
    );
}
