use finance_common::clock::ClockHandle;
use finance_common::messages::HealthStatus;

use actix_web::{web, HttpResponse, Responder};

pub async fn health(clock: web::Data<ClockHandle>) -> impl Responder {
    HttpResponse::Ok().json(HealthStatus {
        status: String::from("healthy"),
        timestamp: clock.now(),
    })
}
