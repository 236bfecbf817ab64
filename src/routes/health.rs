use actix_web::web;

use crate::handlers::health;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health::healthcheck).service(health::hello);
}
