use actix_web::{HttpResponse, Responder, get};

#[get("/healthcheck")]
pub async fn healthcheck() -> impl Responder {
    log::info!("healthcheck success");
    HttpResponse::Ok().body("success")
}

#[get("/hello")]
pub async fn hello() -> impl Responder {
    HttpResponse::Ok().body("Hello, world!")
}
