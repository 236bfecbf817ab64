use actix_web::{error::JsonPayloadError, web};

use crate::database::models::{Community, Location, Membership};
use crate::error::AppError;

pub mod health;
pub mod resource;

pub const SERVICE_PREFIX: &str = "/geolocationapi";

/// Body decoding failures become a structured 400. The content type is not
/// enforced: any body that parses as JSON is accepted.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .content_type_required(false)
        .error_handler(|err: JsonPayloadError, _req| AppError::Validation(err.to_string()).into())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure).service(
        web::scope(SERVICE_PREFIX)
            .app_data(json_config())
            .configure(resource::configure::<Location>)
            .configure(resource::configure::<Membership>)
            .configure(resource::configure::<Community>),
    );
}
